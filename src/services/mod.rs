pub mod alert;
pub mod evaluator;
pub mod monitor;

pub use alert::{AlertSender, render_body};
pub use evaluator::Evaluator;
pub use monitor::{CycleOutcome, Monitor};
