use serde::{Deserialize, Deserializer, Serialize};

/// Treats an explicit JSON `null` like a missing key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One vendor scorecard record from the factor summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingEntity {
    pub name: String,
    pub score: i64,
    pub grade: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub grade_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub issue_summary: Vec<IssueRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub severity: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub issue_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: u64,
}

/// Entities that breached the threshold in one cycle, in response order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlaggedSet(Vec<RatingEntity>);

impl FlaggedSet {
    pub fn new(entities: Vec<RatingEntity>) -> Self {
        Self(entities)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RatingEntity> {
        self.0.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(|entity| entity.name.as_str()).collect()
    }
}

impl<'a> IntoIterator for &'a FlaggedSet {
    type Item = &'a RatingEntity;
    type IntoIter = std::slice::Iter<'a, RatingEntity>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
