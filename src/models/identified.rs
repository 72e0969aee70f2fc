use serde::{Deserialize, Serialize};

/// A value paired with the id the store assigned to it.
///
/// Serializes flat: `{"id": ..., <fields of T>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identified<T> {
    pub id: String,
    #[serde(flatten)]
    pub data: T,
}

impl<T> Identified<T> {
    pub fn new(id: impl Into<String>, data: T) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }
}
