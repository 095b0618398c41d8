use serde::{Deserialize, Serialize};

use crate::model::Filter;

/// Presence change of a filter between two filter lists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "lowercase")]
pub enum FilterAction<F = Filter> {
    Add(F),
    Remove(F),
}

impl<F> FilterAction<F> {
    pub fn payload(&self) -> &F {
        match self {
            FilterAction::Add(filter) | FilterAction::Remove(filter) => filter,
        }
    }
}
