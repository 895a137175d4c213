//! Category model

use serde::{Deserialize, Serialize};

/// A spending/income category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier within the categories collection
    pub id: String,

    /// Display name
    pub name: String,
}

impl Category {
    /// Create a new category with a generated id
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
        }
    }
}
