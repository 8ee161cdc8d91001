//! Multilingual names carried on documents and rows.

use serde::{Deserialize, Serialize};

/// One localized name, e.g. `{"code": "th", "name": "..."}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameX {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub isauto: bool,
    #[serde(default)]
    pub isdelete: bool,
}

impl NameX {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            name: Some(name.into()),
            isauto: false,
            isdelete: false,
        }
    }
}

/// Normalize an optional name array: a missing or null array becomes empty.
pub fn default_names(names: &Option<Vec<NameX>>) -> Vec<NameX> {
    names.clone().unwrap_or_default()
}
