use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Section records are passed through untouched.
pub type Section = Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    /// Filled in by hydration; always serialized, empty when the course has no sections.
    #[serde(default)]
    pub sections: Vec<Section>,
    /// Any other fields the catalog document carries.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Course {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            sections: Vec::new(),
            extra: Map::new(),
        }
    }
}

/// One document of the per-semester sections collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionsDocument {
    #[serde(rename = "_id")]
    pub course_id: String,
    pub sections: Vec<Section>,
}
