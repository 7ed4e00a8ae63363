use serde::{Deserialize, Serialize};

/// Color given to tags created without one
pub const DEFAULT_TAG_COLOR: &str = "#3B82F6";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

fn default_color() -> String {
    DEFAULT_TAG_COLOR.to_string()
}

#[derive(Debug, Clone, Serialize)]
pub struct TagCreate {
    pub name: String,
    pub color: String,
}

impl TagCreate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: default_color(),
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TagUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}
