use serde::{Deserialize, Serialize};

/// Best-guess project label for a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDescriptor {
    pub name: String,
    pub root_path: String,
    pub file_count: usize,
}

impl ProjectDescriptor {
    pub fn new(name: impl Into<String>, root_path: impl Into<String>, file_count: usize) -> Self {
        Self { name: name.into(), root_path: root_path.into(), file_count }
    }
}
