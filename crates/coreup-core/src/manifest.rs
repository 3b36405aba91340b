use serde::{Deserialize, Serialize};

/// What the local install directory says is currently installed.
///
/// `version` is free-form and goes through the same normalization as
/// upstream tags before any comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalManifest {
    pub version: String,
}

impl LocalManifest {
    #[must_use]
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
        }
    }
}
