//! Extension metadata

use serde::{Deserialize, Serialize};

/// Describes a capability a DAO exposes outside the proposal flow
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionInfo {
    /// Registry key, e.g. `gov/dao/members`
    pub path: String,
    pub version: String,
    /// Path external callers query through
    pub query_path: String,
    /// Private extensions are only reachable from the DAO's own context
    pub private: bool,
}

impl ExtensionInfo {
    pub fn new(
        path: impl Into<String>,
        version: impl Into<String>,
        query_path: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            version: version.into(),
            query_path: query_path.into(),
            private: false,
        }
    }

    pub fn private(mut self) -> Self {
        self.private = true;
        self
    }
}
