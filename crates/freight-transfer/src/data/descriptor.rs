use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Access levels attached to a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub owner: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub public: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub friend: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub private: String,
}

/// Metadata record for a file, datastore, or directory on the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    #[serde(default)]
    pub name: String,

    /// Server-relative path, e.g. `/v1/file/ws/data/report.txt`.
    #[serde(default)]
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Permission>,

    #[serde(default)]
    pub size: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<FixedOffset>>,

    #[serde(default, rename = "isDir")]
    pub is_dir: bool,
}

impl ResourceDescriptor {
    /// Path of the listing endpoint for this directory's children.
    pub fn children_path(&self) -> crate::Result<String> {
        let mut path = crate::core::properties_path(&self.url)?;
        if !path.ends_with('/') {
            path.push('/');
        }
        Ok(path)
    }
}
