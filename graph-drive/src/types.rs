//! Drive API response types.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A drive item as the API returns it. Exactly one of the `file` and
/// `folder` facets is present.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DriveItem {
    pub id: String,
    pub name: String,

    #[serde(default)]
    pub size: Option<u64>,

    #[serde(default)]
    pub created_date_time: Option<DateTime<Utc>>,

    #[serde(default)]
    pub last_modified_date_time: Option<DateTime<Utc>>,

    #[serde(default)]
    pub file: Option<FileFacet>,

    #[serde(default)]
    pub folder: Option<FolderFacet>,
}

impl DriveItem {
    pub fn is_folder(&self) -> bool {
        self.folder.is_some()
    }
}

/// File facet carrying the MIME type.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileFacet {
    #[serde(default)]
    pub mime_type: Option<String>,
}

/// Folder facet carrying the child count.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FolderFacet {
    #[serde(default)]
    pub child_count: Option<u32>,
}

/// `/children` listing envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct DriveChildrenResponse {
    pub value: Vec<DriveItem>,
}
