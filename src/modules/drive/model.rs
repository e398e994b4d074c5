use serde::Deserialize;

/// A file (or folder) as returned by the Drive API.
/// The API returns a much larger object; only the fields requested via the
/// `fields` query parameter are populated.
/// refer to https://developers.google.com/drive/api/reference/rest/v3/files#File
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    pub id: String,
    pub name: String,
    pub mime_type: Option<String>,
}

/// refer to https://developers.google.com/drive/api/reference/rest/v3/files/list
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFileList {
    pub files: Vec<DriveFile>,
    #[allow(dead_code)]
    pub next_page_token: Option<String>,
}

/// Response shape for lookups and creations requested with `fields=id` or
/// `fields=files(id)`; only the id comes back.
#[derive(Debug, Deserialize)]
pub struct DriveFileId {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct DriveFileIdList {
    #[serde(default)]
    pub files: Vec<DriveFileId>,
}
