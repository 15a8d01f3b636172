use serde::{Deserialize, Serialize};

/// One episode record selected for migration.
///
/// Field names mirror the record store columns. An episode always carries a
/// primary audio locator; the dubbing locator is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Episode {
    pub id: String,
    pub audio_file: String,
    #[serde(rename = "audioFile_dubbing", default)]
    pub dubbing_file: Option<String>,
}

impl Episode {
    pub fn has_dubbing(&self) -> bool {
        self.dubbing_file.is_some()
    }
}

/// Partial column update accumulated while one episode moves through the
/// pipeline. Absent fields are left untouched by the record store.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdatePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_file: Option<String>,
    #[serde(rename = "audioFile_dubbing", skip_serializing_if = "Option::is_none")]
    pub dubbing_file: Option<String>,
}
