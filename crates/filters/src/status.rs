//! Derived Radarr status flags.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Whether a movie is in the library, monitored, and on disk.
///
/// Always computed from the raw Radarr record: projection may have
/// dropped `id` or `movieFile`, which are the evidence fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedStatus {
    pub tracked: bool,
    pub monitored: bool,
    pub downloaded: bool,
}

impl DerivedStatus {
    pub fn derive(source: &Value) -> Self {
        Self {
            tracked: source.get("id").is_some(),
            monitored: source
                .get("monitored")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            downloaded: source.get("movieFile").is_some(),
        }
    }

    pub fn to_value(self) -> Value {
        serde_json::json!({
            "tracked": self.tracked,
            "monitored": self.monitored,
            "downloaded": self.downloaded,
        })
    }
}
