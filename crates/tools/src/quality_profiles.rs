//! Quality profiles configured in Radarr.

use std::sync::Arc;

use async_trait::async_trait;
use radarr_mcp_core::api::RadarrApi;
use radarr_mcp_core::error::ToolError;
use radarr_mcp_core::tool::{Tool, ToolResult};
use radarr_mcp_filters::shapes;
use serde_json::{Value, json};

use crate::pipeline::{records, validation};

pub struct QualityProfilesTool {
    api: Arc<dyn RadarrApi>,
}

impl QualityProfilesTool {
    pub fn new(api: Arc<dyn RadarrApi>) -> Self {
        Self { api }
    }
}

/// Fetch every profile as `{id, name, allowedQualities}`.
pub(crate) async fn fetch_profiles(api: &dyn RadarrApi) -> Result<Vec<Value>, ToolError> {
    let response = api.get("qualityprofile", Vec::new()).await?;
    let schema = shapes::quality_profile();
    records(&response, "qualityprofile")?
        .iter()
        .map(|profile| {
            let summary = json!({
                "id": profile.get("id").cloned().unwrap_or(Value::Null),
                "name": profile.get("name").cloned().unwrap_or(Value::Null),
                "allowedQualities": allowed_qualities(profile),
            });
            schema.validate(&summary).map(|shape| shape.to_value()).map_err(validation)
        })
        .collect()
}

/// Names of allowed qualities. An allowed group contributes its members.
fn allowed_qualities(profile: &Value) -> Vec<String> {
    let mut names = Vec::new();
    let items = profile.get("items").and_then(Value::as_array);
    for item in items.into_iter().flatten() {
        if item.get("allowed").and_then(Value::as_bool) != Some(true) {
            continue;
        }
        if let Some(name) = quality_name(item) {
            names.push(name.to_string());
            continue;
        }
        let members = item.get("items").and_then(Value::as_array);
        names.extend(
            members
                .into_iter()
                .flatten()
                .filter_map(quality_name)
                .map(str::to_string),
        );
    }
    names
}

fn quality_name(item: &Value) -> Option<&str> {
    item.get("quality")?.get("name")?.as_str()
}

#[async_trait]
impl Tool for QualityProfilesTool {
    fn name(&self) -> &str {
        "get_quality_profiles"
    }

    fn description(&self) -> &str {
        "List the quality profiles configured in Radarr: id (required when adding or \
         editing movies), name, and the quality levels each profile allows."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _arguments: Value) -> Result<ToolResult, ToolError> {
        let profiles = fetch_profiles(self.api.as_ref()).await?;
        Ok(ToolResult::json(true, Value::Array(profiles)))
    }
}
