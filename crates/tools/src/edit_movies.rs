//! Bulk edits through Radarr's movie editor.
//!
//! The payload is checked field by field before anything is sent, then
//! every referenced movie and tag is confirmed to exist. The first bad
//! reference ends the call with an error result naming it.

use std::sync::Arc;

use async_trait::async_trait;
use radarr_mcp_core::api::{Method, RadarrApi};
use radarr_mcp_core::error::{RemoteError, ToolError};
use radarr_mcp_core::tool::{Tool, ToolResult};
use serde_json::{Map, Value, json};
use tracing::{debug, info};

use crate::args::as_int;
use crate::pipeline::Pipeline;
use crate::quality_profiles::fetch_profiles;

const EDITABLE_FIELDS: [&str; 6] = [
    "movieIds",
    "monitored",
    "qualityProfileId",
    "minimumAvailability",
    "tags",
    "applyTags",
];
const APPLY_TAGS: [&str; 3] = ["replace", "add", "remove"];
const AVAILABILITIES: [&str; 3] = ["announced", "inCinemas", "released"];

/// A checked editor payload.
#[derive(Debug, Clone, Default, PartialEq)]
struct Edits {
    movie_ids: Vec<i64>,
    monitored: Option<bool>,
    quality_profile_id: Option<i64>,
    minimum_availability: Option<String>,
    tags: Option<Vec<i64>>,
    apply_tags: Option<String>,
}

impl Edits {
    fn parse(raw: &Value) -> Result<Self, String> {
        let Some(fields) = raw.as_object() else {
            return Err("edits must be an object".into());
        };
        if let Some(unknown) = fields.keys().find(|k| !EDITABLE_FIELDS.contains(&k.as_str())) {
            return Err(format!(
                "Invalid field: {unknown} (editable: {})",
                EDITABLE_FIELDS.join(", ")
            ));
        }

        let movie_ids = match fields.get("movieIds") {
            None | Some(Value::Null) => return Err("Missing required field: movieIds".into()),
            Some(ids) => int_list(ids)
                .filter(|ids| !ids.is_empty())
                .ok_or("movieIds must be a non-empty list of movie IDs")?,
        };

        let monitored = match fields.get("monitored") {
            None => None,
            Some(Value::Bool(b)) => Some(*b),
            Some(_) => return Err("monitored must be true or false".into()),
        };

        let quality_profile_id = fields
            .get("qualityProfileId")
            .map(|v| as_int(v).ok_or("qualityProfileId must be an integer"))
            .transpose()?;

        let minimum_availability = fields
            .get("minimumAvailability")
            .map(|v| one_of(v, &AVAILABILITIES, "minimumAvailability"))
            .transpose()?;

        let tags = fields
            .get("tags")
            .map(|v| int_list(v).ok_or("tags must be a list of tag IDs"))
            .transpose()?;

        let apply_tags = fields
            .get("applyTags")
            .map(|v| one_of(v, &APPLY_TAGS, "applyTags"))
            .transpose()?;

        Ok(Self {
            movie_ids,
            monitored,
            quality_profile_id,
            minimum_availability,
            tags,
            apply_tags,
        })
    }

    /// Record fields the edit changes, for the result projection.
    fn changed_fields(&self) -> Map<String, Value> {
        let mut changed = Map::new();
        if let Some(monitored) = self.monitored {
            changed.insert("monitored".into(), json!(monitored));
        }
        if let Some(id) = self.quality_profile_id {
            changed.insert("qualityProfileId".into(), json!(id));
        }
        if let Some(availability) = &self.minimum_availability {
            changed.insert("minimumAvailability".into(), json!(availability));
        }
        if let Some(tags) = &self.tags {
            changed.insert("tags".into(), json!(tags));
        }
        changed
    }

    fn payload(&self) -> Value {
        let mut payload = Map::new();
        payload.insert("movieIds".into(), json!(self.movie_ids));
        payload.extend(self.changed_fields());
        if let Some(apply) = &self.apply_tags {
            payload.insert("applyTags".into(), json!(apply));
        }
        Value::Object(payload)
    }
}

fn int_list(value: &Value) -> Option<Vec<i64>> {
    value.as_array()?.iter().map(as_int).collect()
}

fn one_of(value: &Value, allowed: &[&str], field: &str) -> Result<String, String> {
    value
        .as_str()
        .filter(|v| allowed.contains(v))
        .map(str::to_string)
        .ok_or_else(|| {
            let quoted: Vec<String> = allowed.iter().map(|a| format!("'{a}'")).collect();
            format!("{field} must be one of {}", quoted.join(", "))
        })
}

fn failure(message: impl Into<String>) -> ToolResult {
    ToolResult::json(false, json!({"error": message.into()}))
}

fn remote_failure(err: &RemoteError) -> ToolResult {
    let details = match err {
        RemoteError::Status { body, .. } => body.clone(),
        _ => Value::Null,
    };
    ToolResult::json(false, json!({"error": err.to_string(), "details": details}))
}

/// Outcome of an existence check.
enum Reference {
    Found(Value),
    Missing,
}

pub struct EditMoviesTool {
    api: Arc<dyn RadarrApi>,
}

impl EditMoviesTool {
    pub fn new(api: Arc<dyn RadarrApi>) -> Self {
        Self { api }
    }

    async fn fetch(&self, path: String) -> Result<Reference, RemoteError> {
        match self.api.get(&path, Vec::new()).await {
            Ok(Value::Object(record)) if !record.is_empty() => Ok(Reference::Found(Value::Object(record))),
            Ok(_) => Ok(Reference::Missing),
            Err(e) if e.is_not_found() => Ok(Reference::Missing),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl Tool for EditMoviesTool {
    fn name(&self) -> &str {
        "edit_movie"
    }

    fn description(&self) -> &str {
        "Edit one or more library movies through Radarr's movie editor. `edits` must \
         include movieIds (Radarr ids, not tmdbIds) and only the fields being changed: \
         monitored (bool), qualityProfileId (int), minimumAvailability \
         (announced | inCinemas | released), tags (list of tag ids) and applyTags \
         (replace | add | remove)."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "edits": {
                    "type": "object",
                    "properties": {
                        "movieIds": {"type": "array", "items": {"type": "integer"}},
                        "monitored": {"type": "boolean"},
                        "qualityProfileId": {"type": "integer"},
                        "minimumAvailability": {"type": "string", "enum": AVAILABILITIES},
                        "tags": {"type": "array", "items": {"type": "integer"}},
                        "applyTags": {"type": "string", "enum": APPLY_TAGS}
                    },
                    "required": ["movieIds"],
                    "additionalProperties": false
                }
            },
            "required": ["edits"]
        })
    }

    async fn execute(&self, arguments: Value) -> Result<ToolResult, ToolError> {
        let raw = arguments.get("edits").unwrap_or(&arguments);
        let edits = match Edits::parse(raw) {
            Ok(edits) => edits,
            Err(message) => return Ok(failure(message)),
        };

        let mut movies = Vec::with_capacity(edits.movie_ids.len());
        for id in &edits.movie_ids {
            match self.fetch(format!("movie/{id}")).await {
                Ok(Reference::Found(movie)) => movies.push(movie),
                Ok(Reference::Missing) => return Ok(failure(format!("Movie with ID {id} not found."))),
                Err(e) => return Ok(remote_failure(&e)),
            }
        }

        for id in edits.tags.iter().flatten() {
            match self.fetch(format!("tag/{id}")).await {
                Ok(Reference::Found(_)) => {}
                Ok(Reference::Missing) => return Ok(failure(format!("Tag with ID {id} not found."))),
                Err(e) => return Ok(remote_failure(&e)),
            }
        }

        if let Some(profile_id) = edits.quality_profile_id {
            let profiles = match fetch_profiles(self.api.as_ref()).await {
                Ok(profiles) => profiles,
                Err(ToolError::Remote(e)) => return Ok(remote_failure(&e)),
                Err(other) => return Err(other),
            };
            if profiles.is_empty() {
                return Ok(failure("No quality profiles found."));
            }
            if !profiles.iter().any(|p| p.get("id").and_then(as_int) == Some(profile_id)) {
                return Ok(failure(format!("Invalid quality profile ID: {profile_id}")));
            }
        }

        debug!(movies = edits.movie_ids.len(), "Submitting movie editor payload");
        let updated = match self
            .api
            .request("movie/editor", Method::Put, Vec::new(), Some(edits.payload()))
            .await
        {
            Ok(updated) => updated,
            Err(e) => return Ok(remote_failure(&e)),
        };
        info!(movies = ?edits.movie_ids, "Movies edited");

        // Radarr answers with the updated movies; older versions send nothing.
        let changed = edits.changed_fields();
        let records = match updated {
            Value::Array(items) if !items.is_empty() => items,
            _ => movies
                .into_iter()
                .map(|mut movie| {
                    if let Value::Object(record) = &mut movie {
                        record.extend(changed.clone());
                    }
                    movie
                })
                .collect(),
        };

        let summary = Pipeline::movie_minimal()
            .with_fields(changed.keys().map(String::as_str))
            .apply_all(&records, self.api.origin())?;
        Ok(ToolResult::json(true, json!({"movies": summary})))
    }
}
