//! Human-readable summaries of outbound requests for the application log.
//!
//! Summaries are built from copies of the wire payloads. Embedded images
//! (`init_img`, `init_mask`) are cut down in the copy so a single canvas
//! request does not flood the log; the transmitted payload is never touched.

use chrono::Local;
use serde_json::{Map, Value};

use crate::config::EmitterConfig;
use crate::error::Result;
use crate::models::{GenerationParameters, Image, PostprocessingRequest};
use crate::state::{ActivityLevel, LogEntry};
use crate::translation::TranslatedParameters;

pub const ELLIPSIS: &str = "...";

#[derive(Debug, Clone)]
pub struct ActivityLogger {
    truncate_len: usize,
    timestamp_format: String,
    mirror: bool,
}

impl ActivityLogger {
    pub fn new(config: &EmitterConfig) -> Self {
        Self {
            truncate_len: config.log_truncate_len,
            timestamp_format: config.timestamp_format.clone(),
            mirror: config.mirror_activity,
        }
    }

    pub fn mirrors_to_logger(&self) -> bool {
        self.mirror
    }

    /// `<label>: {generation..., esrgan..., facetool...}` with images truncated.
    pub fn generation_message(&self, label: &str, params: &TranslatedParameters) -> Result<String> {
        let redacted = redact_generation(&params.generation, self.truncate_len);

        let mut merged = as_object(serde_json::to_value(&redacted)?);
        if let Some(esrgan) = &params.esrgan {
            merged.extend(as_object(serde_json::to_value(esrgan)?));
        }
        if let Some(facetool) = &params.facetool {
            merged.extend(as_object(serde_json::to_value(facetool)?));
        }
        Ok(format!("{}: {}", label, Value::Object(merged)))
    }

    /// `ESRGAN upscale requested: {...}` or `Face restoration (<type>) requested: {...}`.
    pub fn postprocessing_message(
        &self,
        image: &Image,
        request: &PostprocessingRequest,
    ) -> Result<String> {
        let mut summary = Map::new();
        summary.insert("file".to_string(), Value::from(image.url.as_str()));
        let params = as_object(serde_json::to_value(request)?);
        summary.extend(params.into_iter().filter(|(key, _)| key != "type"));

        let label = match request {
            PostprocessingRequest::Esrgan { .. } => "ESRGAN upscale requested".to_string(),
            other => format!("Face restoration ({}) requested", other.type_name()),
        };
        Ok(format!("{}: {}", label, Value::Object(summary)))
    }

    pub fn entry(&self, message: String) -> LogEntry {
        LogEntry {
            timestamp: Local::now().format(&self.timestamp_format).to_string(),
            message,
            level: ActivityLevel::Info,
        }
    }
}

/// First `len` characters of `value` followed by [`ELLIPSIS`].
pub fn truncate_for_log(value: &str, len: usize) -> String {
    let mut truncated: String = value.chars().take(len).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}

/// Log copy of the generation parameters. Empty image fields stay empty.
pub fn redact_generation(params: &GenerationParameters, len: usize) -> GenerationParameters {
    let mut copy = params.clone();
    if !copy.init_mask.is_empty() {
        copy.init_mask = truncate_for_log(&copy.init_mask, len);
    }
    if let Some(init_img) = copy.init_img.as_mut().filter(|img| !img.is_empty()) {
        *init_img = truncate_for_log(init_img.as_str(), len);
    }
    copy
}

fn as_object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
