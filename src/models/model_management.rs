use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelFormat {
    Ckpt,
    Diffusers,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaeSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Payload of `addNewModel`. Checkpoint models carry `config`/`weights`,
/// diffusers models carry `path` or `repo_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub name: String,
    pub description: String,
    pub format: ModelFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vae: Option<VaeSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<bool>,
}

impl ModelConfig {
    pub fn diffusers(name: impl Into<String>, repo_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            format: ModelFormat::Diffusers,
            config: None,
            weights: None,
            path: None,
            repo_id: Some(repo_id.into()),
            vae: None,
            width: None,
            height: None,
            default: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveLocation {
    Root,
    Custom,
}

/// Payload of `convertToDiffusers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConversion {
    pub model_name: String,
    pub save_location: SaveLocation,
    #[serde(default)]
    pub custom_location: String,
}

impl ModelConversion {
    pub fn to_root(model_name: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            save_location: SaveLocation::Root,
            custom_location: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeInterpolation {
    WeightedSum,
    Sigmoid,
    InvSigmoid,
    AddDifference,
}

/// Payload of `mergeDiffusersModels`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMerge {
    pub models_to_merge: Vec<String>,
    pub alpha: f64,
    pub interp: MergeInterpolation,
    pub force: bool,
    pub merged_model_name: String,
    pub model_merge_save_path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn diffusers_config_omits_checkpoint_fields() {
        let value = serde_json::to_value(ModelConfig::diffusers("sd-2", "stabilityai/sd-2"))
            .unwrap();
        assert_eq!(value["format"], json!("diffusers"));
        assert_eq!(value["repo_id"], json!("stabilityai/sd-2"));
        assert!(value.get("weights").is_none());
    }

    #[test]
    fn merge_request_keeps_null_save_path() {
        let merge = ModelMerge {
            models_to_merge: vec!["a".into(), "b".into()],
            alpha: 0.5,
            interp: MergeInterpolation::AddDifference,
            force: false,
            merged_model_name: "a+b".into(),
            model_merge_save_path: None,
        };
        let value = serde_json::to_value(merge).unwrap();
        assert_eq!(value["interp"], json!("add_difference"));
        assert_eq!(value["model_merge_save_path"], serde_json::Value::Null);
    }
}
