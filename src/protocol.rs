//! Outbound wire vocabulary. One variant per message the client can send;
//! each carries exactly the positional arguments of that message.

use serde::Serialize;
use serde_json::Value;

use crate::models::{
    EsrganParameters, FacetoolParameters, GalleryCategory, GenerationParameters, Image,
    ModelConfig, ModelConversion, ModelMerge, PostprocessingRequest,
};

/// socket.io packet prefix: `4` MESSAGE + `2` EVENT.
pub const EVENT_PACKET_PREFIX: &str = "42";

#[derive(Debug, Clone, PartialEq)]
pub enum OutboundEvent {
    GenerateImage {
        generation: GenerationParameters,
        esrgan: Option<EsrganParameters>,
        facetool: Option<FacetoolParameters>,
    },
    Stream {
        generation: GenerationParameters,
        esrgan: Option<EsrganParameters>,
        facetool: Option<FacetoolParameters>,
    },
    RunPostprocessing {
        image: Image,
        request: PostprocessingRequest,
    },
    DeleteImage {
        url: String,
        thumbnail: String,
        uuid: String,
        category: GalleryCategory,
    },
    RequestImages {
        category: GalleryCategory,
        earliest_mtime: Option<i64>,
    },
    RequestLatestImages {
        category: GalleryCategory,
        latest_mtime: Option<i64>,
    },
    Cancel,
    RequestSystemConfig,
    SearchForModels {
        folder: String,
    },
    AddNewModel(ModelConfig),
    DeleteModel {
        name: String,
    },
    ConvertToDiffusers(ModelConversion),
    MergeDiffusersModels(ModelMerge),
    RequestModelChange {
        name: String,
    },
    RequestSaveStagingAreaImageToGallery {
        url: String,
    },
    RequestEmptyTempFolder,
}

impl OutboundEvent {
    pub fn name(&self) -> &'static str {
        match self {
            OutboundEvent::GenerateImage { .. } => "generateImage",
            OutboundEvent::Stream { .. } => "stream",
            OutboundEvent::RunPostprocessing { .. } => "runPostprocessing",
            OutboundEvent::DeleteImage { .. } => "deleteImage",
            OutboundEvent::RequestImages { .. } => "requestImages",
            OutboundEvent::RequestLatestImages { .. } => "requestLatestImages",
            OutboundEvent::Cancel => "cancel",
            OutboundEvent::RequestSystemConfig => "requestSystemConfig",
            OutboundEvent::SearchForModels { .. } => "searchForModels",
            OutboundEvent::AddNewModel(_) => "addNewModel",
            OutboundEvent::DeleteModel { .. } => "deleteModel",
            OutboundEvent::ConvertToDiffusers(_) => "convertToDiffusers",
            OutboundEvent::MergeDiffusersModels(_) => "mergeDiffusersModels",
            OutboundEvent::RequestModelChange { .. } => "requestModelChange",
            OutboundEvent::RequestSaveStagingAreaImageToGallery { .. } => {
                "requestSaveStagingAreaImageToGallery"
            }
            OutboundEvent::RequestEmptyTempFolder => "requestEmptyTempFolder",
        }
    }

    /// Positional payload in wire order. Absent optional groups become `false`.
    pub fn args(&self) -> serde_json::Result<Vec<Value>> {
        let args = match self {
            OutboundEvent::GenerateImage {
                generation,
                esrgan,
                facetool,
            }
            | OutboundEvent::Stream {
                generation,
                esrgan,
                facetool,
            } => vec![
                serde_json::to_value(generation)?,
                group_or_false(esrgan)?,
                group_or_false(facetool)?,
            ],
            OutboundEvent::RunPostprocessing { image, request } => {
                vec![serde_json::to_value(image)?, serde_json::to_value(request)?]
            }
            OutboundEvent::DeleteImage {
                url,
                thumbnail,
                uuid,
                category,
            } => vec![
                Value::from(url.as_str()),
                Value::from(thumbnail.as_str()),
                Value::from(uuid.as_str()),
                Value::from(category.as_str()),
            ],
            OutboundEvent::RequestImages {
                category,
                earliest_mtime: mtime,
            }
            | OutboundEvent::RequestLatestImages {
                category,
                latest_mtime: mtime,
            } => vec![Value::from(category.as_str()), serde_json::to_value(mtime)?],
            OutboundEvent::Cancel
            | OutboundEvent::RequestSystemConfig
            | OutboundEvent::RequestEmptyTempFolder => Vec::new(),
            OutboundEvent::SearchForModels { folder } => vec![Value::from(folder.as_str())],
            OutboundEvent::AddNewModel(config) => vec![serde_json::to_value(config)?],
            OutboundEvent::DeleteModel { name } | OutboundEvent::RequestModelChange { name } => {
                vec![Value::from(name.as_str())]
            }
            OutboundEvent::ConvertToDiffusers(conversion) => {
                vec![serde_json::to_value(conversion)?]
            }
            OutboundEvent::MergeDiffusersModels(merge) => vec![serde_json::to_value(merge)?],
            OutboundEvent::RequestSaveStagingAreaImageToGallery { url } => {
                vec![Value::from(url.as_str())]
            }
        };
        Ok(args)
    }

    /// `42["<name>", ...args]`
    pub fn to_frame(&self) -> serde_json::Result<String> {
        let mut packet = Vec::with_capacity(4);
        packet.push(Value::from(self.name()));
        packet.extend(self.args()?);
        Ok(format!(
            "{}{}",
            EVENT_PACKET_PREFIX,
            serde_json::to_string(&packet)?
        ))
    }
}

fn group_or_false<T: Serialize>(group: &Option<T>) -> serde_json::Result<Value> {
    match group {
        Some(group) => serde_json::to_value(group),
        None => Ok(Value::Bool(false)),
    }
}
