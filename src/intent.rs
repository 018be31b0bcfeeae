use crate::models::{GalleryCategory, GenerationMode, Image, ModelConfig, ModelConversion, ModelMerge};

/// A user-triggered action. Each maps to exactly one outbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Generate(GenerationMode),
    StreamGenerate(GenerationMode),
    UpscaleImage(Image),
    RestoreFace(Image),
    DeleteImage(Image),
    ListImages(GalleryCategory),
    PollNewImages(GalleryCategory),
    Cancel,
    FetchConfig,
    SearchModels(String),
    AddModel(ModelConfig),
    DeleteModel(String),
    ConvertModel(ModelConversion),
    MergeModels(ModelMerge),
    ChangeModel(String),
    SaveStagingImage(String),
    EmptyTempFolder,
}

impl Intent {
    /// Generation intents go through the readiness gate first.
    pub fn is_gated(&self) -> bool {
        matches!(self, Intent::Generate(_) | Intent::StreamGenerate(_))
    }
}
