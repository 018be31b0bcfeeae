pub mod canvas;
pub mod gallery;
pub mod generation;
pub mod postprocessing;
pub mod store;
pub mod system;

use serde::{Deserialize, Serialize};

use crate::models::GalleryCategory;

pub use canvas::{BoundingBoxScaleMethod, CanvasState, Coordinates, Dimensions};
pub use gallery::{Categories, CategoryState, GalleryState};
pub use generation::GenerationState;
pub use postprocessing::PostprocessingState;
pub use store::{StateStore, Store};
pub use system::{ActivityLevel, InProgressImageType, LogEntry, SystemState};

/// Legacy combined parameter slice the streaming path still reads from.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionsState {
    pub generation: GenerationState,
    pub postprocessing: PostprocessingState,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RootState {
    pub generation: GenerationState,
    pub postprocessing: PostprocessingState,
    pub options: OptionsState,
    pub system: SystemState,
    pub canvas: CanvasState,
    pub gallery: GalleryState,
}

/// Mutations the emitter is allowed to request.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetIsProcessing(bool),
    GenerationRequested,
    ModelChangeRequested,
    ModelConvertRequested,
    ModelMergingRequested,
    AddLogEntry(LogEntry),
    RemoveImage {
        uuid: String,
        category: GalleryCategory,
    },
}

impl RootState {
    pub fn reduce(&mut self, action: &Action) {
        match action {
            Action::SetIsProcessing(value) => self.system.is_processing = *value,
            Action::GenerationRequested => self.system.generation_requested(),
            Action::ModelChangeRequested => {
                self.system.model_job_requested(system::STATUS_LOADING_MODEL)
            }
            Action::ModelConvertRequested => {
                self.system.model_job_requested(system::STATUS_CONVERTING_MODEL)
            }
            Action::ModelMergingRequested => {
                self.system.model_job_requested(system::STATUS_MERGING_MODELS)
            }
            Action::AddLogEntry(entry) => self.system.add_log_entry(entry.clone()),
            Action::RemoveImage { uuid, category } => self.gallery.remove_image(uuid, *category),
        }
    }
}
