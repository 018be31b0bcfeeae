use serde::Serialize;

use crate::models::GenerationMode;
use crate::state::{GenerationState, PostprocessingState, RootState, SystemState};
use crate::translation::parse_seed_weights;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Readiness {
    pub is_ready: bool,
    pub reasons: Vec<String>,
}

/// Decides whether a generation intent may fire.
pub trait ReadinessGate: Send + Sync {
    fn check(&self, state: &RootState, mode: GenerationMode, from_options: bool) -> Readiness;
}

/// The stock rules: prompt present, inputs available, backend idle and connected.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultReadiness;

impl ReadinessGate for DefaultReadiness {
    fn check(&self, state: &RootState, mode: GenerationMode, from_options: bool) -> Readiness {
        if from_options {
            readiness(
                &state.options.generation,
                &state.options.postprocessing,
                &state.system,
                mode,
            )
        } else {
            readiness(&state.generation, &state.postprocessing, &state.system, mode)
        }
    }
}

pub fn readiness(
    generation: &GenerationState,
    postprocessing: &PostprocessingState,
    system: &SystemState,
    mode: GenerationMode,
) -> Readiness {
    let mut reasons = Vec::new();

    if generation.prompt.trim().is_empty() {
        reasons.push("Missing prompt".to_string());
    }
    if mode == GenerationMode::Img2Img && generation.initial_image.is_none() {
        reasons.push("No initial image selected".to_string());
    }
    if system.is_processing {
        reasons.push("System Busy".to_string());
    }
    if !system.is_connected {
        reasons.push("System Disconnected".to_string());
    }
    if generation.should_generate_variations
        && !generation.seed_weights.is_empty()
        && parse_seed_weights(&generation.seed_weights).is_none()
    {
        reasons.push("Seed-Weights badly formatted.".to_string());
    }
    if postprocessing.should_run_esrgan && !system.is_esrgan_available {
        reasons.push("ESRGAN is not available".to_string());
    }
    if postprocessing.should_run_facetool && !system.is_gfpgan_available {
        reasons.push("Face restoration is not available".to_string());
    }

    Readiness {
        is_ready: reasons.is_empty(),
        reasons,
    }
}
