use serde::{Deserialize, Serialize};

use crate::models::FacetoolType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostprocessingState {
    pub codeformer_fidelity: f64,
    pub facetool_strength: f64,
    pub facetool_type: FacetoolType,
    pub hires_fix: bool,
    pub hires_strength: f64,
    pub should_run_esrgan: bool,
    pub should_run_facetool: bool,
    pub upscaling_level: u32,
    pub upscaling_denoising: f64,
    pub upscaling_strength: f64,
}

impl Default for PostprocessingState {
    fn default() -> Self {
        Self {
            codeformer_fidelity: 0.75,
            facetool_strength: 0.75,
            facetool_type: FacetoolType::Gfpgan,
            hires_fix: false,
            hires_strength: 0.75,
            should_run_esrgan: false,
            should_run_facetool: false,
            upscaling_level: 4,
            upscaling_denoising: 0.75,
            upscaling_strength: 0.75,
        }
    }
}
