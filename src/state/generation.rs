use serde::{Deserialize, Serialize};

use crate::models::InitialImage;

/// Prompt and sampler settings as the parameter panels hold them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationState {
    pub cfg_scale: f64,
    pub height: u32,
    pub width: u32,
    pub img2img_strength: f64,
    pub infill_method: String,
    pub initial_image: Option<InitialImage>,
    pub iterations: u32,
    pub perlin: f64,
    pub prompt: String,
    pub negative_prompt: String,
    pub sampler: String,
    pub seam_blur: u32,
    pub seamless: bool,
    pub seam_size: u32,
    pub seam_steps: u32,
    pub seam_strength: f64,
    pub seed: u32,
    pub seed_weights: String,
    pub should_fit_to_width_height: bool,
    pub should_generate_variations: bool,
    pub should_randomize_seed: bool,
    pub steps: u32,
    pub threshold: f64,
    pub tile_size: u32,
    pub variation_amount: f64,
    pub should_use_symmetry: bool,
    pub horizontal_symmetry_steps: u32,
    pub vertical_symmetry_steps: u32,
}

impl Default for GenerationState {
    fn default() -> Self {
        Self {
            cfg_scale: 7.5,
            height: 512,
            width: 512,
            img2img_strength: 0.75,
            infill_method: "patchmatch".to_string(),
            initial_image: None,
            iterations: 1,
            perlin: 0.0,
            prompt: String::new(),
            negative_prompt: String::new(),
            sampler: "k_lms".to_string(),
            seam_blur: 16,
            seamless: false,
            seam_size: 96,
            seam_steps: 30,
            seam_strength: 0.7,
            seed: 0,
            seed_weights: String::new(),
            should_fit_to_width_height: true,
            should_generate_variations: false,
            should_randomize_seed: true,
            steps: 50,
            threshold: 0.0,
            tile_size: 32,
            variation_amount: 0.1,
            should_use_symmetry: false,
            horizontal_symmetry_steps: 0,
            vertical_symmetry_steps: 0,
        }
    }
}

impl GenerationState {
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self.should_randomize_seed = false;
        self
    }

    pub fn with_initial_image(mut self, image: InitialImage) -> Self {
        self.initial_image = Some(image);
        self
    }
}
