use serde::{Deserialize, Serialize};

/// Which tab the request originates from. Serialized the way the backend spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GenerationMode {
    #[serde(rename = "txt2img")]
    Txt2Img,
    #[serde(rename = "img2img")]
    Img2Img,
    #[serde(rename = "unifiedCanvas")]
    UnifiedCanvas,
    #[serde(rename = "nodes")]
    Nodes,
    #[serde(rename = "postprocess")]
    Postprocess,
    #[serde(rename = "training")]
    Training,
}

impl GenerationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationMode::Txt2Img => "txt2img",
            GenerationMode::Img2Img => "img2img",
            GenerationMode::UnifiedCanvas => "unifiedCanvas",
            GenerationMode::Nodes => "nodes",
            GenerationMode::Postprocess => "postprocess",
            GenerationMode::Training => "training",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Positional argument #1 of `generateImage` / `stream`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParameters {
    pub prompt: String,
    pub iterations: u32,
    pub steps: u32,
    pub cfg_scale: f64,
    pub threshold: f64,
    pub perlin: f64,
    pub height: u32,
    pub width: u32,
    pub sampler_name: String,
    pub seed: u32,
    pub progress_images: bool,
    pub progress_latents: bool,
    pub save_intermediates: u32,
    pub generation_mode: GenerationMode,
    pub init_mask: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub init_img: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h_symmetry_time_pct: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v_symmetry_time_pct: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hires_fix: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seamless: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fit: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invert_mask: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inpaint_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inpaint_height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seam_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seam_blur: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seam_strength: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seam_steps: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tile_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infill_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_outpaint: Option<bool>,
    pub variation_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub with_variations: Option<Vec<(u32, f64)>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_image_debugging: Option<bool>,
}

/// Upscaling group sent alongside a generation request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EsrganParameters {
    pub level: u32,
    pub denoise_str: f64,
    pub strength: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacetoolType {
    Gfpgan,
    Codeformer,
}

impl FacetoolType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FacetoolType::Gfpgan => "gfpgan",
            FacetoolType::Codeformer => "codeformer",
        }
    }
}

/// Face-restoration group sent alongside a generation request.
/// Fidelity only exists for CodeFormer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FacetoolParameters {
    Gfpgan {
        strength: f64,
    },
    Codeformer {
        strength: f64,
        codeformer_fidelity: f64,
    },
}

impl FacetoolParameters {
    pub fn new(kind: FacetoolType, strength: f64, codeformer_fidelity: f64) -> Self {
        match kind {
            FacetoolType::Gfpgan => FacetoolParameters::Gfpgan { strength },
            FacetoolType::Codeformer => FacetoolParameters::Codeformer {
                strength,
                codeformer_fidelity,
            },
        }
    }
}
