use serde::{Deserialize, Serialize};

use super::generation::FacetoolType;

/// Second positional argument of `runPostprocessing`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PostprocessingRequest {
    /// `upscale` is `[level, denoising, strength]`.
    Esrgan { upscale: (u32, f64, f64) },
    Gfpgan { facetool_strength: f64 },
    Codeformer {
        facetool_strength: f64,
        codeformer_fidelity: f64,
    },
}

impl PostprocessingRequest {
    pub fn upscale(level: u32, denoising: f64, strength: f64) -> Self {
        PostprocessingRequest::Esrgan {
            upscale: (level, denoising, strength),
        }
    }

    pub fn facetool(kind: FacetoolType, strength: f64, codeformer_fidelity: f64) -> Self {
        match kind {
            FacetoolType::Gfpgan => PostprocessingRequest::Gfpgan {
                facetool_strength: strength,
            },
            FacetoolType::Codeformer => PostprocessingRequest::Codeformer {
                facetool_strength: strength,
                codeformer_fidelity,
            },
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            PostprocessingRequest::Esrgan { .. } => "esrgan",
            PostprocessingRequest::Gfpgan { .. } => FacetoolType::Gfpgan.as_str(),
            PostprocessingRequest::Codeformer { .. } => FacetoolType::Codeformer.as_str(),
        }
    }
}
