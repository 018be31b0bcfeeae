use serde::{Deserialize, Serialize};

use crate::models::BoundingBox;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundingBoxScaleMethod {
    None,
    #[default]
    Auto,
    Manual,
}

/// Unified canvas slice. The presentation layer renders the bounding-box
/// region of the base and mask layers to PNG before a request fires; this
/// layer only forwards those bytes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasState {
    pub bounding_box_coordinates: Coordinates,
    pub bounding_box_dimensions: Dimensions,
    pub bounding_box_scale_method: BoundingBoxScaleMethod,
    pub scaled_bounding_box_dimensions: Dimensions,
    pub is_mask_enabled: bool,
    pub should_preserve_masked_area: bool,
    #[serde(skip)]
    pub base_layer_png: Option<Vec<u8>>,
    #[serde(skip)]
    pub mask_layer_png: Option<Vec<u8>>,
}

impl CanvasState {
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox {
            x: self.bounding_box_coordinates.x,
            y: self.bounding_box_coordinates.y,
            width: self.bounding_box_dimensions.width,
            height: self.bounding_box_dimensions.height,
        }
    }
}
