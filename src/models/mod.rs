pub mod generation;
pub mod image;
pub mod model_management;
pub mod postprocessing;

pub use generation::*;
pub use image::*;
pub use model_management::*;
pub use postprocessing::*;
