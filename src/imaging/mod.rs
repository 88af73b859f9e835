//! Image preprocessing for the structure recognition model.

pub mod decode;
pub mod normalize;

pub use decode::load_image;
pub use normalize::{normalize_dynamic, normalize_image, TARGET_SIZE};
