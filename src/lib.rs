pub mod chunks;
mod crc;
pub mod cropper;
mod error;
mod image_data;
mod png;

pub use cropper::HeightPolicy;
pub use error::{CropError, Result};
pub use png::{crop_bottom, PNG};
