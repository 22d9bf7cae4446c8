//! Per-sample transform stages.

pub mod choose_detection;
pub mod convert;
pub mod crop_image;
pub mod down_sample;
pub mod prepare;
pub mod random_flip;
pub mod sample_background;
pub mod select_crop;

pub use choose_detection::*;
pub use convert::*;
pub use crop_image::*;
pub use down_sample::*;
pub use prepare::*;
pub use random_flip::*;
pub use sample_background::*;
pub use select_crop::*;
