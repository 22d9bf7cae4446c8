//! Dataset adapters and class bookkeeping.

mod class_map;
mod coco_;
mod dataset_;
mod hit_uav;

pub use class_map::*;
pub use coco_::*;
pub use dataset_::*;
pub use hit_uav::*;
