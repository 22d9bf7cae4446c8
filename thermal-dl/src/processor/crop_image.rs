//! Crop application by tensor slicing.

use crate::{common::*, pipeline::Transform, sample::Sample};
use bbox::prelude::*;

/// Applies the recorded corner-form crop window to the image.
#[derive(Debug, Clone)]
pub struct CropImage;

impl Transform for CropImage {
    fn forward(&mut self, mut sample: Sample) -> Result<Sample> {
        let [t, l, b, r] = sample.crop_window()?.tlbr();
        let (_channels, height, width) = sample.image.size3()?;
        ensure!(
            0 <= t && b <= height && 0 <= l && r <= width,
            "the crop window [{}, {}, {}, {}] exceeds the {}x{} image",
            t,
            l,
            b,
            r,
            height,
            width
        );

        sample.image = tch::no_grad(|| sample.image.i((.., t..b, l..r)));
        Ok(sample)
    }
}
