//! Image down-scaling.

use crate::{
    common::*,
    pipeline::Transform,
    sample::{Sample, SampleLabel},
};
use bbox::prelude::*;

/// Down-scale initializer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DownSampleImageInit {
    /// Linear scale factor applied to both image dimensions.
    pub factor: R64,
}

impl DownSampleImageInit {
    pub fn build(self) -> Result<DownSampleImage> {
        let Self { factor } = self;
        ensure!(
            factor > 0.0 && factor <= 1.0,
            "the down-scale factor must be in range 0.0..1.0"
        );

        Ok(DownSampleImage {
            factor: factor.raw(),
        })
    }
}

/// Resizes the image by a linear factor and rescales a detection label's
/// box area by its square.
#[derive(Debug, Clone)]
pub struct DownSampleImage {
    factor: f64,
}

impl Transform for DownSampleImage {
    fn forward(&mut self, mut sample: Sample) -> Result<Sample> {
        let (channels, height, width) = sample.image.size3()?;
        let new_h = (height as f64 * self.factor) as i64;
        let new_w = (width as f64 * self.factor) as i64;
        ensure!(
            new_h > 0 && new_w > 0,
            "the down-scale factor {} collapses the {}x{} image",
            self.factor,
            height,
            width
        );

        sample.image = tch::no_grad(|| {
            sample
                .image
                .view([1, channels, height, width])
                .upsample_bilinear2d(&[new_h, new_w], false, None, None)
                .view([channels, new_h, new_w])
        });

        if let SampleLabel::Detection(detection) = &mut sample.label {
            // the image scales by a linear factor, the box area by its
            // square
            detection.rect = detection.rect.scale_area(r64(self.factor * self.factor));
        }

        Ok(sample)
    }
}
