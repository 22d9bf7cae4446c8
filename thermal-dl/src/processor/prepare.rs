//! Classifier input preparation.

use crate::{common::*, pipeline::Transform, sample::Sample};

/// Channel statistics of the ImageNet-pretrained backbone.
const MEAN: [f64; 3] = [0.485, 0.456, 0.406];
const STD: [f64; 3] = [0.229, 0.224, 0.225];

/// Classifier input side in pixels.
const INPUT_SIZE: i64 = 224;

/// Resizes the cropped patch to the classifier input and normalizes the
/// channels.
#[derive(Debug, Clone)]
pub struct PrepareToClassifier;

impl Transform for PrepareToClassifier {
    fn forward(&mut self, mut sample: Sample) -> Result<Sample> {
        let (channels, height, width) = sample.image.size3()?;
        ensure!(channels == 3, "channel size must be 3, but get {}", channels);
        ensure!(
            height > 0 && width > 0,
            "cannot prepare an empty {}x{} crop",
            height,
            width
        );

        sample.image = tch::no_grad(|| {
            let resized = sample
                .image
                .view([1, channels, height, width])
                .upsample_bilinear2d(&[INPUT_SIZE, INPUT_SIZE], false, None, None)
                .view([channels, INPUT_SIZE, INPUT_SIZE]);

            let mean = Tensor::of_slice(&MEAN).view([3, 1, 1]).to_kind(Kind::Float);
            let std = Tensor::of_slice(&STD).view([3, 1, 1]).to_kind(Kind::Float);
            (resized - mean) / std
        });

        Ok(sample)
    }
}
