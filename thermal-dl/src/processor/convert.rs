//! Tensor conversion and bookkeeping stages.

use crate::{
    common::*,
    pipeline::Transform,
    sample::{Sample, SampleLabel},
};
use bbox::{prelude::*, HW, TLBR};

/// Converts u8 pixels to f32 in `0..1`.
#[derive(Debug, Clone)]
pub struct ToTensor;

impl Transform for ToTensor {
    fn forward(&mut self, mut sample: Sample) -> Result<Sample> {
        sample.image = tch::no_grad(|| sample.image.to_kind(Kind::Float).g_div1(255.0));
        Ok(sample)
    }
}

/// Records the image height and width for the later stages.
#[derive(Debug, Clone)]
pub struct AddShape;

impl Transform for AddShape {
    fn forward(&mut self, mut sample: Sample) -> Result<Sample> {
        let (_channels, height, width) = sample
            .image
            .size3()
            .with_context(|| "image must have shape [channels, height, width]")?;
        sample.shape = Some(HW::from_hw([height, width]));
        Ok(sample)
    }
}

/// Fills the crop window with the full frame when the caller did not set
/// one.
#[derive(Debug, Clone)]
pub struct FullFrameCrop;

impl Transform for FullFrameCrop {
    fn forward(&mut self, mut sample: Sample) -> Result<Sample> {
        if sample.crop.is_none() {
            let shape = sample.image_shape()?;
            sample.crop = Some(TLBR::from_tlhw([0, 0, shape.h(), shape.w()]));
        }
        Ok(sample)
    }
}

/// Replaces the label with the resolved target class index.
#[derive(Debug, Clone)]
pub struct DetectionToClassification;

impl Transform for DetectionToClassification {
    fn forward(&mut self, mut sample: Sample) -> Result<Sample> {
        let index = sample.target_class()?.index;
        sample.label = SampleLabel::Class(index as i64);
        Ok(sample)
    }
}
