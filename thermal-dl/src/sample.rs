//! The sample unit flowing through transform pipelines.

use crate::common::*;
use bbox::{HW, TLBR, TLHW};
use detection::{Detection, Detections};

pub type PixelDetection = Detection<TLHW<R64>, usize>;
pub type PixelDetections = Detections<TLHW<R64>, usize>;

/// The label attached to a sample, one explicit variant per accepted shape.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleLabel {
    /// Final integer class index.
    Class(i64),
    /// A single target detection.
    Detection(PixelDetection),
    /// Candidate detections grouped by class.
    Detections(PixelDetections),
    /// No target; a background sample.
    None,
}

impl SampleLabel {
    /// Variant name used in stage mismatch reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Class(_) => "class",
            Self::Detection(_) => "detection",
            Self::Detections(_) => "detections",
            Self::None => "none",
        }
    }
}

/// The class a sample was resolved to by label sampling.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetClass {
    pub index: usize,
    pub name: String,
}

/// One image with its label and the products of the stages that ran so far.
///
/// Stage products start as `None`; the accessors fail fast when a stage runs
/// before its inputs were produced. The products live for one pipeline pass
/// over one sample.
#[derive(Debug)]
pub struct Sample {
    /// Pixels in channels x height x width layout.
    pub image: Tensor,
    pub label: SampleLabel,
    /// Image extent, recorded by the shape stage.
    pub shape: Option<HW<i64>>,
    /// Resolved target class, recorded by label sampling.
    pub target: Option<TargetClass>,
    /// Corner-form crop window, recorded by crop selection.
    pub crop: Option<TLBR<i64>>,
}

impl Sample {
    pub fn new(image: Tensor, label: SampleLabel) -> Self {
        Self {
            image,
            label,
            shape: None,
            target: None,
            crop: None,
        }
    }

    /// Preset the crop window, e.g. for inference on a known detection.
    pub fn with_crop(mut self, crop: TLBR<i64>) -> Self {
        self.crop = Some(crop);
        self
    }

    pub fn image_shape(&self) -> Result<&HW<i64>> {
        self.shape
            .as_ref()
            .ok_or_else(|| format_err!("the sample shape is not recorded yet"))
    }

    pub fn target_class(&self) -> Result<&TargetClass> {
        self.target
            .as_ref()
            .ok_or_else(|| format_err!("the sample target class is not resolved yet"))
    }

    pub fn crop_window(&self) -> Result<&TLBR<i64>> {
        self.crop
            .as_ref()
            .ok_or_else(|| format_err!("the sample crop window is not selected yet"))
    }
}
