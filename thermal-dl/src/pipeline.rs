//! Transform pipeline composition.

use crate::{
    common::*,
    dataset::{ClassMap, Split},
    processor::{
        AddShape, CropImage, DetectionToClassification, DownSampleImageInit, FullFrameCrop,
        PrepareToClassifier, RandomHorizontalFlipInit, SampleBackgroundInit,
        SelectCropCoordinatesInit, ToTensor,
    },
    sample::Sample,
};

/// The fixed evaluation seed.
const EVAL_SEED: u64 = 42;

/// A per-sample transform stage.
pub trait Transform
where
    Self: Debug + Send,
{
    /// Apply the stage to one sample.
    fn forward(&mut self, sample: Sample) -> Result<Sample>;
}

/// Runs stages strictly in declared order. Products recorded on the sample
/// by one stage are visible to every later stage.
#[derive(Debug)]
pub struct Compose {
    stages: Vec<Box<dyn Transform>>,
}

impl Compose {
    pub fn new(stages: Vec<Box<dyn Transform>>) -> Self {
        Self { stages }
    }

    pub fn forward(&mut self, sample: Sample) -> Result<Sample> {
        self.stages
            .iter_mut()
            .try_fold(sample, |sample, stage| stage.forward(sample))
    }
}

/// Options shared by the train and eval chains.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineInit {
    /// Probability of sampling a background patch.
    pub background_prob: R64,
    /// Crop area multiplier range.
    pub area_scale: (R64, R64),
    /// Crop aspect ratio range.
    pub ratio: (R64, R64),
    /// Optional linear down-scale factor applied before cropping.
    pub down_scale_factor: Option<R64>,
    /// Horizontal flip probability in the training chain.
    pub flip_prob: R64,
}

impl Default for PipelineInit {
    fn default() -> Self {
        Self {
            background_prob: r64(0.2),
            area_scale: (r64(0.5), r64(2.0)),
            ratio: (r64(1.0), r64(1.5)),
            down_scale_factor: None,
            flip_prob: r64(0.5),
        }
    }
}

impl PipelineInit {
    /// The free-running training chain.
    pub fn train(self, class_map: &ClassMap) -> Result<Compose> {
        self.build(class_map, None, true)
    }

    /// The evaluation chain: label sampling and crop selection are seeded,
    /// the flip stage is omitted.
    ///
    /// Determinism holds per pipeline instance. Parallel workers each own
    /// an independently seeded generator and do not reproduce a single
    /// global draw sequence.
    pub fn eval(self, class_map: &ClassMap) -> Result<Compose> {
        self.build(class_map, Some(EVAL_SEED), false)
    }

    fn build(self, class_map: &ClassMap, seed: Option<u64>, flip: bool) -> Result<Compose> {
        let Self {
            background_prob,
            area_scale,
            ratio,
            down_scale_factor,
            flip_prob,
        } = self;

        let mut stages: Vec<Box<dyn Transform>> = vec![
            Box::new(ToTensor),
            Box::new(
                SampleBackgroundInit {
                    p: background_prob,
                    seed,
                }
                .build(class_map.clone())?,
            ),
        ];
        if let Some(factor) = down_scale_factor {
            stages.push(Box::new(DownSampleImageInit { factor }.build()?));
        }
        stages.push(Box::new(AddShape));
        stages.push(Box::new(
            SelectCropCoordinatesInit {
                area_scale,
                ratio,
                seed,
            }
            .build()?,
        ));
        stages.push(Box::new(CropImage));
        if flip {
            stages.push(Box::new(
                RandomHorizontalFlipInit {
                    p: flip_prob,
                    seed: None,
                }
                .build()?,
            ));
        }
        stages.push(Box::new(PrepareToClassifier));
        stages.push(Box::new(DetectionToClassification));

        Ok(Compose::new(stages))
    }
}

/// The transform chain used with the HIT-UAV dataset.
pub fn hit_uav_transforms(split: Split, class_map: &ClassMap) -> Result<Compose> {
    let init = PipelineInit {
        background_prob: r64(0.2),
        ..Default::default()
    };

    match split {
        Split::Train => init.train(class_map),
        Split::Val | Split::Test => init.eval(class_map),
    }
}

/// The chain for frames without ground truth. The caller presets the crop
/// window per sample — the detection to classify — or the full frame is
/// used.
pub fn inference_pipeline() -> Compose {
    Compose::new(vec![
        Box::new(ToTensor),
        Box::new(AddShape),
        Box::new(FullFrameCrop),
        Box::new(CropImage),
        Box::new(PrepareToClassifier),
    ])
}
