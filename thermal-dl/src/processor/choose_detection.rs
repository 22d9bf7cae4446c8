//! Target selection among multi-class candidate detections.

use crate::{
    common::*,
    dataset::{ClassMap, BACKGROUND},
    pipeline::Transform,
    sample::{Sample, SampleLabel, TargetClass},
};

/// Detection choice initializer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChooseDetectionInit {
    /// Whether the background class joins the candidate classes.
    pub allow_background: bool,
    /// Seed for the owned generator. `None` draws from entropy.
    pub seed: Option<u64>,
}

impl ChooseDetectionInit {
    pub fn build(self, class_map: ClassMap) -> ChooseDetection {
        let Self {
            allow_background,
            seed,
        } = self;

        // One owned generator per stage instance; its samples share the
        // seeded sequence, and parallel workers seed independently.
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        ChooseDetection {
            allow_background,
            class_map,
            rng,
        }
    }
}

/// Uniformly picks one class present in the sample, then one detection of
/// that class. Picking background leaves the sample without a detection.
#[derive(Debug, Clone)]
pub struct ChooseDetection {
    allow_background: bool,
    class_map: ClassMap,
    rng: StdRng,
}

impl Transform for ChooseDetection {
    fn forward(&mut self, mut sample: Sample) -> Result<Sample> {
        let detections = match &sample.label {
            SampleLabel::Detections(detections) => detections,
            label => bail!(
                "detection choice expects a detections label, not {}",
                label.kind()
            ),
        };

        let mut candidates: Vec<_> = detections.classes().copied().collect();
        if self.allow_background {
            candidates.push(self.class_map.background_index());
        }
        let class = *candidates
            .choose(&mut self.rng)
            .ok_or_else(|| format_err!("the sample has no candidate class"))?;

        let name = if class == self.class_map.background_index() {
            BACKGROUND
        } else {
            self.class_map
                .name_of(class)
                .ok_or_else(|| format_err!("the class index {} is not in the class map", class))?
        };
        sample.target = Some(TargetClass {
            index: class,
            name: name.to_owned(),
        });

        let picked = detections
            .get(&class)
            .and_then(|group| group.choose(&mut self.rng))
            .cloned();
        sample.label = match picked {
            Some(detection) => SampleLabel::Detection(detection),
            None => SampleLabel::None,
        };

        Ok(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::PixelDetections;
    use bbox::{prelude::*, TLHW};
    use detection::Detection;
    use tch::{Device, Tensor};

    fn detections_sample() -> Sample {
        let detections: PixelDetections = [
            Detection {
                rect: TLHW::from_tlhw([r64(4.0), r64(4.0), r64(8.0), r64(8.0)]),
                class: 0,
            },
            Detection {
                rect: TLHW::from_tlhw([r64(20.0), r64(20.0), r64(6.0), r64(6.0)]),
                class: 1,
            },
        ]
        .into_iter()
        .collect();

        Sample::new(
            Tensor::zeros(&[3, 64, 64], (Kind::Uint8, Device::Cpu)),
            SampleLabel::Detections(detections),
        )
    }

    #[test]
    fn chosen_detection_matches_the_target_class() -> Result<()> {
        let class_map = ClassMap::new(["person", "car"])?;
        let background = class_map.background_index();
        let mut stage = ChooseDetectionInit {
            allow_background: true,
            seed: Some(3),
        }
        .build(class_map);

        for _ in 0..32 {
            let sample = stage.forward(detections_sample())?;
            let target = sample.target_class()?.clone();

            match sample.label {
                SampleLabel::Detection(detection) => assert_eq!(detection.class, target.index),
                SampleLabel::None => assert_eq!(target.index, background),
                label => panic!("unexpected label {:?}", label),
            }
        }
        Ok(())
    }

    #[test]
    fn background_is_excluded_on_request() -> Result<()> {
        let class_map = ClassMap::new(["person", "car"])?;
        let background = class_map.background_index();
        let mut stage = ChooseDetectionInit {
            allow_background: false,
            seed: Some(3),
        }
        .build(class_map);

        for _ in 0..32 {
            let sample = stage.forward(detections_sample())?;
            assert_ne!(sample.target_class()?.index, background);
            assert!(matches!(sample.label, SampleLabel::Detection(_)));
        }
        Ok(())
    }
}
