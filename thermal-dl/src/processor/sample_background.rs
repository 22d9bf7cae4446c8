//! Background label sampling.

use crate::{
    common::*,
    dataset::{ClassMap, BACKGROUND},
    pipeline::Transform,
    sample::{Sample, SampleLabel, TargetClass},
};

/// Background sampling initializer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SampleBackgroundInit {
    /// Probability of overriding the label with the background class.
    pub p: R64,
    /// Seed for the owned generator. `None` draws from entropy.
    pub seed: Option<u64>,
}

impl SampleBackgroundInit {
    pub fn build(self, class_map: ClassMap) -> Result<SampleBackground> {
        let Self { p, seed } = self;
        ensure!(
            (0.0..=1.0).contains(&p.raw()),
            "p must be between 0.0 and 1.0"
        );

        // One owned generator per stage instance; its samples share the
        // seeded sequence, and parallel workers seed independently.
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(SampleBackground {
            p: p.raw(),
            class_map,
            rng,
        })
    }
}

/// Rewrites a detection label to the background class with a fixed
/// probability.
#[derive(Debug, Clone)]
pub struct SampleBackground {
    p: f64,
    class_map: ClassMap,
    rng: StdRng,
}

impl Transform for SampleBackground {
    fn forward(&mut self, mut sample: Sample) -> Result<Sample> {
        let detection = match &sample.label {
            SampleLabel::Detection(detection) => detection,
            label => bail!(
                "background sampling expects a detection label, not {}",
                label.kind()
            ),
        };

        if self.rng.gen_bool(self.p) {
            sample.target = Some(TargetClass {
                index: self.class_map.background_index(),
                name: BACKGROUND.to_owned(),
            });
            sample.label = SampleLabel::None;
        } else {
            let name = self.class_map.name_of(detection.class).ok_or_else(|| {
                format_err!("the class index {} is not in the class map", detection.class)
            })?;
            sample.target = Some(TargetClass {
                index: detection.class,
                name: name.to_owned(),
            });
        }

        Ok(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bbox::{prelude::*, TLHW};
    use detection::Detection;
    use tch::{Device, Tensor};

    fn detection_sample() -> Sample {
        Sample::new(
            Tensor::zeros(&[3, 64, 64], (Kind::Uint8, Device::Cpu)),
            SampleLabel::Detection(Detection {
                rect: TLHW::from_tlhw([r64(8.0), r64(8.0), r64(16.0), r64(16.0)]),
                class: 1,
            }),
        )
    }

    #[test]
    fn p_zero_keeps_the_detection() -> Result<()> {
        let class_map = ClassMap::new(["person", "car"])?;
        let mut stage = SampleBackgroundInit {
            p: r64(0.0),
            seed: Some(0),
        }
        .build(class_map)?;

        let sample = stage.forward(detection_sample())?;
        assert_eq!(sample.target_class()?.index, 1);
        assert_eq!(sample.target_class()?.name, "car");
        assert!(matches!(sample.label, SampleLabel::Detection(_)));
        Ok(())
    }

    #[test]
    fn p_one_always_samples_background() -> Result<()> {
        let class_map = ClassMap::new(["person", "car"])?;
        let background = class_map.background_index();
        let mut stage = SampleBackgroundInit {
            p: r64(1.0),
            seed: Some(0),
        }
        .build(class_map)?;

        let sample = stage.forward(detection_sample())?;
        assert_eq!(sample.target_class()?.index, background);
        assert_eq!(sample.label, SampleLabel::None);
        Ok(())
    }

    #[test]
    fn class_label_is_rejected() -> Result<()> {
        let class_map = ClassMap::new(["person"])?;
        let mut stage = SampleBackgroundInit {
            p: r64(0.5),
            seed: Some(0),
        }
        .build(class_map)?;

        let sample = Sample::new(
            Tensor::zeros(&[3, 64, 64], (Kind::Uint8, Device::Cpu)),
            SampleLabel::Class(0),
        );
        assert!(stage.forward(sample).is_err());
        Ok(())
    }
}
