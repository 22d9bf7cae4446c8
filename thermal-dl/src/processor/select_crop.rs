//! The constrained random crop selection algorithm.

use crate::{
    common::*,
    pipeline::Transform,
    sample::{Sample, SampleLabel},
};
use bbox::{prelude::*, TLBR, TLHW};

/// Minimum crop side in pixels for background sampling. The
/// detection-anchored path carries no floor, so a degenerate detection can
/// produce an empty window.
const MIN_BACKGROUND_CROP_SIZE: i64 = 10;

/// Crop selection initializer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SelectCropCoordinatesInit {
    /// Range of the area multiplier applied to the anchor area.
    pub area_scale: (R64, R64),
    /// Range of the width over height aspect ratio.
    pub ratio: (R64, R64),
    /// Seed for the owned generator. `None` draws from entropy.
    pub seed: Option<u64>,
}

impl SelectCropCoordinatesInit {
    pub fn build(self) -> Result<SelectCropCoordinates> {
        let Self {
            area_scale,
            ratio,
            seed,
        } = self;

        let (scale_lo, scale_hi) = area_scale;
        ensure!(
            scale_lo >= 0.0 && scale_lo <= scale_hi,
            "area_scale must be a non-negative non-empty range"
        );
        let (ratio_lo, ratio_hi) = ratio;
        ensure!(
            ratio_lo > 0.0 && ratio_lo <= ratio_hi,
            "ratio must be a positive non-empty range"
        );

        // The generator is owned by this stage instance. A seeded instance
        // replays one shared sequence over all of its samples; parallel
        // workers seed independently and do not form a single global
        // sequence.
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(SelectCropCoordinates {
            area_scale: (scale_lo.raw(), scale_hi.raw()),
            ratio: (ratio_lo.raw(), ratio_hi.raw()),
            rng,
        })
    }
}

/// Selects a crop window geometrically consistent with the sample's target
/// detection, or anywhere inside the frame for background samples.
#[derive(Debug, Clone)]
pub struct SelectCropCoordinates {
    area_scale: (f64, f64),
    ratio: (f64, f64),
    rng: StdRng,
}

impl SelectCropCoordinates {
    /// Sample a crop window inside the `image_hw` extent. With an anchor
    /// the window either fully covers or lies fully inside the anchor,
    /// whichever its drawn dimensions allow; without one it lands anywhere
    /// in the frame.
    pub fn sample_window(&mut self, image_hw: [i64; 2], anchor: Option<&TLHW<i64>>) -> TLBR<i64> {
        let [image_h, image_w] = image_hw;

        let [crop_h, crop_w] = match anchor {
            None => {
                let [h, w] = self.generate_crop_dimensions((image_h * image_w) as f64, image_hw);
                [
                    h.max(cmp::min(MIN_BACKGROUND_CROP_SIZE, image_h)),
                    w.max(cmp::min(MIN_BACKGROUND_CROP_SIZE, image_w)),
                ]
            }
            Some(anchor) => self.generate_crop_dimensions(anchor.area() as f64, image_hw),
        };

        let x0 = self.sample_axis(crop_w, image_w, anchor.map(|rect| (rect.l(), rect.w())));
        let y0 = self.sample_axis(crop_h, image_h, anchor.map(|rect| (rect.t(), rect.h())));

        TLBR::from_tlhw([y0, x0, crop_h, crop_w])
    }

    /// Draw crop dimensions around the anchor `area`, clamped into the
    /// image extent. The only place randomness enters the crop size.
    fn generate_crop_dimensions(&mut self, area: f64, image_hw: [i64; 2]) -> [i64; 2] {
        let [image_h, image_w] = image_hw;
        let (scale_lo, scale_hi) = self.area_scale;
        let (ratio_lo, ratio_hi) = self.ratio;

        let area = area * self.rng.gen_range(scale_lo..=scale_hi);
        let ratio = self.rng.gen_range(ratio_lo..=ratio_hi);
        let w = (area * ratio).sqrt() as i64;
        let h = (area / ratio).sqrt() as i64;

        [cmp::min(h, image_h), cmp::min(w, image_w)]
    }

    /// Sample one axis origin from the geometrically valid interval.
    ///
    /// `anchor` is the detection's `(origin, extent)` on this axis. The
    /// interval is clipped into `[0, image_extent - crop_extent]`; a
    /// collapsed interval fixes the origin without drawing.
    fn sample_axis(&mut self, crop_extent: i64, image_extent: i64, anchor: Option<(i64, i64)>) -> i64 {
        let max_origin = image_extent - crop_extent;

        let (low, high) = match anchor {
            None => (0, max_origin),
            Some((origin, extent)) => {
                let (low, high) = if crop_extent >= extent {
                    // every placement that fully covers the detection
                    (origin - (crop_extent - extent), origin)
                } else {
                    // every placement that lies fully inside the detection
                    (origin, origin + (extent - crop_extent))
                };
                (low.clamp(0, max_origin), high.clamp(0, max_origin))
            }
        };

        if low < high {
            self.rng.gen_range(low..=high)
        } else {
            // collapsed or inverted after clipping: fix to the boundary
            cmp::min(low, high)
        }
    }
}

impl Transform for SelectCropCoordinates {
    fn forward(&mut self, mut sample: Sample) -> Result<Sample> {
        let shape = sample.image_shape()?;
        let image_hw = shape.hw();

        let window = match &sample.label {
            SampleLabel::None => self.sample_window(image_hw, None),
            SampleLabel::Detection(detection) => {
                let anchor = detection.rect.clone().cast::<i64>();
                self.sample_window(image_hw, Some(&anchor))
            }
            label => bail!("crop selection cannot handle a {} label", label.kind()),
        };

        sample.crop = Some(window);
        Ok(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(area_scale: (f64, f64), ratio: (f64, f64), seed: u64) -> SelectCropCoordinates {
        SelectCropCoordinatesInit {
            area_scale: (r64(area_scale.0), r64(area_scale.1)),
            ratio: (r64(ratio.0), r64(ratio.1)),
            seed: Some(seed),
        }
        .build()
        .unwrap()
    }

    #[test]
    fn matching_crop_and_detection_collapse_the_range() {
        let mut sampler = fixed((1.0, 1.0), (1.0, 1.0), 0);
        let anchor = TLHW::from_tlhw([40i64, 40, 20, 20]);

        for _ in 0..16 {
            let window = sampler.sample_window([100, 100], Some(&anchor));
            assert_eq!(window.tlbr(), [40, 40, 60, 60]);
        }
    }

    #[test]
    fn full_frame_background_crop_is_fixed_at_origin() {
        let mut sampler = fixed((1.0, 1.0), (1.0, 1.0), 0);

        for _ in 0..16 {
            let window = sampler.sample_window([100, 100], None);
            assert_eq!(window.tlbr(), [0, 0, 100, 100]);
        }
    }

    #[test]
    fn small_crop_stays_inside_the_detection() {
        // area 2500 scaled by 0.04 gives a 10 x 10 crop
        let mut sampler = fixed((0.04, 0.04), (1.0, 1.0), 7);
        let anchor = TLHW::from_tlhw([10i64, 10, 50, 50]);

        for _ in 0..100 {
            let window = sampler.sample_window([100, 100], Some(&anchor));
            let [t, l, b, r] = window.tlbr();
            assert_eq!(window.h(), 10);
            assert_eq!(window.w(), 10);
            assert!((10..=50).contains(&l) && r <= 60);
            assert!((10..=50).contains(&t) && b <= 60);
        }
    }

    #[test]
    fn large_crop_contains_the_detection() {
        let mut sampler = fixed((1.0, 4.0), (1.0, 1.0), 11);
        let anchor = TLHW::from_tlhw([100i64, 120, 20, 20]);

        for _ in 0..100 {
            let window = sampler.sample_window([512, 640], Some(&anchor));
            assert!(window.t() <= anchor.t() && window.b() >= anchor.b());
            assert!(window.l() <= anchor.l() && window.r() >= anchor.r());
        }
    }

    #[test]
    fn windows_never_exceed_image_bounds() {
        let mut sampler = fixed((0.5, 2.0), (1.0, 1.5), 13);
        let mut rng = StdRng::seed_from_u64(17);

        for _ in 0..200 {
            let image_h = rng.gen_range(32i64..=256);
            let image_w = rng.gen_range(32i64..=256);
            let anchor = if rng.gen_bool(0.5) {
                let h = rng.gen_range(4..=image_h);
                let w = rng.gen_range(4..=image_w);
                let t = rng.gen_range(0..=image_h - h);
                let l = rng.gen_range(0..=image_w - w);
                Some(TLHW::from_tlhw([t, l, h, w]))
            } else {
                None
            };

            let window = sampler.sample_window([image_h, image_w], anchor.as_ref());
            let [t, l, b, r] = window.tlbr();
            assert!(0 <= t && t <= b && b <= image_h);
            assert!(0 <= l && l <= r && r <= image_w);
        }
    }

    #[test]
    fn background_crops_respect_the_size_floor() {
        let mut sampler = fixed((0.0, 0.001), (1.0, 1.0), 19);

        for _ in 0..50 {
            let window = sampler.sample_window([200, 200], None);
            assert!(window.h() >= 10);
            assert!(window.w() >= 10);
        }
    }

    #[test]
    fn detection_anchored_crops_carry_no_size_floor() {
        let mut sampler = fixed((1.0, 1.0), (1.0, 1.0), 23);
        let anchor = TLHW::from_tlhw([50i64, 50, 2, 2]);

        let window = sampler.sample_window([100, 100], Some(&anchor));
        assert_eq!(window.h(), 2);
        assert_eq!(window.w(), 2);
    }

    #[test]
    fn seeded_samplers_replay_identically() {
        let mut first = fixed((0.5, 2.0), (1.0, 1.5), 42);
        let mut second = fixed((0.5, 2.0), (1.0, 1.5), 42);
        let anchor = TLHW::from_tlhw([30i64, 60, 40, 24]);

        for _ in 0..32 {
            assert_eq!(
                first.sample_window([256, 320], Some(&anchor)),
                second.sample_window([256, 320], Some(&anchor)),
            );
        }
    }
}
