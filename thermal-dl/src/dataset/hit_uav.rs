use super::{ClassMap, CocoInstances, RandomAccessDataset, Split};
use crate::{
    common::*,
    sample::{Sample, SampleLabel},
};
use bbox::{prelude::*, TLHW};
use detection::Detection;
use tch::vision;

/// The HIT-UAV thermal dataset, one sample per annotation.
#[derive(Debug)]
pub struct HitUavDataset {
    records: Vec<AnnotationRecord>,
}

/// An annotation with its image path, but without image pixels.
#[derive(Debug, Clone, PartialEq)]
struct AnnotationRecord {
    path: PathBuf,
    /// Bounding box in pixel units.
    bbox: TLHW<R64>,
    class: usize,
}

impl HitUavDataset {
    /// Load one split from the `<root>/hit-uav` layout, keeping only
    /// annotations whose category names a class of interest.
    pub fn load<P>(root_dir: P, split: Split, class_map: &ClassMap) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let dataset_dir = root_dir.as_ref().join("hit-uav");
        let instances = CocoInstances::open(dataset_dir.join(format!("{}.json", split.as_str())))?;

        let category_map = class_map.remap_categories(
            instances
                .categories
                .iter()
                .map(|category| (category.id, category.name.as_str())),
        );
        if category_map.is_empty() {
            warn!(
                "no category of split '{}' names a class of interest",
                split.as_str()
            );
        }

        let images: HashMap<_, _> = instances
            .images
            .iter()
            .map(|image| (image.id, image))
            .collect();

        let records: Vec<_> = instances
            .annotations
            .iter()
            .filter_map(|ann| {
                let class = *category_map.get(&ann.category_id)?;
                Some((ann, class))
            })
            .map(|(ann, class)| -> Result<_> {
                let image = images.get(&ann.image_id).ok_or_else(|| {
                    format_err!(
                        "annotation {} references the unknown image id {}",
                        ann.id,
                        ann.image_id
                    )
                })?;
                let [l, t, w, h] = ann.bbox;
                let bbox = TLHW::try_from_tlhw([r64(t), r64(l), r64(h), r64(w)])?;

                Ok(AnnotationRecord {
                    path: dataset_dir.join(&image.file_name),
                    bbox,
                    class,
                })
            })
            .try_collect()?;

        info!(
            "loaded {} of {} annotations from split '{}'",
            records.len(),
            instances.annotations.len(),
            split.as_str()
        );

        Ok(Self { records })
    }
}

impl RandomAccessDataset for HitUavDataset {
    fn num_samples(&self) -> usize {
        self.records.len()
    }

    fn nth(&self, index: usize) -> Result<Sample> {
        ensure!(
            index < self.records.len(),
            "the index {} is out of dataset range, len == {}",
            index,
            self.records.len()
        );

        let AnnotationRecord { path, bbox, class } = &self.records[index];
        let image = vision::image::load(path)
            .with_context(|| format!("failed to load image '{}'", path.display()))?;

        let detection = Detection {
            rect: bbox.clone(),
            class: *class,
        };
        Ok(Sample::new(image, SampleLabel::Detection(detection)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_stub_split(dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir.join("hit-uav"))?;
        let text = r#"{
            "images": [
                {"id": 0, "file_name": "frame_0.png", "height": 512, "width": 640},
                {"id": 1, "file_name": "frame_1.png", "height": 512, "width": 640}
            ],
            "annotations": [
                {"id": 0, "image_id": 0, "category_id": 0, "bbox": [10.0, 20.0, 30.0, 40.0]},
                {"id": 1, "image_id": 0, "category_id": 5, "bbox": [5.0, 5.0, 8.0, 8.0]},
                {"id": 2, "image_id": 1, "category_id": 1, "bbox": [100.0, 50.0, 25.0, 25.0]}
            ],
            "categories": [
                {"id": 0, "name": "Person"},
                {"id": 1, "name": "Car"},
                {"id": 5, "name": "DontCare"}
            ]
        }"#;
        std::fs::write(dir.join("hit-uav").join("val.json"), text)?;
        Ok(())
    }

    #[test]
    fn load_filters_unwanted_categories() -> Result<()> {
        let dir = std::env::temp_dir().join("thermal-dl-test-hit-uav-filter");
        write_stub_split(&dir)?;

        let class_map = ClassMap::new(["person", "car"])?;
        let dataset = HitUavDataset::load(&dir, Split::Val, &class_map)?;
        assert_eq!(dataset.num_samples(), 2);
        Ok(())
    }

    #[test]
    fn nth_fails_fast_out_of_range() -> Result<()> {
        let dir = std::env::temp_dir().join("thermal-dl-test-hit-uav-range");
        write_stub_split(&dir)?;

        let class_map = ClassMap::new(["person", "car"])?;
        let dataset = HitUavDataset::load(&dir, Split::Val, &class_map)?;
        assert!(dataset.nth(dataset.num_samples()).is_err());
        Ok(())
    }
}
