mod config;

use anyhow::{Context, Result};
use bbox::prelude::*;
use config::Config;
use log::info;
use std::path::PathBuf;
use structopt::StructOpt;
use thermal_dl::{
    dataset::{ClassMap, HitUavDataset, RandomAccessDataset, Split},
    PipelineInit, SampleLabel,
};

#[derive(Debug, Clone, StructOpt)]
/// Preview cropped classifier samples
struct Args {
    #[structopt(long, default_value = "preview.json5")]
    /// configuration file
    pub config_file: PathBuf,
    #[structopt(long, default_value = "16")]
    /// number of samples to preview
    pub count: usize,
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    let Args { config_file, count } = Args::from_args();
    let config = Config::open(&config_file)
        .with_context(|| format!("failed to load config file '{}'", config_file.display()))?;

    let class_map = ClassMap::new(&config.dataset.classes)?;
    let dataset = HitUavDataset::load(&config.dataset.root_dir, config.dataset.split, &class_map)?;
    info!(
        "split '{}' has {} annotations",
        config.dataset.split.as_str(),
        dataset.num_samples()
    );

    let init = PipelineInit {
        background_prob: config.pipeline.background_prob,
        area_scale: config.pipeline.area_scale,
        ratio: config.pipeline.ratio,
        down_scale_factor: config.pipeline.down_scale_factor,
        flip_prob: config.pipeline.flip_prob,
    };
    let mut pipeline = match config.dataset.split {
        Split::Train => init.train(&class_map)?,
        Split::Val | Split::Test => init.eval(&class_map)?,
    };

    let mut histogram = vec![0usize; class_map.len()];
    for index in 0..count.min(dataset.num_samples()) {
        let sample = pipeline.forward(dataset.nth(index)?)?;
        let crop = sample.crop_window()?;

        if let SampleLabel::Class(class) = sample.label {
            histogram[class as usize] += 1;
        }
        info!(
            "sample {}: class '{}' from a {}x{} crop",
            index,
            sample.target_class()?.name,
            crop.h(),
            crop.w()
        );
    }

    for (name, index) in class_map.iter() {
        info!("{:>12}: {}", name, histogram[index]);
    }

    Ok(())
}
