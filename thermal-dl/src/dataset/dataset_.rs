use crate::{common::*, sample::Sample};

/// The dataset split a pipeline or adapter is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Split {
    Train,
    Val,
    Test,
}

impl Split {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Train => "train",
            Self::Val => "val",
            Self::Test => "test",
        }
    }
}

/// The dataset that can be random accessed.
pub trait RandomAccessDataset
where
    Self: Debug + Send,
{
    /// Get the number of samples in the dataset.
    fn num_samples(&self) -> usize;

    /// Load the nth sample. Out-of-range indices are an error, never a
    /// clamp.
    fn nth(&self, index: usize) -> Result<Sample>;
}
