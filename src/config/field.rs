use std::fmt;
use std::str::FromStr;

/// Scalar field of a [`ConfigurationDocument`](super::ConfigurationDocument)
/// that `set_field` can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentField {
    OptimizerType,
    LossFunction,
    LearningRate,
    BatchSize,
    NumEpochs,
    Device,
    Augmentations,
}

impl DocumentField {
    pub const ALL: [DocumentField; 7] = [
        DocumentField::OptimizerType,
        DocumentField::LossFunction,
        DocumentField::LearningRate,
        DocumentField::BatchSize,
        DocumentField::NumEpochs,
        DocumentField::Device,
        DocumentField::Augmentations,
    ];

    /// Key in the exported document.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentField::OptimizerType => "optimizer_type",
            DocumentField::LossFunction => "loss_function",
            DocumentField::LearningRate => "learning_rate",
            DocumentField::BatchSize => "batch_size",
            DocumentField::NumEpochs => "num_epochs",
            DocumentField::Device => "device",
            DocumentField::Augmentations => "augmentations",
        }
    }

    fn camel_case(&self) -> &'static str {
        match self {
            DocumentField::OptimizerType => "optimizerType",
            DocumentField::LossFunction => "lossFunction",
            DocumentField::LearningRate => "learningRate",
            DocumentField::BatchSize => "batchSize",
            DocumentField::NumEpochs => "numEpochs",
            DocumentField::Device => "device",
            DocumentField::Augmentations => "augmentations",
        }
    }
}

impl FromStr for DocumentField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        DocumentField::ALL
            .into_iter()
            .find(|f| f.as_str() == s || f.camel_case() == s)
            .ok_or_else(|| format!("unknown configuration field '{s}'"))
    }
}

impl fmt::Display for DocumentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
