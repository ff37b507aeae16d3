use serde::{Serialize, Deserialize};
use std::collections::BTreeSet;
use std::num::IntErrorKind;

use crate::config::field::DocumentField;
use crate::config::hyperparams::{Augmentation, Device, Optimizer};
use crate::defaults::{
    DEFAULT_BATCH_SIZE, DEFAULT_EPOCHS, DEFAULT_LEARNING_RATE, DEFAULT_LOSS_FUNCTION,
    LEARNING_RATE_LOG10_MAX, LEARNING_RATE_LOG10_MIN, MAX_BATCH_SIZE, MIN_BATCH_SIZE, MIN_EPOCHS,
};
use crate::error::{ConfigError, Result};
use crate::sequence::sequence::LayerSequence;

fn default_loss_function() -> String {
    DEFAULT_LOSS_FUNCTION.to_owned()
}

/// One model's complete configuration: its layer sequence plus the training
/// hyperparameters handed to the training backend.
///
/// The serde representation is the exported document format:
///
/// ```json
/// {
///   "layers": [{"layer_type": "activation", "function": "relu"}],
///   "optimizer_type": "adam",
///   "loss_function": "cross_entropy",
///   "learning_rate": 0.001,
///   "batch_size": 32,
///   "num_epochs": 10,
///   "device": "cuda",
///   "augmentations": []
/// }
/// ```
///
/// `layers`, `optimizer_type`, `learning_rate`, `batch_size` and
/// `num_epochs` are required on import; the remaining keys fall back to
/// their defaults when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationDocument {
    layers: LayerSequence,
    optimizer_type: Optimizer,
    #[serde(default = "default_loss_function")]
    loss_function: String,
    learning_rate: f64,
    batch_size: usize,
    num_epochs: usize,
    #[serde(default)]
    device: Device,
    #[serde(default)]
    augmentations: BTreeSet<Augmentation>,
}

impl Default for ConfigurationDocument {
    fn default() -> Self {
        ConfigurationDocument {
            layers: LayerSequence::new(),
            optimizer_type: Optimizer::Adam,
            loss_function: default_loss_function(),
            learning_rate: DEFAULT_LEARNING_RATE,
            batch_size: DEFAULT_BATCH_SIZE,
            num_epochs: DEFAULT_EPOCHS,
            device: Device::Gpu,
            augmentations: BTreeSet::new(),
        }
    }
}

/// Optional sign plus the digits that follow it, ignoring leading
/// whitespace and anything after the first non-digit (`"32.7"` gives `"32"`).
fn leading_integer(raw: &str) -> &str {
    let s = raw.trim_start();
    let sign = usize::from(s.starts_with(['+', '-']));
    let digits = s[sign..].bytes().take_while(u8::is_ascii_digit).count();
    &s[..sign + digits]
}

/// Integer coercion used for batch size and epoch count: input with no
/// leading integer becomes the lower bound, everything else is clamped to
/// `[min, max]`.
fn coerce_count(raw: &str, min: usize, max: usize) -> usize {
    let parsed = match leading_integer(raw).parse::<i128>() {
        Ok(v) => v,
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => i128::MAX,
        Err(_) => return min,
    };
    parsed.clamp(min as i128, max as i128) as usize
}

impl ConfigurationDocument {
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn layers(&self) -> &LayerSequence {
        &self.layers
    }

    /// Layer-shaped mutations go straight to the sequence, which keeps its
    /// own derived fields consistent.
    pub fn layers_mut(&mut self) -> &mut LayerSequence {
        &mut self.layers
    }

    pub fn optimizer_type(&self) -> Optimizer {
        self.optimizer_type
    }

    pub fn loss_function(&self) -> &str {
        &self.loss_function
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn num_epochs(&self) -> usize {
        self.num_epochs
    }

    pub fn device(&self) -> Device {
        self.device
    }

    pub fn augmentations(&self) -> &BTreeSet<Augmentation> {
        &self.augmentations
    }

    // -------------------------------------------------------------------------
    // Scalar edits
    // -------------------------------------------------------------------------

    /// Coerces `raw` to `field`'s type and stores it.
    ///
    /// Batch size and epoch count are clamped rather than rejected. Anything
    /// that cannot be coerced fails with `InvalidFieldValue` and leaves the
    /// field unchanged.
    pub fn set_field(&mut self, field: DocumentField, raw: &str) -> Result<()> {
        let invalid = |reason: String| {
            log::warn!("rejected {field} = {raw:?}: {reason}");
            ConfigError::invalid_value(field.as_str(), raw, reason)
        };

        match field {
            DocumentField::OptimizerType => {
                self.optimizer_type = raw.parse().map_err(invalid)?;
            }
            DocumentField::LossFunction => {
                let loss = raw.trim();
                if loss.is_empty() {
                    return Err(invalid("loss function must not be empty".into()));
                }
                self.loss_function = loss.to_owned();
            }
            DocumentField::LearningRate => {
                let lr = raw
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| invalid("expected a number".into()))?;
                if !lr.is_finite() || lr <= 0.0 {
                    return Err(invalid("learning rate must be a positive number".into()));
                }
                self.learning_rate = lr;
            }
            DocumentField::BatchSize => {
                self.batch_size = coerce_count(raw, MIN_BATCH_SIZE, MAX_BATCH_SIZE);
            }
            DocumentField::NumEpochs => {
                self.num_epochs = coerce_count(raw, MIN_EPOCHS, usize::MAX);
            }
            DocumentField::Device => {
                self.device = raw.parse().map_err(invalid)?;
            }
            DocumentField::Augmentations => {
                self.augmentations = raw
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::parse::<Augmentation>)
                    .collect::<std::result::Result<BTreeSet<_>, String>>()
                    .map_err(invalid)?;
            }
        }

        log::debug!("{field} = {}", self.field_value(field));
        Ok(())
    }

    /// String-keyed form of [`set_field`](Self::set_field). Accepts the
    /// document keys (`batch_size`) and their camelCase forms (`batchSize`).
    pub fn set_field_named(&mut self, name: &str, raw: &str) -> Result<()> {
        let field = name
            .parse::<DocumentField>()
            .map_err(|reason| ConfigError::invalid_value(name, raw, reason))?;
        self.set_field(field, raw)
    }

    fn field_value(&self, field: DocumentField) -> String {
        match field {
            DocumentField::OptimizerType => self.optimizer_type.to_string(),
            DocumentField::LossFunction => self.loss_function.clone(),
            DocumentField::LearningRate => self.learning_rate.to_string(),
            DocumentField::BatchSize => self.batch_size.to_string(),
            DocumentField::NumEpochs => self.num_epochs.to_string(),
            DocumentField::Device => self.device.to_string(),
            DocumentField::Augmentations => self
                .augmentations
                .iter()
                .map(Augmentation::as_str)
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    /// Adds or removes one augmentation; idempotent either way.
    pub fn toggle_augmentation(&mut self, augmentation: Augmentation, enabled: bool) {
        let changed = if enabled {
            self.augmentations.insert(augmentation)
        } else {
            self.augmentations.remove(&augmentation)
        };
        if changed {
            log::debug!("augmentation {augmentation} enabled = {enabled}");
        }
    }

    pub fn toggle_augmentation_named(&mut self, name: &str, enabled: bool) -> Result<()> {
        let augmentation = name.parse::<Augmentation>().map_err(|reason| {
            ConfigError::invalid_value(DocumentField::Augmentations.as_str(), name, reason)
        })?;
        self.toggle_augmentation(augmentation, enabled);
        Ok(())
    }

    /// Learning rate as the exponent shown on the log10 slider.
    pub fn learning_rate_log10(&self) -> f64 {
        self.learning_rate.log10()
    }

    /// Sets the learning rate to `10^exponent`, with the exponent clamped to
    /// the slider range `[-5, -1]`.
    pub fn set_learning_rate_log10(&mut self, exponent: f64) -> Result<()> {
        if exponent.is_nan() {
            return Err(ConfigError::invalid_value(
                DocumentField::LearningRate.as_str(),
                exponent.to_string(),
                "exponent must be a number",
            ));
        }
        let exponent = exponent.clamp(LEARNING_RATE_LOG10_MIN, LEARNING_RATE_LOG10_MAX);
        self.learning_rate = 10f64.powf(exponent);
        log::debug!("learning_rate = {:e}", self.learning_rate);
        Ok(())
    }

    /// Back to the session defaults.
    pub fn reset(&mut self) {
        log::info!("resetting configuration to defaults");
        *self = Self::default();
    }

    // -------------------------------------------------------------------------
    // Validation
    // -------------------------------------------------------------------------

    /// Gate run before the configuration is handed to a training backend.
    ///
    /// Fails with `InvalidConfiguration` naming the first offending field.
    /// Stale derived shapes are reported as warnings only: they are kept as
    /// the user left them unless [`LayerSequence::reconcile`] is called.
    pub fn validate(&self) -> Result<()> {
        if self.layers.is_empty() {
            return Err(ConfigError::invalid_config(
                "layers",
                "must contain at least one layer",
            ));
        }
        for (i, layer) in self.layers.iter().enumerate() {
            layer.check().map_err(|reason| {
                ConfigError::invalid_config("layers", format!("layer {}: {reason}", i + 1))
            })?;
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(ConfigError::invalid_config(
                DocumentField::LearningRate.as_str(),
                format!("must be a positive number, got {}", self.learning_rate),
            ));
        }
        if !(MIN_BATCH_SIZE..=MAX_BATCH_SIZE).contains(&self.batch_size) {
            return Err(ConfigError::invalid_config(
                DocumentField::BatchSize.as_str(),
                format!(
                    "must be between {MIN_BATCH_SIZE} and {MAX_BATCH_SIZE}, got {}",
                    self.batch_size
                ),
            ));
        }
        if self.num_epochs < MIN_EPOCHS {
            return Err(ConfigError::invalid_config(
                DocumentField::NumEpochs.as_str(),
                format!("must be at least {MIN_EPOCHS}"),
            ));
        }

        for issue in self.layers.shape_issues() {
            log::warn!("{issue}");
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Import / export
    // -------------------------------------------------------------------------

    /// The canonical exported document.
    pub fn export(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// The exported document as pretty-printed JSON text.
    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a document without touching any existing state.
    pub fn from_value(document: &serde_json::Value) -> Result<Self> {
        ConfigurationDocument::deserialize(document)
            .map_err(|e| ConfigError::MalformedDocument(e.to_string()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let document: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| ConfigError::MalformedDocument(format!("invalid JSON: {e}")))?;
        Self::from_value(&document)
    }

    /// Replaces the whole configuration with `document`. A malformed
    /// document is rejected without changing anything.
    pub fn import(&mut self, document: &serde_json::Value) -> Result<()> {
        let parsed = Self::from_value(document).map_err(|e| {
            log::warn!("import rejected: {e}");
            e
        })?;
        log::info!("imported configuration with {} layer(s)", parsed.layers.len());
        *self = parsed;
        Ok(())
    }

    pub fn import_json(&mut self, text: &str) -> Result<()> {
        let parsed = Self::from_json(text).map_err(|e| {
            log::warn!("import rejected: {e}");
            e
        })?;
        log::info!("imported configuration with {} layer(s)", parsed.layers.len());
        *self = parsed;
        Ok(())
    }

    /// Writes the exported document to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Reads a document previously written by `save_json` (or any file in
    /// the same format).
    pub fn load_json(path: &str) -> Result<ConfigurationDocument> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    // -------------------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------------------

    /// Human-readable listing of the layers and hyperparameters.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        if self.layers.is_empty() {
            out.push_str("(no layers)\n");
        }
        for (i, layer) in self.layers.iter().enumerate() {
            out.push_str(&format!("{} Layer {}: {layer}\n", layer.kind().label(), i + 1));
        }
        out.push_str(&format!(
            "optimizer={} loss={} lr={:e} batch_size={} epochs={} device={}",
            self.optimizer_type,
            self.loss_function,
            self.learning_rate,
            self.batch_size,
            self.num_epochs,
            self.device
        ));
        if !self.augmentations.is_empty() {
            out.push_str(&format!(
                " augmentations={}",
                self.field_value(DocumentField::Augmentations)
            ));
        }
        out
    }
}
