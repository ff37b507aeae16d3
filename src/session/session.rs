use std::fmt;

use crate::config::document::ConfigurationDocument;
use crate::error::Result;

/// Which of the two compared models an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelSlot {
    First,
    Second,
}

impl ModelSlot {
    pub const ALL: [ModelSlot; 2] = [ModelSlot::First, ModelSlot::Second];

    /// 1-based model number shown to the user.
    pub fn number(&self) -> usize {
        match self {
            ModelSlot::First => 1,
            ModelSlot::Second => 2,
        }
    }

    fn index(&self) -> usize {
        self.number() - 1
    }
}

impl fmt::Display for ModelSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "model {}", self.number())
    }
}

/// A side-by-side comparison session: two configurations that share
/// nothing, edited and exported independently.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    models: [ConfigurationDocument; 2],
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn model(&self, slot: ModelSlot) -> &ConfigurationDocument {
        &self.models[slot.index()]
    }

    pub fn model_mut(&mut self, slot: ModelSlot) -> &mut ConfigurationDocument {
        &mut self.models[slot.index()]
    }

    /// File name offered when a model's configuration is downloaded.
    pub fn export_file_name(slot: ModelSlot) -> String {
        format!("model{}_config.json", slot.number())
    }

    /// Replaces one model from an uploaded document; the other model is
    /// never touched.
    pub fn import_json(&mut self, slot: ModelSlot, text: &str) -> Result<()> {
        log::info!("importing configuration into {slot}");
        self.model_mut(slot).import_json(text)
    }

    /// Runs the validation gate and, on success, hands back the document
    /// for dispatch to a training backend.
    pub fn ready(&self, slot: ModelSlot) -> Result<&ConfigurationDocument> {
        let model = self.model(slot);
        model.validate()?;
        log::info!("{slot} ready for training ({} layer(s))", model.layers().len());
        Ok(model)
    }

    /// Resets both models to their defaults.
    pub fn reset(&mut self) {
        for model in &mut self.models {
            model.reset();
        }
    }
}
