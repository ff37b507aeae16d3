pub mod activation;
pub mod config;
pub mod defaults;
pub mod error;
pub mod layers;
pub mod sequence;
pub mod session;

// Convenience re-exports
pub use activation::activation::ActivationFunction;
pub use config::{Augmentation, ConfigurationDocument, Device, DocumentField, Optimizer};
pub use error::{ConfigError, Result};
pub use layers::{FieldValue, LayerField, LayerKind, LayerSpec};
pub use sequence::{LayerSequence, Shape, ShapeIssue};
pub use session::{ModelSlot, Session};
