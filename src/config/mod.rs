pub mod document;
pub mod field;
pub mod hyperparams;

pub use document::ConfigurationDocument;
pub use field::DocumentField;
pub use hyperparams::{Augmentation, Device, Optimizer};
