pub mod field;
pub mod kind;
pub mod spec;

pub use field::{FieldValue, LayerField};
pub use kind::LayerKind;
pub use spec::LayerSpec;
