pub mod sequence;
pub mod shape;

pub use sequence::LayerSequence;
pub use shape::{predecessor_shape, propagate_from, Shape, ShapeIssue};
