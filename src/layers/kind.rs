use std::fmt;
use std::str::FromStr;

use crate::layers::field::LayerField;

/// The four layer kinds a sequence can hold, without their parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Conv2d,
    MaxPool,
    Activation,
    Linear,
}

impl LayerKind {
    pub const ALL: [LayerKind; 4] = [
        LayerKind::Conv2d,
        LayerKind::MaxPool,
        LayerKind::Activation,
        LayerKind::Linear,
    ];

    /// The `layer_type` discriminator used in exported documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            LayerKind::Conv2d => "conv2d",
            LayerKind::MaxPool => "maxpool",
            LayerKind::Activation => "activation",
            LayerKind::Linear => "linear",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LayerKind::Conv2d => "Conv2D",
            LayerKind::MaxPool => "MaxPool",
            LayerKind::Activation => "Activation",
            LayerKind::Linear => "Linear",
        }
    }

    /// Fields a caller may edit on a layer of this kind.
    ///
    /// `channels` never appears here: a MaxPool's channel count is always
    /// derived from its predecessors.
    pub fn editable_fields(&self) -> &'static [LayerField] {
        match self {
            LayerKind::Conv2d => &[
                LayerField::InChannels,
                LayerField::OutChannels,
                LayerField::KernelSize,
                LayerField::Stride,
                LayerField::Padding,
            ],
            LayerKind::MaxPool => &[LayerField::KernelSize, LayerField::Stride],
            LayerKind::Activation => &[LayerField::Function],
            LayerKind::Linear => &[LayerField::InFeatures, LayerField::OutFeatures],
        }
    }

    pub fn accepts(&self, field: LayerField) -> bool {
        self.editable_fields().contains(&field)
    }

    /// Activation layers are transparent to shape propagation.
    pub fn is_shape_bearing(&self) -> bool {
        !matches!(self, LayerKind::Activation)
    }
}

impl FromStr for LayerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        LayerKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown layer kind '{s}'"))
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
