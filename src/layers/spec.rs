use serde::{Serialize, Deserialize};
use std::fmt;

use crate::activation::activation::ActivationFunction;
use crate::error::{ConfigError, Result};
use crate::layers::field::{FieldValue, LayerField};
use crate::layers::kind::LayerKind;

/// One layer of a network architecture.
///
/// Serialized as a flat object carrying a `layer_type` discriminator plus
/// the kind-specific fields, e.g.
/// `{"layer_type": "maxpool", "channels": 8, "kernel_size": 2, "stride": 2}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "layer_type", rename_all = "lowercase")]
pub enum LayerSpec {
    Conv2d {
        in_channels: usize,
        out_channels: usize,
        kernel_size: usize,
        stride: usize,
        padding: usize,
    },
    MaxPool {
        /// Derived from the nearest preceding Conv2D/MaxPool.
        channels: usize,
        kernel_size: usize,
        stride: usize,
    },
    Activation {
        function: ActivationFunction,
    },
    Linear {
        in_features: usize,
        out_features: usize,
    },
}

impl LayerSpec {
    pub fn conv2d(
        in_channels: usize,
        out_channels: usize,
        kernel_size: usize,
        stride: usize,
        padding: usize,
    ) -> LayerSpec {
        LayerSpec::Conv2d { in_channels, out_channels, kernel_size, stride, padding }
    }

    pub fn max_pool(channels: usize, kernel_size: usize, stride: usize) -> LayerSpec {
        LayerSpec::MaxPool { channels, kernel_size, stride }
    }

    pub fn activation(function: ActivationFunction) -> LayerSpec {
        LayerSpec::Activation { function }
    }

    pub fn linear(in_features: usize, out_features: usize) -> LayerSpec {
        LayerSpec::Linear { in_features, out_features }
    }

    pub fn kind(&self) -> LayerKind {
        match self {
            LayerSpec::Conv2d { .. } => LayerKind::Conv2d,
            LayerSpec::MaxPool { .. } => LayerKind::MaxPool,
            LayerSpec::Activation { .. } => LayerKind::Activation,
            LayerSpec::Linear { .. } => LayerKind::Linear,
        }
    }

    pub fn is_shape_bearing(&self) -> bool {
        self.kind().is_shape_bearing()
    }

    /// Channel count this layer hands to its successors, for the layers
    /// that produce a feature map.
    pub fn output_channels(&self) -> Option<usize> {
        match *self {
            LayerSpec::Conv2d { out_channels, .. } => Some(out_channels),
            LayerSpec::MaxPool { channels, .. } => Some(channels),
            _ => None,
        }
    }

    /// Reads a field, or `None` if this kind has no such field.
    pub fn get(&self, field: LayerField) -> Option<FieldValue> {
        let count = match (self, field) {
            (LayerSpec::Conv2d { in_channels, .. }, LayerField::InChannels) => *in_channels,
            (LayerSpec::Conv2d { out_channels, .. }, LayerField::OutChannels) => *out_channels,
            (LayerSpec::Conv2d { kernel_size, .. }, LayerField::KernelSize)
            | (LayerSpec::MaxPool { kernel_size, .. }, LayerField::KernelSize) => *kernel_size,
            (LayerSpec::Conv2d { stride, .. }, LayerField::Stride)
            | (LayerSpec::MaxPool { stride, .. }, LayerField::Stride) => *stride,
            (LayerSpec::Conv2d { padding, .. }, LayerField::Padding) => *padding,
            (LayerSpec::MaxPool { channels, .. }, LayerField::Channels) => *channels,
            (LayerSpec::Linear { in_features, .. }, LayerField::InFeatures) => *in_features,
            (LayerSpec::Linear { out_features, .. }, LayerField::OutFeatures) => *out_features,
            (LayerSpec::Activation { function }, LayerField::Function) => {
                return Some(FieldValue::Activation(*function));
            }
            _ => return None,
        };
        Some(FieldValue::Count(count))
    }

    /// Returns a copy with `field` set to `value`.
    ///
    /// Fails with `InvalidFieldValue` if the field is not editable on this
    /// kind or the value is out of the field's domain.
    pub fn with_field(&self, field: LayerField, value: FieldValue) -> Result<LayerSpec> {
        let kind = self.kind();
        if !kind.accepts(field) {
            return Err(ConfigError::invalid_value(
                field.as_str(),
                value.to_string(),
                format!("not an editable field of a {} layer", kind.label()),
            ));
        }
        field.check(value)?;

        let mut next = self.clone();
        match value {
            FieldValue::Activation(f) => {
                if let LayerSpec::Activation { function } = &mut next {
                    *function = f;
                }
            }
            FieldValue::Count(n) => next.assign(field, n),
        }
        Ok(next)
    }

    /// Writes a count without consulting the editable-field table; used for
    /// derived fields during propagation. Unknown fields are ignored.
    pub(crate) fn assign(&mut self, field: LayerField, n: usize) {
        match (self, field) {
            (LayerSpec::Conv2d { in_channels, .. }, LayerField::InChannels) => *in_channels = n,
            (LayerSpec::Conv2d { out_channels, .. }, LayerField::OutChannels) => *out_channels = n,
            (LayerSpec::Conv2d { kernel_size, .. }, LayerField::KernelSize)
            | (LayerSpec::MaxPool { kernel_size, .. }, LayerField::KernelSize) => *kernel_size = n,
            (LayerSpec::Conv2d { stride, .. }, LayerField::Stride)
            | (LayerSpec::MaxPool { stride, .. }, LayerField::Stride) => *stride = n,
            (LayerSpec::Conv2d { padding, .. }, LayerField::Padding) => *padding = n,
            (LayerSpec::MaxPool { channels, .. }, LayerField::Channels) => *channels = n,
            (LayerSpec::Linear { in_features, .. }, LayerField::InFeatures) => *in_features = n,
            (LayerSpec::Linear { out_features, .. }, LayerField::OutFeatures) => *out_features = n,
            _ => {}
        }
    }

    /// Checks every numeric field against its domain (positive, padding ≥ 0).
    pub fn check(&self) -> std::result::Result<(), String> {
        for field in LayerField::ALL {
            if self.get(field) == Some(FieldValue::Count(0)) && !field.allows_zero() {
                return Err(format!("{} `{field}` must be positive", self.kind().label()));
            }
        }
        Ok(())
    }
}

impl fmt::Display for LayerSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerSpec::Conv2d { in_channels, out_channels, kernel_size, stride, padding } => write!(
                f,
                "Conv2D({in_channels} -> {out_channels}, kernel={kernel_size}, stride={stride}, padding={padding})"
            ),
            LayerSpec::MaxPool { channels, kernel_size, stride } => {
                write!(f, "MaxPool(channels={channels}, kernel={kernel_size}, stride={stride})")
            }
            LayerSpec::Activation { function } => write!(f, "Activation({})", function.label()),
            LayerSpec::Linear { in_features, out_features } => {
                write!(f, "Linear({in_features} -> {out_features})")
            }
        }
    }
}
