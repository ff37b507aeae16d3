use std::fmt;
use std::str::FromStr;

use crate::activation::activation::ActivationFunction;
use crate::error::{ConfigError, Result};

/// Tag naming one parameter of a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerField {
    InChannels,
    OutChannels,
    KernelSize,
    Stride,
    Padding,
    /// Derived channel count of a MaxPool; not user-editable.
    Channels,
    Function,
    InFeatures,
    OutFeatures,
}

/// A typed value for a [`LayerField`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue {
    Count(usize),
    Activation(ActivationFunction),
}

impl LayerField {
    pub const ALL: [LayerField; 9] = [
        LayerField::InChannels,
        LayerField::OutChannels,
        LayerField::KernelSize,
        LayerField::Stride,
        LayerField::Padding,
        LayerField::Channels,
        LayerField::Function,
        LayerField::InFeatures,
        LayerField::OutFeatures,
    ];

    /// Field name as it appears in exported documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            LayerField::InChannels => "in_channels",
            LayerField::OutChannels => "out_channels",
            LayerField::KernelSize => "kernel_size",
            LayerField::Stride => "stride",
            LayerField::Padding => "padding",
            LayerField::Channels => "channels",
            LayerField::Function => "function",
            LayerField::InFeatures => "in_features",
            LayerField::OutFeatures => "out_features",
        }
    }

    fn camel_case(&self) -> &'static str {
        match self {
            LayerField::InChannels => "inChannels",
            LayerField::OutChannels => "outChannels",
            LayerField::KernelSize => "kernelSize",
            LayerField::Stride => "stride",
            LayerField::Padding => "padding",
            LayerField::Channels => "channels",
            LayerField::Function => "function",
            LayerField::InFeatures => "inFeatures",
            LayerField::OutFeatures => "outFeatures",
        }
    }

    /// Padding is the only count that may be zero.
    pub fn allows_zero(&self) -> bool {
        matches!(self, LayerField::Padding)
    }

    /// Parses a raw user-supplied string into this field's value type.
    pub fn parse_value(&self, raw: &str) -> Result<FieldValue> {
        let trimmed = raw.trim();
        let value = match self {
            LayerField::Function => trimmed
                .parse::<ActivationFunction>()
                .map(FieldValue::Activation)
                .map_err(|reason| ConfigError::invalid_value(self.as_str(), raw, reason))?,
            _ => trimmed
                .parse::<usize>()
                .map(FieldValue::Count)
                .map_err(|_| {
                    ConfigError::invalid_value(self.as_str(), raw, "expected a non-negative integer")
                })?,
        };
        self.check(value)?;
        Ok(value)
    }

    /// Checks that `value` has this field's type and lies in its domain.
    pub fn check(&self, value: FieldValue) -> Result<()> {
        match (self, value) {
            (LayerField::Function, FieldValue::Activation(_)) => Ok(()),
            (LayerField::Function, FieldValue::Count(_)) => Err(ConfigError::invalid_value(
                self.as_str(),
                value.to_string(),
                "expected an activation function",
            )),
            (_, FieldValue::Activation(_)) => Err(ConfigError::invalid_value(
                self.as_str(),
                value.to_string(),
                "expected an integer",
            )),
            (_, FieldValue::Count(0)) if !self.allows_zero() => Err(ConfigError::invalid_value(
                self.as_str(),
                "0",
                "must be a positive integer",
            )),
            (_, FieldValue::Count(_)) => Ok(()),
        }
    }
}

impl FromStr for LayerField {
    type Err = String;

    /// Accepts both the snake_case document names and their camelCase forms.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        LayerField::ALL
            .into_iter()
            .find(|f| f.as_str() == s || f.camel_case() == s)
            .ok_or_else(|| format!("unknown layer field '{s}'"))
    }
}

impl fmt::Display for LayerField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Count(n) => write!(f, "{n}"),
            FieldValue::Activation(func) => write!(f, "{func}"),
        }
    }
}

impl From<usize> for FieldValue {
    fn from(n: usize) -> Self {
        FieldValue::Count(n)
    }
}

impl From<ActivationFunction> for FieldValue {
    fn from(func: ActivationFunction) -> Self {
        FieldValue::Activation(func)
    }
}
