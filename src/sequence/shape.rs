//! Pure shape inference over a slice of layers.
//!
//! Nothing here mutates its input: every function reads a prefix of the
//! sequence and returns a value (or a fresh `Vec`), so the sequence type can
//! swap in the result only once an edit has fully succeeded.

use std::fmt;

use crate::defaults::{INPUT_CHANNELS, INPUT_SPATIAL_SIZE};
use crate::error::{ConfigError, Result};
use crate::layers::field::{FieldValue, LayerField};
use crate::layers::spec::LayerSpec;

/// The tensor shape flowing into a given position of the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Square feature map: `channels × size × size`.
    Spatial { channels: usize, size: usize },
    /// Flat feature vector.
    Flat { features: usize },
}

impl Shape {
    /// Number of features after flattening, saturating at `usize::MAX`.
    pub fn features(&self) -> usize {
        match *self {
            Shape::Spatial { channels, size } => {
                channels.saturating_mul(size).saturating_mul(size)
            }
            Shape::Flat { features } => features,
        }
    }
}

/// `floor((size - kernel + 2·padding) / stride) + 1`, saturating at 1 when
/// the kernel is wider than the padded input and at `usize::MAX` when the
/// padding is huge.
pub fn conv_output_size(size: usize, kernel: usize, stride: usize, padding: usize) -> usize {
    let padded = size.saturating_add(padding.saturating_mul(2));
    (padded.saturating_sub(kernel) / stride.max(1)).saturating_add(1)
}

/// `floor(size / kernel)`, never below 1.
pub fn pool_output_size(size: usize, kernel: usize) -> usize {
    (size / kernel.max(1)).max(1)
}

fn prefix(layers: &[LayerSpec], index: usize) -> &[LayerSpec] {
    &layers[..index.min(layers.len())]
}

/// Spatial side length reaching `index`, replaying every Conv2D and MaxPool
/// before it starting from the 28×28 input.
pub fn spatial_size(layers: &[LayerSpec], index: usize) -> usize {
    prefix(layers, index)
        .iter()
        .fold(INPUT_SPATIAL_SIZE, |size, layer| match *layer {
            LayerSpec::Conv2d { kernel_size, stride, padding, .. } => {
                conv_output_size(size, kernel_size, stride, padding)
            }
            LayerSpec::MaxPool { kernel_size, .. } => pool_output_size(size, kernel_size),
            _ => size,
        })
}

/// Channel count produced by the nearest Conv2D/MaxPool before `index`,
/// or the grayscale input's single channel.
pub fn predecessor_channels(layers: &[LayerSpec], index: usize) -> usize {
    prefix(layers, index)
        .iter()
        .rev()
        .find_map(LayerSpec::output_channels)
        .unwrap_or(INPUT_CHANNELS)
}

/// Shape produced by the nearest shape-bearing layer before `index`.
///
/// Activations are skipped. A Linear predecessor yields a flat vector; a
/// Conv2D/MaxPool predecessor (or none at all) yields the feature map
/// obtained by replaying the convolutional chain.
pub fn predecessor_shape(layers: &[LayerSpec], index: usize) -> Shape {
    let nearest = prefix(layers, index)
        .iter()
        .rev()
        .find(|layer| layer.is_shape_bearing());

    match nearest {
        Some(&LayerSpec::Linear { out_features, .. }) => Shape::Flat { features: out_features },
        _ => Shape::Spatial {
            channels: predecessor_channels(layers, index),
            size: spatial_size(layers, index),
        },
    }
}

/// `in_features` a Linear layer at `index` should carry.
pub fn input_features(layers: &[LayerSpec], index: usize) -> usize {
    predecessor_shape(layers, index).features()
}

/// Sets `field` on the layer at `index` and returns the resulting sequence.
///
/// When the edit changes a Conv2D's `out_channels`, the new count flows
/// forward: every MaxPool takes it as its `channels`, and the next Conv2D
/// takes it as its `in_channels`, where the walk stops. That Conv2D's own
/// `out_channels` still governs everything after it.
///
/// Linear `in_features` further down are left as they are.
pub fn propagate_from(
    layers: &[LayerSpec],
    index: usize,
    field: LayerField,
    value: FieldValue,
) -> Result<Vec<LayerSpec>> {
    let target = layers.get(index).ok_or_else(|| {
        ConfigError::invalid_value(
            field.as_str(),
            value.to_string(),
            format!("no layer at index {index} (sequence has {})", layers.len()),
        )
    })?;
    let updated = target.with_field(field, value)?;

    let mut next = layers.to_vec();
    next[index] = updated;

    let is_conv = matches!(next[index], LayerSpec::Conv2d { .. });
    if let (true, LayerField::OutChannels, FieldValue::Count(channels)) = (is_conv, field, value) {
        for (offset, layer) in next.iter_mut().enumerate().skip(index + 1) {
            match layer {
                LayerSpec::MaxPool { channels: c, .. } => {
                    log::debug!("layer {offset}: maxpool channels {c} -> {channels}");
                    *c = channels;
                }
                LayerSpec::Conv2d { in_channels, .. } => {
                    log::debug!("layer {offset}: conv2d in_channels {in_channels} -> {channels}");
                    *in_channels = channels;
                    break;
                }
                _ => {}
            }
        }
    }

    Ok(next)
}

/// A derived field that disagrees with the value its predecessors imply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeIssue {
    pub index: usize,
    pub field: LayerField,
    pub actual: usize,
    pub expected: usize,
}

impl fmt::Display for ShapeIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "layer {}: `{}` is {} but its predecessors produce {}",
            self.index + 1,
            self.field,
            self.actual,
            self.expected
        )
    }
}

/// The derived field of the layer at `index` and the value it should hold.
fn expected_derived(layers: &[LayerSpec], index: usize) -> Option<(LayerField, usize)> {
    match layers.get(index)? {
        LayerSpec::Conv2d { .. } => {
            Some((LayerField::InChannels, predecessor_channels(layers, index)))
        }
        LayerSpec::MaxPool { .. } => Some((LayerField::Channels, predecessor_channels(layers, index))),
        LayerSpec::Linear { .. } => Some((LayerField::InFeatures, input_features(layers, index))),
        LayerSpec::Activation { .. } => None,
    }
}

/// Lists every derived field that no longer matches its rule.
pub fn shape_issues(layers: &[LayerSpec]) -> Vec<ShapeIssue> {
    (0..layers.len())
        .filter_map(|index| {
            let (field, expected) = expected_derived(layers, index)?;
            match layers[index].get(field)? {
                FieldValue::Count(actual) if actual != expected => {
                    Some(ShapeIssue { index, field, actual, expected })
                }
                _ => None,
            }
        })
        .collect()
}

/// Recomputes every derived field front to back.
pub fn reconciled(layers: &[LayerSpec]) -> Vec<LayerSpec> {
    let mut next = layers.to_vec();
    for index in 0..next.len() {
        if let Some((field, expected)) = expected_derived(&next, index) {
            next[index].assign(field, expected);
        }
    }
    next
}
