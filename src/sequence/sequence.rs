use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::defaults::{
    CONV_KERNEL_SIZE, CONV_PADDING, CONV_STRIDE, HIDDEN_FEATURES, NUM_CLASSES, POOL_KERNEL_SIZE,
    POOL_STRIDE,
};
use crate::error::Result;
use crate::layers::field::{FieldValue, LayerField};
use crate::layers::kind::LayerKind;
use crate::layers::spec::LayerSpec;
use crate::sequence::shape::{
    input_features, predecessor_channels, propagate_from, reconciled, shape_issues, ShapeIssue,
};

/// An ordered list of layers describing a network's forward path.
///
/// Position is the only identity a layer has. Every derived field
/// (`in_channels`, MaxPool `channels`, `in_features`) is filled in from the
/// layers before it when the layer is appended, and channel edits flow
/// forward through [`LayerSequence::set_field`].
///
/// Serializes as a plain JSON array of [`LayerSpec`] objects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerSequence {
    layers: Vec<LayerSpec>,
}

impl LayerSequence {
    pub fn new() -> Self {
        LayerSequence { layers: Vec::new() }
    }

    /// Wraps layers as-is, without recomputing derived fields.
    pub fn from_layers(layers: Vec<LayerSpec>) -> Self {
        LayerSequence { layers }
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn layer(&self, index: usize) -> Option<&LayerSpec> {
        self.layers.get(index)
    }

    pub fn as_slice(&self) -> &[LayerSpec] {
        &self.layers
    }

    /// Read-only, order-preserving view. The iterator is `Clone`, so it can
    /// be restarted from any point.
    pub fn iter(&self) -> std::slice::Iter<'_, LayerSpec> {
        self.layers.iter()
    }

    /// The layer that `append(kind)` would push right now.
    fn next_layer(&self, kind: LayerKind, terminal: bool) -> LayerSpec {
        let end = self.layers.len();
        match kind {
            LayerKind::Conv2d => {
                let channels = predecessor_channels(&self.layers, end);
                LayerSpec::conv2d(channels, channels, CONV_KERNEL_SIZE, CONV_STRIDE, CONV_PADDING)
            }
            LayerKind::MaxPool => LayerSpec::max_pool(
                predecessor_channels(&self.layers, end),
                POOL_KERNEL_SIZE,
                POOL_STRIDE,
            ),
            LayerKind::Activation => LayerSpec::activation(ActivationFunction::default()),
            LayerKind::Linear => {
                let out_features = if terminal { NUM_CLASSES } else { HIDDEN_FEATURES };
                LayerSpec::linear(input_features(&self.layers, end), out_features)
            }
        }
    }

    /// Appends a layer of `kind` with its input fields derived from the
    /// current tail and the remaining fields at their defaults.
    pub fn append(&mut self, kind: LayerKind) -> &LayerSpec {
        self.push(kind, false)
    }

    /// Appends the output Linear layer, sized to the number of classes.
    pub fn append_terminal(&mut self) -> &LayerSpec {
        self.push(LayerKind::Linear, true)
    }

    /// String entry point for `append`. An unrecognized kind is logged and
    /// ignored; returns whether a layer was added.
    pub fn append_named(&mut self, kind: &str) -> bool {
        match kind.parse::<LayerKind>() {
            Ok(kind) => {
                self.append(kind);
                true
            }
            Err(reason) => {
                log::warn!("append ignored: {reason}");
                false
            }
        }
    }

    fn push(&mut self, kind: LayerKind, terminal: bool) -> &LayerSpec {
        let layer = self.next_layer(kind, terminal);
        log::info!("appending layer {}: {layer}", self.layers.len() + 1);
        self.layers.push(layer);
        &self.layers[self.layers.len() - 1]
    }

    /// Drops the final layer; a no-op on an empty sequence.
    pub fn remove_last(&mut self) -> Option<LayerSpec> {
        let removed = self.layers.pop();
        if let Some(layer) = &removed {
            log::info!("removed layer {}: {layer}", self.layers.len() + 1);
        }
        removed
    }

    /// Typed edit of one field, validated against the kind's field table.
    ///
    /// On success the sequence is replaced by the result of
    /// [`propagate_from`]; on failure it is left untouched.
    pub fn set_field(&mut self, index: usize, field: LayerField, value: FieldValue) -> Result<()> {
        match propagate_from(&self.layers, index, field, value) {
            Ok(next) => {
                log::debug!("layer {}: {field} = {value}", index.saturating_add(1));
                self.layers = next;
                Ok(())
            }
            Err(e) => {
                log::warn!("rejected edit of layer {}: {e}", index.saturating_add(1));
                Err(e)
            }
        }
    }

    /// Parses `raw` according to `field`'s type, then applies `set_field`.
    pub fn update_field(&mut self, index: usize, field: LayerField, raw: &str) -> Result<()> {
        let value = field.parse_value(raw).map_err(|e| {
            log::warn!("rejected edit of layer {}: {e}", index.saturating_add(1));
            e
        })?;
        self.set_field(index, field, value)
    }

    /// Derived fields that no longer match their predecessors, e.g. a
    /// Linear `in_features` left stale by a later kernel-size edit.
    pub fn shape_issues(&self) -> Vec<ShapeIssue> {
        shape_issues(&self.layers)
    }

    /// Recomputes every derived field from the front; returns how many
    /// fields changed.
    pub fn reconcile(&mut self) -> usize {
        let next = reconciled(&self.layers);
        let changed = self.layers.iter().zip(&next).filter(|(old, new)| old != new).count();
        if changed > 0 {
            log::info!("reconciled {changed} derived field(s)");
            self.layers = next;
        }
        changed
    }
}

impl<'a> IntoIterator for &'a LayerSequence {
    type Item = &'a LayerSpec;
    type IntoIter = std::slice::Iter<'a, LayerSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.layers.iter()
    }
}
