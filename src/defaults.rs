//! Named defaults shared by the layer engine and the configuration document.

/// Side length of the square input image (MNIST-style 28x28).
pub const INPUT_SPATIAL_SIZE: usize = 28;
/// Channel count of the raw input; grayscale.
pub const INPUT_CHANNELS: usize = 1;

pub const CONV_KERNEL_SIZE: usize = 3;
pub const CONV_STRIDE: usize = 1;
pub const CONV_PADDING: usize = 1;

pub const POOL_KERNEL_SIZE: usize = 2;
pub const POOL_STRIDE: usize = 2;

/// Width of a freshly appended hidden linear layer.
pub const HIDDEN_FEATURES: usize = 128;
/// Width of a terminal linear layer: one output per class.
pub const NUM_CLASSES: usize = 10;

pub const DEFAULT_LOSS_FUNCTION: &str = "cross_entropy";
pub const DEFAULT_LEARNING_RATE: f64 = 0.001;
pub const DEFAULT_BATCH_SIZE: usize = 32;
pub const MIN_BATCH_SIZE: usize = 1;
pub const MAX_BATCH_SIZE: usize = 512;
pub const DEFAULT_EPOCHS: usize = 10;
pub const MIN_EPOCHS: usize = 1;

/// Bounds of the log10 learning-rate slider (1e-5 ..= 1e-1).
pub const LEARNING_RATE_LOG10_MIN: f64 = -5.0;
pub const LEARNING_RATE_LOG10_MAX: f64 = -1.0;
