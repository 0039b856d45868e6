//! Character Progression & Stats Composition.

mod accumulator;
mod pipeline;

pub use accumulator::StatAccumulator;
pub use pipeline::{compose_stats, path_bias_favors_magic, ComposedStats};
