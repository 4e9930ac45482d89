pub mod error;
pub mod sequence;
pub mod config;
pub mod plot;
pub mod output;

pub use error::{SequenceError, ConfigError, OutputError};
pub use sequence::{
    SequenceGenerator, Sequences, generate, checked_bound, validate_bound,
    MIN_BOUND, Q_SEEDS, A_SEEDS
};
pub use config::{PlotConfig, Rgb, DEFAULT_BOUND};
pub use plot::{Canvas, Viewport, render};
pub use output::{save_image, show_window, to_rgb_image};
