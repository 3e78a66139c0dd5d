pub mod area;
pub mod config;
pub mod error;
pub mod fractal;
pub mod image;
pub mod logging;
pub mod math;
pub mod overlay;
pub mod palette;
pub mod random;
pub mod render;
pub mod visualizer;

pub use area::{AreaEstimate, AreaEstimator, SamplingRegion, count_inside, generate_sample_batch};
pub use config::{Args, Config, parse_sample_count};
pub use error::{Error, Result};
pub use fractal::{ESCAPE_RADIUS, IterationResult, Mandelbrot};
pub use self::image::save_png;
pub use logging::init_tracing;
pub use math::Complex;
pub use palette::{Hsv, Rgb, assign_hsv, hsv_to_rgb};
pub use random::{RngSource, UniformSource, uniform_in};
pub use render::{PixelField, Viewport};
pub use visualizer::{compose_frame, run_window};
