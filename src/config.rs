use std::error::Error as _;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::area::{AREA_ITERATION_LIMIT, AreaEstimator, SamplingRegion};
use crate::error::{Error, Result};
use crate::fractal::Mandelbrot;
use crate::render::{RENDER_ITERATION_LIMIT, Viewport};

// The canvas took 80% of the browser's inner height at 16:9. With no
// browser to ask, a 720px screen stands in for that height.
const SCREEN_HEIGHT: f64 = 720.0;
const SCREEN_PROPORTION: f64 = 0.8;
const ASPECT_RATIO: f64 = 16.0 / 9.0;

/// Command-line flags. Every flag overrides the config file.
#[derive(Parser, Debug, Default)]
#[command(name = "mandelbrot_area", about = "Estimate and draw the Mandelbrot set's area")]
pub struct Args {
    /// JSON config file, applied before the other flags
    #[arg(long, allow_hyphen_values = true)]
    pub config: Option<PathBuf>,
    /// Number of random points; prompted for when absent
    #[arg(long, value_parser = parse_sample_count)]
    pub samples: Option<usize>,
    /// Seed for reproducible sampling
    #[arg(long)]
    pub seed: Option<u64>,
    /// Iteration cap used to classify samples
    #[arg(long, allow_negative_numbers = true)]
    pub area_iterations: Option<f64>,
    /// Iteration cap used to color pixels
    #[arg(long, allow_negative_numbers = true)]
    pub render_iterations: Option<f64>,
    #[arg(long)]
    pub width: Option<usize>,
    #[arg(long)]
    pub height: Option<usize>,
    /// Write the frame to this PNG instead of opening a window
    #[arg(long, allow_hyphen_values = true)]
    pub png: Option<PathBuf>,
    /// Print the estimate as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Prompted for on stdin when absent.
    pub samples: Option<usize>,
    /// Whole numbers only; kept as `f64` so a fractional cap in a file is
    /// reported as a bad cap rather than a parse error.
    pub area_iterations: f64,
    pub render_iterations: f64,
    pub region: SamplingRegion,
    pub viewport: Viewport,
    pub width: Option<usize>,
    pub height: Option<usize>,
    /// Unseeded sampling when absent.
    pub seed: Option<u64>,
    /// Write the frame here instead of opening a window.
    pub png: Option<PathBuf>,
    pub json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            samples: None,
            area_iterations: AREA_ITERATION_LIMIT as f64,
            render_iterations: RENDER_ITERATION_LIMIT as f64,
            region: SamplingRegion::default(),
            viewport: Viewport::default(),
            width: None,
            height: None,
            seed: None,
            png: None,
            json: false,
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        let config = serde_json::from_str(&text)?;
        debug!(path = %path.as_ref().display(), "loaded config file");
        Ok(config)
    }

    /// Parses flags (without the program name) and resolves them.
    pub fn from_args<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let argv = std::iter::once(OsString::from("mandelbrot_area"))
            .chain(args.into_iter().map(Into::into));
        let args = Args::try_parse_from(argv).map_err(from_clap)?;
        Config::resolve(args)
    }

    /// Defaults, then the `--config` file, then the remaining flags.
    pub fn resolve(args: Args) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if args.samples.is_some() {
            config.samples = args.samples;
        }
        if args.seed.is_some() {
            config.seed = args.seed;
        }
        if let Some(cap) = args.area_iterations {
            config.area_iterations = cap;
        }
        if let Some(cap) = args.render_iterations {
            config.render_iterations = cap;
        }
        if args.width.is_some() {
            config.width = args.width;
        }
        if args.height.is_some() {
            config.height = args.height;
        }
        if args.png.is_some() {
            config.png = args.png;
        }
        config.json |= args.json;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.estimator()?;
        self.render_mandelbrot()?;
        self.viewport.validate()?;
        if let Some(0) = self.samples {
            return Err(Error::InvalidArgument("sample count must be at least 1".to_string()));
        }
        let (width, height) = self.dimensions();
        if width == 0 || height == 0 {
            return Err(Error::InvalidConfiguration(format!(
                "raster must be non-empty, got {}x{}",
                width, height
            )));
        }
        Ok(())
    }

    pub fn estimator(&self) -> Result<AreaEstimator> {
        let mandelbrot = iteration_cap("area_iterations", self.area_iterations)?;
        AreaEstimator::new(self.region, mandelbrot.limit())
    }

    pub fn render_mandelbrot(&self) -> Result<Mandelbrot> {
        iteration_cap("render_iterations", self.render_iterations)
    }

    /// Missing sides follow the 16:9 canvas sizing.
    pub fn dimensions(&self) -> (usize, usize) {
        match (self.width, self.height) {
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) => (w, (w as f64 / ASPECT_RATIO).round() as usize),
            (None, Some(h)) => ((h as f64 * ASPECT_RATIO).round() as usize, h),
            (None, None) => {
                let h = SCREEN_HEIGHT * SCREEN_PROPORTION;
                ((h * ASPECT_RATIO).round() as usize, h.round() as usize)
            }
        }
    }
}

/// Parses a sample count typed by the user. Zero is rejected.
pub fn parse_sample_count(input: &str) -> Result<usize> {
    let count: usize = input.trim().parse().map_err(|_| {
        Error::InvalidArgument(format!("'{}' is not a whole number of points", input.trim()))
    })?;
    if count < 1 {
        return Err(Error::InvalidArgument("sample count must be at least 1".to_string()));
    }
    Ok(count)
}

fn iteration_cap(name: &str, value: f64) -> Result<Mandelbrot> {
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(Error::InvalidConfiguration(format!(
            "{} must be a whole number, got {}",
            name, value
        )));
    }
    // saturates outside i64, which try_from then rejects
    Mandelbrot::try_from(value as i64)
}

fn from_clap(err: clap::Error) -> Error {
    if let Some(Error::InvalidArgument(msg)) = err.source().and_then(|s| s.downcast_ref::<Error>()) {
        return Error::InvalidArgument(msg.clone());
    }
    Error::InvalidConfiguration(err.to_string())
}
