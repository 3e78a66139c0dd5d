use std::io::{self, Write};
use std::thread;

use clap::Parser;
use tokio::sync::oneshot;
use tracing::info;

use mandelbrot_area::{
    AreaEstimate, AreaEstimator, Args, Config, RngSource, compose_frame, init_tracing,
    parse_sample_count, run_window, save_png,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = Config::resolve(Args::parse())?;
    let estimator = config.estimator()?;
    let mandelbrot = config.render_mandelbrot()?;
    let (width, height) = config.dimensions();

    let samples = match config.samples {
        Some(n) => n,
        None => prompt_sample_count()?,
    };
    let seed = config.seed;
    info!(samples, ?seed, width, height, "starting");

    if config.png.is_some() || config.json {
        let estimate =
            tokio::task::spawn_blocking(move || run_estimate(&estimator, samples, seed)).await??;

        if config.json {
            println!("{}", serde_json::to_string_pretty(&estimate)?);
        } else {
            println!("area:  {:.5}", estimate.area);
            println!("error: {:.5}", estimate.standard_error);
        }

        if let Some(path) = &config.png {
            let frame = compose_frame(&config.viewport, width, height, &mandelbrot, &estimate)?;
            save_png(&frame, path)?;
        }
        return Ok(());
    }

    // Estimate off the UI thread so the window can show "loading" first
    let (tx, rx) = oneshot::channel();
    thread::spawn(move || {
        let _ = tx.send(run_estimate(&estimator, samples, seed));
    });

    let viewport = config.viewport;
    tokio::task::block_in_place(|| run_window(viewport, width, height, mandelbrot, rx))?;
    Ok(())
}

fn run_estimate(
    estimator: &AreaEstimator,
    samples: usize,
    seed: Option<u64>,
) -> mandelbrot_area::Result<AreaEstimate> {
    match seed {
        Some(seed) => estimator.estimate_with(samples, &mut RngSource::seeded(seed)),
        None => estimator.estimate(samples),
    }
}

fn prompt_sample_count() -> Result<usize, Box<dyn std::error::Error>> {
    loop {
        println!("How many points to generate to calculate area?");
        print!("1000+ points recommended, however it can take some time: ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            return Err("no sample count given".into());
        }

        match parse_sample_count(&input) {
            Ok(n) => return Ok(n),
            Err(e) => println!("{}\n", e),
        }
    }
}
