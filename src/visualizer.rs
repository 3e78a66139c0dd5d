use minifb::{Key, Window, WindowOptions};
use tokio::sync::oneshot;
use tracing::{info, warn};

use crate::area::AreaEstimate;
use crate::error::{Error, Result};
use crate::fractal::Mandelbrot;
use crate::overlay::{draw_loading, draw_panel};
use crate::palette::Rgb;
use crate::render::{PixelField, Viewport};

const TITLE: &str = "Mandelbrot set area";

/// The finished picture: the colored set with the result panel on top.
pub fn compose_frame(
    viewport: &Viewport,
    width: usize,
    height: usize,
    mandelbrot: &Mandelbrot,
    estimate: &AreaEstimate,
) -> Result<PixelField> {
    let mut field = PixelField::generate(viewport, width, height, mandelbrot)?;
    draw_panel(&mut field, estimate);
    Ok(field)
}

pub fn loading_frame(width: usize, height: usize) -> Result<PixelField> {
    let mut field = PixelField::filled(width, height, Rgb::BLACK)?;
    draw_loading(&mut field);
    Ok(field)
}

/// Opens a window showing "loading" until `pending` delivers the estimate,
/// then draws the set with the panel. Returns when the window closes.
pub fn run_window(
    viewport: Viewport,
    width: usize,
    height: usize,
    mandelbrot: Mandelbrot,
    mut pending: oneshot::Receiver<Result<AreaEstimate>>,
) -> Result<()> {
    let mut window = Window::new(TITLE, width, height, WindowOptions::default())
        .map_err(|e| Error::Window(e.to_string()))?;
    window.set_target_fps(30);
    info!(width, height, "window opened");

    let mut frame = loading_frame(width, height)?;
    let mut waiting = true;

    while window.is_open() && !window.is_key_down(Key::Escape) {
        if waiting {
            match pending.try_recv() {
                Ok(estimate) => {
                    frame = compose_frame(&viewport, width, height, &mandelbrot, &estimate?)?;
                    waiting = false;
                }
                Err(oneshot::error::TryRecvError::Empty) => {}
                Err(oneshot::error::TryRecvError::Closed) => {
                    warn!("estimate task ended without a result");
                    waiting = false;
                }
            }
        }

        window
            .update_with_buffer(frame.pixels(), frame.width(), frame.height())
            .map_err(|e| Error::Window(e.to_string()))?;
    }

    info!("window closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_carries_panel() {
        let viewport = Viewport::default();
        let mandelbrot = Mandelbrot::new(20);
        let estimate = AreaEstimate { area: 0.2, standard_error: 0.01 };

        let plain = PixelField::generate(&viewport, 160, 120, &mandelbrot).unwrap();
        let frame = compose_frame(&viewport, 160, 120, &mandelbrot, &estimate).unwrap();
        assert_eq!((frame.width(), frame.height()), (160, 120));
        assert_ne!(frame, plain);
        assert_eq!(frame.get(80, 10), plain.get(80, 10));
    }

    #[test]
    fn loading_frame_has_text() {
        let frame = loading_frame(200, 100).unwrap();
        assert!(frame.pixels().iter().any(|&p| p == Rgb::WHITE.to_u32()));
    }
}
