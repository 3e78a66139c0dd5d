// PNG export for rendered frames, used when no window is wanted

use ::image::RgbaImage;
use std::path::Path;
use tracing::info;

use crate::error::{Error, Result};
use crate::render::PixelField;

/// Convert a pixel field into an RGBA image buffer
pub fn to_image(field: &PixelField) -> Result<RgbaImage> {
    let (width, height) = dimensions(field)?;
    RgbaImage::from_raw(width, height, field.to_rgba()).ok_or_else(|| {
        Error::InvalidConfiguration(format!("raster {}x{} does not fit its buffer", width, height))
    })
}

/// Save a pixel field as PNG (format chosen from the extension)
pub fn save_png<P: AsRef<Path>>(field: &PixelField, path: P) -> Result<()> {
    let path = path.as_ref();
    to_image(field)?.save(path)?;
    info!(path = %path.display(), width = field.width(), height = field.height(), "frame written");
    Ok(())
}

fn dimensions(field: &PixelField) -> Result<(u32, u32)> {
    let width = u32::try_from(field.width())
        .map_err(|_| Error::InvalidConfiguration("raster too wide".to_string()))?;
    let height = u32::try_from(field.height())
        .map_err(|_| Error::InvalidConfiguration("raster too tall".to_string()))?;
    Ok((width, height))
}
