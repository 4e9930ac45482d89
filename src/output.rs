// Canvas sinks: PNG files through `image`, an interactive window through `minifb`.

use crate::config::Rgb;
use crate::error::OutputError;
use crate::plot::Canvas;
use image::RgbImage;
use minifb::{Key, ScaleMode, Window, WindowOptions};
use std::path::Path;

/// Convert the canvas into an 8-bit RGB image.
pub fn to_rgb_image(canvas: &Canvas) -> Result<RgbImage, OutputError> {
    let (width, height) = (canvas.width(), canvas.height());
    let size_err = || OutputError::CanvasSize { width, height };
    let w = u32::try_from(width).map_err(|_| size_err())?;
    let h = u32::try_from(height).map_err(|_| size_err())?;

    let mut bytes = Vec::with_capacity(width * height * 3);
    for &pixel in canvas.pixels() {
        let Rgb { r, g, b } = Rgb::from_u32(pixel);
        bytes.extend_from_slice(&[r, g, b]);
    }
    RgbImage::from_raw(w, h, bytes).ok_or_else(size_err)
}

/// Encode the canvas to `path`; the format follows the file extension.
pub fn save_image<P: AsRef<Path>>(canvas: &Canvas, path: P) -> Result<(), OutputError> {
    let path = path.as_ref();
    to_rgb_image(canvas)?.save(path)?;
    tracing::info!(path = %path.display(), "plot written");
    Ok(())
}

/// Show the canvas until the window is closed or Escape is pressed.
/// Blocks the calling thread.
pub fn show_window(canvas: &Canvas, title: &str) -> Result<(), OutputError> {
    let (width, height) = (canvas.width(), canvas.height());
    let mut window = Window::new(
        title,
        width,
        height,
        WindowOptions {
            resize: true,
            scale_mode: ScaleMode::AspectRatioStretch,
            ..WindowOptions::default()
        },
    )?;

    window.set_target_fps(30);
    tracing::debug!(width, height, "window opened");

    while window.is_open() && !window.is_key_down(Key::Escape) {
        window.update_with_buffer(canvas.pixels(), width, height)?;
    }
    Ok(())
}
