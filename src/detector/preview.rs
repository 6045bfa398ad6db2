use image::{imageops, DynamicImage, RgbaImage};

/// Box the uploaded image is scaled into for display.
pub const PREVIEW_BOX: (u32, u32) = (350, 350);

/// Largest size with the same aspect ratio that fits in the box. Small
/// images are scaled up.
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (0, 0);
    }
    let ratio = (max_width as f64 / width as f64).min(max_height as f64 / height as f64);
    let new_width = ((width as f64 * ratio) as u32).max(1);
    let new_height = ((height as f64 * ratio) as u32).max(1);
    (new_width, new_height)
}

pub fn make_preview(image: &DynamicImage) -> RgbaImage {
    let (width, height) = fit_within(image.width(), image.height(), PREVIEW_BOX.0, PREVIEW_BOX.1);
    image
        .resize_exact(width, height, imageops::FilterType::Lanczos3)
        .to_rgba8()
}

pub fn meets_min_side(width: u32, height: u32, min_side: u32) -> bool {
    width >= min_side && height >= min_side
}
