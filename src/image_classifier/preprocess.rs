use image::{imageops, DynamicImage};
use tract_onnx::prelude::*;

/// Where the channel axis sits in the model input. Keras exports are
/// channels-last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelLayout {
    Nhwc,
    Nchw,
}

impl ChannelLayout {
    pub fn input_shape(&self, target_size: [u32; 2]) -> [usize; 4] {
        let [width, height] = target_size;
        let (width, height) = (width as usize, height as usize);
        match self {
            ChannelLayout::Nhwc => [1, height, width, 3],
            ChannelLayout::Nchw => [1, 3, height, width],
        }
    }
}

/// Resizes to exactly `target_size` (width, height), drops alpha and scales
/// every channel into `[0, 1]`.
pub fn image_to_tensor(image: &DynamicImage, target_size: [u32; 2], layout: ChannelLayout) -> Tensor {
    let [width, height] = target_size;
    let rgb = image
        .resize_exact(width, height, imageops::FilterType::CatmullRom)
        .to_rgb8();

    let shape = layout.input_shape(target_size);
    let array = match layout {
        ChannelLayout::Nhwc => tract_ndarray::Array4::from_shape_fn(
            (shape[0], shape[1], shape[2], shape[3]),
            |(_, y, x, c)| rgb.get_pixel(x as u32, y as u32)[c] as f32 / 255.0,
        ),
        ChannelLayout::Nchw => tract_ndarray::Array4::from_shape_fn(
            (shape[0], shape[1], shape[2], shape[3]),
            |(_, c, y, x)| rgb.get_pixel(x as u32, y as u32)[c] as f32 / 255.0,
        ),
    };

    array.into_tensor()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb, Rgba};

    fn solid_rgb(width: u32, height: u32, color: [u8; 3]) -> DynamicImage {
        let mut img = ImageBuffer::new(width, height);
        for pixel in img.pixels_mut() {
            *pixel = Rgb(color);
        }
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn test_nhwc_shape_and_channels() {
        let image = solid_rgb(100, 100, [255, 0, 0]);

        let tensor = image_to_tensor(&image, [48, 48], ChannelLayout::Nhwc);
        assert_eq!(tensor.shape(), &[1, 48, 48, 3]);

        let slice = tensor.as_slice::<f32>().unwrap();
        // Channels are interleaved per pixel.
        assert_eq!(slice[0], 1.0);
        assert_eq!(slice[1], 0.0);
        assert_eq!(slice[2], 0.0);
    }

    #[test]
    fn test_nchw_shape_and_channels() {
        let image = solid_rgb(100, 100, [255, 0, 0]);

        let tensor = image_to_tensor(&image, [32, 32], ChannelLayout::Nchw);
        assert_eq!(tensor.shape(), &[1, 3, 32, 32]);

        let slice = tensor.as_slice::<f32>().unwrap();
        assert_eq!(slice[0], 1.0);
        assert_eq!(slice[32 * 32], 0.0);
        assert_eq!(slice[2 * 32 * 32], 0.0);
    }

    #[test]
    fn test_non_square_target_uses_width_then_height() {
        let image = solid_rgb(200, 100, [10, 20, 30]);

        let tensor = image_to_tensor(&image, [64, 16], ChannelLayout::Nhwc);
        assert_eq!(tensor.shape(), &[1, 16, 64, 3]);
    }

    #[test]
    fn test_normalization() {
        let image = solid_rgb(100, 100, [128, 128, 128]);

        let tensor = image_to_tensor(&image, [48, 48], ChannelLayout::Nhwc);
        let slice = tensor.as_slice::<f32>().unwrap();

        let expected = 128.0 / 255.0;
        assert!(slice.iter().all(|value| (value - expected).abs() < 0.0001));
    }

    #[test]
    fn test_alpha_is_dropped() {
        let mut img = ImageBuffer::new(60, 60);
        for pixel in img.pixels_mut() {
            *pixel = Rgba([0, 255, 0, 255]);
        }
        let image = DynamicImage::ImageRgba8(img);

        let tensor = image_to_tensor(&image, [48, 48], ChannelLayout::Nchw);
        assert_eq!(tensor.shape(), &[1, 3, 48, 48]);

        let slice = tensor.as_slice::<f32>().unwrap();
        assert_eq!(slice[48 * 48], 1.0);
    }
}
