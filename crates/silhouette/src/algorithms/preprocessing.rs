use image::GrayImage;
use imageproc::contrast::ThresholdType;

use crate::{error::Result, traits::ImagePreprocessor};

/// Binarizes the intensity image at a fixed cutoff. Contour tracing
/// treats every non-zero pixel as foreground, so this is the stage that
/// decides where silhouette boundaries fall.
#[derive(Debug, Clone)]
pub struct ThresholdPreprocessor {
    pub threshold: u8,
}

impl Default for ThresholdPreprocessor {
    fn default() -> Self {
        Self { threshold: 128 }
    }
}

impl ImagePreprocessor for ThresholdPreprocessor {
    fn preprocess(&self, image: &GrayImage) -> Result<GrayImage> {
        Ok(imageproc::contrast::threshold(
            image,
            self.threshold,
            ThresholdType::Binary,
        ))
    }
}

/// Gaussian blur for depth noise suppression ahead of thresholding.
#[derive(Debug, Clone)]
pub struct GaussianBlurPreprocessor {
    pub sigma: f32,
}

impl Default for GaussianBlurPreprocessor {
    fn default() -> Self {
        Self { sigma: 1.0 }
    }
}

impl ImagePreprocessor for GaussianBlurPreprocessor {
    fn preprocess(&self, image: &GrayImage) -> Result<GrayImage> {
        Ok(imageproc::filter::gaussian_blur_f32(image, self.sigma))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn threshold_binarizes() {
        let mut img = GrayImage::new(2, 1);
        img.put_pixel(0, 0, Luma([100u8]));
        img.put_pixel(1, 0, Luma([200u8]));

        let out = ThresholdPreprocessor { threshold: 128 }
            .preprocess(&img)
            .unwrap();
        assert_eq!(out.get_pixel(0, 0)[0], 0);
        assert_eq!(out.get_pixel(1, 0)[0], 255);
    }
}
