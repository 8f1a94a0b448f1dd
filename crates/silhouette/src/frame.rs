use std::time::{Duration, Instant};

use image::GrayImage;

use crate::error::{Error, Result};

/// Intensity scale applied when collapsing a depth frame to 8-bit. The
/// factor is fixed so that contour boundaries are reproducible across
/// runs for the same input.
const DEPTH_SCALE: f32 = 255.0;

/// A single-channel floating-point depth frame as delivered by the frame
/// source collaborator. Samples are row-major, nominally in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthFrame {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl DepthFrame {
    pub fn new(width: u32, height: u32, data: Vec<f32>) -> Result<Self> {
        if (width as usize) * (height as usize) != data.len() {
            return Err(Error::FrameSize {
                width,
                height,
                samples: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Collapse to an 8-bit intensity image: scale by 255, clamp to
    /// `[0, 255]`, truncate. A non-finite sample makes the whole frame
    /// unusable and is reported as a conversion error so the caller can
    /// log and skip the frame.
    pub fn to_intensity(&self) -> Result<GrayImage> {
        let mut pixels = Vec::with_capacity(self.data.len());
        for &v in &self.data {
            if !v.is_finite() {
                return Err(Error::FrameConversion(format!(
                    "non-finite depth sample {v}"
                )));
            }
            pixels.push((v * DEPTH_SCALE).clamp(0.0, 255.0) as u8);
        }
        GrayImage::from_raw(self.width, self.height, pixels).ok_or_else(|| {
            Error::FrameConversion("buffer does not match declared dimensions".into())
        })
    }
}

/// Serializes frame processing: a frame is admitted only if at least
/// `min_interval` has passed since the last admitted frame. Early frames
/// are dropped, not queued.
#[derive(Debug)]
pub struct FrameGate {
    min_interval: Duration,
    last_admitted: Option<Instant>,
}

impl FrameGate {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_admitted: None,
        }
    }

    pub fn admit(&mut self, now: Instant) -> bool {
        let ready = match self.last_admitted {
            Some(last) => now.saturating_duration_since(last) >= self.min_interval,
            None => true,
        };
        if ready {
            self.last_admitted = Some(now);
        }
        ready
    }
}
