use image::GrayImage;

use crate::{
    algorithms::{ImageprocContourExtractor, ThresholdPreprocessor},
    algorithms::extraction::Boundary,
    error::Result,
    traits::{ContourExtractor, ImagePreprocessor},
    types::Silhouette,
};

/// Preprocessing stages followed by a boundary trace: the frame-to-
/// candidates step both the learn and recognize flows run per frame.
pub struct ExtractionPipeline {
    preprocessors: Vec<Box<dyn ImagePreprocessor>>,
    extractor: Box<dyn ContourExtractor>,
}

impl ExtractionPipeline {
    pub fn builder() -> ExtractionPipelineBuilder {
        ExtractionPipelineBuilder::new()
    }

    pub fn new(
        preprocessors: Vec<Box<dyn ImagePreprocessor>>,
        extractor: Box<dyn ContourExtractor>,
    ) -> Self {
        Self {
            preprocessors,
            extractor,
        }
    }

    /// Run the full pass. Pure over the input buffer; an image with no
    /// foreground yields an empty list, not an error.
    pub fn process(&self, image: &GrayImage) -> Result<Vec<Boundary>> {
        let mut processed = image.clone();
        for preprocessor in &self.preprocessors {
            processed = preprocessor.preprocess(&processed)?;
        }
        self.extractor.extract(&processed)
    }

    /// Like `process`, discarding hierarchy ranks: the candidate list
    /// the learner and recognizer consume.
    pub fn candidates(&self, image: &GrayImage) -> Result<Vec<Silhouette>> {
        Ok(self
            .process(image)?
            .into_iter()
            .map(Boundary::into_silhouette)
            .collect())
    }
}

/// Builder with the defaults the original flow used: binarize at
/// mid-range, trace every boundary.
pub struct ExtractionPipelineBuilder {
    preprocessors: Vec<Box<dyn ImagePreprocessor>>,
    extractor: Option<Box<dyn ContourExtractor>>,
}

impl ExtractionPipelineBuilder {
    pub fn new() -> Self {
        Self {
            preprocessors: Vec::new(),
            extractor: None,
        }
    }

    pub fn add_preprocessor<P>(mut self, preprocessor: P) -> Self
    where
        P: ImagePreprocessor + 'static,
    {
        self.preprocessors.push(Box::new(preprocessor));
        self
    }

    pub fn set_extractor<E>(mut self, extractor: E) -> Self
    where
        E: ContourExtractor + 'static,
    {
        self.extractor = Some(Box::new(extractor));
        self
    }

    pub fn build(self) -> ExtractionPipeline {
        let mut preprocessors = self.preprocessors;
        if preprocessors.is_empty() {
            preprocessors.push(Box::new(ThresholdPreprocessor::default()));
        }
        let extractor = self
            .extractor
            .unwrap_or_else(|| Box::new(ImageprocContourExtractor::default()));
        ExtractionPipeline::new(preprocessors, extractor)
    }
}

impl Default for ExtractionPipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn frame_with_square() -> GrayImage {
        let mut img = GrayImage::new(64, 64);
        for y in 20..40 {
            for x in 20..40 {
                img.put_pixel(x, y, Luma([200u8]));
            }
        }
        img
    }

    #[test]
    fn default_pipeline_finds_the_square() {
        let pipeline = ExtractionPipeline::builder().build();
        let candidates = pipeline.candidates(&frame_with_square()).unwrap();
        assert_eq!(candidates.len(), 1);
        assert!(candidates[0].len() >= 4);
    }

    #[test]
    fn saturated_image_yields_no_candidates() {
        let img = GrayImage::from_pixel(16, 16, Luma([255u8]));
        let pipeline = ExtractionPipeline::builder().build();
        let candidates = pipeline.candidates(&img).unwrap();
        assert!(candidates.is_empty());
    }
}
