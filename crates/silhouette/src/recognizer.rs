//! Recognition flow: re-extract silhouettes per frame and match them
//! against every learned object in the store, publishing the accepted
//! matches downstream. Stateless across frames.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    algorithms::descriptor::describe,
    error::Result,
    overlay,
    pipeline::ExtractionPipeline,
    store::LearnedObject,
    traits::{FrameSource, OverlaySink, RecognitionSink, SilhouetteMatcher},
    types::Silhouette,
};

/// A learned object re-detected in the current frame. Angle and center
/// are recomputed on the matched candidate, not copied from the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recognition {
    pub name: String,
    pub candidate: usize,
    pub score: f64,
    pub angle: f64,
    pub center: (f64, f64),
}

/// Matches stored objects against frame candidates under a dissimilarity
/// ceiling. The matcher itself never rejects; the ceiling is this
/// caller's policy.
pub struct Recognizer {
    matcher: Box<dyn SilhouetteMatcher>,
    max_dissimilarity: f64,
}

impl Recognizer {
    pub fn new(matcher: Box<dyn SilhouetteMatcher>, max_dissimilarity: f64) -> Self {
        Self {
            matcher,
            max_dissimilarity,
        }
    }

    /// For each learned object, find its best candidate in the frame and
    /// keep it when the score clears the ceiling.
    pub fn recognize(
        &self,
        objects: &[LearnedObject],
        candidates: &[Silhouette],
    ) -> Vec<Recognition> {
        let mut recognitions = Vec::new();
        for object in objects {
            let Some(m) = self.matcher.find_best_match(&object.contour, candidates) else {
                continue;
            };
            if m.score > self.max_dissimilarity {
                debug!(name = %object.name, score = m.score, "best match over ceiling, dropped");
                continue;
            }
            let live = describe(&candidates[m.index]);
            recognitions.push(Recognition {
                name: object.name.clone(),
                candidate: m.index,
                score: m.score,
                angle: live.angle,
                center: live.centroid,
            });
        }
        recognitions
    }
}

/// Per-frame recognition loop: convert, extract, recognize, publish.
/// The annotated frame is re-emitted to the overlay sink for debugging.
pub struct RecognizeSession<F, O, S>
where
    F: FrameSource,
    O: OverlaySink,
    S: RecognitionSink,
{
    recognizer: Recognizer,
    pipeline: ExtractionPipeline,
    objects: Vec<LearnedObject>,
    frames: F,
    overlay: O,
    sink: S,
    highlight_color: [u8; 3],
}

impl<F, O, S> RecognizeSession<F, O, S>
where
    F: FrameSource,
    O: OverlaySink,
    S: RecognitionSink,
{
    pub fn new(
        recognizer: Recognizer,
        pipeline: ExtractionPipeline,
        objects: Vec<LearnedObject>,
        frames: F,
        overlay: O,
        sink: S,
    ) -> Self {
        Self {
            recognizer,
            pipeline,
            objects,
            frames,
            overlay,
            sink,
            highlight_color: [0, 255, 0],
        }
    }

    pub fn run(&mut self) -> Result<()> {
        info!(objects = self.objects.len(), "recognize session started");
        if self.objects.is_empty() {
            warn!("object store is empty, nothing can be recognized");
        }
        while let Some(frame) = self.frames.next_frame()? {
            let image = match frame.to_intensity() {
                Ok(image) => image,
                Err(err) => {
                    warn!(%err, "frame conversion failed, skipping frame");
                    continue;
                }
            };
            let candidates = self.pipeline.candidates(&image)?;
            let recognitions = self.recognizer.recognize(&self.objects, &candidates);

            let mut canvas = overlay::to_canvas(&image);
            for recognition in &recognitions {
                debug!(name = %recognition.name, score = recognition.score, "recognized");
                overlay::draw_silhouette(
                    &mut canvas,
                    &candidates[recognition.candidate],
                    self.highlight_color,
                );
                overlay::draw_center(&mut canvas, recognition.center, self.highlight_color);
            }
            self.overlay.present(&canvas)?;
            self.sink.publish(&recognitions)?;
        }
        info!("recognize session ended");
        Ok(())
    }
}
