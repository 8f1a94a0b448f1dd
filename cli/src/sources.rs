//! File- and terminal-backed collaborator implementations: frames from
//! an image directory, keys and names from stdin lines, overlays to
//! numbered PNGs, recognitions to JSON lines.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use image::RgbImage;
use silhouette::{
    DepthFrame, FrameSource, KeyPress, KeySource, NameSource, OverlaySink, Recognition,
    RecognitionSink, Result,
};
use tracing::info;

use crate::CliError;

const FRAME_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "pgm", "bmp"];

/// Replays a sorted directory of grayscale images as the depth stream;
/// intensities map to depth as `pixel / 255`.
pub struct ImageDirFrameSource {
    files: VecDeque<PathBuf>,
}

impl ImageDirFrameSource {
    pub fn new(dir: &Path) -> std::result::Result<Self, CliError> {
        let mut files: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.extension()
                    .and_then(|e| e.to_str())
                    .map(|e| FRAME_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
                    .unwrap_or(false)
            })
            .collect();
        files.sort();
        if files.is_empty() {
            return Err(CliError::NoFrames(dir.display().to_string()));
        }
        info!(count = files.len(), dir = %dir.display(), "frame replay ready");
        Ok(Self {
            files: files.into(),
        })
    }
}

impl FrameSource for ImageDirFrameSource {
    fn next_frame(&mut self) -> Result<Option<DepthFrame>> {
        let Some(path) = self.files.pop_front() else {
            return Ok(None);
        };
        let gray = image::open(&path)?.to_luma8();
        let data: Vec<f32> = gray.as_raw().iter().map(|&p| p as f32 / 255.0).collect();
        let frame = DepthFrame::new(gray.width(), gray.height(), data)?;
        Ok(Some(frame))
    }
}

type LineReceiver = Rc<RefCell<mpsc::Receiver<String>>>;

/// Stdin-backed operator input: one background thread reads lines and
/// both the key source and the name source drain the same channel, so
/// the key poll never swallows a typed object name. The session is
/// single-threaded, so only one of the two is ever waiting.
///
/// Keys are typed as a letter followed by Enter; `esc` or `q` (or end
/// of input) quits.
pub fn terminal_input() -> (TerminalKeys, TerminalNames) {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    let shared: LineReceiver = Rc::new(RefCell::new(rx));
    (TerminalKeys(shared.clone()), TerminalNames(shared))
}

pub struct TerminalKeys(LineReceiver);

impl KeySource for TerminalKeys {
    fn poll(&mut self, wait: Duration) -> KeyPress {
        match self.0.borrow().recv_timeout(wait) {
            Ok(line) => {
                let line = line.trim().to_ascii_lowercase();
                match line.as_str() {
                    "" => KeyPress::None,
                    "esc" | "q" => KeyPress::Escape,
                    other => KeyPress::Char(other.chars().next().unwrap_or(' ')),
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => KeyPress::None,
            // Stdin closed: treat as the quit signal.
            Err(mpsc::RecvTimeoutError::Disconnected) => KeyPress::Escape,
        }
    }
}

pub struct TerminalNames(LineReceiver);

impl NameSource for TerminalNames {
    fn read_name(&mut self) -> Result<String> {
        print!("Please enter a name for the object: ");
        io::stdout().flush()?;
        self.0.borrow().recv().map_err(|_| {
            io::Error::new(io::ErrorKind::UnexpectedEof, "input closed during name prompt")
                .into()
        })
    }
}

/// Writes each presented overlay frame as a numbered PNG.
pub struct PngOverlaySink {
    dir: PathBuf,
    index: u32,
}

impl PngOverlaySink {
    pub fn new(dir: PathBuf) -> std::result::Result<Self, CliError> {
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, index: 0 })
    }
}

impl OverlaySink for PngOverlaySink {
    fn present(&mut self, frame: &RgbImage) -> Result<()> {
        let path = self.dir.join(format!("frame_{:05}.png", self.index));
        self.index += 1;
        frame.save(&path)?;
        Ok(())
    }
}

/// Overlay destination chosen at startup: PNG directory or nothing.
pub enum OverlayOut {
    Png(PngOverlaySink),
    Discard,
}

impl OverlayOut {
    pub fn from_dir(dir: Option<PathBuf>) -> std::result::Result<Self, CliError> {
        match dir {
            Some(dir) => Ok(Self::Png(PngOverlaySink::new(dir)?)),
            None => Ok(Self::Discard),
        }
    }
}

impl OverlaySink for OverlayOut {
    fn present(&mut self, frame: &RgbImage) -> Result<()> {
        match self {
            Self::Png(sink) => sink.present(frame),
            Self::Discard => Ok(()),
        }
    }
}

/// Publishes recognitions as one JSON object per line.
pub struct JsonLineSink {
    out: Box<dyn Write>,
}

impl JsonLineSink {
    pub fn stdout() -> Self {
        Self {
            out: Box::new(io::stdout()),
        }
    }

    pub fn file(path: &Path) -> std::result::Result<Self, CliError> {
        Ok(Self {
            out: Box::new(fs::File::create(path)?),
        })
    }
}

impl RecognitionSink for JsonLineSink {
    fn publish(&mut self, recognitions: &[Recognition]) -> Result<()> {
        for recognition in recognitions {
            let line = serde_json::to_string(recognition)
                .map_err(silhouette::Error::Serialization)?;
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "silhouette-sources-{}-{}",
            std::process::id(),
            name
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn frame_source_replays_directory_in_order() {
        let dir = scratch_dir("frames");
        for (i, value) in [10u8, 200].iter().enumerate() {
            image::GrayImage::from_pixel(4, 4, image::Luma([*value]))
                .save(dir.join(format!("{i:03}.png")))
                .unwrap();
        }

        let mut source = ImageDirFrameSource::new(&dir).unwrap();
        let first = source.next_frame().unwrap().unwrap();
        let second = source.next_frame().unwrap().unwrap();
        assert!(source.next_frame().unwrap().is_none());

        // 10/255 < 200/255: order is the sorted file order.
        let a = first.to_intensity().unwrap();
        let b = second.to_intensity().unwrap();
        assert!(a.as_raw()[0] < b.as_raw()[0]);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn empty_directory_is_an_error() {
        let dir = scratch_dir("empty");
        assert!(matches!(
            ImageDirFrameSource::new(&dir),
            Err(CliError::NoFrames(_))
        ));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn overlay_sink_numbers_frames() {
        let dir = scratch_dir("overlay");
        let mut sink = PngOverlaySink::new(dir.clone()).unwrap();
        let frame = RgbImage::new(4, 4);
        sink.present(&frame).unwrap();
        sink.present(&frame).unwrap();
        assert!(dir.join("frame_00000.png").exists());
        assert!(dir.join("frame_00001.png").exists());
        fs::remove_dir_all(&dir).ok();
    }
}
