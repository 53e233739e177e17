//! Recorded per-tick input and its file format.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use anyhow::{Context, Result, ensure};
use beat_rule::InputSample;
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use serde::{Deserialize, Serialize};

/// Input of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputFrame {
    pub time_us: i64,
    pub sample: InputSample,
}

/// Every tick of one play, in time order.
///
/// Stored as JSON; paths ending in `.gz` are gzip-compressed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputLog {
    #[serde(default = "default_player")]
    pub player: u8,
    #[serde(default)]
    pub frames: Vec<InputFrame>,
}

fn default_player() -> u8 {
    1
}

impl Default for InputLog {
    fn default() -> Self {
        Self::new(default_player())
    }
}

impl InputLog {
    pub fn new(player: u8) -> Self {
        Self {
            player,
            frames: Vec::new(),
        }
    }

    pub fn push(&mut self, time_us: i64, sample: InputSample) {
        self.frames.push(InputFrame { time_us, sample });
    }

    pub fn frames(&self) -> &[InputFrame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Time of the last frame.
    pub fn end_time_us(&self) -> Option<i64> {
        self.frames.last().map(|frame| frame.time_us)
    }

    /// Frame times must be non-decreasing.
    pub fn validate(&self) -> Result<()> {
        for (i, pair) in self.frames.windows(2).enumerate() {
            ensure!(
                pair[1].time_us >= pair[0].time_us,
                "frame {} at {} us is earlier than the frame before it ({} us)",
                i + 1,
                pair[1].time_us,
                pair[0].time_us
            );
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let log: Self = serde_json::from_str(json).context("Failed to parse input log")?;
        log.validate()?;
        Ok(log)
    }

    pub fn read(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open input log: {}", path.display()))?;
        let mut json = String::new();
        if is_compressed(path) {
            GzDecoder::new(BufReader::new(file))
                .read_to_string(&mut json)
                .with_context(|| format!("Failed to decompress input log: {}", path.display()))?;
        } else {
            BufReader::new(file)
                .read_to_string(&mut json)
                .with_context(|| format!("Failed to read input log: {}", path.display()))?;
        }
        Self::from_json_str(&json).with_context(|| format!("Invalid input log: {}", path.display()))
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_vec(self).context("Failed to serialize input log")?;
        let file = File::create(path)
            .with_context(|| format!("Failed to create input log: {}", path.display()))?;
        let writer = BufWriter::new(file);

        if is_compressed(path) {
            let mut encoder = GzEncoder::new(writer, Compression::default());
            encoder
                .write_all(&json)
                .context("Failed to write compressed data")?;
            encoder
                .finish()
                .context("Failed to finish compression")?
                .flush()
                .context("Failed to flush input log")?;
        } else {
            let mut writer = writer;
            writer.write_all(&json).context("Failed to write input log")?;
            writer.flush().context("Failed to flush input log")?;
        }
        Ok(())
    }
}

fn is_compressed(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}
