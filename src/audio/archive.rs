use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// Archival collaborator for the raw audio of a finished session.
#[async_trait]
pub trait AudioArchive: Send + Sync {
    /// Persist the accumulated PCM bytes of one session.
    async fn store(&self, meeting_id: &str, session_id: &str, pcm: &[u8]) -> Result<()>;
}

/// Archives session audio as 16-bit PCM WAV files under a root directory,
/// one subdirectory per meeting.
pub struct WavAudioArchive {
    root: PathBuf,
    sample_rate: u32,
    channels: u16,
}

impl WavAudioArchive {
    pub fn new(root: impl Into<PathBuf>, sample_rate: u32, channels: u16) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).context("Failed to create archive directory")?;

        Ok(Self {
            root,
            sample_rate,
            channels,
        })
    }
}

#[async_trait]
impl AudioArchive for WavAudioArchive {
    async fn store(&self, meeting_id: &str, session_id: &str, pcm: &[u8]) -> Result<()> {
        let timestamp = Utc::now().format("%Y%m%d-%H%M%S");
        let path = self
            .root
            .join(meeting_id)
            .join(format!("{}_{}.wav", session_id, timestamp));

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create meeting archive directory")?;
        }

        let spec = hound::WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut writer = hound::WavWriter::create(&path, spec)
            .with_context(|| format!("Failed to create WAV file: {:?}", path))?;

        for sample in pcm.chunks_exact(2) {
            writer
                .write_sample(i16::from_le_bytes([sample[0], sample[1]]))
                .context("Failed to write sample to WAV")?;
        }

        writer.finalize().context("Failed to finalize WAV file")?;

        info!(
            "Archived {} bytes of session audio to {:?}",
            pcm.len(),
            path
        );

        Ok(())
    }
}

/// Archive that drops audio. Used when archival is disabled.
pub struct DiscardArchive;

#[async_trait]
impl AudioArchive for DiscardArchive {
    async fn store(&self, _meeting_id: &str, _session_id: &str, _pcm: &[u8]) -> Result<()> {
        Ok(())
    }
}
