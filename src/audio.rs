use crate::error::ReelError;
use crate::narration::DurationProvider;
use anyhow::{Context, Result};
use base64::Engine;
use std::fs::File;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Where a clip's narration audio lives
#[derive(Debug, Clone, PartialEq)]
pub enum NarrationSource {
    /// Audio embedded in a `data:` URI
    Inline { mime: String, bytes: Vec<u8> },
    File(PathBuf),
    Remote(String),
}

impl NarrationSource {
    pub fn parse(reference: &str) -> Result<Self, ReelError> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(ReelError::MalformedNarration("empty reference".into()));
        }

        if let Some(rest) = reference.strip_prefix("data:") {
            let (header, payload) = rest.split_once(',').ok_or_else(|| {
                ReelError::MalformedNarration("data URI has no payload".into())
            })?;
            let mime = header.strip_suffix(";base64").ok_or_else(|| {
                ReelError::MalformedNarration("data URI is not base64 encoded".into())
            })?;
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(payload)
                .map_err(|e| ReelError::MalformedNarration(format!("bad base64 payload: {}", e)))?;
            return Ok(NarrationSource::Inline {
                mime: mime.to_string(),
                bytes,
            });
        }

        if reference.starts_with("http://") || reference.starts_with("https://") {
            return Ok(NarrationSource::Remote(reference.to_string()));
        }

        let path = reference.strip_prefix("file://").unwrap_or(reference);
        Ok(NarrationSource::File(PathBuf::from(path)))
    }
}

fn extension_for_mime(mime: &str) -> Option<&'static str> {
    match mime {
        "audio/mp3" | "audio/mpeg" => Some("mp3"),
        "audio/wav" | "audio/wave" | "audio/x-wav" => Some("wav"),
        "audio/ogg" => Some("ogg"),
        "audio/flac" => Some("flac"),
        "audio/mp4" | "audio/aac" | "audio/x-m4a" => Some("m4a"),
        _ => None,
    }
}

/// Measures narration length by probing the audio with symphonia
#[derive(Debug, Clone, Default)]
pub struct SymphoniaProbe {
    base_path: PathBuf,
}

impl SymphoniaProbe {
    /// Relative file references resolve against `base_path`
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_path.join(path)
        }
    }

    /// Length in seconds of an audio file
    pub fn measure_file(&self, path: &Path) -> Result<f64> {
        let full_path = self.resolve_path(path);
        let src = File::open(&full_path)
            .with_context(|| format!("Failed to open audio file: {}", full_path.display()))?;
        let mss = MediaSourceStream::new(Box::new(src), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = full_path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }
        Self::measure_stream(mss, hint)
    }

    /// Length in seconds of in-memory audio
    pub fn measure_bytes(&self, mime: &str, bytes: Vec<u8>) -> Result<f64> {
        let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes)), Default::default());

        let mut hint = Hint::new();
        hint.mime_type(mime);
        if let Some(ext) = extension_for_mime(mime) {
            hint.with_extension(ext);
        }
        Self::measure_stream(mss, hint)
    }

    fn measure_stream(mss: MediaSourceStream, hint: Hint) -> Result<f64> {
        let meta_opts: MetadataOptions = Default::default();
        let fmt_opts: FormatOptions = Default::default();

        let probed = symphonia::default::get_probe()
            .format(&hint, mss, &fmt_opts, &meta_opts)
            .context("Unsupported audio format")?;

        let mut format = probed.format;
        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .context("No supported audio track found")?;

        // Containers that record their length need no decoding
        if let (Some(frames), Some(rate)) = (track.codec_params.n_frames, track.codec_params.sample_rate) {
            if rate > 0 {
                return Ok(frames as f64 / rate as f64);
            }
        }

        let dec_opts: DecoderOptions = Default::default();
        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &dec_opts)
            .context("Unsupported codec")?;

        let track_id = track.id;
        let mut sample_rate = track.codec_params.sample_rate.unwrap_or(0);
        let mut total_frames: u64 = 0;

        while let Ok(packet) = format.next_packet() {
            if packet.track_id() != track_id {
                continue;
            }

            match decoder.decode(&packet) {
                Ok(decoded) => {
                    sample_rate = decoded.spec().rate;
                    total_frames += decoded.frames() as u64;
                }
                Err(e) => {
                    log::warn!("stopped decoding narration early: {}", e);
                    break;
                }
            }
        }

        if sample_rate == 0 {
            anyhow::bail!("Audio stream has no sample rate");
        }
        Ok(total_frames as f64 / sample_rate as f64)
    }
}

impl DurationProvider for SymphoniaProbe {
    fn measure(&self, source: &NarrationSource) -> Result<f64> {
        match source {
            NarrationSource::Inline { mime, bytes } => self.measure_bytes(mime, bytes.clone()),
            NarrationSource::File(path) => self.measure_file(path),
            NarrationSource::Remote(url) => {
                anyhow::bail!("Remote narration is not fetched: {}", url)
            }
        }
    }
}
