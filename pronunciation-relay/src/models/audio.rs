//! Downloaded audio and its encoding

/// Content type sent when the download did not declare one
pub const DEFAULT_SOURCE_CONTENT_TYPE: &str = "audio/ogg; codecs=opus";

/// Content type for normalized 16 kHz mono PCM WAV
pub const PCM_CONTENT_TYPE: &str = "audio/wav; codecs=audio/pcm; samplerate=16000";

/// Normalized sample rate
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// Encoding of an [`AudioPayload`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioEncoding {
    /// Bytes exactly as downloaded
    Source { content_type: Option<String> },
    /// 16 kHz, mono, 16-bit PCM WAV
    Pcm16kMono,
}

/// Audio bytes for one assessment
///
/// Created by the fetcher and consumed once by the assessment client.
#[derive(Debug, Clone)]
pub struct AudioPayload {
    pub bytes: Vec<u8>,
    pub encoding: AudioEncoding,
}

impl AudioPayload {
    pub fn source(bytes: Vec<u8>, content_type: Option<String>) -> Self {
        Self {
            bytes,
            encoding: AudioEncoding::Source { content_type },
        }
    }

    pub fn pcm(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            encoding: AudioEncoding::Pcm16kMono,
        }
    }

    /// Content-Type header value for the assessment upload
    pub fn content_type(&self) -> &str {
        match &self.encoding {
            AudioEncoding::Pcm16kMono => PCM_CONTENT_TYPE,
            AudioEncoding::Source { content_type } => content_type
                .as_deref()
                .filter(|ct| ct.starts_with("audio/"))
                .unwrap_or(DEFAULT_SOURCE_CONTENT_TYPE),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn is_normalized(&self) -> bool {
        self.encoding == AudioEncoding::Pcm16kMono
    }
}

/// True if `bytes` is a WAV with 16 kHz, mono, 16-bit integer samples
pub fn is_normalized_wav(bytes: &[u8]) -> bool {
    match hound::WavReader::new(std::io::Cursor::new(bytes)) {
        Ok(reader) => {
            let spec = reader.spec();
            spec.sample_rate == TARGET_SAMPLE_RATE
                && spec.channels == 1
                && spec.bits_per_sample == 16
                && spec.sample_format == hound::SampleFormat::Int
        }
        Err(_) => false,
    }
}
