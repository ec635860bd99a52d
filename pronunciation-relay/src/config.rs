//! Runtime configuration for pronunciation-relay
//!
//! Settings are resolved once at startup (command line first, then
//! environment) into an immutable [`RelayConfig`] that handlers receive
//! through application state.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Region used when `AZURE_SPEECH_REGION` is not set
pub const DEFAULT_REGION: &str = "canadaeast";

/// Largest audio download accepted (10 MiB)
pub const DEFAULT_MAX_AUDIO_BYTES: u64 = 10 * 1024 * 1024;

/// Command-line arguments for pronunciation-relay
#[derive(Parser, Debug, Clone)]
#[command(name = "pronunciation-relay")]
#[command(about = "Relays chat-platform audio to Azure pronunciation assessment")]
#[command(version)]
pub struct CliArgs {
    /// Azure Speech subscription key
    #[arg(long, env = "AZURE_SPEECH_KEY", hide_env_values = true)]
    pub speech_key: Option<String>,

    /// Azure Speech region (e.g. "canadaeast", "westus")
    #[arg(long, default_value = DEFAULT_REGION, env = "AZURE_SPEECH_REGION")]
    pub region: String,

    /// Base URL override for the speech endpoint
    #[arg(long, env = "AZURE_SPEECH_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Interface to listen on
    #[arg(long, default_value = "0.0.0.0", env = "HOST")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "5000", env = "PORT")]
    pub port: u16,

    /// Normalize downloads to 16 kHz mono PCM before assessment
    #[arg(
        long,
        default_value = "true",
        env = "RELAY_TRANSCODE",
        action = clap::ArgAction::Set
    )]
    pub transcode: bool,

    /// Transcoder executable
    #[arg(long, default_value = "ffmpeg", env = "FFMPEG_PATH")]
    pub ffmpeg_path: PathBuf,

    /// Maximum accepted audio download size in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_AUDIO_BYTES, env = "RELAY_MAX_AUDIO_BYTES")]
    pub max_audio_bytes: u64,
}

/// Immutable relay configuration
#[derive(Debug, Clone)]
pub struct RelayConfig {
    speech_key: Option<String>,
    pub region: String,
    pub endpoint: Option<String>,
    pub host: String,
    pub port: u16,
    pub transcode: bool,
    pub ffmpeg_path: PathBuf,
    pub max_audio_bytes: u64,
}

impl RelayConfig {
    /// Configuration with defaults and the given key; used by tests and embedders
    pub fn new(speech_key: Option<String>) -> Self {
        Self {
            speech_key,
            region: DEFAULT_REGION.to_string(),
            endpoint: None,
            host: "0.0.0.0".to_string(),
            port: 5000,
            transcode: true,
            ffmpeg_path: PathBuf::from("ffmpeg"),
            max_audio_bytes: DEFAULT_MAX_AUDIO_BYTES,
        }
    }

    /// Point the assessment client at a different host
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Enable or disable audio normalization
    pub fn with_transcode(mut self, transcode: bool) -> Self {
        self.transcode = transcode;
        self
    }

    /// Speech key, only if it is usable
    pub fn speech_key(&self) -> Option<&str> {
        self.speech_key.as_deref().filter(|key| is_valid_key(key))
    }

    pub fn is_speech_configured(&self) -> bool {
        self.speech_key().is_some()
    }

    /// Full assessment URL without query parameters
    pub fn assessment_url(&self) -> String {
        let base = match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://{}.stt.speech.microsoft.com", self.region),
        };
        format!("{base}/speech/recognition/conversation/cognitiveservices/v1")
    }

    pub fn listen_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

impl From<CliArgs> for RelayConfig {
    fn from(args: CliArgs) -> Self {
        Self {
            speech_key: args.speech_key,
            region: args.region,
            endpoint: args.endpoint,
            host: args.host,
            port: args.port,
            transcode: args.transcode,
            ffmpeg_path: args.ffmpeg_path,
            max_audio_bytes: args.max_audio_bytes,
        }
    }
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const ENV_VARS: &[&str] = &[
        "AZURE_SPEECH_KEY",
        "AZURE_SPEECH_REGION",
        "AZURE_SPEECH_ENDPOINT",
        "HOST",
        "PORT",
        "RELAY_TRANSCODE",
        "FFMPEG_PATH",
        "RELAY_MAX_AUDIO_BYTES",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_is_valid_key() {
        assert!(is_valid_key("abc123"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("   \t"));
    }

    #[test]
    #[serial]
    fn test_defaults_without_environment() {
        clear_env();
        let args = CliArgs::try_parse_from(["pronunciation-relay"]).unwrap();
        let config = RelayConfig::from(args);

        assert_eq!(config.region, "canadaeast");
        assert_eq!(config.port, 5000);
        assert_eq!(config.host, "0.0.0.0");
        assert!(config.transcode);
        assert_eq!(config.max_audio_bytes, DEFAULT_MAX_AUDIO_BYTES);
        assert!(!config.is_speech_configured());
    }

    #[test]
    #[serial]
    fn test_environment_is_read() {
        clear_env();
        std::env::set_var("AZURE_SPEECH_KEY", "env-key");
        std::env::set_var("AZURE_SPEECH_REGION", "westus");
        std::env::set_var("PORT", "8080");
        std::env::set_var("RELAY_TRANSCODE", "false");

        let args = CliArgs::try_parse_from(["pronunciation-relay"]).unwrap();
        clear_env();
        let config = RelayConfig::from(args);

        assert_eq!(config.speech_key(), Some("env-key"));
        assert_eq!(config.region, "westus");
        assert_eq!(config.port, 8080);
        assert!(!config.transcode);
    }

    #[test]
    #[serial]
    fn test_flags_override_environment() {
        clear_env();
        std::env::set_var("PORT", "8080");

        let args =
            CliArgs::try_parse_from(["pronunciation-relay", "--port", "9000", "--region", "eastus"])
                .unwrap();
        clear_env();

        assert_eq!(args.port, 9000);
        assert_eq!(args.region, "eastus");
    }

    #[test]
    fn test_whitespace_key_is_not_configured() {
        let config = RelayConfig::new(Some("  ".to_string()));
        assert!(!config.is_speech_configured());
        assert_eq!(config.speech_key(), None);
    }

    #[test]
    fn test_assessment_url_uses_region() {
        let config = RelayConfig::new(Some("k".to_string()));
        assert_eq!(
            config.assessment_url(),
            "https://canadaeast.stt.speech.microsoft.com/speech/recognition/conversation/cognitiveservices/v1"
        );
    }

    #[test]
    fn test_assessment_url_uses_endpoint_override() {
        let config = RelayConfig::new(None).with_endpoint("http://127.0.0.1:9999/");
        assert_eq!(
            config.assessment_url(),
            "http://127.0.0.1:9999/speech/recognition/conversation/cognitiveservices/v1"
        );
    }

    #[test]
    fn test_listen_addr() {
        let config = RelayConfig::new(None);
        assert_eq!(config.listen_addr().unwrap().port(), 5000);
    }
}
