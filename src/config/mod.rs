//! Configuration module
//!
//! Application and model configuration, persisted as TOML. Defaults are
//! defined in code so the tool runs without a config file.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpeechClipError};

/// Environment variable consulted when a provider entry has no API key
pub const API_KEY_ENV: &str = "SPEECHCLIP_API_KEY";

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory for clips, subtitles, and reports
    pub output_dir: PathBuf,
    /// Scratch directory for extracted audio
    pub temp_dir: PathBuf,
    /// Directory holding ASR model files
    pub models_dir: PathBuf,
    /// Recognized video file extensions
    pub video_extensions: Vec<String>,
    /// Recognized audio file extensions
    pub audio_extensions: Vec<String>,
    /// Worker thread budget for CPU-bound stages
    pub max_workers: usize,
    /// Override path to the ffmpeg binary
    pub ffmpeg_path: String,
    /// Override path to the ffprobe binary
    pub ffprobe_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            temp_dir: std::env::temp_dir().join("speechclip"),
            models_dir: PathBuf::from("models"),
            video_extensions: ["mp4", "avi", "mov", "mkv", "wmv"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            audio_extensions: ["wav", "mp3", "m4a", "flac", "wma"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_workers: default_max_workers(),
            ffmpeg_path: "ffmpeg".to_string(),
            ffprobe_path: "ffprobe".to_string(),
        }
    }
}

fn default_max_workers() -> usize {
    std::cmp::min(32, num_cpus::get() + 4)
}

/// ASR model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AsrConfig {
    /// Path to the Whisper GGUF model file
    pub model_path: PathBuf,
    /// Recognition language code
    pub language: String,
    /// Inference threads
    pub threads: usize,
    /// Translate output to English
    pub translate: bool,
    /// Hotwords used to bias decoding
    pub hotwords: Vec<String>,
}

impl Default for AsrConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/ggml-base.bin"),
            language: "en".to_string(),
            threads: default_max_workers().min(8),
            translate: false,
            hotwords: Vec::new(),
        }
    }
}

/// Speaker diarization configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiarizeConfig {
    /// Analysis window length in seconds
    pub window_secs: f64,
    /// Feature distance above which windows belong to different speakers
    pub change_threshold: f64,
    /// Upper bound on distinct speaker labels
    pub max_speakers: usize,
}

impl Default for DiarizeConfig {
    fn default() -> Self {
        Self {
            window_secs: 1.0,
            change_threshold: 0.35,
            max_speakers: 8,
        }
    }
}

/// A single LLM provider entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmProviderConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl LlmProviderConfig {
    /// API key from the config entry, falling back to the environment
    pub fn resolve_api_key(&self) -> Option<String> {
        if !self.api_key.is_empty() {
            return Some(self.api_key.clone());
        }
        std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty())
    }
}

/// Complete tool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub app: AppConfig,
    pub asr: AsrConfig,
    pub diarize: DiarizeConfig,
    /// Provider table keyed by name ("qwen", "openai", ...)
    pub llm: HashMap<String, LlmProviderConfig>,
    /// Provider used when none is named on the command line
    pub default_provider: String,
}

impl Default for Config {
    fn default() -> Self {
        let mut llm = HashMap::new();
        llm.insert(
            "qwen".to_string(),
            LlmProviderConfig {
                api_key: String::new(),
                base_url: "https://dashscope.aliyuncs.com/compatible-mode/v1".to_string(),
                model: "qwen-turbo".to_string(),
            },
        );
        llm.insert(
            "openai".to_string(),
            LlmProviderConfig {
                api_key: String::new(),
                base_url: "https://api.openai.com/v1".to_string(),
                model: "gpt-4o-mini".to_string(),
            },
        );

        Self {
            app: AppConfig::default(),
            asr: AsrConfig::default(),
            diarize: DiarizeConfig::default(),
            llm,
            default_provider: "qwen".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| SpeechClipError::FileOperation {
                path: path.display().to_string(),
                message: format!("failed to read config file: {}", e),
            })?;

        let config: Config = toml::from_str(&content).map_err(|e| SpeechClipError::Validation {
            message: format!("failed to parse config file: {}", e),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load from a file when given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self).map_err(|e| SpeechClipError::Validation {
            message: format!("failed to serialize config: {}", e),
        })?;
        std::fs::write(path, content).map_err(|e| SpeechClipError::FileOperation {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.app.max_workers == 0 {
            return Err(SpeechClipError::Validation {
                message: "max_workers must be at least 1".to_string(),
            });
        }

        if self.asr.threads == 0 {
            return Err(SpeechClipError::Validation {
                message: "asr.threads must be at least 1".to_string(),
            });
        }

        if self.diarize.window_secs <= 0.0 {
            return Err(SpeechClipError::Validation {
                message: "diarize.window_secs must be positive".to_string(),
            });
        }

        if self.diarize.max_speakers == 0 {
            return Err(SpeechClipError::Validation {
                message: "diarize.max_speakers must be at least 1".to_string(),
            });
        }

        for (name, provider) in &self.llm {
            if provider.base_url.is_empty() {
                return Err(SpeechClipError::Validation {
                    message: format!("llm provider '{}' has an empty base_url", name),
                });
            }
            if provider.model.is_empty() {
                return Err(SpeechClipError::Validation {
                    message: format!("llm provider '{}' has an empty model", name),
                });
            }
        }

        Ok(())
    }

    /// Look up a provider entry by name
    pub fn provider(&self, name: &str) -> Result<&LlmProviderConfig> {
        self.llm.get(name).ok_or_else(|| SpeechClipError::Validation {
            message: format!(
                "unknown LLM provider '{}'. Configured providers: {}",
                name,
                self.llm.keys().cloned().collect::<Vec<_>>().join(", ")
            ),
        })
    }

    /// Check whether a path has a supported media extension
    pub fn is_supported_media(&self, path: &Path) -> bool {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => {
                let ext = ext.to_lowercase();
                self.app.video_extensions.contains(&ext) || self.app.audio_extensions.contains(&ext)
            }
            None => false,
        }
    }
}
