//! Classification service configuration

use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub detector: DetectorConfig,
    pub wavelet: WaveletConfig,
    pub artifacts: ArtifactsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub rest_port: u16,
    pub price_port: u16,
}

/// Cascade detector tuning. The defaults were chosen empirically against the
/// shipped cascade models and are tunable, not sacred.
#[derive(Debug, Clone, Deserialize)]
pub struct DetectorConfig {
    pub scale_factor: f32,
    pub min_neighbors: u32,
    pub min_eyes: usize,
    pub eye_scale_factor: f32,
    pub eye_min_neighbors: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WaveletConfig {
    pub family: String,
    pub level: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactsConfig {
    pub dir: PathBuf,
    pub face_cascade: String,
    pub eye_cascade: String,
    pub classifier: String,
    pub class_dictionary: String,
    pub price_model: String,
    pub price_columns: String,
}

impl ArtifactsConfig {
    pub fn face_cascade_path(&self) -> PathBuf {
        self.dir.join(&self.face_cascade)
    }

    pub fn eye_cascade_path(&self) -> PathBuf {
        self.dir.join(&self.eye_cascade)
    }

    pub fn classifier_path(&self) -> PathBuf {
        self.dir.join(&self.classifier)
    }

    pub fn class_dictionary_path(&self) -> PathBuf {
        self.dir.join(&self.class_dictionary)
    }

    pub fn price_model_path(&self) -> PathBuf {
        self.dir.join(&self.price_model)
    }

    pub fn price_columns_path(&self) -> PathBuf {
        self.dir.join(&self.price_columns)
    }
}

impl Config {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn default_path() -> &'static str {
        "config.toml"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                rest_port: 5000,
                price_port: 5001,
            },
            detector: DetectorConfig {
                scale_factor: 1.3,
                min_neighbors: 5,
                min_eyes: 2,
                eye_scale_factor: 1.1,
                eye_min_neighbors: 3,
            },
            wavelet: WaveletConfig {
                family: "db1".to_string(),
                level: 5,
            },
            artifacts: ArtifactsConfig {
                dir: PathBuf::from("artifacts"),
                face_cascade: "face_cascade.bin".to_string(),
                eye_cascade: "eye_cascade.bin".to_string(),
                classifier: "classifier.bin".to_string(),
                class_dictionary: "class_dictionary.json".to_string(),
                price_model: "price_model.bin".to_string(),
                price_columns: "columns.json".to_string(),
            },
        }
    }
}
