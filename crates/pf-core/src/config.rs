//! Generator configuration file (RON)

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::export::{ExportOptions, StlFormat};
use crate::generate::GenerateOptions;
use crate::parts::{
    BooxStandV1, BooxStandV2, BooxStandWithBase, BroomClip, CardBox, ChocBlock, CraftKnife,
    HotIntake, PcbSled, PicodviStand, QfnBox, ScrapTray, SteamingHook, ToothbrushHolder,
    WindowClamp, WindowFitting, generator_names,
};

/// Current configuration file version
pub const CONFIG_VERSION: u32 = 1;

/// Default circle resolution
pub const DEFAULT_SEGMENTS: u32 = 64;

/// Parameters of every generator. Missing sections keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartParams {
    pub hot_intake: HotIntake,
    pub window_fitting: WindowFitting,
    pub window_clamp: WindowClamp,
    pub steaming_hook: SteamingHook,
    pub broom_clip: BroomClip,
    pub toothbrush_holder: ToothbrushHolder,
    pub pcb_sled: PcbSled,
    pub boox_stand_v1: BooxStandV1,
    pub boox_stand_v2: BooxStandV2,
    pub boox_stand_with_base: BooxStandWithBase,
    pub qfn_box: QfnBox,
    pub card_box: CardBox,
    pub choc_block: ChocBlock,
    pub craft_knife: CraftKnife,
    pub scrap_tray: ScrapTray,
    pub picodvi_stand: PicodviStand,
}

/// Output settings and part parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// File format version
    pub version: u32,
    /// Directory receiving the STL files
    pub output_dir: PathBuf,
    /// Straight edges per full circle
    pub segments: u32,
    pub format: StlFormat,
    /// Generators run when none are named explicitly
    pub enabled: Vec<String>,
    pub params: PartParams,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            output_dir: PathBuf::from("."),
            segments: DEFAULT_SEGMENTS,
            format: StlFormat::default(),
            enabled: generator_names().into_iter().map(String::from).collect(),
            params: PartParams::default(),
        }
    }
}

impl GeneratorConfig {
    /// Options for [`crate::Generator`] derived from this configuration
    pub fn generate_options(&self) -> GenerateOptions {
        GenerateOptions {
            export: ExportOptions {
                output_dir: self.output_dir.clone(),
                format: self.format,
            },
            segments: self.segments,
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = self.to_bytes()?;
        std::fs::write(path, content).map_err(|e| ConfigError::Io(e.to_string()))?;
        Ok(())
    }

    /// Serialize configuration to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, ConfigError> {
        let content = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;
        Ok(content.into_bytes())
    }

    /// Load configuration from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        let config: GeneratorConfig =
            ron::from_str(&content).map_err(|e| ConfigError::Deserialize(e.to_string()))?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load configuration from bytes
    pub fn load_from_bytes(data: &[u8]) -> Result<Self, ConfigError> {
        let content =
            std::str::from_utf8(data).map_err(|e| ConfigError::Deserialize(e.to_string()))?;
        let config: GeneratorConfig =
            ron::from_str(content).map_err(|e| ConfigError::Deserialize(e.to_string()))?;
        Ok(config)
    }
}

/// Configuration-related errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Deserialization error: {0}")]
    Deserialize(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_enables_every_generator() {
        let config = GeneratorConfig::default();
        assert_eq!(config.enabled.len(), 16);
        assert_eq!(config.format, StlFormat::Binary);
        assert_eq!(config.version, CONFIG_VERSION);
    }

    #[test]
    fn test_round_trip_through_bytes() {
        let mut config = GeneratorConfig::default();
        config.segments = 24;
        config.enabled = vec!["pcb_sled".into()];
        config.params.pcb_sled.perimeter_w = 120.0;
        config.params.window_clamp.l4_options = vec![30.0];

        let bytes = config.to_bytes().unwrap();
        let loaded = GeneratorConfig::load_from_bytes(&bytes).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let text = "(segments: 32, params: (broom_clip: (handle_diameter: 25.0)))";
        let config = GeneratorConfig::load_from_bytes(text.as_bytes()).unwrap();
        assert_eq!(config.segments, 32);
        assert_eq!(config.params.broom_clip.handle_diameter, 25.0);
        assert_eq!(config.params.broom_clip.plate_width, 45.0);
        assert_eq!(config.params.hot_intake, HotIntake::default());
        assert_eq!(config.enabled.len(), 16);
    }

    #[test]
    fn test_malformed_file_is_rejected() {
        let result = GeneratorConfig::load_from_bytes(b"(segments: \"many\")");
        assert!(matches!(result, Err(ConfigError::Deserialize(_))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pf.ron");
        let config = GeneratorConfig {
            output_dir: PathBuf::from("out"),
            format: StlFormat::Ascii,
            ..GeneratorConfig::default()
        };
        config.save(&path).unwrap();
        assert_eq!(GeneratorConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = GeneratorConfig::load(dir.path().join("absent.ron"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
