use crate::capture::Backpressure;
use common::logging::LogError;
use dpi::filter::FrameFilter;
use dpi::frame::FrameFamily;
use dpi::pipeline::Stage;
use dpi::protocols::ethernet::mac::MacAddress;
use dpi::protocols::wlan::security::EncryptionType;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::IntoEnumIterator;
use thiserror::Error;

const CONFIG_FILENAME: &str = "config.toml";

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_READ_TIMEOUT_MS: i32 = 1000;
const DEFAULT_QUEUE_CAPACITY: usize = 1000;
const DEFAULT_MAX_SAVED_FRAMES: usize = 100_000;

#[derive(Clone, Debug)]
pub struct Config {
    pub log_level: LevelFilter,
    pub log_format: String,
    pub log_to_file: bool,

    pub interface: Option<String>,
    pub promiscuous: bool,
    pub read_timeout_ms: i32,
    pub bpf_filter: Option<String>,

    pub queue_capacity: usize,
    pub backpressure: Backpressure,

    pub ambiguous_as_ethernet: bool,
    pub stages: Vec<Stage>,
    pub filter: FrameFilter,

    pub save_capture: bool,
    pub max_saved_frames: usize,
    pub capture_description: String,
}

impl Config {
    pub fn from_file() -> Result<Self, ConfigError> {
        let data = match std::fs::read_to_string(CONFIG_FILENAME) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                let dto = ConfigDto::default();
                dto.save_to_file()?;
                return Config::try_from(dto);
            },
            Err(err) => return Err(ConfigError::IOError(err)),
        };

        Self::from_toml(&data)
    }

    pub fn from_toml(data: &str) -> Result<Self, ConfigError> {
        let dto: ConfigDto = toml::from_str(data).map_err(ConfigError::TomlDeserializationError)?;

        Config::try_from(dto)
    }
}

/// On-disk form of [`Config`]. Missing keys take their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigDto {
    pub log_level: String,
    pub log_format: String,
    pub log_to_file: bool,

    pub interface: Option<String>,
    pub promiscuous: bool,
    pub read_timeout_ms: i32,
    pub bpf_filter: Option<String>,

    pub queue_capacity: usize,
    pub backpressure: String,

    pub ambiguous_as_ethernet: bool,
    pub stages: Vec<String>,

    pub save_capture: bool,
    pub max_saved_frames: usize,
    pub capture_description: String,

    pub filter: FilterDto,
}

impl Default for ConfigDto {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_format: common::logging::DEFAULT_FORMAT.to_string(),
            log_to_file: false,
            interface: None,
            promiscuous: true,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
            bpf_filter: None,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            backpressure: Backpressure::Block.to_string(),
            ambiguous_as_ethernet: true,
            stages: Stage::iter().map(|stage| stage.to_string()).collect(),
            save_capture: false,
            max_saved_frames: DEFAULT_MAX_SAVED_FRAMES,
            capture_description: String::new(),
            filter: FilterDto::default(),
        }
    }
}

impl ConfigDto {
    pub fn save_to_file(&self) -> Result<(), ConfigError> {
        let data = toml::to_string(&self).map_err(ConfigError::TomlSerializationError)?;

        std::fs::write(CONFIG_FILENAME, data).map_err(ConfigError::IOError)?;

        Ok(())
    }
}

impl TryFrom<ConfigDto> for Config {
    type Error = ConfigError;

    fn try_from(dto: ConfigDto) -> Result<Self, Self::Error> {
        let log_level =
            common::logging::parse_level(&dto.log_level).map_err(ConfigError::WrongLogLevel)?;

        if dto.queue_capacity == 0 {
            return Err(ConfigError::ZeroQueueCapacity);
        }

        let backpressure = Backpressure::from_str(dto.backpressure.trim())
            .map_err(|_| ConfigError::WrongBackpressure(dto.backpressure.clone()))?;

        let stages = dto
            .stages
            .iter()
            .map(|stage| {
                Stage::from_str(stage.trim()).map_err(|_| ConfigError::WrongStage(stage.clone()))
            })
            .collect::<Result<Vec<Stage>, ConfigError>>()?;

        Ok(Self {
            log_level,
            log_format: dto.log_format,
            log_to_file: dto.log_to_file,
            interface: non_empty(dto.interface),
            promiscuous: dto.promiscuous,
            read_timeout_ms: dto.read_timeout_ms,
            bpf_filter: non_empty(dto.bpf_filter),
            queue_capacity: dto.queue_capacity,
            backpressure,
            ambiguous_as_ethernet: dto.ambiguous_as_ethernet,
            stages,
            filter: FrameFilter::try_from(dto.filter)?,
            save_capture: dto.save_capture,
            max_saved_frames: dto.max_saved_frames,
            capture_description: dto.capture_description,
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterDto {
    pub families: Vec<String>,
    pub source_mac: Option<String>,
    pub destination_mac: Option<String>,
    pub bssid: Option<String>,
    pub encryption_types: Vec<String>,

    // Hex, separators allowed: "aa:bb:cc"
    pub contains_bytes: String,
}

impl TryFrom<FilterDto> for FrameFilter {
    type Error = ConfigError;

    fn try_from(dto: FilterDto) -> Result<Self, Self::Error> {
        let families = dto
            .families
            .iter()
            .map(|family| {
                FrameFamily::from_str(family.trim())
                    .map_err(|_| ConfigError::WrongFamily(family.clone()))
            })
            .collect::<Result<Vec<FrameFamily>, ConfigError>>()?;

        let encryption_types = dto
            .encryption_types
            .iter()
            .map(|label| parse_encryption(label))
            .collect::<Result<Vec<EncryptionType>, ConfigError>>()?;

        let contains_bytes = dto.contains_bytes.replace([':', ' ', '-'], "");
        let contains_bytes = hex::decode(&contains_bytes)
            .map_err(|_| ConfigError::WrongHexPattern(dto.contains_bytes.clone()))?;

        Ok(Self {
            families,
            source_mac: parse_mac(dto.source_mac)?,
            destination_mac: parse_mac(dto.destination_mac)?,
            bssid: parse_mac(dto.bssid)?,
            encryption_types,
            contains_bytes,
        })
    }
}

fn parse_mac(value: Option<String>) -> Result<Option<MacAddress>, ConfigError> {
    match non_empty(value) {
        None => Ok(None),
        Some(value) => MacAddress::try_from(value.as_str())
            .map(Some)
            .map_err(|_| ConfigError::WrongMacAddress(value)),
    }
}

// The lenient label parse maps typos to Unknown, which is only accepted when spelled out.
fn parse_encryption(label: &str) -> Result<EncryptionType, ConfigError> {
    match EncryptionType::from_label(label) {
        EncryptionType::Unknown if !label.trim().eq_ignore_ascii_case("unknown") => {
            Err(ConfigError::WrongEncryptionType(label.to_string()))
        },
        encryption => Ok(encryption),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO Error.")]
    IOError(#[from] std::io::Error),

    #[error("TOML Serialization Error.")]
    TomlSerializationError(#[from] toml::ser::Error),

    #[error("TOML Deserialization Error.")]
    TomlDeserializationError(#[from] toml::de::Error),

    #[error("Wrong log level.")]
    WrongLogLevel(LogError),

    #[error("Queue capacity must be positive.")]
    ZeroQueueCapacity,

    #[error("Wrong backpressure policy.")]
    WrongBackpressure(String),

    #[error("Wrong analysis stage.")]
    WrongStage(String),

    #[error("Wrong frame family in filter.")]
    WrongFamily(String),

    #[error("Wrong MAC address in filter.")]
    WrongMacAddress(String),

    #[error("Wrong encryption type in filter.")]
    WrongEncryptionType(String),

    #[error("Wrong hex byte pattern in filter.")]
    WrongHexPattern(String),
}

impl ConfigError {
    pub fn additional_info(&self) -> Option<String> {
        match self {
            ConfigError::IOError(err) => Some(err.to_string()),
            ConfigError::TomlSerializationError(err) => Some(err.to_string()),
            ConfigError::TomlDeserializationError(err) => Some(err.to_string()),
            ConfigError::WrongLogLevel(err) => err.additional_info(),
            ConfigError::WrongBackpressure(value)
            | ConfigError::WrongStage(value)
            | ConfigError::WrongFamily(value)
            | ConfigError::WrongMacAddress(value)
            | ConfigError::WrongEncryptionType(value)
            | ConfigError::WrongHexPattern(value) => Some(value.clone()),
            ConfigError::ZeroQueueCapacity => None,
        }
    }
}
