// Fri Oct 16 2026 - Alex

use crate::runtime::names::MAX_NAME_BUFFER;
use crate::runtime::offsets::UeOffsets;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub executable: Option<String>,
    pub names_rva: u64,
    pub guobject_array_rva: u64,
    #[serde(default = "default_true")]
    pub use_fname_pool: bool,
    #[serde(default)]
    pub use_outline_number_name: bool,
    #[serde(default = "default_true")]
    pub use_region_cache: bool,
    #[serde(default = "default_max_name_length")]
    pub max_name_length: usize,
    #[serde(default)]
    pub excluded_objects: Vec<String>,
    #[serde(default)]
    pub offsets: Option<UeOffsets>,
}

fn default_true() -> bool {
    true
}

fn default_max_name_length() -> usize {
    MAX_NAME_BUFFER
}

impl Default for Config {
    fn default() -> Self {
        Self {
            executable: None,
            names_rva: 0,
            guobject_array_rva: 0,
            use_fname_pool: true,
            use_outline_number_name: false,
            use_region_cache: true,
            max_name_length: MAX_NAME_BUFFER,
            excluded_objects: Vec::new(),
            offsets: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        log::debug!("loaded profile from {}", path.display());
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn with_offsets(mut self, offsets: UeOffsets) -> Self {
        self.offsets = Some(offsets);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_name_length == 0 {
            return Err(ConfigError::Invalid("max_name_length must be greater than 0".to_string()));
        }

        let Some(offsets) = &self.offsets else {
            return Err(ConfigError::Invalid("offsets catalogue is missing".to_string()));
        };

        if !offsets.has_name_sections(self.use_fname_pool) {
            let needed = if self.use_fname_pool {
                "FNamePool and FNamePoolEntry"
            } else {
                "FNameEntry"
            };
            return Err(ConfigError::Invalid(format!("offsets catalogue lacks {}", needed)));
        }

        if let Some(pool) = &offsets.fname_pool {
            if pool.stride == 0 {
                return Err(ConfigError::Invalid("FNamePool.Stride must be greater than 0".to_string()));
            }
            if !(1..=31).contains(&pool.blocks_bit) {
                return Err(ConfigError::Invalid(format!(
                    "FNamePool.BlocksBit must be within 1..=31, got {}",
                    pool.blocks_bit
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::offsets::{FNameEntryOffsets, FNamePoolEntryOffsets, FNamePoolOffsets};

    fn pool_offsets() -> UeOffsets {
        UeOffsets {
            fname_pool: Some(FNamePoolOffsets::default()),
            fname_pool_entry: Some(FNamePoolEntryOffsets::default()),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_requires_offsets() {
        let config = Config::new();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        assert!(Config::new().with_offsets(pool_offsets()).validate().is_ok());
    }

    #[test]
    fn test_validate_name_sections_follow_encoding() {
        let mut config = Config::new().with_offsets(pool_offsets());
        config.use_fname_pool = false;
        assert!(config.validate().is_err());

        let mut offsets = pool_offsets();
        offsets.fname_entry = Some(FNameEntryOffsets { index: 0, name: 0x10 });
        config.offsets = Some(offsets);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_pool_parameters() {
        let mut offsets = pool_offsets();
        offsets.fname_pool = Some(FNamePoolOffsets { blocks_bit: 0, blocks_off: 0x10, stride: 2 });
        assert!(Config::new().with_offsets(offsets.clone()).validate().is_err());

        offsets.fname_pool = Some(FNamePoolOffsets { blocks_bit: 32, blocks_off: 0x10, stride: 2 });
        assert!(Config::new().with_offsets(offsets.clone()).validate().is_err());

        offsets.fname_pool = Some(FNamePoolOffsets { blocks_bit: 16, blocks_off: 0x10, stride: 0 });
        assert!(Config::new().with_offsets(offsets).validate().is_err());

        let mut config = Config::new().with_offsets(pool_offsets());
        config.max_name_length = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_json_defaults() {
        let json = r#"{
            "names_rva": 4096,
            "guobject_array_rva": 8192,
            "offsets": {
                "FNamePool": { "BlocksBit": 16, "BlocksOff": 16, "Stride": 2 },
                "FNamePoolEntry": { "Header": 0 },
                "FUObjectArray": { "ObjObjects": 16 },
                "TUObjectArray": { "Objects": 0 },
                "FUObjectItem": { "Object": 0, "Size": 24 },
                "UObject": { "InternalIndex": 12 },
                "UStruct": { "PropertiesSize": 88, "Children": 72 },
                "UFunction": { "EFunctionFlags": 176, "ParamSize": 180 }
            }
        }"#;
        let config = Config::from_json(json).unwrap();
        assert!(config.use_fname_pool);
        assert!(!config.use_outline_number_name);
        assert!(config.use_region_cache);
        assert_eq!(config.max_name_length, MAX_NAME_BUFFER);
        assert_eq!(config.names_rva, 0x1000);

        let again = Config::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(again.offsets, config.offsets);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(Config::from_json("{"), Err(ConfigError::Parse(_))));
    }
}
