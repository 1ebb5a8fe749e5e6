//! Flash persistence for the panel config and the mapping document
//!
//! The config is stored as postcard binary, the mappings as the JSON
//! document the mapping tool saves.

use defmt::*;

use sonyvfd_core::config::{ConfigError, PanelConfig, MAX_ENCODED_LEN};
use sonyvfd_core::mapping::{DocumentError, MappingData};
use sonyvfd_hal_rp2040::flash::{FlashError, FlashStorage, StorageKey, MAX_VALUE_SIZE};
// Import the FlashStorage trait to bring methods into scope
use sonyvfd_hal_rp2040::FlashStorageTrait;

/// Persistence errors
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// Flash operation failed
    Flash(FlashError),
    /// Stored config failed to decode or validate
    Config(ConfigError),
    /// Stored mapping document failed to parse
    Document(DocumentError),
}

impl From<FlashError> for StoreError {
    fn from(e: FlashError) -> Self {
        StoreError::Flash(e)
    }
}

impl From<ConfigError> for StoreError {
    fn from(e: ConfigError) -> Self {
        StoreError::Config(e)
    }
}

impl From<DocumentError> for StoreError {
    fn from(e: DocumentError) -> Self {
        StoreError::Document(e)
    }
}

/// Flash persistence manager
pub struct Persistence<'d> {
    storage: FlashStorage<'d>,
}

impl<'d> Persistence<'d> {
    /// Create a new persistence manager
    pub fn new(storage: FlashStorage<'d>) -> Self {
        Self { storage }
    }

    /// Load and validate the panel config
    pub async fn load_config(&mut self) -> Result<PanelConfig, StoreError> {
        let mut buffer = [0u8; MAX_ENCODED_LEN];
        let len = self
            .storage
            .read(StorageKey::PanelConfig, &mut buffer)
            .await?;

        debug!("Read {} bytes of panel config from flash", len);

        let config = PanelConfig::from_bytes(&buffer[..len])?;
        log_config_summary(&config);
        Ok(config)
    }

    /// Store the panel config
    pub async fn save_config(&mut self, config: &PanelConfig) -> Result<(), StoreError> {
        let bytes = config.to_bytes()?;
        self.storage.write(StorageKey::PanelConfig, &bytes).await?;
        info!("Saved {} bytes of panel config to flash", bytes.len());
        Ok(())
    }

    /// Load the mapping document
    ///
    /// The position table is padded to `min_positions`.
    pub async fn load_mappings(&mut self, min_positions: usize) -> Result<MappingData, StoreError> {
        let mut buffer = [0u8; MAX_VALUE_SIZE];
        let len = self
            .storage
            .read(StorageKey::Mappings, &mut buffer)
            .await?;

        debug!("Read {} bytes of mappings from flash", len);

        let mapping = MappingData::from_json(&buffer[..len], min_positions)?;
        log_mapping_summary(&mapping);
        Ok(mapping)
    }

    /// Store a serialized mapping document
    pub async fn save_mappings(&mut self, document: &[u8]) -> Result<(), StoreError> {
        self.storage.write(StorageKey::Mappings, document).await?;
        info!("Saved {} bytes of mappings to flash", document.len());
        Ok(())
    }
}

/// Log a summary of the loaded configuration
fn log_config_summary(config: &PanelConfig) {
    info!("Panel configuration loaded");
    debug!(
        "  pins clk={} din={} stb={}",
        config.clock_pin, config.data_pin, config.strobe_pin
    );
    debug!("  mode=0x{:02x} brightness={}", config.mode, config.brightness);
    debug!("  {} character positions", config.positions);
}

/// Log a summary of a loaded mapping
pub fn log_mapping_summary(mapping: &MappingData) {
    debug!("  {} icons", mapping.icon_count());
    debug!("  {} character positions", mapping.position_count());
    debug!("  {} bindings", mapping.binding_count());
}
