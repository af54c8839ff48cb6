use billy_motor::{BoostTables, ConfigError};
use esp_idf_svc::nvs::{EspNvs, EspNvsPartition, NvsDefault};
use esp_idf_sys::EspError;
use log::{info, warn};

const NVS_NAMESPACE: &str = "billy_cfg";
const KEY_BOOST: &str = "boost";

/// Room for the CBOR record of a generous ascending table.
const RECORD_BUF_LEN: usize = 512;

#[derive(Debug)]
pub enum StoreError {
    /// The tables could not be written as a CBOR record.
    Encode(ConfigError),
    Nvs(EspError),
}

impl From<EspError> for StoreError {
    fn from(e: EspError) -> Self {
        StoreError::Nvs(e)
    }
}

/// Boost table storage in NVS.
pub struct BoostStore {
    nvs: EspNvs<NvsDefault>,
}

impl BoostStore {
    pub fn new(nvs_partition: EspNvsPartition<NvsDefault>) -> Result<Self, EspError> {
        let nvs = EspNvs::new(nvs_partition, NVS_NAMESPACE, true)?;
        Ok(Self { nvs })
    }

    /// Persist `tables` as a CBOR record.
    pub fn save(&mut self, tables: &BoostTables) -> Result<(), StoreError> {
        let record = tables.to_cbor().map_err(StoreError::Encode)?;
        self.nvs.set_raw(KEY_BOOST, &record)?;
        Ok(())
    }

    /// Load the stored tables, falling back to the built-in defaults.
    ///
    /// A missing record is seeded with the defaults so they can be tuned
    /// offline; a corrupt or invalid one is left in place and ignored.
    pub fn load_or_default(&mut self) -> BoostTables {
        let mut buf = [0u8; RECORD_BUF_LEN];
        match self.nvs.get_raw(KEY_BOOST, &mut buf) {
            Ok(Some(bytes)) => match BoostTables::from_cbor(bytes) {
                Ok(tables) => {
                    info!(
                        "Boost tables loaded from NVS ({} ascending entries)",
                        tables.ascending().len()
                    );
                    tables
                }
                Err(e) => {
                    warn!("Stored boost tables rejected: {}; using defaults", e);
                    BoostTables::default()
                }
            },
            Ok(None) => {
                info!("No stored boost tables; seeding defaults");
                let tables = BoostTables::default();
                if let Err(e) = self.save(&tables) {
                    warn!("Failed to seed boost tables: {:?}", e);
                }
                tables
            }
            Err(e) => {
                warn!("Failed to read boost tables: {:?}; using defaults", e);
                BoostTables::default()
            }
        }
    }
}
