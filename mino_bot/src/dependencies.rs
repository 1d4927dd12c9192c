use std::sync::Arc;

use mino_core::catalog::Catalog;
use mino_core::config::{BotConfig, SheetConfig};
use mino_core::sheets::{GoogleSheets, SheetError};

use crate::session::SessionStore;

#[derive(Clone)]
pub struct BotDependencies {
    pub catalog: Catalog,
    pub sessions: SessionStore,
    pub config: Arc<BotConfig>,
}

impl BotDependencies {
    pub fn new(catalog: Catalog, config: BotConfig) -> Self {
        Self {
            catalog,
            sessions: SessionStore::new(),
            config: Arc::new(config),
        }
    }

    /// Wires the catalog to the Google Sheets backend described by `sheet_config`.
    pub fn from_config(config: BotConfig, sheet_config: &SheetConfig) -> Result<Self, SheetError> {
        let sheets = GoogleSheets::from_config(sheet_config)?;
        let catalog = Catalog::from_config(Arc::new(sheets), sheet_config, &config.earnings_unit);
        Ok(Self::new(catalog, config))
    }
}
