//! The normal and hard board catalogs.

use countbattle_core::BoardCatalog;
use tracing::{debug, instrument, warn};

use crate::settings::GameSettings;

/// Board catalogs available to a session.
#[derive(Debug, Clone, Default)]
pub struct BoardLibrary {
    normal: BoardCatalog,
    hard: Option<BoardCatalog>,
}

impl BoardLibrary {
    /// A library with only the normal catalog.
    pub fn new(normal: BoardCatalog) -> Self {
        Self { normal, hard: None }
    }

    /// Adds the hard-mode catalog.
    pub fn with_hard(mut self, hard: BoardCatalog) -> Self {
        self.hard = Some(hard);
        self
    }

    /// The normal catalog.
    pub fn normal(&self) -> &BoardCatalog {
        &self.normal
    }

    /// The hard catalog, if loaded.
    pub fn hard(&self) -> Option<&BoardCatalog> {
        self.hard.as_ref()
    }

    /// Catalog for a game with `settings`: the hard one in hard mode when it
    /// is loaded, the normal one otherwise.
    #[instrument(skip(self))]
    pub fn resolve(&self, settings: &GameSettings) -> &BoardCatalog {
        match (settings.hard_mode, &self.hard) {
            (true, Some(hard)) => {
                debug!(count = hard.len(), "Using hard catalog");
                hard
            }
            (true, None) => {
                warn!("Hard mode without a hard catalog, using normal boards");
                &self.normal
            }
            (false, _) => &self.normal,
        }
    }
}
