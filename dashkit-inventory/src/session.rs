//! Per-session inventory state

use dashkit_common::Flash;

use crate::store::InventoryStore;

/// Everything one browser session holds
#[derive(Debug, Clone, Default)]
pub struct InventorySession {
    pub store: InventoryStore,
    pub flash: Option<Flash>,
}

impl InventorySession {
    /// A new session starts with `sample_size` random products
    pub fn with_sample(sample_size: usize) -> Self {
        let mut rng = rand::thread_rng();
        Self {
            store: InventoryStore::with_sample(sample_size, &mut rng),
            flash: None,
        }
    }

    pub fn take_flash(&mut self) -> Option<Flash> {
        self.flash.take()
    }
}
