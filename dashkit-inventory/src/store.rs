//! In-memory product collection for one session

use rand::Rng;
use tracing::{debug, info};

use crate::error::InventoryError;
use crate::model::{NewProduct, Product, StockLevels};
use crate::sample::generate_sample;

/// `P` + zero-padded 3-digit sequence; wider sequences just grow
pub fn format_product_id(sequence: u32) -> String {
    format!("P{:03}", sequence)
}

/// Products in insertion order plus the next id to assign
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryStore {
    products: Vec<Product>,
    next_id: u32,
}

impl Default for InventoryStore {
    fn default() -> Self {
        Self {
            products: Vec::new(),
            next_id: 1,
        }
    }
}

impl InventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding `count` random products
    pub fn with_sample<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Self {
        let mut store = Self::new();
        store.regenerate_sample(count, rng);
        store
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Id the next added product will receive
    pub fn next_product_id(&self) -> String {
        format_product_id(self.next_id)
    }

    /// Append a product with the next id
    ///
    /// A blank name is rejected and nothing changes.
    pub fn add_product(&mut self, new: NewProduct) -> Result<Product, InventoryError> {
        let name = new.name.trim();
        if name.is_empty() {
            return Err(InventoryError::EmptyName);
        }

        let product = Product {
            id: self.next_product_id(),
            name: name.to_string(),
            category: new.category,
            quantity_available: new.quantity_available,
            reorder_level: new.reorder_level,
        };
        self.next_id += 1;

        info!(
            "Added {} '{}' ({}, qty {}, reorder {}): {}",
            product.id,
            product.name,
            product.category,
            product.quantity_available,
            product.reorder_level,
            product.status()
        );
        self.products.push(product.clone());
        Ok(product)
    }

    /// Replace the collection with `count` random products `P001..`
    pub fn regenerate_sample<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) {
        self.products = generate_sample(count, rng);
        self.next_id = u32::try_from(count).map_or(u32::MAX, |n| n.saturating_add(1));
        debug!("Generated {} sample products", count);
    }

    /// Drop every product and restart ids at `P001`
    pub fn clear(&mut self) {
        let removed = self.products.len();
        self.products.clear();
        self.next_id = 1;
        info!("Cleared {} products", removed);
    }

    /// Set the stock figures of an existing product
    pub fn update_levels(
        &mut self,
        id: &str,
        levels: StockLevels,
    ) -> Result<Product, InventoryError> {
        let product = self
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| InventoryError::UnknownProduct(id.to_string()))?;

        product.quantity_available = levels.quantity_available;
        product.reorder_level = levels.reorder_level;
        info!(
            "Updated {}: qty {}, reorder {}: {}",
            product.id,
            product.quantity_available,
            product.reorder_level,
            product.status()
        );
        Ok(product.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, StockStatus};
    use crate::summary::summarize;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn new_product(name: &str, quantity_available: u32, reorder_level: u32) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            category: Category::Grocery,
            quantity_available,
            reorder_level,
        }
    }

    #[test]
    fn test_format_product_id() {
        assert_eq!(format_product_id(1), "P001");
        assert_eq!(format_product_id(42), "P042");
        assert_eq!(format_product_id(1000), "P1000");
    }

    #[test]
    fn test_add_assigns_sequential_ids() {
        let mut store = InventoryStore::new();
        let first = store.add_product(new_product("Milk", 10, 5)).unwrap();
        let second = store.add_product(new_product("Eggs", 10, 5)).unwrap();
        assert_eq!(first.id, "P001");
        assert_eq!(second.id, "P002");
        assert_eq!(store.next_product_id(), "P003");
    }

    #[test]
    fn test_add_rejects_blank_name_without_changes() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut store = InventoryStore::with_sample(5, &mut rng);
        let before = store.clone();

        assert_eq!(
            store.add_product(new_product("", 3, 5)),
            Err(InventoryError::EmptyName)
        );
        assert_eq!(
            store.add_product(new_product("   ", 3, 5)),
            Err(InventoryError::EmptyName)
        );
        assert_eq!(store, before);
    }

    #[test]
    fn test_add_low_stock_product_updates_summary() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut store = InventoryStore::with_sample(20, &mut rng);
        let before = summarize(store.products()).unwrap();

        let added = store.add_product(new_product("Butter", 3, 5)).unwrap();
        assert_eq!(added.status(), StockStatus::LowStock);

        let after = summarize(store.products()).unwrap();
        assert_eq!(after.total_quantity, before.total_quantity + 3);
        assert_eq!(after.low_stock_count, before.low_stock_count + 1);
        assert_eq!(after.total_products, before.total_products + 1);
    }

    #[test]
    fn test_clear_resets_ids() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut store = InventoryStore::with_sample(20, &mut rng);
        assert_eq!(store.len(), 20);
        assert_eq!(store.next_product_id(), "P021");

        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.next_product_id(), "P001");
        assert!(summarize(store.products()).is_none());
    }

    #[test]
    fn test_regenerate_replaces_collection() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut store = InventoryStore::new();
        store.add_product(new_product("Pen", 1, 1)).unwrap();

        store.regenerate_sample(8, &mut rng);
        assert_eq!(store.len(), 8);
        assert_eq!(store.products()[0].id, "P001");
        assert_eq!(store.products()[7].id, "P008");
        assert_eq!(store.next_product_id(), "P009");
    }

    #[test]
    fn test_update_levels_recomputes_status() {
        let mut store = InventoryStore::new();
        store.add_product(new_product("Jacket", 50, 10)).unwrap();

        let updated = store
            .update_levels(
                "P001",
                StockLevels {
                    quantity_available: 2,
                    reorder_level: 10,
                },
            )
            .unwrap();
        assert_eq!(updated.status(), StockStatus::LowStock);
        assert!(store.products()[0].is_low_stock());
    }

    #[test]
    fn test_update_unknown_product() {
        let mut store = InventoryStore::new();
        let result = store.update_levels(
            "P999",
            StockLevels {
                quantity_available: 1,
                reorder_level: 1,
            },
        );
        assert_eq!(result, Err(InventoryError::UnknownProduct("P999".to_string())));
    }
}
