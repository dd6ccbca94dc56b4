//! Inventory records
//!
//! A product's stock status is never stored: it is derived from quantity and
//! reorder level each time it is read, so no mutation can leave it stale.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::InventoryError;

/// Product category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    #[default]
    Electronics,
    Clothing,
    Grocery,
    Stationery,
    Sports,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Electronics,
        Category::Clothing,
        Category::Grocery,
        Category::Stationery,
        Category::Sports,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Electronics => "Electronics",
            Category::Clothing => "Clothing",
            Category::Grocery => "Grocery",
            Category::Stationery => "Stationery",
            Category::Sports => "Sports",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = InventoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| InventoryError::UnknownCategory(s.to_string()))
    }
}

/// Derived stock status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StockStatus {
    #[serde(rename = "In Stock")]
    InStock,
    #[serde(rename = "Low Stock")]
    LowStock,
}

impl StockStatus {
    pub const ALL: [StockStatus; 2] = [StockStatus::InStock, StockStatus::LowStock];

    /// Low Stock iff quantity <= reorder level
    pub fn from_levels(quantity_available: u32, reorder_level: u32) -> Self {
        if quantity_available <= reorder_level {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::InStock => "In Stock",
            StockStatus::LowStock => "Low Stock",
        }
    }

    /// CSS class for the status cell
    pub fn css_class(&self) -> &'static str {
        match self {
            StockStatus::InStock => "status-in-stock",
            StockStatus::LowStock => "status-low-stock",
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StockStatus {
    type Err = InventoryError;

    /// Accepts the display form ("Low Stock") and the snake form ("low_stock")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', " ");
        StockStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| InventoryError::UnknownStatus(s.trim().to_string()))
    }
}

/// One inventory line item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub quantity_available: u32,
    pub reorder_level: u32,
}

impl Product {
    pub fn status(&self) -> StockStatus {
        StockStatus::from_levels(self.quantity_available, self.reorder_level)
    }

    pub fn is_low_stock(&self) -> bool {
        self.status() == StockStatus::LowStock
    }
}

// Hand-written so the derived status is always part of the JSON form
impl Serialize for Product {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Product", 6)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("category", &self.category)?;
        state.serialize_field("quantity_available", &self.quantity_available)?;
        state.serialize_field("reorder_level", &self.reorder_level)?;
        state.serialize_field("status", &self.status())?;
        state.end()
    }
}

/// Form defaults for a new product
pub const DEFAULT_QUANTITY: u32 = 10;
pub const DEFAULT_REORDER_LEVEL: u32 = 5;

fn default_quantity() -> u32 {
    DEFAULT_QUANTITY
}

fn default_reorder_level() -> u32 {
    DEFAULT_REORDER_LEVEL
}

/// Input for the add-product operation; the id is assigned by the store
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewProduct {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default = "default_quantity")]
    pub quantity_available: u32,
    #[serde(default = "default_reorder_level")]
    pub reorder_level: u32,
}

/// Stock figures for an existing product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct StockLevels {
    pub quantity_available: u32,
    pub reorder_level: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(quantity_available: u32, reorder_level: u32) -> Product {
        Product {
            id: "P001".to_string(),
            name: "Pen-123".to_string(),
            category: Category::Stationery,
            quantity_available,
            reorder_level,
        }
    }

    #[test]
    fn test_status_threshold_is_inclusive() {
        assert_eq!(product(3, 5).status(), StockStatus::LowStock);
        assert_eq!(product(5, 5).status(), StockStatus::LowStock);
        assert_eq!(product(6, 5).status(), StockStatus::InStock);
        assert_eq!(product(0, 0).status(), StockStatus::LowStock);
    }

    #[test]
    fn test_status_follows_mutation() {
        let mut p = product(50, 10);
        assert!(!p.is_low_stock());
        p.quantity_available = 4;
        assert!(p.is_low_stock());
        p.reorder_level = 3;
        assert!(!p.is_low_stock());
    }

    #[test]
    fn test_category_parse() {
        assert_eq!("Sports".parse::<Category>().unwrap(), Category::Sports);
        assert_eq!(" grocery ".parse::<Category>().unwrap(), Category::Grocery);
        assert!(matches!(
            "Toys".parse::<Category>(),
            Err(InventoryError::UnknownCategory(name)) if name == "Toys"
        ));
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("Low Stock".parse::<StockStatus>().unwrap(), StockStatus::LowStock);
        assert_eq!("in_stock".parse::<StockStatus>().unwrap(), StockStatus::InStock);
        assert!("Backordered".parse::<StockStatus>().is_err());
    }

    #[test]
    fn test_product_json_includes_status() {
        let json = serde_json::to_value(product(3, 5)).unwrap();
        assert_eq!(json["id"], "P001");
        assert_eq!(json["category"], "Stationery");
        assert_eq!(json["status"], "Low Stock");
    }

    #[test]
    fn test_new_product_defaults() {
        let new: NewProduct = serde_json::from_str(r#"{"name": "Lamp"}"#).unwrap();
        assert_eq!(new.category, Category::Electronics);
        assert_eq!(new.quantity_available, DEFAULT_QUANTITY);
        assert_eq!(new.reorder_level, DEFAULT_REORDER_LEVEL);
    }
}
