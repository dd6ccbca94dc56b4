//! Aggregation over the product collection
//!
//! Summary figures, category/status filtering, quantity per category and
//! low-stock alerts. Everything here is a pure function of the records.

use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use crate::error::InventoryError;
use crate::model::{Category, Product, StockStatus};

/// Headline figures for the dashboard cards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InventorySummary {
    pub total_products: usize,
    pub total_quantity: u64,
    pub low_stock_count: usize,
    pub category_count: usize,
}

/// `None` for an empty collection
pub fn summarize(products: &[Product]) -> Option<InventorySummary> {
    if products.is_empty() {
        return None;
    }

    let categories: HashSet<Category> = products.iter().map(|p| p.category).collect();
    Some(InventorySummary {
        total_products: products.len(),
        total_quantity: products.iter().map(|p| u64::from(p.quantity_available)).sum(),
        low_stock_count: products.iter().filter(|p| p.is_low_stock()).count(),
        category_count: categories.len(),
    })
}

/// Total quantity of one category and its share of all stock
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub quantity: u64,
    /// Fraction of total quantity, 0.0 when there is no stock at all
    pub share: f64,
}

/// Quantity per category present, ordered by category name
pub fn quantity_by_category(products: &[Product]) -> Vec<CategoryTotal> {
    let mut totals: BTreeMap<&'static str, (Category, u64)> = BTreeMap::new();
    for product in products {
        let entry = totals
            .entry(product.category.as_str())
            .or_insert((product.category, 0));
        entry.1 += u64::from(product.quantity_available);
    }

    let grand_total: u64 = totals.values().map(|(_, q)| q).sum();
    totals
        .into_values()
        .map(|(category, quantity)| CategoryTotal {
            category,
            quantity,
            share: if grand_total == 0 {
                0.0
            } else {
                quantity as f64 / grand_total as f64
            },
        })
        .collect()
}

/// Category and status selection, AND-composed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFilter {
    categories: HashSet<Category>,
    statuses: HashSet<StockStatus>,
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self::all()
    }
}

impl ProductFilter {
    /// Every category and both statuses
    pub fn all() -> Self {
        Self {
            categories: Category::ALL.into_iter().collect(),
            statuses: StockStatus::ALL.into_iter().collect(),
        }
    }

    pub fn new(
        categories: impl IntoIterator<Item = Category>,
        statuses: impl IntoIterator<Item = StockStatus>,
    ) -> Self {
        Self {
            categories: categories.into_iter().collect(),
            statuses: statuses.into_iter().collect(),
        }
    }

    /// Build from query pairs (`category=…`, `status=…`, repeatable)
    ///
    /// A dimension with no values selects everything, unless the pairs carry
    /// the `filter` marker sent by the dashboard form: then an absent
    /// dimension is an explicit empty selection and matches nothing.
    pub fn from_query_pairs(pairs: &[(String, String)]) -> Result<Self, InventoryError> {
        let submitted = pairs.iter().any(|(key, _)| key == "filter");

        let mut categories = HashSet::new();
        let mut statuses = HashSet::new();
        let mut saw_category = false;
        let mut saw_status = false;

        for (key, value) in pairs {
            match key.as_str() {
                "category" => {
                    saw_category = true;
                    categories.insert(value.parse::<Category>()?);
                }
                "status" => {
                    saw_status = true;
                    statuses.insert(value.parse::<StockStatus>()?);
                }
                _ => {}
            }
        }

        if !saw_category && !submitted {
            categories = Category::ALL.into_iter().collect();
        }
        if !saw_status && !submitted {
            statuses = StockStatus::ALL.into_iter().collect();
        }

        Ok(Self {
            categories,
            statuses,
        })
    }

    pub fn includes_category(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }

    pub fn includes_status(&self, status: StockStatus) -> bool {
        self.statuses.contains(&status)
    }

    pub fn matches(&self, product: &Product) -> bool {
        self.includes_category(product.category) && self.includes_status(product.status())
    }

    /// Matching products in collection order
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products.iter().filter(|p| self.matches(p)).collect()
    }
}

/// A low-stock product with its fill level
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LowStockAlert {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub quantity_available: u32,
    pub reorder_level: u32,
    /// quantity / reorder level clamped to [0, 1]; 0.0 at reorder level 0
    pub fill_ratio: f64,
}

impl LowStockAlert {
    pub fn from_product(product: &Product) -> Self {
        let fill_ratio = if product.reorder_level == 0 {
            0.0
        } else {
            (f64::from(product.quantity_available) / f64::from(product.reorder_level))
                .clamp(0.0, 1.0)
        };

        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            category: product.category,
            quantity_available: product.quantity_available,
            reorder_level: product.reorder_level,
            fill_ratio,
        }
    }
}

/// Low-stock products in collection order
pub fn low_stock_alerts(products: &[Product]) -> Vec<LowStockAlert> {
    products
        .iter()
        .filter(|p| p.is_low_stock())
        .map(LowStockAlert::from_product)
        .collect()
}
