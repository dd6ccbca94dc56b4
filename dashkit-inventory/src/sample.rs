//! Random sample inventory

use rand::Rng;

use crate::model::{Category, Product};
use crate::store::format_product_id;

/// Default number of generated products
pub const DEFAULT_SAMPLE_SIZE: usize = 20;

/// Base names; each generated product gets a `-100`..`-999` suffix
pub const PRODUCT_NAMES: [&str; 20] = [
    "Phone",
    "T-Shirt",
    "Bread",
    "Notebook",
    "Football",
    "Laptop",
    "Jeans",
    "Milk",
    "Pen",
    "Tennis Ball",
    "Tablet",
    "Jacket",
    "Eggs",
    "Marker",
    "Cricket Bat",
    "Headphones",
    "Shoes",
    "Butter",
    "Stapler",
    "Basketball",
];

/// `count` random products with ids `P001..`
///
/// Category uniform over all categories, quantity 0..=100, reorder level 5..=30.
pub fn generate_sample<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<Product> {
    (1..=count)
        .map(|sequence| {
            let category = Category::ALL[rng.gen_range(0..Category::ALL.len())];
            let base = PRODUCT_NAMES[rng.gen_range(0..PRODUCT_NAMES.len())];
            let suffix: u32 = rng.gen_range(100..=999);

            Product {
                id: format_product_id(u32::try_from(sequence).unwrap_or(u32::MAX)),
                name: format!("{}-{}", base, suffix),
                category,
                quantity_available: rng.gen_range(0..=100),
                reorder_level: rng.gen_range(5..=30),
            }
        })
        .collect()
}
