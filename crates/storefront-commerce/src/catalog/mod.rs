//! Product catalog module.
//!
//! Contains the canonical product type, the ingestion adapter that produces
//! it, categories, admin drafts and the demo dataset.

mod category;
mod demo;
mod draft;
pub mod normalize;
mod product;

pub use category::{category_counts, default_categories, Category, CategoryCount};
pub use demo::{demo_products, DEMO_NOTICE};
pub use draft::{ProductDraft, MAX_PRICE, MAX_STOCK};
pub use normalize::{normalize_payload, normalize_record, normalize_records};
pub use product::{clamp_rating, Product, MAX_RATING};
