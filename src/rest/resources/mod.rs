//! Catalog resource types.
//!
//! Each type implements [`CatalogResource`](crate::rest::CatalogResource)
//! and models the commonly used fields of its entity. Fields that are not
//! modeled are preserved in an `extra` map, so a fetched entity can be sent
//! back with `upsert()` without losing data.
//!
//! | Type | Path | Key |
//! |------|------|-----|
//! | [`Product`] | `products` | `identifier` |
//! | [`Category`] | `categories` | `code` |
//! | [`Family`] | `families` | `code` |
//! | [`Attribute`] | `attributes` | `code` |
//! | [`Channel`] | `channels` | `code` |
//!
//! # Example
//!
//! ```rust,ignore
//! use catalog_api::rest::CatalogResource;
//! use catalog_api::rest::resources::Category;
//!
//! let category = Category {
//!     code: "winter".to_string(),
//!     parent: Some("master".to_string()),
//!     ..Default::default()
//! };
//! category.upsert(&client).await?;
//!
//! let tree = Category::list_all(&client, None).await?;
//! println!("{} categories", tree.len());
//! ```

mod attribute;
mod category;
mod channel;
mod family;
mod product;

pub use attribute::Attribute;
pub use category::Category;
pub use channel::Channel;
pub use family::Family;
pub use product::{Product, ProductValue};
