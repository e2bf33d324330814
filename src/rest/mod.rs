//! Catalog resources and paged results.
//!
//! This module provides the pieces built on top of the
//! [`RestClient`](crate::clients::RestClient):
//!
//! - **[`PagedResult<T>`]**: One page of a list endpoint, derefs to `[T]`
//! - **[`drain`]**: Follows `next` links and merges every page into the first
//! - **[`CatalogResource`] trait**: `find`, `list`, `list_all`, `create`,
//!   `upsert` and `delete` for catalog entities
//! - **[`resources`]**: Products, categories, families, attributes and channels
//!
//! # Example
//!
//! ```rust,ignore
//! use catalog_api::RestClient;
//! use catalog_api::rest::{CatalogResource, ListParams};
//! use catalog_api::rest::resources::Product;
//!
//! let client = RestClient::new(&config)?;
//!
//! // Find a single product
//! let product = Product::find(&client, "tshirt-red").await?;
//!
//! // First page only
//! let page = Product::list(&client, Some(ListParams { limit: Some(10), ..Default::default() })).await?;
//! if page.has_next_page() {
//!     println!("More products available");
//! }
//!
//! // Every product, across all pages; links collapse to `first`
//! let all = Product::list_all(&client, None).await?;
//! println!("{} products", all.len());
//!
//! // Create or update
//! let mut product = product;
//! product.enabled = Some(false);
//! product.upsert(&client).await?;
//! ```

mod page;
mod resource;

pub mod resources;

pub use page::{drain, drain_with_policy, Link, PageLinks, PagedResult};
pub use resource::{CatalogResource, ListParams};
