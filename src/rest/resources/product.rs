//! Product resource implementation.
//!
//! Products are addressed by their `identifier`. Attribute data lives in
//! `values`, keyed by attribute code, with one entry per locale/scope
//! combination.
//!
//! # Example
//!
//! ```rust,ignore
//! use catalog_api::rest::{CatalogResource, ListParams};
//! use catalog_api::rest::resources::Product;
//!
//! // Find a single product
//! let product = Product::find(&client, "tshirt-red").await?;
//!
//! // Every enabled product, across all pages
//! let params = ListParams {
//!     search: Some(r#"{"enabled":[{"operator":"=","value":true}]}"#.to_string()),
//!     limit: Some(100),
//!     ..Default::default()
//! };
//! let products = Product::list_all(&client, Some(params)).await?;
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::rest::CatalogResource;

/// One localized and/or scoped value of a product attribute.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductValue {
    /// Locale code, or `None` for non-localizable attributes.
    pub locale: Option<String>,
    /// Channel code, or `None` for non-scopable attributes.
    pub scope: Option<String>,
    /// The value itself; its shape depends on the attribute type.
    pub data: Value,
}

/// A product in the catalog.
///
/// ## Read-Only Fields
/// - `created` - When the product was created
/// - `updated` - When the product was last updated
///
/// Fields not modeled here are kept in `extra` and sent back unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Product {
    /// The unique identifier (SKU) of the product.
    pub identifier: String,

    /// Whether the product is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// The product's family code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,

    /// Codes of the categories the product is classified in.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,

    /// Code of the parent product model, if the product is a variant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    /// Attribute values keyed by attribute code.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub values: BTreeMap<String, Vec<ProductValue>>,

    /// When the product was created.
    /// Read-only field.
    #[serde(skip_serializing)]
    pub created: Option<DateTime<Utc>>,

    /// When the product was last updated.
    /// Read-only field.
    #[serde(skip_serializing)]
    pub updated: Option<DateTime<Utc>>,

    /// Remaining fields, passed through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl CatalogResource for Product {
    const NAME: &'static str = "Product";
    const PATH: &'static str = "products";

    fn key(&self) -> &str {
        &self.identifier
    }
}
