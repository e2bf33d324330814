//! Attribute resource implementation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::rest::CatalogResource;

/// A product attribute definition.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Attribute {
    /// The attribute code.
    pub code: String,

    /// Attribute type (e.g., `pim_catalog_text`, `pim_catalog_metric`).
    #[serde(rename = "type")]
    pub attribute_type: String,

    /// Code of the attribute group.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    /// Whether values differ per locale.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub localizable: Option<bool>,

    /// Whether values differ per channel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scopable: Option<bool>,

    /// Labels keyed by locale code.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    /// Remaining fields, passed through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl CatalogResource for Attribute {
    const NAME: &'static str = "Attribute";
    const PATH: &'static str = "attributes";

    fn key(&self) -> &str {
        &self.code
    }
}
