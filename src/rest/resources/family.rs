//! Family resource implementation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::rest::CatalogResource;

/// A family: the set of attributes shared by a kind of product.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Family {
    /// The family code.
    pub code: String,

    /// Code of the attribute used as the product label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_as_label: Option<String>,

    /// Codes of the attributes in the family.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<String>,

    /// Required attribute codes, keyed by channel code.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attribute_requirements: BTreeMap<String, Vec<String>>,

    /// Labels keyed by locale code.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    /// Remaining fields, passed through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl CatalogResource for Family {
    const NAME: &'static str = "Family";
    const PATH: &'static str = "families";

    fn key(&self) -> &str {
        &self.code
    }
}
