//! Channel resource implementation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::rest::CatalogResource;

/// A channel (scope): a destination for product data.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Channel {
    /// The channel code.
    pub code: String,

    /// Code of the category tree published to this channel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_tree: Option<String>,

    /// Activated currency codes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub currencies: Vec<String>,

    /// Activated locale codes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locales: Vec<String>,

    /// Labels keyed by locale code.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    /// Remaining fields, passed through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl CatalogResource for Channel {
    const NAME: &'static str = "Channel";
    const PATH: &'static str = "channels";

    fn key(&self) -> &str {
        &self.code
    }
}
