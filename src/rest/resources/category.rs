//! Category resource implementation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::rest::CatalogResource;

/// A node of a category tree. Root categories have no parent.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Category {
    /// The category code.
    pub code: String,

    /// Code of the parent category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    /// Labels keyed by locale code.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    /// Remaining fields, passed through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl Category {
    /// Returns `true` for the root of a category tree.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

impl CatalogResource for Category {
    const NAME: &'static str = "Category";
    const PATH: &'static str = "categories";

    fn key(&self) -> &str {
        &self.code
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_category_round_trip_keeps_labels() {
        let category: Category = serde_json::from_value(json!({
            "code": "winter_collection",
            "parent": "master",
            "labels": {"en_US": "Winter collection", "fr_FR": "Collection hiver"}
        }))
        .unwrap();

        assert!(!category.is_root());
        assert_eq!(category.labels["fr_FR"], "Collection hiver");
        assert_eq!(Category::item_path(category.key()), "categories/winter_collection");
    }
}
