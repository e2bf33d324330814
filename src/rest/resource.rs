//! Resource trait for catalog entities.
//!
//! This module defines the [`CatalogResource`] trait. Types implementing it
//! gain `find()`, `list()`, `list_all()`, `create()`, `upsert()` and
//! `delete()` on top of a [`RestClient`].
//!
//! Catalog entities are addressed by a string key (a product identifier or a
//! category/family/attribute/channel code), always percent-encoded in paths.
//!
//! # Implementing a Resource
//!
//! ```rust,ignore
//! use catalog_api::rest::CatalogResource;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! struct AssociationType {
//!     code: String,
//! }
//!
//! impl CatalogResource for AssociationType {
//!     const NAME: &'static str = "AssociationType";
//!     const PATH: &'static str = "association-types";
//!
//!     fn key(&self) -> &str {
//!         &self.code
//!     }
//! }
//! ```

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clients::{InvalidHttpRequestError, RestClient, RestError};
use crate::rest::PagedResult;

/// Common query parameters of list endpoints.
///
/// # Example
///
/// ```rust
/// use catalog_api::rest::ListParams;
///
/// let params = ListParams {
///     limit: Some(100),
///     with_count: Some(true),
///     ..Default::default()
/// };
/// let query = params.to_query();
/// assert_eq!(query.get("limit"), Some(&"100".to_string()));
/// assert_eq!(query.get("with_count"), Some(&"true".to_string()));
/// assert!(!query.contains_key("page"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListParams {
    /// Items per page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Page number, starting at 1.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Ask the server to report `items_count`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_count: Option<bool>,
    /// Search filter, as the JSON string the server expects.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl ListParams {
    /// Converts the parameters into a query map, skipping unset fields.
    #[must_use]
    pub fn to_query(&self) -> HashMap<String, String> {
        serde_json::to_value(self)
            .map(|value| value_to_query(&value))
            .unwrap_or_default()
    }
}

/// A catalog entity reachable under `{endpoint}/api/rest/v1/{PATH}`.
#[allow(async_fn_in_trait)]
pub trait CatalogResource: Serialize + DeserializeOwned + Clone + Send + Sync + Sized {
    /// The singular name of the resource (e.g., "Product").
    const NAME: &'static str;

    /// The collection path (e.g., "products").
    const PATH: &'static str;

    /// Returns the key that addresses this entity (identifier or code).
    fn key(&self) -> &str;

    /// Returns the path of a single entity, with the key percent-encoded.
    #[must_use]
    fn item_path(key: &str) -> String {
        format!("{}/{}", Self::PATH, urlencoding::encode(key))
    }

    /// Finds a single entity by key.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::Api`] with status 404 if the entity does not
    /// exist, or any other request failure.
    async fn find(client: &RestClient, key: &str) -> Result<Self, RestError> {
        client.get_json(&Self::item_path(key), None).await
    }

    /// Fetches one page of entities.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::Api`] if the request fails.
    async fn list(
        client: &RestClient,
        params: Option<ListParams>,
    ) -> Result<PagedResult<Self>, RestError> {
        client
            .get_page(Self::PATH, params.map(|p| p.to_query()))
            .await
    }

    /// Fetches every entity, following `next` links across all pages.
    ///
    /// # Errors
    ///
    /// Returns the first failing page's error.
    async fn list_all(
        client: &RestClient,
        params: Option<ListParams>,
    ) -> Result<PagedResult<Self>, RestError> {
        client
            .get_all(Self::PATH, params.map(|p| p.to_query()))
            .await
    }

    /// Creates the entity with `POST {PATH}`.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::Api`] if the server rejects the entity (e.g., 409
    /// or 422) or the request fails.
    async fn create(&self, client: &RestClient) -> Result<(), RestError> {
        let body = to_body(self)?;
        client.post(Self::PATH, body, None).await?;
        Ok(())
    }

    /// Creates or partially updates the entity with `PATCH {PATH}/{key}`.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::Api`] if the server rejects the entity or the
    /// request fails.
    async fn upsert(&self, client: &RestClient) -> Result<(), RestError> {
        let body = to_body(self)?;
        client.patch(&Self::item_path(self.key()), body, None).await?;
        Ok(())
    }

    /// Deletes the entity with the given key.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::Api`] if the request fails.
    async fn delete(client: &RestClient, key: &str) -> Result<(), RestError> {
        client.delete(&Self::item_path(key), None).await?;
        Ok(())
    }
}

fn to_body<T: Serialize>(resource: &T) -> Result<Value, RestError> {
    serde_json::to_value(resource).map_err(|e| {
        InvalidHttpRequestError::UnserializableBody {
            reason: e.to_string(),
        }
        .into()
    })
}

/// Flattens a JSON object into query parameters.
fn value_to_query(value: &Value) -> HashMap<String, String> {
    let mut query = HashMap::new();

    if let Value::Object(map) = value {
        for (key, val) in map {
            match val {
                Value::Null => {}
                Value::String(s) => {
                    query.insert(key.clone(), s.clone());
                }
                Value::Number(n) => {
                    query.insert(key.clone(), n.to_string());
                }
                Value::Bool(b) => {
                    query.insert(key.clone(), b.to_string());
                }
                Value::Array(_) | Value::Object(_) => {
                    query.insert(key.clone(), val.to_string());
                }
            }
        }
    }

    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct MockEntity {
        code: String,
    }

    impl CatalogResource for MockEntity {
        const NAME: &'static str = "MockEntity";
        const PATH: &'static str = "mock-entities";

        fn key(&self) -> &str {
            &self.code
        }
    }

    #[test]
    fn test_item_path_encodes_key() {
        assert_eq!(MockEntity::item_path("shoes"), "mock-entities/shoes");
        assert_eq!(
            MockEntity::item_path("red shirt/xl"),
            "mock-entities/red%20shirt%2Fxl"
        );
    }

    #[test]
    fn test_list_params_skip_unset_fields() {
        let query = ListParams::default().to_query();
        assert!(query.is_empty());
    }

    #[test]
    fn test_list_params_search_passes_through() {
        let params = ListParams {
            search: Some(r#"{"enabled":[{"operator":"=","value":true}]}"#.to_string()),
            page: Some(2),
            ..Default::default()
        };
        let query = params.to_query();
        assert_eq!(
            query.get("search"),
            Some(&r#"{"enabled":[{"operator":"=","value":true}]}"#.to_string())
        );
        assert_eq!(query.get("page"), Some(&"2".to_string()));
    }

    #[test]
    fn test_value_to_query_serializes_nested_values() {
        let query = value_to_query(&json!({
            "locales": ["en_US", "fr_FR"],
            "scope": null,
            "options": {"a": 1}
        }));
        assert_eq!(query.get("locales"), Some(&r#"["en_US","fr_FR"]"#.to_string()));
        assert_eq!(query.get("options"), Some(&r#"{"a":1}"#.to_string()));
        assert!(!query.contains_key("scope"));
    }
}
