//! Paged list results and the pagination walker.
//!
//! List endpoints answer with a hypermedia envelope:
//!
//! ```json
//! {
//!   "_links": {"self": {"href": "..."}, "first": {"href": "..."}, "next": {"href": "..."}},
//!   "current_page": 1,
//!   "items_count": 42,
//!   "_embedded": {"items": [ ... ]}
//! }
//! ```
//!
//! [`PagedResult<T>`] deserializes that envelope and derefs to the item slice.
//! [`drain`] follows `_links.next` until the server stops sending one and
//! merges every page into the first.
//!
//! # Example
//!
//! ```rust,ignore
//! use catalog_api::rest::{drain, PagedResult};
//!
//! let mut page: PagedResult<serde_json::Value> = client.execute_json(request).await?;
//! drain(&client, &mut page).await?;
//!
//! for item in page.iter() {
//!     println!("{item}");
//! }
//! ```

use std::ops::{Deref, DerefMut};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::clients::{ApiError, HttpClient, HttpMethod, HttpRequest, RetryPolicy};

/// A hypermedia link.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Absolute URL of the linked page.
    pub href: String,
}

impl Link {
    /// Creates a link to `href`.
    #[must_use]
    pub fn new(href: impl Into<String>) -> Self {
        Self { href: href.into() }
    }
}

/// The `_links` object of a list response.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLinks {
    /// Link to the page itself.
    #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<Link>,
    /// Link to the first page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<Link>,
    /// Link to the previous page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<Link>,
    /// Link to the next page. Absent on the last page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<Link>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct Embedded<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

impl<T> Default for Embedded<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

/// One page of a list response, or several pages merged by [`drain`].
///
/// Implements `Deref<Target = [T]>`, so slice methods (`len`, `iter`,
/// indexing) work on the items directly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PagedResult<T> {
    /// Navigation links.
    #[serde(rename = "_links", default)]
    pub links: PageLinks,
    /// Page number, if the server reported it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_page: Option<u64>,
    /// Total item count, if requested with `with_count=true`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items_count: Option<u64>,
    #[serde(rename = "_embedded", default = "Embedded::default")]
    embedded: Embedded<T>,
}

impl<T> Default for PagedResult<T> {
    fn default() -> Self {
        Self {
            links: PageLinks::default(),
            current_page: None,
            items_count: None,
            embedded: Embedded::default(),
        }
    }
}

impl<T> PagedResult<T> {
    /// Creates a page holding `items` and `links`.
    #[must_use]
    pub fn new(items: Vec<T>, links: PageLinks) -> Self {
        Self {
            links,
            current_page: None,
            items_count: None,
            embedded: Embedded { items },
        }
    }

    /// Returns the items.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.embedded.items
    }

    /// Consumes the result and returns the items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.embedded.items
    }

    /// Returns `true` if there is a page after this one.
    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        self.links.next.is_some()
    }
}

impl<T> Deref for PagedResult<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.embedded.items
    }
}

impl<T> DerefMut for PagedResult<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.embedded.items
    }
}

/// Follows `next` links until exhausted, appending every page's items to
/// `result`.
///
/// Each follow-up is a plain GET of the link URL through `client`, so it is
/// authenticated and retried like any other request. No page limit is
/// enforced. On success `result.links` keeps only `first`.
///
/// # Errors
///
/// Returns the first failing page's [`ApiError`]. `result` is left
/// unchanged in that case.
pub async fn drain<T: DeserializeOwned>(
    client: &HttpClient,
    result: &mut PagedResult<T>,
) -> Result<(), ApiError> {
    drain_with_policy(client, result, None).await
}

/// Same as [`drain`], with a retry policy applied to every follow-up request.
///
/// # Errors
///
/// Returns the first failing page's [`ApiError`]. `result` is left
/// unchanged in that case.
pub async fn drain_with_policy<T: DeserializeOwned>(
    client: &HttpClient,
    result: &mut PagedResult<T>,
    policy: Option<RetryPolicy>,
) -> Result<(), ApiError> {
    let mut collected: Vec<T> = Vec::new();
    let mut next = result.links.next.clone();
    let mut pages: u32 = 1;

    while let Some(link) = next {
        let mut builder = HttpRequest::builder_for_url(HttpMethod::Get, link.href);
        if let Some(policy) = &policy {
            builder = builder.retry_policy(policy.clone());
        }
        let page: PagedResult<T> = client.execute_json(builder.build()?).await?;

        pages += 1;
        next = page.links.next;
        collected.extend(page.embedded.items);
    }

    tracing::debug!(pages, items = result.len() + collected.len(), "Drained paged result");

    result.embedded.items.extend(collected);
    result.links = PageLinks {
        first: result.links.first.take(),
        ..PageLinks::default()
    };
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserializes_hypermedia_envelope() {
        let page: PagedResult<serde_json::Value> = serde_json::from_value(json!({
            "_links": {
                "self": {"href": "https://pim.example.com/api/rest/v1/categories?page=2"},
                "first": {"href": "https://pim.example.com/api/rest/v1/categories?page=1"},
                "previous": {"href": "https://pim.example.com/api/rest/v1/categories?page=1"},
                "next": {"href": "https://pim.example.com/api/rest/v1/categories?page=3"}
            },
            "current_page": 2,
            "_embedded": {"items": [{"code": "shoes"}, {"code": "hats"}]}
        }))
        .unwrap();

        assert_eq!(page.len(), 2);
        assert_eq!(page[0]["code"], "shoes");
        assert_eq!(page.current_page, Some(2));
        assert_eq!(page.items_count, None);
        assert!(page.has_next_page());
        assert_eq!(
            page.links.self_link.as_ref().unwrap().href,
            "https://pim.example.com/api/rest/v1/categories?page=2"
        );
    }

    #[test]
    fn test_missing_embedded_means_no_items() {
        let page: PagedResult<serde_json::Value> = serde_json::from_value(json!({
            "_links": {"first": {"href": "https://pim.example.com/api/rest/v1/products"}}
        }))
        .unwrap();

        assert!(page.is_empty());
        assert!(!page.has_next_page());
    }

    #[test]
    fn test_serialize_skips_absent_links() {
        let page = PagedResult::new(
            vec![1, 2],
            PageLinks {
                first: Some(Link::new("https://pim.example.com/api/rest/v1/x")),
                ..PageLinks::default()
            },
        );

        let value = serde_json::to_value(&page).unwrap();
        assert_eq!(
            value,
            json!({
                "_links": {"first": {"href": "https://pim.example.com/api/rest/v1/x"}},
                "_embedded": {"items": [1, 2]}
            })
        );
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sku {
        identifier: String,
    }

    fn parse_page<T: DeserializeOwned>(value: serde_json::Value) -> PagedResult<T> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_items_need_no_default_impl() {
        let page: PagedResult<Sku> = parse_page(json!({
            "_links": {},
            "_embedded": {"items": [{"identifier": "sku-1"}]}
        }));
        assert_eq!(page.items(), &[Sku { identifier: "sku-1".to_string() }]);

        let empty: PagedResult<Sku> = parse_page(json!({"_links": {}}));
        assert!(empty.is_empty());
    }

    #[test]
    fn test_into_items_and_deref_mut() {
        let mut page = PagedResult::new(vec![3, 1, 2], PageLinks::default());
        page.sort_unstable();
        assert_eq!(page.items(), &[1, 2, 3]);
        assert_eq!(page.into_items(), vec![1, 2, 3]);
    }
}
