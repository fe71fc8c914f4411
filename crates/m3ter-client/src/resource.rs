//! Generic CRUD and pagination for one resource type.

use std::marker::PhantomData;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;

use m3ter_core::{Page, Resource};

use crate::client::{with_query, ApiClient};
use crate::error::Result;
use crate::retry::retry_with_policy;

/// CRUD operations for resource type `R`, scoped to one [`ApiClient`].
///
/// Obtained from [`ApiClient::resource`]:
///
/// ```no_run
/// # async fn example(api: &m3ter_client::ApiClient) -> m3ter_client::Result<()> {
/// use m3ter_core::Meter;
///
/// let meters = api.resource::<Meter>().load().await?;
/// let id = api.resource::<Meter>().code_get("api_calls").await?;
/// # Ok(())
/// # }
/// ```
pub struct ResourceClient<'a, R> {
    client: &'a ApiClient,
    _resource: PhantomData<fn() -> R>,
}

impl<'a, R: Resource> ResourceClient<'a, R> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self {
            client,
            _resource: PhantomData,
        }
    }

    fn collection_url(&self) -> String {
        self.client.api_url(R::PATH)
    }

    fn item_url(&self, id: &str) -> String {
        format!("{}/{id}", self.collection_url())
    }

    /// Create a resource from its full attribute set.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is not the
    /// created resource.
    pub async fn create(&self, resource: &R) -> Result<R> {
        let body = serde_json::to_value(resource)?;
        let created: R = self
            .client
            .send(Method::POST, self.collection_url(), Some(body))
            .await?;

        tracing::info!(resource = R::KIND, id = ?created.id(), "Created");
        Ok(created)
    }

    /// Fetch one resource by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is malformed.
    pub async fn get(&self, id: &str) -> Result<R> {
        self.client.send(Method::GET, self.item_url(id), None).await
    }

    /// Fetch one page, continuing from `next_token` when given.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is malformed.
    pub async fn list(&self, next_token: Option<&str>) -> Result<Page<R>> {
        self.page(next_token).await
    }

    async fn page<T: DeserializeOwned>(&self, next_token: Option<&str>) -> Result<Page<T>> {
        let mut params = Vec::new();
        if let Some(size) = self.client.config().page_size {
            params.push(("pageSize", size.to_string()));
        }
        if let Some(token) = next_token {
            params.push(("nextToken", token.to_string()));
        }

        let url = with_query(&self.collection_url(), &params)?;
        self.client.send(Method::GET, url, None).await
    }

    /// Replace a resource with the given attribute set.
    ///
    /// The full set is always sent. Fields left as `None` are omitted from
    /// the body, so callers updating a resource should start from the
    /// current server state (`get`) and carry its `version`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is malformed.
    pub async fn update(&self, id: &str, resource: &R) -> Result<R> {
        let body = serde_json::to_value(resource)?;
        let updated = self
            .client
            .send(Method::PUT, self.item_url(id), Some(body))
            .await?;

        tracing::info!(resource = R::KIND, id, "Updated");
        Ok(updated)
    }

    /// Delete a resource, retrying transient failures per the client's
    /// retry policy.
    ///
    /// Returns the server's response body, `Value::Null` when empty.
    ///
    /// # Errors
    ///
    /// Returns the first non-retryable error, or the last error after the
    /// retry budget is spent.
    pub async fn delete(&self, id: &str) -> Result<Value> {
        let url = self.item_url(id);
        let client = self.client;

        let response = retry_with_policy(&client.config().retry, || {
            let url = url.clone();
            async move {
                client
                    .execute(Method::DELETE, url, None)
                    .await?
                    .error_for_status()
            }
        })
        .await?;

        tracing::info!(resource = R::KIND, id, "Deleted");

        if response.body.trim().is_empty() {
            Ok(Value::Null)
        } else {
            response.json()
        }
    }

    /// Fetch every page and return all items in request order.
    ///
    /// Keeps requesting while the previous page carried a `nextToken` and
    /// stops at the first page without one, so N pages cost exactly N
    /// requests.
    ///
    /// # Errors
    ///
    /// Returns the first page error; no partial result is returned.
    pub async fn load(&self) -> Result<Vec<R>> {
        self.load_pages().await
    }

    /// Fetch every page like [`load`](Self::load), leaving each item as
    /// undecoded JSON.
    ///
    /// Only the page envelope is checked, so one item with an unexpected
    /// shape does not fail the whole collection.
    ///
    /// # Errors
    ///
    /// Returns the first page error.
    pub async fn load_raw(&self) -> Result<Vec<Value>> {
        self.load_pages().await
    }

    async fn load_pages<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut next_token: Option<String> = None;
        let mut pages = 0_usize;

        loop {
            let page: Page<T> = self.page(next_token.as_deref()).await?;
            pages += 1;
            items.extend(page.data);

            match page.next_token {
                Some(token) => next_token = Some(token),
                None => break,
            }
        }

        tracing::info!(resource = R::KIND, count = items.len(), pages, "Loaded collection");
        Ok(items)
    }

    /// ID of the first resource, in load order, whose `code` equals `code`.
    ///
    /// Loads the whole collection; intended for collections of hundreds of
    /// items.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails.
    pub async fn code_get(&self, code: &str) -> Result<Option<String>> {
        let items = self.load().await?;
        Ok(first_id(&items, |item| item.code() == Some(code)))
    }

    /// ID of the first resource, in load order, whose `name` equals `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails.
    pub async fn name_get(&self, name: &str) -> Result<Option<String>> {
        let items = self.load().await?;
        Ok(first_id(&items, |item| item.name() == Some(name)))
    }
}

fn first_id<R: Resource>(items: &[R], matches: impl Fn(&R) -> bool) -> Option<String> {
    items
        .iter()
        .find(|item| matches(item))
        .and_then(|item| item.id().map(str::to_owned))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use m3ter_core::{Account, Meter};
    use serde_json::json;

    use crate::testing::FakeTransport;
    use crate::ClientConfig;

    const METERS: &str = "http://fake/organizations/org-1/meters";

    fn client(fake: &Arc<FakeTransport>) -> ApiClient {
        let config = ClientConfig::new("org-1", "key", "secret").with_api_url("http://fake");
        ApiClient::with_token(config, fake.clone(), "token")
    }

    fn meter(id: &str, code: &str) -> Meter {
        Meter {
            id: Some(id.into()),
            code: Some(code.into()),
            ..Meter::default()
        }
    }

    #[test]
    fn first_match_wins() {
        let items = vec![meter("m-1", "a"), meter("m-2", "b"), meter("m-3", "b")];
        assert_eq!(
            first_id(&items, |m| m.code() == Some("b")),
            Some("m-2".to_string())
        );
    }

    #[test]
    fn no_match_is_none() {
        let items = vec![meter("m-1", "a")];
        assert_eq!(first_id(&items, |m| m.code() == Some("z")), None);
    }

    #[tokio::test]
    async fn load_concatenates_pages_in_order() {
        let fake = Arc::new(FakeTransport::new());
        fake.reply(&Method::GET, METERS, 200, &json!({
            "data": [{"id": "m-1"}, {"id": "m-2"}],
            "nextToken": "t1"
        }));
        fake.reply(&Method::GET, &format!("{METERS}?nextToken=t1"), 200, &json!({
            "data": [{"id": "m-3"}],
            "nextToken": "t2"
        }));
        fake.reply(&Method::GET, &format!("{METERS}?nextToken=t2"), 200, &json!({
            "data": [{"id": "m-4"}]
        }));

        let api = client(&fake);
        let meters = api.resource::<Meter>().load().await.unwrap();

        let ids: Vec<_> = meters.iter().filter_map(Meter::id).collect();
        assert_eq!(ids, ["m-1", "m-2", "m-3", "m-4"]);
        assert_eq!(fake.count(&Method::GET, METERS), 3);
    }

    #[tokio::test]
    async fn single_page_is_one_request() {
        let fake = Arc::new(FakeTransport::new());
        fake.reply(&Method::GET, METERS, 200, &json!({"data": [{"id": "m-1"}]}));

        let api = client(&fake);
        let meters = api.resource::<Meter>().load().await.unwrap();

        assert_eq!(meters.len(), 1);
        assert_eq!(fake.requests().len(), 1);
    }

    #[tokio::test]
    async fn load_fails_on_page_error() {
        let fake = Arc::new(FakeTransport::new());
        fake.reply(&Method::GET, METERS, 200, &json!({"data": [], "nextToken": "t1"}));
        fake.reply(&Method::GET, &format!("{METERS}?nextToken=t1"), 500, &json!({}));

        let api = client(&fake);
        let err = api.resource::<Meter>().load().await.unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn code_get_returns_first_match() {
        let fake = Arc::new(FakeTransport::new());
        fake.reply(&Method::GET, METERS, 200, &json!({
            "data": [{"id": "m-1", "code": "a"}, {"id": "m-2", "code": "b"}],
            "nextToken": "t1"
        }));
        fake.reply(&Method::GET, &format!("{METERS}?nextToken=t1"), 200, &json!({
            "data": [{"id": "m-3", "code": "b"}]
        }));

        let api = client(&fake);
        let id = api.resource::<Meter>().code_get("b").await.unwrap();
        assert_eq!(id.as_deref(), Some("m-2"));
    }

    #[tokio::test]
    async fn name_get_not_found() {
        let fake = Arc::new(FakeTransport::new());
        fake.reply(
            &Method::GET,
            "http://fake/organizations/org-1/accounts",
            200,
            &json!({"data": [{"id": "a-1", "name": "Acme"}]}),
        );

        let api = client(&fake);
        let id = api.resource::<Account>().name_get("Globex").await.unwrap();
        assert_eq!(id, None);
    }

    #[tokio::test]
    async fn load_raw_keeps_items_that_would_not_decode() {
        let fake = Arc::new(FakeTransport::new());
        fake.reply(&Method::GET, METERS, 200, &json!({
            "data": [{"id": "m-1"}, {"id": 7, "code": ["not", "text"]}],
            "nextToken": "t1"
        }));
        fake.reply(&Method::GET, &format!("{METERS}?nextToken=t1"), 200, &json!({
            "data": [{"id": "m-3"}]
        }));

        let api = client(&fake);
        let items = api.resource::<Meter>().load_raw().await.unwrap();

        assert_eq!(items.len(), 3);
        assert_eq!(items[1]["id"], json!(7));
        assert_eq!(fake.count(&Method::GET, METERS), 2);
    }

    #[tokio::test]
    async fn list_sends_page_size() {
        let fake = Arc::new(FakeTransport::new());
        fake.reply(
            &Method::GET,
            &format!("{METERS}?pageSize=200"),
            200,
            &json!({"data": []}),
        );

        let config = ClientConfig::new("org-1", "key", "secret")
            .with_api_url("http://fake")
            .with_page_size(200);
        let api = ApiClient::with_token(config, fake.clone(), "token");
        let page = api.resource::<Meter>().list(None).await.unwrap();
        assert!(!page.has_more());
    }
}
