use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use tokio::sync::RwLock;

use super::ApiError;
use super::types::{Comment, HnItem, Story};

pub const DEFAULT_API_BASE: &str = "https://hacker-news.firebaseio.com/v0";
const CACHE_TTL: Duration = Duration::from_secs(60);

struct CacheEntry<T> {
    data: T,
    fetched_at: Instant,
}

impl<T> CacheEntry<T> {
    fn is_fresh(&self) -> bool {
        self.fetched_at.elapsed() < CACHE_TTL
    }
}

/// HTTP client for the HN item API.
///
/// Successful item fetches are cached briefly so that a prefetch warms the
/// request issued right after it. Each entry is handed out once and
/// expired entries are pruned on insert. Absent items and failures are never
/// cached. No timeout and no retry.
pub struct HnClient {
    http: reqwest::Client,
    base_url: String,
    item_cache: Arc<RwLock<HashMap<u64, CacheEntry<HnItem>>>>,
}

impl HnClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            item_cache: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the full ranked list of top story ids.
    pub async fn fetch_top_ids(&self) -> Result<Vec<u64>, ApiError> {
        let url = format!("{}/topstories.json", self.base_url);
        let ids: Vec<u64> = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(ids)
    }

    /// Fetch a single item document. `Ok(None)` means the API answered
    /// `null` for this id.
    pub async fn fetch_item(&self, id: u64) -> Result<Option<HnItem>, ApiError> {
        // An entry serves one read; a remount after that goes to the network.
        let cached = self.item_cache.write().await.remove(&id);
        if let Some(entry) = cached
            && entry.is_fresh()
        {
            return Ok(Some(entry.data));
        }

        let url = format!("{}/item/{}.json", self.base_url, id);
        let item: Option<HnItem> = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(item) = &item {
            let mut cache = self.item_cache.write().await;
            cache.retain(|_, entry| entry.is_fresh());
            cache.insert(
                id,
                CacheEntry {
                    data: item.clone(),
                    fetched_at: Instant::now(),
                },
            );
        }

        Ok(item)
    }

    pub async fn fetch_story(&self, id: u64) -> Result<Option<Story>, ApiError> {
        self.fetch_item(id)
            .await?
            .map(Story::from_item)
            .transpose()
    }

    pub async fn fetch_comment(&self, id: u64) -> Result<Option<Comment>, ApiError> {
        Ok(self.fetch_item(id).await?.map(Comment::from_item))
    }

    /// Fetch every story concurrently and wait for all of them to settle.
    /// Results keep the order of `ids`.
    pub async fn fetch_stories(&self, ids: &[u64]) -> Vec<(u64, Result<Option<Story>, ApiError>)> {
        let futures: Vec<_> = ids.iter().map(|&id| self.fetch_story(id)).collect();
        let results = join_all(futures).await;
        ids.iter().copied().zip(results).collect()
    }

    /// Fetch every id concurrently and discard the documents. Returns how
    /// many members failed.
    pub async fn prefetch(&self, ids: &[u64]) -> usize {
        let futures: Vec<_> = ids.iter().map(|&id| self.fetch_item(id)).collect();
        join_all(futures)
            .await
            .into_iter()
            .filter(Result::is_err)
            .count()
    }
}

impl Clone for HnClient {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            item_cache: Arc::clone(&self.item_cache),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> HnClient {
        HnClient::new(format!("{}/v0", server.uri())).unwrap()
    }

    #[tokio::test]
    async fn fetch_top_ids_keeps_ranking() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v0/topstories.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([30, 10, 20])))
            .mount(&server)
            .await;

        let ids = assert_ok!(client_for(&server).await.fetch_top_ids().await);
        assert_eq!(ids, vec![30, 10, 20]);
    }

    #[tokio::test]
    async fn null_item_is_absent_not_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v0/item/7.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("null"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        assert_eq!(assert_ok!(client.fetch_story(7).await), None);
        assert_eq!(assert_ok!(client.fetch_comment(7).await), None);
    }

    #[tokio::test]
    async fn non_success_status_is_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v0/item/8.json"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = assert_err!(client_for(&server).await.fetch_item(8).await);
        assert!(matches!(err, ApiError::HttpStatus(503, _)));
    }

    #[tokio::test]
    async fn malformed_body_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v0/item/9.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&server)
            .await;

        let err = assert_err!(client_for(&server).await.fetch_item(9).await);
        assert!(matches!(err, ApiError::Parse(_)));
    }

    #[tokio::test]
    async fn fetch_stories_pairs_results_with_ids_in_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v0/item/1.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"id": 1, "title": "One", "type": "story", "time": 1})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v0/item/2.json"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v0/item/3.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("null"))
            .mount(&server)
            .await;

        let results = client_for(&server).await.fetch_stories(&[1, 2, 3]).await;
        let ids: Vec<u64> = results.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(matches!(&results[0].1, Ok(Some(story)) if story.title == "One"));
        assert!(results[1].1.is_err());
        assert!(matches!(results[2].1, Ok(None)));
    }

    #[tokio::test]
    async fn prefetch_warms_cache_and_counts_failures() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v0/item/11.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"id": 11, "by": "a", "type": "comment", "time": 5})),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v0/item/12.json"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        assert_eq!(client.prefetch(&[11, 12]).await, 1);

        // Served from cache: the mock expects exactly one request.
        let comment = assert_ok!(client.fetch_comment(11).await);
        assert_eq!(comment.map(|c| c.id), Some(11));
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v0/item/4.json"))
            .respond_with(ResponseTemplate::new(500))
            .expect(2)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        assert!(client.fetch_item(4).await.is_err());
        assert!(client.fetch_item(4).await.is_err());
    }

    #[tokio::test]
    async fn cached_entry_serves_one_read() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v0/item/21.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"id": 21, "by": "a", "type": "comment", "time": 5})),
            )
            .expect(2)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        assert_ok!(client.fetch_item(21).await);
        // Second read is the cached copy, third goes back to the server.
        assert_ok!(client.fetch_item(21).await);
        assert!(client.item_cache.read().await.is_empty());
        assert_ok!(client.fetch_item(21).await);
    }

    #[tokio::test]
    async fn expired_entries_are_pruned_on_insert() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v0/item/31.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"id": 31, "by": "a", "type": "comment", "time": 5})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let stale: HnItem = serde_json::from_value(json!({"id": 30})).unwrap();
        let long_ago = Instant::now()
            .checked_sub(CACHE_TTL + Duration::from_secs(1))
            .unwrap();
        client.item_cache.write().await.insert(
            30,
            CacheEntry {
                data: stale,
                fetched_at: long_ago,
            },
        );

        assert_ok!(client.fetch_item(31).await);
        let cache = client.item_cache.read().await;
        assert!(!cache.contains_key(&30));
        assert!(cache.contains_key(&31));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = HnClient::new("http://localhost:1234/v0/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:1234/v0");
    }
}
