//! Route table.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use super::handlers::{health_check, list_articles, post_action};
use crate::app::AppContext;

pub fn create_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/", get(list_articles).post(post_action))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    use crate::fetcher::stub::StubFetcher;
    use crate::store::MemoryTableStore;
    use crate::sync::DEFAULT_MAX_ITEMS_PER_FEED;

    const PAGE: &str = "<html><head><title>Fetched Title</title></head><body>hi</body></html>";

    fn router() -> Router {
        let fetcher = StubFetcher::new().with_body("https://example.com/page", PAGE);
        let ctx = AppContext::with_parts(
            Arc::new(MemoryTableStore::new()),
            Arc::new(fetcher),
            DEFAULT_MAX_ITEMS_PER_FEED,
        );
        create_router(Arc::new(ctx))
    }

    async fn post(router: &Router, body: &str) -> Value {
        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn get(router: &Router, uri: &str) -> (StatusCode, String) {
        let response = router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get(&router(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");
    }

    #[tokio::test]
    async fn test_add_with_fetched_title() {
        let router = router();

        let result = post(&router, r#"{"action":"add","url":"https://example.com/page"}"#).await;
        assert_eq!(result["status"], "success");
        assert_eq!(result["title"], "Fetched Title");
        assert!(result["id"].as_str().is_some_and(|id| !id.is_empty()));
    }

    #[tokio::test]
    async fn test_add_mark_read_delete_flow() {
        let router = router();

        let added = post(
            &router,
            r#"{"action":"add","url":"https://example.com/other","title":"Given"}"#,
        )
        .await;
        assert_eq!(added["title"], "Given");
        let id = added["id"].as_str().unwrap().to_string();

        let marked = post(&router, &json!({"action": "markRead", "id": id}).to_string()).await;
        assert_eq!(marked, json!({"status": "success"}));

        let (_, listing) = get(&router, "/?format=json").await;
        let listing: Value = serde_json::from_str(&listing).unwrap();
        assert_eq!(listing[0]["id"], id.as_str());
        assert_eq!(listing[0]["isRead"], true);
        assert_eq!(listing[0]["url"], "https://example.com/other");

        let deleted = post(&router, &json!({"action": "delete", "id": id}).to_string()).await;
        assert_eq!(deleted, json!({"status": "success"}));

        let (_, listing) = get(&router, "/?format=json").await;
        assert_eq!(listing, "[]");
    }

    #[tokio::test]
    async fn test_errors_are_envelopes() {
        let router = router();

        let result = post(&router, r#"{"action":"archive","id":"x"}"#).await;
        assert_eq!(result, json!({"status": "error", "message": "Invalid action"}));

        let result = post(&router, r#"{"action":"markRead","id":"missing"}"#).await;
        assert_eq!(
            result,
            json!({"status": "error", "message": "Item not found: missing"})
        );

        let result = post(&router, "{not json").await;
        assert_eq!(result["status"], "error");
    }

    #[tokio::test]
    async fn test_listing_newest_first() {
        let router = router();
        post(&router, r#"{"action":"add","url":"https://example.com/1","title":"First"}"#).await;
        post(&router, r#"{"action":"add","url":"https://example.com/2","title":"Second"}"#).await;

        let (_, listing) = get(&router, "/?format=json").await;
        let listing: Value = serde_json::from_str(&listing).unwrap();
        assert_eq!(listing[0]["title"], "Second");
        assert_eq!(listing[1]["title"], "First");
    }

    #[tokio::test]
    async fn test_html_page() {
        let router = router();
        post(&router, r#"{"action":"add","url":"https://example.com/1","title":"Saved <one>"}"#).await;

        for uri in ["/", "/?format=html"] {
            let (status, body) = get(&router, uri).await;
            assert_eq!(status, StatusCode::OK);
            assert!(body.contains("<title>Stackdock</title>"));
            assert!(body.contains("Saved &lt;one&gt;"));
        }
    }
}
