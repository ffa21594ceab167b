use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use content_api::MemorySite;
use serde_json::Value;
use tower::ServiceExt;

/// Routes test output through the test harness; `RUST_LOG=content_api=debug` shows dispatch logs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("content_api=warn")),
        )
        .with_test_writer()
        .try_init();
}

pub fn site() -> MemorySite {
    MemorySite::builder()
        .page("products", [("title", "Products")])
        .page(
            "products/product-a",
            [
                ("title", "Product A"),
                ("price", "99.99"),
                ("categories", "category-a, category-b"),
                ("manufacturer", "manufacturers/brand-a"),
            ],
        )
        .page(
            "products/product-b",
            [
                ("title", "Product B"),
                ("price", "49.5"),
                ("categories", "category-b"),
                ("manufacturer", "manufacturers/brand-x"),
            ],
        )
        .page(
            "products/product-c",
            [
                ("title", "Product C"),
                ("price", "10"),
                ("categories", ""),
                ("manufacturer", ""),
            ],
        )
        .page("manufacturers", [("title", "Manufacturers")])
        .page(
            "manufacturers/brand-a",
            [
                ("title", "Brand A"),
                ("products", "- products/product-a\n- products/missing\n- products/product-c\n"),
            ],
        )
        .build()
}

pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Response) {
    let response = router.clone().oneshot(request).await.unwrap();
    (response.status(), response)
}

pub async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let (status, response) = send(router, request).await;
    (status, body_json(response).await)
}

pub async fn request(router: &Router, method: &str, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, response) = send(router, request).await;
    (status, body_json(response).await)
}
