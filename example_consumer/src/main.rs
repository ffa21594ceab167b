//! Demo server: an in-memory product catalogue exposed through content-api.
//!
//! Run from repo root: `cargo run -p content-api-demo`
//! Configuration is read from `CONTENT_API_*` variables (a `.env` file is honoured).

use content_api::{Api, ApiConfig, ApiError, HandlerResult, MemorySite, SchemaSpec, TransformerSpec};
use serde_json::json;
use tokio::net::TcpListener;

fn catalogue() -> MemorySite {
    MemorySite::builder()
        .page("products", [("title", "Products")])
        .page(
            "products/desk",
            [
                ("title", "Desk"),
                ("price", "249.00"),
                ("tags", "office, wood"),
                ("manufacturer", "manufacturers/northwood"),
            ],
        )
        .page(
            "products/lamp",
            [
                ("title", "Lamp"),
                ("price", "39.90"),
                ("tags", "office, light"),
                ("manufacturer", "manufacturers/lumen"),
            ],
        )
        .page("manufacturers", [("title", "Manufacturers")])
        .page(
            "manufacturers/northwood",
            [("title", "Northwood"), ("products", "- products/desk\n")],
        )
        .page(
            "manufacturers/lumen",
            [("title", "Lumen"), ("products", "- products/lamp\n- products/retired\n")],
        )
        .build()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("content_api=info")),
        )
        .init();

    let config = ApiConfig::from_env()?;
    let site = catalogue();
    let (products, product, brand) = (site.clone(), site.clone(), site);

    let app = Api::from_config(config)?
        .schema(
            "product",
            SchemaSpec::new()
                .field("title")
                .with("price", "float")
                .with("tags", "split")
                .with(
                    "manufacturer",
                    TransformerSpec::named("page").arg(SchemaSpec::new().field("title")),
                ),
        )
        .schema(
            "manufacturer",
            SchemaSpec::new().field("title").with(
                "products",
                TransformerSpec::named("collection").arg(SchemaSpec::new().field("title")),
            ),
        )
        .filter("api-key", |ctx| match (ctx.header("x-api-key"), std::env::var("DEMO_API_KEY")) {
            (_, Err(_)) => Ok(()),
            (Some(given), Ok(expected)) if given == expected => Ok(()),
            _ => Err(ApiError::reject(401, "Unauthorized")),
        })
        .get("/ping", |_ctx, _args| Ok(json!({ "pong": true }).into()))
        .get_with("/products", "api-key", move |_ctx, _args| {
            Ok(HandlerResult::collection(Some(products.children("products"))).with_schema("product"))
        })
        .get_with("/products/(:any)", "api-key", move |_ctx, args| {
            let page = product.page(&format!("products/{}", args[0]));
            Ok(HandlerResult::page(page).with_schema("product"))
        })
        .get("/manufacturers/(:any)", move |_ctx, args| {
            let page = brand.page(&format!("manufacturers/{}", args[0]));
            Ok(HandlerResult::page(page).with_schema("manufacturer"))
        })
        .into_router()?;

    let listener = TcpListener::bind("127.0.0.1:3000").await?;
    let port = listener.local_addr()?.port();
    tracing::info!("content-api demo listening on http://127.0.0.1:{}", port);
    axum::serve(listener, app).await?;
    Ok(())
}
