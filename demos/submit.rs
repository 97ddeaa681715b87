//! Submits a burst of documents and shows which ones the limiter admits.
//!
//! ```text
//! DOCRATE_ENDPOINT=http://localhost:8080/docs DOCRATE_TOKEN=secret \
//!     RUST_LOG=docrate=debug cargo run --example submit
//! ```

use docrate::{ClientConfig, DocumentClient, IntroductionDocument, Product};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> docrate::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("docrate=info")),
        )
        .init();

    println!("=== Rate-Limited Submission ===\n");

    let mut config = ClientConfig::new(5, Duration::from_secs(1)).with_timeout(Duration::from_secs(3));
    if let Ok(endpoint) = std::env::var("DOCRATE_ENDPOINT") {
        config = config.with_endpoint(endpoint);
    }
    let token = std::env::var("DOCRATE_TOKEN").unwrap_or_else(|_| "demo-token".to_string());

    let client = DocumentClient::from_config(config)?;
    println!("   Limit: {} per {:?}\n", client.limiter().capacity(), client.limiter().period());

    for round in 1..=2 {
        println!("Round {}:", round);

        for i in 1..=8 {
            let doc = IntroductionDocument::new()
                .with_doc_id(format!("demo-{}-{}", round, i))
                .with_participant("7700000000")
                .with_product(Product {
                    tnved_code: Some("6401100000".into()),
                    ..Default::default()
                });

            match client.create_document(&doc, &token).await {
                Ok(body) => println!("   Document {} - ✅ accepted: {}", i, body),
                Err(err) if err.is_rate_limited() => {
                    println!("   Document {} - ⛔ {}", i, err)
                }
                Err(err) => println!("   Document {} - ❌ {}", i, err),
            }
        }

        if let Some(wait) = client.limiter().time_until_reset() {
            println!("   Waiting {:?} for the next window...\n", wait);
            tokio::time::sleep(wait + Duration::from_millis(20)).await;
        }
    }

    println!("{}", client.limiter().metrics());
    client.shutdown();

    Ok(())
}
