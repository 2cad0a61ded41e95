//! Live end-to-end coverage against a running buques instance.
//!
//! - Targets `BUQUES_LIVE_BASE_URL` (default `http://127.0.0.1:3000`).
//! - Marked `#[ignore]` so it only runs manually after starting the server
//!   with a reachable database and cache.

use reqwest::{Client, StatusCode};
use serde_json::Value;

type TestResult<T> = Result<T, Box<dyn std::error::Error>>;

fn base_url() -> String {
    std::env::var("BUQUES_LIVE_BASE_URL")
        .unwrap_or_else(|_| "http://127.0.0.1:3000".to_string())
        .trim_end_matches('/')
        .to_string()
}

#[tokio::test]
#[ignore]
async fn live_listing_end_to_end() -> TestResult<()> {
    let client = Client::builder().build()?;
    let base = base_url();

    let liveness = client.get(format!("{base}/")).send().await?;
    assert_eq!(liveness.status(), StatusCode::OK);
    assert_eq!(liveness.text().await?, "Hola mundo!");

    for path in ["/_health/db", "/_health/cache"] {
        let response = client.get(format!("{base}{path}")).send().await?;
        assert_eq!(response.status(), StatusCode::NO_CONTENT, "{path}");
    }

    // The second read lands inside the TTL window and must match the first.
    let first: Value = client
        .get(format!("{base}/buquesenpuerto"))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    let second: Value = client
        .get(format!("{base}/buquesenpuerto"))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    assert_eq!(first["status"], Value::Bool(true));
    assert!(first["data"].is_array());
    assert_eq!(first, second);
    Ok(())
}
