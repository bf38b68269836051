use anyhow::{bail, Result};
use reqwest::Client;
use serde_json::Value;

/// Fetch one raw harvest document from a harvest store.
///
/// Unlike an empty field inside a harvest, a missing or unreadable document
/// is a hard error: there is nothing to summarize.
pub async fn fetch_harvest(client: &Client, url: &str) -> Result<Value> {
    let response = client
        .get(url)
        .header(
            "User-Agent",
            concat!("summarizr/", env!("CARGO_PKG_VERSION")),
        )
        .header("Accept", "application/json")
        .send()
        .await?;

    if !response.status().is_success() {
        bail!("harvest store returned {} for {}", response.status(), url);
    }

    Ok(response.json().await?)
}
