use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::config::NewsConfig;

use super::Article;

#[derive(Debug, Deserialize)]
struct EverythingResponse {
    #[serde(default)]
    articles: Vec<Article>,
}

/// Fetch supply-chain articles published in the last `days_back` days,
/// sorted by relevancy.
pub async fn fetch_articles(
    client: &Client,
    config: &NewsConfig,
    days_back: i64,
) -> Result<Vec<Article>> {
    let api_key = config
        .api_key
        .clone()
        .or_else(|| std::env::var("NEWS_API_KEY").ok())
        .context("no news API key configured (set NEWS_API_KEY or [news] api_key)")?;

    let end_date = Utc::now();
    let start_date = end_date - Duration::days(days_back);

    let from = start_date.format("%Y-%m-%d").to_string();
    let to = end_date.format("%Y-%m-%d").to_string();

    let url = format!("{}/everything", config.base_url);
    let response = client
        .get(&url)
        .header("User-Agent", "chainwatch/0.1.0 (supply-chain risk tool)")
        .query(&[
            ("apiKey", api_key.as_str()),
            ("q", config.query.as_str()),
            ("language", "en"),
            ("sortBy", "relevancy"),
            ("from", from.as_str()),
            ("to", to.as_str()),
        ])
        .send()
        .await?
        .error_for_status()
        .context("news API request failed")?;

    let data: EverythingResponse = response.json().await?;
    Ok(data.articles)
}
