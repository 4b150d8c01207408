//! Supply-chain news: fetch recent articles and run each through the risk
//! engine.
//!
//! [`client`] talks to a NewsAPI-style `/everything` endpoint; processing is
//! local and synchronous. The per-article risk level here uses the
//! assessment-internal (inclusive) severity scheme — the same cut points the
//! original service path used — while the plain `analyze` path uses the
//! strict scheme.

pub mod client;

use std::collections::BTreeMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::analyzer::engine::RiskEngine;
use crate::models::RiskLevel;
use crate::score::severity::classify_inclusive;

/// How many processed articles a report retains, most relevant first.
const MAX_ARTICLES: usize = 10;

/// Raw article as returned by the news API.
#[derive(Debug, Clone, Deserialize)]
pub struct Article {
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "publishedAt")]
    pub published_at: Option<String>,
    pub source: Option<ArticleSource>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArticleSource {
    pub name: Option<String>,
}

/// Filters applied after scoring.
#[derive(Debug, Clone, Default)]
pub struct NewsFilter {
    /// Keep only articles matching at least one of these categories.
    pub categories: Vec<String>,
    /// Keep only articles at exactly this risk level.
    pub risk_level: Option<RiskLevel>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessedArticle {
    pub id: u64,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub source: Option<String>,
    pub published_at: Option<String>,
    pub url: Option<String>,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub categories: Vec<String>,
    pub entities: BTreeMap<String, Vec<String>>,
    pub impact_analysis: ImpactAnalysis,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImpactAnalysis {
    pub severity: RiskLevel,
    /// GPE entities found in the article text.
    pub affected_regions: Vec<String>,
    pub supply_chain_segments: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RiskDistribution {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewsMeta {
    /// Articles returned by the API before filtering.
    pub total_count: usize,
    /// Articles surviving the category/risk-level filters.
    pub filtered_count: usize,
    /// Distribution over all scored articles, not just the filtered ones.
    pub risk_distribution: RiskDistribution,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewsReport {
    pub articles: Vec<ProcessedArticle>,
    pub meta: NewsMeta,
}

/// Score, annotate, and filter fetched articles.
///
/// Articles whose annotation fails are skipped rather than failing the whole
/// report; the caller is fetching a best-effort feed, not a ledger.
pub fn process_articles(
    engine: &RiskEngine,
    articles: &[Article],
    filter: &NewsFilter,
) -> NewsReport {
    let mut processed = Vec::new();
    let mut distribution = RiskDistribution::default();

    for article in articles {
        let text = format!(
            "{} {}",
            article.title.as_deref().unwrap_or(""),
            article.description.as_deref().unwrap_or("")
        );

        let risk_score = engine.score_text(&text);
        let risk_level = classify_inclusive(risk_score);
        match risk_level {
            RiskLevel::High => distribution.high += 1,
            RiskLevel::Medium => distribution.medium += 1,
            RiskLevel::Low => distribution.low += 1,
        }

        let entities = match engine.entities(&text) {
            Ok(entities) => entities,
            Err(_) => continue,
        };
        let categories = engine.categorize(&text);

        if !filter.categories.is_empty()
            && !filter.categories.iter().any(|c| categories.contains(c))
        {
            continue;
        }
        if let Some(wanted) = filter.risk_level {
            if risk_level != wanted {
                continue;
            }
        }

        let affected_regions = entities.get("GPE").cloned().unwrap_or_default();

        processed.push(ProcessedArticle {
            id: article_id(article),
            title: article.title.clone(),
            summary: article.description.clone(),
            source: article.source.as_ref().and_then(|s| s.name.clone()),
            published_at: article.published_at.clone(),
            url: article.url.clone(),
            risk_score,
            risk_level,
            categories,
            entities,
            impact_analysis: ImpactAnalysis {
                severity: risk_level,
                affected_regions,
                supply_chain_segments: engine.segments(&text),
            },
        });
    }

    let filtered_count = processed.len();
    processed.truncate(MAX_ARTICLES);

    NewsReport {
        articles: processed,
        meta: NewsMeta {
            total_count: articles.len(),
            filtered_count,
            risk_distribution: distribution,
        },
    }
}

fn article_id(article: &Article) -> u64 {
    let mut hasher = DefaultHasher::new();
    article.url.as_deref().unwrap_or("").hash(&mut hasher);
    hasher.finish()
}
