use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;
use serde::Deserialize;

/// Root configuration structure, deserialized from `.chainwatch/config.toml`.
///
/// Every lexicon the engine consumes lives here as plain data: keyword
/// weights, category keywords, segment keywords, and the location→region map.
/// Analyzers receive the tables at construction and never reach for globals,
/// which keeps them pure and testable.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Weights applied when combining the per-dimension risk scores.
    #[serde(default)]
    pub weights: FactorWeights,
    /// Risk keyword → weight, matched as lowercase substrings.
    #[serde(default = "default_risk_keywords")]
    pub risk_keywords: BTreeMap<String, f64>,
    /// Supply-chain domain categories and their trigger keywords.
    #[serde(default = "default_categories")]
    pub categories: Vec<Lexicon>,
    /// Supply-chain segments used for per-article impact tagging.
    #[serde(default = "default_segments")]
    pub segments: Vec<Lexicon>,
    /// Location → region map. Lookups are total: unmapped locations resolve
    /// to "Unknown".
    #[serde(default = "default_regions")]
    pub regions: BTreeMap<String, String>,
    #[serde(default)]
    pub news: NewsConfig,
}

/// A named keyword list.
#[derive(Debug, Clone, Deserialize)]
pub struct Lexicon {
    pub name: String,
    pub keywords: Vec<String>,
}

/// Fixed weights for the overall risk combination.
///
/// Aggregation consumes `operational` (routes), `financial` (suppliers), and
/// `geopolitical` (regions). `environmental` is declared for parity with the
/// published weight table but is not yet consumed; the weights deliberately
/// do not sum to 1.
#[derive(Debug, Clone, Deserialize)]
pub struct FactorWeights {
    #[serde(default = "default_w_operational")]
    pub operational: f64,
    #[serde(default = "default_w_financial")]
    pub financial: f64,
    #[serde(default = "default_w_geopolitical")]
    pub geopolitical: f64,
    #[serde(default = "default_w_environmental")]
    pub environmental: f64,
}

fn default_w_operational() -> f64 {
    0.3
}
fn default_w_financial() -> f64 {
    0.2
}
fn default_w_geopolitical() -> f64 {
    0.3
}
fn default_w_environmental() -> f64 {
    0.2
}

impl Default for FactorWeights {
    fn default() -> Self {
        FactorWeights {
            operational: default_w_operational(),
            financial: default_w_financial(),
            geopolitical: default_w_geopolitical(),
            environmental: default_w_environmental(),
        }
    }
}

/// News API settings for the `news` subcommand.
#[derive(Debug, Clone, Deserialize)]
pub struct NewsConfig {
    /// API key; falls back to the `NEWS_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_news_base_url")]
    pub base_url: String,
    #[serde(default = "default_news_query")]
    pub query: String,
}

fn default_news_base_url() -> String {
    "https://newsapi.org/v2".to_string()
}

fn default_news_query() -> String {
    "(supply chain OR logistics OR shipping OR ports) AND (disruption OR delay OR risk OR impact)"
        .to_string()
}

impl Default for NewsConfig {
    fn default() -> Self {
        NewsConfig {
            api_key: None,
            base_url: default_news_base_url(),
            query: default_news_query(),
        }
    }
}

fn default_risk_keywords() -> BTreeMap<String, f64> {
    let entries: [(&str, f64); 14] = [
        ("high", 0.9),
        ("severe", 0.9),
        ("critical", 0.9),
        ("urgent", 0.8),
        ("warning", 0.7),
        ("delay", 0.6),
        ("disruption", 0.7),
        ("shortage", 0.7),
        ("issue", 0.5),
        ("problem", 0.5),
        ("concern", 0.4),
        ("potential", 0.3),
        ("minor", 0.2),
        ("low", 0.1),
    ];
    entries
        .into_iter()
        .map(|(k, w)| (k.to_string(), w))
        .collect()
}

fn lexicon(name: &str, keywords: &[&str]) -> Lexicon {
    Lexicon {
        name: name.to_string(),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
    }
}

fn default_categories() -> Vec<Lexicon> {
    vec![
        lexicon("logistics", &["shipping", "transport", "delivery", "freight", "cargo"]),
        lexicon("inventory", &["stock", "inventory", "warehouse", "storage", "supply"]),
        lexicon("manufacturing", &["production", "manufacturing", "assembly", "factory"]),
        lexicon("procurement", &["sourcing", "procurement", "purchasing", "supplier"]),
        lexicon("quality", &["quality", "inspection", "compliance", "standard"]),
        lexicon("financial", &["cost", "price", "financial", "budget", "expense"]),
    ]
}

fn default_segments() -> Vec<Lexicon> {
    vec![
        lexicon("Maritime", &["port", "shipping", "vessel", "container", "maritime"]),
        lexicon("Manufacturing", &["factory", "production", "assembly", "manufacturing"]),
        lexicon("Logistics", &["warehouse", "distribution", "logistics", "transportation"]),
        lexicon("Sourcing", &["supplier", "procurement", "sourcing", "vendor"]),
    ]
}

fn default_regions() -> BTreeMap<String, String> {
    let entries = [
        ("Shanghai", "Asia"),
        ("Singapore", "Asia"),
        ("Rotterdam", "Europe"),
        ("Dubai", "Middle East"),
    ];
    entries
        .into_iter()
        .map(|(l, r)| (l.to_string(), r.to_string()))
        .collect()
}

impl Default for Config {
    /// Built-in configuration used when no config file is found.
    fn default() -> Self {
        Config {
            weights: FactorWeights::default(),
            risk_keywords: default_risk_keywords(),
            categories: default_categories(),
            segments: default_segments(),
            regions: default_regions(),
            news: NewsConfig::default(),
        }
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `<cwd>/.chainwatch/config.toml`
/// 3. `~/.config/chainwatch/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        let content = std::fs::read_to_string(path)?;
        return Ok(toml::from_str(&content)?);
    }

    let project_config = Path::new(".chainwatch").join("config.toml");
    if project_config.exists() {
        let content = std::fs::read_to_string(&project_config)?;
        return Ok(toml::from_str(&content)?);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home.join(".config").join("chainwatch").join("config.toml");
        if home_config.exists() {
            let content = std::fs::read_to_string(&home_config)?;
            return Ok(toml::from_str(&content)?);
        }
    }

    Ok(Config::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_tables() {
        let cfg = Config::default();
        assert_eq!(cfg.risk_keywords.len(), 14);
        assert_eq!(cfg.risk_keywords["critical"], 0.9);
        assert_eq!(cfg.risk_keywords["low"], 0.1);
        assert_eq!(cfg.categories.len(), 6);
        assert_eq!(cfg.regions["Rotterdam"], "Europe");
        assert_eq!(cfg.weights.operational, 0.3);
        assert_eq!(cfg.weights.environmental, 0.2);
    }

    #[test]
    fn test_load_config_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[weights]
operational = 0.5

[risk_keywords]
meltdown = 0.95

[news]
base_url = "https://example.test/v2"
"#
        )
        .unwrap();

        let cfg = load_config(Some(file.path())).unwrap();
        assert_eq!(cfg.weights.operational, 0.5);
        // Unspecified weights keep their defaults
        assert_eq!(cfg.weights.financial, 0.2);
        assert_eq!(cfg.risk_keywords["meltdown"], 0.95);
        // Unlisted tables fall back to the built-in defaults
        assert_eq!(cfg.categories.len(), 6);
        assert_eq!(cfg.news.base_url, "https://example.test/v2");
    }

    #[test]
    fn test_load_config_missing_falls_back_to_default() {
        // No override and no config in cwd/home of the test environment
        let cfg = load_config(None).unwrap();
        assert_eq!(cfg.risk_keywords.len(), 14);
    }
}
