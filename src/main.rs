//! `chainwatch` — score supply-chain text and shipping data for disruption risk.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]).
//! 2. Load lexicon/weight config ([`config::load_config`]).
//! 3. Build the risk engine ([`analyzer::engine::RiskEngine`]) with the
//!    rule-based annotator ([`extract::rule_based`]) and baseline estimators.
//! 4. Dispatch: single-text scoring, batch scoring, full assessment
//!    ([`analyzer`]), or news fetch + analysis ([`news`]).
//! 5. Render the requested report ([`report`]).
//! 6. Exit `0` (clean) or `1` (assessment failed or overall risk is High).

mod analyzer;
mod cli;
mod config;
mod extract;
mod models;
mod news;
mod report;
mod score;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use analyzer::engine::RiskEngine;
use cli::{Cli, Command, ReportFormat};
use config::load_config;
use models::AssessmentReport;
use news::NewsFilter;
use score::severity::classify_inclusive;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    let engine = RiskEngine::new(config)?;

    match cli.command {
        Command::Analyze { text, json } => {
            let assessment = engine.analyze_text(&text)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&assessment)?);
            } else {
                println!(
                    " {} {:.3} ({})",
                    "risk".bold(),
                    assessment.risk_score,
                    assessment.risk_level
                );
                println!(" {} {}", "categories".bold(), assessment.categories.join(", "));
                for (label, values) in &assessment.entities {
                    println!(" {} {}", format!("{:<10}", label).bold(), values.join(", "));
                }
            }
        }

        Command::Batch { file, json } => {
            let texts = read_batch_input(&file)?;

            let pb = if !cli.quiet && !json {
                let pb = ProgressBar::new(texts.len() as u64);
                pb.set_style(
                    ProgressStyle::default_bar()
                        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
                        .progress_chars("#>-"),
                );
                Some(pb)
            } else {
                None
            };

            // Per-item isolation happens inside the engine; the bar just
            // tracks overall progress.
            let mut outcome = models::BatchOutcome {
                results: Vec::with_capacity(texts.len()),
                total_analyzed: 0,
            };
            for text in &texts {
                let mut one = engine.analyze_batch(std::slice::from_ref(text));
                outcome.total_analyzed += one.total_analyzed;
                outcome.results.append(&mut one.results);
                if let Some(pb) = &pb {
                    pb.inc(1);
                }
            }
            if let Some(pb) = pb {
                pb.finish_with_message("Done");
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                for record in &outcome.results {
                    match (&record.assessment, &record.error) {
                        (Some(a), _) => println!(
                            " {} {:.3}  {}",
                            format!("[{}]", a.risk_level).bold(),
                            a.risk_score,
                            truncate_line(&record.text, 70)
                        ),
                        (None, Some(e)) => println!(
                            " {} {}  {}",
                            "[failed]".red().bold(),
                            truncate_line(&record.text, 50),
                            e
                        ),
                        (None, None) => {}
                    }
                }
                println!(
                    "\n Analyzed {} of {} items",
                    outcome.total_analyzed,
                    outcome.results.len()
                );
            }
        }

        Command::Assess { file, report, pdf } => {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read payload {}", file.display()))?;
            let data: models::SupplyChainData = serde_json::from_str(&content)
                .with_context(|| format!("Invalid supply-chain payload in {}", file.display()))?;

            let assessment = engine.assess(&data);

            // --pdf implies PDF format
            let report_format = match &pdf {
                Some(_) => ReportFormat::Pdf,
                None => report,
            };
            let pdf_path =
                pdf.unwrap_or_else(|| std::path::PathBuf::from("risk-report.pdf"));

            match report_format {
                ReportFormat::Terminal => {
                    report::terminal::render(&assessment, cli.verbose, cli.quiet)?;
                }
                ReportFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&assessment)?);
                }
                ReportFormat::Pdf => match &assessment {
                    AssessmentReport::Success { data } => {
                        report::pdf::render(data, &pdf_path)?;
                    }
                    AssessmentReport::Error { message } => {
                        eprintln!(" {} {}", "[ERROR]".red().bold(), message);
                    }
                },
            }

            // Non-zero exit for failed or high-risk assessments so the
            // command can gate pipelines
            match &assessment {
                AssessmentReport::Error { .. } => std::process::exit(1),
                AssessmentReport::Success { data } => {
                    let level =
                        classify_inclusive(data.risk_assessment.overall_risk_score);
                    if level == models::RiskLevel::High {
                        std::process::exit(1);
                    }
                }
            }
        }

        Command::News {
            days_back,
            categories,
            risk_level,
            json,
        } => {
            let client = reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()?;

            if !cli.quiet && !json {
                eprintln!(
                    "  {} fetching articles from the last {} days",
                    "→".cyan(),
                    days_back
                );
            }
            let articles =
                news::client::fetch_articles(&client, &engine.config().news, days_back).await?;

            let filter = NewsFilter {
                categories,
                risk_level: risk_level.as_ref().map(Into::into),
            };
            let news_report = news::process_articles(&engine, &articles, &filter);

            if json {
                println!("{}", serde_json::to_string_pretty(&news_report)?);
            } else {
                report::terminal::render_news(&news_report, cli.quiet)?;
            }
        }
    }

    Ok(())
}

/// Read batch input: a JSON array of strings, or one text per line.
fn read_batch_input(path: &std::path::Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let trimmed = content.trim_start();
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed)
            .with_context(|| format!("{} is not a JSON array of strings", path.display()));
    }

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

fn truncate_line(s: &str, max: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() > max {
        format!("{}…", chars[..max - 1].iter().collect::<String>())
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_batch_input_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "first delay\n\nsecond shortage  ").unwrap();
        let texts = read_batch_input(file.path()).unwrap();
        assert_eq!(texts, vec!["first delay", "second shortage"]);
    }

    #[test]
    fn test_read_batch_input_json_array() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"["one", "two"]"#).unwrap();
        let texts = read_batch_input(file.path()).unwrap();
        assert_eq!(texts, vec!["one", "two"]);
    }

    #[test]
    fn test_read_batch_input_rejects_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"not": "a string"}}]"#).unwrap();
        assert!(read_batch_input(file.path()).is_err());
    }

    #[test]
    fn test_truncate_line() {
        assert_eq!(truncate_line("short", 10), "short");
        assert_eq!(truncate_line("0123456789", 5), "0123…");
    }
}
