use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::models::{AssessmentReport, FactorKind, RiskLevel};
use crate::news::NewsReport;
use crate::score::severity::classify_inclusive;

fn level_color(level: RiskLevel) -> Color {
    match level {
        RiskLevel::Low => Color::Green,
        RiskLevel::Medium => Color::Yellow,
        RiskLevel::High => Color::Red,
    }
}

fn level_colored(level: RiskLevel) -> ColoredString {
    match level {
        RiskLevel::Low => level.to_string().green(),
        RiskLevel::Medium => level.to_string().yellow(),
        RiskLevel::High => level.to_string().red(),
    }
}

/// Render a colored terminal report for a full assessment.
pub fn render(report: &AssessmentReport, verbose: bool, quiet: bool) -> Result<()> {
    let data = match report {
        AssessmentReport::Success { data } => data,
        AssessmentReport::Error { message } => {
            eprintln!(" {} {}", "[ERROR]".red().bold(), message);
            return Ok(());
        }
    };

    let assessment = &data.risk_assessment;
    let overall_level = classify_inclusive(assessment.overall_risk_score);

    if quiet {
        println!(
            "Overall: {:.3} ({})  Factors: {}  Routes: {}  Suppliers: {}",
            assessment.overall_risk_score,
            level_colored(overall_level),
            assessment.risk_factors.len(),
            assessment.route_analysis.len(),
            assessment.supplier_risks.len(),
        );
        return Ok(());
    }

    println!("\n {} v{}", "chainwatch".bold(), env!("CARGO_PKG_VERSION"));
    println!(" Assessed at: {}\n", data.meta.analysis_timestamp.format("%Y-%m-%d %H:%M UTC"));

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "ASSESSMENT".bold());
    println!(
        " │  {:<48} │",
        format!(
            "Overall risk       : {:.3}  ({})",
            assessment.overall_risk_score, overall_level
        )
    );
    println!(
        " │  {:<48} │",
        format!("Confidence         : {:.2}", assessment.confidence_score)
    );
    println!(
        " │  {:<48} │",
        format!("Risk factors       : {}", assessment.risk_factors.len())
    );
    println!(
        " │  {:<48} │",
        format!(
            "Routes / suppliers : {} / {}",
            assessment.route_analysis.len(),
            assessment.supplier_risks.len()
        )
    );
    println!(" └────────────────────────────────────────────────────┘\n");

    if !assessment.risk_factors.is_empty() {
        println!(" {} Surfaced risk factors:\n", "[FACTORS]".red().bold());
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("Type").add_attribute(Attribute::Bold),
                Cell::new("Score").add_attribute(Attribute::Bold),
                Cell::new("Description").add_attribute(Attribute::Bold),
                Cell::new("Impacted segments").add_attribute(Attribute::Bold),
            ]);
        for factor in &assessment.risk_factors {
            let kind_color = match factor.kind {
                FactorKind::Geopolitical => Color::Magenta,
                FactorKind::Operational => Color::Yellow,
                FactorKind::Supplier => Color::Cyan,
            };
            table.add_row(vec![
                Cell::new(factor.kind.to_string()).fg(kind_color),
                Cell::new(format!("{:.2}", factor.score))
                    .set_alignment(CellAlignment::Right),
                Cell::new(&factor.description),
                Cell::new(
                    factor
                        .impacted_segments
                        .as_ref()
                        .map(|s| s.join(", "))
                        .unwrap_or_else(|| "—".to_string()),
                ),
            ]);
        }
        println!("{}\n", table);
    }

    if !assessment.route_analysis.is_empty() {
        println!(" {} Route analysis:\n", "[ROUTES]".cyan().bold());
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("Route").add_attribute(Attribute::Bold),
                Cell::new("Risk").add_attribute(Attribute::Bold),
                Cell::new("Bottlenecks").add_attribute(Attribute::Bold),
                Cell::new("Alternatives").add_attribute(Attribute::Bold),
            ]);
        for route in &assessment.route_analysis {
            let alternatives = if route.alternative_routes.is_empty() {
                "—".to_string()
            } else if verbose {
                route
                    .alternative_routes
                    .iter()
                    .map(|a| {
                        format!(
                            "{} ({}, {}, {})",
                            a.path, a.risk_level, a.additional_time, a.additional_cost
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            } else {
                format!("{} suggested", route.alternative_routes.len())
            };
            table.add_row(vec![
                Cell::new(&route.route_id),
                Cell::new(route.risk_level.to_string()).fg(level_color(route.risk_level)),
                Cell::new(route.bottlenecks.join(", ")),
                Cell::new(alternatives),
            ]);
        }
        println!("{}\n", table);
    }

    if !assessment.supplier_risks.is_empty() {
        println!(" {} Supplier risks:\n", "[SUPPLIERS]".cyan().bold());
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("Supplier").add_attribute(Attribute::Bold),
                Cell::new("Risk").add_attribute(Attribute::Bold),
                Cell::new("Factors").add_attribute(Attribute::Bold),
                Cell::new("Mitigations").add_attribute(Attribute::Bold),
            ]);
        for supplier in &assessment.supplier_risks {
            let mitigations = if verbose {
                supplier.mitigation_strategies.join("\n")
            } else {
                format!("{} suggested", supplier.mitigation_strategies.len())
            };
            table.add_row(vec![
                Cell::new(&supplier.supplier_id),
                Cell::new(supplier.risk_level.to_string()).fg(level_color(supplier.risk_level)),
                Cell::new(supplier.factors.join(", ")),
                Cell::new(mitigations),
            ]);
        }
        println!("{}\n", table);
    }

    Ok(())
}

/// Render a colored terminal report for a news analysis run.
pub fn render_news(report: &NewsReport, quiet: bool) -> Result<()> {
    let dist = &report.meta.risk_distribution;

    if quiet {
        println!(
            "Fetched: {}  Shown: {}  High: {}  Medium: {}  Low: {}",
            report.meta.total_count,
            report.articles.len(),
            dist.high.to_string().red(),
            dist.medium.to_string().yellow(),
            dist.low.to_string().green(),
        );
        return Ok(());
    }

    println!("\n {} v{}", "chainwatch".bold(), env!("CARGO_PKG_VERSION"));
    println!(
        " {} fetched, {} after filters — risk: {} high / {} medium / {} low\n",
        report.meta.total_count,
        report.meta.filtered_count,
        dist.high.to_string().red(),
        dist.medium.to_string().yellow(),
        dist.low.to_string().green(),
    );

    if report.articles.is_empty() {
        println!(" No articles matched.");
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Risk").add_attribute(Attribute::Bold),
            Cell::new("Score").add_attribute(Attribute::Bold),
            Cell::new("Title").add_attribute(Attribute::Bold),
            Cell::new("Source").add_attribute(Attribute::Bold),
            Cell::new("Categories").add_attribute(Attribute::Bold),
            Cell::new("Segments").add_attribute(Attribute::Bold),
        ]);

    for article in &report.articles {
        table.add_row(vec![
            Cell::new(article.risk_level.to_string()).fg(level_color(article.risk_level)),
            Cell::new(format!("{:.2}", article.risk_score)).set_alignment(CellAlignment::Right),
            Cell::new(article.title.as_deref().unwrap_or("(untitled)")),
            Cell::new(article.source.as_deref().unwrap_or("—")),
            Cell::new(article.categories.join(", ")),
            Cell::new(article.impact_analysis.supply_chain_segments.join(", ")),
        ]);
    }
    println!("{}", table);

    Ok(())
}
