use std::path::Path;

use anyhow::{Context, Result};
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Polygon, Rgb,
};

use crate::models::{AssessmentData, RiskLevel};
use crate::score::severity::classify_inclusive;

const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN: f32 = 18.0;
const HEADER_H: f32 = 64.0;

// ── Palette ───────────────────────────────────────────────────────────────────
const NAVY: (f32, f32, f32) = (0.10, 0.14, 0.24);
const PANEL_BORDER: (f32, f32, f32) = (0.85, 0.87, 0.92);
const PANEL_ALT: (f32, f32, f32) = (0.95, 0.96, 0.99);
const TEXT_PRI: (f32, f32, f32) = (0.07, 0.08, 0.14);
const TEXT_SEC: (f32, f32, f32) = (0.36, 0.40, 0.52);
const TEXT_MUT: (f32, f32, f32) = (0.58, 0.63, 0.72);
const WHITE: (f32, f32, f32) = (1.00, 1.00, 1.00);
const WHITE_DIM: (f32, f32, f32) = (0.75, 0.80, 0.90);

const LOW_FG: (f32, f32, f32) = (0.07, 0.52, 0.22);
const MED_FG: (f32, f32, f32) = (0.70, 0.40, 0.02);
const HIGH_FG: (f32, f32, f32) = (0.76, 0.09, 0.13);
const LOW_BG: (f32, f32, f32) = (0.90, 0.98, 0.92);
const MED_BG: (f32, f32, f32) = (1.00, 0.95, 0.87);
const HIGH_BG: (f32, f32, f32) = (1.00, 0.91, 0.91);

fn level_colors(level: RiskLevel) -> ((f32, f32, f32), (f32, f32, f32)) {
    match level {
        RiskLevel::Low => (LOW_BG, LOW_FG),
        RiskLevel::Medium => (MED_BG, MED_FG),
        RiskLevel::High => (HIGH_BG, HIGH_FG),
    }
}

/// Render the assessment as a PDF: cover page with overall posture, then a
/// detail page with factors, routes, and suppliers.
pub fn render(data: &AssessmentData, output_path: &Path) -> Result<()> {
    let doc = PdfDocument::empty("Supply Chain Risk Assessment");

    add_cover_page(&doc, data)?;
    add_detail_page(&doc, data)?;

    let bytes = doc.save_to_bytes()?;
    std::fs::write(output_path, &bytes)
        .with_context(|| format!("Failed to write PDF to {}", output_path.display()))?;

    println!("PDF report written to: {}", output_path.display());
    Ok(())
}

fn add_cover_page(doc: &PdfDocumentReference, data: &AssessmentData) -> Result<()> {
    let (page_idx, layer_idx) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Cover");
    let layer = doc.get_page(page_idx).get_layer(layer_idx);

    let font_b = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
    let font_r = doc.add_builtin_font(BuiltinFont::Helvetica)?;

    let assessment = &data.risk_assessment;
    let overall_level = classify_inclusive(assessment.overall_risk_score);

    // Header band
    let hdr_bot = PAGE_H - HEADER_H;
    fill_rect(&layer, 0.0, hdr_bot, PAGE_W, HEADER_H, NAVY);

    set_color(&layer, WHITE_DIM);
    layer.use_text(
        format!("chainwatch v{}", env!("CARGO_PKG_VERSION")),
        7.5,
        Mm(PAGE_W - MARGIN - 40.0),
        Mm(PAGE_H - 10.5),
        &font_r,
    );

    set_color(&layer, WHITE);
    layer.use_text("Supply Chain Risk", 28.0, Mm(MARGIN), Mm(PAGE_H - 26.0), &font_b);
    set_color(&layer, WHITE_DIM);
    layer.use_text("Assessment Report", 28.0, Mm(MARGIN), Mm(PAGE_H - 41.0), &font_b);

    set_color(&layer, TEXT_SEC);
    layer.use_text(
        format!(
            "Assessed  {}",
            data.meta.analysis_timestamp.format("%Y-%m-%d %H:%M UTC")
        ),
        9.0,
        Mm(MARGIN),
        Mm(hdr_bot - 10.0),
        &font_r,
    );

    // Overall score panel
    let panel_y = hdr_bot - 52.0;
    let (badge_bg, badge_fg) = level_colors(overall_level);
    fill_rounded_rect(&layer, MARGIN, panel_y, PAGE_W - 2.0 * MARGIN, 34.0, 2.5, PANEL_ALT);
    stroke_rounded_rect(&layer, MARGIN, panel_y, PAGE_W - 2.0 * MARGIN, 34.0, 2.5, PANEL_BORDER);

    set_color(&layer, TEXT_MUT);
    layer.use_text("OVERALL RISK SCORE", 6.5, Mm(MARGIN + 6.0), Mm(panel_y + 26.0), &font_b);
    set_color(&layer, badge_fg);
    layer.use_text(
        format!("{:.3}", assessment.overall_risk_score),
        26.0,
        Mm(MARGIN + 6.0),
        Mm(panel_y + 8.0),
        &font_b,
    );

    fill_rounded_rect(&layer, MARGIN + 58.0, panel_y + 7.0, 28.0, 8.0, 1.5, badge_bg);
    set_color(&layer, badge_fg);
    layer.use_text(
        overall_level.to_string(),
        9.0,
        Mm(MARGIN + 62.0),
        Mm(panel_y + 9.3),
        &font_b,
    );

    set_color(&layer, TEXT_SEC);
    layer.use_text(
        format!("Confidence {:.2}", assessment.confidence_score),
        9.0,
        Mm(MARGIN + 100.0),
        Mm(panel_y + 9.3),
        &font_r,
    );

    // Stat cards
    let card_y = panel_y - 36.0;
    let card_h = 26.0f32;
    let gap = 4.0f32;
    let card_w = (PAGE_W - 2.0 * MARGIN - gap * 2.0) / 3.0;

    let cards: [(&str, String); 3] = [
        ("RISK FACTORS", assessment.risk_factors.len().to_string()),
        ("ROUTES", assessment.route_analysis.len().to_string()),
        ("SUPPLIERS", assessment.supplier_risks.len().to_string()),
    ];
    for (i, (label, value)) in cards.iter().enumerate() {
        let cx = MARGIN + (card_w + gap) * i as f32;
        fill_rounded_rect(&layer, cx, card_y, card_w, card_h, 1.5, WHITE);
        stroke_rounded_rect(&layer, cx, card_y, card_w, card_h, 1.5, PANEL_BORDER);
        fill_rect(&layer, cx, card_y + card_h - 2.0, card_w, 2.0, NAVY);
        set_color(&layer, TEXT_PRI);
        layer.use_text(value, 20.0, Mm(cx + 5.0), Mm(card_y + card_h * 0.38), &font_b);
        set_color(&layer, TEXT_MUT);
        layer.use_text(*label, 6.5, Mm(cx + 5.0), Mm(card_y + 3.5), &font_r);
    }

    // Footer
    draw_hline(&layer, MARGIN, PAGE_W - MARGIN, 22.0, PANEL_BORDER);
    set_color(&layer, TEXT_MUT);
    layer.use_text(
        format!("Generated by chainwatch v{}", env!("CARGO_PKG_VERSION")),
        7.5,
        Mm(MARGIN),
        Mm(15.0),
        &font_r,
    );

    Ok(())
}

fn add_detail_page(doc: &PdfDocumentReference, data: &AssessmentData) -> Result<()> {
    let (page_idx, layer_idx) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Detail");
    let mut layer = doc.get_page(page_idx).get_layer(layer_idx);

    let font_b = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
    let font_r = doc.add_builtin_font(BuiltinFont::Helvetica)?;

    let assessment = &data.risk_assessment;
    let mut cur_y = PAGE_H - MARGIN;

    // Start a fresh page whenever a row would spill past the bottom margin.
    let ensure_room = |needed: f32, cur_y: &mut f32, layer: &mut PdfLayerReference| {
        if *cur_y - needed < MARGIN {
            let (p, l) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Detail");
            *layer = doc.get_page(p).get_layer(l);
            *cur_y = PAGE_H - MARGIN;
        }
    };

    // ── Risk factors ──────────────────────────────────────────────────────────
    section_header(&layer, "RISK FACTORS", cur_y, &font_b);
    cur_y -= 12.0;

    if assessment.risk_factors.is_empty() {
        set_color(&layer, TEXT_MUT);
        layer.use_text("No risk factor crossed its threshold.", 8.5, Mm(MARGIN), Mm(cur_y), &font_r);
        cur_y -= 10.0;
    }

    for (i, factor) in assessment.risk_factors.iter().enumerate() {
        let desc_lines = wrap_text(&factor.description, 78);
        let seg_lines = factor
            .impacted_segments
            .as_ref()
            .map(|s| wrap_text(&s.join(", "), 78))
            .unwrap_or_default();
        let row_h = 6.0 + 4.5 * (desc_lines.len() + seg_lines.len()) as f32;
        ensure_room(row_h, &mut cur_y, &mut layer);

        if i % 2 == 0 {
            fill_rect(&layer, MARGIN, cur_y - row_h + 2.0, PAGE_W - 2.0 * MARGIN, row_h, PANEL_ALT);
        }

        set_color(&layer, TEXT_SEC);
        layer.use_text(
            format!("{}  ({:.2})", factor.kind, factor.score),
            8.0,
            Mm(MARGIN + 2.0),
            Mm(cur_y - 4.0),
            &font_b,
        );
        let mut line_y = cur_y - 9.0;
        set_color(&layer, TEXT_PRI);
        for line in &desc_lines {
            layer.use_text(line.as_str(), 8.5, Mm(MARGIN + 2.0), Mm(line_y), &font_r);
            line_y -= 4.5;
        }
        set_color(&layer, TEXT_MUT);
        for line in &seg_lines {
            layer.use_text(line.as_str(), 7.5, Mm(MARGIN + 2.0), Mm(line_y), &font_r);
            line_y -= 4.5;
        }
        cur_y -= row_h + 2.0;
    }

    // ── Routes ────────────────────────────────────────────────────────────────
    ensure_room(24.0, &mut cur_y, &mut layer);
    cur_y -= 6.0;
    section_header(&layer, "ROUTE ANALYSIS", cur_y, &font_b);
    cur_y -= 12.0;

    for route in &assessment.route_analysis {
        let alt_lines: Vec<String> = route
            .alternative_routes
            .iter()
            .map(|a| {
                format!(
                    "Alternative: {} ({}, {}, {})",
                    a.path, a.risk_level, a.additional_time, a.additional_cost
                )
            })
            .collect();
        let row_h = 10.0 + 4.5 * alt_lines.len() as f32;
        ensure_room(row_h, &mut cur_y, &mut layer);

        let (bg, fg) = level_colors(route.risk_level);
        fill_rounded_rect(&layer, MARGIN, cur_y - 5.2, 22.0, 5.0, 1.5, bg);
        set_color(&layer, fg);
        layer.use_text(
            route.risk_level.to_string(),
            7.0,
            Mm(MARGIN + 3.0),
            Mm(cur_y - 3.8),
            &font_b,
        );
        set_color(&layer, TEXT_PRI);
        layer.use_text(&route.route_id, 9.0, Mm(MARGIN + 26.0), Mm(cur_y - 3.8), &font_b);
        set_color(&layer, TEXT_SEC);
        layer.use_text(
            route.bottlenecks.join(", "),
            8.0,
            Mm(MARGIN + 90.0),
            Mm(cur_y - 3.8),
            &font_r,
        );
        let mut line_y = cur_y - 9.5;
        set_color(&layer, TEXT_MUT);
        for line in &alt_lines {
            layer.use_text(line.as_str(), 7.5, Mm(MARGIN + 26.0), Mm(line_y), &font_r);
            line_y -= 4.5;
        }
        draw_hline(&layer, MARGIN, PAGE_W - MARGIN, cur_y - row_h + 2.5, PANEL_BORDER);
        cur_y -= row_h;
    }

    // ── Suppliers ─────────────────────────────────────────────────────────────
    ensure_room(24.0, &mut cur_y, &mut layer);
    cur_y -= 6.0;
    section_header(&layer, "SUPPLIER RISKS", cur_y, &font_b);
    cur_y -= 12.0;

    for supplier in &assessment.supplier_risks {
        let detail = format!(
            "{}  |  {}",
            supplier.factors.join(", "),
            supplier.mitigation_strategies.join("; ")
        );
        let detail_lines = wrap_text(&detail, 90);
        let row_h = 8.0 + 4.5 * detail_lines.len() as f32;
        ensure_room(row_h, &mut cur_y, &mut layer);

        let (bg, fg) = level_colors(supplier.risk_level);
        fill_rounded_rect(&layer, MARGIN, cur_y - 5.2, 22.0, 5.0, 1.5, bg);
        set_color(&layer, fg);
        layer.use_text(
            supplier.risk_level.to_string(),
            7.0,
            Mm(MARGIN + 3.0),
            Mm(cur_y - 3.8),
            &font_b,
        );
        set_color(&layer, TEXT_PRI);
        layer.use_text(&supplier.supplier_id, 9.0, Mm(MARGIN + 26.0), Mm(cur_y - 3.8), &font_b);

        let mut line_y = cur_y - 9.5;
        set_color(&layer, TEXT_SEC);
        for line in &detail_lines {
            layer.use_text(line.as_str(), 7.5, Mm(MARGIN + 26.0), Mm(line_y), &font_r);
            line_y -= 4.5;
        }
        draw_hline(&layer, MARGIN, PAGE_W - MARGIN, cur_y - row_h + 2.5, PANEL_BORDER);
        cur_y -= row_h;
    }

    Ok(())
}

fn section_header(layer: &PdfLayerReference, title: &str, y: f32, font_b: &IndirectFontRef) {
    draw_hline(layer, MARGIN, PAGE_W - MARGIN, y, PANEL_BORDER);
    set_color(layer, TEXT_MUT);
    layer.use_text(title, 6.5, Mm(MARGIN), Mm(y - 6.0), font_b);
}

// ── Drawing helpers ───────────────────────────────────────────────────────────

fn set_color(layer: &PdfLayerReference, (r, g, b): (f32, f32, f32)) {
    layer.set_fill_color(Color::Rgb(Rgb { r, g, b, icc_profile: None }));
}

fn fill_rect(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32, color: (f32, f32, f32)) {
    set_color(layer, color);
    layer.add_polygon(Polygon {
        rings: vec![vec![
            (Point::new(Mm(x), Mm(y)), false),
            (Point::new(Mm(x + w), Mm(y)), false),
            (Point::new(Mm(x + w), Mm(y + h)), false),
            (Point::new(Mm(x), Mm(y + h)), false),
        ]],
        mode: PaintMode::Fill,
        winding_order: WindingOrder::NonZero,
    });
    set_color(layer, (0.0, 0.0, 0.0));
}

/// Clockwise ring approximating a rounded rectangle, 6 segments per corner.
fn rounded_rect_ring(x: f32, y: f32, w: f32, h: f32, r: f32) -> Vec<(Point, bool)> {
    let r = r.min(w / 2.0).min(h / 2.0);
    const SEGS: usize = 6;
    let corners = [
        (x + w - r, y + r, 270.0f32, 360.0f32),
        (x + w - r, y + h - r, 0.0f32, 90.0f32),
        (x + r, y + h - r, 90.0f32, 180.0f32),
        (x + r, y + r, 180.0f32, 270.0f32),
    ];
    let mut pts = Vec::with_capacity(4 * (SEGS + 1));
    for (cx, cy, start, end) in &corners {
        for i in 0..=SEGS {
            let angle = (start + (end - start) * i as f32 / SEGS as f32).to_radians();
            pts.push((Point::new(Mm(cx + r * angle.cos()), Mm(cy + r * angle.sin())), false));
        }
    }
    pts
}

fn fill_rounded_rect(
    layer: &PdfLayerReference,
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    r: f32,
    color: (f32, f32, f32),
) {
    set_color(layer, color);
    layer.add_polygon(Polygon {
        rings: vec![rounded_rect_ring(x, y, w, h, r)],
        mode: PaintMode::Fill,
        winding_order: WindingOrder::NonZero,
    });
    set_color(layer, (0.0, 0.0, 0.0));
}

fn stroke_rounded_rect(
    layer: &PdfLayerReference,
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    r: f32,
    (cr, cg, cb): (f32, f32, f32),
) {
    layer.set_outline_color(Color::Rgb(Rgb { r: cr, g: cg, b: cb, icc_profile: None }));
    layer.set_outline_thickness(0.4);
    layer.add_polygon(Polygon {
        rings: vec![rounded_rect_ring(x, y, w, h, r)],
        mode: PaintMode::Stroke,
        winding_order: WindingOrder::NonZero,
    });
    layer.set_outline_color(Color::Rgb(Rgb { r: 0.0, g: 0.0, b: 0.0, icc_profile: None }));
    layer.set_outline_thickness(1.0);
}

fn draw_hline(layer: &PdfLayerReference, x1: f32, x2: f32, y: f32, (r, g, b): (f32, f32, f32)) {
    layer.set_outline_color(Color::Rgb(Rgb { r, g, b, icc_profile: None }));
    layer.set_outline_thickness(0.3);
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(x1), Mm(y)), false),
            (Point::new(Mm(x2), Mm(y)), false),
        ],
        is_closed: false,
    });
    layer.set_outline_color(Color::Rgb(Rgb { r: 0.0, g: 0.0, b: 0.0, icc_profile: None }));
    layer.set_outline_thickness(1.0);
}

fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    if text.len() <= max_chars {
        return vec![text.to_string()];
    }
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.len() + 1 + word.len() > max_chars {
            lines.push(current.clone());
            current = word.to_string();
        } else {
            current.push(' ');
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_text_short_passthrough() {
        assert_eq!(wrap_text("short", 20), vec!["short"]);
    }

    #[test]
    fn test_wrap_text_breaks_on_words() {
        let lines = wrap_text("alpha beta gamma delta", 11);
        assert_eq!(lines, vec!["alpha beta", "gamma delta"]);
    }

    #[test]
    fn test_rounded_ring_point_count() {
        assert_eq!(rounded_rect_ring(0.0, 0.0, 10.0, 10.0, 2.0).len(), 4 * 7);
    }
}
