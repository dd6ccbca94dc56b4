//! Inline SVG charts for the dashboard
//!
//! A donut chart of stock share and a bar chart of quantity per category.
//! Colors come from a qualitative pastel palette assigned in category order.

use dashkit_common::html::escape;
use std::f64::consts::PI;

use crate::summary::CategoryTotal;

/// Qualitative pastel palette
pub const PASTEL: [&str; 11] = [
    "rgb(102, 197, 204)",
    "rgb(246, 207, 113)",
    "rgb(248, 156, 116)",
    "rgb(220, 176, 242)",
    "rgb(135, 197, 95)",
    "rgb(158, 185, 243)",
    "rgb(254, 136, 177)",
    "rgb(201, 219, 116)",
    "rgb(139, 224, 164)",
    "rgb(180, 151, 231)",
    "rgb(179, 179, 179)",
];

/// Fraction of the outer radius left open in the donut
pub const DONUT_HOLE: f64 = 0.3;

const PIE_SIZE: f64 = 300.0;
const PIE_RADIUS: f64 = 130.0;
const LEGEND_WIDTH: f64 = 150.0;
/// Slices thinner than this carry no inside label
const MIN_LABELED_SHARE: f64 = 0.04;

const BAR_WIDTH: f64 = 520.0;
const BAR_HEIGHT: f64 = 300.0;
const BAR_MARGIN_TOP: f64 = 24.0;
const BAR_MARGIN_BOTTOM: f64 = 40.0;
const BAR_MARGIN_SIDE: f64 = 20.0;
const BAR_GAP: f64 = 0.2;

const TEXT_COLOR: &str = "#e0e0e0";
const SLICE_TEXT_COLOR: &str = "#1a1a1a";

pub fn category_color(index: usize) -> &'static str {
    PASTEL[index % PASTEL.len()]
}

/// Accumulates SVG elements for one chart
struct SvgCanvas {
    width: f64,
    height: f64,
    label: String,
    body: String,
}

impl SvgCanvas {
    fn new(width: f64, height: f64, label: &str) -> Self {
        Self {
            width,
            height,
            label: label.to_string(),
            body: String::new(),
        }
    }

    fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, fill: &str) {
        self.body.push_str(&format!(
            r#"<rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}" fill="{fill}"/>"#
        ));
    }

    fn path(&mut self, d: &str, fill: &str, title: &str) {
        self.body.push_str(&format!(
            r##"<path d="{d}" fill="{fill}" fill-rule="evenodd" stroke="#1a1a1a" stroke-width="1"><title>{title}</title></path>"##,
            title = escape(title)
        ));
    }

    fn text(&mut self, x: f64, y: f64, content: &str, size: f64, anchor: &str, fill: &str) {
        self.body.push_str(&format!(
            r#"<text x="{x:.2}" y="{y:.2}" font-size="{size:.1}" fill="{fill}" text-anchor="{anchor}" dominant-baseline="middle">{}</text>"#,
            escape(content)
        ));
    }

    fn finish(self) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" class="chart" width="{w}" height="{h}" viewBox="0 0 {w} {h}" role="img" aria-label="{label}">{body}</svg>"#,
            w = self.width,
            h = self.height,
            label = escape(&self.label),
            body = self.body
        )
    }
}

fn placeholder(width: f64, height: f64, message: &str) -> String {
    let mut canvas = SvgCanvas::new(width, height, message);
    canvas.text(width / 2.0, height / 2.0, message, 14.0, "middle", TEXT_COLOR);
    canvas.finish()
}

fn polar(cx: f64, cy: f64, radius: f64, angle: f64) -> (f64, f64) {
    (cx + radius * angle.sin(), cy - radius * angle.cos())
}

/// Annular sector from `start` to `end`, angles clockwise from 12 o'clock
fn sector_path(cx: f64, cy: f64, outer: f64, inner: f64, start: f64, end: f64) -> String {
    let large_arc = if end - start > PI { 1 } else { 0 };
    let (ox1, oy1) = polar(cx, cy, outer, start);
    let (ox2, oy2) = polar(cx, cy, outer, end);
    let (ix2, iy2) = polar(cx, cy, inner, end);
    let (ix1, iy1) = polar(cx, cy, inner, start);
    format!(
        "M{ox1:.2},{oy1:.2} A{outer:.2},{outer:.2} 0 {large_arc} 1 {ox2:.2},{oy2:.2} \
         L{ix2:.2},{iy2:.2} A{inner:.2},{inner:.2} 0 {large_arc} 0 {ix1:.2},{iy1:.2} Z"
    )
}

/// Complete ring, drawn as two half arcs per circle
fn ring_path(cx: f64, cy: f64, outer: f64, inner: f64) -> String {
    format!(
        "M{l:.2},{cy:.2} A{outer:.2},{outer:.2} 0 1 1 {r:.2},{cy:.2} A{outer:.2},{outer:.2} 0 1 1 {l:.2},{cy:.2} Z \
         M{il:.2},{cy:.2} A{inner:.2},{inner:.2} 0 1 0 {ir:.2},{cy:.2} A{inner:.2},{inner:.2} 0 1 0 {il:.2},{cy:.2} Z",
        l = cx - outer,
        r = cx + outer,
        il = cx - inner,
        ir = cx + inner,
    )
}

fn format_percent(share: f64) -> String {
    format!("{:.1}%", share * 100.0)
}

/// Donut chart of each category's share of total quantity
///
/// Zero total stock renders a placeholder instead of empty arcs.
pub fn pie_chart_svg(totals: &[CategoryTotal]) -> String {
    let width = PIE_SIZE + LEGEND_WIDTH;
    let grand_total: u64 = totals.iter().map(|t| t.quantity).sum();
    if grand_total == 0 {
        return placeholder(width, PIE_SIZE, "No stock to chart");
    }

    let mut canvas = SvgCanvas::new(width, PIE_SIZE, "Stock proportion by category");
    let (cx, cy) = (PIE_SIZE / 2.0, PIE_SIZE / 2.0);
    let inner = PIE_RADIUS * DONUT_HOLE;
    let label_radius = (PIE_RADIUS + inner) / 2.0;

    let mut start = 0.0;
    for (index, total) in totals.iter().enumerate() {
        let color = category_color(index);
        let title = format!(
            "{}: {} ({})",
            total.category,
            total.quantity,
            format_percent(total.share)
        );

        if total.quantity == grand_total {
            canvas.path(&ring_path(cx, cy, PIE_RADIUS, inner), color, &title);
            canvas.text(cx, cy - label_radius, total.category.as_str(), 12.0, "middle", SLICE_TEXT_COLOR);
            canvas.text(cx, cy - label_radius + 14.0, &format_percent(1.0), 11.0, "middle", SLICE_TEXT_COLOR);
        } else if total.quantity > 0 {
            let sweep = total.share * 2.0 * PI;
            let end = start + sweep;
            canvas.path(&sector_path(cx, cy, PIE_RADIUS, inner, start, end), color, &title);

            if total.share >= MIN_LABELED_SHARE {
                let (lx, ly) = polar(cx, cy, label_radius, start + sweep / 2.0);
                canvas.text(lx, ly - 7.0, total.category.as_str(), 11.0, "middle", SLICE_TEXT_COLOR);
                canvas.text(lx, ly + 7.0, &format_percent(total.share), 10.0, "middle", SLICE_TEXT_COLOR);
            }
            start = end;
        }

        let legend_y = 20.0 + 22.0 * index as f64;
        canvas.rect(PIE_SIZE + 10.0, legend_y - 7.0, 14.0, 14.0, color);
        canvas.text(PIE_SIZE + 30.0, legend_y, total.category.as_str(), 12.0, "start", TEXT_COLOR);
    }

    canvas.finish()
}

/// Bar chart of total quantity per category with value labels
pub fn bar_chart_svg(totals: &[CategoryTotal]) -> String {
    if totals.is_empty() {
        return placeholder(BAR_WIDTH, BAR_HEIGHT, "No categories to chart");
    }

    let mut canvas = SvgCanvas::new(BAR_WIDTH, BAR_HEIGHT, "Total quantity by category");
    let plot_height = BAR_HEIGHT - BAR_MARGIN_TOP - BAR_MARGIN_BOTTOM;
    let baseline = BAR_HEIGHT - BAR_MARGIN_BOTTOM;
    let slot = (BAR_WIDTH - 2.0 * BAR_MARGIN_SIDE) / totals.len() as f64;
    let bar_width = slot * (1.0 - BAR_GAP);
    let max = totals.iter().map(|t| t.quantity).max().unwrap_or(0).max(1) as f64;

    canvas.rect(BAR_MARGIN_SIDE, baseline, BAR_WIDTH - 2.0 * BAR_MARGIN_SIDE, 1.0, TEXT_COLOR);

    for (index, total) in totals.iter().enumerate() {
        let height = plot_height * total.quantity as f64 / max;
        let x = BAR_MARGIN_SIDE + slot * index as f64 + (slot - bar_width) / 2.0;
        let center = x + bar_width / 2.0;

        canvas.rect(x, baseline - height, bar_width, height, category_color(index));
        canvas.text(center, baseline - height - 10.0, &total.quantity.to_string(), 12.0, "middle", TEXT_COLOR);
        canvas.text(center, baseline + 16.0, total.category.as_str(), 12.0, "middle", TEXT_COLOR);
    }

    canvas.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;

    fn total(category: Category, quantity: u64, share: f64) -> CategoryTotal {
        CategoryTotal {
            category,
            quantity,
            share,
        }
    }

    #[test]
    fn test_palette_wraps() {
        assert_eq!(category_color(0), PASTEL[0]);
        assert_eq!(category_color(PASTEL.len()), PASTEL[0]);
    }

    #[test]
    fn test_pie_zero_total_is_placeholder() {
        let svg = pie_chart_svg(&[total(Category::Sports, 0, 0.0)]);
        assert!(svg.contains("No stock to chart"));
        assert!(!svg.contains("<path"));
        assert!(!svg.contains("NaN"));
    }

    #[test]
    fn test_pie_single_category_is_full_ring() {
        let svg = pie_chart_svg(&[total(Category::Grocery, 40, 1.0)]);
        assert_eq!(svg.matches("<path").count(), 1);
        assert!(svg.contains("100.0%"));
        assert!(svg.contains("Grocery"));
    }

    #[test]
    fn test_pie_slices_and_labels() {
        let svg = pie_chart_svg(&[
            total(Category::Clothing, 25, 0.25),
            total(Category::Electronics, 0, 0.0),
            total(Category::Sports, 75, 0.75),
        ]);
        // zero-quantity categories keep their legend entry but get no slice
        assert_eq!(svg.matches("<path").count(), 2);
        assert!(svg.contains("25.0%"));
        assert!(svg.contains("75.0%"));
        assert!(svg.contains("Electronics"));
        assert!(svg.contains(PASTEL[2]));
        assert!(!svg.contains("NaN"));
    }

    #[test]
    fn test_sector_uses_large_arc_past_half() {
        let small = sector_path(0.0, 0.0, 10.0, 3.0, 0.0, PI / 2.0);
        let large = sector_path(0.0, 0.0, 10.0, 3.0, 0.0, 1.5 * PI);
        assert!(small.contains(" 0 0 1 "));
        assert!(large.contains(" 0 1 1 "));
    }

    #[test]
    fn test_bar_chart_value_labels() {
        let svg = bar_chart_svg(&[
            total(Category::Clothing, 12, 0.2),
            total(Category::Sports, 48, 0.8),
        ]);
        assert!(svg.contains(">12</text>"));
        assert!(svg.contains(">48</text>"));
        assert!(svg.contains(">Sports</text>"));
        assert!(svg.contains(PASTEL[1]));
    }

    #[test]
    fn test_bar_chart_all_zero() {
        let svg = bar_chart_svg(&[total(Category::Clothing, 0, 0.0)]);
        assert!(svg.contains(">0</text>"));
        assert!(!svg.contains("NaN"));
    }

    #[test]
    fn test_bar_chart_empty_is_placeholder() {
        assert!(bar_chart_svg(&[]).contains("No categories to chart"));
    }
}
