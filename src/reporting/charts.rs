//! Static SVG charts embedded into the journal as base64 data URIs

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use std::f64::consts::PI;

use super::html_escape;
use crate::analysis::{HistogramBin, Point};
use crate::config::ChartStyle;
use crate::core::error::{JournalError, Result};

/// Room around the plot area for the title, ticks and labels
const MARGIN: f64 = 50.0;
const TITLE_Y: f64 = 24.0;
const AXIS_COLOR: &str = "#e5e7eb";
const LABEL_COLOR: &str = "#6b7280";
const TITLE_COLOR: &str = "#374151";

/// A rendered chart
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub title: String,
    pub svg: String,
}

impl Chart {
    /// `data:image/svg+xml;base64,...` URI for an `<img src>`
    pub fn data_uri(&self) -> String {
        format!("data:image/svg+xml;base64,{}", BASE64.encode(self.svg.as_bytes()))
    }
}

fn degenerate(title: &str, reason: &str) -> JournalError {
    JournalError::Render(format!("cannot draw '{title}': {reason}"))
}

fn check_categories(title: &str, data: &[(String, f64)]) -> Result<()> {
    if data.is_empty() {
        return Err(degenerate(title, "no data"));
    }
    let non_zero = data.iter().filter(|(_, v)| *v > 0.0).count();
    if data.iter().map(|(_, v)| v.max(0.0)).sum::<f64>() == 0.0 {
        return Err(degenerate(title, "all values are zero"));
    }
    if data.len() < 2 || non_zero < 2 {
        return Err(degenerate(title, "only one category"));
    }
    Ok(())
}

fn range(values: impl Iterator<Item = f64> + Clone) -> (f64, f64) {
    let min = values.clone().fold(f64::INFINITY, f64::min);
    let max = values.fold(f64::NEG_INFINITY, f64::max);
    (min, max)
}

/// Tick label: whole numbers without decimals, everything else with one
fn tick(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

fn frame(title: &str, style: &ChartStyle, body: &str) -> String {
    let (width, height) = (style.width as f64, style.height as f64);
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">
  <rect width="{w}" height="{h}" fill="#ffffff"/>
  <text x="{cx}" y="{TITLE_Y}" text-anchor="middle" font-size="15" font-weight="600" fill="{TITLE_COLOR}">{title}</text>
{body}</svg>"##,
        w = width,
        h = height,
        cx = width / 2.0,
        title = html_escape(title),
    )
}

fn axes(style: &ChartStyle, x_label: &str, y_label: &str) -> String {
    let (width, height) = (style.width as f64, style.height as f64);
    let bottom = height - MARGIN;
    format!(
        r##"  <line x1="{MARGIN}" y1="{bottom}" x2="{right}" y2="{bottom}" stroke="{AXIS_COLOR}" stroke-width="2"/>
  <line x1="{MARGIN}" y1="{MARGIN}" x2="{MARGIN}" y2="{bottom}" stroke="{AXIS_COLOR}" stroke-width="2"/>
  <text x="{cx}" y="{xl}" text-anchor="middle" font-size="12" fill="{LABEL_COLOR}">{x_label}</text>
  <text x="14" y="{cy}" text-anchor="middle" font-size="12" fill="{LABEL_COLOR}" transform="rotate(-90, 14, {cy})">{y_label}</text>
"##,
        right = width - MARGIN,
        cx = width / 2.0,
        xl = height - 8.0,
        cy = height / 2.0,
        x_label = html_escape(x_label),
        y_label = html_escape(y_label),
    )
}

/// Vertical bars, one per category, in the given order
pub fn bar_chart(
    title: &str,
    data: &[(String, f64)],
    y_label: &str,
    style: &ChartStyle,
) -> Result<Chart> {
    check_categories(title, data)?;

    let plot_w = style.width as f64 - 2.0 * MARGIN;
    let plot_h = style.height as f64 - 2.0 * MARGIN;
    let bottom = MARGIN + plot_h;
    let max = data.iter().map(|(_, v)| *v).fold(0.0, f64::max);
    let slot = plot_w / data.len() as f64;

    let mut body = axes(style, "", y_label);
    for (i, (label, value)) in data.iter().enumerate() {
        let bar_h = value.max(0.0) / max * plot_h;
        let x = MARGIN + i as f64 * slot + slot * 0.1;
        let y = bottom - bar_h;
        body.push_str(&format!(
            r##"  <rect x="{x:.1}" y="{y:.1}" width="{bw:.1}" height="{bar_h:.1}" fill="{color}" opacity="0.9"/>
  <text x="{cx:.1}" y="{vy:.1}" text-anchor="middle" font-size="11" fill="{TITLE_COLOR}">{value}</text>
  <text x="{cx:.1}" y="{ly:.1}" text-anchor="middle" font-size="11" fill="{LABEL_COLOR}">{label}</text>
"##,
            bw = slot * 0.8,
            color = style.color(i),
            cx = x + slot * 0.4,
            vy = y - 4.0,
            value = tick(*value),
            ly = bottom + 16.0,
            label = html_escape(label),
        ));
    }

    Ok(Chart {
        title: title.to_string(),
        svg: frame(title, style, &body),
    })
}

/// Pie with a legend; zero-valued slices are left out
pub fn pie_chart(title: &str, data: &[(String, f64)], style: &ChartStyle) -> Result<Chart> {
    check_categories(title, data)?;

    let total: f64 = data.iter().map(|(_, v)| v.max(0.0)).sum();
    let (width, height) = (style.width as f64, style.height as f64);
    let radius = ((height - 2.0 * MARGIN) / 2.0).min(width / 4.0);
    let (cx, cy) = (width / 3.0, height / 2.0 + 10.0);

    let mut body = String::new();
    let mut angle = -PI / 2.0;
    for (i, (label, value)) in data.iter().enumerate() {
        if *value <= 0.0 {
            continue;
        }
        let share = value / total;
        let sweep = share * 2.0 * PI;
        let (x1, y1) = (cx + radius * angle.cos(), cy + radius * angle.sin());
        let end = angle + sweep;
        let (x2, y2) = (cx + radius * end.cos(), cy + radius * end.sin());
        let large_arc = if sweep > PI { 1 } else { 0 };
        let color = style.color(i);

        body.push_str(&format!(
            r##"  <path d="M {cx:.1} {cy:.1} L {x1:.2} {y1:.2} A {radius:.1} {radius:.1} 0 {large_arc} 1 {x2:.2} {y2:.2} Z" fill="{color}" stroke="#ffffff" stroke-width="2"/>
"##
        ));

        let legend_y = MARGIN + 10.0 + i as f64 * 22.0;
        body.push_str(&format!(
            r##"  <rect x="{lx:.1}" y="{ry:.1}" width="14" height="14" fill="{color}"/>
  <text x="{tx:.1}" y="{legend_y:.1}" font-size="12" fill="{TITLE_COLOR}">{label} ({pct:.1}%)</text>
"##,
            lx = width * 0.65,
            ry = legend_y - 11.0,
            tx = width * 0.65 + 20.0,
            label = html_escape(label),
            pct = share * 100.0,
        ));
        angle = end;
    }

    Ok(Chart {
        title: title.to_string(),
        svg: frame(title, style, &body),
    })
}

/// Scatter plot of `(x, y)` points scaled to their own ranges
pub fn scatter_chart(
    title: &str,
    points: &[Point],
    x_label: &str,
    y_label: &str,
    style: &ChartStyle,
) -> Result<Chart> {
    if points.len() < 2 {
        return Err(degenerate(title, "fewer than two points"));
    }
    let (x_min, x_max) = range(points.iter().map(|p| p.x));
    let (y_min, y_max) = range(points.iter().map(|p| p.y));
    if x_max == x_min || y_max == y_min {
        return Err(degenerate(title, "values have no spread"));
    }

    let plot_w = style.width as f64 - 2.0 * MARGIN;
    let plot_h = style.height as f64 - 2.0 * MARGIN;
    let bottom = MARGIN + plot_h;
    let color = style.color(0);

    let mut body = axes(style, x_label, y_label);
    for point in points {
        let x = MARGIN + (point.x - x_min) / (x_max - x_min) * plot_w;
        let y = bottom - (point.y - y_min) / (y_max - y_min) * plot_h;
        body.push_str(&format!(
            r##"  <circle cx="{x:.1}" cy="{y:.1}" r="4" fill="{color}" opacity="0.6"/>
"##
        ));
    }
    body.push_str(&format!(
        r##"  <text x="{MARGIN}" y="{ty:.1}" text-anchor="middle" font-size="10" fill="{LABEL_COLOR}">{x0}</text>
  <text x="{right:.1}" y="{ty:.1}" text-anchor="middle" font-size="10" fill="{LABEL_COLOR}">{x1}</text>
  <text x="{lx:.1}" y="{bottom:.1}" text-anchor="end" font-size="10" fill="{LABEL_COLOR}">{y0}</text>
  <text x="{lx:.1}" y="{top:.1}" text-anchor="end" font-size="10" fill="{LABEL_COLOR}">{y1}</text>
"##,
        ty = bottom + 16.0,
        right = MARGIN + plot_w,
        x0 = tick(x_min),
        x1 = tick(x_max),
        lx = MARGIN - 6.0,
        top = MARGIN + 4.0,
        y0 = tick(y_min),
        y1 = tick(y_max),
    ));

    Ok(Chart {
        title: title.to_string(),
        svg: frame(title, style, &body),
    })
}

/// Contiguous bars over precomputed equal-width bins
pub fn histogram_chart(
    title: &str,
    bins: &[HistogramBin],
    x_label: &str,
    style: &ChartStyle,
) -> Result<Chart> {
    let count: usize = bins.iter().map(|b| b.count).sum();
    if count < 2 {
        return Err(degenerate(title, "fewer than two values"));
    }
    let (Some(first), Some(last)) = (bins.first(), bins.last()) else {
        return Err(degenerate(title, "no data"));
    };
    if last.upper == first.lower {
        return Err(degenerate(title, "values have no spread"));
    }

    let plot_w = style.width as f64 - 2.0 * MARGIN;
    let plot_h = style.height as f64 - 2.0 * MARGIN;
    let bottom = MARGIN + plot_h;
    let max = bins.iter().map(|b| b.count).max().unwrap_or(1).max(1) as f64;
    let bar_w = plot_w / bins.len() as f64;
    let color = style.color(0);

    let mut body = axes(style, x_label, "Count");
    for (i, bin) in bins.iter().enumerate() {
        let x = MARGIN + i as f64 * bar_w;
        let bar_h = bin.count as f64 / max * plot_h;
        body.push_str(&format!(
            r##"  <rect x="{x:.1}" y="{y:.1}" width="{bar_w:.1}" height="{bar_h:.1}" fill="{color}" stroke="#ffffff" stroke-width="1" opacity="0.85"/>
  <text x="{lx:.1}" y="{ly:.1}" text-anchor="middle" font-size="10" fill="{LABEL_COLOR}">{lower}</text>
"##,
            y = bottom - bar_h,
            lx = x,
            ly = bottom + 16.0,
            lower = tick(bin.lower),
        ));
    }
    body.push_str(&format!(
        r##"  <text x="{x:.1}" y="{y:.1}" text-anchor="middle" font-size="10" fill="{LABEL_COLOR}">{upper}</text>
"##,
        x = MARGIN + plot_w,
        y = bottom + 16.0,
        upper = tick(last.upper),
    ));

    Ok(Chart {
        title: title.to_string(),
        svg: frame(title, style, &body),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReportConfig;

    fn style() -> ChartStyle {
        ReportConfig::default().style
    }

    fn series(items: &[(&str, f64)]) -> Vec<(String, f64)> {
        items.iter().map(|(l, v)| (l.to_string(), *v)).collect()
    }

    #[test]
    fn test_bar_chart_renders_every_category() {
        let chart = bar_chart(
            "Plan Distribution",
            &series(&[("Basic", 3.0), ("Pro", 1.0)]),
            "Customers",
            &style(),
        )
        .unwrap();
        assert!(chart.svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
        assert_eq!(chart.svg.matches("<rect x=").count(), 2);
        assert!(chart.svg.contains(">Basic<"));
        assert!(chart.svg.contains(">Pro<"));
    }

    #[test]
    fn test_bar_chart_degenerate_inputs() {
        let s = style();
        assert!(bar_chart("t", &[], "y", &s).unwrap_err().is_render());
        assert!(
            bar_chart("t", &series(&[("Only", 4.0)]), "y", &s)
                .unwrap_err()
                .is_render()
        );
        let err = bar_chart("t", &series(&[("a", 0.0), ("b", 0.0)]), "y", &s).unwrap_err();
        assert!(format!("{err}").contains("all values are zero"));
    }

    #[test]
    fn test_chart_labels_are_escaped() {
        let chart = bar_chart(
            "<b>Plans</b>",
            &series(&[("A&B", 1.0), ("<script>", 2.0)]),
            "y",
            &style(),
        )
        .unwrap();
        assert!(chart.svg.contains("A&amp;B"));
        assert!(chart.svg.contains("&lt;script&gt;"));
        assert!(!chart.svg.contains("<script>"));
        assert!(chart.svg.contains("&lt;b&gt;Plans&lt;/b&gt;"));
    }

    #[test]
    fn test_pie_chart_legend_percentages() {
        let chart = pie_chart(
            "Churn Rate",
            &series(&[("Churned", 1.0), ("Retained", 1.0)]),
            &style(),
        )
        .unwrap();
        assert_eq!(chart.svg.matches("<path").count(), 2);
        assert!(chart.svg.contains("Churned (50.0%)"));
        assert!(chart.svg.contains("Retained (50.0%)"));
    }

    #[test]
    fn test_pie_chart_single_slice_is_degenerate() {
        let err = pie_chart(
            "Churn Rate",
            &series(&[("Churned", 0.0), ("Retained", 5.0)]),
            &style(),
        )
        .unwrap_err();
        assert!(err.is_render());
    }

    #[test]
    fn test_scatter_chart() {
        let points = vec![Point { x: 10.0, y: 1.0 }, Point { x: 50.0, y: 24.0 }];
        let chart =
            scatter_chart("Spend vs Tenure", &points, "Monthly Spend", "Tenure", &style()).unwrap();
        assert_eq!(chart.svg.matches("<circle").count(), 2);

        let flat = vec![Point { x: 1.0, y: 1.0 }, Point { x: 1.0, y: 1.0 }];
        assert!(scatter_chart("s", &flat, "x", "y", &style()).unwrap_err().is_render());
        assert!(scatter_chart("s", &points[..1], "x", "y", &style()).is_err());
    }

    #[test]
    fn test_histogram_chart() {
        let bins = crate::analysis::stats::histogram(&[1.0, 2.0, 3.0, 4.0], 2);
        let chart = histogram_chart("Tenure Distribution", &bins, "Tenure", &style()).unwrap();
        assert_eq!(chart.svg.matches("opacity=\"0.85\"").count(), 2);

        let flat = crate::analysis::stats::histogram(&[5.0, 5.0], 4);
        assert!(histogram_chart("h", &flat, "x", &style()).unwrap_err().is_render());
        let single = crate::analysis::stats::histogram(&[5.0], 4);
        assert!(histogram_chart("h", &single, "x", &style()).is_err());
    }

    #[test]
    fn test_data_uri() {
        let chart = Chart {
            title: "t".to_string(),
            svg: "<svg/>".to_string(),
        };
        assert_eq!(chart.data_uri(), "data:image/svg+xml;base64,PHN2Zy8+");
    }

    #[test]
    fn test_tick_formatting() {
        assert_eq!(tick(10.0), "10");
        assert_eq!(tick(2.26), "2.3");
        assert_eq!(tick(-3.0), "-3");
    }
}
