//! SVG chart writer.
//!
//! Produces standalone SVG documents that open in any browser and can be
//! dropped into reports as-is.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use super::model::{nice_axis_max, Chart, ChartKind};
use crate::error::PrepResult;

/// Chart styling constants
const CHART_WIDTH: f64 = 900.0;
const CHART_HEIGHT: f64 = 560.0;
const MARGIN_TOP: f64 = 70.0;
const MARGIN_RIGHT: f64 = 150.0;
const MARGIN_BOTTOM: f64 = 130.0;
const MARGIN_LEFT: f64 = 90.0;
const GRID_LINES: usize = 5;

const COLOR_GRID: &str = "#ecf0f1";
const COLOR_AXIS: &str = "#2c3e50";
const COLOR_TEXT: &str = "#2c3e50";
const FONT: &str = "Arial, sans-serif";

/// Render `chart` to an SVG document
pub fn render_svg(chart: &Chart) -> String {
    let mut svg = String::new();

    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}">"#,
        w = CHART_WIDTH,
        h = CHART_HEIGHT
    );
    let _ = write!(
        svg,
        r#"<rect width="{}" height="{}" fill="white"/>"#,
        CHART_WIDTH, CHART_HEIGHT
    );
    let _ = write!(
        svg,
        r#"<text x="{}" y="38" text-anchor="middle" font-family="{}" font-size="18" font-weight="bold" fill="{}">{}</text>"#,
        CHART_WIDTH / 2.0,
        FONT,
        COLOR_TEXT,
        escape_xml(&chart.title)
    );

    match chart.kind {
        ChartKind::Pie => render_pie(chart, &mut svg),
        _ => render_bars(chart, &mut svg),
    }

    svg.push_str("</svg>");
    svg
}

pub fn write_svg(chart: &Chart, output_path: &Path) -> PrepResult<()> {
    fs::write(output_path, render_svg(chart))?;
    info!("Chart written to: {:?}", output_path);
    Ok(())
}

/// Write `chart` as `<dir>/<file_stem>.svg` and return the path
pub fn write_svg_into(chart: &Chart, dir: &Path) -> PrepResult<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.svg", chart.file_stem));
    write_svg(chart, &path)?;
    Ok(path)
}

fn render_bars(chart: &Chart, svg: &mut String) {
    let plot_width = CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_height = CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let baseline = MARGIN_TOP + plot_height;
    let y_max = nice_axis_max(chart.max_value());
    let to_height = |value: f64| (value / y_max) * plot_height;

    // Grid lines and y tick labels
    for i in 0..=GRID_LINES {
        let fraction = i as f64 / GRID_LINES as f64;
        let y = baseline - fraction * plot_height;
        let _ = write!(
            svg,
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="1"/>"#,
            MARGIN_LEFT,
            y,
            MARGIN_LEFT + plot_width,
            y,
            COLOR_GRID
        );
        let _ = write!(
            svg,
            r#"<text x="{}" y="{}" text-anchor="end" font-family="{}" font-size="12" fill="{}">{}</text>"#,
            MARGIN_LEFT - 10.0,
            y + 4.0,
            FONT,
            COLOR_TEXT,
            format_tick(fraction * y_max)
        );
    }

    // Axes
    let _ = write!(
        svg,
        r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="2"/>"#,
        MARGIN_LEFT,
        baseline,
        MARGIN_LEFT + plot_width,
        baseline,
        COLOR_AXIS
    );
    let _ = write!(
        svg,
        r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="2"/>"#,
        MARGIN_LEFT, MARGIN_TOP, MARGIN_LEFT, baseline, COLOR_AXIS
    );

    // Axis labels
    let _ = write!(
        svg,
        r#"<text x="{}" y="{}" text-anchor="middle" font-family="{}" font-size="14" fill="{}">{}</text>"#,
        MARGIN_LEFT + plot_width / 2.0,
        CHART_HEIGHT - 15.0,
        FONT,
        COLOR_TEXT,
        escape_xml(&chart.x_label)
    );
    let _ = write!(
        svg,
        r#"<text x="24" y="{y}" text-anchor="middle" font-family="{}" font-size="14" fill="{}" transform="rotate(-90 24 {y})">{}</text>"#,
        FONT,
        COLOR_TEXT,
        escape_xml(&chart.y_label),
        y = MARGIN_TOP + plot_height / 2.0
    );

    let categories = chart.categories.len();
    if categories == 0 {
        return;
    }
    let slot = plot_width / categories as f64;
    let series_count = chart.series.len().max(1);

    for (c, category) in chart.categories.iter().enumerate() {
        let slot_x = MARGIN_LEFT + c as f64 * slot;

        match chart.kind {
            ChartKind::GroupedBar => {
                let group_width = slot * 0.8;
                let bar_width = group_width / series_count as f64;
                for (s, series) in chart.series.iter().enumerate() {
                    let value = series.values.get(c).copied().unwrap_or(0.0);
                    let x = slot_x + slot * 0.1 + s as f64 * bar_width;
                    let height = to_height(value);
                    push_bar(svg, x, baseline - height, bar_width * 0.95, height, &series.color.to_hex());
                }
            }
            ChartKind::StackedBar => {
                let bar_width = slot * 0.6;
                let x = slot_x + slot * 0.2;
                for (s, series) in chart.series.iter().enumerate() {
                    let value = series.values.get(c).copied().unwrap_or(0.0);
                    let bottom = baseline - to_height(chart.stack_top(c, s));
                    let height = to_height(value);
                    push_bar(svg, x, bottom - height, bar_width, height, &series.color.to_hex());
                }
                let top = chart.stack_top(c, chart.series.len());
                push_value_label(svg, x + bar_width / 2.0, baseline - to_height(top) - 6.0, top);
            }
            _ => {
                let bar_width = slot * 0.7;
                let x = slot_x + slot * 0.15;
                if let Some(series) = chart.series.first() {
                    let value = series.values.get(c).copied().unwrap_or(0.0);
                    let height = to_height(value);
                    push_bar(svg, x, baseline - height, bar_width, height, &series.color.to_hex());
                    push_value_label(svg, x + bar_width / 2.0, baseline - height - 6.0, value);
                }
            }
        }

        // Category label, rotated like xticks(rotation=45)
        let label_x = slot_x + slot / 2.0;
        let label_y = baseline + 18.0;
        let _ = write!(
            svg,
            r#"<text x="{x}" y="{y}" text-anchor="end" font-family="{}" font-size="11" fill="{}" transform="rotate(-45 {x} {y})">{}</text>"#,
            FONT,
            COLOR_TEXT,
            escape_xml(category),
            x = label_x,
            y = label_y
        );
    }

    if chart.kind != ChartKind::Bar {
        let entries: Vec<(String, String)> = chart
            .series
            .iter()
            .map(|s| (s.name.clone(), s.color.to_hex()))
            .collect();
        push_legend(svg, &entries);
    }
}

fn render_pie(chart: &Chart, svg: &mut String) {
    let radius = (CHART_HEIGHT - MARGIN_TOP - 60.0) / 2.0;
    let cx = (CHART_WIDTH - MARGIN_RIGHT) / 2.0;
    let cy = MARGIN_TOP + 10.0 + radius;
    let point = |angle: f64, r: f64| (cx + r * angle.cos(), cy - r * angle.sin());

    let slices = chart.pie_slices();
    for slice in &slices {
        let color = chart.slice_color(slice.index).to_hex();

        if slice.fraction >= 1.0 - 1e-9 {
            let _ = write!(
                svg,
                r#"<circle cx="{}" cy="{}" r="{}" fill="{}" stroke="white" stroke-width="2"/>"#,
                cx, cy, radius, color
            );
        } else {
            let (x0, y0) = point(slice.start_angle, radius);
            let (x1, y1) = point(slice.end_angle, radius);
            let large_arc = if slice.fraction > 0.5 { 1 } else { 0 };
            // sweep-flag 0: counter-clockwise on screen
            let _ = write!(
                svg,
                r#"<path d="M {} {} L {} {} A {} {} 0 {} 0 {} {} Z" fill="{}" stroke="white" stroke-width="2"/>"#,
                cx, cy, x0, y0, radius, radius, large_arc, x1, y1, color
            );
        }

        let (lx, ly) = point(slice.mid_angle(), radius * 0.6);
        let _ = write!(
            svg,
            r#"<text x="{}" y="{}" text-anchor="middle" font-family="{}" font-size="13" font-weight="bold" fill="{}">{:.1}%</text>"#,
            lx,
            ly + 4.0,
            FONT,
            COLOR_TEXT,
            slice.fraction * 100.0
        );

        let (tx, ty) = point(slice.mid_angle(), radius * 1.1);
        let anchor = if tx >= cx { "start" } else { "end" };
        let _ = write!(
            svg,
            r#"<text x="{}" y="{}" text-anchor="{}" font-family="{}" font-size="12" fill="{}">{}</text>"#,
            tx,
            ty + 4.0,
            anchor,
            FONT,
            COLOR_TEXT,
            escape_xml(chart.categories.get(slice.index).map(String::as_str).unwrap_or(""))
        );
    }

    let entries: Vec<(String, String)> = chart
        .categories
        .iter()
        .enumerate()
        .map(|(i, name)| (name.clone(), chart.slice_color(i).to_hex()))
        .collect();
    push_legend(svg, &entries);
}

fn push_bar(svg: &mut String, x: f64, y: f64, width: f64, height: f64, color: &str) {
    if height <= 0.0 {
        return;
    }
    let _ = write!(
        svg,
        r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}" stroke="black" stroke-width="0.5"/>"#,
        x, y, width, height, color
    );
}

fn push_value_label(svg: &mut String, x: f64, y: f64, value: f64) {
    let _ = write!(
        svg,
        r#"<text x="{}" y="{}" text-anchor="middle" font-family="{}" font-size="11" font-weight="bold" fill="{}">{}</text>"#,
        x,
        y,
        FONT,
        COLOR_TEXT,
        format_tick(value)
    );
}

fn push_legend(svg: &mut String, entries: &[(String, String)]) {
    let x = CHART_WIDTH - MARGIN_RIGHT + 20.0;
    let mut y = MARGIN_TOP;
    for (name, color) in entries {
        let _ = write!(
            svg,
            r#"<rect x="{}" y="{}" width="14" height="14" fill="{}"/>"#,
            x, y, color
        );
        let _ = write!(
            svg,
            r#"<text x="{}" y="{}" font-family="{}" font-size="12" fill="{}">{}</text>"#,
            x + 20.0,
            y + 12.0,
            FONT,
            COLOR_TEXT,
            escape_xml(name)
        );
        y += 22.0;
    }
}

fn format_tick(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{ChartColor, Series};

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_bar_chart_contains_title_and_bars() {
        let chart = Chart::bar(
            "Images per class",
            "Class",
            "Count",
            labels(&["cat", "dog"]),
            vec![4.0, 8.0],
            ChartColor::SKY_BLUE,
        );
        let svg = render_svg(&chart);

        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("Images per class"));
        assert!(svg.contains("rotate(-45"));
        assert_eq!(svg.matches("fill=\"#87ceeb\"").count(), 2);
    }

    #[test]
    fn test_labels_are_escaped() {
        let chart = Chart::bar(
            "Cats & <Dogs>",
            "x",
            "y",
            labels(&["a\"b"]),
            vec![1.0],
            ChartColor::SKY_BLUE,
        );
        let svg = render_svg(&chart);
        assert!(svg.contains("Cats &amp; &lt;Dogs&gt;"));
        assert!(svg.contains("a&quot;b"));
        assert!(!svg.contains("<Dogs>"));
    }

    #[test]
    fn test_stacked_chart_has_legend_and_totals() {
        let chart = Chart::stacked_bar(
            "Split",
            "Class",
            "Images",
            labels(&["a"]),
            vec![
                Series::new("Train", ChartColor::STEEL_BLUE, vec![7.0]),
                Series::new("Val", ChartColor::ORANGE, vec![1.0]),
                Series::new("Test", ChartColor::GREEN, vec![2.0]),
            ],
        );
        let svg = render_svg(&chart);
        assert!(svg.contains(">Train</text>"));
        assert!(svg.contains(">Val</text>"));
        assert!(svg.contains(">Test</text>"));
        assert!(svg.contains(">10</text>"));
    }

    #[test]
    fn test_pie_percentages() {
        let chart = Chart::pie("Share", labels(&["a", "b"]), vec![1.0, 3.0]);
        let svg = render_svg(&chart);
        assert!(svg.contains(">25.0%</text>"));
        assert!(svg.contains(">75.0%</text>"));
        assert_eq!(svg.matches("<path").count(), 2);
    }

    #[test]
    fn test_single_slice_pie_is_a_circle() {
        let chart = Chart::pie("Share", labels(&["only", "none"]), vec![5.0, 0.0]);
        let svg = render_svg(&chart);
        assert!(svg.contains("<circle"));
        assert!(svg.contains(">100.0%</text>"));
    }

    #[test]
    fn test_empty_pie_renders_title_only() {
        let chart = Chart::pie("Nothing here", labels(&["a"]), vec![0.0]);
        let svg = render_svg(&chart);
        assert!(svg.contains("Nothing here"));
        assert!(!svg.contains("<path"));
        assert!(!svg.contains("%</text>"));
    }

    #[test]
    fn test_write_svg_into_uses_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        let chart = Chart::pie("Share", labels(&["a"]), vec![1.0]).named("dataset_piechart");
        let path = write_svg_into(&chart, &dir.path().join("charts")).unwrap();

        assert_eq!(path, dir.path().join("charts").join("dataset_piechart.svg"));
        assert!(fs::read_to_string(path).unwrap().contains("Share"));
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(10.0), "10");
        assert_eq!(format_tick(2.5), "2.5");
    }
}
