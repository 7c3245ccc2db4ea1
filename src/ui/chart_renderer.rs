use eframe::egui::{self, Align2, Color32, FontId, Painter, Pos2, Rect, Shape, Stroke, Vec2};
use std::f64::consts::{FRAC_PI_2, TAU};

use crate::charts::{nice_axis_max, Chart, ChartColor, ChartKind};

const AXIS_TICKS: usize = 5;
const LEGEND_WIDTH: f32 = 150.0;
const WEDGE_SEGMENTS_PER_TURN: f64 = 128.0;

pub fn to_color32(color: ChartColor) -> Color32 {
    Color32::from_rgb(color.0, color.1, color.2)
}

/// Painter-based drawing of a [`Chart`] into a screen rectangle
pub struct ChartRenderer;

impl ChartRenderer {
    pub fn draw(painter: &Painter, rect: Rect, chart: &Chart) {
        let text_color = painter.ctx().style().visuals.text_color();

        painter.text(
            Pos2::new(rect.center().x, rect.top() + 8.0),
            Align2::CENTER_TOP,
            &chart.title,
            FontId::proportional(18.0),
            text_color,
        );

        let mut plot = Rect::from_min_max(
            Pos2::new(rect.left() + 70.0, rect.top() + 44.0),
            Pos2::new(rect.right() - 20.0, rect.bottom() - 90.0),
        );
        if chart.kind != ChartKind::Bar {
            plot.max.x -= LEGEND_WIDTH;
            Self::draw_legend(painter, chart, Pos2::new(plot.right() + 16.0, plot.top()));
        }
        if plot.width() <= 0.0 || plot.height() <= 0.0 {
            return;
        }

        match chart.kind {
            ChartKind::Pie => Self::draw_pie(painter, plot, chart, text_color),
            _ => Self::draw_bars(painter, plot, chart, text_color),
        }
    }

    fn draw_bars(painter: &Painter, plot: Rect, chart: &Chart, text_color: Color32) {
        let axis_max = nice_axis_max(chart.max_value());
        let y_of = |value: f64| plot.bottom() - (value / axis_max) as f32 * plot.height();
        let grid = Stroke::new(1.0, Color32::from_gray(90));

        for i in 0..=AXIS_TICKS {
            let value = axis_max * i as f64 / AXIS_TICKS as f64;
            let y = y_of(value);
            painter.line_segment([Pos2::new(plot.left(), y), Pos2::new(plot.right(), y)], grid);
            painter.text(
                Pos2::new(plot.left() - 6.0, y),
                Align2::RIGHT_CENTER,
                format_value(value),
                FontId::proportional(11.0),
                text_color,
            );
        }

        let count = chart.categories.len().max(1);
        let slot = plot.width() / count as f32;
        let series_count = chart.series.len().max(1);

        for (c, category) in chart.categories.iter().enumerate() {
            let slot_left = plot.left() + slot * c as f32;
            let center_x = slot_left + slot / 2.0;

            for (s, series) in chart.series.iter().enumerate() {
                let value = series.values.get(c).copied().unwrap_or(0.0);
                let (left, width, base) = match chart.kind {
                    ChartKind::GroupedBar => {
                        let group = slot * 0.8;
                        let width = group / series_count as f32;
                        (center_x - group / 2.0 + width * s as f32, width, 0.0)
                    }
                    ChartKind::StackedBar => (center_x - slot * 0.3, slot * 0.6, chart.stack_top(c, s)),
                    _ => (center_x - slot * 0.3, slot * 0.6, 0.0),
                };
                if value <= 0.0 {
                    continue;
                }
                let bar = Rect::from_min_max(
                    Pos2::new(left, y_of(base + value)),
                    Pos2::new(left + width, y_of(base)),
                );
                painter.rect_filled(bar, 0.0, to_color32(series.color));
            }

            painter.text(
                Pos2::new(center_x, plot.bottom() + 6.0),
                Align2::CENTER_TOP,
                category,
                FontId::proportional(11.0),
                text_color,
            );
        }

        let axis = Stroke::new(1.5, text_color);
        painter.line_segment([plot.left_bottom(), plot.right_bottom()], axis);
        painter.line_segment([plot.left_bottom(), plot.left_top()], axis);

        painter.text(
            Pos2::new(plot.center().x, plot.bottom() + 40.0),
            Align2::CENTER_TOP,
            &chart.x_label,
            FontId::proportional(13.0),
            text_color,
        );
        painter.text(
            Pos2::new(plot.left() - 60.0, plot.top() - 24.0),
            Align2::LEFT_TOP,
            &chart.y_label,
            FontId::proportional(13.0),
            text_color,
        );
    }

    fn draw_pie(painter: &Painter, plot: Rect, chart: &Chart, text_color: Color32) {
        let center = plot.center();
        let radius = plot.width().min(plot.height()) / 2.0 * 0.85;

        for slice in chart.pie_slices() {
            let color = to_color32(chart.slice_color(slice.index));
            for points in wedge_polygons(center, radius, slice.start_angle, slice.end_angle) {
                painter.add(Shape::convex_polygon(points, color, Stroke::NONE));
            }

            let mid = slice.mid_angle();
            painter.text(
                point_on_circle(center, radius * 0.6, mid),
                Align2::CENTER_CENTER,
                format!("{:.1}%", slice.fraction * 100.0),
                FontId::proportional(12.0),
                Color32::BLACK,
            );
            if let Some(label) = chart.categories.get(slice.index) {
                painter.text(
                    point_on_circle(center, radius * 1.1, mid),
                    Align2::CENTER_CENTER,
                    label,
                    FontId::proportional(12.0),
                    text_color,
                );
            }
        }
    }

    fn draw_legend(painter: &Painter, chart: &Chart, top_left: Pos2) {
        let text_color = painter.ctx().style().visuals.text_color();
        let entries: Vec<(&str, ChartColor)> = match chart.kind {
            ChartKind::Pie => chart
                .categories
                .iter()
                .enumerate()
                .map(|(i, name)| (name.as_str(), chart.slice_color(i)))
                .collect(),
            _ => chart
                .series
                .iter()
                .map(|s| (s.name.as_str(), s.color))
                .collect(),
        };

        for (i, (name, color)) in entries.into_iter().enumerate() {
            let y = top_left.y + i as f32 * 20.0;
            let swatch = Rect::from_min_size(Pos2::new(top_left.x, y), Vec2::splat(12.0));
            painter.rect_filled(swatch, 2.0, to_color32(color));
            painter.text(
                Pos2::new(top_left.x + 18.0, y + 6.0),
                Align2::LEFT_CENTER,
                name,
                FontId::proportional(12.0),
                text_color,
            );
        }
    }
}

/// Screen point at `angle` radians counter-clockwise from +x (screen y grows downwards)
pub fn point_on_circle(center: Pos2, radius: f32, angle: f64) -> Pos2 {
    center + egui::vec2(angle.cos() as f32, -(angle.sin() as f32)) * radius
}

/// Fan polygons covering a wedge, each spanning at most a quarter turn so it stays convex
pub fn wedge_polygons(center: Pos2, radius: f32, start: f64, end: f64) -> Vec<Vec<Pos2>> {
    let sweep = end - start;
    if sweep <= 0.0 {
        return Vec::new();
    }

    let pieces = (sweep / FRAC_PI_2).ceil().max(1.0) as usize;
    let step = sweep / pieces as f64;

    (0..pieces)
        .map(|piece| {
            let from = start + step * piece as f64;
            let segments = (step / TAU * WEDGE_SEGMENTS_PER_TURN).ceil().max(1.0) as usize;
            let mut points = Vec::with_capacity(segments + 2);
            points.push(center);
            for k in 0..=segments {
                let angle = from + step * k as f64 / segments as f64;
                points.push(point_on_circle(center, radius, angle));
            }
            points
        })
        .collect()
}

fn format_value(value: f64) -> String {
    if value.fract().abs() < 1e-9 {
        format!("{}", value as i64)
    } else {
        format!("{:.1}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_on_circle_uses_screen_coordinates() {
        let center = Pos2::new(100.0, 100.0);
        let top = point_on_circle(center, 10.0, FRAC_PI_2);
        assert!((top.x - 100.0).abs() < 1e-4);
        assert!((top.y - 90.0).abs() < 1e-4);

        let right = point_on_circle(center, 10.0, 0.0);
        assert!((right.x - 110.0).abs() < 1e-4);
    }

    #[test]
    fn test_wedge_polygons_split_at_quarter_turns() {
        let center = Pos2::new(0.0, 0.0);

        assert_eq!(wedge_polygons(center, 1.0, 0.0, FRAC_PI_2).len(), 1);
        assert_eq!(wedge_polygons(center, 1.0, 0.0, FRAC_PI_2 + 0.1).len(), 2);
        assert_eq!(wedge_polygons(center, 1.0, FRAC_PI_2, FRAC_PI_2 + TAU).len(), 4);
        assert!(wedge_polygons(center, 1.0, 1.0, 1.0).is_empty());

        let polys = wedge_polygons(center, 5.0, 0.0, 1.0);
        assert_eq!(polys[0][0], center);
        for p in &polys[0][1..] {
            assert!(((p.x * p.x + p.y * p.y).sqrt() - 5.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(20.0), "20");
        assert_eq!(format_value(0.5), "0.5");
    }

    #[test]
    fn test_to_color32() {
        assert_eq!(to_color32(ChartColor::SKY_BLUE), Color32::from_rgb(135, 206, 235));
    }
}
