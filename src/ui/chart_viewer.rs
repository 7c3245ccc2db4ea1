use eframe::egui;
use egui_phosphor::regular as Icon;
use tracing::debug;

use crate::charts::{Chart, ChartKind};

use super::chart_renderer::ChartRenderer;
use super::keyboard::handle_keyboard_shortcuts;

/// Window with one tab per chart
pub struct ChartViewerApp {
    charts: Vec<Chart>,
    pub current: usize,
}

impl ChartViewerApp {
    pub fn new(charts: Vec<Chart>) -> Self {
        Self { charts, current: 0 }
    }

    pub fn current_chart(&self) -> Option<&Chart> {
        self.charts.get(self.current)
    }

    pub fn next_chart(&mut self) {
        if !self.charts.is_empty() {
            self.current = (self.current + 1) % self.charts.len();
            debug!("Showing chart {}/{}", self.current + 1, self.charts.len());
        }
    }

    pub fn prev_chart(&mut self) {
        if !self.charts.is_empty() {
            self.current = (self.current + self.charts.len() - 1) % self.charts.len();
            debug!("Showing chart {}/{}", self.current + 1, self.charts.len());
        }
    }

    fn render_tabs(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("chart_tabs").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button(Icon::CARET_LEFT).clicked() {
                    self.prev_chart();
                }

                let mut selected = None;
                for (i, chart) in self.charts.iter().enumerate() {
                    let icon = match chart.kind {
                        ChartKind::Pie => Icon::CHART_PIE_SLICE,
                        _ => Icon::CHART_BAR,
                    };
                    if ui
                        .selectable_label(self.current == i, format!("{} {}", icon, chart.file_stem))
                        .clicked()
                    {
                        selected = Some(i);
                    }
                }
                if let Some(i) = selected {
                    self.current = i;
                }

                if ui.button(Icon::CARET_RIGHT).clicked() {
                    self.next_chart();
                }
            });
        });
    }
}

impl eframe::App for ChartViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        handle_keyboard_shortcuts(self, ctx);
        self.render_tabs(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            let (response, painter) =
                ui.allocate_painter(ui.available_size(), egui::Sense::hover());
            match self.current_chart() {
                Some(chart) => ChartRenderer::draw(&painter, response.rect, chart),
                None => {
                    ui.centered_and_justified(|ui| ui.label("No charts"));
                }
            }
        });
    }
}
