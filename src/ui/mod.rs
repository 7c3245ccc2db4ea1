pub mod chart_renderer;
pub mod chart_viewer;
pub mod keyboard;

use eframe::egui;
use tracing::{info, warn};

use crate::charts::Chart;
use crate::error::{PrepError, PrepResult};

pub use chart_viewer::ChartViewerApp;

/// Open a native window showing `charts`; blocks until it is closed
pub fn show_charts(charts: Vec<Chart>) -> PrepResult<()> {
    if charts.is_empty() {
        warn!("No charts to show");
        return Ok(());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 720.0])
            .with_title("Dataset Charts"),
        ..Default::default()
    };

    info!("Launching chart viewer with {} charts", charts.len());
    eframe::run_native(
        "Dataset Charts",
        options,
        Box::new(|cc| {
            let mut fonts = egui::FontDefinitions::default();
            egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
            cc.egui_ctx.set_fonts(fonts);
            Ok(Box::new(ChartViewerApp::new(charts)))
        }),
    )
    .map_err(|e| PrepError::Viewer(e.to_string()))
}
