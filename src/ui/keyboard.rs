use eframe::egui;
use tracing::info;

use super::chart_viewer::ChartViewerApp;

/// Left/Right switch charts, Escape closes the window
pub fn handle_keyboard_shortcuts(app: &mut ChartViewerApp, ctx: &egui::Context) {
    if ctx.input(|i| i.key_pressed(egui::Key::ArrowRight)) {
        app.next_chart();
    }
    if ctx.input(|i| i.key_pressed(egui::Key::ArrowLeft)) {
        app.prev_chart();
    }
    if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        info!("Closing chart viewer");
        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{Chart, ChartColor};

    fn key_press(key: egui::Key) -> egui::RawInput {
        egui::RawInput {
            events: vec![egui::Event::Key {
                key,
                physical_key: None,
                pressed: true,
                repeat: false,
                modifiers: egui::Modifiers::NONE,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_arrow_keys_switch_charts() {
        let charts = (0..2)
            .map(|i| {
                Chart::bar(
                    &format!("c{}", i),
                    "x",
                    "y",
                    vec!["a".to_string()],
                    vec![1.0],
                    ChartColor::SKY_BLUE,
                )
            })
            .collect();
        let mut app = ChartViewerApp::new(charts);
        let ctx = egui::Context::default();

        let _ = ctx.run(key_press(egui::Key::ArrowRight), |ctx| {
            handle_keyboard_shortcuts(&mut app, ctx)
        });
        assert_eq!(app.current, 1);

        let _ = ctx.run(key_press(egui::Key::ArrowLeft), |ctx| {
            handle_keyboard_shortcuts(&mut app, ctx)
        });
        assert_eq!(app.current, 0);
    }
}
