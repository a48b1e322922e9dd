mod app;
mod config;
mod icon;
mod injector;
mod mover;

#[cfg(test)]
mod testing;

use app::AppState;
use mover::SystemClock;
use std::sync::Arc;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();

    let mut viewport = egui::ViewportBuilder::default()
        .with_title("Mickey Bumper")
        .with_inner_size([340.0, 200.0])
        .with_min_inner_size([300.0, 160.0]);
    if let Some(icon) = icon::load() {
        viewport = viewport.with_icon(icon);
    }

    let opts = eframe::NativeOptions { viewport, ..Default::default() };
    let injector = injector::platform_injector();

    eframe::run_native(
        "Mickey Bumper",
        opts,
        Box::new(move |cc| {
            Box::new(AppState::new(injector, Arc::new(SystemClock)).with_repaint(cc.egui_ctx.clone()))
        }),
    )
}
