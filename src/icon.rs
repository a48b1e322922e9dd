//! Window icon, embedded in the binary and decoded best-effort at startup.

use tracing::debug;

const ICON_PNG: &[u8] = include_bytes!("../assets/icon.png");

pub fn load() -> Option<egui::IconData> {
    decode(ICON_PNG)
}

fn decode(bytes: &[u8]) -> Option<egui::IconData> {
    match eframe::icon_data::from_png_bytes(bytes) {
        Ok(icon) => Some(icon),
        Err(err) => {
            debug!(%err, "window icon is not a usable PNG");
            None
        }
    }
}
