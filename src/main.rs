//! Mahotsava entry point
//!
//! Handles platform-specific initialization. The browser build wires the DOM and
//! hands control to the event loop; the native build only prints what it can.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = mahotsava::platform::web::run() {
        log::error!("Invitation failed to start: {}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let config = mahotsava::Config::load();
    log::info!("Mahotsava (native) starting...");
    log::info!("The invitation runs in the browser - run with `trunk serve` for the web version");

    let event = &config.calendar;
    println!("{} ({} to {})", event.title, event.start, event.end);
    println!("Add to calendar: {}", event.link());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
