//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time/ticks (frame delta clamping)
//! - Input events (key codes and pointer into `TickInput`)
//! - Logger setup

pub mod input;
pub mod time;

pub use input::InputState;
pub use time::FrameClock;

/// Install the logger for the current target; safe to call more than once
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("info");
    let _ = env_logger::Builder::from_env(env).try_init();
}

/// Install the panic hook and console logger
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn wasm_start() {
    init_logging();
    log::info!("oraksil-arcade {} loaded", env!("CARGO_PKG_VERSION"));
}
