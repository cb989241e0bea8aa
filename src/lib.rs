/// Tab Lens - Chrome Extension that summarizes and categorizes open tabs
/// Built with Rust + WASM + Yew

pub mod background;
pub mod badge;
pub mod bridge;
pub mod categorizer;
pub mod dashboard;
pub mod error;
pub mod extractor;
pub mod host;
pub mod operations;
pub mod pipeline;
pub mod registry;
pub mod settings;
pub mod storage;
pub mod summarizer;
pub mod tab_data;
pub mod timeout;
pub mod ui;

#[cfg(test)]
mod test_support;

use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Re-export the category check for JavaScript access
#[wasm_bindgen]
pub fn is_system_url(url: &str) -> bool {
    extractor::is_system_url(url)
}

// Start the background service worker listeners
#[wasm_bindgen]
pub fn start_background() {
    background::start();
}

// Start the Yew app for the dashboard page
#[wasm_bindgen]
pub fn start_dashboard() {
    yew::Renderer::<ui::dashboard::Dashboard>::new().render();
}
