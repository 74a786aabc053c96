//! FinitX Dashboard - business analytics web client
//!
//! Authenticated dashboard over the FinitX backends: the OBWB email service
//! (mailbox linking, AI digests, follow-ups) and the optical retail reports,
//! built with Leptos and WebAssembly.

#![recursion_limit = "4096"]

pub mod app;
pub mod core;
pub mod ui;

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    use crate::app::*;
    console_error_panic_hook::set_once();
    leptos::mount::hydrate_body(App);
}
