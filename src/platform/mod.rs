//! Platform abstraction layer
//!
//! Everything above this module is plain Rust driven through view traits and
//! runs natively under test. The browser side lives in [`web`]:
//! - DOM implementations of every view trait
//! - The Mixpanel analytics sink
//! - Listener wiring, timers and media promises

#[cfg(target_arch = "wasm32")]
pub mod web;
