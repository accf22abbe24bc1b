//! Mahotsava - an interactive multi-page digital invitation
//!
//! Core modules:
//! - `transition`: Exclusive one-of-N activation shared by pages and slides
//! - `page`: Top-level section navigation and per-page setup
//! - `carousel`: Slide navigation with dot indicators
//! - `reveal`: The rolled scroll on the invitation page
//! - `evasive`: The runaway "No" button
//! - `media`: Looping audio player and background video
//! - `input`: Keyboard and swipe adapters
//! - `calendar`: Add-to-calendar link builder
//! - `analytics`: Fire-and-forget event reporting
//! - `config`: Tunable constants with inline JSON overrides
//! - `app`: The presentation that owns every controller
//! - `platform`: Browser bindings for all of the above

pub mod analytics;
pub mod app;
pub mod calendar;
pub mod carousel;
pub mod config;
pub mod error;
pub mod evasive;
pub mod input;
pub mod media;
pub mod page;
pub mod platform;
pub mod reveal;
pub mod transition;

#[cfg(test)]
pub(crate) mod testing;

pub use analytics::{Analytics, AnalyticsSink, Properties};
pub use app::{Presentation, Response, Views};
pub use config::Config;
pub use error::{Error, Result};
pub use page::PageId;
pub use transition::{Activation, MemberStatus, SettleTicket, TransitionEngine};

/// Design constants
pub mod consts {
    /// Distance kept between the evasive button and the viewport edges (px)
    pub const EVASIVE_MARGIN: f64 = 20.0;
    /// Preferred minimum jump from the previous position, per axis (px)
    pub const EVASIVE_MIN_DISTANCE: f64 = 120.0;
    /// Placement draws before accepting whatever came last
    pub const EVASIVE_MAX_ATTEMPTS: u32 = 20;
    /// Maximum tilt either way (degrees)
    pub const EVASIVE_MAX_ROTATION_DEG: f64 = 10.0;

    /// Horizontal travel before a touch counts as a swipe (px)
    pub const SWIPE_THRESHOLD: f64 = 50.0;

    /// Cross-fade hold for the outgoing slide (ms)
    pub const SLIDE_SETTLE_MS: u32 = 50;

    /// Per-element animation delay on the landing page (s)
    pub const FADE_STAGGER_SECS: f64 = 0.1;

    /// Appended to the song title when the browser refuses to autoplay
    pub const CLICK_PLAY_HINT: &str = " (Click play)";
}

/// One-time setup state for components that bind listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    Uninitialized,
    Ready,
}

impl Lifecycle {
    pub fn is_ready(&self) -> bool {
        *self == Lifecycle::Ready
    }
}
