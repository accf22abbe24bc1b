//! Rolled scroll on the invitation page
//!
//! Closed every time the page is shown; opens once per visit on click or tap.

use crate::Lifecycle;
use crate::analytics::{Analytics, events};
use crate::error::Result;

/// DOM side of the scroll
pub trait RevealView {
    /// Toggle `scroll-opened` on the scroll container
    fn set_scroll_opened(&mut self, opened: bool);

    /// Attach click / touch-end handlers to the rolled scroll
    fn bind_scroll_handlers(&mut self) -> Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct ScrollReveal {
    lifecycle: Lifecycle,
    opened: bool,
}

impl ScrollReveal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.opened
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Close the scroll and bind handlers on first use
    pub fn reset<V: RevealView + ?Sized>(&mut self, view: &mut V) -> Result<()> {
        self.opened = false;
        view.set_scroll_opened(false);

        if !self.lifecycle.is_ready() {
            view.bind_scroll_handlers()?;
            self.lifecycle = Lifecycle::Ready;
        }
        Ok(())
    }

    /// Open the scroll. Returns false if it was already open.
    pub fn open<V: RevealView + ?Sized>(&mut self, view: &mut V, analytics: &Analytics) -> bool {
        if self.opened {
            return false;
        }
        self.opened = true;
        view.set_scroll_opened(true);
        analytics.report_bare(events::SCROLL_OPENED);
        true
    }
}
