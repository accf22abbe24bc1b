//! Image carousel on the roast preview page
//!
//! Slides wrap in both directions. Each move holds the outgoing slide as `prev`
//! for a short cross-fade; the view schedules the settle and hands the ticket back
//! through [`Carousel::settle`].

use serde_json::json;

use crate::analytics::{Analytics, events};
use crate::error::{Error, Result};
use crate::transition::{Activation, MemberStatus, SettleMode, SettleTicket, Stage, TransitionEngine};

/// DOM side of the carousel
pub trait CarouselView {
    /// Number of `.slide` elements in the markup
    fn slide_count(&self) -> usize;

    /// Replace the dot container's contents with `count` clickable dots
    fn build_dots(&mut self, count: usize) -> Result<()>;

    /// Toggle `active` / `prev` on a slide
    fn set_slide_status(&mut self, index: usize, status: MemberStatus);

    fn set_dot_active(&mut self, index: usize, active: bool);

    /// Call [`Carousel::settle`] with `ticket` after `delay_ms`
    fn schedule_settle(&mut self, ticket: SettleTicket, delay_ms: u32);
}

struct Slides<'a, V: ?Sized>(&'a mut V);

impl<V: CarouselView + ?Sized> Stage<usize> for Slides<'_, V> {
    fn set_status(&mut self, index: usize, status: MemberStatus) {
        self.0.set_slide_status(index, status);
        self.0.set_dot_active(index, status == MemberStatus::Active);
    }
}

/// Slide navigation state
#[derive(Debug, Clone)]
pub struct Carousel {
    engine: Option<TransitionEngine<usize>>,
    settle_ms: u32,
}

impl Carousel {
    pub fn new(settle_ms: u32) -> Self {
        Self {
            engine: None,
            settle_ms,
        }
    }

    pub fn is_built(&self) -> bool {
        self.engine.is_some()
    }

    /// Number of slides (0 until built)
    pub fn len(&self) -> usize {
        self.engine.as_ref().map_or(0, |e| e.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn current_index(&self) -> usize {
        self.engine.as_ref().map_or(0, |e| e.current_index())
    }

    pub fn slide_status(&self, index: usize) -> Option<MemberStatus> {
        self.engine.as_ref().and_then(|e| e.status_at(index))
    }

    /// Set up navigation and the dots on first call. Returns true if this call did it.
    pub fn ensure_built<V: CarouselView + ?Sized>(&mut self, view: &mut V) -> Result<bool> {
        if self.is_built() {
            return Ok(false);
        }

        let count = view.slide_count();
        if count == 0 {
            return Err(Error::EmptyCarousel);
        }

        self.engine = Some(TransitionEngine::new(
            (0..count).collect(),
            0,
            SettleMode::Deferred,
        )?);

        // Dots are optional; slides navigate without them
        match view.build_dots(count) {
            Ok(()) => view.set_dot_active(0, true),
            Err(e) => log::warn!("Carousel dots unavailable: {}", e),
        }

        log::info!("Carousel ready with {} slides", count);
        Ok(true)
    }

    /// Advance one slide, wrapping to the first
    pub fn next<V: CarouselView + ?Sized>(
        &mut self,
        view: &mut V,
        analytics: &Analytics,
    ) -> Result<Activation> {
        let (current, count) = self.position()?;
        let target = (current + 1) % count;
        analytics.report(events::CAROUSEL_NEXT, json!({ "slide_index": target }));
        self.show(target, view, analytics)
    }

    /// Go back one slide, wrapping to the last
    pub fn previous<V: CarouselView + ?Sized>(
        &mut self,
        view: &mut V,
        analytics: &Analytics,
    ) -> Result<Activation> {
        let (current, count) = self.position()?;
        let target = (current + count - 1) % count;
        analytics.report(events::CAROUSEL_PREV, json!({ "slide_index": target }));
        self.show(target, view, analytics)
    }

    /// Jump to a slide from its dot. Out-of-range indices wrap.
    pub fn go_to<V: CarouselView + ?Sized>(
        &mut self,
        index: usize,
        view: &mut V,
        analytics: &Analytics,
    ) -> Result<Activation> {
        let (_, count) = self.position()?;
        let target = index % count;
        analytics.report(events::CAROUSEL_DOT, json!({ "slide_index": target }));
        self.show(target, view, analytics)
    }

    /// Finish the cross-fade started by a move
    pub fn settle<V: CarouselView + ?Sized>(&mut self, ticket: SettleTicket, view: &mut V) -> bool {
        match self.engine.as_mut() {
            Some(engine) => engine.settle(ticket, &mut Slides(&mut *view)),
            None => false,
        }
    }

    fn position(&self) -> Result<(usize, usize)> {
        let engine = self.engine.as_ref().ok_or(Error::NotReady("carousel"))?;
        Ok((engine.current_index(), engine.len()))
    }

    fn show<V: CarouselView + ?Sized>(
        &mut self,
        target: usize,
        view: &mut V,
        analytics: &Analytics,
    ) -> Result<Activation> {
        let engine = self.engine.as_mut().ok_or(Error::NotReady("carousel"))?;
        let activation = engine.activate_index(target, &mut Slides(&mut *view), analytics)?;
        if let Some(ticket) = activation.settle_ticket() {
            view.schedule_settle(ticket, self.settle_ms);
        }
        Ok(activation)
    }
}
