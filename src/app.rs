//! The presentation
//!
//! Owns one of every controller plus the view, and routes UI events to them.
//! Nothing here fails loudly: controller errors are logged and the presentation
//! keeps going, so a missing element never blocks navigation.

use serde_json::json;

use crate::analytics::{Analytics, events};
use crate::calendar::CalendarEvent;
use crate::carousel::{Carousel, CarouselView};
use crate::config::Config;
use crate::error::Result;
use crate::evasive::{EvasiveTarget, Placement, TargetView};
use crate::input::{Key, SwipeDirection, SwipeTracker};
use crate::media::{AudioPlayer, MediaController, MediaView, PlayRequest};
use crate::page::{EntrySetup, PageController, PageId, SectionView};
use crate::reveal::{RevealView, ScrollReveal};
use crate::transition::{Activation, SettleTicket};

/// Everything the presentation needs from the document
pub trait Views:
    SectionView + RevealView + TargetView + CarouselView + AudioPlayer + MediaView
{
}

impl<T> Views for T where
    T: SectionView + RevealView + TargetView + CarouselView + AudioPlayer + MediaView
{
}

/// What the caller should do with the originating DOM event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Response {
    /// Cancel the browser's default action (page scroll on space)
    pub prevent_default: bool,
    /// Click the focused `.btn` once the presentation is no longer borrowed
    pub click_focused: bool,
}

/// Log a failed controller call and carry on
fn logged<T>(what: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("{} failed: {}", what, e);
            None
        }
    }
}

pub struct Presentation<V: Views> {
    views: V,
    analytics: Analytics,
    pages: PageController,
    reveal: ScrollReveal,
    target: EvasiveTarget,
    carousel: Carousel,
    media: MediaController,
    swipe: SwipeTracker,
    calendar: CalendarEvent,
    fade_stagger_secs: f64,
}

impl<V: Views> Presentation<V> {
    pub fn new(config: &Config, views: V, analytics: Analytics, seed: u64) -> Self {
        Self {
            views,
            analytics,
            pages: PageController::new(),
            reveal: ScrollReveal::new(),
            target: EvasiveTarget::new(config.evasive, config.no_labels.clone(), seed),
            carousel: Carousel::new(config.slide_settle_ms),
            media: MediaController::new(config.tracks.clone(), &config.default_track),
            swipe: SwipeTracker::new(config.swipe_threshold),
            calendar: config.calendar.clone(),
            fade_stagger_secs: config.fade_stagger_secs,
        }
    }

    pub fn views(&self) -> &V {
        &self.views
    }

    pub fn views_mut(&mut self) -> &mut V {
        &mut self.views
    }

    pub fn current_page(&self) -> PageId {
        self.pages.current()
    }

    pub fn carousel(&self) -> &Carousel {
        &self.carousel
    }

    pub fn media(&self) -> &MediaController {
        &self.media
    }

    pub fn reveal(&self) -> &ScrollReveal {
        &self.reveal
    }

    pub fn target(&self) -> &EvasiveTarget {
        &self.target
    }

    /// First paint: report the load, stagger the landing animations, warm the video
    pub fn start(&mut self) {
        let page = self.pages.current();
        self.analytics
            .report(events::PAGE_LOADED, json!({ "page": page.label() }));
        self.views
            .stagger_entry_animations(page, self.fade_stagger_secs);
        self.views.preload_video();
    }

    // === Pages ===

    /// Show a page and run its entry setup if it changed
    pub fn go_to_page(&mut self, page: PageId) -> Result<Activation> {
        let activation = self
            .pages
            .go_to_page(page, &mut self.views, &self.analytics)?;
        if activation.is_changed() {
            self.run_entry_setup(page);
        }
        Ok(activation)
    }

    /// Show a page by DOM id (`"page3"`)
    pub fn go_to_page_id(&mut self, id: &str) -> Result<Activation> {
        self.go_to_page(id.parse()?)
    }

    fn run_entry_setup(&mut self, page: PageId) {
        match page.entry_setup() {
            Some(EntrySetup::Invitation) => {
                logged("Scroll setup", self.reveal.reset(&mut self.views));
                logged("No button setup", self.target.ensure_bound(&mut self.views));
            }
            Some(EntrySetup::Carousel) => {
                logged("Carousel setup", self.carousel.ensure_built(&mut self.views));
            }
            Some(EntrySetup::Media) => {
                logged("Drive page setup", self.media.enter(&mut self.views));
            }
            None => {}
        }
    }

    // === Invitation ===

    /// Rolled scroll clicked or tapped
    pub fn open_scroll(&mut self) -> bool {
        self.reveal.open(&mut self.views, &self.analytics)
    }

    /// Pointer, finger or focus reached the "No" button
    pub fn no_button_approached(&mut self) -> Option<Placement> {
        logged(
            "No button",
            self.target.activate(&mut self.views, &self.analytics),
        )
    }

    // === Carousel ===

    pub fn next_slide(&mut self) -> Result<Activation> {
        self.carousel.next(&mut self.views, &self.analytics)
    }

    pub fn previous_slide(&mut self) -> Result<Activation> {
        self.carousel.previous(&mut self.views, &self.analytics)
    }

    pub fn dot_clicked(&mut self, index: usize) -> Result<Activation> {
        self.carousel.go_to(index, &mut self.views, &self.analytics)
    }

    /// Cross-fade timer fired
    pub fn settle_slide(&mut self, ticket: SettleTicket) -> bool {
        self.carousel.settle(ticket, &mut self.views)
    }

    // === Music ===

    pub fn select_track(&mut self, key: &str) -> Result<PlayRequest> {
        self.media
            .select_track(key, &mut self.views, &self.analytics)
    }

    pub fn toggle_play(&mut self) -> Result<Option<PlayRequest>> {
        self.media.toggle_play(&mut self.views, &self.analytics)
    }

    pub fn playback_started(&mut self, request: PlayRequest) {
        self.media.playback_started(request);
    }

    pub fn playback_refused(&mut self, request: PlayRequest, reason: &str) {
        self.media
            .playback_refused(request, reason, &mut self.views);
    }

    pub fn audio_ended(&mut self) {
        self.media.on_ended(&mut self.views);
    }

    pub fn audio_playing(&mut self) {
        self.media.on_player_play(&mut self.views);
    }

    pub fn audio_paused(&mut self) {
        self.media.on_player_pause(&mut self.views);
    }

    // === Calendar ===

    pub fn calendar_link(&self) -> String {
        self.calendar.link()
    }

    pub fn calendar_clicked(&self) {
        self.analytics.report_bare(events::CALENDAR_CLICKED);
    }

    // === Input ===

    /// Document-level keydown
    pub fn handle_key(&mut self, key: Key) -> Response {
        let mut response = Response {
            click_focused: key.activates_button(),
            ..Response::default()
        };

        match (self.pages.current(), key) {
            (PageId::RoastPreview, Key::ArrowRight) => {
                logged("Next slide", self.next_slide());
            }
            (PageId::RoastPreview, Key::ArrowLeft) => {
                logged("Previous slide", self.previous_slide());
            }
            (PageId::VirtualDrive, Key::Space) => {
                response.prevent_default = true;
                logged("Toggle play", self.toggle_play());
            }
            _ => {}
        }
        response
    }

    pub fn touch_start(&mut self, screen_x: f64) {
        self.swipe.begin(screen_x);
    }

    /// Finish a touch; swipes only navigate on the carousel page
    pub fn touch_end(&mut self, screen_x: f64) -> Option<SwipeDirection> {
        let direction = self.swipe.end(screen_x)?;
        if self.pages.current() != PageId::RoastPreview {
            return None;
        }
        match direction {
            SwipeDirection::Left => logged("Swipe next", self.next_slide()),
            SwipeDirection::Right => logged("Swipe previous", self.previous_slide()),
        };
        Some(direction)
    }
}
