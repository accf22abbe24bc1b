//! Top-level page navigation
//!
//! Six full-screen sections, one visible at a time. Switching runs through a
//! [`TransitionEngine`] in immediate mode and reports `Page Navigated`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::analytics::{Analytics, events};
use crate::error::{Error, Result};
use crate::transition::{Activation, Member, MemberStatus, SettleMode, Stage, TransitionEngine};

/// Section identifiers, in presentation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PageId {
    Landing,
    History,
    Invitation,
    GrandPlan,
    RoastPreview,
    VirtualDrive,
}

impl PageId {
    pub const ALL: [PageId; 6] = [
        PageId::Landing,
        PageId::History,
        PageId::Invitation,
        PageId::GrandPlan,
        PageId::RoastPreview,
        PageId::VirtualDrive,
    ];

    /// DOM id of the section element
    pub fn as_str(&self) -> &'static str {
        match self {
            PageId::Landing => "page1",
            PageId::History => "page2",
            PageId::Invitation => "page3",
            PageId::GrandPlan => "page4",
            PageId::RoastPreview => "page5",
            PageId::VirtualDrive => "page6",
        }
    }

    /// Display name used in analytics
    pub fn label(&self) -> &'static str {
        match self {
            PageId::Landing => "Landing",
            PageId::History => "History Lesson",
            PageId::Invitation => "Invitation",
            PageId::GrandPlan => "The Grand Plan",
            PageId::RoastPreview => "Roast Preview",
            PageId::VirtualDrive => "Virtual Drive",
        }
    }

    /// Setup routine that runs every time this page becomes active
    pub fn entry_setup(&self) -> Option<EntrySetup> {
        match self {
            PageId::Invitation => Some(EntrySetup::Invitation),
            PageId::RoastPreview => Some(EntrySetup::Carousel),
            PageId::VirtualDrive => Some(EntrySetup::Media),
            _ => None,
        }
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        PageId::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| Error::NotFound(s.to_string()))
    }
}

impl Member for PageId {
    fn id(&self) -> String {
        self.as_str().to_string()
    }

    fn label(&self) -> String {
        PageId::label(self).to_string()
    }
}

/// Per-page work triggered on entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntrySetup {
    /// Close the scroll, arm the scroll and runaway button listeners
    Invitation,
    /// Build the carousel dots
    Carousel,
    /// Wire the audio player and start the background video
    Media,
}

/// DOM side of the sections
pub trait SectionView {
    /// Toggle the `active` marker on a section
    fn set_section_active(&mut self, page: PageId, active: bool);

    /// Scroll a section back to its top
    fn reset_scroll(&mut self, page: PageId);

    /// Restart `.fade-in` animations inside a section
    fn replay_entry_animations(&mut self, page: PageId);

    /// Give the section's `.fade-in` elements increasing animation delays
    fn stagger_entry_animations(&mut self, page: PageId, step_secs: f64);
}

/// Adapts a [`SectionView`] to the engine's hooks
struct Sections<'a, V: ?Sized>(&'a mut V);

impl<V: SectionView + ?Sized> Stage<PageId> for Sections<'_, V> {
    fn set_status(&mut self, page: PageId, status: MemberStatus) {
        self.0
            .set_section_active(page, status == MemberStatus::Active);
    }

    fn entered(&mut self, page: PageId) {
        self.0.reset_scroll(page);
        self.0.replay_entry_animations(page);
    }
}

/// Owns the current section
#[derive(Debug, Clone)]
pub struct PageController {
    engine: TransitionEngine<PageId>,
}

impl Default for PageController {
    fn default() -> Self {
        Self::new()
    }
}

impl PageController {
    /// Start on the landing page
    pub fn new() -> Self {
        Self::starting_at(PageId::Landing)
    }

    pub fn starting_at(page: PageId) -> Self {
        let engine = TransitionEngine::new(PageId::ALL.to_vec(), page, SettleMode::Immediate)
            .map(|e| e.with_navigation_event(events::PAGE_NAVIGATED));
        match engine {
            Ok(engine) => Self { engine },
            // Every PageId is in ALL
            Err(_) => unreachable!("page missing from PageId::ALL"),
        }
    }

    pub fn current(&self) -> PageId {
        self.engine.current()
    }

    pub fn is_active(&self, page: PageId) -> bool {
        self.engine.status(page) == Some(MemberStatus::Active)
    }

    /// Switch sections. The caller runs [`PageId::entry_setup`] on a change.
    pub fn go_to_page<V: SectionView + ?Sized>(
        &mut self,
        page: PageId,
        view: &mut V,
        analytics: &Analytics,
    ) -> Result<Activation> {
        let activation = self
            .engine
            .activate(page, &mut Sections(view), analytics)?;
        if activation.is_changed() {
            log::info!("Showing {} ({})", page, page.label());
        }
        Ok(activation)
    }

    /// Switch sections by DOM id
    pub fn go_to_page_id<V: SectionView + ?Sized>(
        &mut self,
        id: &str,
        view: &mut V,
        analytics: &Analytics,
    ) -> Result<Activation> {
        let page = id.parse::<PageId>()?;
        self.go_to_page(page, view, analytics)
    }
}
