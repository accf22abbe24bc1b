//! Recording fakes for the view traits and the analytics sink

use std::cell::RefCell;

use crate::analytics::{AnalyticsSink, Properties};
use crate::carousel::CarouselView;
use crate::error::{Error, Result};
use crate::evasive::{Placement, Point, Size, TargetView};
use crate::media::{AudioPlayer, MediaView, PlayRequest};
use crate::page::{PageId, SectionView};
use crate::reveal::RevealView;
use crate::transition::{MemberStatus, SettleTicket, Stage};

#[derive(Default)]
pub struct RecordingSink {
    events: RefCell<Vec<(String, Properties)>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<(String, Properties)> {
        self.events.borrow().clone()
    }

    pub fn names(&self) -> Vec<String> {
        self.events.borrow().iter().map(|(n, _)| n.clone()).collect()
    }
}

impl AnalyticsSink for RecordingSink {
    fn track(&self, event: &str, properties: &Properties) -> Result<()> {
        self.events
            .borrow_mut()
            .push((event.to_string(), properties.clone()));
        Ok(())
    }
}

pub struct RecordingStage<M> {
    pub calls: Vec<(M, MemberStatus)>,
    pub entered: Vec<M>,
}

impl<M> Default for RecordingStage<M> {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            entered: Vec::new(),
        }
    }
}

impl<M> Stage<M> for RecordingStage<M> {
    fn set_status(&mut self, member: M, status: MemberStatus) {
        self.calls.push((member, status));
    }

    fn entered(&mut self, member: M) {
        self.entered.push(member);
    }
}

/// One fake standing in for the whole document
pub struct FakeViews {
    // Sections
    pub sections: Vec<(PageId, bool)>,
    pub scroll_resets: Vec<PageId>,
    pub animation_replays: Vec<PageId>,
    pub staggered: Vec<(PageId, f64)>,

    // Scroll reveal
    pub scroll_opened: bool,
    pub scroll_bindings: u32,

    // Runaway button
    pub viewport: Size,
    pub target_size: Size,
    pub target_position: Point,
    pub target_detaches: u32,
    pub target_bindings: u32,
    pub placements: Vec<Placement>,

    // Carousel
    pub slides: Vec<MemberStatus>,
    pub dots: Vec<bool>,
    pub dot_count: usize,
    pub dot_builds: u32,
    /// Make `build_dots` fail as if the container were missing
    pub fail_dots: bool,
    pub scheduled_settles: Vec<(SettleTicket, u32)>,

    // Audio + drive page
    pub player_bindings: u32,
    /// Make `bind_player_events` fail as if the audio element were missing
    pub fail_player_binding: bool,
    pub loaded: Vec<String>,
    pub play_requests: Vec<PlayRequest>,
    pub pauses: u32,
    pub rewinds: u32,
    pub active_track_button: Option<String>,
    pub song_title: String,
    pub playing_indicator: bool,
    pub video_autoplays: u32,
    pub video_preloads: u32,
}

impl Default for FakeViews {
    fn default() -> Self {
        Self {
            sections: PageId::ALL
                .iter()
                .map(|p| (*p, *p == PageId::Landing))
                .collect(),
            scroll_resets: Vec::new(),
            animation_replays: Vec::new(),
            staggered: Vec::new(),
            scroll_opened: false,
            scroll_bindings: 0,
            viewport: Size::new(1280.0, 800.0),
            target_size: Size::new(100.0, 40.0),
            target_position: Point::new(600.0, 500.0),
            target_detaches: 0,
            target_bindings: 0,
            placements: Vec::new(),
            slides: Vec::new(),
            dots: Vec::new(),
            dot_count: 0,
            dot_builds: 0,
            fail_dots: false,
            scheduled_settles: Vec::new(),
            player_bindings: 0,
            fail_player_binding: false,
            loaded: Vec::new(),
            play_requests: Vec::new(),
            pauses: 0,
            rewinds: 0,
            active_track_button: None,
            song_title: String::new(),
            playing_indicator: false,
            video_autoplays: 0,
            video_preloads: 0,
        }
    }
}

impl FakeViews {
    /// Document whose carousel markup has `count` slides, the first one active
    pub fn with_slides(count: usize) -> Self {
        let mut slides = vec![MemberStatus::Inactive; count];
        if let Some(first) = slides.first_mut() {
            *first = MemberStatus::Active;
        }
        Self {
            slides,
            ..Self::default()
        }
    }

    pub fn active_sections(&self) -> Vec<PageId> {
        self.sections
            .iter()
            .filter(|(_, active)| *active)
            .map(|(p, _)| *p)
            .collect()
    }

    pub fn slide_status(&self, index: usize) -> MemberStatus {
        self.slides[index]
    }

    pub fn active_slides(&self) -> Vec<usize> {
        self.slides
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == MemberStatus::Active)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn active_dots(&self) -> Vec<usize> {
        self.dots
            .iter()
            .enumerate()
            .filter(|(_, a)| **a)
            .map(|(i, _)| i)
            .collect()
    }
}

impl SectionView for FakeViews {
    fn set_section_active(&mut self, page: PageId, active: bool) {
        for (p, a) in self.sections.iter_mut() {
            if *p == page {
                *a = active;
            }
        }
    }

    fn reset_scroll(&mut self, page: PageId) {
        self.scroll_resets.push(page);
    }

    fn replay_entry_animations(&mut self, page: PageId) {
        self.animation_replays.push(page);
    }

    fn stagger_entry_animations(&mut self, page: PageId, step_secs: f64) {
        self.staggered.push((page, step_secs));
    }
}

impl RevealView for FakeViews {
    fn set_scroll_opened(&mut self, opened: bool) {
        self.scroll_opened = opened;
    }

    fn bind_scroll_handlers(&mut self) -> Result<()> {
        self.scroll_bindings += 1;
        Ok(())
    }
}

impl TargetView for FakeViews {
    fn viewport_size(&self) -> Size {
        self.viewport
    }

    fn target_size(&self) -> Size {
        self.target_size
    }

    fn target_position(&self) -> Point {
        self.target_position
    }

    fn detach_target(&mut self) -> Result<()> {
        self.target_detaches += 1;
        Ok(())
    }

    fn place_target(&mut self, placement: &Placement) {
        self.target_position = placement.position;
        self.placements.push(placement.clone());
    }

    fn bind_target_handlers(&mut self) -> Result<()> {
        self.target_bindings += 1;
        Ok(())
    }
}

impl CarouselView for FakeViews {
    fn slide_count(&self) -> usize {
        self.slides.len()
    }

    fn build_dots(&mut self, count: usize) -> Result<()> {
        if self.fail_dots {
            return Err(Error::MissingElement("#carouselDots".to_string()));
        }
        self.dots = vec![false; count];
        self.dot_count = count;
        self.dot_builds += 1;
        Ok(())
    }

    fn set_slide_status(&mut self, index: usize, status: MemberStatus) {
        self.slides[index] = status;
    }

    fn set_dot_active(&mut self, index: usize, active: bool) {
        if let Some(dot) = self.dots.get_mut(index) {
            *dot = active;
        }
    }

    fn schedule_settle(&mut self, ticket: SettleTicket, delay_ms: u32) {
        self.scheduled_settles.push((ticket, delay_ms));
    }
}

impl AudioPlayer for FakeViews {
    fn bind_player_events(&mut self) -> Result<()> {
        if self.fail_player_binding {
            return Err(Error::MissingElement("#audioPlayer".to_string()));
        }
        self.player_bindings += 1;
        Ok(())
    }

    fn load(&mut self, src: &str) {
        self.loaded.push(src.to_string());
    }

    fn play(&mut self, request: PlayRequest) {
        self.play_requests.push(request);
    }

    fn pause(&mut self) {
        self.pauses += 1;
    }

    fn rewind(&mut self) {
        self.rewinds += 1;
    }
}

impl MediaView for FakeViews {
    fn set_active_track_button(&mut self, key: &str) {
        self.active_track_button = Some(key.to_string());
    }

    fn set_song_title(&mut self, title: &str) {
        self.song_title = title.to_string();
    }

    fn set_playing_indicator(&mut self, playing: bool) {
        self.playing_indicator = playing;
    }

    fn autoplay_video(&mut self) {
        self.video_autoplays += 1;
    }

    fn preload_video(&mut self) {
        self.video_preloads += 1;
    }
}
