//! Virtual drive: background video and the looping music player
//!
//! Playback is asynchronous on the web: the controller issues a [`PlayRequest`],
//! the player reports back through [`MediaController::playback_started`] or
//! [`MediaController::playback_refused`]. Only the latest request counts.
//!
//! Play/pause icons and the spinning record follow the audio element's own
//! `play` / `pause` signals (see [`MediaController::on_player_play`]) so they stay
//! right when the listener uses the native controls.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::Lifecycle;
use crate::analytics::{Analytics, events};
use crate::consts::CLICK_PLAY_HINT;
use crate::error::{Error, Result};

/// Catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub key: String,
    pub name: String,
    pub src: String,
}

impl Track {
    pub fn new(key: &str, name: &str, src: &str) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            src: src.to_string(),
        }
    }
}

/// Built-in playlist
pub fn default_tracks() -> Vec<Track> {
    vec![
        Track::new("lofi", "Lofi Chill Beats", "assets/audio/song1.mp3"),
        Track::new("bollywood", "Bollywood Romantic", "assets/audio/song2.mp3"),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Why playback was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOrigin {
    /// A track was just picked
    Select,
    /// Play button on an already loaded track
    Resume,
    /// Restart after the track ended
    Loop,
}

/// Handle for one asynchronous play attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayRequest {
    token: u64,
    origin: PlayOrigin,
}

impl PlayRequest {
    pub fn token(&self) -> u64 {
        self.token
    }

    pub fn origin(&self) -> PlayOrigin {
        self.origin
    }
}

/// The `<audio>` element
pub trait AudioPlayer {
    /// Attach `ended`, `play` and `pause` listeners
    fn bind_player_events(&mut self) -> Result<()>;

    fn load(&mut self, src: &str);

    /// Start playback; the outcome is reported back with `request`
    fn play(&mut self, request: PlayRequest);

    fn pause(&mut self);

    /// Seek to the start
    fn rewind(&mut self);
}

/// Everything on the drive page that is not the audio element
pub trait MediaView {
    /// Mark one `.track-btn` active and clear the rest
    fn set_active_track_button(&mut self, key: &str);

    fn set_song_title(&mut self, title: &str);

    /// Play/pause icon and the spinning record
    fn set_playing_indicator(&mut self, playing: bool);

    /// Try to start the background video; a refusal is only logged
    fn autoplay_video(&mut self);

    fn preload_video(&mut self);
}

/// Music player state
#[derive(Debug, Clone)]
pub struct MediaController {
    tracks: Vec<Track>,
    default_track: String,
    lifecycle: Lifecycle,
    state: PlaybackState,
    current: Option<usize>,
    next_token: u64,
    latest: Option<PlayRequest>,
}

impl MediaController {
    pub fn new(tracks: Vec<Track>, default_track: &str) -> Self {
        Self {
            tracks,
            default_track: default_track.to_string(),
            lifecycle: Lifecycle::Uninitialized,
            state: PlaybackState::Stopped,
            current: None,
            next_token: 0,
            latest: None,
        }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn is_ready(&self) -> bool {
        self.lifecycle.is_ready()
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current.map(|i| &self.tracks[i])
    }

    pub fn track(&self, key: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.key == key)
    }

    /// Drive page shown: kick the video, then wire the player once.
    ///
    /// The video does not depend on the audio element, so a failed binding is
    /// returned only after the video was started.
    pub fn enter<V: AudioPlayer + MediaView + ?Sized>(&mut self, view: &mut V) -> Result<()> {
        view.autoplay_video();
        if !self.lifecycle.is_ready() {
            view.bind_player_events()?;
            self.lifecycle = Lifecycle::Ready;
            log::info!("Audio player ready");
        }
        Ok(())
    }

    /// Load and start a track
    pub fn select_track<V: AudioPlayer + MediaView + ?Sized>(
        &mut self,
        key: &str,
        view: &mut V,
        analytics: &Analytics,
    ) -> Result<PlayRequest> {
        let index = self
            .tracks
            .iter()
            .position(|t| t.key == key)
            .ok_or_else(|| Error::UnknownTrack(key.to_string()))?;
        if !self.lifecycle.is_ready() {
            return Err(Error::PlayerNotReady);
        }

        let track = &self.tracks[index];
        analytics.report(
            events::TRACK_SELECTED,
            json!({ "track": track.key, "track_name": track.name }),
        );

        view.set_active_track_button(&track.key);
        view.set_song_title(&track.name);
        view.load(&track.src);

        self.current = Some(index);
        self.state = PlaybackState::Stopped;
        let request = self.request(PlayOrigin::Select);
        view.play(request);
        Ok(request)
    }

    /// Play button / space bar
    pub fn toggle_play<V: AudioPlayer + MediaView + ?Sized>(
        &mut self,
        view: &mut V,
        analytics: &Analytics,
    ) -> Result<Option<PlayRequest>> {
        if !self.lifecycle.is_ready() {
            return Err(Error::PlayerNotReady);
        }

        let Some(index) = self.current else {
            let default = self.default_track.clone();
            return self
                .select_track(&default, view, analytics)
                .map(Some);
        };
        let key = self.tracks[index].key.clone();

        if self.is_playing() {
            analytics.report(events::MUSIC_PAUSED, json!({ "track": key }));
            view.pause();
            self.state = PlaybackState::Paused;
            Ok(None)
        } else {
            analytics.report(events::MUSIC_PLAYED, json!({ "track": key }));
            let request = self.request(PlayOrigin::Resume);
            view.play(request);
            Ok(Some(request))
        }
    }

    /// Player accepted `request`. Returns false for a superseded request.
    pub fn playback_started(&mut self, request: PlayRequest) -> bool {
        if !self.is_latest(request) {
            return false;
        }
        self.state = PlaybackState::Playing;
        true
    }

    /// Player refused `request`, usually an autoplay policy
    pub fn playback_refused<V: MediaView + ?Sized>(
        &mut self,
        request: PlayRequest,
        reason: &str,
        view: &mut V,
    ) -> bool {
        log::info!("Audio play prevented: {}", reason);
        if !self.is_latest(request) {
            return false;
        }

        if request.origin == PlayOrigin::Select {
            if let Some(track) = self.current_track() {
                let title = format!("{}{}", track.name, CLICK_PLAY_HINT);
                view.set_song_title(&title);
            }
            self.state = PlaybackState::Stopped;
        }
        true
    }

    /// Track reached its end: start it over
    pub fn on_ended<P: AudioPlayer + ?Sized>(&mut self, player: &mut P) -> PlayRequest {
        player.rewind();
        let request = self.request(PlayOrigin::Loop);
        player.play(request);
        request
    }

    /// The audio element started playing, whoever asked for it
    pub fn on_player_play<V: MediaView + ?Sized>(&mut self, view: &mut V) {
        self.state = PlaybackState::Playing;
        view.set_playing_indicator(true);
    }

    /// The audio element paused, whoever asked for it
    pub fn on_player_pause<V: MediaView + ?Sized>(&mut self, view: &mut V) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        }
        view.set_playing_indicator(false);
    }

    fn request(&mut self, origin: PlayOrigin) -> PlayRequest {
        self.next_token += 1;
        let request = PlayRequest {
            token: self.next_token,
            origin,
        };
        self.latest = Some(request);
        request
    }

    fn is_latest(&self, request: PlayRequest) -> bool {
        self.latest == Some(request)
    }
}
