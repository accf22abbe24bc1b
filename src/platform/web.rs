//! Browser bindings
//!
//! [`DomViews`] implements every view trait on top of `web-sys`. Listeners, timers
//! and play promises reach the presentation through a thread-local handle and
//! only ever run after the call that scheduled them has returned.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{Document, Element, Event, HtmlElement, HtmlMediaElement, KeyboardEvent, TouchEvent, Window};

use crate::analytics::{Analytics, AnalyticsSink, Properties};
use crate::app::Presentation;
use crate::carousel::CarouselView;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::evasive::{Placement, Point, Size, TargetView};
use crate::input::Key;
use crate::media::{AudioPlayer, MediaView, PlayRequest};
use crate::page::{PageId, SectionView};
use crate::reveal::RevealView;
use crate::transition::{MemberStatus, SettleTicket};

const SCROLL_CONTAINER: &str = "#page3 .scroll-container";
const SCROLL_ROLLED_ID: &str = "scrollRolled";
const NO_BUTTON_ID: &str = "noBtn";
const SLIDES: &str = "#page5 .slide";
const DOTS_ID: &str = "carouselDots";
const AUDIO_ID: &str = "audioPlayer";
const VIDEO_ID: &str = "driveVideo";
const SONG_TITLE_ID: &str = "songTitle";
const CALENDAR_LINK: &str = ".action-buttons a.btn.secondary";

type App = Presentation<DomViews>;

thread_local! {
    static APP: RefCell<Option<Rc<RefCell<App>>>> = const { RefCell::new(None) };
}

/// Run `f` on the presentation. Events arriving while it is borrowed are dropped.
fn with_app<T>(f: impl FnOnce(&mut App) -> T) -> Option<T> {
    let shared = APP.with(|slot| slot.borrow().clone())?;
    let Ok(mut app) = shared.try_borrow_mut() else {
        log::warn!("Presentation busy, dropping event");
        return None;
    };
    Some(f(&mut app))
}

fn log_failure<T>(what: &str, result: Result<T>) {
    if let Err(e) = result {
        log::warn!("{} failed: {}", what, e);
    }
}

/// Human readable reason from a rejected promise or thrown value
fn describe(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.name());
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

fn listen(target: &web_sys::EventTarget, event: &str, handler: impl FnMut(Event) + 'static) {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    let _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
    closure.forget();
}

fn set_class(element: &Element, class: &str, on: bool) {
    let classes = element.class_list();
    let _ = if on {
        classes.add_1(class)
    } else {
        classes.remove_1(class)
    };
}

fn elements(list: Option<web_sys::NodeList>) -> Vec<Element> {
    let Some(list) = list else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// DOM-backed views. Elements are looked up on every call.
pub struct DomViews {
    window: Window,
    document: Document,
}

impl DomViews {
    pub fn new() -> Result<Self> {
        let window = web_sys::window().ok_or_else(|| Error::MissingElement("window".to_string()))?;
        let document = window
            .document()
            .ok_or_else(|| Error::MissingElement("document".to_string()))?;
        Ok(Self { window, document })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    fn by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn require(&self, id: &str) -> Result<Element> {
        self.by_id(id)
            .ok_or_else(|| Error::MissingElement(format!("#{}", id)))
    }

    fn html(&self, id: &str) -> Option<HtmlElement> {
        self.by_id(id)?.dyn_into().ok()
    }

    fn query(&self, selector: &str) -> Option<Element> {
        self.document.query_selector(selector).ok().flatten()
    }

    fn query_all(&self, selector: &str) -> Vec<Element> {
        elements(self.document.query_selector_all(selector).ok())
    }

    fn fade_ins(&self, page: PageId) -> Vec<HtmlElement> {
        let Some(section) = self.by_id(page.as_str()) else {
            return Vec::new();
        };
        elements(section.query_selector_all(".fade-in").ok())
            .into_iter()
            .filter_map(|el| el.dyn_into::<HtmlElement>().ok())
            .collect()
    }

    fn media(&self, id: &str) -> Option<HtmlMediaElement> {
        self.by_id(id)?.dyn_into().ok()
    }

    fn dots(&self) -> Vec<Element> {
        self.by_id(DOTS_ID)
            .map(|container| elements(container.query_selector_all(".dot").ok()))
            .unwrap_or_default()
    }

    fn viewport_axis(value: std::result::Result<JsValue, JsValue>) -> f64 {
        value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
    }
}

impl SectionView for DomViews {
    fn set_section_active(&mut self, page: PageId, active: bool) {
        match self.by_id(page.as_str()) {
            Some(section) => set_class(&section, "active", active),
            None => log::warn!("Section #{} missing", page),
        }
    }

    fn reset_scroll(&mut self, page: PageId) {
        if let Some(section) = self.by_id(page.as_str()) {
            section.set_scroll_top(0);
        }
    }

    fn replay_entry_animations(&mut self, page: PageId) {
        for el in self.fade_ins(page) {
            let style = el.style();
            let _ = style.set_property("animation", "none");
            // Reading layout forces a reflow so the animation restarts
            let _ = el.offset_height();
            let _ = style.remove_property("animation");
        }
    }

    fn stagger_entry_animations(&mut self, page: PageId, step_secs: f64) {
        for (i, el) in self.fade_ins(page).iter().enumerate() {
            let delay = format!("{}s", i as f64 * step_secs);
            let _ = el.style().set_property("animation-delay", &delay);
        }
    }
}

impl RevealView for DomViews {
    fn set_scroll_opened(&mut self, opened: bool) {
        if let Some(container) = self.query(SCROLL_CONTAINER) {
            set_class(&container, "scroll-opened", opened);
        }
    }

    fn bind_scroll_handlers(&mut self) -> Result<()> {
        let rolled = self.require(SCROLL_ROLLED_ID)?;
        listen(&rolled, "click", |_| {
            with_app(|app| app.open_scroll());
        });
        listen(&rolled, "touchend", |event| {
            event.prevent_default();
            with_app(|app| app.open_scroll());
        });
        Ok(())
    }
}

impl TargetView for DomViews {
    fn viewport_size(&self) -> Size {
        Size::new(
            Self::viewport_axis(self.window.inner_width()),
            Self::viewport_axis(self.window.inner_height()),
        )
    }

    fn target_size(&self) -> Size {
        self.html(NO_BUTTON_ID)
            .map(|btn| Size::new(btn.offset_width() as f64, btn.offset_height() as f64))
            .unwrap_or_default()
    }

    fn target_position(&self) -> Point {
        self.by_id(NO_BUTTON_ID)
            .map(|btn| {
                let rect = btn.get_bounding_client_rect();
                Point::new(rect.left(), rect.top())
            })
            .unwrap_or_default()
    }

    fn detach_target(&mut self) -> Result<()> {
        let button = self.require(NO_BUTTON_ID)?;
        let page = self.require(PageId::Invitation.as_str())?;
        // Out of the scroll paper so overflow and transforms cannot clip it
        if button.parent_element().as_ref() != Some(&page) {
            page.append_child(&button)
                .map_err(|e| Error::Dom(format!("moving #{}: {}", NO_BUTTON_ID, describe(&e))))?;
        }
        Ok(())
    }

    fn place_target(&mut self, placement: &Placement) {
        let Some(button) = self.html(NO_BUTTON_ID) else {
            return;
        };
        let style = button.style();
        let _ = style.set_property("position", "fixed");
        let _ = style.set_property("left", &format!("{}px", placement.position.x));
        let _ = style.set_property("top", &format!("{}px", placement.position.y));
        let _ = style.set_property("transform", &format!("rotate({}deg)", placement.rotation_deg));
        let _ = style.set_property("margin", "0");
        button.set_text_content(Some(&placement.label));
    }

    fn bind_target_handlers(&mut self) -> Result<()> {
        let button = self.require(NO_BUTTON_ID)?;
        for event in ["mouseenter", "touchstart", "focus"] {
            listen(&button, event, |event| {
                event.prevent_default();
                with_app(|app| app.no_button_approached());
            });
        }
        Ok(())
    }
}

impl CarouselView for DomViews {
    fn slide_count(&self) -> usize {
        self.query_all(SLIDES).len()
    }

    fn build_dots(&mut self, count: usize) -> Result<()> {
        let container = self.require(DOTS_ID)?;
        container.set_inner_html("");

        for index in 0..count {
            let dot = self
                .document
                .create_element("span")
                .map_err(|e| Error::Dom(format!("creating dot: {}", describe(&e))))?;
            set_class(&dot, "dot", true);
            listen(&dot, "click", move |_| {
                with_app(|app| log_failure("Dot", app.dot_clicked(index)));
            });
            container
                .append_child(&dot)
                .map_err(|e| Error::Dom(format!("appending to #{}: {}", DOTS_ID, describe(&e))))?;
        }
        Ok(())
    }

    fn set_slide_status(&mut self, index: usize, status: MemberStatus) {
        if let Some(slide) = self.query_all(SLIDES).get(index) {
            set_class(slide, "active", status == MemberStatus::Active);
            set_class(slide, "prev", status == MemberStatus::Previous);
        }
    }

    fn set_dot_active(&mut self, index: usize, active: bool) {
        if let Some(dot) = self.dots().get(index) {
            set_class(dot, "active", active);
        }
    }

    fn schedule_settle(&mut self, ticket: SettleTicket, delay_ms: u32) {
        let closure = Closure::once(move || {
            with_app(|app| app.settle_slide(ticket));
        });
        let _ = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                i32::try_from(delay_ms).unwrap_or(i32::MAX),
            );
        closure.forget();
    }
}

impl AudioPlayer for DomViews {
    fn bind_player_events(&mut self) -> Result<()> {
        let audio = self
            .media(AUDIO_ID)
            .ok_or_else(|| Error::MissingElement(format!("#{}", AUDIO_ID)))?;
        listen(&audio, "ended", |_| {
            with_app(|app| app.audio_ended());
        });
        listen(&audio, "play", |_| {
            with_app(|app| app.audio_playing());
        });
        listen(&audio, "pause", |_| {
            with_app(|app| app.audio_paused());
        });
        Ok(())
    }

    fn load(&mut self, src: &str) {
        if let Some(audio) = self.media(AUDIO_ID) {
            audio.set_src(src);
        }
    }

    fn play(&mut self, request: PlayRequest) {
        let Some(audio) = self.media(AUDIO_ID) else {
            return;
        };
        let started = audio.play();
        spawn_local(async move {
            let outcome = match started {
                Ok(promise) => JsFuture::from(promise).await.map(|_| ()),
                Err(e) => Err(e),
            };
            match outcome {
                Ok(()) => {
                    with_app(|app| app.playback_started(request));
                }
                Err(e) => {
                    let reason = describe(&e);
                    with_app(|app| app.playback_refused(request, &reason));
                }
            }
        });
    }

    fn pause(&mut self) {
        if let Some(audio) = self.media(AUDIO_ID) {
            let _ = audio.pause();
        }
    }

    fn rewind(&mut self) {
        if let Some(audio) = self.media(AUDIO_ID) {
            audio.set_current_time(0.0);
        }
    }
}

impl MediaView for DomViews {
    fn set_active_track_button(&mut self, key: &str) {
        for button in self.query_all(".track-btn") {
            set_class(&button, "active", false);
        }
        if let Some(button) = self.by_id(&format!("{}Btn", key)) {
            set_class(&button, "active", true);
        }
    }

    fn set_song_title(&mut self, title: &str) {
        if let Some(el) = self.by_id(SONG_TITLE_ID) {
            el.set_text_content(Some(title));
        }
    }

    fn set_playing_indicator(&mut self, playing: bool) {
        let icons = [(".play-icon", !playing), (".pause-icon", playing)];
        for (selector, shown) in icons {
            if let Some(icon) = self
                .query(selector)
                .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            {
                let display = if shown { "block" } else { "none" };
                let _ = icon.style().set_property("display", display);
            }
        }
        if let Some(vinyl) = self.query(".vinyl") {
            set_class(&vinyl, "playing", playing);
        }
    }

    fn autoplay_video(&mut self) {
        let Some(video) = self.media(VIDEO_ID) else {
            return;
        };
        let started = video.play();
        spawn_local(async move {
            let outcome = match started {
                Ok(promise) => JsFuture::from(promise).await.map(|_| ()),
                Err(e) => Err(e),
            };
            if let Err(e) = outcome {
                log::info!("Video autoplay prevented: {}", describe(&e));
            }
        });
    }

    fn preload_video(&mut self) {
        if let Some(video) = self.media(VIDEO_ID) {
            video.set_preload("auto");
        }
    }
}

/// Forwards events to `window.mixpanel.track` when the snippet is loaded
pub struct MixpanelSink {
    window: Window,
}

impl MixpanelSink {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl AnalyticsSink for MixpanelSink {
    fn track(&self, event: &str, properties: &Properties) -> Result<()> {
        let thrown = |e: JsValue| Error::Analytics(describe(&e));

        let mixpanel = js_sys::Reflect::get(&self.window, &JsValue::from_str("mixpanel"))
            .map_err(thrown)?;
        if mixpanel.is_undefined() || mixpanel.is_null() {
            log::debug!("mixpanel not loaded, dropping '{}'", event);
            return Ok(());
        }

        let track: js_sys::Function = js_sys::Reflect::get(&mixpanel, &JsValue::from_str("track"))
            .map_err(thrown)?
            .dyn_into()
            .map_err(|_| Error::Analytics("mixpanel.track is not a function".to_string()))?;

        let json = serde_json::to_string(properties)
            .map_err(|e| Error::Analytics(e.to_string()))?;
        let properties = js_sys::JSON::parse(&json).map_err(thrown)?;
        track
            .call2(&mixpanel, &JsValue::from_str(event), &properties)
            .map_err(thrown)?;
        Ok(())
    }
}

/// Install a global function so inline `onclick` handlers in the markup work
fn expose(window: &Window, name: &str, function: &JsValue) {
    if js_sys::Reflect::set(window, &JsValue::from_str(name), function).is_err() {
        log::warn!("Could not expose {}()", name);
    }
}

fn expose_globals(window: &Window) {
    let next_page = Closure::<dyn FnMut(String)>::new(|page: String| {
        with_app(|app| log_failure("Navigation", app.go_to_page_id(&page)));
    });
    expose(window, "nextPage", next_page.as_ref());
    next_page.forget();

    let next_slide = Closure::<dyn FnMut()>::new(|| {
        with_app(|app| log_failure("Next slide", app.next_slide()));
    });
    expose(window, "nextSlide", next_slide.as_ref());
    next_slide.forget();

    let prev_slide = Closure::<dyn FnMut()>::new(|| {
        with_app(|app| log_failure("Previous slide", app.previous_slide()));
    });
    expose(window, "prevSlide", prev_slide.as_ref());
    prev_slide.forget();

    let go_to_slide = Closure::<dyn FnMut(u32)>::new(|index: u32| {
        with_app(|app| log_failure("Go to slide", app.dot_clicked(index as usize)));
    });
    expose(window, "goToSlide", go_to_slide.as_ref());
    go_to_slide.forget();

    let select_track = Closure::<dyn FnMut(String)>::new(|key: String| {
        with_app(|app| log_failure("Select track", app.select_track(&key)));
    });
    expose(window, "selectTrack", select_track.as_ref());
    select_track.forget();

    let toggle_play = Closure::<dyn FnMut()>::new(|| {
        with_app(|app| log_failure("Toggle play", app.toggle_play()));
    });
    expose(window, "togglePlay", toggle_play.as_ref());
    toggle_play.forget();
}

/// Enter / Space on a focused `.btn` clicks it
fn click_focused_button(document: &Document) {
    let Some(focused) = document.active_element() else {
        return;
    };
    if focused.class_list().contains("btn") {
        if let Ok(button) = focused.dyn_into::<HtmlElement>() {
            button.click();
        }
    }
}

fn first_touch_x(event: &Event) -> Option<f64> {
    let touch = event.dyn_ref::<TouchEvent>()?.changed_touches().item(0)?;
    Some(touch.screen_x() as f64)
}

fn bind_document(document: &Document) {
    let doc = document.clone();
    listen(document, "keydown", move |event| {
        let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        let key = Key::from_dom(&event.key());
        let Some(response) = with_app(|app| app.handle_key(key)) else {
            return;
        };
        if response.prevent_default {
            event.prevent_default();
        }
        // Clicking re-enters the presentation, so only after the borrow ended
        if response.click_focused {
            click_focused_button(&doc);
        }
    });

    listen(document, "touchstart", |event| {
        if let Some(x) = first_touch_x(&event) {
            with_app(|app| app.touch_start(x));
        }
    });
    listen(document, "touchend", |event| {
        if let Some(x) = first_touch_x(&event) {
            with_app(|app| app.touch_end(x));
        }
    });
}

fn bind_calendar_link(document: &Document, href: &str) {
    let Some(link) = document.query_selector(CALENDAR_LINK).ok().flatten() else {
        log::debug!("No calendar link in markup");
        return;
    };
    let _ = link.set_attribute("href", href);
    listen(&link, "click", |_| {
        with_app(|app| app.calendar_clicked());
    });
}

/// Start the invitation
pub fn run() -> Result<()> {
    console_error_panic_hook::set_once();
    // Log everything until the config says otherwise
    if let Err(e) = console_log::init_with_level(log::Level::Trace) {
        web_sys::console::error_1(&JsValue::from_str(&format!("Failed to init logger: {}", e)));
    }

    let config = Config::load();
    log::set_max_level(config.log_level().to_level_filter());
    log::info!("Mahotsava starting...");

    let views = DomViews::new()?;
    let window = views.window().clone();
    let document = views.document.clone();
    let analytics = Analytics::new(Rc::new(MixpanelSink::new(window.clone())));

    let seed = js_sys::Date::now() as u64;
    let app = Rc::new(RefCell::new(Presentation::new(&config, views, analytics, seed)));
    let calendar_href = app.borrow().calendar_link();
    APP.with(|slot| *slot.borrow_mut() = Some(app.clone()));

    expose_globals(&window);
    bind_document(&document);
    bind_calendar_link(&document, &calendar_href);

    app.borrow_mut().start();
    log::info!("Mahotsava ready (seed {})", seed);
    Ok(())
}
