//! Fire-and-forget analytics
//!
//! Events go to an optional sink. A missing sink is a silent no-op and a failing
//! sink is logged, so reporting can never interrupt navigation.

use std::rc::Rc;

use serde_json::Value;

use crate::error::Result;

/// Event properties as sent to the sink
pub type Properties = serde_json::Map<String, Value>;

/// Event names
pub mod events {
    pub const PAGE_LOADED: &str = "Page Loaded";
    pub const PAGE_NAVIGATED: &str = "Page Navigated";
    pub const SCROLL_OPENED: &str = "Invitation Scroll Opened";
    pub const NO_BUTTON_ATTEMPTED: &str = "No Button Attempted";
    pub const CAROUSEL_NEXT: &str = "Carousel Next Slide";
    pub const CAROUSEL_PREV: &str = "Carousel Prev Slide";
    pub const CAROUSEL_DOT: &str = "Carousel Dot Clicked";
    pub const TRACK_SELECTED: &str = "Track Selected";
    pub const MUSIC_PLAYED: &str = "Music Played";
    pub const MUSIC_PAUSED: &str = "Music Paused";
    pub const CALENDAR_CLICKED: &str = "Add to Calendar Clicked";
}

/// External reporting backend
pub trait AnalyticsSink {
    /// Deliver one event. Errors are logged by [`Analytics`] and never propagated.
    fn track(&self, event: &str, properties: &Properties) -> Result<()>;
}

/// Handle shared by every controller
#[derive(Clone, Default)]
pub struct Analytics {
    sink: Option<Rc<dyn AnalyticsSink>>,
}

impl Analytics {
    pub fn new(sink: Rc<dyn AnalyticsSink>) -> Self {
        Self { sink: Some(sink) }
    }

    /// Reporter with no backend; every event is dropped
    pub fn disabled() -> Self {
        Self { sink: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Report an event. `properties` should be a JSON object or `Value::Null`.
    pub fn report(&self, event: &str, properties: Value) {
        let Some(sink) = &self.sink else {
            log::debug!("Analytics disabled, dropping '{}'", event);
            return;
        };

        let properties = match properties {
            Value::Object(map) => map,
            Value::Null => Properties::new(),
            other => {
                let mut map = Properties::new();
                map.insert("value".to_string(), other);
                map
            }
        };

        if let Err(e) = sink.track(event, &properties) {
            log::warn!("Analytics track error for '{}': {}", event, e);
        }
    }

    /// Report an event without properties
    pub fn report_bare(&self, event: &str) {
        self.report(event, Value::Null);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::testing::RecordingSink;
    use serde_json::json;

    struct FailingSink;

    impl AnalyticsSink for FailingSink {
        fn track(&self, _event: &str, _properties: &Properties) -> Result<()> {
            Err(Error::Analytics("backend exploded".to_string()))
        }
    }

    #[test]
    fn test_disabled_reporter_is_silent() {
        let analytics = Analytics::disabled();
        assert!(!analytics.is_enabled());
        analytics.report(events::PAGE_LOADED, json!({"page": "Landing"}));
    }

    #[test]
    fn test_failing_sink_does_not_propagate() {
        let err = FailingSink.track(events::SCROLL_OPENED, &Properties::new()).unwrap_err();
        assert_eq!(err.to_string(), "Analytics error: backend exploded");

        let analytics = Analytics::new(Rc::new(FailingSink));
        analytics.report_bare(events::SCROLL_OPENED);
    }

    #[test]
    fn test_properties_are_forwarded() {
        let sink = Rc::new(RecordingSink::default());
        let analytics = Analytics::new(sink.clone());

        analytics.report(events::CAROUSEL_DOT, json!({"slide_index": 2}));
        analytics.report_bare(events::CALENDAR_CLICKED);

        let recorded = sink.events();
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded[0].0, events::CAROUSEL_DOT);
        assert_eq!(recorded[0].1["slide_index"], json!(2));
        assert_eq!(recorded[1].0, events::CALENDAR_CLICKED);
        assert!(recorded[1].1.is_empty());
    }

    #[test]
    fn test_scalar_properties_are_wrapped() {
        let sink = Rc::new(RecordingSink::default());
        let analytics = Analytics::new(sink.clone());
        analytics.report(events::PAGE_LOADED, json!("Landing"));
        assert_eq!(sink.events()[0].1["value"], json!("Landing"));
    }
}
