//! Error types for the invitation

use thiserror::Error;

/// Main error type for navigation, playback and DOM wiring
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Requested member is not part of the managed collection
    #[error("Not found: {0}")]
    NotFound(String),

    /// Component used before its first activation set it up
    #[error("Not ready: {0}")]
    NotReady(&'static str),

    /// Carousel markup contains no slides
    #[error("Carousel has no slides")]
    EmptyCarousel,

    /// Track key missing from the catalog
    #[error("Unknown track: {0}")]
    UnknownTrack(String),

    /// Audio element has not been wired up yet
    #[error("Audio player not ready")]
    PlayerNotReady,

    /// Required markup element is absent
    #[error("Missing element: {0}")]
    MissingElement(String),

    /// A DOM call threw
    #[error("DOM error: {0}")]
    Dom(String),

    /// Analytics backend rejected an event
    #[error("Analytics error: {0}")]
    Analytics(String),

    /// Configuration could not be parsed
    #[error("Config error: {0}")]
    Config(String),
}

/// Result type alias for invitation operations
pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dom_failures_are_not_missing_elements() {
        let err = Error::Dom("creating dot: HierarchyRequestError".to_string());
        assert_eq!(err.to_string(), "DOM error: creating dot: HierarchyRequestError");
        assert_ne!(err, Error::MissingElement("creating dot: HierarchyRequestError".to_string()));
    }

    #[test]
    fn test_json_errors_become_config_errors() {
        let err: Error = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, Error::Config(_)));
    }
}
