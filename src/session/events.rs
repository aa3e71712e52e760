//! Events a session emits to its owner

use crate::geolocation::GeolocationError;
use crate::location::{LocationData, SuggestionRecord};
use serde::Serialize;

/// Everything the parent form hears from a session
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The committed location changed
    Changed(LocationData),
    /// Fresh suggestions for the latest query; the dropdown is open
    Suggestions(Vec<SuggestionRecord>),
    /// The dropdown closed
    DropdownHidden,
    /// Something to tell the user
    Notice(Notice),
}

/// Non-blocking notifications
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// A search or selection produced a location
    Resolved { address: String },
    /// No provider matched the query
    NotFound { query: String },
    /// "Use current location" failed
    Geolocation(GeolocationError),
    /// The map could not be shown; text entry still works
    MapUnavailable,
}

/// Notice severity, for styling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Error,
}

impl Notice {
    pub fn level(&self) -> NoticeLevel {
        match self {
            Self::Resolved { .. } => NoticeLevel::Success,
            _ => NoticeLevel::Error,
        }
    }

    /// Text shown to the user
    pub fn message(&self) -> String {
        match self {
            Self::Resolved { address } => format!("Location found: {}", address),
            Self::NotFound { query } => format!(
                "Location not found for \"{}\". Try a different search or enter the address manually.",
                query
            ),
            Self::Geolocation(e) => e.user_message().to_string(),
            Self::MapUnavailable => {
                "The map could not be loaded. You can still type the address.".to_string()
            }
        }
    }
}

/// Keys the search box reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
    ArrowDown,
    ArrowUp,
}
