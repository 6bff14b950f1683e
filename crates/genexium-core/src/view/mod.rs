//! Which page section is showing.
//!
//! A single enum replaces four independently toggled sections, so "exactly
//! one section visible" holds by construction.

use std::fmt;

/// The four mutually exclusive sections of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Empty,
    Loading,
    Error,
    Results,
}

impl Section {
    pub const ALL: [Section; 4] = [Section::Empty, Section::Loading, Section::Error, Section::Results];
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Section::Empty => "empty",
            Section::Loading => "loading",
            Section::Error => "error",
            Section::Results => "results",
        };
        f.write_str(s)
    }
}

/// Current view, with whatever data the visible section needs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Empty,
    Loading,
    Error {
        message: String,
    },
    Results,
}

impl ViewState {
    pub fn error(message: impl Into<String>) -> Self {
        ViewState::Error {
            message: message.into(),
        }
    }

    pub fn section(&self) -> Section {
        match self {
            ViewState::Empty => Section::Empty,
            ViewState::Loading => Section::Loading,
            ViewState::Error { .. } => Section::Error,
            ViewState::Results => Section::Results,
        }
    }

    pub fn is_visible(&self, section: Section) -> bool {
        self.section() == section
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            ViewState::Error { message } => Some(message),
            _ => None,
        }
    }
}
