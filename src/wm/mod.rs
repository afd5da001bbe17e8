//! Window-manager snapshots
//!
//! One [`WindowManagerEntry`] is the window stack at a point in time,
//! top-most window first. The visibility queries here are the building
//! blocks for the predicates in [`predicates`].

pub mod predicates;
pub mod subject;

use serde::{Deserialize, Serialize};

use crate::phase::Verdict;
use crate::trace::Snapshot;

pub use predicates::WindowAssertion;

/// Layer a window belongs to relative to application windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowKind {
    /// System window drawn above apps (status bar, dialogs)
    AboveApp,
    /// System window drawn below apps (wallpaper)
    BelowApp,
    /// Input method window
    Ime,
    /// Application window
    App,
}

impl WindowKind {
    const fn label(self) -> &'static str {
        match self {
            Self::AboveApp => "above-app window",
            Self::BelowApp => "below-app window",
            Self::Ime => "IME window",
            Self::App => "app window",
        }
    }
}

/// One window in the stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowState {
    /// Full window title
    pub title: String,
    /// Layer the window lives in
    pub kind: WindowKind,
    /// Whether the window is currently visible
    #[serde(default)]
    pub visible: bool,
}

impl WindowState {
    /// Convenience constructor.
    #[must_use]
    pub fn new(title: impl Into<String>, kind: WindowKind, visible: bool) -> Self {
        Self {
            title: title.into(),
            kind,
            visible,
        }
    }
}

/// Window stack at one timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowManagerEntry {
    /// Timestamp in nanoseconds
    pub timestamp: i64,
    /// Windows in z-order, top-most first
    #[serde(default)]
    pub windows: Vec<WindowState>,
}

impl Snapshot for WindowManagerEntry {
    fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

impl WindowManagerEntry {
    /// Creates an entry.
    #[must_use]
    pub const fn new(timestamp: i64, windows: Vec<WindowState>) -> Self {
        Self { timestamp, windows }
    }

    /// Checks that a window of `kind` whose title contains `partial_title`
    /// exists and is visible.
    #[must_use]
    pub fn is_window_visible(&self, kind: WindowKind, partial_title: &str) -> Verdict {
        let found = self
            .windows
            .iter()
            .find(|w| w.kind == kind && w.title.contains(partial_title));

        match found {
            None => Verdict::fail(format!("{} {partial_title} cannot be found", kind.label())),
            Some(w) if w.visible => Verdict::pass(format!("{} is visible", w.title)),
            Some(w) => Verdict::fail(format!("{} is invisible", w.title)),
        }
    }

    /// Visibility of a system window above the app layer.
    #[must_use]
    pub fn is_above_app_window_visible(&self, partial_title: &str) -> Verdict {
        self.is_window_visible(WindowKind::AboveApp, partial_title)
    }

    /// Visibility of a system window below the app layer.
    #[must_use]
    pub fn is_below_app_window_visible(&self, partial_title: &str) -> Verdict {
        self.is_window_visible(WindowKind::BelowApp, partial_title)
    }

    /// Visibility of an input method window.
    #[must_use]
    pub fn is_ime_window_visible(&self, partial_title: &str) -> Verdict {
        self.is_window_visible(WindowKind::Ime, partial_title)
    }

    /// Visibility of an application window.
    #[must_use]
    pub fn is_app_window_visible(&self, partial_title: &str) -> Verdict {
        self.is_window_visible(WindowKind::App, partial_title)
    }

    /// Checks that the top-most visible app window matches `partial_title`.
    #[must_use]
    pub fn is_visible_app_window_on_top(&self, partial_title: &str) -> Verdict {
        let top = self
            .windows
            .iter()
            .find(|w| w.kind == WindowKind::App && w.visible);

        match top {
            None => Verdict::fail("no visible app window found"),
            Some(w) if w.title.contains(partial_title) => {
                Verdict::pass(format!("{} is on top", w.title))
            }
            Some(w) => Verdict::fail(format!("{partial_title} is not on top, found {}", w.title)),
        }
    }
}
