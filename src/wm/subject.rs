//! Window-manager assertions on [`TraceSubject`].
//!
//! ```
//! use tracephase::subject::TraceSubject;
//! use tracephase::trace::Trace;
//! use tracephase::wm::{WindowKind, WindowManagerEntry, WindowState};
//!
//! let camera = |visible| vec![WindowState::new("Camera", WindowKind::App, visible)];
//! let trace = Trace::new(vec![
//!     WindowManagerEntry::new(0, camera(false)),
//!     WindowManagerEntry::new(1, camera(true)),
//! ])
//! .unwrap();
//!
//! TraceSubject::assert_that(&trace)
//!     .hides_app_window("Camera")
//!     .then()
//!     .shows_app_window_on_top("Camera")
//!     .for_all_entries()
//!     .unwrap();
//! ```

use crate::subject::TraceSubject;

use super::WindowManagerEntry;
use super::predicates;

impl TraceSubject<'_, WindowManagerEntry> {
    /// See [`predicates::shows_above_app_window`].
    pub fn shows_above_app_window(self, partial_title: &str) -> Self {
        self.add(predicates::shows_above_app_window(partial_title))
    }

    /// See [`predicates::hides_above_app_window`].
    pub fn hides_above_app_window(self, partial_title: &str) -> Self {
        self.add(predicates::hides_above_app_window(partial_title))
    }

    /// See [`predicates::shows_below_app_window`].
    pub fn shows_below_app_window(self, partial_title: &str) -> Self {
        self.add(predicates::shows_below_app_window(partial_title))
    }

    /// See [`predicates::hides_below_app_window`].
    pub fn hides_below_app_window(self, partial_title: &str) -> Self {
        self.add(predicates::hides_below_app_window(partial_title))
    }

    /// See [`predicates::shows_ime_window`].
    pub fn shows_ime_window(self, partial_title: &str) -> Self {
        self.add(predicates::shows_ime_window(partial_title))
    }

    /// See [`predicates::hides_ime_window`].
    pub fn hides_ime_window(self, partial_title: &str) -> Self {
        self.add(predicates::hides_ime_window(partial_title))
    }

    /// See [`predicates::shows_app_window`].
    pub fn shows_app_window(self, partial_title: &str) -> Self {
        self.add(predicates::shows_app_window(partial_title))
    }

    /// See [`predicates::hides_app_window`].
    pub fn hides_app_window(self, partial_title: &str) -> Self {
        self.add(predicates::hides_app_window(partial_title))
    }

    /// See [`predicates::shows_app_window_on_top`].
    pub fn shows_app_window_on_top(self, partial_title: &str) -> Self {
        self.add(predicates::shows_app_window_on_top(partial_title))
    }

    /// See [`predicates::hides_app_window_on_top`].
    pub fn hides_app_window_on_top(self, partial_title: &str) -> Self {
        self.add(predicates::hides_app_window_on_top(partial_title))
    }
}
