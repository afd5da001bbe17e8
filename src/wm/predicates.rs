//! Window-manager predicate library
//!
//! Each function builds a [`NamedPredicate`] over [`WindowManagerEntry`]
//! for a partial window title. Names follow `<assertion>(<title>)` so a
//! failure report says exactly which check failed on which window.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::PlanError;
use crate::phase::NamedPredicate;

use super::WindowManagerEntry;

fn named(
    assertion: WindowAssertion,
    partial_title: &str,
    check: fn(&WindowManagerEntry, &str) -> crate::phase::Verdict,
) -> NamedPredicate<WindowManagerEntry> {
    let title = partial_title.to_string();
    NamedPredicate::new(format!("{assertion}({partial_title})"), move |entry| {
        check(entry, &title)
    })
}

/// A system window above the app layer is visible.
#[must_use]
pub fn shows_above_app_window(partial_title: &str) -> NamedPredicate<WindowManagerEntry> {
    named(
        WindowAssertion::ShowsAboveAppWindow,
        partial_title,
        WindowManagerEntry::is_above_app_window_visible,
    )
}

/// A system window above the app layer is hidden or absent.
#[must_use]
pub fn hides_above_app_window(partial_title: &str) -> NamedPredicate<WindowManagerEntry> {
    named(WindowAssertion::HidesAboveAppWindow, partial_title, |e, t| {
        e.is_above_app_window_visible(t).negate()
    })
}

/// A system window below the app layer is visible.
#[must_use]
pub fn shows_below_app_window(partial_title: &str) -> NamedPredicate<WindowManagerEntry> {
    named(
        WindowAssertion::ShowsBelowAppWindow,
        partial_title,
        WindowManagerEntry::is_below_app_window_visible,
    )
}

/// A system window below the app layer is hidden or absent.
#[must_use]
pub fn hides_below_app_window(partial_title: &str) -> NamedPredicate<WindowManagerEntry> {
    named(WindowAssertion::HidesBelowAppWindow, partial_title, |e, t| {
        e.is_below_app_window_visible(t).negate()
    })
}

/// An input method window is visible.
#[must_use]
pub fn shows_ime_window(partial_title: &str) -> NamedPredicate<WindowManagerEntry> {
    named(
        WindowAssertion::ShowsImeWindow,
        partial_title,
        WindowManagerEntry::is_ime_window_visible,
    )
}

/// An input method window is hidden or absent.
#[must_use]
pub fn hides_ime_window(partial_title: &str) -> NamedPredicate<WindowManagerEntry> {
    named(WindowAssertion::HidesImeWindow, partial_title, |e, t| {
        e.is_ime_window_visible(t).negate()
    })
}

/// An app window is visible (anywhere in the stack).
#[must_use]
pub fn shows_app_window(partial_title: &str) -> NamedPredicate<WindowManagerEntry> {
    named(
        WindowAssertion::ShowsAppWindow,
        partial_title,
        WindowManagerEntry::is_app_window_visible,
    )
}

/// An app window is hidden or absent.
#[must_use]
pub fn hides_app_window(partial_title: &str) -> NamedPredicate<WindowManagerEntry> {
    named(WindowAssertion::HidesAppWindow, partial_title, |e, t| {
        e.is_app_window_visible(t).negate()
    })
}

/// An app window is visible and is the top-most visible app window.
#[must_use]
pub fn shows_app_window_on_top(partial_title: &str) -> NamedPredicate<WindowManagerEntry> {
    named(WindowAssertion::ShowsAppWindowOnTop, partial_title, |e, t| {
        e.is_app_window_visible(t)
            .and_then(|| e.is_visible_app_window_on_top(t))
    })
}

/// An app window is either not visible or not the top-most visible app window.
#[must_use]
pub fn hides_app_window_on_top(partial_title: &str) -> NamedPredicate<WindowManagerEntry> {
    named(WindowAssertion::HidesAppWindowOnTop, partial_title, |e, t| {
        let hidden = e.is_app_window_visible(t).negate();
        if hidden.passed() {
            hidden
        } else {
            e.is_visible_app_window_on_top(t).negate()
        }
    })
}

/// Every predicate in the library, addressable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowAssertion {
    /// [`shows_above_app_window`]
    ShowsAboveAppWindow,
    /// [`hides_above_app_window`]
    HidesAboveAppWindow,
    /// [`shows_below_app_window`]
    ShowsBelowAppWindow,
    /// [`hides_below_app_window`]
    HidesBelowAppWindow,
    /// [`shows_ime_window`]
    ShowsImeWindow,
    /// [`hides_ime_window`]
    HidesImeWindow,
    /// [`shows_app_window`]
    ShowsAppWindow,
    /// [`hides_app_window`]
    HidesAppWindow,
    /// [`shows_app_window_on_top`]
    ShowsAppWindowOnTop,
    /// [`hides_app_window_on_top`]
    HidesAppWindowOnTop,
}

impl WindowAssertion {
    /// All assertions in declaration order.
    pub const ALL: [Self; 10] = [
        Self::ShowsAboveAppWindow,
        Self::HidesAboveAppWindow,
        Self::ShowsBelowAppWindow,
        Self::HidesBelowAppWindow,
        Self::ShowsImeWindow,
        Self::HidesImeWindow,
        Self::ShowsAppWindow,
        Self::HidesAppWindow,
        Self::ShowsAppWindowOnTop,
        Self::HidesAppWindowOnTop,
    ];

    /// Name as written in plan files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ShowsAboveAppWindow => "shows_above_app_window",
            Self::HidesAboveAppWindow => "hides_above_app_window",
            Self::ShowsBelowAppWindow => "shows_below_app_window",
            Self::HidesBelowAppWindow => "hides_below_app_window",
            Self::ShowsImeWindow => "shows_ime_window",
            Self::HidesImeWindow => "hides_ime_window",
            Self::ShowsAppWindow => "shows_app_window",
            Self::HidesAppWindow => "hides_app_window",
            Self::ShowsAppWindowOnTop => "shows_app_window_on_top",
            Self::HidesAppWindowOnTop => "hides_app_window_on_top",
        }
    }

    /// Builds the predicate for `partial_title`.
    #[must_use]
    pub fn predicate(self, partial_title: &str) -> NamedPredicate<WindowManagerEntry> {
        match self {
            Self::ShowsAboveAppWindow => shows_above_app_window(partial_title),
            Self::HidesAboveAppWindow => hides_above_app_window(partial_title),
            Self::ShowsBelowAppWindow => shows_below_app_window(partial_title),
            Self::HidesBelowAppWindow => hides_below_app_window(partial_title),
            Self::ShowsImeWindow => shows_ime_window(partial_title),
            Self::HidesImeWindow => hides_ime_window(partial_title),
            Self::ShowsAppWindow => shows_app_window(partial_title),
            Self::HidesAppWindow => hides_app_window(partial_title),
            Self::ShowsAppWindowOnTop => shows_app_window_on_top(partial_title),
            Self::HidesAppWindowOnTop => hides_app_window_on_top(partial_title),
        }
    }

    /// Closest known name to `input`, if within edit distance 3.
    #[must_use]
    pub fn suggest(input: &str) -> Option<&'static str> {
        Self::ALL
            .iter()
            .map(|a| (a.name(), strsim::damerau_levenshtein(input, a.name())))
            .filter(|(_, dist)| *dist <= 3)
            .min_by_key(|(_, dist)| *dist)
            .map(|(name, _)| name)
    }
}

impl fmt::Display for WindowAssertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WindowAssertion {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| PlanError::UnknownAssertion {
                name: s.to_string(),
                suggestion: Self::suggest(s).map(str::to_string),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wm::{WindowKind, WindowState};

    fn entry(windows: Vec<WindowState>) -> WindowManagerEntry {
        WindowManagerEntry::new(0, windows)
    }

    fn app(title: &str, visible: bool) -> WindowState {
        WindowState::new(title, WindowKind::App, visible)
    }

    #[test]
    fn predicate_names_include_title() {
        assert_eq!(
            shows_ime_window("Keyboard").name(),
            "shows_ime_window(Keyboard)"
        );
        assert_eq!(
            hides_app_window_on_top("Camera").name(),
            "hides_app_window_on_top(Camera)"
        );
    }

    #[test]
    fn hides_is_negation_of_shows() {
        let e = entry(vec![WindowState::new("Nav", WindowKind::AboveApp, true)]);
        assert!(shows_above_app_window("Nav").evaluate(&e).passed());
        let hidden = hides_above_app_window("Nav").evaluate(&e);
        assert!(hidden.failed());
        assert_eq!(hidden.reason(), "Nav is visible");
    }

    #[test]
    fn hides_passes_when_window_missing() {
        let e = entry(vec![]);
        assert!(hides_below_app_window("Wallpaper").evaluate(&e).passed());
    }

    #[test]
    fn on_top_requires_visibility_first() {
        let e = entry(vec![app("Launcher", true), app("Camera", false)]);
        let verdict = shows_app_window_on_top("Camera").evaluate(&e);
        assert!(verdict.failed());
        assert_eq!(verdict.reason(), "Camera is invisible");
    }

    #[test]
    fn on_top_when_visible_but_covered() {
        let e = entry(vec![app("Launcher", true), app("Camera", true)]);
        let verdict = shows_app_window_on_top("Camera").evaluate(&e);
        assert!(verdict.failed());
        assert!(verdict.reason().contains("Launcher"));
        assert!(hides_app_window_on_top("Camera").evaluate(&e).passed());
    }

    #[test]
    fn hides_on_top_fails_when_on_top() {
        let e = entry(vec![app("Camera", true)]);
        assert!(shows_app_window_on_top("Camera").evaluate(&e).passed());
        assert!(hides_app_window_on_top("Camera").evaluate(&e).failed());
    }

    #[test]
    fn names_round_trip() {
        for assertion in WindowAssertion::ALL {
            let parsed: WindowAssertion = assertion.name().parse().unwrap();
            assert_eq!(parsed, assertion);
        }
    }

    #[test]
    fn unknown_name_suggests_closest() {
        let err = "shows_app_windw".parse::<WindowAssertion>().unwrap_err();
        match err {
            PlanError::UnknownAssertion { suggestion, .. } => {
                assert_eq!(suggestion.as_deref(), Some("shows_app_window"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn far_name_has_no_suggestion() {
        assert_eq!(WindowAssertion::suggest("completely_different"), None);
    }
}
