//! Page-level host contract used by the drop coordinator.

use std::{future::Future, pin::Pin, time::Duration};

use crate::entry::ResolvedFile;

/// Boxed future used by [`PageHost`] async methods.
pub type PageFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Class state of the page drop indicator element.
pub struct IndicatorClasses {
    /// `invisible` class present.
    pub invisible: bool,
    /// `opening` animation class present.
    pub opening: bool,
    /// `closing` animation class present.
    pub closing: bool,
}

impl Default for IndicatorClasses {
    fn default() -> Self {
        Self::HIDDEN
    }
}

impl IndicatorClasses {
    /// Resting state before any drag.
    pub const HIDDEN: Self = Self {
        invisible: true,
        opening: false,
        closing: false,
    };

    /// Starts an opening sequence. A pending close is superseded.
    pub fn shown(self) -> Self {
        Self {
            invisible: false,
            opening: true,
            closing: false,
        }
    }

    /// Hides the indicator, either through the closing animation or at once.
    pub fn hidden(self, animated: bool) -> Self {
        if animated {
            Self {
                closing: true,
                ..self
            }
        } else {
            Self::HIDDEN
        }
    }

    /// Applies the element's `animationend` signal.
    pub fn animation_finished(self) -> Self {
        if self.closing {
            Self::HIDDEN
        } else if self.opening {
            Self {
                opening: false,
                ..self
            }
        } else {
            self
        }
    }

    /// Class names paired with whether each should be present.
    pub fn class_tokens(self) -> [(&'static str, bool); 3] {
        [
            ("invisible", self.invisible),
            ("opening", self.opening),
            ("closing", self.closing),
        ]
    }
}

/// Page services the drop coordinator needs.
pub trait PageHost {
    /// Drag event target identity, compared to match `dragleave` with the `dragenter` that
    /// opened the indicator.
    type Target: Clone + PartialEq;
    /// Event-receiving element inside a mounted upload surface.
    type Anchor;

    /// Returns `true` while an upload surface exists in the page.
    fn has_upload_surface(&self) -> bool;

    /// Applies indicator classes to the indicator element.
    fn apply_indicator(&self, classes: IndicatorClasses);

    /// Returns the page's team context, if it is scoped to one.
    ///
    /// A page without a team marker yields `Ok(None)`; a malformed marker yields `Err`.
    fn team_identifier(&self) -> Result<Option<String>, String>;

    /// Asks the page to insert a new upload surface rendered from `url`.
    fn request_surface<'a>(&'a self, url: &'a str) -> PageFuture<'a, Result<(), String>>;

    /// Locates the drop anchor of a mounted surface.
    fn find_drop_anchor(&self) -> Option<Self::Anchor>;

    /// Dispatches the files-dropped notification at `anchor`.
    fn deliver_files(&self, anchor: &Self::Anchor, files: &[ResolvedFile]) -> Result<(), String>;

    /// Resolves after `duration`.
    fn sleep(&self, duration: Duration) -> PageFuture<'static, ()>;
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn open_then_animation_end_leaves_plain_visible() {
        let classes = IndicatorClasses::HIDDEN.shown().animation_finished();
        assert_eq!(
            classes,
            IndicatorClasses {
                invisible: false,
                opening: false,
                closing: false,
            }
        );
    }

    #[test]
    fn animated_close_becomes_invisible_on_animation_end() {
        let closing = IndicatorClasses::HIDDEN
            .shown()
            .animation_finished()
            .hidden(true);
        assert!(closing.closing);
        assert!(!closing.invisible);
        assert_eq!(closing.animation_finished(), IndicatorClasses::HIDDEN);
    }

    #[test]
    fn reopening_during_close_is_not_cleared_by_the_stale_animation_end() {
        let reopened = IndicatorClasses::HIDDEN.shown().hidden(true).shown();
        assert!(!reopened.closing);
        let settled = reopened.animation_finished();
        assert!(!settled.invisible);
        assert!(!settled.opening);
    }

    #[test]
    fn immediate_hide_skips_animation() {
        let hidden = IndicatorClasses::HIDDEN.shown().hidden(false);
        assert_eq!(hidden, IndicatorClasses::HIDDEN);
    }
}
