//! Image carousels: the hero carousel and the fallback slide strip.
//!
//! Both advance on a 5 second timer. Time is driven by the caller through
//! `elapse`, so the carousels hold no timers of their own.

use std::time::Duration;

use tracing::trace;

/// Auto-advance interval.
pub const AUTO_ADVANCE: Duration = Duration::from_secs(5);

/// Hero carousel with exactly one active slide.
///
/// Manual navigation restarts the auto-advance countdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Carousel {
    len: usize,
    current: usize,
    since_advance: Duration,
}

impl Carousel {
    /// A carousel over `len` slides, showing the first. Zero slides gives an
    /// inert carousel.
    #[must_use]
    pub const fn new(len: usize) -> Self {
        Self {
            len,
            current: 0,
            since_advance: Duration::ZERO,
        }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Index of the active slide.
    #[must_use]
    pub const fn current(&self) -> usize {
        self.current
    }

    /// Whether slide `index` carries the `active` class.
    #[must_use]
    pub const fn is_active(&self, index: usize) -> bool {
        self.len > 0 && index == self.current
    }

    /// Show slide `index`. Below zero wraps to the last slide, past the end
    /// wraps to the first.
    pub fn show(&mut self, index: isize) {
        if self.is_empty() {
            return;
        }
        let last = self.len - 1;
        self.current = match usize::try_from(index) {
            Err(_) => last,
            Ok(i) if i > last => 0,
            Ok(i) => i,
        };
        trace!(current = self.current, "Carousel slide shown");
    }

    /// "Next" button.
    pub fn next(&mut self) {
        self.step(1);
        self.since_advance = Duration::ZERO;
    }

    /// "Previous" button.
    pub fn prev(&mut self) {
        self.step(-1);
        self.since_advance = Duration::ZERO;
    }

    /// Let `dt` pass, advancing once per full interval.
    pub fn elapse(&mut self, dt: Duration) {
        if self.is_empty() {
            return;
        }
        self.since_advance += dt;
        while self.since_advance >= AUTO_ADVANCE {
            self.since_advance -= AUTO_ADVANCE;
            self.step(1);
        }
    }

    fn step(&mut self, delta: isize) {
        let current = isize::try_from(self.current).unwrap_or(0);
        self.show(current + delta);
    }
}

/// Horizontal slide strip positioned by a CSS transform.
///
/// Its timer runs independently of manual navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideTrack {
    len: usize,
    index: usize,
    since_advance: Duration,
}

impl SlideTrack {
    #[must_use]
    pub const fn new(len: usize) -> Self {
        Self {
            len,
            index: 0,
            since_advance: Duration::ZERO,
        }
    }

    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Move to slide `n` modulo the slide count.
    pub fn go(&mut self, n: isize) {
        let Ok(len) = isize::try_from(self.len) else {
            return;
        };
        if len == 0 {
            return;
        }
        // rem_euclid is non-negative and below len
        self.index = usize::try_from(n.rem_euclid(len)).unwrap_or(0);
    }

    pub fn next(&mut self) {
        self.go(self.signed_index() + 1);
    }

    pub fn prev(&mut self) {
        self.go(self.signed_index() - 1);
    }

    /// Let `dt` pass, advancing once per full interval.
    pub fn elapse(&mut self, dt: Duration) {
        if self.len == 0 {
            return;
        }
        self.since_advance += dt;
        while self.since_advance >= AUTO_ADVANCE {
            self.since_advance -= AUTO_ADVANCE;
            self.next();
        }
    }

    /// The container's `transform` value.
    #[must_use]
    pub fn transform(&self) -> String {
        format!("translateX(-{}%)", self.index * 100)
    }

    fn signed_index(&self) -> isize {
        isize::try_from(self.index).unwrap_or(0)
    }
}
