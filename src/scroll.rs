//! Scroll-scrubbed tweens.
//!
//! ┌────────────── Scroll Flow ──────────────────────────────────────────┐
//! │  scroll offset ─► ScrollTrigger ─► ScrollUpdate{progress,direction} │
//! │                        │                    │                       │
//! │                        │                    └─► ScrollBinding::apply│
//! │                        └─► Pin placement                            │
//! │  scroll / tick ─► ScrollActivity ─► ScrollStart / ScrollEnd         │
//! └─────────────────────────────────────────────────────────────────────┘
//!
//! Progress is a pure function of the scroll offset (scrub), so scrolling
//! back to an offset always lands on the same tween values.

use crate::error::SceneError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseFloatError;
use std::str::FromStr;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn sign(&self) -> f64 {
        match self {
            Direction::Forward => 1.0,
            Direction::Backward => -1.0,
        }
    }
}

/// End of a scroll range, either absolute or relative to the start
/// - "2000"   -> Absolute(2000)
/// - "+=2000" -> Relative(2000)
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ScrollEnd {
    Absolute(f64),
    Relative(f64),
}

impl FromStr for ScrollEnd {
    type Err = ParseFloatError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        match value.strip_prefix("+=") {
            Some(relative) => relative.trim().parse().map(ScrollEnd::Relative),
            None => value.parse().map(ScrollEnd::Absolute),
        }
    }
}

impl fmt::Display for ScrollEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScrollEnd::Absolute(end) => write!(f, "{}", end),
            ScrollEnd::Relative(length) => write!(f, "+={}", length),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScrollRange {
    start: f64,
    end: f64,
}

impl ScrollRange {
    /// Rejects ranges whose end does not come after their start
    pub fn new(start: f64, end: ScrollEnd) -> Result<Self, SceneError> {
        let end = match end {
            ScrollEnd::Absolute(end) => end,
            ScrollEnd::Relative(length) => start + length,
        };
        // NaN fails this comparison too
        if !(end > start) {
            return Err(SceneError::BindingRange { start, end });
        }
        Ok(ScrollRange { start, end })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    pub fn progress(&self, scroll: f64) -> f64 {
        ((scroll - self.start) / self.length()).clamp(0.0, 1.0)
    }

    pub fn contains(&self, scroll: f64) -> bool {
        scroll >= self.start && scroll <= self.end
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    Linear,
    #[default]
    Power1Out,
}

impl Ease {
    pub fn apply(&self, progress: f64) -> f64 {
        let progress = progress.clamp(0.0, 1.0);
        match self {
            Ease::Linear => progress,
            Ease::Power1Out => 1.0 - (1.0 - progress) * (1.0 - progress),
        }
    }
}

/// Context handed to bindings and their callbacks on every scrub step
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScrollUpdate {
    pub progress: f64,
    pub direction: Direction,
}

/// Anything a binding can tween
pub trait Tweenable {
    fn property(&self, property: Property) -> f64;
    fn set_property(&mut self, property: Property, value: f64);
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Property {
    X,
    Y,
}

type UpdateCallback<T> = Box<dyn FnMut(&mut T, &ScrollUpdate)>;

/// One scroll-scrubbed tween from a target's values at bind time to `to`
pub struct ScrollBinding<T: Tweenable> {
    range: ScrollRange,
    ease: Ease,
    tweens: Vec<PropertyTween>,
    on_update: Option<UpdateCallback<T>>,
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct PropertyTween {
    property: Property,
    from: f64,
    to: f64,
}

impl PropertyTween {
    fn value_at(&self, eased: f64) -> f64 {
        self.from + (self.to - self.from) * eased
    }
}

impl<T: Tweenable> ScrollBinding<T> {
    pub fn bind(
        target: &T,
        range: ScrollRange,
        to: &[(Property, f64)],
        ease: Ease,
        on_update: Option<UpdateCallback<T>>,
    ) -> Self {
        let tweens = to
            .iter()
            .map(|&(property, to)| PropertyTween {
                property,
                from: target.property(property),
                to,
            })
            .collect();
        ScrollBinding {
            range,
            ease,
            tweens,
            on_update,
        }
    }

    pub fn range(&self) -> &ScrollRange {
        &self.range
    }

    /// Value `property` takes at `progress`, None if this binding does not
    /// tween it
    pub fn value_at(&self, property: Property, progress: f64) -> Option<f64> {
        let eased = self.ease.apply(progress);
        self.tweens
            .iter()
            .find(|tween| tween.property == property)
            .map(|tween| tween.value_at(eased))
    }

    pub fn apply(&mut self, target: &mut T, update: &ScrollUpdate) {
        let eased = self.ease.apply(update.progress);
        for tween in &self.tweens {
            target.set_property(tween.property, tween.value_at(eased));
        }
        if let Some(on_update) = self.on_update.as_mut() {
            on_update(target, update);
        }
    }
}

/// Where the pinned trigger element sits for a scroll offset
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PinPlacement {
    Before,
    /// held in place : shifted down by how far the range has scrolled
    Pinned { offset: f64 },
    /// released after the range, pushed down by the pin spacing
    After { offset: f64 },
}

impl PinPlacement {
    /// Vertical shift to apply to the pinned element
    pub fn offset(&self) -> f64 {
        match self {
            PinPlacement::Before => 0.0,
            PinPlacement::Pinned { offset } | PinPlacement::After { offset } => *offset,
        }
    }
}

/// Turns raw scroll offsets into scrub updates for one range
#[derive(Debug, Clone)]
pub struct ScrollTrigger {
    range: ScrollRange,
    last_scroll: f64,
    progress: f64,
    direction: Direction,
}

impl ScrollTrigger {
    pub fn new(range: ScrollRange) -> Self {
        ScrollTrigger {
            range,
            last_scroll: range.start(),
            progress: 0.0,
            direction: Direction::Forward,
        }
    }

    pub fn range(&self) -> &ScrollRange {
        &self.range
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Feeds a scroll offset; Some only when progress moved
    pub fn scroll_to(&mut self, scroll: f64) -> Option<ScrollUpdate> {
        if scroll > self.last_scroll {
            self.direction = Direction::Forward;
        } else if scroll < self.last_scroll {
            self.direction = Direction::Backward;
        }
        self.last_scroll = scroll;

        let progress = self.range.progress(scroll);
        if progress == self.progress {
            return None;
        }
        self.progress = progress;
        Some(ScrollUpdate {
            progress,
            direction: self.direction,
        })
    }

    pub fn pin_placement(&self, scroll: f64) -> PinPlacement {
        if scroll < self.range.start() {
            PinPlacement::Before
        } else if self.range.contains(scroll) {
            PinPlacement::Pinned {
                offset: scroll - self.range.start(),
            }
        } else {
            PinPlacement::After {
                offset: self.pin_spacing(),
            }
        }
    }

    /// Extra document height needed so the whole range can be scrolled
    pub fn pin_spacing(&self) -> f64 {
        self.range.length()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ScrollEvent {
    ScrollStart,
    ScrollEnd,
}

/// Detects the start and end of a burst of scrolling
#[derive(Debug, Clone)]
pub struct ScrollActivity {
    end_delay: f64,
    last_scroll_at: Option<f64>,
}

impl ScrollActivity {
    pub fn new(end_delay: f64) -> Self {
        ScrollActivity {
            end_delay,
            last_scroll_at: None,
        }
    }

    pub fn is_scrolling(&self) -> bool {
        self.last_scroll_at.is_some()
    }

    pub fn on_scroll(&mut self, now: f64) -> Option<ScrollEvent> {
        let started = self.last_scroll_at.is_none();
        self.last_scroll_at = Some(now);
        started.then_some(ScrollEvent::ScrollStart)
    }

    pub fn tick(&mut self, now: f64) -> Option<ScrollEvent> {
        match self.last_scroll_at {
            Some(last) if now - last >= self.end_delay => {
                self.last_scroll_at = None;
                Some(ScrollEvent::ScrollEnd)
            }
            _ => None,
        }
    }
}
