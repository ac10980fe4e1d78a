//! Marquee (rubber-band) multi-select with auto-scroll near viewport edges.
//!
//! Timers are modeled as explicit deadlines against a caller-supplied clock:
//! the owner calls `tick(now)` once per frame and applies any scroll request
//! it gets back. Every exit path resets the state, so a cancelled gesture
//! leaves no band, no pending arm and no running auto-scroll.

use crate::geometry::Rect;

/// Delay before a held pointer turns into a rubber-band drag.
pub const ARM_DELAY: f64 = 0.5;
/// Distance from a viewport edge that triggers auto-scrolling.
pub const AUTO_SCROLL_THRESHOLD: f32 = 100.0;
/// Interval between auto-scroll nudges.
pub const AUTO_SCROLL_INTERVAL: f64 = 0.3;
/// Size the band springs to when it first appears.
pub const INITIAL_BAND_SIZE: f32 = 90.0;
/// Movement beyond this distance from the press point cancels a pending arm.
pub const ARM_SLOP: f32 = 10.0;

/// Edges the viewport should keep scrolling towards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollDirections {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl ScrollDirections {
    pub fn any(&self) -> bool {
        self.left || self.right || self.up || self.down
    }

    /// One nudge step in content coordinates.
    pub fn step(&self) -> (f32, f32) {
        let mut dx = 0.0;
        let mut dy = 0.0;
        if self.left {
            dx -= AUTO_SCROLL_THRESHOLD;
        }
        if self.right {
            dx += AUTO_SCROLL_THRESHOLD;
        }
        if self.up {
            dy -= AUTO_SCROLL_THRESHOLD;
        }
        if self.down {
            dy += AUTO_SCROLL_THRESHOLD;
        }
        (dx, dy)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum MarqueeState {
    #[default]
    Idle,
    /// Pointer is down; the band appears when the deadline passes.
    Armed { start: (f32, f32), deadline: f64 },
    /// Band is visible and tracking the pointer.
    Active { anchor: (f32, f32), band: Rect },
}

#[derive(Debug, Clone, Copy)]
struct AutoScroll {
    directions: ScrollDirections,
    pointer: (f32, f32),
    next_tick: f64,
}

/// State machine for drag-to-select. Owns no cell state; the owner applies
/// the band to its own frames after every change.
#[derive(Debug, Default)]
pub struct MarqueeController {
    state: MarqueeState,
    auto_scroll: Option<AutoScroll>,
}

impl MarqueeController {
    pub fn is_armed(&self) -> bool {
        matches!(self.state, MarqueeState::Armed { .. })
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, MarqueeState::Active { .. })
    }

    /// Viewport scrolling is frozen while the band is visible.
    pub fn scroll_frozen(&self) -> bool {
        self.is_active()
    }

    /// Current band rect, if visible.
    pub fn band(&self) -> Option<Rect> {
        match self.state {
            MarqueeState::Active { band, .. } => Some(band),
            _ => None,
        }
    }

    /// Arms the deferred band. Only a fresh pointer-down arms; an in-flight
    /// gesture is left alone.
    pub fn pointer_down(&mut self, position: (f32, f32), now: f64) {
        if matches!(self.state, MarqueeState::Idle) {
            self.state = MarqueeState::Armed {
                start: position,
                deadline: now + ARM_DELAY,
            };
        }
    }

    /// Fires the armed band once its deadline passes. Returns true when the
    /// band just appeared so the owner can run its first selection pass.
    pub fn tick(&mut self, now: f64) -> bool {
        if let MarqueeState::Armed { start, deadline } = self.state {
            if now >= deadline {
                let anchor = (
                    start.0 - INITIAL_BAND_SIZE / 2.0,
                    start.1 - INITIAL_BAND_SIZE / 2.0,
                );
                self.state = MarqueeState::Active {
                    anchor,
                    band: Rect::new(anchor.0, anchor.1, INITIAL_BAND_SIZE, INITIAL_BAND_SIZE),
                };
                return true;
            }
        }
        false
    }

    /// Tracks the pointer. Moving past the slop distance before the arm
    /// deadline cancels the arm so taps and cell gestures pass through
    /// untouched; hosts that report the pointer every frame may call this
    /// with an unchanged position without losing the arm. While active, the
    /// band is recomputed from the anchor and auto-scroll is refreshed when
    /// the pointer nears a viewport edge with more content beyond it.
    /// Returns true when the band changed.
    pub fn pointer_moved(
        &mut self,
        position: (f32, f32),
        now: f64,
        viewport: Rect,
        content_size: (f32, f32),
    ) -> bool {
        match self.state {
            MarqueeState::Idle => false,
            MarqueeState::Armed { start, .. } => {
                let dx = position.0 - start.0;
                let dy = position.1 - start.1;
                if dx * dx + dy * dy > ARM_SLOP * ARM_SLOP {
                    self.state = MarqueeState::Idle;
                }
                false
            }
            MarqueeState::Active { anchor, .. } => {
                self.state = MarqueeState::Active {
                    anchor,
                    band: Rect::from_corners(anchor, position),
                };

                let directions = edge_directions(position, viewport, content_size);
                if directions.any() {
                    let next_tick = match self.auto_scroll {
                        Some(scroll) if scroll.directions == directions => scroll.next_tick,
                        _ => now + AUTO_SCROLL_INTERVAL,
                    };
                    self.auto_scroll = Some(AutoScroll {
                        directions,
                        pointer: position,
                        next_tick,
                    });
                } else {
                    self.auto_scroll = None;
                }
                true
            }
        }
    }

    /// Produces the next due auto-scroll step. The owner applies it to the
    /// viewport and reports the amount that actually scrolled through
    /// [`auto_scroll_applied`].
    pub fn auto_scroll_tick(&mut self, now: f64) -> Option<(f32, f32)> {
        let scroll = self.auto_scroll.as_mut()?;
        if now < scroll.next_tick {
            return None;
        }
        scroll.next_tick = now + AUTO_SCROLL_INTERVAL;
        Some(scroll.directions.step())
    }

    /// Advances the remembered pointer by the scroll the owner actually
    /// applied (a clamped viewport moves less than the requested step) and
    /// returns it, to be fed back through `pointer_moved` so selection keeps
    /// tracking under a stationary pointer.
    pub fn auto_scroll_applied(&mut self, applied: (f32, f32)) -> Option<(f32, f32)> {
        let scroll = self.auto_scroll.as_mut()?;
        scroll.pointer = (scroll.pointer.0 + applied.0, scroll.pointer.1 + applied.1);
        Some(scroll.pointer)
    }

    /// Ends or cancels the gesture. Returns true when this was a plain tap
    /// (armed but never fired), which clears the selection.
    pub fn pointer_up(&mut self) -> bool {
        let was_tap = self.is_armed();
        self.state = MarqueeState::Idle;
        self.auto_scroll = None;
        was_tap
    }
}

fn edge_directions(
    position: (f32, f32),
    viewport: Rect,
    content_size: (f32, f32),
) -> ScrollDirections {
    let mut directions = ScrollDirections::default();
    if position.1 < viewport.min_y() + AUTO_SCROLL_THRESHOLD && viewport.min_y() > 0.0 {
        directions.up = true;
    } else if position.1 > viewport.max_y() - AUTO_SCROLL_THRESHOLD
        && viewport.max_y() < content_size.1
    {
        directions.down = true;
    }
    if position.0 < viewport.min_x() + AUTO_SCROLL_THRESHOLD && viewport.min_x() > 0.0 {
        directions.left = true;
    } else if position.0 > viewport.max_x() - AUTO_SCROLL_THRESHOLD
        && viewport.max_x() < content_size.0
    {
        directions.right = true;
    }
    directions
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Rect = Rect {
        x: 0.0,
        y: 0.0,
        w: 800.0,
        h: 600.0,
    };
    const CONTENT: (f32, f32) = (2000.0, 2000.0);

    #[test]
    fn arm_fires_after_delay() {
        let mut marquee = MarqueeController::default();
        marquee.pointer_down((300.0, 300.0), 0.0);
        assert!(marquee.is_armed());
        assert!(!marquee.tick(0.4));
        assert!(marquee.tick(ARM_DELAY));
        assert!(marquee.is_active());
        assert!(marquee.scroll_frozen());

        let band = marquee.band().unwrap();
        assert_eq!(band.w, INITIAL_BAND_SIZE);
        assert!(band.contains((300.0, 300.0)));
    }

    #[test]
    fn movement_before_deadline_cancels_arm() {
        let mut marquee = MarqueeController::default();
        marquee.pointer_down((300.0, 300.0), 0.0);
        marquee.pointer_moved((320.0, 300.0), 0.1, VIEWPORT, CONTENT);
        assert!(!marquee.tick(1.0));
        assert!(marquee.band().is_none());
    }

    #[test]
    fn stationary_hold_activates_band() {
        let mut marquee = MarqueeController::default();
        marquee.pointer_down((300.0, 300.0), 0.0);
        // An immediate-mode host reports the pointer every frame, moved or
        // not; zero-delta reports must not cancel the arm.
        let mut now = 0.0;
        while now < ARM_DELAY {
            marquee.pointer_moved((300.0, 300.0), now, VIEWPORT, CONTENT);
            assert!(!marquee.tick(now));
            now += 1.0 / 60.0;
        }
        assert!(marquee.tick(now));
        assert!(marquee.is_active());
    }

    #[test]
    fn jitter_within_slop_keeps_arm_and_tap() {
        let mut marquee = MarqueeController::default();
        marquee.pointer_down((300.0, 300.0), 0.0);
        marquee.pointer_moved((303.0, 302.0), 0.1, VIEWPORT, CONTENT);
        assert!(marquee.is_armed());
        assert!(marquee.pointer_up());
    }

    #[test]
    fn tap_reports_on_release() {
        let mut marquee = MarqueeController::default();
        marquee.pointer_down((300.0, 300.0), 0.0);
        assert!(marquee.pointer_up());

        marquee.pointer_down((300.0, 300.0), 0.0);
        marquee.tick(1.0);
        assert!(!marquee.pointer_up());
        assert!(!marquee.is_active());
    }

    #[test]
    fn band_spans_anchor_to_pointer_in_any_direction() {
        let mut marquee = MarqueeController::default();
        marquee.pointer_down((300.0, 300.0), 0.0);
        marquee.tick(1.0);

        marquee.pointer_moved((100.0, 100.0), 1.1, VIEWPORT, CONTENT);
        let band = marquee.band().unwrap();
        assert!(band.contains((150.0, 150.0)));

        marquee.pointer_moved((500.0, 500.0), 1.2, VIEWPORT, CONTENT);
        let band = marquee.band().unwrap();
        assert!(band.contains((400.0, 400.0)));
        assert!(!band.contains((100.0, 100.0)));
    }

    #[test]
    fn near_edge_requests_auto_scroll() {
        let mut marquee = MarqueeController::default();
        marquee.pointer_down((400.0, 300.0), 0.0);
        marquee.tick(1.0);

        marquee.pointer_moved((780.0, 580.0), 1.0, VIEWPORT, CONTENT);
        assert!(marquee.auto_scroll_tick(1.0).is_none());
        let (dx, dy) = marquee.auto_scroll_tick(1.0 + AUTO_SCROLL_INTERVAL).unwrap();
        assert_eq!(dx, AUTO_SCROLL_THRESHOLD);
        assert_eq!(dy, AUTO_SCROLL_THRESHOLD);
        let pointer = marquee.auto_scroll_applied((dx, dy)).unwrap();
        assert_eq!(pointer, (880.0, 680.0));
    }

    #[test]
    fn pointer_advances_by_applied_scroll_only() {
        let mut marquee = MarqueeController::default();
        marquee.pointer_down((400.0, 300.0), 0.0);
        marquee.tick(1.0);
        marquee.pointer_moved((780.0, 300.0), 1.0, VIEWPORT, CONTENT);

        let (dx, _) = marquee.auto_scroll_tick(1.0 + AUTO_SCROLL_INTERVAL).unwrap();
        assert_eq!(dx, AUTO_SCROLL_THRESHOLD);
        // The viewport hit the content edge and only moved 20 px.
        let pointer = marquee.auto_scroll_applied((20.0, 0.0)).unwrap();
        assert_eq!(pointer, (800.0, 300.0));
    }

    #[test]
    fn no_auto_scroll_past_content_bounds() {
        let mut marquee = MarqueeController::default();
        marquee.pointer_down((400.0, 300.0), 0.0);
        marquee.tick(1.0);

        // Viewport already shows the content's right/bottom edge.
        let viewport = Rect::new(1200.0, 1400.0, 800.0, 600.0);
        marquee.pointer_moved((1980.0, 1980.0), 1.0, viewport, CONTENT);
        assert!(marquee.auto_scroll_tick(10.0).is_none());
    }

    #[test]
    fn release_stops_auto_scroll() {
        let mut marquee = MarqueeController::default();
        marquee.pointer_down((400.0, 300.0), 0.0);
        marquee.tick(1.0);
        marquee.pointer_moved((780.0, 300.0), 1.0, VIEWPORT, CONTENT);
        marquee.pointer_up();
        assert!(marquee.auto_scroll_tick(10.0).is_none());
        assert!(!marquee.scroll_frozen());
    }
}
