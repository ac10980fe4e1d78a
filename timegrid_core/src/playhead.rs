//! Draggable scalar position markers: the playhead and the range head.

use crate::geometry::{self, LayoutParams};

/// When the host is told about a new marker position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommitPolicy {
    /// Notify once when the drag ends, with the final position.
    #[default]
    OnGestureEnd,
    /// Notify on every quantized step while dragging.
    PerStep,
}

/// One draggable marker. Dragging steps the position by a quarter beat per
/// sub-beat threshold crossing, clamped to `[0, content right edge]`.
#[derive(Debug, Clone, Default)]
pub struct PlayheadController {
    position: f64,
    policy: CommitPolicy,
    accumulated: f32,
    dragging: bool,
}

impl PlayheadController {
    pub fn new(policy: CommitPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    /// Host-driven position update, outside of any gesture.
    pub fn set_position(&mut self, position: f64) {
        self.position = position.max(0.0);
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn begin_drag(&mut self) {
        self.dragging = true;
        self.accumulated = 0.0;
    }

    /// Feeds a horizontal drag delta. Returns the new position on each step
    /// when the policy is `PerStep`.
    pub fn drag(
        &mut self,
        delta_x: f32,
        params: &LayoutParams,
        content_width: f32,
    ) -> Option<f64> {
        if !self.dragging {
            return None;
        }
        self.accumulated += delta_x;
        let subbeat = params.subbeat_width();
        let mut stepped = false;

        while self.accumulated >= subbeat {
            if geometry::pixel_x(self.position + 0.25, params) <= content_width {
                self.position += 0.25;
                stepped = true;
            }
            self.accumulated -= subbeat;
        }
        while self.accumulated <= -subbeat {
            if self.position >= 0.25 {
                self.position -= 0.25;
                stepped = true;
            }
            self.accumulated += subbeat;
        }

        (stepped && self.policy == CommitPolicy::PerStep).then_some(self.position)
    }

    /// Ends (or cancels) the drag. Returns the final position when the
    /// policy is `OnGestureEnd`.
    pub fn end_drag(&mut self) -> Option<f64> {
        if !self.dragging {
            return None;
        }
        self.dragging = false;
        self.accumulated = 0.0;
        (self.policy == CommitPolicy::OnGestureEnd).then_some(self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_one_subbeat_per_threshold_crossing() {
        let params = LayoutParams::default(); // subbeat width 12.5
        let mut head = PlayheadController::new(CommitPolicy::OnGestureEnd);
        head.begin_drag();
        assert!(head.drag(13.0, &params, 1000.0).is_none());
        assert_eq!(head.position(), 0.25);
        head.drag(50.0, &params, 1000.0);
        assert_eq!(head.position(), 1.25);
        assert_eq!(head.end_drag(), Some(1.25));
    }

    #[test]
    fn never_goes_negative() {
        let params = LayoutParams::default();
        let mut head = PlayheadController::new(CommitPolicy::OnGestureEnd);
        head.begin_drag();
        head.drag(-500.0, &params, 1000.0);
        assert_eq!(head.position(), 0.0);
    }

    #[test]
    fn stops_at_content_right_edge() {
        let params = LayoutParams::default();
        let mut head = PlayheadController::new(CommitPolicy::OnGestureEnd);
        head.set_position(3.0);
        head.begin_drag();
        // Content ends at one bar: header 120 + 200 px.
        head.drag(500.0, &params, 320.0);
        assert_eq!(head.position(), 4.0);
    }

    #[test]
    fn per_step_policy_reports_every_step() {
        let params = LayoutParams::default();
        let mut head = PlayheadController::new(CommitPolicy::PerStep);
        head.begin_drag();
        assert_eq!(head.drag(13.0, &params, 1000.0), Some(0.25));
        assert_eq!(head.drag(5.0, &params, 1000.0), None);
        assert!(head.end_drag().is_none());
    }

    #[test]
    fn end_without_drag_is_silent() {
        let mut head = PlayheadController::default();
        assert!(head.end_drag().is_none());
    }
}
