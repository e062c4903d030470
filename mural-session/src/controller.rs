// Stroke state machine: Idle -> Drawing -> Idle.

use std::time::{Duration, Instant};

use mural_core::Point;
use tracing::{debug, trace};

use crate::emission::EmissionTask;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeState {
    Idle,
    Drawing,
}

#[derive(Debug, Clone)]
pub struct StrokeController {
    state: StrokeState,
    points: Vec<Point>,
    emission: EmissionTask,
}

impl StrokeController {
    pub fn new(emission_interval: Duration, max_emissions_per_tick: u32) -> Self {
        Self {
            state: StrokeState::Idle,
            points: Vec::new(),
            emission: EmissionTask::new(emission_interval, max_emissions_per_tick),
        }
    }

    /// Begin a stroke at `point`. The buffer starts with two coincident
    /// points so the first segment drawn has a real predecessor.
    pub fn pointer_down(&mut self, point: Point, continuous: bool, now: Instant) {
        self.emission.stop();
        self.points.clear();
        self.points.extend([point, point]);
        self.state = StrokeState::Drawing;
        if continuous {
            self.emission.start(now, point);
        }
        debug!(x = point.x, y = point.y, continuous, "stroke started");
    }

    /// Record a move. Returns the point to draw from, or `None` when idle.
    pub fn pointer_move(&mut self, point: Point) -> Option<Point> {
        if self.state != StrokeState::Drawing {
            return None;
        }
        let previous = self.points.last().copied();
        self.points.push(point);
        self.emission.move_to(point);
        trace!(x = point.x, y = point.y, points = self.points.len(), "stroke extended");
        previous
    }

    /// End the stroke on pointer-up or pointer-leave. Returns `true` when a
    /// stroke was actually in progress and must be committed.
    pub fn finish(&mut self) -> bool {
        self.emission.stop();
        if self.state != StrokeState::Drawing {
            return false;
        }
        debug!(points = self.points.len(), "stroke finished");
        self.points.clear();
        self.state = StrokeState::Idle;
        true
    }

    /// Stop any continuous emission without ending the stroke.
    pub fn halt_emission(&mut self) {
        self.emission.stop();
    }

    pub fn due_emissions(&mut self, now: Instant) -> u32 {
        self.emission.due(now)
    }

    pub fn state(&self) -> StrokeState {
        self.state
    }

    pub fn is_drawing(&self) -> bool {
        self.state == StrokeState::Drawing
    }

    pub fn is_emitting(&self) -> bool {
        self.emission.is_running()
    }

    /// Points of the stroke in progress; empty when idle.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Where continuous emission paints next; `None` when not emitting.
    pub fn emission_position(&self) -> Option<Point> {
        self.emission.position()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> StrokeController {
        StrokeController::new(Duration::from_millis(50), 8)
    }

    #[test]
    fn test_down_seeds_two_coincident_points() {
        let mut c = controller();
        let p = Point::new(5.0, 6.0);
        c.pointer_down(p, false, Instant::now());
        assert_eq!(c.state(), StrokeState::Drawing);
        assert_eq!(c.points(), &[p, p]);
        assert!(!c.is_emitting());
    }

    #[test]
    fn test_move_returns_previous_only_while_drawing() {
        let mut c = controller();
        assert_eq!(c.pointer_move(Point::new(1.0, 1.0)), None);

        c.pointer_down(Point::new(0.0, 0.0), false, Instant::now());
        assert_eq!(c.pointer_move(Point::new(3.0, 4.0)), Some(Point::new(0.0, 0.0)));
        assert_eq!(c.pointer_move(Point::new(6.0, 8.0)), Some(Point::new(3.0, 4.0)));
        assert_eq!(c.points().len(), 4);
    }

    #[test]
    fn test_finish_commits_once_and_stops_emission() {
        let mut c = controller();
        assert!(!c.finish());

        c.pointer_down(Point::new(0.0, 0.0), true, Instant::now());
        assert!(c.is_emitting());
        assert!(c.finish());
        assert!(!c.is_emitting());
        assert!(c.points().is_empty());
        assert!(!c.finish());
    }

    #[test]
    fn test_emission_position_follows_pointer() {
        let mut c = controller();
        c.pointer_down(Point::new(1.0, 2.0), false, Instant::now());
        c.pointer_move(Point::new(3.0, 4.0));
        assert_eq!(c.emission_position(), None);
        c.finish();

        c.pointer_down(Point::new(1.0, 2.0), true, Instant::now());
        assert_eq!(c.emission_position(), Some(Point::new(1.0, 2.0)));
        c.pointer_move(Point::new(3.0, 4.0));
        assert_eq!(c.emission_position(), Some(Point::new(3.0, 4.0)));
        c.halt_emission();
        assert_eq!(c.emission_position(), None);
        assert!(c.is_drawing());
    }
}
