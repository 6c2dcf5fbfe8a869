//! Waypoint paths and per-tick interpolation along them.

use glyphfall_core::geometry::{
    find_coord_on_bezier_curve, find_coord_on_line, find_length_of_bezier_curve,
    find_length_of_line,
};
use glyphfall_core::{Coord, Easing};

use crate::error::{EngineError, EngineResult};
use crate::event::{Event, FiredEvents};

/// Ceiling on the ticks a single segment may take.
pub const MAX_SEGMENT_STEPS: usize = 1 << 24;

/// A target cell within a [`Path`].
#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    /// Id unique within the owning path.
    pub id: String,
    /// Cell to reach.
    pub coord: Coord,
    /// Control point for a quadratic bezier approach, if any.
    pub bezier_control: Option<Coord>,
}

/// One leg of an active path, from the previous position to a waypoint.
#[derive(Debug, Clone)]
struct Segment {
    start: Coord,
    end: Coord,
    control: Option<Coord>,
    waypoint_id: String,
    distance: f64,
    steps: usize,
}

impl Segment {
    fn new(start: Coord, waypoint: &Waypoint, speed: f64) -> Self {
        let distance = match waypoint.bezier_control {
            Some(control) => find_length_of_bezier_curve(start, control, waypoint.coord),
            None => find_length_of_line(start, waypoint.coord, false),
        };
        // Short legs still take one tick rather than teleporting.
        let steps = ((distance / speed).round() as usize).clamp(1, MAX_SEGMENT_STEPS);
        Self {
            start,
            end: waypoint.coord,
            control: waypoint.bezier_control,
            waypoint_id: waypoint.id.clone(),
            distance,
            steps,
        }
    }

    fn coord_at(&self, factor: f64) -> Coord {
        match self.control {
            Some(control) => find_coord_on_bezier_curve(self.start, control, self.end, factor),
            None => find_coord_on_line(self.start, self.end, factor),
        }
    }
}

/// An ordered list of waypoints travelled at a fixed nominal speed.
///
/// A path is inert until its owning [`Motion`](crate::Motion) activates it.
/// Activation lays one segment from the character's current cell to the
/// first waypoint and one between each consecutive pair; each segment takes
/// `round(distance / speed)` ticks, at least one and at most
/// [`MAX_SEGMENT_STEPS`].
#[derive(Debug, Clone)]
pub struct Path {
    id: String,
    speed: f64,
    ease: Option<Easing>,
    layer: Option<i32>,
    hold_time: usize,
    looping: bool,
    waypoints: Vec<Waypoint>,
    segments: Vec<Segment>,
    segment_index: usize,
    segment_step: usize,
    current_step: usize,
    max_steps: usize,
    total_distance: f64,
    completed_distance: f64,
    distance_travelled: f64,
    hold_time_remaining: usize,
}

impl Path {
    /// Create an empty path travelling `speed` cells per tick.
    pub fn new(id: impl Into<String>, speed: f64) -> EngineResult<Self> {
        let id = id.into();
        if !speed.is_finite() || speed <= 0.0 {
            return Err(EngineError::InvalidSpeed { path_id: id, speed });
        }
        Ok(Self {
            id,
            speed,
            ease: None,
            layer: None,
            hold_time: 0,
            looping: false,
            waypoints: Vec::new(),
            segments: Vec::new(),
            segment_index: 0,
            segment_step: 0,
            current_step: 0,
            max_steps: 0,
            total_distance: 0.0,
            completed_distance: 0.0,
            distance_travelled: 0.0,
            hold_time_remaining: 0,
        })
    }

    /// Ease progress along each segment.
    pub fn set_ease(&mut self, ease: Easing) -> &mut Self {
        self.ease = Some(ease);
        self
    }

    /// Move the character to this layer when the path activates.
    pub fn set_layer(&mut self, layer: i32) -> &mut Self {
        self.layer = Some(layer);
        self
    }

    /// Ticks to wait on the final waypoint before completing.
    pub fn set_hold_time(&mut self, ticks: usize) -> &mut Self {
        self.hold_time = ticks;
        self
    }

    /// Restart from the first waypoint instead of completing.
    pub fn set_looping(&mut self, looping: bool) -> &mut Self {
        self.looping = looping;
        self
    }

    /// Append a waypoint.
    ///
    /// Without an explicit id the waypoint is named after the smallest unused
    /// integer starting at the current waypoint count.
    pub fn new_waypoint(
        &mut self,
        coord: Coord,
        bezier_control: Option<Coord>,
        waypoint_id: Option<&str>,
    ) -> EngineResult<&Waypoint> {
        let id = match waypoint_id {
            Some(id) => {
                if self.waypoint(id).is_some() {
                    return Err(EngineError::DuplicateWaypointId {
                        path_id: self.id.clone(),
                        waypoint_id: id.to_string(),
                    });
                }
                id.to_string()
            }
            None => {
                let mut next = self.waypoints.len();
                while self.waypoint(&next.to_string()).is_some() {
                    next += 1;
                }
                next.to_string()
            }
        };

        self.waypoints.push(Waypoint {
            id,
            coord,
            bezier_control,
        });
        Ok(&self.waypoints[self.waypoints.len() - 1])
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn ease(&self) -> Option<Easing> {
        self.ease
    }

    pub fn layer(&self) -> Option<i32> {
        self.layer
    }

    pub fn hold_time(&self) -> usize {
        self.hold_time
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Look up a waypoint by id.
    pub fn waypoint(&self, id: &str) -> Option<&Waypoint> {
        self.waypoints.iter().find(|waypoint| waypoint.id == id)
    }

    /// Ticks travelled since activation.
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// Ticks needed to reach the final waypoint from the activation origin.
    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Length of the active route, including the leg from the origin.
    pub fn total_distance(&self) -> f64 {
        self.total_distance
    }

    /// Distance covered so far, following the eased position.
    pub fn distance_travelled(&self) -> f64 {
        self.distance_travelled
    }

    pub fn hold_time_remaining(&self) -> usize {
        self.hold_time_remaining
    }

    /// Whether the final waypoint has been reached (holding may remain).
    pub fn is_travel_complete(&self) -> bool {
        self.segment_index >= self.segments.len()
    }

    /// Lay out segments from `origin` and reset all progress.
    pub(crate) fn activate(&mut self, origin: Coord) -> EngineResult<()> {
        if self.waypoints.is_empty() {
            return Err(EngineError::EmptyPath {
                path_id: self.id.clone(),
            });
        }
        self.restart(origin);
        Ok(())
    }

    /// Activation without the emptiness check; callers guarantee waypoints.
    pub(crate) fn restart(&mut self, origin: Coord) {
        let mut start = origin;
        self.segments = self
            .waypoints
            .iter()
            .map(|waypoint| {
                let segment = Segment::new(start, waypoint, self.speed);
                start = waypoint.coord;
                segment
            })
            .collect();
        self.max_steps = self
            .segments
            .iter()
            .fold(0, |total: usize, segment| total.saturating_add(segment.steps));
        self.total_distance = self.segments.iter().map(|segment| segment.distance).sum();
        self.segment_index = 0;
        self.segment_step = 0;
        self.current_step = 0;
        self.completed_distance = 0.0;
        self.distance_travelled = 0.0;
        self.hold_time_remaining = self.hold_time;
    }

    /// Drop all activation state.
    pub(crate) fn reset(&mut self) {
        self.segments.clear();
        self.segment_index = 0;
        self.segment_step = 0;
        self.current_step = 0;
        self.max_steps = 0;
        self.total_distance = 0.0;
        self.completed_distance = 0.0;
        self.distance_travelled = 0.0;
        self.hold_time_remaining = self.hold_time;
    }

    pub(crate) fn tick_hold(&mut self) {
        self.hold_time_remaining = self.hold_time_remaining.saturating_sub(1);
    }

    /// Advance one tick and return the new cell, or `None` once travel is
    /// complete.
    pub(crate) fn step(&mut self, fired: &mut FiredEvents) -> Option<Coord> {
        let segment = self.segments.get(self.segment_index)?;

        self.segment_step += 1;
        self.current_step += 1;
        if self.segment_step == 1 {
            fired.push((Event::SegmentEntered, segment.waypoint_id.clone()));
        }

        let linear = self.segment_step as f64 / segment.steps as f64;
        let factor = self.ease.map_or(linear, |ease| ease.apply(linear));
        self.distance_travelled = self.completed_distance + segment.distance * factor;

        if self.segment_step < segment.steps {
            return Some(segment.coord_at(factor));
        }

        let end = segment.end;
        fired.push((Event::WaypointReached, segment.waypoint_id.clone()));
        self.completed_distance += segment.distance;
        self.distance_travelled = self.completed_distance;
        self.segment_index += 1;
        self.segment_step = 0;
        Some(end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight_path(speed: f64, to: &[(i32, i32)]) -> Path {
        let mut path = Path::new("p", speed).unwrap();
        for &(column, row) in to {
            path.new_waypoint(Coord::new(column, row), None, None).unwrap();
        }
        path
    }

    #[test]
    fn speed_must_be_positive() {
        assert!(matches!(Path::new("p", 0.0), Err(EngineError::InvalidSpeed { .. })));
        assert!(matches!(Path::new("p", -1.0), Err(EngineError::InvalidSpeed { .. })));
        assert!(matches!(Path::new("p", f64::NAN), Err(EngineError::InvalidSpeed { .. })));
    }

    #[test]
    fn waypoint_ids_are_generated_and_checked() {
        let mut path = Path::new("p", 1.0).unwrap();
        path.new_waypoint(Coord::new(1, 0), None, Some("1")).unwrap();
        let auto = path.new_waypoint(Coord::new(2, 0), None, None).unwrap();
        assert_eq!(auto.id, "2");
        let auto = path.new_waypoint(Coord::new(3, 0), None, None).unwrap();
        assert_eq!(auto.id, "3");
        assert_eq!(
            path.new_waypoint(Coord::new(4, 0), None, Some("2")).unwrap_err(),
            EngineError::DuplicateWaypointId {
                path_id: "p".into(),
                waypoint_id: "2".into()
            }
        );
    }

    #[test]
    fn empty_path_cannot_activate() {
        let mut path = Path::new("p", 1.0).unwrap();
        assert_eq!(
            path.activate(Coord::new(0, 0)),
            Err(EngineError::EmptyPath { path_id: "p".into() })
        );
    }

    #[test]
    fn steps_follow_segment_distance() {
        let mut path = straight_path(2.0, &[(10, 0), (10, 3)]);
        path.activate(Coord::new(0, 0)).unwrap();
        // 10 / 2 = 5 steps, then 3 / 2 = 1.5 rounds to 2.
        assert_eq!(path.max_steps(), 7);
        assert_eq!(path.total_distance(), 13.0);
    }

    #[test]
    fn coincident_points_take_one_step() {
        let mut path = straight_path(1.0, &[(4, 4)]);
        path.activate(Coord::new(4, 4)).unwrap();
        assert_eq!(path.max_steps(), 1);

        let mut fired = Vec::new();
        assert_eq!(path.step(&mut fired), Some(Coord::new(4, 4)));
        assert!(path.is_travel_complete());
        assert_eq!(
            fired,
            vec![
                (Event::SegmentEntered, "0".to_string()),
                (Event::WaypointReached, "0".to_string())
            ]
        );
    }

    #[test]
    fn fast_speed_is_clamped_to_one_step() {
        let mut path = straight_path(50.0, &[(3, 0)]);
        path.activate(Coord::new(0, 0)).unwrap();
        assert_eq!(path.max_steps(), 1);
    }

    #[test]
    fn tiny_speed_is_capped_per_segment() {
        let mut path = straight_path(1e-300, &[(5, 0), (9, 0)]);
        path.activate(Coord::new(0, 0)).unwrap();
        assert_eq!(path.max_steps(), 2 * MAX_SEGMENT_STEPS);

        let mut fired = Vec::new();
        assert_eq!(path.step(&mut fired), Some(Coord::new(0, 0)));
        assert!(!path.is_travel_complete());
    }

    #[test]
    fn stepping_walks_cell_by_cell() {
        let mut path = straight_path(1.0, &[(4, 0)]);
        path.activate(Coord::new(0, 0)).unwrap();
        let mut fired = Vec::new();
        let cells: Vec<Coord> = (0..4).filter_map(|_| path.step(&mut fired)).collect();
        assert_eq!(
            cells,
            vec![Coord::new(1, 0), Coord::new(2, 0), Coord::new(3, 0), Coord::new(4, 0)]
        );
        assert_eq!(path.step(&mut fired), None);
        assert_eq!(path.distance_travelled(), 4.0);
    }

    #[test]
    fn easing_warps_position_not_step_count() {
        let mut path = straight_path(1.0, &[(10, 0)]);
        path.set_ease(Easing::InQuad);
        path.activate(Coord::new(0, 0)).unwrap();
        let mut fired = Vec::new();
        let first = path.step(&mut fired).unwrap();
        assert_eq!(first, Coord::new(0, 0));
        for _ in 0..8 {
            path.step(&mut fired);
        }
        assert_eq!(path.step(&mut fired), Some(Coord::new(10, 0)));
        assert_eq!(path.current_step(), 10);
    }

    #[test]
    fn bezier_segment_bends_through_control() {
        let mut path = Path::new("arc", 1.0).unwrap();
        path.new_waypoint(Coord::new(10, 0), Some(Coord::new(5, 10)), None)
            .unwrap();
        path.activate(Coord::new(0, 0)).unwrap();
        let mut fired = Vec::new();
        let cells: Vec<Coord> = std::iter::from_fn(|| path.step(&mut fired)).collect();
        assert_eq!(cells.last(), Some(&Coord::new(10, 0)));
        assert!(cells.iter().any(|coord| coord.row >= 4));
    }
}
