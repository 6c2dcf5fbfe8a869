//! Geometry helpers used to build paths and place characters.
//!
//! Terminal cells are roughly twice as tall as they are wide, so helpers that
//! produce visually round shapes stretch the column axis by a factor of two.

use std::collections::HashSet;
use std::f64::consts::PI;

use crate::Coord;

/// Samples used to approximate the length of a bezier curve.
const BEZIER_LENGTH_SAMPLES: usize = 10;

/// Euclidean distance between two coordinates.
///
/// With `double_row_diff` the row delta counts twice, approximating the
/// visual distance on a terminal grid.
pub fn find_length_of_line(a: Coord, b: Coord, double_row_diff: bool) -> f64 {
    let dc = (b.column - a.column) as f64;
    let mut dr = (b.row - a.row) as f64;
    if double_row_diff {
        dr *= 2.0;
    }
    dc.hypot(dr)
}

/// The cell at fraction `t` of the straight line from `start` to `end`.
pub fn find_coord_on_line(start: Coord, end: Coord, t: f64) -> Coord {
    let (column, row) = point_on_line(start, end, t);
    Coord::new(column.round() as i32, row.round() as i32)
}

/// The cell at fraction `t` of the quadratic bezier curve `start -> end`.
pub fn find_coord_on_bezier_curve(start: Coord, control: Coord, end: Coord, t: f64) -> Coord {
    let (column, row) = point_on_bezier(start, control, end, t);
    Coord::new(column.round() as i32, row.round() as i32)
}

/// Approximate length of the quadratic bezier curve `start -> end`.
pub fn find_length_of_bezier_curve(start: Coord, control: Coord, end: Coord) -> f64 {
    let mut length = 0.0;
    let mut previous = (start.column as f64, start.row as f64);
    for sample in 1..=BEZIER_LENGTH_SAMPLES {
        let t = sample as f64 / BEZIER_LENGTH_SAMPLES as f64;
        let point = point_on_bezier(start, control, end, t);
        length += (point.0 - previous.0).hypot(point.1 - previous.1);
        previous = point;
    }
    length
}

/// `num_points` cells spaced evenly around a circle.
///
/// With `unique`, cells that round to an already produced coordinate are
/// skipped, so fewer than `num_points` cells may be returned.
pub fn find_coords_on_circle(
    origin: Coord,
    radius: f64,
    num_points: usize,
    unique: bool,
) -> Vec<Coord> {
    let mut coords = Vec::with_capacity(num_points);
    let mut seen = HashSet::new();
    if num_points == 0 {
        return coords;
    }

    let angle_step = 2.0 * PI / num_points as f64;
    for i in 0..num_points {
        let angle = i as f64 * angle_step;
        let column = origin.column as f64 + 2.0 * radius * angle.cos();
        let row = origin.row as f64 + radius * angle.sin();
        let coord = Coord::new(column.round() as i32, row.round() as i32);
        if unique && !seen.insert(coord) {
            continue;
        }
        coords.push(coord);
    }
    coords
}

/// Every cell inside an aspect-corrected circle of the given diameter.
///
/// The shape spans `diameter` columns and `diameter / 2` rows on each side of
/// `center`.
pub fn find_coords_in_circle(center: Coord, diameter: i32) -> Vec<Coord> {
    let x_radius = diameter.max(0);
    let y_radius = x_radius / 2;
    if x_radius == 0 {
        return vec![center];
    }

    let mut coords = Vec::new();
    for row in (center.row - y_radius)..=(center.row + y_radius) {
        for column in (center.column - x_radius)..=(center.column + x_radius) {
            let dx = (column - center.column) as f64 / x_radius as f64;
            let dy = if y_radius == 0 {
                0.0
            } else {
                (row - center.row) as f64 / y_radius as f64
            };
            if dx * dx + dy * dy <= 1.0 {
                coords.push(Coord::new(column, row));
            }
        }
    }
    coords
}

/// Every cell within `distance` columns and rows of `origin`.
pub fn find_coords_in_rect(origin: Coord, distance: i32) -> Vec<Coord> {
    let distance = distance.max(0);
    let mut coords = Vec::new();
    for row in (origin.row - distance)..=(origin.row + distance) {
        for column in (origin.column - distance)..=(origin.column + distance) {
            coords.push(Coord::new(column, row));
        }
    }
    coords
}

/// The cell `distance` away from `origin` in the direction of `target`.
///
/// The result may lie beyond `target`. Coincident points return `origin`.
pub fn find_coord_at_distance(origin: Coord, target: Coord, distance: f64) -> Coord {
    let length = find_length_of_line(origin, target, false);
    if length == 0.0 {
        return origin;
    }
    find_coord_on_line(origin, target, distance / length)
}

/// Distance of `coord` from the center of a rectangle, normalized to 0-1.
///
/// Rows count double so the measure follows the visual shape of the area.
pub fn find_normalized_distance_from_center(
    min_row: i32,
    max_row: i32,
    min_column: i32,
    max_column: i32,
    coord: Coord,
) -> f64 {
    let center_column = (min_column + max_column) as f64 / 2.0;
    let center_row = (min_row + max_row) as f64 / 2.0;
    let max_distance = (max_column as f64 - center_column).hypot((max_row as f64 - center_row) * 2.0);
    if max_distance == 0.0 {
        return 0.0;
    }
    let distance =
        (coord.column as f64 - center_column).hypot((coord.row as f64 - center_row) * 2.0);
    (distance / max_distance).clamp(0.0, 1.0)
}

fn point_on_line(start: Coord, end: Coord, t: f64) -> (f64, f64) {
    let column = start.column as f64 + (end.column - start.column) as f64 * t;
    let row = start.row as f64 + (end.row - start.row) as f64 * t;
    (column, row)
}

fn point_on_bezier(start: Coord, control: Coord, end: Coord, t: f64) -> (f64, f64) {
    let u = 1.0 - t;
    let blend = |a: i32, b: i32, c: i32| u * u * a as f64 + 2.0 * u * t * b as f64 + t * t * c as f64;
    (
        blend(start.column, control.column, end.column),
        blend(start.row, control.row, end.row),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_length_and_row_doubling() {
        let a = Coord::new(0, 0);
        let b = Coord::new(3, 4);
        assert_eq!(find_length_of_line(a, b, false), 5.0);
        assert_eq!(find_length_of_line(a, Coord::new(0, 2), true), 4.0);
    }

    #[test]
    fn coord_on_line_endpoints_and_midpoint() {
        let start = Coord::new(0, 0);
        let end = Coord::new(10, 4);
        assert_eq!(find_coord_on_line(start, end, 0.0), start);
        assert_eq!(find_coord_on_line(start, end, 1.0), end);
        assert_eq!(find_coord_on_line(start, end, 0.5), Coord::new(5, 2));
    }

    #[test]
    fn bezier_passes_through_endpoints() {
        let start = Coord::new(0, 0);
        let control = Coord::new(5, 10);
        let end = Coord::new(10, 0);
        assert_eq!(find_coord_on_bezier_curve(start, control, end, 0.0), start);
        assert_eq!(find_coord_on_bezier_curve(start, control, end, 1.0), end);
        assert_eq!(find_coord_on_bezier_curve(start, control, end, 0.5), Coord::new(5, 5));
    }

    #[test]
    fn straight_bezier_has_line_length() {
        let start = Coord::new(0, 0);
        let end = Coord::new(10, 0);
        let length = find_length_of_bezier_curve(start, Coord::new(5, 0), end);
        assert!((length - 10.0).abs() < 1e-9);
        assert!(find_length_of_bezier_curve(start, Coord::new(5, 8), end) > 10.0);
    }

    #[test]
    fn circle_points_are_stretched_horizontally() {
        let points = find_coords_on_circle(Coord::new(0, 0), 4.0, 4, false);
        assert_eq!(
            points,
            vec![
                Coord::new(8, 0),
                Coord::new(0, 4),
                Coord::new(-8, 0),
                Coord::new(0, -4)
            ]
        );
        assert!(find_coords_on_circle(Coord::new(0, 0), 0.0, 8, true).len() == 1);
        assert!(find_coords_on_circle(Coord::new(0, 0), 3.0, 0, true).is_empty());
    }

    #[test]
    fn filled_circle_contains_center_and_extremes() {
        let center = Coord::new(10, 10);
        let coords = find_coords_in_circle(center, 4);
        assert!(coords.contains(&center));
        assert!(coords.contains(&Coord::new(14, 10)));
        assert!(coords.contains(&Coord::new(10, 12)));
        assert!(!coords.contains(&Coord::new(14, 12)));
    }

    #[test]
    fn rect_is_square_around_origin() {
        assert_eq!(find_coords_in_rect(Coord::new(0, 0), 1).len(), 9);
        assert_eq!(find_coords_in_rect(Coord::new(0, 0), 0), vec![Coord::new(0, 0)]);
    }

    #[test]
    fn coord_at_distance_can_overshoot() {
        let origin = Coord::new(0, 0);
        let target = Coord::new(4, 0);
        assert_eq!(find_coord_at_distance(origin, target, 8.0), Coord::new(8, 0));
        assert_eq!(find_coord_at_distance(origin, origin, 8.0), origin);
    }

    #[test]
    fn normalized_distance_spans_zero_to_one() {
        assert_eq!(find_normalized_distance_from_center(0, 10, 0, 20, Coord::new(10, 5)), 0.0);
        assert_eq!(find_normalized_distance_from_center(0, 10, 0, 20, Coord::new(20, 10)), 1.0);
        assert_eq!(find_normalized_distance_from_center(3, 3, 3, 3, Coord::new(3, 3)), 0.0);
    }
}
