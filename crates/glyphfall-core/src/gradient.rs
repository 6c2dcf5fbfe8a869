//! Color gradients built from interpolated stops.

use std::collections::HashMap;
use std::str::FromStr;

use crate::color::Color;
use crate::coord::Coord;
use crate::error::{CoreError, CoreResult};
use crate::geometry::find_normalized_distance_from_center;

/// How a gradient is laid across a rectangle of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GradientDirection {
    /// Top row to bottom row.
    #[default]
    Vertical,
    /// Left column to right column.
    Horizontal,
    /// Top-left corner to bottom-right corner.
    Diagonal,
    /// Center outwards.
    Radial,
}

impl FromStr for GradientDirection {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vertical" => Ok(GradientDirection::Vertical),
            "horizontal" => Ok(GradientDirection::Horizontal),
            "diagonal" => Ok(GradientDirection::Diagonal),
            "radial" => Ok(GradientDirection::Radial),
            _ => Err(CoreError::InvalidDirection(s.to_string())),
        }
    }
}

/// A precomputed sequence of colors between one or more stops.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    stops: Vec<Color>,
    spectrum: Vec<Color>,
}

impl Gradient {
    /// Build a gradient.
    ///
    /// The spectrum starts at the first stop; each consecutive pair of stops
    /// then contributes `steps[i]` colors ending on the second stop. When
    /// fewer step counts than pairs are given the last count repeats. A
    /// looping gradient also blends from the last stop back to the first.
    pub fn new(stops: &[Color], steps: &[usize], looping: bool) -> CoreResult<Self> {
        let Some(&first) = stops.first() else {
            return Err(CoreError::EmptyGradient);
        };
        if steps.is_empty() || steps.contains(&0) {
            return Err(CoreError::ZeroGradientSteps);
        }

        let mut stops_to_blend = stops.to_vec();
        if looping && stops.len() > 1 {
            stops_to_blend.push(first);
        }

        let mut spectrum = vec![first];
        for (pair_index, pair) in stops_to_blend.windows(2).enumerate() {
            let step_count = steps[pair_index.min(steps.len() - 1)];
            for step in 1..=step_count {
                let t = step as f64 / step_count as f64;
                spectrum.push(pair[0].lerp(pair[1], t));
            }
        }

        Ok(Self {
            stops: stops.to_vec(),
            spectrum,
        })
    }

    /// A gradient holding a single color.
    pub fn solid(color: Color) -> Self {
        Self {
            stops: vec![color],
            spectrum: vec![color],
        }
    }

    /// The stops this gradient was built from.
    pub fn stops(&self) -> &[Color] {
        &self.stops
    }

    /// Every color in order.
    pub fn spectrum(&self) -> &[Color] {
        &self.spectrum
    }

    /// The first color of the spectrum.
    pub fn first(&self) -> Color {
        self.spectrum[0]
    }

    /// The last color of the spectrum.
    pub fn last(&self) -> Color {
        self.spectrum[self.spectrum.len() - 1]
    }

    /// The color at `fraction` (clamped to 0-1) of the spectrum.
    pub fn color_at_fraction(&self, fraction: f64) -> Color {
        let fraction = fraction.clamp(0.0, 1.0);
        let index = (fraction * (self.spectrum.len() - 1) as f64).round() as usize;
        self.spectrum[index]
    }

    /// Map every cell of a rectangle to a color.
    ///
    /// Bounds are inclusive.
    pub fn build_coordinate_color_mapping(
        &self,
        min_row: i32,
        max_row: i32,
        min_column: i32,
        max_column: i32,
        direction: GradientDirection,
    ) -> HashMap<Coord, Color> {
        let fraction_of = |value: i32, min: i32, max: i32| {
            if max <= min {
                1.0
            } else {
                (value - min) as f64 / (max - min) as f64
            }
        };

        let mut mapping = HashMap::new();
        for row in min_row..=max_row {
            for column in min_column..=max_column {
                let coord = Coord::new(column, row);
                let fraction = match direction {
                    GradientDirection::Vertical => fraction_of(row, min_row, max_row),
                    GradientDirection::Horizontal => fraction_of(column, min_column, max_column),
                    GradientDirection::Diagonal => {
                        (fraction_of(row, min_row, max_row)
                            + fraction_of(column, min_column, max_column))
                            / 2.0
                    }
                    GradientDirection::Radial => find_normalized_distance_from_center(
                        min_row, max_row, min_column, max_column, coord,
                    ),
                };
                mapping.insert(coord, self.color_at_fraction(fraction));
            }
        }
        mapping
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: Color = Color::Rgb(0, 0, 0);
    const WHITE: Color = Color::Rgb(255, 255, 255);
    const RED: Color = Color::Rgb(255, 0, 0);

    #[test]
    fn spectrum_starts_and_ends_on_stops() {
        let gradient = Gradient::new(&[BLACK, WHITE], &[4], false).unwrap();
        assert_eq!(gradient.spectrum().len(), 5);
        assert_eq!(gradient.first(), BLACK);
        assert_eq!(gradient.last(), WHITE);
        assert_eq!(gradient.spectrum()[2], Color::Rgb(128, 128, 128));
    }

    #[test]
    fn last_step_count_repeats() {
        let gradient = Gradient::new(&[BLACK, WHITE, RED], &[2], false).unwrap();
        assert_eq!(gradient.spectrum().len(), 5);
        assert_eq!(gradient.spectrum()[2], WHITE);
        assert_eq!(gradient.last(), RED);
    }

    #[test]
    fn looping_returns_to_first_stop() {
        let gradient = Gradient::new(&[BLACK, WHITE], &[2], true).unwrap();
        assert_eq!(gradient.spectrum().len(), 5);
        assert_eq!(gradient.last(), BLACK);
    }

    #[test]
    fn single_stop_is_solid() {
        let gradient = Gradient::new(&[RED], &[10], false).unwrap();
        assert_eq!(gradient.spectrum(), &[RED]);
        assert_eq!(gradient.color_at_fraction(0.7), RED);
        assert_eq!(gradient, Gradient::solid(RED));
    }

    #[test]
    fn invalid_construction_is_rejected() {
        assert_eq!(Gradient::new(&[], &[4], false), Err(CoreError::EmptyGradient));
        assert_eq!(
            Gradient::new(&[BLACK, WHITE], &[0], false),
            Err(CoreError::ZeroGradientSteps)
        );
        assert_eq!(
            Gradient::new(&[BLACK, WHITE], &[], false),
            Err(CoreError::ZeroGradientSteps)
        );
    }

    #[test]
    fn fraction_lookup_clamps() {
        let gradient = Gradient::new(&[BLACK, WHITE], &[10], false).unwrap();
        assert_eq!(gradient.color_at_fraction(-1.0), BLACK);
        assert_eq!(gradient.color_at_fraction(2.0), WHITE);
    }

    #[test]
    fn coordinate_mapping_follows_direction() {
        let gradient = Gradient::new(&[BLACK, WHITE], &[10], false).unwrap();

        let vertical = gradient.build_coordinate_color_mapping(0, 4, 0, 9, GradientDirection::Vertical);
        assert_eq!(vertical.len(), 50);
        assert_eq!(vertical[&Coord::new(9, 0)], BLACK);
        assert_eq!(vertical[&Coord::new(0, 4)], WHITE);

        let horizontal =
            gradient.build_coordinate_color_mapping(0, 4, 0, 9, GradientDirection::Horizontal);
        assert_eq!(horizontal[&Coord::new(0, 4)], BLACK);
        assert_eq!(horizontal[&Coord::new(9, 0)], WHITE);

        let radial = gradient.build_coordinate_color_mapping(0, 4, 0, 8, GradientDirection::Radial);
        assert_eq!(radial[&Coord::new(4, 2)], BLACK);
        assert_eq!(radial[&Coord::new(0, 0)], WHITE);
    }

    #[test]
    fn direction_names_parse() {
        assert_eq!("Radial".parse::<GradientDirection>(), Ok(GradientDirection::Radial));
        assert!("sideways".parse::<GradientDirection>().is_err());
    }
}
