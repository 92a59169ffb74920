//! Crop rectangle resolution from two reference points.
//!
//! A crop is given as two points. When both share an x-coordinate they mark a
//! vertical span, when both share a y-coordinate a horizontal span; the other
//! axis is then derived from the target aspect ratio. Any other pair is taken
//! as the rectangle's corners verbatim.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::{OffimgError, Result};

static RE_CROP_POINTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([+-]?\d+)\s*:\s*([+-]?\d+)\s*,\s*([+-]?\d+)\s*:\s*([+-]?\d+)\s*$").unwrap()
});

/// A pixel coordinate in the source image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl<T> From<(T, T)> for Point
where
    T: Into<i32>,
{
    fn from(value: (T, T)) -> Self {
        Point {
            x: value.0.into(),
            y: value.1.into(),
        }
    }
}

/// A resolved crop region, `min` inclusive and `max` exclusive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rectangle {
    pub min: Point,
    pub max: Point,
}

impl Rectangle {
    pub fn new(min: impl Into<Point>, max: impl Into<Point>) -> Self {
        Self {
            min: min.into(),
            max: max.into(),
        }
    }

    pub fn width(&self) -> i64 {
        i64::from(self.max.x) - i64::from(self.min.x)
    }

    pub fn height(&self) -> i64 {
        i64::from(self.max.y) - i64::from(self.min.y)
    }

    /// True when the rectangle has zero or negative extent on either axis.
    pub fn is_empty(&self) -> bool {
        self.max.x <= self.min.x || self.max.y <= self.min.y
    }

    /// Overlap of two rectangles. Empty inputs yield an empty result.
    pub fn intersect(&self, other: &Rectangle) -> Rectangle {
        Rectangle {
            min: Point::new(self.min.x.max(other.min.x), self.min.y.max(other.min.y)),
            max: Point::new(self.max.x.min(other.max.x), self.max.y.min(other.max.y)),
        }
    }
}

/// Two user-supplied reference points describing a crop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CropSpec {
    pub point_one: Point,
    pub point_two: Point,
}

impl CropSpec {
    pub fn new(point_one: impl Into<Point>, point_two: impl Into<Point>) -> Self {
        Self {
            point_one: point_one.into(),
            point_two: point_two.into(),
        }
    }

    /// Complete the spec into a rectangle with the given `width / height`
    /// aspect ratio.
    ///
    /// The points are updated in place: a descending span has its coordinates
    /// swapped, and `point_two` is extended along the derived axis. Derived
    /// spans are truncated toward zero. Spans are computed in 64 bits; a derived
    /// corner outside the `i32` range is a geometry error and leaves `self`
    /// untouched.
    ///
    /// Fully specified corners are returned without reordering, so a caller
    /// passing bottom-right before top-left gets an empty rectangle back.
    pub fn resolve(&mut self, target_aspect: f64) -> Result<Rectangle> {
        let (one, two) = (self.point_one, self.point_two);
        if one.x == two.x {
            let y_span = i64::from(two.y) - i64::from(one.y);
            if y_span == 0 {
                return Err(OffimgError::Geometry("both points are the same".into()));
            }
            let x_span = (y_span.abs() as f64 * target_aspect) as i64;
            let max_x = extend(two.x, x_span, "x")?;
            if y_span < 0 {
                std::mem::swap(&mut self.point_one.y, &mut self.point_two.y);
            }
            self.point_two.x = max_x;
        } else if one.y == two.y {
            let x_span = i64::from(two.x) - i64::from(one.x);
            let y_span = (x_span.abs() as f64 / target_aspect) as i64;
            let max_y = extend(two.y, y_span, "y")?;
            if x_span < 0 {
                std::mem::swap(&mut self.point_one.x, &mut self.point_two.x);
            }
            self.point_two.y = max_y;
        }

        let rect = Rectangle {
            min: self.point_one,
            max: self.point_two,
        };
        debug!(
            min_x = rect.min.x,
            min_y = rect.min.y,
            max_x = rect.max.x,
            max_y = rect.max.y,
            target_aspect,
            "Resolved crop rectangle"
        );
        Ok(rect)
    }
}

/// `coord + span`, or a geometry error when the corner leaves the `i32` range.
fn extend(coord: i32, span: i64, axis: &str) -> Result<i32> {
    i64::from(coord)
        .checked_add(span)
        .and_then(|v| i32::try_from(v).ok())
        .ok_or_else(|| {
            OffimgError::Geometry(format!(
                "derived {axis} coordinate {coord} + {span} is out of range"
            ))
        })
}

impl FromStr for CropSpec {
    type Err = OffimgError;

    /// Parse `x1:y1,x2:y2`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || OffimgError::InvalidCropSpec(s.to_string());
        let caps = RE_CROP_POINTS.captures(s).ok_or_else(invalid)?;
        let mut coords = [0i32; 4];
        for (i, coord) in coords.iter_mut().enumerate() {
            *coord = caps[i + 1].parse().map_err(|_| invalid())?;
        }
        Ok(CropSpec::new((coords[0], coords[1]), (coords[2], coords[3])))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DISPLAY_ASPECT: f64 = 400.0 / 240.0;

    #[test]
    fn test_vertical_span_extends_right() {
        let mut spec = CropSpec::new((10, 10), (10, 50));
        let rect = spec.resolve(DISPLAY_ASPECT).unwrap();
        // 40 * 1.6667 = 66.67 -> 66
        assert_eq!(rect, Rectangle::new((10, 10), (76, 50)));
    }

    #[test]
    fn test_vertical_span_descending_swaps_y() {
        let mut spec = CropSpec::new((10, 50), (10, 10));
        let rect = spec.resolve(DISPLAY_ASPECT).unwrap();
        assert_eq!(rect, Rectangle::new((10, 10), (76, 50)));
        assert_eq!(spec.point_one, Point::new(10, 10));
        assert_eq!(spec.point_two, Point::new(76, 50));
    }

    #[test]
    fn test_same_point_is_geometry_error() {
        let mut spec = CropSpec::new((10, 10), (10, 10));
        let err = spec.resolve(DISPLAY_ASPECT).unwrap_err();
        assert!(matches!(err, OffimgError::Geometry(_)));
        assert_eq!(err.to_string(), "crop: both points are the same");
    }

    #[test]
    fn test_horizontal_span_extends_down() {
        let mut spec = CropSpec::new((10, 10), (30, 10));
        let rect = spec.resolve(2.0).unwrap();
        assert_eq!(rect, Rectangle::new((10, 10), (30, 20)));
    }

    #[test]
    fn test_horizontal_span_descending_swaps_x() {
        let mut spec = CropSpec::new((30, 10), (10, 10));
        let rect = spec.resolve(2.0).unwrap();
        assert_eq!(rect, Rectangle::new((10, 10), (30, 20)));
    }

    #[test]
    fn test_derived_span_truncates() {
        // 7 / 2.0 = 3.5 -> 3
        let mut spec = CropSpec::new((0, 0), (7, 0));
        let rect = spec.resolve(2.0).unwrap();
        assert_eq!(rect.max, Point::new(7, 3));

        // 3 * 1.5 = 4.5 -> 4
        let mut spec = CropSpec::new((0, 0), (0, 3));
        let rect = spec.resolve(1.5).unwrap();
        assert_eq!(rect.max, Point::new(4, 3));
    }

    #[test]
    fn test_vertical_span_past_i32_is_geometry_error() {
        let mut spec: CropSpec = "10:0,10:2000000000".parse().unwrap();
        let err = spec.resolve(DISPLAY_ASPECT).unwrap_err();
        assert!(matches!(err, OffimgError::Geometry(_)));
        assert!(err.to_string().contains("out of range"));
        // nothing is updated on failure
        assert_eq!(spec, CropSpec::new((10, 0), (10, 2_000_000_000)));
    }

    #[test]
    fn test_full_i32_height_span() {
        let mut spec: CropSpec = "0:-2147483648,0:2147483647".parse().unwrap();
        let err = spec.resolve(DISPLAY_ASPECT).unwrap_err();
        assert!(matches!(err, OffimgError::Geometry(_)));

        // the span itself needs 64 bits, the derived width fits
        let mut spec = CropSpec::new((0, i32::MAX), (0, i32::MIN));
        let rect = spec.resolve(1e-9).unwrap();
        assert_eq!(rect, Rectangle::new((0, i32::MIN), (4, i32::MAX)));
        assert_eq!(rect.height(), 4_294_967_295);
    }

    #[test]
    fn test_horizontal_span_past_i32_is_geometry_error() {
        let mut spec = CropSpec::new((0, 2_147_483_600), (100, 2_147_483_600));
        let err = spec.resolve(1.0).unwrap_err();
        assert!(matches!(err, OffimgError::Geometry(_)));

        let mut spec = CropSpec::new((i32::MAX, 0), (i32::MIN, 0));
        assert!(spec.resolve(0.5).is_err());
    }

    #[test]
    fn test_full_rectangle_used_verbatim() {
        let mut spec = CropSpec::new((5, 6), (105, 66));
        let rect = spec.resolve(DISPLAY_ASPECT).unwrap();
        assert_eq!(rect, Rectangle::new((5, 6), (105, 66)));
        assert!(!rect.is_empty());
    }

    #[test]
    fn test_full_rectangle_not_normalized() {
        let mut spec = CropSpec::new((105, 66), (5, 6));
        let rect = spec.resolve(DISPLAY_ASPECT).unwrap();
        assert_eq!(rect.min, Point::new(105, 66));
        assert_eq!(rect.max, Point::new(5, 6));
        assert!(rect.is_empty());
    }

    #[test]
    fn test_rectangle_intersect() {
        let a = Rectangle::new((0, 0), (100, 50));
        let b = Rectangle::new((-10, 20), (40, 90));
        assert_eq!(a.intersect(&b), Rectangle::new((0, 20), (40, 50)));

        let disjoint = Rectangle::new((200, 200), (300, 300));
        assert!(a.intersect(&disjoint).is_empty());
    }

    #[test]
    fn test_parse_crop_points() {
        let spec: CropSpec = "10:20,30:40".parse().unwrap();
        assert_eq!(spec, CropSpec::new((10, 20), (30, 40)));

        let spec: CropSpec = " -5:+6 , 7:8 ".parse().unwrap();
        assert_eq!(spec, CropSpec::new((-5, 6), (7, 8)));
    }

    #[test]
    fn test_parse_crop_points_rejects_malformed() {
        for input in ["", "10:20", "10:20,30", "a:b,c:d", "10;20,30;40", "1:2,3:4,5:6"] {
            let err = input.parse::<CropSpec>().unwrap_err();
            assert!(
                matches!(err, OffimgError::InvalidCropSpec(ref s) if s == input),
                "input {input:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_parse_crop_points_overflow() {
        let err = "99999999999:0,1:1".parse::<CropSpec>().unwrap_err();
        assert!(matches!(err, OffimgError::InvalidCropSpec(_)));
    }
}
