//! Decoded ROI record and its geometry types.

use serde::Serialize;

use super::kind::{RoiOptions, RoiSubtype, RoiType};

/// Bounding box from the fixed header, in image pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Bounds {
    pub top: i32,
    pub left: i32,
    pub bottom: i32,
    pub right: i32,
}

impl Bounds {
    /// Width derived as `right - left`.
    #[inline]
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    /// Height derived as `bottom - top`.
    #[inline]
    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// The header's line endpoints.
///
/// Meaningful for Line ROIs and for ellipses stored as Freehand + Ellipse,
/// where they are the ellipse's defining points. Always present on disk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct LineEndpoints {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

/// A point in absolute image coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Inclusive min/max pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    #[inline]
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Smallest range covering both.
    pub fn union(&self, other: &Range) -> Range {
        Range {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

/// Header bytes 52..56, whose meaning depends on `(roi_type, subtype)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeAttributes {
    /// Freehand + Ellipse: the ellipse's aspect ratio.
    Ellipse { aspect_ratio: f32 },
    /// Every other combination: arrow style, arrow head size, and the
    /// rounded-rectangle arc size.
    Standard {
        arrow_style: u8,
        arrow_head_size: u8,
        arc_size: i32,
    },
}

/// Arrow attributes derived from the options field of a Line + Arrow ROI.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ArrowFlags {
    pub double_headed: bool,
    pub outline: bool,
}

impl ArrowFlags {
    pub fn from_options(options: RoiOptions) -> Self {
        Self {
            double_headed: options.contains(RoiOptions::DOUBLE_HEADED),
            outline: options.contains(RoiOptions::OUTLINE),
        }
    }
}

/// One decoded ROI.
///
/// Produced whole by a single successful decode; which optional fields are
/// populated follows from `roi_type` and `subtype`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RoiRecord {
    /// File stem with any `.roi` suffix removed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Header format version. Read but only checked when a minimum is configured.
    pub version: i32,

    pub roi_type: RoiType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtype: Option<RoiSubtype>,

    pub bounds: Bounds,

    pub line: LineEndpoints,

    pub stroke_width: i32,

    /// Always zero: nonzero values are rejected during decoding.
    pub shape_roi_size: i32,

    pub stroke_color: i32,

    pub fill_color: i32,

    /// 1-based stack slice the ROI belongs to (0 when unset).
    pub position: i32,

    /// Absent (not empty) for Line ROIs other than arrows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<RoiOptions>,

    pub shape: ShapeAttributes,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrow: Option<ArrowFlags>,

    /// Absolute coordinates. Empty for Rect, Oval, and NoRoi.
    pub coordinates: Vec<Coordinate>,

    pub x_range: Range,

    pub y_range: Range,
}

impl RoiRecord {
    #[inline]
    pub fn width(&self) -> i32 {
        self.bounds.width()
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.bounds.height()
    }

    /// Aspect ratio for ellipse ROIs.
    pub fn aspect_ratio(&self) -> Option<f32> {
        match self.shape {
            ShapeAttributes::Ellipse { aspect_ratio } => Some(aspect_ratio),
            ShapeAttributes::Standard { .. } => None,
        }
    }

    /// Returns true if this is a Line ROI carrying the Arrow subtype.
    pub fn is_arrow(&self) -> bool {
        self.roi_type == RoiType::Line && self.subtype == Some(RoiSubtype::Arrow)
    }
}

/// Computes x/y extents for a record.
///
/// Bounds-only types, and coordinate types with no points, use the header
/// bounds. Everything else uses the coordinate extremes.
pub(crate) fn derive_ranges(
    roi_type: RoiType,
    bounds: &Bounds,
    coordinates: &[Coordinate],
) -> (Range, Range) {
    if roi_type.is_bounds_only() || coordinates.is_empty() {
        return (
            Range::new(bounds.left as f64, bounds.right as f64),
            Range::new(bounds.top as f64, bounds.bottom as f64),
        );
    }

    let mut x = Range::new(f64::INFINITY, f64::NEG_INFINITY);
    let mut y = Range::new(f64::INFINITY, f64::NEG_INFINITY);
    for c in coordinates {
        x.min = x.min.min(c.x);
        x.max = x.max.max(c.x);
        y.min = y.min.min(c.y);
        y.max = y.max.max(c.y);
    }
    (x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_dimensions() {
        let bounds = Bounds {
            top: 10,
            left: 20,
            bottom: 50,
            right: 80,
        };
        assert_eq!(bounds.width(), 60);
        assert_eq!(bounds.height(), 40);
    }

    #[test]
    fn ranges_for_rect_come_from_bounds() {
        let bounds = Bounds {
            top: 1,
            left: 2,
            bottom: 3,
            right: 4,
        };
        let (x, y) = derive_ranges(RoiType::Rect, &bounds, &[Coordinate::new(100.0, 100.0)]);
        assert_eq!(x, Range::new(2.0, 4.0));
        assert_eq!(y, Range::new(1.0, 3.0));
    }

    #[test]
    fn ranges_for_polygon_come_from_coordinates() {
        let bounds = Bounds::default();
        let coords = [
            Coordinate::new(5.0, 9.0),
            Coordinate::new(1.0, 12.0),
            Coordinate::new(7.0, 3.0),
        ];
        let (x, y) = derive_ranges(RoiType::Polygon, &bounds, &coords);
        assert_eq!(x, Range::new(1.0, 7.0));
        assert_eq!(y, Range::new(3.0, 12.0));
    }

    #[test]
    fn empty_polygon_falls_back_to_bounds() {
        let bounds = Bounds {
            top: 0,
            left: 0,
            bottom: 10,
            right: 10,
        };
        let (x, _) = derive_ranges(RoiType::Polygon, &bounds, &[]);
        assert_eq!(x, Range::new(0.0, 10.0));
    }

    #[test]
    fn arrow_flags_follow_option_bits() {
        let flags = ArrowFlags::from_options(RoiOptions::DOUBLE_HEADED);
        assert!(flags.double_headed);
        assert!(!flags.outline);
    }
}
