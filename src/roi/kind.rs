//! ROI type vocabulary: base types, subtypes, and option flags.
//!
//! The on-disk format identifies shapes by small integer codes. These are
//! mapped onto closed enums here; the codes never change between format
//! versions, so no runtime registry is needed.

use std::fmt;

use bitflags::bitflags;
use serde::Serialize;

/// Base classification of an ROI, read from the header's type byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum RoiType {
    Polygon = 0,
    Rect = 1,
    Oval = 2,
    Line = 3,
    Freeline = 4,
    Polyline = 5,
    NoRoi = 6,
    Freehand = 7,
    Traced = 8,
    Angle = 9,
    Point = 10,
}

impl RoiType {
    /// All types in code order.
    pub const ALL: [RoiType; 11] = [
        RoiType::Polygon,
        RoiType::Rect,
        RoiType::Oval,
        RoiType::Line,
        RoiType::Freeline,
        RoiType::Polyline,
        RoiType::NoRoi,
        RoiType::Freehand,
        RoiType::Traced,
        RoiType::Angle,
        RoiType::Point,
    ];

    /// Looks up a type by its header code.
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    /// Returns the header code for this type.
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Lowercase name, used for synthesized collection keys.
    pub fn name(self) -> &'static str {
        match self {
            RoiType::Polygon => "polygon",
            RoiType::Rect => "rect",
            RoiType::Oval => "oval",
            RoiType::Line => "line",
            RoiType::Freeline => "freeline",
            RoiType::Polyline => "polyline",
            RoiType::NoRoi => "noroi",
            RoiType::Freehand => "freehand",
            RoiType::Traced => "traced",
            RoiType::Angle => "angle",
            RoiType::Point => "point",
        }
    }

    /// Returns true for types whose geometry is stored as trailing
    /// coordinate arrays.
    pub fn has_coordinate_arrays(self) -> bool {
        matches!(
            self,
            RoiType::Polygon
                | RoiType::Freehand
                | RoiType::Traced
                | RoiType::Polyline
                | RoiType::Freeline
                | RoiType::Angle
                | RoiType::Point
        )
    }

    /// Returns true for types described purely by their bounding box.
    pub fn is_bounds_only(self) -> bool {
        matches!(self, RoiType::Rect | RoiType::Oval | RoiType::NoRoi)
    }
}

impl fmt::Display for RoiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Secondary classification modifying how a base type's fields are read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum RoiSubtype {
    Text = 1,
    Arrow = 2,
    Ellipse = 3,
    Image = 4,
}

impl RoiSubtype {
    /// Looks up a subtype by its header code. Zero means "no subtype"
    /// and is handled by the caller.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(RoiSubtype::Text),
            2 => Some(RoiSubtype::Arrow),
            3 => Some(RoiSubtype::Ellipse),
            4 => Some(RoiSubtype::Image),
            _ => None,
        }
    }

    /// Returns the header code for this subtype.
    #[inline]
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            RoiSubtype::Text => "text",
            RoiSubtype::Arrow => "arrow",
            RoiSubtype::Ellipse => "ellipse",
            RoiSubtype::Image => "image",
        }
    }
}

impl fmt::Display for RoiSubtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

bitflags! {
    /// Option bits stored in the header's options field.
    ///
    /// Bits without a name here are kept as read.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
    pub struct RoiOptions: u16 {
        /// Polygon is drawn as a fitted spline.
        const SPLINE_FIT = 0x01;
        /// Arrow has heads on both ends.
        const DOUBLE_HEADED = 0x02;
        /// Arrow is drawn as an outline.
        const OUTLINE = 0x04;
    }
}

impl RoiOptions {
    /// Builds an option set from a raw 16-bit header value.
    pub fn from_raw(raw: i32) -> Self {
        Self::from_bits_retain(raw as u16)
    }
}
