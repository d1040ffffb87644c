//! ImageJ-style `.roi` decoder.
//!
//! # Layout
//!
//! A file is a fixed 64-byte header followed, for polygon-like types, by
//! the coordinate arrays. Offsets are fixed; fields that do not apply to a
//! given type are skipped rather than shifting later fields.
//!
//! | offset | field |
//! |--------|-------|
//! | 0-1    | signature `Io` |
//! | 4-5    | version |
//! | 6      | type |
//! | 8-15   | top, left, bottom, right |
//! | 16-17  | coordinate count |
//! | 18-33  | x1, y1, x2, y2 (floats) |
//! | 34-35  | stroke width |
//! | 36-39  | shape roi size |
//! | 40-47  | stroke color, fill color |
//! | 48-49  | subtype |
//! | 50-51  | options |
//! | 52-55  | aspect ratio, or arrow style / head size / arc size |
//! | 56-59  | position |
//! | 64-    | `n` x deltas, then `n` y deltas |
//!
//! # Format Limitations
//!
//! Composite (shape) ROIs are rejected. Text and image payloads of the
//! corresponding subtypes are not decoded.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use super::cursor::FieldCursor;
use super::kind::{RoiOptions, RoiSubtype, RoiType};
use super::model::{
    derive_ranges, ArrowFlags, Bounds, Coordinate, LineEndpoints, RoiRecord, ShapeAttributes,
};
use crate::error::{DecodeError, RoiError};

/// Size of the fixed header in bytes.
pub const HEADER_SIZE: usize = 64;

/// Leading magic bytes.
pub const SIGNATURE: [u8; 2] = *b"Io";

/// File extension stripped when deriving record names.
pub const ROI_EXTENSION: &str = ".roi";

/// Options controlling record decoding.
#[derive(Clone, Debug, Default)]
pub struct DecodeOptions {
    /// Reject files whose header version is below this value.
    ///
    /// `None` accepts every version.
    pub min_version: Option<i32>,
}

/// Decodes one ROI record with no associated name.
pub fn decode(bytes: &[u8]) -> Result<RoiRecord, DecodeError> {
    decode_with(bytes, None, &DecodeOptions::default())
}

/// Decodes one ROI record, deriving its name from `file_name`.
///
/// # Example
/// ```no_run
/// let bytes = std::fs::read("cell-1.roi")?;
/// let roi = ijroi::roi::decode_named(&bytes, "cell-1.roi")?;
/// assert_eq!(roi.name.as_deref(), Some("cell-1"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn decode_named(bytes: &[u8], file_name: &str) -> Result<RoiRecord, DecodeError> {
    decode_with(bytes, Some(file_name), &DecodeOptions::default())
}

/// Reads and decodes a `.roi` file from disk.
pub fn read_roi_file(path: &Path) -> Result<RoiRecord, RoiError> {
    read_roi_file_with(path, &DecodeOptions::default())
}

/// Reads and decodes a `.roi` file from disk with explicit options.
pub fn read_roi_file_with(path: &Path, opts: &DecodeOptions) -> Result<RoiRecord, RoiError> {
    let bytes = fs::read(path).map_err(RoiError::Io)?;
    let file_name = path.file_name().and_then(|name| name.to_str());
    decode_with(&bytes, file_name, opts).map_err(|source| RoiError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Decodes one ROI record.
pub fn decode_with(
    bytes: &[u8],
    file_name: Option<&str>,
    opts: &DecodeOptions,
) -> Result<RoiRecord, DecodeError> {
    if bytes.len() < SIGNATURE.len() {
        return Err(DecodeError::TruncatedHeader {
            needed: HEADER_SIZE,
            available: bytes.len(),
        });
    }
    if bytes[..2] != SIGNATURE {
        return Err(DecodeError::InvalidSignature {
            found: [bytes[0], bytes[1]],
        });
    }
    if bytes.len() < HEADER_SIZE {
        return Err(DecodeError::TruncatedHeader {
            needed: HEADER_SIZE,
            available: bytes.len(),
        });
    }

    let mut cur = FieldCursor::new(bytes);
    cur.skip(4)?;

    let version = cur.read_short()?;
    if let Some(minimum) = opts.min_version {
        if version < minimum {
            warn!(version, minimum, "rejecting ROI below minimum version");
            return Err(DecodeError::UnsupportedVersion {
                found: version,
                minimum,
            });
        }
    }

    let type_code = cur.read_byte()?;
    let roi_type = RoiType::from_code(type_code).ok_or(DecodeError::UnknownRoiType(type_code))?;
    cur.skip(1)?;

    let bounds = Bounds {
        top: cur.read_short()?,
        left: cur.read_short()?,
        bottom: cur.read_short()?,
        right: cur.read_short()?,
    };
    let n_coordinates = cur.read_short()?;

    let line = LineEndpoints {
        x1: cur.read_float()?,
        y1: cur.read_float()?,
        x2: cur.read_float()?,
        y2: cur.read_float()?,
    };

    let stroke_width = cur.read_short()?;
    let shape_roi_size = cur.read_int()?;
    if shape_roi_size > 0 {
        return Err(DecodeError::UnsupportedCompositeRoi {
            size: shape_roi_size,
        });
    }

    let stroke_color = cur.read_int()?;
    let fill_color = cur.read_int()?;

    let subtype_code = cur.read_short()?;
    let subtype = match subtype_code {
        0 => None,
        code => Some(RoiSubtype::from_code(code).ok_or(DecodeError::UnknownSubtype(code))?),
    };

    let options = if roi_type == RoiType::Line && subtype != Some(RoiSubtype::Arrow) {
        cur.skip(2)?;
        None
    } else {
        Some(RoiOptions::from_raw(cur.read_short()?))
    };

    let shape = if roi_type == RoiType::Freehand && subtype == Some(RoiSubtype::Ellipse) {
        ShapeAttributes::Ellipse {
            aspect_ratio: cur.read_float()?,
        }
    } else {
        ShapeAttributes::Standard {
            arrow_style: cur.read_byte()?,
            arrow_head_size: cur.read_byte()?,
            arc_size: cur.read_short()?,
        }
    };

    let position = cur.read_int()?;
    cur.skip(4)?;
    debug_assert_eq!(cur.position(), HEADER_SIZE);

    let coordinates = if roi_type == RoiType::Line {
        vec![
            Coordinate::new(line.x1 as f64, line.y1 as f64),
            Coordinate::new(line.x2 as f64, line.y2 as f64),
        ]
    } else if roi_type.has_coordinate_arrays() && n_coordinates > 0 {
        read_coordinates(&mut cur, n_coordinates as usize, &bounds)?
    } else {
        Vec::new()
    };

    let arrow = match (roi_type, subtype, options) {
        (RoiType::Line, Some(RoiSubtype::Arrow), Some(bits)) => Some(ArrowFlags::from_options(bits)),
        _ => None,
    };

    let (x_range, y_range) = derive_ranges(roi_type, &bounds, &coordinates);
    let name = file_name.and_then(roi_name_from_file_name);

    debug!(
        name = name.as_deref().unwrap_or("<unnamed>"),
        roi_type = roi_type.name(),
        points = coordinates.len(),
        "decoded ROI"
    );

    Ok(RoiRecord {
        name,
        version,
        roi_type,
        subtype,
        bounds,
        line,
        stroke_width,
        shape_roi_size,
        stroke_color,
        fill_color,
        position,
        options,
        shape,
        arrow,
        coordinates,
        x_range,
        y_range,
    })
}

/// Reads `n` x deltas followed by `n` y deltas and converts them to
/// absolute coordinates.
fn read_coordinates(
    cur: &mut FieldCursor<'_>,
    n: usize,
    bounds: &Bounds,
) -> Result<Vec<Coordinate>, DecodeError> {
    cur.require(n * 4)?;

    let mut xs = Vec::with_capacity(n);
    for _ in 0..n {
        xs.push(cur.read_short()?.max(0));
    }
    let mut ys = Vec::with_capacity(n);
    for _ in 0..n {
        ys.push(cur.read_short()?.max(0));
    }

    Ok(xs
        .into_iter()
        .zip(ys)
        .map(|(x, y)| Coordinate::new((x + bounds.left) as f64, (y + bounds.top) as f64))
        .collect())
}

/// Derives a record name from a file name: the final path component with a
/// trailing `.roi` (any case) removed.
pub fn roi_name_from_file_name(file_name: &str) -> Option<String> {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name);
    let split = base.len().saturating_sub(ROI_EXTENSION.len());
    let stem = match base.get(split..) {
        Some(tail) if tail.eq_ignore_ascii_case(ROI_EXTENSION) => &base[..split],
        _ => base,
    };
    if stem.is_empty() {
        None
    } else {
        Some(stem.to_string())
    }
}
