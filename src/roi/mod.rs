//! ROI records and their binary decoder.
//!
//! This module holds the decoded representation of an ROI file
//! ([`RoiRecord`]), the decoder that produces it, and the reader that turns
//! a list of named byte streams into an ordered [`RoiCollection`].
//!
//! # Example
//!
//! ```
//! use ijroi::roi::{decode, RoiType};
//!
//! let mut bytes = vec![0u8; 64];
//! bytes[..4].copy_from_slice(b"Iout");
//! bytes[6] = RoiType::Rect.code();
//! bytes[12..14].copy_from_slice(&40i16.to_be_bytes()); // bottom
//! bytes[14..16].copy_from_slice(&30i16.to_be_bytes()); // right
//!
//! let roi = decode(&bytes).unwrap();
//! assert_eq!(roi.roi_type, RoiType::Rect);
//! assert_eq!((roi.width(), roi.height()), (30, 40));
//! ```

pub mod collection;
mod cursor;
pub mod decode;
pub mod io_csv;
pub mod io_json;
mod kind;
mod model;

// Re-export core types for convenient access
pub use collection::{
    read_collection, read_collection_with, CollectionOptions, DuplicatePolicy, RoiCollection,
    RoiSource,
};
pub use cursor::SHORT_REREAD_THRESHOLD;
pub use decode::{
    decode, decode_named, decode_with, read_roi_file, read_roi_file_with, DecodeOptions,
    HEADER_SIZE,
};
pub use kind::{RoiOptions, RoiSubtype, RoiType};
pub use model::{
    ArrowFlags, Bounds, Coordinate, LineEndpoints, Range, RoiRecord, ShapeAttributes,
};
