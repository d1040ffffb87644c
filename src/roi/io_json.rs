//! JSON export for decoded ROIs.
//!
//! Collections serialize as a JSON object keyed by collection key, in
//! collection order. This is useful for:
//! - Inspecting decoded geometry without an image viewer
//! - Handing ROIs to tools that cannot read the binary format

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::collection::RoiCollection;
use crate::error::RoiError;

/// Writes a collection to a pretty-printed JSON file.
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub fn write_json(path: &Path, collection: &RoiCollection) -> Result<(), RoiError> {
    let file = File::create(path).map_err(RoiError::Io)?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, collection).map_err(|source| {
        RoiError::JsonWrite {
            path: path.to_path_buf(),
            source,
        }
    })?;
    writer.flush().map_err(RoiError::Io)
}

/// Writes a collection to a JSON string.
///
/// Useful for testing without file I/O.
pub fn to_json_string(collection: &RoiCollection) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(collection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roi::{read_collection, RoiType};

    fn roi_bytes(roi_type: RoiType, top: i16, left: i16) -> Vec<u8> {
        let mut bytes = vec![0u8; 64];
        bytes[..4].copy_from_slice(b"Iout");
        bytes[6] = roi_type.code();
        bytes[8..10].copy_from_slice(&top.to_be_bytes());
        bytes[10..12].copy_from_slice(&left.to_be_bytes());
        bytes
    }

    #[test]
    fn json_preserves_collection_order() {
        let entries = vec![
            ("zeta.roi", roi_bytes(RoiType::Rect, 1, 2)),
            ("alpha.roi", roi_bytes(RoiType::Oval, 3, 4)),
        ];
        let rois = read_collection(&entries, true).expect("read collection");
        let json = to_json_string(&rois).expect("serialize");

        let zeta = json.find("\"zeta\"").expect("zeta key");
        let alpha = json.find("\"alpha\"").expect("alpha key");
        assert!(zeta < alpha);

        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(value["zeta"]["roi_type"], "rect");
        assert_eq!(value["alpha"]["roi_type"], "oval");
        assert_eq!(value["alpha"]["bounds"]["left"], 4);
        assert_eq!(value["alpha"]["shape"]["kind"], "standard");
    }

    #[test]
    fn write_json_creates_file() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("rois.json");
        let entries = vec![("only.roi", roi_bytes(RoiType::Rect, 0, 0))];
        let rois = read_collection(&entries, true).expect("read collection");

        write_json(&path, &rois).expect("write json");
        let text = std::fs::read_to_string(&path).expect("read back");
        assert!(text.contains("\"only\""));
    }
}
