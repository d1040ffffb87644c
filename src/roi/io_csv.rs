//! CSV export of ROI coordinates.
//!
//! One row per coordinate with columns `key`, `roi_type`, `index`, `x`, `y`.
//! Bounds-only ROIs (Rect, Oval, NoRoi) have no coordinates and produce no
//! rows.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use super::collection::RoiCollection;
use crate::error::RoiError;

#[derive(Debug, Serialize)]
struct CoordinateRow<'a> {
    key: &'a str,
    roi_type: &'static str,
    index: usize,
    x: f64,
    y: f64,
}

fn coordinate_rows(collection: &RoiCollection) -> impl Iterator<Item = CoordinateRow<'_>> {
    collection.iter().flat_map(|(key, roi)| {
        roi.coordinates
            .iter()
            .enumerate()
            .map(move |(index, c)| CoordinateRow {
                key,
                roi_type: roi.roi_type.name(),
                index,
                x: c.x,
                y: c.y,
            })
    })
}

fn write_rows<W: Write>(
    writer: W,
    collection: &RoiCollection,
    path: &Path,
) -> Result<W, RoiError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in coordinate_rows(collection) {
        csv_writer
            .serialize(&row)
            .map_err(|source| RoiError::CsvWrite {
                path: path.to_path_buf(),
                source,
            })?;
    }

    csv_writer
        .into_inner()
        .map_err(|e| RoiError::Io(e.into_error()))
}

/// Writes all coordinates of a collection to a CSV file.
pub fn write_coordinates_csv(path: &Path, collection: &RoiCollection) -> Result<(), RoiError> {
    let file = File::create(path).map_err(RoiError::Io)?;
    let mut writer = write_rows(BufWriter::new(file), collection, path)?;
    writer.flush().map_err(RoiError::Io)
}

/// Writes all coordinates of a collection to a CSV string.
///
/// Useful for testing without file I/O.
pub fn to_coordinates_csv_string(collection: &RoiCollection) -> Result<String, RoiError> {
    let bytes = write_rows(Vec::new(), collection, Path::new("<string>"))?;
    String::from_utf8(bytes).map_err(|e| RoiError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roi::{read_collection, RoiType};

    fn polyline_bytes(left: i16, top: i16, xs: &[i16], ys: &[i16]) -> Vec<u8> {
        let mut bytes = vec![0u8; 64];
        bytes[..4].copy_from_slice(b"Iout");
        bytes[6] = RoiType::Polyline.code();
        bytes[8..10].copy_from_slice(&top.to_be_bytes());
        bytes[10..12].copy_from_slice(&left.to_be_bytes());
        bytes[16..18].copy_from_slice(&(xs.len() as i16).to_be_bytes());
        for v in xs.iter().chain(ys) {
            bytes.extend_from_slice(&v.to_be_bytes());
        }
        bytes
    }

    #[test]
    fn csv_has_one_row_per_coordinate() {
        let mut rect = vec![0u8; 64];
        rect[..4].copy_from_slice(b"Iout");
        rect[6] = RoiType::Rect.code();

        let entries = vec![
            ("path.roi", polyline_bytes(10, 20, &[0, 5], &[1, 2])),
            ("box.roi", rect),
        ];
        let rois = read_collection(&entries, true).expect("read collection");
        let csv = to_coordinates_csv_string(&rois).expect("write csv");

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "key,roi_type,index,x,y");
        assert_eq!(lines[1], "path,polyline,0,10.0,21.0");
        assert_eq!(lines[2], "path,polyline,1,15.0,22.0");
        assert_eq!(lines.len(), 3);
    }
}
