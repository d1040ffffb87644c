#![allow(dead_code)]

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use zip::write::SimpleFileOptions;

/// Builds ROI file bytes field by field at the format's fixed offsets.
pub struct RoiBuilder {
    header: Vec<u8>,
    trailing: Vec<u8>,
}

impl RoiBuilder {
    pub fn new(type_code: u8) -> Self {
        let mut header = vec![0u8; 64];
        header[..4].copy_from_slice(b"Iout");
        header[4..6].copy_from_slice(&228i16.to_be_bytes());
        header[6] = type_code;
        Self {
            header,
            trailing: Vec::new(),
        }
    }

    fn short(mut self, offset: usize, value: i16) -> Self {
        self.header[offset..offset + 2].copy_from_slice(&value.to_be_bytes());
        self
    }

    fn int(mut self, offset: usize, value: i32) -> Self {
        self.header[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
        self
    }

    fn float(mut self, offset: usize, value: f32) -> Self {
        self.header[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
        self
    }

    pub fn signature(mut self, first: u8, second: u8) -> Self {
        self.header[0] = first;
        self.header[1] = second;
        self
    }

    pub fn version(self, version: i16) -> Self {
        self.short(4, version)
    }

    pub fn bounds(self, top: i16, left: i16, bottom: i16, right: i16) -> Self {
        self.short(8, top)
            .short(10, left)
            .short(12, bottom)
            .short(14, right)
    }

    pub fn count(self, n: i16) -> Self {
        self.short(16, n)
    }

    pub fn line(self, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        self.float(18, x1).float(22, y1).float(26, x2).float(30, y2)
    }

    pub fn stroke_width(self, width: i16) -> Self {
        self.short(34, width)
    }

    pub fn shape_roi_size(self, size: i32) -> Self {
        self.int(36, size)
    }

    pub fn colors(self, stroke: i32, fill: i32) -> Self {
        self.int(40, stroke).int(44, fill)
    }

    pub fn subtype(self, code: i16) -> Self {
        self.short(48, code)
    }

    pub fn options(self, bits: i16) -> Self {
        self.short(50, bits)
    }

    pub fn aspect_ratio(self, ratio: f32) -> Self {
        self.float(52, ratio)
    }

    pub fn position(self, position: i32) -> Self {
        self.int(56, position)
    }

    /// Sets the coordinate count and appends x deltas then y deltas.
    pub fn deltas(mut self, xs: &[i16], ys: &[i16]) -> Self {
        assert_eq!(xs.len(), ys.len(), "delta arrays must match");
        self = self.count(xs.len() as i16);
        for v in xs.iter().chain(ys) {
            self.trailing.extend_from_slice(&v.to_be_bytes());
        }
        self
    }

    pub fn trailing(mut self, bytes: &[u8]) -> Self {
        self.trailing.extend_from_slice(bytes);
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut bytes = self.header;
        bytes.extend(self.trailing);
        bytes
    }
}

pub const POLYGON: u8 = 0;
pub const RECT: u8 = 1;
pub const OVAL: u8 = 2;
pub const LINE: u8 = 3;
pub const FREEHAND: u8 = 7;
pub const POINT: u8 = 10;

pub fn write_zip(path: &Path, members: &[(&str, Vec<u8>)]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    let file = File::create(path).expect("create zip file");
    let mut writer = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    for (name, bytes) in members {
        writer.start_file(*name, options).expect("start zip member");
        writer.write_all(bytes).expect("write zip member");
    }
    writer.finish().expect("finish zip");
}
