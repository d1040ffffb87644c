//! Collection inspection.
//!
//! Produces a structured report over a decoded [`RoiCollection`]: counts per
//! ROI type, the overall extent covered by all ROIs, and a per-entry table.

mod report;

pub use report::{EntryRow, Extent, InspectReport, TypeCount};

use crate::roi::{RoiCollection, RoiType};

/// Options for collection inspection.
#[derive(Clone, Debug)]
pub struct InspectOptions {
    /// Maximum number of per-entry rows to include.
    pub max_rows: usize,
    /// Width of histogram bars (in characters).
    pub bar_width: usize,
}

impl Default for InspectOptions {
    fn default() -> Self {
        Self {
            max_rows: 25,
            bar_width: 20,
        }
    }
}

/// Inspect a collection and produce a report.
pub fn inspect_collection(collection: &RoiCollection, opts: &InspectOptions) -> InspectReport {
    let mut counts = [0usize; RoiType::ALL.len()];
    let mut extent: Option<Extent> = None;
    let mut total_points = 0usize;
    let mut rows = Vec::new();

    for (key, roi) in collection.iter() {
        counts[roi.roi_type.code() as usize] += 1;
        total_points += roi.coordinates.len();

        extent = Some(match extent {
            None => Extent {
                x: roi.x_range,
                y: roi.y_range,
            },
            Some(current) => Extent {
                x: current.x.union(&roi.x_range),
                y: current.y.union(&roi.y_range),
            },
        });

        if rows.len() < opts.max_rows {
            rows.push(EntryRow {
                key: key.to_string(),
                roi_type: roi.roi_type,
                subtype: roi.subtype,
                points: roi.coordinates.len(),
                position: roi.position,
            });
        }
    }

    let types = RoiType::ALL
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|(roi_type, count)| TypeCount {
            roi_type: *roi_type,
            count,
        })
        .collect();

    InspectReport {
        total: collection.len(),
        total_points,
        types,
        extent,
        omitted_rows: collection.len() - rows.len(),
        rows,
        bar_width: opts.bar_width,
    }
}
