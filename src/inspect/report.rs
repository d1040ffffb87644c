//! Inspect report types and terminal formatting.

use std::fmt;

use serde::Serialize;

use crate::roi::{Range, RoiSubtype, RoiType};

const INNER_WIDTH: usize = 57;

/// The result of inspecting a collection.
#[derive(Clone, Debug, Serialize)]
pub struct InspectReport {
    /// Number of ROIs in the collection.
    pub total: usize,
    /// Sum of coordinate counts over all ROIs.
    pub total_points: usize,
    /// Non-zero per-type counts, in type-code order.
    pub types: Vec<TypeCount>,
    /// Region covered by all ROIs; `None` for an empty collection.
    pub extent: Option<Extent>,
    /// Leading entries of the collection.
    pub rows: Vec<EntryRow>,
    /// Entries not listed in `rows`.
    pub omitted_rows: usize,
    #[serde(skip)]
    pub(crate) bar_width: usize,
}

/// Number of ROIs of one type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TypeCount {
    pub roi_type: RoiType,
    pub count: usize,
}

/// Combined x/y extent.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Extent {
    pub x: Range,
    pub y: Range,
}

/// One line of the per-entry table.
#[derive(Clone, Debug, Serialize)]
pub struct EntryRow {
    pub key: String,
    pub roi_type: RoiType,
    pub subtype: Option<RoiSubtype>,
    pub points: usize,
    pub position: i32,
}

impl fmt::Display for InspectReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "╭─────────────────────────────────────────────────────────────╮")?;
        writeln!(f, "│                  ROI Collection Report                      │")?;
        writeln!(f, "╰─────────────────────────────────────────────────────────────╯")?;
        writeln!(f)?;

        self.fmt_summary(f)?;
        writeln!(f)?;

        self.fmt_types(f)?;
        writeln!(f)?;

        self.fmt_rows(f)?;

        Ok(())
    }
}

impl InspectReport {
    fn fmt_summary(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        section_header(f, "Summary")?;
        line(f, "")?;
        line(f, &format!("  ROIs:          {:>8}", format_number(self.total)))?;
        line(
            f,
            &format!("  Points:        {:>8}", format_number(self.total_points)),
        )?;
        match self.extent {
            Some(extent) => {
                line(f, "")?;
                line(
                    f,
                    &format!("  X extent:   {:>9.1} .. {:<9.1}", extent.x.min, extent.x.max),
                )?;
                line(
                    f,
                    &format!("  Y extent:   {:>9.1} .. {:<9.1}", extent.y.min, extent.y.max),
                )?;
            }
            None => line(f, "  No ROIs found.")?,
        }
        line(f, "")?;
        section_footer(f)
    }

    fn fmt_types(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        section_header(f, "Types")?;
        line(f, "")?;

        let max_count = self.types.iter().map(|t| t.count).max().unwrap_or(0);
        for entry in &self.types {
            let bar = render_bar(entry.count, max_count, self.bar_width);
            line(
                f,
                &format!(
                    "  {:<10} {:>7} {:>6}  {}",
                    entry.roi_type.name(),
                    format_number(entry.count),
                    fmt_percent(entry.count, self.total),
                    bar
                ),
            )?;
        }
        if self.types.is_empty() {
            line(f, "  No ROIs found.")?;
        }

        line(f, "")?;
        section_footer(f)
    }

    fn fmt_rows(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        section_header(f, "Entries")?;
        line(f, "")?;
        line(
            f,
            &format!("  {:<20} {:<10} {:<8} {:>6} {:>6}", "key", "type", "subtype", "points", "pos"),
        )?;
        for row in &self.rows {
            line(
                f,
                &format!(
                    "  {:<20} {:<10} {:<8} {:>6} {:>6}",
                    truncate_label(&row.key, 20),
                    row.roi_type.name(),
                    row.subtype.map(|s| s.name()).unwrap_or("-"),
                    format_number(row.points),
                    row.position
                ),
            )?;
        }
        if self.omitted_rows > 0 {
            line(
                f,
                &format!("  ... {} more", format_number(self.omitted_rows)),
            )?;
        }
        line(f, "")?;
        section_footer(f)
    }
}

fn section_header(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    let used = title.chars().count() + 2;
    writeln!(
        f,
        "┌─ {} {}┐",
        title,
        "─".repeat(INNER_WIDTH.saturating_sub(used))
    )
}

fn section_footer(f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "└{}┘", "─".repeat(INNER_WIDTH + 2))
}

fn line(f: &mut fmt::Formatter<'_>, content: &str) -> fmt::Result {
    writeln!(f, "│ {:<width$} │", content, width = INNER_WIDTH)
}

/// Format a number with thousand separators.
fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Format a percentage, handling zero denominators.
fn fmt_percent(numerator: usize, denominator: usize) -> String {
    if denominator == 0 {
        "n/a".to_string()
    } else {
        format!("{:.1}%", (numerator as f64 / denominator as f64) * 100.0)
    }
}

/// Render a histogram bar.
fn render_bar(count: usize, max_count: usize, width: usize) -> String {
    if max_count == 0 || width == 0 {
        return String::new();
    }

    let filled = ((count * width) / max_count).min(width);
    "█".repeat(filled) + &"░".repeat(width - filled)
}

/// Truncate a key to fit in the display column.
fn truncate_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        label.to_string()
    } else {
        let head: String = label.chars().take(max_chars - 1).collect();
        format!("{head}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(1234), "1,234");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_render_bar() {
        assert_eq!(render_bar(5, 10, 4), "██░░");
        assert_eq!(render_bar(10, 10, 3), "███");
        assert_eq!(render_bar(1, 0, 3), "");
    }

    #[test]
    fn test_truncate_label_counts_chars() {
        assert_eq!(truncate_label("short", 20), "short");
        assert_eq!(truncate_label("ééééé", 3), "éé…");
    }

    #[test]
    fn test_fmt_percent() {
        assert_eq!(fmt_percent(1, 4), "25.0%");
        assert_eq!(fmt_percent(1, 0), "n/a");
    }
}
