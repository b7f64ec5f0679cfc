//! Configuration loading and parsing.
//!
//! This module handles:
//! - Label size keywords (`small`, `normal`) and their physical dimensions
//! - Optional JSON label profiles overriding those dimensions
//! - Font name resolution
//! - Loading the CSV table driving batch runs
//! - Lengths with units (pt, mm, cm, in) for profiles

use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord};
use serde::Deserialize;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

use crate::layout::LabelSpec;
use crate::pdf::fonts::StandardFont;

const INCH: f64 = 72.0;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("unknown label size '{0}' (expected one of: small, normal)")]
    UnknownSize(String),
    #[error("unknown font '{0}'")]
    UnknownFont(String),
}

/// A length in points.
///
/// Profiles may give a bare number (points) or a number followed by a unit:
/// `pt`, `mm`, `cm` or `in`, e.g. `"1.125 in"` or `"3mm"`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "RawDimension")]
pub struct Dimension(pub f64);

impl Dimension {
    pub fn as_points(&self) -> f64 {
        self.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDimension {
    Points(f64),
    WithUnit(String),
}

impl TryFrom<RawDimension> for Dimension {
    type Error = String;

    fn try_from(raw: RawDimension) -> Result<Self, Self::Error> {
        match raw {
            RawDimension::Points(points) => Ok(Dimension(points)),
            RawDimension::WithUnit(text) => text.parse(),
        }
    }
}

impl FromStr for Dimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let unit_start = s.find(|c: char| c.is_ascii_alphabetic()).unwrap_or(s.len());
        let (number, unit) = s.split_at(unit_start);
        let value: f64 = number
            .trim()
            .parse()
            .map_err(|_| format!("invalid length '{}'", s))?;

        let per_unit = match unit.to_ascii_lowercase().as_str() {
            "" | "pt" => 1.0,
            "mm" => INCH / 25.4,
            "cm" => INCH / 2.54,
            "in" => INCH,
            other => return Err(format!("unknown unit '{}' (use pt, mm, cm or in)", other)),
        };
        Ok(Dimension(value * per_unit))
    }
}

/// Label stock selectable with `--size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelSize {
    /// 0.6in x 1.75in
    Small,
    /// 1.125in x 3.25in
    Normal,
}

impl LabelSize {
    pub fn from_name(name: &str) -> Result<LabelSize, ConfigError> {
        match name {
            "small" => Ok(LabelSize::Small),
            "normal" => Ok(LabelSize::Normal),
            _ => Err(ConfigError::UnknownSize(name.to_string())),
        }
    }

    pub fn spec(self) -> LabelSpec {
        match self {
            LabelSize::Small => LabelSpec {
                short_side: 0.6 * INCH,
                long_side: 1.75 * INCH,
                left_margin: 4.0,
                item_spacing: 4.0,
                vertical_margin: 2.0,
                icon_size: 20.0,
                default_font_size: 8.0,
            },
            LabelSize::Normal => LabelSpec {
                short_side: 1.125 * INCH,
                long_side: 3.25 * INCH,
                left_margin: 4.0,
                item_spacing: 4.0,
                vertical_margin: 2.0,
                icon_size: 20.0,
                default_font_size: 12.0,
            },
        }
    }
}

/// Overrides applied on top of a [`LabelSize`] preset, read from JSON.
///
/// `width` and `height` are the physical page dimensions (short and long
/// side respectively).
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LabelProfile {
    #[serde(default)]
    pub width: Option<Dimension>,
    #[serde(default)]
    pub height: Option<Dimension>,
    #[serde(default)]
    pub left_margin: Option<Dimension>,
    #[serde(default)]
    pub item_spacing: Option<Dimension>,
    #[serde(default)]
    pub vertical_margin: Option<Dimension>,
    #[serde(default)]
    pub icon_size: Option<Dimension>,
    #[serde(default)]
    pub font_size: Option<Dimension>,
}

impl LabelProfile {
    pub fn apply(&self, base: &LabelSpec) -> LabelSpec {
        let pick = |d: Option<Dimension>, fallback: f64| d.map_or(fallback, |d| d.as_points());
        LabelSpec {
            short_side: pick(self.width, base.short_side),
            long_side: pick(self.height, base.long_side),
            left_margin: pick(self.left_margin, base.left_margin),
            item_spacing: pick(self.item_spacing, base.item_spacing),
            vertical_margin: pick(self.vertical_margin, base.vertical_margin),
            icon_size: pick(self.icon_size, base.icon_size),
            default_font_size: pick(self.font_size, base.default_font_size),
        }
    }
}

/// Resolve a `--font` value to one of the standard PDF fonts.
pub fn resolve_font(name: &str) -> Result<StandardFont, ConfigError> {
    StandardFont::from_name(name).ok_or_else(|| ConfigError::UnknownFont(name.to_string()))
}

/// One non-empty row of the batch table.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRow {
    /// Position of the row in the table, counting empty rows.
    pub index: usize,
    pub text: String,
    /// Icon name without directory or extension.
    pub icon: Option<String>,
}

/// Helper function to open a file with consistent error context
fn open_file_with_context(path: &Path, description: &str) -> Result<File> {
    File::open(path)
        .with_context(|| format!("Failed to open {} at {:?}", description, path))
}

pub fn load_label_profile(path: &Path) -> Result<LabelProfile> {
    let file = open_file_with_context(path, "label profile")?;
    let reader = BufReader::new(file);
    let profile: LabelProfile = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to parse label profile {:?}", path))?;
    Ok(profile)
}

/// Parse one logical CSV row, `None` for a blank line
fn parse_record(row: &str, index: usize) -> Result<Option<StringRecord>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(row.as_bytes());
    rdr.records()
        .next()
        .transpose()
        .with_context(|| format!("Failed to parse row {}", index))
}

/// Parse the batch table.
///
/// Rows are counted the way they appear in the file: a blank line is an
/// empty row that is skipped but still takes an index, and a quoted field
/// spanning several lines belongs to a single row.
pub fn parse_batch_rows(input: &str) -> Result<Vec<BatchRow>> {
    let mut rows = Vec::new();
    let mut index = 0;
    let mut pending = String::new();

    for line in input.lines() {
        if !pending.is_empty() {
            pending.push('\n');
        }
        pending.push_str(line);
        // An odd number of quotes leaves a quoted field open.
        if pending.matches('"').count() % 2 == 1 {
            continue;
        }
        if let Some(row) = batch_row(&pending, index)? {
            rows.push(row);
        }
        pending.clear();
        index += 1;
    }
    if !pending.is_empty() {
        if let Some(row) = batch_row(&pending, index)? {
            rows.push(row);
        }
    }
    Ok(rows)
}

fn batch_row(row: &str, index: usize) -> Result<Option<BatchRow>> {
    let record = match parse_record(row, index)? {
        Some(record) => record,
        None => return Ok(None),
    };
    if record.iter().all(|field| field.trim().is_empty()) {
        return Ok(None);
    }

    let text = record.get(0).unwrap_or("").trim().to_string();
    let icon = record
        .get(1)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from);
    Ok(Some(BatchRow { index, text, icon }))
}

pub fn load_batch_rows(path: &Path) -> Result<Vec<BatchRow>> {
    let input = fs::read_to_string(path)
        .with_context(|| format!("Failed to read batch table at {:?}", path))?;
    parse_batch_rows(&input)
}
