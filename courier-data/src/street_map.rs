//! Street map file loading.
//!
//! The file is a sequence of street records:
//!
//! ```text
//! Broxton Avenue
//! 2
//! 34.0625329 -118.4470263 34.0632405 -118.4470467
//! 34.0632405 -118.4470467 34.0636100 -118.4470807
//! ```
//!
//! A street name line, a segment count line, then that many segment lines
//! of `startLat startLon endLat endLon`. Blank lines between records are
//! ignored. Every segment is added to the map in both directions.

use std::io::{self, BufRead};

use camino::{Utf8Path, Utf8PathBuf};
use courier_core::{Coordinate, CoordinateError, StreetMap};
use log::{info, warn};
use thiserror::Error;

use crate::fs::open_utf8_reader;
use crate::lines::NumberedLines;

/// Errors raised while loading a street map.
#[derive(Debug, Error)]
pub enum MapLoadError {
    /// Reading the source failed.
    #[error("failed to read street map")]
    Io(#[from] io::Error),
    /// The file could not be opened.
    #[error("failed to open street map at {path}")]
    Open {
        /// Path that could not be opened.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A street name was the last line of the file.
    #[error("street {street:?} has no segment count")]
    MissingSegmentCount {
        /// Street whose count is missing.
        street: String,
    },
    /// The segment count line is not a non-negative integer.
    #[error("line {line}: invalid segment count {text:?}")]
    InvalidSegmentCount {
        /// One-based line number.
        line: usize,
        /// Offending text.
        text: String,
    },
    /// A segment line does not hold exactly four fields.
    #[error("line {line}: expected `startLat startLon endLat endLon`")]
    MalformedSegment {
        /// One-based line number.
        line: usize,
    },
    /// A segment endpoint is not a valid coordinate.
    #[error("line {line}: invalid coordinate")]
    InvalidCoordinate {
        /// One-based line number.
        line: usize,
        /// Parse failure.
        #[source]
        source: CoordinateError,
    },
    /// The file ended before all of a street's segments were read.
    #[error("street {street:?} declares {expected} segments but only {found} follow")]
    TruncatedStreet {
        /// Street being read.
        street: String,
        /// Declared segment count.
        expected: usize,
        /// Segments actually present.
        found: usize,
    },
}

/// Parse a street map from `reader`.
///
/// # Examples
/// ```
/// use courier_data::parse_street_map;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let text = "Broxton Avenue\n1\n34.0625329 -118.4470263 34.0632405 -118.4470467\n";
/// let map = parse_street_map(text.as_bytes())?;
/// assert_eq!(map.vertex_count(), 2);
/// assert_eq!(map.segment_count(), 2);
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns [`MapLoadError`] for I/O failures and malformed records.
pub fn parse_street_map<R: BufRead>(reader: R) -> Result<StreetMap, MapLoadError> {
    let mut lines = NumberedLines::new(reader);
    let mut map = StreetMap::new();
    let mut streets = 0_usize;

    while let Some((_, name)) = lines.next_non_blank()? {
        let street = name.trim().to_owned();
        let (count_line, count_text) =
            lines
                .next_line()?
                .ok_or_else(|| MapLoadError::MissingSegmentCount {
                    street: street.clone(),
                })?;
        let expected: usize =
            count_text
                .trim()
                .parse()
                .map_err(|_| MapLoadError::InvalidSegmentCount {
                    line: count_line,
                    text: count_text.clone(),
                })?;
        if expected == 0 {
            warn!("street {street:?} on line {count_line} has no segments");
        }
        for found in 0..expected {
            let Some((line, text)) = lines.next_line()? else {
                return Err(MapLoadError::TruncatedStreet {
                    street,
                    expected,
                    found,
                });
            };
            let (start, end) = parse_segment(line, &text)?;
            map.add_street(street.as_str(), start, end);
        }
        streets += 1;
    }

    info!(
        "loaded street map: {streets} streets, {} vertices, {} directed segments",
        map.vertex_count(),
        map.segment_count()
    );
    Ok(map)
}

fn parse_segment(line: usize, text: &str) -> Result<(Coordinate, Coordinate), MapLoadError> {
    let fields: Vec<&str> = text.split_whitespace().collect();
    let [start_lat, start_lon, end_lat, end_lon] = fields.as_slice() else {
        return Err(MapLoadError::MalformedSegment { line });
    };
    let coordinate = |latitude: &str, longitude: &str| {
        Coordinate::new(latitude, longitude)
            .map_err(|source| MapLoadError::InvalidCoordinate { line, source })
    };
    Ok((
        coordinate(start_lat, start_lon)?,
        coordinate(end_lat, end_lon)?,
    ))
}

/// Load a street map from the file at `path`.
///
/// # Errors
///
/// Returns [`MapLoadError::Open`] when the file cannot be opened and any
/// other [`MapLoadError`] raised while parsing it.
pub fn load_street_map(path: &Utf8Path) -> Result<StreetMap, MapLoadError> {
    let reader = open_utf8_reader(path).map_err(|source| MapLoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    parse_street_map(reader)
}
