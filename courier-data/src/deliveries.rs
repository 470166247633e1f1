//! Deliveries file loading.
//!
//! The first non-blank line is the depot as `lat lon`. Every later
//! non-blank line is a stop written `lat lon:item description`.

use std::io::{self, BufRead};

use camino::{Utf8Path, Utf8PathBuf};
use courier_core::{Coordinate, CoordinateError, DeliveryStop, PlanRequest};
use log::info;
use thiserror::Error;

use crate::fs::open_utf8_reader;
use crate::lines::NumberedLines;

/// Errors raised while loading a deliveries file.
#[derive(Debug, Error)]
pub enum DeliveriesError {
    /// Reading the source failed.
    #[error("failed to read deliveries")]
    Io(#[from] io::Error),
    /// The file could not be opened.
    #[error("failed to open deliveries at {path}")]
    Open {
        /// Path that could not be opened.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The file holds no depot line.
    #[error("deliveries file has no depot line")]
    MissingDepot,
    /// A stop line has no `:` between location and item.
    #[error("line {line}: expected `lat lon:item`")]
    MissingItemSeparator {
        /// One-based line number.
        line: usize,
    },
    /// A stop line has nothing after the `:`.
    #[error("line {line}: item description is empty")]
    EmptyItem {
        /// One-based line number.
        line: usize,
    },
    /// A location is not a valid coordinate.
    #[error("line {line}: invalid coordinate")]
    InvalidCoordinate {
        /// One-based line number.
        line: usize,
        /// Parse failure.
        #[source]
        source: CoordinateError,
    },
}

/// The depot and stops read from a deliveries file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryManifest {
    /// Where the courier starts and finishes.
    pub depot: Coordinate,
    /// Stops in file order.
    pub stops: Vec<DeliveryStop>,
}

impl DeliveryManifest {
    /// Build a plan request for this manifest.
    pub fn into_request(self, seed: u64) -> PlanRequest {
        PlanRequest {
            depot: self.depot,
            stops: self.stops,
            seed,
        }
    }
}

/// Parse a deliveries manifest from `reader`.
///
/// # Examples
/// ```
/// use courier_data::parse_deliveries;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let text = "34.0625329 -118.4470263\n34.0712323 -118.4505969:Chicken tenders\n";
/// let manifest = parse_deliveries(text.as_bytes())?;
/// assert_eq!(manifest.depot.to_string(), "34.0625329 -118.4470263");
/// assert_eq!(manifest.stops[0].item, "Chicken tenders");
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns [`DeliveriesError`] for I/O failures and malformed lines.
pub fn parse_deliveries<R: BufRead>(reader: R) -> Result<DeliveryManifest, DeliveriesError> {
    let mut lines = NumberedLines::new(reader);
    let (depot_line, depot_text) = lines
        .next_non_blank()?
        .ok_or(DeliveriesError::MissingDepot)?;
    let depot = depot_text
        .parse::<Coordinate>()
        .map_err(|source| DeliveriesError::InvalidCoordinate {
            line: depot_line,
            source,
        })?;

    let mut stops = Vec::new();
    while let Some((line, text)) = lines.next_non_blank()? {
        stops.push(parse_stop(line, &text)?);
    }

    info!("loaded {} deliveries from depot {depot}", stops.len());
    Ok(DeliveryManifest { depot, stops })
}

fn parse_stop(line: usize, text: &str) -> Result<DeliveryStop, DeliveriesError> {
    let (location, item) = text
        .split_once(':')
        .ok_or(DeliveriesError::MissingItemSeparator { line })?;
    let item = item.trim();
    if item.is_empty() {
        return Err(DeliveriesError::EmptyItem { line });
    }
    let location = location
        .parse::<Coordinate>()
        .map_err(|source| DeliveriesError::InvalidCoordinate { line, source })?;
    Ok(DeliveryStop::new(location, item))
}

/// Load a deliveries manifest from the file at `path`.
///
/// # Errors
///
/// Returns [`DeliveriesError::Open`] when the file cannot be opened and any
/// other [`DeliveriesError`] raised while parsing it.
pub fn load_deliveries(path: &Utf8Path) -> Result<DeliveryManifest, DeliveriesError> {
    let reader = open_utf8_reader(path).map_err(|source| DeliveriesError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    parse_deliveries(reader)
}
