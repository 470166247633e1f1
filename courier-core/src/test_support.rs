//! Test-only street map fixtures shared by unit, behaviour and property
//! tests across the workspace.

use crate::{Coordinate, StreetMap};

/// Build a coordinate from literal text, panicking on invalid input.
///
/// # Panics
///
/// Panics when the text does not describe a valid coordinate.
pub fn coordinate(latitude: &str, longitude: &str) -> Coordinate {
    Coordinate::new(latitude, longitude).expect("fixture coordinate should be valid")
}

/// A rectangular street grid.
///
/// Rows run east-west and are named `Row <r> Street`; columns run
/// north-south and are named `Column <c> Avenue`. Row 0 is the southern edge
/// and column 0 the western edge. Neighbouring intersections are
/// `spacing_degrees` apart.
#[derive(Debug, Clone)]
pub struct GridMap {
    map: StreetMap,
    rows: usize,
    columns: usize,
    origin_latitude: f64,
    origin_longitude: f64,
    spacing_degrees: f64,
}

impl GridMap {
    /// Grid anchored at `(34.0, -118.0)` with `0.001°` spacing.
    pub fn new(rows: usize, columns: usize) -> Self {
        Self::with_layout(rows, columns, (34.0, -118.0), 0.001)
    }

    /// Grid with an explicit south-west corner and spacing.
    pub fn with_layout(
        rows: usize,
        columns: usize,
        origin: (f64, f64),
        spacing_degrees: f64,
    ) -> Self {
        let mut grid = Self {
            map: StreetMap::new(),
            rows,
            columns,
            origin_latitude: origin.0,
            origin_longitude: origin.1,
            spacing_degrees,
        };
        for row in 0..rows {
            for column in 0..columns {
                let here = grid.intersection(row, column);
                if column + 1 < columns {
                    let east = grid.intersection(row, column + 1);
                    grid.map
                        .add_street(format!("Row {row} Street"), here.clone(), east);
                }
                if row + 1 < rows {
                    let north = grid.intersection(row + 1, column);
                    grid.map.add_street(format!("Column {column} Avenue"), here, north);
                }
            }
        }
        grid
    }

    /// Coordinate of the intersection at `(row, column)`.
    ///
    /// Positions outside the grid still produce a coordinate, which is not a
    /// vertex of the map.
    pub fn intersection(&self, row: usize, column: usize) -> Coordinate {
        let latitude = self.origin_latitude + self.spacing_degrees * index_as_f64(row);
        let longitude = self.origin_longitude + self.spacing_degrees * index_as_f64(column);
        coordinate(&format!("{latitude:.6}"), &format!("{longitude:.6}"))
    }

    /// Number of east-west streets.
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of north-south avenues.
    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// The underlying street map.
    pub const fn map(&self) -> &StreetMap {
        &self.map
    }

    /// Mutable access for adding extra streets in a test.
    pub const fn map_mut(&mut self) -> &mut StreetMap {
        &mut self.map
    }

    /// Consume the grid, returning its street map.
    pub fn into_map(self) -> StreetMap {
        self.map
    }
}

fn index_as_f64(index: usize) -> f64 {
    u32::try_from(index).map_or(f64::from(u32::MAX), f64::from)
}
