use crate::Coordinate;

/// An item to drop off at a street coordinate.
///
/// # Examples
/// ```
/// use courier_core::{Coordinate, DeliveryStop};
///
/// # fn main() -> Result<(), courier_core::CoordinateError> {
/// let stop = DeliveryStop::new(Coordinate::new("34.0712323", "-118.4505969")?, "Chicken tenders");
/// assert_eq!(stop.item, "Chicken tenders");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeliveryStop {
    /// Where the item is delivered.
    pub location: Coordinate,
    /// Free-form item description.
    pub item: String,
}

impl DeliveryStop {
    /// Construct a stop delivering `item` at `location`.
    pub fn new(location: Coordinate, item: impl Into<String>) -> Self {
        Self {
            location,
            item: item.into(),
        }
    }
}
