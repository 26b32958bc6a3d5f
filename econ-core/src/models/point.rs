/// A point in (quantity, price) space
///
/// Points are the vertices of every curve line and surplus polygon the engine
/// produces, and also serve as the chart bounds of a model. Quantity runs along
/// the horizontal axis and price along the vertical one.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema), schemars(inline))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    /// The quantity (horizontal) coordinate
    pub quantity: f64,
    /// The price (vertical) coordinate
    pub price: f64,
}

impl Point {
    /// Creates a point from its coordinates
    pub const fn new(quantity: f64, price: f64) -> Self {
        Self { quantity, price }
    }

    /// Whether both coordinates agree with `other` to within `tolerance`
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        (self.quantity - other.quantity).abs() <= tolerance
            && (self.price - other.price).abs() <= tolerance
    }

    /// The z-component of the cross product of the two position vectors.
    ///
    /// Summing this over consecutive vertices yields twice the signed area of a
    /// polygon (the shoelace formula).
    pub fn cross(&self, other: &Self) -> f64 {
        self.quantity * other.price - other.quantity * self.price
    }
}

impl From<(f64, f64)> for Point {
    fn from((quantity, price): (f64, f64)) -> Self {
        Self { quantity, price }
    }
}
