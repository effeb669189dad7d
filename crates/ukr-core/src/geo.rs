//! Planar coordinates.
//!
//! All inputs are expected in a projected metric CRS (British National Grid
//! in practice), so plain Euclidean distance is in metres.

/// A projected coordinate pair in metres.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coord {
    pub easting:  f64,
    pub northing: f64,
}

impl Coord {
    #[inline]
    pub fn new(easting: f64, northing: f64) -> Self {
        Self { easting, northing }
    }

    /// Euclidean distance in metres.
    #[inline]
    pub fn distance(self, other: Coord) -> f64 {
        self.distance_2(other).sqrt()
    }

    /// Squared Euclidean distance.  Cheaper than [`distance`](Self::distance)
    /// when only comparing against a radius.
    #[inline]
    pub fn distance_2(self, other: Coord) -> f64 {
        let de = self.easting - other.easting;
        let dn = self.northing - other.northing;
        de * de + dn * dn
    }

    /// `false` if either component is NaN or infinite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.easting.is_finite() && self.northing.is_finite()
    }

    /// `[easting, northing]`, the point layout used by the R-tree.
    #[inline]
    pub fn to_array(self) -> [f64; 2] {
        [self.easting, self.northing]
    }
}

impl From<[f64; 2]> for Coord {
    fn from(p: [f64; 2]) -> Self {
        Coord::new(p[0], p[1])
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2})", self.easting, self.northing)
    }
}
