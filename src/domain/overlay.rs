use geo::Coord;

/// The four bounding edges of a ground overlay, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLonBounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl LatLonBounds {
    /// Corner ring of the bounding box in the fixed order NW, NE, SE, SW.
    ///
    /// Coordinates are (longitude, latitude) pairs: the x of each corner is the
    /// east/west edge, the y is the north/south edge. Visiting the corners in
    /// this order keeps the ring non-self-intersecting; the sink closes it back
    /// to the first vertex.
    pub fn corners(&self) -> [Coord<f64>; 4] {
        [
            Coord {
                x: self.west,
                y: self.north,
            },
            Coord {
                x: self.east,
                y: self.north,
            },
            Coord {
                x: self.east,
                y: self.south,
            },
            Coord {
                x: self.west,
                y: self.south,
            },
        ]
    }
}

/// A rectangular ground overlay taken from a `<GroundOverlay>` element.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayFeature {
    pub name: String,
    pub bounds: LatLonBounds,
}

impl OverlayFeature {
    pub fn new(name: String, bounds: LatLonBounds) -> Self {
        Self { name, bounds }
    }

    pub fn corners(&self) -> [Coord<f64>; 4] {
        self.bounds.corners()
    }
}
