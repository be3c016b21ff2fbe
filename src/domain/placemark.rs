use geo::Point;

/// A single named point of interest taken from a `<Placemark>` element.
///
/// Built once per placemark, handed to the sink, and discarded. The position
/// follows KML axis order: x is longitude, y is latitude.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacemarkFeature {
    pub name: String,
    pub position: Point<f64>,
}

impl PlacemarkFeature {
    pub fn new(name: String, longitude: f64, latitude: f64) -> Self {
        Self {
            name,
            position: Point::new(longitude, latitude),
        }
    }
}
