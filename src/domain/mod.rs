pub mod overlay;
pub mod placemark;

pub use overlay::{LatLonBounds, OverlayFeature};
pub use placemark::PlacemarkFeature;
