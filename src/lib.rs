//! kml2layers - Split KML placemarks and ground overlays into point and polygon feature layers

pub mod config;
pub mod domain;
pub mod error;
pub mod extract;
pub mod kml;
pub mod sink;
