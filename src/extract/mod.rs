//! The two extraction passes: placemarks to point records, ground overlays to
//! polygon records.
//!
//! Each pass iterates its element list in document order and hands every
//! feature to the sink as soon as it is built. The first bad element aborts
//! the rest of that pass; the caller decides whether the other pass still
//! runs (it does - the passes are independent).

use crate::domain::{LatLonBounds, OverlayFeature, PlacemarkFeature};
use crate::error::ConvertError;
use crate::kml::KmlElement;
use crate::sink::FeatureWriter;

/// Build a `PlacemarkFeature` from one placemark element.
///
/// The coordinate string follows KML axis order: the first token is the
/// longitude, the second the latitude. A trailing altitude token is ignored.
pub fn extract_placemark(element: &KmlElement) -> Result<PlacemarkFeature, ConvertError> {
    let name = element
        .field("name")
        .ok_or(ConvertError::MissingField("name"))?;
    let coordinates = element
        .field("coordinates")
        .ok_or(ConvertError::MissingField("coordinates"))?;

    let (longitude, latitude) = parse_lon_lat(coordinates)?;
    Ok(PlacemarkFeature::new(name.to_string(), longitude, latitude))
}

fn parse_lon_lat(text: &str) -> Result<(f64, f64), ConvertError> {
    let tokens: Vec<&str> = text.split(',').collect();
    if tokens.len() < 2 {
        return Err(ConvertError::MalformedCoordinate(text.to_string()));
    }
    let longitude = parse_float(tokens[0])?;
    let latitude = parse_float(tokens[1])?;
    Ok((longitude, latitude))
}

fn parse_float(token: &str) -> Result<f64, ConvertError> {
    token
        .trim()
        .parse::<f64>()
        .map_err(|_| ConvertError::MalformedCoordinate(token.trim().to_string()))
}

/// Build an `OverlayFeature` from one ground-overlay element.
pub fn extract_overlay(element: &KmlElement) -> Result<OverlayFeature, ConvertError> {
    let name = element
        .field("name")
        .ok_or(ConvertError::MissingField("name"))?;

    let bounds = LatLonBounds {
        north: edge_field(element, "north")?,
        south: edge_field(element, "south")?,
        east: edge_field(element, "east")?,
        west: edge_field(element, "west")?,
    };

    Ok(OverlayFeature::new(name.to_string(), bounds))
}

fn edge_field(element: &KmlElement, tag: &'static str) -> Result<f64, ConvertError> {
    let text = element
        .field(tag)
        .ok_or(ConvertError::MissingField(tag))?;
    parse_float(text)
}

/// Convert every placemark into a point record, in document order.
///
/// Prints one diagnostic line per feature. Returns the number of records
/// inserted; the first extraction or sink failure aborts the remaining
/// elements, leaving earlier insertions in place.
pub fn run_point_pass<W: FeatureWriter>(
    placemarks: &[KmlElement],
    writer: &mut W,
) -> Result<usize, ConvertError> {
    let mut inserted = 0;
    for element in placemarks {
        let feature = extract_placemark(element)?;
        println!(
            "  {} ({}, {})",
            feature.name,
            feature.position.x(),
            feature.position.y()
        );
        writer.insert_point(feature.position, &feature.name)?;
        inserted += 1;
    }
    Ok(inserted)
}

/// Convert every ground overlay into a polygon record, in document order.
///
/// The corner ring is a fresh value per overlay; there is no buffer carried
/// between iterations.
pub fn run_polygon_pass<W: FeatureWriter>(
    overlays: &[KmlElement],
    writer: &mut W,
) -> Result<usize, ConvertError> {
    let mut inserted = 0;
    for element in overlays {
        let feature = extract_overlay(element)?;
        let corners = feature.corners();
        writer.insert_polygon(&corners, &feature.name)?;
        inserted += 1;
    }
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kml::KmlDocument;
    use crate::sink::SinkError;
    use geo::{Coord, Point};

    /// In-memory stand-in for the geometry store.
    #[derive(Default)]
    struct MemoryWriter {
        points: Vec<(String, Point<f64>)>,
        polygons: Vec<(String, Vec<Coord<f64>>)>,
    }

    impl FeatureWriter for MemoryWriter {
        fn insert_point(&mut self, position: Point<f64>, loc_name: &str) -> Result<(), SinkError> {
            self.points.push((loc_name.to_string(), position));
            Ok(())
        }

        fn insert_polygon(&mut self, ring: &[Coord<f64>], loc_name: &str) -> Result<(), SinkError> {
            self.polygons.push((loc_name.to_string(), ring.to_vec()));
            Ok(())
        }
    }

    fn placemark(name: &str, coordinates: &str) -> String {
        format!(
            "<Placemark><name>{}</name><Point><coordinates>{}</coordinates></Point></Placemark>",
            name, coordinates
        )
    }

    fn parse(body: &str) -> KmlDocument {
        KmlDocument::parse(&format!("<kml><Document>{}</Document></kml>", body)).unwrap()
    }

    #[test]
    fn test_point_pass_lon_lat_order() {
        let doc = parse(&placemark("X", "10.5,20.25,0"));
        let mut writer = MemoryWriter::default();

        let inserted = run_point_pass(&doc.placemarks, &mut writer).unwrap();
        assert_eq!(inserted, 1);
        assert_eq!(writer.points[0].0, "X");
        assert_eq!(writer.points[0].1, Point::new(10.5, 20.25));
    }

    #[test]
    fn test_point_pass_preserves_document_order() {
        let body = [
            placemark("A", "1,2"),
            placemark("B", "3,4"),
            placemark("C", "5,6"),
        ]
        .join("");
        let doc = parse(&body);
        let mut writer = MemoryWriter::default();

        run_point_pass(&doc.placemarks, &mut writer).unwrap();
        let names: Vec<&str> = writer.points.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_duplicate_names_are_not_deduplicated() {
        let body = [placemark("A", "1,2"), placemark("A", "1,2")].join("");
        let doc = parse(&body);
        let mut writer = MemoryWriter::default();

        assert_eq!(run_point_pass(&doc.placemarks, &mut writer).unwrap(), 2);
    }

    #[test]
    fn test_missing_coordinates_aborts_pass_after_earlier_inserts() {
        let body = format!(
            "{}<Placemark><name>B</name></Placemark>{}",
            placemark("A", "1,2"),
            placemark("C", "5,6"),
        );
        let doc = parse(&body);
        let mut writer = MemoryWriter::default();

        let err = run_point_pass(&doc.placemarks, &mut writer).unwrap_err();
        assert!(matches!(err, ConvertError::MissingField("coordinates")));
        // A made it in before the pass stopped; C never ran
        assert_eq!(writer.points.len(), 1);
        assert_eq!(writer.points[0].0, "A");
    }

    #[test]
    fn test_missing_name_error() {
        let doc = parse("<Placemark><Point><coordinates>1,2</coordinates></Point></Placemark>");
        let err = run_point_pass(&doc.placemarks, &mut MemoryWriter::default()).unwrap_err();
        assert!(matches!(err, ConvertError::MissingField("name")));
    }

    #[test]
    fn test_malformed_coordinates() {
        let doc = parse(&placemark("X", "abc,20"));
        let mut writer = MemoryWriter::default();

        let err = run_point_pass(&doc.placemarks, &mut writer).unwrap_err();
        assert!(matches!(err, ConvertError::MalformedCoordinate(_)));
        assert!(writer.points.is_empty());
    }

    #[test]
    fn test_single_token_coordinates() {
        let doc = parse(&placemark("X", "10.5"));
        let err = run_point_pass(&doc.placemarks, &mut MemoryWriter::default()).unwrap_err();
        assert!(matches!(err, ConvertError::MalformedCoordinate(_)));
    }

    fn overlay(name: &str, north: &str, south: &str, east: &str, west: &str) -> String {
        format!(
            "<GroundOverlay><name>{}</name><LatLonBox>\
             <north>{}</north><south>{}</south><east>{}</east><west>{}</west>\
             </LatLonBox></GroundOverlay>",
            name, north, south, east, west
        )
    }

    #[test]
    fn test_polygon_pass_corner_ring() {
        let doc = parse(&overlay("The Shire", "10", "0", "20", "-5"));
        let mut writer = MemoryWriter::default();

        let inserted = run_polygon_pass(&doc.overlays, &mut writer).unwrap();
        assert_eq!(inserted, 1);

        let (name, ring) = &writer.polygons[0];
        assert_eq!(name, "The Shire");
        assert_eq!(
            ring,
            &vec![
                Coord { x: -5.0, y: 10.0 },
                Coord { x: 20.0, y: 10.0 },
                Coord { x: 20.0, y: 0.0 },
                Coord { x: -5.0, y: 0.0 },
            ]
        );
    }

    #[test]
    fn test_overlay_missing_edge() {
        let raw = "<GroundOverlay><name>X</name><LatLonBox>\
                   <north>1</north><south>0</south><east>2</east>\
                   </LatLonBox></GroundOverlay>";
        let doc = parse(raw);

        let err = run_polygon_pass(&doc.overlays, &mut MemoryWriter::default()).unwrap_err();
        assert!(matches!(err, ConvertError::MissingField("west")));
    }

    #[test]
    fn test_overlay_non_numeric_edge() {
        let doc = parse(&overlay("X", "north-ish", "0", "2", "-2"));
        let err = run_polygon_pass(&doc.overlays, &mut MemoryWriter::default()).unwrap_err();
        assert!(matches!(err, ConvertError::MalformedCoordinate(_)));
    }

    #[test]
    fn test_polygon_pass_independent_rings() {
        let body = [
            overlay("A", "10", "0", "20", "-5"),
            overlay("B", "2", "1", "4", "3"),
        ]
        .join("");
        let doc = parse(&body);
        let mut writer = MemoryWriter::default();

        run_polygon_pass(&doc.overlays, &mut writer).unwrap();
        assert_eq!(writer.polygons.len(), 2);
        // The second ring carries no corners from the first
        assert_eq!(writer.polygons[1].1[0], Coord { x: 3.0, y: 2.0 });
    }

    #[test]
    fn test_empty_passes() {
        let doc = parse("");
        let mut writer = MemoryWriter::default();
        assert_eq!(run_point_pass(&doc.placemarks, &mut writer).unwrap(), 0);
        assert_eq!(run_polygon_pass(&doc.overlays, &mut writer).unwrap(), 0);
    }
}
