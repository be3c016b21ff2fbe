use std::fs;
use std::path::Path;

use crate::error::ConvertError;

/// Parse a KML file into the two element lists the converter cares about.
///
/// The whole file is read into memory and parsed once; the returned document is
/// read-only afterwards. Any I/O or XML error is a fatal `ParseFailure` - no
/// partial document is ever returned.
pub fn load(path: &Path) -> Result<KmlDocument, ConvertError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| ConvertError::ParseFailure(format!("{}: {}", path.display(), e)))?;
    KmlDocument::parse(&raw)
}

/// The subset of a KML document relevant to layer extraction: all placemark
/// and ground-overlay elements, each list in document order.
#[derive(Debug)]
pub struct KmlDocument {
    pub placemarks: Vec<KmlElement>,
    pub overlays: Vec<KmlElement>,
}

impl KmlDocument {
    /// Parse KML text. Tag names are matched case-insensitively, so documents
    /// produced by tools that lowercase markup still load.
    pub fn parse(raw: &str) -> Result<Self, ConvertError> {
        let doc = roxmltree::Document::parse(raw)
            .map_err(|e| ConvertError::ParseFailure(e.to_string()))?;

        let mut placemarks = Vec::new();
        let mut overlays = Vec::new();

        for node in doc.descendants().filter(|n| n.is_element()) {
            let tag = node.tag_name().name();
            if tag.eq_ignore_ascii_case("placemark") {
                placemarks.push(KmlElement::from_node(node));
            } else if tag.eq_ignore_ascii_case("groundoverlay") {
                overlays.push(KmlElement::from_node(node));
            }
        }

        Ok(Self {
            placemarks,
            overlays,
        })
    }
}

/// One placemark or ground-overlay element, flattened to its descendant tags.
///
/// Flattening resolves tags that KML nests one level down, like `coordinates`
/// inside `<Point>` or the edge tags inside `<LatLonBox>`, without the
/// extractors having to know the intermediate structure.
#[derive(Debug, Clone)]
pub struct KmlElement {
    fields: Vec<(String, String)>,
}

impl KmlElement {
    fn from_node(node: roxmltree::Node) -> Self {
        let fields = node
            .descendants()
            .filter(|n| n.is_element() && n.id() != node.id())
            .map(|n| {
                let text = n.text().map(str::trim).unwrap_or("");
                (n.tag_name().name().to_string(), text.to_string())
            })
            .collect();
        Self { fields }
    }

    /// Text of the first descendant tag matching `tag`, case-insensitively.
    pub fn field(&self, tag: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(tag))
            .map(|(_, text)| text.as_str())
    }
}
