use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_WORKSPACE: &str = ".";
pub const DEFAULT_POINTS_COLLECTION: &str = "locations";
pub const DEFAULT_POLYGONS_COLLECTION: &str = "overlays";
pub const DEFAULT_SPATIAL_REFERENCE: &str = "WGS84";

/// Optional TOML configuration. Every field can also be set on the command
/// line; CLI flags win over the file.
#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub input: Option<PathBuf>,
    #[serde(default)]
    pub workspace: Option<PathBuf>,
    #[serde(default)]
    pub points_collection: Option<String>,
    #[serde(default)]
    pub polygons_collection: Option<String>,
    #[serde(default)]
    pub spatial_reference: Option<String>,
    #[serde(default)]
    pub verbose: bool,
}

impl FileConfig {
    pub fn load() -> Option<Self> {
        let config_paths = get_config_paths();

        for path in config_paths {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(&path)
            {
                match toml::from_str(&contents) {
                    Ok(config) => return Some(config),
                    Err(e) => {
                        eprintln!("Warning: Failed to parse config file {:?}: {}", path, e);
                    }
                }
            }
        }
        None
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("kml2layers.toml"));
    paths.push(PathBuf::from(".kml2layers.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("kml2layers").join("config.toml"));
        paths.push(config_dir.join("kml2layers.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".kml2layers.toml"));
        paths.push(home.join(".config").join("kml2layers").join("config.toml"));
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config: FileConfig = toml::from_str(
            r#"
input = "middle-earth.kml"
workspace = "out"
points_collection = "cities"
polygons_collection = "realms"
spatial_reference = "EPSG:4326"
verbose = true
"#,
        )
        .unwrap();

        assert_eq!(config.input, Some(PathBuf::from("middle-earth.kml")));
        assert_eq!(config.workspace, Some(PathBuf::from("out")));
        assert_eq!(config.points_collection.as_deref(), Some("cities"));
        assert_eq!(config.polygons_collection.as_deref(), Some("realms"));
        assert_eq!(config.spatial_reference.as_deref(), Some("EPSG:4326"));
        assert!(config.verbose);
    }

    #[test]
    fn test_parse_empty_config() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert!(config.input.is_none());
        assert!(config.workspace.is_none());
        assert!(!config.verbose);
    }
}
