//! Material references.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A named material with texture paths relative to the filesystem root.
///
/// Paths stay relative until export time, when they are resolved
/// against the configured root and copied next to the scene file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    #[serde(default)]
    pub textures: Vec<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_json_round_trip() {
        let material = Material {
            name: "bark".to_string(),
            textures: vec!["trees/bark_albedo.png".into(), "trees/bark_normal.png".into()],
        };

        let json = serde_json::to_string(&material).unwrap();
        let back: Material = serde_json::from_str(&json).unwrap();
        assert_eq!(back, material);
    }

    #[test]
    fn test_textures_default_to_empty() {
        let material: Material = serde_json::from_str(r#"{"name":"flat"}"#).unwrap();
        assert_eq!(material.name, "flat");
        assert!(material.textures.is_empty());
    }
}
