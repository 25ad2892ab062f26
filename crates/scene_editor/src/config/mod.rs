//! Configuration system
//!
//! Editor tunables (picking thresholds, gizmo proportions, camera defaults,
//! grid) loaded from TOML or RON, selected by file extension.

pub use serde::{Serialize, Deserialize};

use crate::editor::camera_controller::CameraMode;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A value failed validation
    #[error("Invalid value for {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// Picking subsystem settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickingConfig {
    /// Drag distance in pixels below which a press counts as a click
    pub drag_threshold: f32,
    /// Name of the colour target the renderer writes entity ids into
    pub target_name: String,
    /// Bytes per picking-buffer element
    pub element_size: u32,
}

impl Default for PickingConfig {
    fn default() -> Self {
        Self {
            drag_threshold: 6.0,
            target_name: "picking".to_string(),
            element_size: 4,
        }
    }
}

/// Transform gizmo proportions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GizmoConfig {
    /// Hit radius around handles in pixels
    pub selection_radius: f32,
    /// Handle length as a fraction of the pivot's clip-space depth
    pub size_factor: f32,
    /// Position of joint segments along each axis, as a fraction of handle length
    pub joint_factor: f32,
    /// Rotation ring radius as a fraction of handle length
    pub ring_factor: f32,
    /// Relative band around a ring that counts as a hit
    pub ring_tolerance: f32,
    /// Multiplier applied to drag deltas in scale mode
    pub scale_factor: f32,
}

impl Default for GizmoConfig {
    fn default() -> Self {
        Self {
            selection_radius: 5.0,
            size_factor: 0.1,
            joint_factor: 0.3,
            ring_factor: 0.75,
            ring_tolerance: 0.05,
            scale_factor: 0.1,
        }
    }
}

/// Main camera defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Near plane distance
    pub near: f32,
    /// Far plane distance
    pub far: f32,
    /// Invert vertical mouse look
    pub invert_y: bool,
    /// Controller driving the camera
    pub mode: CameraMode,
    /// Radians of orbit per pixel of mouse motion
    pub orbit_speed: f32,
    /// Distance change per wheel step, relative to current distance
    pub zoom_speed: f32,
    /// Units per second in fly mode
    pub fly_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 60.0,
            near: 0.1,
            far: 1000.0,
            invert_y: false,
            mode: CameraMode::Modelling,
            orbit_speed: 0.005,
            zoom_speed: 0.1,
            fly_speed: 10.0,
        }
    }
}

/// Editor grid settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Size of one cell in world units
    pub cell_size: f32,
    /// Total extent of the grid in world units
    pub size: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_size: 1.0,
            size: 100.0,
        }
    }
}

/// Aggregate editor configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Picking settings
    pub picking: PickingConfig,
    /// Gizmo settings
    pub gizmo: GizmoConfig,
    /// Camera settings
    pub camera: CameraConfig,
    /// Grid settings
    pub grid: GridConfig,
}

impl Config for EditorConfig {}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("expected a positive value, got {value}"),
        })
    }
}

impl EditorConfig {
    /// Load and validate a configuration file
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let config = Self::load_from_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the editor cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("picking.drag_threshold", self.picking.drag_threshold)?;
        if self.picking.element_size == 0 {
            return Err(ConfigError::Invalid {
                field: "picking.element_size",
                reason: "must be non-zero".to_string(),
            });
        }

        positive("gizmo.selection_radius", self.gizmo.selection_radius)?;
        positive("gizmo.size_factor", self.gizmo.size_factor)?;
        positive("gizmo.joint_factor", self.gizmo.joint_factor)?;
        positive("gizmo.ring_factor", self.gizmo.ring_factor)?;
        positive("gizmo.ring_tolerance", self.gizmo.ring_tolerance)?;
        positive("gizmo.scale_factor", self.gizmo.scale_factor)?;

        positive("camera.fov_degrees", self.camera.fov_degrees)?;
        positive("camera.near", self.camera.near)?;
        positive("camera.far", self.camera.far)?;
        if self.camera.far <= self.camera.near {
            return Err(ConfigError::Invalid {
                field: "camera.far",
                reason: "must be greater than camera.near".to_string(),
            });
        }

        positive("grid.cell_size", self.grid.cell_size)?;
        positive("grid.size", self.grid.size)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EditorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.picking.drag_threshold, 6.0);
        assert_eq!(config.picking.target_name, "picking");
        assert_eq!(config.gizmo.selection_radius, 5.0);
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config: EditorConfig = toml::from_str("[gizmo]\nselection_radius = 8.0\n").unwrap();
        assert_eq!(config.gizmo.selection_radius, 8.0);
        assert_eq!(config.gizmo.ring_factor, 0.75);
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn test_validate_rejects_inverted_clip_range() {
        let mut config = EditorConfig::default();
        config.camera.near = 10.0;
        config.camera.far = 1.0;

        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "camera.far", .. })
        ));
    }

    #[test]
    fn test_ron_roundtrip_through_file() {
        let path = std::env::temp_dir().join(format!("scene_editor_cfg_{}.ron", std::process::id()));
        let path = path.to_string_lossy().to_string();

        let mut config = EditorConfig::default();
        config.camera.invert_y = true;
        config.camera.mode = CameraMode::Fly;
        config.save_to_file(&path).unwrap();

        let loaded = EditorConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_unknown_extension_rejected() {
        assert!(matches!(
            EditorConfig::default().save_to_file("editor.json"),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }
}
