use std::fs;
use std::path::{Path, PathBuf};

use nalgebra::{Point3, Vector3};
use serde::Deserialize;
use thiserror::Error;

use crate::camera::Camera;
use crate::lumen::scene::{Scene, SceneError};
use crate::lumen::Settings;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error("invalid scene")]
    Scene(#[from] SceneError),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CameraConfig {
    /// degrees
    pub vertical_fov: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
    pub forward: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            vertical_fov: 45.0,
            near: 0.1,
            far: 100.0,
            position: [0.0, 0.0, 6.0],
            forward: [0.0, 0.0, -1.0],
        }
    }
}

impl CameraConfig {
    pub fn build(&self, width: u32, height: u32) -> Camera {
        let mut camera = Camera::new(self.vertical_fov, self.near, self.far);
        camera.resize(width, height);
        camera.set_position(Point3::from(self.position));
        camera.set_forward(Vector3::from(self.forward));
        camera
    }
}

/// A headless render run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub frames: u32,
    pub output: PathBuf,
    pub camera: CameraConfig,
    pub settings: Settings,
    pub scene: Option<Scene>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 360,
            frames: 64,
            output: PathBuf::from("lumen.png"),
            camera: CameraConfig::default(),
            settings: Settings::default(),
            scene: None,
        }
    }
}

impl RenderConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "image size {}x{} has no pixels",
                self.width, self.height
            )));
        }
        if self.frames == 0 {
            return Err(ConfigError::Invalid("frames must be at least 1".into()));
        }

        let camera = &self.camera;
        if !(camera.vertical_fov > 0.0 && camera.vertical_fov < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "vertical fov {} must be between 0 and 180 degrees",
                camera.vertical_fov
            )));
        }
        if !(camera.near > 0.0 && camera.near < camera.far) {
            return Err(ConfigError::Invalid(format!(
                "clip range {}..{} is empty",
                camera.near, camera.far
            )));
        }
        if Vector3::from(camera.forward).norm() == 0.0 {
            return Err(ConfigError::Invalid("camera forward is zero".into()));
        }

        if let Some(scene) = &self.scene {
            scene.validate()?;
        }

        Ok(())
    }

    /// The configured scene, or the built-in demo scene.
    pub fn scene(&self) -> Scene {
        self.scene.clone().unwrap_or_else(Scene::demo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(RenderConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: RenderConfig =
            serde_json::from_str(r#"{ "width": 32, "settings": { "sky": [0.6, 0.7, 0.9] } }"#)
                .unwrap();

        assert_eq!(config.width, 32);
        assert_eq!(config.height, 360);
        assert!(config.settings.accumulate);
        assert_eq!(config.settings.sky, Some(Vector3::new(0.6, 0.7, 0.9)));
        assert_eq!(config.scene(), Scene::demo());
    }

    #[test]
    fn test_rejects_bad_camera() {
        let mut config = RenderConfig::default();
        config.camera.vertical_fov = 180.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = RenderConfig::default();
        config.camera.near = 10.0;
        config.camera.far = 1.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_empty_image() {
        let config = RenderConfig {
            height: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_bad_scene() {
        let mut scene = Scene::demo();
        scene.spheres[0].material_index = 10;
        let config = RenderConfig {
            scene: Some(scene),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Scene(SceneError::MaterialIndex { index: 10, .. }))
        ));
    }

    #[test]
    fn test_camera_build() {
        let config = CameraConfig {
            position: [1.0, 2.0, 3.0],
            forward: [0.0, 0.0, -2.0],
            ..Default::default()
        };
        let camera = config.build(4, 2);

        assert_eq!(camera.viewport(), (4, 2));
        assert_eq!(camera.position(), Point3::new(1.0, 2.0, 3.0));
        assert!((camera.forward().z + 1.0).abs() < 1e-6);
        assert_eq!(camera.ray_directions().len(), 8);
    }

    #[test]
    fn test_top_down_camera() {
        let config = RenderConfig {
            width: 5,
            height: 5,
            camera: CameraConfig {
                position: [0.0, 5.0, 0.0],
                forward: [0.0, -1.0, 0.0],
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        let camera = config.camera.build(config.width, config.height);
        assert!(camera
            .ray_directions()
            .iter()
            .all(|ray| ray.iter().all(|v| v.is_finite())));

        // 위에서 내려다보면 가운데 빔은 demo 장면의 구에 맞아야 함
        let scene = config.scene();
        let center = crate::Ray::new(camera.position(), camera.ray_directions()[12].into_inner());
        let hit = crate::lumen::trace::trace_ray(&center, &scene).unwrap();
        assert_eq!(hit.object_index, 0);
        assert!((hit.hit_distance - 4.0).abs() < 1e-4);
    }
}
