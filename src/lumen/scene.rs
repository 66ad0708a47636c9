use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Material {
    pub albedo: Vector3<f32>,
    /// 0 = 거울, 1 = 완전 난반사
    pub roughness: f32,
    /// Not read by the shader yet.
    pub metallic: f32,
    pub emission_color: Vector3<f32>,
    pub emission_power: f32,
}

impl Material {
    pub fn emission(&self) -> Vector3<f32> {
        self.emission_color * self.emission_power
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            albedo: Vector3::new(1.0, 1.0, 1.0),
            roughness: 1.0,
            metallic: 0.0,
            emission_color: Vector3::zeros(),
            emission_power: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sphere {
    pub position: Vector3<f32>,
    pub radius: f32,
    pub material_index: usize,
}

impl Default for Sphere {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            radius: 0.5,
            material_index: 0,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SceneError {
    #[error("sphere {sphere} uses material {index} but the scene has {count} materials")]
    MaterialIndex {
        sphere: usize,
        index: usize,
        count: usize,
    },
    #[error("sphere {sphere} has non-positive radius {radius}")]
    Radius { sphere: usize, radius: f32 },
}

/// Spheres refer to materials by index only.
///
/// The renderer never validates a scene. Whoever edits it calls [`Scene::validate`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scene {
    pub spheres: Vec<Sphere>,
    pub materials: Vec<Material>,
}

impl Scene {
    pub fn validate(&self) -> Result<(), SceneError> {
        for (sphere_index, sphere) in self.spheres.iter().enumerate() {
            if !(sphere.radius > 0.0) {
                return Err(SceneError::Radius {
                    sphere: sphere_index,
                    radius: sphere.radius,
                });
            }
            if sphere.material_index >= self.materials.len() {
                return Err(SceneError::MaterialIndex {
                    sphere: sphere_index,
                    index: sphere.material_index,
                    count: self.materials.len(),
                });
            }
        }
        Ok(())
    }

    /// Pink sphere on a large blue ground sphere, lit by an orange emitter.
    pub fn demo() -> Self {
        let pink = Material {
            albedo: Vector3::new(1.0, 0.0, 1.0),
            roughness: 0.0,
            ..Default::default()
        };
        let blue = Material {
            albedo: Vector3::new(0.2, 0.3, 1.0),
            roughness: 0.1,
            ..Default::default()
        };
        let orange = Material {
            albedo: Vector3::new(0.8, 0.5, 0.2),
            roughness: 0.1,
            emission_color: Vector3::new(0.8, 0.5, 0.2),
            emission_power: 2.0,
            ..Default::default()
        };

        Self {
            spheres: vec![
                Sphere {
                    position: Vector3::zeros(),
                    radius: 1.0,
                    material_index: 0,
                },
                Sphere {
                    position: Vector3::new(2.0, 0.0, 0.0),
                    radius: 1.0,
                    material_index: 2,
                },
                Sphere {
                    position: Vector3::new(0.0, -101.0, 0.0),
                    radius: 100.0,
                    material_index: 1,
                },
            ],
            materials: vec![pink, blue, orange],
        }
    }
}
