use nalgebra::{Unit, Vector3, Vector4};

use crate::camera::Camera;
use crate::lumen::ray::Ray;
use crate::lumen::scene::Scene;
use crate::lumen::trace::trace_ray;
use crate::lumen::Settings;
use crate::util::SeededSampler;

pub const BOUNCE_LIMIT: u32 = 5;

// 표면에서 살짝 띄워야 자기 자신과 다시 부딪히지 않음
const SURFACE_OFFSET: f32 = 0.0001;

/// Everything one pixel needs. Read-only for the whole frame, shared across threads.
pub struct Integrator<'a> {
    pub scene: &'a Scene,
    pub camera: &'a Camera,
    pub settings: &'a Settings,
    pub width: u32,
    pub frame_index: u32,
}

impl Integrator<'_> {
    /// Seed for `(x, y)` in this frame. Each bounce adds its index on top.
    pub fn seed(&self, x: u32, y: u32) -> u32 {
        x.wrapping_add(y.wrapping_mul(self.width))
            .wrapping_mul(self.frame_index)
    }

    // DirectX의 RayGen 쉐이더와 같음
    pub fn per_pixel<S: SeededSampler>(&self, x: u32, y: u32) -> Vector4<f32> {
        let index = (x + y * self.width) as usize;
        let mut sampler = S::from_seed(self.seed(x, y));

        let mut ray = Ray::new(
            self.camera.position(),
            self.camera.ray_directions()[index].into_inner(),
        );

        let mut light = Vector3::zeros();
        let mut contribution = Vector3::new(1.0, 1.0, 1.0);

        for bounce in 0..BOUNCE_LIMIT {
            sampler.offset(bounce);

            let Some(payload) = trace_ray(&ray, self.scene) else {
                if let Some(sky) = self.settings.sky {
                    light += sky.component_mul(&contribution);
                }
                break;
            };

            let sphere = &self.scene.spheres[payload.object_index];
            let material = &self.scene.materials[sphere.material_index];

            contribution.component_mul_assign(&material.albedo);
            // emission is not attenuated by contribution
            light += material.emission();

            ray.origin = payload.world_position + payload.world_normal.as_ref() * SURFACE_OFFSET;

            let normal = Unit::new_normalize(
                payload.world_normal.as_ref()
                    + sampler.next_unit_vector().as_ref() * material.roughness,
            );
            ray.direction = reflect(&ray.direction, &normal);
        }

        Vector4::new(light.x, light.y, light.z, 1.0)
    }
}

pub fn reflect(direction: &Vector3<f32>, normal: &Unit<Vector3<f32>>) -> Vector3<f32> {
    direction - normal.as_ref() * (2.0 * direction.dot(normal.as_ref()))
}
