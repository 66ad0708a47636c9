use nalgebra::Unit;

use crate::lumen::ray::{HitPayload, Ray};
use crate::lumen::scene::Scene;

/// Nearest sphere in front of the ray origin, or `None` on a miss.
///
/// Linear scan over every sphere. Ties keep the lower index.
pub fn trace_ray(ray: &Ray, scene: &Scene) -> Option<HitPayload> {
    let mut closest: Option<(usize, f32)> = None;

    for (index, sphere) in scene.spheres.iter().enumerate() {
        // a = 빔 시작
        // b = 빔 방향
        // r = 구 반지름
        // (bx^2 + by^2 + bz^2) * t^2 + 2 * (ax * bx + ay * by + az * bz) * t + (ax^2 + ay^2 + az^2 - r^2) = 0
        // 구가 원점에 있다고 가정한 식이라 빔 시작점을 구 중심만큼 옮겨서 풂.
        let origin = ray.origin - sphere.position;

        let a = ray.direction.magnitude_squared();
        let b = 2.0 * origin.coords.dot(&ray.direction);
        let c = origin.coords.magnitude_squared() - sphere.radius * sphere.radius;

        // 판별식
        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            continue;
        }

        let distance = (-b - discriminant.sqrt()) / (2.0 * a);
        // NaN도 여기서 걸러짐
        if !(distance > 0.0) {
            continue;
        }

        match closest {
            Some((_, previous)) if previous <= distance => {}
            _ => closest = Some((index, distance)),
        }
    }

    closest.map(|(index, distance)| closest_hit(ray, scene, distance, index))
}

pub fn closest_hit(ray: &Ray, scene: &Scene, distance: f32, object_index: usize) -> HitPayload {
    let sphere = &scene.spheres[object_index];

    let local_origin = ray.origin - sphere.position;
    let local_position = local_origin + ray.direction * distance;

    HitPayload {
        hit_distance: distance,
        world_position: ray.at(distance),
        world_normal: Unit::new_normalize(local_position.coords),
        object_index,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lumen::scene::{Material, Sphere};
    use nalgebra::{Point3, Vector3};

    fn scene(spheres: Vec<Sphere>) -> Scene {
        Scene {
            spheres,
            materials: vec![Material::default()],
        }
    }

    fn sphere(x: f32, y: f32, z: f32, radius: f32) -> Sphere {
        Sphere {
            position: Vector3::new(x, y, z),
            radius,
            material_index: 0,
        }
    }

    #[test]
    fn test_hit_distance_toward_center() {
        let scene = scene(vec![sphere(1.0, 2.0, -3.0, 1.5)]);
        let origin = Point3::new(4.0, -1.0, 5.0);
        let center = Point3::new(1.0, 2.0, -3.0);
        let ray = Ray::new(origin, (center - origin).normalize());

        let hit = trace_ray(&ray, &scene).expect("ray aimed at center must hit");
        let expected = (center - origin).norm() - 1.5;
        assert!((hit.hit_distance - expected).abs() < 1e-4);

        let normal = (hit.world_position - center).normalize();
        assert!((hit.world_normal.into_inner() - normal).norm() < 1e-4);
    }

    #[test]
    fn test_unnormalized_direction() {
        let scene = scene(vec![sphere(0.0, 0.0, 0.0, 1.0)]);
        let ray = Ray::new(Point3::new(0.0, 0.0, 5.0), Vector3::new(0.0, 0.0, -2.0));

        let hit = trace_ray(&ray, &scene).unwrap();
        // t는 방향 벡터 길이 단위
        assert!((hit.hit_distance - 2.0).abs() < 1e-5);
        assert!((hit.world_position - Point3::new(0.0, 0.0, 1.0)).norm() < 1e-5);
    }

    #[test]
    fn test_only_positive_root_selected() {
        let scene = scene(vec![sphere(0.0, 0.0, 0.0, 1.0)]);
        let ray = Ray::new(Point3::new(0.0, 3.0, 0.0), Vector3::new(0.0, -1.0, 0.0));

        let hit = trace_ray(&ray, &scene).unwrap();
        assert!((hit.hit_distance - 2.0).abs() < 1e-5);
        assert!((hit.world_normal.into_inner() - Vector3::y()).norm() < 1e-5);
    }

    #[test]
    fn test_sphere_behind_is_miss() {
        let scene = scene(vec![sphere(0.0, 0.0, 5.0, 1.0)]);
        let ray = Ray::new(Point3::origin(), Vector3::new(0.0, 0.0, -1.0));
        assert!(trace_ray(&ray, &scene).is_none());
    }

    #[test]
    fn test_inside_sphere_is_miss() {
        // near root is negative from inside, far root is never considered
        let scene = scene(vec![sphere(0.0, 0.0, 0.0, 10.0)]);
        let ray = Ray::new(Point3::origin(), Vector3::new(1.0, 0.0, 0.0));
        assert!(trace_ray(&ray, &scene).is_none());
    }

    #[test]
    fn test_ray_passing_outside_misses() {
        let scene = scene(vec![sphere(0.0, 0.0, 0.0, 1.0), sphere(5.0, 0.0, 0.0, 1.0)]);
        let ray = Ray::new(Point3::new(-10.0, 2.0, 0.0), Vector3::new(1.0, 0.0, 0.0));
        assert!(trace_ray(&ray, &scene).is_none());
    }

    #[test]
    fn test_nearest_sphere_wins() {
        let scene = scene(vec![
            sphere(0.0, 0.0, -10.0, 1.0),
            sphere(0.0, 0.0, -4.0, 1.0),
            sphere(0.0, 0.0, -7.0, 1.0),
        ]);
        let ray = Ray::new(Point3::origin(), Vector3::new(0.0, 0.0, -1.0));

        let hit = trace_ray(&ray, &scene).unwrap();
        assert_eq!(hit.object_index, 1);
        assert!((hit.hit_distance - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_coincident_spheres_keep_first() {
        let scene = scene(vec![sphere(0.0, 0.0, -4.0, 1.0), sphere(0.0, 0.0, -4.0, 1.0)]);
        let ray = Ray::new(Point3::origin(), Vector3::new(0.0, 0.0, -1.0));
        assert_eq!(trace_ray(&ray, &scene).unwrap().object_index, 0);
    }

    #[test]
    fn test_nan_direction_is_miss() {
        let scene = scene(vec![sphere(0.0, 0.0, 0.0, 1.0)]);
        let ray = Ray::new(Point3::new(0.0, 0.0, 3.0), Vector3::new(f32::NAN, f32::NAN, f32::NAN));
        assert!(trace_ray(&ray, &scene).is_none());
    }

    #[test]
    fn test_empty_scene_misses() {
        let ray = Ray::new(Point3::origin(), Vector3::new(0.0, 0.0, -1.0));
        assert!(trace_ray(&ray, &Scene::default()).is_none());
    }
}
