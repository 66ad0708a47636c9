use nalgebra::{Point3, Unit, Vector3};

/// `direction` does not have to be unit length; intersection solves the full quadratic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3<f32>,
    pub direction: Vector3<f32>,
}

impl Ray {
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Self {
        Self { origin, direction }
    }

    pub fn at(&self, distance: f32) -> Point3<f32> {
        self.origin + self.direction * distance
    }
}

// HitPayload는 교차 정보만 담음. 색상은 적분기에서 재질을 찾아 계산함.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitPayload {
    pub hit_distance: f32,
    pub world_position: Point3<f32>,
    pub world_normal: Unit<Vector3<f32>>,
    pub object_index: usize,
}
