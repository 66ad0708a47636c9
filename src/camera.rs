use log::debug;
use nalgebra::{
    Isometry3, Matrix4, Perspective3, Point3, Unit, UnitQuaternion, Vector2, Vector3, Vector4,
};
use rayon::prelude::*;

use crate::input::{CameraInput, Movement};

const POINTER_SCALE: f32 = 0.002;

pub struct Camera {
    projection: Perspective3<f32>,
    inverse_projection: Matrix4<f32>,
    view: Isometry3<f32>,

    // degrees
    vertical_fov: f32,
    near: f32,
    far: f32,

    position: Point3<f32>,
    forward: Unit<Vector3<f32>>,

    rays: Vec<Unit<Vector3<f32>>>,

    viewport_width: u32,
    viewport_height: u32,
}

impl Camera {
    /// Camera at `(0, 0, 6)` looking down `-z`. The ray cache stays empty until the first resize.
    pub fn new(vertical_fov: f32, near: f32, far: f32) -> Self {
        let position = Point3::new(0.0, 0.0, 6.0);
        let forward = Unit::new_unchecked(-Vector3::z());
        let projection = Perspective3::new(1.0, vertical_fov.to_radians(), near, far);

        Self {
            inverse_projection: projection.inverse(),
            projection,
            view: look_at(&position, &forward),
            vertical_fov,
            near,
            far,
            position,
            forward,
            rays: vec![],
            viewport_width: 0,
            viewport_height: 0,
        }
    }

    /// Returns true if the camera moved or turned. Callers reset accumulation on true.
    ///
    /// Nothing happens unless look mode is on. The pointer delta is consumed either way.
    pub fn update(&mut self, input: &mut CameraInput, time_step: f32) -> bool {
        let delta = input.take_pointer_delta() * POINTER_SCALE;

        if !input.is_looking() {
            return false;
        }

        let up = Vector3::y_axis();
        let right = Unit::new_normalize(self.forward.cross(&up_hint(&self.forward)));
        let step = self.movement_speed() * time_step;
        let mut moved = false;

        for movement in Movement::ALL {
            if !input.is_held(movement) {
                continue;
            }
            let offset = match movement {
                Movement::Forward => self.forward.into_inner(),
                Movement::Backward => -self.forward.into_inner(),
                Movement::Right => right.into_inner(),
                Movement::Left => -right.into_inner(),
                Movement::Up => up.into_inner(),
                Movement::Down => -up.into_inner(),
            };
            self.position += offset * step;
            moved = true;
        }

        if delta != Vector2::zeros() {
            let pitch_delta = delta.y * self.rotation_speed();
            let yaw_delta = delta.x * self.rotation_speed();

            let q = UnitQuaternion::from_axis_angle(&right, -pitch_delta)
                * UnitQuaternion::from_axis_angle(&up, -yaw_delta);
            self.forward = q * self.forward;
            self.forward.renormalize_fast();
            moved = true;
        }

        if moved {
            self.reevaluate_view();
            self.reevaluate_rays();
        }

        moved
    }

    /// 크기가 같거나 0이면 아무것도 안함.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width == self.viewport_width && height == self.viewport_height {
            return;
        }

        self.viewport_width = width;
        self.viewport_height = height;

        self.reevaluate_projection();
        self.reevaluate_rays();
    }

    pub fn set_position(&mut self, position: Point3<f32>) {
        self.position = position;
        self.reevaluate_view();
        self.reevaluate_rays();
    }

    pub fn set_forward(&mut self, forward: Vector3<f32>) {
        self.forward = Unit::new_normalize(forward);
        self.reevaluate_view();
        self.reevaluate_rays();
    }

    pub fn set_vertical_fov(&mut self, degrees: f32) {
        self.vertical_fov = degrees;
        self.reevaluate_projection();
        self.reevaluate_rays();
    }

    pub fn rotation_speed(&self) -> f32 {
        0.3
    }

    pub fn movement_speed(&self) -> f32 {
        5.0
    }

    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    pub fn forward(&self) -> Unit<Vector3<f32>> {
        self.forward
    }

    pub fn vertical_fov(&self) -> f32 {
        self.vertical_fov
    }

    pub fn viewport(&self) -> (u32, u32) {
        (self.viewport_width, self.viewport_height)
    }

    pub fn projection(&self) -> &Matrix4<f32> {
        self.projection.as_matrix()
    }

    pub fn inverse_projection(&self) -> &Matrix4<f32> {
        &self.inverse_projection
    }

    pub fn view(&self) -> Matrix4<f32> {
        self.view.to_homogeneous()
    }

    pub fn inverse_view(&self) -> Matrix4<f32> {
        self.view.inverse().to_homogeneous()
    }

    /// Cached world-space directions, row-major with stride = viewport width.
    pub fn ray_directions(&self) -> &[Unit<Vector3<f32>>] {
        &self.rays
    }

    fn reevaluate_projection(&mut self) {
        let aspect = if self.viewport_height == 0 {
            1.0
        } else {
            self.viewport_width as f32 / self.viewport_height as f32
        };
        self.projection =
            Perspective3::new(aspect, self.vertical_fov.to_radians(), self.near, self.far);
        self.inverse_projection = self.projection.inverse();
    }

    fn reevaluate_view(&mut self) {
        self.view = look_at(&self.position, &self.forward);
    }

    fn reevaluate_rays(&mut self) {
        let count = (self.viewport_width * self.viewport_height) as usize;
        self.rays = (0..count)
            .into_par_iter()
            .map(|index| self.ray_direction(index))
            .collect();

        debug!(
            "rebuilt {} camera rays for {}x{}",
            self.rays.len(),
            self.viewport_width,
            self.viewport_height
        );
    }

    fn ray_direction(&self, index: usize) -> Unit<Vector3<f32>> {
        let width = self.viewport_width as f32;
        let height = self.viewport_height as f32;
        let x = (index as u32 % self.viewport_width) as f32;
        let y = (index as u32 / self.viewport_width) as f32;

        // 0번 행이 화면 위쪽
        let coord = Vector2::new(
            (x + 0.5) / width * 2.0 - 1.0,
            1.0 - (y + 0.5) / height * 2.0,
        );

        let target = self.inverse_projection * Vector4::new(coord.x, coord.y, 1.0, 1.0);
        let local = (target.xyz() / target.w).normalize();

        Unit::new_normalize(self.view.inverse_transform_vector(&local))
    }
}

/// World up, unless the camera looks straight up or down. Then -z stands in.
fn up_hint(forward: &Unit<Vector3<f32>>) -> Vector3<f32> {
    if forward.y.abs() > 0.999 {
        -Vector3::z()
    } else {
        Vector3::y()
    }
}

fn look_at(position: &Point3<f32>, forward: &Unit<Vector3<f32>>) -> Isometry3<f32> {
    let target = position + forward.into_inner();
    Isometry3::look_at_rh(position, &target, &up_hint(forward))
}
