//! Lumen: a progressive CPU path tracer for sphere scenes.
//!
//! The crate owns the numeric core only. A host application creates the window,
//! forwards input to [`CameraInput`], calls [`Camera::update`] and
//! [`Renderer::render`] once per UI frame and shows [`Renderer::final_image`].

use nalgebra::Vector4;

pub mod camera;
pub mod config;
pub mod input;
pub mod lumen;
pub mod util;

pub use camera::Camera;
pub use input::{CameraInput, Movement};
pub use lumen::ray::{HitPayload, Ray};
pub use lumen::scene::{Material, Scene, SceneError, Sphere};
pub use lumen::{Renderer, Settings};

/// Clamp to `[0, 1]` and pack as `0xAABBGGRR`.
pub fn vec4_to_rgba(color: &Vector4<f32>) -> u32 {
    let channel = |value: f32| (value.clamp(0.0, 1.0) * 255.0) as u32;

    (channel(color.w) << 24) | (channel(color.z) << 16) | (channel(color.y) << 8) | channel(color.x)
}
