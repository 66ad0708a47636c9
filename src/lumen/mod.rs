use std::marker::PhantomData;

use log::{debug, trace, warn};
use nalgebra::{Vector3, Vector4};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::lumen::buffer::FrameBuffer;
use crate::lumen::integrator::Integrator;
use crate::lumen::scene::Scene;
use crate::util::{PcgSampler, SeededSampler};
use crate::vec4_to_rgba;

pub mod buffer;
pub mod integrator;
pub mod ray;
pub mod scene;
pub mod trace;

/// Per-frame knobs, handed to every [`Renderer::render`] call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub accumulate: bool,
    /// Light picked up by a ray that escapes the scene. `None` adds nothing.
    pub sky: Option<Vector3<f32>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            accumulate: true,
            sky: None,
        }
    }
}

/// Progressive frame compositor.
///
/// Every [`render`](Renderer::render) call traces one path per pixel, adds it to the
/// accumulation buffer and writes `sum / frame_index` into the display buffer.
pub struct Renderer<S = PcgSampler> {
    final_image: FrameBuffer<u32>,
    accumulation: FrameBuffer<Vector4<f32>>,
    frame_index: u32,
    sampler: PhantomData<fn() -> S>,
}

impl Renderer<PcgSampler> {
    pub fn new() -> Self {
        Self::with_sampler()
    }
}

impl Default for Renderer<PcgSampler> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SeededSampler> Renderer<S> {
    pub fn with_sampler() -> Self {
        Self {
            final_image: FrameBuffer::new(0, 0, 0),
            accumulation: FrameBuffer::new(0, 0, Vector4::zeros()),
            frame_index: 1,
            sampler: PhantomData,
        }
    }

    /// Must be paired with [`Camera::resize`] using the same dimensions.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        let resized = self.final_image.resize(width, height);
        let resized = self.accumulation.resize(width, height) || resized;
        if resized {
            debug!("renderer buffers resized to {width}x{height}");
            self.frame_index = 1;
        }
    }

    pub fn render(&mut self, scene: &Scene, camera: &Camera, settings: &Settings) {
        let width = self.final_image.width();
        let height = self.final_image.height();

        if self.final_image.is_empty() {
            return;
        }
        if camera.viewport() != (width, height) {
            let (camera_width, camera_height) = camera.viewport();
            warn!(
                "camera viewport {camera_width}x{camera_height} does not match renderer {width}x{height}, skipping frame"
            );
            return;
        }

        if !settings.accumulate {
            self.frame_index = 1;
        }
        // 첫 프레임이면 이전 누적값을 지움
        if self.frame_index == 1 {
            self.accumulation.clear();
        }

        let integrator = Integrator {
            scene,
            camera,
            settings,
            width,
            frame_index: self.frame_index,
        };
        let frame = self.frame_index as f32;

        self.accumulation
            .pixels_mut()
            .par_iter_mut()
            .zip(self.final_image.pixels_mut().par_iter_mut())
            .enumerate()
            .for_each(|(index, (accumulated, pixel))| {
                let x = index as u32 % width;
                let y = index as u32 / width;

                *accumulated += integrator.per_pixel::<S>(x, y);
                *pixel = vec4_to_rgba(&(*accumulated / frame));
            });

        trace!("rendered frame {} at {width}x{height}", self.frame_index);

        if settings.accumulate {
            self.frame_index = self.frame_index.saturating_add(1);
        } else {
            self.frame_index = 1;
        }
    }

    /// Start a new accumulation sequence on the next frame.
    pub fn reset_frame_index(&mut self) {
        self.frame_index = 1;
    }

    pub fn frame_index(&self) -> u32 {
        self.frame_index
    }

    pub fn final_image(&self) -> &FrameBuffer<u32> {
        &self.final_image
    }

    pub fn accumulation(&self) -> &FrameBuffer<Vector4<f32>> {
        &self.accumulation
    }
}
