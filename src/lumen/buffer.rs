use std::path::Path;

use bytemuck::cast_slice;
use image::{ColorType, ImageResult};

/// Row-major pixel storage, reallocated wholesale on resize.
#[derive(Debug, Clone)]
pub struct FrameBuffer<T> {
    width: u32,
    height: u32,
    blank: T,
    pixels: Vec<T>,
}

impl<T: Copy> FrameBuffer<T> {
    pub fn new(width: u32, height: u32, blank: T) -> Self {
        Self {
            width,
            height,
            blank,
            pixels: vec![blank; (width * height) as usize],
        }
    }

    /// 크기가 바뀌었으면 새로 할당하고 true. 이전 내용은 버림.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if self.width == width && self.height == height {
            return false;
        }

        self.width = width;
        self.height = height;
        self.pixels = vec![self.blank; (width * height) as usize];
        true
    }

    pub fn clear(&mut self) {
        self.pixels.fill(self.blank);
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn get(&self, x: u32, y: u32) -> T {
        self.pixels[(x + y * self.width) as usize]
    }

    pub fn pixels(&self) -> &[T] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [T] {
        &mut self.pixels
    }
}

impl FrameBuffer<u32> {
    /// Native-endian byte view of the packed pixels, for texture uploads.
    pub fn as_bytes(&self) -> &[u8] {
        cast_slice(&self.pixels)
    }

    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> ImageResult<()> {
        // u32 안에 ABGR 순서로 들어있어서 little endian에서 바이트로 보면 RGBA
        let bytes: Vec<u8> = self
            .pixels
            .iter()
            .flat_map(|pixel| pixel.to_le_bytes())
            .collect();

        image::save_buffer(path, &bytes, self.width, self.height, ColorType::Rgba8)
    }
}
