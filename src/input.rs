use nalgebra::Vector2;
use winit::event::{ElementState, KeyboardInput, MouseButton, VirtualKeyCode, WindowEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Forward,
    Left,
    Backward,
    Right,
    Up,
    Down,
}

impl Movement {
    pub const ALL: [Movement; 6] = [
        Movement::Forward,
        Movement::Left,
        Movement::Backward,
        Movement::Right,
        Movement::Up,
        Movement::Down,
    ];

    fn from_key(key: VirtualKeyCode) -> Option<Self> {
        Some(match key {
            VirtualKeyCode::W => Movement::Forward,
            VirtualKeyCode::A => Movement::Left,
            VirtualKeyCode::S => Movement::Backward,
            VirtualKeyCode::D => Movement::Right,
            VirtualKeyCode::Space | VirtualKeyCode::E => Movement::Up,
            VirtualKeyCode::LShift | VirtualKeyCode::Q => Movement::Down,
            _ => return None,
        })
    }
}

/// What the camera polls every frame: held movement keys, cursor position, look mode.
#[derive(Debug, Default, Clone)]
pub struct CameraInput {
    // WASD SPACE SHIFT
    held: [bool; 6],
    pointer: Vector2<f32>,
    last_pointer: Vector2<f32>,
    looking: bool,
}

impl CameraInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a window event. Returns true if the event was consumed.
    pub fn handle_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.set_pointer(position.x as f32, position.y as f32);
                true
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Right,
                ..
            } => {
                self.set_looking(matches!(state, ElementState::Pressed));
                true
            }
            WindowEvent::KeyboardInput {
                input:
                    KeyboardInput {
                        state,
                        virtual_keycode: Some(key),
                        ..
                    },
                ..
            } => match Movement::from_key(*key) {
                Some(movement) => {
                    self.set_held(movement, matches!(state, ElementState::Pressed));
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    pub fn set_held(&mut self, movement: Movement, held: bool) {
        self.held[movement as usize] = held;
    }

    pub fn is_held(&self, movement: Movement) -> bool {
        self.held[movement as usize]
    }

    pub fn set_pointer(&mut self, x: f32, y: f32) {
        self.pointer = Vector2::new(x, y);
    }

    pub fn set_looking(&mut self, looking: bool) {
        self.looking = looking;
    }

    pub fn is_looking(&self) -> bool {
        self.looking
    }

    /// Pointer movement since the previous call.
    pub fn take_pointer_delta(&mut self) -> Vector2<f32> {
        let delta = self.pointer - self.last_pointer;
        self.last_pointer = self.pointer;
        delta
    }
}
