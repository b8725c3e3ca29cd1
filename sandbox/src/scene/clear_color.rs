use gl_wrapper::Renderer;

use winit::event::{ModifiersState, VirtualKeyCode};

use super::Scene;

pub const NAME: &str = "Clear color";

const STEP: f32 = 0.05;

/// Fills the window with an editable color. `R`/`G`/`B`/`A` raise a channel,
/// with `Shift` held they lower it.
pub struct ClearColor {
    color: [f32; 4],
}

impl Default for ClearColor {
    fn default() -> Self {
        Self {
            color: [0.2, 0.3, 0.3, 1.0],
        }
    }
}

impl ClearColor {
    pub fn color(&self) -> [f32; 4] {
        self.color
    }
}

impl Scene for ClearColor {
    fn on_render(&mut self, renderer: &Renderer) {
        renderer.set_clear_color(self.color);
        renderer.clear();
    }

    fn on_key(&mut self, key: VirtualKeyCode, modifiers: ModifiersState) {
        let channel = match key {
            VirtualKeyCode::R => 0,
            VirtualKeyCode::G => 1,
            VirtualKeyCode::B => 2,
            VirtualKeyCode::A => 3,
            _ => return,
        };

        let step = if modifiers.shift() { -STEP } else { STEP };
        self.color[channel] = (self.color[channel] + step).clamp(0.0, 1.0);
    }
}
