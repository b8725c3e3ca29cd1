use glutin::config::{Config, ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, NotCurrentGlContextSurfaceAccessor,
    PossiblyCurrentContext, Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface};

use glutin_winit::DisplayBuilder;

use raw_window_handle::HasRawWindowHandle;

use std::ffi::CString;
use std::num::NonZeroU32;
use std::time::Instant;

use thiserror::Error;

use winit::dpi::{PhysicalSize, Size};
use winit::event::{ElementState, Event, ModifiersState, VirtualKeyCode, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use gl_wrapper::{NativeGl, Renderer};

use crate::config::Config as SandboxConfig;
use crate::scene::{menu_index, Scene, SceneEnv, SceneMenu};

const MENU_COLOR: [f32; 4] = [0.1, 0.1, 0.12, 1.0];

pub struct App {
    event_loop: EventLoop<()>,
    gl_context: PossiblyCurrentContext,
    gl_window: GlWindow,
    renderer: Renderer,
    env: SceneEnv,
    menu: SceneMenu,
    title: String,
}

impl App {
    pub fn new(config: &SandboxConfig, menu: SceneMenu) -> Result<Self, AppError> {
        let event_loop = EventLoop::new();
        let window_builder = WindowBuilder::new()
            .with_inner_size(Size::Physical(PhysicalSize::new(
                config.window.width,
                config.window.height,
            )))
            .with_min_inner_size(Size::Physical(PhysicalSize::new(32, 32)))
            .with_title(&config.window.title);
        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));
        let template = ConfigTemplateBuilder::new().with_alpha_size(8);

        let (window, gl_config) = display_builder
            .build(&event_loop, template, |configs| {
                configs
                    .reduce(|best, c| {
                        if c.num_samples() > best.num_samples() {
                            c
                        } else {
                            best
                        }
                    })
                    .expect("display offered no configs")
            })
            .map_err(|e| AppError::Display(e.to_string()))?;

        let window = window.ok_or(AppError::NoWindow)?;
        let handle = window.raw_window_handle();
        let gl_display = gl_config.display();

        let context_attr = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .build(Some(handle));

        let gl_window = GlWindow::new(window, &gl_config)?;

        let gl_context = unsafe { gl_display.create_context(&gl_config, &context_attr) }
            .and_then(|context| context.make_current(&gl_window.surface))
            .map_err(AppError::Context)?;

        if config.window.vsync {
            let interval = SwapInterval::Wait(NonZeroU32::MIN);
            if let Err(e) = gl_window.surface.set_swap_interval(&gl_context, interval) {
                log::warn!("Could not enable vsync: {e}");
            }
        }

        let gl = NativeGl::load_with(|s| match CString::new(s) {
            Ok(name) => gl_display.get_proc_address(name.as_c_str()).cast(),
            Err(_) => std::ptr::null(),
        })
        .into_context();

        let size = gl_window.window.inner_size();
        let renderer = Renderer::new(&gl);
        renderer.resize(size.width, size.height);

        log::info!("OpenGL context ready ({}x{})", size.width, size.height);

        let env = SceneEnv {
            gl,
            assets: config.assets.clone(),
            viewport: (size.width, size.height),
        };

        Ok(Self {
            event_loop,
            gl_context,
            gl_window,
            renderer,
            env,
            menu,
            title: config.window.title.clone(),
        })
    }

    pub fn run(mut self, initial_scene: Option<usize>) -> ! {
        let mut current: Option<(&'static str, Box<dyn Scene>)> = None;
        let mut modifiers = ModifiersState::empty();
        let mut last_frame = Instant::now();
        let mut fps = FpsCounter::new(last_frame);

        if let Some(index) = initial_scene {
            current = open_scene(&self.menu, index, &self.env);
        }
        if current.is_none() {
            print_menu(&self.menu);
        }

        self.event_loop
            .run(move |event, _window_target, control_flow| {
                *control_flow = ControlFlow::Poll;
                match event {
                    Event::MainEventsCleared => {
                        let now = Instant::now();
                        let dt = (now - last_frame).as_secs_f32();
                        last_frame = now;

                        if let Some((_, scene)) = &mut current {
                            scene.on_update(dt);
                        }

                        if let Some(rate) = fps.frame(now) {
                            let name = current.as_ref().map_or("Menu", |(name, _)| *name);
                            self.gl_window
                                .window
                                .set_title(&format!("{} - {name} ({rate:.1} fps)", self.title));
                        }

                        self.gl_window.window.request_redraw();
                    }
                    Event::RedrawRequested(_) => {
                        match &mut current {
                            Some((_, scene)) => scene.on_render(&self.renderer),
                            None => {
                                self.renderer.set_clear_color(MENU_COLOR);
                                self.renderer.clear();
                            }
                        }

                        if let Err(e) = self.gl_window.surface.swap_buffers(&self.gl_context) {
                            log::error!("Could not swap buffers: {e}");
                        }
                    }
                    Event::WindowEvent { event, .. } => match event {
                        WindowEvent::Resized(size) => {
                            if let (Some(w), Some(h)) =
                                (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
                            {
                                self.gl_window.surface.resize(&self.gl_context, w, h);
                                self.renderer.resize(size.width, size.height);
                                self.env.viewport = (size.width, size.height);
                            }
                        }
                        WindowEvent::ModifiersChanged(state) => modifiers = state,
                        WindowEvent::KeyboardInput { input, .. } => {
                            let key = match (input.state, input.virtual_keycode) {
                                (ElementState::Pressed, Some(key)) => key,
                                _ => return,
                            };

                            if current.is_none() {
                                if key == VirtualKeyCode::Escape {
                                    control_flow.set_exit();
                                } else if let Some(index) = menu_index(key) {
                                    current = open_scene(&self.menu, index, &self.env);
                                }
                            } else if key == VirtualKeyCode::Escape {
                                if let Some((name, _)) = current.take() {
                                    log::info!("Closed scene '{name}'");
                                }
                                print_menu(&self.menu);
                            } else if let Some((_, scene)) = &mut current {
                                scene.on_key(key, modifiers);
                            }
                        }
                        WindowEvent::CloseRequested => {
                            // release GPU objects while the context is still current
                            current = None;
                            control_flow.set_exit();
                        }
                        _ => (),
                    },
                    _ => (),
                }
            })
    }
}

fn open_scene(
    menu: &SceneMenu,
    index: usize,
    env: &SceneEnv,
) -> Option<(&'static str, Box<dyn Scene>)> {
    match menu.open(index, env)? {
        Ok((name, scene)) => {
            log::info!("Opened scene '{name}'");
            Some((name, scene))
        }
        Err(e) => {
            log::error!("Could not open scene: {e}");
            None
        }
    }
}

fn print_menu(menu: &SceneMenu) {
    log::info!("Scenes (press the number to open, Escape to go back):");
    for (i, name) in menu.names().enumerate() {
        log::info!("  {}: {name}", i + 1);
    }
}

/// Averages the frame rate over one second windows.
struct FpsCounter {
    window_start: Instant,
    frames: u32,
}

impl FpsCounter {
    fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            frames: 0,
        }
    }

    /// Returns the rate once per elapsed second.
    fn frame(&mut self, now: Instant) -> Option<f64> {
        self.frames += 1;
        let elapsed = (now - self.window_start).as_secs_f64();
        if elapsed < 1.0 {
            return None;
        }

        let rate = self.frames as f64 / elapsed;
        self.window_start = now;
        self.frames = 0;
        Some(rate)
    }
}

pub struct GlWindow {
    // XXX the surface must be dropped before the window.
    pub surface: Surface<WindowSurface>,
    pub window: Window,
}

impl GlWindow {
    pub fn new(window: Window, config: &Config) -> Result<Self, AppError> {
        let (width, height): (u32, u32) = window.inner_size().into();
        let raw_window_handle = window.raw_window_handle();
        let attrs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            raw_window_handle,
            NonZeroU32::new(width).ok_or(AppError::ZeroSize)?,
            NonZeroU32::new(height).ok_or(AppError::ZeroSize)?,
        );

        let surface = unsafe { config.display().create_window_surface(config, &attrs) }
            .map_err(AppError::Context)?;

        Ok(Self { window, surface })
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Could not create display: {0}")]
    Display(String),
    #[error("Display did not create a window")]
    NoWindow,
    #[error("Window has zero size")]
    ZeroSize,
    #[error("OpenGL context error: {0}")]
    Context(glutin::error::Error),
}
