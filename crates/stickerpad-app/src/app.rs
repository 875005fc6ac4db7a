//! Main application state and event loop.

use kurbo::{Point, Size};
use peniko::Color;
use std::path::Path;
use std::sync::Arc;
use stickerpad_core::{
    Change, ConfigError, EditorConfig, EditorState, InputState, MouseButton, PointerEvent,
    RedrawObserver, Sketchpad,
};
use stickerpad_render::{RenderContext, RenderResult, Renderer, RendererError, VelloRenderer};
use thiserror::Error;
use vello::util::RenderSurface;
use vello::wgpu::PresentMode;
use vello::{AaConfig, RenderParams, RendererOptions};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{Key, ModifiersState, NamedKey};
use winit::window::{Window, WindowId};

use crate::shortcuts::ShortcutRegistry;
use crate::ui::{render_ui, UiState};

/// Environment variable naming a JSON editor config file.
pub const CONFIG_ENV: &str = "STICKERPAD_CONFIG";

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("Failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error(transparent)]
    Renderer(#[from] RendererError),
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub background_color: Color,
    pub canvas_color: Color,
    pub editor: EditorConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "StickerPad".to_string(),
            width: 640,
            height: 520,
            background_color: Color::from_rgba8(240, 240, 240, 255),
            canvas_color: Color::WHITE,
            editor: EditorConfig::default(),
        }
    }
}

impl AppConfig {
    /// Defaults, with the editor config read from `$STICKERPAD_CONFIG` when set.
    ///
    /// A config file that fails to load is logged and ignored.
    pub fn from_env() -> Self {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_editor_file(Path::new(&path)).unwrap_or_else(|e| {
                log::error!("Ignoring {CONFIG_ENV}={}: {e}", Path::new(&path).display());
                Self::default()
            }),
            None => Self::default(),
        }
    }

    /// Defaults with the editor config loaded from `path`.
    pub fn from_editor_file(path: &Path) -> Result<Self, ConfigError> {
        let editor = EditorConfig::load(path)?;
        log::info!("Loaded editor config from {}", path.display());
        Ok(Self {
            editor,
            ..Self::default()
        })
    }
}

/// Requests a window redraw whenever the editor changes.
pub struct WindowRedraw {
    window: Arc<Window>,
}

impl RedrawObserver for WindowRedraw {
    fn on_change(&mut self, change: Change, _editor: &EditorState) {
        log::trace!("{change:?}");
        self.window.request_redraw();
    }
}

/// Runtime state for the application.
struct AppState {
    // Windowing
    window: Arc<Window>,
    surface: RenderSurface<'static>,

    // Rendering
    vello_renderer: vello::Renderer,
    canvas_renderer: VelloRenderer,
    /// Texture blitter for RGBA->surface format conversion
    texture_blitter: vello::wgpu::util::TextureBlitter,

    // egui
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
    ui_state: UiState,

    // State
    sketchpad: Sketchpad<WindowRedraw>,
    input: InputState,
    modifiers: ModifiersState,
}

/// Window size in logical pixels.
fn viewport_size(window: &Window) -> Size {
    let size = window.inner_size().to_logical::<f64>(window.scale_factor());
    Size::new(size.width, size.height)
}

/// Frame context with the canvas centered in the window.
fn canvas_context<'a>(editor: &'a EditorState, window: &Window, config: &AppConfig) -> RenderContext<'a> {
    RenderContext::new(editor, viewport_size(window))
        .centered()
        .with_scale_factor(window.scale_factor())
        .with_background(config.background_color)
        .with_canvas_color(config.canvas_color)
}

impl AppState {
    /// Keep pointer mapping in sync with where the canvas is drawn.
    fn update_canvas_bounds(&mut self, config: &AppConfig) {
        let bounds = canvas_context(self.sketchpad.editor(), &self.window, config).canvas_rect();
        self.input.set_bounds(bounds);
    }

    fn handle_pointer(&mut self, event: Option<PointerEvent>) {
        if let Some(event) = event {
            self.sketchpad.handle_pointer(&event);
        }
    }
}

/// Main application struct.
pub struct App {
    config: AppConfig,
    state: Option<AppState>,
    render_cx: Option<vello::util::RenderContext>,
    /// First fatal error raised inside the event loop.
    error: Option<AppError>,
}

impl App {
    /// Create a new application with default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a new application with custom configuration.
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            config,
            state: None,
            render_cx: None,
            error: None,
        }
    }

    /// Run the application until the window closes.
    pub async fn run(config: AppConfig) -> Result<(), AppError> {
        let event_loop = EventLoop::new()?;
        let mut app = App::with_config(config);
        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        log::info!("Creating window...");

        let window_attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));
        let window = Arc::new(event_loop.create_window(window_attrs)?);

        let size = window.inner_size();
        let (width, height) = if size.width == 0 || size.height == 0 {
            (self.config.width, self.config.height)
        } else {
            (size.width, size.height)
        };
        log::info!("Surface size: {}x{}", width, height);

        let render_cx = self.render_cx.get_or_insert_with(vello::util::RenderContext::new);
        let surface = pollster::block_on(render_cx.create_surface(
            window.clone(),
            width,
            height,
            PresentMode::AutoVsync,
        ))
        .map_err(|e| RendererError::Surface(e.to_string()))?;

        let device = &render_cx.devices[surface.dev_id].device;

        let vello_renderer = vello::Renderer::new(device, RendererOptions::default())
            .map_err(|e| RendererError::InitFailed(e.to_string()))?;

        // Vello renders to Rgba8Unorm; the surface format may differ.
        let texture_blitter = vello::wgpu::util::TextureBlitter::new(device, surface.config.format);

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            device,
            surface.config.format,
            egui_wgpu::RendererOptions::default(),
        );

        let editor = EditorState::new(self.config.editor.clone());
        let observer = WindowRedraw {
            window: window.clone(),
        };

        log::info!(
            "StickerPad initialized - {}x{} canvas",
            self.config.editor.canvas_width,
            self.config.editor.canvas_height
        );
        ShortcutRegistry::print_all();

        let mut state = AppState {
            window: window.clone(),
            surface,
            vello_renderer,
            canvas_renderer: VelloRenderer::new(),
            texture_blitter,
            egui_ctx,
            egui_state,
            egui_renderer,
            ui_state: UiState::default(),
            sketchpad: Sketchpad::new(editor, observer),
            input: InputState::default(),
            modifiers: ModifiersState::default(),
        };
        state.update_canvas_bounds(&self.config);
        self.state = Some(state);

        window.request_redraw();
        Ok(())
    }

    fn redraw(&mut self) {
        let Some(state) = &mut self.state else {
            return;
        };
        let Some(render_cx) = self.render_cx.as_ref() else {
            return;
        };

        // Run egui; commands are applied after the frame is laid out.
        let egui_input = state.egui_state.take_egui_input(&state.window);
        let mut action = None;
        let editor = state.sketchpad.editor();
        let ui_state = &mut state.ui_state;
        let egui_output = state.egui_ctx.run(egui_input, |ctx| {
            action = render_ui(ctx, ui_state, editor);
        });
        state
            .egui_state
            .handle_platform_output(&state.window, egui_output.platform_output);
        let egui_primitives = state
            .egui_ctx
            .tessellate(egui_output.shapes, egui_output.pixels_per_point);

        if let Some(command) = action {
            log::debug!("UI command {command:?}");
            state.sketchpad.apply(command);
        }

        let ctx = canvas_context(state.sketchpad.editor(), &state.window, &self.config);
        state.canvas_renderer.build_scene(&ctx);
        let scene = state.canvas_renderer.take_scene();

        let device_handle = &render_cx.devices[state.surface.dev_id];
        let device = &device_handle.device;
        let queue = &device_handle.queue;

        let surface_texture = match acquire_texture(&state.surface) {
            Ok(t) => t,
            Err(e) => {
                log::warn!("{e}");
                return;
            }
        };

        let width = state.surface.config.width;
        let height = state.surface.config.height;

        let params = RenderParams {
            base_color: self.config.background_color,
            width,
            height,
            antialiasing_method: AaConfig::Area,
        };

        // Vello's compute shaders need a storage-bindable Rgba8Unorm target.
        let render_texture = device.create_texture(&vello::wgpu::TextureDescriptor {
            label: Some("vello render texture"),
            size: vello::wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: vello::wgpu::TextureDimension::D2,
            format: vello::wgpu::TextureFormat::Rgba8Unorm,
            usage: vello::wgpu::TextureUsages::STORAGE_BINDING
                | vello::wgpu::TextureUsages::COPY_SRC
                | vello::wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let render_texture_view =
            render_texture.create_view(&vello::wgpu::TextureViewDescriptor::default());

        if let Err(e) = state
            .vello_renderer
            .render_to_texture(device, queue, &scene, &render_texture_view, &params)
            .map_err(|e| RendererError::RenderFailed(e.to_string()))
        {
            log::error!("{e}");
            return;
        }

        let surface_view = surface_texture
            .texture
            .create_view(&vello::wgpu::TextureViewDescriptor::default());

        {
            let mut blit_encoder =
                device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                    label: Some("blit encoder"),
                });
            state
                .texture_blitter
                .copy(device, &mut blit_encoder, &render_texture_view, &surface_view);
            queue.submit(std::iter::once(blit_encoder.finish()));
        }

        for (id, image_delta) in &egui_output.textures_delta.set {
            state.egui_renderer.update_texture(device, queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: egui_output.pixels_per_point,
        };

        {
            let mut egui_encoder =
                device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                    label: Some("egui encoder"),
                });
            state.egui_renderer.update_buffers(
                device,
                queue,
                &mut egui_encoder,
                &egui_primitives,
                &screen_descriptor,
            );

            let render_pass = egui_encoder.begin_render_pass(&vello::wgpu::RenderPassDescriptor {
                label: Some("egui render pass"),
                color_attachments: &[Some(vello::wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: vello::wgpu::Operations {
                        load: vello::wgpu::LoadOp::Load,
                        store: vello::wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            // egui-wgpu needs a 'static render pass.
            let mut render_pass = render_pass.forget_lifetime();
            state
                .egui_renderer
                .render(&mut render_pass, &egui_primitives, &screen_descriptor);
            drop(render_pass);

            queue.submit(std::iter::once(egui_encoder.finish()));
        }

        for id in &egui_output.textures_delta.free {
            state.egui_renderer.free_texture(id);
        }
        surface_texture.present();

        if state.egui_ctx.has_requested_repaint() {
            state.window.request_redraw();
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Next swapchain texture, or a surface error when it is lost or outdated.
fn acquire_texture(surface: &RenderSurface<'static>) -> RenderResult<vello::wgpu::SurfaceTexture> {
    surface
        .surface
        .get_current_texture()
        .map_err(|e| RendererError::Surface(format!("failed to get surface texture: {e}")))
}

fn map_button(button: winit::event::MouseButton) -> Option<MouseButton> {
    match button {
        winit::event::MouseButton::Left => Some(MouseButton::Left),
        winit::event::MouseButton::Right => Some(MouseButton::Right),
        winit::event::MouseButton::Middle => Some(MouseButton::Middle),
        _ => None,
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            log::error!("Initialization failed: {e}");
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(state) = &mut self.state else {
            return;
        };

        // Let egui process the event first
        let egui_response = state.egui_state.on_window_event(&state.window, &event);
        if egui_response.repaint {
            state.window.request_redraw();
        }
        let egui_wants_pointer = state.egui_ctx.is_pointer_over_area()
            || state.egui_ctx.wants_pointer_input();
        let egui_wants_keyboard = state.egui_ctx.wants_keyboard_input();

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width == 0 || size.height == 0 {
                    return;
                }
                if let Some(render_cx) = self.render_cx.as_mut() {
                    render_cx.resize_surface(&mut state.surface, size.width, size.height);
                }
                state.update_canvas_bounds(&self.config);
                state.window.request_redraw();
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                state.update_canvas_bounds(&self.config);
            }

            WindowEvent::RedrawRequested => {
                self.redraw();
            }

            WindowEvent::CursorMoved { position, .. } => {
                // Pointer over the tool bar counts as off-canvas.
                let event = if egui_wants_pointer {
                    state.input.cursor_left()
                } else {
                    let logical = position.to_logical::<f64>(state.window.scale_factor());
                    state.input.cursor_moved(Point::new(logical.x, logical.y))
                };
                state.handle_pointer(event);
            }

            WindowEvent::CursorLeft { .. } => {
                let event = state.input.cursor_left();
                state.handle_pointer(event);
            }

            WindowEvent::MouseInput {
                state: btn_state,
                button,
                ..
            } => {
                let Some(button) = map_button(button) else {
                    return;
                };
                let pressed = btn_state == ElementState::Pressed;
                // Releases are always tracked so held-button state stays accurate.
                if pressed && egui_wants_pointer {
                    return;
                }
                let event = state.input.button(button, pressed);
                state.handle_pointer(event);
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                state.modifiers = modifiers.state();
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if egui_wants_keyboard || event.state != ElementState::Pressed {
                    return;
                }

                let key_str = match &event.logical_key {
                    Key::Named(NamedKey::Delete) => "Delete",
                    Key::Character(c) => c.as_str(),
                    _ => return,
                };

                let ctrl = state.modifiers.control_key() || state.modifiers.super_key();
                let shift = state.modifiers.shift_key();
                if let Some(command) = ShortcutRegistry::lookup(key_str, ctrl, shift) {
                    log::debug!("Shortcut {key_str} -> {command:?}");
                    state.sketchpad.apply(command);
                    // Tool bar state may have changed even without a canvas change.
                    state.window.request_redraw();
                }
            }

            _ => {}
        }
    }
}
