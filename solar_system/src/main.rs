//! Solar System - real-time Newtonian orbits
//!
//! The Sun and five planets under mutual gravity, one simulated day per
//! frame, each planet dragging its orbit trail behind it.
//!
//! Controls:
//! - Space: Pause/resume simulation
//! - T: Toggle trails
//! - D: Toggle body panel (distances to the Sun)
//! - Scroll / +/-: Zoom
//! - Escape: Quit

mod overlay;
mod renderer;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use common::{srgb_to_linear, FramePacer, GraphicsContext, ScreenTransform};
use overlay::{draw_body_labels, draw_body_panel, draw_status_bar, Status};
use renderer::Renderer;
use solar_system::constants::{AU, PIXELS_PER_AU, SECONDS_PER_DAY};
use solar_system::{RosterConfig, Simulation, SimulationError, UpdateOrder};
use winit::{
    event::{ElementState, Event, KeyEvent, MouseScrollDelta, WindowEvent},
    event_loop::ControlFlow,
    keyboard::{KeyCode, PhysicalKey},
};

#[derive(Parser, Debug)]
#[command(name = "solar_system", about = "Real-time orbits of the Sun and its planets")]
struct Args {
    /// YAML roster to simulate instead of the built-in solar system
    #[arg(short, long)]
    roster: Option<PathBuf>,

    /// Simulated seconds per frame
    #[arg(long, default_value_t = SECONDS_PER_DAY)]
    timestep: f64,

    /// Frames (and steps) per second
    #[arg(long, default_value_t = 60)]
    fps: u32,

    #[arg(long, default_value_t = 1000)]
    width: u32,

    #[arg(long, default_value_t = 800)]
    height: u32,

    /// On-screen size of one astronomical unit
    #[arg(long, default_value_t = PIXELS_PER_AU)]
    pixels_per_au: f64,

    /// Move bodies one at a time, each seeing the ones already moved this step
    #[arg(long)]
    sequential: bool,
}

struct EguiState {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

struct App {
    ctx: GraphicsContext,
    renderer: Renderer,
    simulation: Simulation,
    colors: Vec<[f32; 4]>,
    transform: ScreenTransform,
    paused: bool,
    halted: Option<SimulationError>,
    show_trails: bool,
    show_panel: bool,
    egui: EguiState,
}

impl App {
    fn new(
        ctx: GraphicsContext,
        simulation: Simulation,
        colors: Vec<[f32; 4]>,
        transform: ScreenTransform,
    ) -> Self {
        let renderer = Renderer::new(&ctx, &transform, simulation.bodies().len());

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &ctx.window,
            Some(ctx.window.scale_factor() as f32),
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&ctx.device, ctx.config.format, None, 1);

        Self {
            ctx,
            renderer,
            simulation,
            colors,
            transform,
            paused: false,
            halted: None,
            show_trails: true,
            show_panel: false,
            egui: EguiState {
                ctx: egui_ctx,
                state: egui_state,
                renderer: egui_renderer,
            },
        }
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.ctx.resize(new_size);
        self.transform.resize(self.ctx.size.width, self.ctx.size.height);
        self.renderer.update_screen(&self.ctx.queue, &self.transform);
    }

    fn update(&mut self) {
        if self.paused || self.halted.is_some() {
            return;
        }

        if let Err(err) = self.simulation.step() {
            log::error!("simulation halted after {} steps: {err}", self.simulation.steps());
            self.halted = Some(err);
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let frame = self.renderer.update_bodies(
            &self.ctx.device,
            &self.ctx.queue,
            &self.transform,
            self.simulation.bodies(),
            &self.colors,
        );

        let status = Status {
            paused: self.paused,
            halted: self.halted.as_ref(),
            show_trails: self.show_trails,
            pixels_per_au: self.transform.scale * AU,
        };

        let raw_input = self.egui.state.take_egui_input(&self.ctx.window);
        let full_output = self.egui.ctx.run(raw_input, |ctx| {
            draw_status_bar(ctx, &self.simulation, &status);
            if self.show_panel {
                draw_body_panel(ctx, &self.simulation);
            }
            draw_body_labels(ctx, self.simulation.bodies(), &self.transform);
        });

        self.egui
            .state
            .handle_platform_output(&self.ctx.window, full_output.platform_output);
        let tris = self
            .egui
            .ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui
                .renderer
                .update_texture(&self.ctx.device, &self.ctx.queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.ctx.size.width, self.ctx.size.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.renderer
            .render(&mut encoder, &view, &frame, self.show_trails);

        self.egui.renderer.update_buffers(
            &self.ctx.device,
            &self.ctx.queue,
            &mut encoder,
            &tris,
            &screen_descriptor,
        );
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.egui
                .renderer
                .render(&mut render_pass, &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui.renderer.free_texture(id);
        }

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode, state: ElementState) {
        if state != ElementState::Pressed {
            return;
        }

        match key {
            KeyCode::Space => {
                self.paused = !self.paused;
                log::info!(
                    "{} at day {:.0}",
                    if self.paused { "paused" } else { "resumed" },
                    self.simulation.elapsed_time() / SECONDS_PER_DAY
                );
            }
            KeyCode::KeyT => self.show_trails = !self.show_trails,
            KeyCode::KeyD => self.show_panel = !self.show_panel,
            KeyCode::Equal | KeyCode::NumpadAdd => self.transform.zoom(1.25),
            KeyCode::Minus | KeyCode::NumpadSubtract => self.transform.zoom(0.8),
            _ => {}
        }
    }

    fn handle_scroll(&mut self, delta: f32) {
        self.transform.zoom(1.1f64.powf(delta as f64));
    }

    fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        self.egui.state.on_window_event(&self.ctx.window, event).consumed
    }
}

fn load_roster(path: Option<&Path>) -> anyhow::Result<RosterConfig> {
    let Some(path) = path else {
        log::info!("using the built-in solar system roster");
        return Ok(RosterConfig::solar_system());
    };

    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read roster {}", path.display()))?;
    let config = RosterConfig::from_yaml_str(&source)
        .with_context(|| format!("failed to parse roster {}", path.display()))?;
    log::info!("loaded {} bodies from {}", config.bodies.len(), path.display());

    Ok(config)
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let roster = load_roster(args.roster.as_deref())?
        .build()
        .context("invalid roster")?;
    let colors = roster.colors.iter().map(|c| srgb_to_linear(*c)).collect();

    let order = if args.sequential {
        UpdateOrder::Sequential
    } else {
        UpdateOrder::Snapshot
    };
    let simulation = Simulation::new(roster.bodies, args.timestep)
        .context("invalid initial state")?
        .with_update_order(order);
    log::info!(
        "simulating {} bodies, {} s per frame at {} fps ({:?} updates)",
        simulation.bodies().len(),
        args.timestep,
        args.fps,
        order
    );

    let (ctx, event_loop) =
        pollster::block_on(GraphicsContext::new("Solar System", args.width, args.height))?;
    let transform = ScreenTransform::new(
        args.pixels_per_au / AU,
        ctx.size.width,
        ctx.size.height,
    );

    let mut app = App::new(ctx, simulation, colors, transform);
    let mut pacer = FramePacer::new(args.fps);

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { ref event, .. } => {
            if app.handle_window_event(event) {
                return;
            }

            match event {
                WindowEvent::CloseRequested => elwt.exit(),
                WindowEvent::Resized(size) => app.resize(*size),
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            physical_key: PhysicalKey::Code(KeyCode::Escape),
                            state: ElementState::Pressed,
                            ..
                        },
                    ..
                } => elwt.exit(),
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            physical_key: PhysicalKey::Code(key),
                            state,
                            ..
                        },
                    ..
                } => app.handle_key(*key, *state),
                WindowEvent::MouseWheel { delta, .. } => {
                    let scroll = match delta {
                        MouseScrollDelta::LineDelta(_, y) => *y,
                        MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                    };
                    app.handle_scroll(scroll);
                }
                WindowEvent::RedrawRequested => {
                    app.update();
                    match app.render() {
                        Ok(_) => {}
                        Err(wgpu::SurfaceError::Lost) => app.resize(app.ctx.size),
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("GPU out of memory");
                            elwt.exit();
                        }
                        Err(e) => log::warn!("render error: {e:?}"),
                    }
                }
                _ => {}
            }
        }
        Event::AboutToWait => {
            if pacer.poll(Instant::now()) {
                app.ctx.window.request_redraw();
            }
            elwt.set_control_flow(ControlFlow::WaitUntil(pacer.next_frame()));
        }
        _ => {}
    })?;

    Ok(())
}
