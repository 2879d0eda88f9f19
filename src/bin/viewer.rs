//! Hexland Viewer
//!
//! Run with: `cargo run --bin hexland-viewer [config.json]`
//!
//! Interactive wgpu host for the procedural hex terrain: one merged mesh per
//! material band, drifting clouds, and a day/night light toggle. Every world
//! parameter change triggers a full regeneration.
//!
//! Controls:
//! - WASD: Move camera
//! - Mouse right-drag: Look around (FPS style)
//! - Space: Move up
//! - Shift: Move down (or sprint when moving)
//! - Scroll: Zoom in/out
//! - +/-: Grow/shrink the world radius
//! - [/]: Lower/raise the height ceiling
//! - Tab: Toggle circle/rectangle world shape
//! - G: Regenerate with a new seed
//! - N: Toggle day/night
//! - ,/.: Dim/brighten the light
//! - R: Reset camera
//! - ESC: Exit

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use static_assertions::const_assert_eq;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowAttributes, WindowId};

use hexland::{CloudField, Lighting, Mesh, Terrain, Vertex, WorldConfig, WorldShape};

// ============================================================================
// GPU DATA
// ============================================================================

/// Uniforms sent to GPU. Layout mirrors the WGSL `Uniforms` struct.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
    camera_pos: [f32; 3],
    time: f32,
    sun_dir: [f32; 3],
    sun_intensity: f32,
    sun_color: [f32; 3],
    ambient: f32,
    sky_horizon: [f32; 3],
    fog_density: f32,
    sky_zenith: [f32; 3],
    _pad: f32,
}

const_assert_eq!(std::mem::size_of::<Uniforms>(), 144);

/// GPU-resident geometry for one material band.
struct BandBuffers {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

/// Preallocated dynamic buffers for the drifting clouds, rewritten per frame.
struct CloudBuffers {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

// Worst case per cloud: 8 puffs of a 6-segment ellipsoid.
const CLOUD_MAX_VERTS: u64 = 8 * 49;
const CLOUD_MAX_INDICES: u64 = 8 * 216;

// ============================================================================
// CAMERA
// ============================================================================

/// Simple free-view camera
struct Camera {
    position: Vec3,
    yaw: f32,
    pitch: f32,
    move_speed: f32,
    look_sensitivity: f32,
    fov: f32,
    near: f32,
    far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            // Above and behind the world, looking down at the origin.
            position: Vec3::new(0.0, 18.0, 40.0),
            yaw: 0.0,
            pitch: -0.35,
            move_speed: 15.0,
            look_sensitivity: 0.003,
            fov: 55.0_f32.to_radians(),
            near: 0.1,
            far: 500.0,
        }
    }
}

impl Camera {
    fn get_forward(&self) -> Vec3 {
        Vec3::new(
            self.yaw.sin() * self.pitch.cos(),
            self.pitch.sin(),
            -self.yaw.cos() * self.pitch.cos(),
        )
        .normalize()
    }

    fn get_right(&self) -> Vec3 {
        self.get_forward().cross(Vec3::Y).normalize()
    }

    fn get_view_matrix(&self) -> Mat4 {
        let target = self.position + self.get_forward();
        Mat4::look_at_rh(self.position, target, Vec3::Y)
    }

    fn get_projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov, aspect, self.near, self.far)
    }

    /// Windows-style mouse look (non-reversed).
    fn handle_mouse_look(&mut self, delta_x: f32, delta_y: f32) {
        self.yaw += delta_x * self.look_sensitivity;
        self.pitch -= delta_y * self.look_sensitivity;

        let pitch_limit = 89.0_f32.to_radians();
        self.pitch = self.pitch.clamp(-pitch_limit, pitch_limit);
    }

    fn update_movement(&mut self, forward: f32, right: f32, up: f32, delta_time: f32, sprint: bool) {
        let speed = if sprint {
            self.move_speed * 2.5
        } else {
            self.move_speed
        };

        let forward_dir = self.get_forward();
        let right_dir = self.get_right();

        // Horizontal movement stays in the XZ plane.
        let forward_xz = Vec3::new(forward_dir.x, 0.0, forward_dir.z).normalize_or_zero();
        let right_xz = Vec3::new(right_dir.x, 0.0, right_dir.z).normalize_or_zero();

        self.position += forward_xz * forward * speed * delta_time;
        self.position += right_xz * right * speed * delta_time;
        self.position.y += up * speed * delta_time;
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Movement key state
#[derive(Default)]
struct MovementKeys {
    forward: bool,
    backward: bool,
    left: bool,
    right: bool,
    up: bool,
    down: bool,
    sprint: bool,
}

// ============================================================================
// APPLICATION STATE
// ============================================================================

struct AppState {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    // Render pipelines
    terrain_pipeline: wgpu::RenderPipeline,
    sky_pipeline: wgpu::RenderPipeline,

    // Buffers
    band_buffers: Vec<BandBuffers>,
    cloud_buffers: CloudBuffers,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,

    // Depth buffer
    depth_texture: wgpu::TextureView,

    // World state (adjustable at runtime)
    world_config: WorldConfig,
    seed: u64,
    tile_count: u32,
    clouds: CloudField,
    lighting: Lighting,
    rng: ChaCha8Rng,

    // Camera
    camera: Camera,
    movement_keys: MovementKeys,

    // Input state
    right_mouse_down: bool,
    last_mouse_pos: Option<(f64, f64)>,

    // Timing
    start_time: Instant,
    last_frame_time: Instant,

    // FPS tracking
    frame_count: u32,
    fps_update_time: Instant,
    current_fps: f32,
}

impl AppState {
    async fn new(window: Arc<Window>, world_config: WorldConfig) -> anyhow::Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no suitable GPU adapter")?;

        log::info!("using GPU: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default())
            .await
            .context("failed to create device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader_source = include_str!("../../shaders/terrain.wgsl");
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Terrain Shader"),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Uniform Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let depth_texture = create_depth_texture(&device, &config);

        let terrain_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Terrain Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[
                        // position
                        wgpu::VertexAttribute {
                            offset: 0,
                            shader_location: 0,
                            format: wgpu::VertexFormat::Float32x3,
                        },
                        // normal
                        wgpu::VertexAttribute {
                            offset: 12,
                            shader_location: 1,
                            format: wgpu::VertexFormat::Float32x3,
                        },
                        // color
                        wgpu::VertexAttribute {
                            offset: 24,
                            shader_location: 2,
                            format: wgpu::VertexFormat::Float32x4,
                        },
                    ],
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        // Sky: full-screen triangle, no vertex buffer, no depth writes.
        let sky_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Sky Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_sky"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_sky"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Uniform Buffer"),
            size: std::mem::size_of::<Uniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Uniform Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let mut rng = ChaCha8Rng::from_entropy();
        let seed = rng.next_u64();

        let terrain = Terrain::generate(&world_config, seed)?;
        let band_buffers = upload_terrain(&device, &queue, &terrain);
        let tile_count = terrain.tile_count;

        let clouds = CloudField::spawn(&world_config, &mut rng);
        let cloud_buffers = create_cloud_buffers(&device, clouds.len());
        log::info!("spawned {} clouds", clouds.len());

        let now = Instant::now();

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            terrain_pipeline,
            sky_pipeline,
            band_buffers,
            cloud_buffers,
            uniform_buffer,
            bind_group,
            depth_texture,
            world_config,
            seed,
            tile_count,
            clouds,
            lighting: Lighting::default(),
            rng,
            camera: Camera::default(),
            movement_keys: MovementKeys::default(),
            right_mouse_down: false,
            last_mouse_pos: None,
            start_time: now,
            last_frame_time: now,
            frame_count: 0,
            fps_update_time: now,
            current_fps: 0.0,
        })
    }

    /// Regenerates terrain and clouds with the current config and seed.
    fn regenerate(&mut self) {
        let terrain = match Terrain::generate(&self.world_config, self.seed) {
            Ok(terrain) => terrain,
            Err(err) => {
                log::error!("regeneration rejected: {err}");
                return;
            }
        };
        self.tile_count = terrain.tile_count;
        self.band_buffers = upload_terrain(&self.device, &self.queue, &terrain);

        self.clouds = CloudField::spawn(&self.world_config, &mut self.rng);
        self.cloud_buffers = create_cloud_buffers(&self.device, self.clouds.len());

        self.print_status();
    }

    fn reseed(&mut self) {
        self.seed = self.rng.next_u64();
        self.regenerate();
    }

    fn adjust_radius(&mut self, delta: f32) {
        let new_radius = (self.world_config.circle_radius + delta).clamp(4.0, 60.0);
        if (new_radius - self.world_config.circle_radius).abs() > 0.1 {
            self.world_config.circle_radius = new_radius;
            self.regenerate();
        }
    }

    fn adjust_max_height(&mut self, delta: f32) {
        let new_height = (self.world_config.max_height + delta).clamp(0.0, 30.0);
        if (new_height - self.world_config.max_height).abs() > 0.1 {
            self.world_config.max_height = new_height;
            self.regenerate();
        }
    }

    fn toggle_shape(&mut self) {
        self.world_config.shape = match self.world_config.shape {
            WorldShape::Circle => WorldShape::Rectangle,
            WorldShape::Rectangle => WorldShape::Circle,
        };
        self.regenerate();
    }

    fn print_status(&self) {
        log::info!(
            "world: {:?} R={:.0} H={:.0} | {} tiles | {} clouds | seed {:#x}",
            self.world_config.shape,
            self.world_config.circle_radius,
            self.world_config.max_height,
            self.tile_count,
            self.clouds.len(),
            self.seed
        );
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_texture = create_depth_texture(&self.device, &self.config);
        }
    }

    fn update(&mut self) {
        let now = Instant::now();
        let delta_time = (now - self.last_frame_time).as_secs_f32();
        self.last_frame_time = now;

        // FPS tracking
        self.frame_count += 1;
        let fps_elapsed = (now - self.fps_update_time).as_secs_f32();
        if fps_elapsed >= 1.0 {
            self.current_fps = self.frame_count as f32 / fps_elapsed;
            self.frame_count = 0;
            self.fps_update_time = now;

            self.window.set_title(&format!(
                "Hexland | FPS: {:.0} | Tiles: {} | R: {:.0} | H: {:.0} | {}",
                self.current_fps,
                self.tile_count,
                self.world_config.circle_radius,
                self.world_config.max_height,
                if self.lighting.night { "night" } else { "day" },
            ));
        }

        self.clouds.tick(delta_time, &mut self.rng);
        self.upload_clouds();

        let forward = if self.movement_keys.forward { 1.0 } else { 0.0 }
            - if self.movement_keys.backward { 1.0 } else { 0.0 };
        let right = if self.movement_keys.right { 1.0 } else { 0.0 }
            - if self.movement_keys.left { 1.0 } else { 0.0 };
        let up = if self.movement_keys.up { 1.0 } else { 0.0 }
            - if self.movement_keys.down { 1.0 } else { 0.0 };

        self.camera
            .update_movement(forward, right, up, delta_time, self.movement_keys.sprint);
    }

    /// Rewrites the preallocated cloud buffers with this frame's positions.
    fn upload_clouds(&mut self) {
        let mesh = self.clouds.combined_mesh();
        debug_assert!(mesh.vertices.len() as u64 <= self.clouds.len() as u64 * CLOUD_MAX_VERTS);

        self.queue.write_buffer(
            &self.cloud_buffers.vertex_buffer,
            0,
            bytemuck::cast_slice(&mesh.vertices),
        );
        self.queue.write_buffer(
            &self.cloud_buffers.index_buffer,
            0,
            bytemuck::cast_slice(&mesh.indices),
        );
        self.cloud_buffers.index_count = mesh.indices.len() as u32;
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let aspect = self.config.width as f32 / self.config.height as f32;
        let view_proj = self.camera.get_projection_matrix(aspect) * self.camera.get_view_matrix();

        let light = self.lighting.params();
        let uniforms = Uniforms {
            view_proj: view_proj.to_cols_array_2d(),
            camera_pos: self.camera.position.into(),
            time: self.start_time.elapsed().as_secs_f32(),
            sun_dir: light.sun_direction.into(),
            sun_intensity: light.sun_intensity,
            sun_color: light.sun_color.into(),
            ambient: light.ambient,
            sky_horizon: light.sky_horizon.into(),
            fog_density: light.fog_density,
            sky_zenith: light.sky_zenith.into(),
            _pad: 0.0,
        };
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: light.sky_horizon.x as f64,
                            g: light.sky_horizon.y as f64,
                            b: light.sky_horizon.z as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            // Sky gradient first
            render_pass.set_pipeline(&self.sky_pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.draw(0..3, 0..1);

            // One draw per material band
            render_pass.set_pipeline(&self.terrain_pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            for band in &self.band_buffers {
                render_pass.set_vertex_buffer(0, band.vertex_buffer.slice(..));
                render_pass
                    .set_index_buffer(band.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..band.index_count, 0, 0..1);
            }

            // Clouds last
            if self.cloud_buffers.index_count > 0 {
                render_pass.set_vertex_buffer(0, self.cloud_buffers.vertex_buffer.slice(..));
                render_pass.set_index_buffer(
                    self.cloud_buffers.index_buffer.slice(..),
                    wgpu::IndexFormat::Uint32,
                );
                render_pass.draw_indexed(0..self.cloud_buffers.index_count, 0, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        match key {
            KeyCode::KeyW => self.movement_keys.forward = pressed,
            KeyCode::KeyS => self.movement_keys.backward = pressed,
            KeyCode::KeyA => self.movement_keys.left = pressed,
            KeyCode::KeyD => self.movement_keys.right = pressed,
            KeyCode::Space => self.movement_keys.up = pressed,
            KeyCode::ShiftLeft | KeyCode::ShiftRight => {
                self.movement_keys.down = pressed;
                self.movement_keys.sprint = pressed;
            }
            KeyCode::KeyR if pressed => {
                self.camera.reset();
                log::info!("camera reset");
            }
            KeyCode::Equal | KeyCode::NumpadAdd if pressed => {
                self.adjust_radius(2.0);
            }
            KeyCode::Minus | KeyCode::NumpadSubtract if pressed => {
                self.adjust_radius(-2.0);
            }
            KeyCode::BracketRight if pressed => {
                self.adjust_max_height(1.0);
            }
            KeyCode::BracketLeft if pressed => {
                self.adjust_max_height(-1.0);
            }
            KeyCode::Tab if pressed => {
                self.toggle_shape();
            }
            KeyCode::KeyG if pressed => {
                self.reseed();
            }
            KeyCode::KeyN if pressed => {
                self.lighting.toggle();
                log::info!(
                    "lighting: {}",
                    if self.lighting.night { "night" } else { "day" }
                );
            }
            KeyCode::Period if pressed => {
                self.lighting.scale_intensity(1.25);
            }
            KeyCode::Comma if pressed => {
                self.lighting.scale_intensity(0.8);
            }
            _ => {}
        }
    }

    fn handle_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        if button == MouseButton::Right {
            self.right_mouse_down = pressed;

            // Grab cursor while right mouse is held for smooth look
            if pressed {
                let _ = self.window.set_cursor_grab(CursorGrabMode::Confined);
                self.window.set_cursor_visible(false);
            } else {
                let _ = self.window.set_cursor_grab(CursorGrabMode::None);
                self.window.set_cursor_visible(true);
                self.last_mouse_pos = None;
            }
        }
    }

    fn handle_mouse_move(&mut self, x: f64, y: f64) {
        if self.right_mouse_down {
            if let Some((last_x, last_y)) = self.last_mouse_pos {
                let delta_x = (x - last_x) as f32;
                let delta_y = (y - last_y) as f32;
                self.camera.handle_mouse_look(delta_x, delta_y);
            }
        }
        self.last_mouse_pos = Some((x, y));
    }

    fn handle_scroll(&mut self, delta: MouseScrollDelta) {
        let scroll_amount = match delta {
            MouseScrollDelta::LineDelta(_, y) => y * 2.0,
            MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.1,
        };

        let forward = self.camera.get_forward();
        self.camera.position += forward * scroll_amount;
    }
}

/// Creates per-band vertex/index buffers. Empty bands get no buffers.
fn upload_terrain(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    terrain: &Terrain,
) -> Vec<BandBuffers> {
    terrain
        .bands
        .iter()
        .filter(|batch| !batch.mesh.is_empty())
        .map(|batch| {
            let (vertex_buffer, index_buffer) =
                create_mesh_buffers(device, &batch.mesh, batch.band.name());
            queue.write_buffer(&vertex_buffer, 0, bytemuck::cast_slice(&batch.mesh.vertices));
            queue.write_buffer(&index_buffer, 0, bytemuck::cast_slice(&batch.mesh.indices));
            BandBuffers {
                vertex_buffer,
                index_buffer,
                index_count: batch.mesh.indices.len() as u32,
            }
        })
        .collect()
}

fn create_mesh_buffers(
    device: &wgpu::Device,
    mesh: &Mesh,
    label: &str,
) -> (wgpu::Buffer, wgpu::Buffer) {
    let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: (mesh.vertices.len() * std::mem::size_of::<Vertex>()) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let index_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: (mesh.indices.len() * std::mem::size_of::<u32>()) as u64,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    (vertex_buffer, index_buffer)
}

/// Allocates cloud buffers at the worst-case size for a fixed cloud count.
fn create_cloud_buffers(device: &wgpu::Device, cloud_count: usize) -> CloudBuffers {
    let count = cloud_count.max(1) as u64;
    let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Cloud Vertex Buffer"),
        size: count * CLOUD_MAX_VERTS * std::mem::size_of::<Vertex>() as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let index_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Cloud Index Buffer"),
        size: count * CLOUD_MAX_INDICES * std::mem::size_of::<u32>() as u64,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    CloudBuffers {
        vertex_buffer,
        index_buffer,
        index_count: 0,
    }
}

fn create_depth_texture(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Depth32Float,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

// ============================================================================
// APPLICATION HANDLER
// ============================================================================

struct App {
    state: Option<AppState>,
    world_config: WorldConfig,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        let window_attrs = WindowAttributes::default()
            .with_title("Hexland - WASD to move, Right-drag to look")
            .with_inner_size(PhysicalSize::new(1280, 720));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                log::error!("window creation failed: {err}");
                event_loop.exit();
                return;
            }
        };

        match pollster::block_on(AppState::new(window, self.world_config)) {
            Ok(state) => {
                state.print_status();
                self.state = Some(state);
            }
            Err(err) => {
                log::error!("GPU setup failed: {err:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(state) = &mut self.state else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                state.resize(new_size);
            }
            WindowEvent::KeyboardInput {
                event:
                    winit::event::KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        ..
                    },
                ..
            } => {
                let pressed = key_state == ElementState::Pressed;

                if key == KeyCode::Escape && pressed {
                    event_loop.exit();
                    return;
                }

                state.handle_key(key, pressed);
            }
            WindowEvent::MouseInput {
                button,
                state: btn_state,
                ..
            } => {
                state.handle_mouse_button(button, btn_state == ElementState::Pressed);
            }
            WindowEvent::CursorMoved { position, .. } => {
                state.handle_mouse_move(position.x, position.y);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                state.handle_scroll(delta);
            }
            WindowEvent::RedrawRequested => {
                state.update();

                match state.render() {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => state.resize(state.window.inner_size()),
                    Err(wgpu::SurfaceError::OutOfMemory) => event_loop.exit(),
                    Err(e) => log::error!("render error: {e:?}"),
                }

                state.window.request_redraw();
            }
            _ => {}
        }
    }
}

// ============================================================================
// MAIN
// ============================================================================

/// Loads a world config preset named on the command line, or the default.
fn load_config() -> anyhow::Result<WorldConfig> {
    let Some(path) = std::env::args().nth(1) else {
        return Ok(WorldConfig::default());
    };
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("reading config preset {path}"))?;
    let config: WorldConfig =
        serde_json::from_str(&text).with_context(|| format!("parsing config preset {path}"))?;
    config.validate()?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let world_config = load_config()?;
    log::info!(
        "starting viewer: {:?} R={:.0} H={:.0}",
        world_config.shape,
        world_config.circle_radius,
        world_config.max_height
    );

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App {
        state: None,
        world_config,
    };
    event_loop.run_app(&mut app)?;

    Ok(())
}
