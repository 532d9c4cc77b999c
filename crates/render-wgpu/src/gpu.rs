use crate::uniforms::{Uniforms, slot_stride};
use bytemuck::{Pod, Zeroable};
use cubeview_assets::{ImageData, ModelData, ShaderSource};
use cubeview_common::{ModelId, ShaderId, TextureHandle, UniformValue};
use cubeview_render::{Graphics, RenderError, ResourceLoader};
use std::collections::HashMap;
use std::num::NonZeroU64;
use std::path::Path;
use wgpu::util::DeviceExt;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const INITIAL_UNIFORM_SLOTS: u64 = 64;

/// Fatal errors while bringing up the GPU.
#[derive(Debug, thiserror::Error)]
pub enum GpuInitError {
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible graphics adapter found")]
    NoAdapter,
    #[error("failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no supported formats")]
    UnsupportedSurface,
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
    uv: [f32; 2],
}

impl Vertex {
    const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &wgpu::vertex_attr_array![
            0 => Float32x3,
            1 => Float32x3,
            2 => Float32x2,
        ],
    };
}

/// Generate unit cube vertices and indices with per-face UVs.
fn cube_mesh() -> (Vec<Vertex>, Vec<u16>) {
    let p = 0.5_f32;
    // (normal, [corner positions counter-clockwise from bottom-left])
    #[rustfmt::skip]
    let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
        ([0.0, 0.0, 1.0],  [[-p, -p,  p], [ p, -p,  p], [ p,  p,  p], [-p,  p,  p]]),
        ([0.0, 0.0, -1.0], [[ p, -p, -p], [-p, -p, -p], [-p,  p, -p], [ p,  p, -p]]),
        ([1.0, 0.0, 0.0],  [[ p, -p,  p], [ p, -p, -p], [ p,  p, -p], [ p,  p,  p]]),
        ([-1.0, 0.0, 0.0], [[-p, -p, -p], [-p, -p,  p], [-p,  p,  p], [-p,  p, -p]]),
        ([0.0, 1.0, 0.0],  [[-p,  p,  p], [ p,  p,  p], [ p,  p, -p], [-p,  p, -p]]),
        ([0.0, -1.0, 0.0], [[-p, -p, -p], [ p, -p, -p], [ p, -p,  p], [-p, -p,  p]]),
    ];
    let uvs = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, corners) in faces {
        let base = vertices.len() as u16;
        for (position, uv) in corners.into_iter().zip(uvs) {
            vertices.push(Vertex {
                position,
                normal,
                uv,
            });
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }
    (vertices, indices)
}

struct GpuShader {
    label: String,
    pipeline: wgpu::RenderPipeline,
    staging: Uniforms,
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    texture: TextureHandle,
}

#[derive(Default)]
struct GpuModel {
    meshes: Vec<GpuMesh>,
}

#[derive(Clone, Copy)]
enum Geometry {
    Cube,
    Mesh { model: usize, mesh: usize },
}

/// A draw recorded during the frame, replayed on `swap_buffers`.
#[derive(Clone, Copy)]
struct DrawCmd {
    shader: usize,
    slot: u32,
    textures: [TextureHandle; 2],
    geometry: Geometry,
}

struct PendingFrame {
    output: wgpu::SurfaceTexture,
    clear: wgpu::Color,
}

/// wgpu implementation of the viewer's graphics interface.
pub struct WgpuGraphics {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,

    uniform_layout: wgpu::BindGroupLayout,
    texture_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    uniform_capacity: u64,
    uniform_stride: u64,

    sampler: wgpu::Sampler,
    placeholder: wgpu::TextureView,
    textures: Vec<wgpu::TextureView>,
    texture_groups: HashMap<[TextureHandle; 2], wgpu::BindGroup>,

    cube_vertex_buffer: wgpu::Buffer,
    cube_index_buffer: wgpu::Buffer,
    cube_index_count: u32,

    shaders: Vec<GpuShader>,
    models: Vec<GpuModel>,

    bound: Option<usize>,
    units: [TextureHandle; 2],
    snapshots: Vec<Uniforms>,
    draws: Vec<DrawCmd>,
    frame: Option<PendingFrame>,
}

impl WgpuGraphics {
    /// Create the surface, device and all frame-independent resources.
    pub fn new(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<Self, GpuInitError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(target)?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or(GpuInitError::NoAdapter)?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("cubeview_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first())
            .copied()
            .ok_or(GpuInitError::UnsupportedSurface)?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let info = adapter.get_info();
        tracing::info!("GPU initialized with {:?} backend ({})", info.backend, info.name);

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: NonZeroU64::new(std::mem::size_of::<Uniforms>() as u64),
                },
                count: None,
            }],
        });

        let texture_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        };
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture_bind_group_layout"),
            entries: &[
                texture_entry(0),
                texture_entry(1),
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&uniform_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let uniform_stride = slot_stride(device.limits().min_uniform_buffer_offset_alignment);
        let (uniform_buffer, uniform_bind_group) = Self::create_uniform_buffer(
            &device,
            &uniform_layout,
            INITIAL_UNIFORM_SLOTS * uniform_stride,
        );

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("texture_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let placeholder = Self::upload_levels(
            &device,
            &queue,
            "placeholder_texture",
            &[ImageData::solid([0, 0, 0, 255])],
        );

        let (cube_verts, cube_indices) = cube_mesh();
        let cube_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube_vertex_buffer"),
            contents: bytemuck::cast_slice(&cube_verts),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let cube_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube_index_buffer"),
            contents: bytemuck::cast_slice(&cube_indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let depth_view = Self::create_depth_texture(&device, config.width, config.height);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_view,
            uniform_layout,
            texture_layout,
            pipeline_layout,
            uniform_buffer,
            uniform_bind_group,
            uniform_capacity: INITIAL_UNIFORM_SLOTS,
            uniform_stride,
            sampler,
            placeholder,
            textures: Vec::new(),
            texture_groups: HashMap::new(),
            cube_vertex_buffer,
            cube_index_buffer,
            cube_index_count: cube_indices.len() as u32,
            shaders: Vec::new(),
            models: Vec::new(),
            bound: None,
            units: [TextureHandle::INVALID; 2],
            snapshots: Vec::new(),
            draws: Vec::new(),
            frame: None,
        })
    }

    /// Reconfigure the surface and depth buffer for a new framebuffer size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.depth_view = Self::create_depth_texture(&self.device, self.config.width, self.config.height);
    }

    fn create_uniform_buffer(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        size: u64,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("uniform_buffer"),
            size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uniform_bind_group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: NonZeroU64::new(std::mem::size_of::<Uniforms>() as u64),
                }),
            }],
        });
        (buffer, bind_group)
    }

    fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }

    /// Upload a mip chain (level 0 first) as an sRGB texture.
    fn upload_levels(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        levels: &[ImageData],
    ) -> wgpu::TextureView {
        let base = &levels[0];
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: base.width,
                height: base.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: levels.len() as u32,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        for (mip_level, level) in levels.iter().enumerate() {
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: mip_level as u32,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                &level.rgba,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * level.width),
                    rows_per_image: Some(level.height),
                },
                wgpu::Extent3d {
                    width: level.width,
                    height: level.height,
                    depth_or_array_layers: 1,
                },
            );
        }
        texture.create_view(&Default::default())
    }

    fn register_texture(&mut self, label: &str, image: &ImageData) -> TextureHandle {
        let levels = cubeview_assets::mip_chain(image);
        let view = Self::upload_levels(&self.device, &self.queue, label, &levels);
        self.textures.push(view);
        TextureHandle(self.textures.len() as u32)
    }

    fn texture_view(&self, handle: TextureHandle) -> &wgpu::TextureView {
        handle
            .0
            .checked_sub(1)
            .and_then(|i| self.textures.get(i as usize))
            .unwrap_or(&self.placeholder)
    }

    fn ensure_texture_group(&mut self, textures: [TextureHandle; 2]) {
        if self.texture_groups.contains_key(&textures) {
            return;
        }
        let group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("texture_bind_group"),
            layout: &self.texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(self.texture_view(textures[0])),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(self.texture_view(textures[1])),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });
        self.texture_groups.insert(textures, group);
    }

    fn upload_model(&mut self, data: &ModelData) -> GpuModel {
        let mut meshes = Vec::with_capacity(data.meshes.len());
        for (i, mesh) in data.meshes.iter().enumerate() {
            if mesh.indices.is_empty() {
                continue;
            }
            let vertices: Vec<Vertex> = mesh
                .vertices
                .iter()
                .map(|v| Vertex {
                    position: v.position,
                    normal: v.normal,
                    uv: v.uv,
                })
                .collect();
            let vertex_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{}_vertices", mesh.name)),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
            let index_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{}_indices", mesh.name)),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });

            let texture = mesh
                .diffuse_texture
                .as_deref()
                .and_then(|path| match cubeview_assets::load_image(path) {
                    Ok(image) => Some(image),
                    Err(e) => {
                        tracing::warn!("mesh {i} texture unavailable, using material colour: {e}");
                        None
                    }
                })
                .unwrap_or_else(|| {
                    let [r, g, b] = mesh.diffuse_colour.map(|c| (c.clamp(0.0, 1.0) * 255.0) as u8);
                    ImageData::solid([r, g, b, 255])
                });
            let texture = self.register_texture(&format!("{}_diffuse", mesh.name), &texture);

            meshes.push(GpuMesh {
                vertex_buffer,
                index_buffer,
                index_count: mesh.indices.len() as u32,
                texture,
            });
        }
        GpuModel { meshes }
    }

    fn snapshot(&mut self, shader: usize) -> u32 {
        self.snapshots.push(self.shaders[shader].staging);
        self.snapshots.len() as u32 - 1
    }

    fn ensure_uniform_capacity(&mut self, slots: u64) {
        if slots <= self.uniform_capacity {
            return;
        }
        let capacity = slots.next_power_of_two();
        let (buffer, bind_group) = Self::create_uniform_buffer(
            &self.device,
            &self.uniform_layout,
            capacity * self.uniform_stride,
        );
        self.uniform_buffer = buffer;
        self.uniform_bind_group = bind_group;
        self.uniform_capacity = capacity;
        tracing::debug!("uniform buffer grown to {capacity} slots");
    }

    fn reset_frame_state(&mut self) {
        self.snapshots.clear();
        self.draws.clear();
    }
}

impl Graphics for WgpuGraphics {
    fn clear(&mut self, colour: [f32; 4]) {
        self.reset_frame_state();
        self.frame = None;

        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };
        let [r, g, b, a] = colour.map(f64::from);
        self.frame = Some(PendingFrame {
            output,
            clear: wgpu::Color { r, g, b, a },
        });
    }

    fn use_program(&mut self, shader: ShaderId) {
        let index = shader.0 as usize;
        if index < self.shaders.len() {
            self.bound = Some(index);
        } else {
            tracing::warn!("use_program: unknown shader {}", shader.0);
            self.bound = None;
        }
    }

    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        let Some(index) = self.bound else {
            return;
        };
        let shader = &mut self.shaders[index];
        if !shader.staging.set(name, value) {
            tracing::trace!("{}: ignoring uniform {name}", shader.label);
        }
    }

    fn bind_texture(&mut self, unit: u32, texture: TextureHandle) {
        if let Some(slot) = self.units.get_mut(unit as usize) {
            *slot = texture;
        }
    }

    fn draw_cube(&mut self) {
        let Some(shader) = self.bound else {
            return;
        };
        let slot = self.snapshot(shader);
        self.draws.push(DrawCmd {
            shader,
            slot,
            textures: self.units,
            geometry: Geometry::Cube,
        });
    }

    fn draw_model(&mut self, model: ModelId) {
        let Some(shader) = self.bound else {
            return;
        };
        let index = model.0 as usize;
        let Some(gpu_model) = self.models.get(index) else {
            return;
        };
        if gpu_model.meshes.is_empty() {
            return;
        }
        let textures: Vec<TextureHandle> = gpu_model.meshes.iter().map(|m| m.texture).collect();
        let slot = self.snapshot(shader);
        for (mesh, texture) in textures.into_iter().enumerate() {
            self.draws.push(DrawCmd {
                shader,
                slot,
                textures: [texture, texture],
                geometry: Geometry::Mesh { model: index, mesh },
            });
        }
    }

    fn swap_buffers(&mut self) {
        let Some(frame) = self.frame.take() else {
            self.reset_frame_state();
            return;
        };

        self.ensure_uniform_capacity(self.snapshots.len() as u64);
        if !self.snapshots.is_empty() {
            let stride = self.uniform_stride as usize;
            let mut bytes = vec![0u8; self.snapshots.len() * stride];
            for (i, snapshot) in self.snapshots.iter().enumerate() {
                let raw = bytemuck::bytes_of(snapshot);
                bytes[i * stride..i * stride + raw.len()].copy_from_slice(raw);
            }
            self.queue.write_buffer(&self.uniform_buffer, 0, &bytes);
        }

        let draws = std::mem::take(&mut self.draws);
        for draw in &draws {
            self.ensure_texture_group(draw.textures);
        }

        let view = frame
            .output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(frame.clear),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            for draw in &draws {
                let Some(textures) = self.texture_groups.get(&draw.textures) else {
                    continue;
                };
                let offset = (u64::from(draw.slot) * self.uniform_stride) as u32;
                pass.set_pipeline(&self.shaders[draw.shader].pipeline);
                pass.set_bind_group(0, &self.uniform_bind_group, &[offset]);
                pass.set_bind_group(1, textures, &[]);
                match draw.geometry {
                    Geometry::Cube => {
                        pass.set_vertex_buffer(0, self.cube_vertex_buffer.slice(..));
                        pass.set_index_buffer(
                            self.cube_index_buffer.slice(..),
                            wgpu::IndexFormat::Uint16,
                        );
                        pass.draw_indexed(0..self.cube_index_count, 0, 0..1);
                    }
                    Geometry::Mesh { model, mesh } => {
                        let mesh = &self.models[model].meshes[mesh];
                        pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                        pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                        pass.draw_indexed(0..mesh.index_count, 0, 0..1);
                    }
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.output.present();
        self.reset_frame_state();
    }
}

impl ResourceLoader for WgpuGraphics {
    fn create_shader(&mut self, source: &ShaderSource) -> Result<ShaderId, RenderError> {
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let vertex_module = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&format!("{}_vertex", source.label)),
            source: wgpu::ShaderSource::Wgsl(source.vertex.as_str().into()),
        });
        let fragment_module = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&format!("{}_fragment", source.label)),
            source: wgpu::ShaderSource::Wgsl(source.fragment.as_str().into()),
        });

        let pipeline = self.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&format!("{}_pipeline", source.label)),
            layout: Some(&self.pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vertex_module,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[Vertex::LAYOUT],
            },
            fragment: Some(wgpu::FragmentState {
                module: &fragment_module,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        if let Some(err) = pollster::block_on(self.device.pop_error_scope()) {
            return Err(RenderError::ShaderCompile {
                label: source.label.clone(),
                message: err.to_string(),
            });
        }

        self.shaders.push(GpuShader {
            label: source.label.clone(),
            pipeline,
            staging: Uniforms::default(),
        });
        tracing::debug!("created shader program {}", source.label);
        Ok(ShaderId(self.shaders.len() as u32 - 1))
    }

    fn load_texture(&mut self, path: &Path) -> TextureHandle {
        match cubeview_assets::load_image(path) {
            Ok(image) => {
                let handle = self.register_texture(&path.display().to_string(), &image);
                tracing::info!(
                    "loaded texture {} ({}x{}) as handle {}",
                    path.display(),
                    image.width,
                    image.height,
                    handle.0
                );
                handle
            }
            Err(e) => {
                tracing::error!("texture failed to load at path {}: {e}", path.display());
                println!("Texture failed to load at path: {}", path.display());
                TextureHandle::INVALID
            }
        }
    }

    fn load_model(&mut self, path: &Path) -> ModelId {
        let model = match cubeview_assets::load_obj(path) {
            Ok(data) => self.upload_model(&data),
            Err(e) => {
                tracing::error!("model failed to load: {e}");
                GpuModel::default()
            }
        };
        self.models.push(model);
        ModelId(self.models.len() as u32 - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_mesh_has_six_quads() {
        let (verts, indices) = cube_mesh();
        assert_eq!(verts.len(), 24);
        assert_eq!(indices.len(), 36);
        assert!(indices.iter().all(|&i| (i as usize) < verts.len()));
    }

    #[test]
    fn cube_faces_wind_counter_clockwise_outward() {
        let (verts, indices) = cube_mesh();
        for tri in indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| glam::Vec3::from(verts[i as usize].position));
            let face_normal = (b - a).cross(c - a).normalize();
            let n = glam::Vec3::from(verts[tri[0] as usize].normal);
            assert!(face_normal.dot(n) > 0.99);
        }
    }

    #[test]
    fn vertex_layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 32);
        assert_eq!(Vertex::LAYOUT.array_stride, 32);
    }
}
