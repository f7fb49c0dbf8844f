use crate::mesh::{self, Vertex};
use crate::shaders;
use crate::texture::{self, TextureOptions};
use alchemy_common::TextureConfig;
use alchemy_scene::{BlendMode, DrawCommand, FramePlan, MeshKind, TextureSlot};
use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use image::RgbaImage;
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
struct InstanceData {
    model_0: [f32; 4],
    model_1: [f32; 4],
    model_2: [f32; 4],
    model_3: [f32; 4],
    tint: [f32; 4],
}

impl From<&DrawCommand> for InstanceData {
    fn from(cmd: &DrawCommand) -> Self {
        let cols = cmd.model.to_cols_array_2d();
        Self {
            model_0: cols[0],
            model_1: cols[1],
            model_2: cols[2],
            model_3: cols[3],
            tint: cmd.tint.extend(1.0).to_array(),
        }
    }
}

/// Per-draw instance data for the first `max` commands, in plan order.
fn instance_data(commands: &[DrawCommand], max: usize) -> Vec<InstanceData> {
    commands.iter().take(max).map(InstanceData::from).collect()
}

const MESH_KINDS: [MeshKind; 3] = [MeshKind::Cube, MeshKind::Plane, MeshKind::Billboard];

fn mesh_index(kind: MeshKind) -> usize {
    match kind {
        MeshKind::Cube => 0,
        MeshKind::Plane => 1,
        MeshKind::Billboard => 2,
    }
}

/// Decoded images for every texture slot, with their sampler options.
pub struct TextureSet {
    images: [RgbaImage; 3],
    options: [TextureOptions; 3],
}

impl TextureSet {
    /// Load the configured textures. Files that fail to load are replaced
    /// by the fallback texture.
    pub fn load(config: &TextureConfig) -> Self {
        Self {
            images: [
                texture::load_image_or_fallback(config.cube_path()),
                texture::load_image_or_fallback(config.floor_path()),
                texture::load_image_or_fallback(config.transparent_path()),
            ],
            options: Self::default_options(),
        }
    }

    /// Every slot uses the fallback texture.
    pub fn fallback() -> Self {
        Self {
            images: [
                texture::fallback_image(),
                texture::fallback_image(),
                texture::fallback_image(),
            ],
            options: Self::default_options(),
        }
    }

    pub fn image(&self, slot: TextureSlot) -> &RgbaImage {
        &self.images[slot.index()]
    }

    pub fn options(&self, slot: TextureSlot) -> TextureOptions {
        self.options[slot.index()]
    }

    pub fn set_options(&mut self, slot: TextureSlot, options: TextureOptions) {
        self.options[slot.index()] = options;
    }

    fn default_options() -> [TextureOptions; 3] {
        [
            TextureOptions::default(),
            TextureOptions::default(),
            // Clamped horizontally so the window's transparent side border
            // does not wrap around; V repeats.
            TextureOptions::with_address_modes(
                wgpu::AddressMode::ClampToEdge,
                wgpu::AddressMode::Repeat,
            ),
        ]
    }
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

struct GpuTexture {
    _texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

/// wgpu-based frame plan executor.
pub struct WgpuRenderer {
    opaque_pipeline: wgpu::RenderPipeline,
    blend_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    meshes: Vec<GpuMesh>,
    textures: Vec<GpuTexture>,
    instance_buffer: wgpu::Buffer,
    max_instances: u32,
    depth_texture: wgpu::TextureView,
    surface_format: wgpu::TextureFormat,
    clear_color: wgpu::Color,
}

impl WgpuRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        textures: &TextureSet,
        clear_color: [f64; 4],
    ) -> Self {
        // Uniform buffer
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("uniform_buffer"),
            contents: bytemuck::bytes_of(&Uniforms {
                view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uniform_bind_group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
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

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("textured_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::TEXTURED_SHADER.into()),
        });

        let opaque_pipeline = create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            surface_format,
            wgpu::BlendState::REPLACE,
            "opaque_pipeline",
        );
        // Depth writes stay on for blended geometry, which is why billboards
        // must arrive sorted.
        let blend_pipeline = create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            surface_format,
            wgpu::BlendState::ALPHA_BLENDING,
            "blend_pipeline",
        );

        let meshes = MESH_KINDS
            .iter()
            .map(|&kind| upload_mesh(device, kind))
            .collect();

        let textures = TextureSlot::ALL
            .iter()
            .map(|&slot| {
                upload_texture(
                    device,
                    queue,
                    &texture_layout,
                    textures.image(slot),
                    textures.options(slot),
                    texture_label(slot),
                )
            })
            .collect();

        // Instance buffer (pre-allocated)
        let max_instances = 256u32;
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instance_buffer"),
            size: (max_instances as u64) * std::mem::size_of::<InstanceData>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let depth_texture = Self::create_depth_texture(device, width, height);

        let [r, g, b, a] = clear_color;
        Self {
            opaque_pipeline,
            blend_pipeline,
            uniform_buffer,
            uniform_bind_group,
            meshes,
            textures,
            instance_buffer,
            max_instances,
            depth_texture,
            surface_format,
            clear_color: wgpu::Color { r, g, b, a },
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    /// Draw one frame plan into `view`, one draw call per command, in plan
    /// order.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        plan: &FramePlan,
    ) {
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms {
                view_proj: plan.view_projection().to_cols_array_2d(),
            }),
        );

        let instances = instance_data(&plan.commands, self.max_instances as usize);
        if instances.len() < plan.commands.len() {
            tracing::warn!(
                "frame has {} commands, drawing the first {}",
                plan.commands.len(),
                instances.len()
            );
        }
        if !instances.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
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
                ..Default::default()
            });

            pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            pass.set_vertex_buffer(1, self.instance_buffer.slice(..));

            let mut bound_blend = None;
            for (i, cmd) in plan.commands.iter().take(instances.len()).enumerate() {
                if bound_blend != Some(cmd.blend) {
                    pass.set_pipeline(match cmd.blend {
                        BlendMode::Opaque => &self.opaque_pipeline,
                        BlendMode::AlphaBlend => &self.blend_pipeline,
                    });
                    bound_blend = Some(cmd.blend);
                }

                let mesh = &self.meshes[mesh_index(cmd.mesh)];
                pass.set_bind_group(1, &self.textures[cmd.texture.index()].bind_group, &[]);
                pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
                let instance = i as u32;
                pass.draw_indexed(0..mesh.index_count, 0, instance..instance + 1);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> wgpu::TextureView {
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
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

fn texture_label(slot: TextureSlot) -> &'static str {
    match slot {
        TextureSlot::Cube => "cube_texture",
        TextureSlot::Floor => "floor_texture",
        TextureSlot::Transparent => "transparent_texture",
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    surface_format: wgpu::TextureFormat,
    blend: wgpu::BlendState,
    label: &'static str,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[
                wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                        1 => Float32x2,
                    ],
                },
                wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<InstanceData>() as u64,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &wgpu::vertex_attr_array![
                        2 => Float32x4,
                        3 => Float32x4,
                        4 => Float32x4,
                        5 => Float32x4,
                        6 => Float32x4,
                    ],
                },
            ],
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            // Room panels and billboards are seen from both sides.
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: wgpu::TextureFormat::Depth32Float,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: Default::default(),
            bias: Default::default(),
        }),
        multisample: Default::default(),
        multiview: None,
        cache: None,
    })
}

fn upload_mesh(device: &wgpu::Device, kind: MeshKind) -> GpuMesh {
    let data = mesh::mesh_data(kind);
    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("mesh_vertex_buffer"),
        contents: bytemuck::cast_slice(&data.vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("mesh_index_buffer"),
        contents: bytemuck::cast_slice(&data.indices),
        usage: wgpu::BufferUsages::INDEX,
    });
    GpuMesh {
        vertex_buffer,
        index_buffer,
        index_count: data.indices.len() as u32,
    }
}

fn upload_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    image: &RgbaImage,
    options: TextureOptions,
    label: &'static str,
) -> GpuTexture {
    let levels = texture::mip_chain(image);
    let (width, height) = image.dimensions();
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: levels.len() as u32,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    for (level, img) in levels.iter().enumerate() {
        let (w, h) = img.dimensions();
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: level as u32,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            img.as_raw(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * w),
                rows_per_image: Some(h),
            },
            wgpu::Extent3d {
                width: w,
                height: h,
                depth_or_array_layers: 1,
            },
        );
    }

    let view = texture.create_view(&Default::default());
    let sampler = device.create_sampler(
        &options
            .supported_by(device.features())
            .sampler_descriptor(label),
    );
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&sampler),
            },
        ],
    });

    tracing::debug!(label, width, height, mips = levels.len(), "texture uploaded");
    GpuTexture {
        _texture: texture,
        bind_group,
    }
}
