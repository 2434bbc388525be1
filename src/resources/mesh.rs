//! Procedural basic shapes.
//!
//! Every [`Primitive`] is generated on the CPU as a [`MeshData`] and uploaded
//! at most once by a [`MeshLibrary`]; after that it can be drawn any number
//! of times with whatever transform and render state is current.

use std::f32::consts::{PI, TAU};

use anyhow::Result;

const SPHERE_SEGMENTS: u32 = 32;
const SPHERE_RINGS: u32 = 16;
const ROUND_SEGMENTS: u32 = 36;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Primitive {
    Plane,
    Sphere,
    Cone,
    Box,
    Cylinder,
    Pyramid4,
}

impl Primitive {
    pub const ALL: [Primitive; 6] = [
        Primitive::Plane,
        Primitive::Sphere,
        Primitive::Cone,
        Primitive::Box,
        Primitive::Cylinder,
        Primitive::Pyramid4,
    ];

    pub fn generate(self) -> MeshData {
        match self {
            Primitive::Plane => plane(),
            Primitive::Sphere => sphere(SPHERE_SEGMENTS, SPHERE_RINGS),
            Primitive::Cone => cone(ROUND_SEGMENTS),
            Primitive::Box => cube(),
            Primitive::Cylinder => cylinder(ROUND_SEGMENTS),
            Primitive::Pyramid4 => pyramid4(),
        }
    }
}

/// Uploads and draws primitives.
///
/// `draw` renders with the model matrix and render state most recently pushed
/// through the shader interface.
pub trait MeshLibrary {
    fn load_mesh(&mut self, primitive: Primitive) -> Result<()>;
    fn draw_mesh(&mut self, primitive: Primitive) -> Result<()>;
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
}

impl MeshVertex {
    pub fn new(position: [f32; 3], normal: [f32; 3], tex_coords: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            tex_coords,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// CPU-side triangle list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    fn push_vertex(&mut self, position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> u32 {
        self.vertices.push(MeshVertex::new(position, normal, uv));
        self.vertices.len() as u32 - 1
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Unit plane on XZ spanning -1..1, facing +Y.
fn plane() -> MeshData {
    let mut mesh = MeshData::default();
    let up = [0.0, 1.0, 0.0];
    let a = mesh.push_vertex([-1.0, 0.0, 1.0], up, [0.0, 0.0]);
    let b = mesh.push_vertex([1.0, 0.0, 1.0], up, [1.0, 0.0]);
    let c = mesh.push_vertex([1.0, 0.0, -1.0], up, [1.0, 1.0]);
    let d = mesh.push_vertex([-1.0, 0.0, -1.0], up, [0.0, 1.0]);
    mesh.indices.extend([a, b, c, c, d, a]);
    mesh
}

/// Unit cube centred on the origin, one quad per face.
fn cube() -> MeshData {
    let mut mesh = MeshData::default();
    // (normal, u axis, v axis)
    let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
    ];
    for (n, u, v) in faces {
        let corner = |su: f32, sv: f32| {
            [
                0.5 * (n[0] + su * u[0] + sv * v[0]),
                0.5 * (n[1] + su * u[1] + sv * v[1]),
                0.5 * (n[2] + su * u[2] + sv * v[2]),
            ]
        };
        let a = mesh.push_vertex(corner(-1.0, -1.0), n, [0.0, 0.0]);
        let b = mesh.push_vertex(corner(1.0, -1.0), n, [1.0, 0.0]);
        let c = mesh.push_vertex(corner(1.0, 1.0), n, [1.0, 1.0]);
        let d = mesh.push_vertex(corner(-1.0, 1.0), n, [0.0, 1.0]);
        mesh.indices.extend([a, b, c, c, d, a]);
    }
    mesh
}

/// UV sphere of radius 1.
fn sphere(segments: u32, rings: u32) -> MeshData {
    let mut mesh = MeshData::default();
    for ring in 0..=rings {
        let phi = PI * ring as f32 / rings as f32;
        let (ring_radius, y) = phi.sin_cos();
        for seg in 0..=segments {
            let theta = TAU * seg as f32 / segments as f32;
            let (sin_t, cos_t) = theta.sin_cos();
            let p = [ring_radius * cos_t, y, ring_radius * sin_t];
            mesh.push_vertex(
                p,
                p,
                [seg as f32 / segments as f32, 1.0 - ring as f32 / rings as f32],
            );
        }
    }
    for ring in 0..rings {
        for seg in 0..segments {
            let current = ring * (segments + 1) + seg;
            let next = current + segments + 1;
            mesh.indices
                .extend([current, current + 1, next, current + 1, next + 1, next]);
        }
    }
    mesh
}

/// Flat disc of radius 1 at height `y`, facing up or down.
fn disc(mesh: &mut MeshData, segments: u32, y: f32, facing_up: bool) {
    let normal = if facing_up { [0.0, 1.0, 0.0] } else { [0.0, -1.0, 0.0] };
    let centre = mesh.push_vertex([0.0, y, 0.0], normal, [0.5, 0.5]);
    let first = mesh.vertices.len() as u32;
    for seg in 0..=segments {
        let (s, c) = (TAU * seg as f32 / segments as f32).sin_cos();
        mesh.push_vertex([c, y, s], normal, [0.5 + 0.5 * c, 0.5 + 0.5 * s]);
    }
    for seg in 0..segments {
        let (a, b) = (first + seg, first + seg + 1);
        if facing_up {
            mesh.indices.extend([centre, b, a]);
        } else {
            mesh.indices.extend([centre, a, b]);
        }
    }
}

/// Cylinder of radius 1 from y = 0 to y = 1, capped at both ends.
fn cylinder(segments: u32) -> MeshData {
    let mut mesh = MeshData::default();
    let first = mesh.vertices.len() as u32;
    for seg in 0..=segments {
        let u = seg as f32 / segments as f32;
        let (s, c) = (TAU * u).sin_cos();
        mesh.push_vertex([c, 0.0, s], [c, 0.0, s], [u, 0.0]);
        mesh.push_vertex([c, 1.0, s], [c, 0.0, s], [u, 1.0]);
    }
    for seg in 0..segments {
        let bottom = first + seg * 2;
        let top = bottom + 1;
        let next_bottom = bottom + 2;
        let next_top = bottom + 3;
        mesh.indices
            .extend([bottom, top, next_bottom, next_bottom, top, next_top]);
    }
    disc(&mut mesh, segments, 0.0, false);
    disc(&mut mesh, segments, 1.0, true);
    mesh
}

/// Cone with a radius 1 base at y = 0 and its apex at y = 1.
fn cone(segments: u32) -> MeshData {
    let mut mesh = MeshData::default();
    // slant normal of a 45 degree cone
    let k = 1.0 / 2.0_f32.sqrt();
    for seg in 0..segments {
        let u0 = seg as f32 / segments as f32;
        let u1 = (seg + 1) as f32 / segments as f32;
        let mid = (u0 + u1) * 0.5;
        let (s0, c0) = (TAU * u0).sin_cos();
        let (s1, c1) = (TAU * u1).sin_cos();
        let (sm, cm) = (TAU * mid).sin_cos();
        let a = mesh.push_vertex([c0, 0.0, s0], [c0 * k, k, s0 * k], [u0, 0.0]);
        let b = mesh.push_vertex([c1, 0.0, s1], [c1 * k, k, s1 * k], [u1, 0.0]);
        let apex = mesh.push_vertex([0.0, 1.0, 0.0], [cm * k, k, sm * k], [mid, 1.0]);
        mesh.indices.extend([a, apex, b]);
    }
    disc(&mut mesh, segments, 0.0, false);
    mesh
}

/// Square pyramid with a unit base at y = -0.5 and its apex at y = 0.5.
fn pyramid4() -> MeshData {
    let mut mesh = MeshData::default();
    let apex = [0.0, 0.5, 0.0];
    let base = [
        [-0.5, -0.5, 0.5],
        [0.5, -0.5, 0.5],
        [0.5, -0.5, -0.5],
        [-0.5, -0.5, -0.5],
    ];
    for i in 0..4 {
        let p0 = base[i];
        let p1 = base[(i + 1) % 4];
        let normal = face_normal(p0, p1, apex);
        let a = mesh.push_vertex(p0, normal, [0.0, 0.0]);
        let b = mesh.push_vertex(p1, normal, [1.0, 0.0]);
        let c = mesh.push_vertex(apex, normal, [0.5, 1.0]);
        mesh.indices.extend([a, b, c]);
    }
    let down = [0.0, -1.0, 0.0];
    let a = mesh.push_vertex(base[0], down, [0.0, 1.0]);
    let b = mesh.push_vertex(base[1], down, [1.0, 1.0]);
    let c = mesh.push_vertex(base[2], down, [1.0, 0.0]);
    let d = mesh.push_vertex(base[3], down, [0.0, 0.0]);
    mesh.indices.extend([a, c, b, a, d, c]);
    mesh
}

fn face_normal(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> [f32; 3] {
    use cgmath::InnerSpace;
    let a = cgmath::Vector3::from(a);
    let b = cgmath::Vector3::from(b);
    let c = cgmath::Vector3::from(c);
    (b - a).cross(c - a).normalize().into()
}
