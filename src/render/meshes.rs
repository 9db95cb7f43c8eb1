//! Unit primitives uploaded once at startup. Every primitive carries a
//! triangle list for solid shading and a deduplicated edge list for wireframe,
//! since WebGPU has no line polygon mode.

use crate::core::constants::{RING_INNER_RADIUS, RING_OUTER_RADIUS};
use crate::core::scene::Primitive;
use glam::Vec3;
use std::collections::{BTreeSet, HashMap};
use std::f32::consts::{PI, TAU};
use wgpu::util::DeviceExt;

const SPHERE_SEGMENTS: u32 = 32;
const SPHERE_RINGS: u32 = 16;
const ICOSPHERE_DETAIL: u32 = 1;
const RING_SEGMENTS: u32 = 128;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct Vertex {
    pub(crate) pos: [f32; 3],
    pub(crate) normal: [f32; 3],
}

impl Vertex {
    pub(crate) const ATTRIBS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }

    fn new(pos: Vec3, normal: Vec3) -> Self {
        Self {
            pos: pos.to_array(),
            normal: normal.to_array(),
        }
    }
}

pub(crate) struct MeshData {
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) triangles: Vec<u32>,
}

impl MeshData {
    /// Unique undirected edges of the triangle list, keyed on positions so the
    /// seams of a UV sphere don't draw twice.
    pub(crate) fn edges(&self) -> Vec<u32> {
        let key = |i: u32| {
            let p = self.vertices[i as usize].pos;
            [p[0].to_bits(), p[1].to_bits(), p[2].to_bits()]
        };
        let mut seen = BTreeSet::new();
        let mut out = Vec::new();
        for tri in self.triangles.chunks_exact(3) {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                let (ka, kb) = (key(a), key(b));
                if ka == kb {
                    continue; // collapsed at a pole
                }
                let pair = if ka < kb { (ka, kb) } else { (kb, ka) };
                if seen.insert(pair) {
                    out.extend_from_slice(&[a, b]);
                }
            }
        }
        out
    }
}

pub(crate) fn cube() -> MeshData {
    let faces = [
        (Vec3::X, Vec3::Y, Vec3::Z),
        (Vec3::NEG_X, Vec3::Y, Vec3::NEG_Z),
        (Vec3::Y, Vec3::Z, Vec3::X),
        (Vec3::NEG_Y, Vec3::NEG_Z, Vec3::X),
        (Vec3::Z, Vec3::Y, Vec3::NEG_X),
        (Vec3::NEG_Z, Vec3::Y, Vec3::X),
    ];
    let mut vertices = Vec::with_capacity(24);
    let mut triangles = Vec::with_capacity(36);
    for (normal, up, right) in faces {
        let base = vertices.len() as u32;
        let centre = normal * 0.5;
        for (u, v) in [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)] {
            vertices.push(Vertex::new(centre + right * u + up * v, normal));
        }
        triangles.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    MeshData {
        vertices,
        triangles,
    }
}

pub(crate) fn uv_sphere(segments: u32, rings: u32) -> MeshData {
    let mut vertices = Vec::with_capacity(((segments + 1) * (rings + 1)) as usize);
    for r in 0..=rings {
        let phi = PI * r as f32 / rings as f32;
        for s in 0..=segments {
            let theta = TAU * s as f32 / segments as f32;
            let n = Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin());
            vertices.push(Vertex::new(n, n));
        }
    }
    let stride = segments + 1;
    let mut triangles = Vec::with_capacity((segments * rings * 6) as usize);
    for r in 0..rings {
        for s in 0..segments {
            let a = r * stride + s;
            let b = a + stride;
            triangles.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
        }
    }
    MeshData {
        vertices,
        triangles,
    }
}

pub(crate) fn icosphere(detail: u32) -> MeshData {
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
    let mut points: Vec<Vec3> = [
        (-1.0, t, 0.0),
        (1.0, t, 0.0),
        (-1.0, -t, 0.0),
        (1.0, -t, 0.0),
        (0.0, -1.0, t),
        (0.0, 1.0, t),
        (0.0, -1.0, -t),
        (0.0, 1.0, -t),
        (t, 0.0, -1.0),
        (t, 0.0, 1.0),
        (-t, 0.0, -1.0),
        (-t, 0.0, 1.0),
    ]
    .iter()
    .map(|&(x, y, z)| Vec3::new(x, y, z).normalize())
    .collect();
    let mut faces: Vec<[u32; 3]> = vec![
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];
    for _ in 0..detail {
        let mut midpoints: HashMap<(u32, u32), u32> = HashMap::new();
        let mut midpoint = |a: u32, b: u32, points: &mut Vec<Vec3>| {
            let key = (a.min(b), a.max(b));
            *midpoints.entry(key).or_insert_with(|| {
                let p = (points[a as usize] + points[b as usize]).normalize();
                points.push(p);
                points.len() as u32 - 1
            })
        };
        let mut next = Vec::with_capacity(faces.len() * 4);
        for [a, b, c] in faces {
            let ab = midpoint(a, b, &mut points);
            let bc = midpoint(b, c, &mut points);
            let ca = midpoint(c, a, &mut points);
            next.extend_from_slice(&[[a, ab, ca], [b, bc, ab], [c, ca, bc], [ab, bc, ca]]);
        }
        faces = next;
    }
    MeshData {
        vertices: points.iter().map(|&p| Vertex::new(p, p)).collect(),
        triangles: faces.into_iter().flatten().collect(),
    }
}

/// Flat annulus in the XY plane.
pub(crate) fn ring(inner: f32, outer: f32, segments: u32) -> MeshData {
    let mut vertices = Vec::with_capacity(((segments + 1) * 2) as usize);
    for s in 0..=segments {
        let theta = TAU * s as f32 / segments as f32;
        let dir = Vec3::new(theta.cos(), theta.sin(), 0.0);
        vertices.push(Vertex::new(dir * inner, Vec3::Z));
        vertices.push(Vertex::new(dir * outer, Vec3::Z));
    }
    let mut triangles = Vec::with_capacity((segments * 6) as usize);
    for s in 0..segments {
        let i = s * 2;
        triangles.extend_from_slice(&[i, i + 1, i + 3, i, i + 3, i + 2]);
    }
    MeshData {
        vertices,
        triangles,
    }
}

pub(crate) fn mesh_data(primitive: Primitive) -> MeshData {
    match primitive {
        Primitive::Cube => cube(),
        Primitive::Sphere | Primitive::Cloud => uv_sphere(SPHERE_SEGMENTS, SPHERE_RINGS),
        Primitive::Icosphere => icosphere(ICOSPHERE_DETAIL),
        Primitive::Ring => ring(RING_INNER_RADIUS, RING_OUTER_RADIUS, RING_SEGMENTS),
    }
}

pub(crate) struct GpuMesh {
    pub(crate) vertex_buffer: wgpu::Buffer,
    pub(crate) triangle_buffer: wgpu::Buffer,
    pub(crate) triangle_count: u32,
    pub(crate) edge_buffer: wgpu::Buffer,
    pub(crate) edge_count: u32,
}

impl GpuMesh {
    fn upload(device: &wgpu::Device, label: &str, data: &MeshData) -> Self {
        let edges = data.edges();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let triangle_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&data.triangles),
            usage: wgpu::BufferUsages::INDEX,
        });
        let edge_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&edges),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            triangle_buffer,
            triangle_count: data.triangles.len() as u32,
            edge_buffer,
            edge_count: edges.len() as u32,
        }
    }
}

pub(crate) struct MeshLibrary {
    meshes: HashMap<Primitive, GpuMesh>,
}

impl MeshLibrary {
    pub(crate) const PRIMITIVES: [Primitive; 5] = [
        Primitive::Cube,
        Primitive::Sphere,
        Primitive::Icosphere,
        Primitive::Ring,
        Primitive::Cloud,
    ];

    pub(crate) fn new(device: &wgpu::Device) -> Self {
        let meshes = Self::PRIMITIVES
            .iter()
            .map(|&p| {
                let label = format!("mesh_{p:?}");
                (p, GpuMesh::upload(device, &label, &mesh_data(p)))
            })
            .collect();
        Self { meshes }
    }

    pub(crate) fn get(&self, primitive: Primitive) -> Option<&GpuMesh> {
        self.meshes.get(&primitive)
    }
}
