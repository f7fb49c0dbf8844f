use alchemy_scene::MeshKind;
use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

const fn v(position: [f32; 3], uv: [f32; 2]) -> Vertex {
    Vertex { position, uv }
}

pub(crate) struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

pub(crate) fn mesh_data(kind: MeshKind) -> MeshData {
    match kind {
        MeshKind::Cube => cube_mesh(),
        MeshKind::Plane => plane_mesh(),
        MeshKind::Billboard => billboard_mesh(),
    }
}

/// Unit cube, one full texture per face.
fn cube_mesh() -> MeshData {
    let p = 0.5_f32;
    #[rustfmt::skip]
    let vertices = vec![
        // +Z
        v([-p, -p,  p], [0.0, 0.0]), v([ p, -p,  p], [1.0, 0.0]),
        v([ p,  p,  p], [1.0, 1.0]), v([-p,  p,  p], [0.0, 1.0]),
        // -Z
        v([ p, -p, -p], [0.0, 0.0]), v([-p, -p, -p], [1.0, 0.0]),
        v([-p,  p, -p], [1.0, 1.0]), v([ p,  p, -p], [0.0, 1.0]),
        // +X
        v([ p, -p,  p], [0.0, 0.0]), v([ p, -p, -p], [1.0, 0.0]),
        v([ p,  p, -p], [1.0, 1.0]), v([ p,  p,  p], [0.0, 1.0]),
        // -X
        v([-p, -p, -p], [0.0, 0.0]), v([-p, -p,  p], [1.0, 0.0]),
        v([-p,  p,  p], [1.0, 1.0]), v([-p,  p, -p], [0.0, 1.0]),
        // +Y
        v([-p,  p,  p], [0.0, 0.0]), v([ p,  p,  p], [1.0, 0.0]),
        v([ p,  p, -p], [1.0, 1.0]), v([-p,  p, -p], [0.0, 1.0]),
        // -Y
        v([-p, -p, -p], [0.0, 0.0]), v([ p, -p, -p], [1.0, 0.0]),
        v([ p, -p,  p], [1.0, 1.0]), v([-p, -p,  p], [0.0, 1.0]),
    ];
    let indices = (0..6u16)
        .flat_map(|face| {
            let b = face * 4;
            [b, b + 1, b + 2, b + 2, b + 3, b]
        })
        .collect();
    MeshData { vertices, indices }
}

/// 10x10 quad in the XZ plane. UVs run to 2 so a repeating texture tiles
/// twice per side.
fn plane_mesh() -> MeshData {
    #[rustfmt::skip]
    let vertices = vec![
        v([ 5.0, 0.0,  5.0], [2.0, 0.0]),
        v([-5.0, 0.0, -5.0], [0.0, 2.0]),
        v([-5.0, 0.0,  5.0], [0.0, 0.0]),
        v([ 5.0, 0.0, -5.0], [2.0, 2.0]),
    ];
    MeshData {
        vertices,
        indices: vec![0, 1, 2, 0, 3, 1],
    }
}

/// Unit quad in the XY plane. V is flipped so images appear upright.
fn billboard_mesh() -> MeshData {
    #[rustfmt::skip]
    let vertices = vec![
        v([0.0,  0.5, 0.0], [0.0, 0.0]),
        v([0.0, -0.5, 0.0], [0.0, 1.0]),
        v([1.0, -0.5, 0.0], [1.0, 1.0]),
        v([1.0,  0.5, 0.0], [1.0, 0.0]),
    ];
    MeshData {
        vertices,
        indices: vec![0, 1, 2, 0, 2, 3],
    }
}
