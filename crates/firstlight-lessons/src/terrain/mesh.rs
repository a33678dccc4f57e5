//! CPU-side terrain triangulation.

use bytemuck::{Pod, Zeroable};

use firstlight_engine::assets::{Heightmap, HEIGHTMAP_SIZE};

/// Cells along each side of the grid.
pub const GRID_CELLS: usize = HEIGHTMAP_SIZE as usize - 1;

/// Two triangles per cell, three vertices each.
pub const VERTEX_COUNT: usize = GRID_CELLS * GRID_CELLS * 6;

/// World-space width of the terrain on X and Z.
pub const SPAN: f32 = 2.0;

/// Multiplier from normalized height to world-space Y.
pub const HEIGHT_SCALE: f32 = 0.4;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct TerrainVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl TerrainVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x3  // color
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<TerrainVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Maps an average (scaled) height to a color.
///
/// Hand-tuned; kept exactly as authored.
#[inline]
pub fn palette(avg: f32) -> [f32; 3] {
    [avg * 0.2, avg * 0.4 + 0.1, 0.2 + avg * 0.9]
}

/// Rebuilds the full triangle list for `map` into `out`.
///
/// Cell `(x, y)` spans `x0..x1` on X and `z0..z1` on Z and is split along its
/// `(x0, z0)`-`(x1, z1)` diagonal. Each triangle takes a flat color from the
/// mean height of its three corners.
pub fn build_mesh(map: &Heightmap, out: &mut Vec<TerrainVertex>) {
    out.clear();
    out.reserve(VERTEX_COUNT);

    let step = SPAN / GRID_CELLS as f32;
    let start = -SPAN / 2.0;

    for y in 0..GRID_CELLS {
        for x in 0..GRID_CELLS {
            let x0 = start + x as f32 * step;
            let x1 = start + (x + 1) as f32 * step;
            let z0 = start + y as f32 * step;
            let z1 = start + (y + 1) as f32 * step;

            let y00 = map.get(x, y) * HEIGHT_SCALE;
            let y10 = map.get(x + 1, y) * HEIGHT_SCALE;
            let y01 = map.get(x, y + 1) * HEIGHT_SCALE;
            let y11 = map.get(x + 1, y + 1) * HEIGHT_SCALE;

            let c1 = palette((y00 + y10 + y11) / 3.0);
            out.extend([
                TerrainVertex { position: [x0, y00, z0], color: c1 },
                TerrainVertex { position: [x1, y10, z0], color: c1 },
                TerrainVertex { position: [x1, y11, z1], color: c1 },
            ]);

            let c2 = palette((y00 + y11 + y01) / 3.0);
            out.extend([
                TerrainVertex { position: [x0, y00, z0], color: c2 },
                TerrainVertex { position: [x1, y11, z1], color: c2 },
                TerrainVertex { position: [x0, y01, z1], color: c2 },
            ]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    fn map_from(f: impl Fn(u32, u32) -> u8) -> Heightmap {
        Heightmap::from_luma(GrayImage::from_fn(128, 128, |x, y| Luma([f(x, y)]))).unwrap()
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn palette_is_literal_formula() {
        assert_eq!(palette(0.0), [0.0, 0.1, 0.2]);
        let c = palette(0.4);
        assert!(close(c[0], 0.08) && close(c[1], 0.26) && close(c[2], 0.56));
    }

    #[test]
    fn mesh_covers_every_cell() {
        let mut out = Vec::new();
        build_mesh(&map_from(|_, _| 0), &mut out);
        assert_eq!(out.len(), VERTEX_COUNT);
        assert_eq!(VERTEX_COUNT, 127 * 127 * 6);
    }

    #[test]
    fn flat_black_map_lies_on_ground_plane() {
        let mut out = Vec::new();
        build_mesh(&map_from(|_, _| 0), &mut out);
        assert!(out.iter().all(|v| v.position[1] == 0.0));
        assert!(out.iter().all(|v| v.color == palette(0.0)));
    }

    #[test]
    fn white_map_sits_at_height_scale() {
        let mut out = Vec::new();
        build_mesh(&map_from(|_, _| 255), &mut out);
        assert!(out.iter().all(|v| v.position[1] == HEIGHT_SCALE));
        let expected = palette(HEIGHT_SCALE);
        assert!(out.iter().all(|v| v.color.iter().zip(expected).all(|(&a, b)| close(a, b))));
    }

    #[test]
    fn grid_spans_minus_one_to_one() {
        let mut out = Vec::new();
        build_mesh(&map_from(|_, _| 0), &mut out);

        let (mut lo, mut hi) = (f32::INFINITY, f32::NEG_INFINITY);
        for v in &out {
            for c in [v.position[0], v.position[2]] {
                lo = lo.min(c);
                hi = hi.max(c);
            }
        }
        assert!(close(lo, -1.0));
        assert!(close(hi, 1.0));
    }

    #[test]
    fn first_cell_triangles_use_corner_heights() {
        // Heights 0, 51, 102, 153 (of 255) at the four corners of cell (0, 0).
        let map = map_from(|x, y| match (x, y) {
            (0, 0) => 0,
            (1, 0) => 51,
            (0, 1) => 102,
            (1, 1) => 153,
            _ => 0,
        });
        let mut out = Vec::new();
        build_mesh(&map, &mut out);

        let h = |v: u8| v as f32 / 255.0 * HEIGHT_SCALE;
        let ys: Vec<f32> = out[..6].iter().map(|v| v.position[1]).collect();
        assert_eq!(ys, [h(0), h(51), h(153), h(0), h(153), h(102)]);

        let avg1 = (h(0) + h(51) + h(153)) / 3.0;
        let avg2 = (h(0) + h(153) + h(102)) / 3.0;
        assert_eq!(out[0].color, palette(avg1));
        assert_eq!(out[3].color, palette(avg2));
    }

    #[test]
    fn rebuild_reuses_buffer() {
        let map = map_from(|x, y| (x + y) as u8);
        let mut out = Vec::new();
        build_mesh(&map, &mut out);
        let first = out.clone();
        build_mesh(&map, &mut out);
        assert_eq!(out, first);
    }
}
