//! Small geometric helpers shared by the subdivision templates: distance
//! between two vertices (used by the shortest-diagonal tie-breakers),
//! and the straight-sided `mapLocalToGlobal` used to place centroid
//! vertices (tet barycentric and quad bilinear maps). Grounded on
//! `apf::mapLocalToGlobal` as called from `maTemplates.cc`'s
//! `splitTet_prismToTets`/`splitQuad_4` call sites; this core only ever
//! refines straight-sided (linear-geometry) elements, so the map reduces
//! to a weighted average of vertex positions rather than a full
//! higher-order shape-function evaluation.

use crate::error::RefineResult;
use meshkernel_base::{Handle, Vector3};
use meshkernel_mesh::MeshStore;
use meshkernel_topology::EntityKind;

type EHandle = Handle<EntityKind>;

/// Euclidean distance between two vertices' current coordinates.
pub fn distance(store: &MeshStore, a: EHandle, b: EHandle) -> RefineResult<f64> {
    use meshkernel_base::InnerSpace;
    let pa = store.get_point(a)?;
    let pb = store.get_point(b)?;
    Ok((pa - pb).magnitude())
}

/// The unweighted average of `verts`' coordinates (used for a prism's
/// bad-case centroid, a barycentric-averaged local coordinate mapped
/// through the parent element's straight-sided geometry).
pub fn average_points(store: &MeshStore, verts: &[EHandle]) -> RefineResult<Vector3> {
    let mut sum = Vector3::new(0.0, 0.0, 0.0);
    for &v in verts {
        sum += store.get_point(v)?;
    }
    Ok(sum / verts.len() as f64)
}

/// Maps a tet-local barycentric coordinate `xi = [xi0, xi1, xi2]` (vertex
/// 0's weight is `1 - xi0 - xi1 - xi2`) through the straight-sided tet
/// `verts` to a spatial point.
pub fn tet_map_local_to_global(store: &MeshStore, verts: &[EHandle; 4], xi: [f64; 3]) -> RefineResult<Vector3> {
    let w0 = 1.0 - xi[0] - xi[1] - xi[2];
    let p: [Vector3; 4] = [
        store.get_point(verts[0])?,
        store.get_point(verts[1])?,
        store.get_point(verts[2])?,
        store.get_point(verts[3])?,
    ];
    Ok(p[0] * w0 + p[1] * xi[0] + p[2] * xi[1] + p[3] * xi[2])
}

/// Maps a quad-local bilinear coordinate `(x, y)` in `[-1, 1]^2` through
/// the straight-sided quad `verts` (in canonical `QUAD_EDGE_VERTS` vertex
/// order) to a spatial point.
pub fn quad_map_local_to_global(store: &MeshStore, verts: &[EHandle; 4], x: f64, y: f64) -> RefineResult<Vector3> {
    let p: [Vector3; 4] = [
        store.get_point(verts[0])?,
        store.get_point(verts[1])?,
        store.get_point(verts[2])?,
        store.get_point(verts[3])?,
    ];
    let n = [
        0.25 * (1.0 - x) * (1.0 - y),
        0.25 * (1.0 + x) * (1.0 - y),
        0.25 * (1.0 + x) * (1.0 + y),
        0.25 * (1.0 - x) * (1.0 + y),
    ];
    Ok(p[0] * n[0] + p[1] * n[1] + p[2] * n[2] + p[3] * n[3])
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshkernel_base::Vector2;

    fn store_with(points: &[(f64, f64, f64)]) -> (MeshStore, Vec<EHandle>) {
        let mut store = MeshStore::new();
        let verts = points
            .iter()
            .map(|&(x, y, z)| store.create_vertex(None, Vector3::new(x, y, z), Vector2::new(0.0, 0.0)))
            .collect();
        (store, verts)
    }

    #[test]
    fn tet_map_reproduces_vertices_at_corners() {
        let (store, v) = store_with(&[(0.0, 0.0, 0.0), (1.0, 0.0, 0.0), (0.0, 1.0, 0.0), (0.0, 0.0, 1.0)]);
        let verts: [EHandle; 4] = [v[0], v[1], v[2], v[3]];
        assert_eq!(tet_map_local_to_global(&store, &verts, [0.0, 0.0, 0.0]).unwrap(), Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(tet_map_local_to_global(&store, &verts, [1.0, 0.0, 0.0]).unwrap(), Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn quad_map_centroid_is_average_of_corners() {
        let (store, v) = store_with(&[(0.0, 0.0, 0.0), (1.0, 0.0, 0.0), (1.0, 1.0, 0.0), (0.0, 1.0, 0.0)]);
        let verts: [EHandle; 4] = [v[0], v[1], v[2], v[3]];
        let c = quad_map_local_to_global(&store, &verts, 0.0, 0.0).unwrap();
        assert_eq!(c, Vector3::new(0.5, 0.5, 0.0));
    }
}
