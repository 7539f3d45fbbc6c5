//! The placed-split registry: which edges carry a new mid-edge vertex and
//! at what placement parameter, plus the centroid vertex a quad template
//! assigns to its own face. Grounded on `examples/original_source/ma/maMesh.cc`'s
//! `findSplitVert`/`findPlacedSplitVert` and the size-field-guided split
//! placement those call sites feed from.

use meshkernel_base::Handle;
use meshkernel_mesh::MeshStore;
use meshkernel_topology::EntityKind;
use rustc_hash::FxHashMap as HashMap;

type EHandle = Handle<EntityKind>;

/// Canonicalises an unordered vertex pair for use as a hash key.
fn edge_key(a: EHandle, b: EHandle) -> (EHandle, EHandle) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// One placed split: the new vertex and its position `t in (0,1)` along
/// the edge from `a` to `b` (the edge's own vertex order, not the
/// canonicalised key order).
#[derive(Debug, Clone, Copy)]
struct PlacedSplit {
    vertex: EHandle,
    /// Parameter along `(a, b)` in the order the split was registered,
    /// i.e. relative to the edge's own endpoints, not the canonical key.
    t_from_a: f64,
    a: EHandle,
}

/// Registers edges marked for splitting (a new vertex plus its placement
/// parameter), the centroid vertex a quad template assigns to its own
/// face, and the centroid vertex a prism's bad-diagonal-case template
/// assigns to the prism's interior. Lives for the duration of one
/// refinement pass.
#[derive(Debug, Default)]
pub struct SplitRegistry {
    edges: HashMap<(EHandle, EHandle), PlacedSplit>,
    quad_centroids: HashMap<EHandle, EHandle>,
}

impl SplitRegistry {
    pub fn new() -> Self {
        SplitRegistry { edges: HashMap::default(), quad_centroids: HashMap::default() }
    }

    /// Marks the edge `(a, b)` for splitting at parameter `t` (relative to
    /// `a`) by the new vertex `vertex`. Calling this twice for the same
    /// unordered pair overwrites the earlier placement.
    pub fn place_split(&mut self, a: EHandle, b: EHandle, t: f64, vertex: EHandle) {
        self.edges.insert(edge_key(a, b), PlacedSplit { vertex, t_from_a: t, a });
    }

    /// `true` iff edge `(a, b)` carries a placed split.
    pub fn is_marked(&self, a: EHandle, b: EHandle) -> bool {
        self.edges.contains_key(&edge_key(a, b))
    }

    /// The previously placed split vertex on edge `(a, b)`, if any.
    pub fn find_split_vert(&self, a: EHandle, b: EHandle) -> Option<EHandle> {
        self.edges.get(&edge_key(a, b)).map(|s| s.vertex)
    }

    /// The previously placed split vertex on edge `(a, b)` together with
    /// its placement parameter expressed from `a` towards `b`.
    pub fn find_placed_split_vert(&self, a: EHandle, b: EHandle) -> Option<(EHandle, f64)> {
        self.edges.get(&edge_key(a, b)).map(|s| {
            let t = if s.a == a { s.t_from_a } else { 1.0 - s.t_from_a };
            (s.vertex, t)
        })
    }

    /// Assigns `vertex` as the centroid vertex of quad face `face`
    /// (`findSplitVert(r, quad_face)` in spec §4.4).
    pub fn place_quad_centroid(&mut self, face: EHandle, vertex: EHandle) {
        self.quad_centroids.insert(face, vertex);
    }

    /// The centroid vertex previously assigned to quad face `face`.
    pub fn find_quad_centroid(&self, face: EHandle) -> Option<EHandle> {
        self.quad_centroids.get(&face).copied()
    }

    /// `true` iff no edge is marked and no quad centroid is assigned
    /// (spec property 11: refinement with an empty split set is a no-op).
    pub fn is_empty(&self) -> bool { self.edges.is_empty() && self.quad_centroids.is_empty() }

    /// The 6-bit (tet/prism side-diagonal) or 4-bit (quad/pyramid base)
    /// edge-split code for `kind`'s canonical edge list over vertex tuple
    /// `verts`, bit `i` set iff `edge_verts[i]` is marked.
    pub fn edge_code(&self, edge_verts: &[[usize; 2]], verts: &[EHandle]) -> u32 {
        let mut code = 0u32;
        for (i, &[a, b]) in edge_verts.iter().enumerate() {
            if self.is_marked(verts[a], verts[b]) {
                code |= 1 << i;
            }
        }
        code
    }
}

/// Looks up `store`'s endpoints for `a`/`b` and computes the spatial
/// placement of a split at parameter `t` (linear interpolation; periodic
/// parametric interpolation across a model seam is the caller's
/// responsibility per spec §9, not this registry's).
pub fn lerp_point(store: &MeshStore, a: EHandle, b: EHandle, t: f64) -> meshkernel_base::Vector3 {
    let pa = store.get_point(a).expect("endpoint exists");
    let pb = store.get_point(b).expect("endpoint exists");
    pa * (1.0 - t) + pb * t
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(i: u32) -> EHandle { Handle::new(EntityKind::Vertex, i, 0) }

    #[test]
    fn placement_parameter_flips_with_query_direction() {
        let mut reg = SplitRegistry::new();
        let (a, b, m) = (h(0), h(1), h(2));
        reg.place_split(a, b, 0.25, m);
        assert_eq!(reg.find_placed_split_vert(a, b), Some((m, 0.25)));
        assert_eq!(reg.find_placed_split_vert(b, a), Some((m, 0.75)));
    }

    #[test]
    fn empty_registry_reports_empty() {
        let reg = SplitRegistry::new();
        assert!(reg.is_empty());
    }

    #[test]
    fn edge_code_packs_marked_edges_into_bits() {
        let mut reg = SplitRegistry::new();
        let verts = [h(0), h(1), h(2)];
        reg.place_split(verts[0], verts[1], 0.5, h(9));
        let code = reg.edge_code(&[[0, 1], [1, 2], [2, 0]], &verts);
        assert_eq!(code, 0b001);
    }
}
