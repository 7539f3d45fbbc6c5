//! Volume-conservation properties driven over randomised inputs rather
//! than one fixed case, the same role `meshkernel-topology`'s own
//! `tests/rotation_properties.rs` plays for its rotation tables.

use meshkernel_base::{prop_assert_near, Handle, InnerSpace, Vector2, Vector3};
use meshkernel_mesh::{make_or_find, MeshStore};
use meshkernel_refine::{refine, SplitRegistry};
use meshkernel_topology::EntityKind;
use proptest::prelude::*;

type EHandle = Handle<EntityKind>;

fn tet_volume(store: &MeshStore, v: &[EHandle]) -> f64 {
    let p: Vec<Vector3> = v.iter().map(|&h| store.get_point(h).unwrap()).collect();
    let a = p[1] - p[0];
    let b = p[2] - p[0];
    let c = p[3] - p[0];
    (a.dot(b.cross(c))).abs() / 6.0
}

proptest! {
    /// Splitting one edge at any interior placement `t`, of any
    /// non-degenerate tet shape, always yields two tets whose combined
    /// volume equals the parent's — the corner-tuple wiring `splitTet_1`
    /// does is placement- and shape-independent.
    #[test]
    fn single_edge_split_conserves_volume_for_any_placement_and_shape(
        t in 0.01f64..0.99,
        dx in -0.3f64..0.3,
        dy in -0.3f64..0.3,
        dz in 0.4f64..1.6,
    ) {
        let mut store = MeshStore::new();
        let zero2 = Vector2::new(0.0, 0.0);
        let v0 = store.create_vertex(None, Vector3::new(0.0, 0.0, 0.0), zero2);
        let v1 = store.create_vertex(None, Vector3::new(1.0, 0.0, 0.0), zero2);
        let v2 = store.create_vertex(None, Vector3::new(0.0, 1.0, 0.0), zero2);
        // Perturbing only the apex within these ranges keeps the tet
        // non-degenerate (never coplanar with the base).
        let v3 = store.create_vertex(None, Vector3::new(dx, dy, dz), zero2);
        let v = [v0, v1, v2, v3];
        let tet = make_or_find(&mut store, EntityKind::Tet, None, &v).unwrap();
        let expected = tet_volume(&store, &v);

        let mid_point = store.get_point(v0).unwrap() * (1.0 - t) + store.get_point(v1).unwrap() * t;
        let mid = store.create_vertex(None, mid_point, zero2);
        let mut splits = SplitRegistry::new();
        splits.place_split(v0, v1, t, mid);

        let report = refine(&mut store, &splits, [tet], None).unwrap();
        prop_assert_eq!(report.refined.len(), 1);
        let children = &report.refined[0].children;
        prop_assert_eq!(children.len(), 2);

        let total: f64 = children.iter().map(|&c| tet_volume(&store, store.get_vertices(c).unwrap())).sum();
        prop_assert_near!(total, expected);
    }
}
