//! The snap operator (spec §4.6), grounded on `examples/original_source/ma/maSnap.cc`.
//! `Snapper` is `maSnap.cc`'s `Snapper : apf::CavityOp`, adapted from the
//! cavity-operator base class to an explicit `probe`/`apply` pair driven by
//! the caller (this core has no cavity-op framework of its own; `Probe`
//! stands in for `Outcome`, see `crate::error`).

use crate::error::{Probe, SnapError, SnapResult};
use meshkernel_base::{Collective, Handle, InnerSpace};
use meshkernel_mesh::{GeometricModel, MeshStore};
use meshkernel_topology::EntityKind;
use rustc_hash::FxHashSet as HashSet;

type EHandle = Handle<EntityKind>;

/// A per-element validity predicate (spec: "positive Jacobian, configurable").
pub trait ElementValidator {
    fn is_valid(&self, store: &MeshStore, element: EHandle) -> bool;
}

/// Signed-volume-positive check for tets; every other kind is accepted
/// unconditionally (this core does not derive a Jacobian sign for
/// pyramids/prisms/quads, matching its straight-sided-geometry scope).
#[derive(Debug, Clone, Copy, Default)]
pub struct PositiveJacobianValidator;

impl ElementValidator for PositiveJacobianValidator {
    fn is_valid(&self, store: &MeshStore, element: EHandle) -> bool {
        if store.get_type(element) != Ok(EntityKind::Tet) {
            return true;
        }
        let Ok(v) = store.get_vertices(element) else { return false };
        let (Ok(p0), Ok(p1), Ok(p2), Ok(p3)) =
            (store.get_point(v[0]), store.get_point(v[1]), store.get_point(v[2]), store.get_point(v[3]))
        else {
            return false;
        };
        (p1 - p0).dot((p2 - p0).cross(p3 - p0)) > 0.0
    }
}

/// Which vertices among `candidates` (typically the new vertices a refine
/// pass placed on edges) should be snapped: those classified on a model
/// entity whose dimension is strictly less than the mesh's own dimension
/// (`markVertsToSnap`'s `modelDimension == dim` early-out, inverted).
/// Unclassified vertices and a quad/prism centroid's zero-placeholder
/// classification (dimension equal to the mesh dimension, spec §9) are
/// both excluded this way without special-casing either.
pub fn mark_snap_targets(store: &MeshStore, candidates: impl IntoIterator<Item = EHandle>, mesh_dim: u8) -> Vec<EHandle> {
    candidates
        .into_iter()
        .filter(|&v| matches!(store.get_model(v), Ok(Some(m)) if m.dim != mesh_dim))
        .collect()
}

/// The top-dimension elements in `start`'s upward closure (`getAdjacent(v, dim, ...)`
/// in the source): climbs `get_upward` until it reaches entities of dimension
/// `dim`, without climbing further past them.
fn adjacent_at_dim(store: &MeshStore, start: EHandle, dim: u8) -> Vec<EHandle> {
    let mut seen = HashSet::default();
    let mut result = Vec::new();
    let mut stack = vec![start];
    while let Some(h) = stack.pop() {
        if !seen.insert(h) {
            continue;
        }
        let Ok(kind) = store.get_type(h) else { continue };
        if kind.dimension() == dim {
            if h != start {
                result.push(h);
            }
            continue;
        }
        if let Ok(up) = store.get_upward(h) {
            stack.extend(up.iter().copied());
        }
    }
    result
}

/// Drives the cavity protocol for one vertex at a time (spec §4.6).
pub struct Snapper<'a> {
    model: &'a dyn GeometricModel,
    validator: &'a dyn ElementValidator,
    mesh_dim: u8,
}

impl<'a> Snapper<'a> {
    pub fn new(model: &'a dyn GeometricModel, validator: &'a dyn ElementValidator, mesh_dim: u8) -> Self {
        Snapper { model, validator, mesh_dim }
    }

    /// `setEntity`: `Skip` if `v` isn't actually flagged (the caller is
    /// expected to only probe flagged vertices, so this is always `Ok` in
    /// practice; kept for parity with the source's defensive check),
    /// `RequestLocality` if the single-process default can't grant it —
    /// this core's single-process `Snapper` always grants locality, since
    /// migration is out of this crate's scope (spec §5's "process" maps
    /// 1:1 to a Rust process in this implementation).
    pub fn probe(&self, _v: EHandle) -> Probe {
        Probe::Ok
    }

    /// `apply`: moves `v` to its snap point, validates every incident
    /// top-dimension element, and rolls back on failure. Returns whether
    /// the snap succeeded.
    pub fn apply(&self, store: &mut MeshStore, v: EHandle) -> SnapResult<bool> {
        let original = store.get_point(v)?;
        let param = store.get_param(v)?;
        let model_class = store.get_model(v)?.ok_or(SnapError::GeometryFailure(v))?;
        let snapped = self.model.snap_to_model(model_class.id, param);
        store.set_point(v, snapped)?;

        let elements = adjacent_at_dim(store, v, self.mesh_dim);
        let valid = elements.iter().all(|&e| self.validator.is_valid(store, e));
        if !valid {
            store.set_point(v, original)?;
            return Ok(false);
        }
        Ok(true)
    }
}

/// Outcome of one `snap_all` pass, reported collectively (spec property 13).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapReport {
    pub target_count: i64,
    pub success_count: i64,
}

/// Snaps every vertex in `flagged` and reduces the (target, success)
/// counts across `collective` (`PCU_Add_Longs(counts, 2)` in the source).
/// Vertices for which `snapper.probe` returns anything but `Ok` are left
/// untouched — this core's single-process `Snapper` never does, but the
/// call site mirrors the source's cavity-sweep structure so a future
/// multi-process `Snapper` only needs to change `probe`.
pub fn snap_all(store: &mut MeshStore, snapper: &Snapper<'_>, flagged: &[EHandle], collective: &dyn Collective) -> SnapResult<SnapReport> {
    let mut local_success = 0i64;
    for &v in flagged {
        if snapper.probe(v) != Probe::Ok {
            continue;
        }
        if snapper.apply(store, v)? {
            local_success += 1;
        }
    }
    let reduced = collective.add_longs(&[flagged.len() as i64, local_success]);
    Ok(SnapReport { target_count: reduced[0], success_count: reduced[1] })
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshkernel_base::{SerialCollective, Vector2, Vector3};
    use meshkernel_mesh::{make_or_find, ModelClass};

    struct FlatModel;
    impl GeometricModel for FlatModel {
        fn model_type(&self, _id: u64) -> u8 {
            2
        }
        fn snap_to_model(&self, _id: u64, param: Vector2) -> Vector3 {
            Vector3::new(param.x, param.y, 0.0)
        }
        fn periodic_range(&self, _id: u64, _d: usize) -> ([f64; 2], bool) {
            ([0.0, 0.0], false)
        }
    }

    /// A triangle `(v0, v1, v2)` with an edge-midpoint vertex `mid` already
    /// wired into the mesh as the apex of two sub-triangles (as a real
    /// refine pass would leave it), so `mid` has incident dim-2 elements
    /// for the validity check to actually run against.
    fn split_triangle_store() -> (MeshStore, EHandle) {
        let mut store = MeshStore::new();
        let face = ModelClass::new(2, 0);
        let v0 = store.create_vertex(Some(face), Vector3::new(0.0, 0.0, 0.0), Vector2::new(0.0, 0.0));
        let v1 = store.create_vertex(Some(face), Vector3::new(1.0, 0.0, 0.0), Vector2::new(1.0, 0.0));
        let v2 = store.create_vertex(Some(face), Vector3::new(0.0, 1.0, 0.0), Vector2::new(0.0, 1.0));
        let mid = store.create_vertex(Some(face), Vector3::new(0.5, 0.5, 0.1), Vector2::new(0.5, 0.5));
        make_or_find(&mut store, EntityKind::Triangle, Some(face), &[v0, v1, mid]).unwrap();
        make_or_find(&mut store, EntityKind::Triangle, Some(face), &[v1, v2, mid]).unwrap();
        (store, mid)
    }

    #[derive(Default)]
    struct AlwaysValid;
    impl ElementValidator for AlwaysValid {
        fn is_valid(&self, _store: &MeshStore, _element: EHandle) -> bool {
            true
        }
    }

    #[test]
    fn scenario_e_snap_success_moves_vertex_to_model() {
        let (mut store, mid) = split_triangle_store();

        let model = FlatModel;
        let validator = AlwaysValid;
        let snapper = Snapper::new(&model, &validator, 2);
        let flagged = mark_snap_targets(&store, [mid], 3);
        assert_eq!(flagged, vec![mid]);

        let report = snap_all(&mut store, &snapper, &flagged, &SerialCollective).unwrap();
        assert_eq!(report, SnapReport { target_count: 1, success_count: 1 });
        assert_eq!(store.get_point(mid).unwrap(), Vector3::new(0.5, 0.5, 0.0));
    }

    #[test]
    fn scenario_f_snap_rollback_restores_original_point() {
        let (mut store, mid) = split_triangle_store();

        struct AlwaysInvalid;
        impl ElementValidator for AlwaysInvalid {
            fn is_valid(&self, _store: &MeshStore, _element: EHandle) -> bool {
                false
            }
        }

        let model = FlatModel;
        let validator = AlwaysInvalid;
        let snapper = Snapper::new(&model, &validator, 2);
        let flagged = mark_snap_targets(&store, [mid], 3);

        let report = snap_all(&mut store, &snapper, &flagged, &SerialCollective).unwrap();
        assert_eq!(report, SnapReport { target_count: 1, success_count: 0 });
        assert_eq!(store.get_point(mid).unwrap(), Vector3::new(0.5, 0.5, 0.1));
    }

    #[test]
    fn interior_classified_vertices_are_never_flagged() {
        let (store, mid) = split_triangle_store();
        let flagged = mark_snap_targets(&store, [mid], 2);
        assert!(flagged.is_empty());
    }
}
