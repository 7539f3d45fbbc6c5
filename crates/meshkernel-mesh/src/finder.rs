//! Bottom-up element lookup by vertex tuple, and `make_or_find`, the
//! recursive existence-or-create predicate the refinement driver's
//! templates build every new entity through. Grounded on
//! `examples/original_source/apf/apfMesh.cc`'s `findUpward`, `runEdgeDown`
//! / `runTriDown` / `runQuadDown` / `runTetDown` / `runPrismDown` /
//! `runPyramidDown`, `sameContent`, and `findIn`.

use crate::error::MeshResult;
use crate::model::ModelClass;
use crate::store::MeshStore;
use meshkernel_base::Handle;
use meshkernel_topology::{
    EntityKind, PRISM_QUAD_VERTS, PRISM_TRI_VERTS, PYRAMID_TRI_VERTS, QUAD_EDGE_VERTS,
    TET_TRI_VERTS, TRI_EDGE_VERTS,
};

type EHandle = Handle<EntityKind>;

/// The canonical decomposition of `kind` into its `dim(kind)-1` sub-entity
/// kinds and the index-into-`vertices` tuple each one is built from, in
/// canonical order. `None` for `Vertex` (no sub-entities) and `Edge`
/// (whose "sub-entities" are its two vertices directly, handled as the
/// recursion's base case rather than through this table).
fn sub_tuples(kind: EntityKind) -> &'static [(EntityKind, &'static [usize])] {
    match kind {
        EntityKind::Vertex | EntityKind::Edge => &[],
        EntityKind::Triangle => &[
            (EntityKind::Edge, &TRI_EDGE_VERTS[0]),
            (EntityKind::Edge, &TRI_EDGE_VERTS[1]),
            (EntityKind::Edge, &TRI_EDGE_VERTS[2]),
        ],
        EntityKind::Quad => &[
            (EntityKind::Edge, &QUAD_EDGE_VERTS[0]),
            (EntityKind::Edge, &QUAD_EDGE_VERTS[1]),
            (EntityKind::Edge, &QUAD_EDGE_VERTS[2]),
            (EntityKind::Edge, &QUAD_EDGE_VERTS[3]),
        ],
        EntityKind::Tet => &[
            (EntityKind::Triangle, &TET_TRI_VERTS[0]),
            (EntityKind::Triangle, &TET_TRI_VERTS[1]),
            (EntityKind::Triangle, &TET_TRI_VERTS[2]),
            (EntityKind::Triangle, &TET_TRI_VERTS[3]),
        ],
        EntityKind::Prism => &[
            (EntityKind::Triangle, &PRISM_TRI_VERTS[0]),
            (EntityKind::Triangle, &PRISM_TRI_VERTS[1]),
            (EntityKind::Quad, &PRISM_QUAD_VERTS[0]),
            (EntityKind::Quad, &PRISM_QUAD_VERTS[1]),
            (EntityKind::Quad, &PRISM_QUAD_VERTS[2]),
        ],
        EntityKind::Pyramid => &[
            (EntityKind::Quad, &[0, 1, 2, 3]),
            (EntityKind::Triangle, &PYRAMID_TRI_VERTS[0]),
            (EntityKind::Triangle, &PYRAMID_TRI_VERTS[1]),
            (EntityKind::Triangle, &PYRAMID_TRI_VERTS[2]),
            (EntityKind::Triangle, &PYRAMID_TRI_VERTS[3]),
        ],
        EntityKind::Hex => &[],
    }
}

/// `true` iff `a` and `b` name the same set of handles, ignoring order
/// (`apf`'s `sameContent`).
fn same_content(a: &[EHandle], b: &[EHandle]) -> bool {
    a.len() == b.len() && a.iter().all(|x| b.contains(x))
}

/// Finds the unique entity of kind `kind` whose vertex closure is exactly
/// `verts` (in the order `verts` names them; a kind's vertex closure has
/// no ambiguity once treated as a set per invariant 3). Returns `Ok(None)`
/// if no such entity exists yet.
///
/// For `Edge`, intersects the upward bags of `verts[0]` and `verts[1]`
/// restricted to edges. For higher kinds, recursively finds (or fails to
/// find) each canonical sub-entity from its vertex sub-tuple, then scans
/// the upward bag of the first sub-entity for a `kind` entity whose
/// downward set equals the synthesised sub-entities.
pub fn find_element(store: &MeshStore, kind: EntityKind, verts: &[EHandle]) -> MeshResult<Option<EHandle>> {
    match kind {
        EntityKind::Vertex => Ok(Some(verts[0])),
        EntityKind::Edge => {
            for &cand in store.get_upward(verts[0])? {
                if cand.kind() != EntityKind::Edge {
                    continue;
                }
                let down = store.get_downward(cand)?;
                if same_content(down, &[verts[0], verts[1]]) {
                    return Ok(Some(cand));
                }
            }
            Ok(None)
        }
        _ => {
            let mut subs = Vec::with_capacity(sub_tuples(kind).len());
            for &(sub_kind, idxs) in sub_tuples(kind) {
                let sub_verts: Vec<EHandle> = idxs.iter().map(|&i| verts[i]).collect();
                match find_element(store, sub_kind, &sub_verts)? {
                    Some(h) => subs.push(h),
                    None => return Ok(None),
                }
            }
            for &cand in store.get_upward(subs[0])? {
                if cand.kind() != kind {
                    continue;
                }
                let down = store.get_downward(cand)?;
                if same_content(down, &subs) {
                    return Ok(Some(cand));
                }
            }
            Ok(None)
        }
    }
}

/// Ensures an entity of kind `kind` with vertex closure `verts` exists,
/// classified on `model` if it must be created, recursively creating any
/// missing sub-entities (classified on `model` too — a sub-face or
/// sub-edge interior to a classified region inherits the region's
/// classification unless the caller later reclassifies it onto a more
/// specific model entity, e.g. a boundary face). Returns the existing or
/// newly built entity's handle.
///
/// `Edge` is the recursion's base case: if no edge with `verts` exists,
/// one is created directly from the two vertices. For higher kinds, every
/// sub-entity is resolved via `make_or_find` first so that `create_element`
/// always receives already-existing downward handles.
pub fn make_or_find(
    store: &mut MeshStore,
    kind: EntityKind,
    model: Option<ModelClass>,
    verts: &[EHandle],
) -> MeshResult<EHandle> {
    if let Some(h) = find_element(store, kind, verts)? {
        return Ok(h);
    }
    match kind {
        EntityKind::Vertex => Ok(verts[0]),
        EntityKind::Edge => store.create_element(EntityKind::Edge, model, &[verts[0], verts[1]], verts),
        _ => {
            let mut downward = Vec::with_capacity(sub_tuples(kind).len());
            for &(sub_kind, idxs) in sub_tuples(kind) {
                let sub_verts: Vec<EHandle> = idxs.iter().map(|&i| verts[i]).collect();
                downward.push(make_or_find(store, sub_kind, model, &sub_verts)?);
            }
            store.create_element(kind, model, &downward, verts)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MeshStore;
    use meshkernel_base::{Vector2, Vector3};

    fn tet_store() -> (MeshStore, [EHandle; 4]) {
        let mut store = MeshStore::new();
        let zero2 = Vector2::new(0.0, 0.0);
        let v0 = store.create_vertex(None, Vector3::new(0.0, 0.0, 0.0), zero2);
        let v1 = store.create_vertex(None, Vector3::new(1.0, 0.0, 0.0), zero2);
        let v2 = store.create_vertex(None, Vector3::new(0.0, 1.0, 0.0), zero2);
        let v3 = store.create_vertex(None, Vector3::new(0.0, 0.0, 1.0), zero2);
        (store, [v0, v1, v2, v3])
    }

    #[test]
    fn make_or_find_builds_full_closure_once() {
        let (mut store, verts) = tet_store();
        let tet = make_or_find(&mut store, EntityKind::Tet, None, &verts).unwrap();
        assert_eq!(store.get_type(tet).unwrap(), EntityKind::Tet);
        assert_eq!(store.iter_dim(1).count(), 6);
        assert_eq!(store.iter_dim(2).count(), 4);
        assert_eq!(store.iter_dim(3).count(), 1);
        store.check_invariants().unwrap();
    }

    #[test]
    fn make_or_find_is_idempotent_and_reuses_shared_faces() {
        let (mut store, verts) = tet_store();
        let tet = make_or_find(&mut store, EntityKind::Tet, None, &verts).unwrap();
        let again = make_or_find(&mut store, EntityKind::Tet, None, &verts).unwrap();
        assert_eq!(tet, again);

        let tri = find_element(&store, EntityKind::Triangle, &[verts[0], verts[1], verts[2]])
            .unwrap()
            .unwrap();
        let refound = make_or_find(&mut store, EntityKind::Triangle, None, &[verts[0], verts[1], verts[2]]).unwrap();
        assert_eq!(tri, refound);
    }

    #[test]
    fn find_element_returns_none_before_creation() {
        let (store, verts) = tet_store();
        assert_eq!(find_element(&store, EntityKind::Tet, &verts).unwrap(), None);
    }
}
