//! The in-memory mesh database: one arena per [`EntityKind`], downward and
//! upward adjacency, coordinate/parametric storage for vertices, the tag
//! store, and remote-copy/match bookkeeping. Grounded on
//! `apf::Mesh2`'s API surface (`getDownward`/`getUp`/`getPoint`/`getParam`,
//! `Copies`/`Matches`) and on the teacher's `truck-topology` naming
//! conventions for point/param accessors.

use crate::arena::Arena;
use crate::error::{MeshError, MeshResult};
use crate::model::ModelClass;
use crate::tags::{TagKind, TagStore, TagValue};
use meshkernel_base::{Handle, Vector2, Vector3};
use meshkernel_topology::{EntityKind, TYPES};
#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;
use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};
use smallvec::SmallVec;

type EHandle = Handle<EntityKind>;
type HandleVec = SmallVec<[EHandle; 8]>;

/// One entity: identity is the arena slot it lives in (its [`Handle`]).
#[derive(Debug, Clone)]
struct Entity {
    model: Option<ModelClass>,
    /// The entity's canonical vertex tuple (dimension 0 closure), in the
    /// order [`meshkernel_topology`]'s tables name. Cached at creation
    /// time rather than re-synthesised from `downward` on every query,
    /// since templates and the element finder both key off it directly.
    vertices: HandleVec,
    /// Entities of dimension `dim(kind) - 1` this entity is built from, in
    /// canonical order (see `TOPO` sub-tuple tables). Empty for vertices.
    downward: HandleVec,
    /// Entities this one is a downward neighbour of. Order is irrelevant
    /// per spec §3 ("upward-adjacency bag").
    upward: HandleVec,
    /// Part-id -> remote handle, for remote copies of this entity.
    remotes: HashMap<usize, EHandle>,
    /// Part-id -> remote handle, for periodic/non-conforming matches.
    matches: HashMap<usize, EHandle>,
    /// Spatial coordinate; only ever `Some` for `EntityKind::Vertex`.
    point: Option<Vector3>,
    /// Parametric coordinate on the classified model entity; only ever
    /// `Some` for `EntityKind::Vertex`.
    param: Option<Vector2>,
}

/// The process-local mesh database. One `MeshStore` holds exactly one
/// part's entities plus its remote-copy table; partitioning and migration
/// are driven from `meshkernel-refine`.
pub struct MeshStore {
    arenas: [Arena<Entity>; TYPES],
    tags: TagStore,
}

impl Default for MeshStore {
    fn default() -> Self {
        MeshStore { arenas: std::array::from_fn(|_| Arena::new()), tags: TagStore::new() }
    }
}

impl std::fmt::Debug for MeshStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeshStore")
            .field("counts", &EntityKind::ALL.map(|k| self.arenas[k as usize].len()))
            .finish()
    }
}

impl MeshStore {
    /// An empty mesh store with no tags.
    pub fn new() -> Self {
        MeshStore { arenas: Default::default(), tags: TagStore::new() }
    }

    fn arena(&self, kind: EntityKind) -> &Arena<Entity> { &self.arenas[kind as usize] }
    fn arena_mut(&mut self, kind: EntityKind) -> &mut Arena<Entity> { &mut self.arenas[kind as usize] }

    fn entity(&self, h: EHandle) -> MeshResult<&Entity> {
        self.arena(h.kind()).get(h.index(), h.generation()).ok_or(MeshError::InvalidHandle(h))
    }

    fn entity_mut(&mut self, h: EHandle) -> MeshResult<&mut Entity> {
        self.arena_mut(h.kind()).get_mut(h.index(), h.generation()).ok_or(MeshError::InvalidHandle(h))
    }

    /// Non-restartable cursor over every entity of topological dimension
    /// `dim` (0..=3), across every kind sharing that dimension (e.g. both
    /// `Triangle` and `Quad` at `dim == 2`). Order is stable within one
    /// cursor but not specified across mutations.
    pub fn iter_dim(&self, dim: u8) -> impl Iterator<Item = EHandle> + '_ {
        EntityKind::ALL.into_iter().filter(move |k| k.dimension() == dim).flat_map(move |k| {
            self.arena(k).iter().map(move |(index, generation, _)| Handle::new(k, index, generation))
        })
    }

    /// The `dim(kind) - 1` sub-entities this entity was built from, in
    /// canonical order.
    pub fn get_downward(&self, h: EHandle) -> MeshResult<&[EHandle]> {
        Ok(&self.entity(h)?.downward)
    }

    /// This entity's cached vertex-tuple closure, in canonical order.
    pub fn get_vertices(&self, h: EHandle) -> MeshResult<&[EHandle]> {
        Ok(&self.entity(h)?.vertices)
    }

    /// The bag of entities this one is a downward neighbour of.
    pub fn get_upward(&self, h: EHandle) -> MeshResult<&[EHandle]> {
        Ok(&self.entity(h)?.upward)
    }

    /// `h`'s kind, or `InvalidHandle` if `h` is stale.
    pub fn get_type(&self, h: EHandle) -> MeshResult<EntityKind> {
        let _ = self.entity(h)?;
        Ok(h.kind())
    }

    /// `h`'s geometric-model classification, if any.
    pub fn get_model(&self, h: EHandle) -> MeshResult<Option<ModelClass>> {
        Ok(self.entity(h)?.model)
    }

    /// Sets `h`'s geometric-model classification.
    pub fn set_model(&mut self, h: EHandle, model: Option<ModelClass>) -> MeshResult<()> {
        self.entity_mut(h)?.model = model;
        Ok(())
    }

    /// `h`'s spatial coordinate. `InvalidHandle` if `h` is not a vertex or
    /// is stale.
    pub fn get_point(&self, h: EHandle) -> MeshResult<Vector3> {
        self.entity(h)?.point.ok_or(MeshError::InvalidHandle(h))
    }

    /// Sets `h`'s spatial coordinate.
    pub fn set_point(&mut self, h: EHandle, point: Vector3) -> MeshResult<()> {
        let e = self.entity_mut(h)?;
        if e.point.is_none() {
            return Err(MeshError::InvalidHandle(h));
        }
        e.point = Some(point);
        Ok(())
    }

    /// `h`'s parametric coordinate on its classified model entity.
    pub fn get_param(&self, h: EHandle) -> MeshResult<Vector2> {
        self.entity(h)?.param.ok_or(MeshError::InvalidHandle(h))
    }

    /// Sets `h`'s parametric coordinate.
    pub fn set_param(&mut self, h: EHandle, param: Vector2) -> MeshResult<()> {
        let e = self.entity_mut(h)?;
        if e.param.is_none() {
            return Err(MeshError::InvalidHandle(h));
        }
        e.param = Some(param);
        Ok(())
    }

    /// Creates a new vertex, classified on `model`, at `point` with
    /// parametric coordinate `param` (meaningless/zero when unclassified).
    pub fn create_vertex(&mut self, model: Option<ModelClass>, point: Vector3, param: Vector2) -> EHandle {
        let entity = Entity {
            model,
            vertices: HandleVec::new(),
            downward: HandleVec::new(),
            upward: HandleVec::new(),
            remotes: HashMap::default(),
            matches: HashMap::default(),
            point: Some(point),
            param: Some(param),
        };
        let (index, generation) = self.arena_mut(EntityKind::Vertex).insert(entity);
        let h = Handle::new(EntityKind::Vertex, index, generation);
        self.entity_mut(h).expect("just inserted").vertices.push(h);
        h
    }

    /// Creates a new `kind` element classified on `model`, built from
    /// `downward` (its `dim(kind)-1` sub-entities, canonically ordered)
    /// and `vertices` (its dimension-0 closure, canonically ordered).
    /// Atomically registers `downward`'s upward pointers. Does not check
    /// for an existing entity with the same vertex closure — that is
    /// `meshkernel_mesh::finder`'s `make_or_find`'s job, to keep invariant
    /// 3 (uniqueness by vertex set) a caller contract rather than a store
    /// invariant enforced on every insert (mirroring `apf`'s own
    /// `buildElement`, which likewise trusts its caller).
    pub fn create_element(
        &mut self,
        kind: EntityKind,
        model: Option<ModelClass>,
        downward: &[EHandle],
        vertices: &[EHandle],
    ) -> MeshResult<EHandle> {
        for &d in downward {
            self.entity(d)?;
        }
        let entity = Entity {
            model,
            vertices: vertices.iter().copied().collect(),
            downward: downward.iter().copied().collect(),
            upward: HandleVec::new(),
            remotes: HashMap::default(),
            matches: HashMap::default(),
            point: None,
            param: None,
        };
        let (index, generation) = self.arena_mut(kind).insert(entity);
        let h = Handle::new(kind, index, generation);
        for &d in downward {
            self.entity_mut(d)?.upward.push(h);
        }
        Ok(h)
    }

    /// Removes `h`. Fails with `StillReferenced` if its upward bag is
    /// non-empty (invariant 1's contrapositive: an entity with upward
    /// references must keep existing). Strips `h`'s downward neighbours'
    /// upward pointers back to it, and all of `h`'s tag attachments.
    pub fn remove(&mut self, h: EHandle) -> MeshResult<()> {
        let entity = self.entity(h)?;
        if !entity.upward.is_empty() {
            return Err(MeshError::StillReferenced(h));
        }
        let downward: HandleVec = entity.downward.clone();
        for d in downward {
            if let Ok(parent) = self.entity_mut(d) {
                parent.upward.retain(|&u| u != h);
            }
        }
        self.tags.strip_all(h);
        self.arena_mut(h.kind())
            .remove(h.index(), h.generation())
            .map(|_| ())
            .ok_or(MeshError::InvalidHandle(h))
    }

    /// Removes every entity of dimension `dim`, bottom of the upward
    /// closure first is the caller's responsibility — entities with
    /// non-empty upward bags are skipped rather than force-removed, and
    /// their handles are returned so the caller can retry top-down.
    pub fn remove_dim(&mut self, dim: u8) -> Vec<EHandle> {
        let handles: Vec<EHandle> = self.iter_dim(dim).collect();
        let mut remaining = Vec::new();
        for h in handles {
            if self.remove(h).is_err() {
                remaining.push(h);
            }
        }
        remaining
    }

    // -- tag delegation --------------------------------------------------

    pub fn create_tag(&mut self, name: &str, kind: TagKind) -> MeshResult<()> { self.tags.create_tag(name, kind) }
    pub fn destroy_tag(&mut self, name: &str) -> MeshResult<()> { self.tags.destroy_tag(name) }
    pub fn has_tag(&self, name: &str, h: EHandle) -> bool { self.tags.has_tag(name, h) }
    pub fn set_tag_int(&mut self, name: &str, h: EHandle, v: i64) -> MeshResult<()> { self.tags.set_int(name, h, v) }
    pub fn set_tag_double(&mut self, name: &str, h: EHandle, v: f64) -> MeshResult<()> { self.tags.set_double(name, h, v) }
    pub fn get_tag(&self, name: &str, h: EHandle) -> MeshResult<TagValue> { self.tags.get(name, h) }
    pub fn remove_tag(&mut self, name: &str, h: EHandle) -> MeshResult<()> { self.tags.remove_tag(name, h) }

    // -- remote copies / matches ------------------------------------------

    /// `h`'s remote-copy table (part-id -> remote handle), empty for a
    /// purely local entity.
    pub fn get_remotes(&self, h: EHandle) -> MeshResult<&HashMap<usize, EHandle>> {
        Ok(&self.entity(h)?.remotes)
    }

    /// Replaces `h`'s remote-copy table wholesale.
    pub fn set_remotes(&mut self, h: EHandle, remotes: HashMap<usize, EHandle>) -> MeshResult<()> {
        self.entity_mut(h)?.remotes = remotes;
        Ok(())
    }

    /// Overwrites a single entry of `h`'s remote-copy table (used by
    /// Parallel Glue's post-reorder update, which only ever updates one
    /// peer's entry at a time, never the whole table).
    pub fn set_remote(&mut self, h: EHandle, part: usize, remote: EHandle) -> MeshResult<()> {
        self.entity_mut(h)?.remotes.insert(part, remote);
        Ok(())
    }

    /// `true` iff `h` has at least one remote copy.
    pub fn is_shared(&self, h: EHandle) -> MeshResult<bool> {
        Ok(!self.entity(h)?.remotes.is_empty())
    }

    /// `true` iff `h` is the *original* copy of its equivalence class: the
    /// minimum part-id among `h` and its remotes, with `h`'s own handle
    /// index breaking ties against another copy on this same part.
    pub fn is_owned(&self, h: EHandle, this_part: usize) -> MeshResult<bool> {
        let entity = self.entity(h)?;
        for (&part, &remote) in entity.remotes.iter() {
            if part < this_part {
                return Ok(false);
            }
            if part == this_part && remote.index() < h.index() {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// `h`'s periodic-match table (part-id -> matched handle).
    pub fn get_matches(&self, h: EHandle) -> MeshResult<&HashMap<usize, EHandle>> {
        Ok(&self.entity(h)?.matches)
    }

    /// Replaces `h`'s periodic-match table wholesale.
    pub fn set_matches(&mut self, h: EHandle, matches: HashMap<usize, EHandle>) -> MeshResult<()> {
        self.entity_mut(h)?.matches = matches;
        Ok(())
    }

    /// Checks universal invariant 1 (downward closure: every downward
    /// entity exists with dimension exactly `dim(E)-1`) and invariant 2
    /// (upward consistency: `E` appears in each downward neighbour's
    /// upward bag exactly once). Intended for tests and debug assertions,
    /// not the hot mutation path.
    pub fn check_invariants(&self) -> MeshResult<()> {
        #[cfg(not(target_arch = "wasm32"))]
        {
            EntityKind::ALL.par_iter().try_for_each(|&kind| self.check_invariants_kind(kind))
        }
        #[cfg(target_arch = "wasm32")]
        {
            EntityKind::ALL.iter().try_for_each(|&kind| self.check_invariants_kind(kind))
        }
    }

    /// Checks universal invariant 2 for every entity of one `kind`: each
    /// downward neighbour is one dimension lower and lists this entity in
    /// its upward bag exactly once. Split out from [`Self::check_invariants`]
    /// so the per-kind arenas (read-only, independent of one another) can be
    /// checked concurrently across a large mesh rather than walked serially.
    fn check_invariants_kind(&self, kind: EntityKind) -> MeshResult<()> {
        for (index, generation, entity) in self.arena(kind).iter() {
            let h = Handle::new(kind, index, generation);
            for &d in &entity.downward {
                let down_entity = self.entity(d)?;
                if d.kind().dimension() + 1 != kind.dimension() {
                    return Err(MeshError::InvalidHandle(d));
                }
                let count = down_entity.upward.iter().filter(|&&u| u == h).count();
                if count != 1 {
                    return Err(MeshError::InvalidHandle(h));
                }
            }
        }
        Ok(())
    }

    /// Checks universal invariant 3 (uniqueness by vertex set) for one
    /// `kind`: no two distinct entities of that kind share the same
    /// (unordered) vertex closure.
    pub fn check_uniqueness(&self, kind: EntityKind) -> bool {
        let mut seen: HashSet<Vec<EHandle>> = HashSet::default();
        for (_, _, entity) in self.arena(kind).iter() {
            let mut key: Vec<EHandle> = entity.vertices.to_vec();
            key.sort_unstable();
            if !seen.insert(key) {
                return false;
            }
        }
        true
    }

    /// Runs [`Self::check_uniqueness`] over every kind concurrently,
    /// returning the kinds (if any) that fail it.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn check_uniqueness_all(&self) -> Vec<EntityKind> {
        EntityKind::ALL.par_iter().copied().filter(|&kind| !self.check_uniqueness(kind)).collect()
    }

    /// Runs [`Self::check_uniqueness`] over every kind, returning the kinds
    /// (if any) that fail it.
    #[cfg(target_arch = "wasm32")]
    pub fn check_uniqueness_all(&self) -> Vec<EntityKind> {
        EntityKind::ALL.iter().copied().filter(|&kind| !self.check_uniqueness(kind)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshkernel_base::Vector2 as V2;

    fn pt(x: f64, y: f64, z: f64) -> Vector3 { Vector3::new(x, y, z) }
    fn zero2() -> V2 { V2::new(0.0, 0.0) }

    #[test]
    fn create_vertex_and_read_back() {
        let mut store = MeshStore::new();
        let v = store.create_vertex(None, pt(1.0, 2.0, 3.0), zero2());
        assert_eq!(store.get_point(v).unwrap(), pt(1.0, 2.0, 3.0));
        assert_eq!(store.get_type(v).unwrap(), EntityKind::Vertex);
        assert_eq!(store.get_vertices(v).unwrap(), &[v]);
    }

    #[test]
    fn create_edge_wires_upward() {
        let mut store = MeshStore::new();
        let a = store.create_vertex(None, pt(0.0, 0.0, 0.0), zero2());
        let b = store.create_vertex(None, pt(1.0, 0.0, 0.0), zero2());
        let e = store.create_element(EntityKind::Edge, None, &[a, b], &[a, b]).unwrap();
        assert_eq!(store.get_upward(a).unwrap(), &[e]);
        assert_eq!(store.get_upward(b).unwrap(), &[e]);
        assert_eq!(store.get_downward(e).unwrap(), &[a, b]);
    }

    #[test]
    fn remove_fails_while_referenced() {
        let mut store = MeshStore::new();
        let a = store.create_vertex(None, pt(0.0, 0.0, 0.0), zero2());
        let b = store.create_vertex(None, pt(1.0, 0.0, 0.0), zero2());
        let e = store.create_element(EntityKind::Edge, None, &[a, b], &[a, b]).unwrap();
        assert!(matches!(store.remove(a), Err(MeshError::StillReferenced(_))));
        store.remove(e).unwrap();
        store.remove(a).unwrap();
        assert!(matches!(store.get_point(a), Err(MeshError::InvalidHandle(_))));
    }

    #[test]
    fn stale_handle_after_reuse_is_rejected() {
        let mut store = MeshStore::new();
        let a = store.create_vertex(None, pt(0.0, 0.0, 0.0), zero2());
        store.remove(a).unwrap();
        let b = store.create_vertex(None, pt(9.0, 9.0, 9.0), zero2());
        assert_eq!(a.index(), b.index());
        assert!(store.get_point(a).is_err());
        assert_eq!(store.get_point(b).unwrap(), pt(9.0, 9.0, 9.0));
    }

    #[test]
    fn invariants_hold_after_edge_creation() {
        let mut store = MeshStore::new();
        let a = store.create_vertex(None, pt(0.0, 0.0, 0.0), zero2());
        let b = store.create_vertex(None, pt(1.0, 0.0, 0.0), zero2());
        store.create_element(EntityKind::Edge, None, &[a, b], &[a, b]).unwrap();
        store.check_invariants().unwrap();
        assert!(store.check_uniqueness(EntityKind::Edge));
    }

    #[test]
    fn ownership_breaks_ties_by_part_then_handle() {
        let mut store = MeshStore::new();
        let a = store.create_vertex(None, pt(0.0, 0.0, 0.0), zero2());
        assert!(store.is_owned(a, 2).unwrap());
        let mut remotes = HashMap::default();
        remotes.insert(1usize, Handle::new(EntityKind::Vertex, 5, 0));
        store.set_remotes(a, remotes).unwrap();
        assert!(!store.is_owned(a, 2).unwrap());
        assert!(store.is_shared(a).unwrap());
    }
}
