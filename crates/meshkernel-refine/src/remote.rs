//! Parallel Glue: remote-copy table reconciliation after a pass that
//! replaces entity handles (spec §4.7), e.g. a reordering/renumbering
//! pass or a bulk rebuild. Grounded on `examples/original_source/apf/apfMesh.cc`'s
//! `Copies` bookkeeping (the `remotes`/`set_remote` fields and methods this
//! module drives are `meshkernel-mesh::store`'s direct port of that table)
//! and on the messaging shape spec §6 describes for the collective layer
//! (`pack`/`send`/`listen`/`unpack`) without committing to a transport: a
//! `RemoteMessage` here is the payload one such `pack`/`unpack` round trips,
//! with delivery left to the caller's own `Collective`-adjacent channel.

use meshkernel_base::Handle;
use meshkernel_mesh::{MeshResult, MeshStore, TagKind, TagValue};
use meshkernel_topology::EntityKind;
use rustc_hash::FxHashMap as HashMap;

type EHandle = Handle<EntityKind>;

/// The migration-plan format spec §6 says is "produced" here and "reused"
/// by the load-balancer (out of scope per spec §1 — only the format is
/// this crate's concern, not the strategy that decides target parts).
/// Grounded verbatim on `examples/original_source/apf/apfMesh.cc`'s
/// `Migration` class: an ordered list of migrating (top-dimension) elements
/// backed by the reserved `apf_migrate` int tag, so `has`/`sending` are
/// O(1) tag lookups and `count`/`get` iterate the insertion-ordered list.
pub struct MigrationPlan<'a> {
    store: &'a mut MeshStore,
    elements: Vec<EHandle>,
}

const MIGRATE_TAG: &str = "apf_migrate";

impl<'a> MigrationPlan<'a> {
    /// Creates an empty plan, registering the reserved `apf_migrate` tag.
    /// Fails with `TagExists` if another plan (or leftover tag) is already
    /// live on this store, matching the one-`Migration`-object-per-mesh
    /// assumption the source's constructor/destructor pairing relies on.
    pub fn new(store: &'a mut MeshStore) -> MeshResult<Self> {
        store.create_tag(MIGRATE_TAG, TagKind::Int)?;
        Ok(Self { store, elements: Vec::new() })
    }

    pub fn count(&self) -> usize {
        self.elements.len()
    }

    pub fn get(&self, i: usize) -> EHandle {
        self.elements[i]
    }

    pub fn has(&self, e: EHandle) -> bool {
        self.store.has_tag(MIGRATE_TAG, e)
    }

    /// Marks `e` (restricted by spec §6 to a top-dimension element) to
    /// migrate `to` a target part-id; first call for `e` appends it to the
    /// iteration order, a repeat call only overwrites its destination.
    pub fn send(&mut self, e: EHandle, to: i64) -> MeshResult<()> {
        if !self.has(e) {
            self.elements.push(e);
        }
        self.store.set_tag_int(MIGRATE_TAG, e, to)
    }

    /// The target part-id most recently set for `e` via [`send`](Self::send).
    pub fn sending(&self, e: EHandle) -> MeshResult<i64> {
        match self.store.get_tag(MIGRATE_TAG, e)? {
            TagValue::Int(to) => Ok(to),
            TagValue::Double(_) => unreachable!("apf_migrate is always an int tag"),
        }
    }
}

impl<'a> Drop for MigrationPlan<'a> {
    /// Mirrors the source destructor: strips the tag from every entity it
    /// touched, then destroys the tag, so a plan never leaks into the next
    /// one's `MeshStore::create_tag` call.
    fn drop(&mut self) {
        for &e in &self.elements {
            let _ = self.store.remove_tag(MIGRATE_TAG, e);
        }
        let _ = self.store.destroy_tag(MIGRATE_TAG);
    }
}

/// One outgoing notification: "the entity you know locally as
/// `entity_on_peer` now has handle `new_handle` on `from_part`."
/// Corresponds to one `(E_P, N)` pair in spec §4.7, addressed to
/// `to_part` and tagged with the sender so the receiver knows which
/// remote-table column to overwrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteUpdate {
    pub to_part: usize,
    pub from_part: usize,
    /// The receiving part's own local handle for the shared entity
    /// (`E_P` in spec §4.7) — this is *not* a handle valid on this part.
    pub entity_on_peer: EHandle,
    /// This part's new local handle for the same entity.
    pub new_handle: EHandle,
}

/// Computes every outgoing [`RemoteUpdate`] this part must send after a
/// pass that remapped entity handles. `renumbering` maps each affected
/// entity's handle before the pass to its handle after; entities not in
/// the map are assumed unchanged and produce no messages. Only entities
/// that are shared (non-empty remote-copy table) generate messages —
/// local-only entities need tell no one.
///
/// Looks up each entity's remote-copy table at its *new* handle: the pass
/// that performed the renumbering is responsible for carrying each
/// entity's `remotes`/`matches` tables forward to its new slot (this
/// module only reconciles what peers are told afterwards, it does not
/// perform the renumbering itself).
pub fn outgoing_remote_updates(store: &MeshStore, renumbering: &HashMap<EHandle, EHandle>, this_part: usize) -> MeshResult<Vec<RemoteUpdate>> {
    let mut out = Vec::new();
    for &new_handle in renumbering.values() {
        for (&peer, &entity_on_peer) in store.get_remotes(new_handle)? {
            out.push(RemoteUpdate { to_part: peer, from_part: this_part, entity_on_peer, new_handle });
        }
    }
    Ok(out)
}

/// Applies one received [`RemoteUpdate`]: overwrites this part's copy
/// table entry for the sender (`locate the local copy table of E_P and
/// overwrite the entry for the sender with N`, spec §4.7). Commutative
/// and idempotent — applying the same update twice, or receiving updates
/// from different senders in any order, leaves the same final state,
/// matching spec §5's "protocols are designed to be commutative
/// (overwrite-by-sender ...)".
pub fn apply_remote_update(store: &mut MeshStore, update: &RemoteUpdate) -> MeshResult<()> {
    store.set_remote(update.entity_on_peer, update.from_part, update.new_handle)
}

/// Applies every update in `updates` (the inbox for one collective
/// phase), in any order.
pub fn reconcile_remotes(store: &mut MeshStore, updates: &[RemoteUpdate]) -> MeshResult<()> {
    for update in updates {
        apply_remote_update(store, update)?;
    }
    Ok(())
}
