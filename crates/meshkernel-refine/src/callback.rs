//! The solution-transfer callback contract (spec §6): invoked by the
//! refinement driver as new entities are built, so a caller-owned field
//! interpolation service can keep its data in sync without this crate
//! knowing anything about fields. Grounded on `maSolutionTransfer.h`'s
//! `onVertex`/`onRefine` hooks, called from `maTemplates.cc`'s
//! `splitTet_3_4`/`splitTet_4_2`/`splitQuad_4` (vertex interpolation at a
//! centroid) and from the refinement driver's per-element dispatch
//! (`onRefine` once per refined parent).

use meshkernel_base::Handle;
use meshkernel_topology::EntityKind;

type EHandle = Handle<EntityKind>;

/// Invoked by the refinement driver as it builds new entities.
///
/// `on_vertex` fires once for every vertex a template creates that isn't
/// simply a placed edge split (i.e. quad/prism centroid vertices), giving
/// the parent element the vertex was interpolated within and its
/// element-local coordinate. `on_refine` fires once per refined element,
/// after all of its children have been built.
pub trait BuildCallback {
    /// A new vertex `new_vertex` was created at local coordinate `xi`
    /// (barycentric/parametric, meaning depends on `parent`'s kind) within
    /// `parent`.
    fn on_vertex(&mut self, parent: EHandle, xi: [f64; 3], new_vertex: EHandle);

    /// `parent` has been fully refined into `children` (entities of the
    /// same topological dimension as `parent`).
    fn on_refine(&mut self, parent: EHandle, children: &[EHandle]);
}

/// A [`BuildCallback`] that does nothing; the default when no
/// solution-transfer service is wired in.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCallback;

impl BuildCallback for NoopCallback {
    fn on_vertex(&mut self, _parent: EHandle, _xi: [f64; 3], _new_vertex: EHandle) {}
    fn on_refine(&mut self, _parent: EHandle, _children: &[EHandle]) {}
}
