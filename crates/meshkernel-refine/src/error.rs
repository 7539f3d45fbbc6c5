use meshkernel_base::Handle;
use meshkernel_mesh::MeshError;
use meshkernel_topology::EntityKind;
use thiserror::Error;

type EHandle = Handle<EntityKind>;

/// Failures from the refinement driver and its subdivision templates.
#[derive(Debug, Error)]
pub enum RefineError {
    /// The mesh store rejected an operation the driver assumed would
    /// succeed (e.g. a stale handle slipped through a prior pass).
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// A template's precondition was violated — e.g. "exactly one
    /// diagonal of this prism quad face already exists" when zero or two
    /// are present. Per spec §7 this is a programmer error, not a
    /// recoverable failure: the caller should treat it as fatal.
    #[error("topology contradiction while refining {0:?}: {1}")]
    TopologyContradiction(EHandle, &'static str),

    /// No placed split vertex was found on an edge the caller's edge-split
    /// code claimed was marked.
    #[error("expected a placed split vertex on edge ({0:?}, {1:?})")]
    MissingSplitVertex(EHandle, EHandle),
}

/// Convenience alias for this crate's refinement operations.
pub type RefineResult<T> = Result<T, RefineError>;

/// Failures from the snap operator. Unlike [`RefineError`], a
/// `GeometryFailure` is recoverable by the operator's own rollback — it is
/// surfaced to the caller only so the per-vertex outcome can be reported
/// and counted, never propagated as a process abort.
#[derive(Debug, Error, PartialEq)]
pub enum SnapError {
    /// `snap_to_model` moved the vertex to a point that invalidated at
    /// least one incident element; the vertex's coordinate was rolled
    /// back.
    #[error("snapping {0:?} to the model would invalidate an incident element")]
    GeometryFailure(EHandle),

    #[error(transparent)]
    Mesh(#[from] MeshError),
}

/// Convenience alias for this crate's snap operations.
pub type SnapResult<T> = Result<T, SnapError>;

/// Outcome of probing one entity for a cavity operation (spec §4.6/§9):
/// not an error taxonomy member, since `RequestLocality` is a normal,
/// expected outcome the outer sweep retries rather than a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    /// The entity is local and may be committed this sweep.
    Ok,
    /// The entity should be left untouched this sweep (already handled,
    /// or outside the caller's interest).
    Skip,
    /// The entity (or part of its upward closure) lives on another part;
    /// the cavity framework must migrate it here before it can be
    /// committed. Not an error — the driver retries on the next sweep.
    RequestLocality,
}
