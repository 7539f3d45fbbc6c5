use meshkernel_base::Handle;
use meshkernel_topology::EntityKind;
use thiserror::Error;

/// Failures the mesh store itself can report. Every other failure mode
/// described in the adaptation pipeline (topological contradictions,
/// geometry failures, locality requests) belongs to `meshkernel-refine`;
/// this crate only ever reports contract violations at its own API
/// surface.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MeshError {
    /// The handle names a slot that was never allocated, or was removed
    /// (and possibly reused by a newer entity) since the handle was taken.
    #[error("invalid handle: {0:?}")]
    InvalidHandle(Handle<EntityKind>),

    /// `create_tag` was called with a name already in use.
    #[error("tag already exists: {0}")]
    TagExists(String),

    /// A tag operation named a tag that was never created (or has since
    /// been destroyed).
    #[error("no such tag: {0}")]
    MissingTag(String),

    /// `remove` was called on an entity whose upward bag is non-empty.
    #[error("cannot remove {0:?}: still referenced upward")]
    StillReferenced(Handle<EntityKind>),
}

/// Convenience alias for this crate's fallible operations.
pub type MeshResult<T> = Result<T, MeshError>;
