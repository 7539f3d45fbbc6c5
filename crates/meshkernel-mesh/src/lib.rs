//! The in-memory topological mesh database: per-kind entity arenas,
//! downward/upward adjacency, coordinate and tag storage, remote-copy
//! bookkeeping, and the bottom-up element finder / `make_or_find`
//! predicate the refinement driver builds new entities through.

#![cfg_attr(not(debug_assertions), deny(warnings))]
#![deny(clippy::all, rust_2018_idioms)]
#![warn(missing_debug_implementations, unused_import_braces, unused_qualifications)]

/// The generational arena backing every per-kind entity table.
pub mod arena;
/// This crate's error taxonomy (`InvalidHandle`, `TagExists`, ...).
pub mod error;
/// Bottom-up element lookup and `make_or_find`.
pub mod finder;
/// The geometric-model classification type and the `GeometricModel` trait.
pub mod model;
/// The mesh store itself.
pub mod store;
/// Named, typed tag side-tables.
pub mod tags;

pub use error::{MeshError, MeshResult};
pub use finder::{find_element, make_or_find};
pub use model::{GeometricModel, ModelClass};
pub use store::MeshStore;
pub use tags::{TagKind, TagStore, TagValue};

pub use meshkernel_topology::EntityKind;

/// Reserved tag names used by this core; see spec §6. Callers building on
/// top of `meshkernel-mesh` should not create tags under these names for
/// unrelated purposes.
pub mod reserved_tags {
    /// Migration-plan target part id, set per top-dimension element.
    pub const MIGRATE: &str = "apf_migrate";
    /// Model dimension an entity is classified on.
    pub const GEOM_DIM: &str = "ma_geom_dim";
    /// Model entity id an entity is classified on.
    pub const GEOM_ID: &str = "ma_geom_id";
    /// Placement parameter of a split vertex along its parent edge.
    pub const PARAM: &str = "ma_param";
    /// Dense entity numbering assigned by the reordering pass.
    pub const NUMBER: &str = "mds_number";
    /// Inverse of `mds_number`: entity handle for a given dense index.
    pub const INVERSE: &str = "mds_inverse";
}
