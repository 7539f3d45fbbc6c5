//! Canonical element topology: the eight entity kinds, their fixed
//! downward-vertex orderings, and the rotation/canonicalisation
//! permutations used to bring an element into the orientation a
//! subdivision template expects.

#![cfg_attr(not(debug_assertions), deny(warnings))]
#![deny(clippy::all, rust_2018_idioms)]
#![warn(missing_debug_implementations, unused_import_braces, unused_qualifications)]

/// The eight entity kinds and their static properties.
pub mod kind;
/// Rotation permutations and canonicalisation helpers.
pub mod rotation;
/// Canonical downward-vertex-ordering constant tables (`TOPO`).
pub mod tables;

pub use kind::{EntityKind, TYPES};
pub use rotation::{
    checkable_prism_diag_code, find_tet_rotation, prism_diag_choices, prism_diag_match, rotate,
    rotate_octahedron, rotate_prism, rotate_pyramid, rotate_tet, tet_barycentric_coord_of,
    unrotate_tet_xi,
};
pub use tables::{
    PRISM_EDGE_VERTS, PRISM_QUAD_VERTS, PRISM_TRI_VERTS, PYRAMID_EDGE_VERTS, PYRAMID_TRI_VERTS,
    QUAD_EDGE_VERTS, TET_EDGE_VERTS, TET_TRI_VERTS, TRI_EDGE_OPPOSITE_VERT, TRI_EDGE_VERTS,
    TRI_VERT_OPPOSITE_EDGE,
};
