//! Local refinement driver, subdivision templates, the snap operator and
//! Parallel Glue for meshkernel. Built on `meshkernel-mesh`'s entity store
//! and `meshkernel-topology`'s rotation tables; grounded throughout on
//! `examples/original_source/ma/*.cc`.

#![cfg_attr(not(debug_assertions), deny(warnings))]
#![deny(clippy::all, rust_2018_idioms)]
#![warn(missing_debug_implementations, unused_import_braces, unused_qualifications)]

mod callback;
mod driver;
/// Errors returned by this crate's refinement and snap operations.
pub mod error;
mod geom;
mod prism_code;
mod quad_code;
mod remote;
mod snap;
/// The placed-split registry threaded through one refinement pass.
pub mod split;
mod tet_code;
/// The subdivision template catalogue, dispatched from `driver`.
pub mod templates;

pub use callback::{BuildCallback, NoopCallback};
pub use driver::{refine, RefineReport, RefinedElement};
pub use error::{Probe, RefineError, RefineResult, SnapError, SnapResult};
pub use remote::{apply_remote_update, outgoing_remote_updates, reconcile_remotes, MigrationPlan, RemoteUpdate};
pub use snap::{mark_snap_targets, snap_all, ElementValidator, PositiveJacobianValidator, SnapReport, Snapper};
pub use split::SplitRegistry;
pub use templates::TemplateCtx;
