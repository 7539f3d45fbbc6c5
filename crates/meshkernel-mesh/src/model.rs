use meshkernel_base::{Vector2, Vector3};

/// An opaque handle to a geometric-model entity (vertex, edge, face or
/// region of the model the mesh is classified against), plus the
/// dimension of that entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelClass {
    /// Dimension of the model entity: 0 (point), 1 (curve), 2 (surface) or
    /// 3 (volume).
    pub dim: u8,
    /// Opaque identifier, meaningful only to the [`GeometricModel`]
    /// implementation that issued it.
    pub id: u64,
}

impl ModelClass {
    /// A new classification onto model entity `id` of dimension `dim`.
    pub fn new(dim: u8, id: u64) -> Self {
        ModelClass { dim, id }
    }
}

/// The geometric model consumed by the mesh store and the snap operator.
/// Implementations own the actual CAD/solid-modelling representation; the
/// mesh only ever asks it to classify model-entity kind and to evaluate
/// points.
pub trait GeometricModel {
    /// Dimension of model entity `id` (0, 1, 2 or 3).
    fn model_type(&self, id: u64) -> u8;

    /// Evaluates the spatial point corresponding to parametric coordinate
    /// `param` on model entity `id`. `param`'s meaningful components depend
    /// on `model_type(id)` (ignored for a 0-dimensional vertex entity, one
    /// component for a curve, two for a surface).
    fn snap_to_model(&self, id: u64, param: Vector2) -> Vector3;

    /// The periodic range of parametric dimension `d` (0 or 1) of model
    /// entity `id`, and whether it is periodic at all. Non-periodic model
    /// entities return `(_, false)`.
    fn periodic_range(&self, id: u64, d: usize) -> ([f64; 2], bool);
}
