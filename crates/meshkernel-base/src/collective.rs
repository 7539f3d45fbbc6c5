//! Abstraction over the cross-rank reduction primitives the refinement and
//! snap passes rely on (modelled after a PCU-style collective layer: sum,
//! min, and max reductions over fixed-length arrays of integers or
//! doubles, plus a rank id and rank count). A production deployment backs
//! this with MPI or an equivalent message-passing runtime; [`SerialCollective`]
//! is the one-rank identity implementation used when running on a single
//! process and in tests.

/// A collective reduction layer shared by every rank participating in an
/// adaptation run. Every method is a synchronous barrier: all ranks must
/// call the same method with the same array length before any of them
/// returns.
pub trait Collective {
    /// This rank's id, in `0..self.rank_count()`.
    fn rank(&self) -> usize;

    /// Total number of ranks participating in this run.
    fn rank_count(&self) -> usize;

    /// Element-wise sum of `values` across all ranks.
    fn add_longs(&self, values: &[i64]) -> Vec<i64>;

    /// Element-wise sum of `values` across all ranks.
    fn add_doubles(&self, values: &[f64]) -> Vec<f64>;

    /// Element-wise minimum of `values` across all ranks.
    fn min_doubles(&self, values: &[f64]) -> Vec<f64>;

    /// Element-wise maximum of `values` across all ranks.
    fn max_doubles(&self, values: &[f64]) -> Vec<f64>;
}

/// A [`Collective`] for exactly one rank: every reduction is the identity
/// function. Used as the default when no parallel runtime is wired in, and
/// in unit tests that only need to exercise the reduction call sites.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialCollective;

impl Collective for SerialCollective {
    fn rank(&self) -> usize { 0 }

    fn rank_count(&self) -> usize { 1 }

    fn add_longs(&self, values: &[i64]) -> Vec<i64> { values.to_vec() }

    fn add_doubles(&self, values: &[f64]) -> Vec<f64> { values.to_vec() }

    fn min_doubles(&self, values: &[f64]) -> Vec<f64> { values.to_vec() }

    fn max_doubles(&self, values: &[f64]) -> Vec<f64> { values.to_vec() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serial_collective_is_identity() {
        let c = SerialCollective;
        assert_eq!(c.add_longs(&[1, 2, 3]), vec![1, 2, 3]);
        assert_eq!(c.add_doubles(&[1.5, 2.5]), vec![1.5, 2.5]);
        assert_eq!(c.rank(), 0);
        assert_eq!(c.rank_count(), 1);
    }
}
