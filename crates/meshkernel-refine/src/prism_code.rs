//! Classifies a prism's 9-bit edge-split code into one of its two
//! catalogued patterns (spec §4.4's `splitPrism_2`/`splitPrism_9`), plus
//! the prism rotation that brings the split edges into that pattern's
//! fixed template positions. Same computed-rotation-search approach as
//! `tet_code`, over `meshkernel_topology::PRISM_ROTATION`'s 6-element group
//! acting on the prism's 9 edges instead of the tet's 12-element group
//! acting on 6 edges.
//!
//! As with `quad_code`, the catalogue is deliberately partial: a prism
//! whose neighbours mark any other combination of its edges is a
//! `TopologyContradiction`. This core does not attempt a general "n edges
//! split, in any combination" prism template — the source system itself
//! only ships `splitPrism_0` (no-op), `splitPrism_2` and `splitPrism_9`.

use meshkernel_topology::{rotation::PRISM_ROTATION, PRISM_EDGE_VERTS};

/// The two catalogued prism edge-split patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrismPattern {
    /// One bottom-cap edge and the top-cap edge at the same cyclic
    /// position are both split: the prism is cut in two by extruding the
    /// corresponding 1-to-2 split of its triangular cross-section.
    TwoCapAligned,
    /// All nine edges split: the prism decomposes into eight sub-prisms
    /// via a 1-to-4 triangular split of each cap extruded through a new
    /// mid-height cross-section (three vertical-edge midpoints plus three
    /// side-quad-face centroids).
    NineUniform,
}

const CANONICAL: [(PrismPattern, u32); 2] =
    [(PrismPattern::TwoCapAligned, 0b0_0000_1001), (PrismPattern::NineUniform, 0b1_1111_1111)];

fn rotated_edge_index(e: usize, n: usize) -> usize {
    let perm = PRISM_ROTATION[n];
    let mut inverse = [0usize; 6];
    for (new_pos, &old_vertex) in perm.iter().enumerate() {
        inverse[old_vertex] = new_pos;
    }
    let [a, b] = PRISM_EDGE_VERTS[e];
    let (ra, rb) = (inverse[a], inverse[b]);
    PRISM_EDGE_VERTS
        .iter()
        .position(|&[x, y]| (x, y) == (ra, rb) || (x, y) == (rb, ra))
        .expect("every rotated edge is one of the canonical nine")
}

fn rotate_code(code: u32, n: usize) -> u32 {
    let mut out = 0u32;
    for e in 0..9 {
        if code & (1 << e) != 0 {
            out |= 1 << rotated_edge_index(e, n);
        }
    }
    out
}

/// Classifies a raw 9-bit prism edge-split `code`. `None` for `code == 0`
/// and for any code outside the two catalogued patterns.
pub fn classify(code: u32) -> Option<(usize, PrismPattern)> {
    if code == 0 {
        return None;
    }
    for n in 0..6 {
        let rotated = rotate_code(code, n);
        if let Some(&(pattern, _)) = CANONICAL.iter().find(|&&(_, canon)| canon == rotated) {
            return Some((n, pattern));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_codes_round_trip_at_rotation_zero() {
        for &(pattern, code) in &CANONICAL {
            assert_eq!(classify(code), Some((0, pattern)));
        }
    }

    #[test]
    fn rotated_two_cap_aligned_classifies() {
        // Rotation 1 cycles bottom cap 0->1->2->0 and top cap in lockstep
        // (see PRISM_ROTATION), so edges (1,2)/bit1 and (4,5)/bit4 should
        // be recognised as the same pattern one step around.
        assert_eq!(classify(0b0_0001_0010), Some((1, PrismPattern::TwoCapAligned)));
    }

    #[test]
    fn lone_vertical_edge_is_uncatalogued() {
        assert_eq!(classify(0b0_0100_0000), None);
    }

    #[test]
    fn zero_code_is_none() {
        assert_eq!(classify(0), None);
    }
}
