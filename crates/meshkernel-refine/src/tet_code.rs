//! Classifies a tet's 6-bit edge-split code into one of the eleven
//! catalogued patterns (spec §4.4's table) plus the rotation that brings
//! the split edges into that pattern's fixed template positions.
//!
//! Rather than hand-transcribing the 64-entry `edge_code_to_rotation[Tet]`
//! table (whose literal source, `maTables.h`, is not present in the
//! retrieved pack), this computes the classification: the eleven
//! catalogued patterns are disjoint orbits of the tet rotation group
//! acting on 6-bit edge masks (verified by orbit-size accounting in
//! `DESIGN.md`), so trying each of the 12 rotations against each of the 11
//! canonical codes and taking the first match is equivalent to a literal
//! table lookup, without the transcription-error risk of typing 64 rows
//! by hand. See `meshkernel-topology::rotation::rotate_octahedron` for the
//! same "computed, not transcribed" choice made one layer down.

use meshkernel_topology::TET_EDGE_VERTS;

/// The eleven catalogued tet edge-split patterns, named as in spec §4.4's
/// table (numbered by pattern, not bit count).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TetPattern {
    /// 1: one edge split.
    One,
    /// 2.1: two edges sharing a vertex (and so a face).
    TwoAdjacent,
    /// 2.2: two opposite edges (no shared vertex or face).
    TwoOpposite,
    /// 3.1: three edges bounding one face.
    ThreeFace,
    /// 3.2: three edges, variant A (no shared vertex, no shared face).
    ThreeVariantA,
    /// 3.3: three edges, variant B — the mirror image of 3.2 under a
    /// reflection not in the proper-rotation group, hence a distinct
    /// template rather than reachable by rotating 3.2's case.
    ThreeVariantB,
    /// 3.4: three edges meeting at one vertex.
    ThreeVertex,
    /// 4.1: four edges, three of them bounding one face.
    FourFace,
    /// 4.2: four edges forming an equatorial belt (complement of an
    /// opposite pair).
    FourBelt,
    /// 5: five edges (complement of a single edge).
    Five,
    /// 6: all six edges.
    Six,
}

/// `(pattern, canonical 6-bit code)` pairs, one per catalogued pattern, in
/// the fixed vertex-position layout each template function is written
/// against. Each value is exactly the edge-split code its template
/// function reads at rotation 0 (verified against every `split_vert`/
/// `placed_split_vert` call in `templates.rs`, not merely a same-shape
/// orbit representative) — `classify` dispatches the rotation that makes
/// an arbitrary input code equal this value in the rotated frame, so a
/// representative whose bits land on the *wrong* edges for its own
/// template is a latent `MissingSplitVertex` for every input in that
/// orbit, caught by driving each pattern through `refine()` in
/// `driver.rs`'s test module.
const CANONICAL: [(TetPattern, u32); 11] = [
    (TetPattern::One, 0b000001),
    (TetPattern::TwoAdjacent, 0b000110),
    (TetPattern::TwoOpposite, 0b100001),
    (TetPattern::ThreeFace, 0b000111),
    (TetPattern::ThreeVariantA, 0b100101),
    (TetPattern::ThreeVariantB, 0b100011),
    (TetPattern::ThreeVertex, 0b111000),
    (TetPattern::FourFace, 0b100111),
    (TetPattern::FourBelt, 0b011110),
    (TetPattern::Five, 0b011111),
    (TetPattern::Six, 0b111111),
];

/// For rotation `n` (0..12), the edge index in the *rotated* frame that
/// original edge `e` maps to.
fn rotated_edge_index(e: usize, n: usize) -> usize {
    let perm = meshkernel_topology::rotation::TET_ROTATION[n];
    let mut inverse = [0usize; 4];
    for (new_pos, &old_vertex) in perm.iter().enumerate() {
        inverse[old_vertex] = new_pos;
    }
    let [a, b] = TET_EDGE_VERTS[e];
    let (ra, rb) = (inverse[a], inverse[b]);
    TET_EDGE_VERTS
        .iter()
        .position(|&[x, y]| (x, y) == (ra, rb) || (x, y) == (rb, ra))
        .expect("every rotated edge is one of the canonical six")
}

/// Re-expresses `code` (a mask over the *original* vertex tuple's edges)
/// in the frame of the tuple rotated by `n`.
fn rotate_code(code: u32, n: usize) -> u32 {
    let mut out = 0u32;
    for e in 0..6 {
        if code & (1 << e) != 0 {
            out |= 1 << rotated_edge_index(e, n);
        }
    }
    out
}

/// Classifies a raw 6-bit tet edge-split `code` (bit `i` set iff
/// `TET_EDGE_VERTS[i]` is marked), returning the rotation to apply to the
/// element's vertex tuple before dispatching to the matching template,
/// and which template to dispatch to. `None` for `code == 0` (nothing to
/// refine) — the driver should skip such elements entirely (idempotence,
/// spec property 11).
pub fn classify(code: u32) -> Option<(usize, TetPattern)> {
    if code == 0 {
        return None;
    }
    for n in 0..12 {
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
    fn every_nonzero_code_classifies() {
        for code in 1u32..64 {
            assert!(classify(code).is_some(), "code {code:#08b} did not classify");
        }
    }

    #[test]
    fn canonical_codes_round_trip_at_rotation_zero() {
        for &(pattern, code) in &CANONICAL {
            assert_eq!(classify(code), Some((0, pattern)));
        }
    }

    #[test]
    fn popcount_matches_pattern_family() {
        use TetPattern::*;
        for code in 1u32..64 {
            let (_, pattern) = classify(code).unwrap();
            let bits = code.count_ones();
            let expected_bits: &[u32] = match pattern {
                One => &[1],
                TwoAdjacent | TwoOpposite => &[2],
                ThreeFace | ThreeVariantA | ThreeVariantB | ThreeVertex => &[3],
                FourFace | FourBelt => &[4],
                Five => &[5],
                Six => &[6],
            };
            assert!(expected_bits.contains(&bits));
        }
    }

    #[test]
    fn classification_partitions_all_64_codes_without_collision() {
        let mut counts = std::collections::HashMap::new();
        for code in 1u32..64 {
            let (_, pattern) = classify(code).unwrap();
            *counts.entry(format!("{pattern:?}")).or_insert(0) += 1;
        }
        assert_eq!(counts["One"], 6);
        assert_eq!(counts["TwoAdjacent"], 12);
        assert_eq!(counts["TwoOpposite"], 3);
        assert_eq!(counts["ThreeFace"], 4);
        assert_eq!(counts["ThreeVariantA"], 6);
        assert_eq!(counts["ThreeVariantB"], 6);
        assert_eq!(counts["ThreeVertex"], 4);
        assert_eq!(counts["FourFace"], 12);
        assert_eq!(counts["FourBelt"], 3);
        assert_eq!(counts["Five"], 6);
        assert_eq!(counts["Six"], 1);
    }
}
