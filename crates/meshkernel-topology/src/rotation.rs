//! Rotation tables and canonicalisation. `rotate(kind, v, n)` brings a
//! vertex tuple into the orientation that rotation code `n` names; the
//! refinement driver uses this to present every subdivision template with
//! its split edges at a single, fixed set of positions, so ~30 hand
//! written templates can cover every edge-split bitmask.

use crate::kind::EntityKind;
use crate::tables::TET_BARYCENTRIC_COORD_OF;

/// The 12 rotations of a tetrahedron (the alternating group on its four
/// vertices). Row `r` sends canonical vertex 0 to whichever vertex is
/// first in that row; rows are grouped in blocks of 3 by that first
/// vertex (`begin = first * 3`), matching the grouping [`find_tet_rotation`]
/// searches. Row 0 is the identity.
pub const TET_ROTATION: [[usize; 4]; 12] = [
    [0, 1, 2, 3],
    [0, 2, 3, 1],
    [0, 3, 1, 2],
    [1, 0, 3, 2],
    [1, 2, 0, 3],
    [1, 3, 2, 0],
    [2, 0, 1, 3],
    [2, 1, 3, 0],
    [2, 3, 0, 1],
    [3, 2, 1, 0],
    [3, 0, 2, 1],
    [3, 1, 0, 2],
];

/// The 6 proper rotations of a triangular prism (D3: two three-fold
/// rotations about the main axis, plus their product with one two-fold
/// "end over end" flip). Rows 0-2 are the main-axis rotations (`n`
/// cyclically shifts both caps in lockstep, preserving the bottom/top
/// split). Rows 3-5 are genuine 180-degree flips that swap the two caps
/// *and* reverse one cap's cyclic order relative to the other — a direct
/// aligned swap (bottom `i` <-> top `i`, no reversal) is **not** one of
/// the prism's proper rotations (it is the improper reflection through
/// the prism's mid-plane), which is why rows 3-5 permute across the two
/// triangles rather than pairing same-index vertices. Derived by
/// composing each main-axis rotation with one concrete 180-degree flip
/// (verified against a canonical right-prism's coordinates), not
/// transcribed from a source table.
pub const PRISM_ROTATION: [[usize; 6]; 6] = [
    [0, 1, 2, 3, 4, 5],
    [1, 2, 0, 4, 5, 3],
    [2, 0, 1, 5, 3, 4],
    [3, 5, 4, 0, 2, 1],
    [4, 3, 5, 1, 0, 2],
    [5, 4, 3, 2, 1, 0],
];

/// `PRISM_DIAG_MATCH[code]`: the prism rotation that brings the doubly
/// shared vertex of a "good" diagonal code (see [`prism_diag_match`]) to
/// position 0. Entries for the excluded codes 0 and 7 are unused
/// placeholders; callers must check [`checkable codes`](prism_diag_match)
/// before indexing.
const PRISM_DIAG_MATCH_TABLE: [usize; 8] = [0, 1, 2, 2, 0, 1, 0, 0];

/// `PRISM_DIAG_CHOICES[code]`: for a prism whose first quad face's
/// diagonal is still undecided and whose other two quad faces already
/// carry the 2-bit `code` (bit 0 = face 1, bit 1 = face 2), the bitmask of
/// diagonal choices for face 0 that avoid the all-0 / all-7 bad pattern
/// (bit 0 = "diagonal `v0<->v4` is acceptable", bit 1 = "diagonal
/// `v1<->v3` is acceptable").
const PRISM_DIAG_CHOICES_TABLE: [usize; 4] = [2, 3, 3, 1];

/// Rotates a vertex tuple of the given kind by rotation code `n`.
///
/// `Vertex` and `Hex` have no rotation defined in this core (mirrored from
/// the dispatch table they are absent from); calling this with those
/// kinds panics.
pub fn rotate<V: Copy>(kind: EntityKind, v: &[V], n: usize) -> Vec<V> {
    match kind {
        EntityKind::Vertex => panic!("vertices have no rotation"),
        EntityKind::Edge => rotate_cyclic(v, n),
        EntityKind::Triangle | EntityKind::Quad => rotate_cyclic(v, n),
        EntityKind::Tet => {
            let arr: [V; 4] = v.try_into().unwrap_or_else(|_| panic!("tet needs 4 vertices"));
            rotate_tet(&arr, n).to_vec()
        }
        EntityKind::Prism => {
            let arr: [V; 6] = v.try_into().unwrap_or_else(|_| panic!("prism needs 6 vertices"));
            rotate_prism(&arr, n).to_vec()
        }
        EntityKind::Pyramid => {
            let arr: [V; 5] = v.try_into().unwrap_or_else(|_| panic!("pyramid needs 5 vertices"));
            rotate_pyramid(&arr, n).to_vec()
        }
        EntityKind::Hex => panic!("hex rotation is out of scope for this core"),
    }
}

/// Generic cyclic shift: `out[i] = in[(i + n) % len]`. Used for edges
/// (trivially, `len == 2` but rotation is always the identity in practice
/// since edges have no orientation distinction in this core beyond their
/// two endpoints), triangles and quads.
fn rotate_cyclic<V: Copy>(v: &[V], n: usize) -> Vec<V> {
    let len = v.len();
    (0..len).map(|i| v[(i + n) % len]).collect()
}

/// Rotates a tet's 4 vertices by code `n` (0..12).
pub fn rotate_tet<V: Copy>(v: &[V; 4], n: usize) -> [V; 4] {
    let idx = TET_ROTATION[n];
    std::array::from_fn(|i| v[idx[i]])
}

/// Rotates a prism's 6 vertices by code `n` (0..6).
pub fn rotate_prism<V: Copy>(v: &[V; 6], n: usize) -> [V; 6] {
    let idx = PRISM_ROTATION[n];
    std::array::from_fn(|i| v[idx[i]])
}

/// Rotates a pyramid's 5 vertices by code `n` (0..4): the base quad (first
/// four vertices) rotates like a quad, the apex (index 4) is fixed.
pub fn rotate_pyramid<V: Copy>(v: &[V; 5], n: usize) -> [V; 5] {
    let base: [V; 4] = [v[0], v[1], v[2], v[3]];
    let rotated = rotate_cyclic(&base, n);
    [rotated[0], rotated[1], rotated[2], rotated[3], v[4]]
}

/// Antipodal vertex pairs of the reference octahedron, placed on the
/// +X/-X, +Y/-Y, +Z/-Z poles respectively.
const OCT_POLE_POS: [usize; 3] = [0, 1, 2];
const OCT_POLE_NEG: [usize; 3] = [5, 3, 4];

const OCT_AXIS_PERMS: [[usize; 3]; 6] =
    [[0, 1, 2], [1, 2, 0], [2, 0, 1], [0, 2, 1], [2, 1, 0], [1, 0, 2]];
const OCT_SIGNS_EVEN: [[i32; 3]; 4] =
    [[1, 1, 1], [1, -1, -1], [-1, 1, -1], [-1, -1, 1]];
const OCT_SIGNS_ODD: [[i32; 3]; 4] =
    [[1, 1, -1], [1, -1, 1], [-1, 1, 1], [-1, -1, -1]];

/// Computes the 24 proper rotations of an octahedron on demand, as a
/// signed permutation of its three pole axes with determinant +1, rather
/// than as a hand-transcribed 24x6 literal table (see `DESIGN.md` for why).
fn oct_rotation_indices(n: usize) -> [usize; 6] {
    let perm_idx = n / 4;
    let sign_idx = n % 4;
    let perm = OCT_AXIS_PERMS[perm_idx];
    let signs = if perm_idx < 3 { OCT_SIGNS_EVEN[sign_idx] } else { OCT_SIGNS_ODD[sign_idx] };

    let mut perm_inv = [0usize; 3];
    for (a, &b) in perm.iter().enumerate() {
        perm_inv[b] = a;
    }

    let mut mapping = [0usize; 6];
    for b in 0..3 {
        let a = perm_inv[b];
        if signs[a] > 0 {
            mapping[OCT_POLE_POS[b]] = OCT_POLE_POS[a];
            mapping[OCT_POLE_NEG[b]] = OCT_POLE_NEG[a];
        } else {
            mapping[OCT_POLE_POS[b]] = OCT_POLE_NEG[a];
            mapping[OCT_POLE_NEG[b]] = OCT_POLE_POS[a];
        }
    }
    mapping
}

/// Rotates an octahedron's 6 vertices by code `n` (0..24).
pub fn rotate_octahedron<V: Copy>(v: &[V; 6], n: usize) -> [V; 6] {
    let idx = oct_rotation_indices(n);
    std::array::from_fn(|i| v[idx[i]])
}

/// Finds the rotation code `n` such that `rotate_tet(tet, n) == v`, by
/// searching the 3 rotations that place `v[0]` first (the block
/// `[first * 3, first * 3 + 3)` of [`TET_ROTATION`]).
pub fn find_tet_rotation<V: Copy + PartialEq>(tet: &[V; 4], v: &[V; 4]) -> Option<usize> {
    let first = tet.iter().position(|t| *t == v[0])?;
    let begin = first * 3;
    (begin..begin + 3).find(|&n| rotate_tet(tet, n) == *v)
}

/// Inverts rotation `n`'s effect on barycentric-style local coordinates:
/// if `xi` are a point's local coordinates with respect to `rotate_tet(tet, n)`,
/// returns the local coordinates of the same point with respect to `tet`
/// itself.
pub fn unrotate_tet_xi(xi: [f64; 3], n: usize) -> [f64; 3] {
    let a = [1.0 - xi[0] - xi[1] - xi[2], xi[0], xi[1], xi[2]];
    let original_index_of = TET_ROTATION[n];
    let mut b = [0.0; 4];
    for i in 0..4 {
        b[original_index_of[i]] = a[i];
    }
    [b[1], b[2], b[3]]
}

/// Places a tet vertex index into its barycentric-coordinate-array slot
/// (see [`TET_BARYCENTRIC_COORD_OF`]).
pub fn tet_barycentric_coord_of(vertex: usize) -> usize {
    TET_BARYCENTRIC_COORD_OF[vertex]
}

/// `code` must be in `1..=6` (codes 0 and 7 are the excluded "no diagonal
/// decided yet" / "bad" patterns, see [`crate::kind::EntityKind::Prism`]
/// and the prism subdivision templates). Returns the rotation that places
/// the diagonal-shared vertex at position 0.
pub fn prism_diag_match(code: usize) -> usize {
    debug_assert!((1..=6).contains(&code), "code {code} is not a resolvable diagonal pattern");
    PRISM_DIAG_MATCH_TABLE[code]
}

/// `remaining_code` is the 2-bit pattern of the two already-decided quad
/// faces (bit 0 = face 1, bit 1 = face 2). Returns the bitmask of
/// acceptable diagonal choices for the still-undecided face 0.
pub fn prism_diag_choices(remaining_code: usize) -> usize {
    PRISM_DIAG_CHOICES_TABLE[remaining_code & 0b11]
}

/// `true` iff `code` names a resolvable diagonal pattern (excludes the
/// all-undecided code 0 and the all-same-rotational-sense "bad" code 7).
pub fn checkable_prism_diag_code(code: usize) -> bool {
    code != 0 && code != 7
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tet_rotation_row_zero_is_identity() {
        assert_eq!(TET_ROTATION[0], [0, 1, 2, 3]);
    }

    #[test]
    fn tet_rotation_rows_are_grouped_by_first_vertex() {
        for first in 0..4 {
            for r in first * 3..first * 3 + 3 {
                assert_eq!(TET_ROTATION[r][0], first);
            }
        }
    }

    #[test]
    fn tet_rotation_rows_are_even_permutations() {
        // The 12 proper rotations of a tetrahedron are exactly the even
        // permutations of its 4 vertices (the alternating group A4); a
        // row that is an odd permutation would be a reflection, which
        // would invert the orientation (and volume sign) of any tet
        // rotated by it.
        fn is_even(row: [usize; 4]) -> bool {
            let mut seen = [false; 4];
            let mut swaps = 0;
            for start in 0..4 {
                if seen[start] {
                    continue;
                }
                let mut len = 0;
                let mut i = start;
                while !seen[i] {
                    seen[i] = true;
                    i = row[i];
                    len += 1;
                }
                swaps += len - 1;
            }
            swaps % 2 == 0
        }
        for (n, row) in TET_ROTATION.into_iter().enumerate() {
            assert!(is_even(row), "rotation {n} ({row:?}) is an odd permutation (a reflection)");
        }
    }

    #[test]
    fn tet_rotation_rows_are_all_distinct_permutations() {
        let mut seen = std::collections::HashSet::new();
        for row in TET_ROTATION {
            assert!(seen.insert(row), "duplicate rotation row {row:?}");
            let mut sorted = row;
            sorted.sort_unstable();
            assert_eq!(sorted, [0, 1, 2, 3]);
        }
    }

    #[test]
    fn prism_rotation_row_zero_is_identity() {
        assert_eq!(PRISM_ROTATION[0], [0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn prism_rotation_preserves_cap_membership_or_swaps_wholesale() {
        for row in PRISM_ROTATION {
            let bottom_to_bottom = row[0..3].iter().all(|&i| i < 3);
            let bottom_to_top = row[0..3].iter().all(|&i| i >= 3);
            assert!(bottom_to_bottom || bottom_to_top);
        }
    }

    #[test]
    fn prism_flip_rows_are_involutions() {
        // Rows 3-5 are 180-degree flips: applying one twice must return
        // every vertex to its original position.
        for n in 3..6 {
            let v = [0usize, 1, 2, 3, 4, 5];
            let once = rotate_prism(&v, n);
            let twice: [usize; 6] = std::array::from_fn(|i| once[PRISM_ROTATION[n][i]]);
            assert_eq!(twice, v, "row {n} is not an involution");
        }
    }

    #[test]
    fn prism_rotation_rows_are_all_distinct_permutations() {
        let mut seen = std::collections::HashSet::new();
        for row in PRISM_ROTATION {
            assert!(seen.insert(row), "duplicate prism rotation row {row:?}");
            let mut sorted = row;
            sorted.sort_unstable();
            assert_eq!(sorted, [0, 1, 2, 3, 4, 5]);
        }
    }

    #[test]
    fn find_tet_rotation_round_trips() {
        let tet = [10, 20, 30, 40];
        for n in 0..12 {
            let rotated = rotate_tet(&tet, n);
            assert_eq!(find_tet_rotation(&tet, &rotated), Some(n));
        }
    }

    #[test]
    fn oct_rotation_produces_24_distinct_permutations() {
        let v = [0usize, 1, 2, 3, 4, 5];
        let mut seen = std::collections::HashSet::new();
        for n in 0..24 {
            let r = rotate_octahedron(&v, n);
            assert!(seen.insert(r), "duplicate octahedron rotation at n={n}");
        }
        assert_eq!(seen.len(), 24);
    }

    #[test]
    fn oct_rotation_identity_at_zero() {
        let v = [0usize, 1, 2, 3, 4, 5];
        assert_eq!(rotate_octahedron(&v, 0), v);
    }

    #[test]
    fn oct_rotation_preserves_antipodal_pairs() {
        let v = [0usize, 1, 2, 3, 4, 5];
        let pairs = [(0, 5), (1, 3), (2, 4)];
        for n in 0..24 {
            let r = rotate_octahedron(&v, n);
            for &(i, j) in &pairs {
                let (p, q) = (r[i], r[j]);
                assert!(
                    pairs.iter().any(|&(a, b)| (a == p && b == q) || (a == q && b == p)),
                    "rotation {n} broke antipodal pair at new positions ({i},{j}): got ({p},{q})"
                );
            }
        }
    }
}
