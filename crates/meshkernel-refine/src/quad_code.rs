//! Classifies a quad's 4-bit edge-split code into one of its two
//! catalogued patterns (spec §4.4), plus the cyclic shift that brings the
//! split edges into that pattern's fixed template positions. Mirrors
//! `tet_code`'s computed-rotation-search approach, generalised to the
//! quad's 4-fold cyclic rotation group instead of the tet's 12-element one.
//!
//! Unlike `tet_code`, not every nonzero code classifies: only an aligned
//! pair of opposite edges (`splitQuad_2`) and all four edges (`splitQuad_4`)
//! are catalogued. A quad face driven to any other split pattern by its
//! neighbours is a `TopologyContradiction` — the two adjacent elements
//! that share it disagree on how it refines.

use meshkernel_topology::QUAD_EDGE_VERTS;

/// The two catalogued quad edge-split patterns (named by edge count, as in
/// `maTemplates.cc`'s `splitQuad_2`/`splitQuad_4`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuadPattern {
    /// Two opposite edges split: the quad is cut into two sub-quads by one
    /// new edge joining the two split vertices.
    TwoParallel,
    /// All four edges split: a centroid vertex is created and the quad is
    /// cut into four sub-quads, each using one original corner, its two
    /// adjacent split vertices, and the centroid.
    Four,
}

const CANONICAL: [(QuadPattern, u32); 2] = [(QuadPattern::TwoParallel, 0b0101), (QuadPattern::Four, 0b1111)];

fn rotated_edge_index(e: usize, n: usize) -> usize {
    let [a, b] = QUAD_EDGE_VERTS[e];
    let shift = |v: usize| (v + QUAD_EDGE_VERTS.len() - n) % QUAD_EDGE_VERTS.len();
    let (ra, rb) = (shift(a), shift(b));
    QUAD_EDGE_VERTS
        .iter()
        .position(|&[x, y]| (x, y) == (ra, rb) || (x, y) == (rb, ra))
        .expect("every rotated edge is one of the canonical four")
}

fn rotate_code(code: u32, n: usize) -> u32 {
    let mut out = 0u32;
    for e in 0..4 {
        if code & (1 << e) != 0 {
            out |= 1 << rotated_edge_index(e, n);
        }
    }
    out
}

/// Classifies a raw 4-bit quad edge-split `code`, returning the cyclic
/// rotation to apply before dispatching and which pattern matched. `None`
/// for `code == 0` (idempotence, spec property 11) and for any code outside
/// the two catalogued patterns.
pub fn classify(code: u32) -> Option<(usize, QuadPattern)> {
    if code == 0 {
        return None;
    }
    for n in 0..4 {
        let rotated = rotate_code(code, n);
        if let Some(&(pattern, _)) = CANONICAL.iter().find(|&&(_, canon)| canon == rotated) {
            return Some((n, pattern));
        }
    }
    None
}
