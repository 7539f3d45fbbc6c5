//! The subdivision template catalogue (spec §4.4/§4.5). Every function
//! here is grounded 1:1 on its same-named function in
//! `examples/original_source/ma/maTemplates.cc`, transcribed into the
//! idiom of [`TemplateCtx`]'s `build`/`split_vert` helpers in place of the
//! source's raw `Entity**` arrays and global `Refine*` state.
//!
//! Every template receives its element's vertex tuple already rotated
//! into the fixed positional pattern its edge-split code calls for (done
//! by the caller, `crate::driver`, via `meshkernel_topology::rotate` plus
//! the `*_code` classifiers); templates themselves only ever rotate
//! *sub*-shapes they synthesise internally (pyramids handed to
//! `pyramid_to_tets`, prisms handed to the prism primitives).

use crate::error::{RefineError, RefineResult};
use crate::split::SplitRegistry;
use crate::{geom, BuildCallback};
use meshkernel_base::{Handle, Vector2, Vector3};
use meshkernel_mesh::{make_or_find, MeshStore, ModelClass};
use meshkernel_topology::{
    prism_diag_choices, prism_diag_match, rotate, rotate_pyramid, EntityKind, PRISM_QUAD_VERTS,
};

type EHandle = Handle<EntityKind>;

/// Threads the mesh store, the placed-split registry, the model
/// classification new entities inherit, and the running list of
/// top-dimension children through one parent element's template dispatch
/// (including every nested primitive it calls — `pyramid_to_tets` called
/// from `split_tet_2_1` still records its tets as children of the
/// original tet, exactly as `buildSplitElement(r, tet, TET, tv)` always
/// forwards the *outer* `tet`, never a synthetic intermediate, in the
/// source).
pub struct TemplateCtx<'a> {
    pub store: &'a mut MeshStore,
    pub splits: &'a SplitRegistry,
    pub model: Option<ModelClass>,
    pub parent: EHandle,
    /// Topological dimension of entities this dispatch's children share
    /// (3 for a tet/prism/pyramid being refined, 2 for a quad face).
    pub child_dim: u8,
    pub children: Vec<EHandle>,
    pub cb: Option<&'a mut dyn BuildCallback>,
}

impl<'a> TemplateCtx<'a> {
    /// `make_or_find`s `kind` over `verts`, classified on `self.model`.
    /// Entities whose dimension matches `self.child_dim` are recorded as
    /// children of `self.parent`.
    pub fn build(&mut self, kind: EntityKind, verts: &[EHandle]) -> RefineResult<EHandle> {
        let h = make_or_find(self.store, kind, self.model, verts)?;
        if kind.dimension() == self.child_dim {
            self.children.push(h);
        }
        Ok(h)
    }

    /// The previously placed split vertex on edge `(a, b)`.
    pub fn split_vert(&self, a: EHandle, b: EHandle) -> RefineResult<EHandle> {
        self.splits.find_split_vert(a, b).ok_or(RefineError::MissingSplitVertex(a, b))
    }

    /// The previously placed split vertex on edge `(a, b)` plus its
    /// placement parameter from `a` to `b`.
    pub fn placed_split_vert(&self, a: EHandle, b: EHandle) -> RefineResult<(EHandle, f64)> {
        self.splits.find_placed_split_vert(a, b).ok_or(RefineError::MissingSplitVertex(a, b))
    }

    /// Creates a new interior vertex at `point`, classified on `model`
    /// (the containing region/face's classification, since an interior
    /// centroid has no parametric coordinate of its own), and reports it
    /// to the solution-transfer callback at local coordinate `xi`.
    pub fn build_centroid_vertex(&mut self, point: Vector3, model: Option<ModelClass>, xi: [f64; 3]) -> EHandle {
        let v = self.store.create_vertex(model, point, Vector2::new(0.0, 0.0));
        if let Some(cb) = self.cb.as_deref_mut() {
            cb.on_vertex(self.parent, xi, v);
        }
        v
    }
}

/// `findElement(m, EDGE, [a, b])`'s boolean form: `true` iff that edge
/// already exists.
fn edge_exists(store: &MeshStore, a: EHandle, b: EHandle) -> RefineResult<bool> {
    Ok(meshkernel_mesh::find_element(store, EntityKind::Edge, &[a, b])?.is_some())
}

// ---------------------------------------------------------------------
// Pyramid-to-tets and the prism diagonal primitives (spec §4.5)
// ---------------------------------------------------------------------

/// Tetrahedronizes a pyramid-shaped sub-region (`pyramidToTets`). Expects
/// the diagonal edge across the base quad to already exist (created by
/// whichever element built it first); rotates the pyramid once if that
/// diagonal is `1<->3` instead of `0<->2`.
pub fn pyramid_to_tets(ctx: &mut TemplateCtx<'_>, v: [EHandle; 5]) -> RefineResult<()> {
    let rotation = if edge_exists(ctx.store, v[0], v[2])? { 0 } else { 1 };
    let v2 = rotate_pyramid(&v, rotation);
    if !edge_exists(ctx.store, v2[0], v2[2])? {
        return Err(RefineError::TopologyContradiction(
            ctx.parent,
            "pyramidToTets requires one base diagonal to already exist",
        ));
    }
    ctx.build(EntityKind::Tet, &[v2[0], v2[1], v2[2], v2[4]])?;
    ctx.build(EntityKind::Tet, &[v2[0], v2[2], v2[3], v2[4]])?;
    Ok(())
}

/// `getPrismDiagonalCode`: bit `i` set iff quad face `i`'s diagonal
/// connects bottom vertex `(i+1)%3` to top vertex `i` (`PRISM_QUAD_VERTS[i]`'s
/// 2nd and 4th entries).
pub fn prism_diagonal_code(store: &MeshStore, v: &[EHandle; 6]) -> RefineResult<usize> {
    let mut code = 0usize;
    for i in 0..3 {
        let quad = PRISM_QUAD_VERTS[i];
        let (a, b) = (v[quad[3]], v[quad[1]]);
        if edge_exists(store, a, b)? {
            code |= 1 << i;
        }
    }
    Ok(code)
}

/// `checkPrismDiagonalCode`: `false` for the "undecided" (0) and "bad"
/// (7, all diagonals rotationally aligned) codes.
pub fn checkable_prism_diagonal_code(code: usize) -> bool {
    code != 0 && code != 7
}

/// `getPrismDiagonalChoices`: for a prism whose face-0 diagonal is still
/// undecided and whose faces 1/2 carry `code`'s low two bits, returns
/// which of face 0's two diagonals would keep the prism out of the bad
/// case.
pub fn prism_diagonal_choices(store: &MeshStore, v: &[EHandle; 6]) -> RefineResult<usize> {
    let code = prism_diagonal_code(store, v)?;
    Ok(prism_diag_choices(code >> 1))
}

/// `prismToTetsGoodCase`: vertex 0 (after rotation) is shared by two
/// diagonals; splits into one tet (opposite triangular face) plus one
/// `pyramid_to_tets` call over the remaining hull.
pub fn prism_to_tets_good_case(ctx: &mut TemplateCtx<'_>, v_in: [EHandle; 6], code: usize) -> RefineResult<()> {
    let v = rotate_prism_array(&v_in, prism_diag_match(code));
    ctx.build(EntityKind::Tet, &[v[3], v[5], v[4], v[0]])?;
    pyramid_to_tets(ctx, [v[1], v[4], v[5], v[2], v[0]])?;
    Ok(())
}

/// `prismToTetsBadCase`: creates a centroid vertex classified on the
/// parent region's model, then two end-cap tets plus three
/// `pyramid_to_tets` calls over the three quad faces. Returns the
/// centroid vertex so the caller can interpolate the solution-transfer
/// size field at it (spec §4.5).
pub fn prism_to_tets_bad_case(
    ctx: &mut TemplateCtx<'_>,
    v_in: [EHandle; 6],
    code: usize,
    point: Vector3,
    region_model: Option<ModelClass>,
    xi: [f64; 3],
) -> RefineResult<EHandle> {
    debug_assert!(code == 0 || code == 7, "bad case is only reached for the all-undecided codes");
    // `prism_diag_match` is undefined at 0 and 7 (it asserts against them); the
    // source's raw table maps both to rotation 0, so there is nothing to rotate.
    let v = v_in;
    let cv = ctx.build_centroid_vertex(point, region_model, xi);
    for i in 0..2 {
        let v2 = rotate_prism_array(&v, i * 3);
        ctx.build(EntityKind::Tet, &[v2[0], v2[1], v2[2], cv])?;
    }
    for i in 0..3 {
        let v2 = rotate_prism_array(&v, i);
        pyramid_to_tets(ctx, [v2[0], v2[3], v2[4], v2[1], cv])?;
    }
    Ok(cv)
}

fn rotate_prism_array(v: &[EHandle; 6], n: usize) -> [EHandle; 6] {
    meshkernel_topology::rotate_prism(v, n)
}

// ---------------------------------------------------------------------
// Quad-to-tris (spec §4.5)
// ---------------------------------------------------------------------

/// `quadToTris`: splits along the `v[0]-v[2]` diagonal.
pub fn quad_to_tris(ctx: &mut TemplateCtx<'_>, v: [EHandle; 4]) -> RefineResult<()> {
    ctx.build(EntityKind::Triangle, &[v[0], v[1], v[2]])?;
    ctx.build(EntityKind::Triangle, &[v[0], v[2], v[3]])?;
    Ok(())
}

/// `quadToTrisGeometric`: picks whichever diagonal is shorter.
pub fn quad_to_tris_geometric(ctx: &mut TemplateCtx<'_>, v: [EHandle; 4]) -> RefineResult<usize> {
    let rotation = if geom::distance(ctx.store, v[1], v[3])? < geom::distance(ctx.store, v[0], v[2])? { 1 } else { 0 };
    let v2: [EHandle; 4] = rotate(EntityKind::Quad, &v, rotation).try_into().unwrap();
    quad_to_tris(ctx, v2)?;
    Ok(rotation)
}

/// `quadToTrisRestricted`: `good` bit 0 = diagonal `0-2` acceptable, bit 1
/// = diagonal `1-3` acceptable. Falls back to the shorter diagonal if
/// both or neither are acceptable. Returns which diagonal was chosen (0
/// or 1).
pub fn quad_to_tris_restricted(ctx: &mut TemplateCtx<'_>, v: [EHandle; 4], good: usize) -> RefineResult<usize> {
    if good == 0x0 || good == 0x3 {
        return quad_to_tris_geometric(ctx, v);
    }
    let rotation = if good == 0x2 { 1 } else { 0 };
    let v2: [EHandle; 4] = rotate(EntityKind::Quad, &v, rotation).try_into().unwrap();
    quad_to_tris(ctx, v2)?;
    Ok(rotation)
}

// ---------------------------------------------------------------------
// Octahedron decomposition (spec §4.5)
// ---------------------------------------------------------------------

/// `octToTets`: fans four tets around the fixed `v[0]-v[5]` diagonal, over
/// the equatorial ring `v[1], v[2], v[3], v[4]` (already in cyclic order).
pub fn oct_to_tets(ctx: &mut TemplateCtx<'_>, v: [EHandle; 6]) -> RefineResult<()> {
    let eq = [v[1], v[2], v[3], v[4]];
    for i in 0..4 {
        ctx.build(EntityKind::Tet, &[v[0], eq[i], eq[(i + 1) % 4], v[5]])?;
    }
    Ok(())
}

/// Brings antipodal pair `n` (0: `(0,5)`, 1: `(1,3)`, 2: `(2,4)`) to the
/// front, preserving the cyclic order of the remaining equatorial ring
/// (derived directly from the octahedron's face adjacency, see
/// `DESIGN.md`).
fn bring_oct_diagonal_front(v: [EHandle; 6], n: usize) -> [EHandle; 6] {
    match n {
        0 => v,
        1 => [v[1], v[2], v[0], v[4], v[5], v[3]],
        2 => [v[2], v[0], v[1], v[5], v[3], v[4]],
        _ => unreachable!("only 3 antipodal pairs"),
    }
}

/// `octToTetsGeometric`: chooses the shortest of the three diagonals
/// `(0,5)`, `(1,3)`, `(2,4)`, tie-broken deterministically by lowest pair
/// index (spec §9 Open Question), then fans around it.
pub fn oct_to_tets_geometric(ctx: &mut TemplateCtx<'_>, v: [EHandle; 6]) -> RefineResult<()> {
    let pairs = [(v[0], v[5]), (v[1], v[3]), (v[2], v[4])];
    let mut best = 0usize;
    let mut best_len = geom::distance(ctx.store, pairs[0].0, pairs[0].1)?;
    for (i, &(a, b)) in pairs.iter().enumerate().skip(1) {
        let len = geom::distance(ctx.store, a, b)?;
        if len < best_len {
            best_len = len;
            best = i;
        }
    }
    let v2 = bring_oct_diagonal_front(v, best);
    oct_to_tets(ctx, v2)
}

// ---------------------------------------------------------------------
// Tet templates (spec §4.4's table; grounded on maTemplates.cc)
// ---------------------------------------------------------------------

/// `splitTet_1`: one edge split, into 2 tets across the split vertex.
pub fn split_tet_1(ctx: &mut TemplateCtx<'_>, v: [EHandle; 4]) -> RefineResult<()> {
    let sv = ctx.split_vert(v[0], v[1])?;
    ctx.build(EntityKind::Tet, &[v[0], sv, v[2], v[3]])?;
    ctx.build(EntityKind::Tet, &[sv, v[1], v[2], v[3]])?;
    Ok(())
}

/// `splitPyramid_1_1`: one of the quad edges (`v[0]-v[1]`) split. Splits
/// off a tet, leaving an unsplit pyramid.
fn split_pyramid_1_1(ctx: &mut TemplateCtx<'_>, v: [EHandle; 5]) -> RefineResult<()> {
    let sv = ctx.split_vert(v[0], v[1])?;
    ctx.build(EntityKind::Tet, &[v[0], sv, v[3], v[4]])?;
    pyramid_to_tets(ctx, [sv, v[1], v[2], v[3], v[4]])
}

/// `splitTet_2_1`: two edges split, sharing a face. A tet splits off
/// leaving a pyramid.
pub fn split_tet_2_1(ctx: &mut TemplateCtx<'_>, v: [EHandle; 4]) -> RefineResult<()> {
    let sv0 = ctx.split_vert(v[0], v[2])?;
    let sv1 = ctx.split_vert(v[1], v[2])?;
    ctx.build(EntityKind::Tet, &[sv0, sv1, v[2], v[3]])?;
    pyramid_to_tets(ctx, [v[0], v[1], sv1, sv0, v[3]])
}

/// `splitTet_2_2`: two opposite edges split, no shared face; treated as
/// two recursive single-edge splits on the two halves.
pub fn split_tet_2_2(ctx: &mut TemplateCtx<'_>, v: [EHandle; 4]) -> RefineResult<()> {
    let sv = ctx.split_vert(v[0], v[1])?;
    split_tet_1(ctx, [v[3], v[2], sv, v[0]])?;
    split_tet_1(ctx, [v[3], v[2], v[1], sv])
}

/// `splitTet_3_1`: all three edges of one face split. Divides into a tet
/// and a pyramid with one split edge.
pub fn split_tet_3_1(ctx: &mut TemplateCtx<'_>, v: [EHandle; 4]) -> RefineResult<()> {
    let sv0 = ctx.split_vert(v[0], v[1])?;
    let sv2 = ctx.split_vert(v[2], v[0])?;
    ctx.build(EntityKind::Tet, &[v[0], sv0, sv2, v[3]])?;
    split_pyramid_1_1(ctx, [v[1], v[2], sv2, sv0, v[3]])
}

/// `splitTet_3_2`: three split edges, variant A — two ambiguous-quad
/// pyramids plus one tet.
pub fn split_tet_3_2(ctx: &mut TemplateCtx<'_>, v: [EHandle; 4]) -> RefineResult<()> {
    let sv0 = ctx.split_vert(v[0], v[1])?;
    let sv1 = ctx.split_vert(v[0], v[2])?;
    let sv2 = ctx.split_vert(v[2], v[3])?;
    pyramid_to_tets(ctx, [sv1, sv2, v[3], v[0], sv0])?;
    pyramid_to_tets(ctx, [sv1, sv0, v[1], v[2], sv2])?;
    ctx.build(EntityKind::Tet, &[sv0, sv2, v[3], v[1]])?;
    Ok(())
}

/// `splitTet_3_3`: three split edges, variant B — the mirror pattern of
/// `split_tet_3_2` under a different rotation (spec §9 Open Question:
/// confirmed a genuinely distinct case in the original, not derivable by
/// rotating 3.2's wiring).
pub fn split_tet_3_3(ctx: &mut TemplateCtx<'_>, v: [EHandle; 4]) -> RefineResult<()> {
    let sv0 = ctx.split_vert(v[0], v[1])?;
    let sv1 = ctx.split_vert(v[1], v[2])?;
    let sv2 = ctx.split_vert(v[2], v[3])?;
    pyramid_to_tets(ctx, [v[0], sv0, sv1, v[2], sv2])?;
    pyramid_to_tets(ctx, [v[1], v[3], sv2, sv1, sv0])?;
    ctx.build(EntityKind::Tet, &[v[0], sv0, sv2, v[3]])?;
    Ok(())
}

/// The element-local tet coordinate of a split placed at parameter
/// `place` along edge `(v0, v1)` (`getSplitXi`): vertex 1 occupies
/// barycentric slot 0, vertex 2 slot 1, vertex 3 slot 2, vertex 0 the
/// "leftover" weight.
fn split_xi(place: f64, v0: usize, v1: usize) -> [f64; 3] {
    let coord_of = [3usize, 0, 1, 2];
    let mut xi = [0.0; 4];
    xi[coord_of[v1]] = place;
    xi[coord_of[v0]] = 1.0 - place;
    [xi[0], xi[1], xi[2]]
}

fn add_xi(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

fn scale_xi(a: [f64; 3], s: f64) -> [f64; 3] {
    [a[0] * s, a[1] * s, a[2] * s]
}

/// Shared plumbing between `split_tet_3_4` and `split_tet_4_2`: tries the
/// prism good case first; falls back to the bad (centroid) case,
/// computing the centroid's element-local coordinate in the *original*
/// (unrotated) tet's frame and interpolating its position through the
/// tet's straight-sided geometry.
fn split_tet_prism_to_tets(
    ctx: &mut TemplateCtx<'_>,
    tet_verts: [EHandle; 4],
    pv: [EHandle; 6],
    centroid_xi_rotated: [f64; 3],
    rotation: usize,
) -> RefineResult<bool> {
    let code = prism_diagonal_code(ctx.store, &pv)?;
    if checkable_prism_diagonal_code(code) {
        prism_to_tets_good_case(ctx, pv, code)?;
        return Ok(true);
    }
    let xi = meshkernel_topology::unrotate_tet_xi(centroid_xi_rotated, rotation);
    let point = geom::tet_map_local_to_global(ctx.store, &tet_verts, xi)?;
    prism_to_tets_bad_case(ctx, pv, code, point, ctx.model, xi)?;
    Ok(false)
}

/// `splitTet_3_4`: three edges meeting at one vertex (`v[3]`). A corner
/// tet is removed, leaving a prism that may hit the bad case.
pub fn split_tet_3_4(ctx: &mut TemplateCtx<'_>, v: [EHandle; 4], rotation: usize, original: [EHandle; 4]) -> RefineResult<()> {
    let mut sv = [v[0]; 3];
    let mut places = [0.0; 3];
    for i in 0..3 {
        let (s, t) = ctx.placed_split_vert(v[3], v[i])?;
        sv[i] = s;
        places[i] = t;
    }
    ctx.build(EntityKind::Tet, &[sv[0], sv[1], sv[2], v[3]])?;
    let pv = [v[0], v[1], v[2], sv[0], sv[1], sv[2]];
    let mut centroid_xi = [0.0; 3];
    for i in 0..3 {
        centroid_xi = add_xi(centroid_xi, split_xi(places[i], 3, i));
    }
    centroid_xi = add_xi(centroid_xi, [0.0, 0.0, 0.0]);
    centroid_xi = add_xi(centroid_xi, [1.0, 0.0, 0.0]);
    centroid_xi = add_xi(centroid_xi, [0.0, 1.0, 0.0]);
    centroid_xi = scale_xi(centroid_xi, 1.0 / 6.0);
    split_tet_prism_to_tets(ctx, original, pv, centroid_xi, rotation)?;
    Ok(())
}

/// `getPrismDiagonalChoices`/`quadToTrisRestricted` combo used by
/// `split_tet_4_2` and `split_tet_5` to decide the ambiguous interior
/// quad so that neither resulting prism hits the bad case when a good
/// choice exists.
fn combined_prism_choices(ctx: &TemplateCtx<'_>, p0: &[EHandle; 6], p1: &[EHandle; 6]) -> RefineResult<usize> {
    let ok0 = prism_diagonal_choices(ctx.store, p0)?;
    let ok1 = prism_diagonal_choices(ctx.store, p1)?;
    Ok(ok0 & ok1)
}

/// `splitTet_4_2`: four split edges divide a tet into two prisms sharing
/// an undetermined interior quad; that quad's diagonal is chosen to avoid
/// the bad case in both prisms when possible.
pub fn split_tet_4_2(ctx: &mut TemplateCtx<'_>, v: [EHandle; 4], rotation: usize, original: [EHandle; 4]) -> RefineResult<()> {
    let (sv0, t0) = ctx.placed_split_vert(v[0], v[2])?;
    let (sv1, t1) = ctx.placed_split_vert(v[1], v[2])?;
    let (sv2, t2) = ctx.placed_split_vert(v[1], v[3])?;
    let (sv3, t3) = ctx.placed_split_vert(v[0], v[3])?;
    let p0 = [sv0, sv1, v[2], sv3, sv2, v[3]];
    let p1 = [sv2, sv1, v[1], sv3, sv0, v[0]];
    let ok = combined_prism_choices(ctx, &p0, &p1)?;
    let _diag = quad_to_tris_restricted(ctx, [sv0, sv1, sv2, sv3], ok)?;

    let centroid_xi_for = |which_prism: usize| -> [f64; 3] {
        let mut xi = split_xi(t0, 0, 2);
        xi = add_xi(xi, split_xi(t1, 1, 2));
        xi = add_xi(xi, split_xi(t2, 1, 3));
        xi = add_xi(xi, split_xi(t3, 0, 3));
        if which_prism == 0 {
            xi = add_xi(xi, [0.0, 1.0, 0.0]); // tet vertex 2
            xi = add_xi(xi, [0.0, 0.0, 1.0]); // tet vertex 3
        } else {
            xi = add_xi(xi, [0.0, 0.0, 0.0]); // tet vertex 0
            xi = add_xi(xi, [1.0, 0.0, 0.0]); // tet vertex 1
        }
        scale_xi(xi, 1.0 / 6.0)
    };

    split_tet_prism_to_tets(ctx, original, p0, centroid_xi_for(0), rotation)?;
    split_tet_prism_to_tets(ctx, original, p1, centroid_xi_for(1), rotation)?;
    Ok(())
}

/// `splitTet_4_1`: four split edges, three on one face. Splits into two
/// tets and two pyramids.
pub fn split_tet_4_1(ctx: &mut TemplateCtx<'_>, v: [EHandle; 4]) -> RefineResult<()> {
    let sv0 = ctx.split_vert(v[0], v[1])?;
    let sv1 = ctx.split_vert(v[1], v[2])?;
    let sv2 = ctx.split_vert(v[2], v[0])?;
    let sv3 = ctx.split_vert(v[3], v[2])?;
    ctx.build(EntityKind::Tet, &[sv0, sv1, sv2, sv3])?;
    ctx.build(EntityKind::Tet, &[sv2, sv1, v[2], sv3])?;
    pyramid_to_tets(ctx, [v[0], sv2, sv3, v[3], sv0])?;
    pyramid_to_tets(ctx, [v[1], v[3], sv3, sv1, sv0])?;
    Ok(())
}

/// `splitTet_5`: five edges split, creating two tets, a pyramid and a
/// prism; the quad between the pyramid and prism is chosen to avoid the
/// prism bad case.
pub fn split_tet_5(ctx: &mut TemplateCtx<'_>, v: [EHandle; 4]) -> RefineResult<()> {
    let q0 = ctx.split_vert(v[0], v[2])?;
    let q1 = ctx.split_vert(v[1], v[2])?;
    let q2 = ctx.split_vert(v[1], v[3])?;
    let q3 = ctx.split_vert(v[0], v[3])?;
    let q4 = ctx.split_vert(v[0], v[1])?;
    let py = [q0, q1, q2, q3, q4];
    let pr = [q0, q1, v[2], q3, q2, v[3]];
    let ok = prism_diagonal_choices(ctx.store, &pr)?;
    quad_to_tris_restricted(ctx, [py[0], py[1], py[2], py[3]], ok)?;
    pyramid_to_tets(ctx, py)?;
    let code = prism_diagonal_code(ctx.store, &pr)?;
    if !checkable_prism_diagonal_code(code) {
        return Err(RefineError::TopologyContradiction(
            ctx.parent,
            "splitTet_5's prism must resolve to the good case",
        ));
    }
    prism_to_tets_good_case(ctx, pr, code)?;
    ctx.build(EntityKind::Tet, &[v[0], q4, q0, q3])?;
    ctx.build(EntityKind::Tet, &[v[1], q1, q4, q2])?;
    Ok(())
}

/// `splitTet_6`: uniform refinement — 4 corner tets via rotation plus a
/// central octahedron decomposed by its shortest diagonal.
pub fn split_tet_6(ctx: &mut TemplateCtx<'_>, v: [EHandle; 4]) -> RefineResult<()> {
    use meshkernel_topology::TET_EDGE_VERTS;
    let mut ov = [v[0]; 6];
    for (i, &[a, b]) in TET_EDGE_VERTS.iter().enumerate() {
        ov[i] = ctx.split_vert(v[a], v[b])?;
    }
    oct_to_tets_geometric(ctx, ov)?;
    for i in 0..4 {
        let v2 = meshkernel_topology::rotate_tet(&v, i * 3);
        let mut tv = [v2[0]; 4];
        for j in 1..4 {
            tv[j] = ctx.split_vert(v2[0], v2[j])?;
        }
        ctx.build(EntityKind::Tet, &tv)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------
// Quad templates
// ---------------------------------------------------------------------

/// `splitQuad_2`: splits the quad in half along edges `v[0]-v[1]` and
/// `v[2]-v[3]`, producing two sub-quads.
pub fn split_quad_2(ctx: &mut TemplateCtx<'_>, v: [EHandle; 4]) -> RefineResult<()> {
    let sv0 = ctx.split_vert(v[0], v[1])?;
    let sv1 = ctx.split_vert(v[2], v[3])?;
    ctx.build(EntityKind::Quad, &[v[0], sv0, sv1, v[3]])?;
    ctx.build(EntityKind::Quad, &[sv0, v[1], v[2], sv1])?;
    Ok(())
}

/// `splitQuad_4`: all four edges split; creates a centroid vertex and
/// four sub-quads. Per spec §9 Open Question, the centroid's parametric
/// coordinate is left at the zero placeholder (the source itself defers
/// this with a `TODO`), not invented.
pub fn split_quad_4(ctx: &mut TemplateCtx<'_>, q: EHandle, v: [EHandle; 4]) -> RefineResult<()> {
    let (sv0, t0) = ctx.placed_split_vert(v[0], v[1])?;
    let (sv1, t1) = ctx.placed_split_vert(v[1], v[2])?;
    let (sv2, t2) = ctx.placed_split_vert(v[3], v[2])?;
    let (sv3, t3) = ctx.placed_split_vert(v[0], v[3])?;
    let x = (t0 + t2) / 2.0 * 2.0 - 1.0;
    let y = (t1 + t3) / 2.0 * 2.0 - 1.0;
    let point = geom::quad_map_local_to_global(ctx.store, &v, x, y)?;
    let model = ctx.store.get_model(q)?;
    let cv = ctx.build_centroid_vertex(point, model, [x, y, 0.0]);
    let sv = [sv0, sv1, sv2, sv3];
    for i in 0..4 {
        let v2: [EHandle; 4] = rotate(EntityKind::Quad, &v, i).try_into().unwrap();
        let sv2: [EHandle; 4] = rotate(EntityKind::Quad, &sv, i).try_into().unwrap();
        ctx.build(EntityKind::Quad, &[v2[0], sv2[0], cv, sv2[3]])?;
    }
    Ok(())
}

// ---------------------------------------------------------------------
// Prism templates
// ---------------------------------------------------------------------

/// `splitPrism_0`: no edges split, but the prism's diagonals were
/// resolved by its neighbours; just dispatches to the good case.
pub fn split_prism_0(ctx: &mut TemplateCtx<'_>, v: [EHandle; 6]) -> RefineResult<()> {
    let code = prism_diagonal_code(ctx.store, &v)?;
    if !checkable_prism_diagonal_code(code) {
        return Err(RefineError::TopologyContradiction(ctx.parent, "splitPrism_0 requires a resolved diagonal code"));
    }
    prism_to_tets_good_case(ctx, v, code)
}

/// `splitPrism_2`: edges `v[0]-v[1]` and `v[3]-v[4]` split; the prism is
/// cut into two prisms by the quad face between them.
pub fn split_prism_2(ctx: &mut TemplateCtx<'_>, v: [EHandle; 6]) -> RefineResult<()> {
    let sv0 = ctx.split_vert(v[0], v[1])?;
    let sv1 = ctx.split_vert(v[3], v[4])?;
    ctx.build(EntityKind::Prism, &[v[0], sv0, v[2], v[3], sv1, v[5]])?;
    ctx.build(EntityKind::Prism, &[sv0, v[1], v[2], sv1, v[4], v[5]])?;
    Ok(())
}

/// `splitPrism_6`: given `v` (the cap triangles of one half-height
/// sub-prism) and `sv` (the matching split vertices on the other cap),
/// builds the center sub-prism plus the three corner sub-prisms by
/// rotation. Shared by `split_prism_9`'s two half-height calls.
fn split_prism_6(ctx: &mut TemplateCtx<'_>, v: [EHandle; 6], sv: [EHandle; 6]) -> RefineResult<()> {
    ctx.build(EntityKind::Prism, &sv)?;
    for i in 0..3 {
        let v2 = rotate_prism_array(&v, i);
        let sv2 = rotate_prism_array(&sv, i);
        ctx.build(EntityKind::Prism, &[sv2[0], v2[1], sv2[1], sv2[3], v2[4], sv2[4]])?;
    }
    Ok(())
}

/// `splitPrism_9`: all nine edges split. Bisects the prism at mid-height
/// (through the three vertical-edge midpoints and the three side quads'
/// centroid vertices) and hands each half to `split_prism_6`.
pub fn split_prism_9(ctx: &mut TemplateCtx<'_>, v: [EHandle; 6]) -> RefineResult<()> {
    let botv = [ctx.split_vert(v[0], v[1])?, ctx.split_vert(v[1], v[2])?, ctx.split_vert(v[2], v[0])?];
    let midv = [ctx.split_vert(v[0], v[3])?, ctx.split_vert(v[1], v[4])?, ctx.split_vert(v[2], v[5])?];
    let topv = [ctx.split_vert(v[3], v[4])?, ctx.split_vert(v[4], v[5])?, ctx.split_vert(v[5], v[3])?];

    let quad_faces = [
        [v[0], v[1], v[4], v[3]],
        [v[1], v[2], v[5], v[4]],
        [v[2], v[0], v[3], v[5]],
    ];
    let mut cenv = [v[0]; 3];
    for (i, qv) in quad_faces.iter().enumerate() {
        let face = meshkernel_mesh::find_element(ctx.store, EntityKind::Quad, qv)?
            .ok_or(RefineError::TopologyContradiction(ctx.parent, "splitPrism_9 expects its quad faces to exist"))?;
        cenv[i] = ctx
            .splits
            .find_quad_centroid(face)
            .ok_or(RefineError::TopologyContradiction(ctx.parent, "splitPrism_9 expects a centroid on each quad face"))?;
    }

    split_prism_6(ctx, [midv[0], midv[1], midv[2], v[3], v[4], v[5]], [cenv[0], cenv[1], cenv[2], topv[0], topv[1], topv[2]])?;
    split_prism_6(ctx, [v[0], v[1], v[2], midv[0], midv[1], midv[2]], [botv[0], botv[1], botv[2], cenv[0], cenv[1], cenv[2]])?;
    Ok(())
}

// ---------------------------------------------------------------------
// Pyramid templates
// ---------------------------------------------------------------------

/// `splitPyramid_2`: base edges `v[0]-v[1]` and `v[2]-v[3]` split; the
/// pyramid becomes two new pyramids.
pub fn split_pyramid_2(ctx: &mut TemplateCtx<'_>, v: [EHandle; 5]) -> RefineResult<()> {
    let sv0 = ctx.split_vert(v[0], v[1])?;
    let sv1 = ctx.split_vert(v[2], v[3])?;
    ctx.build(EntityKind::Pyramid, &[v[0], sv0, sv1, v[3], v[4]])?;
    ctx.build(EntityKind::Pyramid, &[sv0, v[1], v[2], sv1, v[4]])?;
    Ok(())
}

/// `splitPyramid_4`: uniform refinement of a pyramid — four new pyramids
/// and four tets around the base, plus a central octahedron.
pub fn split_pyramid_4(ctx: &mut TemplateCtx<'_>, v: [EHandle; 5]) -> RefineResult<()> {
    let botv = [
        ctx.split_vert(v[0], v[1])?,
        ctx.split_vert(v[1], v[2])?,
        ctx.split_vert(v[2], v[3])?,
        ctx.split_vert(v[3], v[0])?,
    ];
    let midv = [
        ctx.split_vert(v[0], v[4])?,
        ctx.split_vert(v[1], v[4])?,
        ctx.split_vert(v[2], v[4])?,
        ctx.split_vert(v[3], v[4])?,
    ];
    let base = [v[0], v[1], v[2], v[3]];
    let quad = meshkernel_mesh::find_element(ctx.store, EntityKind::Quad, &base)?
        .ok_or(RefineError::TopologyContradiction(ctx.parent, "splitPyramid_4 expects its base quad to exist"))?;
    let cv = ctx
        .splits
        .find_quad_centroid(quad)
        .ok_or(RefineError::TopologyContradiction(ctx.parent, "splitPyramid_4 expects a centroid on its base quad"))?;

    for i in 0..4 {
        let midv2: [EHandle; 4] = rotate(EntityKind::Quad, &midv, i).try_into().unwrap();
        let botv2: [EHandle; 4] = rotate(EntityKind::Quad, &botv, i).try_into().unwrap();
        let v2: [EHandle; 4] = rotate(EntityKind::Quad, &base, i).try_into().unwrap();
        ctx.build(EntityKind::Pyramid, &[botv2[0], v2[1], botv2[1], cv, midv2[1]])?;
        ctx.build(EntityKind::Tet, &[midv2[0], midv2[1], botv2[0], cv])?;
    }
    let octv = [cv, midv[0], midv[1], midv[2], midv[3], v[4]];
    oct_to_tets_geometric(ctx, octv)?;
    Ok(())
}

/// `pyramidToTets` doubling as pyramid template index 0 (no base edges
/// split, diagonal resolved by a neighbour).
pub fn split_pyramid_0(ctx: &mut TemplateCtx<'_>, v: [EHandle; 5]) -> RefineResult<()> {
    pyramid_to_tets(ctx, v)
}
