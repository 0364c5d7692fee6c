//! Per-vertex tangent frames for normal mapping (Lengyel's method).

use corelib::{Vec2, Vec3};

/// UV triangles whose parametric area is below this contribute nothing.
const DEGENERATE_UV_EPSILON: f32 = 1e-12;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tangents {
    /// `xyz` is the tangent, `w` the bitangent handedness (`±1`).
    pub tangents: Vec<[f32; 4]>,
    /// Triangles skipped because their texture mapping has no area.
    pub degenerate_triangles: usize,
}

/// Compute one tangent per vertex. All slices are indexed by the dense
/// vertex index used in `triangles`, and must have equal length.
pub fn compute_tangents(
    positions: &[[f32; 3]],
    normals: &[[f32; 3]],
    texcoords: &[[f32; 2]],
    triangles: &[[u32; 3]],
) -> Tangents {
    let vertex_count = positions.len();
    debug_assert_eq!(normals.len(), vertex_count);
    debug_assert_eq!(texcoords.len(), vertex_count);

    let mut tan1 = vec![Vec3::ZERO; vertex_count];
    let mut tan2 = vec![Vec3::ZERO; vertex_count];
    let mut degenerate_triangles = 0;

    for &[i1, i2, i3] in triangles {
        let [i1, i2, i3] = [i1 as usize, i2 as usize, i3 as usize];

        let v1 = Vec3::from_array(positions[i1]);
        let e1 = Vec3::from_array(positions[i2]) - v1;
        let e2 = Vec3::from_array(positions[i3]) - v1;

        let w1 = Vec2::from_array(texcoords[i1]);
        let d1 = Vec2::from_array(texcoords[i2]) - w1;
        let d2 = Vec2::from_array(texcoords[i3]) - w1;

        let det = d1.x * d2.y - d2.x * d1.y;
        if det.abs() < DEGENERATE_UV_EPSILON {
            degenerate_triangles += 1;
            continue;
        }
        let r = det.recip();

        let sdir = (e1 * d2.y - e2 * d1.y) * r;
        let tdir = (e2 * d1.x - e1 * d2.x) * r;

        for i in [i1, i2, i3] {
            tan1[i] += sdir;
            tan2[i] += tdir;
        }
    }

    let tangents = normals
        .iter()
        .zip(tan1.iter().zip(&tan2))
        .map(|(&n, (&t, &b))| {
            let n = Vec3::from_array(n).normalize_or_zero();

            // Gram-Schmidt orthogonalize
            let tangent = (t - n * n.dot(t))
                .try_normalize()
                .unwrap_or_else(|| fallback_tangent(n));

            let w = if n.cross(t).dot(b) < 0.0 { -1.0 } else { 1.0 };
            tangent.extend(w).to_array()
        })
        .collect();

    Tangents {
        tangents,
        degenerate_triangles,
    }
}

/// Any unit vector perpendicular to `n`, for vertices whose accumulated
/// tangent is zero or parallel to the normal.
fn fallback_tangent(n: Vec3) -> Vec3 {
    if n == Vec3::ZERO {
        Vec3::X
    } else {
        n.any_orthonormal_vector()
    }
}
