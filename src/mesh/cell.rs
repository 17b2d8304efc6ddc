//! linear cell types and their interpolation functions
//!
//! Point location inside a cell returns the interpolation weights of the cell's points.
//! Simplices are inverted directly, bilinear and trilinear cells are inverted with a
//! Newton iteration on their parametric coordinates.

/// parametric slack allowed when deciding if a point is inside a cell
const PARAMETRIC_TOL: f64 = 1e-6;
const NEWTON_ITERATIONS: usize = 20;
const NEWTON_CONVERGENCE: f64 = 1e-12;

/// VTK cell type identifiers, as stored in the `CELL_TYPES` section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellType {
    Vertex,
    PolyVertex,
    Line,
    PolyLine,
    Triangle,
    TriangleStrip,
    Polygon,
    Pixel,
    Quad,
    Tetra,
    Voxel,
    Hexahedron,
    Wedge,
    Pyramid,
    /// any cell type identifier this crate does not know about
    Other(u32),
}

impl CellType {
    pub fn from_id(id: u32) -> Self {
        match id {
            1 => Self::Vertex,
            2 => Self::PolyVertex,
            3 => Self::Line,
            4 => Self::PolyLine,
            5 => Self::Triangle,
            6 => Self::TriangleStrip,
            7 => Self::Polygon,
            8 => Self::Pixel,
            9 => Self::Quad,
            10 => Self::Tetra,
            11 => Self::Voxel,
            12 => Self::Hexahedron,
            13 => Self::Wedge,
            14 => Self::Pyramid,
            other => Self::Other(other),
        }
    }

    pub fn id(&self) -> u32 {
        match self {
            Self::Vertex => 1,
            Self::PolyVertex => 2,
            Self::Line => 3,
            Self::PolyLine => 4,
            Self::Triangle => 5,
            Self::TriangleStrip => 6,
            Self::Polygon => 7,
            Self::Pixel => 8,
            Self::Quad => 9,
            Self::Tetra => 10,
            Self::Voxel => 11,
            Self::Hexahedron => 12,
            Self::Wedge => 13,
            Self::Pyramid => 14,
            Self::Other(id) => *id,
        }
    }

    /// the number of points a cell of this type must have, `None` for variable size cells
    pub fn num_points(&self) -> Option<usize> {
        match self {
            Self::Vertex => Some(1),
            Self::Line => Some(2),
            Self::Triangle => Some(3),
            Self::Pixel | Self::Quad | Self::Tetra => Some(4),
            Self::Pyramid => Some(5),
            Self::Wedge => Some(6),
            Self::Voxel | Self::Hexahedron => Some(8),
            Self::PolyVertex
            | Self::PolyLine
            | Self::TriangleStrip
            | Self::Polygon
            | Self::Other(_) => None,
        }
    }

    /// whether [`CellType::interpolation_weights`] can locate points in this cell type
    pub fn supports_probing(&self) -> bool {
        matches!(
            self,
            Self::Vertex
                | Self::Line
                | Self::Triangle
                | Self::Pixel
                | Self::Quad
                | Self::Tetra
                | Self::Voxel
                | Self::Hexahedron
                | Self::Wedge
        )
    }

    /// Find the interpolation weights of `x` inside the cell made of `points`.
    ///
    /// `tol` is the distance a point may sit away from lower dimensional cells (vertices,
    /// lines, and planar cells) and still count as inside. Returns `false` if the point is
    /// outside the cell, the cell is degenerate, or the cell type is not supported. On
    /// success `weights` holds one weight per cell point.
    pub fn interpolation_weights(
        &self,
        points: &[[f64; 3]],
        x: [f64; 3],
        tol: f64,
        weights: &mut Vec<f64>,
    ) -> bool {
        weights.clear();

        if let Some(n) = self.num_points() {
            if points.len() != n {
                return false;
            }
        }

        match self {
            Self::Vertex => vertex_weights(points, x, tol, weights),
            Self::Line => line_weights(points, x, tol, weights),
            Self::Triangle => triangle_weights(points, x, tol, weights),
            Self::Quad => quad_weights(points, x, tol, weights),
            Self::Pixel => {
                let quad = [points[0], points[1], points[3], points[2]];
                if !quad_weights(&quad, x, tol, weights) {
                    return false;
                }
                weights.swap(2, 3);
                true
            }
            Self::Tetra => tetra_weights(points, x, weights),
            Self::Hexahedron => isoparametric_3d(points, x, [0.5; 3], &HEXAHEDRON, weights),
            Self::Voxel => {
                let hex = VOXEL_TO_HEX.map(|i| points[i]);
                let mut hex_weights = Vec::with_capacity(8);
                if !isoparametric_3d(&hex, x, [0.5; 3], &HEXAHEDRON, &mut hex_weights) {
                    return false;
                }
                weights.resize(8, 0.0);
                for (hex_index, voxel_index) in VOXEL_TO_HEX.iter().enumerate() {
                    weights[*voxel_index] = hex_weights[hex_index];
                }
                true
            }
            Self::Wedge => {
                isoparametric_3d(points, x, [1. / 3., 1. / 3., 0.5], &WEDGE, weights)
            }
            _ => false,
        }
    }
}

impl std::fmt::Display for CellType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Other(id) => write!(f, "cell type {id}"),
            known => write!(f, "{known:?}"),
        }
    }
}

/// hexahedron point ordering expressed in voxel point indices
const VOXEL_TO_HEX: [usize; 8] = [0, 1, 3, 2, 4, 5, 7, 6];

fn inside_unit(value: f64) -> bool {
    value >= -PARAMETRIC_TOL && value <= 1.0 + PARAMETRIC_TOL
}

fn vertex_weights(points: &[[f64; 3]], x: [f64; 3], tol: f64, weights: &mut Vec<f64>) -> bool {
    if norm(sub(x, points[0])) <= tol {
        weights.push(1.0);
        true
    } else {
        false
    }
}

fn line_weights(points: &[[f64; 3]], x: [f64; 3], tol: f64, weights: &mut Vec<f64>) -> bool {
    let direction = sub(points[1], points[0]);
    let length2 = dot(direction, direction);

    if length2 == 0.0 {
        return false;
    }

    let t = dot(sub(x, points[0]), direction) / length2;
    if !inside_unit(t) {
        return false;
    }

    let t = t.clamp(0.0, 1.0);
    let closest = add(points[0], scale(direction, t));

    if norm(sub(x, closest)) > tol {
        return false;
    }

    weights.extend([1.0 - t, t]);
    true
}

fn triangle_weights(points: &[[f64; 3]], x: [f64; 3], tol: f64, weights: &mut Vec<f64>) -> bool {
    let e1 = sub(points[1], points[0]);
    let e2 = sub(points[2], points[0]);
    let normal = cross(e1, e2);
    let area2 = norm(normal);

    if area2 == 0.0 {
        return false;
    }

    let v = sub(x, points[0]);

    // distance from the plane of the triangle
    if (dot(v, normal) / area2).abs() > tol {
        return false;
    }

    let d00 = dot(e1, e1);
    let d01 = dot(e1, e2);
    let d11 = dot(e2, e2);
    let d20 = dot(v, e1);
    let d21 = dot(v, e2);
    let denom = d00 * d11 - d01 * d01;

    let s = (d11 * d20 - d01 * d21) / denom;
    let t = (d00 * d21 - d01 * d20) / denom;
    let w = [1.0 - s - t, s, t];

    if w.iter().any(|w| *w < -PARAMETRIC_TOL) {
        return false;
    }

    weights.extend(w);
    true
}

/// bilinear quad that may be oriented anywhere in space, inverted in its own plane
fn quad_weights(points: &[[f64; 3]], x: [f64; 3], tol: f64, weights: &mut Vec<f64>) -> bool {
    // Newell normal, robust to slightly warped quads
    let mut normal = [0.0; 3];
    let mut center = [0.0; 3];
    for i in 0..4 {
        let a = points[i];
        let b = points[(i + 1) % 4];
        normal[0] += (a[1] - b[1]) * (a[2] + b[2]);
        normal[1] += (a[2] - b[2]) * (a[0] + b[0]);
        normal[2] += (a[0] - b[0]) * (a[1] + b[1]);
        center = add(center, scale(a, 0.25));
    }

    let length = norm(normal);
    if length == 0.0 {
        return false;
    }
    let normal = scale(normal, 1.0 / length);

    if dot(sub(x, center), normal).abs() > tol {
        return false;
    }

    // local in-plane basis
    let edge = sub(points[1], points[0]);
    let edge_length = norm(edge);
    if edge_length == 0.0 {
        return false;
    }
    let u = scale(edge, 1.0 / edge_length);
    let v = cross(normal, u);

    let project = |p: [f64; 3]| {
        let d = sub(p, center);
        [dot(d, u), dot(d, v)]
    };

    let local = [
        project(points[0]),
        project(points[1]),
        project(points[2]),
        project(points[3]),
    ];
    let target = project(x);

    let mut r = [0.5, 0.5];
    let mut converged = false;

    for _ in 0..NEWTON_ITERATIONS {
        let n = quad_shape(r);
        let dn = quad_derivatives(r);

        let mut residual = [-target[0], -target[1]];
        let mut jac = [[0.0; 2]; 2];

        for i in 0..4 {
            for dim in 0..2 {
                residual[dim] += n[i] * local[i][dim];
                jac[dim][0] += dn[i][0] * local[i][dim];
                jac[dim][1] += dn[i][1] * local[i][dim];
            }
        }

        let det = jac[0][0] * jac[1][1] - jac[0][1] * jac[1][0];
        if det == 0.0 || !det.is_finite() {
            return false;
        }

        let dr = (residual[0] * jac[1][1] - residual[1] * jac[0][1]) / det;
        let ds = (jac[0][0] * residual[1] - jac[1][0] * residual[0]) / det;

        r[0] -= dr;
        r[1] -= ds;

        if dr.abs().max(ds.abs()) < NEWTON_CONVERGENCE {
            converged = true;
            break;
        }
    }

    if !converged || !inside_unit(r[0]) || !inside_unit(r[1]) {
        return false;
    }

    weights.extend(quad_shape(r));
    true
}

fn quad_shape([r, s]: [f64; 2]) -> [f64; 4] {
    [(1. - r) * (1. - s), r * (1. - s), r * s, (1. - r) * s]
}

fn quad_derivatives([r, s]: [f64; 2]) -> [[f64; 2]; 4] {
    [
        [-(1. - s), -(1. - r)],
        [1. - s, -r],
        [s, r],
        [-s, 1. - r],
    ]
}

fn tetra_weights(points: &[[f64; 3]], x: [f64; 3], weights: &mut Vec<f64>) -> bool {
    let columns = [
        sub(points[1], points[0]),
        sub(points[2], points[0]),
        sub(points[3], points[0]),
    ];

    let Some([a, b, c]) = solve3(columns, sub(x, points[0])) else {
        return false;
    };

    let w = [1.0 - a - b - c, a, b, c];
    if w.iter().any(|w| *w < -PARAMETRIC_TOL) {
        return false;
    }

    weights.extend(w);
    true
}

/// shape functions and derivatives of a 3D isoparametric cell
struct Isoparametric {
    shape: fn([f64; 3], &mut Vec<f64>),
    derivatives: fn([f64; 3], &mut Vec<[f64; 3]>),
    inside: fn([f64; 3]) -> bool,
}

const HEXAHEDRON: Isoparametric = Isoparametric {
    shape: hexahedron_shape,
    derivatives: hexahedron_derivatives,
    inside: |p| p.iter().all(|v| inside_unit(*v)),
};

const WEDGE: Isoparametric = Isoparametric {
    shape: wedge_shape,
    derivatives: wedge_derivatives,
    inside: |[r, s, t]| {
        r >= -PARAMETRIC_TOL
            && s >= -PARAMETRIC_TOL
            && r + s <= 1.0 + PARAMETRIC_TOL
            && inside_unit(t)
    },
};

fn hexahedron_shape([r, s, t]: [f64; 3], out: &mut Vec<f64>) {
    let (rm, sm, tm) = (1. - r, 1. - s, 1. - t);
    out.clear();
    out.extend([
        rm * sm * tm,
        r * sm * tm,
        r * s * tm,
        rm * s * tm,
        rm * sm * t,
        r * sm * t,
        r * s * t,
        rm * s * t,
    ]);
}

fn hexahedron_derivatives([r, s, t]: [f64; 3], out: &mut Vec<[f64; 3]>) {
    let (rm, sm, tm) = (1. - r, 1. - s, 1. - t);
    out.clear();
    out.extend([
        [-sm * tm, -rm * tm, -rm * sm],
        [sm * tm, -r * tm, -r * sm],
        [s * tm, r * tm, -r * s],
        [-s * tm, rm * tm, -rm * s],
        [-sm * t, -rm * t, rm * sm],
        [sm * t, -r * t, r * sm],
        [s * t, r * t, r * s],
        [-s * t, rm * t, rm * s],
    ]);
}

fn wedge_shape([r, s, t]: [f64; 3], out: &mut Vec<f64>) {
    let u = 1. - r - s;
    out.clear();
    out.extend([
        u * (1. - t),
        r * (1. - t),
        s * (1. - t),
        u * t,
        r * t,
        s * t,
    ]);
}

fn wedge_derivatives([r, s, t]: [f64; 3], out: &mut Vec<[f64; 3]>) {
    let u = 1. - r - s;
    out.clear();
    out.extend([
        [-(1. - t), -(1. - t), -u],
        [1. - t, 0., -r],
        [0., 1. - t, -s],
        [-t, -t, u],
        [t, 0., r],
        [0., t, s],
    ]);
}

fn isoparametric_3d(
    points: &[[f64; 3]],
    x: [f64; 3],
    start: [f64; 3],
    cell: &Isoparametric,
    weights: &mut Vec<f64>,
) -> bool {
    let mut p = start;
    let mut converged = false;
    let mut derivatives = Vec::with_capacity(points.len());

    for _ in 0..NEWTON_ITERATIONS {
        (cell.shape)(p, weights);
        (cell.derivatives)(p, &mut derivatives);

        let mut residual = scale(x, -1.0);
        // columns of the jacobian: d(position)/d(r), d/ds, d/dt
        let mut columns = [[0.0; 3]; 3];

        for (i, point) in points.iter().enumerate() {
            residual = add(residual, scale(*point, weights[i]));
            for (param, column) in columns.iter_mut().enumerate() {
                *column = add(*column, scale(*point, derivatives[i][param]));
            }
        }

        let Some(delta) = solve3(columns, residual) else {
            weights.clear();
            return false;
        };

        p = sub(p, delta);

        if delta.iter().all(|d| d.abs() < NEWTON_CONVERGENCE) {
            converged = true;
            break;
        }
    }

    if !converged || !(cell.inside)(p) {
        weights.clear();
        return false;
    }

    (cell.shape)(p, weights);
    true
}

/// solve `[c0 c1 c2] * out = rhs` with Cramer's rule
fn solve3(columns: [[f64; 3]; 3], rhs: [f64; 3]) -> Option<[f64; 3]> {
    let det = dot(columns[0], cross(columns[1], columns[2]));

    if det == 0.0 || !det.is_finite() {
        return None;
    }

    Some([
        dot(rhs, cross(columns[1], columns[2])) / det,
        dot(columns[0], cross(rhs, columns[2])) / det,
        dot(columns[0], cross(columns[1], rhs)) / det,
    ])
}

fn add(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn scale(a: [f64; 3], s: f64) -> [f64; 3] {
    [a[0] * s, a[1] * s, a[2] * s]
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn norm(a: [f64; 3]) -> f64 {
    dot(a, a).sqrt()
}
