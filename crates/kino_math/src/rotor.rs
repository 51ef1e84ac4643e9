use crate::DVec3;

/// Precomputed rotation coefficients for world-space quadric evaluation.
///
/// For a shape rotated by Euler angles (applied Z, then Y, then X about the
/// shape's center), the squared components of the rotated offset expand into
/// quadratics in the ray parameter. Building those quadratics needs the nine
/// rotation-matrix coefficients, their squares, and their in-row pairwise
/// products. Caching them per shape replaces an inverse-rotation of every ray
/// with a handful of multiply-adds: mathematically equivalent, amortized
/// per-object instead of per-sample.
///
/// Rows of the rotation matrix: `(d, e, f)`, `(g, h, i)`, `(j, k, l)`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rotor {
    pub d: f64,
    pub e: f64,
    pub f: f64,
    pub g: f64,
    pub h: f64,
    pub i: f64,
    pub j: f64,
    pub k: f64,
    pub l: f64,
    d2: f64,
    e2: f64,
    f2: f64,
    g2: f64,
    h2: f64,
    i2: f64,
    j2: f64,
    k2: f64,
    l2: f64,
    de: f64,
    df: f64,
    ef: f64,
    gh: f64,
    gi: f64,
    hi: f64,
    jk: f64,
    jl: f64,
    kl: f64,
}

impl Rotor {
    /// Build the coefficient set for the given rotation (radians per axis).
    pub fn new(rotation: DVec3) -> Self {
        let (sin_x, cos_x) = rotation.x.sin_cos();
        let (sin_y, cos_y) = rotation.y.sin_cos();
        let (sin_z, cos_z) = rotation.z.sin_cos();

        let d = cos_y * cos_z;
        let e = sin_x * sin_y * cos_z - cos_x * sin_z;
        let f = cos_x * sin_y * cos_z + sin_x * sin_z;
        let g = cos_y * sin_z;
        let h = sin_x * sin_y * sin_z + cos_x * cos_z;
        let i = cos_x * sin_y * sin_z - sin_x * cos_z;
        let j = -sin_y;
        let k = sin_x * cos_y;
        let l = cos_x * cos_y;

        Self {
            d,
            e,
            f,
            g,
            h,
            i,
            j,
            k,
            l,
            d2: d * d,
            e2: e * e,
            f2: f * f,
            g2: g * g,
            h2: h * h,
            i2: i * i,
            j2: j * j,
            k2: k * k,
            l2: l * l,
            de: d * e,
            df: d * f,
            ef: e * f,
            gh: g * h,
            gi: g * i,
            hi: h * i,
            jk: j * k,
            jl: j * l,
            kl: k * l,
        }
    }

    /// Apply the rotation matrix to a vector.
    pub fn rotate(&self, v: DVec3) -> DVec3 {
        DVec3::new(
            self.d * v.x + self.e * v.y + self.f * v.z,
            self.g * v.x + self.h * v.y + self.i * v.z,
            self.j * v.x + self.k * v.y + self.l * v.z,
        )
    }

    /// Apply the inverse (transposed) rotation matrix to a vector.
    pub fn inverse_rotate(&self, v: DVec3) -> DVec3 {
        DVec3::new(
            self.d * v.x + self.g * v.y + self.j * v.z,
            self.e * v.x + self.h * v.y + self.k * v.z,
            self.f * v.x + self.i * v.y + self.l * v.z,
        )
    }

    /// Quadratic coefficients `(a, b, c)` of the squared rotated component
    /// along `axis` (0 = X, 1 = Y, 2 = Z) for the point `p + t * s`.
    ///
    /// The caller subtracts its own constant (squared radius or extent) from
    /// `c` to form the full quadric equation.
    pub fn axis_quadric(&self, axis: usize, s: DVec3, p: DVec3) -> (f64, f64, f64) {
        let (q1_2, q2_2, q3_2, q12, q13, q23) = match axis {
            0 => (self.d2, self.e2, self.f2, self.de, self.df, self.ef),
            1 => (self.g2, self.h2, self.i2, self.gh, self.gi, self.hi),
            _ => (self.j2, self.k2, self.l2, self.jk, self.jl, self.kl),
        };

        let a = q1_2 * s.x * s.x
            + q2_2 * s.y * s.y
            + q3_2 * s.z * s.z
            + 2.0 * (q12 * s.x * s.y + q13 * s.x * s.z + q23 * s.y * s.z);
        let b = -2.0
            * (q1_2 * s.x * p.x
                + q2_2 * s.y * p.y
                + q3_2 * s.z * p.z
                + q12 * (s.x * p.y + s.y * p.x)
                + q13 * (s.x * p.z + s.z * p.x)
                + q23 * (s.y * p.z + s.z * p.y));
        let c = q1_2 * p.x * p.x
            + q2_2 * p.y * p.y
            + q3_2 * p.z * p.z
            + 2.0 * (q12 * p.x * p.y + q13 * p.x * p.z + q23 * p.y * p.z);

        (a, b, c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_zero_rotation_is_identity() {
        let r = Rotor::new(DVec3::ZERO);
        assert!((r.d - 1.0).abs() < EPS);
        assert!(r.e.abs() < EPS);
        assert!(r.f.abs() < EPS);
        assert!(r.g.abs() < EPS);
        assert!((r.h - 1.0).abs() < EPS);
        assert!(r.i.abs() < EPS);
        assert!(r.j.abs() < EPS);
        assert!(r.k.abs() < EPS);
        assert!((r.l - 1.0).abs() < EPS);

        let v = DVec3::new(1.0, 2.0, 3.0);
        assert!((r.rotate(v) - v).length() < EPS);
    }

    #[test]
    fn test_rotation_preserves_length() {
        let r = Rotor::new(DVec3::new(0.3, -1.2, 2.5));
        let v = DVec3::new(1.0, -2.0, 0.5);
        assert!((r.rotate(v).length() - v.length()).abs() < EPS);
    }

    #[test]
    fn test_quarter_turn_about_z() {
        // Z rotation by 90 degrees sends +X to +Y under this convention.
        let r = Rotor::new(DVec3::new(0.0, 0.0, FRAC_PI_2));
        let v = r.rotate(DVec3::X);
        assert!(v.x.abs() < EPS);
        assert!((v.y - 1.0).abs() < EPS);
        assert!(v.z.abs() < EPS);
    }

    #[test]
    fn test_inverse_rotate_roundtrip() {
        let r = Rotor::new(DVec3::new(0.4, 1.1, -0.6));
        let v = DVec3::new(-2.0, 3.0, 0.7);
        assert!((r.inverse_rotate(r.rotate(v)) - v).length() < EPS);
        assert!((r.rotate(r.inverse_rotate(v)) - v).length() < EPS);
    }

    #[test]
    fn test_axis_quadric_unrotated() {
        // With no rotation the X group reduces to the plain axis quadratic:
        // a = sx^2, b = -2 sx px, c = px^2.
        let r = Rotor::new(DVec3::ZERO);
        let s = DVec3::new(2.0, 0.5, -1.0);
        let p = DVec3::new(3.0, -4.0, 5.0);
        let (a, b, c) = r.axis_quadric(0, s, p);
        assert!((a - 4.0).abs() < EPS);
        assert!((b + 12.0).abs() < EPS);
        assert!((c - 9.0).abs() < EPS);
    }

    #[test]
    fn test_axis_quadric_matches_rotation() {
        // The quadric at parameter t must equal the squared rotated
        // component of (t*s - p).
        let r = Rotor::new(DVec3::new(0.7, 0.2, -0.4));
        let s = DVec3::new(0.3, -1.0, 0.8);
        let p = DVec3::new(1.5, 0.25, -2.0);
        for axis in 0..3 {
            let (a, b, c) = r.axis_quadric(axis, s, p);
            for &t in &[0.0, 0.5, 2.0, -1.25] {
                let expect = r.rotate(s * t - p)[axis].powi(2);
                let got = a * t * t + b * t + c;
                assert!((got - expect).abs() < 1e-9, "axis {axis} t {t}");
            }
        }
    }
}
