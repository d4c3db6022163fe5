use core::ops::Mul;

/// 2D affine map `world = L * p + t`, stored column-major.
///
/// The linear part is `[a c; b d]`, the translation is `(tx, ty)`. Camera
/// operations only ever compose uniform scales and translations onto it; the
/// representation stays general for composability.
///
/// Components are `f64`: deep zooms exhaust `f32` translation precision long
/// before they exhaust iteration budgets.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Affine2 {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Affine2 {
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    #[inline]
    pub const fn translation(tx: f64, ty: f64) -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            tx,
            ty,
        }
    }

    /// Uniform (isotropic) scale about the origin.
    #[inline]
    pub const fn scaling(s: f64) -> Self {
        Self {
            a: s,
            b: 0.0,
            c: 0.0,
            d: s,
            tx: 0.0,
            ty: 0.0,
        }
    }

    /// Applies the map to a point.
    #[inline]
    pub fn apply(self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.tx,
            self.b * x + self.d * y + self.ty,
        )
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.a.is_finite()
            && self.b.is_finite()
            && self.c.is_finite()
            && self.d.is_finite()
            && self.tx.is_finite()
            && self.ty.is_finite()
    }

    /// Promotes to a 3×3 homogeneous matrix, column-major, bottom row
    /// `(0, 0, 1)` — the layout the `camera` shader uniform expects.
    #[inline]
    pub fn to_homogeneous(self) -> [f32; 9] {
        [
            self.a as f32,
            self.b as f32,
            0.0,
            self.c as f32,
            self.d as f32,
            0.0,
            self.tx as f32,
            self.ty as f32,
            1.0,
        ]
    }
}

impl Mul for Affine2 {
    type Output = Affine2;

    /// Composition `self ∘ rhs`: the right operand is applied first.
    ///
    /// Incremental camera updates right-multiply onto the existing transform,
    /// so repeated small gestures compose without recomputing from scratch.
    fn mul(self, rhs: Affine2) -> Affine2 {
        Affine2 {
            a: self.a * rhs.a + self.c * rhs.b,
            b: self.b * rhs.a + self.d * rhs.b,
            c: self.a * rhs.c + self.c * rhs.d,
            d: self.b * rhs.c + self.d * rhs.d,
            tx: self.a * rhs.tx + self.c * rhs.ty + self.tx,
            ty: self.b * rhs.tx + self.d * rhs.ty + self.ty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() <= 1e-12 * a.abs().max(b.abs()).max(1.0), "{a} vs {b}");
    }

    // ── composition ───────────────────────────────────────────────────────

    #[test]
    fn identity_is_neutral() {
        let t = Affine2::translation(3.0, -2.0) * Affine2::scaling(0.5);
        assert_eq!(t * Affine2::IDENTITY, t);
        assert_eq!(Affine2::IDENTITY * t, t);
    }

    #[test]
    fn right_operand_applies_first() {
        // scale-then-translate vs translate-then-scale differ in translation.
        let st = Affine2::translation(10.0, 0.0) * Affine2::scaling(2.0);
        let ts = Affine2::scaling(2.0) * Affine2::translation(10.0, 0.0);

        assert_eq!(st.apply(1.0, 0.0), (12.0, 0.0));
        assert_eq!(ts.apply(1.0, 0.0), (22.0, 0.0));
    }

    #[test]
    fn composition_matches_sequential_application() {
        let m = Affine2::translation(1.5, -4.0) * Affine2::scaling(0.25);
        let n = Affine2::scaling(3.0) * Affine2::translation(-2.0, 8.0);

        let (px, py) = (0.7, -1.3);
        let (ix, iy) = n.apply(px, py);
        let (sx, sy) = m.apply(ix, iy);
        let (cx, cy) = (m * n).apply(px, py);

        assert_close(sx, cx);
        assert_close(sy, cy);
    }

    // ── promotion ─────────────────────────────────────────────────────────

    #[test]
    fn homogeneous_layout_is_column_major() {
        let t = Affine2 {
            a: 2.0,
            b: 0.0,
            c: 0.0,
            d: 2.0,
            tx: -0.5,
            ty: 1.25,
        };
        let m = t.to_homogeneous();

        assert_eq!(m[0], 2.0); // column 0: x axis
        assert_eq!(m[4], 2.0); // column 1: y axis
        assert_eq!(m[6], -0.5); // column 2: translation
        assert_eq!(m[7], 1.25);
        assert_eq!([m[2], m[5], m[8]], [0.0, 0.0, 1.0]);
    }
}
