//! 2D affine transforms

use serde::{Deserialize, Serialize};

/// A 2×3 affine matrix in canvas order.
///
/// Maps `(x, y)` to `(a·x + c·y + e, b·x + d·y + f)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Affine {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine {
    pub const IDENTITY: Affine = Affine {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn translate(tx: f32, ty: f32) -> Self {
        Self {
            e: tx,
            f: ty,
            ..Self::IDENTITY
        }
    }

    pub fn scale(sx: f32, sy: f32) -> Self {
        Self {
            a: sx,
            d: sy,
            ..Self::IDENTITY
        }
    }

    /// Rotation by `radians`; positive turns clockwise on a y-down surface
    pub fn rotate(radians: f32) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: 0.0,
            f: 0.0,
        }
    }

    /// Shear; `kx` offsets x by `kx·y`, `ky` offsets y by `ky·x`
    pub fn shear(kx: f32, ky: f32) -> Self {
        Self {
            a: 1.0,
            b: ky,
            c: kx,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }

    /// Compose so that `local` is applied first, then `self`
    pub fn then_local(&self, local: &Affine) -> Self {
        Self {
            a: self.a * local.a + self.c * local.b,
            b: self.b * local.a + self.d * local.b,
            c: self.a * local.c + self.c * local.d,
            d: self.b * local.c + self.d * local.d,
            e: self.a * local.e + self.c * local.f + self.e,
            f: self.b * local.e + self.d * local.f + self.f,
        }
    }

    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// The transform undoing this one, if it is not degenerate
    pub fn inverse(&self) -> Option<Self> {
        let det = self.a * self.d - self.b * self.c;
        if det.abs() < f32::EPSILON {
            return None;
        }
        Some(Self {
            a: self.d / det,
            b: -self.b / det,
            c: -self.c / det,
            d: self.a / det,
            e: (self.c * self.f - self.d * self.e) / det,
            f: (self.b * self.e - self.a * self.f) / det,
        })
    }

    /// Where the local origin lands
    pub fn translation(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    /// Rotation angle of the x axis, in radians
    pub fn rotation(&self) -> f32 {
        self.b.atan2(self.a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: (f32, f32), b: (f32, f32)) -> bool {
        (a.0 - b.0).abs() < 1e-4 && (a.1 - b.1).abs() < 1e-4
    }

    #[test]
    fn test_translate_then_rotate() {
        let m = Affine::translate(10.0, 20.0).then_local(&Affine::rotate(std::f32::consts::FRAC_PI_2));
        // Local +x axis points down after a quarter clockwise turn
        assert!(close(m.apply(1.0, 0.0), (10.0, 21.0)));
        assert!(close(m.translation(), (10.0, 20.0)));
        assert!((m.rotation() - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn test_shear_leans_top_right() {
        let m = Affine::shear(-0.2, 0.0);
        // A point above the baseline (negative y) moves right
        assert!(close(m.apply(0.0, -10.0), (2.0, -10.0)));
    }

    #[test]
    fn test_inverse_round_trips() {
        let m = Affine::translate(40.0, 70.0)
            .then_local(&Affine::rotate(0.4))
            .then_local(&Affine::shear(-0.2, 0.0));
        let inv = m.inverse().unwrap();
        let (x, y) = m.apply(3.0, -7.0);
        assert!(close(inv.apply(x, y), (3.0, -7.0)));

        let flat = Affine { d: 0.0, b: 0.0, ..Affine::IDENTITY };
        assert!(flat.inverse().is_none());
    }

    #[test]
    fn test_identity_is_neutral() {
        let m = Affine::rotate(0.3).then_local(&Affine::IDENTITY);
        assert_eq!(m, Affine::rotate(0.3));
        let m = Affine::IDENTITY.then_local(&Affine::translate(3.0, 4.0));
        assert_eq!(m, Affine::translate(3.0, 4.0));
    }
}
