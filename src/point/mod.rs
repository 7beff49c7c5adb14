//! Affine points on the secp256k1 curve `y^2 = x^3 + 7`.
//!
//! The point at infinity is carried as an explicit flag with zeroed
//! coordinates, so derived equality stays honest. Scalar multiplication is
//! plain double-and-add over the 256 scalar bits.

use crate::field::{FieldElement, P_MINUS_2};
use crate::scalar::ScalarElement;
use crate::PrimitivesError;

/// Generator x-coordinate, big-endian bytes.
const GENERATOR_X: [u8; 32] = [
    0x79, 0xBE, 0x66, 0x7E, 0xF9, 0xDC, 0xBB, 0xAC, 0x55, 0xA0, 0x62, 0x95, 0xCE, 0x87, 0x0B,
    0x07, 0x02, 0x9B, 0xFC, 0xDB, 0x2D, 0xCE, 0x28, 0xD9, 0x59, 0xF2, 0x81, 0x5B, 0x16, 0xF8,
    0x17, 0x98,
];

/// Generator y-coordinate, big-endian bytes.
const GENERATOR_Y: [u8; 32] = [
    0x48, 0x3A, 0xDA, 0x77, 0x26, 0xA3, 0xC4, 0x65, 0x5D, 0xA4, 0xFB, 0xFC, 0x0E, 0x11, 0x08,
    0xA8, 0xFD, 0x17, 0xB4, 0x48, 0xA6, 0x85, 0x54, 0x19, 0x9C, 0x47, 0xD0, 0x8F, 0xFB, 0x10,
    0xD4, 0xB8,
];

/// A point on secp256k1, or the point at infinity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Point {
    x: FieldElement,
    y: FieldElement,
    infinity: bool,
}

impl Point {
    /// The group identity.
    pub fn infinity() -> Self {
        Point {
            x: FieldElement::zero(),
            y: FieldElement::zero(),
            infinity: true,
        }
    }

    /// Construct a finite point, verifying it satisfies the curve equation.
    ///
    /// # Arguments
    /// * `x` - Affine x-coordinate.
    /// * `y` - Affine y-coordinate.
    ///
    /// # Returns
    /// `Ok(Point)`, or `PointNotOnCurve` if `y^2 != x^3 + 7`.
    pub fn new(x: FieldElement, y: FieldElement) -> Result<Self, PrimitivesError> {
        if !satisfies_equation(&x, &y) {
            return Err(PrimitivesError::PointNotOnCurve);
        }
        Ok(Point {
            x,
            y,
            infinity: false,
        })
    }

    /// The fixed base point `G`.
    pub fn generator() -> Self {
        Point {
            x: FieldElement::from_bytes32(&GENERATOR_X),
            y: FieldElement::from_bytes32(&GENERATOR_Y),
            infinity: false,
        }
    }

    /// Lift an x-coordinate to a curve point with the requested y parity.
    ///
    /// # Arguments
    /// * `x` - Candidate x-coordinate.
    /// * `odd_y` - Select the root with odd (true) or even (false) parity.
    ///
    /// # Returns
    /// `Ok(Point)`, or `PointNotOnCurve` if `x^3 + 7` is not a square.
    pub fn from_x(x: FieldElement, odd_y: bool) -> Result<Self, PrimitivesError> {
        let rhs = x.square().mul(&x).add(&FieldElement::from_u64(7));
        let mut y = rhs.sqrt().ok_or(PrimitivesError::PointNotOnCurve)?;
        if y.is_even() == odd_y {
            y = y.neg();
        }
        Ok(Point {
            x,
            y,
            infinity: false,
        })
    }

    pub fn is_infinity(&self) -> bool {
        self.infinity
    }

    /// True when the coordinates satisfy `y^2 = x^3 + 7`. The identity
    /// counts as on the curve.
    pub fn is_on_curve(&self) -> bool {
        self.infinity || satisfies_equation(&self.x, &self.y)
    }

    pub fn x(&self) -> FieldElement {
        self.x
    }

    pub fn y(&self) -> FieldElement {
        self.y
    }

    /// Group addition covering every affine case.
    pub fn add(&self, other: &Self) -> Self {
        if self.infinity {
            return *other;
        }
        if other.infinity {
            return *self;
        }
        if self.x == other.x {
            if self.y == other.y {
                return self.double();
            }
            // Same x with distinct y means the points are inverses.
            return Point::infinity();
        }
        // x1 != x2 in this branch, so the denominator has an inverse.
        let dx = other.x.sub(&self.x);
        let lambda = other.y.sub(&self.y).mul(&dx.pow(&P_MINUS_2));
        let x3 = lambda.square().sub(&self.x).sub(&other.x);
        let y3 = lambda.mul(&self.x.sub(&x3)).sub(&self.y);
        Point {
            x: x3,
            y: y3,
            infinity: false,
        }
    }

    /// Point doubling via the tangent line.
    pub fn double(&self) -> Self {
        if self.infinity {
            return *self;
        }
        if self.y.is_zero() {
            return Point::infinity();
        }
        // y != 0 in this branch, so the denominator has an inverse.
        let two_y = self.y.add(&self.y);
        let three_x_sq = {
            let x_sq = self.x.square();
            x_sq.add(&x_sq).add(&x_sq)
        };
        let lambda = three_x_sq.mul(&two_y.pow(&P_MINUS_2));
        let x3 = lambda.square().sub(&self.x).sub(&self.x);
        let y3 = lambda.mul(&self.x.sub(&x3)).sub(&self.y);
        Point {
            x: x3,
            y: y3,
            infinity: false,
        }
    }

    /// Reflection across the x-axis.
    pub fn neg(&self) -> Self {
        if self.infinity {
            return *self;
        }
        Point {
            x: self.x,
            y: self.y.neg(),
            infinity: false,
        }
    }

    /// Scalar multiplication by double-and-add, least significant bit first.
    ///
    /// # Arguments
    /// * `k` - Scalar multiplier, already reduced mod `n`.
    ///
    /// # Returns
    /// `k * self`; the identity when `k` is zero.
    pub fn scalar_mul(&self, k: &ScalarElement) -> Self {
        let mut acc = Point::infinity();
        let mut addend = *self;
        for i in 0..256 {
            if k.bit(i) {
                acc = acc.add(&addend);
            }
            addend = addend.double();
        }
        acc
    }
}

fn satisfies_equation(x: &FieldElement, y: &FieldElement) -> bool {
    let lhs = y.square();
    let rhs = x.square().mul(x).add(&FieldElement::from_u64(7));
    lhs == rhs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords(p: &Point) -> (String, String) {
        (p.x().to_hex(), p.y().to_hex())
    }

    #[test]
    fn test_generator_is_on_curve() {
        let g = Point::generator();
        assert!(g.is_on_curve());
        assert!(Point::new(g.x(), g.y()).is_ok());
        assert!(Point::infinity().is_on_curve());
    }

    #[test]
    fn test_new_rejects_off_curve_point() {
        let g = Point::generator();
        let bad = Point::new(g.x(), g.y().add(&FieldElement::one()));
        assert!(matches!(bad, Err(PrimitivesError::PointNotOnCurve)));
    }

    #[test]
    fn test_double_generator() {
        let g = Point::generator();
        let g2 = g.double();
        let (x, y) = coords(&g2);
        assert_eq!(x, "c6047f9441ed7d6d3045406e95c07cd85c778e4b8cef3ca7abac09b95c709ee5");
        assert_eq!(y, "1ae168fea63dc339a3c58419466ceaeef7f632653266d0e1236431a950cfe52a");
        assert_eq!(g.add(&g), g2);
    }

    #[test]
    fn test_add_generator_to_double() {
        let g = Point::generator();
        let g3 = g.double().add(&g);
        let (x, y) = coords(&g3);
        assert_eq!(x, "f9308a019258c31049344f85f89d5229b531c845836f99b08601f113bce036f9");
        assert_eq!(y, "388f7b0f632de8140fe337e62a37f3566500a99934c2231b6cb9fd7584b8e672");
        assert_eq!(g.add(&g.double()), g3);
    }

    #[test]
    fn test_scalar_mul_small_multiples() {
        let g = Point::generator();
        assert_eq!(g.scalar_mul(&ScalarElement::one()), g);
        assert_eq!(g.scalar_mul(&ScalarElement::from_u64(2)), g.double());
        assert_eq!(g.scalar_mul(&ScalarElement::from_u64(3)), g.double().add(&g));
    }

    /// (n-1)G is the reflection of G.
    #[test]
    fn test_scalar_mul_order_minus_one() {
        let k = ScalarElement::from_hex(
            "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364140",
        )
        .unwrap();
        let p = Point::generator().scalar_mul(&k);
        let (x, y) = coords(&p);
        assert_eq!(x, "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798");
        assert_eq!(y, "b7c52588d95c3b9aa25b0403f1eef75702e84bb7597aabe663b82f6f04ef2777");
        assert_eq!(p, Point::generator().neg());
    }

    /// The group order reduces to the zero scalar, so n*G lands on the
    /// identity.
    #[test]
    fn test_scalar_mul_by_order_is_identity() {
        let n_minus_1 = ScalarElement::from_hex(
            "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364140",
        )
        .unwrap();
        let n = n_minus_1.add(&ScalarElement::one());
        assert!(n.is_zero());
        assert!(Point::generator().scalar_mul(&n).is_infinity());
        assert!(Point::generator()
            .scalar_mul(&ScalarElement::zero())
            .is_infinity());
    }

    #[test]
    fn test_add_inverse_is_infinity() {
        let g = Point::generator();
        assert!(g.add(&g.neg()).is_infinity());
    }

    #[test]
    fn test_identity_laws() {
        let g = Point::generator();
        let inf = Point::infinity();
        assert_eq!(inf.add(&g), g);
        assert_eq!(g.add(&inf), g);
        assert!(inf.double().is_infinity());
        assert!(inf.neg().is_infinity());
    }

    #[test]
    fn test_add_commutes() {
        let g = Point::generator();
        let g2 = g.double();
        let g5 = g.scalar_mul(&ScalarElement::from_u64(5));
        assert_eq!(g2.add(&g5), g5.add(&g2));
    }

    #[test]
    fn test_from_x_restores_parity() {
        let g = Point::generator();
        // Gy ends in 0xb8, even.
        let even = Point::from_x(g.x(), false).unwrap();
        assert_eq!(even, g);
        let odd = Point::from_x(g.x(), true).unwrap();
        assert_eq!(odd, g.neg());
        assert!(even.y().is_even());
        assert!(!odd.y().is_even());
    }

    #[test]
    fn test_from_x_rejects_non_residue() {
        // x = 5 gives x^3 + 7 = 132, which is not a square mod p.
        let bad = Point::from_x(FieldElement::from_u64(5), false);
        assert!(matches!(bad, Err(PrimitivesError::PointNotOnCurve)));
    }
}
