use std::ptr;

use num_bigint::BigInt;
use num_rational::BigRational;

use crate::ring::*;
use crate::rings::fixed_poly;
use crate::rings::vector;
use crate::status::*;

use super::dense_poly;
use super::{base_ring, coefficients, gen_name, store, store_or_zero};

///
/// A way of converting elements of some ring into a polynomial ring.
///
/// The rules are tried in the order of [`COERCION_RULES`], and the first one
/// that applies to the pair of rings is used.
///
pub struct CoercionRule {
    pub name: &'static str,
    applies: fn(&RingCtx, &RingCtx) -> bool,
    apply: fn(&mut El, &El, &RingCtx, &RingCtx) -> Status
}

pub const COERCION_RULES: &[CoercionRule] = &[
    CoercionRule { name: "same-context", applies: is_same_context, apply: from_same_context },
    CoercionRule { name: "base-ring", applies: is_base_ring, apply: from_base_ring },
    CoercionRule { name: "polynomial-same-generator", applies: is_poly_with_same_generator, apply: from_poly_with_same_generator },
    CoercionRule { name: "fixed-integer-polynomial", applies: is_integer_poly, apply: from_integer_poly },
    CoercionRule { name: "fixed-rational-polynomial", applies: is_rational_poly, apply: from_rational_poly },
    CoercionRule { name: "vector", applies: is_vector, apply: from_vector },
    CoercionRule { name: "scalar-fallback", applies: always, apply: from_scalar },
];

fn find_rule(x_ring: &RingCtx, ring: &RingCtx) -> &'static CoercionRule {
    COERCION_RULES.iter().find(|rule| (rule.applies)(x_ring, ring)).unwrap_or(&COERCION_RULES[COERCION_RULES.len() - 1])
}

///
/// Returns the name of the rule by which elements of `x_ring` are converted into
/// elements of the polynomial ring `ring`.
///
/// # Example
/// ```
/// # use std::sync::Arc;
/// # use generic_ring::rings::integer::integer_ring;
/// # use generic_ring::rings::rational::rational_field;
/// # use generic_ring::rings::poly::*;
/// # use generic_ring::rings::poly::coerce::coercion_rule;
/// let ZZ = Arc::new(integer_ring());
/// let P = poly_ring(ZZ.clone());
/// assert_eq!("base-ring", coercion_rule(&ZZ, &P));
/// assert_eq!("scalar-fallback", coercion_rule(&rational_field(), &P));
/// ```
///
pub fn coercion_rule(x_ring: &RingCtx, ring: &RingCtx) -> &'static str {
    find_rule(x_ring, ring).name
}

///
/// Converts `x`, an element of `x_ring`, into an element of the polynomial ring `ring`.
///
pub fn set_other(res: &mut El, x: &El, x_ring: &RingCtx, ring: &RingCtx) -> Status {
    let rule = find_rule(x_ring, ring);
    let status = (rule.apply)(res, x, x_ring, ring);
    if !status.is_success() {
        tracing::trace!(rule = rule.name, ?status, "coercion into polynomial ring failed");
    }
    status
}

fn is_same_context(x_ring: &RingCtx, ring: &RingCtx) -> bool {
    ptr::eq(x_ring, ring)
}

fn is_base_ring(x_ring: &RingCtx, ring: &RingCtx) -> bool {
    ptr::eq(x_ring, base_ring(ring))
}

fn is_poly_with_same_generator(x_ring: &RingCtx, ring: &RingCtx) -> bool {
    x_ring.which_ring() == RingKind::Poly && gen_name(x_ring) == gen_name(ring)
}

fn is_integer_poly(x_ring: &RingCtx, _: &RingCtx) -> bool {
    x_ring.which_ring() == RingKind::IntegerPoly
}

fn is_rational_poly(x_ring: &RingCtx, _: &RingCtx) -> bool {
    x_ring.which_ring() == RingKind::RationalPoly
}

fn is_vector(x_ring: &RingCtx, _: &RingCtx) -> bool {
    x_ring.which_ring() == RingKind::Vector
}

fn always(_: &RingCtx, _: &RingCtx) -> bool {
    true
}

fn from_same_context(res: &mut El, x: &El, _: &RingCtx, ring: &RingCtx) -> Status {
    store(res, dense_poly::set(coefficients(x), base_ring(ring)))
}

fn from_base_ring(res: &mut El, x: &El, _: &RingCtx, ring: &RingCtx) -> Status {
    store(res, dense_poly::set_scalar(x, base_ring(ring)))
}

///
/// Converts a sequence of coefficients, each with the given conversion into the base
/// ring. On failure, the result is zero.
///
fn from_coefficient_iter<'a, T, I, F>(res: &mut El, coeffs: I, ring: &RingCtx, mut convert: F) -> Status
    where T: 'a + ?Sized,
        I: Iterator<Item = &'a T>,
        F: FnMut(&mut El, &T, &RingCtx) -> Status
{
    let base = base_ring(ring);
    let mut status = Status::Success;
    let mut result = Vec::new();
    for c in coeffs {
        let mut value = base.init();
        status |= convert(&mut value, c, base);
        if !status.is_success() {
            break;
        }
        result.push(value);
    }
    dense_poly::normalize(&mut result, base);
    store_or_zero(res, (result, status))
}

fn from_poly_with_same_generator(res: &mut El, x: &El, x_ring: &RingCtx, ring: &RingCtx) -> Status {
    let x_base = base_ring(x_ring);
    from_coefficient_iter(res, coefficients(x).iter(), ring, |value, c, base| base.set_other(value, c, x_base))
}

fn from_integer_poly(res: &mut El, x: &El, _: &RingCtx, ring: &RingCtx) -> Status {
    from_coefficient_iter(res, fixed_poly::coefficients::<BigInt>(x).iter(), ring, |value, c, base| base.set_bigint(value, c))
}

fn from_rational_poly(res: &mut El, x: &El, _: &RingCtx, ring: &RingCtx) -> Status {
    from_coefficient_iter(res, fixed_poly::coefficients::<BigRational>(x).iter(), ring, |value, c, base| base.set_rational(value, c))
}

fn from_vector(res: &mut El, x: &El, x_ring: &RingCtx, ring: &RingCtx) -> Status {
    let entry_ring = vector::base_ring(x_ring);
    from_coefficient_iter(res, vector::entries(x).iter(), ring, |value, c, base| base.set_other(value, c, entry_ring))
}

fn from_scalar(res: &mut El, x: &El, x_ring: &RingCtx, ring: &RingCtx) -> Status {
    let base = base_ring(ring);
    let mut c = base.init();
    let status = base.set_other(&mut c, x, x_ring);
    let mut coeffs = if status.is_success() { vec![c] } else { Vec::new() };
    dense_poly::normalize(&mut coeffs, base);
    store_or_zero(res, (coeffs, status))
}

///
/// Whether elements of `other` can be multiplied with elements of `ring` without
/// conversion, because both are polynomial rings with the same base ring and generator.
///
fn is_compatible_poly_ring(other: &RingCtx, ring: &RingCtx) -> bool {
    ptr::eq(other, ring) || (
        other.which_ring() == RingKind::Poly &&
        ptr::eq(base_ring(other), base_ring(ring)) &&
        gen_name(other) == gen_name(ring)
    )
}

///
/// Computes `x * y` for a polynomial `x` and an element `y` of `y_ring`.
///
pub fn mul_other(res: &mut El, x: &El, y: &El, y_ring: &RingCtx, ring: &RingCtx) -> Status {
    let base = base_ring(ring);
    if ptr::eq(y_ring, base) {
        return store(res, dense_poly::mul_scalar(coefficients(x), y, base));
    }
    if is_compatible_poly_ring(y_ring, ring) {
        return ring.mul(res, x, y);
    }
    let mut converted = ring.init();
    let status = set_other(&mut converted, y, y_ring, ring);
    if !status.is_success() {
        return status;
    }
    ring.mul(res, x, &converted)
}

///
/// Computes `x * y` for an element `x` of `x_ring` and a polynomial `y`.
///
pub fn other_mul(res: &mut El, x: &El, x_ring: &RingCtx, y: &El, ring: &RingCtx) -> Status {
    let base = base_ring(ring);
    if ptr::eq(x_ring, base) {
        return store(res, dense_poly::scalar_mul(x, coefficients(y), base));
    }
    if is_compatible_poly_ring(x_ring, ring) {
        return ring.mul(res, x, y);
    }
    let mut converted = ring.init();
    let status = set_other(&mut converted, x, x_ring, ring);
    if !status.is_success() {
        return status;
    }
    ring.mul(res, &converted, y)
}

#[cfg(test)]
use std::sync::Arc;
#[cfg(test)]
use crate::rings::integer::integer_ring;
#[cfg(test)]
use crate::rings::rational::rational_field;
#[cfg(test)]
use crate::rings::zn::zn;
#[cfg(test)]
use super::{poly_ring, from_coefficients, set_degree_limit};

#[cfg(test)]
fn poly(ring: &RingCtx, coeffs: &[i64]) -> El {
    let base = base_ring(ring);
    from_coefficients(ring, coeffs.iter().map(|c| base.from_int(*c).unwrap()).collect())
}

#[test]
fn test_rule_selection() {
    let ZZ = Arc::new(integer_ring());
    let QQ = Arc::new(rational_field());
    let P = poly_ring(QQ.clone());
    let mut Q = poly_ring(ZZ.clone());
    assert_eq!("same-context", coercion_rule(&P, &P));
    assert_eq!("base-ring", coercion_rule(&QQ, &P));
    assert_eq!("polynomial-same-generator", coercion_rule(&Q, &P));
    assert_eq!("fixed-integer-polynomial", coercion_rule(&fixed_poly::integer_poly_ring(), &P));
    assert_eq!("fixed-rational-polynomial", coercion_rule(&fixed_poly::rational_poly_ring(), &P));
    assert_eq!("vector", coercion_rule(&vector::vector_ring(ZZ.clone()), &P));
    assert_eq!("scalar-fallback", coercion_rule(&ZZ, &P));
    assert_eq!(Status::Success, Q.set_gen_name("y"));
    assert_eq!("scalar-fallback", coercion_rule(&Q, &P));
}

#[test]
fn test_scalar_coercion_is_constant_polynomial() {
    let ZZ = integer_ring();
    let P = poly_ring(Arc::new(zn(7)));
    let mut res = P.init();
    assert_eq!(Status::Success, P.set_other(&mut res, &ZZ.from_int(10).unwrap(), &ZZ));
    assert_el_eq!(P, P.from_int(3).unwrap(), res);
    assert_eq!(Status::Success, P.set_other(&mut res, &ZZ.from_int(14).unwrap(), &ZZ));
    assert_eq!(0, coefficients(&res).len());
}

#[test]
fn test_coerce_between_base_rings() {
    let P = poly_ring(Arc::new(integer_ring()));
    let Q = poly_ring(Arc::new(rational_field()));
    let f = poly(&P, &[1, -2, 3]);
    let mut res = Q.init();
    assert_eq!(Status::Success, Q.set_other(&mut res, &f, &P));
    assert_el_eq!(Q, poly(&Q, &[1, -2, 3]), res);

    let half = Q.from_rational(&BigRational::new(1.into(), 2.into())).unwrap();
    let mut back = poly(&P, &[5]);
    assert_eq!(Status::Domain, P.set_other(&mut back, &half, &Q));
    assert_eq!(0, coefficients(&back).len());
}

#[test]
fn test_generator_name_mismatch() {
    let QQ = Arc::new(rational_field());
    let P = poly_ring(QQ.clone());
    let mut Q = poly_ring(QQ.clone());
    assert_eq!(Status::Success, Q.set_gen_name("y"));
    let y = Q.generator().unwrap();
    let mut res = poly(&P, &[1, 1]);
    assert_eq!(Status::Unable, P.set_other(&mut res, &y, &Q));
    assert_eq!(0, coefficients(&res).len());
    let x = P.generator().unwrap();
    assert_eq!(Status::Unable, P.mul_other(&mut res, &x, &y, &Q));
}

#[test]
fn test_coerce_fixed_polynomials() {
    let P = poly_ring(Arc::new(zn(5)));
    let ZZX = fixed_poly::integer_poly_ring();
    let f = fixed_poly::from_coefficients(vec![BigInt::from(7), BigInt::from(0), BigInt::from(-1)]);
    let mut res = P.init();
    assert_eq!(Status::Success, P.set_other(&mut res, &f, &ZZX));
    assert_el_eq!(P, poly(&P, &[2, 0, 4]), res);

    let QQX = fixed_poly::rational_poly_ring();
    let g = fixed_poly::from_coefficients(vec![BigRational::new(1.into(), 2.into()), BigRational::from_integer(5.into())]);
    assert_eq!(Status::Success, P.set_other(&mut res, &g, &QQX));
    assert_el_eq!(P, poly(&P, &[3]), res);

    let h = fixed_poly::from_coefficients(vec![BigRational::new(1.into(), 5.into())]);
    assert_eq!(Status::Domain, P.set_other(&mut res, &h, &QQX));
    assert_eq!(0, coefficients(&res).len());
}

#[test]
fn test_coerce_vector() {
    let ZZ = Arc::new(integer_ring());
    let V = vector::vector_ring(ZZ.clone());
    let v = vector::from_entries(vec![ZZ.from_int(4).unwrap(), ZZ.from_int(0).unwrap(), ZZ.from_int(6).unwrap(), ZZ.from_int(0).unwrap()]);
    let P = poly_ring(Arc::new(zn(3)));
    let mut res = P.init();
    assert_eq!(Status::Success, P.set_other(&mut res, &v, &V));
    assert_el_eq!(P, poly(&P, &[1]), res);
    assert_eq!(1, coefficients(&res).len());
}

#[test]
fn test_mixed_multiplication() {
    let base = Arc::new(zn(7));
    let mut P = poly_ring(base.clone());
    set_degree_limit(&mut P, Some(5));
    let f = poly(&P, &[1, 1]);
    let c = base.from_int(3).unwrap();
    let mut res = P.init();
    assert_eq!(Status::Success, P.mul_other(&mut res, &f, &c, &base));
    assert_el_eq!(P, poly(&P, &[3, 3]), res);
    assert_eq!(Status::Success, P.other_mul(&mut res, &c, &base, &f));
    assert_el_eq!(P, poly(&P, &[3, 3]), res);

    let mut Q = poly_ring(base.clone());
    set_degree_limit(&mut Q, None);
    let g = poly(&Q, &[1, 2, 3]);
    assert_eq!(Status::Success, P.mul_other(&mut res, &f, &g, &Q));
    assert_el_eq!(P, poly(&P, &[1, 3, 5, 3]), res);
    assert_eq!(Status::Unable, P.other_mul(&mut res, &g, &Q, &g));

    let ZZ = integer_ring();
    assert_eq!(Status::Success, P.other_mul(&mut res, &ZZ.from_int(-1).unwrap(), &ZZ, &f));
    assert_el_eq!(P, poly(&P, &[6, 6]), res);
}
