use std::fmt;
use std::sync::OnceLock;

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use tracing::instrument;

use crate::generic::{ctx_predicate_false, ctx_predicate_true};
use crate::method::*;
use crate::random::RandState;
use crate::ring::*;
use crate::status::*;

///
/// Trial division is only attempted with divisors below this bound when factoring.
///
const TRIAL_DIVISION_BOUND: u64 = 1 << 20;

///
/// The ring of integers `ZZ`, with elements represented as [`num_bigint::BigInt`].
///
/// Elements of this ring are the canonical source of scalars; every other ring kind
/// converts from it via [`RingCtx::set_other()`].
///
/// # Example
/// ```
/// # use num_bigint::BigInt;
/// # use generic_ring::rings::integer::*;
/// # use generic_ring::status::*;
/// let ZZ = integer_ring();
/// let mut x = ZZ.init();
/// assert_eq!(Status::Success, ZZ.set_int(&mut x, -12));
/// let mut q = ZZ.init();
/// assert_eq!(Status::Domain, ZZ.div(&mut q, &x, &ZZ.from_int(5).unwrap()));
/// assert_eq!(Status::Success, ZZ.div(&mut q, &x, &ZZ.from_int(4).unwrap()));
/// assert_eq!(&BigInt::from(-3), value(&q));
/// ```
///
pub fn integer_ring() -> RingCtx {
    RingCtx::new(RingKind::Integer, std::mem::size_of::<BigInt>(), methods(), ())
}

pub fn value(x: &El) -> &BigInt {
    x.downcast_ref::<BigInt>()
}

fn value_mut(x: &mut El) -> &mut BigInt {
    x.downcast_mut::<BigInt>()
}

fn methods() -> &'static MethodTable {
    static METHODS: OnceLock<MethodTable> = OnceLock::new();
    METHODS.get_or_init(|| MethodTable::new(RingKind::Integer, &[
        (Method::CtxWrite, MethodFn::CtxWrite(ctx_write)),
        (Method::CtxIsRing, MethodFn::CtxPredicate(ctx_predicate_true)),
        (Method::CtxIsCommutativeRing, MethodFn::CtxPredicate(ctx_predicate_true)),
        (Method::CtxIsIntegralDomain, MethodFn::CtxPredicate(ctx_predicate_true)),
        (Method::CtxIsUniqueFactorizationDomain, MethodFn::CtxPredicate(ctx_predicate_true)),
        (Method::CtxIsField, MethodFn::CtxPredicate(ctx_predicate_false)),
        (Method::CtxIsRationalVectorSpace, MethodFn::CtxPredicate(ctx_predicate_false)),
        (Method::CtxIsRealVectorSpace, MethodFn::CtxPredicate(ctx_predicate_false)),
        (Method::CtxIsComplexVectorSpace, MethodFn::CtxPredicate(ctx_predicate_false)),
        (Method::CtxIsThreadsafe, MethodFn::CtxPredicate(ctx_predicate_true)),
        (Method::Init, MethodFn::Init(init)),
        (Method::Randtest, MethodFn::Randtest(randtest)),
        (Method::Write, MethodFn::Write(write)),
        (Method::One, MethodFn::Constant(one)),
        (Method::IsZero, MethodFn::Predicate(is_zero)),
        (Method::IsOne, MethodFn::Predicate(is_one)),
        (Method::Equal, MethodFn::Equal(equal)),
        (Method::Set, MethodFn::Unary(set)),
        (Method::SetInt, MethodFn::SetInt(set_int)),
        (Method::SetBigInt, MethodFn::SetBigInt(set_bigint)),
        (Method::SetRational, MethodFn::SetRational(set_rational)),
        (Method::SetOther, MethodFn::SetOther(set_other)),
        (Method::Neg, MethodFn::Unary(neg)),
        (Method::Add, MethodFn::Binary(add)),
        (Method::AddInt, MethodFn::OpInt(add_int)),
        (Method::Sub, MethodFn::Binary(sub)),
        (Method::Mul, MethodFn::Binary(mul)),
        (Method::MulInt, MethodFn::OpInt(mul_int)),
        (Method::Div, MethodFn::Binary(div)),
        (Method::Divexact, MethodFn::Binary(divexact)),
        (Method::Inv, MethodFn::Unary(inv)),
        (Method::EuclideanDiv, MethodFn::Binary(euclidean_div)),
        (Method::EuclideanRem, MethodFn::Binary(euclidean_rem)),
        (Method::EuclideanDivrem, MethodFn::Divrem(euclidean_divrem)),
        (Method::CanonicalAssociate, MethodFn::CanonicalAssociate(canonical_associate)),
        (Method::Gcd, MethodFn::Binary(gcd)),
        (Method::Factor, MethodFn::Factor(factor)),
    ]))
}

fn ctx_write(out: &mut dyn fmt::Write, _: &RingCtx) -> fmt::Result {
    write!(out, "Integer ring (ZZ)")
}

fn init(_: &RingCtx) -> El {
    El::new(BigInt::zero())
}

fn randtest(res: &mut El, state: &mut RandState, _: &RingCtx) -> Status {
    let bits = [4, 10, 40, 62][state.rand_range(0..4) as usize];
    *value_mut(res) = BigInt::from(state.rand_test_i64(bits));
    Status::Success
}

fn write(out: &mut dyn fmt::Write, x: &El, _: &RingCtx) -> fmt::Result {
    write!(out, "{}", value(x))
}

fn one(res: &mut El, _: &RingCtx) -> Status {
    *value_mut(res) = BigInt::one();
    Status::Success
}

fn is_zero(x: &El, _: &RingCtx) -> Truth {
    value(x).is_zero().into()
}

fn is_one(x: &El, _: &RingCtx) -> Truth {
    value(x).is_one().into()
}

fn equal(x: &El, y: &El, _: &RingCtx) -> Truth {
    (value(x) == value(y)).into()
}

fn set(res: &mut El, x: &El, _: &RingCtx) -> Status {
    value_mut(res).clone_from(value(x));
    Status::Success
}

fn set_int(res: &mut El, x: i64, _: &RingCtx) -> Status {
    *value_mut(res) = BigInt::from(x);
    Status::Success
}

fn set_bigint(res: &mut El, x: &BigInt, _: &RingCtx) -> Status {
    value_mut(res).clone_from(x);
    Status::Success
}

fn set_rational(res: &mut El, x: &BigRational, _: &RingCtx) -> Status {
    if x.is_integer() {
        value_mut(res).clone_from(x.numer());
        Status::Success
    } else {
        Status::Domain
    }
}

fn set_other(res: &mut El, x: &El, x_ring: &RingCtx, ring: &RingCtx) -> Status {
    match x_ring.which_ring() {
        RingKind::Integer => set(res, x, ring),
        RingKind::Rational => set_rational(res, x.downcast_ref::<BigRational>(), ring),
        _ => Status::Unable
    }
}

fn neg(res: &mut El, x: &El, _: &RingCtx) -> Status {
    *value_mut(res) = -value(x);
    Status::Success
}

fn add(res: &mut El, x: &El, y: &El, _: &RingCtx) -> Status {
    *value_mut(res) = value(x) + value(y);
    Status::Success
}

fn add_int(res: &mut El, x: &El, y: i64, _: &RingCtx) -> Status {
    *value_mut(res) = value(x) + y;
    Status::Success
}

fn sub(res: &mut El, x: &El, y: &El, _: &RingCtx) -> Status {
    *value_mut(res) = value(x) - value(y);
    Status::Success
}

fn mul(res: &mut El, x: &El, y: &El, _: &RingCtx) -> Status {
    *value_mut(res) = value(x) * value(y);
    Status::Success
}

fn mul_int(res: &mut El, x: &El, y: i64, _: &RingCtx) -> Status {
    *value_mut(res) = value(x) * y;
    Status::Success
}

fn div(res: &mut El, x: &El, y: &El, _: &RingCtx) -> Status {
    let (x, y) = (value(x), value(y));
    if y.is_zero() {
        return Status::Domain;
    }
    let (quo, rem) = x.div_rem(y);
    if rem.is_zero() {
        *value_mut(res) = quo;
        Status::Success
    } else {
        Status::Domain
    }
}

fn divexact(res: &mut El, x: &El, y: &El, _: &RingCtx) -> Status {
    if value(y).is_zero() {
        return Status::Domain;
    }
    *value_mut(res) = value(x) / value(y);
    Status::Success
}

fn inv(res: &mut El, x: &El, _: &RingCtx) -> Status {
    if value(x).abs().is_one() {
        value_mut(res).clone_from(value(x));
        Status::Success
    } else {
        Status::Domain
    }
}

fn euclidean_div(res: &mut El, x: &El, y: &El, _: &RingCtx) -> Status {
    if value(y).is_zero() {
        return Status::Domain;
    }
    *value_mut(res) = value(x).div_floor(value(y));
    Status::Success
}

fn euclidean_rem(res: &mut El, x: &El, y: &El, _: &RingCtx) -> Status {
    if value(y).is_zero() {
        return Status::Domain;
    }
    *value_mut(res) = value(x).mod_floor(value(y));
    Status::Success
}

fn euclidean_divrem(quo: &mut El, rem: &mut El, x: &El, y: &El, _: &RingCtx) -> Status {
    if value(y).is_zero() {
        return Status::Domain;
    }
    let (q, r) = value(x).div_mod_floor(value(y));
    *value_mut(quo) = q;
    *value_mut(rem) = r;
    Status::Success
}

///
/// The canonical associate of an integer is its absolute value.
///
fn canonical_associate(ux: &mut El, u: &mut El, x: &El, _: &RingCtx) -> Status {
    let x = value(x);
    *value_mut(u) = if x.is_negative() { -BigInt::one() } else { BigInt::one() };
    *value_mut(ux) = x.abs();
    Status::Success
}

fn gcd(res: &mut El, x: &El, y: &El, _: &RingCtx) -> Status {
    *value_mut(res) = value(x).gcd(value(y));
    Status::Success
}

///
/// Factors by trial division. If the cofactor remaining after trial division
/// cannot be proven prime, the result is [`Status::Unable`].
///
#[instrument(skip_all, level = "trace")]
fn factor(unit: &mut El, factors: &mut Vec<El>, exponents: &mut Vec<u64>, x: &El, _flags: u32, _: &RingCtx) -> Status {
    let x = value(x);
    factors.clear();
    exponents.clear();
    *value_mut(unit) = x.signum();
    if x.is_zero() {
        return Status::Success;
    }
    let mut remaining = x.abs();
    let mut p = BigInt::from(2);
    while &p * &p <= remaining {
        if p > BigInt::from(TRIAL_DIVISION_BOUND) {
            factors.clear();
            exponents.clear();
            return Status::Unable;
        }
        let mut e = 0;
        while remaining.is_multiple_of(&p) {
            remaining /= &p;
            e += 1;
        }
        if e > 0 {
            factors.push(El::new(p.clone()));
            exponents.push(e);
        }
        p += 1;
    }
    if !remaining.is_one() {
        factors.push(El::new(remaining));
        exponents.push(1);
    }
    Status::Success
}

#[cfg(test)]
use crate::ring::generic_tests;

#[cfg(test)]
fn edge_case_elements(ring: &RingCtx) -> Vec<El> {
    [0, 1, -1, 2, -7, 12, i64::MAX, i64::MIN].into_iter().map(|x| ring.from_int(x).unwrap()).collect()
}

#[test]
fn test_ring_axioms() {
    let ZZ = integer_ring();
    generic_tests::test_ring_axioms(&ZZ, edge_case_elements(&ZZ).into_iter());
    generic_tests::test_division_law(&ZZ, edge_case_elements(&ZZ).into_iter());
}

#[test]
fn test_euclidean_division() {
    let ZZ = integer_ring();
    let x = ZZ.from_int(-7).unwrap();
    let y = ZZ.from_int(3).unwrap();
    let mut q = ZZ.init();
    let mut r = ZZ.init();
    assert_eq!(Status::Success, ZZ.euclidean_divrem(&mut q, &mut r, &x, &y));
    assert_eq!(&BigInt::from(-3), value(&q));
    assert_eq!(&BigInt::from(2), value(&r));
    assert_eq!(Status::Domain, ZZ.euclidean_div(&mut q, &x, &ZZ.init()));
}

#[test]
fn test_scalars_and_powers() {
    let ZZ = integer_ring();
    let mut x = ZZ.init();
    assert_eq!(Status::Success, ZZ.set_uint(&mut x, u64::MAX));
    assert_eq!(&BigInt::from(u64::MAX), value(&x));
    assert_eq!(Status::Domain, ZZ.set_rational(&mut x, &BigRational::new(1.into(), 2.into())));
    let mut y = ZZ.init();
    assert_eq!(Status::Success, ZZ.pow_uint(&mut y, &ZZ.from_int(-2).unwrap(), 11));
    assert_eq!(&BigInt::from(-2048), value(&y));
    assert_eq!(Status::Domain, ZZ.pow_int(&mut y, &ZZ.from_int(2).unwrap(), -1));
    assert_eq!(Status::Success, ZZ.pow_int(&mut y, &ZZ.from_int(-1).unwrap(), -3));
    assert_eq!(&BigInt::from(-1), value(&y));
    assert!(ZZ.is_neg_one(&y).is_true());
}

#[test]
fn test_canonical_associate_and_gcd() {
    let ZZ = integer_ring();
    let mut ux = ZZ.init();
    let mut u = ZZ.init();
    assert_eq!(Status::Success, ZZ.canonical_associate(&mut ux, &mut u, &ZZ.from_int(-6).unwrap()));
    assert_eq!(&BigInt::from(6), value(&ux));
    assert_eq!(&BigInt::from(-1), value(&u));
    let mut d = ZZ.init();
    assert_eq!(Status::Success, ZZ.gcd(&mut d, &ZZ.from_int(-12).unwrap(), &ZZ.from_int(18).unwrap()));
    assert_eq!(&BigInt::from(6), value(&d));
}

#[test]
fn test_factor() {
    let ZZ = integer_ring();
    let mut unit = ZZ.init();
    let mut factors = Vec::new();
    let mut exponents = Vec::new();
    assert_eq!(Status::Success, ZZ.factor(&mut unit, &mut factors, &mut exponents, &ZZ.from_int(-360).unwrap(), 0));
    assert_eq!(&BigInt::from(-1), value(&unit));
    assert_eq!(vec![BigInt::from(2), BigInt::from(3), BigInt::from(5)], factors.iter().map(|f| value(f).clone()).collect::<Vec<_>>());
    assert_eq!(vec![3, 2, 1], exponents);
}

#[test]
fn test_format() {
    let ZZ = integer_ring();
    assert_eq!("-42", format!("{}", ZZ.format(&ZZ.from_int(-42).unwrap())));
    assert_eq!("Integer ring (ZZ)", format!("{}", ZZ));
}
