use std::fmt;
use std::sync::OnceLock;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Zero};

use crate::generic::{ctx_predicate_false, ctx_predicate_true};
use crate::method::*;
use crate::random::RandState;
use crate::ring::*;
use crate::status::*;

///
/// The field of rational numbers `QQ`, with elements represented as
/// [`num_rational::BigRational`] in lowest terms.
///
pub fn rational_field() -> RingCtx {
    RingCtx::new(RingKind::Rational, std::mem::size_of::<BigRational>(), methods(), ())
}

pub fn value(x: &El) -> &BigRational {
    x.downcast_ref::<BigRational>()
}

fn value_mut(x: &mut El) -> &mut BigRational {
    x.downcast_mut::<BigRational>()
}

fn methods() -> &'static MethodTable {
    static METHODS: OnceLock<MethodTable> = OnceLock::new();
    METHODS.get_or_init(|| MethodTable::new(RingKind::Rational, &[
        (Method::CtxWrite, MethodFn::CtxWrite(ctx_write)),
        (Method::CtxIsRing, MethodFn::CtxPredicate(ctx_predicate_true)),
        (Method::CtxIsCommutativeRing, MethodFn::CtxPredicate(ctx_predicate_true)),
        (Method::CtxIsIntegralDomain, MethodFn::CtxPredicate(ctx_predicate_true)),
        (Method::CtxIsUniqueFactorizationDomain, MethodFn::CtxPredicate(ctx_predicate_true)),
        (Method::CtxIsField, MethodFn::CtxPredicate(ctx_predicate_true)),
        (Method::CtxIsRationalVectorSpace, MethodFn::CtxPredicate(ctx_predicate_true)),
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
        (Method::SetBigInt, MethodFn::SetBigInt(set_bigint)),
        (Method::SetRational, MethodFn::SetRational(set_rational)),
        (Method::SetOther, MethodFn::SetOther(set_other)),
        (Method::Neg, MethodFn::Unary(neg)),
        (Method::Add, MethodFn::Binary(add)),
        (Method::Sub, MethodFn::Binary(sub)),
        (Method::Mul, MethodFn::Binary(mul)),
        (Method::Div, MethodFn::Binary(div)),
        (Method::Inv, MethodFn::Unary(inv)),
        (Method::CanonicalAssociate, MethodFn::CanonicalAssociate(canonical_associate)),
        (Method::Gcd, MethodFn::Binary(gcd)),
    ]))
}

fn ctx_write(out: &mut dyn fmt::Write, _: &RingCtx) -> fmt::Result {
    write!(out, "Rational field (QQ)")
}

fn init(_: &RingCtx) -> El {
    El::new(BigRational::zero())
}

fn randtest(res: &mut El, state: &mut RandState, _: &RingCtx) -> Status {
    let num = BigInt::from(state.rand_test_i64(20));
    let den = BigInt::from(state.rand_range(1..(1 << 10)));
    *value_mut(res) = BigRational::new(num, den);
    Status::Success
}

fn write(out: &mut dyn fmt::Write, x: &El, _: &RingCtx) -> fmt::Result {
    write!(out, "{}", value(x))
}

fn one(res: &mut El, _: &RingCtx) -> Status {
    *value_mut(res) = BigRational::one();
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

fn set_bigint(res: &mut El, x: &BigInt, _: &RingCtx) -> Status {
    *value_mut(res) = BigRational::from_integer(x.clone());
    Status::Success
}

fn set_rational(res: &mut El, x: &BigRational, _: &RingCtx) -> Status {
    value_mut(res).clone_from(x);
    Status::Success
}

fn set_other(res: &mut El, x: &El, x_ring: &RingCtx, ring: &RingCtx) -> Status {
    match x_ring.which_ring() {
        RingKind::Integer => set_bigint(res, x.downcast_ref::<BigInt>(), ring),
        RingKind::Rational => set(res, x, ring),
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

fn sub(res: &mut El, x: &El, y: &El, _: &RingCtx) -> Status {
    *value_mut(res) = value(x) - value(y);
    Status::Success
}

fn mul(res: &mut El, x: &El, y: &El, _: &RingCtx) -> Status {
    *value_mut(res) = value(x) * value(y);
    Status::Success
}

fn div(res: &mut El, x: &El, y: &El, _: &RingCtx) -> Status {
    if value(y).is_zero() {
        return Status::Domain;
    }
    *value_mut(res) = value(x) / value(y);
    Status::Success
}

fn inv(res: &mut El, x: &El, _: &RingCtx) -> Status {
    if value(x).is_zero() {
        return Status::Domain;
    }
    *value_mut(res) = value(x).recip();
    Status::Success
}

///
/// Every nonzero element is a unit, so the canonical associate is `0` or `1`.
///
fn canonical_associate(ux: &mut El, u: &mut El, x: &El, _: &RingCtx) -> Status {
    let x = value(x);
    if x.is_zero() {
        *value_mut(ux) = BigRational::zero();
        *value_mut(u) = BigRational::one();
    } else {
        *value_mut(ux) = BigRational::one();
        *value_mut(u) = x.recip();
    }
    Status::Success
}

fn gcd(res: &mut El, x: &El, y: &El, _: &RingCtx) -> Status {
    *value_mut(res) = if value(x).is_zero() && value(y).is_zero() {
        BigRational::zero()
    } else {
        BigRational::one()
    };
    Status::Success
}

#[cfg(test)]
use crate::ring::generic_tests;

#[cfg(test)]
fn edge_case_elements(ring: &RingCtx) -> Vec<El> {
    [(0, 1), (1, 1), (-1, 1), (1, 2), (-3, 7), (100, 3)].into_iter()
        .map(|(n, d)| ring.from_rational(&BigRational::new(n.into(), d.into())).unwrap())
        .collect()
}

#[test]
fn test_ring_axioms() {
    let QQ = rational_field();
    generic_tests::test_ring_axioms(&QQ, edge_case_elements(&QQ).into_iter());
    generic_tests::test_division_law(&QQ, edge_case_elements(&QQ).into_iter());
}

#[test]
fn test_euclidean_ops_of_field() {
    let QQ = rational_field();
    let x = QQ.from_int(3).unwrap();
    let y = QQ.from_int(4).unwrap();
    let mut q = QQ.init();
    let mut r = QQ.init();
    assert_eq!(Status::Success, QQ.euclidean_divrem(&mut q, &mut r, &x, &y));
    assert_eq!(&BigRational::new(3.into(), 4.into()), value(&q));
    assert!(QQ.is_zero(&r).is_true());
    assert_eq!(Status::Domain, QQ.euclidean_rem(&mut r, &x, &QQ.init()));
}

#[test]
fn test_pow_negative_exponent() {
    let QQ = rational_field();
    let mut res = QQ.init();
    assert_eq!(Status::Success, QQ.pow_int(&mut res, &QQ.from_int(2).unwrap(), -3));
    assert_eq!(&BigRational::new(1.into(), 8.into()), value(&res));
    assert_eq!(Status::Domain, QQ.pow_int(&mut res, &QQ.init(), -1));
}

#[test]
fn test_set_other_from_integers() {
    let ZZ = crate::rings::integer::integer_ring();
    let QQ = rational_field();
    let x = ZZ.from_int(-5).unwrap();
    let y = QQ.from_other(&x, &ZZ).unwrap();
    assert_eq!(&BigRational::from_integer((-5).into()), value(&y));
    let back = ZZ.from_other(&QQ.from_rational(&BigRational::new(6.into(), 3.into())).unwrap(), &QQ).unwrap();
    assert_eq!(&BigInt::from(2), crate::rings::integer::value(&back));
    assert_eq!("1/2", format!("{}", QQ.format(&QQ.from_rational(&BigRational::new(2.into(), 4.into())).unwrap())));
}
