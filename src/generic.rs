use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed};

use crate::algorithms::sqr_mul::generic_abs_square_and_multiply;
use crate::method::*;
use crate::parse;
use crate::ring::*;
use crate::status::*;

///
/// Fallback implementations that are installed in every [`MethodTable`] before
/// the entries of the ring kind itself.
///
/// They reduce an operation to other operations of the same ring (e.g. `add_int`
/// to `set_int` and `add`), or answer conservatively with [`Status::Unable`] resp.
/// [`Truth::Unknown`]. Hence a ring kind only has to implement the basic operations
/// `init`, `write`, `equal`, `set`, `set_bigint`, `one`, `neg`, `add`, `sub` and `mul`
/// to be usable.
///
pub fn default_methods() -> &'static [(Method, MethodFn)] {
    DEFAULT_METHODS
}

static DEFAULT_METHODS: &[(Method, MethodFn)] = &[
    (Method::CtxIsRing, MethodFn::CtxPredicate(ctx_predicate_unknown)),
    (Method::CtxIsCommutativeRing, MethodFn::CtxPredicate(ctx_predicate_unknown)),
    (Method::CtxIsIntegralDomain, MethodFn::CtxPredicate(ctx_predicate_unknown)),
    (Method::CtxIsUniqueFactorizationDomain, MethodFn::CtxPredicate(ctx_predicate_unknown)),
    (Method::CtxIsField, MethodFn::CtxPredicate(ctx_predicate_unknown)),
    (Method::CtxIsRationalVectorSpace, MethodFn::CtxPredicate(ctx_predicate_unknown)),
    (Method::CtxIsRealVectorSpace, MethodFn::CtxPredicate(ctx_predicate_unknown)),
    (Method::CtxIsComplexVectorSpace, MethodFn::CtxPredicate(ctx_predicate_unknown)),
    (Method::CtxIsThreadsafe, MethodFn::CtxPredicate(ctx_predicate_unknown)),
    (Method::CtxSetGenName, MethodFn::CtxSetGenName(ctx_set_gen_name)),
    (Method::CtxSetGenNames, MethodFn::CtxSetGenNames(ctx_set_gen_names)),

    (Method::Swap, MethodFn::Swap(swap)),
    (Method::SetShallow, MethodFn::SetShallow(set_shallow)),

    (Method::Zero, MethodFn::Constant(zero)),
    (Method::NegOne, MethodFn::Constant(neg_one)),
    (Method::Gen, MethodFn::Constant(unable_constant)),
    (Method::Gens, MethodFn::Gens(gens)),
    (Method::GensRecursive, MethodFn::Gens(gens_recursive)),
    (Method::I, MethodFn::Constant(unable_constant)),
    (Method::Pi, MethodFn::Constant(unable_constant)),

    (Method::IsZero, MethodFn::Predicate(is_zero)),
    (Method::IsOne, MethodFn::Predicate(is_one)),
    (Method::IsNegOne, MethodFn::Predicate(is_neg_one)),

    (Method::SetUint, MethodFn::SetUint(set_uint)),
    (Method::SetInt, MethodFn::SetInt(set_int)),
    (Method::SetRational, MethodFn::SetRational(set_rational)),
    (Method::SetOther, MethodFn::SetOther(set_other)),
    (Method::SetStr, MethodFn::SetStr(set_str)),

    (Method::AddUint, MethodFn::OpUint(add_uint)),
    (Method::AddInt, MethodFn::OpInt(add_int)),
    (Method::AddBigInt, MethodFn::OpBigInt(add_bigint)),
    (Method::AddRational, MethodFn::OpRational(add_rational)),
    (Method::SubUint, MethodFn::OpUint(sub_uint)),
    (Method::SubInt, MethodFn::OpInt(sub_int)),
    (Method::SubBigInt, MethodFn::OpBigInt(sub_bigint)),
    (Method::SubRational, MethodFn::OpRational(sub_rational)),
    (Method::MulOther, MethodFn::MulOther(mul_other)),
    (Method::OtherMul, MethodFn::OtherMul(other_mul)),
    (Method::MulUint, MethodFn::OpUint(mul_uint)),
    (Method::MulInt, MethodFn::OpInt(mul_int)),
    (Method::MulBigInt, MethodFn::OpBigInt(mul_bigint)),
    (Method::MulRational, MethodFn::OpRational(mul_rational)),

    (Method::PowUint, MethodFn::OpUint(pow_uint)),
    (Method::PowInt, MethodFn::OpInt(pow_int)),
    (Method::PowBigInt, MethodFn::OpBigInt(pow_bigint)),
    (Method::Div, MethodFn::Binary(unable_binary)),
    (Method::Divexact, MethodFn::Binary(divexact)),
    (Method::Inv, MethodFn::Unary(inv)),

    (Method::EuclideanDiv, MethodFn::Binary(euclidean_div)),
    (Method::EuclideanRem, MethodFn::Binary(euclidean_rem)),
    (Method::EuclideanDivrem, MethodFn::Divrem(euclidean_divrem)),

    (Method::CanonicalAssociate, MethodFn::CanonicalAssociate(canonical_associate)),
    (Method::Gcd, MethodFn::Binary(unable_binary)),
    (Method::Factor, MethodFn::Factor(factor)),
];

pub fn ctx_predicate_unknown(_: &RingCtx) -> Truth {
    Truth::Unknown
}

pub fn ctx_predicate_true(_: &RingCtx) -> Truth {
    Truth::True
}

pub fn ctx_predicate_false(_: &RingCtx) -> Truth {
    Truth::False
}

fn ctx_set_gen_name(_: &mut RingCtx, _: &str) -> Status {
    Status::Unable
}

fn ctx_set_gen_names(ring: &mut RingCtx, names: &[&str]) -> Status {
    match names {
        [name] => ring.set_gen_name(name),
        _ => Status::Domain
    }
}

fn swap(x: &mut El, y: &mut El, _: &RingCtx) {
    std::mem::swap(x, y);
}

fn set_shallow(res: &mut El, x: El, _: &RingCtx) {
    *res = x;
}

fn zero(res: &mut El, ring: &RingCtx) -> Status {
    *res = ring.init();
    Status::Success
}

fn neg_one(res: &mut El, ring: &RingCtx) -> Status {
    let one = match ring.one_el() {
        Ok(one) => one,
        Err(e) => return e.into()
    };
    ring.neg(res, &one)
}

fn unable_constant(_: &mut El, _: &RingCtx) -> Status {
    Status::Unable
}

fn gens(res: &mut Vec<El>, ring: &RingCtx) -> Status {
    match ring.generator() {
        Ok(gen) => {
            res.clear();
            res.push(gen);
            Status::Success
        },
        Err(e) => e.into()
    }
}

fn gens_recursive(res: &mut Vec<El>, _: &RingCtx) -> Status {
    res.clear();
    Status::Success
}

fn is_zero(x: &El, ring: &RingCtx) -> Truth {
    ring.equal(x, &ring.init())
}

fn is_one(x: &El, ring: &RingCtx) -> Truth {
    match ring.one_el() {
        Ok(one) => ring.equal(x, &one),
        Err(_) => Truth::Unknown
    }
}

fn is_neg_one(x: &El, ring: &RingCtx) -> Truth {
    let mut neg_one = ring.init();
    if !ring.neg_one(&mut neg_one).is_success() {
        return Truth::Unknown;
    }
    ring.equal(x, &neg_one)
}

fn set_uint(res: &mut El, x: u64, ring: &RingCtx) -> Status {
    match i64::try_from(x) {
        Ok(x) => ring.set_int(res, x),
        Err(_) => ring.set_bigint(res, &BigInt::from(x))
    }
}

fn set_int(res: &mut El, x: i64, ring: &RingCtx) -> Status {
    ring.set_bigint(res, &BigInt::from(x))
}

fn set_rational(res: &mut El, x: &BigRational, ring: &RingCtx) -> Status {
    if x.denom().is_one() {
        return ring.set_bigint(res, x.numer());
    }
    let (num, den) = match (ring.from_bigint(x.numer()), ring.from_bigint(x.denom())) {
        (Ok(num), Ok(den)) => (num, den),
        (Err(e), _) | (_, Err(e)) => return e.into()
    };
    ring.div(res, &num, &den)
}

///
/// Converts from the same ring, or from the integers or rationals. Any other source
/// ring is not understood, so the result is [`Status::Unable`].
///
fn set_other(res: &mut El, x: &El, x_ring: &RingCtx, ring: &RingCtx) -> Status {
    if std::ptr::eq(x_ring, ring) {
        return ring.set(res, x);
    }
    match x_ring.which_ring() {
        RingKind::Integer => ring.set_bigint(res, x.downcast_ref::<BigInt>()),
        RingKind::Rational => ring.set_rational(res, x.downcast_ref::<BigRational>()),
        _ => Status::Unable
    }
}

///
/// Parses an expression in the generators of the ring, with numeric literals
/// read as integers or rationals.
///
fn set_str(res: &mut El, input: &str, ring: &RingCtx) -> Status {
    parse::set_str_with(res, input, ring, |value, atom| parse::set_literal(value, atom, ring))
}

///
/// Converts the scalar into a temporary element and applies the binary operation.
///
fn scalar_op<F>(res: &mut El, x: &El, ring: &RingCtx, set_scalar: F, op: fn(&RingCtx, &mut El, &El, &El) -> Status) -> Status
    where F: FnOnce(&mut El) -> Status
{
    let mut y = ring.init();
    let status = set_scalar(&mut y);
    if !status.is_success() {
        return status;
    }
    op(ring, res, x, &y)
}

macro_rules! scalar_variant {
    ($name:ident, $scalar:ty, $set:ident, $op:ident) => {
        fn $name(res: &mut El, x: &El, y: $scalar, ring: &RingCtx) -> Status {
            scalar_op(res, x, ring, |tmp| ring.$set(tmp, y), RingCtx::$op)
        }
    };
}

scalar_variant!{ add_uint, u64, set_uint, add }
scalar_variant!{ add_int, i64, set_int, add }
scalar_variant!{ add_bigint, &BigInt, set_bigint, add }
scalar_variant!{ add_rational, &BigRational, set_rational, add }
scalar_variant!{ sub_uint, u64, set_uint, sub }
scalar_variant!{ sub_int, i64, set_int, sub }
scalar_variant!{ sub_bigint, &BigInt, set_bigint, sub }
scalar_variant!{ sub_rational, &BigRational, set_rational, sub }
scalar_variant!{ mul_uint, u64, set_uint, mul }
scalar_variant!{ mul_int, i64, set_int, mul }
scalar_variant!{ mul_bigint, &BigInt, set_bigint, mul }
scalar_variant!{ mul_rational, &BigRational, set_rational, mul }

fn mul_other(res: &mut El, x: &El, y: &El, y_ring: &RingCtx, ring: &RingCtx) -> Status {
    match ring.from_other(y, y_ring) {
        Ok(y) => ring.mul(res, x, &y),
        Err(e) => e.into()
    }
}

fn other_mul(res: &mut El, x: &El, x_ring: &RingCtx, y: &El, ring: &RingCtx) -> Status {
    match ring.from_other(x, x_ring) {
        Ok(x) => ring.mul(res, &x, y),
        Err(e) => e.into()
    }
}

fn pow_uint(res: &mut El, x: &El, e: u64, ring: &RingCtx) -> Status {
    ring.pow_bigint(res, x, &BigInt::from(e))
}

fn pow_int(res: &mut El, x: &El, e: i64, ring: &RingCtx) -> Status {
    ring.pow_bigint(res, x, &BigInt::from(e))
}

///
/// Square-and-multiply using the multiplication of the ring. Negative exponents
/// invert `x` first. The result is only written on success.
///
pub fn pow_bigint(res: &mut El, x: &El, e: &BigInt, ring: &RingCtx) -> Status {
    let inverse;
    let base = if e.is_negative() {
        let mut tmp = ring.init();
        let status = ring.inv(&mut tmp, x);
        if !status.is_success() {
            return status;
        }
        inverse = tmp;
        &inverse
    } else {
        x
    };
    let one = match ring.one_el() {
        Ok(one) => one,
        Err(e) => return e.into()
    };
    let result: Result<El, Failure> = generic_abs_square_and_multiply(
        base,
        e.magnitude(),
        |a| {
            let mut square = ring.init();
            ring.mul(&mut square, &a, &a).into_result()?;
            Ok(square)
        },
        |b, a| {
            let mut product = ring.init();
            ring.mul(&mut product, &a, b).into_result()?;
            Ok(product)
        },
        one
    );
    match result {
        Ok(value) => {
            *res = value;
            Status::Success
        },
        Err(e) => Status::from(e)
    }
}

fn unable_binary(_: &mut El, _: &El, _: &El, _: &RingCtx) -> Status {
    Status::Unable
}

fn divexact(res: &mut El, x: &El, y: &El, ring: &RingCtx) -> Status {
    ring.div(res, x, y)
}

fn inv(res: &mut El, x: &El, ring: &RingCtx) -> Status {
    if ring.is_one(x).is_true() {
        return ring.set(res, x);
    }
    match ring.one_el() {
        Ok(one) => ring.div(res, &one, x),
        Err(e) => e.into()
    }
}

fn euclidean_div(res: &mut El, x: &El, y: &El, ring: &RingCtx) -> Status {
    if ring.ctx_is_field().is_true() {
        ring.div(res, x, y)
    } else {
        Status::Unable
    }
}

fn euclidean_rem(res: &mut El, _: &El, y: &El, ring: &RingCtx) -> Status {
    if !ring.ctx_is_field().is_true() {
        return Status::Unable;
    }
    match ring.is_zero(y) {
        Truth::True => Status::Domain,
        Truth::False => ring.zero(res),
        Truth::Unknown => Status::Unable
    }
}

fn euclidean_divrem(quo: &mut El, rem: &mut El, x: &El, y: &El, ring: &RingCtx) -> Status {
    ring.euclidean_div(quo, x, y).and_then(|| ring.euclidean_rem(rem, x, y))
}

fn canonical_associate(_: &mut El, _: &mut El, _: &El, _: &RingCtx) -> Status {
    Status::Unable
}

fn factor(_: &mut El, _: &mut Vec<El>, _: &mut Vec<u64>, _: &El, _: u32, _: &RingCtx) -> Status {
    Status::Unable
}
