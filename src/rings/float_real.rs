use std::f64::consts::PI;
use std::fmt;
use std::sync::OnceLock;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::ToPrimitive;

use crate::generic::{ctx_predicate_false, ctx_predicate_true};
use crate::method::*;
use crate::random::RandState;
use crate::ring::*;
use crate::status::*;

///
/// Values whose absolute value is below this bound, but that are not exactly zero,
/// might be zero up to rounding errors.
///
pub const ZERO_TOLERANCE: f64 = 1e-10;

///
/// Approximate real numbers, represented as `f64`.
///
/// Since rounding errors accumulate, it is in general undecidable whether a value
/// is zero. Values that are exactly zero are zero, values of absolute value at least
/// [`ZERO_TOLERANCE`] are nonzero, and for all other values, zero tests and equality
/// return [`Truth::Unknown`]. Operations that depend on such a test fail with
/// [`Status::Unable`].
///
pub fn float_real_ring() -> RingCtx {
    RingCtx::new(RingKind::FloatReal, std::mem::size_of::<f64>(), methods(), ())
}

pub fn value(x: &El) -> f64 {
    *x.downcast_ref::<f64>()
}

fn value_mut(x: &mut El) -> &mut f64 {
    x.downcast_mut::<f64>()
}

fn methods() -> &'static MethodTable {
    static METHODS: OnceLock<MethodTable> = OnceLock::new();
    METHODS.get_or_init(|| MethodTable::new(RingKind::FloatReal, &[
        (Method::CtxWrite, MethodFn::CtxWrite(ctx_write)),
        (Method::CtxIsRing, MethodFn::CtxPredicate(ctx_predicate_true)),
        (Method::CtxIsCommutativeRing, MethodFn::CtxPredicate(ctx_predicate_true)),
        (Method::CtxIsIntegralDomain, MethodFn::CtxPredicate(ctx_predicate_true)),
        (Method::CtxIsUniqueFactorizationDomain, MethodFn::CtxPredicate(ctx_predicate_true)),
        (Method::CtxIsField, MethodFn::CtxPredicate(ctx_predicate_true)),
        (Method::CtxIsRationalVectorSpace, MethodFn::CtxPredicate(ctx_predicate_true)),
        (Method::CtxIsRealVectorSpace, MethodFn::CtxPredicate(ctx_predicate_true)),
        (Method::CtxIsComplexVectorSpace, MethodFn::CtxPredicate(ctx_predicate_false)),
        (Method::CtxIsThreadsafe, MethodFn::CtxPredicate(ctx_predicate_true)),
        (Method::Init, MethodFn::Init(init)),
        (Method::Randtest, MethodFn::Randtest(randtest)),
        (Method::Write, MethodFn::Write(write)),
        (Method::One, MethodFn::Constant(one)),
        (Method::Pi, MethodFn::Constant(pi)),
        (Method::IsZero, MethodFn::Predicate(is_zero)),
        (Method::Equal, MethodFn::Equal(equal)),
        (Method::Set, MethodFn::Unary(set)),
        (Method::SetInt, MethodFn::SetInt(set_int)),
        (Method::SetBigInt, MethodFn::SetBigInt(set_bigint)),
        (Method::SetRational, MethodFn::SetRational(set_rational)),
        (Method::SetOther, MethodFn::SetOther(set_other)),
        (Method::Neg, MethodFn::Unary(neg)),
        (Method::Add, MethodFn::Binary(add)),
        (Method::Sub, MethodFn::Binary(sub)),
        (Method::Mul, MethodFn::Binary(mul)),
        (Method::Div, MethodFn::Binary(div)),
        (Method::Inv, MethodFn::Unary(inv)),
    ]))
}

fn ctx_write(out: &mut dyn fmt::Write, _: &RingCtx) -> fmt::Result {
    write!(out, "Approximate real numbers (f64)")
}

fn zero_test(x: f64) -> Truth {
    if x == 0. {
        Truth::True
    } else if x.abs() < ZERO_TOLERANCE {
        Truth::Unknown
    } else if x.is_finite() {
        Truth::False
    } else {
        Truth::Unknown
    }
}

fn init(_: &RingCtx) -> El {
    El::new(0f64)
}

fn randtest(res: &mut El, state: &mut RandState, _: &RingCtx) -> Status {
    *value_mut(res) = if state.one_in(4) {
        state.rand_test_i64(8) as f64
    } else {
        (state.rand_float() - 0.5) * 200.
    };
    Status::Success
}

fn write(out: &mut dyn fmt::Write, x: &El, _: &RingCtx) -> fmt::Result {
    write!(out, "{}", value(x))
}

fn one(res: &mut El, _: &RingCtx) -> Status {
    *value_mut(res) = 1.;
    Status::Success
}

fn pi(res: &mut El, _: &RingCtx) -> Status {
    *value_mut(res) = PI;
    Status::Success
}

fn is_zero(x: &El, _: &RingCtx) -> Truth {
    zero_test(value(x))
}

fn equal(x: &El, y: &El, _: &RingCtx) -> Truth {
    if value(x) == value(y) {
        Truth::True
    } else {
        zero_test(value(x) - value(y))
    }
}

fn set(res: &mut El, x: &El, _: &RingCtx) -> Status {
    *value_mut(res) = value(x);
    Status::Success
}

fn set_int(res: &mut El, x: i64, _: &RingCtx) -> Status {
    *value_mut(res) = x as f64;
    Status::Success
}

fn set_finite(res: &mut El, x: Option<f64>) -> Status {
    match x {
        Some(x) if x.is_finite() => {
            *value_mut(res) = x;
            Status::Success
        },
        _ => Status::Unable
    }
}

fn set_bigint(res: &mut El, x: &BigInt, _: &RingCtx) -> Status {
    set_finite(res, x.to_f64())
}

fn set_rational(res: &mut El, x: &BigRational, _: &RingCtx) -> Status {
    set_finite(res, x.to_f64())
}

fn set_other(res: &mut El, x: &El, x_ring: &RingCtx, ring: &RingCtx) -> Status {
    match x_ring.which_ring() {
        RingKind::FloatReal => set(res, x, ring),
        RingKind::Integer => set_bigint(res, x.downcast_ref::<BigInt>(), ring),
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

fn sub(res: &mut El, x: &El, y: &El, _: &RingCtx) -> Status {
    *value_mut(res) = value(x) - value(y);
    Status::Success
}

fn mul(res: &mut El, x: &El, y: &El, _: &RingCtx) -> Status {
    *value_mut(res) = value(x) * value(y);
    Status::Success
}

fn div(res: &mut El, x: &El, y: &El, _: &RingCtx) -> Status {
    match zero_test(value(y)) {
        Truth::True => Status::Domain,
        Truth::Unknown => Status::Unable,
        Truth::False => {
            *value_mut(res) = value(x) / value(y);
            Status::Success
        }
    }
}

fn inv(res: &mut El, x: &El, _: &RingCtx) -> Status {
    match zero_test(value(x)) {
        Truth::True => Status::Domain,
        Truth::Unknown => Status::Unable,
        Truth::False => {
            *value_mut(res) = 1. / value(x);
            Status::Success
        }
    }
}

#[test]
fn test_zero_test() {
    let RR = float_real_ring();
    assert!(RR.is_zero(&RR.init()).is_true());
    assert!(RR.is_zero(&RR.from_int(1).unwrap()).is_false());
    let mut tiny = RR.init();
    assert_eq!(Status::Success, RR.set_rational(&mut tiny, &BigRational::new(1.into(), BigInt::from(10).pow(15))));
    assert!(RR.is_zero(&tiny).is_unknown());
    let mut res = RR.init();
    assert_eq!(Status::Unable, RR.inv(&mut res, &tiny));
    assert_eq!(Status::Domain, RR.inv(&mut res, &RR.init()));
}

#[test]
fn test_pi_and_scalars() {
    let RR = float_real_ring();
    let mut res = RR.init();
    assert_eq!(Status::Success, RR.set_pi(&mut res));
    assert_eq!(PI, value(&res));
    assert_eq!(Status::Success, RR.mul_int(&mut res, &RR.from_int(3).unwrap(), 2));
    assert_eq!(6., value(&res));
    assert_eq!(Status::Success, RR.pow_int(&mut res, &RR.from_int(2).unwrap(), -2));
    assert_eq!(0.25, value(&res));
    assert_eq!(Status::Unable, RR.set_bigint(&mut res, &BigInt::from(10).pow(400)));
}
