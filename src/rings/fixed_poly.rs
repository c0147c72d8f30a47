use std::fmt::{self, Display};
use std::sync::OnceLock;

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{Signed, Zero};

use crate::method::*;
use crate::random::RandState;
use crate::ring::*;
use crate::rings::poly::dense_poly::write_terms;
use crate::status::*;

///
/// Coefficients of the dense polynomial kinds with a fixed coefficient type.
///
trait FixedCoefficient: Clone + Signed + Display + Send + Sync + 'static {

    const KIND: RingKind;

    fn from_bigint(x: &BigInt) -> Self;

    fn from_rational(x: &BigRational) -> Option<Self>;

    ///
    /// Returns `x / y` if the quotient exists.
    ///
    fn exact_div(x: &Self, y: &Self) -> Option<Self>;

    fn random(state: &mut RandState) -> Self;
}

impl FixedCoefficient for BigInt {

    const KIND: RingKind = RingKind::IntegerPoly;

    fn from_bigint(x: &BigInt) -> Self {
        x.clone()
    }

    fn from_rational(x: &BigRational) -> Option<Self> {
        if x.is_integer() { Some(x.numer().clone()) } else { None }
    }

    fn exact_div(x: &Self, y: &Self) -> Option<Self> {
        let (quo, rem) = x.div_rem(y);
        if rem.is_zero() { Some(quo) } else { None }
    }

    fn random(state: &mut RandState) -> Self {
        BigInt::from(state.rand_test_i64(10))
    }
}

impl FixedCoefficient for BigRational {

    const KIND: RingKind = RingKind::RationalPoly;

    fn from_bigint(x: &BigInt) -> Self {
        BigRational::from_integer(x.clone())
    }

    fn from_rational(x: &BigRational) -> Option<Self> {
        Some(x.clone())
    }

    fn exact_div(x: &Self, y: &Self) -> Option<Self> {
        Some(x / y)
    }

    fn random(state: &mut RandState) -> Self {
        let den = state.rand_range(1..8) as i64;
        BigRational::new(state.rand_test_i64(6).into(), den.into())
    }
}

///
/// The ring `ZZ[x]` of dense polynomials with arbitrary-precision integer
/// coefficients. Elements are `Vec<BigInt>` without trailing zeros.
///
/// This kind does not build upon a base ring context; its main use is as a
/// source of conversions into generic polynomial rings.
///
pub fn integer_poly_ring() -> RingCtx {
    RingCtx::new(RingKind::IntegerPoly, std::mem::size_of::<Vec<BigInt>>(), methods::<BigInt>(), ())
}

///
/// The ring `QQ[x]` of dense polynomials with arbitrary-precision rational
/// coefficients. Elements are `Vec<BigRational>` without trailing zeros.
///
pub fn rational_poly_ring() -> RingCtx {
    RingCtx::new(RingKind::RationalPoly, std::mem::size_of::<Vec<BigRational>>(), methods::<BigRational>(), ())
}

///
/// Returns the coefficients of an element of [`integer_poly_ring()`] (for `C = BigInt`)
/// or [`rational_poly_ring()`] (for `C = BigRational`).
///
pub fn coefficients<C: 'static>(x: &El) -> &[C] {
    x.downcast_ref::<Vec<C>>()
}

///
/// Creates an element of [`integer_poly_ring()`] or [`rational_poly_ring()`],
/// depending on `C`.
///
pub fn from_coefficients<C>(mut coeffs: Vec<C>) -> El
    where C: Zero + Send + Sync + 'static
{
    while coeffs.last().map(|c| c.is_zero()).unwrap_or(false) {
        coeffs.pop();
    }
    El::new(coeffs)
}

fn coeffs_mut<C: 'static>(x: &mut El) -> &mut Vec<C> {
    x.downcast_mut::<Vec<C>>()
}

fn normalize<C: FixedCoefficient>(coeffs: &mut Vec<C>) {
    while coeffs.last().map(|c| c.is_zero()).unwrap_or(false) {
        coeffs.pop();
    }
}

fn methods<C: FixedCoefficient>() -> &'static MethodTable {
    static INTEGER_METHODS: OnceLock<MethodTable> = OnceLock::new();
    static RATIONAL_METHODS: OnceLock<MethodTable> = OnceLock::new();
    let cell = match C::KIND {
        RingKind::IntegerPoly => &INTEGER_METHODS,
        _ => &RATIONAL_METHODS
    };
    cell.get_or_init(|| MethodTable::new(C::KIND, &[
        (Method::CtxWrite, MethodFn::CtxWrite(ctx_write::<C>)),
        (Method::CtxIsRing, MethodFn::CtxPredicate(crate::generic::ctx_predicate_true)),
        (Method::CtxIsCommutativeRing, MethodFn::CtxPredicate(crate::generic::ctx_predicate_true)),
        (Method::CtxIsIntegralDomain, MethodFn::CtxPredicate(crate::generic::ctx_predicate_true)),
        (Method::CtxIsField, MethodFn::CtxPredicate(crate::generic::ctx_predicate_false)),
        (Method::CtxIsThreadsafe, MethodFn::CtxPredicate(crate::generic::ctx_predicate_true)),
        (Method::Init, MethodFn::Init(init::<C>)),
        (Method::Randtest, MethodFn::Randtest(randtest::<C>)),
        (Method::Write, MethodFn::Write(write::<C>)),
        (Method::One, MethodFn::Constant(one::<C>)),
        (Method::Gen, MethodFn::Constant(gen::<C>)),
        (Method::GensRecursive, MethodFn::Gens(gens_recursive::<C>)),
        (Method::IsZero, MethodFn::Predicate(is_zero::<C>)),
        (Method::IsOne, MethodFn::Predicate(is_one::<C>)),
        (Method::Equal, MethodFn::Equal(equal::<C>)),
        (Method::Set, MethodFn::Unary(set::<C>)),
        (Method::SetBigInt, MethodFn::SetBigInt(set_bigint::<C>)),
        (Method::SetRational, MethodFn::SetRational(set_rational::<C>)),
        (Method::SetOther, MethodFn::SetOther(set_other::<C>)),
        (Method::Neg, MethodFn::Unary(neg::<C>)),
        (Method::Add, MethodFn::Binary(add::<C>)),
        (Method::Sub, MethodFn::Binary(sub::<C>)),
        (Method::Mul, MethodFn::Binary(mul::<C>)),
        (Method::Div, MethodFn::Binary(div::<C>)),
    ]))
}

fn ctx_write<C: FixedCoefficient>(out: &mut dyn fmt::Write, _: &RingCtx) -> fmt::Result {
    match C::KIND {
        RingKind::IntegerPoly => write!(out, "Ring of polynomials over Integer ring (ZZ)"),
        _ => write!(out, "Ring of polynomials over Rational field (QQ)")
    }
}

fn init<C: FixedCoefficient>(_: &RingCtx) -> El {
    El::new(Vec::<C>::new())
}

fn randtest<C: FixedCoefficient>(res: &mut El, state: &mut RandState, _: &RingCtx) -> Status {
    let len = state.rand_range(0..5) as usize;
    let mut result = (0..len).map(|_| C::random(state)).collect::<Vec<C>>();
    normalize(&mut result);
    *coeffs_mut::<C>(res) = result;
    Status::Success
}

fn write<C: FixedCoefficient>(out: &mut dyn fmt::Write, x: &El, _: &RingCtx) -> fmt::Result {
    let terms = coefficients::<C>(x).iter().enumerate()
        .filter(|(_, c)| !c.is_zero())
        .map(|(i, c)| (i, Ok(format!("{}", c)), c.is_one()));
    write_terms(out, "x", terms)
}

fn one<C: FixedCoefficient>(res: &mut El, _: &RingCtx) -> Status {
    *coeffs_mut::<C>(res) = vec![C::one()];
    Status::Success
}

fn gen<C: FixedCoefficient>(res: &mut El, _: &RingCtx) -> Status {
    *coeffs_mut::<C>(res) = vec![C::zero(), C::one()];
    Status::Success
}

fn gens_recursive<C: FixedCoefficient>(res: &mut Vec<El>, ring: &RingCtx) -> Status {
    let mut x = init::<C>(ring);
    let status = gen::<C>(&mut x, ring);
    res.clear();
    res.push(x);
    status
}

fn is_zero<C: FixedCoefficient>(x: &El, _: &RingCtx) -> Truth {
    Truth::from(coefficients::<C>(x).is_empty())
}

fn is_one<C: FixedCoefficient>(x: &El, _: &RingCtx) -> Truth {
    let x = coefficients::<C>(x);
    Truth::from(x.len() == 1 && x[0].is_one())
}

fn equal<C: FixedCoefficient>(x: &El, y: &El, _: &RingCtx) -> Truth {
    Truth::from(coefficients::<C>(x) == coefficients::<C>(y))
}

fn set<C: FixedCoefficient>(res: &mut El, x: &El, _: &RingCtx) -> Status {
    *coeffs_mut::<C>(res) = coefficients::<C>(x).to_vec();
    Status::Success
}

fn set_constant<C: FixedCoefficient>(res: &mut El, c: C) {
    let mut coeffs = vec![c];
    normalize(&mut coeffs);
    *coeffs_mut::<C>(res) = coeffs;
}

fn set_bigint<C: FixedCoefficient>(res: &mut El, x: &BigInt, _: &RingCtx) -> Status {
    set_constant(res, C::from_bigint(x));
    Status::Success
}

fn set_rational<C: FixedCoefficient>(res: &mut El, x: &BigRational, _: &RingCtx) -> Status {
    match C::from_rational(x) {
        Some(c) => {
            set_constant(res, c);
            Status::Success
        },
        None => Status::Domain
    }
}

///
/// Converts from integers, rationals and the other fixed polynomial kind.
///
fn set_other<C: FixedCoefficient>(res: &mut El, x: &El, x_ring: &RingCtx, ring: &RingCtx) -> Status {
    match x_ring.which_ring() {
        kind if kind == C::KIND => set::<C>(res, x, ring),
        RingKind::Integer => set_bigint::<C>(res, x.downcast_ref::<BigInt>(), ring),
        RingKind::Rational => set_rational::<C>(res, x.downcast_ref::<BigRational>(), ring),
        RingKind::IntegerPoly => {
            *coeffs_mut::<C>(res) = coefficients::<BigInt>(x).iter().map(C::from_bigint).collect();
            Status::Success
        },
        RingKind::RationalPoly => {
            match coefficients::<BigRational>(x).iter().map(C::from_rational).collect::<Option<Vec<C>>>() {
                Some(coeffs) => {
                    *coeffs_mut::<C>(res) = coeffs;
                    Status::Success
                },
                None => Status::Domain
            }
        },
        _ => Status::Unable
    }
}

fn neg<C: FixedCoefficient>(res: &mut El, x: &El, _: &RingCtx) -> Status {
    *coeffs_mut::<C>(res) = coefficients::<C>(x).iter().map(|c| -c.clone()).collect();
    Status::Success
}

fn add_or_sub<C: FixedCoefficient>(x: &[C], y: &[C], subtract: bool) -> Vec<C> {
    let mut result = Vec::with_capacity(x.len().max(y.len()));
    for i in 0..x.len().max(y.len()) {
        let a = x.get(i).cloned().unwrap_or_else(C::zero);
        let b = y.get(i).cloned().unwrap_or_else(C::zero);
        result.push(if subtract { a - b } else { a + b });
    }
    normalize(&mut result);
    return result;
}

fn add<C: FixedCoefficient>(res: &mut El, x: &El, y: &El, _: &RingCtx) -> Status {
    *coeffs_mut::<C>(res) = add_or_sub(coefficients::<C>(x), coefficients::<C>(y), false);
    Status::Success
}

fn sub<C: FixedCoefficient>(res: &mut El, x: &El, y: &El, _: &RingCtx) -> Status {
    *coeffs_mut::<C>(res) = add_or_sub(coefficients::<C>(x), coefficients::<C>(y), true);
    Status::Success
}

fn mul<C: FixedCoefficient>(res: &mut El, x: &El, y: &El, _: &RingCtx) -> Status {
    let (x, y) = (coefficients::<C>(x), coefficients::<C>(y));
    if x.is_empty() || y.is_empty() {
        coeffs_mut::<C>(res).clear();
        return Status::Success;
    }
    let mut result = vec![C::zero(); x.len() + y.len() - 1];
    for (i, a) in x.iter().enumerate() {
        for (j, b) in y.iter().enumerate() {
            result[i + j] = result[i + j].clone() + a.clone() * b.clone();
        }
    }
    normalize(&mut result);
    *coeffs_mut::<C>(res) = result;
    Status::Success
}

///
/// Exact division by long division. Fails with [`Status::Domain`] if the
/// quotient does not exist.
///
fn div<C: FixedCoefficient>(res: &mut El, x: &El, y: &El, _: &RingCtx) -> Status {
    let (x, y) = (coefficients::<C>(x), coefficients::<C>(y));
    let Some(lc) = y.last() else {
        return Status::Domain;
    };
    if x.len() < y.len() {
        if x.is_empty() {
            coeffs_mut::<C>(res).clear();
            return Status::Success;
        }
        return Status::Domain;
    }
    let mut remainder = x.to_vec();
    let mut quotient = vec![C::zero(); x.len() + 1 - y.len()];
    for i in (0..quotient.len()).rev() {
        let Some(q) = C::exact_div(&remainder[i + y.len() - 1], lc) else {
            return Status::Domain;
        };
        for (j, b) in y.iter().enumerate() {
            remainder[i + j] = remainder[i + j].clone() - q.clone() * b.clone();
        }
        quotient[i] = q;
    }
    if remainder.iter().any(|c| !c.is_zero()) {
        return Status::Domain;
    }
    *coeffs_mut::<C>(res) = quotient;
    Status::Success
}

#[cfg(test)]
use crate::ring::generic_tests;

#[cfg(test)]
fn int_poly(coeffs: &[i64]) -> El {
    from_coefficients(coeffs.iter().map(|c| BigInt::from(*c)).collect())
}

#[test]
fn test_ring_axioms() {
    let ZZX = integer_poly_ring();
    let elements: [&[i64]; 6] = [&[], &[1], &[-1], &[0, 1], &[2, 0, -3], &[1, 1, 1, 1]];
    generic_tests::test_ring_axioms(&ZZX, elements.iter().map(|c| int_poly(c)));
    generic_tests::test_division_law(&ZZX, elements.iter().map(|c| int_poly(c)));
}

#[test]
fn test_write() {
    let ZZX = integer_poly_ring();
    assert_eq!("0", format!("{}", ZZX.format(&ZZX.init())));
    assert_eq!("-1 + x + (-3)*x^3", format!("{}", ZZX.format(&int_poly(&[-1, 1, 0, -3]))));
    let QQX = rational_poly_ring();
    let f = from_coefficients(vec![BigRational::new(1.into(), 2.into()), BigRational::from_integer(2.into())]);
    assert_eq!("1/2 + 2*x", format!("{}", QQX.format(&f)));
    assert_eq!("Ring of polynomials over Rational field (QQ)", format!("{}", QQX));
}

#[test]
fn test_div() {
    let ZZX = integer_poly_ring();
    let mut res = ZZX.init();
    assert_eq!(Status::Success, ZZX.div(&mut res, &int_poly(&[-1, 0, 1]), &int_poly(&[1, 1])));
    assert_el_eq!(ZZX, int_poly(&[-1, 1]), res);
    assert_eq!(Status::Domain, ZZX.div(&mut res, &int_poly(&[1, 0, 1]), &int_poly(&[1, 1])));
    assert_eq!(Status::Domain, ZZX.div(&mut res, &int_poly(&[1, 1]), &int_poly(&[2])));
    assert_eq!(Status::Domain, ZZX.div(&mut res, &int_poly(&[1, 1]), &ZZX.init()));

    let QQX = rational_poly_ring();
    let mut res = QQX.init();
    let f = from_coefficients(vec![BigRational::from_integer(1.into()), BigRational::from_integer(1.into())]);
    let g = from_coefficients(vec![BigRational::from_integer(2.into())]);
    assert_eq!(Status::Success, QQX.div(&mut res, &f, &g));
    assert_eq!(&[BigRational::new(1.into(), 2.into()), BigRational::new(1.into(), 2.into())][..], coefficients::<BigRational>(&res));
}

#[test]
fn test_set_other() {
    let ZZX = integer_poly_ring();
    let QQX = rational_poly_ring();
    let mut res = QQX.init();
    assert_eq!(Status::Success, QQX.set_other(&mut res, &int_poly(&[3, 0, 1]), &ZZX));
    assert_eq!(3, coefficients::<BigRational>(&res).len());
    let half = from_coefficients(vec![BigRational::new(1.into(), 2.into())]);
    let mut back = ZZX.init();
    assert_eq!(Status::Domain, ZZX.set_other(&mut back, &half, &QQX));
    assert_eq!(Status::Success, ZZX.set_other(&mut back, &res, &QQX));
    assert_el_eq!(ZZX, int_poly(&[3, 0, 1]), back);
    let mut gens = Vec::new();
    assert_eq!(Status::Success, ZZX.gens_recursive(&mut gens));
    assert_eq!("x", format!("{}", ZZX.format(&gens[0])));
}
