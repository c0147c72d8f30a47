use std::borrow::Cow;
use std::fmt;
use std::sync::{Arc, OnceLock};

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, ToPrimitive};
use tracing::instrument;

use crate::generic::{self, ctx_predicate_false};
use crate::method::*;
use crate::parse;
use crate::random::RandState;
use crate::ring::*;
use crate::serialization::PolyRingConfig;
use crate::status::*;

///
/// Contains [`dense_poly::PolyEl`] and the coefficient-level algorithms the
/// polynomial ring is built from.
///
pub mod dense_poly;
///
/// Contains the rules by which elements of other rings are converted into
/// polynomials, see [`coerce::coercion_rule()`].
///
pub mod coerce;

use dense_poly::PolyEl;

pub const DEFAULT_GEN_NAME: &str = "x";

///
/// Configuration of a polynomial ring.
///
pub(crate) struct PolyCtxData {
    base_ring: Arc<RingCtx>,
    var: Cow<'static, str>,
    degree_limit: Option<usize>
}

///
/// Creates the ring of polynomials in one indeterminate, named `x`, over the given
/// base ring.
///
/// The base ring can be any ring, in particular another polynomial ring, and is
/// shared with the caller. All operations on polynomials are reduced to operations
/// on their coefficients in the base ring, so failures of the base ring (e.g. an
/// undecidable zero test) propagate to the polynomial ring.
///
/// # Example
/// ```
/// # use std::sync::Arc;
/// # use generic_ring::ring::*;
/// # use generic_ring::status::*;
/// # use generic_ring::rings::zn::zn;
/// # use generic_ring::rings::poly::*;
/// let base = Arc::new(zn(7));
/// let P = poly_ring(base);
/// let x = P.generator().unwrap();
/// let mut f = P.init();
/// let mut g = P.init();
/// assert_eq!(Status::Success, P.add_int(&mut f, &x, 1));
/// assert_eq!(Status::Success, P.sub_int(&mut g, &x, 1));
/// let mut h = P.init();
/// assert_eq!(Status::Success, P.mul(&mut h, &f, &g));
/// assert_eq!("6 + x^2", format!("{}", P.format(&h)));
/// ```
///
pub fn poly_ring(base_ring: Arc<RingCtx>) -> RingCtx {
    let data = PolyCtxData {
        base_ring,
        var: Cow::Borrowed(DEFAULT_GEN_NAME),
        degree_limit: None
    };
    RingCtx::new(RingKind::Poly, std::mem::size_of::<PolyEl>(), methods(), data)
}

///
/// Creates a polynomial ring with the generator name and degree ceiling given in
/// the configuration. Fails with [`Failure::Domain`] if the generator name is not
/// a valid identifier.
///
pub fn poly_ring_with(base_ring: Arc<RingCtx>, config: &PolyRingConfig) -> Result<RingCtx, Failure> {
    let mut result = poly_ring(base_ring);
    if config.gen_name != DEFAULT_GEN_NAME {
        result.set_gen_name(&config.gen_name).into_result()?;
    }
    set_degree_limit(&mut result, config.degree_limit);
    return Ok(result);
}

pub fn poly_config(ring: &RingCtx) -> PolyRingConfig {
    PolyRingConfig {
        gen_name: gen_name(ring).to_owned(),
        degree_limit: degree_limit(ring)
    }
}

fn data(ring: &RingCtx) -> &PolyCtxData {
    ring.data::<PolyCtxData>()
}

pub fn base_ring(ring: &RingCtx) -> &RingCtx {
    &data(ring).base_ring
}

pub fn gen_name(ring: &RingCtx) -> &str {
    &data(ring).var
}

///
/// The degree ceiling of the ring, if any. Multiplications whose operands have
/// lengths summing to more than the ceiling fail with [`Status::Unable`].
///
pub fn degree_limit(ring: &RingCtx) -> Option<usize> {
    data(ring).degree_limit
}

pub fn set_degree_limit(ring: &mut RingCtx, degree_limit: Option<usize>) {
    ring.data_mut::<PolyCtxData>().degree_limit = degree_limit;
}

///
/// Returns the coefficients `a_0, a_1, ...` of a polynomial.
///
pub fn coefficients(x: &El) -> &[El] {
    &x.downcast_ref::<PolyEl>().coeffs
}

///
/// Creates the polynomial with the given coefficients, which must be elements of
/// the base ring. Trailing coefficients that are provably zero are removed.
///
pub fn from_coefficients(ring: &RingCtx, mut coeffs: Vec<El>) -> El {
    dense_poly::normalize(&mut coeffs, base_ring(ring));
    El::new(PolyEl { coeffs })
}

fn coeffs_mut(x: &mut El) -> &mut Vec<El> {
    &mut x.downcast_mut::<PolyEl>().coeffs
}

///
/// Writes a computed coefficient vector to `res` if the computation succeeded.
///
fn store(res: &mut El, (coeffs, status): (Vec<El>, Status)) -> Status {
    if status.is_success() {
        *coeffs_mut(res) = coeffs;
    }
    status
}

///
/// Like [`store()`], but on failure sets `res` to zero.
///
fn store_or_zero(res: &mut El, (coeffs, status): (Vec<El>, Status)) -> Status {
    if status.is_success() {
        *coeffs_mut(res) = coeffs;
    } else {
        coeffs_mut(res).clear();
    }
    status
}

fn methods() -> &'static MethodTable {
    static METHODS: OnceLock<MethodTable> = OnceLock::new();
    METHODS.get_or_init(|| MethodTable::new(RingKind::Poly, &[
        (Method::CtxWrite, MethodFn::CtxWrite(ctx_write)),
        (Method::CtxIsRing, MethodFn::CtxPredicate(ctx_is_ring)),
        (Method::CtxIsCommutativeRing, MethodFn::CtxPredicate(ctx_is_commutative_ring)),
        (Method::CtxIsIntegralDomain, MethodFn::CtxPredicate(ctx_is_integral_domain)),
        (Method::CtxIsUniqueFactorizationDomain, MethodFn::CtxPredicate(ctx_is_unique_factorization_domain)),
        (Method::CtxIsField, MethodFn::CtxPredicate(ctx_predicate_false)),
        (Method::CtxIsRationalVectorSpace, MethodFn::CtxPredicate(ctx_is_rational_vector_space)),
        (Method::CtxIsRealVectorSpace, MethodFn::CtxPredicate(ctx_is_real_vector_space)),
        (Method::CtxIsComplexVectorSpace, MethodFn::CtxPredicate(ctx_is_complex_vector_space)),
        (Method::CtxIsThreadsafe, MethodFn::CtxPredicate(ctx_is_threadsafe)),
        (Method::CtxSetGenName, MethodFn::CtxSetGenName(ctx_set_gen_name)),

        (Method::Init, MethodFn::Init(init)),
        (Method::Randtest, MethodFn::Randtest(randtest)),
        (Method::Write, MethodFn::Write(write)),

        (Method::Zero, MethodFn::Constant(zero)),
        (Method::One, MethodFn::Constant(one)),
        (Method::NegOne, MethodFn::Constant(neg_one)),
        (Method::Gen, MethodFn::Constant(gen)),
        (Method::GensRecursive, MethodFn::Gens(gens_recursive)),
        (Method::I, MethodFn::Constant(i)),
        (Method::Pi, MethodFn::Constant(pi)),

        (Method::IsZero, MethodFn::Predicate(is_zero)),
        (Method::IsOne, MethodFn::Predicate(is_one)),
        (Method::Equal, MethodFn::Equal(equal)),

        (Method::Set, MethodFn::Unary(set)),
        (Method::SetUint, MethodFn::SetUint(set_uint)),
        (Method::SetInt, MethodFn::SetInt(set_int)),
        (Method::SetBigInt, MethodFn::SetBigInt(set_bigint)),
        (Method::SetRational, MethodFn::SetRational(set_rational)),
        (Method::SetOther, MethodFn::SetOther(coerce::set_other)),
        (Method::SetStr, MethodFn::SetStr(set_str)),

        (Method::Neg, MethodFn::Unary(neg)),
        (Method::AddUint, MethodFn::OpUint(add_uint)),
        (Method::AddInt, MethodFn::OpInt(add_int)),
        (Method::AddBigInt, MethodFn::OpBigInt(add_bigint)),
        (Method::AddRational, MethodFn::OpRational(add_rational)),
        (Method::Add, MethodFn::Binary(add)),
        (Method::SubUint, MethodFn::OpUint(sub_uint)),
        (Method::SubInt, MethodFn::OpInt(sub_int)),
        (Method::SubBigInt, MethodFn::OpBigInt(sub_bigint)),
        (Method::SubRational, MethodFn::OpRational(sub_rational)),
        (Method::Sub, MethodFn::Binary(sub)),
        (Method::Mul, MethodFn::Binary(mul)),
        (Method::MulOther, MethodFn::MulOther(coerce::mul_other)),
        (Method::OtherMul, MethodFn::OtherMul(coerce::other_mul)),
        (Method::MulUint, MethodFn::OpUint(mul_uint)),
        (Method::MulInt, MethodFn::OpInt(mul_int)),
        (Method::MulBigInt, MethodFn::OpBigInt(mul_bigint)),
        (Method::MulRational, MethodFn::OpRational(mul_rational)),

        (Method::PowBigInt, MethodFn::OpBigInt(pow_bigint)),
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

fn ctx_write(out: &mut dyn fmt::Write, ring: &RingCtx) -> fmt::Result {
    write!(out, "Ring of polynomials over ")?;
    base_ring(ring).ctx_write(out)
}

fn ctx_is_ring(ring: &RingCtx) -> Truth {
    base_ring(ring).ctx_is_ring()
}

fn ctx_is_commutative_ring(ring: &RingCtx) -> Truth {
    base_ring(ring).ctx_is_commutative_ring()
}

fn ctx_is_integral_domain(ring: &RingCtx) -> Truth {
    base_ring(ring).ctx_is_integral_domain()
}

fn ctx_is_unique_factorization_domain(ring: &RingCtx) -> Truth {
    base_ring(ring).ctx_is_unique_factorization_domain()
}

fn ctx_is_rational_vector_space(ring: &RingCtx) -> Truth {
    base_ring(ring).ctx_is_rational_vector_space()
}

fn ctx_is_real_vector_space(ring: &RingCtx) -> Truth {
    base_ring(ring).ctx_is_real_vector_space()
}

fn ctx_is_complex_vector_space(ring: &RingCtx) -> Truth {
    base_ring(ring).ctx_is_complex_vector_space()
}

fn ctx_is_threadsafe(ring: &RingCtx) -> Truth {
    base_ring(ring).ctx_is_threadsafe()
}

///
/// Generator names must be nonempty and consist of printable, non-whitespace characters.
///
fn is_valid_gen_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| !c.is_control() && !c.is_whitespace())
}

fn ctx_set_gen_name(ring: &mut RingCtx, name: &str) -> Status {
    if !is_valid_gen_name(name) {
        return Status::Domain;
    }
    ring.data_mut::<PolyCtxData>().var = Cow::Owned(name.to_owned());
    Status::Success
}

fn init(_: &RingCtx) -> El {
    El::new(PolyEl { coeffs: Vec::new() })
}

fn randtest(res: &mut El, state: &mut RandState, ring: &RingCtx) -> Status {
    let len = state.rand_range(0..5) as usize;
    store_or_zero(res, dense_poly::randtest(len, state, base_ring(ring)))
}

fn write(out: &mut dyn fmt::Write, x: &El, ring: &RingCtx) -> fmt::Result {
    dense_poly::write(out, coefficients(x), gen_name(ring), base_ring(ring))
}

fn zero(res: &mut El, _: &RingCtx) -> Status {
    coeffs_mut(res).clear();
    Status::Success
}

///
/// Sets `res` to the constant polynomial computed by `f` in the base ring, or to
/// zero if that fails.
///
fn set_constant<F>(res: &mut El, ring: &RingCtx, f: F) -> Status
    where F: FnOnce(&mut El, &RingCtx) -> Status
{
    let base = base_ring(ring);
    let mut c = base.init();
    let status = f(&mut c, base);
    let mut coeffs = if status.is_success() { vec![c] } else { Vec::new() };
    dense_poly::normalize(&mut coeffs, base);
    *coeffs_mut(res) = coeffs;
    status
}

fn one(res: &mut El, ring: &RingCtx) -> Status {
    set_constant(res, ring, |c, base| base.one(c))
}

fn neg_one(res: &mut El, ring: &RingCtx) -> Status {
    set_constant(res, ring, |c, base| base.neg_one(c))
}

fn i(res: &mut El, ring: &RingCtx) -> Status {
    set_constant(res, ring, |c, base| base.set_i(c))
}

fn pi(res: &mut El, ring: &RingCtx) -> Status {
    set_constant(res, ring, |c, base| base.set_pi(c))
}

fn gen(res: &mut El, ring: &RingCtx) -> Status {
    let base = base_ring(ring);
    let mut one = base.init();
    let status = base.one(&mut one);
    if !status.is_success() {
        return status;
    }
    let mut coeffs = vec![base.init(), one];
    dense_poly::normalize(&mut coeffs, base);
    *coeffs_mut(res) = coeffs;
    Status::Success
}

///
/// The generators of the base ring, recursively, promoted to constant polynomials,
/// followed by the generator of this ring.
///
fn gens_recursive(res: &mut Vec<El>, ring: &RingCtx) -> Status {
    let base = base_ring(ring);
    let mut base_gens = Vec::new();
    let mut status = base.gens_recursive(&mut base_gens);
    res.clear();
    for g in &base_gens {
        let mut promoted = ring.init();
        status |= store(&mut promoted, dense_poly::set_scalar(g, base));
        res.push(promoted);
    }
    let mut x = ring.init();
    status |= gen(&mut x, ring);
    res.push(x);
    status
}

fn is_zero(x: &El, ring: &RingCtx) -> Truth {
    dense_poly::is_zero(coefficients(x), base_ring(ring))
}

fn is_one(x: &El, ring: &RingCtx) -> Truth {
    dense_poly::is_one(coefficients(x), base_ring(ring))
}

fn equal(x: &El, y: &El, ring: &RingCtx) -> Truth {
    dense_poly::equal(coefficients(x), coefficients(y), base_ring(ring))
}

fn set(res: &mut El, x: &El, ring: &RingCtx) -> Status {
    store(res, dense_poly::set(coefficients(x), base_ring(ring)))
}

fn set_uint(res: &mut El, x: u64, ring: &RingCtx) -> Status {
    set_constant(res, ring, |c, base| base.set_uint(c, x))
}

fn set_int(res: &mut El, x: i64, ring: &RingCtx) -> Status {
    set_constant(res, ring, |c, base| base.set_int(c, x))
}

fn set_bigint(res: &mut El, x: &BigInt, ring: &RingCtx) -> Status {
    set_constant(res, ring, |c, base| base.set_bigint(c, x))
}

fn set_rational(res: &mut El, x: &BigRational, ring: &RingCtx) -> Status {
    set_constant(res, ring, |c, base| base.set_rational(c, x))
}

///
/// Parses the format written by [`RingCtx::write()`]. Apart from the generators,
/// numbers and identifiers are read by the base ring.
///
fn set_str(res: &mut El, input: &str, ring: &RingCtx) -> Status {
    let base = base_ring(ring);
    parse::set_str_with(res, input, ring, |value, atom| {
        let mut c = base.init();
        let status = base.set_str(&mut c, atom);
        if !status.is_success() {
            return status;
        }
        store(value, dense_poly::set_scalar(&c, base))
    })
}

fn neg(res: &mut El, x: &El, ring: &RingCtx) -> Status {
    store(res, dense_poly::neg(coefficients(x), base_ring(ring)))
}

fn add(res: &mut El, x: &El, y: &El, ring: &RingCtx) -> Status {
    store(res, dense_poly::add(coefficients(x), coefficients(y), base_ring(ring)))
}

fn sub(res: &mut El, x: &El, y: &El, ring: &RingCtx) -> Status {
    store(res, dense_poly::sub(coefficients(x), coefficients(y), base_ring(ring)))
}

///
/// Applies a scalar operation of the base ring to the constant coefficient, copying
/// all other coefficients.
///
fn op_constant_term<F>(res: &mut El, x: &El, ring: &RingCtx, op: F) -> Status
    where F: FnOnce(&mut El, &El, &RingCtx) -> Status
{
    let base = base_ring(ring);
    let (mut coeffs, mut status) = dense_poly::set(coefficients(x), base);
    let zero = base.init();
    let constant = coefficients(x).first().unwrap_or(&zero);
    let mut new_constant = base.init();
    status |= op(&mut new_constant, constant, base);
    if coeffs.is_empty() {
        coeffs.push(new_constant);
    } else {
        coeffs[0] = new_constant;
    }
    dense_poly::normalize(&mut coeffs, base);
    store(res, (coeffs, status))
}

macro_rules! constant_term_variant {
    ($name:ident, $scalar:ty, $base_op:ident) => {
        fn $name(res: &mut El, x: &El, y: $scalar, ring: &RingCtx) -> Status {
            op_constant_term(res, x, ring, |c, a, base| base.$base_op(c, a, y))
        }
    };
}

constant_term_variant!{ add_uint, u64, add_uint }
constant_term_variant!{ add_int, i64, add_int }
constant_term_variant!{ add_bigint, &BigInt, add_bigint }
constant_term_variant!{ add_rational, &BigRational, add_rational }
constant_term_variant!{ sub_uint, u64, sub_uint }
constant_term_variant!{ sub_int, i64, sub_int }
constant_term_variant!{ sub_bigint, &BigInt, sub_bigint }
constant_term_variant!{ sub_rational, &BigRational, sub_rational }

macro_rules! coefficientwise_variant {
    ($name:ident, $scalar:ty, $base_op:ident) => {
        fn $name(res: &mut El, x: &El, y: $scalar, ring: &RingCtx) -> Status {
            let base = base_ring(ring);
            store(res, dense_poly::map_coefficients(coefficients(x), base, |c, a| base.$base_op(c, a, y)))
        }
    };
}

coefficientwise_variant!{ mul_uint, u64, mul_uint }
coefficientwise_variant!{ mul_int, i64, mul_int }
coefficientwise_variant!{ mul_bigint, &BigInt, mul_bigint }
coefficientwise_variant!{ mul_rational, &BigRational, mul_rational }

///
/// Checks the degree ceiling for a product of polynomials of the given lengths.
///
pub(crate) fn exceeds_degree_limit(len_x: usize, len_y: usize, ring: &RingCtx) -> bool {
    match degree_limit(ring) {
        Some(limit) if len_x != 0 && len_y != 0 && len_x + len_y > limit => {
            tracing::debug!(len_x, len_y, limit, "product exceeds degree limit");
            true
        },
        _ => false
    }
}

fn mul(res: &mut El, x: &El, y: &El, ring: &RingCtx) -> Status {
    let (x, y) = (coefficients(x), coefficients(y));
    if exceeds_degree_limit(x.len(), y.len(), ring) {
        return Status::Unable;
    }
    store(res, dense_poly::mul(x, y, base_ring(ring)))
}

///
/// Raises `x` to the given power using this ring's multiplication, so the degree
/// ceiling applies to all intermediate products. Constant polynomials are instead
/// raised to the power in the base ring.
///
#[instrument(skip_all, level = "trace")]
fn pow_bigint(res: &mut El, x: &El, e: &BigInt, ring: &RingCtx) -> Status {
    let base = base_ring(ring);
    let coeffs = coefficients(x);
    if coeffs.len() <= 1 {
        let zero = base.init();
        let constant = coeffs.first().unwrap_or(&zero);
        let mut value = base.init();
        let status = base.pow_bigint(&mut value, constant, e);
        if status.is_success() {
            let mut coeffs = vec![value];
            dense_poly::normalize(&mut coeffs, base);
            *coeffs_mut(res) = coeffs;
        }
        return status;
    }
    if !e.is_negative() {
        let representable = e.to_usize().and_then(|e| (coeffs.len() - 1).checked_mul(e)).and_then(|d| d.checked_add(1)).is_some();
        if !representable {
            return Status::Unable;
        }
    }
    generic::pow_bigint(res, x, e, ring)
}

///
/// Exact division. The result is only written on success.
///
fn div(res: &mut El, x: &El, y: &El, ring: &RingCtx) -> Status {
    let base = base_ring(ring);
    let (x, y) = (coefficients(x), coefficients(y));
    if y.len() == 1 {
        return store(res, dense_poly::div_scalar(x, &y[0], base));
    }
    match dense_poly::divrem(x, y, base, false) {
        Ok((quo, rem)) => match dense_poly::is_zero(&rem, base) {
            Truth::True => store(res, (quo, Status::Success)),
            Truth::False => Status::Domain,
            Truth::Unknown => Status::Unable
        },
        Err(status) => status
    }
}

fn divexact(res: &mut El, x: &El, y: &El, ring: &RingCtx) -> Status {
    let base = base_ring(ring);
    let (x, y) = (coefficients(x), coefficients(y));
    if y.len() == 1 {
        return store(res, dense_poly::divexact_scalar(x, &y[0], base));
    }
    match dense_poly::divrem(x, y, base, true) {
        Ok((quo, _)) => store(res, (quo, Status::Success)),
        Err(status) => status
    }
}

///
/// Only constants can be units over an integral domain. Over other base rings,
/// nonconstant units might exist, but are not found.
///
fn inv(res: &mut El, x: &El, ring: &RingCtx) -> Status {
    let base = base_ring(ring);
    let coeffs = coefficients(x);
    if coeffs.len() <= 1 {
        let zero = base.init();
        let constant = coeffs.first().unwrap_or(&zero);
        let mut value = base.init();
        let status = base.inv(&mut value, constant);
        if status.is_success() {
            let mut coeffs = vec![value];
            dense_poly::normalize(&mut coeffs, base);
            *coeffs_mut(res) = coeffs;
        }
        return status;
    }
    match (base.ctx_is_integral_domain(), coeffs.last().map(|lc| base.is_zero(lc))) {
        (Truth::True, Some(Truth::False)) => Status::Domain,
        _ => Status::Unable
    }
}

fn euclidean_div(res: &mut El, x: &El, y: &El, ring: &RingCtx) -> Status {
    match dense_poly::divrem(coefficients(x), coefficients(y), base_ring(ring), false) {
        Ok((quo, _)) => store(res, (quo, Status::Success)),
        Err(status) => status
    }
}

fn euclidean_rem(res: &mut El, x: &El, y: &El, ring: &RingCtx) -> Status {
    match dense_poly::divrem(coefficients(x), coefficients(y), base_ring(ring), false) {
        Ok((_, rem)) => store(res, (rem, Status::Success)),
        Err(status) => status
    }
}

fn euclidean_divrem(quo: &mut El, rem: &mut El, x: &El, y: &El, ring: &RingCtx) -> Status {
    match dense_poly::divrem(coefficients(x), coefficients(y), base_ring(ring), false) {
        Ok((q, r)) => {
            *coeffs_mut(quo) = q;
            *coeffs_mut(rem) = r;
            Status::Success
        },
        Err(status) => status
    }
}

fn canonical_associate(ux: &mut El, u: &mut El, x: &El, ring: &RingCtx) -> Status {
    let base = base_ring(ring);
    match dense_poly::canonical_associate(coefficients(x), base) {
        Ok((x_canonical, unit)) => {
            *coeffs_mut(ux) = x_canonical;
            let mut unit = vec![unit];
            dense_poly::normalize(&mut unit, base);
            *coeffs_mut(u) = unit;
            Status::Success
        },
        Err(status) => status
    }
}

fn gcd(res: &mut El, x: &El, y: &El, ring: &RingCtx) -> Status {
    match dense_poly::gcd(coefficients(x), coefficients(y), base_ring(ring)) {
        Ok(d) => store(res, (d, Status::Success)),
        Err(status) => status
    }
}

///
/// Factors `x` using the polynomial factorization advertised by the base ring kind.
/// The unit is returned as a constant polynomial.
///
#[instrument(skip_all, level = "trace")]
fn factor(unit: &mut El, factors: &mut Vec<El>, exponents: &mut Vec<u64>, x: &El, flags: u32, ring: &RingCtx) -> Status {
    let base = base_ring(ring);
    let poly_factor = match base.methods().poly_factor() {
        Some(poly_factor) => poly_factor,
        None => return Status::Unable
    };
    let mut base_unit = base.init();
    let status = poly_factor(&mut base_unit, factors, exponents, x, flags, ring);
    if status.is_success() {
        store(unit, dense_poly::set_scalar(&base_unit, base))
    } else {
        status
    }
}

#[cfg(test)]
use crate::rings::zn::zn;
#[cfg(test)]
use crate::rings::integer::integer_ring;
#[cfg(test)]
use crate::rings::rational::rational_field;
#[cfg(test)]
use crate::rings::float_real::float_real_ring;
#[cfg(test)]
use crate::ring::generic_tests;

#[cfg(test)]
fn poly(ring: &RingCtx, coeffs: &[i64]) -> El {
    let base = base_ring(ring);
    from_coefficients(ring, coeffs.iter().map(|c| base.from_int(*c).unwrap()).collect())
}

#[cfg(test)]
fn apply<F>(ring: &RingCtx, f: F) -> El
    where F: FnOnce(&mut El) -> Status
{
    let mut result = ring.init();
    assert_eq!(Status::Success, f(&mut result));
    return result;
}

#[cfg(test)]
fn edge_case_elements(ring: &RingCtx) -> Vec<El> {
    vec![
        ring.init(),
        poly(ring, &[1]),
        poly(ring, &[-1]),
        poly(ring, &[0, 1]),
        poly(ring, &[1, 1]),
        poly(ring, &[3, 0, -2]),
        poly(ring, &[0, 0, 0, 5]),
    ]
}

#[test]
fn test_ring_axioms() {
    let P = poly_ring(Arc::new(zn(7)));
    generic_tests::test_ring_axioms(&P, edge_case_elements(&P).into_iter());
    generic_tests::test_division_law(&P, edge_case_elements(&P).into_iter());

    let P = poly_ring(Arc::new(integer_ring()));
    generic_tests::test_ring_axioms(&P, edge_case_elements(&P).into_iter());
    generic_tests::test_division_law(&P, edge_case_elements(&P).into_iter());
}

#[test]
fn test_mul_over_z7() {
    let P = poly_ring(Arc::new(zn(7)));
    let f = poly(&P, &[1, 1]);
    let g = poly(&P, &[-1, 1]);
    let h = apply(&P, |r| P.mul(r, &f, &g));
    assert_eq!(3, coefficients(&h).len());
    assert!(base_ring(&P).is_one(&coefficients(&h)[2]).is_true());
    assert_el_eq!(P, poly(&P, &[6, 0, 1]), h);
}

#[test]
fn test_self_subtraction_is_empty() {
    let P = poly_ring(Arc::new(integer_ring()));
    for f in edge_case_elements(&P) {
        let diff = apply(&P, |r| P.sub(r, &f, &f));
        assert_eq!(0, coefficients(&diff).len());
    }
}

#[test]
fn test_format() {
    let P = poly_ring(Arc::new(integer_ring()));
    assert_eq!("0", format!("{}", P.format(&P.init())));
    assert_eq!("1 + 2*x + x^2", format!("{}", P.format(&poly(&P, &[1, 2, 1]))));
    assert_eq!("Ring of polynomials over Integer ring (ZZ)", format!("{}", P));
}

#[test]
fn test_degree_limit() {
    let mut P = poly_ring(Arc::new(zn(7)));
    set_degree_limit(&mut P, Some(5));
    let f = poly(&P, &[1, 2, 3]);
    let g = poly(&P, &[4, 5]);
    let mut res = poly(&P, &[6]);
    assert_eq!(Status::Unable, P.mul(&mut res, &f, &f));
    assert_el_eq!(P, poly(&P, &[6]), res);
    assert_el_eq!(P, poly(&P, &[1, 2, 3]), f);
    assert_eq!(Status::Success, P.mul(&mut res, &f, &g));
    assert_eq!(Status::Success, P.mul(&mut res, &f, &P.init()));
    assert_eq!(Status::Unable, P.pow_uint(&mut res, &f, 2));
    assert_eq!(Status::Success, P.mul_int(&mut res, &f, 3));
}

#[test]
fn test_scalar_operations() {
    let P = poly_ring(Arc::new(zn(7)));
    let x = P.generator().unwrap();
    let f = apply(&P, |r| P.add_int(r, &x, 3));
    let manual = apply(&P, |r| P.add(r, &x, &P.from_int(3).unwrap()));
    assert_el_eq!(P, manual, f);
    let g = apply(&P, |r| P.mul_uint(r, &f, 7));
    assert!(P.is_zero(&g).is_true());
    let g = apply(&P, |r| P.sub_bigint(r, &f, &BigInt::from(3)));
    assert_el_eq!(P, x, g);
    let g = apply(&P, |r| P.mul_rational(r, &x, &BigRational::new(1.into(), 2.into())));
    assert_el_eq!(P, poly(&P, &[0, 4]), g);
}

#[test]
fn test_div() {
    let P = poly_ring(Arc::new(rational_field()));
    let f = poly(&P, &[-1, 0, 1]);
    let g = poly(&P, &[1, 1]);
    let q = apply(&P, |r| P.div(r, &f, &g));
    assert_el_eq!(P, poly(&P, &[-1, 1]), q);

    let mut res = poly(&P, &[5]);
    assert_eq!(Status::Domain, P.div(&mut res, &poly(&P, &[1, 0, 1]), &g));
    assert_el_eq!(P, poly(&P, &[5]), res);
    assert_eq!(Status::Domain, P.div(&mut res, &f, &P.init()));

    let half = apply(&P, |r| P.div(r, &f, &poly(&P, &[2])));
    let two = P.from_int(2).unwrap();
    assert_el_eq!(P, f, apply(&P, |r| P.mul(r, &half, &two)));
}

#[test]
fn test_div_assign_overwrites_divisor() {
    let P = poly_ring(Arc::new(rational_field()));
    let f = poly(&P, &[-1, 0, 1]);
    let mut g = poly(&P, &[1, 1]);
    assert_eq!(Status::Success, P.div_assign_rev(&f, &mut g));
    assert_el_eq!(P, poly(&P, &[-1, 1]), g);
    let mut f = f;
    assert_eq!(Status::Success, P.div_assign(&mut f, &poly(&P, &[-1, 1])));
    assert_el_eq!(P, poly(&P, &[1, 1]), f);
}

#[test]
fn test_euclidean_division() {
    let P = poly_ring(Arc::new(zn(5)));
    let f = poly(&P, &[1, 2, 3, 4]);
    let g = poly(&P, &[1, 0, 2]);
    let mut q = P.init();
    let mut r = P.init();
    assert_eq!(Status::Success, P.euclidean_divrem(&mut q, &mut r, &f, &g));
    assert!(coefficients(&r).len() < coefficients(&g).len());
    let qg = apply(&P, |res| P.mul(res, &q, &g));
    assert_el_eq!(P, f, apply(&P, |res| P.add(res, &qg, &r)));
    let rem = apply(&P, |res| P.euclidean_rem(res, &f, &g));
    assert_el_eq!(P, r, rem);
}

#[test]
fn test_pow() {
    let P = poly_ring(Arc::new(integer_ring()));
    let f = poly(&P, &[1, 1]);
    let cube = apply(&P, |r| P.pow_uint(r, &f, 3));
    assert_el_eq!(P, poly(&P, &[1, 3, 3, 1]), cube);
    let one = apply(&P, |r| P.pow_int(r, &f, 0));
    assert!(P.is_one(&one).is_true());
    let c = apply(&P, |r| P.pow_uint(r, &poly(&P, &[-2]), 5));
    assert_el_eq!(P, poly(&P, &[-32]), c);
    let mut res = P.init();
    assert_eq!(Status::Domain, P.pow_int(&mut res, &f, -1));
    assert_eq!(Status::Unable, P.pow_bigint(&mut res, &f, &BigInt::from(2).pow(70)));
}

#[test]
fn test_inv() {
    let P = poly_ring(Arc::new(rational_field()));
    let inv = apply(&P, |r| P.inv(r, &poly(&P, &[4])));
    assert_el_eq!(P, P.from_rational(&BigRational::new(1.into(), 4.into())).unwrap(), inv);
    let mut res = P.init();
    assert_eq!(Status::Domain, P.inv(&mut res, &poly(&P, &[1, 1])));
    assert_eq!(Status::Domain, P.inv(&mut res, &P.init()));
    let P = poly_ring(Arc::new(zn(4)));
    assert_eq!(Status::Unable, P.inv(&mut res, &poly(&P, &[1, 2])));
}

#[test]
fn test_gcd_and_canonical_associate() {
    let P = poly_ring(Arc::new(zn(7)));
    let f = apply(&P, |r| P.mul(r, &poly(&P, &[1, 1]), &poly(&P, &[2, 3])));
    let g = apply(&P, |r| P.mul(r, &poly(&P, &[3, 3]), &poly(&P, &[1, 0, 1])));
    let d = apply(&P, |r| P.gcd(r, &f, &g));
    assert_el_eq!(P, poly(&P, &[1, 1]), d);

    let mut ux = P.init();
    let mut u = P.init();
    assert_eq!(Status::Success, P.canonical_associate(&mut ux, &mut u, &poly(&P, &[2, 4])));
    assert_el_eq!(P, poly(&P, &[4, 1]), ux);
    assert_el_eq!(P, poly(&P, &[2]), u);

    let P = poly_ring(Arc::new(zn(6)));
    let mut res = P.init();
    assert_eq!(Status::Unable, P.gcd(&mut res, &poly(&P, &[1, 1]), &poly(&P, &[1])));
}

#[test]
fn test_factor() {
    let P = poly_ring(Arc::new(zn(7)));
    let f = apply(&P, |r| P.mul(r, &poly(&P, &[1, 1]), &poly(&P, &[1, 1])));
    let f = apply(&P, |r| P.mul(r, &f, &poly(&P, &[3, 0, 3])));
    let mut unit = P.init();
    let mut factors = Vec::new();
    let mut exponents = Vec::new();
    assert_eq!(Status::Success, P.factor(&mut unit, &mut factors, &mut exponents, &f, 0));
    assert_el_eq!(P, poly(&P, &[3]), unit);
    assert_eq!(2, factors.len());
    assert_el_eq!(P, poly(&P, &[1, 1]), factors[0]);
    assert_el_eq!(P, poly(&P, &[1, 0, 1]), factors[1]);
    assert_eq!(vec![2, 1], exponents);

    let P = poly_ring(Arc::new(rational_field()));
    assert_eq!(Status::Unable, P.factor(&mut unit, &mut factors, &mut exponents, &poly(&P, &[1, 1]), 0));
}

#[test]
fn test_gen_name() {
    let mut P = poly_ring(Arc::new(integer_ring()));
    assert_eq!("x", gen_name(&P));
    assert!(matches!(data(&P).var, Cow::Borrowed(_)));
    assert_eq!(Status::Success, P.set_gen_name("t"));
    assert_eq!(Status::Success, P.set_gen_name("y"));
    assert!(matches!(data(&P).var, Cow::Owned(_)));
    assert_eq!("y", gen_name(&P));
    assert_eq!(Status::Domain, P.set_gen_name(""));
    assert_eq!(Status::Domain, P.set_gen_name("a\0b"));
    assert_eq!(Status::Domain, P.set_gen_name("a b"));
    assert_eq!("y", gen_name(&P));
    assert_eq!(Status::Success, P.set_gen_names(&["z"]));
    assert_eq!(Status::Domain, P.set_gen_names(&["u", "v"]));
    assert_eq!("3 + z^2", format!("{}", P.format(&poly(&P, &[3, 0, 1]))));
    assert_eq!("x", poly_config(&poly_ring(Arc::new(integer_ring()))).gen_name);
}

#[test]
fn test_poly_ring_with_config() {
    let config = PolyRingConfig { gen_name: "t".to_owned(), degree_limit: Some(8) };
    let P = poly_ring_with(Arc::new(rational_field()), &config).unwrap();
    assert_eq!("t", gen_name(&P));
    assert_eq!(Some(8), degree_limit(&P));
    assert_eq!(config, poly_config(&P));
    let config = PolyRingConfig { gen_name: "".to_owned(), degree_limit: None };
    assert_eq!(Failure::Domain, poly_ring_with(Arc::new(rational_field()), &config).unwrap_err());
}

#[test]
fn test_concurrent_table_initialization() {
    let handles = (0..8).map(|_| std::thread::spawn(|| methods() as *const MethodTable as usize)).collect::<Vec<_>>();
    let tables = handles.into_iter().map(|h| h.join().unwrap()).collect::<Vec<_>>();
    assert!(tables.iter().all(|t| *t == tables[0]));
    let P = Arc::new(poly_ring(Arc::new(zn(7))));
    let workers = (0..4).map(|i| {
        let P = P.clone();
        std::thread::spawn(move || {
            let f = poly(&P, &[i, 1]);
            apply(&P, |r| P.mul(r, &f, &f))
        })
    }).collect::<Vec<_>>();
    for (i, w) in workers.into_iter().enumerate() {
        let square = w.join().unwrap();
        let i = i as i64;
        assert_el_eq!(P, poly(&P, &[i * i, 2 * i, 1]), square);
    }
}

#[test]
fn test_predicates() {
    let P = poly_ring(Arc::new(rational_field()));
    assert!(P.ctx_is_field().is_false());
    assert!(P.ctx_is_integral_domain().is_true());
    assert!(P.ctx_is_rational_vector_space().is_true());
    assert!(P.ctx_is_threadsafe().is_true());
    let P = poly_ring(Arc::new(zn(6)));
    assert!(P.ctx_is_integral_domain().is_false());
    assert!(P.ctx_is_commutative_ring().is_true());
}

#[test]
fn test_recursive_poly_ring() {
    let base = Arc::new(zn(7));
    let Px = Arc::new(poly_ring(base.clone()));
    let mut Pxy = poly_ring(Px.clone());
    assert_eq!(Status::Success, Pxy.set_gen_name("y"));

    let mut gens = Vec::new();
    assert_eq!(Status::Success, Pxy.gens_recursive(&mut gens));
    assert_eq!(2, gens.len());
    let (x, y) = (&gens[0], &gens[1]);
    assert_eq!("x", format!("{}", Pxy.format(x)));
    assert_eq!("y", format!("{}", Pxy.format(y)));

    // (x + y)^2 = x^2 + 2xy + y^2
    let sum = apply(&Pxy, |r| Pxy.add(r, x, y));
    let square = apply(&Pxy, |r| Pxy.pow_uint(r, &sum, 2));
    assert_eq!("x^2 + (2*x)*y + y^2", format!("{}", Pxy.format(&square)));
    assert_eq!("Ring of polynomials over Ring of polynomials over Integers mod 7", format!("{}", Pxy));
    generic_tests::test_ring_axioms(&Pxy, [apply(&Pxy, |r| Pxy.set(r, x)), apply(&Pxy, |r| Pxy.set(r, y)), sum, Pxy.from_int(3).unwrap()].into_iter());
}

#[test]
fn test_undecidable_coefficients() {
    let P = poly_ring(Arc::new(float_real_ring()));
    let base = base_ring(&P);
    let tiny = base.from_rational(&BigRational::new(1.into(), BigInt::from(10).pow(12))).unwrap();
    let f = from_coefficients(&P, vec![base.from_int(1).unwrap(), tiny]);
    assert_eq!(2, coefficients(&f).len());
    assert!(P.is_zero(&f).is_false());
    assert!(P.equal(&f, &P.from_int(1).unwrap()).is_unknown());

    let mut res = P.init();
    assert_eq!(Status::Unable, P.div(&mut res, &poly(&P, &[1, 1]), &f));
    let g = poly(&P, &[1, 1]);
    let almost = apply(&P, |r| P.add_rational(r, &g, &BigRational::new(1.into(), BigInt::from(10).pow(12))));
    let shifted = apply(&P, |r| P.sub(r, &almost, &g));
    assert!(P.is_zero(&shifted).is_unknown());
    assert_eq!(Status::Domain, P.div(&mut res, &almost, &poly(&P, &[1, 1, 1])));
    assert_eq!(Status::Unable, P.inv(&mut res, &f));
}

#[test]
fn test_inv_over_zero_ring() {
    let P = poly_ring(Arc::new(zn(1)));
    let mut res = P.init();
    assert_eq!(Status::Success, P.inv(&mut res, &P.init()));
    assert!(coefficients(&res).is_empty());
    assert!(P.is_zero(&res).is_true());
}

#[test]
fn test_divexact() {
    let P = poly_ring(Arc::new(integer_ring()));
    let quo = apply(&P, |r| P.divexact(r, &poly(&P, &[-2, 0, 2]), &poly(&P, &[2, 2])));
    assert_el_eq!(P, poly(&P, &[-1, 1]), quo);
    let quo = apply(&P, |r| P.divexact(r, &poly(&P, &[4, -6, 2]), &poly(&P, &[2])));
    assert_el_eq!(P, poly(&P, &[2, -3, 1]), quo);
    let mut res = P.init();
    assert_eq!(Status::Domain, P.divexact(&mut res, &poly(&P, &[1, 1]), &P.init()));
}

#[test]
fn test_swap_and_set_shallow() {
    let P = poly_ring(Arc::new(integer_ring()));
    let mut f = poly(&P, &[1, 2]);
    let mut g = poly(&P, &[3]);
    let buffer = coefficients(&f).as_ptr();
    P.swap(&mut f, &mut g);
    assert_el_eq!(P, poly(&P, &[3]), f);
    assert_el_eq!(P, poly(&P, &[1, 2]), g);
    assert_eq!(buffer, coefficients(&g).as_ptr());

    let mut h = P.init();
    P.set_shallow(&mut h, g);
    assert_eq!(buffer, coefficients(&h).as_ptr());
    assert_el_eq!(P, poly(&P, &[1, 2]), h);
}

#[test]
fn test_constants() {
    let P = poly_ring(Arc::new(integer_ring()));
    let neg_one = apply(&P, |r| P.neg_one(r));
    assert_el_eq!(P, poly(&P, &[-1]), neg_one);
    assert!(P.is_neg_one(&neg_one).is_true());

    let mut res = poly(&P, &[1, 1]);
    assert_eq!(Status::Unable, P.set_i(&mut res));
    assert!(coefficients(&res).is_empty());

    let P = poly_ring(Arc::new(float_real_ring()));
    let pi = apply(&P, |r| P.set_pi(r));
    assert_eq!(1, coefficients(&pi).len());
    assert_eq!(format!("{}", std::f64::consts::PI), format!("{}", P.format(&pi)));
}

#[test]
fn test_parse_written_polynomials() {
    let P = poly_ring(Arc::new(integer_ring()));
    let elements: [&[i64]; 5] = [&[], &[1, 1], &[-3, 2, 0, -1], &[0, 0, 1], &[5]];
    for coeffs in elements {
        let f = poly(&P, coeffs);
        let written = format!("{}", P.format(&f));
        assert_el_eq!(P, f, P.parse(&written).unwrap());
    }
    assert_el_eq!(P, poly(&P, &[1, -2, 1]), P.parse("(x - 1)^2").unwrap());

    let P = poly_ring(Arc::new(rational_field()));
    let base = base_ring(&P);
    let f = from_coefficients(&P, vec![
        base.from_rational(&BigRational::new(1.into(), 2.into())).unwrap(),
        base.from_int(2).unwrap(),
        base.from_rational(&BigRational::new((-1).into(), 3.into())).unwrap()
    ]);
    let written = format!("{}", P.format(&f));
    assert_eq!("1/2 + 2*x + (-1/3)*x^2", written);
    assert_el_eq!(P, f, P.parse(&written).unwrap());

    let P = poly_ring(Arc::new(float_real_ring()));
    let f = P.parse("0.5 + 1.5*x").unwrap();
    assert_eq!("0.5 + 1.5*x", format!("{}", P.format(&f)));
}

#[test]
fn test_parse_recursive_poly_ring() {
    let Px = Arc::new(poly_ring(Arc::new(zn(7))));
    let mut Pxy = poly_ring(Px);
    assert_eq!(Status::Success, Pxy.set_gen_name("y"));
    let square = Pxy.parse("(x + y)^2").unwrap();
    let written = format!("{}", Pxy.format(&square));
    assert_eq!("x^2 + (2*x)*y + y^2", written);
    assert_el_eq!(Pxy, square, Pxy.parse(&written).unwrap());
    let f = Pxy.parse("(3 + x)*y^2 - 1").unwrap();
    assert_el_eq!(Pxy, f, Pxy.parse(&format!("{}", Pxy.format(&f))).unwrap());
}

#[test]
fn test_parse_failures() {
    let mut P = poly_ring(Arc::new(integer_ring()));
    assert_eq!(Status::Success, P.set_gen_name("t"));
    assert_el_eq!(P, poly(&P, &[1, 0, 1]), P.parse("t^2 + 1").unwrap());
    let mut res = poly(&P, &[4]);
    for input in ["x", "t^", "2t", "1 + + t", "(t", "t/2"] {
        assert_eq!(Status::Domain, P.set_str(&mut res, input), "input {:?}", input);
    }
    assert_el_eq!(P, poly(&P, &[4]), res);

    set_degree_limit(&mut P, Some(5));
    assert_eq!(Status::Unable, P.set_str(&mut res, "t^10"));
}

#[test]
fn test_randtest() {
    let P = poly_ring(Arc::new(zn(11)));
    let mut state = RandState::new(17);
    for _ in 0..50 {
        let mut f = P.init();
        assert_eq!(Status::Success, P.randtest(&mut f, &mut state));
        assert!(coefficients(&f).len() < 5);
        if let Some(lc) = coefficients(&f).last() {
            assert!(base_ring(&P).is_zero(lc).is_false());
        }
    }
}
