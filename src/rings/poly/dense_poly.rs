use std::fmt;

use tracing::instrument;

use crate::random::RandState;
use crate::ring::*;
use crate::status::*;

///
/// An element of a polynomial ring, stored as its vector of coefficients
/// `a_0, a_1, ...`, which are elements of the base ring.
///
/// Polynomials are kept in normalized form, i.e. the last coefficient is never
/// provably zero. Coefficients whose zero test is undecidable are kept, so the
/// length of a polynomial is only an upper bound on its degree plus one.
///
pub struct PolyEl {
    pub(super) coeffs: Vec<El>
}

///
/// Removes trailing coefficients that are provably zero.
///
pub fn normalize(coeffs: &mut Vec<El>, base: &RingCtx) {
    while let Some(last) = coeffs.last() {
        if base.is_zero(last).is_true() {
            coeffs.pop();
        } else {
            return;
        }
    }
}

pub fn zero_coeffs(len: usize, base: &RingCtx) -> Vec<El> {
    (0..len).map(|_| base.init()).collect()
}

pub fn set(x: &[El], base: &RingCtx) -> (Vec<El>, Status) {
    let mut status = Status::Success;
    let mut result = Vec::with_capacity(x.len());
    for c in x {
        let mut value = base.init();
        status |= base.set(&mut value, c);
        result.push(value);
    }
    return (result, status);
}

///
/// Computes the constant polynomial `c`.
///
pub fn set_scalar(c: &El, base: &RingCtx) -> (Vec<El>, Status) {
    let (mut result, status) = set(std::slice::from_ref(c), base);
    normalize(&mut result, base);
    return (result, status);
}

pub fn is_zero(x: &[El], base: &RingCtx) -> Truth {
    x.iter().fold(Truth::True, |acc, c| acc & base.is_zero(c))
}

pub fn is_one(x: &[El], base: &RingCtx) -> Truth {
    match x.split_first() {
        None => base.is_one(&base.init()),
        Some((c0, rest)) => rest.iter().fold(base.is_one(c0), |acc, c| acc & base.is_zero(c))
    }
}

pub fn equal(x: &[El], y: &[El], base: &RingCtx) -> Truth {
    let (shorter, longer) = if x.len() <= y.len() { (x, y) } else { (y, x) };
    let prefix = shorter.iter().zip(longer.iter()).fold(Truth::True, |acc, (a, b)| acc & base.equal(a, b));
    return prefix & is_zero(&longer[shorter.len()..], base);
}

pub fn neg(x: &[El], base: &RingCtx) -> (Vec<El>, Status) {
    let mut status = Status::Success;
    let mut result = Vec::with_capacity(x.len());
    for c in x {
        let mut value = base.init();
        status |= base.neg(&mut value, c);
        result.push(value);
    }
    return (result, status);
}

///
/// Adds or subtracts coefficient-wise over the common prefix, and copies resp. negates
/// the tail of the longer operand.
///
fn add_or_sub(x: &[El], y: &[El], base: &RingCtx, subtract: bool) -> (Vec<El>, Status) {
    let len = usize::max(x.len(), y.len());
    let mut status = Status::Success;
    let mut result = Vec::with_capacity(len);
    for i in 0..len {
        let mut value = base.init();
        status |= match (x.get(i), y.get(i)) {
            (Some(a), Some(b)) if subtract => base.sub(&mut value, a, b),
            (Some(a), Some(b)) => base.add(&mut value, a, b),
            (Some(a), None) => base.set(&mut value, a),
            (None, Some(b)) if subtract => base.neg(&mut value, b),
            (None, Some(b)) => base.set(&mut value, b),
            (None, None) => unreachable!()
        };
        result.push(value);
    }
    normalize(&mut result, base);
    return (result, status);
}

pub fn add(x: &[El], y: &[El], base: &RingCtx) -> (Vec<El>, Status) {
    add_or_sub(x, y, base, false)
}

pub fn sub(x: &[El], y: &[El], base: &RingCtx) -> (Vec<El>, Status) {
    add_or_sub(x, y, base, true)
}

///
/// Applies `f` to every coefficient, and normalizes the result.
///
pub fn map_coefficients<F>(x: &[El], base: &RingCtx, mut f: F) -> (Vec<El>, Status)
    where F: FnMut(&mut El, &El) -> Status
{
    let mut status = Status::Success;
    let mut result = Vec::with_capacity(x.len());
    for c in x {
        let mut value = base.init();
        status |= f(&mut value, c);
        result.push(value);
    }
    normalize(&mut result, base);
    return (result, status);
}

///
/// Computes `x * c` for a scalar `c` of the base ring.
///
pub fn mul_scalar(x: &[El], c: &El, base: &RingCtx) -> (Vec<El>, Status) {
    map_coefficients(x, base, |res, a| base.mul(res, a, c))
}

///
/// Computes `c * x` for a scalar `c` of the base ring.
///
pub fn scalar_mul(c: &El, x: &[El], base: &RingCtx) -> (Vec<El>, Status) {
    map_coefficients(x, base, |res, a| base.mul(res, c, a))
}

pub fn div_scalar(x: &[El], c: &El, base: &RingCtx) -> (Vec<El>, Status) {
    map_coefficients(x, base, |res, a| base.div(res, a, c))
}

pub fn divexact_scalar(x: &[El], c: &El, base: &RingCtx) -> (Vec<El>, Status) {
    map_coefficients(x, base, |res, a| base.divexact(res, a, c))
}

///
/// Schoolbook multiplication.
///
#[instrument(skip_all, level = "trace")]
pub fn mul(x: &[El], y: &[El], base: &RingCtx) -> (Vec<El>, Status) {
    if x.is_empty() || y.is_empty() {
        return (Vec::new(), Status::Success);
    }
    let mut status = Status::Success;
    let mut result = zero_coeffs(x.len() + y.len() - 1, base);
    let mut product = base.init();
    for (i, a) in x.iter().enumerate() {
        for (j, b) in y.iter().enumerate() {
            status |= base.mul(&mut product, a, b);
            status |= base.add_assign(&mut result[i + j], &product);
        }
    }
    normalize(&mut result, base);
    return (result, status);
}

///
/// How the quotient coefficients of a long division are computed from the leading
/// coefficient of the divisor.
///
enum LeadingCoefficientDivision<'a> {
    /// multiply by the precomputed inverse
    Inverse(El),
    /// divide by the leading coefficient using the base ring's `div`
    Div(&'a El),
    /// divide by the leading coefficient using the base ring's `divexact`
    Divexact(&'a El)
}

impl<'a> LeadingCoefficientDivision<'a> {

    fn new(lc: &'a El, exact: bool, base: &RingCtx) -> Self {
        if exact {
            return LeadingCoefficientDivision::Divexact(lc);
        }
        let mut lc_inv = base.init();
        if base.inv(&mut lc_inv, lc).is_success() {
            LeadingCoefficientDivision::Inverse(lc_inv)
        } else {
            LeadingCoefficientDivision::Div(lc)
        }
    }

    fn quotient(&self, res: &mut El, c: &El, base: &RingCtx) -> Status {
        match self {
            LeadingCoefficientDivision::Inverse(lc_inv) => base.mul(res, c, lc_inv),
            LeadingCoefficientDivision::Div(lc) => base.div(res, c, lc),
            LeadingCoefficientDivision::Divexact(lc) => base.divexact(res, c, lc)
        }
    }
}

///
/// Computes `q, r` such that `x = q * y + r` with `len(r) < len(y)`.
///
/// If the leading coefficient of `y` is not invertible, the quotient coefficients are
/// computed by exact division in the base ring, which fails unless each division
/// step happens to be exact. With `exact` set, the caller asserts that `y` divides `x`,
/// and the base ring's `divexact` is used.
///
/// Division by the zero polynomial, or by a polynomial whose leading coefficient
/// cannot be proven nonzero, fails.
///
#[instrument(skip_all, level = "trace")]
pub fn divrem(x: &[El], y: &[El], base: &RingCtx, exact: bool) -> Result<(Vec<El>, Vec<El>), Status> {
    let lc = match y.last() {
        Some(lc) => lc,
        None => return Err(Status::Domain)
    };
    match base.is_zero(lc) {
        Truth::False => {},
        Truth::True => return Err(Status::Domain),
        Truth::Unknown => return Err(Status::Unable)
    }
    let (mut rem, status) = set(x, base);
    status.into_result()?;
    if x.len() < y.len() {
        return Ok((Vec::new(), rem));
    }
    let lc_division = LeadingCoefficientDivision::new(lc, exact, base);
    let mut status = Status::Success;
    let mut quo = zero_coeffs(x.len() + 1 - y.len(), base);
    let mut product = base.init();
    for i in (0..quo.len()).rev() {
        let mut q = base.init();
        lc_division.quotient(&mut q, &rem[i + y.len() - 1], base).into_result()?;
        if !base.is_zero(&q).is_true() {
            for (j, c) in y.iter().enumerate() {
                status |= base.mul(&mut product, &q, c);
                status |= base.sub_assign(&mut rem[i + j], &product);
            }
        }
        quo[i] = q;
    }
    status.into_result()?;
    rem.truncate(y.len() - 1);
    normalize(&mut rem, base);
    normalize(&mut quo, base);
    return Ok((quo, rem));
}

///
/// Computes `u * x` and `u`, where `u` is the unit of the base ring that makes the
/// leading coefficient of `x` canonical.
///
pub fn canonical_associate(x: &[El], base: &RingCtx) -> Result<(Vec<El>, El), Status> {
    let mut u = base.init();
    let lc = match x.last() {
        Some(lc) => lc,
        None => {
            base.one(&mut u).into_result()?;
            return Ok((Vec::new(), u));
        }
    };
    let mut lc_canonical = base.init();
    base.canonical_associate(&mut lc_canonical, &mut u, lc).into_result()?;
    let (ux, status) = scalar_mul(&u, x, base);
    status.into_result()?;
    return Ok((ux, u));
}

///
/// The gcd of all coefficients, as computed by the base ring.
///
fn content(x: &[El], base: &RingCtx) -> Result<El, Status> {
    let mut result = base.init();
    for c in x {
        let previous = std::mem::replace(&mut result, base.init());
        base.gcd(&mut result, &previous, c).into_result()?;
    }
    return Ok(result);
}

fn primitive_part(x: &[El], base: &RingCtx) -> Result<Vec<El>, Status> {
    if x.is_empty() {
        return Ok(Vec::new());
    }
    let c = content(x, base)?;
    let (result, status) = divexact_scalar(x, &c, base);
    status.into_result()?;
    return Ok(result);
}

fn euclidean_gcd(x: &[El], y: &[El], base: &RingCtx) -> Result<Vec<El>, Status> {
    let (mut a, status) = set(x, base);
    status.into_result()?;
    let (mut b, status) = set(y, base);
    status.into_result()?;
    loop {
        match is_zero(&b, base) {
            Truth::True => return Ok(a),
            Truth::Unknown => return Err(Status::Unable),
            Truth::False => {}
        }
        let (_, r) = divrem(&a, &b, base, false)?;
        a = b;
        b = r;
    }
}

///
/// The primitive polynomial remainder sequence over a unique factorization domain.
/// The pseudo-remainders are computed by scaling with a power of the leading coefficient
/// of the divisor, after which every division step is exact.
///
fn primitive_prs_gcd(x: &[El], y: &[El], base: &RingCtx) -> Result<Vec<El>, Status> {
    let content_gcd = {
        let mut result = base.init();
        base.gcd(&mut result, &content(x, base)?, &content(y, base)?).into_result()?;
        result
    };
    let (mut a, mut b) = if x.len() >= y.len() {
        (primitive_part(x, base)?, primitive_part(y, base)?)
    } else {
        (primitive_part(y, base)?, primitive_part(x, base)?)
    };
    loop {
        match is_zero(&b, base) {
            Truth::True => break,
            Truth::Unknown => return Err(Status::Unable),
            Truth::False => {}
        }
        let lc = match b.last() {
            Some(lc) => lc,
            None => unreachable!()
        };
        let mut scale = base.init();
        base.pow_uint(&mut scale, lc, (a.len() + 1 - b.len()) as u64).into_result()?;
        let (scaled, status) = scalar_mul(&scale, &a, base);
        status.into_result()?;
        let (_, r) = divrem(&scaled, &b, base, true)?;
        a = b;
        b = primitive_part(&r, base)?;
    }
    let (result, status) = scalar_mul(&content_gcd, &a, base);
    status.into_result()?;
    return Ok(result);
}

///
/// Computes a greatest common divisor of `x` and `y`, normalized by [`canonical_associate()`].
///
/// Over a field, this uses the euclidean algorithm, over other unique factorization
/// domains the primitive polynomial remainder sequence. Over other rings, the gcd
/// is not computed.
///
#[instrument(skip_all, level = "trace")]
pub fn gcd(x: &[El], y: &[El], base: &RingCtx) -> Result<Vec<El>, Status> {
    let result = if base.ctx_is_field().is_true() {
        euclidean_gcd(x, y, base)?
    } else if base.ctx_is_unique_factorization_domain().is_true() {
        if is_zero(x, base).is_true() {
            let (result, status) = set(y, base);
            status.into_result()?;
            result
        } else if is_zero(y, base).is_true() {
            let (result, status) = set(x, base);
            status.into_result()?;
            result
        } else {
            primitive_prs_gcd(x, y, base)?
        }
    } else {
        return Err(Status::Unable);
    };
    let (result, _) = canonical_associate(&result, base)?;
    return Ok(result);
}

pub fn randtest(len: usize, state: &mut RandState, base: &RingCtx) -> (Vec<El>, Status) {
    let mut status = Status::Success;
    let mut result = Vec::with_capacity(len);
    for _ in 0..len {
        let mut c = base.init();
        status |= base.randtest(&mut c, state);
        result.push(c);
    }
    normalize(&mut result, base);
    return (result, status);
}

fn needs_parentheses(coefficient: &str) -> bool {
    coefficient.chars().any(|c| matches!(c, ' ' | '+' | '-' | '*' | '/' | '^'))
}

///
/// Writes the polynomial `x` in the variable `var` as a sum of terms in ascending order,
/// e.g. `1 + 2*x + x^3`. Provably zero coefficients are skipped, and coefficients that
/// are not a single token are parenthesized.
///
pub fn write(out: &mut dyn fmt::Write, x: &[El], var: &str, base: &RingCtx) -> fmt::Result {
    write_terms(out, var, x.iter().enumerate().filter_map(|(i, c)| {
        if base.is_zero(c).is_true() {
            return None;
        }
        let mut coefficient = String::new();
        let written = base.write(&mut coefficient, c);
        Some((i, written.map(|()| coefficient), base.is_one(c).is_true()))
    }))
}

///
/// Writes a sum of terms, given as `(exponent, written coefficient, coefficient is one)`.
///
#[stability::unstable(feature = "enable")]
pub fn write_terms<I>(out: &mut dyn fmt::Write, var: &str, terms: I) -> fmt::Result
    where I: Iterator<Item = (usize, Result<String, fmt::Error>, bool)>
{
    let mut first = true;
    for (i, coefficient, is_one) in terms {
        let coefficient = coefficient?;
        if !first {
            write!(out, " + ")?;
        }
        first = false;
        if i == 0 {
            write!(out, "{}", coefficient)?;
            continue;
        }
        if !is_one {
            if needs_parentheses(&coefficient) {
                write!(out, "({})*", coefficient)?;
            } else {
                write!(out, "{}*", coefficient)?;
            }
        }
        if i == 1 {
            write!(out, "{}", var)?;
        } else {
            write!(out, "{}^{}", var, i)?;
        }
    }
    if first {
        write!(out, "0")?;
    }
    return Ok(());
}

#[cfg(test)]
use crate::rings::integer::integer_ring;
#[cfg(test)]
use crate::rings::rational::rational_field;
#[cfg(test)]
use crate::rings::zn::zn;

#[cfg(test)]
fn from_ints(values: &[i64], base: &RingCtx) -> Vec<El> {
    let mut result = values.iter().map(|x| base.from_int(*x).unwrap()).collect();
    normalize(&mut result, base);
    return result;
}

#[cfg(test)]
fn to_string(x: &[El], base: &RingCtx) -> String {
    let mut result = String::new();
    write(&mut result, x, "x", base).unwrap();
    return result;
}

#[test]
fn test_normalize() {
    let base = zn(7);
    let x = from_ints(&[1, 0, 7, 14], &base);
    assert_eq!(1, x.len());
    assert!(from_ints(&[0, 0], &base).is_empty());
}

#[test]
fn test_add_sub() {
    let base = zn(7);
    let x = from_ints(&[1, 2, 3], &base);
    let y = from_ints(&[6, 5, 4], &base);
    let (sum, status) = add(&x, &y, &base);
    assert_eq!(Status::Success, status);
    assert!(sum.is_empty());
    let (diff, _) = sub(&x, &from_ints(&[1], &base), &base);
    assert!(equal(&diff, &from_ints(&[0, 2, 3], &base), &base).is_true());
    let (diff, _) = sub(&from_ints(&[1], &base), &x, &base);
    assert!(equal(&diff, &from_ints(&[0, 5, 4], &base), &base).is_true());
}

#[test]
fn test_mul() {
    let base = zn(7);
    let (prod, status) = mul(&from_ints(&[1, 1], &base), &from_ints(&[-1, 1], &base), &base);
    assert_eq!(Status::Success, status);
    assert_eq!(3, prod.len());
    assert!(equal(&prod, &from_ints(&[6, 0, 1], &base), &base).is_true());
    assert!(mul(&[], &prod, &base).0.is_empty());
}

#[test]
fn test_divrem() {
    let ZZ = integer_ring();
    let x = from_ints(&[-1, 0, 0, 1], &ZZ);
    let y = from_ints(&[-1, 1], &ZZ);
    let (q, r) = divrem(&x, &y, &ZZ, false).unwrap();
    assert!(equal(&q, &from_ints(&[1, 1, 1], &ZZ), &ZZ).is_true());
    assert!(r.is_empty());

    let (q, r) = divrem(&from_ints(&[1, 0, 1], &ZZ), &y, &ZZ, false).unwrap();
    assert!(equal(&q, &from_ints(&[1, 1], &ZZ), &ZZ).is_true());
    assert!(equal(&r, &from_ints(&[2], &ZZ), &ZZ).is_true());

    assert_eq!(Err(Status::Domain), divrem(&x, &from_ints(&[1, 2], &ZZ), &ZZ, false).map(|_| ()));
    assert_eq!(Err(Status::Domain), divrem(&x, &[], &ZZ, false).map(|_| ()));
}

#[test]
fn test_gcd_over_field() {
    let QQ = rational_field();
    // (x - 1)(x + 2) and (x - 1)(x - 3)
    let x = from_ints(&[-2, 1, 1], &QQ);
    let y = from_ints(&[3, -4, 1], &QQ);
    let d = gcd(&x, &y, &QQ).unwrap();
    assert!(equal(&d, &from_ints(&[-1, 1], &QQ), &QQ).is_true());
}

#[test]
fn test_gcd_over_integers() {
    let ZZ = integer_ring();
    // 2 (x + 1)^2 and -4 (x + 1)(x + 3)
    let x = from_ints(&[2, 4, 2], &ZZ);
    let y = from_ints(&[-12, -16, -4], &ZZ);
    let d = gcd(&x, &y, &ZZ).unwrap();
    assert!(equal(&d, &from_ints(&[2, 2], &ZZ), &ZZ).is_true());
    let d = gcd(&[], &y, &ZZ).unwrap();
    assert!(equal(&d, &from_ints(&[12, 16, 4], &ZZ), &ZZ).is_true());
}

#[test]
fn test_gcd_over_non_ufd() {
    let base = zn(12);
    assert_eq!(Err(Status::Unable), gcd(&from_ints(&[1, 1], &base), &from_ints(&[1], &base), &base).map(|_| ()));
}

#[test]
fn test_write() {
    let ZZ = integer_ring();
    assert_eq!("0", to_string(&[], &ZZ));
    assert_eq!("1 + x", to_string(&from_ints(&[1, 1], &ZZ), &ZZ));
    assert_eq!("-3 + 2*x + (-1)*x^3", to_string(&from_ints(&[-3, 2, 0, -1], &ZZ), &ZZ));
    assert_eq!("x^2", to_string(&from_ints(&[0, 0, 1], &ZZ), &ZZ));
}
