use std::fmt;
use std::sync::OnceLock;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::ToPrimitive;
use tracing::instrument;

use crate::algorithms::eea::inv_mod;
use crate::algorithms::miller_rabin::is_prime;
use crate::generic::{ctx_predicate_false, ctx_predicate_true};
use crate::method::*;
use crate::random::RandState;
use crate::ring::*;
use crate::rings::poly;
use crate::status::*;

///
/// Polynomial factorization over `Z/pZ` gives up once it would have to try more
/// candidate factors than this.
///
pub const POLY_FACTOR_CANDIDATE_BOUND: u64 = 1 << 16;

struct ZnData {
    modulus: u64,
    is_field: bool
}

///
/// The ring `Z/nZ` for a modulus `1 <= n < 2^64`, with elements represented as `u64`
/// in `0..n`.
///
/// For prime `n`, this is a field, and factorization of polynomials over it is available
/// through [`crate::rings::poly`].
///
/// # Example
/// ```
/// # use generic_ring::rings::zn::*;
/// # use generic_ring::status::*;
/// let Fp = zn(7);
/// let mut x = Fp.init();
/// assert_eq!(Status::Success, Fp.inv(&mut x, &Fp.from_int(3).unwrap()));
/// assert_eq!(5, value(&x));
/// assert!(Fp.ctx_is_field().is_true());
/// ```
///
pub fn zn(modulus: u64) -> RingCtx {
    assert!(modulus > 0, "modulus must be positive");
    let data = ZnData { modulus, is_field: is_prime(modulus) };
    RingCtx::new(RingKind::Zn, std::mem::size_of::<u64>(), methods(), data)
}

///
/// Returns the representative of `x` in `0..n`.
///
pub fn value(x: &El) -> u64 {
    *x.downcast_ref::<u64>()
}

pub fn modulus(ring: &RingCtx) -> u64 {
    ring.data::<ZnData>().modulus
}

fn value_mut(x: &mut El) -> &mut u64 {
    x.downcast_mut::<u64>()
}

fn methods() -> &'static MethodTable {
    static METHODS: OnceLock<MethodTable> = OnceLock::new();
    METHODS.get_or_init(|| MethodTable::new(RingKind::Zn, &[
        (Method::CtxWrite, MethodFn::CtxWrite(ctx_write)),
        (Method::CtxIsRing, MethodFn::CtxPredicate(ctx_predicate_true)),
        (Method::CtxIsCommutativeRing, MethodFn::CtxPredicate(ctx_predicate_true)),
        (Method::CtxIsIntegralDomain, MethodFn::CtxPredicate(ctx_is_field)),
        (Method::CtxIsUniqueFactorizationDomain, MethodFn::CtxPredicate(ctx_is_field)),
        (Method::CtxIsField, MethodFn::CtxPredicate(ctx_is_field)),
        (Method::CtxIsRationalVectorSpace, MethodFn::CtxPredicate(ctx_predicate_false)),
        (Method::CtxIsRealVectorSpace, MethodFn::CtxPredicate(ctx_predicate_false)),
        (Method::CtxIsComplexVectorSpace, MethodFn::CtxPredicate(ctx_predicate_false)),
        (Method::CtxIsThreadsafe, MethodFn::CtxPredicate(ctx_predicate_true)),
        (Method::Init, MethodFn::Init(init)),
        (Method::Randtest, MethodFn::Randtest(randtest)),
        (Method::Write, MethodFn::Write(write)),
        (Method::One, MethodFn::Constant(one)),
        (Method::IsZero, MethodFn::Predicate(is_zero)),
        (Method::Equal, MethodFn::Equal(equal)),
        (Method::Set, MethodFn::Unary(set)),
        (Method::SetInt, MethodFn::SetInt(set_int)),
        (Method::SetBigInt, MethodFn::SetBigInt(set_bigint)),
        (Method::SetOther, MethodFn::SetOther(set_other)),
        (Method::Neg, MethodFn::Unary(neg)),
        (Method::Add, MethodFn::Binary(add)),
        (Method::Sub, MethodFn::Binary(sub)),
        (Method::Mul, MethodFn::Binary(mul)),
        (Method::Div, MethodFn::Binary(div)),
        (Method::Inv, MethodFn::Unary(inv)),
        (Method::CanonicalAssociate, MethodFn::CanonicalAssociate(canonical_associate)),
        (Method::Gcd, MethodFn::Binary(gcd)),
    ]).with_poly_factor(poly_factor))
}

fn ctx_write(out: &mut dyn fmt::Write, ring: &RingCtx) -> fmt::Result {
    write!(out, "Integers mod {}", modulus(ring))
}

fn ctx_is_field(ring: &RingCtx) -> Truth {
    ring.data::<ZnData>().is_field.into()
}

fn mul_mod(a: u64, b: u64, n: u64) -> u64 {
    ((a as u128 * b as u128) % n as u128) as u64
}

fn add_mod(a: u64, b: u64, n: u64) -> u64 {
    ((a as u128 + b as u128) % n as u128) as u64
}

fn neg_mod(a: u64, n: u64) -> u64 {
    if a == 0 { 0 } else { n - a }
}

fn init(_: &RingCtx) -> El {
    El::new(0u64)
}

fn randtest(res: &mut El, state: &mut RandState, ring: &RingCtx) -> Status {
    *value_mut(res) = state.rand_range(0..modulus(ring));
    Status::Success
}

fn write(out: &mut dyn fmt::Write, x: &El, _: &RingCtx) -> fmt::Result {
    write!(out, "{}", value(x))
}

fn one(res: &mut El, ring: &RingCtx) -> Status {
    *value_mut(res) = 1 % modulus(ring);
    Status::Success
}

fn is_zero(x: &El, _: &RingCtx) -> Truth {
    (value(x) == 0).into()
}

fn equal(x: &El, y: &El, _: &RingCtx) -> Truth {
    (value(x) == value(y)).into()
}

fn set(res: &mut El, x: &El, _: &RingCtx) -> Status {
    *value_mut(res) = value(x);
    Status::Success
}

fn set_int(res: &mut El, x: i64, ring: &RingCtx) -> Status {
    *value_mut(res) = (x as i128).rem_euclid(modulus(ring) as i128) as u64;
    Status::Success
}

fn set_bigint(res: &mut El, x: &BigInt, ring: &RingCtx) -> Status {
    let n = BigInt::from(modulus(ring));
    match x.mod_floor(&n).to_u64() {
        Some(x) => {
            *value_mut(res) = x;
            Status::Success
        },
        None => Status::Unable
    }
}

fn set_other(res: &mut El, x: &El, x_ring: &RingCtx, ring: &RingCtx) -> Status {
    match x_ring.which_ring() {
        RingKind::Zn if modulus(x_ring) == modulus(ring) => set(res, x, ring),
        RingKind::Zn => Status::Unable,
        RingKind::Integer => set_bigint(res, x.downcast_ref::<BigInt>(), ring),
        RingKind::Rational => {
            let x = x.downcast_ref::<num_rational::BigRational>();
            ring.set_rational(res, x)
        },
        _ => Status::Unable
    }
}

fn neg(res: &mut El, x: &El, ring: &RingCtx) -> Status {
    *value_mut(res) = neg_mod(value(x), modulus(ring));
    Status::Success
}

fn add(res: &mut El, x: &El, y: &El, ring: &RingCtx) -> Status {
    *value_mut(res) = add_mod(value(x), value(y), modulus(ring));
    Status::Success
}

fn sub(res: &mut El, x: &El, y: &El, ring: &RingCtx) -> Status {
    let n = modulus(ring);
    *value_mut(res) = add_mod(value(x), neg_mod(value(y), n), n);
    Status::Success
}

fn mul(res: &mut El, x: &El, y: &El, ring: &RingCtx) -> Status {
    *value_mut(res) = mul_mod(value(x), value(y), modulus(ring));
    Status::Success
}

///
/// Finds some `q` with `q * y = x`. If `y` is a zero divisor, such a `q` exists
/// iff `gcd(y, n)` divides `x`, and is not unique.
///
fn div(res: &mut El, x: &El, y: &El, ring: &RingCtx) -> Status {
    let n = modulus(ring);
    let (x, y) = (value(x), value(y));
    let d = y.gcd(&n);
    if x % d != 0 {
        return Status::Domain;
    }
    let reduced_n = n / d;
    match inv_mod(y / d, reduced_n) {
        Some(y_inv) => {
            *value_mut(res) = mul_mod((x / d) % reduced_n, y_inv, reduced_n);
            Status::Success
        },
        None => Status::Domain
    }
}

fn inv(res: &mut El, x: &El, ring: &RingCtx) -> Status {
    match inv_mod(value(x), modulus(ring)) {
        Some(x_inv) => {
            *value_mut(res) = x_inv;
            Status::Success
        },
        None => Status::Domain
    }
}

fn canonical_associate(ux: &mut El, u: &mut El, x: &El, ring: &RingCtx) -> Status {
    if !ring.data::<ZnData>().is_field {
        return Status::Unable;
    }
    if value(x) == 0 {
        *value_mut(ux) = 0;
        return one(u, ring);
    }
    one(ux, ring) | inv(u, x, ring)
}

fn gcd(res: &mut El, x: &El, y: &El, ring: &RingCtx) -> Status {
    if !ring.data::<ZnData>().is_field {
        return Status::Unable;
    }
    if value(x) == 0 && value(y) == 0 {
        *value_mut(res) = 0;
        Status::Success
    } else {
        one(res, ring)
    }
}

///
/// Divides `f` by the monic polynomial `g` over `Z/pZ`, returning the quotient
/// if the remainder is zero.
///
fn divide_monic(f: &[u64], g: &[u64], p: u64) -> Option<Vec<u64>> {
    debug_assert_eq!(Some(&1), g.last());
    if f.len() < g.len() {
        return None;
    }
    let mut rem = f.to_vec();
    let mut quo = vec![0; f.len() + 1 - g.len()];
    for i in (0..quo.len()).rev() {
        let c = rem[i + g.len() - 1];
        quo[i] = c;
        if c != 0 {
            for (j, g_j) in g.iter().enumerate() {
                rem[i + j] = add_mod(rem[i + j], neg_mod(mul_mod(c, *g_j, p), p), p);
            }
        }
    }
    if rem[..(g.len() - 1)].iter().all(|c| *c == 0) {
        Some(quo)
    } else {
        None
    }
}

///
/// Factors a polynomial over `Z/pZ` by dividing out all monic polynomials in order
/// of increasing degree. Each candidate that divides is irreducible, since all its
/// proper factors have been divided out before.
///
#[instrument(skip_all, level = "trace")]
fn poly_factor(unit: &mut El, factors: &mut Vec<El>, exponents: &mut Vec<u64>, f: &El, _flags: u32, poly_ring: &RingCtx) -> Status {
    let base_ring = poly::base_ring(poly_ring);
    let p = modulus(base_ring);
    factors.clear();
    exponents.clear();
    if !base_ring.data::<ZnData>().is_field {
        return Status::Unable;
    }
    let mut remaining = poly::coefficients(f).iter().map(value).collect::<Vec<_>>();
    let lc = match remaining.last() {
        Some(lc) => *lc,
        None => {
            *unit = base_ring.init();
            return Status::Success;
        }
    };
    *value_mut(unit) = lc;
    let Some(lc_inv) = inv_mod(lc, p) else {
        return Status::Unable;
    };
    for c in &mut remaining {
        *c = mul_mod(*c, lc_inv, p);
    }

    let mut found: Vec<(Vec<u64>, u64)> = Vec::new();
    let mut tried = 0;
    let mut degree = 1;
    while 2 * degree < remaining.len() {
        let candidate_count = match p.checked_pow(degree as u32) {
            Some(count) if tried + count <= POLY_FACTOR_CANDIDATE_BOUND => count,
            _ => {
                tracing::debug!(modulus = p, degree, "giving up polynomial factorization, too many candidates");
                return Status::Unable;
            }
        };
        tried += candidate_count;
        for index in 0..candidate_count {
            let mut candidate = Vec::with_capacity(degree + 1);
            let mut digits = index;
            for _ in 0..degree {
                candidate.push(digits % p);
                digits /= p;
            }
            candidate.push(1);
            let mut e = 0;
            while let Some(quo) = divide_monic(&remaining, &candidate, p) {
                remaining = quo;
                e += 1;
            }
            if e > 0 {
                found.push((candidate, e));
            }
            if 2 * degree >= remaining.len() {
                break;
            }
        }
        degree += 1;
    }
    if remaining.len() > 1 {
        found.push((remaining, 1));
    }
    for (factor, e) in found {
        factors.push(poly::from_coefficients(poly_ring, factor.into_iter().map(El::new).collect()));
        exponents.push(e);
    }
    Status::Success
}

#[cfg(test)]
use crate::ring::generic_tests;

#[test]
fn test_ring_axioms() {
    for n in [1, 2, 7, 12, 1 << 40, u64::MAX] {
        let ring = zn(n);
        let elements = [0, 1, -1, 2, 3, i64::MAX].into_iter().map(|x| ring.from_int(x).unwrap());
        generic_tests::test_ring_axioms(&ring, elements);
    }
}

#[test]
fn test_division_law() {
    for n in [7, 12, 30] {
        let ring = zn(n);
        generic_tests::test_division_law(&ring, (0..(n as i64)).map(|x| ring.from_int(x).unwrap()));
    }
}

#[test]
fn test_zero_divisors() {
    let ring = zn(12);
    assert!(ring.ctx_is_field().is_false());
    let mut res = ring.init();
    assert_eq!(Status::Domain, ring.inv(&mut res, &ring.from_int(4).unwrap()));
    assert_eq!(Status::Domain, ring.div(&mut res, &ring.from_int(3).unwrap(), &ring.from_int(4).unwrap()));
    assert_eq!(Status::Success, ring.div(&mut res, &ring.from_int(8).unwrap(), &ring.from_int(4).unwrap()));
    assert_eq!(8, mul_mod(value(&res), 4, 12));
}

#[test]
fn test_set_other() {
    let ZZ = crate::rings::integer::integer_ring();
    let QQ = crate::rings::rational::rational_field();
    let F7 = zn(7);
    let other_F7 = zn(7);
    let F5 = zn(5);
    let mut res = F7.init();
    assert_eq!(Status::Success, F7.set_other(&mut res, &ZZ.from_int(-1).unwrap(), &ZZ));
    assert_eq!(6, value(&res));
    assert_eq!(Status::Success, F7.set_other(&mut res, &QQ.from_rational(&num_rational::BigRational::new(1.into(), 2.into())).unwrap(), &QQ));
    assert_eq!(4, value(&res));
    assert_eq!(Status::Success, F7.set_other(&mut res, &other_F7.from_int(3).unwrap(), &other_F7));
    assert_eq!(3, value(&res));
    assert_eq!(Status::Unable, F7.set_other(&mut res, &F5.from_int(3).unwrap(), &F5));
}

#[test]
fn test_divide_monic() {
    // (x + 1)(x + 2) = x^2 + 3x + 2 over Z/7
    assert_eq!(Some(vec![2, 1]), divide_monic(&[2, 3, 1], &[1, 1], 7));
    assert_eq!(None, divide_monic(&[1, 0, 1], &[1, 1], 7));
    assert_eq!(None, divide_monic(&[1], &[1, 1], 7));
}
