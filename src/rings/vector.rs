use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::generic::ctx_predicate_false;
use crate::method::*;
use crate::random::RandState;
use crate::ring::*;
use crate::status::*;

struct VectorData {
    base_ring: Arc<RingCtx>
}

///
/// Vectors of arbitrary length with entries in a base ring. Vectors only form an
/// additive group; adding vectors of different lengths is [`Status::Domain`].
///
pub fn vector_ring(base_ring: Arc<RingCtx>) -> RingCtx {
    RingCtx::new(RingKind::Vector, std::mem::size_of::<Vec<El>>(), methods(), VectorData { base_ring })
}

pub fn base_ring(ring: &RingCtx) -> &RingCtx {
    &ring.data::<VectorData>().base_ring
}

pub fn from_entries(entries: Vec<El>) -> El {
    El::new(entries)
}

pub fn entries(x: &El) -> &[El] {
    x.downcast_ref::<Vec<El>>()
}

fn entries_mut(x: &mut El) -> &mut Vec<El> {
    x.downcast_mut::<Vec<El>>()
}

fn methods() -> &'static MethodTable {
    static METHODS: OnceLock<MethodTable> = OnceLock::new();
    METHODS.get_or_init(|| MethodTable::new(RingKind::Vector, &[
        (Method::CtxWrite, MethodFn::CtxWrite(ctx_write)),
        (Method::CtxIsRing, MethodFn::CtxPredicate(ctx_predicate_false)),
        (Method::CtxIsThreadsafe, MethodFn::CtxPredicate(ctx_is_threadsafe)),
        (Method::Init, MethodFn::Init(init)),
        (Method::Randtest, MethodFn::Randtest(randtest)),
        (Method::Write, MethodFn::Write(write)),
        (Method::IsZero, MethodFn::Predicate(is_zero)),
        (Method::Equal, MethodFn::Equal(equal)),
        (Method::Set, MethodFn::Unary(set)),
        (Method::SetBigInt, MethodFn::SetBigInt(set_bigint)),
        (Method::Neg, MethodFn::Unary(neg)),
        (Method::Add, MethodFn::Binary(add)),
        (Method::Sub, MethodFn::Binary(sub)),
    ]))
}

fn ctx_write(out: &mut dyn fmt::Write, ring: &RingCtx) -> fmt::Result {
    write!(out, "Vectors over ")?;
    base_ring(ring).ctx_write(out)
}

fn ctx_is_threadsafe(ring: &RingCtx) -> Truth {
    base_ring(ring).ctx_is_threadsafe()
}

fn init(_: &RingCtx) -> El {
    El::new(Vec::<El>::new())
}

fn randtest(res: &mut El, state: &mut RandState, ring: &RingCtx) -> Status {
    let base = base_ring(ring);
    let len = state.rand_range(0..4) as usize;
    let mut result = Vec::with_capacity(len);
    let mut status = Status::Success;
    for _ in 0..len {
        let mut entry = base.init();
        status |= base.randtest(&mut entry, state);
        result.push(entry);
    }
    *entries_mut(res) = result;
    status
}

fn write(out: &mut dyn fmt::Write, x: &El, ring: &RingCtx) -> fmt::Result {
    let base = base_ring(ring);
    write!(out, "[")?;
    for (i, entry) in entries(x).iter().enumerate() {
        if i > 0 {
            write!(out, ", ")?;
        }
        base.write(out, entry)?;
    }
    write!(out, "]")
}

fn is_zero(x: &El, ring: &RingCtx) -> Truth {
    let base = base_ring(ring);
    entries(x).iter().fold(Truth::True, |acc, entry| acc & base.is_zero(entry))
}

fn equal(x: &El, y: &El, ring: &RingCtx) -> Truth {
    let base = base_ring(ring);
    if entries(x).len() != entries(y).len() {
        return Truth::False;
    }
    entries(x).iter().zip(entries(y).iter()).fold(Truth::True, |acc, (a, b)| acc & base.equal(a, b))
}

fn set(res: &mut El, x: &El, ring: &RingCtx) -> Status {
    let base = base_ring(ring);
    let mut status = Status::Success;
    let mut result = Vec::with_capacity(entries(x).len());
    for entry in entries(x) {
        let mut value = base.init();
        status |= base.set(&mut value, entry);
        result.push(value);
    }
    *entries_mut(res) = result;
    status
}

fn set_bigint(_: &mut El, _: &num_bigint::BigInt, _: &RingCtx) -> Status {
    Status::Unable
}

fn neg(res: &mut El, x: &El, ring: &RingCtx) -> Status {
    let base = base_ring(ring);
    let mut status = Status::Success;
    let mut result = Vec::with_capacity(entries(x).len());
    for entry in entries(x) {
        let mut value = base.init();
        status |= base.neg(&mut value, entry);
        result.push(value);
    }
    *entries_mut(res) = result;
    status
}

fn entrywise(res: &mut El, x: &El, y: &El, ring: &RingCtx, op: fn(&RingCtx, &mut El, &El, &El) -> Status) -> Status {
    let base = base_ring(ring);
    if entries(x).len() != entries(y).len() {
        return Status::Domain;
    }
    let mut status = Status::Success;
    let mut result = Vec::with_capacity(entries(x).len());
    for (a, b) in entries(x).iter().zip(entries(y).iter()) {
        let mut value = base.init();
        status |= op(base, &mut value, a, b);
        result.push(value);
    }
    *entries_mut(res) = result;
    status
}

fn add(res: &mut El, x: &El, y: &El, ring: &RingCtx) -> Status {
    entrywise(res, x, y, ring, RingCtx::add)
}

fn sub(res: &mut El, x: &El, y: &El, ring: &RingCtx) -> Status {
    entrywise(res, x, y, ring, RingCtx::sub)
}

#[cfg(test)]
use crate::rings::zn::zn;

#[test]
fn test_vector_arithmetic() {
    let base = Arc::new(zn(5));
    let V = vector_ring(base.clone());
    let x = from_entries(vec![base.from_int(1).unwrap(), base.from_int(4).unwrap()]);
    let y = from_entries(vec![base.from_int(2).unwrap(), base.from_int(3).unwrap()]);
    let mut sum = V.init();
    assert_eq!(Status::Success, V.add(&mut sum, &x, &y));
    assert_eq!("[3, 2]", format!("{}", V.format(&sum)));
    assert!(V.is_zero(&sum).is_false());
    let mut diff = V.init();
    assert_eq!(Status::Success, V.sub(&mut diff, &x, &x));
    assert!(V.is_zero(&diff).is_true());
    assert_eq!(Status::Domain, V.add(&mut sum, &x, &V.init()));
    assert_eq!("Vectors over Integers mod 5", format!("{}", V));
}

#[test]
fn test_set_copies_entries() {
    let base = Arc::new(zn(5));
    let V = vector_ring(Arc::new(vector_ring(base.clone())));
    let inner = from_entries(vec![base.from_int(2).unwrap()]);
    let x = from_entries(vec![inner, from_entries(Vec::new())]);
    let mut copy = V.init();
    assert_eq!(Status::Success, V.set(&mut copy, &x));
    assert!(V.equal(&copy, &x).is_true());
    assert_eq!("[[2], []]", format!("{}", V.format(&copy)));
}

#[test]
#[should_panic(expected = "operation mul is not defined for ring kind Vector")]
fn test_missing_operation_panics() {
    let V = vector_ring(Arc::new(zn(5)));
    let mut res = V.init();
    V.mul(&mut res, &V.init(), &V.init());
}
