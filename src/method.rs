use std::fmt;

use num_bigint::BigInt;
use num_rational::BigRational;

use crate::generic;
use crate::random::RandState;
use crate::ring::{El, RingCtx, RingKind};
use crate::status::{Status, Truth};

///
/// Version of the operation catalog. Bumped whenever [`Method`] changes, since
/// the catalog together with the signatures of [`MethodFn`] is the only surface
/// ring kinds are called through.
///
pub const REGISTRY_VERSION: u32 = 2;

macro_rules! define_methods {
    ($($variant:ident => $name:literal : $sig:ident),* $(,)?) => {

        ///
        /// Identifier of an operation a ring kind may support.
        ///
        /// The catalog is closed and ordered; a ring kind populates a [`MethodTable`]
        /// with functions for the identifiers it supports. Each identifier has a fixed
        /// call signature, given by [`Method::signature()`].
        ///
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(usize)]
        pub enum Method {
            $($variant),*
        }

        impl Method {

            pub const ALL: &'static [Method] = &[$(Method::$variant),*];

            pub const COUNT: usize = Method::ALL.len();

            pub const fn name(self) -> &'static str {
                match self {
                    $(Method::$variant => $name),*
                }
            }

            pub const fn signature(self) -> Signature {
                match self {
                    $(Method::$variant => Signature::$sig),*
                }
            }

            pub const fn index(self) -> usize {
                self as usize
            }
        }
    };
}

define_methods!{
    CtxWrite => "ctx_write": CtxWrite,
    CtxIsRing => "ctx_is_ring": CtxPredicate,
    CtxIsCommutativeRing => "ctx_is_commutative_ring": CtxPredicate,
    CtxIsIntegralDomain => "ctx_is_integral_domain": CtxPredicate,
    CtxIsUniqueFactorizationDomain => "ctx_is_unique_factorization_domain": CtxPredicate,
    CtxIsField => "ctx_is_field": CtxPredicate,
    CtxIsRationalVectorSpace => "ctx_is_rational_vector_space": CtxPredicate,
    CtxIsRealVectorSpace => "ctx_is_real_vector_space": CtxPredicate,
    CtxIsComplexVectorSpace => "ctx_is_complex_vector_space": CtxPredicate,
    CtxIsThreadsafe => "ctx_is_threadsafe": CtxPredicate,
    CtxSetGenName => "ctx_set_gen_name": CtxSetGenName,
    CtxSetGenNames => "ctx_set_gen_names": CtxSetGenNames,

    Init => "init": Init,
    Swap => "swap": Swap,
    SetShallow => "set_shallow": SetShallow,
    Randtest => "randtest": Randtest,
    Write => "write": Write,

    Zero => "zero": Constant,
    One => "one": Constant,
    NegOne => "neg_one": Constant,
    Gen => "gen": Constant,
    Gens => "gens": Gens,
    GensRecursive => "gens_recursive": Gens,
    I => "i": Constant,
    Pi => "pi": Constant,

    IsZero => "is_zero": Predicate,
    IsOne => "is_one": Predicate,
    IsNegOne => "is_neg_one": Predicate,
    Equal => "equal": Equal,

    Set => "set": Unary,
    SetUint => "set_uint": SetUint,
    SetInt => "set_int": SetInt,
    SetBigInt => "set_bigint": SetBigInt,
    SetRational => "set_rational": SetRational,
    SetOther => "set_other": SetOther,
    SetStr => "set_str": SetStr,

    Neg => "neg": Unary,
    AddUint => "add_uint": OpUint,
    AddInt => "add_int": OpInt,
    AddBigInt => "add_bigint": OpBigInt,
    AddRational => "add_rational": OpRational,
    Add => "add": Binary,
    SubUint => "sub_uint": OpUint,
    SubInt => "sub_int": OpInt,
    SubBigInt => "sub_bigint": OpBigInt,
    SubRational => "sub_rational": OpRational,
    Sub => "sub": Binary,
    Mul => "mul": Binary,
    MulOther => "mul_other": MulOther,
    OtherMul => "other_mul": OtherMul,
    MulUint => "mul_uint": OpUint,
    MulInt => "mul_int": OpInt,
    MulBigInt => "mul_bigint": OpBigInt,
    MulRational => "mul_rational": OpRational,

    PowUint => "pow_uint": OpUint,
    PowInt => "pow_int": OpInt,
    PowBigInt => "pow_bigint": OpBigInt,
    Div => "div": Binary,
    Divexact => "divexact": Binary,
    Inv => "inv": Unary,

    EuclideanDiv => "euclidean_div": Binary,
    EuclideanRem => "euclidean_rem": Binary,
    EuclideanDivrem => "euclidean_divrem": Divrem,

    CanonicalAssociate => "canonical_associate": CanonicalAssociate,
    Gcd => "gcd": Binary,
    Factor => "factor": Factor,
}

/// Shape of the function stored for a [`Method`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signature {
    CtxWrite,
    CtxPredicate,
    CtxSetGenName,
    CtxSetGenNames,
    Init,
    Swap,
    SetShallow,
    Randtest,
    Write,
    Constant,
    Gens,
    Predicate,
    Equal,
    Unary,
    SetUint,
    SetInt,
    SetBigInt,
    SetRational,
    SetOther,
    SetStr,
    OpUint,
    OpInt,
    OpBigInt,
    OpRational,
    Binary,
    MulOther,
    OtherMul,
    Divrem,
    CanonicalAssociate,
    Factor
}

// In all element operations, the ring the operation is called on comes last.
// Element arguments never alias, which the borrow checker enforces; in-place
// forms are provided by the dispatch layer.

pub type CtxWriteFn = fn(&mut dyn fmt::Write, &RingCtx) -> fmt::Result;
pub type CtxPredicateFn = fn(&RingCtx) -> Truth;
pub type CtxSetGenNameFn = fn(&mut RingCtx, &str) -> Status;
pub type CtxSetGenNamesFn = fn(&mut RingCtx, &[&str]) -> Status;
pub type InitFn = fn(&RingCtx) -> El;
pub type SwapFn = fn(&mut El, &mut El, &RingCtx);
pub type SetShallowFn = fn(&mut El, El, &RingCtx);
pub type RandtestFn = fn(&mut El, &mut RandState, &RingCtx) -> Status;
pub type WriteFn = fn(&mut dyn fmt::Write, &El, &RingCtx) -> fmt::Result;
pub type ConstantFn = fn(&mut El, &RingCtx) -> Status;
pub type GensFn = fn(&mut Vec<El>, &RingCtx) -> Status;
pub type PredicateFn = fn(&El, &RingCtx) -> Truth;
pub type EqualFn = fn(&El, &El, &RingCtx) -> Truth;
pub type UnaryFn = fn(&mut El, &El, &RingCtx) -> Status;
pub type SetUintFn = fn(&mut El, u64, &RingCtx) -> Status;
pub type SetIntFn = fn(&mut El, i64, &RingCtx) -> Status;
pub type SetBigIntFn = fn(&mut El, &BigInt, &RingCtx) -> Status;
pub type SetRationalFn = fn(&mut El, &BigRational, &RingCtx) -> Status;
/// `(res, x, x_ring, ring)`
pub type SetOtherFn = fn(&mut El, &El, &RingCtx, &RingCtx) -> Status;
pub type SetStrFn = fn(&mut El, &str, &RingCtx) -> Status;
pub type OpUintFn = fn(&mut El, &El, u64, &RingCtx) -> Status;
pub type OpIntFn = fn(&mut El, &El, i64, &RingCtx) -> Status;
pub type OpBigIntFn = fn(&mut El, &El, &BigInt, &RingCtx) -> Status;
pub type OpRationalFn = fn(&mut El, &El, &BigRational, &RingCtx) -> Status;
pub type BinaryFn = fn(&mut El, &El, &El, &RingCtx) -> Status;
/// `(res, x, y, y_ring, ring)`
pub type MulOtherFn = fn(&mut El, &El, &El, &RingCtx, &RingCtx) -> Status;
/// `(res, x, x_ring, y, ring)`
pub type OtherMulFn = fn(&mut El, &El, &RingCtx, &El, &RingCtx) -> Status;
/// `(quo, rem, x, y, ring)`
pub type DivremFn = fn(&mut El, &mut El, &El, &El, &RingCtx) -> Status;
/// `(ux, u, x, ring)`
pub type CanonicalAssociateFn = fn(&mut El, &mut El, &El, &RingCtx) -> Status;
/// `(unit, factors, exponents, x, flags, ring)`
pub type FactorFn = fn(&mut El, &mut Vec<El>, &mut Vec<u64>, &El, u32, &RingCtx) -> Status;

///
/// Factorization of polynomials over the ring the table belongs to. Called with
/// `(unit, factors, exponents, poly, flags, poly_ring)`, where `unit` is an element
/// of the base ring and `factors` are elements of `poly_ring`.
///
pub type PolyFactorFn = fn(&mut El, &mut Vec<El>, &mut Vec<u64>, &El, u32, &RingCtx) -> Status;

///
/// A function implementing a [`Method`], tagged with its call shape.
///
#[derive(Clone, Copy)]
pub enum MethodFn {
    CtxWrite(CtxWriteFn),
    CtxPredicate(CtxPredicateFn),
    CtxSetGenName(CtxSetGenNameFn),
    CtxSetGenNames(CtxSetGenNamesFn),
    Init(InitFn),
    Swap(SwapFn),
    SetShallow(SetShallowFn),
    Randtest(RandtestFn),
    Write(WriteFn),
    Constant(ConstantFn),
    Gens(GensFn),
    Predicate(PredicateFn),
    Equal(EqualFn),
    Unary(UnaryFn),
    SetUint(SetUintFn),
    SetInt(SetIntFn),
    SetBigInt(SetBigIntFn),
    SetRational(SetRationalFn),
    SetOther(SetOtherFn),
    SetStr(SetStrFn),
    OpUint(OpUintFn),
    OpInt(OpIntFn),
    OpBigInt(OpBigIntFn),
    OpRational(OpRationalFn),
    Binary(BinaryFn),
    MulOther(MulOtherFn),
    OtherMul(OtherMulFn),
    Divrem(DivremFn),
    CanonicalAssociate(CanonicalAssociateFn),
    Factor(FactorFn)
}

impl MethodFn {

    pub fn signature(&self) -> Signature {
        match self {
            MethodFn::CtxWrite(_) => Signature::CtxWrite,
            MethodFn::CtxPredicate(_) => Signature::CtxPredicate,
            MethodFn::CtxSetGenName(_) => Signature::CtxSetGenName,
            MethodFn::CtxSetGenNames(_) => Signature::CtxSetGenNames,
            MethodFn::Init(_) => Signature::Init,
            MethodFn::Swap(_) => Signature::Swap,
            MethodFn::SetShallow(_) => Signature::SetShallow,
            MethodFn::Randtest(_) => Signature::Randtest,
            MethodFn::Write(_) => Signature::Write,
            MethodFn::Constant(_) => Signature::Constant,
            MethodFn::Gens(_) => Signature::Gens,
            MethodFn::Predicate(_) => Signature::Predicate,
            MethodFn::Equal(_) => Signature::Equal,
            MethodFn::Unary(_) => Signature::Unary,
            MethodFn::SetUint(_) => Signature::SetUint,
            MethodFn::SetInt(_) => Signature::SetInt,
            MethodFn::SetBigInt(_) => Signature::SetBigInt,
            MethodFn::SetRational(_) => Signature::SetRational,
            MethodFn::SetOther(_) => Signature::SetOther,
            MethodFn::SetStr(_) => Signature::SetStr,
            MethodFn::OpUint(_) => Signature::OpUint,
            MethodFn::OpInt(_) => Signature::OpInt,
            MethodFn::OpBigInt(_) => Signature::OpBigInt,
            MethodFn::OpRational(_) => Signature::OpRational,
            MethodFn::Binary(_) => Signature::Binary,
            MethodFn::MulOther(_) => Signature::MulOther,
            MethodFn::OtherMul(_) => Signature::OtherMul,
            MethodFn::Divrem(_) => Signature::Divrem,
            MethodFn::CanonicalAssociate(_) => Signature::CanonicalAssociate,
            MethodFn::Factor(_) => Signature::Factor
        }
    }
}

///
/// The operation table of a ring kind.
///
/// Every ring kind builds exactly one table per process, usually stored in a
/// `static OnceLock<MethodTable>`, and all contexts of that kind refer to it.
/// After construction, the table is immutable and can be read concurrently.
///
/// Entries are first filled with the defaults from [`crate::generic`], and then
/// overwritten by the entries given by the ring kind. Identifiers that neither
/// provide are absent, and calling them is a programming error.
///
pub struct MethodTable {
    kind: RingKind,
    entries: [Option<MethodFn>; Method::COUNT],
    poly_factor: Option<PolyFactorFn>
}

impl MethodTable {

    ///
    /// Builds the table for a ring kind from its list of implemented methods.
    ///
    /// # Panics
    ///
    /// If a function does not have the signature of the method it is registered
    /// for, or a method is registered twice.
    ///
    pub fn new(kind: RingKind, input: &[(Method, MethodFn)]) -> Self {
        let mut entries: [Option<MethodFn>; Method::COUNT] = [None; Method::COUNT];
        for (method, f) in generic::default_methods() {
            assert_eq!(method.signature(), f.signature(), "default for {} has the wrong signature", method.name());
            entries[method.index()] = Some(*f);
        }
        let mut registered = [false; Method::COUNT];
        for (method, f) in input {
            assert!(method.signature() == f.signature(), "function registered for {} on {:?} has signature {:?}, expected {:?}", method.name(), kind, f.signature(), method.signature());
            assert!(!registered[method.index()], "method {} registered twice for {:?}", method.name(), kind);
            registered[method.index()] = true;
            entries[method.index()] = Some(*f);
        }
        tracing::debug!(kind = ?kind, registered = input.len(), "initialized method table");
        MethodTable { kind, entries, poly_factor: None }
    }

    ///
    /// Advertises the algorithm used to factor polynomials whose coefficients
    /// are in rings of this kind.
    ///
    pub fn with_poly_factor(mut self, poly_factor: PolyFactorFn) -> Self {
        self.poly_factor = Some(poly_factor);
        self
    }

    pub fn kind(&self) -> RingKind {
        self.kind
    }

    pub fn supports(&self, method: Method) -> bool {
        self.entries[method.index()].is_some()
    }

    pub fn poly_factor(&self) -> Option<PolyFactorFn> {
        self.poly_factor
    }

    ///
    /// Returns the function registered for `method`.
    ///
    /// # Panics
    ///
    /// If the operation is not defined for this ring kind.
    ///
    pub fn get(&self, method: Method) -> &MethodFn {
        match &self.entries[method.index()] {
            Some(f) => f,
            None => panic!("operation {} is not defined for ring kind {:?}", method.name(), self.kind)
        }
    }
}

impl fmt::Debug for MethodTable {

    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodTable")
            .field("kind", &self.kind)
            .field("supported", &Method::ALL.iter().filter(|m| self.supports(**m)).map(|m| m.name()).collect::<Vec<_>>())
            .finish()
    }
}

#[test]
fn test_catalog_is_ordered() {
    for (i, method) in Method::ALL.iter().enumerate() {
        assert_eq!(i, method.index());
    }
    assert_eq!(Method::CtxWrite, Method::ALL[0]);
    assert_eq!(Method::Factor, Method::ALL[Method::COUNT - 1]);
}

#[test]
fn test_defaults_are_installed() {
    let table = MethodTable::new(RingKind::Vector, &[]);
    assert!(table.supports(Method::Swap));
    assert!(table.supports(Method::PowBigInt));
    assert!(table.supports(Method::SetStr));
    assert!(!table.supports(Method::Add));
    assert!(table.poly_factor().is_none());
}

#[test]
#[should_panic(expected = "expected")]
fn test_signature_mismatch_is_rejected() {
    fn wrong(_: &RingCtx) -> Truth { Truth::True }
    MethodTable::new(RingKind::Vector, &[(Method::Add, MethodFn::CtxPredicate(wrong))]);
}
