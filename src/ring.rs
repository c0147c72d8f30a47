use std::any::Any;
use std::fmt;

use num_bigint::BigInt;
use num_rational::BigRational;

use crate::method::*;
use crate::random::RandState;
use crate::status::*;

///
/// Tag identifying the kind of a ring, i.e. which family of implementations
/// its [`MethodTable`] belongs to.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum RingKind {
    Integer,
    Rational,
    Zn,
    FloatReal,
    /// Dense polynomials with arbitrary-precision integer coefficients
    IntegerPoly,
    /// Dense polynomials with arbitrary-precision rational coefficients
    RationalPoly,
    /// Polynomials over an arbitrary base ring
    Poly,
    /// Vectors over an arbitrary base ring, without ring structure
    Vector
}

///
/// An element of some ring.
///
/// Elements are opaque; their content can only be interpreted by the ring they
/// belong to, which is not stored in the element. Using an element with a different
/// ring than the one that created it is a programming error, and causes a panic as
/// soon as the representations do not match.
///
/// New elements are created by [`RingCtx::init()`], which always returns the zero
/// of the ring. An element owns its storage; dropping it releases the storage.
///
pub struct El {
    data: Box<dyn Any + Send + Sync>
}

impl El {

    pub fn new<T>(value: T) -> Self
        where T: Any + Send + Sync
    {
        El { data: Box::new(value) }
    }

    pub fn downcast_ref<T: Any>(&self) -> &T {
        match self.data.downcast_ref::<T>() {
            Some(value) => value,
            None => panic!("element is not of type {}, it was used with a ring it does not belong to", std::any::type_name::<T>())
        }
    }

    pub fn downcast_mut<T: Any>(&mut self) -> &mut T {
        match self.data.downcast_mut::<T>() {
            Some(value) => value,
            None => panic!("element is not of type {}, it was used with a ring it does not belong to", std::any::type_name::<T>())
        }
    }

    pub fn is<T: Any>(&self) -> bool {
        self.data.is::<T>()
    }
}

impl fmt::Debug for El {

    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "El(..)")
    }
}

///
/// Runtime descriptor of a concrete ring.
///
/// A context consists of the kind of the ring, the size of the storage of one
/// element, a reference to the operation table shared by all rings of this kind,
/// and configuration data specific to the kind (for example the base ring of a
/// polynomial ring).
///
/// All ring operations are called through the context, which looks up the
/// implementation in its [`MethodTable`] and invokes it.
///
/// # Example
/// ```
/// # use std::sync::Arc;
/// # use generic_ring::ring::*;
/// # use generic_ring::status::*;
/// # use generic_ring::rings::zn::zn;
/// # use generic_ring::rings::poly::poly_ring;
/// let base = Arc::new(zn(7));
/// let poly_ring = poly_ring(base);
/// let x = poly_ring.generator().unwrap();
/// let mut f = poly_ring.init();
/// assert_eq!(Status::Success, poly_ring.add_int(&mut f, &x, 1));
/// assert_eq!("1 + x", format!("{}", poly_ring.format(&f)));
/// ```
///
pub struct RingCtx {
    which_ring: RingKind,
    sizeof_elem: usize,
    methods: &'static MethodTable,
    data: Box<dyn Any + Send + Sync>
}

macro_rules! dispatch {
    ($(#[$doc:meta])* fn $name:ident ($($arg:ident: $ty:ty),*) -> $rtype:ty = $method:ident as $variant:ident) => {
        $(#[$doc])*
        pub fn $name(&self, $($arg: $ty),*) -> $rtype {
            match self.methods.get(Method::$method) {
                MethodFn::$variant(f) => f($($arg,)* self),
                _ => unreachable!("signatures are checked when building the method table")
            }
        }
    };
}

impl RingCtx {

    ///
    /// Creates a new context. This is called by the constructors of the individual
    /// ring kinds.
    ///
    /// # Panics
    ///
    /// If `methods` belongs to a different ring kind.
    ///
    pub fn new<D>(which_ring: RingKind, sizeof_elem: usize, methods: &'static MethodTable, data: D) -> Self
        where D: Any + Send + Sync
    {
        assert_eq!(which_ring, methods.kind());
        RingCtx { which_ring, sizeof_elem, methods, data: Box::new(data) }
    }

    pub fn which_ring(&self) -> RingKind {
        self.which_ring
    }

    pub fn sizeof_elem(&self) -> usize {
        self.sizeof_elem
    }

    pub fn methods(&self) -> &'static MethodTable {
        self.methods
    }

    pub fn supports(&self, method: Method) -> bool {
        self.methods.supports(method)
    }

    ///
    /// Returns the kind-specific configuration of this ring.
    ///
    /// # Panics
    ///
    /// If the configuration is not of type `D`.
    ///
    pub fn data<D: Any>(&self) -> &D {
        match self.data.downcast_ref::<D>() {
            Some(data) => data,
            None => panic!("ring {:?} does not have configuration of type {}", self.which_ring, std::any::type_name::<D>())
        }
    }

    pub fn data_mut<D: Any>(&mut self) -> &mut D {
        let which_ring = self.which_ring;
        match self.data.downcast_mut::<D>() {
            Some(data) => data,
            None => panic!("ring {:?} does not have configuration of type {}", which_ring, std::any::type_name::<D>())
        }
    }

    dispatch!{ fn ctx_write(out: &mut dyn fmt::Write) -> fmt::Result = CtxWrite as CtxWrite }
    dispatch!{ fn ctx_is_ring() -> Truth = CtxIsRing as CtxPredicate }
    dispatch!{ fn ctx_is_commutative_ring() -> Truth = CtxIsCommutativeRing as CtxPredicate }
    dispatch!{ fn ctx_is_integral_domain() -> Truth = CtxIsIntegralDomain as CtxPredicate }
    dispatch!{ fn ctx_is_unique_factorization_domain() -> Truth = CtxIsUniqueFactorizationDomain as CtxPredicate }
    dispatch!{ fn ctx_is_field() -> Truth = CtxIsField as CtxPredicate }
    dispatch!{ fn ctx_is_rational_vector_space() -> Truth = CtxIsRationalVectorSpace as CtxPredicate }
    dispatch!{ fn ctx_is_real_vector_space() -> Truth = CtxIsRealVectorSpace as CtxPredicate }
    dispatch!{ fn ctx_is_complex_vector_space() -> Truth = CtxIsComplexVectorSpace as CtxPredicate }
    dispatch!{ fn ctx_is_threadsafe() -> Truth = CtxIsThreadsafe as CtxPredicate }

    ///
    /// Sets the name of the generator of this ring, as used when printing elements.
    ///
    pub fn set_gen_name(&mut self, name: &str) -> Status {
        let methods = self.methods;
        match methods.get(Method::CtxSetGenName) {
            MethodFn::CtxSetGenName(f) => f(self, name),
            _ => unreachable!("signatures are checked when building the method table")
        }
    }

    pub fn set_gen_names(&mut self, names: &[&str]) -> Status {
        let methods = self.methods;
        match methods.get(Method::CtxSetGenNames) {
            MethodFn::CtxSetGenNames(f) => f(self, names),
            _ => unreachable!("signatures are checked when building the method table")
        }
    }

    dispatch!{
        /// Creates a new element, initialized to zero.
        fn init() -> El = Init as Init
    }
    dispatch!{ fn swap(x: &mut El, y: &mut El) -> () = Swap as Swap }
    dispatch!{
        /// Moves the storage of `x` into `res`.
        fn set_shallow(res: &mut El, x: El) -> () = SetShallow as SetShallow
    }
    dispatch!{ fn randtest(res: &mut El, state: &mut RandState) -> Status = Randtest as Randtest }
    dispatch!{ fn write(out: &mut dyn fmt::Write, x: &El) -> fmt::Result = Write as Write }

    dispatch!{ fn zero(res: &mut El) -> Status = Zero as Constant }
    dispatch!{ fn one(res: &mut El) -> Status = One as Constant }
    dispatch!{ fn neg_one(res: &mut El) -> Status = NegOne as Constant }
    dispatch!{ fn set_gen(res: &mut El) -> Status = Gen as Constant }
    dispatch!{ fn gens(res: &mut Vec<El>) -> Status = Gens as Gens }
    dispatch!{
        /// Generators of this ring and, recursively, of all rings it is built over.
        fn gens_recursive(res: &mut Vec<El>) -> Status = GensRecursive as Gens
    }
    dispatch!{ fn set_i(res: &mut El) -> Status = I as Constant }
    dispatch!{ fn set_pi(res: &mut El) -> Status = Pi as Constant }

    dispatch!{ fn is_zero(x: &El) -> Truth = IsZero as Predicate }
    dispatch!{ fn is_one(x: &El) -> Truth = IsOne as Predicate }
    dispatch!{ fn is_neg_one(x: &El) -> Truth = IsNegOne as Predicate }
    dispatch!{ fn equal(x: &El, y: &El) -> Truth = Equal as Equal }

    dispatch!{ fn set(res: &mut El, x: &El) -> Status = Set as Unary }
    dispatch!{ fn set_uint(res: &mut El, x: u64) -> Status = SetUint as SetUint }
    dispatch!{ fn set_int(res: &mut El, x: i64) -> Status = SetInt as SetInt }
    dispatch!{ fn set_bigint(res: &mut El, x: &BigInt) -> Status = SetBigInt as SetBigInt }
    dispatch!{ fn set_rational(res: &mut El, x: &BigRational) -> Status = SetRational as SetRational }
    dispatch!{
        /// Converts `x`, an element of `x_ring`, into an element of this ring.
        fn set_other(res: &mut El, x: &El, x_ring: &RingCtx) -> Status = SetOther as SetOther
    }
    dispatch!{
        /// Parses `input`, an expression in the format written by [`RingCtx::write()`].
        fn set_str(res: &mut El, input: &str) -> Status = SetStr as SetStr
    }

    dispatch!{ fn neg(res: &mut El, x: &El) -> Status = Neg as Unary }
    dispatch!{ fn add_uint(res: &mut El, x: &El, y: u64) -> Status = AddUint as OpUint }
    dispatch!{ fn add_int(res: &mut El, x: &El, y: i64) -> Status = AddInt as OpInt }
    dispatch!{ fn add_bigint(res: &mut El, x: &El, y: &BigInt) -> Status = AddBigInt as OpBigInt }
    dispatch!{ fn add_rational(res: &mut El, x: &El, y: &BigRational) -> Status = AddRational as OpRational }
    dispatch!{ fn add(res: &mut El, x: &El, y: &El) -> Status = Add as Binary }
    dispatch!{ fn sub_uint(res: &mut El, x: &El, y: u64) -> Status = SubUint as OpUint }
    dispatch!{ fn sub_int(res: &mut El, x: &El, y: i64) -> Status = SubInt as OpInt }
    dispatch!{ fn sub_bigint(res: &mut El, x: &El, y: &BigInt) -> Status = SubBigInt as OpBigInt }
    dispatch!{ fn sub_rational(res: &mut El, x: &El, y: &BigRational) -> Status = SubRational as OpRational }
    dispatch!{ fn sub(res: &mut El, x: &El, y: &El) -> Status = Sub as Binary }
    dispatch!{ fn mul(res: &mut El, x: &El, y: &El) -> Status = Mul as Binary }
    dispatch!{
        /// Computes `x * y` for `y` an element of `y_ring`.
        fn mul_other(res: &mut El, x: &El, y: &El, y_ring: &RingCtx) -> Status = MulOther as MulOther
    }
    dispatch!{
        /// Computes `x * y` for `x` an element of `x_ring`.
        fn other_mul(res: &mut El, x: &El, x_ring: &RingCtx, y: &El) -> Status = OtherMul as OtherMul
    }
    dispatch!{ fn mul_uint(res: &mut El, x: &El, y: u64) -> Status = MulUint as OpUint }
    dispatch!{ fn mul_int(res: &mut El, x: &El, y: i64) -> Status = MulInt as OpInt }
    dispatch!{ fn mul_bigint(res: &mut El, x: &El, y: &BigInt) -> Status = MulBigInt as OpBigInt }
    dispatch!{ fn mul_rational(res: &mut El, x: &El, y: &BigRational) -> Status = MulRational as OpRational }

    dispatch!{ fn pow_uint(res: &mut El, x: &El, e: u64) -> Status = PowUint as OpUint }
    dispatch!{ fn pow_int(res: &mut El, x: &El, e: i64) -> Status = PowInt as OpInt }
    dispatch!{ fn pow_bigint(res: &mut El, x: &El, e: &BigInt) -> Status = PowBigInt as OpBigInt }
    dispatch!{
        /// Computes the exact quotient `x / y`, failing if it does not exist.
        fn div(res: &mut El, x: &El, y: &El) -> Status = Div as Binary
    }
    dispatch!{
        /// Computes `x / y`, assuming that `y` divides `x`. The result is unspecified otherwise.
        fn divexact(res: &mut El, x: &El, y: &El) -> Status = Divexact as Binary
    }
    dispatch!{ fn inv(res: &mut El, x: &El) -> Status = Inv as Unary }

    dispatch!{ fn euclidean_div(res: &mut El, x: &El, y: &El) -> Status = EuclideanDiv as Binary }
    dispatch!{ fn euclidean_rem(res: &mut El, x: &El, y: &El) -> Status = EuclideanRem as Binary }
    dispatch!{ fn euclidean_divrem(quo: &mut El, rem: &mut El, x: &El, y: &El) -> Status = EuclideanDivrem as Divrem }

    dispatch!{
        /// Computes a unit `u` and `ux = u * x` such that `ux` is the canonical representative
        /// of the associate class of `x`.
        fn canonical_associate(ux: &mut El, u: &mut El, x: &El) -> Status = CanonicalAssociate as CanonicalAssociate
    }
    dispatch!{ fn gcd(res: &mut El, x: &El, y: &El) -> Status = Gcd as Binary }
    dispatch!{ fn factor(unit: &mut El, factors: &mut Vec<El>, exponents: &mut Vec<u64>, x: &El, flags: u32) -> Status = Factor as Factor }

    ///
    /// Computes `x += y`. The previous value of `x` is kept as operand while
    /// the result is computed into fresh storage.
    ///
    pub fn add_assign(&self, x: &mut El, y: &El) -> Status {
        let lhs = std::mem::replace(x, self.init());
        self.add(x, &lhs, y)
    }

    pub fn sub_assign(&self, x: &mut El, y: &El) -> Status {
        let lhs = std::mem::replace(x, self.init());
        self.sub(x, &lhs, y)
    }

    pub fn mul_assign(&self, x: &mut El, y: &El) -> Status {
        let lhs = std::mem::replace(x, self.init());
        self.mul(x, &lhs, y)
    }

    pub fn neg_assign(&self, x: &mut El) -> Status {
        let value = std::mem::replace(x, self.init());
        self.neg(x, &value)
    }

    ///
    /// Computes `x /= y`. On failure, `x` holds whatever the division left in its result.
    ///
    pub fn div_assign(&self, x: &mut El, y: &El) -> Status {
        let lhs = std::mem::replace(x, self.init());
        self.div(x, &lhs, y)
    }

    ///
    /// Computes `y = x / y`, the form in which the result overwrites the divisor.
    /// The divisor is snapshotted before the result is written.
    ///
    pub fn div_assign_rev(&self, x: &El, y: &mut El) -> Status {
        let divisor = std::mem::replace(y, self.init());
        self.div(y, x, &divisor)
    }

    pub fn clone_el(&self, x: &El) -> El {
        let mut result = self.init();
        let status = self.set(&mut result, x);
        assert!(status.is_success(), "copying an element within its own ring failed");
        return result;
    }

    pub fn from_int(&self, value: i64) -> Result<El, Failure> {
        let mut result = self.init();
        self.set_int(&mut result, value).into_result()?;
        return Ok(result);
    }

    pub fn from_bigint(&self, value: &BigInt) -> Result<El, Failure> {
        let mut result = self.init();
        self.set_bigint(&mut result, value).into_result()?;
        return Ok(result);
    }

    pub fn from_rational(&self, value: &BigRational) -> Result<El, Failure> {
        let mut result = self.init();
        self.set_rational(&mut result, value).into_result()?;
        return Ok(result);
    }

    pub fn from_other(&self, x: &El, x_ring: &RingCtx) -> Result<El, Failure> {
        let mut result = self.init();
        self.set_other(&mut result, x, x_ring).into_result()?;
        return Ok(result);
    }

    pub fn parse(&self, input: &str) -> Result<El, Failure> {
        let mut result = self.init();
        self.set_str(&mut result, input).into_result()?;
        return Ok(result);
    }

    pub fn one_el(&self) -> Result<El, Failure> {
        let mut result = self.init();
        self.one(&mut result).into_result()?;
        return Ok(result);
    }

    pub fn generator(&self) -> Result<El, Failure> {
        let mut result = self.init();
        self.set_gen(&mut result).into_result()?;
        return Ok(result);
    }

    pub fn format<'a>(&'a self, value: &'a El) -> ElDisplayWrapper<'a> {
        ElDisplayWrapper { ring: self, element: value }
    }

    pub fn println(&self, value: &El) {
        println!("{}", self.format(value));
    }
}

impl fmt::Display for RingCtx {

    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.ctx_write(f)
    }
}

impl fmt::Debug for RingCtx {

    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RingCtx({:?}: {})", self.which_ring, self)
    }
}

pub struct ElDisplayWrapper<'a> {
    ring: &'a RingCtx,
    element: &'a El
}

impl<'a> fmt::Display for ElDisplayWrapper<'a> {

    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.ring.write(f, self.element)
    }
}

///
/// Asserts that two elements of a ring are provably equal, printing both on failure.
///
#[macro_export]
macro_rules! assert_el_eq {
    ($ring:expr, $lhs:expr, $rhs:expr) => {
        match (&$ring, &$lhs, &$rhs) {
            (ring_val, lhs_val, rhs_val) => {
                assert!(
                    ring_val.equal(lhs_val, rhs_val) == $crate::status::Truth::True,
                    "Assertion failed: {} != {}",
                    ring_val.format(lhs_val),
                    ring_val.format(rhs_val)
                );
            }
        }
    };
}

#[cfg(any(test, feature = "generic_tests"))]
pub mod generic_tests {

    use super::*;

    fn apply<F>(ring: &RingCtx, f: F) -> El
        where F: FnOnce(&mut El) -> Status
    {
        let mut result = ring.init();
        assert_eq!(Status::Success, f(&mut result));
        return result;
    }

    ///
    /// Checks the ring axioms on all combinations of the given elements. Only
    /// call this with elements for which equality is decidable.
    ///
    pub fn test_ring_axioms<I: Iterator<Item = El>>(ring: &RingCtx, edge_case_elements: I) {
        let elements = edge_case_elements.collect::<Vec<_>>();
        let zero = ring.init();
        let one = apply(ring, |r| ring.one(r));

        // check self-subtraction
        for a in &elements {
            let diff = apply(ring, |r| ring.sub(r, a, a));
            assert_el_eq!(ring, zero, diff);
            assert!(ring.is_zero(&diff).is_true());
        }

        // check identity elements
        for a in &elements {
            assert_el_eq!(ring, a, apply(ring, |r| ring.add(r, a, &zero)));
            assert_el_eq!(ring, a, apply(ring, |r| ring.mul(r, a, &one)));
            assert_el_eq!(ring, zero, apply(ring, |r| ring.mul(r, a, &zero)));
        }

        // check commutativity
        for a in &elements {
            for b in &elements {
                assert_el_eq!(ring, apply(ring, |r| ring.add(r, a, b)), apply(ring, |r| ring.add(r, b, a)));
                if ring.ctx_is_commutative_ring().is_true() {
                    assert_el_eq!(ring, apply(ring, |r| ring.mul(r, a, b)), apply(ring, |r| ring.mul(r, b, a)));
                }
            }
        }

        // check associativity and distributivity
        for a in &elements {
            for b in &elements {
                for c in &elements {
                    let ab = apply(ring, |r| ring.add(r, a, b));
                    let bc = apply(ring, |r| ring.add(r, b, c));
                    assert_el_eq!(ring, apply(ring, |r| ring.add(r, &ab, c)), apply(ring, |r| ring.add(r, a, &bc)));

                    let ab_prod = apply(ring, |r| ring.mul(r, a, b));
                    let bc_prod = apply(ring, |r| ring.mul(r, b, c));
                    assert_el_eq!(ring, apply(ring, |r| ring.mul(r, &ab_prod, c)), apply(ring, |r| ring.mul(r, a, &bc_prod)));

                    let ac_prod = apply(ring, |r| ring.mul(r, a, c));
                    assert_el_eq!(ring, apply(ring, |r| ring.mul(r, a, &bc)), apply(ring, |r| ring.add(r, &ab_prod, &ac_prod)));
                }
            }
        }
    }

    ///
    /// Checks that every successful division satisfies `q * y == x`.
    ///
    pub fn test_division_law<I: Iterator<Item = El>>(ring: &RingCtx, edge_case_elements: I) {
        let elements = edge_case_elements.collect::<Vec<_>>();
        for x in &elements {
            for y in &elements {
                let mut q = ring.init();
                if ring.div(&mut q, x, y).is_success() {
                    assert_el_eq!(ring, x, apply(ring, |r| ring.mul(r, &q, y)));
                }
            }
        }
    }
}
