///
/// This module contains [`integer::integer_ring()`], the ring of arbitrary precision integers.
///
pub mod integer;

///
/// This module contains [`rational::rational_field()`], the field of arbitrary precision
/// rational numbers.
///
pub mod rational;

///
/// This module contains [`zn::zn()`], the ring `Z/nZ` for a 64-bit modulus `n`.
///
pub mod zn;

///
/// An approximate implementation of the real numbers, using 64-bit floating point numbers.
///
pub mod float_real;

///
/// This module contains [`vector::vector_ring()`], vectors over a base ring.
///
pub mod vector;

///
/// Dense polynomials with fixed integer or rational coefficients.
///
pub mod fixed_poly;

///
/// This module contains [`poly::poly_ring()`], the ring of univariate polynomials over
/// an arbitrary base ring.
///
pub mod poly;
