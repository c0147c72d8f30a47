///
/// Contains [`sqr_mul::generic_abs_square_and_multiply()`], for computing a power of
/// an element in a generic monoid whose operations may fail.
///
pub mod sqr_mul;
///
/// Contains the Extended Euclidean Algorithm over machine integers.
///
pub mod eea;
///
/// Contains a deterministic Miller-Rabin primality test for 64-bit integers.
///
pub mod miller_rabin;
