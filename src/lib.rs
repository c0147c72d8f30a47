#![allow(non_snake_case)]

//!
//! Rings whose elements are opaque values, manipulated through a per-kind table of
//! operations. Every operation reports whether it succeeded, whether its result is
//! mathematically undefined, or whether it could not be computed, which makes it
//! possible to build generic algorithms (like arithmetic of polynomials) over rings
//! in which not everything is decidable.
//!

#[macro_use]
pub mod ring;
pub mod status;
pub mod method;
pub mod generic;
pub mod parse;
pub mod random;
pub mod serialization;
pub mod algorithms;
pub mod rings;
