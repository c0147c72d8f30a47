use num_bigint::BigUint;
use num_traits::{One, Zero};

///
/// Computes `base^power` in a generic monoid, given by a squaring function and a
/// function that multiplies a value by `base`. Every step may fail, in which case
/// the failure is returned immediately.
///
/// # Example
/// ```
/// # use num_bigint::BigUint;
/// # use generic_ring::algorithms::sqr_mul::generic_abs_square_and_multiply;
/// let result: Result<i64, ()> = generic_abs_square_and_multiply(&3, &BigUint::from(5u32), |a| Ok(a * a), |a, b| Ok(*a * b), 1);
/// assert_eq!(Ok(243), result);
/// ```
///
pub fn generic_abs_square_and_multiply<T, U, F, H, E>(base: &U, power: &BigUint, mut square: F, mut multiply_base: H, identity: T) -> Result<T, E>
    where F: FnMut(T) -> Result<T, E>,
        H: FnMut(&U, T) -> Result<T, E>
{
    if power.is_zero() {
        return Ok(identity);
    } else if power.is_one() {
        return multiply_base(base, identity);
    }

    let mut result = multiply_base(base, identity)?;
    for i in (0..(power.bits() - 1)).rev() {
        if power.bit(i) {
            result = multiply_base(base, square(result)?)?;
        } else {
            result = square(result)?;
        }
    }
    return Ok(result);
}

#[test]
fn test_pow() {
    let pow = |b: i64, e: u32| generic_abs_square_and_multiply::<_, _, _, _, ()>(&b, &BigUint::from(e), |a| Ok(a * a), |a, b| Ok(*a * b), 1).unwrap();
    assert_eq!(1, pow(3, 0));
    assert_eq!(3, pow(3, 1));
    assert_eq!(3 * 3, pow(3, 2));
    assert_eq!(3 * 3 * 3 * 3 * 3, pow(3, 5));
    assert_eq!(1 << 40, pow(2, 40));
}

#[test]
fn test_pow_failure_stops() {
    let mut squarings = 0;
    let result: Result<i64, &str> = generic_abs_square_and_multiply(&2, &BigUint::from(8u32), |a| {
        squarings += 1;
        if a > 4 { Err("overflow") } else { Ok(a * a) }
    }, |a, b| Ok(*a * b), 1);
    assert_eq!(Err("overflow"), result);
    assert_eq!(3, squarings);
}
