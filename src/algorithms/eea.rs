///
/// For integers `a, b` computes `s, t, d` such that `s*a + t*b == d` is a greatest
/// common divisor of `a` and `b`. The sign of `d` is unspecified.
///
/// ```
/// # use generic_ring::algorithms::eea::signed_eea;
/// let (s, t, d) = signed_eea(6, 8);
/// assert_eq!(2, d.abs());
/// assert_eq!(d, s * 6 + t * 8);
/// ```
///
pub fn signed_eea(a: i128, b: i128) -> (i128, i128, i128) {
    let (mut a, mut b) = (a, b);
    let (mut sa, mut ta) = (1, 0);
    let (mut sb, mut tb) = (0, 1);

    while b != 0 {
        let quo = a / b;
        let rem = a - quo * b;
        let tb_new = ta - quo * tb;
        let sb_new = sa - quo * sb;

        ta = tb;
        sa = sb;
        a = b;
        tb = tb_new;
        sb = sb_new;
        b = rem;
    }
    return (sa, ta, a);
}

///
/// Returns the inverse of `a` modulo `n`, if it exists.
///
pub fn inv_mod(a: u64, n: u64) -> Option<u64> {
    assert!(n > 0);
    let (s, _, d) = signed_eea((a % n) as i128, n as i128);
    if d.abs() != 1 {
        return None;
    }
    let result = (s * d).rem_euclid(n as i128);
    return Some(result as u64);
}

#[test]
fn test_signed_eea() {
    for (a, b) in [(6, 8), (-6, 8), (8, -6), (15, 0), (0, 15), (17, 5), (1, 1)] {
        let (s, t, d) = signed_eea(a, b);
        assert_eq!(d, s * a + t * b);
        assert_eq!(num_integer::Integer::gcd(&a, &b), d.abs());
    }
}

#[test]
fn test_inv_mod() {
    assert_eq!(Some(5), inv_mod(3, 7));
    assert_eq!(Some(1), inv_mod(1, 2));
    assert_eq!(None, inv_mod(4, 8));
    assert_eq!(None, inv_mod(0, 7));
    for a in 1..13 {
        let inv = inv_mod(a, 13).unwrap();
        assert_eq!(1, (a * inv) % 13);
    }
}
