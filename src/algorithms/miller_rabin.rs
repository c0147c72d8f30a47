fn mul_mod(a: u64, b: u64, n: u64) -> u64 {
    ((a as u128 * b as u128) % n as u128) as u64
}

fn pow_mod(mut base: u64, mut e: u64, n: u64) -> u64 {
    let mut result = 1 % n;
    base %= n;
    while e > 0 {
        if e & 1 == 1 {
            result = mul_mod(result, base, n);
        }
        base = mul_mod(base, base, n);
        e >>= 1;
    }
    return result;
}

///
/// Miller-Rabin primality test for 64-bit integers.
///
/// The witnesses are the first twelve primes, which make the test deterministic
/// for every `n < 2^64`.
///
pub fn is_prime(n: u64) -> bool {
    const WITNESSES: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];
    if n < 2 {
        return false;
    }
    for p in WITNESSES {
        if n % p == 0 {
            return n == p;
        }
    }
    let s = (n - 1).trailing_zeros();
    let d = (n - 1) >> s;
    'witness: for a in WITNESSES {
        let mut x = pow_mod(a, d, n);
        if x == 1 || x == n - 1 {
            continue;
        }
        for _ in 1..s {
            x = mul_mod(x, x, n);
            if x == n - 1 {
                continue 'witness;
            }
        }
        return false;
    }
    return true;
}

#[test]
fn test_is_prime() {
    let small_primes = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47];
    for n in 0..50 {
        assert_eq!(small_primes.contains(&n), is_prime(n), "wrong result for {}", n);
    }
    assert!(is_prime(18446744073709551557));
    assert!(!is_prime(3215031751));
    assert!(!is_prime(341550071728321));
}
