//! Divisor-sum oracle.
//!
//! The successor function of an amicable chain maps `n` to the sum of its
//! proper divisors. Every other component is built on top of this one call.

/// Integer square root: the largest `r` with `r * r <= n`.
pub fn isqrt(n: u64) -> u64 {
    if n < 2 {
        return n;
    }
    // Float estimate, then correct by at most a step in either direction.
    let mut r = (n as f64).sqrt() as u64;
    while r.checked_mul(r).map_or(true, |sq| sq > n) {
        r -= 1;
    }
    while (r + 1).checked_mul(r + 1).map_or(false, |sq| sq <= n) {
        r += 1;
    }
    r
}

/// Sum of the positive divisors of `n` strictly less than `n`.
///
/// `0` and `1` have no proper divisors worth summing and map to `0`.
/// Runs in O(√n) by pairing each divisor `i <= √n` with `n / i`.
pub fn sum_of_proper_divisors(n: u64) -> u64 {
    if n < 2 {
        return 0;
    }

    let mut total = 1;
    let root = isqrt(n);
    for i in 2..=root {
        if n % i == 0 {
            let paired = n / i;
            total += i;
            if paired != i {
                total += paired;
            }
        }
    }
    total
}

/// True when `n` equals the sum of its own proper divisors.
pub fn is_perfect(n: u64) -> bool {
    n >= 2 && sum_of_proper_divisors(n) == n
}
