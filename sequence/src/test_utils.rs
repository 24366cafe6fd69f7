use proptest::prelude::any;
use proptest::prop_oneof;
use proptest::strategy::{Just, Strategy};

/// Largest index whose Fibonacci number still fits in a `u128`.
pub const MAX_U128_INDEX: u64 = 186;

#[allow(clippy::cast_sign_loss)]
pub fn u128_extra() -> impl Strategy<Value = u128> {
    prop_oneof![
        Just(0_u128),
        Just(1_u128),
        Just(u128::MAX),
        Just(u128::from(u64::MAX)),
        Just(u128::from(u64::MAX) + 1),
        any::<u128>(),
        any::<u64>().prop_map(u128::from),
        Just(i128::MAX as u128),
    ]
}

/// Offsets a client may seek to, biased towards the small end.
pub fn offset() -> impl Strategy<Value = u64> {
    prop_oneof![Just(0_u64), Just(1_u64), Just(2_u64), 0_u64..=300]
}

/// Reference Fibonacci numbers computed in native integers.
///
/// # Panics
///
/// Panics if `k` exceeds [`MAX_U128_INDEX`].
#[must_use]
pub fn fib_u128(k: u64) -> u128 {
    assert!(k <= MAX_U128_INDEX, "fib({k}) does not fit in a u128");
    if k == 0 {
        return 0;
    }
    // Stop one step early so fib(k + 1) is never formed.
    let (mut a, mut b) = (0_u128, 1_u128);
    for _ in 1..k {
        (a, b) = (b, a + b);
    }
    b
}
