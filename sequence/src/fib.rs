use core::fmt;
use core::ops::Index;
use core::str::FromStr;

use log::trace;
use num::{BigUint, One, Zero};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SequenceError {
    #[error("offset {offset} is past the last computed offset {max}")]
    OffsetOutOfRange { offset: u64, max: u64 },
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown engine `{0}`, expected `iterative` or `fast-doubling`")]
pub struct ParseEngineError(String);

/// Strategy used to compute Fibonacci numbers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Engine {
    /// Additive recurrence seeded with `[0, 1]`.
    #[default]
    Iterative,
    /// Computes every index on its own via the doubling identities
    /// `F(2n) = F(n) * (2F(n+1) - F(n))` and `F(2n+1) = F(n)^2 + F(n+1)^2`.
    FastDoubling,
}

impl Engine {
    /// The `k`th Fibonacci number.
    #[must_use]
    pub fn nth(self, k: u64) -> BigUint {
        match self {
            Engine::Iterative => iterative(k),
            Engine::FastDoubling => fast_doubling(k),
        }
    }

    /// Fibonacci numbers for offsets `0..=max_offset`.
    #[must_use]
    pub fn sequence(self, max_offset: u64) -> Sequence {
        let sequence = match self {
            Engine::Iterative => {
                let mut values = vec![BigUint::zero()];
                if max_offset > 0 {
                    values.push(BigUint::one());
                }
                while (values.len() as u64) <= max_offset {
                    let n = values.len();
                    let next = &values[n - 1] + &values[n - 2];
                    values.push(next);
                }
                Sequence(values)
            }
            Engine::FastDoubling => Sequence((0..=max_offset).map(fast_doubling).collect()),
        };
        trace!("{self} engine computed {} values", sequence.len());
        sequence
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Engine::Iterative => "iterative",
            Engine::FastDoubling => "fast-doubling",
        })
    }
}

impl FromStr for Engine {
    type Err = ParseEngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "iterative" => Ok(Engine::Iterative),
            "fast-doubling" => Ok(Engine::FastDoubling),
            other => Err(ParseEngineError(other.to_owned())),
        }
    }
}

fn iterative(k: u64) -> BigUint {
    let (mut cur, mut next) = (BigUint::zero(), BigUint::one());
    for _ in 0..k {
        let sum = &cur + &next;
        cur = next;
        next = sum;
    }
    cur
}

fn fast_doubling(k: u64) -> BigUint {
    // Invariant: `cur == F(m)` and `next == F(m + 1)` where `m` is the prefix
    // of `k` consumed so far, most significant bit first.
    let (mut cur, mut next) = (BigUint::zero(), BigUint::one());
    for bit in (0..u64::BITS - k.leading_zeros()).rev() {
        let double = &cur * &(&(&next << 1_u32) - &cur);
        let double_next = &(&cur * &cur) + &(&next * &next);
        if (k >> bit) & 1 == 1 {
            next = &double + &double_next;
            cur = double_next;
        } else {
            cur = double;
            next = double_next;
        }
    }
    cur
}

/// Fibonacci numbers for offsets `0..=max_offset`. Immutable once computed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sequence(Vec<BigUint>);

impl Sequence {
    #[must_use]
    pub fn len(&self) -> usize { self.0.len() }

    /// Always `false`: offset `0` is always present.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// Last offset the sequence covers.
    #[must_use]
    pub fn max_offset(&self) -> u64 { self.0.len().saturating_sub(1) as u64 }

    #[must_use]
    pub fn get(&self, offset: u64) -> Option<&BigUint> {
        usize::try_from(offset).ok().and_then(|i| self.0.get(i))
    }

    /// Like [`Sequence::get`], reporting the valid range on failure.
    ///
    /// # Errors
    ///
    /// Errors if `offset` is past [`Sequence::max_offset`].
    pub fn try_get(&self, offset: u64) -> Result<&BigUint, SequenceError> {
        self.get(offset).ok_or(SequenceError::OffsetOutOfRange {
            offset,
            max: self.max_offset(),
        })
    }

    /// `(offset, value)` pairs in ascending offset order.
    pub fn entries(&self) -> impl DoubleEndedIterator<Item = (u64, &BigUint)> + ExactSizeIterator {
        self.0.iter().enumerate().map(|(i, v)| (i as u64, v))
    }
}

impl Index<usize> for Sequence {
    type Output = BigUint;

    fn index(&self, index: usize) -> &BigUint { &self.0[index] }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use test_case::test_case;

    use num::{BigUint, Zero};

    use super::{Engine, ParseEngineError, SequenceError};
    use crate::test_utils::{fib_u128, offset, MAX_U128_INDEX};

    #[test_case(Engine::Iterative; "iterative")]
    #[test_case(Engine::FastDoubling; "fast doubling")]
    fn first_hundred_match_reference(engine: Engine) {
        let sequence = engine.sequence(100);
        assert_eq!(sequence.len(), 101);
        assert_eq!(sequence.max_offset(), 100);
        for (offset, value) in sequence.entries() {
            assert_eq!(*value, BigUint::from(fib_u128(offset)), "offset {offset}");
        }
    }

    #[test_case(Engine::Iterative; "iterative")]
    #[test_case(Engine::FastDoubling; "fast doubling")]
    fn known_values(engine: Engine) {
        let sequence = engine.sequence(100);
        let expected: [u64; 11] = [0, 1, 1, 2, 3, 5, 8, 13, 21, 34, 55];
        for (i, &value) in expected.iter().enumerate() {
            assert_eq!(sequence[i], BigUint::from(value));
        }
        assert_eq!(
            sequence[100],
            BigUint::from(354_224_848_179_261_915_075_u128)
        );
    }

    #[test_case(Engine::Iterative; "iterative")]
    #[test_case(Engine::FastDoubling; "fast doubling")]
    fn single_entry_sequence(engine: Engine) {
        let sequence = engine.sequence(0);
        assert_eq!(sequence.len(), 1);
        assert!(!sequence.is_empty());
        assert_eq!(sequence[0], BigUint::zero());
    }

    #[test]
    fn recurrence_holds_past_u128() {
        let sequence = Engine::Iterative.sequence(500);
        for i in 2..sequence.len() {
            assert_eq!(sequence[i], &sequence[i - 1] + &sequence[i - 2]);
        }
        assert_eq!(
            format!("{:X}", sequence[200]),
            "338864A5C1CAEB07D0EF067CB83DF17E395"
        );
    }

    #[test]
    fn engines_agree_on_long_sequences() {
        assert_eq!(
            Engine::Iterative.sequence(1000),
            Engine::FastDoubling.sequence(1000)
        );
    }

    #[test]
    fn try_get_reports_range() {
        let sequence = Engine::Iterative.sequence(10);
        assert_eq!(sequence.try_get(10), Ok(&BigUint::from(55_u64)));
        assert_eq!(
            sequence.try_get(11),
            Err(SequenceError::OffsetOutOfRange {
                offset: 11,
                max: 10
            })
        );
    }

    #[test]
    fn engine_names_round_trip() {
        for engine in [Engine::Iterative, Engine::FastDoubling] {
            assert_eq!(engine.to_string().parse::<Engine>(), Ok(engine));
        }
        assert_eq!(
            "recursive".parse::<Engine>(),
            Err(ParseEngineError("recursive".to_owned()))
        );
    }

    proptest! {
        #[test]
        fn nth_matches_reference(k in 0..=MAX_U128_INDEX) {
            let expected = BigUint::from(fib_u128(k));
            prop_assert_eq!(Engine::Iterative.nth(k), expected.clone());
            prop_assert_eq!(Engine::FastDoubling.nth(k), expected);
        }

        #[test]
        fn nth_matches_sequence(k in offset()) {
            let sequence = Engine::Iterative.sequence(k);
            prop_assert_eq!(sequence.get(k), Some(&Engine::FastDoubling.nth(k)));
            prop_assert_eq!(sequence.get(k + 1), None);
        }
    }
}
