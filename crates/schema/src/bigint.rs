// Copyright 2023-, Edge & Node, GraphOps, and Semiotic Labs.
// SPDX-License-Identifier: Apache-2.0

//! Arbitrary-precision integer scalar.
//!
//! The subgraph encodes `BigInt` values as JSON strings holding a decimal
//! literal. Values are occasionally returned as plain JSON integers, of any
//! size, so both are accepted. Floating point numbers are rejected: a float has
//! already lost precision by the time it reaches us.

use std::{
    fmt,
    ops::{Add, Sub},
    str::FromStr,
};

use bigdecimal::{num_bigint, ToPrimitive, Zero};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thegraph_core::alloy::primitives::U256;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BigIntError {
    #[error("Empty string is not a valid BigInt")]
    Empty,
    #[error("Invalid decimal BigInt `{0}`")]
    Invalid(String),
    #[error("BigInt `{0}` does not fit in an unsigned 256-bit word")]
    OutOfWordRange(String),
}

#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BigInt(num_bigint::BigInt);

impl BigInt {
    pub fn zero() -> Self {
        Self(num_bigint::BigInt::zero())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.sign() == num_bigint::Sign::Minus
    }

    pub fn as_inner(&self) -> &num_bigint::BigInt {
        &self.0
    }

    /// Narrowing conversion for values that are known to be small, such as
    /// list indices. Returns `None` instead of truncating.
    pub fn to_u64(&self) -> Option<u64> {
        self.0.to_u64()
    }

    /// Converts into an EVM word. Negative values and values above
    /// `2^256 - 1` are rejected.
    pub fn to_u256(&self) -> Result<U256, BigIntError> {
        if self.is_negative() {
            return Err(BigIntError::OutOfWordRange(self.to_string()));
        }
        U256::from_str(&self.0.to_string())
            .map_err(|_| BigIntError::OutOfWordRange(self.to_string()))
    }
}

impl FromStr for BigInt {
    type Err = BigIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(BigIntError::Empty);
        }
        // num-bigint tolerates a leading `+` and `_` separators, the subgraph never emits them
        let digits = s.strip_prefix('-').unwrap_or(s);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(BigIntError::Invalid(s.to_string()));
        }
        num_bigint::BigInt::from_str(s)
            .map(Self)
            .map_err(|_| BigIntError::Invalid(s.to_string()))
    }
}

impl fmt::Display for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for BigInt {
    fn from(value: u64) -> Self {
        Self(value.into())
    }
}

impl From<i64> for BigInt {
    fn from(value: i64) -> Self {
        Self(value.into())
    }
}

impl From<u32> for BigInt {
    fn from(value: u32) -> Self {
        Self(value.into())
    }
}

impl From<num_bigint::BigInt> for BigInt {
    fn from(value: num_bigint::BigInt) -> Self {
        Self(value)
    }
}

impl From<BigInt> for num_bigint::BigInt {
    fn from(value: BigInt) -> Self {
        value.0
    }
}

impl Add for &BigInt {
    type Output = BigInt;

    fn add(self, rhs: Self) -> BigInt {
        BigInt(&self.0 + &rhs.0)
    }
}

impl Sub for &BigInt {
    type Output = BigInt;

    fn sub(self, rhs: Self) -> BigInt {
        BigInt(&self.0 - &rhs.0)
    }
}

impl<'a> std::iter::Sum<&'a BigInt> for BigInt {
    fn sum<I: Iterator<Item = &'a BigInt>>(iter: I) -> Self {
        iter.fold(BigInt::zero(), |acc, value| &acc + value)
    }
}

impl Serialize for BigInt {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for BigInt {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // serde_json keeps the literal text of numbers with `arbitrary_precision`,
        // so integers beyond 64 bits arrive intact
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(s) => BigInt::from_str(&s).map_err(de::Error::custom),
            serde_json::Value::Number(n) => {
                let literal = n.to_string();
                BigInt::from_str(&literal).map_err(|_| {
                    de::Error::custom(format!(
                        "number `{literal}` cannot be decoded as BigInt without precision loss"
                    ))
                })
            }
            other => Err(de::Error::invalid_type(
                unexpected(&other),
                &"a decimal string or an integer",
            )),
        }
    }
}

fn unexpected(value: &serde_json::Value) -> de::Unexpected<'_> {
    match value {
        serde_json::Value::Null => de::Unexpected::Unit,
        serde_json::Value::Bool(b) => de::Unexpected::Bool(*b),
        serde_json::Value::Array(_) => de::Unexpected::Seq,
        serde_json::Value::Object(_) => de::Unexpected::Map,
        serde_json::Value::String(s) => de::Unexpected::Str(s),
        serde_json::Value::Number(_) => de::Unexpected::Other("number"),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_values_beyond_53_bits() {
        let wei = "115792089237316195423570985008687907853269984665640564039457584007913129639935";
        let value: BigInt = serde_json::from_value(json!(wei)).unwrap();
        assert_eq!(value.to_string(), wei);
        assert_eq!(value.to_u256().unwrap(), U256::MAX);
        assert_eq!(serde_json::to_value(&value).unwrap(), json!(wei));
    }

    #[test]
    fn decodes_integer_literals_beyond_64_bits() {
        let value: BigInt = serde_json::from_str("100000000000000000000000").unwrap();
        assert_eq!(value.to_string(), "100000000000000000000000");

        let counts: Vec<BigInt> =
            serde_json::from_str("[-170141183460469231731687303715884105729, 7]").unwrap();
        assert_eq!(counts[0].to_string(), "-170141183460469231731687303715884105729");
        assert_eq!(counts[1], BigInt::from(7u64));
    }

    #[test]
    fn decodes_integer_literals() {
        let value: BigInt = serde_json::from_value(json!(960)).unwrap();
        assert_eq!(value, BigInt::from(960u64));
        let value: BigInt = serde_json::from_value(json!(-4)).unwrap();
        assert!(value.is_negative());
    }

    #[rstest]
    #[case(json!(1.5))]
    #[case(serde_json::from_str::<serde_json::Value>("1e23").unwrap())]
    #[case(json!(""))]
    #[case(json!("0x10"))]
    #[case(json!("+1"))]
    #[case(json!("1_000"))]
    #[case(json!("-"))]
    #[case(json!(true))]
    #[case(json!(null))]
    fn rejects_non_integers(#[case] input: serde_json::Value) {
        serde_json::from_value::<BigInt>(input).unwrap_err();
    }

    #[test]
    fn word_conversion_rejects_out_of_range() {
        let too_big = BigInt::from_str(
            "115792089237316195423570985008687907853269984665640564039457584007913129639936",
        )
        .unwrap();
        assert!(matches!(
            too_big.to_u256(),
            Err(BigIntError::OutOfWordRange(_))
        ));
        assert!(BigInt::from(-1i64).to_u256().is_err());
    }

    #[test]
    fn arithmetic_and_sum() {
        let values = [BigInt::from(1u64), BigInt::from(2u64), BigInt::from(3u64)];
        let total: BigInt = values.iter().sum();
        assert_eq!(total, BigInt::from(6u64));
        assert_eq!(&total - &values[0], BigInt::from(5u64));
    }
}
