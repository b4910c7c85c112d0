//! Generators for primitive values, strings and text-shaped identifiers.

use std::fmt;

use base64::Engine;
use num_traits::PrimInt;
use rand::Rng;
use uuid::Uuid;

use crate::error::{AnyError, Result};
use crate::generator::Any;

/// Largest digit count accepted by the integer generator
pub const MAX_INT_DIGITS: u32 = 10;

/// Largest number of fractional digits of the float family
pub const MAX_FRACTION_DIGITS: u32 = 15;

/// Default length of generated strings
pub const DEFAULT_STRING_LENGTH: usize = 15;

const ALPHANUMERIC: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ1234567890";

/// Character set used for chars and strings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CharSet {
    /// The 62 ASCII letters and digits
    #[default]
    Alphanumeric,
    /// Printable ASCII, codes 33 to 126
    Ascii,
    /// Any UTF-16 code unit that survives an encode/decode round trip
    Utf16,
}

/// Constraints for integer generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntSpec {
    /// Maximum number of decimal digits, 1 to 10
    pub max_digits: u32,
    /// Whether zero may be produced
    pub allow_zero: bool,
    /// Restrict results to non-negative values
    pub only_positive: bool,
    /// Inclusive lower bound; takes priority over the digit count
    pub min: Option<i32>,
    /// Exclusive upper bound; takes priority over the digit count
    pub max: Option<i32>,
}

impl Default for IntSpec {
    fn default() -> Self {
        Self {
            max_digits: 5,
            allow_zero: true,
            only_positive: true,
            min: None,
            max: None,
        }
    }
}

impl IntSpec {
    /// Integers of at most `max_digits` digits
    pub fn digits(max_digits: u32) -> Self {
        Self {
            max_digits,
            ..Self::default()
        }
    }

    /// Integers in `[min, max)`
    pub fn range(min: i32, max: i32) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            ..Self::default()
        }
    }

    pub fn allow_zero(mut self, allow: bool) -> Self {
        self.allow_zero = allow;
        self
    }

    pub fn only_positive(mut self, only: bool) -> Self {
        self.only_positive = only;
        self
    }

    pub fn min(mut self, min: i32) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: i32) -> Self {
        self.max = Some(max);
        self
    }
}

/// Shape of doubles, floats and decimals: integer digits plus rounded fraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloatSpec {
    pub integer_digits: u32,
    pub fraction_digits: u32,
}

impl Default for FloatSpec {
    fn default() -> Self {
        Self {
            integer_digits: 4,
            fraction_digits: 2,
        }
    }
}

impl FloatSpec {
    pub fn new(integer_digits: u32, fraction_digits: u32) -> Self {
        Self {
            integer_digits,
            fraction_digits,
        }
    }
}

/// Constraints for string generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringSpec {
    /// Text the result starts with
    pub prefix: String,
    /// Exact length of the result in characters, prefix included
    pub length: usize,
    /// Character set of the random part
    pub charset: CharSet,
}

impl Default for StringSpec {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            length: DEFAULT_STRING_LENGTH,
            charset: CharSet::Alphanumeric,
        }
    }
}

impl StringSpec {
    /// Strings starting with `prefix`
    pub fn prefixed(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Self::default()
        }
    }

    pub fn length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }

    pub fn charset(mut self, charset: CharSet) -> Self {
        self.charset = charset;
        self
    }
}

/// An email address shaped `local@domain`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress {
    local: String,
    domain: String,
}

impl EmailAddress {
    pub fn new(local: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            local: local.into(),
            domain: domain.into(),
        }
    }

    pub fn local(&self) -> &str {
        &self.local
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.local, self.domain)
    }
}

/// An absolute URI shaped `scheme://host/`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Uri {
    scheme: String,
    host: String,
}

impl Uri {
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}/", self.scheme, self.host)
    }
}

/// `10^digits`, or `None` when it does not fit in `T`
pub(crate) fn pow10<T: PrimInt>(digits: u32) -> Option<T> {
    <T as num_traits::NumCast>::from(10u8).and_then(|ten| num_traits::checked_pow(ten, digits as usize))
}

/// Exclusive ceiling of a `digits` long number, clamped to the type maximum
pub(crate) fn decimal_ceiling<T: PrimInt>(digits: u32) -> T {
    pow10::<T>(digits)
        .map(|power| power - T::one())
        .unwrap_or_else(T::max_value)
}

macro_rules! skip_zero {
    ($($name:ident: $t:ty),*) => {
        $(
            /// Map a draw from `[MIN, MAX)` onto the full range without zero
            fn $name(drawn: $t) -> $t {
                if drawn >= 0 { drawn + 1 } else { drawn }
            }
        )*
    };
}

skip_zero!(skip_zero_i8: i8, skip_zero_i16: i16, skip_zero_i64: i64);

impl Any {
    /// Random integer of at most 5 digits, zero included
    pub fn int(&mut self) -> i32 {
        let allow_zero = !self.config().exclude_defaults;
        let low = if allow_zero { 0 } else { 1 };
        self.source().next(low, decimal_ceiling::<i32>(5) as i64) as i32
    }

    /// Random integer under explicit constraints
    pub fn int_with(&mut self, spec: &IntSpec) -> Result<i32> {
        let (low, high, allow_zero) = self.int_domain(spec)?;
        if allow_zero || !(low..high).contains(&0) {
            return Ok(self.source().next(low, high) as i32);
        }
        if high - low == 1 {
            return Err(AnyError::invalid_argument(
                "allow_zero",
                "the range only contains zero",
            ));
        }
        let drawn = self.source().next(low, high - 1);
        Ok((if drawn >= 0 { drawn + 1 } else { drawn }) as i32)
    }

    /// Range `[low, high)` that `int_with` draws from, and whether zero is allowed in it
    pub(crate) fn int_domain(&self, spec: &IntSpec) -> Result<(i64, i64, bool)> {
        if !(1..=MAX_INT_DIGITS).contains(&spec.max_digits) {
            return Err(AnyError::invalid_argument(
                "max_digits",
                format!(
                    "{} is outside the supported 1..={} digits",
                    spec.max_digits, MAX_INT_DIGITS
                ),
            ));
        }

        let allow_zero = spec.allow_zero && !self.config().exclude_defaults;
        let floor = if allow_zero { 0 } else { 1 };

        if spec.min.is_some() || spec.max.is_some() {
            let low = spec.min.map_or(
                if spec.only_positive {
                    floor
                } else {
                    i64::from(i32::MIN)
                },
                i64::from,
            );
            let high = spec.max.map_or(i64::from(i32::MAX), i64::from);
            if low >= high {
                return Err(AnyError::invalid_argument(
                    "min",
                    format!("minimum {} must be lower than maximum {}", low, high),
                ));
            }
            return Ok((low, high, allow_zero));
        }

        let ceiling = decimal_ceiling::<i32>(spec.max_digits) as i64;
        if spec.only_positive {
            Ok((floor, ceiling, allow_zero))
        } else {
            Ok((1 - ceiling, ceiling, allow_zero))
        }
    }

    /// Random non-negative long
    pub fn long(&mut self) -> i64 {
        self.long_with(true)
    }

    /// Random long, optionally signed
    pub fn long_with(&mut self, only_positive: bool) -> i64 {
        let exclude = self.config().exclude_defaults;
        let source = self.source();
        match (only_positive, exclude) {
            (true, false) => source.gen_range(0..=i64::MAX),
            (true, true) => source.gen_range(1..=i64::MAX),
            (false, false) => source.r#gen(),
            (false, true) => skip_zero_i64(source.gen_range(i64::MIN..i64::MAX)),
        }
    }

    /// Random unsigned short
    pub fn ushort(&mut self) -> u16 {
        let low = if self.config().exclude_defaults { 1 } else { 0 };
        self.source().gen_range(low..=u16::MAX)
    }

    /// Random unsigned int
    pub fn uint(&mut self) -> u32 {
        let low = if self.config().exclude_defaults { 1 } else { 0 };
        self.source().gen_range(low..=u32::MAX)
    }

    /// Random unsigned long
    pub fn ulong(&mut self) -> u64 {
        let low = if self.config().exclude_defaults { 1 } else { 0 };
        self.source().gen_range(low..=u64::MAX)
    }

    /// Random short over the whole range
    pub fn short(&mut self) -> i16 {
        if self.config().exclude_defaults {
            skip_zero_i16(self.source().gen_range(i16::MIN..i16::MAX))
        } else {
            self.source().r#gen()
        }
    }

    /// Random unsigned byte
    pub fn byte(&mut self) -> u8 {
        let low = if self.config().exclude_defaults { 1 } else { 0 };
        self.source().gen_range(low..=u8::MAX)
    }

    /// Random signed byte
    pub fn sbyte(&mut self) -> i8 {
        if self.config().exclude_defaults {
            skip_zero_i8(self.source().gen_range(i8::MIN..i8::MAX))
        } else {
            self.source().r#gen()
        }
    }

    /// Random boolean; always `true` when defaults are excluded
    pub fn bool(&mut self) -> bool {
        if self.config().exclude_defaults {
            return true;
        }
        self.source().r#gen()
    }

    fn float_parts(&mut self, spec: &FloatSpec) -> Result<(i32, f64)> {
        if spec.fraction_digits > MAX_FRACTION_DIGITS {
            return Err(AnyError::invalid_argument(
                "fraction_digits",
                format!(
                    "{} exceeds the supported {} fractional digits",
                    spec.fraction_digits, MAX_FRACTION_DIGITS
                ),
            ));
        }
        let integer = self.int_with(&IntSpec::digits(spec.integer_digits))?;
        let scale = 10f64.powi(spec.fraction_digits as i32);
        let fraction = (self.source().next_double() * scale).round() / scale;
        Ok((integer, fraction))
    }

    /// Random double, 4 integer digits and 2 decimals
    pub fn double(&mut self) -> f64 {
        let (integer, fraction) = self.unchecked_float_parts();
        integer as f64 + fraction
    }

    pub fn double_with(&mut self, spec: &FloatSpec) -> Result<f64> {
        let (integer, fraction) = self.float_parts(spec)?;
        Ok(integer as f64 + fraction)
    }

    /// Random float, 4 integer digits and 2 decimals
    pub fn float(&mut self) -> f32 {
        let (integer, fraction) = self.unchecked_float_parts();
        integer as f32 + fraction as f32
    }

    pub fn float_with(&mut self, spec: &FloatSpec) -> Result<f32> {
        let (integer, fraction) = self.float_parts(spec)?;
        Ok(integer as f32 + fraction as f32)
    }

    /// Random decimal, 4 integer digits and 2 decimals
    pub fn decimal(&mut self) -> rust_decimal::Decimal {
        let spec = FloatSpec::default();
        let integer = self.int_with_digits(spec.integer_digits);
        self.compose_decimal(integer, spec.fraction_digits)
    }

    pub fn decimal_with(&mut self, spec: &FloatSpec) -> Result<rust_decimal::Decimal> {
        if spec.fraction_digits > MAX_FRACTION_DIGITS {
            return Err(AnyError::invalid_argument(
                "fraction_digits",
                format!(
                    "{} exceeds the supported {} fractional digits",
                    spec.fraction_digits, MAX_FRACTION_DIGITS
                ),
            ));
        }
        let integer = self.int_with(&IntSpec::digits(spec.integer_digits))?;
        Ok(self.compose_decimal(integer, spec.fraction_digits))
    }

    fn compose_decimal(&mut self, integer: i32, fraction_digits: u32) -> rust_decimal::Decimal {
        let scale = pow10::<i64>(fraction_digits).unwrap_or(1);
        let units = self.source().gen_range(0..scale);
        rust_decimal::Decimal::from(integer) + rust_decimal::Decimal::new(units, fraction_digits)
    }

    /// Positive integer draw with a digit count already known to be valid
    fn int_with_digits(&mut self, digits: u32) -> i32 {
        let low = if self.config().exclude_defaults { 1 } else { 0 };
        let ceiling = decimal_ceiling::<i32>(digits.clamp(1, MAX_INT_DIGITS)) as i64;
        self.source().next(low, ceiling) as i32
    }

    fn unchecked_float_parts(&mut self) -> (i32, f64) {
        let spec = FloatSpec::default();
        let integer = self.int_with_digits(spec.integer_digits);
        let scale = 10f64.powi(spec.fraction_digits as i32);
        let fraction = (self.source().next_double() * scale).round() / scale;
        (integer, fraction)
    }

    /// Random alphanumeric character
    pub fn char(&mut self) -> char {
        self.char_in(CharSet::Alphanumeric)
    }

    /// Random character from `charset`
    pub fn char_in(&mut self, charset: CharSet) -> char {
        match charset {
            CharSet::Alphanumeric => {
                let index = self.source().gen_range(0..ALPHANUMERIC.len());
                ALPHANUMERIC[index] as char
            }
            CharSet::Ascii => self.source().gen_range(33u8..=126) as char,
            CharSet::Utf16 => {
                let exclude = self.config().exclude_defaults;
                loop {
                    let unit: u16 = self.source().r#gen();
                    if exclude && unit == 0 {
                        continue;
                    }
                    // lone surrogates do not survive decoding
                    if let Some(Ok(decoded)) = char::decode_utf16([unit]).next() {
                        break decoded;
                    }
                }
            }
        }
    }

    fn random_chars(&mut self, count: usize, charset: CharSet) -> String {
        (0..count).map(|_| self.char_in(charset)).collect()
    }

    /// Random 15 character alphanumeric string
    pub fn string(&mut self) -> String {
        self.random_chars(DEFAULT_STRING_LENGTH, CharSet::Alphanumeric)
    }

    /// Random string of an exact length starting with a prefix
    pub fn string_with(&mut self, spec: &StringSpec) -> Result<String> {
        if spec.length < 1 {
            return Err(AnyError::invalid_argument(
                "length",
                "must be greater than zero",
            ));
        }
        let prefix_len = spec.prefix.chars().count();
        if spec.length < prefix_len {
            return Err(AnyError::invalid_argument(
                "length",
                format!(
                    "{} is shorter than the {} characters of prefix {:?}",
                    spec.length, prefix_len, spec.prefix
                ),
            ));
        }

        let mut result = String::with_capacity(spec.length);
        result.push_str(&spec.prefix);
        for _ in prefix_len..spec.length {
            result.push(self.char_in(spec.charset));
        }
        Ok(result)
    }

    /// Base64 encoding of a generated string
    pub fn base64_string(&mut self, spec: &StringSpec) -> Result<String> {
        let plain = self.string_with(spec)?;
        Ok(base64::engine::general_purpose::STANDARD.encode(plain.as_bytes()))
    }

    fn lowercase_token(&mut self, len: usize) -> String {
        self.random_chars(len, CharSet::Alphanumeric)
            .to_ascii_lowercase()
    }

    /// Random email address as text, shaped `local@domain.any`
    pub fn email(&mut self) -> String {
        self.email_address().to_string()
    }

    /// Random email address
    pub fn email_address(&mut self) -> EmailAddress {
        let local = self.lowercase_token(10);
        let domain = format!("{}.any", self.lowercase_token(8));
        EmailAddress::new(local, domain)
    }

    /// Random `http://host.any/` URI
    pub fn uri(&mut self) -> Uri {
        Uri {
            scheme: "http".to_string(),
            host: format!("{}.any", self.lowercase_token(12)),
        }
    }

    /// Random URI with the given scheme
    pub fn uri_with(&mut self, scheme: &str) -> Result<Uri> {
        let mut chars = scheme.chars();
        let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
            && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
        if !valid {
            return Err(AnyError::invalid_argument(
                "scheme",
                format!("{:?} is not a valid URI scheme", scheme),
            ));
        }
        let mut uri = self.uri();
        uri.scheme = scheme.to_ascii_lowercase();
        Ok(uri)
    }

    /// Random URL as text
    pub fn url(&mut self) -> String {
        self.uri().to_string()
    }

    /// Random version 4 UUID
    pub fn guid(&mut self) -> Uuid {
        let bytes: [u8; 16] = self.source().r#gen();
        uuid::Builder::from_random_bytes(bytes).into_uuid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnyConfig;

    fn digits_of(value: i32) -> usize {
        value.unsigned_abs().to_string().len()
    }

    #[test]
    fn test_decimal_ceiling() {
        assert_eq!(decimal_ceiling::<i32>(1), 9);
        assert_eq!(decimal_ceiling::<i32>(3), 999);
        assert_eq!(decimal_ceiling::<i32>(9), 999_999_999);
        assert_eq!(decimal_ceiling::<i32>(10), i32::MAX);
        assert_eq!(pow10::<i64>(2), Some(100));
    }

    #[test]
    fn test_int_digit_bounds() {
        let mut any = Any::seeded(1);
        for digits in 1..=10 {
            for _ in 0..2_000 {
                let value = any.int_with(&IntSpec::digits(digits)).unwrap();
                assert!(value >= 0);
                assert!(digits_of(value) <= digits as usize);
            }
        }
    }

    #[test]
    fn test_int_rejects_bad_digit_counts() {
        let mut any = Any::seeded(2);
        assert!(matches!(
            any.int_with(&IntSpec::digits(0)),
            Err(AnyError::InvalidArgument { .. })
        ));
        assert!(matches!(
            any.int_with(&IntSpec::digits(11)),
            Err(AnyError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_signed_three_digits() {
        let mut any = Any::seeded(3);
        let spec = IntSpec::digits(3).only_positive(false);
        let mut saw_negative = false;
        for _ in 0..100_000 {
            let value = any.int_with(&spec).unwrap();
            saw_negative |= value < 0;
            assert!(digits_of(value) <= 3);
        }
        assert!(saw_negative);
    }

    #[test]
    fn test_int_range_is_half_open() {
        let mut any = Any::seeded(4);
        let spec = IntSpec::range(-20, 20);
        for _ in 0..100_000 {
            let value = any.int_with(&spec).unwrap();
            assert!((-20..20).contains(&value));
        }
        assert!(any.int_with(&IntSpec::range(5, 5)).is_err());
    }

    #[test]
    fn test_int_without_zero() {
        let mut any = Any::seeded(5);
        let spec = IntSpec::range(-1, 2).allow_zero(false);
        for _ in 0..1_000 {
            let value = any.int_with(&spec).unwrap();
            assert!(value == -1 || value == 1);
        }
        assert!(any.int_with(&IntSpec::range(0, 1).allow_zero(false)).is_err());
    }

    #[test]
    fn test_exclude_defaults_numbers() {
        let mut any = Any::seeded(6)
            .with_config(AnyConfig::default().exclude_defaults(true))
            .unwrap();
        for _ in 0..5_000 {
            assert_ne!(any.int_with(&IntSpec::digits(1)).unwrap(), 0);
            assert_ne!(any.byte(), 0);
            assert_ne!(any.sbyte(), 0);
            assert_ne!(any.short(), 0);
            assert_ne!(any.long_with(false), 0);
            assert_ne!(any.double(), 0.0);
            assert!(!any.decimal().is_zero());
            assert!(any.bool());
        }
    }

    #[test]
    fn test_float_shape() {
        let mut any = Any::seeded(7);
        for _ in 0..10_000 {
            let value = any.double();
            assert!((0.0..10_000.0).contains(&value));
            let cents = value * 100.0;
            assert!((cents - cents.round()).abs() < 1e-6);
        }
        let decimal = any.decimal_with(&FloatSpec::new(2, 3)).unwrap();
        assert!(decimal.scale() <= 3);
        assert!(any.double_with(&FloatSpec::new(4, 16)).is_err());
    }

    #[test]
    fn test_string_shape() {
        let mut any = Any::seeded(8);
        let value = any
            .string_with(&StringSpec::prefixed("Name").length(101))
            .unwrap();
        assert_eq!(value.chars().count(), 101);
        assert!(value.starts_with("Name"));

        assert_eq!(any.string().len(), DEFAULT_STRING_LENGTH);
        assert!(any.string_with(&StringSpec::default().length(0)).is_err());
        assert!(
            any.string_with(&StringSpec::prefixed("prefix").length(3))
                .is_err()
        );
    }

    #[test]
    fn test_utf16_strings_round_trip() {
        let mut any = Any::seeded(9);
        let spec = StringSpec::default().length(200).charset(CharSet::Utf16);
        for _ in 0..200 {
            let value = any.string_with(&spec).unwrap();
            let units: Vec<u16> = value.encode_utf16().collect();
            assert_eq!(String::from_utf16(&units).unwrap(), value);
            assert_eq!(value.chars().count(), 200);
        }
    }

    #[test]
    fn test_ascii_chars_are_printable() {
        let mut any = Any::seeded(10);
        for _ in 0..10_000 {
            let c = any.char_in(CharSet::Ascii);
            assert!((33..=126).contains(&(c as u32)));
            assert!(any.char().is_ascii_alphanumeric());
        }
    }

    #[test]
    fn test_email_and_uri_shapes() {
        let mut any = Any::seeded(11);
        let email = any.email();
        let (local, domain) = email.split_once('@').unwrap();
        assert!(!local.is_empty());
        assert!(domain.ends_with(".any"));

        let url = any.uri_with("ftp").unwrap().to_string();
        assert!(url.starts_with("ftp://"));
        assert!(url.ends_with(".any/"));
        assert!(any.uri_with("1http").is_err());
        assert!(any.url().starts_with("http://"));
    }

    #[test]
    fn test_guid_and_base64() {
        let mut any = Any::seeded(12);
        let guid = any.guid();
        assert_eq!(guid.get_version_num(), 4);
        assert_ne!(guid, any.guid());

        let encoded = any.base64_string(&StringSpec::default()).unwrap();
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .unwrap();
        assert_eq!(decoded.len(), DEFAULT_STRING_LENGTH);
    }
}
