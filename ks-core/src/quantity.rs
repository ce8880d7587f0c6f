use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use tracing::*;

use crate::errors::*;

const NANOS_PER_UNIT: i128 = 1_000_000_000;
const BINARY_BASE: i128 = 1024;
const BINARY_SUFFIXES: [&str; 7] = ["", "Ki", "Mi", "Gi", "Ti", "Pi", "Ei"];

err_impl! {QuantityError,
    #[error("malformed quantity: {0}")]
    Malformed(String),

    #[error("quantity out of range: {0}")]
    OutOfRange(String),
}

// Kubernetes remembers which "family" of suffix a quantity was written with and uses the same
// family when printing it back out; see
// https://kubernetes.io/docs/reference/kubernetes-api/common-definitions/quantity/
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum QuantityFormat {
    DecimalSI,
    BinarySI,
    DecimalExponent,
}

enum Multiplier {
    Pow10(i32),
    Pow1024(u32),
}

// A parsed resource quantity.  Values are stored as a count of nano-units, which is the finest
// precision the apiserver keeps; anything smaller gets rounded up, same as upstream.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ParsedQuantity {
    nanos: i128,
    format: QuantityFormat,
}

impl ParsedQuantity {
    pub fn zero() -> ParsedQuantity {
        ParsedQuantity { nanos: 0, format: QuantityFormat::DecimalSI }
    }

    pub fn format(&self) -> QuantityFormat {
        self.format
    }

    pub fn is_zero(&self) -> bool {
        self.nanos == 0
    }

    // Compares values regardless of how they were written, e.g. "1Gi" and "1073741824"
    pub fn same_amount(&self, other: &ParsedQuantity) -> bool {
        self.nanos == other.nanos
    }

    // Adding to a zero quantity adopts the other quantity's format, so that summing "1Gi" onto an
    // empty total prints as "1Gi" and not as a pile of decimal digits.
    pub fn add(&mut self, other: &ParsedQuantity) -> EmptyResult {
        if self.nanos == 0 {
            self.format = other.format;
        }
        self.nanos = match self.nanos.checked_add(other.nanos) {
            Some(n) => n,
            None => bail!(QuantityError::out_of_range(&format!("{self} + {other}"))),
        };
        Ok(())
    }
}

impl FromStr for ParsedQuantity {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<ParsedQuantity> {
        let (negative, rest) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            Some(_) => (false, s),
            None => bail!(QuantityError::malformed(s)),
        };

        let num_end = rest.find(|c: char| !(c.is_ascii_digit() || c == '.')).unwrap_or(rest.len());
        let (number, suffix) = rest.split_at(num_end);
        let (whole, frac) = number.split_once('.').unwrap_or((number, ""));
        if (whole.is_empty() && frac.is_empty()) || frac.contains('.') {
            bail!(QuantityError::malformed(s));
        }

        let Some((multiplier, format)) = parse_suffix(suffix) else {
            bail!(QuantityError::malformed(s));
        };

        let digits = format!("{whole}{frac}");
        let digits = digits.trim_start_matches('0');
        let mantissa: i128 = if digits.is_empty() {
            0
        } else {
            digits.parse().map_err(|_| QuantityError::out_of_range(s))?
        };

        let frac_digits = frac.len() as i32;
        let magnitude = match multiplier {
            Multiplier::Pow10(exp) => scale_pow10(mantissa, exp + 9 - frac_digits),
            Multiplier::Pow1024(power) => BINARY_BASE
                .checked_pow(power)
                .and_then(|base| mantissa.checked_mul(base))
                .and_then(|m| m.checked_mul(NANOS_PER_UNIT))
                .and_then(|m| scale_pow10(m, -frac_digits)),
        };

        match magnitude {
            Some(m) => Ok(ParsedQuantity {
                nanos: if negative { -m } else { m },
                format,
            }),
            None => bail!(QuantityError::out_of_range(s)),
        }
    }
}

impl TryFrom<&Quantity> for ParsedQuantity {
    type Error = anyhow::Error;

    fn try_from(q: &Quantity) -> anyhow::Result<ParsedQuantity> {
        q.0.parse()
    }
}

// Display gives the canonical form, which is what the apiserver itself would print: the largest
// suffix (in the quantity's own format) that keeps the mantissa an integer.
impl fmt::Display for ParsedQuantity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.nanos == 0 {
            return f.write_str("0");
        }

        let format = match self.format {
            // small or fractional binary values print as plain decimals to avoid rounding
            QuantityFormat::BinarySI
                if self.nanos.abs() < BINARY_BASE * NANOS_PER_UNIT || self.nanos % NANOS_PER_UNIT != 0 =>
            {
                QuantityFormat::DecimalSI
            },
            other => other,
        };

        match format {
            QuantityFormat::BinarySI => {
                let units = self.nanos / NANOS_PER_UNIT;
                let (value, power) = (1..BINARY_SUFFIXES.len())
                    .rev()
                    .map(|p| (p, BINARY_BASE.pow(p as u32)))
                    .find(|(_, base)| units % base == 0)
                    .map(|(p, base)| (units / base, p))
                    .unwrap_or((units, 0));
                write!(f, "{value}{}", BINARY_SUFFIXES[power])
            },
            QuantityFormat::DecimalExponent => {
                let (mantissa, exp) = decimal_parts(self.nanos);
                if exp == 0 { write!(f, "{mantissa}") } else { write!(f, "{mantissa}e{exp}") }
            },
            QuantityFormat::DecimalSI => {
                let (mantissa, exp) = decimal_parts(self.nanos);
                write!(f, "{mantissa}{}", decimal_suffix(exp))
            },
        }
    }
}

pub fn canonicalize(raw: &str) -> anyhow::Result<String> {
    Ok(raw.parse::<ParsedQuantity>()?.to_string())
}

// Quantities we can't make sense of get passed through as-is; dropping them would lose data
pub fn canonical_or_raw(q: &Quantity) -> String {
    match canonicalize(&q.0) {
        Ok(s) => s,
        Err(err) => {
            debug!("passing through unparseable quantity: {err}");
            q.0.clone()
        },
    }
}

pub fn quantity_map(m: Option<&BTreeMap<String, Quantity>>) -> BTreeMap<String, String> {
    m.into_iter()
        .flatten()
        .map(|(name, q)| (name.clone(), canonical_or_raw(q)))
        .collect()
}

fn parse_suffix(suffix: &str) -> Option<(Multiplier, QuantityFormat)> {
    let parsed = match suffix {
        "" => (Multiplier::Pow10(0), QuantityFormat::DecimalSI),
        "n" => (Multiplier::Pow10(-9), QuantityFormat::DecimalSI),
        "u" => (Multiplier::Pow10(-6), QuantityFormat::DecimalSI),
        "m" => (Multiplier::Pow10(-3), QuantityFormat::DecimalSI),
        "k" => (Multiplier::Pow10(3), QuantityFormat::DecimalSI),
        "M" => (Multiplier::Pow10(6), QuantityFormat::DecimalSI),
        "G" => (Multiplier::Pow10(9), QuantityFormat::DecimalSI),
        "T" => (Multiplier::Pow10(12), QuantityFormat::DecimalSI),
        "P" => (Multiplier::Pow10(15), QuantityFormat::DecimalSI),
        "E" => (Multiplier::Pow10(18), QuantityFormat::DecimalSI),
        "Ki" => (Multiplier::Pow1024(1), QuantityFormat::BinarySI),
        "Mi" => (Multiplier::Pow1024(2), QuantityFormat::BinarySI),
        "Gi" => (Multiplier::Pow1024(3), QuantityFormat::BinarySI),
        "Ti" => (Multiplier::Pow1024(4), QuantityFormat::BinarySI),
        "Pi" => (Multiplier::Pow1024(5), QuantityFormat::BinarySI),
        "Ei" => (Multiplier::Pow1024(6), QuantityFormat::BinarySI),
        _ => {
            let exp = suffix.strip_prefix(['e', 'E'])?;
            (Multiplier::Pow10(exp.parse().ok()?), QuantityFormat::DecimalExponent)
        },
    };
    Some(parsed)
}

// Multiply a non-negative value by 10^exp, rounding up when exp is negative
fn scale_pow10(value: i128, exp: i32) -> Option<i128> {
    if exp >= 0 {
        return value.checked_mul(10i128.checked_pow(exp as u32)?);
    }

    match 10i128.checked_pow(exp.unsigned_abs()) {
        Some(div) => Some(value / div + if value % div != 0 { 1 } else { 0 }),
        None => Some(if value == 0 { 0 } else { 1 }),
    }
}

fn decimal_parts(nanos: i128) -> (i128, i32) {
    (-3..=6)
        .rev()
        .map(|i| i * 3)
        .find_map(|exp| {
            let div = 10i128.pow((exp + 9) as u32);
            (nanos % div == 0).then_some((nanos / div, exp))
        })
        .unwrap_or((nanos, -9))
}

fn decimal_suffix(exp: i32) -> &'static str {
    match exp {
        -9 => "n",
        -6 => "u",
        -3 => "m",
        3 => "k",
        6 => "M",
        9 => "G",
        12 => "T",
        15 => "P",
        18 => "E",
        _ => "",
    }
}

#[cfg(test)]
mod test {
    use assertables::*;
    use rstest::*;
    use tracing_test::traced_test;

    use super::*;

    #[rstest]
    #[case::milli("100m", "100m")]
    #[case::fraction("0.1", "100m")]
    #[case::thousand("1000", "1k")]
    #[case::one_and_a_half("1.5", "1500m")]
    #[case::plain("1024", "1024")]
    #[case::mebi("128Mi", "128Mi")]
    #[case::gibi("2Gi", "2Gi")]
    #[case::promote_binary("2048Ki", "2Mi")]
    #[case::fractional_binary("0.5Gi", "512Mi")]
    #[case::small_binary("512Ki", "512Ki")]
    #[case::tiny_binary("1Ki", "1Ki")]
    #[case::exponent("1e3", "1e3")]
    #[case::nano("1n", "1n")]
    #[case::negative("-100m", "-100m")]
    #[case::zero("0", "0")]
    #[case::zero_with_suffix("0Gi", "0")]
    #[case::leading_plus("+2", "2")]
    #[case::sub_nano("0.1n", "1n")]
    fn test_canonicalize(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(canonicalize(raw).unwrap(), expected);
    }

    #[rstest]
    #[case::empty("")]
    #[case::letters("abc")]
    #[case::two_dots("1.2.3")]
    #[case::bad_suffix("12Zi")]
    #[case::no_digits("e3")]
    #[case::just_a_dot(".")]
    #[case::huge_exponent("1e100")]
    #[case::huge_integer("123456789012345678901234567890123")]
    fn test_parse_invalid(#[case] raw: &str) {
        assert_err!(raw.parse::<ParsedQuantity>());
    }

    #[rstest]
    #[case::cpu("100m", "100m", "200m")]
    #[case::memory("1Gi", "1Gi", "2Gi")]
    #[case::memory_promotes("512Mi", "512Mi", "1Gi")]
    #[case::whole_cpu("500m", "1500m", "2")]
    fn test_add(#[case] a: &str, #[case] b: &str, #[case] expected: &str) {
        let mut total: ParsedQuantity = a.parse().unwrap();
        total.add(&b.parse().unwrap()).unwrap();
        assert_eq!(total.to_string(), expected);
    }

    #[rstest]
    fn test_add_to_zero_adopts_format() {
        let mut total = ParsedQuantity::zero();
        total.add(&"1Gi".parse().unwrap()).unwrap();
        assert_eq!(total.format(), QuantityFormat::BinarySI);
        assert_eq!(total.to_string(), "1Gi");
    }

    #[rstest]
    fn test_same_amount_across_formats() {
        let a: ParsedQuantity = "1Gi".parse().unwrap();
        let b: ParsedQuantity = "1073741824".parse().unwrap();
        assert!(a.same_amount(&b));
        assert_ne!(a, b);
    }

    #[rstest]
    #[traced_test]
    fn test_quantity_map_passes_through_garbage() {
        let m = BTreeMap::from([
            ("cpu".to_string(), Quantity("0.25".into())),
            ("example.com/widget".to_string(), Quantity("lots".into())),
        ]);
        let res = quantity_map(Some(&m));
        assert_eq!(res["cpu"], "250m");
        assert_eq!(res["example.com/widget"], "lots");
        assert!(logs_contain("passing through unparseable quantity"));
    }

    #[rstest]
    #[case::huge_exponent("1e100")]
    #[case::huge_integer("123456789012345678901234567890123")]
    fn test_out_of_range_passes_through(#[case] raw: &str) {
        assert_eq!(canonical_or_raw(&Quantity(raw.into())), raw);
    }

    #[rstest]
    fn test_quantity_map_none() {
        assert_is_empty!(quantity_map(None));
    }
}
