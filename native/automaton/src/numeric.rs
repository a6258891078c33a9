//! Languages of decimal numerals: integer bounds, digit counts and fixed
//! values. Whitespace padding and signs follow the usual lexical rules of
//! schema datatypes.

use crate::automaton::Automaton;
use crate::basic::DigitRange;
use crate::config::Engine;
use crate::error::{AutomatonError, Result};
use crate::graph::Graph;
use crate::state::{Payload, StateId};

impl Engine {
    /// Numerals, with any number of leading zeros, of the integers not
    /// above `n`.
    pub fn max_integer<P: Payload>(&self, n: &str) -> Result<Automaton<P>> {
        let significant = significant_digits(n)?;
        let zeros = self.repeat(&Automaton::char('0'));
        let body = if significant.is_empty() {
            Automaton::char('0')
        } else {
            let width = significant.len();
            let fixed = self.fixed_width(significant, |range| range.at_most(0));
            let shorter = self.repeat_range(&digit(), 1, width - 1);
            self.union(&shorter, &fixed)
        };
        Ok(self.minimal(self.concatenate(&zeros, &body)))
    }

    /// Numerals, with any number of leading zeros, of the integers not
    /// below `n`.
    pub fn min_integer<P: Payload>(&self, n: &str) -> Result<Automaton<P>> {
        let significant = significant_digits(n)?;
        if significant.is_empty() {
            return Ok(self.minimal(self.repeat_min(&digit(), 1)));
        }
        let width = significant.len();
        let fixed = self.fixed_width(significant, |range| range.at_least(0, false));
        let longer = self.concatenate(&Automaton::char_range('1', '9'), &self.repeat_min(&digit(), width));
        let zeros = self.repeat(&Automaton::char('0'));
        Ok(self.minimal(self.concatenate(&zeros, &self.union(&fixed, &longer))))
    }

    /// Optionally signed decimal numerals with at most `digits` digits,
    /// not counting leading zeros or trailing fraction zeros.
    pub fn total_digits<P: Payload>(&self, digits: usize) -> Automaton<P> {
        let digit = digit();
        let dot = Automaton::char('.');
        let zeros = self.repeat(&Automaton::char('0'));

        let whole = self.repeat_range(&digit, 0, digits);
        let counted = self.repeat_range(&self.concatenate(&digit, &self.optional(&dot)), 0, digits);
        let any_digits = self.repeat(&digit);
        let one_dot = self.concatenate_all(&[&any_digits, &dot, &any_digits]);
        let fraction = self.concatenate(&self.intersection(&counted, &one_dot), &zeros);

        let body = self.union(&whole, &fraction);
        self.signed(&[&zeros, &body])
    }

    /// Optionally signed decimal numerals with at most `digits` fraction
    /// digits, not counting trailing zeros.
    pub fn fraction_digits<P: Payload>(&self, digits: usize) -> Automaton<P> {
        let digit = digit();
        let whole = self.repeat_min(&digit, 1);
        let fraction = self.concatenate_all(&[
            &Automaton::char('.'),
            &self.repeat_range(&digit, 0, digits),
            &self.repeat(&Automaton::char('0')),
        ]);
        self.signed(&[&whole, &self.optional(&fraction)])
    }

    /// Numerals of the integer `value`, such as `"-12"`, with any leading
    /// zeros and surrounding whitespace.
    pub fn integer_value<P: Payload>(&self, value: &str) -> Result<Automaton<P>> {
        let numeral = Numeral::parse(value)?;
        if !numeral.fraction.is_empty() || value.contains('.') {
            return Err(AutomatonError::InvalidNumeral(value.to_owned()));
        }
        let zeros = self.repeat(&Automaton::char('0'));
        let whole = Automaton::string(numeral.whole);
        Ok(self.sign_then(numeral.negative, &[&zeros, &whole]))
    }

    /// Numerals of the decimal `value`, such as `"3.50"`, with any leading or
    /// trailing zeros and surrounding whitespace.
    pub fn decimal_value<P: Payload>(&self, value: &str) -> Result<Automaton<P>> {
        let numeral = Numeral::parse(value)?;
        let zeros = self.repeat(&Automaton::char('0'));
        let dot = Automaton::char('.');
        let fraction = if numeral.fraction.is_empty() {
            let point_zeros = self.concatenate(&dot, &self.repeat_min(&Automaton::char('0'), 1));
            self.optional(&point_zeros)
        } else {
            self.concatenate_all(&[&dot, &Automaton::string(numeral.fraction), &zeros])
        };
        let whole = Automaton::string(numeral.whole);
        Ok(self.sign_then(numeral.negative, &[&zeros, &whole, &fraction]))
    }

    /// Fixed-width numerals of `significant.len()` digits built by `build`.
    fn fixed_width<P: Payload>(
        &self,
        significant: &str,
        build: impl FnOnce(&mut DigitRange<'_, P>) -> StateId,
    ) -> Automaton<P> {
        let bound = significant.as_bytes();
        let mut range = DigitRange {
            graph: Graph::new(),
            low: bound,
            high: bound,
            zero_prefixed: Vec::new(),
        };
        let start = build(&mut range);
        let mut graph = range.graph;
        graph.initial = start;
        graph.reduce();
        Automaton::from_graph(graph, true)
    }

    /// `ws [-+]? parts ws`, minimized.
    fn signed<P: Payload>(&self, parts: &[&Automaton<P>]) -> Automaton<P> {
        let sign = self.optional(&Automaton::char_set("+-"));
        self.padded_parts(&sign, parts)
    }

    /// `ws sign parts ws`, minimized; the sign is `-` for a negative value
    /// and an optional `+` otherwise.
    fn sign_then<P: Payload>(&self, negative: bool, parts: &[&Automaton<P>]) -> Automaton<P> {
        let sign = if negative {
            Automaton::char('-')
        } else {
            self.optional(&Automaton::char('+'))
        };
        self.padded_parts(&sign, parts)
    }

    fn padded_parts<P: Payload>(
        &self,
        sign: &Automaton<P>,
        parts: &[&Automaton<P>],
    ) -> Automaton<P> {
        let ws = Automaton::whitespace();
        let mut all = vec![&ws, sign];
        all.extend_from_slice(parts);
        all.push(&ws);
        self.minimal(self.concatenate_all(&all))
    }

    fn minimal<P: Payload>(&self, mut a: Automaton<P>) -> Automaton<P> {
        self.minimize(&mut a);
        a
    }
}

fn digit<P: Payload>() -> Automaton<P> {
    Automaton::char_range('0', '9')
}

/// `n` without leading zeros; `n` must be a nonempty run of ASCII digits.
fn significant_digits(n: &str) -> Result<&str> {
    if n.is_empty() || !n.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AutomatonError::InvalidNumeral(n.to_owned()));
    }
    Ok(n.trim_start_matches('0'))
}

/// A decimal value split into its canonical parts.
#[derive(Debug, PartialEq, Eq)]
struct Numeral<'a> {
    negative: bool,
    /// Integer digits without leading zeros, `"0"` for zero.
    whole: &'a str,
    /// Fraction digits without trailing zeros.
    fraction: &'a str,
}

impl<'a> Numeral<'a> {
    fn parse(value: &'a str) -> Result<Self> {
        let invalid = || AutomatonError::InvalidNumeral(value.to_owned());
        let (negative, unsigned) = match value.as_bytes().first() {
            Some(b'-') => (true, &value[1..]),
            Some(b'+') => (false, &value[1..]),
            _ => (false, value),
        };
        let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if whole.len() + fraction.len() == 0 || !is_digits(whole) || !is_digits(fraction) {
            return Err(invalid());
        }
        let whole = match whole.trim_start_matches('0') {
            "" => "0",
            significant => significant,
        };
        Ok(Self {
            negative,
            whole,
            fraction: fraction.trim_end_matches('0'),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> Engine {
        Engine::default()
    }

    #[test]
    fn test_interval_fixed_width() {
        let a: Automaton = Automaton::interval(3, 534, 5).unwrap();
        assert!(a.is_deterministic());
        assert!(a.accepts("00101"));
        assert!(a.accepts("00534"));
        assert!(a.accepts("00003"));
        assert!(!a.accepts("999"));
        assert!(!a.accepts("00001"));
        assert!(!a.accepts("000101"));
        assert!(!a.accepts("00535"));
        assert!(!a.accepts("Not a string"));
        assert!(!a.is_singleton());
    }

    #[test]
    fn test_interval_any_width() {
        let a: Automaton = Automaton::interval(3, 534, 0).unwrap();
        for numeral in ["3", "03", "0003", "99", "100", "534", "000534"] {
            assert!(a.accepts(numeral), "{numeral}");
        }
        for numeral in ["", "0", "2", "002", "535", "1000"] {
            assert!(!a.accepts(numeral), "{numeral}");
        }

        let from_zero: Automaton = Automaton::interval(0, 7, 0).unwrap();
        assert!(from_zero.accepts("0"));
        assert!(from_zero.accepts("007"));
        assert!(!from_zero.accepts("8"));
    }

    #[test]
    fn test_interval_rejects_bad_bounds() {
        assert_eq!(
            Automaton::<()>::interval(9, 3, 0).err(),
            Some(AutomatonError::InvalidDigitRange { min: 9, max: 3, digits: 0 })
        );
        assert!(Automaton::<()>::interval(1, 1000, 3).is_err());
    }

    #[test]
    fn test_max_integer() {
        let a: Automaton = engine().max_integer("386").unwrap();
        assert!(a.is_deterministic());
        assert!(!a.accepts("-4"));
        assert!(a.accepts("2"));
        assert!(a.accepts("02"));
        assert!(a.accepts("386"));
        assert!(a.accepts("0"));
        assert!(!a.accepts("387"));
        assert!(!a.accepts("0486"));
        assert!(!a.is_singleton());

        let zero: Automaton = engine().max_integer("00").unwrap();
        assert!(zero.accepts("000"));
        assert!(!zero.accepts("1"));
    }

    #[test]
    fn test_min_integer() {
        let a: Automaton = engine().min_integer("386").unwrap();
        assert!(a.is_deterministic());
        assert!(!a.accepts("-4"));
        assert!(a.accepts("0486"));
        assert!(a.accepts("386"));
        assert!(a.accepts("1000"));
        assert!(!a.accepts("385"));
        assert!(!a.accepts("2"));
        assert!(!a.is_singleton());

        assert!(engine().min_integer::<()>("3x").is_err());
    }

    #[test]
    fn test_total_digits() {
        let a: Automaton = engine().total_digits(3);
        assert!(a.is_deterministic());
        assert!(a.accepts(" -4"));
        assert!(!a.accepts("2e3"));
        assert!(a.accepts("02"));
        assert!(a.accepts("0486 "));
        assert!(a.accepts("1.50"));
        assert!(!a.accepts("1.2.3"));
        assert!(!a.accepts("12.34"));
        assert!(!a.accepts("38829"));
    }

    #[test]
    fn test_fraction_digits() {
        let a: Automaton = engine().fraction_digits(3);
        assert!(a.is_deterministic());
        assert!(a.accepts(" -4.3"));
        assert!(!a.accepts("2.1292"));
        assert!(a.accepts("2.1290"));
        assert!(a.accepts("02"));
        assert!(a.accepts("0486342434 "));
        assert!(!a.accepts("38829.12923"));
    }

    #[test]
    fn test_integer_value() {
        let a: Automaton = engine().integer_value("342").unwrap();
        assert!(a.is_deterministic());
        assert!(a.accepts(" 00342 "));
        assert!(!a.accepts("0+342"));
        assert!(a.accepts("+342  "));
        assert!(!a.accepts("-342"));

        let negative: Automaton = engine().integer_value("-0042").unwrap();
        assert!(negative.accepts("-42"));
        assert!(!negative.accepts("42"));

        assert!(engine().integer_value::<()>("4.2").is_err());
    }

    #[test]
    fn test_decimal_value() {
        let a: Automaton = engine().decimal_value("342.02").unwrap();
        assert!(a.is_deterministic());
        assert!(a.accepts(" 00342.0200 "));
        assert!(!a.accepts("+342.002"));
        assert!(a.accepts("+342.02  "));

        let whole: Automaton = engine().decimal_value("7.000").unwrap();
        assert!(whole.accepts("7"));
        assert!(whole.accepts("007.0"));
        assert!(!whole.accepts("7."));

        assert!(engine().decimal_value::<()>("-").is_err());
    }

    #[test]
    fn test_numeral_parse() {
        let parsed = Numeral::parse("-000.500").unwrap();
        assert_eq!(
            parsed,
            Numeral {
                negative: true,
                whole: "0",
                fraction: "5",
            }
        );
        assert!(Numeral::parse("1e5").is_err());
    }

    #[test]
    fn test_string_matcher() {
        let a: Automaton = Automaton::string_matcher("to be");
        assert!(a.is_deterministic());
        assert!(a.accepts("To be or not to be"));
        assert_eq!(a.run("Two bees or three bees"), None);
        assert!(a.accepts("tto be"));
        assert!(!a.is_singleton());

        // overlapping prefixes fall back along the border
        let b: Automaton = Automaton::string_matcher("aab");
        assert!(b.accepts("aaab"));
        assert!(!b.accepts("abab"));
    }
}
