//! Symbol types for automata transitions.

use std::fmt::Write;

/// A symbol is one 16-bit code unit.
pub type Symbol = u16;

/// Smallest symbol of the alphabet.
pub const MIN_SYMBOL: Symbol = Symbol::MIN;

/// Largest symbol of the alphabet.
pub const MAX_SYMBOL: Symbol = Symbol::MAX;

/// Encode a string as the symbol sequence the automata operate on.
pub fn to_symbols(s: &str) -> Vec<Symbol> {
    s.encode_utf16().collect()
}

/// Decode a symbol sequence, replacing unpaired surrogates.
pub fn from_symbols(symbols: &[Symbol]) -> String {
    String::from_utf16_lossy(symbols)
}

/// Append a printable rendering of `symbol` to `out`.
///
/// Visible ASCII other than the backslash is written as-is, everything else
/// as a `\uXXXX` escape.
pub fn write_symbol(symbol: Symbol, out: &mut String) {
    if (0x21..=0x7e).contains(&symbol) && symbol != u16::from(b'\\') {
        out.push(char::from(symbol as u8));
    } else {
        let _ = write!(out, "\\u{symbol:04x}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_roundtrip_bmp() {
        let symbols = to_symbols("abc");
        assert_eq!(symbols, vec![0x61, 0x62, 0x63]);
        assert_eq!(from_symbols(&symbols), "abc");
    }

    #[test]
    fn test_supplementary_char_is_two_units() {
        assert_eq!(to_symbols("\u{1F600}").len(), 2);
    }

    #[test]
    fn test_write_symbol_escapes() {
        let mut out = String::new();
        write_symbol(u16::from(b'a'), &mut out);
        write_symbol(u16::from(b' '), &mut out);
        write_symbol(u16::from(b'\\'), &mut out);
        assert_eq!(out, "a\\u0020\\u005c");
    }
}
