//! Scalar literal formatting in Go notation

use std::fmt::Write;

/// Go-quoted string literal
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{07}' => out.push_str("\\a"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            '\u{0b}' => out.push_str("\\v"),
            c if (c as u32) < 0x20 || c == '\u{7f}' => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Unsigned integers print in hex, as `0x1f`
pub fn unsigned(u: u64) -> String {
    format!("{:#x}", u)
}

/// Shortest `%g` rendering; `single` formats with `f32` precision
pub fn float(value: f64, single: bool) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }
    let sign = if value.is_sign_negative() { "-" } else { "" };
    if value == 0.0 {
        return format!("{}0", sign);
    }

    // `{:e}` yields the shortest round-trip digits, e.g. `1.2345e6`.
    let scientific = if single {
        format!("{:e}", (value as f32).abs())
    } else {
        format!("{:e}", value.abs())
    };
    let (mantissa, exp) = scientific.split_once('e').unwrap_or((&scientific, "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    if !(-4..6).contains(&exp) {
        let mut out = format!("{}{}", sign, &digits[..1]);
        if digits.len() > 1 {
            out.push('.');
            out.push_str(&digits[1..]);
        }
        let _ = write!(out, "e{}{:02}", if exp < 0 { '-' } else { '+' }, exp.abs());
        return out;
    }

    let point = exp + 1;
    let body = if point <= 0 {
        format!("0.{}{}", "0".repeat((-point) as usize), digits)
    } else if point as usize >= digits.len() {
        format!("{}{}", digits, "0".repeat(point as usize - digits.len()))
    } else {
        let (int, frac) = digits.split_at(point as usize);
        format!("{}.{}", int, frac)
    };
    format!("{}{}", sign, body)
}

/// Complex literal body without parentheses, as `1+2i`
pub fn complex(re: f64, im: f64, single: bool) -> String {
    let imag = float(im, single);
    let imag = if imag.starts_with('-') || imag.starts_with('+') {
        imag
    } else {
        format!("+{}", imag)
    };
    format!("{}{}i", float(re, single), imag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("plain"), "\"plain\"");
        assert_eq!(quote("a\"b\\c"), "\"a\\\"b\\\\c\"");
        assert_eq!(quote("line\n\ttab"), "\"line\\n\\ttab\"");
        assert_eq!(quote("\u{1}"), "\"\\x01\"");
        assert_eq!(quote("héllo"), "\"héllo\"");
    }

    #[test]
    fn test_float_shortest_g() {
        assert_eq!(float(1.0, false), "1");
        assert_eq!(float(0.5, false), "0.5");
        assert_eq!(float(-2.25, false), "-2.25");
        assert_eq!(float(123456.0, false), "123456");
        assert_eq!(float(1e6, false), "1e+06");
        assert_eq!(float(1234567.0, false), "1.234567e+06");
        assert_eq!(float(0.0001, false), "0.0001");
        assert_eq!(float(0.00001, false), "1e-05");
        assert_eq!(float(1e21, false), "1e+21");
        assert_eq!(float(0.0, false), "0");
    }

    #[test]
    fn test_float_single_precision() {
        assert_eq!(float(0.1f32 as f64, true), "0.1");
        assert_ne!(float(0.1f32 as f64, false), "0.1");
    }

    #[test]
    fn test_float_special_values() {
        assert_eq!(float(f64::NAN, false), "NaN");
        assert_eq!(float(f64::INFINITY, false), "+Inf");
        assert_eq!(float(f64::NEG_INFINITY, false), "-Inf");
    }

    #[test]
    fn test_complex_and_unsigned() {
        assert_eq!(complex(1.0, 2.0, false), "1+2i");
        assert_eq!(complex(0.0, -1.5, false), "0-1.5i");
        assert_eq!(unsigned(31), "0x1f");
        assert_eq!(unsigned(0), "0x0");
    }
}
