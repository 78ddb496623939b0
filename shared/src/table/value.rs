// Cell value coercions shared by the filter predicate, the sort comparator
// and the renderers. Filter and sort follow the coercions of the JavaScript
// list pages the backend was built against, so a filter typed by a user
// behaves the same way in every client.
use serde_json::Value;
use std::cmp::Ordering;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// String form of a cell, as JavaScript's `String(value)` would produce it.
/// A missing field becomes `"undefined"`.
pub fn js_string(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(Value::Null) => "null".to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => number_text(n),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => js_string(Some(other)),
            })
            .collect::<Vec<_>>()
            .join(","),
        Some(Value::Object(_)) => "[object Object]".to_string(),
    }
}

/// Text shown in a table cell or written to an export. Missing and null
/// cells are blank.
pub fn display_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| display_text(Some(item)))
            .collect::<Vec<_>>()
            .join(", "),
        other => js_string(other),
    }
}

fn number_text(n: &serde_json::Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(x) if x == 0.0 => "0".to_string(),
        Some(x) if x.abs() >= 1e21 || x.abs() < 1e-6 => exponent_text(x),
        Some(x) => x.to_string(),
        None => n.to_string(),
    }
}

// JavaScript writes the exponent with an explicit sign: 1e+21, 1.5e-7.
fn exponent_text(x: f64) -> String {
    let text = format!("{:e}", x);
    match text.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
        _ => text,
    }
}

/// Numeric value of a cell under JavaScript `Number()` rules, or `None`
/// when that would be `NaN`.
pub fn js_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => parse_js_number(s),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    };
    number.filter(|x| !x.is_nan())
}

fn parse_js_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    match trimmed {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }
    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = trimmed.strip_prefix(prefix) {
            return radix_value(digits, radix);
        }
    }
    // Rust also accepts "inf" and "nan" spellings; JavaScript does not.
    if trimmed
        .bytes()
        .any(|b| b.is_ascii_alphabetic() && b != b'e' && b != b'E')
    {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

// Digits past u64 still have a value in JavaScript; accumulate in f64.
fn radix_value(digits: &str, radix: u32) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }
    digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
    })
}

/// Locale-style string order: accents and case are ignored first, then
/// lowercase sorts before uppercase, then unaccented before accented.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    primary_key(a)
        .cmp(primary_key(b))
        .then_with(|| {
            a.chars()
                .map(char::is_uppercase)
                .cmp(b.chars().map(char::is_uppercase))
        })
        .then_with(|| a.cmp(b))
}

fn primary_key(text: &str) -> impl Iterator<Item = char> + '_ {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_js_string_matches_javascript_coercion() {
        assert_eq!(js_string(None), "undefined");
        assert_eq!(js_string(Some(&Value::Null)), "null");
        assert_eq!(js_string(Some(&json!(true))), "true");
        assert_eq!(js_string(Some(&json!(42))), "42");
        assert_eq!(js_string(Some(&json!(2.0))), "2");
        assert_eq!(js_string(Some(&json!(2.5))), "2.5");
        assert_eq!(js_string(Some(&json!("Pune"))), "Pune");
        assert_eq!(js_string(Some(&json!([1, null, "a"]))), "1,,a");
        assert_eq!(js_string(Some(&json!({"a": 1}))), "[object Object]");
    }

    #[test]
    fn test_display_text_blanks_missing_values() {
        assert_eq!(display_text(None), "");
        assert_eq!(display_text(Some(&Value::Null)), "");
        assert_eq!(display_text(Some(&json!(["a", "b"]))), "a, b");
        assert_eq!(display_text(Some(&json!(7))), "7");
    }

    #[test]
    fn test_js_number_accepts_numeric_strings() {
        assert_eq!(js_number(&json!("10")), Some(10.0));
        assert_eq!(js_number(&json!(" 2.5 ")), Some(2.5));
        assert_eq!(js_number(&json!("")), Some(0.0));
        assert_eq!(js_number(&json!("1e3")), Some(1000.0));
        assert_eq!(js_number(&json!("0x1F")), Some(31.0));
        assert_eq!(js_number(&json!("-Infinity")), Some(f64::NEG_INFINITY));
        assert_eq!(js_number(&json!(true)), Some(1.0));
    }

    #[test]
    fn test_js_number_rejects_non_numeric_values() {
        assert_eq!(js_number(&json!("10kg")), None);
        assert_eq!(js_number(&json!("inf")), None);
        assert_eq!(js_number(&json!("NaN")), None);
        assert_eq!(js_number(&json!({"a": 1})), None);
        assert_eq!(js_number(&Value::Null), None);
    }

    #[test]
    fn test_locale_cmp_is_case_insensitive_first() {
        assert_eq!(locale_cmp("apple", "Banana"), Ordering::Less);
        assert_eq!(locale_cmp("Zebra", "apple"), Ordering::Greater);
        assert_eq!(locale_cmp("a", "A"), Ordering::Less);
        assert_eq!(locale_cmp("same", "same"), Ordering::Equal);
    }

    #[test]
    fn test_locale_cmp_folds_accents() {
        let mut cities = vec!["Zaragoza", "Ávila", "Bilbao", "Écija"];
        cities.sort_by(|a, b| locale_cmp(a, b));
        assert_eq!(cities, vec!["Ávila", "Bilbao", "Écija", "Zaragoza"]);

        assert_eq!(locale_cmp("resume", "résumé"), Ordering::Less);
        assert_eq!(locale_cmp("Ñandú", "nube"), Ordering::Less);
        assert_eq!(locale_cmp("peña", "pena"), Ordering::Greater);
    }

    #[test]
    fn test_js_string_uses_exponent_outside_plain_range() {
        assert_eq!(js_string(Some(&json!(1e21))), "1e+21");
        assert_eq!(js_string(Some(&json!(1.5e22))), "1.5e+22");
        assert_eq!(js_string(Some(&json!(1e-7))), "1e-7");
        assert_eq!(js_string(Some(&json!(-2.5e-8))), "-2.5e-8");
        assert_eq!(js_string(Some(&json!(0.000001))), "0.000001");
        assert_eq!(js_string(Some(&json!(1e20))), "100000000000000000000");
    }

    #[test]
    fn test_js_number_reads_wide_radix_literals() {
        assert_eq!(js_number(&json!("0x10000000000000000")), Some(18_446_744_073_709_551_616.0));
        assert_eq!(js_number(&json!("0b101")), Some(5.0));
        assert_eq!(js_number(&json!("0o17")), Some(15.0));
        assert_eq!(js_number(&json!("0x")), None);
        assert_eq!(js_number(&json!("0x1G")), None);
    }
}
