/// Escapes `value` so it can be placed between double quotes in a SPARQL query.
///
/// Backslash, double quote, tab, line feed, carriage return, backspace and form feed get their
/// short escape. The other characters in `U+0000..=U+0019` become `\uXXXX` and characters outside
/// the Basic Multilingual Plane become `\UXXXXXXXX`. Hexadecimal digits are lower case.
pub fn escape_literal(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\t' => escaped.push_str("\\t"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\u{8}' => escaped.push_str("\\b"),
            '\u{c}' => escaped.push_str("\\f"),
            '\u{0}'..='\u{19}' => {
                escaped.push_str("\\u");
                push_hex(&mut escaped, u32::from(c), 4);
            }
            '\u{10000}'..='\u{10ffff}' => {
                escaped.push_str("\\U");
                push_hex(&mut escaped, u32::from(c), 8);
            }
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Renders `value` as a quoted SPARQL string literal.
pub fn quote_literal(value: &str) -> String {
    format!("\"{}\"", escape_literal(value))
}

fn push_hex(out: &mut String, value: u32, digits: u32) {
    for shift in (0..digits).rev() {
        let nibble = (value >> (shift * 4)) & 0xF;
        out.extend(char::from_digit(nibble, 16));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reads back an escaped literal body following the `ECHAR` and `UCHAR` productions.
    fn unescape(escaped: &str) -> String {
        let mut result = String::new();
        let mut chars = escaped.chars();
        while let Some(c) = chars.next() {
            if c != '\\' {
                result.push(c);
                continue;
            }
            match chars.next() {
                Some('t') => result.push('\t'),
                Some('n') => result.push('\n'),
                Some('r') => result.push('\r'),
                Some('b') => result.push('\u{8}'),
                Some('f') => result.push('\u{c}'),
                Some('"') => result.push('"'),
                Some('\'') => result.push('\''),
                Some('\\') => result.push('\\'),
                Some('u') => result.extend(read_code_point(&mut chars, 4)),
                Some('U') => result.extend(read_code_point(&mut chars, 8)),
                other => panic!("invalid escape sequence \\{other:?}"),
            }
        }
        result
    }

    fn read_code_point(chars: &mut std::str::Chars<'_>, digits: usize) -> Option<char> {
        let hex: String = chars.take(digits).collect();
        u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32)
    }

    #[test]
    fn escapes_quotes_and_newline() {
        assert_eq!(escape_literal("he said \"hi\"\n"), "he said \\\"hi\\\"\\n");
    }

    #[test]
    fn escapes_short_forms() {
        assert_eq!(
            escape_literal("a\\b\tc\rd\u{8}e\u{c}f"),
            "a\\\\b\\tc\\rd\\be\\ff"
        );
    }

    #[test]
    fn escapes_low_control_characters_as_four_digits() {
        assert_eq!(escape_literal("\u{0}\u{1}\u{19}"), "\\u0000\\u0001\\u0019");
    }

    #[test]
    fn keeps_characters_above_the_escaped_control_range() {
        assert_eq!(escape_literal("\u{1a}\u{1f} "), "\u{1a}\u{1f} ");
    }

    #[test]
    fn keeps_basic_multilingual_plane_text() {
        assert_eq!(escape_literal("Odeur de rose, \u{e9}t\u{e9}"), "Odeur de rose, \u{e9}t\u{e9}");
    }

    #[test]
    fn escapes_astral_characters_as_eight_digits() {
        assert_eq!(escape_literal("\u{1f339}"), "\\U0001f339");
        assert_eq!(escape_literal("x\u{10ffff}"), "x\\U0010ffff");
    }

    #[test]
    fn quotes_literal() {
        assert_eq!(quote_literal("rose \"water\""), "\"rose \\\"water\\\"\"");
    }

    #[test]
    fn escaped_text_reads_back_unchanged() {
        let inputs = [
            "",
            "plain",
            "back\\slash \"quoted\"",
            "\t\n\r\u{8}\u{c}",
            "\u{0}\u{7}\u{11}\u{19}\u{1a}",
            "smell \u{1f443} of \u{1f339} and \u{1d11e}",
            "mixed \\\u{1f339}\"\u{3}\n",
        ];
        for input in inputs {
            assert_eq!(unescape(&escape_literal(input)), input, "input {input:?}");
        }
    }

    #[test]
    fn escaped_text_contains_no_raw_quote_or_newline() {
        let escaped = escape_literal("\"\n\r\\");
        assert!(!escaped.contains('\n'), "raw newline left in {escaped}");
        assert!(
            !escaped.replace("\\\\", "").replace("\\\"", "").contains('"'),
            "unescaped quote left in {escaped}"
        );
    }
}
