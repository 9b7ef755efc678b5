//! String literal parsing.
//!
//! A string is enclosed by single or double quotes and can contain zero or more fragments
//! consisting of:
//! * Any raw unescaped codepoint except `\`, a newline, or the quote character.
//! * One of the following escape sequences: `\a`, `\b`, `\e`, `\f`, `\n`, `\r`, `\t`, `\v`,
//!   `\'`, `\"`, `\/`, `\\`.
//! * A hex escape sequence of the form `\x[0-9a-fA-F]{1,2}`.
//! * A unicode escape sequence of the form `\u{[0-9a-fA-F]{1,6}}`.

use crate::parser::{CharCursor, Expected, KConfigError, Located};

/// Parse a string literal from the stream.
///
/// The stream must be pointing at the opening quote character `quote`.
pub fn parse_string_literal(chars: &mut CharCursor, quote: char) -> Result<String, KConfigError> {
    let start = chars.location();

    let Some(c) = chars.next() else {
        return Err(KConfigError::unexpected_eof(quote, start));
    };

    if c != quote {
        return Err(KConfigError::unexpected(c, quote, start));
    }

    let mut result = String::new();

    loop {
        let Some(c) = chars.peek() else {
            return Err(KConfigError::unexpected_eof(quote, chars.location()));
        };

        if c == quote {
            _ = chars.next();
            return Ok(result);
        }

        match c {
            '\n' => return Err(KConfigError::unexpected(c, quote, chars.location())),
            '\\' => {
                _ = chars.next();
                parse_escape(chars, &mut result)?;
            }
            _ => {
                result.push(c);
                _ = chars.next();
            }
        }
    }
}

/// Parse an escape sequence (after the backslash has been consumed), appending the resulting
/// character to `out`.
pub(crate) fn parse_escape(chars: &mut CharCursor, out: &mut String) -> Result<(), KConfigError> {
    let start = chars.location();

    let Some(c) = chars.next() else {
        return Err(KConfigError::unexpected_eof(Expected::Any, start));
    };

    let escaped = match c {
        'a' => '\u{07}', // alarm (BEL)
        'b' => '\u{08}', // backspace (BS)
        'e' => '\u{1B}', // escape (ESC)
        'f' => '\u{0C}', // form feed (FF)
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'v' => '\u{0B}', // vertical tab (VT)
        '\\' => '\\',
        '\'' => '\'',
        '"' => '"',
        '/' => '/',
        'x' => parse_hex_escape(chars)?,
        'u' => parse_unicode_escape(chars)?,
        _ => return Err(KConfigError::unexpected(c, Expected::UnicodeEscape, start)),
    };

    out.push(escaped);
    Ok(())
}

/// Parse a hex escape of the form `x[0-9a-fA-F]{1,2}` (after the `x` has been consumed).
fn parse_hex_escape(chars: &mut CharCursor) -> Result<char, KConfigError> {
    let start = chars.location();
    let mut value = 0u32;
    let mut n_digits = 0;

    while n_digits < 2 {
        let Some(c) = chars.peek() else {
            break;
        };

        let Some(digit) = c.to_digit(16) else {
            break;
        };

        value = (value << 4) | digit;
        n_digits += 1;
        _ = chars.next();
    }

    if n_digits == 0 {
        return Err(KConfigError::unexpected_eof(Expected::IntegerLiteral, start));
    }

    char::from_u32(value).ok_or_else(|| KConfigError::invalid_unicode(value, start))
}

/// Parse a unicode escape of the form `u{[0-9a-fA-F]{1,6}}` (after the `u` has been consumed).
fn parse_unicode_escape(chars: &mut CharCursor) -> Result<char, KConfigError> {
    let start = chars.location();

    let Some(c) = chars.next() else {
        return Err(KConfigError::unexpected_eof(Expected::UnicodeEscape, start));
    };

    if c != '{' {
        return Err(KConfigError::unexpected(c, Expected::UnicodeEscape, start));
    }

    let mut value = 0u32;
    let mut n_digits = 0;

    loop {
        let Some(c) = chars.next() else {
            return Err(KConfigError::unexpected_eof(Expected::UnicodeEscape, chars.location()));
        };

        if c == '}' {
            break;
        }

        let Some(digit) = c.to_digit(16) else {
            return Err(KConfigError::unexpected(c, Expected::UnicodeEscape, chars.location()));
        };

        if n_digits == 6 {
            return Err(KConfigError::unexpected(c, Expected::UnicodeEscape, chars.location()));
        }

        value = (value << 4) | digit;
        n_digits += 1;
    }

    if n_digits == 0 {
        return Err(KConfigError::unexpected('}', Expected::UnicodeEscape, start));
    }

    char::from_u32(value).ok_or_else(|| KConfigError::invalid_unicode(value, start))
}

#[cfg(test)]
mod tests {
    use {super::parse_string_literal, crate::parser::CharCursor, std::path::Path};

    fn parse(input: &str) -> String {
        let mut chars = CharCursor::new(input, Path::new("test"));
        parse_string_literal(&mut chars, '"').unwrap()
    }

    #[test]
    fn string_literal_basic() {
        assert_eq!(parse(r#""Hello, world!""#), "Hello, world!");
    }

    #[test]
    fn string_literal_escaped_quotes() {
        assert_eq!(parse(r#""Hello, \"world\"!""#), "Hello, \"world\"!");
    }

    #[test]
    fn string_literal_escaped_newline() {
        assert_eq!(parse(r#""Hello, \nworld!""#), "Hello, \nworld!");
    }

    #[test]
    fn string_literal_unicode_escape() {
        assert_eq!(parse(r#""Hello, \u{1F600}world!""#), "Hello, 😀world!");
    }

    #[test]
    fn string_literal_single_quoted() {
        let mut chars = CharCursor::new("'single'", Path::new("test"));
        assert_eq!(parse_string_literal(&mut chars, '\'').unwrap(), "single");
    }

    #[test]
    fn string_literal_unterminated() {
        let mut chars = CharCursor::new(r#""oops"#, Path::new("test"));
        assert!(parse_string_literal(&mut chars, '"').is_err());
    }
}
