use crate::parser::{CharCursor, Expected, KConfigError, Located};

/// Parse a decimal, hexadecimal, or octal integer literal from the stream.
pub(crate) fn parse_integer_literal(chars: &mut CharCursor) -> Result<i64, KConfigError> {
    let start = chars.location();

    let Some(c) = chars.peek() else {
        return Err(KConfigError::unexpected_eof(Expected::Any, start));
    };

    if c == '+' || c == '-' {
        parse_decimal_literal(chars)
    } else if chars.starts_with("0x") || chars.starts_with("0X") {
        parse_hex_literal(chars)
    } else if chars.starts_with('0') {
        parse_octal_literal(chars)
    } else if !c.is_ascii_digit() {
        Err(KConfigError::unexpected(c, Expected::IntegerLiteral, start))
    } else {
        parse_decimal_literal(chars)
    }
}

fn parse_decimal_literal(chars: &mut CharCursor) -> Result<i64, KConfigError> {
    let mut literal = String::new();
    let start = chars.location();

    let Some(c) = chars.peek() else {
        return Err(KConfigError::unexpected_eof(Expected::IntegerLiteral, start));
    };

    if c == '+' || c == '-' {
        literal.push(c);
        _ = chars.next();
    }

    while let Some(c) = chars.peek() {
        if c.is_ascii_digit() {
            literal.push(c);
            _ = chars.next();
        } else {
            break;
        }
    }

    literal.parse().map_err(|_| KConfigError::invalid_integer(literal, start))
}

fn parse_hex_literal(chars: &mut CharCursor) -> Result<i64, KConfigError> {
    let mut literal = String::new();
    let start = chars.location();

    // Skip the "0x"/"0X" prefix; the caller has verified it.
    let radix_char = match (chars.next(), chars.next()) {
        (Some('0'), Some(c)) if c == 'x' || c == 'X' => c,
        _ => return Err(KConfigError::unexpected_eof(Expected::IntegerLiteral, start)),
    };

    while let Some(c) = chars.peek() {
        if c.is_ascii_hexdigit() {
            literal.push(c);
            _ = chars.next();
        } else {
            break;
        }
    }

    if literal.is_empty() {
        return Err(KConfigError::invalid_integer(format!("0{radix_char}"), start));
    }

    i64::from_str_radix(&literal, 16)
        .map_err(|_| KConfigError::invalid_integer(format!("0{radix_char}{literal}"), start))
}

fn parse_octal_literal(chars: &mut CharCursor) -> Result<i64, KConfigError> {
    let mut literal = String::new();
    let start = chars.location();

    let Some(c) = chars.next() else {
        return Err(KConfigError::unexpected_eof(Expected::IntegerLiteral, start));
    };

    if c != '0' {
        return Err(KConfigError::unexpected(c, Expected::IntegerLiteral, start));
    }

    while let Some(c) = chars.peek() {
        if ('0'..='7').contains(&c) {
            literal.push(c);
            _ = chars.next();
        } else {
            break;
        }
    }

    if literal.is_empty() {
        return Ok(0);
    }

    i64::from_str_radix(&literal, 8).map_err(|_| KConfigError::invalid_integer(format!("0{literal}"), start))
}

#[cfg(test)]
mod tests {
    use {super::parse_integer_literal, crate::parser::CharCursor, std::path::Path};

    fn parse(input: &str) -> i64 {
        let mut chars = CharCursor::new(input, Path::new("test"));
        parse_integer_literal(&mut chars).unwrap()
    }

    #[test]
    fn integer_decimal() {
        assert_eq!(parse("1234"), 1234);
        assert_eq!(parse("+55"), 55);
        assert_eq!(parse("-777"), -777);
    }

    #[test]
    fn integer_hex() {
        assert_eq!(parse("0x1e3"), 0x1e3);
        assert_eq!(parse("0XFF"), 255);
    }

    #[test]
    fn integer_octal() {
        assert_eq!(parse("0777"), 0o777);
        assert_eq!(parse("0"), 0);
    }

    #[test]
    fn integer_invalid() {
        let mut chars = CharCursor::new("0xZZ", Path::new("test"));
        assert!(parse_integer_literal(&mut chars).is_err());
    }
}
