use crate::parser::{CharCursor, Expected, KConfigError, Located};

/// Consume zero or more characters of horizontal whitespace, returning the consumed slice.
///
/// Escaped newlines (backslash followed by whitespace) are treated as horizontal whitespace.
pub fn parse_hws0<'a>(chars: &mut CharCursor<'a>) -> Result<&'a str, KConfigError> {
    // Remember where we started.
    let start = chars.offset();

    loop {
        match chars.peek() {
            Some('\\') => {
                let Some(c) = chars.peek_at(1) else {
                    return Err(KConfigError::unexpected_eof(Expected::Any, chars.location()));
                };

                if c.is_whitespace() {
                    _ = chars.next();
                    _ = chars.next();
                } else {
                    break;
                }
            }
            Some(c) if c.is_whitespace() && c != '\n' => {
                _ = chars.next();
            }
            _ => break,
        }
    }

    // Return the slice of the original string that we consumed.
    let end = chars.offset();
    Ok(&chars.base_str()[start..end])
}

#[cfg(test)]
mod tests {
    use {super::parse_hws0, crate::parser::CharCursor, std::path::Path};

    #[test]
    fn hws_stops_at_newline() {
        let mut chars = CharCursor::new("  \t \nnext", Path::new("test"));
        let consumed = parse_hws0(&mut chars).unwrap();
        assert_eq!(consumed, "  \t ");
        assert_eq!(chars.peek(), Some('\n'));
    }

    #[test]
    fn hws_empty() {
        let mut chars = CharCursor::new("config", Path::new("test"));
        let consumed = parse_hws0(&mut chars).unwrap();
        assert!(consumed.is_empty());
    }
}
