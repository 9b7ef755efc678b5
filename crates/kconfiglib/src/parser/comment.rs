use crate::parser::{CharCursor, Expected, KConfigError, Located};

/// Consume a `#` comment from the stream.
///
/// The stream must be pointing at a `#` character. This and the rest of the line, up to and
/// including the newline, will be consumed.
pub fn parse_comment(chars: &mut CharCursor) -> Result<(), KConfigError> {
    let Some(c) = chars.next() else {
        return Err(KConfigError::unexpected_eof(Expected::Any, chars.location()));
    };

    if c != '#' {
        return Err(KConfigError::unexpected(c, '#', chars.location()));
    }

    _ = chars.read_until('\n');
    _ = chars.next();
    Ok(())
}

#[cfg(test)]
mod tests {
    use {super::parse_comment, crate::parser::CharCursor, std::path::Path};

    #[test]
    fn comment_consumes_line() {
        let mut chars = CharCursor::new("# a comment\nconfig FOO", Path::new("test"));
        parse_comment(&mut chars).unwrap();
        assert_eq!(chars.peek(), Some('c'));
    }
}
