use {
    crate::parser::{
        cache_path, comment::parse_comment, integer::parse_integer_literal, string_literal::parse_string_literal,
        token::parse_keyword_or_symbol, whitespace::parse_hws0, Expected, KConfigError, LocExpr, LocString, LocToken,
        Located, Location, Token,
    },
    std::{iter::FusedIterator, ops::Deref, path::Path},
};

/// An iterator over a string slice from a file that returns characters and can peek at the next
/// character.
///
/// This is more powerful than `Peekable<Chars>`:
/// * It can peek without consuming, and peek past the next character.
/// * [`&str`][str] methods such as [`starts_with()`][str::starts_with()] can be used on the
///   remainder via [`Deref`][Deref].
/// * It tracks the current [`Location`] in the file.
#[derive(Clone, Debug)]
pub struct CharCursor<'buf> {
    base: &'buf str,
    offset: usize,
    location: Location,
}

impl<'buf> CharCursor<'buf> {
    /// Create a new cursor over a string slice read from `filename`.
    pub fn new(base: &'buf str, filename: &Path) -> Self {
        Self {
            base,
            offset: 0,
            location: Location {
                filename: cache_path(filename),
                line: 1,
                column: 1,
            },
        }
    }

    /// Returns the underlying string.
    #[inline(always)]
    pub fn base_str(&self) -> &'buf str {
        self.base
    }

    /// Returns the current byte offset in the string.
    #[inline(always)]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns true if there are no more bytes to read.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.offset >= self.base.len()
    }

    /// Peek at the next character in the string.
    #[inline(always)]
    pub fn peek(&self) -> Option<char> {
        self.base[self.offset..].chars().next()
    }

    /// Peek at the nth character in the string.
    #[inline(always)]
    pub fn peek_at(&self, n: usize) -> Option<char> {
        self.base[self.offset..].chars().nth(n)
    }

    /// Advances the cursor by the given number of bytes.
    ///
    /// Panics if `n` is not a character boundary or runs past the end of the string.
    pub fn advance(&mut self, n: usize) {
        let target = self.offset + n;
        assert!(target <= self.base.len(), "{n} advances past the end of the string");

        while self.offset < target {
            let Some(c) = self.peek() else {
                unreachable!("target was checked against the string length");
            };
            self.bump(c);
        }

        assert_eq!(self.offset, target, "{n} does not advance to a char boundary");
    }

    /// Read characters until the given predicate returns true or the end of the string is reached.
    pub fn read_until(&mut self, predicate: impl CharPredicate) -> &'buf str {
        let start = self.offset;

        while let Some(c) = self.peek() {
            if predicate.matches(c) {
                break;
            }

            self.bump(c);
        }

        &self.base[start..self.offset]
    }

    /// Consume `c` (the character at the cursor), updating the location.
    fn bump(&mut self, c: char) {
        self.offset += c.len_utf8();
        if c == '\n' {
            self.location.line += 1;
            self.location.column = 1;
        } else {
            self.location.column += 1;
        }
    }
}

impl Located for CharCursor<'_> {
    fn location(&self) -> Location {
        self.location
    }
}

impl Deref for CharCursor<'_> {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.base[self.offset..]
    }
}

impl Iterator for CharCursor<'_> {
    type Item = char;

    fn next(&mut self) -> Option<Self::Item> {
        let c = self.peek()?;
        self.bump(c);
        Some(c)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let max = self.base.len() - self.offset;
        let min = (max + 3) / 4;
        (min, Some(max))
    }
}

impl FusedIterator for CharCursor<'_> {}

/// A trait for predicates that match characters.
pub trait CharPredicate {
    /// Returns true if the character matches the predicate.
    fn matches(&self, c: char) -> bool;
}

impl<F> CharPredicate for F
where
    F: Fn(char) -> bool,
{
    fn matches(&self, c: char) -> bool {
        self(c)
    }
}

impl CharPredicate for char {
    fn matches(&self, c: char) -> bool {
        *self == c
    }
}

/// An iterator over lines of tokens that can peek ahead at the next line without consuming it.
pub struct LineStream<'buf> {
    base: &'buf [Vec<LocToken>],
    offset: usize,
}

impl<'buf> LineStream<'buf> {
    /// Peek at the next line in the stream.
    #[inline(always)]
    pub fn peek(&self) -> Option<TokenLine<'buf>> {
        self.base.get(self.offset).map(|line| TokenLine::new(line))
    }
}

impl<'buf> Iterator for LineStream<'buf> {
    type Item = TokenLine<'buf>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = self.peek()?;
        self.offset += 1;
        Some(line)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.base.len() - self.offset;
        (n, Some(n))
    }
}

impl FusedIterator for LineStream<'_> {}

/// An extension trait for `&[Vec<LocToken>]` that provides `lines()`.
pub trait LineStreamExt {
    /// Return a [`LineStream`] iterator over the slice.
    fn lines(&self) -> LineStream;
}

impl LineStreamExt for [Vec<LocToken>] {
    fn lines(&self) -> LineStream {
        LineStream {
            base: self,
            offset: 0,
        }
    }
}

/// An iterator over a single line of tokens that can peek ahead at the next token without
/// consuming it.
#[derive(Debug)]
pub struct TokenLine<'buf> {
    base: &'buf [LocToken],
    offset: usize,
}

impl<'buf> TokenLine<'buf> {
    /// Create a new `TokenLine` from the given slice of tokens.
    pub fn new(base: &'buf [LocToken]) -> Self {
        Self {
            base,
            offset: 0,
        }
    }

    /// Returns true if there are no more tokens to read.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.offset >= self.base.len()
    }

    /// Peek at the next token in the line.
    #[inline(always)]
    pub fn peek(&self) -> Option<&'buf LocToken> {
        self.base.get(self.offset)
    }

    /// Read a command followed by a symbol from the line.
    pub fn read_cmd_sym(&mut self, require_eol: bool) -> Result<(&'buf LocToken, LocString), KConfigError> {
        let Some(cmd) = self.next() else {
            panic!("Expected keyword");
        };

        let Some(name) = self.next() else {
            return Err(KConfigError::missing(Expected::Symbol, cmd.location()));
        };

        let Some(name) = name.symbol_value() else {
            return Err(KConfigError::unexpected(name, Expected::Symbol, name.location()));
        };

        if require_eol {
            if let Some(unexpected) = self.next() {
                return Err(KConfigError::unexpected(unexpected, Expected::Eol, unexpected.location()));
            }
        }

        Ok((cmd, name.to_loc_string()))
    }

    /// Read a command followed by a string literal from the line.
    pub fn read_cmd_str_lit(&mut self, require_eol: bool) -> Result<(&'buf LocToken, LocString), KConfigError> {
        let Some(cmd) = self.next() else {
            panic!("Expected keyword");
        };

        let Some(str_lit) = self.next() else {
            return Err(KConfigError::missing(Expected::StringLiteral, cmd.location()));
        };

        let Some(str_lit) = str_lit.string_literal_value() else {
            return Err(KConfigError::unexpected(str_lit, Expected::StringLiteral, str_lit.location()));
        };

        if require_eol {
            if let Some(unexpected) = self.next() {
                return Err(KConfigError::unexpected(unexpected, Expected::Eol, unexpected.location()));
            }
        }

        Ok((cmd, str_lit.to_loc_string()))
    }

    /// Read an `if <expr>` expression, if present.
    pub fn read_if_expr(&mut self, require_eol: bool) -> Result<Option<LocExpr>, KConfigError> {
        let Some(if_token) = self.next() else {
            return Ok(None);
        };

        if if_token.token != Token::If {
            return Err(KConfigError::unexpected(if_token, Expected::IfOrEol, if_token.location()));
        }

        let expr = LocExpr::parse(if_token.location(), self)?;

        if require_eol {
            if let Some(unexpected) = self.next() {
                return Err(KConfigError::unexpected(unexpected, Expected::Eol, unexpected.location()));
            }
        }

        Ok(Some(expr))
    }

    /// Read the help text from a `help` block.
    ///
    /// This is tokenized as [`Token::Help`] followed by a [`Token::StrLit`].
    pub fn read_help(&mut self) -> Result<LocString, KConfigError> {
        let Some(cmd) = self.next() else {
            panic!("Expected help keyword");
        };

        if cmd.token != Token::Help {
            return Err(KConfigError::unexpected(cmd, Expected::Help, cmd.location()));
        }

        let Some(text) = self.next() else {
            return Err(KConfigError::missing(Expected::StringLiteral, cmd.location()));
        };

        let Some(text) = text.string_literal_value() else {
            return Err(KConfigError::unexpected(text, Expected::StringLiteral, text.location()));
        };

        if let Some(unexpected) = self.peek() {
            return Err(KConfigError::unexpected(unexpected, Expected::Eol, unexpected.location()));
        }

        Ok(text.to_loc_string())
    }
}

impl<'buf> Iterator for TokenLine<'buf> {
    type Item = &'buf LocToken;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.peek()?;
        self.offset += 1;
        Some(token)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.base.len() - self.offset;
        (n, Some(n))
    }
}

impl FusedIterator for TokenLine<'_> {}

/// Tokenize the input stream into lines of tokens.
pub fn tokenize(mut chars: CharCursor) -> Result<Vec<Vec<LocToken>>, KConfigError> {
    let mut lines = vec![];

    loop {
        let line = parse_line(&mut chars)?;
        if line.is_empty() {
            break;
        }

        lines.push(line);
    }

    Ok(lines)
}

/// Parse the next non-empty line from the stream.
///
/// This returns an empty vector if EOF is reached without parsing any tokens.
pub fn parse_line(chars: &mut CharCursor) -> Result<Vec<LocToken>, KConfigError> {
    'outer: loop {
        let mut tokens = vec![];

        loop {
            let Some(c) = chars.peek() else {
                // EOF reached. Return what we have.
                return Ok(tokens);
            };

            match c {
                '#' | '\n' => {
                    if c == '#' {
                        parse_comment(chars)?;
                    } else {
                        _ = chars.next();
                    }

                    if tokens.is_empty() {
                        // This line is empty; continue parsing from the next line.
                        continue 'outer;
                    } else if tokens.len() == 1 && tokens[0].token == Token::Help {
                        // This is a help block. Parse the help text and return it as a string
                        // literal.
                        let start = chars.location();
                        tokens.push(LocToken::new(Token::StrLit(read_help_block(chars)?), start));
                        return Ok(tokens);
                    } else {
                        return Ok(tokens);
                    }
                }

                '"' | '\'' => {
                    let start = chars.location();
                    let s = parse_string_literal(chars, c)?;
                    tokens.push(LocToken::new(Token::StrLit(s), start));
                }

                '+' | '-' | '0'..='9' => {
                    let start = chars.location();
                    let value = parse_integer_literal(chars)?;
                    tokens.push(LocToken::new(Token::IntLit(value), start));
                }

                c if c.is_whitespace() => {
                    _ = chars.next();
                }

                c if c.is_alphabetic() || c == '_' => {
                    let token = parse_keyword_or_symbol(chars)?;
                    tokens.push(token);
                }

                '&' if chars.starts_with("&&") => {
                    let start = chars.location();
                    chars.advance(2);
                    tokens.push(LocToken::new(Token::And, start));
                }

                '|' if chars.starts_with("||") => {
                    let start = chars.location();
                    chars.advance(2);
                    tokens.push(LocToken::new(Token::Or, start));
                }

                '=' => {
                    let start = chars.location();
                    _ = chars.next();
                    tokens.push(LocToken::new(Token::Eq, start));
                }

                '!' => {
                    let start = chars.location();
                    _ = chars.next();
                    let op = if chars.peek() == Some('=') {
                        _ = chars.next();
                        Token::Ne
                    } else {
                        Token::Not
                    };

                    tokens.push(LocToken::new(op, start));
                }

                '(' => {
                    let start = chars.location();
                    _ = chars.next();
                    tokens.push(LocToken::new(Token::LParen, start));
                }

                ')' => {
                    let start = chars.location();
                    _ = chars.next();
                    tokens.push(LocToken::new(Token::RParen, start));
                }

                '<' => {
                    let start = chars.location();
                    _ = chars.next();
                    let op = if chars.peek() == Some('=') {
                        _ = chars.next();
                        Token::Le
                    } else {
                        Token::Lt
                    };

                    tokens.push(LocToken::new(op, start));
                }

                '>' => {
                    let start = chars.location();
                    _ = chars.next();
                    let op = if chars.peek() == Some('=') {
                        _ = chars.next();
                        Token::Ge
                    } else {
                        Token::Gt
                    };

                    tokens.push(LocToken::new(op, start));
                }

                '\\' if chars.starts_with("\\\n") => {
                    // Line continuation. Skip the backslash and newline.
                    chars.advance(2);
                }

                _ => return Err(KConfigError::syntax(c, chars.location())),
            }
        }
    }
}

/// Read a help block from the stream.
///
/// The first line of the help block determines the indentation level of the rest of the block.
/// The block continues until a non-empty line is found that is indented less than the first line.
fn read_help_block(chars: &mut CharCursor) -> Result<String, KConfigError> {
    let mut help = String::new();

    // Get the indentation level of the first line.
    let indent = parse_hws0(chars)?;

    if indent.is_empty() {
        let start = chars.location();
        let c = chars.peek().map(|c| c.to_string()).unwrap_or_else(|| "<EOF>".to_string());
        return Err(KConfigError::unexpected(c, Expected::Whitespace, start));
    }

    help.push_str(chars.read_until('\n'));

    while !chars.is_empty() {
        if chars.starts_with(indent) {
            // This line is indented with the first line. Add it to the help text.
            chars.advance(indent.len());
            help.push_str(chars.read_until('\n'));
        } else if chars.starts_with('\n') {
            // Empty line. Add it to the help text.
            _ = chars.next();
            help.push('\n');
        } else {
            // This line is indented less than the first line. Stop parsing help text.
            break;
        }
    }

    Ok(help)
}
