use {
    crate::parser::{Expected, KConfigError, LocToken, Located, Location, Token, TokenLine},
    std::fmt::{Display, Formatter, Result as FmtResult},
};

/// An expression in the Kconfig language.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Expr {
    /// Named symbol (terminal).
    Symbol(String),

    /// String constant (terminal).
    Str(String),

    /// Integer constant (terminal).
    Integer(i64),

    /// Unary negation.
    Not(Box<LocExpr>),

    /// Boolean AND.
    And(Box<LocExpr>, Box<LocExpr>),

    /// Boolean OR.
    Or(Box<LocExpr>, Box<LocExpr>),

    /// Equality comparison.
    Eq(Box<LocExpr>, Box<LocExpr>),

    /// Inequality comparison.
    Ne(Box<LocExpr>, Box<LocExpr>),

    /// Less-than comparison.
    Lt(Box<LocExpr>, Box<LocExpr>),

    /// Less-than-or-equal comparison.
    Le(Box<LocExpr>, Box<LocExpr>),

    /// Greater-than comparison.
    Gt(Box<LocExpr>, Box<LocExpr>),

    /// Greater-than-or-equal comparison.
    Ge(Box<LocExpr>, Box<LocExpr>),
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::Symbol(s) => f.write_str(s),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Not(e) => write!(f, "!({e})"),
            Self::And(a, b) => write!(f, "({a} && {b})"),
            Self::Or(a, b) => write!(f, "({a} || {b})"),
            Self::Eq(a, b) => write!(f, "({a} = {b})"),
            Self::Ne(a, b) => write!(f, "({a} != {b})"),
            Self::Lt(a, b) => write!(f, "({a} < {b})"),
            Self::Le(a, b) => write!(f, "({a} <= {b})"),
            Self::Gt(a, b) => write!(f, "({a} > {b})"),
            Self::Ge(a, b) => write!(f, "({a} >= {b})"),
        }
    }
}

/// An expression with location information.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LocExpr {
    /// The expression.
    pub expr: Expr,

    /// The location of the expression.
    pub location: Location,
}

impl LocExpr {
    /// Create a new located expression.
    pub fn new(expr: Expr, location: Location) -> Self {
        Self {
            expr,
            location,
        }
    }

    /// Parse an expression from the remainder of a token line.
    ///
    /// `prev` is the location of the token preceding the expression; it is used to report an
    /// empty expression.
    ///
    /// Operator precedence, from loosest to tightest binding: `||`, `&&`, `!`, comparisons.
    pub fn parse(prev: Location, tokens: &mut TokenLine) -> Result<Self, KConfigError> {
        parse_or(prev, tokens)
    }

    /// Parse a `depends on <expr>` line, including the leading keywords.
    pub fn parse_depends_on(tokens: &mut TokenLine) -> Result<Self, KConfigError> {
        let Some(cmd) = tokens.next() else {
            panic!("Expected depends command");
        };
        assert_eq!(cmd.token, Token::Depends);

        let Some(on_token) = tokens.next() else {
            return Err(KConfigError::missing(Expected::On, cmd.location()));
        };

        if on_token.token != Token::On {
            return Err(KConfigError::unexpected(on_token, Expected::On, on_token.location()));
        }

        let expr = Self::parse(on_token.location(), tokens)?;

        if let Some(unexpected) = tokens.next() {
            return Err(KConfigError::unexpected(unexpected, Expected::Eol, unexpected.location()));
        }

        Ok(expr)
    }

    /// Parse a `visible if <expr>` line, including the leading keywords.
    pub fn parse_visible_if(tokens: &mut TokenLine) -> Result<Self, KConfigError> {
        let Some(cmd) = tokens.next() else {
            panic!("Expected visible command");
        };
        assert_eq!(cmd.token, Token::Visible);

        let Some(if_token) = tokens.next() else {
            return Err(KConfigError::missing(Expected::IfOrEol, cmd.location()));
        };

        if if_token.token != Token::If {
            return Err(KConfigError::unexpected(if_token, Expected::IfOrEol, if_token.location()));
        }

        let expr = Self::parse(if_token.location(), tokens)?;

        if let Some(unexpected) = tokens.next() {
            return Err(KConfigError::unexpected(unexpected, Expected::Eol, unexpected.location()));
        }

        Ok(expr)
    }

    /// Returns true if this expression is a terminal (symbol or constant).
    pub fn is_terminal(&self) -> bool {
        matches!(self.expr, Expr::Symbol(_) | Expr::Str(_) | Expr::Integer(_))
    }
}

impl Located for LocExpr {
    fn location(&self) -> Location {
        self.location
    }
}

impl Display for LocExpr {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        Display::fmt(&self.expr, f)
    }
}

fn parse_or(prev: Location, tokens: &mut TokenLine) -> Result<LocExpr, KConfigError> {
    let mut lhs = parse_and(prev, tokens)?;

    while matches!(tokens.peek(), Some(t) if t.token == Token::Or) {
        let op = next_token(tokens);
        let rhs = parse_and(op.location(), tokens)?;
        let location = lhs.location();
        lhs = LocExpr::new(Expr::Or(Box::new(lhs), Box::new(rhs)), location);
    }

    Ok(lhs)
}

fn parse_and(prev: Location, tokens: &mut TokenLine) -> Result<LocExpr, KConfigError> {
    let mut lhs = parse_unary(prev, tokens)?;

    while matches!(tokens.peek(), Some(t) if t.token == Token::And) {
        let op = next_token(tokens);
        let rhs = parse_unary(op.location(), tokens)?;
        let location = lhs.location();
        lhs = LocExpr::new(Expr::And(Box::new(lhs), Box::new(rhs)), location);
    }

    Ok(lhs)
}

fn parse_unary(prev: Location, tokens: &mut TokenLine) -> Result<LocExpr, KConfigError> {
    if matches!(tokens.peek(), Some(t) if t.token == Token::Not) {
        let op = next_token(tokens);
        let inner = parse_unary(op.location(), tokens)?;
        return Ok(LocExpr::new(Expr::Not(Box::new(inner)), op.location()));
    }

    parse_comparison(prev, tokens)
}

fn parse_comparison(prev: Location, tokens: &mut TokenLine) -> Result<LocExpr, KConfigError> {
    let lhs = parse_term(prev, tokens)?;

    let op = match tokens.peek() {
        Some(t) if matches!(t.token, Token::Eq | Token::Ne | Token::Lt | Token::Le | Token::Gt | Token::Ge) => {
            next_token(tokens)
        }
        _ => return Ok(lhs),
    };

    let rhs = parse_term(op.location(), tokens)?;
    let location = lhs.location();
    let lhs = Box::new(lhs);
    let rhs = Box::new(rhs);

    let expr = match op.token {
        Token::Eq => Expr::Eq(lhs, rhs),
        Token::Ne => Expr::Ne(lhs, rhs),
        Token::Lt => Expr::Lt(lhs, rhs),
        Token::Le => Expr::Le(lhs, rhs),
        Token::Gt => Expr::Gt(lhs, rhs),
        Token::Ge => Expr::Ge(lhs, rhs),
        _ => unreachable!("comparison operator was just matched"),
    };

    Ok(LocExpr::new(expr, location))
}

fn parse_term(prev: Location, tokens: &mut TokenLine) -> Result<LocExpr, KConfigError> {
    let Some(token) = tokens.next() else {
        return Err(KConfigError::missing(Expected::Expr, prev));
    };

    match &token.token {
        Token::LParen => {
            let inner = parse_or(token.location(), tokens)?;

            let Some(rparen) = tokens.next() else {
                return Err(KConfigError::missing(Expected::RParen, inner.location()));
            };

            if rparen.token != Token::RParen {
                return Err(KConfigError::unexpected(rparen, Expected::RParen, rparen.location()));
            }

            Ok(inner)
        }
        Token::Symbol(s) => Ok(LocExpr::new(Expr::Symbol(s.clone()), token.location())),
        Token::StrLit(s) => Ok(LocExpr::new(Expr::Str(s.clone()), token.location())),
        Token::IntLit(i) => Ok(LocExpr::new(Expr::Integer(*i), token.location())),
        _ => Err(KConfigError::unexpected(token, Expected::Expr, token.location())),
    }
}

fn next_token<'buf>(tokens: &mut TokenLine<'buf>) -> &'buf LocToken {
    let Some(token) = tokens.next() else {
        unreachable!("token was just peeked");
    };
    token
}

#[cfg(test)]
mod tests {
    use {
        super::{Expr, LocExpr},
        crate::parser::{tokenize, CharCursor, LineStreamExt, Location},
        std::path::Path,
    };

    fn parse(input: &str) -> LocExpr {
        let lines = tokenize(CharCursor::new(input, Path::new("test"))).unwrap();
        let mut line = lines.lines().next().unwrap();
        let start = Location::start_of(Path::new("test"));
        let expr = LocExpr::parse(start, &mut line).unwrap();
        assert!(line.is_empty(), "trailing tokens after expression");
        expr
    }

    #[test]
    fn expr_single_symbol() {
        let expr = parse("FOO");
        assert_eq!(expr.expr, Expr::Symbol("FOO".to_string()));
    }

    #[test]
    fn expr_precedence() {
        // && binds tighter than ||.
        let expr = parse("A || B && C");
        let Expr::Or(lhs, rhs) = &expr.expr else {
            panic!("Expected Or at the top: {expr}");
        };
        assert_eq!(lhs.expr, Expr::Symbol("A".to_string()));
        assert!(matches!(&rhs.expr, Expr::And(_, _)));
    }

    #[test]
    fn expr_parens_override_precedence() {
        let expr = parse("(A || B) && C");
        let Expr::And(lhs, rhs) = &expr.expr else {
            panic!("Expected And at the top: {expr}");
        };
        assert!(matches!(&lhs.expr, Expr::Or(_, _)));
        assert_eq!(rhs.expr, Expr::Symbol("C".to_string()));
    }

    #[test]
    fn expr_comparison() {
        let expr = parse("IDF_TARGET = \"esp32\"");
        let Expr::Eq(lhs, rhs) = &expr.expr else {
            panic!("Expected Eq at the top: {expr}");
        };
        assert_eq!(lhs.expr, Expr::Symbol("IDF_TARGET".to_string()));
        assert_eq!(rhs.expr, Expr::Str("esp32".to_string()));
    }

    #[test]
    fn expr_not_and_comparisons() {
        let expr = parse("x && !(i != 100) || j >= -55");
        assert!(matches!(&expr.expr, Expr::Or(_, _)));
    }
}
