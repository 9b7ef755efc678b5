use {
    crate::parser::{Block, Expected, KConfigError, LineStream, LocExpr, Located, Token},
    std::path::Path,
};

/// A conditional inclusion block.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IfBlock {
    /// The condition for the block.
    pub condition: LocExpr,

    /// The items in the block.
    pub items: Vec<Block>,
}

impl IfBlock {
    /// Parse a conditional inclusion block, from the `if` line through the matching `endif`.
    pub fn parse(lines: &mut LineStream, base_dir: &Path) -> Result<Self, KConfigError> {
        let Some(mut tokens) = lines.next() else {
            panic!("Expected if block");
        };

        let Some(if_token) = tokens.next() else {
            panic!("Expected if command");
        };
        assert_eq!(if_token.token, Token::If);

        let condition = LocExpr::parse(if_token.location(), &mut tokens)?;

        if let Some(unexpected) = tokens.next() {
            return Err(KConfigError::unexpected(unexpected, Expected::Eol, unexpected.location()));
        }

        let mut items = Vec::new();
        let mut last_loc = condition.location();

        loop {
            let Some(tokens) = lines.peek() else {
                return Err(KConfigError::unexpected_eof(Expected::EndIf, last_loc));
            };

            let Some(cmd) = tokens.peek() else {
                panic!("Expected if entry");
            };

            last_loc = cmd.location();

            match cmd.token {
                Token::EndIf => {
                    _ = lines.next();
                    break;
                }
                _ => {
                    let Some(block) = Block::parse(lines, base_dir)? else {
                        return Err(KConfigError::unexpected_eof(Expected::EndIf, last_loc));
                    };

                    items.push(block);
                }
            }
        }

        Ok(Self {
            condition,
            items,
        })
    }
}
