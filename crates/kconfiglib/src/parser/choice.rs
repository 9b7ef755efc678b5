use crate::parser::{
    Config, Expected, KConfigError, LineStream, LocExpr, LocString, Located, Prompt, Token, TokenLine,
};

/// Choice entry.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Choice {
    /// The name of the choice, if it has one.
    pub name: Option<LocString>,

    /// Optional prompt for the choice.
    pub prompt: Option<Prompt>,

    /// Optional help text for the choice.
    pub help: Option<LocString>,

    /// Possible symbols for the choice, represented as [`Config`] entries.
    pub configs: Vec<Config>,

    /// Default values for the choice.
    pub defaults: Vec<ChoiceDefault>,

    /// Dependencies for this choice from `depends on` statements.
    pub depends_on: Vec<LocExpr>,

    /// Whether the choice is `optional` (no member has to be selected).
    pub optional: bool,
}

/// A possible default for a choice entry.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ChoiceDefault {
    /// The name of the member to choose for this default.
    pub target: LocString,

    /// An optional condition for this default. If unspecified, this is equivalent to `y` (always
    /// true).
    pub condition: Option<LocExpr>,
}

impl Choice {
    /// Parse a choice block, from the `choice` line through the matching `endchoice`.
    pub fn parse(lines: &mut LineStream) -> Result<Self, KConfigError> {
        let Some(mut tokens) = lines.next() else {
            panic!("Expected choice block");
        };

        let Some(blk_cmd) = tokens.next() else {
            panic!("Expected choice command");
        };
        assert_eq!(blk_cmd.token, Token::Choice);

        // The name is optional; `choice` may appear bare.
        let name = match tokens.next() {
            None => None,
            Some(token) => {
                let Some(name) = token.symbol_value() else {
                    return Err(KConfigError::unexpected(token, Expected::Symbol, token.location()));
                };

                if let Some(unexpected) = tokens.next() {
                    return Err(KConfigError::unexpected(unexpected, Expected::Eol, unexpected.location()));
                }

                Some(name.to_loc_string())
            }
        };

        let mut prompt = None;
        let mut help = None;
        let mut configs = Vec::new();
        let mut defaults = Vec::new();
        let mut depends_on = Vec::new();
        let mut optional = false;
        let mut last_loc = name.as_ref().map(Located::location).unwrap_or_else(|| blk_cmd.location());

        loop {
            let Some(tokens) = lines.peek() else {
                return Err(KConfigError::unexpected_eof(Expected::EndChoice, last_loc));
            };

            let Some(cmd) = tokens.peek() else {
                panic!("Expected choice entry");
            };

            last_loc = cmd.location();

            match cmd.token {
                Token::EndChoice => {
                    _ = lines.next();
                    break;
                }

                Token::Config => {
                    let config = Config::parse(lines)?;
                    configs.push(config);
                }

                Token::Default => {
                    let Some(mut tokens) = lines.next() else {
                        unreachable!("line was just peeked");
                    };
                    let default = ChoiceDefault::parse(&mut tokens)?;
                    defaults.push(default);
                }

                Token::Depends => {
                    let Some(mut tokens) = lines.next() else {
                        unreachable!("line was just peeked");
                    };
                    let depends = LocExpr::parse_depends_on(&mut tokens)?;
                    depends_on.push(depends);
                }

                Token::Help => {
                    let Some(mut tokens) = lines.next() else {
                        unreachable!("line was just peeked");
                    };
                    help = Some(tokens.read_help()?);
                }

                Token::Optional => {
                    _ = lines.next();
                    optional = true;
                }

                // The prompt is sometimes erroneously specified for the choice as `bool "prompt"`
                // or `tristate "prompt"`. We handle it here to avoid a parse error.
                Token::Prompt | Token::Bool | Token::Tristate => {
                    let Some(mut tokens) = lines.next() else {
                        unreachable!("line was just peeked");
                    };
                    let cmd = match tokens.next() {
                        Some(cmd) => cmd,
                        None => unreachable!("token was just peeked"),
                    };
                    prompt = Some(Prompt::parse(cmd.location(), &mut tokens)?);
                }

                _ => return Err(KConfigError::unexpected(cmd, Expected::Block, cmd.location())),
            }
        }

        Ok(Choice {
            name,
            prompt,
            help,
            configs,
            defaults,
            depends_on,
            optional,
        })
    }
}

impl ChoiceDefault {
    /// Parse the remainder of a `default` line within a choice block.
    pub fn parse(tokens: &mut TokenLine) -> Result<Self, KConfigError> {
        let (cmd, target) = tokens.read_cmd_sym(false)?;
        assert_eq!(cmd.token, Token::Default);

        let condition = tokens.read_if_expr(true)?;

        Ok(Self {
            target,
            condition,
        })
    }
}
