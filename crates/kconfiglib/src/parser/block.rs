use {
    crate::parser::{
        Choice, Config, Expected, IfBlock, KConfigError, LineStream, LocString, Located, Menu, Source, Token,
    },
    std::path::Path,
};

/// A top-level Kconfig block.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Block {
    /// A `choice` block.
    Choice(Choice),

    /// A standalone `comment` entry.
    Comment(LocString),

    /// A `config` entry.
    Config(Config),

    /// An `if` block.
    If(IfBlock),

    /// A `mainmenu` entry.
    Mainmenu(LocString),

    /// A `menu` block.
    Menu(Menu),

    /// A `menuconfig` entry.
    MenuConfig(Config),

    /// A `source` statement (or one of its variants).
    Source(Source),
}

impl Block {
    /// Parse the next block from the line stream.
    ///
    /// Returns `Ok(None)` when the stream is exhausted.
    pub fn parse(lines: &mut LineStream, base_dir: &Path) -> Result<Option<Self>, KConfigError> {
        let Some(tokens) = lines.peek() else {
            return Ok(None);
        };

        let Some(cmd) = tokens.peek() else {
            panic!("Expected block command");
        };

        let block = match cmd.token {
            Token::Choice => Block::Choice(Choice::parse(lines)?),

            Token::Comment => {
                let Some(mut tokens) = lines.next() else {
                    unreachable!("line was just peeked");
                };
                let (_, comment) = tokens.read_cmd_str_lit(true)?;
                Block::Comment(comment)
            }

            Token::Config => Block::Config(Config::parse(lines)?),

            Token::If => Block::If(IfBlock::parse(lines, base_dir)?),

            Token::Mainmenu => {
                let Some(mut tokens) = lines.next() else {
                    unreachable!("line was just peeked");
                };
                let (_, title) = tokens.read_cmd_str_lit(true)?;
                Block::Mainmenu(title)
            }

            Token::Menu => Block::Menu(Menu::parse(lines, base_dir)?),

            Token::MenuConfig => Block::MenuConfig(Config::parse(lines)?),

            Token::ORSource | Token::OSource | Token::RSource | Token::Source => {
                let Some(mut tokens) = lines.next() else {
                    unreachable!("line was just peeked");
                };
                Block::Source(Source::parse(&mut tokens, base_dir)?)
            }

            _ => return Err(KConfigError::unexpected(cmd, Expected::Block, cmd.location())),
        };

        Ok(Some(block))
    }
}
