use {
    crate::parser::{Block, Expected, KConfigError, LineStream, LocExpr, LocString, Located, Token},
    std::path::Path,
};

/// A menu block in a Kconfig file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Menu {
    /// The prompt for the menu.
    pub prompt: LocString,

    /// The items in the menu.
    pub blocks: Vec<Block>,

    /// Dependencies for this menu from `depends on` statements. These propagate onto every
    /// entry in the menu.
    pub depends_on: Vec<LocExpr>,

    /// Visibility of the menu prompt from `visible if` statements. If `None`, the menu is
    /// visible by default.
    pub visibility: Option<LocExpr>,

    /// Comments for the menu.
    pub comments: Vec<LocString>,
}

impl Menu {
    /// Parse a menu block, from the `menu` line through the matching `endmenu`.
    pub fn parse(lines: &mut LineStream, base_dir: &Path) -> Result<Self, KConfigError> {
        let Some(mut tokens) = lines.next() else {
            panic!("Expected menu block");
        };

        let (blk_cmd, prompt) = tokens.read_cmd_str_lit(true)?;
        assert_eq!(blk_cmd.token, Token::Menu);

        let mut last_loc = prompt.location();
        let mut blocks = Vec::new();
        let mut depends_on = Vec::new();
        let mut visibility = None;
        let mut comments = Vec::new();

        loop {
            let Some(tokens) = lines.peek() else {
                return Err(KConfigError::unexpected_eof(Expected::EndMenu, last_loc));
            };

            let Some(cmd) = tokens.peek() else {
                panic!("Expected menu entry");
            };

            last_loc = cmd.location();

            match cmd.token {
                Token::EndMenu => {
                    _ = lines.next();
                    break;
                }

                Token::Comment => {
                    let Some(mut tokens) = lines.next() else {
                        unreachable!("line was just peeked");
                    };
                    let (cmd, comment) = tokens.read_cmd_str_lit(true)?;
                    assert_eq!(cmd.token, Token::Comment);
                    comments.push(comment);
                }

                Token::Depends => {
                    let Some(mut tokens) = lines.next() else {
                        unreachable!("line was just peeked");
                    };
                    let depends = LocExpr::parse_depends_on(&mut tokens)?;
                    depends_on.push(depends);
                }

                Token::Visible => {
                    let Some(mut tokens) = lines.next() else {
                        unreachable!("line was just peeked");
                    };
                    let vis = LocExpr::parse_visible_if(&mut tokens)?;
                    visibility = Some(vis);
                }

                _ => {
                    let Some(block) = Block::parse(lines, base_dir)? else {
                        return Err(KConfigError::unexpected_eof(Expected::EndMenu, last_loc));
                    };

                    blocks.push(block);
                }
            }
        }

        Ok(Self {
            prompt,
            blocks,
            depends_on,
            visibility,
            comments,
        })
    }
}
