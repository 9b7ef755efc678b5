//! Kconfig language parser.
//!
//! The parser works in two stages: [`tokenize`] splits the raw text into lines of
//! [`LocToken`]s, then [`Block::parse`] consumes lines to build the block tree. Locations are
//! tracked throughout so errors can point at the offending file, line, and column.

mod block;
mod choice;
mod comment;
mod config;
mod cursor;
mod error;
mod expr;
mod ifblock;
mod integer;
mod location;
mod menu;
mod prompt;
mod source;
mod string_literal;
mod token;
mod types;
mod whitespace;

pub(crate) use location::cache_path;
pub use {
    block::Block,
    choice::{Choice, ChoiceDefault},
    config::{Config, ConfigDefault, ConfigRange, ConfigTarget},
    cursor::{tokenize, CharCursor, CharPredicate, LineStream, LineStreamExt, TokenLine},
    error::{Expected, KConfigError, KConfigErrorKind},
    expr::{Expr, LocExpr},
    ifblock::IfBlock,
    location::{LocStr, LocString, Located, Location},
    menu::Menu,
    prompt::Prompt,
    source::Source,
    string_literal::parse_string_literal,
    token::{LocToken, Token},
    types::{LitValue, LocLitValue, Tristate, Type},
};

use std::{
    fs::read_to_string,
    path::Path,
};

/// A parsed Kconfig file: the sequence of top-level blocks in the order they appear.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct KconfigFile {
    /// The blocks found in the file.
    pub blocks: Vec<Block>,
}

impl KconfigFile {
    /// Read and parse the Kconfig file at `filename`.
    ///
    /// Non-relative `source` statements in the file are resolved against `base_dir`.
    pub fn parse_filename(filename: &Path, base_dir: &Path) -> Result<Self, KConfigError> {
        let data = read_to_string(filename)?;
        Self::parse_str(filename, base_dir, &data)
    }

    /// Parse Kconfig content that was read from `filename`.
    pub fn parse_str(filename: &Path, base_dir: &Path, data: &str) -> Result<Self, KConfigError> {
        let lines = tokenize(CharCursor::new(data, filename))?;
        let mut lines = lines.lines();

        let mut blocks = Vec::new();
        while let Some(block) = Block::parse(&mut lines, base_dir)? {
            blocks.push(block);
        }

        Ok(Self {
            blocks,
        })
    }
}

#[cfg(test)]
mod tests {
    use {
        crate::parser::{Block, KconfigFile, Type},
        std::path::Path,
    };

    fn parse(data: &str) -> KconfigFile {
        KconfigFile::parse_str(Path::new("myfile"), Path::new("/base"), data).unwrap()
    }

    #[test]
    fn mainmenu_block() {
        let kconfig = parse("\nmainmenu \"This is the main menu\"\n");
        assert_eq!(kconfig.blocks.len(), 1);

        let Block::Mainmenu(title) = &kconfig.blocks[0] else {
            panic!("Expected mainmenu block: {:?}", kconfig.blocks[0]);
        };
        assert_eq!(title.as_str(), "This is the main menu");
    }

    #[test]
    fn source_blocks() {
        let kconfig = parse(
            r#"
source "/tmp/required"
osource "/tmp/optional"
rsource "relative"
orsource "relative_optional"
"#,
        );
        assert_eq!(kconfig.blocks.len(), 4);

        let expected = [
            ("/tmp/required", false, false),
            ("/tmp/optional", true, false),
            ("relative", false, true),
            ("relative_optional", true, true),
        ];

        for (block, (filename, optional, relative)) in kconfig.blocks.iter().zip(expected) {
            let Block::Source(source) = block else {
                panic!("Expected source block: {block:?}");
            };

            assert_eq!(source.filename.as_str(), filename);
            assert_eq!(source.optional, optional);
            assert_eq!(source.relative, relative);

            if relative {
                // "myfile" has no parent directory component.
                assert_eq!(source.base_dir, Path::new(""));
            } else {
                assert_eq!(source.base_dir, Path::new("/base"));
            }
        }
    }

    #[test]
    fn config_block() {
        let kconfig = parse(
            r#"
config FOO
    bool "Enable foo"
    default y
    depends on BAR
    help
        This is the help text for FOO.

        It spans multiple lines.
"#,
        );
        assert_eq!(kconfig.blocks.len(), 1);

        let Block::Config(config) = &kconfig.blocks[0] else {
            panic!("Expected config block: {:?}", kconfig.blocks[0]);
        };

        assert_eq!(config.name.as_str(), "FOO");
        assert_eq!(config.r#type, Type::Bool);
        assert_eq!(config.prompt.as_ref().unwrap().title.as_str(), "Enable foo");
        assert_eq!(config.defaults.len(), 1);
        assert_eq!(config.depends_on.len(), 1);
        assert!(config.help.as_ref().unwrap().as_str().contains("multiple lines"));
    }

    #[test]
    fn menuconfig_and_menu_blocks() {
        let kconfig = parse(
            r#"
menuconfig TOP
    bool "Top level"

menu "Submenu"
    depends on TOP

    config NESTED
        string "A nested value"
endmenu
"#,
        );
        assert_eq!(kconfig.blocks.len(), 2);

        let Block::MenuConfig(config) = &kconfig.blocks[0] else {
            panic!("Expected menuconfig block: {:?}", kconfig.blocks[0]);
        };
        assert_eq!(config.name.as_str(), "TOP");

        let Block::Menu(menu) = &kconfig.blocks[1] else {
            panic!("Expected menu block: {:?}", kconfig.blocks[1]);
        };
        assert_eq!(menu.prompt.as_str(), "Submenu");
        assert_eq!(menu.depends_on.len(), 1);
        assert_eq!(menu.blocks.len(), 1);
    }

    #[test]
    fn choice_block() {
        let kconfig = parse(
            r#"
choice
    prompt "Pick one"
    default SECOND

    config FIRST
        bool "First"

    config SECOND
        bool "Second"
endchoice
"#,
        );
        assert_eq!(kconfig.blocks.len(), 1);

        let Block::Choice(choice) = &kconfig.blocks[0] else {
            panic!("Expected choice block: {:?}", kconfig.blocks[0]);
        };

        assert!(choice.name.is_none());
        assert_eq!(choice.prompt.as_ref().unwrap().title.as_str(), "Pick one");
        assert_eq!(choice.configs.len(), 2);
        assert_eq!(choice.defaults.len(), 1);
        assert_eq!(choice.defaults[0].target.as_str(), "SECOND");
    }

    #[test]
    fn if_block() {
        let kconfig = parse(
            r#"
if PLATFORM_A || PLATFORM_B
    config OPTION
        tristate "An option"
        default m
endif
"#,
        );
        assert_eq!(kconfig.blocks.len(), 1);

        let Block::If(if_block) = &kconfig.blocks[0] else {
            panic!("Expected if block: {:?}", kconfig.blocks[0]);
        };
        assert_eq!(if_block.items.len(), 1);

        let Block::Config(config) = &if_block.items[0] else {
            panic!("Expected config block: {:?}", if_block.items[0]);
        };
        assert_eq!(config.name.as_str(), "OPTION");
        assert_eq!(config.r#type, Type::Tristate);
    }
}
