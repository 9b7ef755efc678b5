use {
    crate::{
        context::context_closure,
        parser::{KConfigError, LocString, Located, Token, TokenLine},
        Context,
    },
    shellexpand::env_with_context,
    std::{
        env::VarError,
        path::{Path, PathBuf},
    },
};

/// A `source` statement and its variants.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Source {
    /// The filename to read.
    pub filename: LocString,

    /// Whether the source statement is optional (`osource` or `orsource`).
    pub optional: bool,

    /// Whether the filename is relative to the current Kconfig file (`rsource` or `orsource`).
    pub relative: bool,

    /// The directory that relative filenames are resolved against.
    pub base_dir: PathBuf,
}

impl Source {
    /// Parse a source line.
    pub fn parse(tokens: &mut TokenLine, base_dir: &Path) -> Result<Self, KConfigError> {
        let (cmd, filename) = tokens.read_cmd_str_lit(true)?;

        let optional = matches!(cmd.token, Token::OSource | Token::ORSource);
        let relative = matches!(cmd.token, Token::RSource | Token::ORSource);

        let base_dir = if relative {
            filename.location().filename.parent().unwrap_or_else(|| Path::new("/"))
        } else {
            base_dir
        }
        .to_path_buf();

        Ok(Source {
            filename,
            optional,
            relative,
            base_dir,
        })
    }

    /// Expand `${VAR}` references in the filename using the given context and resolve it against
    /// the base directory.
    pub fn resolve_path<C>(&self, context: &C) -> Result<PathBuf, KConfigError>
    where
        C: Context,
    {
        let expanded = match env_with_context(self.filename.as_str(), context_closure(context)) {
            Ok(s) => s,
            Err(e) => {
                return Err(match e.cause {
                    VarError::NotPresent => KConfigError::unknown_env(e.var_name, self.filename.location()),
                    VarError::NotUnicode(_) => KConfigError::invalid_env(e.var_name, self.filename.location()),
                })
            }
        };

        Ok(self.base_dir.join(expanded.as_ref()))
    }
}
