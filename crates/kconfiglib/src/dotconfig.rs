//! `.config` file parsing.
//!
//! A `.config` file records user-selected values, one per line:
//!
//! ```text
//! CONFIG_FOO=y
//! CONFIG_BAR="a string"
//! # CONFIG_BAZ is not set
//! ```
//!
//! The `is not set` comment form records an explicit `n` for a bool or tristate symbol. All
//! other comments and blank lines are ignored.

use {
    crate::parser::{cache_path, KConfigError, Location},
    indexmap::IndexMap,
    std::{fs::read_to_string, path::Path},
};

/// The prefix applied to symbol names in `.config` files.
pub const CONFIG_PREFIX: &str = "CONFIG_";

const NOT_SET_SUFFIX: &str = " is not set";

/// A single entry in a `.config` file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DotConfigValue {
    /// An explicit `CONFIG_X=value` assignment.
    Set(String),

    /// A `# CONFIG_X is not set` comment. This records an explicit `n`, and is only valid
    /// for bool and tristate symbols.
    NotSet,
}

/// Read and parse the `.config` file at `filename`.
///
/// Returns the user-selected values keyed by symbol name (without the `CONFIG_` prefix), in
/// file order. If a symbol is assigned more than once, the last assignment wins.
pub fn load_dotconfig(filename: &Path) -> Result<IndexMap<String, DotConfigValue>, KConfigError> {
    let data = read_to_string(filename)?;
    parse_dotconfig(filename, &data)
}

/// Parse `.config` content that was read from `filename`.
pub fn parse_dotconfig(filename: &Path, data: &str) -> Result<IndexMap<String, DotConfigValue>, KConfigError> {
    let filename = cache_path(filename);
    let mut values = IndexMap::new();

    for (index, line) in data.lines().enumerate() {
        let location = Location {
            filename,
            line: index as u32 + 1,
            column: 1,
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(comment) = line.strip_prefix('#') {
            let comment = comment.trim();

            // `# CONFIG_FOO is not set` records an explicit n.
            if let Some(name) =
                comment.strip_prefix(CONFIG_PREFIX).and_then(|rest| rest.strip_suffix(NOT_SET_SUFFIX))
            {
                if is_symbol_name(name) {
                    values.insert(name.to_string(), DotConfigValue::NotSet);
                }
            }

            continue;
        }

        let Some(assignment) = line.strip_prefix(CONFIG_PREFIX) else {
            return Err(KConfigError::syntax(line, location));
        };

        let Some((name, value)) = assignment.split_once('=') else {
            return Err(KConfigError::syntax(line, location));
        };

        if !is_symbol_name(name) {
            return Err(KConfigError::syntax(line, location));
        }

        let value = if value.starts_with('"') {
            unquote(value, location)?
        } else {
            value.to_string()
        };

        values.insert(name.to_string(), DotConfigValue::Set(value));
    }

    Ok(values)
}

fn is_symbol_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Remove the surrounding double quotes from a `.config` string value and process `\"` and
/// `\\` escapes.
fn unquote(value: &str, location: Location) -> Result<String, KConfigError> {
    let inner = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .filter(|_| value.len() >= 2)
        .ok_or_else(|| KConfigError::syntax(value, location))?;

    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }

        match chars.next() {
            Some(escaped @ ('"' | '\\')) => result.push(escaped),
            _ => return Err(KConfigError::syntax(value, location)),
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use {
        super::{
            parse_dotconfig,
            DotConfigValue::{NotSet, Set},
        },
        std::path::Path,
        test_log::test,
    };

    #[test]
    fn basic_values() {
        let values = parse_dotconfig(
            Path::new(".config"),
            r#"
CONFIG_FOO=y
CONFIG_BAR="a string"
CONFIG_BAUD=115200
# CONFIG_BAZ is not set
"#,
        )
        .unwrap();

        assert_eq!(values.len(), 4);
        assert_eq!(values["FOO"], Set("y".into()));
        assert_eq!(values["BAR"], Set("a string".into()));
        assert_eq!(values["BAUD"], Set("115200".into()));
        assert_eq!(values["BAZ"], NotSet);

        let names: Vec<_> = values.keys().map(String::as_str).collect();
        assert_eq!(names, ["FOO", "BAR", "BAUD", "BAZ"]);
    }

    #[test]
    fn comments_and_blank_lines_ignored() {
        let values = parse_dotconfig(
            Path::new(".config"),
            "# Automatically generated file; DO NOT EDIT.\n\n# Some section header\nCONFIG_A=y\n",
        )
        .unwrap();

        assert_eq!(values.len(), 1);
        assert_eq!(values["A"], Set("y".into()));
    }

    #[test]
    fn last_assignment_wins() {
        let values = parse_dotconfig(Path::new(".config"), "CONFIG_A=y\nCONFIG_A=n\n").unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values["A"], Set("n".into()));
    }

    #[test]
    fn string_escapes() {
        let values = parse_dotconfig(Path::new(".config"), r#"CONFIG_S="say \"hi\" \\ bye""#).unwrap();
        assert_eq!(values["S"], Set(r#"say "hi" \ bye"#.into()));
    }

    #[test]
    fn malformed_lines() {
        assert!(parse_dotconfig(Path::new(".config"), "FOO=y\n").is_err());
        assert!(parse_dotconfig(Path::new(".config"), "CONFIG_FOO\n").is_err());
        assert!(parse_dotconfig(Path::new(".config"), "CONFIG_=y\n").is_err());
        assert!(parse_dotconfig(Path::new(".config"), "CONFIG_S=\"unterminated\n").is_err());
    }
}
