use {
    crate::parser::{Located, Location},
    std::fmt::{Display, Formatter, Result as FmtResult},
};

/// Symbol/choice types.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Type {
    #[default]
    Unknown,
    Bool,
    Tristate,
    String,
    Int,
    Hex,
}

impl Type {
    /// Indicates whether this is a boolean-like type (`bool` or `tristate`).
    #[inline(always)]
    pub fn is_bool_like(&self) -> bool {
        matches!(self, Type::Bool | Type::Tristate)
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Type::Unknown => write!(f, "unknown"),
            Type::Bool => write!(f, "bool"),
            Type::Tristate => write!(f, "tristate"),
            Type::String => write!(f, "string"),
            Type::Int => write!(f, "int"),
            Type::Hex => write!(f, "hex"),
        }
    }
}

/// A tristate value.
///
/// This takes on `false`, `maybe`, or `true`, corresponding with `n`, `m`, and `y`, respectively.
/// The derived ordering (`False < Maybe < True`) is the Kconfig ordering: `&&` takes the minimum
/// and `||` the maximum of its operands.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum Tristate {
    /// `false` (`n`) tristate value.
    False,

    /// `maybe` (`m`) tristate value.
    Maybe,

    /// `true` (`y`) tristate value.
    True,
}

impl Tristate {
    /// Kconfig negation: `y` becomes `n`, `n` becomes `y`, and `m` stays `m`.
    #[inline(always)]
    pub fn not(self) -> Self {
        match self {
            Self::False => Self::True,
            Self::Maybe => Self::Maybe,
            Self::True => Self::False,
        }
    }

    /// Returns the `.config` representation of this value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::False => "n",
            Self::Maybe => "m",
            Self::True => "y",
        }
    }

    /// Interpret a resolved symbol value as a tristate.
    ///
    /// `y` and `m` map to their tristate values; everything else, including the empty string,
    /// is `n`.
    pub fn from_str_value(value: &str) -> Self {
        match value {
            "y" => Self::True,
            "m" => Self::Maybe,
            _ => Self::False,
        }
    }
}

impl From<bool> for Tristate {
    #[inline(always)]
    fn from(value: bool) -> Self {
        if value {
            Self::True
        } else {
            Self::False
        }
    }
}

impl Display for Tristate {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Literal value data.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LitValue {
    /// Integer value.
    Int(i64),

    /// String value.
    String(String),

    /// Symbol.
    Symbol(String),

    /// Tristate value.
    Tristate(Tristate),
}

/// A literal value with a location.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LocLitValue {
    /// The literal value.
    pub value: LitValue,

    /// The location of the literal value.
    pub location: Location,
}

impl LocLitValue {
    /// Create a new `LocLitValue` from the given literal value and location.
    #[inline(always)]
    pub fn new(value: LitValue, location: Location) -> Self {
        Self {
            value,
            location,
        }
    }
}

impl Located for LocLitValue {
    fn location(&self) -> Location {
        self.location
    }
}

#[cfg(test)]
mod tests {
    use super::Tristate;

    #[test]
    fn tristate_ordering() {
        assert!(Tristate::False < Tristate::Maybe);
        assert!(Tristate::Maybe < Tristate::True);
        assert_eq!(Tristate::True.min(Tristate::Maybe), Tristate::Maybe);
        assert_eq!(Tristate::False.max(Tristate::Maybe), Tristate::Maybe);
    }

    #[test]
    fn tristate_negation() {
        assert_eq!(Tristate::True.not(), Tristate::False);
        assert_eq!(Tristate::Maybe.not(), Tristate::Maybe);
        assert_eq!(Tristate::False.not(), Tristate::True);
    }

    #[test]
    fn tristate_from_str_value() {
        assert_eq!(Tristate::from_str_value("y"), Tristate::True);
        assert_eq!(Tristate::from_str_value("m"), Tristate::Maybe);
        assert_eq!(Tristate::from_str_value("n"), Tristate::False);
        assert_eq!(Tristate::from_str_value(""), Tristate::False);
        assert_eq!(Tristate::from_str_value("hello"), Tristate::False);
    }
}
