use {
    once_cell::sync::Lazy,
    std::{
        collections::HashSet,
        fmt::{Display, Formatter, Result as FmtResult},
        path::Path,
        sync::Mutex,
    },
};

/// Interned filenames for [`Location`] values.
///
/// Locations are attached to every token and expression, so they need to stay `Copy`. Interning
/// the filename lets us hand out a `&'static Path` instead of cloning a `PathBuf` per token.
static PATH_CACHE: Lazy<Mutex<HashSet<&'static Path>>> = Lazy::new(|| Mutex::new(HashSet::new()));

/// Return an interned copy of `path` with static lifetime.
pub(crate) fn cache_path(path: &Path) -> &'static Path {
    let mut cache = PATH_CACHE.lock().unwrap_or_else(|e| e.into_inner());
    if let Some(existing) = cache.get(path) {
        return existing;
    }

    let interned: &'static Path = Box::leak(path.to_path_buf().into_boxed_path());
    cache.insert(interned);
    interned
}

/// Location information for items in a Kconfig file.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Location {
    /// The file in which the item is located.
    pub filename: &'static Path,

    /// The line number of the item (1-based).
    pub line: u32,

    /// The column number of the item (1-based).
    pub column: u32,
}

impl Location {
    /// Create a location pointing at the start of the given file.
    pub fn start_of(filename: &Path) -> Self {
        Self {
            filename: cache_path(filename),
            line: 1,
            column: 1,
        }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} {}:{}", self.filename.display(), self.line, self.column)
    }
}

/// A trait for items that carry location information.
pub trait Located {
    /// Returns the location of this item.
    fn location(&self) -> Location;
}

/// An owned string with a location.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LocString {
    /// The string value.
    pub value: String,

    /// The location of the string.
    pub location: Location,
}

impl LocString {
    /// Create a new located string.
    pub fn new(value: String, location: Location) -> Self {
        Self {
            value,
            location,
        }
    }

    /// Returns the string value as a `&str`.
    #[inline(always)]
    pub fn as_str(&self) -> &str {
        self.value.as_str()
    }
}

impl Located for LocString {
    fn location(&self) -> Location {
        self.location
    }
}

impl Display for LocString {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.value)
    }
}

/// A borrowed string with a location.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LocStr<'a> {
    /// The string value.
    pub value: &'a str,

    /// The location of the string.
    pub location: Location,
}

impl<'a> LocStr<'a> {
    /// Create a new located string slice.
    pub fn new(value: &'a str, location: Location) -> Self {
        Self {
            value,
            location,
        }
    }

    /// Convert this into an owned [`LocString`].
    pub fn to_loc_string(&self) -> LocString {
        LocString::new(self.value.to_string(), self.location)
    }
}

impl Located for LocStr<'_> {
    fn location(&self) -> Location {
        self.location
    }
}
