//! Kconfig parsing and evaluation crate.
//!
//! This crate loads a Kconfig definition tree, overlays the user selections recorded in a
//! `.config` file, and resolves every symbol to its string value:
//!
//! ```no_run
//! use {kconfiglib::{Kconfig, SystemContext}, std::path::Path};
//!
//! # fn main() -> Result<(), kconfiglib::parser::KConfigError> {
//! let mut kconfig = Kconfig::load(Path::new("Kconfig"), Path::new("."), &SystemContext)?;
//! kconfig.load_config(Path::new(".config"))?;
//!
//! for (name, value) in kconfig.str_values() {
//!     println!("{name}={value}");
//! }
//! # Ok(())
//! # }
//! ```
#![warn(clippy::all)]
#![allow(clippy::result_large_err)]
#![warn(missing_docs)]

mod context;
mod dotconfig;
mod symtab;

pub mod parser;
pub use {
    context::{Context, SystemContext},
    dotconfig::{load_dotconfig, parse_dotconfig, DotConfigValue, CONFIG_PREFIX},
    parser::{Tristate, Type},
    symtab::{Kconfig, Symbol},
};
