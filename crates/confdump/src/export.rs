//! Loading, resolving, and serializing the configuration.

use {
    crate::{Options, OutputFormat},
    indexmap::IndexMap,
    kconfiglib::{parser::KConfigError, Kconfig, SystemContext},
    std::{
        error::Error,
        fmt::{Display, Formatter, Result as FmtResult},
        fs::File,
        io::{stdout, Error as IoError, Write},
        path::{Path, PathBuf},
    },
};

/// An error that occurred while exporting the configuration.
#[derive(Debug)]
pub(crate) enum ExportError {
    /// Failed to load or resolve the Kconfig tree or the `.config` file.
    KConfig(KConfigError),

    /// Failed to write the output file.
    Io(IoError),

    /// Failed to serialize the values as JSON.
    Json(serde_json::Error),

    /// Failed to serialize the values as TOML.
    Toml(toml::ser::Error),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::KConfig(e) => Display::fmt(e, f),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Json(e) => write!(f, "JSON serialization error: {e}"),
            Self::Toml(e) => write!(f, "TOML serialization error: {e}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::KConfig(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Toml(e) => Some(e),
        }
    }
}

impl From<KConfigError> for ExportError {
    fn from(e: KConfigError) -> Self {
        Self::KConfig(e)
    }
}

impl From<IoError> for ExportError {
    fn from(e: IoError) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<toml::ser::Error> for ExportError {
    fn from(e: toml::ser::Error) -> Self {
        Self::Toml(e)
    }
}

/// Load the Kconfig tree and `.config` file, resolve all symbol values, and write the
/// non-empty ones to the output.
///
/// Both inputs are loaded and rendered before the output file is created, so a failed export
/// leaves no output file behind.
pub(crate) fn run(options: &Options) -> Result<(), ExportError> {
    let base_dir = match &options.base_dir {
        Some(dir) => dir.clone(),
        None => parent_dir(&options.kconfig),
    };

    let mut kconfig = Kconfig::load(&options.kconfig, &base_dir, &SystemContext)?;
    kconfig.load_config(&options.dotconfig)?;

    let values = collect_values(&kconfig);
    let rendered = render(options.format, &values)?;

    let output = options.output.clone().unwrap_or_else(|| PathBuf::from(options.format.default_output()));

    if output == Path::new("-") {
        stdout().write_all(rendered.as_bytes())?;
    } else {
        let mut file = File::create(&output)?;
        file.write_all(rendered.as_bytes())?;
        log::info!("Wrote {} values to {}", values.len(), output.display());
    }

    Ok(())
}

/// Resolve every symbol and keep the ones with non-empty values, in definition order.
fn collect_values(kconfig: &Kconfig) -> IndexMap<String, String> {
    kconfig.str_values().into_iter().filter(|(_, value)| !value.is_empty()).collect()
}

fn render(format: OutputFormat, values: &IndexMap<String, String>) -> Result<String, ExportError> {
    let mut rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(values)?,
        OutputFormat::Toml => toml::to_string(values)?,
    };

    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }

    Ok(rendered)
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use {
        super::run,
        crate::{Options, OutputFormat},
        std::{fs, path::Path},
        tempfile::TempDir,
    };

    const KCONFIG: &str = r#"
mainmenu "Test configuration"

config ALPHA
    string "Alpha"
    default "one"

config EMPTY
    string "Empty"

config GAMMA
    bool "Gamma"
    default y

config COUNT
    int "Count"
    default 7
"#;

    fn setup(dotconfig: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Kconfig"), KCONFIG).unwrap();
        fs::write(dir.path().join(".config"), dotconfig).unwrap();
        dir
    }

    fn options(dir: &Path, format: OutputFormat, output: &str) -> Options {
        Options {
            kconfig: dir.join("Kconfig"),
            dotconfig: dir.join(".config"),
            base_dir: None,
            format,
            output: Some(dir.join(output)),
        }
    }

    #[test_log::test]
    fn json_export_filters_empty_values() {
        let dir = setup("");
        run(&options(dir.path(), OutputFormat::Json, "config.json")).unwrap();

        let rendered = fs::read_to_string(dir.path().join("config.json")).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        let object = parsed.as_object().unwrap();

        assert_eq!(object["ALPHA"], "one");
        assert_eq!(object["GAMMA"], "y");
        assert_eq!(object["COUNT"], "7");
        assert!(!object.contains_key("EMPTY"));

        // Definition order is preserved in the output.
        assert!(rendered.find("ALPHA").unwrap() < rendered.find("GAMMA").unwrap());
        assert!(rendered.find("GAMMA").unwrap() < rendered.find("COUNT").unwrap());
    }

    #[test_log::test]
    fn toml_export() {
        let dir = setup("");
        run(&options(dir.path(), OutputFormat::Toml, "config.toml")).unwrap();

        let rendered = fs::read_to_string(dir.path().join("config.toml")).unwrap();
        let parsed: toml::Table = toml::from_str(&rendered).unwrap();

        assert_eq!(parsed["ALPHA"].as_str().unwrap(), "one");
        assert_eq!(parsed["GAMMA"].as_str().unwrap(), "y");
        assert!(!parsed.contains_key("EMPTY"));
    }

    #[test_log::test]
    fn dotconfig_values_override_defaults() {
        let dir = setup("CONFIG_ALPHA=\"two\"\n# CONFIG_GAMMA is not set\n");
        run(&options(dir.path(), OutputFormat::Json, "config.json")).unwrap();

        let rendered = fs::read_to_string(dir.path().join("config.json")).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(parsed["ALPHA"], "two");
        assert_eq!(parsed["GAMMA"], "n");
    }

    #[test_log::test]
    fn empty_string_assignment_is_omitted() {
        let kconfig = "config A\n    string \"A\"\n\nconfig B\n    string \"B\"\n\nconfig C\n    string \"C\"\n";
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Kconfig"), kconfig).unwrap();
        fs::write(dir.path().join(".config"), "CONFIG_A=\"1\"\nCONFIG_B=\"\"\nCONFIG_C=\"hello\"\n").unwrap();

        run(&options(dir.path(), OutputFormat::Json, "config.json")).unwrap();

        let rendered = fs::read_to_string(dir.path().join("config.json")).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        let object = parsed.as_object().unwrap();

        assert_eq!(object.len(), 2);
        assert_eq!(object["A"], "1");
        assert_eq!(object["C"], "hello");
        assert!(!object.contains_key("B"));
    }

    #[test_log::test]
    fn all_empty_values_export_empty_document() {
        let kconfig = "config A\n    string \"A\"\n\nconfig B\n    string \"B\"\n";
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Kconfig"), kconfig).unwrap();
        fs::write(dir.path().join(".config"), "").unwrap();

        run(&options(dir.path(), OutputFormat::Json, "config.json")).unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("config.json")).unwrap(), "{}\n");

        run(&options(dir.path(), OutputFormat::Toml, "config.toml")).unwrap();
        let rendered = fs::read_to_string(dir.path().join("config.toml")).unwrap();
        let parsed: toml::Table = toml::from_str(&rendered).unwrap();
        assert!(parsed.is_empty());
    }

    #[test_log::test]
    fn repeated_export_is_identical() {
        let dir = setup("CONFIG_ALPHA=\"two\"\n");
        let options = options(dir.path(), OutputFormat::Json, "config.json");

        run(&options).unwrap();
        let first = fs::read(dir.path().join("config.json")).unwrap();

        run(&options).unwrap();
        let second = fs::read(dir.path().join("config.json")).unwrap();

        assert_eq!(first, second);
    }

    #[test_log::test]
    fn missing_kconfig_creates_no_output() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".config"), "").unwrap();

        let options = Options {
            kconfig: dir.path().join("no-such-Kconfig"),
            dotconfig: dir.path().join(".config"),
            base_dir: None,
            format: OutputFormat::Json,
            output: Some(dir.path().join("config.json")),
        };

        run(&options).unwrap_err();
        assert!(!dir.path().join("config.json").exists());
    }

    #[test_log::test]
    fn missing_dotconfig_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Kconfig"), KCONFIG).unwrap();

        let options = Options {
            kconfig: dir.path().join("Kconfig"),
            dotconfig: dir.path().join("no-such-config"),
            base_dir: None,
            format: OutputFormat::Json,
            output: Some(dir.path().join("config.json")),
        };

        run(&options).unwrap_err();
        assert!(!dir.path().join("config.json").exists());
    }
}
