use std::fmt;
use std::path::Path;

/// Serialization of a policy document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PolicyFormat {
    #[default]
    Yaml,
    Json,
    Toml,
}

impl PolicyFormat {
    /// Infer from the file extension; anything unrecognized is YAML.
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or_default()
    }

    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "json" => PolicyFormat::Json,
            "toml" => PolicyFormat::Toml,
            _ => PolicyFormat::Yaml,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PolicyFormat::Yaml => "yaml",
            PolicyFormat::Json => "json",
            PolicyFormat::Toml => "toml",
        }
    }
}

impl fmt::Display for PolicyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
