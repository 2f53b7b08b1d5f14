use std::fmt;

/// Concrete output encodings. `all` is a selection, not a format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReportFormat {
    Json,
    Csv,
    Sarif,
}

impl ReportFormat {
    pub const ALL: [ReportFormat; 3] = [ReportFormat::Json, ReportFormat::Csv, ReportFormat::Sarif];

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "json" => Some(ReportFormat::Json),
            "csv" => Some(ReportFormat::Csv),
            "sarif" => Some(ReportFormat::Sarif),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReportFormat::Json => "json",
            ReportFormat::Csv => "csv",
            ReportFormat::Sarif => "sarif",
        }
    }

    pub fn extension(self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown report format: {0} (expected json|csv|sarif|all)")]
pub struct UnknownFormat(pub String);

/// Expand format names (`all` included) into a de-duplicated list in canonical order.
pub fn formats_from_names<S: AsRef<str>>(names: &[S]) -> Result<Vec<ReportFormat>, UnknownFormat> {
    let mut wanted = [false; 3];
    for name in names {
        let name = name.as_ref();
        if name.trim().eq_ignore_ascii_case("all") {
            wanted = [true; 3];
            continue;
        }
        let format = ReportFormat::parse(name).ok_or_else(|| UnknownFormat(name.to_string()))?;
        wanted[format as usize] = true;
    }
    Ok(ReportFormat::ALL
        .into_iter()
        .zip(wanted)
        .filter_map(|(format, on)| on.then_some(format))
        .collect())
}
