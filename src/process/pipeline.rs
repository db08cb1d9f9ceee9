//! Per-file extraction pipeline
//!
//! Bytes in, [`Report`] out:
//! - Decode the input (lossily; invalid UTF-8 never aborts a file)
//! - Apply the first `! fortdoc:` directive on top of the configured defines
//! - Run [`extract_source`] and wrap the unit with its path
//!
//! Reports are serialized with `serde_json`, either as one array on a writer
//! or as one `<stem>.json` file per input.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::Config;
use crate::directive::find_directive;
use crate::extract::extract_source;
use crate::model::SourceUnit;
use crate::Result;

/// Extraction result for one input
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Path as given on the command line, or `-` for stdin
    pub path: String,
    pub unit: SourceUnit,
}

/// Extract a source unit from raw file contents
#[must_use]
pub fn extract_bytes(contents: &[u8], config: &Config, source_name: &str) -> SourceUnit {
    let text = String::from_utf8_lossy(contents);

    let mut defines = config.defines();
    if let Some(overrides) = find_directive(&mut text.as_bytes()) {
        tracing::debug!(
            source = source_name,
            defines = ?overrides.defines,
            undefines = ?overrides.undefines,
            "applying file directive"
        );
        overrides.apply(&mut defines);
    }

    extract_source(&text, &defines)
}

/// Read and extract one file.
///
/// Returns `Ok(None)` when the file is skipped for exceeding
/// `config.max_file_size`.
pub fn extract_path(path: &Path, config: &Config) -> Result<Option<Report>> {
    // Check file size BEFORE reading to prevent memory exhaustion
    let file_size = std::fs::metadata(path)?.len();
    if file_size > config.max_file_size {
        tracing::warn!(
            "Skipping {} ({} bytes exceeds limit of {})",
            path.display(),
            file_size,
            config.max_file_size
        );
        return Ok(None);
    }

    let contents = std::fs::read(path)?;
    let source_name = path.display().to_string();
    let unit = extract_bytes(&contents, config, &source_name);

    Ok(Some(Report {
        path: source_name,
        unit,
    }))
}

/// Write all reports as one JSON array
pub fn write_reports<W: Write>(output: &mut W, reports: &[Report], pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *output, reports)?;
    } else {
        serde_json::to_writer(&mut *output, reports)?;
    }
    writeln!(output)?;
    Ok(())
}

/// Write one report as `<dir>/<stem>.json` and return the written path
pub fn write_report_file(dir: &Path, report: &Report, pretty: bool) -> Result<PathBuf> {
    let stem = Path::new(&report.path)
        .file_stem()
        .map_or_else(|| "stdin".to_string(), |s| s.to_string_lossy().into_owned());
    let target = dir.join(format!("{stem}.json"));

    let json = if pretty {
        serde_json::to_string_pretty(&report.unit)?
    } else {
        serde_json::to_string(&report.unit)?
    };
    std::fs::create_dir_all(dir)?;
    std::fs::write(&target, json + "\n")?;

    Ok(target)
}
