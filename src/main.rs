//! fortdoc - Source-model extraction for Fortran documentation

#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::io::{self, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use fortdoc::process::{extract_bytes, extract_path, write_report_file, write_reports, Report};
use fortdoc::{parse_args, CliArgs, Config, Result};
use glob::Pattern;
use rayon::prelude::*;
use walkdir::WalkDir;

fn main() -> Result<()> {
    let args = parse_args();
    init_logging(&args);

    let use_stdin =
        args.inputs.is_empty() || (args.inputs.len() == 1 && args.inputs[0].as_os_str() == "-");

    // No inputs on an interactive terminal: print usage instead of waiting on stdin
    if args.inputs.is_empty() && io::stdin().is_terminal() {
        print_usage();
        return Ok(());
    }

    if use_stdin {
        let config = build_config(&args, None)?;
        return process_stdin(&config, &args);
    }

    // An explicit config file applies to every input; otherwise each file
    // discovers its own
    let base_config = match &args.config {
        Some(_) => Some(build_config(&args, None)?),
        None => None,
    };

    if let Some(jobs) = args.jobs {
        if jobs > 0 {
            if let Err(e) = rayon::ThreadPoolBuilder::new()
                .num_threads(jobs)
                .build_global()
            {
                tracing::warn!("failed to configure thread pool: {e}");
            }
        }
    }

    // Walking needs extensions/excludes/recursion; take them from the first input's config
    let walk_config = match &base_config {
        Some(config) => config.clone(),
        None => build_config(&args, args.inputs.first().map(PathBuf::as_path))?,
    };
    let files = collect_files(&args.inputs, &walk_config);

    if files.is_empty() {
        tracing::warn!("No Fortran files found.");
        return Ok(());
    }

    let reports = if args.jobs == Some(1) {
        process_files_sequential(&files, base_config.as_ref(), &args)
    } else {
        process_files_parallel(&files, base_config.as_ref(), &args)
    };

    emit_reports(&reports, &args, walk_config.pretty)
}

/// Install the `tracing` subscriber; all diagnostics go to stderr
fn init_logging(args: &CliArgs) {
    let level = if args.debug {
        tracing::Level::DEBUG
    } else if args.silent {
        tracing::Level::WARN
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Build configuration from CLI args and config files
///
/// If `for_path` is provided and no explicit config file is specified,
/// uses auto-discovery to find config files in parent directories.
fn build_config(args: &CliArgs, for_path: Option<&Path>) -> Result<Config> {
    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Using explicit config file: {}", config_path.display());
        Config::from_toml_file(config_path)?
    } else {
        let start = match for_path {
            Some(path) => path.to_path_buf(),
            None => std::env::current_dir()?,
        };
        let discovered = Config::discover_config_files(&start);
        if discovered.is_empty() {
            tracing::debug!("No config files discovered for: {}", start.display());
        } else {
            for f in &discovered {
                tracing::debug!("Discovered config file: {}", f.display());
            }
        }
        Config::from_discovered_files(&start)
    };

    args.apply_to(&mut config);
    tracing::debug!(?config, "effective configuration");

    if let Some(error) = config.validate() {
        anyhow::bail!("Invalid configuration: {error}");
    }

    Ok(config)
}

/// Collect all files to process, handling directories and the recursive flag
fn collect_files(inputs: &[PathBuf], config: &Config) -> Vec<PathBuf> {
    let exclude_patterns: Vec<Pattern> = config
        .exclude
        .iter()
        .filter_map(|p| Pattern::new(p).ok())
        .collect();
    let extensions = &config.fortran_extensions;

    let mut files = Vec::new();

    for input in inputs {
        if input.is_file() {
            // Explicit files are taken whatever their extension
            if !is_excluded(input, &exclude_patterns) {
                files.push(input.clone());
            }
        } else if input.is_dir() {
            let max_depth = if config.recursive { 256 } else { 1 };
            // WalkDir reports symlink loops as errors; those entries are skipped
            let mut found: Vec<PathBuf> = WalkDir::new(input)
                .follow_links(true)
                .max_depth(max_depth)
                .into_iter()
                .filter_map(std::result::Result::ok)
                .map(walkdir::DirEntry::into_path)
                .filter(|path| {
                    path.is_file()
                        && is_fortran_file(path, extensions)
                        && !is_excluded(path, &exclude_patterns)
                })
                .collect();
            found.sort();
            files.extend(found);
        } else {
            tracing::warn!("{} does not exist, skipped", input.display());
        }
    }

    files
}

/// Check if a path matches any exclusion pattern
fn is_excluded(path: &Path, patterns: &[Pattern]) -> bool {
    if patterns.is_empty() {
        return false;
    }

    let path_str = path.to_string_lossy();

    patterns.iter().any(|pattern| {
        // Full path, then each component (covers file and directory names)
        pattern.matches(&path_str)
            || path.components().any(|component| match component {
                std::path::Component::Normal(c) => pattern.matches(&c.to_string_lossy()),
                _ => false,
            })
    })
}

/// Check if a file has one of the configured Fortran extensions
fn is_fortran_file(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e == ext))
}

/// Extract one file with either the shared config or its own discovered one
fn process_single_file(
    path: &Path,
    base_config: Option<&Config>,
    args: &CliArgs,
) -> Result<Option<Report>> {
    let discovered;
    let config = match base_config {
        Some(config) => config,
        None => {
            discovered = build_config(args, Some(path))?;
            &discovered
        }
    };

    tracing::info!("Extracting: {}", path.display());
    extract_path(path, config)
}

/// Process files one at a time (`--jobs 1`)
fn process_files_sequential(
    files: &[PathBuf],
    base_config: Option<&Config>,
    args: &CliArgs,
) -> Vec<Report> {
    let mut reports = Vec::new();
    let mut errors = 0usize;

    for path in files {
        match process_single_file(path, base_config, args) {
            Ok(Some(report)) => reports.push(report),
            Ok(None) => {}
            Err(e) => {
                errors += 1;
                tracing::error!("Error extracting {}: {e}", path.display());
            }
        }
    }

    log_summary(reports.len(), errors);
    reports
}

/// Process files in parallel using Rayon; report order follows `files`
fn process_files_parallel(
    files: &[PathBuf],
    base_config: Option<&Config>,
    args: &CliArgs,
) -> Vec<Report> {
    let error_count = AtomicUsize::new(0);

    let reports: Vec<Report> = files
        .par_iter()
        .filter_map(|path| match process_single_file(path, base_config, args) {
            Ok(report) => report,
            Err(e) => {
                error_count.fetch_add(1, Ordering::Relaxed);
                tracing::error!("Error extracting {}: {e}", path.display());
                None
            }
        })
        .collect();

    log_summary(reports.len(), error_count.load(Ordering::Relaxed));
    reports
}

fn log_summary(success: usize, errors: usize) {
    if errors == 0 {
        tracing::info!("Extracted {success} files successfully.");
    } else {
        tracing::warn!("Extracted {success} files, {errors} errors.");
    }
}

/// Print reports to stdout, or write them into `--output`
fn emit_reports(reports: &[Report], args: &CliArgs, pretty: bool) -> Result<()> {
    match &args.output {
        Some(dir) => {
            for report in reports {
                let written = write_report_file(dir, report, pretty)?;
                tracing::debug!("Wrote {}", written.display());
            }
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write_reports(&mut handle, reports, pretty)?;
            handle.flush()?;
        }
    }
    Ok(())
}

/// Process input from stdin
fn process_stdin(config: &Config, args: &CliArgs) -> Result<()> {
    let mut stdin_contents = Vec::new();
    io::stdin().read_to_end(&mut stdin_contents)?;

    // Check size after reading to prevent processing extremely large input
    let stdin_size = u64::try_from(stdin_contents.len()).unwrap_or(u64::MAX);
    if stdin_size > config.max_file_size {
        anyhow::bail!(
            "stdin input too large ({stdin_size} bytes exceeds limit of {})",
            config.max_file_size
        );
    }

    let report = Report {
        path: "-".to_string(),
        unit: extract_bytes(&stdin_contents, config, "stdin"),
    };
    emit_reports(&[report], args, config.pretty)?;

    tracing::info!("Extracted stdin successfully.");
    Ok(())
}

fn print_usage() {
    println!(
        "fortdoc v{} - Fortran source-model extractor",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("Extracts modules, derived types, procedures, arguments and");
    println!("interfaces from Fortran sources and prints them as JSON.");
    println!();
    println!("Usage:");
    println!("  fortdoc [OPTIONS] <FILE>...");
    println!("  fortdoc [OPTIONS] -r <DIRECTORY>");
    println!("  fortdoc [OPTIONS] -              # Read from stdin");
    println!("  cat file.f90 | fortdoc           # Pipe input");
    println!();
    println!("Examples:");
    println!("  fortdoc solver.f90               # Print the model of one file");
    println!("  fortdoc -r src/ -o docs/json     # One JSON file per source");
    println!("  fortdoc -D MPI --pretty comm.F90 # Resolve #ifdef MPI blocks");
    println!();
    println!("Options:");
    println!("  -D, --define <SYM>              Define a preprocessor symbol (repeatable)");
    println!("  -U, --undefine <SYM>            Undefine a symbol from config (repeatable)");
    println!("  -r, --recursive                 Process directories recursively");
    println!("  -e, --exclude <PATTERN>         Exclude files/dirs matching pattern (repeatable)");
    println!("  -f, --fortran <EXT>             Additional Fortran extension (repeatable)");
    println!("  -o, --output <DIR>              Write <stem>.json files into DIR");
    println!("  -p, --pretty                    Pretty-print JSON");
    println!("  -j, --jobs <NUM>                Parallel jobs (0=auto, 1=sequential)");
    println!("  -c, --config <FILE>             Config file path (overrides auto-discovery)");
    println!("      --max-file-size <BYTES>     Skip larger files [default: 100 MB]");
    println!("      --debug                     Enable debug output");
    println!("  -S, --silent                    Only report warnings and errors");
    println!("  -h, --help                      Print help");
    println!();
    println!("In-file directive:");
    println!("  ! fortdoc: -D MPI -U DEBUG      First such line adjusts the file's defines");
    println!();
    println!("Config file auto-discovery:");
    println!("  Searches for fortdoc.toml in parent directories");
    println!("  starting from the input up to the root directory.");
    println!("  Also checks fortdoc.toml in the home directory.");
    println!("  More specific configs (closer to file) override less specific ones.");
}
