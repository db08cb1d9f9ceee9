//! Command-line interface for fortdoc.
//!
//! Defines CLI arguments using clap builder API

use std::path::PathBuf;

use clap::{Arg, ArgAction, Command};

use crate::config::Config;

/// CLI arguments parsed from command line
#[derive(Debug, Clone)]
pub struct CliArgs {
    /// Files or directories to extract
    pub inputs: Vec<PathBuf>,

    /// Preprocessor symbols to define
    pub defines: Vec<String>,

    /// Preprocessor symbols to undefine (applied after config defines)
    pub undefines: Vec<String>,

    /// Config file path
    pub config: Option<PathBuf>,

    /// Directory to write one `<stem>.json` per input into
    pub output: Option<PathBuf>,

    /// Recursive directory processing
    pub recursive: bool,

    /// Pretty-print JSON
    pub pretty: bool,

    /// Silent mode (warnings and errors only)
    pub silent: bool,

    /// Number of parallel jobs (0 = auto, 1 = sequential)
    pub jobs: Option<usize>,

    /// Exclude patterns for files/directories (glob patterns)
    pub exclude: Vec<String>,

    /// Custom Fortran file extensions (in addition to configured ones)
    pub fortran_extensions: Vec<String>,

    /// Skip files larger than this many bytes
    pub max_file_size: Option<u64>,

    /// Enable debug output
    pub debug: bool,
}

impl CliArgs {
    /// Override `config` with everything given on the command line
    pub fn apply_to(&self, config: &mut Config) {
        for symbol in &self.defines {
            if !config.defines.contains(symbol) {
                config.defines.push(symbol.clone());
            }
        }
        config.defines.retain(|symbol| !self.undefines.contains(symbol));
        config.exclude.extend(self.exclude.iter().cloned());
        for ext in &self.fortran_extensions {
            let ext = ext.strip_prefix('.').unwrap_or(ext);
            if !config.fortran_extensions.iter().any(|e| e == ext) {
                config.fortran_extensions.push(ext.to_string());
            }
        }
        if self.recursive {
            config.recursive = true;
        }
        if self.pretty {
            config.pretty = true;
        }
        if let Some(size) = self.max_file_size {
            config.max_file_size = size;
        }
    }
}

/// Build the clap Command for parsing CLI arguments
#[must_use]
pub fn build_cli() -> Command {
    Command::new("fortdoc")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Extract modules, derived types and procedures from Fortran sources as JSON")
        .arg(
            Arg::new("inputs")
                .help("Files or directories to extract ('-' reads stdin)")
                .value_name("FILE")
                .num_args(1..)
                .required(false)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("define")
                .short('D')
                .long("define")
                .help("Define a preprocessor symbol (can be repeated)")
                .value_name("SYM")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("undefine")
                .short('U')
                .long("undefine")
                .help("Undefine a preprocessor symbol set by a config file (can be repeated)")
                .value_name("SYM")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Path to configuration file (overrides auto-discovery)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Write <stem>.json per input into DIR instead of printing to stdout")
                .value_name("DIR")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("recursive")
                .short('r')
                .long("recursive")
                .help("Recursively walk directories")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("pretty")
                .short('p')
                .long("pretty")
                .help("Pretty-print JSON output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("exclude")
                .short('e')
                .long("exclude")
                .help("Exclude files/directories matching pattern (glob syntax, can be repeated)")
                .value_name("PATTERN")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("fortran")
                .short('f')
                .long("fortran")
                .help("Additional Fortran file extension (can be repeated, e.g., -f f18 -f inc)")
                .value_name("EXT")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("max-file-size")
                .long("max-file-size")
                .help("Skip files larger than this many bytes [default: 104857600]")
                .value_name("BYTES")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Enable debug output (config discovery, skipped fragments)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("silent")
                .short('S')
                .long("silent")
                .help("Silent mode (only warnings and errors)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("jobs")
                .short('j')
                .long("jobs")
                .help("Number of parallel jobs (0=auto, 1=sequential)")
                .value_name("NUM")
                .value_parser(clap::value_parser!(usize)),
        )
}

/// Parse CLI arguments from command line
#[must_use]
pub fn parse_args() -> CliArgs {
    args_from_matches(&build_cli().get_matches())
}

/// Parse CLI arguments from an iterator (for testing)
#[must_use]
pub fn parse_args_from<I, T>(args: I) -> CliArgs
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    args_from_matches(&build_cli().get_matches_from(args))
}

fn strings(matches: &clap::ArgMatches, id: &str) -> Vec<String> {
    matches
        .get_many::<String>(id)
        .map(|vals| vals.cloned().collect())
        .unwrap_or_default()
}

/// Convert clap `ArgMatches` to `CliArgs`
fn args_from_matches(matches: &clap::ArgMatches) -> CliArgs {
    CliArgs {
        inputs: matches
            .get_many::<PathBuf>("inputs")
            .map(|vals| vals.cloned().collect())
            .unwrap_or_default(),
        defines: strings(matches, "define"),
        undefines: strings(matches, "undefine"),
        config: matches.get_one::<PathBuf>("config").cloned(),
        output: matches.get_one::<PathBuf>("output").cloned(),
        recursive: matches.get_flag("recursive"),
        pretty: matches.get_flag("pretty"),
        silent: matches.get_flag("silent"),
        jobs: matches.get_one::<usize>("jobs").copied(),
        exclude: strings(matches, "exclude"),
        fortran_extensions: strings(matches, "fortran"),
        max_file_size: matches.get_one::<u64>("max-file-size").copied(),
        debug: matches.get_flag("debug"),
    }
}
