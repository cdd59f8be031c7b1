//! Command-line argument parsing.
//!
//! The entry points are [`parse_args`] (reads `std::env::args()`) and
//! [`parse_args_from`] (takes an explicit slice, suitable for unit-testing).
//! Both return a [`ParsedArgs`] value capturing every option and filename
//! discovered during the parse.
//!
//! Short options may be aggregated (e.g. `-vfd`).  Long options use either
//! `--option=VALUE` or `--option VALUE` syntax.  A bare `--` marks the end
//! of options; all subsequent arguments are treated as file paths regardless
//! of whether they start with `-`.
//!
//! Bad or unrecognised options return an `Err` whose message begins with
//! `"bad usage: "`.

use anyhow::anyhow;

use crate::cli::help::{print_usage, print_version};
use crate::cli::op_mode::{init_level, OpMode};
use crate::io::prefs::Prefs;

// ── Public output type ────────────────────────────────────────────────────────

/// Complete set of options and filenames produced by the argument parsing
/// loop, consumed by the dispatch phase in `main`.
#[derive(Debug)]
pub struct ParsedArgs {
    /// Level / overwrite / verbosity preferences.
    pub prefs: Prefs,
    /// Compress (default) or decompress.
    pub op_mode: OpMode,
    /// Read input from stdin instead of a file list.
    pub from_stdin: bool,
    /// Write output to stdout instead of derived filenames.
    pub to_stdout: bool,
    /// Positional input file paths.
    pub in_file_names: Vec<String>,
    /// When `true`, a --help / --version flag was processed; the caller
    /// should exit 0 without performing any I/O operation.
    pub exit_early: bool,
    /// Program name (argv[0]), used by the usage text.
    pub exe_name: String,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Parses `std::env::args()` (skipping argv[0]).
pub fn parse_args() -> anyhow::Result<ParsedArgs> {
    let exe_name = std::env::args().next().unwrap_or_else(|| "bzchunk".to_owned());
    let argv: Vec<String> = std::env::args().skip(1).collect();
    parse_args_from(&exe_name, &argv)
}

/// Parses an explicit argument list.  `exe_name` is argv[0] (used for help
/// text); `argv` is argv[1..].  Callable from tests without touching
/// `std::env`.
pub fn parse_args_from(exe_name: &str, argv: &[String]) -> anyhow::Result<ParsedArgs> {
    let mut prefs = Prefs::new();
    prefs.set_level(init_level());

    let mut op_mode = OpMode::default();
    let mut from_stdin = false;
    let mut to_stdout = false;
    let mut in_file_names: Vec<String> = Vec::new();
    let mut all_arguments_are_files = false;
    let mut exit_early = false;

    let mut arg_idx = 0usize;
    while arg_idx < argv.len() {
        let argument = &argv[arg_idx];
        arg_idx += 1;

        if argument.is_empty() {
            continue;
        }

        // ── Non-option path (or end-of-options forced by `--`) ───────────────
        // A lone `-` is a positional argument by getopt convention.
        if all_arguments_are_files || !argument.starts_with('-') || argument == "-" {
            in_file_names.push(argument.clone());
            continue;
        }

        // ── Long options (`--...`) ──────────────────────────────────────────
        if let Some(long) = argument.strip_prefix("--") {
            if long.is_empty() {
                all_arguments_are_files = true;
            } else if long == "help" {
                print_usage(exe_name);
                exit_early = true;
                break;
            } else if long == "version" {
                print_version();
                exit_early = true;
                break;
            } else if long == "stdout" {
                to_stdout = true;
            } else if long == "stdin" {
                from_stdin = true;
            } else if long == "verbose" {
                prefs.set_verbosity(prefs.verbosity + 1);
            } else if long == "force" {
                prefs.set_overwrite(true);
            } else if long == "decompress" {
                op_mode = OpMode::Decompress;
            } else if long == "compress" {
                op_mode = OpMode::Compress;
            } else if long == "level" || long.starts_with("level=") {
                let value = match long.strip_prefix("level=") {
                    Some(v) => v.to_owned(),
                    None => next_value(argv, &mut arg_idx, "--level")?,
                };
                set_level_checked(&mut prefs, &value)?;
            } else {
                return Err(anyhow!("bad usage: unknown option '--{}'", long));
            }
            continue;
        }

        // ── Short options, possibly aggregated (`-vfd`) ─────────────────────
        let mut chars = argument[1..].chars();
        while let Some(c) = chars.next() {
            match c {
                'h' => {
                    print_usage(exe_name);
                    exit_early = true;
                    break;
                }
                'V' => {
                    print_version();
                    exit_early = true;
                    break;
                }
                'c' => to_stdout = true,
                'i' => from_stdin = true,
                'v' => {
                    prefs.set_verbosity(prefs.verbosity + 1);
                }
                'f' => {
                    prefs.set_overwrite(true);
                }
                'd' => op_mode = OpMode::Decompress,
                'z' => op_mode = OpMode::Compress,
                'l' => {
                    // `-l9` or `-l 9`: the value is the rest of this token,
                    // or the next argument when the token ends here.
                    let rest: String = chars.by_ref().collect();
                    let value = if rest.is_empty() {
                        next_value(argv, &mut arg_idx, "-l")?
                    } else {
                        rest
                    };
                    set_level_checked(&mut prefs, &value)?;
                    break;
                }
                _ => return Err(anyhow!("bad usage: unknown option '-{}'", c)),
            }
        }
        if exit_early {
            break;
        }
    }

    Ok(ParsedArgs {
        prefs,
        op_mode,
        from_stdin,
        to_stdout,
        in_file_names,
        exit_early,
        exe_name: exe_name.to_owned(),
    })
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Consumes the next argument as an option value, failing when the list ends.
fn next_value(argv: &[String], arg_idx: &mut usize, option: &str) -> anyhow::Result<String> {
    match argv.get(*arg_idx) {
        Some(v) => {
            *arg_idx += 1;
            Ok(v.clone())
        }
        None => Err(anyhow!("bad usage: option '{}' requires a value", option)),
    }
}

/// Parses and applies a compression-level value.
fn set_level_checked(prefs: &mut Prefs, value: &str) -> anyhow::Result<()> {
    let level: u32 = value
        .parse()
        .map_err(|_| anyhow!("bad usage: compression level '{}' is not a number", value))?;
    if !prefs.set_level(level) {
        return Err(anyhow!("bad usage: compression level {} out of range 1-9", level));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
