//! Binary entry point for the `bzchunk` command-line tool.
//!
//! Control flow:
//!
//! 1. [`parse_args`] processes all flags and builds a [`ParsedArgs`] value.
//! 2. [`run`] validates the source/destination combination and dispatches to
//!    the compression or decompression I/O layer.
//!
//! Any violated precondition — no input sources, stdin combined with a file
//! list — and the first failing file abort the whole run with exit code 1;
//! there is no partial-success reporting across a batch.

use bzchunk::cli::args::{parse_args, ParsedArgs};
use bzchunk::cli::help::print_usage;
use bzchunk::cli::op_mode::OpMode;
use bzchunk::io::{
    compress_filename, compress_multiple_filenames, decompress_filename,
    decompress_multiple_filenames, STDIN_MARK, STDOUT_MARK,
};

/// Execute the operation selected by argument parsing.
///
/// Returns the process exit code (0 = success, non-zero = error).
fn run(args: ParsedArgs) -> i32 {
    let ParsedArgs {
        prefs,
        op_mode,
        from_stdin,
        mut to_stdout,
        in_file_names,
        exit_early: _,
        exe_name,
    } = args;

    // ── Source/destination validation ──────────────────────────────────────
    if from_stdin {
        if !in_file_names.is_empty() {
            eprintln!("bzchunk: cannot read from stdin and a file list");
            return 1;
        }
        if !to_stdout && prefs.verbose(1) {
            eprintln!("warning: writing to stdout by default when reading from stdin");
        }
        // Stream input has no filename to derive an output name from.
        to_stdout = true;
    } else if in_file_names.is_empty() {
        eprintln!("bzchunk: no input files given");
        print_usage(&exe_name);
        return 1;
    }

    if prefs.verbose(1) {
        eprintln!(
            "options: level={}, verbose={}, force={}, stdout={}, stdin={}, files={:?}",
            prefs.level, prefs.verbosity, prefs.overwrite, to_stdout, from_stdin, in_file_names
        );
    }

    // ── Operation dispatch ─────────────────────────────────────────────────
    let result = if from_stdin {
        match op_mode {
            OpMode::Compress => compress_filename(STDIN_MARK, STDOUT_MARK, &prefs).map(|_| ()),
            OpMode::Decompress => decompress_filename(STDIN_MARK, STDOUT_MARK, &prefs).map(|_| ()),
        }
    } else {
        let srcs: Vec<&str> = in_file_names.iter().map(|s| s.as_str()).collect();
        match op_mode {
            OpMode::Compress => compress_multiple_filenames(&srcs, &prefs, to_stdout),
            OpMode::Decompress => decompress_multiple_filenames(&srcs, &prefs, to_stdout),
        }
    };

    match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("bzchunk: {}", e);
            1
        }
    }
}

fn main() {
    let args = match parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("bzchunk: {}", e);
            std::process::exit(1);
        }
    };

    // --help / --version were already printed during parsing.
    if args.exit_early {
        std::process::exit(0);
    }

    std::process::exit(run(args));
}
