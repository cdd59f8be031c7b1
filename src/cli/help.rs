//! Usage and version text for the command-line tool.

use crate::format::BZ2_EXTENSION;
use crate::io::prefs::DEFAULT_LEVEL;

/// Prints the option summary to stdout.
pub fn print_usage(program: &str) {
    println!("Usage: {} [options] <files>", program);
    println!();
    println!(" -h | --help         print this message");
    println!(
        " -l | --level=<#>    compression level [1-9] (default: {})",
        DEFAULT_LEVEL
    );
    println!(
        " -c | --stdout       write output to stdout instead of <input>{}",
        BZ2_EXTENSION
    );
    println!(" -i | --stdin        read input from stdin instead of a file");
    println!(" -v | --verbose      increment the verbosity level");
    println!(" -f | --force        force overwrite of an existing output file");
    println!(" -d | --decompress   decompress the input stream");
    println!(" -z | --compress     compress the input stream (default)");
    println!(" -V | --version      print version information");
}

/// Prints the tool name and version to stdout.
pub fn print_version() {
    println!("bzchunk v{}", crate::VERSION_STRING);
}
