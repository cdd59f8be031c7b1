//! Operation mode selection and startup defaults for the CLI.

use crate::io::prefs::DEFAULT_LEVEL;

/// What the CLI should do with its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpMode {
    /// Compress inputs into archives (the default).
    Compress,
    /// Decompress archive inputs.
    Decompress,
}

impl Default for OpMode {
    fn default() -> Self {
        OpMode::Compress
    }
}

/// Reads the default compression level from the `BZCHUNK_LEVEL` environment
/// variable, falling back to [`DEFAULT_LEVEL`] when unset or out of range.
pub fn init_level() -> u32 {
    init_level_from(std::env::var("BZCHUNK_LEVEL").ok().as_deref())
}

/// Testable core of [`init_level`]: parse an optional `BZCHUNK_LEVEL` value.
///
/// Separating the env-var read from the parsing keeps the conversion logic
/// unit-testable without touching the process environment.
pub fn init_level_from(env_val: Option<&str>) -> u32 {
    if let Some(env) = env_val {
        if let Ok(level) = env.parse::<u32>() {
            if crate::format::is_valid_level(level) {
                return level;
            }
        }
        eprintln!(
            "ignoring environment setting BZCHUNK_LEVEL={}: not a level in 1-9",
            env
        );
    }
    DEFAULT_LEVEL
}
