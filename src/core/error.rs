use thiserror::Error;

/// All recoverable failures surfaced by the engine core.
///
/// None of these terminate the process; termination decisions belong to the
/// caller (the frontend binary or the level editor).
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("malformed level header: {0}")]
    MalformedLevelHeader(String),

    #[error("level declares {expected} rows but only {found} were found")]
    LevelHeightMismatch { expected: usize, found: usize },

    #[error("level line {line} is {found} cells wide, expected {expected}")]
    LevelWidthMismatch {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("no viewer spawn code in level")]
    ViewerMissing,

    #[error("corrupt settings: {0}")]
    CorruptSettings(String),

    #[error("unknown setting key: {0}")]
    UnknownSettingKey(String),

    #[error("resource {path} could not be loaded: {reason}")]
    ResourceLoad { path: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
