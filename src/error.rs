use thiserror::Error;

/// Errors raised by edits on a [`DrawingState`](crate::state::DrawingState)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    /// Brush widths must be positive and finite
    #[error("Invalid brush width: {0}")]
    InvalidWidth(f32),
}

/// Result type for edits
pub type EditResult<T> = Result<T, EditError>;

/// Errors raised while compositing a drawing into pixels
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("Invalid canvas dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

/// Errors that can occur while exporting a drawing
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Invalid canvas dimensions: {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },

    #[error("Failed to encode drawing: {0}")]
    EncodingFailed(String),

    #[error("Failed to save drawing: {0}")]
    PersistenceFailed(String),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Export stopped before it finished")]
    Interrupted,
}

/// Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;

/// Errors that can occur while importing a background image
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Failed to decode image: {0}")]
    DecodeFailed(String),

    #[error("Failed to read image source: {0}")]
    Read(#[from] std::io::Error),

    #[error("Import stopped before it finished")]
    Interrupted,
}

/// Errors that can occur while loading the canvas configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}
