use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ImageError {
    #[error("Expected a data:image/<ext>;base64,<payload> string")]
    NotADataUri,

    #[error("Invalid base64 payload: {0}")]
    InvalidBase64(String),

    #[error("Image is empty")]
    Empty,

    #[error("Image too large: {size} bytes (max {max})")]
    TooLarge { size: usize, max: usize },

    #[error("Could not detect image format")]
    UnknownFormat,

    #[error("Unsupported image format: {0}. Allowed: JPEG, PNG, GIF, WebP")]
    UnsupportedFormat(String),
}

#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("Invalid JSON fixture: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Invalid CSV fixture: {0}")]
    InvalidCsv(#[from] csv::Error),

    #[error("Line {line}: {message}")]
    InvalidLine { line: usize, message: String },

    #[error("Entry {entry}: {message}")]
    InvalidEntry { entry: usize, message: String },

    #[error("Tag {slug:?}: {message}")]
    InvalidTag { slug: String, message: String },

    #[error("Unsupported fixture format: {0}")]
    UnsupportedFormat(String),
}
