use std::fmt;

// === NetworkError ===

/// Errors raised by the remote repository.
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkError {
    /// The request could not be sent or the connection failed.
    Request(String),
    /// The server answered with a non-success status code.
    Status(u16),
    /// The response body could not be decoded.
    Decode(String),
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkError::Request(msg) => write!(f, "Request failed: {}", msg),
            NetworkError::Status(code) => write!(f, "Unexpected HTTP status: {}", code),
            NetworkError::Decode(msg) => write!(f, "Failed to decode response: {}", msg),
        }
    }
}

impl std::error::Error for NetworkError {}

// === CacheError ===

/// Errors raised by the local cache repository.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheError {
    /// Database operation failed.
    DatabaseError(String),
    /// The background task running the query did not complete.
    TaskFailed(String),
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::DatabaseError(msg) => write!(f, "Cache database error: {}", msg),
            CacheError::TaskFailed(msg) => write!(f, "Cache task failed: {}", msg),
        }
    }
}

impl std::error::Error for CacheError {}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    IoError(String),
    /// Failed to serialize or deserialize settings.
    SerializationError(String),
    /// The provided settings key is invalid.
    InvalidKey(String),
    /// The provided settings value is invalid.
    InvalidValue(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::IoError(msg) => write!(f, "Settings I/O error: {}", msg),
            SettingsError::SerializationError(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
            SettingsError::InvalidKey(key) => write!(f, "Invalid settings key: {}", key),
            SettingsError::InvalidValue(msg) => {
                write!(f, "Invalid settings value: {}", msg)
            }
        }
    }
}

impl std::error::Error for SettingsError {}

// === AppError ===

/// Errors raised while wiring the application together.
#[derive(Debug)]
pub enum AppError {
    /// The cache database could not be opened.
    Database(String),
    /// Settings could not be loaded or changed.
    Settings(String),
    /// The HTTP client could not be built.
    Http(String),
    /// No details screen is currently open.
    NoActiveScreen,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Database(msg) => write!(f, "Database init failed: {}", msg),
            AppError::Settings(msg) => write!(f, "Settings error: {}", msg),
            AppError::Http(msg) => write!(f, "HTTP client init failed: {}", msg),
            AppError::NoActiveScreen => write!(f, "No details screen is open"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<SettingsError> for AppError {
    fn from(err: SettingsError) -> Self {
        AppError::Settings(err.to_string())
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        AppError::Database(err.to_string())
    }
}
