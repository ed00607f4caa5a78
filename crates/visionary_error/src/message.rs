//! Message-only error types.
//!
//! These errors carry a human-readable message plus the source location that
//! created them. They cover the transport and plumbing layers that have no
//! useful sub-kinds of their own.

macro_rules! message_error {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
        #[display("{}: {} at line {} in {}", $label, message, line, file)]
        pub struct $name {
            /// The underlying error message
            pub message: String,
            /// Line number where the error occurred
            pub line: u32,
            /// File where the error occurred
            pub file: &'static str,
        }

        impl $name {
            /// Create a new error with the given message at the caller's location.
            #[track_caller]
            pub fn new(message: impl Into<String>) -> Self {
                let location = std::panic::Location::caller();
                Self {
                    message: message.into(),
                    line: location.line(),
                    file: location.file(),
                }
            }
        }
    };
}

message_error!(
    /// HTTP transport failure (connection, TLS, timeout, body read).
    ///
    /// # Examples
    ///
    /// ```
    /// use visionary_error::HttpError;
    ///
    /// let err = HttpError::new("Connection refused");
    /// assert!(err.message.contains("Connection refused"));
    /// assert!(err.to_string().starts_with("HTTP Error"));
    /// ```
    HttpError,
    "HTTP Error"
);

message_error!(
    /// JSON serialization or deserialization failure.
    JsonError,
    "JSON Error"
);

message_error!(
    /// Invalid or unreadable configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use visionary_error::ConfigError;
    ///
    /// let err = ConfigError::new("gemini.model must not be empty");
    /// assert!(err.to_string().contains("gemini.model"));
    /// ```
    ConfigError,
    "Configuration Error"
);

message_error!(
    /// Filesystem failure while reading a story or writing frames.
    IoError,
    "I/O Error"
);
