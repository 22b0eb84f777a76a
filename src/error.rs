use thiserror::Error;

/// Result type for testable-gen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the class synthesizer and its surroundings
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}, column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Lexical error: {message}")]
    Lexical { message: String },

    #[error("Malformed declaration '{member}': {message}")]
    MalformedDeclaration { member: String, message: String },

    #[error("Invalid statement template \"{template}\": {message}")]
    Template { template: String, message: String },

    #[error("Class not found: {0}")]
    ClassNotFound(String),

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl Error {
    /// Create a contract violation for a single member
    pub fn malformed(member: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedDeclaration {
            member: member.into(),
            message: message.into(),
        }
    }

    /// Create a template expansion error
    pub fn template_error(template: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Template {
            template: template.into(),
            message: message.into(),
        }
    }

    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }
}
