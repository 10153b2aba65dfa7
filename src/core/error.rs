//! Error handling for AGCM
//!
//! The error system follows two rules:
//! 1. **Strongly-typed errors** ([`ConfigError`]) for every failure the engine can report
//! 2. **User-friendly rendering** ([`ErrorContext`]) for the command-line front end
//!
//! # Error Taxonomy
//!
//! Every [`ConfigError`] belongs to exactly one [`ErrorKind`]:
//!
//! | Kind         | Raised when                                             | Status |
//! |--------------|---------------------------------------------------------|--------|
//! | `Validation` | a required field is missing or an enum value is unknown | 400    |
//! | `Security`   | a path escapes its base or carries a null byte          | 403    |
//! | `NotFound`   | a project, server, or file does not exist               | 404    |
//! | `Conflict`   | a rename would collide with an existing identity        | 409    |
//! | `Parse`      | JSON, YAML, or frontmatter is malformed                 | 422    |
//! | `FileSystem` | reading, writing, or renaming failed                    | 500    |
//!
//! Validation and security errors are always produced before anything is written.
//! A copy conflict is *not* an error: it is reported through
//! [`CopyResult::Conflict`](crate::copy::CopyResult::Conflict).
//!
//! # Examples
//!
//! ```rust,no_run
//! use agcm::core::{ConfigError, ErrorKind};
//!
//! let err = ConfigError::validation("Invalid hook")
//!     .with_details(vec!["event is required".to_string()]);
//! assert_eq!(err.kind(), ErrorKind::Validation);
//! assert_eq!(err.details(), ["event is required"]);
//! ```

use colored::Colorize;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Types of file operations, used to explain where an I/O failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOperation {
    /// Reading a file completely
    Read,
    /// Writing a file (or its temporary sibling)
    Write,
    /// Renaming a temporary file over its target
    Rename,
    /// Removing a file or directory
    Remove,
    /// Creating a directory
    CreateDir,
    /// Getting file metadata
    Metadata,
    /// Copying a file or directory tree
    Copy,
}

impl fmt::Display for FileOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileOperation::Read => write!(f, "reading"),
            FileOperation::Write => write!(f, "writing"),
            FileOperation::Rename => write!(f, "renaming"),
            FileOperation::Remove => write!(f, "removing"),
            FileOperation::CreateDir => write!(f, "creating directory"),
            FileOperation::Metadata => write!(f, "getting metadata for"),
            FileOperation::Copy => write!(f, "copying"),
        }
    }
}

/// Stable classification of a [`ConfigError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    /// Malformed or missing input
    Validation,
    /// Path traversal or null bytes
    Security,
    /// Project, server, or file absent
    NotFound,
    /// Duplicate identity on rename
    Conflict,
    /// I/O failure
    FileSystem,
    /// Malformed JSON, YAML, or frontmatter
    Parse,
}

/// The main error type for the copy & merge engine.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Input failed validation; `details` lists every violated rule.
    #[error("{message}")]
    Validation {
        /// Human-readable summary
        message: String,
        /// One entry per violated rule (may be empty)
        details: Vec<String>,
    },

    /// A path escaped its base directory or contained forbidden sequences.
    #[error("{message}")]
    Security {
        /// Human-readable summary
        message: String,
    },

    /// A named entity does not exist.
    #[error("{what} not found: {name}")]
    NotFound {
        /// What kind of entity was looked up ("Project", "MCP server", ...)
        what: String,
        /// The identifier that was looked up
        name: String,
    },

    /// An identity collision outside the copy-conflict workflow.
    #[error("{message}")]
    Conflict {
        /// Human-readable summary
        message: String,
    },

    /// An I/O operation failed.
    #[error("Failed {operation} {}: {source}", path.display())]
    FileSystem {
        /// The operation that failed
        operation: FileOperation,
        /// The path involved
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A JSON or YAML document could not be parsed.
    #[error("Failed to parse {}: {reason}", path.display())]
    Parse {
        /// The document that failed to parse
        path: PathBuf,
        /// Parser message
        reason: String,
    },

    /// Markdown frontmatter is absent, unterminated, or not valid YAML.
    #[error("Invalid frontmatter in {}: {reason}", path.display())]
    InvalidFrontmatter {
        /// The Markdown source
        path: PathBuf,
        /// What is wrong with it
        reason: String,
    },
}

impl ConfigError {
    /// Build a validation error without details.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            details: Vec::new(),
        }
    }

    /// Attach per-rule details to a validation error. Other variants are returned unchanged.
    #[must_use]
    pub fn with_details(self, details: Vec<String>) -> Self {
        match self {
            Self::Validation { message, .. } => Self::Validation { message, details },
            other => other,
        }
    }

    /// Build a security error.
    pub fn security(message: impl Into<String>) -> Self {
        Self::Security {
            message: message.into(),
        }
    }

    /// Build a not-found error.
    pub fn not_found(what: impl Into<String>, name: impl Into<String>) -> Self {
        Self::NotFound {
            what: what.into(),
            name: name.into(),
        }
    }

    /// Build a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Wrap an I/O error with the operation and path that produced it.
    pub fn io(operation: FileOperation, path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::FileSystem {
            operation,
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Build a parse error for a document.
    pub fn parse(path: impl AsRef<Path>, reason: impl fmt::Display) -> Self {
        Self::Parse {
            path: path.as_ref().to_path_buf(),
            reason: reason.to_string(),
        }
    }

    /// Build a frontmatter error for a Markdown source.
    pub fn frontmatter(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Self::InvalidFrontmatter {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    /// The taxonomy class of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Security { .. } => ErrorKind::Security,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::FileSystem { .. } => ErrorKind::FileSystem,
            Self::Parse { .. } | Self::InvalidFrontmatter { .. } => ErrorKind::Parse,
        }
    }

    /// HTTP-equivalent status code for the outer surface.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::Validation => 400,
            ErrorKind::Security => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::Parse => 422,
            ErrorKind::FileSystem => 500,
        }
    }

    /// Per-rule details (empty for everything but multi-field validation failures).
    #[must_use]
    pub fn details(&self) -> &[String] {
        match self {
            Self::Validation { details, .. } => details,
            _ => &[],
        }
    }
}

/// A [`ConfigError`] (or any other error) rendered for terminal users.
///
/// Mirrors the layout the CLI prints: a red `error:` line, then optional
/// yellow details and a green suggestion.
#[derive(Debug)]
pub struct ErrorContext {
    /// The rendered error message
    pub message: String,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a context with only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print to stderr with terminal colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.message);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

/// Convert any error into an [`ErrorContext`] with a suggestion where one is known.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(config_error) = error.downcast_ref::<ConfigError>() {
        return create_error_context(config_error);
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(format!("Invalid configuration file: {toml_error}"))
            .with_suggestion("Check the TOML syntax in ~/.agcm/config.toml");
    }

    let mut context = ErrorContext::new(error.to_string());
    let causes: Vec<String> = error.chain().skip(1).map(ToString::to_string).collect();
    if !causes.is_empty() {
        context = context.with_details(causes.join(": "));
    }
    context
}

fn create_error_context(error: &ConfigError) -> ErrorContext {
    let context = ErrorContext::new(error.to_string());
    let context = if error.details().is_empty() {
        context
    } else {
        context.with_details(error.details().join("; "))
    };

    match error {
        ConfigError::Security { .. } => {
            context.with_suggestion("Use a path without '..' segments or null bytes")
        }
        ConfigError::NotFound { what, .. } if what == "Project" => context.with_suggestion(
            "Open the project once so it is registered in ~/.claude.json, or check the project id",
        ),
        ConfigError::Conflict { .. } => {
            context.with_suggestion("Choose a name that is not already in use")
        }
        ConfigError::Parse { path, .. } => {
            context.with_suggestion(format!("Fix the JSON syntax in {}", path.display()))
        }
        ConfigError::InvalidFrontmatter { .. } => context.with_suggestion(
            "Start the file with a '---' line, add YAML metadata, and close it with another '---' line",
        ),
        ConfigError::FileSystem { path, .. } => context.with_suggestion(format!(
            "Check that {} is accessible and the disk is writable",
            path.display()
        )),
        _ => context,
    }
}
