//! Error handling for the Plandex CLI.
//!
//! Two layers cooperate here:
//! 1. **Strongly-typed errors**: subsystems return typed enums (e.g.
//!    [`UpgradeError`](crate::upgrade::UpgradeError)) so callers can match on
//!    the failure mode.
//! 2. **User-friendly reporting**: [`ErrorContext`] wraps any error with an
//!    optional suggestion and detail block for terminal display.
//!
//! [`user_friendly_error`] is the bridge used by `main`: it inspects the
//! error chain and attaches actionable suggestions (for example, the
//! elevated-privileges hint when a self-upgrade cannot write its own
//! binary).

use colored::Colorize;
use std::fmt;

use crate::upgrade::UpgradeError;

/// An error decorated with user-facing guidance.
///
/// Wraps the underlying error with an optional one-line suggestion and an
/// optional longer details block. Both are rendered in color by
/// [`display`](Self::display).
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error being reported.
    pub error: anyhow::Error,
    /// Actionable one-line suggestion shown to the user, if any.
    pub suggestion: Option<String>,
    /// Additional free-form details, if any.
    pub details: Option<String>,
}

impl ErrorContext {
    /// Wrap an error with no suggestion or details.
    pub fn new(error: anyhow::Error) -> Self {
        Self { error, suggestion: None, details: None }
    }

    /// Attach a one-line suggestion.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Attach a details block.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr with color, including the error chain,
    /// suggestion, and details when present.
    pub fn display(&self) {
        eprintln!("{} {}", "Error:".red().bold(), self.error);

        for cause in self.error.chain().skip(1) {
            eprintln!("  {} {}", "Caused by:".yellow(), cause);
        }

        if let Some(details) = &self.details {
            eprintln!("\n{details}");
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("\n{} {}", "Suggestion:".cyan().bold(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }
        Ok(())
    }
}

/// Remediation classes recognized by [`user_friendly_error`].
enum Hint {
    Elevate,
    ManualInstall,
    MalformedRelease,
    Network,
    None,
}

/// Convert any error into an [`ErrorContext`] with contextual suggestions.
///
/// Inspects the error chain for known typed errors and attaches the matching
/// remediation hint. Unrecognized errors pass through unchanged.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let hint = match error.chain().find_map(|e| e.downcast_ref::<UpgradeError>()) {
        Some(UpgradeError::PermissionDenied { .. }) => Hint::Elevate,
        Some(UpgradeError::ZipUnsupported) => Hint::ManualInstall,
        Some(UpgradeError::BinaryNotInArchive { .. }) => Hint::MalformedRelease,
        Some(UpgradeError::Http(_) | UpgradeError::DownloadStatus { .. }) => Hint::Network,
        _ => Hint::None,
    };

    let ctx = ErrorContext::new(error);
    match hint {
        Hint::Elevate => ctx.with_suggestion(
            "re-run the command with elevated privileges (e.g. prefix it with `sudo`)",
        ),
        Hint::ManualInstall => ctx.with_suggestion(
            "download the release archive manually and replace the binary in place",
        ),
        Hint::MalformedRelease => ctx.with_details(
            "The release archive was downloaded but did not contain the expected executable. \
             The release may be malformed; try again later or report it.",
        ),
        Hint::Network => ctx.with_suggestion("check your network connection and retry"),
        Hint::None => ctx,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn permission_denied_gets_sudo_suggestion() {
        let err = anyhow::Error::from(UpgradeError::PermissionDenied {
            path: PathBuf::from("/usr/local/bin/plandex"),
        });
        let ctx = user_friendly_error(err);
        assert!(ctx.suggestion.as_deref().unwrap().contains("sudo"));
    }

    #[test]
    fn missing_entry_gets_details() {
        let err = anyhow::Error::from(UpgradeError::BinaryNotInArchive {
            name: "plandex".to_string(),
        });
        let ctx = user_friendly_error(err);
        assert!(ctx.details.is_some());
        assert!(ctx.suggestion.is_none());
    }

    #[test]
    fn unknown_errors_pass_through() {
        let ctx = user_friendly_error(anyhow::anyhow!("something else"));
        assert!(ctx.suggestion.is_none());
        assert!(ctx.details.is_none());
        assert_eq!(format!("{}", ctx), "something else");
    }

    #[test]
    fn context_builders_compose() {
        let ctx = ErrorContext::new(anyhow::anyhow!("boom"))
            .with_suggestion("try harder")
            .with_details("it exploded");
        assert_eq!(ctx.suggestion.as_deref(), Some("try harder"));
        assert_eq!(ctx.details.as_deref(), Some("it exploded"));
        let rendered = format!("{}", ctx);
        assert!(rendered.contains("boom"));
        assert!(rendered.contains("try harder"));
    }
}
