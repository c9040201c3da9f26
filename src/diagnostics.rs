//! Structured diagnostics and the reporter capability.
//!
//! Diagnostic codes are part of the public contract: hosts match on them to
//! map compiler output onto their own warning/error surfaces, so a code is
//! never renumbered or reused.

use std::{
    fmt::{Display, Formatter},
    path::PathBuf,
    str::FromStr,
    sync::{
        Mutex, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
};

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::{Serialize, Serializer};

use crate::error::Error;

lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(r"\{(\d+)\}").unwrap();
}

/// Severity of a [`Diagnostic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Progress messages and warnings; never fails a compilation.
    Info,
    /// Fails the compilation once reported.
    Error,
}

/// The fixed set of diagnostic codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DiagnosticCode {
    Information,
    MalformedFile,
    UnrecognizedFileName,
    DuplicateKey,
    DuplicateLanguage,
    MissingFallbackLanguage,
    UnreadableFile,
    InvalidConfiguration,
    WriteFailed,
    NamespaceConflict,
    FallbackSubstituted,
    MissingFallbackKey,
    Unhandled,
}

impl DiagnosticCode {
    pub const ALL: [DiagnosticCode; 13] = [
        DiagnosticCode::Information,
        DiagnosticCode::MalformedFile,
        DiagnosticCode::UnrecognizedFileName,
        DiagnosticCode::DuplicateKey,
        DiagnosticCode::DuplicateLanguage,
        DiagnosticCode::MissingFallbackLanguage,
        DiagnosticCode::UnreadableFile,
        DiagnosticCode::InvalidConfiguration,
        DiagnosticCode::WriteFailed,
        DiagnosticCode::NamespaceConflict,
        DiagnosticCode::FallbackSubstituted,
        DiagnosticCode::MissingFallbackKey,
        DiagnosticCode::Unhandled,
    ];

    /// The stable code string, e.g. `I18N003`.
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticCode::Information => "I18N000",
            DiagnosticCode::MalformedFile => "I18N001",
            DiagnosticCode::UnrecognizedFileName => "I18N002",
            DiagnosticCode::DuplicateKey => "I18N003",
            DiagnosticCode::DuplicateLanguage => "I18N004",
            DiagnosticCode::MissingFallbackLanguage => "I18N005",
            DiagnosticCode::UnreadableFile => "I18N006",
            DiagnosticCode::InvalidConfiguration => "I18N007",
            DiagnosticCode::WriteFailed => "I18N008",
            DiagnosticCode::NamespaceConflict => "I18N009",
            DiagnosticCode::FallbackSubstituted => "I18N100",
            DiagnosticCode::MissingFallbackKey => "I18N101",
            DiagnosticCode::Unhandled => "I18N999",
        }
    }

    /// Short human-readable title for host descriptors.
    pub fn title(self) -> &'static str {
        match self {
            DiagnosticCode::Information => "Information",
            DiagnosticCode::MalformedFile => "Malformed text resource file",
            DiagnosticCode::UnrecognizedFileName => "Unrecognized text resource file name",
            DiagnosticCode::DuplicateKey => "Duplicate key",
            DiagnosticCode::DuplicateLanguage => "Duplicate language for text resource type",
            DiagnosticCode::MissingFallbackLanguage => "Missing fallback language",
            DiagnosticCode::UnreadableFile => "Unreadable text resource file",
            DiagnosticCode::InvalidConfiguration => "Invalid configuration",
            DiagnosticCode::WriteFailed => "Failed to write generated output",
            DiagnosticCode::NamespaceConflict => "Type name conflicts with a namespace",
            DiagnosticCode::FallbackSubstituted => "Fallback text substituted",
            DiagnosticCode::MissingFallbackKey => "Key missing from fallback language",
            DiagnosticCode::Unhandled => "Unhandled error",
        }
    }

    /// Default message template; `{0}`, `{1}`, `{2}` are positional arguments.
    pub fn message_format(self) -> &'static str {
        match self {
            DiagnosticCode::Information => "{0}",
            DiagnosticCode::MalformedFile => "{0}",
            DiagnosticCode::UnrecognizedFileName => "unrecognized file name `{0}`: {1}",
            DiagnosticCode::DuplicateKey => "duplicate key `{1}` in `{0}`",
            DiagnosticCode::DuplicateLanguage => {
                "duplicate language `{1}` for type `{0}`: `{2}` is ignored, `{3}` is used"
            }
            DiagnosticCode::MissingFallbackLanguage => {
                "type `{0}` has no text resource for the fallback language `{1}`"
            }
            DiagnosticCode::UnreadableFile => "could not read `{0}`: {1}",
            DiagnosticCode::InvalidConfiguration => "invalid configuration: {0}",
            DiagnosticCode::WriteFailed => "could not write `{0}`: {1}",
            DiagnosticCode::NamespaceConflict => {
                "type `{0}` is ignored because type `{1}` uses it as a namespace"
            }
            DiagnosticCode::FallbackSubstituted => {
                "`{0}`: language `{1}` has no text for key `{2}`, the fallback text is used"
            }
            DiagnosticCode::MissingFallbackKey => {
                "`{0}`: language `{1}` has no text for key `{2}`, which the fallback language does not define either; an empty text is used"
            }
            DiagnosticCode::Unhandled => "{0}",
        }
    }

    /// Fills [`message_format`](Self::message_format) with `args` in one
    /// pass. Placeholders without an argument are left as they are.
    pub fn format_message<S: AsRef<str>>(self, args: &[S]) -> String {
        PLACEHOLDER
            .replace_all(self.message_format(), |caps: &Captures| {
                caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| args.get(index))
                    .map_or_else(|| caps[0].to_string(), |arg| arg.as_ref().to_string())
            })
            .into_owned()
    }

    /// Number of positional arguments [`message_format`](Self::message_format)
    /// expects.
    pub fn arity(self) -> usize {
        PLACEHOLDER
            .captures_iter(self.message_format())
            .filter_map(|caps| caps[1].parse::<usize>().ok())
            .map(|index| index + 1)
            .max()
            .unwrap_or(0)
    }

    pub fn severity(self) -> Severity {
        match self {
            DiagnosticCode::Information
            | DiagnosticCode::FallbackSubstituted
            | DiagnosticCode::MissingFallbackKey => Severity::Info,
            _ => Severity::Error,
        }
    }
}

impl Display for DiagnosticCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiagnosticCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        DiagnosticCode::ALL
            .into_iter()
            .find(|code| code.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::Internal(format!("unknown diagnostic code `{s}`")))
    }
}

impl Serialize for DiagnosticCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A file position a diagnostic is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Location {
    pub path: PathBuf,
    /// 1-based line number, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl Location {
    pub fn new(path: impl Into<PathBuf>, line: Option<usize>) -> Self {
        Location {
            path: path.into(),
            line,
        }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}({})", self.path.display(), line),
            None => write!(f, "{}", self.path.display()),
        }
    }
}

/// A single structured message produced during compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl Diagnostic {
    pub fn new(code: DiagnosticCode, message: impl Into<String>, location: Option<Location>) -> Self {
        Diagnostic {
            code,
            message: message.into(),
            location,
        }
    }

    /// An informational progress message.
    pub fn info(message: impl Into<String>) -> Self {
        Diagnostic::new(DiagnosticCode::Information, message, None)
    }

    /// Warning: `language` lacks `key`, so the fallback language's text is used.
    pub fn fallback_substituted(type_name: &str, language: &str, key: &str) -> Self {
        Diagnostic::from_template(
            DiagnosticCode::FallbackSubstituted,
            &[type_name, language, key],
            None,
        )
    }

    /// Warning: `language` lacks `key` and the fallback language has no text
    /// for it either, so an empty text is used.
    pub fn missing_fallback_key(type_name: &str, language: &str, key: &str) -> Self {
        Diagnostic::from_template(
            DiagnosticCode::MissingFallbackKey,
            &[type_name, language, key],
            None,
        )
    }

    /// A diagnostic whose message is `code`'s template filled with `args`.
    pub fn from_template<S: AsRef<str>>(
        code: DiagnosticCode,
        args: &[S],
        location: Option<Location>,
    ) -> Self {
        Diagnostic::new(code, code.format_message(args), location)
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }
}

impl From<&Error> for Diagnostic {
    fn from(error: &Error) -> Self {
        Diagnostic::from_template(error.code(), &error.message_args(), error.location())
    }
}

impl From<Error> for Diagnostic {
    fn from(error: Error) -> Self {
        Diagnostic::from(&error)
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let severity = match self.severity() {
            Severity::Info => "info",
            Severity::Error => "error",
        };
        if let Some(location) = &self.location {
            write!(f, "{location}: ")?;
        }
        write!(f, "{severity} {}: {}", self.code, self.message)
    }
}

/// The message/error sink capability handed to the compiler driver.
///
/// Implementations are shared across worker threads and must tolerate
/// concurrent calls.
pub trait Reporter: Send + Sync {
    /// Receives progress messages and warnings.
    fn report_info(&self, diagnostic: &Diagnostic);

    /// Receives error-severity diagnostics.
    fn report_error(&self, diagnostic: &Diagnostic);

    /// Dispatches by severity.
    fn report(&self, diagnostic: &Diagnostic) {
        match diagnostic.severity() {
            Severity::Info => self.report_info(diagnostic),
            Severity::Error => self.report_error(diagnostic),
        }
    }
}

/// In-memory reporter that keeps every diagnostic in arrival order.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.lock().clone()
    }

    pub fn errors(&self) -> Vec<Diagnostic> {
        self.lock().iter().filter(|d| d.is_error()).cloned().collect()
    }

    pub fn with_code(&self, code: DiagnosticCode) -> Vec<Diagnostic> {
        self.lock().iter().filter(|d| d.code == code).cloned().collect()
    }

    pub fn has_errors(&self) -> bool {
        self.lock().iter().any(Diagnostic::is_error)
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Diagnostic>> {
        self.diagnostics.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Reporter for DiagnosticCollector {
    fn report_info(&self, diagnostic: &Diagnostic) {
        self.lock().push(diagnostic.clone());
    }

    fn report_error(&self, diagnostic: &Diagnostic) {
        self.lock().push(diagnostic.clone());
    }
}

/// Forwards diagnostics to the `tracing` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report_info(&self, diagnostic: &Diagnostic) {
        match diagnostic.code {
            DiagnosticCode::Information => {
                tracing::info!(code = %diagnostic.code, "{}", diagnostic.message)
            }
            _ => tracing::warn!(code = %diagnostic.code, location = ?diagnostic.location, "{}", diagnostic.message),
        }
    }

    fn report_error(&self, diagnostic: &Diagnostic) {
        tracing::error!(code = %diagnostic.code, location = ?diagnostic.location, "{}", diagnostic.message);
    }
}

/// Wraps a caller's reporter and remembers whether an error went through it.
pub(crate) struct TrackingReporter<'a> {
    inner: &'a dyn Reporter,
    failed: AtomicBool,
}

impl<'a> TrackingReporter<'a> {
    pub(crate) fn new(inner: &'a dyn Reporter) -> Self {
        TrackingReporter {
            inner,
            failed: AtomicBool::new(false),
        }
    }

    pub(crate) fn report_all(&self, diagnostics: &[Diagnostic]) {
        for diagnostic in diagnostics {
            self.report(diagnostic);
        }
    }

    pub(crate) fn has_errors(&self) -> bool {
        self.failed.load(Ordering::SeqCst)
    }
}

impl Reporter for TrackingReporter<'_> {
    fn report_info(&self, diagnostic: &Diagnostic) {
        self.inner.report_info(diagnostic);
    }

    fn report_error(&self, diagnostic: &Diagnostic) {
        self.failed.store(true, Ordering::SeqCst);
        self.inner.report_error(diagnostic);
    }
}
