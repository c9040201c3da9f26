//! The compiler driver.
//!
//! Groups the batch once, then runs parse → resolve → generate for every
//! resource type on the rayon pool. A failing file or type is reported and
//! skipped; the rest of the batch carries on. The overall result is `false`
//! as soon as any error diagnostic went out, even when some units were
//! generated.

use std::{
    collections::BTreeMap,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use rayon::prelude::*;

use crate::{
    codegen,
    config::CompileOptions,
    diagnostics::{Diagnostic, Reporter, TrackingReporter},
    error::Error,
    fallback, formats,
    grouping::{self, Grouping},
    output::UnitSink,
    source::SourceFile,
    types::ResourceType,
};

/// Cooperative cancellation flag shared between a host and the driver.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// `Err(Error::Cancelled)` once cancellation was requested.
    pub fn check(&self) -> Result<(), Error> {
        if self.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Compiles a batch of source files.
///
/// Every generated unit goes to `sink`; every diagnostic goes to
/// `reporter`. Diagnostics of one resource type are delivered as one
/// contiguous block once that type is done. Returns whether the batch
/// compiled without errors, or `Err(Error::Cancelled)` when `cancel` fired
/// before the batch finished. Units saved before cancellation are complete.
///
/// # Example
/// ```rust
/// use i18ntext::{CancellationToken, CompileOptions, DiagnosticCollector, SourceFile, UnitCollector, compile};
///
/// let options = CompileOptions::new("/proj", "i18ntext", "out", "my_app::texts", "en", false);
/// let files = vec![
///     SourceFile::new("/proj/i18ntext/Greeting.en.json", r#"{"hello": "Hello"}"#)?,
///     SourceFile::new("/proj/i18ntext/Greeting.fr.csv", "hello,Bonjour\n")?,
/// ];
/// let reporter = DiagnosticCollector::new();
/// let units = UnitCollector::new();
///
/// let ok = compile(files, &options, &reporter, &units, &CancellationToken::new())?;
/// assert!(ok);
/// assert_eq!(units.into_units()[0].hint_name, "my_app.texts.Greeting.g.rs");
/// # Ok::<(), i18ntext::Error>(())
/// ```
pub fn compile(
    files: Vec<SourceFile>,
    options: &CompileOptions,
    reporter: &dyn Reporter,
    sink: &dyn UnitSink,
    cancel: &CancellationToken,
) -> Result<bool, Error> {
    let reporter = TrackingReporter::new(reporter);
    let fallback_language = match options
        .validate()
        .and_then(|()| options.fallback_language_tag())
    {
        Ok(language) => language,
        Err(err) => {
            reporter.report(&Diagnostic::from(&err));
            return Ok(false);
        }
    };
    cancel.check()?;

    let file_count = files.len();
    let Grouping { types, errors } = grouping::group(files, options);
    let grouping_diagnostics: Vec<Diagnostic> = errors.iter().map(Diagnostic::from).collect();
    reporter.report_all(&grouping_diagnostics);
    tracing::debug!(
        files = file_count,
        types = types.len(),
        "grouped text resources"
    );

    let generated = AtomicUsize::new(0);
    types
        .par_iter()
        .try_for_each(|(type_name, resource_type)| {
            cancel.check()?;
            let outcome = compile_type(
                type_name,
                resource_type,
                &fallback_language,
                options,
                sink,
                cancel,
            )?;
            if outcome.generated {
                generated.fetch_add(1, Ordering::Relaxed);
            }
            reporter.report_all(&outcome.diagnostics);
            Ok::<_, Error>(())
        })?;
    cancel.check()?;

    let generated = generated.into_inner();
    let summary = format!(
        "generated {generated} of {} text resource types from {file_count} files",
        types.len()
    );
    tracing::info!(generated, types = types.len(), files = file_count, "{summary}");
    reporter.report(&Diagnostic::info(summary));

    Ok(!reporter.has_errors())
}

/// What one resource type's pipeline produced.
struct TypeOutcome {
    diagnostics: Vec<Diagnostic>,
    generated: bool,
}

impl TypeOutcome {
    fn skipped(mut diagnostics: Vec<Diagnostic>, err: &Error) -> Self {
        diagnostics.push(Diagnostic::from(err));
        TypeOutcome {
            diagnostics,
            generated: false,
        }
    }
}

/// Parses, resolves and generates one type. Only cancellation is returned
/// as an error; everything else ends up in the outcome's diagnostics.
fn compile_type(
    type_name: &str,
    resource_type: &ResourceType,
    fallback_language: &str,
    options: &CompileOptions,
    sink: &dyn UnitSink,
    cancel: &CancellationToken,
) -> Result<TypeOutcome, Error> {
    let mut diagnostics = Vec::new();
    let mut parsed = BTreeMap::new();
    for (language, file) in &resource_type.files {
        cancel.check()?;
        match formats::parse(file) {
            Ok(result) => {
                diagnostics.extend(result.errors.iter().map(Diagnostic::from));
                parsed.insert(language.clone(), result.entries);
            }
            Err(err) => {
                tracing::debug!(path = %file.path.display(), error = %err, "text resource file skipped");
                diagnostics.push(Diagnostic::from(&err));
            }
        }
    }

    let resolution = match fallback::resolve(type_name, &parsed, fallback_language) {
        Ok(resolution) => resolution,
        Err(err) => return Ok(TypeOutcome::skipped(diagnostics, &err)),
    };
    diagnostics.extend(resolution.warnings);
    let unit = match codegen::generate(&resolution.merged, resource_type, options) {
        Ok(unit) => unit,
        Err(err) => return Ok(TypeOutcome::skipped(diagnostics, &err)),
    };

    cancel.check()?;
    if let Err(err) = sink.save(options, resource_type, unit) {
        return Ok(TypeOutcome::skipped(diagnostics, &err));
    }
    tracing::debug!(
        type_name,
        languages = resolution.merged.values.len(),
        keys = resolution.merged.keys.len(),
        "generated text table"
    );
    Ok(TypeOutcome {
        diagnostics,
        generated: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        diagnostics::{DiagnosticCode, DiagnosticCollector},
        output::UnitCollector,
        types::GeneratedUnit,
    };

    fn options() -> CompileOptions {
        CompileOptions::new("/proj", "i18ntext", "out", "MyApp.I18nText", "en", false)
    }

    fn file(path: &str, content: &str) -> SourceFile {
        SourceFile::new(format!("/proj/i18ntext/{path}"), content).unwrap()
    }

    #[test]
    fn test_cancellation_token() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(token.check().is_ok());
        clone.cancel();
        assert!(token.is_cancelled());
        assert!(matches!(token.check(), Err(Error::Cancelled)));
    }

    #[test]
    fn test_invalid_configuration_is_reported() {
        let options = CompileOptions::new("/proj", "i18ntext", "out", "MyApp", "??", false);
        let reporter = DiagnosticCollector::new();
        let units = UnitCollector::new();
        let ok = compile(
            vec![file("Greeting.en.json", "{}")],
            &options,
            &reporter,
            &units,
            &CancellationToken::new(),
        )
        .unwrap();
        assert!(!ok);
        assert!(units.is_empty());
        assert_eq!(
            reporter.with_code(DiagnosticCode::InvalidConfiguration).len(),
            1
        );
    }

    #[test]
    fn test_sink_failure_fails_the_batch() {
        let reporter = DiagnosticCollector::new();
        let sink = |_: &CompileOptions, _: &ResourceType, unit: GeneratedUnit| {
            Err::<(), _>(Error::Write {
                path: unit.hint_name.into(),
                source: std::io::Error::other("disk full"),
            })
        };
        let ok = compile(
            vec![file("Greeting.en.json", r#"{"hello": "Hello"}"#)],
            &options(),
            &reporter,
            &sink,
            &CancellationToken::new(),
        )
        .unwrap();
        assert!(!ok);
        assert_eq!(reporter.with_code(DiagnosticCode::WriteFailed).len(), 1);
    }

    #[test]
    fn test_broken_fallback_file_skips_the_type() {
        let reporter = DiagnosticCollector::new();
        let units = UnitCollector::new();
        let ok = compile(
            vec![
                file("Greeting.en.json", "{not json"),
                file("Greeting.fr.json", r#"{"hello": "Bonjour"}"#),
                file("Menu.en.csv", "open,Open\n"),
            ],
            &options(),
            &reporter,
            &units,
            &CancellationToken::new(),
        )
        .unwrap();
        assert!(!ok);
        assert_eq!(reporter.with_code(DiagnosticCode::MalformedFile).len(), 1);
        assert_eq!(
            reporter
                .with_code(DiagnosticCode::MissingFallbackLanguage)
                .len(),
            1
        );
        let units = units.into_units();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].type_name, "MyApp.I18nText.Menu");
    }

    #[test]
    fn test_summary_is_reported_last() {
        let reporter = DiagnosticCollector::new();
        let units = UnitCollector::new();
        compile(
            vec![file("Greeting.en.json", r#"{"hello": "Hello"}"#)],
            &options(),
            &reporter,
            &units,
            &CancellationToken::new(),
        )
        .unwrap();
        let last = reporter.diagnostics().pop().unwrap();
        assert_eq!(last.code, DiagnosticCode::Information);
        assert_eq!(
            last.message,
            "generated 1 of 1 text resource types from 1 files"
        );
    }
}
