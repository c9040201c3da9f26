//! Compile-time text resource compiler for Rust.
//!
//! Reads per-language JSON and CSV text resource files (`Greeting.en.json`,
//! `Greeting.fr.csv`, ...), groups them into resource types, merges every
//! language against a fallback language and generates one strongly-typed
//! text table per type. Problems are reported as structured diagnostics with
//! stable codes instead of aborting the batch.
//!
//! A build script typically discovers the files, compiles them into
//! `OUT_DIR` and writes a module index:
//!
//! ```rust,no_run
//! use i18ntext::{
//!     CancellationToken, CompileOptions, OutputDirSink, TracingReporter, compile,
//!     discover_source_files,
//! };
//!
//! let options = CompileOptions::load("i18ntext.toml")?;
//! let files = discover_source_files(options.source_root())?;
//! let sink = OutputDirSink::for_options(&options);
//! let ok = compile(files, &options, &TracingReporter, &sink, &CancellationToken::new())?;
//! sink.write_index()?;
//! assert!(ok);
//! # Ok::<(), i18ntext::Error>(())
//! ```
//!
//! Generated types implement [`runtime::TextTable`]; [`runtime::I18nText`]
//! resolves them for the active language.

#![forbid(unsafe_code)]

pub mod codegen;
pub mod compiler;
pub mod config;
pub mod diagnostics;
pub mod discovery;
pub mod error;
pub mod fallback;
pub mod formats;
pub mod grouping;
pub mod ident;
pub mod output;
pub mod runtime;
pub mod source;
pub mod traits;
pub mod types;

// Re-export most used types for easy consumption
pub use crate::{
    compiler::{CancellationToken, compile},
    config::CompileOptions,
    diagnostics::{
        Diagnostic, DiagnosticCode, DiagnosticCollector, Location, Reporter, Severity,
        TracingReporter,
    },
    discovery::discover_source_files,
    error::Error,
    output::{OutputDirSink, UnitCollector, UnitSink},
    runtime::{I18nText, LanguageStore, MemoryLanguageStore, TextTable},
    source::{SourceFile, Syntax},
    types::{GeneratedUnit, LocaleEntry, MergedResource, ParsedFile, ResourceType},
};
