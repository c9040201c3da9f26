//! Run-time support for generated text tables.
//!
//! Generated types implement [`TextTable`]; [`I18nText`] tracks the active
//! language and hands out tables resolved for it. Changing the language
//! never requires regenerating code: callers re-resolve their tables when
//! [`I18nText::generation`] moves.

use std::sync::{
    Mutex, OnceLock, PoisonError, RwLock,
    atomic::{AtomicU64, Ordering},
};

/// Implemented by every generated text table type.
pub trait TextTable: Sized + 'static {
    /// Fully-qualified type name, e.g. `MyApp.I18nText.Greeting`.
    const TYPE_NAME: &'static str;
    const FALLBACK_LANGUAGE: &'static str;
    /// Available language codes, sorted.
    const LANGUAGES: &'static [&'static str];
    /// Keys in canonical order.
    const KEYS: &'static [&'static str];
    /// One value row per entry of `LANGUAGES`, aligned with `KEYS`.
    const VALUES: &'static [&'static [&'static str]];

    /// Binds a value row to the type's fields.
    fn from_values(values: &'static [&'static str]) -> Self;

    /// The value row that serves `language`.
    fn values_for(language: &str) -> &'static [&'static str] {
        let index =
            resolve_language(language, Self::LANGUAGES, Self::FALLBACK_LANGUAGE).unwrap_or(0);
        Self::VALUES.get(index).copied().unwrap_or(&[])
    }

    /// The table resolved for `language`.
    fn for_language(language: &str) -> Self {
        Self::from_values(Self::values_for(language))
    }

    /// The table in the fallback language.
    fn fallback() -> Self {
        Self::for_language(Self::FALLBACK_LANGUAGE)
    }

    /// Looks a single text up by its original key.
    fn lookup(language: &str, key: &str) -> Option<&'static str> {
        let index = Self::KEYS.iter().position(|k| *k == key)?;
        Self::values_for(language).get(index).copied()
    }
}

/// Picks the entry of `available` that serves `requested`.
///
/// Tries, in order: an exact match (case-insensitive, `_` and `-` are
/// equivalent), the requested tag's primary language (`en-US` → `en`), the
/// first available tag with the same primary language (`en` → `en-GB`), and
/// finally `fallback`.
pub fn resolve_language(requested: &str, available: &[&str], fallback: &str) -> Option<usize> {
    let requested = normalize(requested);
    let primary = primary_subtag(&requested);
    let position = |wanted: &str| available.iter().position(|lang| normalize(lang) == wanted);

    position(&requested)
        .or_else(|| position(primary))
        .or_else(|| {
            available
                .iter()
                .position(|lang| primary_subtag(&normalize(lang)) == primary)
        })
        .or_else(|| position(&normalize(fallback)))
}

fn normalize(tag: &str) -> String {
    tag.trim().replace('_', "-").to_ascii_lowercase()
}

fn primary_subtag(tag: &str) -> &str {
    tag.split('-').next().unwrap_or(tag)
}

/// Persists the user's language choice between sessions.
pub trait LanguageStore: Send + Sync {
    fn load(&self) -> Option<String>;
    fn save(&self, language: &str);
}

/// Keeps the language choice in memory only.
#[derive(Debug, Default)]
pub struct MemoryLanguageStore {
    language: Mutex<Option<String>>,
}

impl MemoryLanguageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_language(language: impl Into<String>) -> Self {
        MemoryLanguageStore {
            language: Mutex::new(Some(language.into())),
        }
    }
}

impl LanguageStore for MemoryLanguageStore {
    fn load(&self) -> Option<String> {
        self.language
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn save(&self, language: &str) {
        *self.language.lock().unwrap_or_else(PoisonError::into_inner) = Some(language.to_string());
    }
}

/// Tracks the active language.
///
/// The initial language is read from the store on first use (or
/// `default_language` when the store has none) and only once.
pub struct I18nText {
    store: Box<dyn LanguageStore>,
    default_language: String,
    current: OnceLock<RwLock<String>>,
    generation: AtomicU64,
}

impl I18nText {
    pub fn new(store: impl LanguageStore + 'static, default_language: impl Into<String>) -> Self {
        I18nText {
            store: Box::new(store),
            default_language: default_language.into(),
            current: OnceLock::new(),
            generation: AtomicU64::new(0),
        }
    }

    fn cell(&self) -> &RwLock<String> {
        self.current.get_or_init(|| {
            let language = self
                .store
                .load()
                .unwrap_or_else(|| self.default_language.clone());
            tracing::debug!(language = %language, "initial language");
            RwLock::new(language)
        })
    }

    pub fn current_language(&self) -> String {
        self.cell()
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Switches the active language, persists it and bumps the generation.
    pub fn change_language(&self, language: &str) {
        {
            let mut current = self.cell().write().unwrap_or_else(PoisonError::into_inner);
            if *current == language {
                return;
            }
            *current = language.to_string();
        }
        self.store.save(language);
        self.generation.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(language, "language changed");
    }

    /// Increments on every effective language change.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// The table `T` resolved for the active language.
    pub fn text_table<T: TextTable>(&self) -> T {
        T::for_language(&self.current_language())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Mirrors what the code generator emits for a two-language table.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Greeting {
        hello: &'static str,
        good_bye: &'static str,
    }

    impl TextTable for Greeting {
        const TYPE_NAME: &'static str = "MyApp.Greeting";
        const FALLBACK_LANGUAGE: &'static str = "en";
        const LANGUAGES: &'static [&'static str] = &["en", "fr", "pt-BR"];
        const KEYS: &'static [&'static str] = &["hello", "good-bye"];
        const VALUES: &'static [&'static [&'static str]] = &[
            &["Hello", "Good bye"],
            &["Bonjour", "Au revoir"],
            &["Olá", "Tchau"],
        ];

        fn from_values(values: &'static [&'static str]) -> Self {
            Greeting {
                hello: values[0],
                good_bye: values[1],
            }
        }
    }

    #[test]
    fn test_resolve_language() {
        let available = ["en", "fr", "pt-BR"];
        assert_eq!(resolve_language("fr", &available, "en"), Some(1));
        assert_eq!(resolve_language("FR", &available, "en"), Some(1));
        assert_eq!(resolve_language("fr-CA", &available, "en"), Some(1));
        assert_eq!(resolve_language("pt_br", &available, "en"), Some(2));
        assert_eq!(resolve_language("pt", &available, "en"), Some(2));
        assert_eq!(resolve_language("de", &available, "en"), Some(0));
        assert_eq!(resolve_language("de", &available, "ja"), None);
    }

    #[test]
    fn test_table_resolution() {
        assert_eq!(Greeting::for_language("fr").hello, "Bonjour");
        assert_eq!(Greeting::for_language("en-US").good_bye, "Good bye");
        assert_eq!(Greeting::for_language("de").hello, "Hello");
        assert_eq!(Greeting::fallback().hello, "Hello");
        assert_eq!(Greeting::lookup("pt-BR", "good-bye"), Some("Tchau"));
        assert_eq!(Greeting::lookup("fr", "missing"), None);
    }

    #[test]
    fn test_initial_language_comes_from_store() {
        let i18n = I18nText::new(MemoryLanguageStore::with_language("fr"), "en-US");
        assert_eq!(i18n.current_language(), "fr");
        assert_eq!(i18n.text_table::<Greeting>().hello, "Bonjour");
    }

    #[test]
    fn test_default_language_when_store_is_empty() {
        let i18n = I18nText::new(MemoryLanguageStore::new(), "en-US");
        assert_eq!(i18n.current_language(), "en-US");
        assert_eq!(i18n.text_table::<Greeting>().hello, "Hello");
    }

    #[test]
    fn test_change_language_reresolves_and_persists() {
        let i18n = I18nText::new(MemoryLanguageStore::new(), "en");
        assert_eq!(i18n.generation(), 0);

        i18n.change_language("pt-BR");
        assert_eq!(i18n.generation(), 1);
        assert_eq!(i18n.text_table::<Greeting>().good_bye, "Tchau");
        assert_eq!(i18n.store.load().as_deref(), Some("pt-BR"));

        i18n.change_language("pt-BR");
        assert_eq!(i18n.generation(), 1);
    }
}
