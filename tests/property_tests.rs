use i18ntext::fallback::resolve;
use i18ntext::formats::{CsvFormat, JsonFormat};
use i18ntext::traits::Parser;
use i18ntext::{
    CancellationToken, CompileOptions, DiagnosticCode, DiagnosticCollector, LocaleEntry,
    SourceFile, UnitCollector, compile,
};
use proptest::prelude::*;
use std::collections::{BTreeMap, HashSet};

fn key_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z][a-z0-9_]{0,15}").expect("valid key regex")
}

fn value_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9 _\\-\\.,!\\?\"'é日本]{0,30}").expect("valid value regex")
}

/// Entries with unique keys in generation order.
fn entries_strategy() -> impl Strategy<Value = Vec<LocaleEntry>> {
    prop::collection::vec((key_strategy(), value_strategy()), 1..10).prop_map(|pairs| {
        let mut seen = HashSet::new();
        pairs
            .into_iter()
            .filter(|(key, _)| seen.insert(key.clone()))
            .map(|(key, value)| LocaleEntry::new(key, value))
            .collect()
    })
}

fn to_json(entries: &[LocaleEntry]) -> String {
    let members: Vec<String> = entries
        .iter()
        .map(|entry| {
            format!(
                "{}: {}",
                serde_json::to_string(&entry.key).unwrap(),
                serde_json::to_string(&entry.value).unwrap()
            )
        })
        .collect();
    format!("{{{}}}", members.join(",\n"))
}

fn to_csv(entries: &[LocaleEntry]) -> String {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for entry in entries {
        writer.write_record([&entry.key, &entry.value]).unwrap();
    }
    String::from_utf8(writer.into_inner().unwrap()).unwrap()
}

fn compile_units(en: &[LocaleEntry], fr: &[LocaleEntry]) -> (Vec<i18ntext::GeneratedUnit>, Vec<String>) {
    let options = CompileOptions::new("/proj", "i18ntext", "out", "App", "en", false);
    let files = vec![
        SourceFile::new("/proj/i18ntext/Text.en.json", to_json(en)).unwrap(),
        SourceFile::new("/proj/i18ntext/Text.fr.csv", to_csv(fr)).unwrap(),
    ];
    let reporter = DiagnosticCollector::new();
    let units = UnitCollector::new();
    compile(files, &options, &reporter, &units, &CancellationToken::new()).unwrap();
    let diagnostics = reporter
        .into_diagnostics()
        .into_iter()
        .map(|d| d.to_string())
        .collect();
    (units.into_units(), diagnostics)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn json_and_csv_yield_identical_entries(entries in entries_strategy()) {
        let json = JsonFormat::from_str("Text.en.json", &to_json(&entries)).unwrap();
        let csv = CsvFormat::from_str("Text.en.csv", &to_csv(&entries)).unwrap();

        prop_assert!(json.is_clean(), "{:?}", json.errors);
        prop_assert!(csv.is_clean(), "{:?}", csv.errors);
        prop_assert_eq!(&json.entries, &entries);
        prop_assert_eq!(&csv.entries, &entries);
    }

    #[test]
    fn fallback_keys_come_first_and_substitute(
        en in entries_strategy(),
        fr in entries_strategy(),
    ) {
        let parsed = BTreeMap::from([("en".to_string(), en.clone()), ("fr".to_string(), fr.clone())]);
        let resolution = resolve("App.Text", &parsed, "en").unwrap();
        let merged = &resolution.merged;

        let fallback_keys: Vec<&str> = en.iter().map(|e| e.key.as_str()).collect();
        prop_assert!(merged.keys.len() >= fallback_keys.len());
        prop_assert_eq!(
            merged.keys[..fallback_keys.len()].iter().map(String::as_str).collect::<Vec<_>>(),
            fallback_keys.clone()
        );

        for entry in &en {
            let expected = fr
                .iter()
                .find(|f| f.key == entry.key)
                .map_or(entry.value.as_str(), |f| f.value.as_str());
            prop_assert_eq!(merged.value("fr", &entry.key), Some(expected));

            let missing = !fr.iter().any(|f| f.key == entry.key);
            let warnings = resolution
                .warnings
                .iter()
                .filter(|w| {
                    w.code == DiagnosticCode::FallbackSubstituted
                        && w.message.contains(&format!("key `{}`", entry.key))
                })
                .count();
            prop_assert_eq!(warnings, usize::from(missing));
        }
    }

    #[test]
    fn compilation_is_deterministic(
        en in entries_strategy(),
        fr in entries_strategy(),
    ) {
        let (first_units, first_diagnostics) = compile_units(&en, &fr);
        let (second_units, second_diagnostics) = compile_units(&en, &fr);
        prop_assert_eq!(first_units.len(), 1);
        prop_assert_eq!(first_units, second_units);
        prop_assert_eq!(first_diagnostics, second_diagnostics);
    }
}
