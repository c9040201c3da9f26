// <auto-generated>
//     Generated by i18ntext from:
//       en: i18ntext/Empty.en.json
//     Changes to this file will be lost when it is regenerated.
// </auto-generated>

#[doc = "Text table `MyApp.I18nText.Empty`."]
#[allow(non_snake_case, non_camel_case_types, dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Empty {
}

#[allow(dead_code)]
impl Empty {
    pub const NAMESPACE: &'static str = "MyApp.I18nText";
}

impl ::i18ntext::runtime::TextTable for Empty {
    const TYPE_NAME: &'static str = "MyApp.I18nText.Empty";
    const FALLBACK_LANGUAGE: &'static str = "en";
    const LANGUAGES: &'static [&'static str] = &["en"];
    const KEYS: &'static [&'static str] = &[];
    const VALUES: &'static [&'static [&'static str]] = &[
        // en
        &[],
    ];

    #[allow(unused_variables)]
    fn from_values(values: &'static [&'static str]) -> Self {
        Empty {
        }
    }
}

impl ::core::default::Default for Empty {
    fn default() -> Self {
        <Self as ::i18ntext::runtime::TextTable>::fallback()
    }
}
