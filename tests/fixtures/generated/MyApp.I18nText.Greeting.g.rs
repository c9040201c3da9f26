// <auto-generated>
//     Generated by i18ntext from:
//       en: i18ntext/Greeting.en.json
//       fr: i18ntext/Greeting.fr.csv
//     Changes to this file will be lost when it is regenerated.
// </auto-generated>

#[doc = "Text table `MyApp.I18nText.Greeting`."]
#[allow(non_snake_case, non_camel_case_types, dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Greeting {
    #[doc = "Hello"]
    pub hello: &'static str,
    #[doc = "Type"]
    pub r#type: &'static str,
    #[doc = "Self"]
    pub self_: &'static str,
    #[doc = "First"]
    pub _1st: &'static str,
    #[doc = "Say \"hi\"\n"]
    pub a_b: &'static str,
    #[doc = ""]
    pub extra: &'static str,
}

#[allow(dead_code)]
impl Greeting {
    pub const NAMESPACE: &'static str = "MyApp.I18nText";
}

impl ::i18ntext::runtime::TextTable for Greeting {
    const TYPE_NAME: &'static str = "MyApp.I18nText.Greeting";
    const FALLBACK_LANGUAGE: &'static str = "en";
    const LANGUAGES: &'static [&'static str] = &["en", "fr"];
    const KEYS: &'static [&'static str] = &["hello", "type", "self", "1st", "a-b", "extra"];
    const VALUES: &'static [&'static [&'static str]] = &[
        // en
        &["Hello", "Type", "Self", "First", "Say \"hi\"\n", ""],
        // fr
        &["Bonjour", "Genre", "Soi", "Premier", "Say \"hi\"\n", "En plus"],
    ];

    #[allow(unused_variables)]
    fn from_values(values: &'static [&'static str]) -> Self {
        Greeting {
            hello: values[0],
            r#type: values[1],
            self_: values[2],
            _1st: values[3],
            a_b: values[4],
            extra: values[5],
        }
    }
}

impl ::core::default::Default for Greeting {
    fn default() -> Self {
        <Self as ::i18ntext::runtime::TextTable>::fallback()
    }
}
