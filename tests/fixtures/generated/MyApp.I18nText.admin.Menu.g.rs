// <auto-generated>
//     Generated by i18ntext from:
//       en: i18ntext/admin/Menu.en.json
//     Changes to this file will be lost when it is regenerated.
// </auto-generated>

#[doc = "Text table `MyApp.I18nText.admin.Menu`."]
#[allow(non_snake_case, non_camel_case_types, dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Menu {
    #[doc = "Open"]
    pub open: &'static str,
}

#[allow(dead_code)]
impl Menu {
    pub const NAMESPACE: &'static str = "MyApp.I18nText.admin";
}

impl ::i18ntext::runtime::TextTable for Menu {
    const TYPE_NAME: &'static str = "MyApp.I18nText.admin.Menu";
    const FALLBACK_LANGUAGE: &'static str = "en";
    const LANGUAGES: &'static [&'static str] = &["en"];
    const KEYS: &'static [&'static str] = &["open"];
    const VALUES: &'static [&'static [&'static str]] = &[
        // en
        &["Open"],
    ];

    #[allow(unused_variables)]
    fn from_values(values: &'static [&'static str]) -> Self {
        Menu {
            open: values[0],
        }
    }
}

impl ::core::default::Default for Menu {
    fn default() -> Self {
        <Self as ::i18ntext::runtime::TextTable>::fallback()
    }
}
