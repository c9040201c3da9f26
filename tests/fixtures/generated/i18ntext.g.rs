// <auto-generated>
//     Generated by i18ntext.
// </auto-generated>

#[allow(non_snake_case)]
pub mod MyApp {
    #[allow(non_snake_case)]
    pub mod I18nText {
        include!("MyApp.I18nText.Empty.g.rs");
        include!("MyApp.I18nText.Greeting.g.rs");
        #[allow(non_snake_case)]
        pub mod admin {
            include!("MyApp.I18nText.admin.Menu.g.rs");
        }
    }
}
