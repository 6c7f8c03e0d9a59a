use proptest::prelude::*;
use symbolic_calculator::{
    config,
    i18n::{interpolate, keys, resolve_language, Language, LocaleSignals, Translator},
    localizer::{Localizer, TextRegistry, TextSlot, TextSurface},
    preferences::{FilePreferences, PreferenceStore, PREFERRED_LANGUAGE_KEY},
};

#[derive(Default)]
struct Page {
    button: String,
    placeholder: String,
    toggle: String,
    title: String,
    lang: &'static str,
}

impl TextSurface for Page {
    fn set_text(&mut self, element: &str, slot: TextSlot, text: String) {
        match (element, slot) {
            ("calculate-btn", TextSlot::Content) => self.button = text,
            ("input-field", TextSlot::Placeholder) => self.placeholder = text,
            ("language-toggle", _) => self.toggle = text,
            _ => {}
        }
    }

    fn set_document_title(&mut self, title: String) {
        self.title = title;
    }

    fn set_document_language(&mut self, lang_tag: &'static str) {
        self.lang = lang_tag;
    }
}

fn registry() -> TextRegistry {
    TextRegistry::new()
        .content("calculate-btn", keys::BUTTON_CALCULATE)
        .placeholder("input-field", keys::INPUT_PLACEHOLDER)
        .document_title(keys::TITLE_CALCULATOR)
        .language_toggle("language-toggle")
}

#[test]
fn switching_language_persists_to_config_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    config::Config::default().save_to(&path).expect("save");

    let mut loc = Localizer::new(Language::En, FilePreferences::new(&path), registry());
    let mut page = Page::default();
    loc.init(&mut page);
    assert_eq!(page.button, "Calculate");
    assert_eq!(page.toggle, "Switch to Chinese");
    assert_eq!(page.lang, "en");

    assert!(loc.set_locale("zh", &mut page));
    assert_eq!(page.button, "计算");
    assert_eq!(page.placeholder, "输入表达式，例如 x^2");
    assert_eq!(page.title, "符号计算器");
    assert_eq!(page.toggle, "English");
    assert_eq!(page.lang, "zh-CN");

    let reloaded = config::load_from(&path).expect("reload");
    assert_eq!(
        reloaded.preferences.get(PREFERRED_LANGUAGE_KEY).map(String::as_str),
        Some("zh")
    );
    assert_eq!(reloaded.api.base_url, "http://localhost:5000");
}

#[test]
fn persisted_choice_is_restored_on_next_start() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    let mut store = FilePreferences::new(&path);
    store.set(PREFERRED_LANGUAGE_KEY, "zh").expect("set");

    let signals = LocaleSignals {
        ambient: Some("en-US".into()),
        ..LocaleSignals::default()
    };
    let loc = Localizer::resolve(signals, FilePreferences::new(&path), registry());
    assert_eq!(loc.language(), Language::Zh);
}

#[test]
fn unsupported_locale_changes_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    let mut loc = Localizer::new(Language::Zh, FilePreferences::new(&path), registry());
    let mut page = Page::default();
    loc.init(&mut page);

    assert!(!loc.set_locale("fr", &mut page));
    assert_eq!(loc.language(), Language::Zh);
    assert_eq!(page.button, "计算");
    assert_eq!(loc.store().get(PREFERRED_LANGUAGE_KEY), None);
    assert!(!path.exists());
}

#[test]
fn override_beats_every_other_signal() {
    let signals = LocaleSignals {
        env_override: Some("en".into()),
        query: Some("zh".into()),
        persisted: Some("zh".into()),
        ambient: Some("zh-CN".into()),
    };
    assert_eq!(resolve_language(&signals), Language::En);
}

#[test]
fn every_key_translates_in_both_languages() {
    let en = Translator::new(Language::En);
    let zh = Translator::new(Language::Zh);
    for key in keys::ALL {
        assert_ne!(en.t(key), *key, "untranslated en key {key}");
        assert_ne!(zh.t(key), *key, "untranslated zh key {key}");
    }
    assert_eq!(
        zh.t_with(keys::CLI_UNKNOWN_OPERATION, &[("operation", "cube")]),
        "未知的运算 'cube'。"
    );
    assert_eq!(zh.t("no.such.key"), "no.such.key");
}

proptest! {
    #[test]
    fn text_without_placeholders_is_untouched(s in "[^{}]*") {
        prop_assert_eq!(interpolate(&s, &[("message", "boom")]), s);
    }

    #[test]
    fn placeholder_is_replaced_by_value(value in "[a-zA-Z0-9 ]{1,20}") {
        let out = interpolate("Error: {{message}}", &[("message", value.as_str())]);
        prop_assert_eq!(out, format!("Error: {value}"));
    }

    #[test]
    fn unknown_placeholder_is_kept(name in "[a-z]{1,8}") {
        prop_assume!(name != "message");
        let template = format!("{{{{{name}}}}}");
        prop_assert_eq!(interpolate(&template, &[("message", "x")]), template);
    }
}
