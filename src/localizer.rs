//! 활성 언어와 번역 대상 텍스트 목록을 관리한다.
//!
//! 화면 요소는 시작 시 [`TextRegistry`]에 한 번 등록되고, 언어가 바뀔 때마다
//! 등록된 목록 전체가 [`TextSurface`]에 다시 적용된다.

use crate::i18n::{self, keys, Language, LocaleSignals, Translator};
use crate::preferences::{PreferenceStore, PREFERRED_LANGUAGE_KEY};

/// 번역 결과가 들어갈 자리.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextSlot {
    /// 요소 본문
    Content,
    /// 툴팁(title 속성)
    Title,
    /// 입력 필드 안내문
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBinding {
    pub element: String,
    pub key: &'static str,
    pub slot: TextSlot,
}

/// 번역 대상 요소 목록. 초기화 시 한 번 만들어진다.
#[derive(Debug, Clone, Default)]
pub struct TextRegistry {
    bindings: Vec<TextBinding>,
    title_key: Option<&'static str>,
    toggle: Option<String>,
}

impl TextRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(mut self, element: impl Into<String>, key: &'static str, slot: TextSlot) -> Self {
        self.bindings.push(TextBinding {
            element: element.into(),
            key,
            slot,
        });
        self
    }

    pub fn content(self, element: impl Into<String>, key: &'static str) -> Self {
        self.bind(element, key, TextSlot::Content)
    }

    pub fn title(self, element: impl Into<String>, key: &'static str) -> Self {
        self.bind(element, key, TextSlot::Title)
    }

    pub fn placeholder(self, element: impl Into<String>, key: &'static str) -> Self {
        self.bind(element, key, TextSlot::Placeholder)
    }

    /// 문서 제목에 쓸 키.
    pub fn document_title(mut self, key: &'static str) -> Self {
        self.title_key = Some(key);
        self
    }

    /// 언어 전환 버튼 요소.
    pub fn language_toggle(mut self, element: impl Into<String>) -> Self {
        self.toggle = Some(element.into());
        self
    }

    pub fn bindings(&self) -> &[TextBinding] {
        &self.bindings
    }

    pub fn toggle_element(&self) -> Option<&str> {
        self.toggle.as_deref()
    }
}

/// 번역된 텍스트를 실제로 그리는 쪽.
pub trait TextSurface {
    fn set_text(&mut self, element: &str, slot: TextSlot, text: String);
    fn set_document_title(&mut self, title: String);
    fn set_document_language(&mut self, lang_tag: &'static str);
}

/// 프로세스 전역 언어 상태. 시작 시 한 번 결정되고 `set_locale`로만 바뀐다.
#[derive(Debug)]
pub struct Localizer<P: PreferenceStore> {
    translator: Translator,
    store: P,
    registry: TextRegistry,
    toggle_bound: bool,
}

impl<P: PreferenceStore> Localizer<P> {
    pub fn new(language: Language, store: P, registry: TextRegistry) -> Self {
        Self {
            translator: Translator::new(language),
            store,
            registry,
            toggle_bound: false,
        }
    }

    /// 신호와 저장소의 선호값으로 언어를 결정해 생성한다.
    /// `signals.persisted`가 비어 있으면 저장소 값을 채워 쓴다.
    pub fn resolve(mut signals: LocaleSignals, store: P, registry: TextRegistry) -> Self {
        if signals.persisted.is_none() {
            signals.persisted = store.get(PREFERRED_LANGUAGE_KEY);
        }
        let language = i18n::resolve_language(&signals);
        tracing::debug!(?signals, language = language.as_code(), "resolved locale");
        Self::new(language, store, registry)
    }

    pub fn language(&self) -> Language {
        self.translator.language()
    }

    pub fn translator(&self) -> Translator {
        self.translator
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    pub fn t(&self, key: &str) -> String {
        self.translator.t(key)
    }

    pub fn t_with(&self, key: &str, params: &[(&str, &str)]) -> String {
        self.translator.t_with(key, params)
    }

    /// 최초 렌더링을 수행하고, 전환 버튼이 있으면 연결한다.
    pub fn init(&mut self, surface: &mut dyn TextSurface) {
        self.render(surface);
        self.toggle_bound = self.registry.toggle_element().is_some();
    }

    /// 지원하지 않는 코드면 아무것도 하지 않고 `false`를 돌려준다.
    pub fn set_locale(&mut self, code: &str, surface: &mut dyn TextSurface) -> bool {
        let Some(language) = Language::from_code(code) else {
            tracing::debug!(code, "ignoring unsupported locale");
            return false;
        };
        self.translator.set_language(language);
        if let Err(e) = self.store.set(PREFERRED_LANGUAGE_KEY, language.as_code()) {
            tracing::warn!("failed to persist language preference: {e}");
        }
        self.render(surface);
        true
    }

    /// 전환 버튼 동작. `init` 이후에만 반응한다.
    pub fn toggle(&mut self, surface: &mut dyn TextSurface) -> bool {
        if !self.toggle_bound {
            return false;
        }
        let next = self.language().other();
        self.set_locale(next.as_code(), surface)
    }

    /// 등록된 모든 텍스트를 현재 언어로 다시 적용한다.
    pub fn render(&self, surface: &mut dyn TextSurface) {
        for binding in self.registry.bindings() {
            surface.set_text(&binding.element, binding.slot, self.t(binding.key));
        }
        if let Some(key) = self.registry.title_key {
            surface.set_document_title(self.t(key));
        }
        surface.set_document_language(self.language().html_lang());
        if let Some(toggle) = self.registry.toggle_element() {
            surface.set_text(toggle, TextSlot::Content, self.t(keys::LANGUAGE_SWITCH));
        }
    }
}
