use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use sys_locale::get_locale;

/// 문자열 키를 모아두는 네임스페이스.
pub mod keys {
    pub const TITLE_CALCULATOR: &str = "title.calculator";

    pub const ACTION_SOLVE: &str = "calculator.actions.solve";
    pub const ACTION_DSOLVE: &str = "calculator.actions.dsolve";
    pub const ACTION_INTEGRATE: &str = "calculator.actions.integrate";
    pub const ACTION_DIFF: &str = "calculator.actions.diff";
    pub const ACTION_SIMPLIFY: &str = "calculator.actions.simplify";
    pub const ACTION_EXPAND: &str = "calculator.actions.expand";
    pub const ACTION_FACTOR: &str = "calculator.actions.factor";
    pub const ACTION_COLLECT: &str = "calculator.actions.collect";
    pub const ACTION_LIMIT: &str = "calculator.actions.limit";
    pub const ACTION_SERIES: &str = "calculator.actions.series";
    pub const ACTION_PLACEHOLDER: &str = "calculator.actions.placeholder";

    pub const INPUT_PLACEHOLDER: &str = "calculator.input.placeholder";
    pub const RESULT_LABEL: &str = "calculator.result.label";
    pub const BUTTON_CALCULATE: &str = "calculator.button.calculate";
    pub const BUTTON_CALCULATE_TITLE: &str = "calculator.button.calculate_title";
    pub const BUTTON_COPY_LATEX: &str = "calculator.button.copy_latex";
    pub const EXAMPLES_TITLE: &str = "calculator.examples.title";

    pub const STATUS_CALCULATING: &str = "status.calculating";
    pub const STATUS_COPIED: &str = "status.copied";
    pub const STATUS_ERROR: &str = "status.error";
    pub const STATUS_ERROR_MESSAGE: &str = "status.error_message";

    pub const HELP_TOGGLE: &str = "help.toggle";
    pub const HELP_HIDE: &str = "help.hide";
    pub const HELP_QUICK_START: &str = "help.quick_start";
    pub const HELP_STEP1: &str = "help.step1";
    pub const HELP_STEP2: &str = "help.step2";
    pub const HELP_STEP3: &str = "help.step3";
    pub const HELP_EXAMPLES: &str = "help.examples";
    pub const HELP_INTEGRATION: &str = "help.integration";
    pub const HELP_INTEGRATION_EXAMPLE: &str = "help.integration_example";
    pub const HELP_DIFFERENTIATION: &str = "help.differentiation";
    pub const HELP_DIFFERENTIATION_EXAMPLE: &str = "help.differentiation_example";
    pub const HELP_SERIES: &str = "help.series";
    pub const HELP_SERIES_EXAMPLE: &str = "help.series_example";
    pub const HELP_IMPORTANT_NOTES: &str = "help.important_notes";
    pub const HELP_NOTE_VARIABLE: &str = "help.note_variable";
    pub const HELP_NOTE_CONSTANTS: &str = "help.note_constants";
    pub const HELP_NOTE_EXP: &str = "help.note_exp";
    pub const HELP_NOTE_LOADING: &str = "help.note_loading";
    pub const HELP_SHORTCUTS: &str = "help.shortcuts";
    pub const HELP_SHORTCUT_SUBMIT: &str = "help.shortcut_submit";
    pub const HELP_SHORTCUT_HELP: &str = "help.shortcut_help";

    pub const LANGUAGE_CURRENT: &str = "language.current";
    pub const LANGUAGE_SWITCH: &str = "language.switch";

    pub const CLI_ACTIVE_LANGUAGE: &str = "cli.active_language";
    pub const CLI_UNSUPPORTED_LANGUAGE: &str = "cli.unsupported_language";
    pub const CLI_UNKNOWN_OPERATION: &str = "cli.unknown_operation";
    pub const CLI_MENU_OPTIONS: &str = "cli.menu_options";
    pub const CLI_PROMPT_SELECT: &str = "cli.prompt_select";
    pub const CLI_PROMPT_EXPRESSION: &str = "cli.prompt_expression";
    pub const CLI_PROMPT_OPERATION: &str = "cli.prompt_operation";
    pub const CLI_NOT_READY: &str = "cli.not_ready";
    pub const CLI_INVALID_SELECTION: &str = "cli.invalid_selection";
    pub const CLI_EXIT: &str = "cli.exit";

    /// 화면에서 사용하는 모든 키. 기본 언어 테이블 완전성 검사에 쓴다.
    pub const ALL: &[&str] = &[
        TITLE_CALCULATOR,
        ACTION_SOLVE,
        ACTION_DSOLVE,
        ACTION_INTEGRATE,
        ACTION_DIFF,
        ACTION_SIMPLIFY,
        ACTION_EXPAND,
        ACTION_FACTOR,
        ACTION_COLLECT,
        ACTION_LIMIT,
        ACTION_SERIES,
        ACTION_PLACEHOLDER,
        INPUT_PLACEHOLDER,
        RESULT_LABEL,
        BUTTON_CALCULATE,
        BUTTON_CALCULATE_TITLE,
        BUTTON_COPY_LATEX,
        EXAMPLES_TITLE,
        STATUS_CALCULATING,
        STATUS_COPIED,
        STATUS_ERROR,
        STATUS_ERROR_MESSAGE,
        HELP_TOGGLE,
        HELP_HIDE,
        HELP_QUICK_START,
        HELP_STEP1,
        HELP_STEP2,
        HELP_STEP3,
        HELP_EXAMPLES,
        HELP_INTEGRATION,
        HELP_INTEGRATION_EXAMPLE,
        HELP_DIFFERENTIATION,
        HELP_DIFFERENTIATION_EXAMPLE,
        HELP_SERIES,
        HELP_SERIES_EXAMPLE,
        HELP_IMPORTANT_NOTES,
        HELP_NOTE_VARIABLE,
        HELP_NOTE_CONSTANTS,
        HELP_NOTE_EXP,
        HELP_NOTE_LOADING,
        HELP_SHORTCUTS,
        HELP_SHORTCUT_SUBMIT,
        HELP_SHORTCUT_HELP,
        LANGUAGE_CURRENT,
        LANGUAGE_SWITCH,
        CLI_ACTIVE_LANGUAGE,
        CLI_UNSUPPORTED_LANGUAGE,
        CLI_UNKNOWN_OPERATION,
        CLI_MENU_OPTIONS,
        CLI_PROMPT_SELECT,
        CLI_PROMPT_EXPRESSION,
        CLI_PROMPT_OPERATION,
        CLI_NOT_READY,
        CLI_INVALID_SELECTION,
        CLI_EXIT,
    ];
}

/// 지원 언어. `En`이 기본(최종 폴백) 언어이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    En,
    Zh,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Zh];
    pub const PRIMARY: Language = Language::En;

    /// 정확히 `en`/`zh`인 코드만 받아들인다.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "en" => Some(Language::En),
            "zh" => Some(Language::Zh),
            _ => None,
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Zh => "zh",
        }
    }

    /// 문서 언어 속성 값.
    pub fn html_lang(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Zh => "zh-CN",
        }
    }

    /// 토글 버튼이 전환할 상대 언어.
    pub fn other(&self) -> Self {
        match self {
            Language::En => Language::Zh,
            Language::Zh => Language::En,
        }
    }

    fn table(&self, key: &str) -> Option<&'static str> {
        match self {
            Language::En => en(key),
            Language::Zh => zh(key),
        }
    }
}

/// 현재 언어에 대한 번역기. 테이블은 정적이며 언어 값만 바뀐다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Translator {
    lang: Language,
}

impl Translator {
    pub fn new(lang: Language) -> Self {
        Self { lang }
    }

    pub fn language(&self) -> Language {
        self.lang
    }

    pub fn language_code(&self) -> &'static str {
        self.lang.as_code()
    }

    pub(crate) fn set_language(&mut self, lang: Language) {
        self.lang = lang;
    }

    /// 현재 언어, 기본 언어 순으로 조회한다. 빈 문자열은 없는 것으로 본다.
    pub fn lookup(&self, key: &str) -> Option<&'static str> {
        first_non_empty(self.lang.table(key), Language::PRIMARY.table(key))
    }

    /// 번역을 가져온다. 어느 테이블에도 없으면 키 자체를 돌려준다.
    pub fn t(&self, key: &str) -> String {
        self.t_with(key, &[])
    }

    /// `{{name}}` 자리표시자를 치환한 번역.
    pub fn t_with(&self, key: &str, params: &[(&str, &str)]) -> String {
        let template = self.lookup(key).unwrap_or(key);
        interpolate(template, params)
    }
}

fn first_non_empty(
    active: Option<&'static str>,
    primary: Option<&'static str>,
) -> Option<&'static str> {
    active
        .filter(|s| !s.is_empty())
        .or_else(|| primary.filter(|s| !s.is_empty()))
}

impl Default for Translator {
    fn default() -> Self {
        Self::new(Language::PRIMARY)
    }
}

static PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{([A-Za-z0-9_]+)\}\}")
        .unwrap_or_else(|e| panic!("invalid placeholder pattern: {e}"))
});

/// `{{name}}` 토큰을 `params`의 값으로 바꾼다. 값이 없거나 비어 있으면 토큰을 그대로 둔다.
pub fn interpolate(template: &str, params: &[(&str, &str)]) -> String {
    if !template.contains("{{") {
        return template.to_string();
    }
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures| {
            let name = &caps[1];
            params
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| *v)
                .filter(|v| !v.is_empty())
                .unwrap_or(&caps[0])
                .to_string()
        })
        .into_owned()
}

/// 시작 시점에 모은 언어 신호. 우선순위는 필드 순서와 같다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleSignals {
    /// 환경 변수(`SYMCALC_LANG`) 같은 명시적 지정.
    pub env_override: Option<String>,
    /// 실행 인자 `--lang`.
    pub query: Option<String>,
    /// 저장된 `preferred-language` 값.
    pub persisted: Option<String>,
    /// 시스템 로케일.
    pub ambient: Option<String>,
}

/// 명시적 지정 → 실행 인자 → 저장된 설정 → 시스템 순으로 언어를 결정한다.
pub fn resolve_language(signals: &LocaleSignals) -> Language {
    if let Some(lang) = signals.env_override.as_deref().and_then(override_language) {
        return lang;
    }
    if let Some(lang) = signals.query.as_deref().and_then(Language::from_code) {
        return lang;
    }
    if let Some(lang) = signals.persisted.as_deref().and_then(Language::from_code) {
        return lang;
    }
    signals
        .ambient
        .as_deref()
        .map(ambient_language)
        .unwrap_or(Language::PRIMARY)
}

// 값이 있기만 하면 언어가 정해진다.
fn override_language(value: &str) -> Option<Language> {
    let v = value.trim().to_lowercase();
    if v.is_empty() {
        None
    } else if v.contains("zh") || v.contains("chinese") {
        Some(Language::Zh)
    } else {
        Some(Language::En)
    }
}

fn ambient_language(loc: &str) -> Language {
    if loc.to_lowercase().contains("zh") {
        Language::Zh
    } else {
        Language::En
    }
}

/// 시스템 로케일 문자열을 얻는다.
pub fn detect_system_language() -> Option<String> {
    if let Some(loc) = get_locale() {
        return Some(loc);
    }
    for var in ["LC_ALL", "LANG"] {
        if let Ok(lang) = std::env::var(var) {
            if !lang.is_empty() {
                return Some(lang);
            }
        }
    }
    None
}

fn en(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        TITLE_CALCULATOR => "Symbolic Calculator",
        ACTION_SOLVE => "Solve",
        ACTION_DSOLVE => "Dsolve",
        ACTION_INTEGRATE => "Integrate",
        ACTION_DIFF => "Differentiate",
        ACTION_SIMPLIFY => "Simplify",
        ACTION_EXPAND => "Expand",
        ACTION_FACTOR => "Factor",
        ACTION_COLLECT => "Collect",
        ACTION_LIMIT => "Limit",
        ACTION_SERIES => "Series",
        ACTION_PLACEHOLDER => "Select an operation",
        INPUT_PLACEHOLDER => "Enter an expression, e.g. x^2",
        RESULT_LABEL => "Result",
        BUTTON_CALCULATE => "Calculate",
        BUTTON_CALCULATE_TITLE => "Calculate (Ctrl/Cmd+Enter)",
        BUTTON_COPY_LATEX => "Copy LaTeX",
        EXAMPLES_TITLE => "Example Expressions",
        STATUS_CALCULATING => "Calculating... first time loading may be slow, please wait",
        STATUS_COPIED => "Copied!",
        STATUS_ERROR => "Error",
        STATUS_ERROR_MESSAGE => "Error: {{message}}",
        HELP_TOGGLE => "Help",
        HELP_HIDE => "Hide Help",
        HELP_QUICK_START => "Quick Start",
        HELP_STEP1 => "Enter a mathematical expression in the input field above",
        HELP_STEP2 => "Select an operation (integrate, differentiate, etc.) from the dropdown",
        HELP_STEP3 => "Click \"Calculate\" to see the result",
        HELP_EXAMPLES => "Examples",
        HELP_INTEGRATION => "Integration:",
        HELP_INTEGRATION_EXAMPLE => "x^2 → x³/3",
        HELP_DIFFERENTIATION => "Differentiation:",
        HELP_DIFFERENTIATION_EXAMPLE => "x³ → 3x²",
        HELP_SERIES => "Series:",
        HELP_SERIES_EXAMPLE => "sin(x) → x - x³/6 + x⁵/120 + ...",
        HELP_IMPORTANT_NOTES => "Important Notes",
        HELP_NOTE_VARIABLE => "Only use 'x' as a variable",
        HELP_NOTE_CONSTANTS => "a, b, c are real constants",
        HELP_NOTE_EXP => "Use exp(x) instead of e^x",
        HELP_NOTE_LOADING => "First calculation may take up to 15 seconds",
        HELP_SHORTCUTS => "Shortcuts",
        HELP_SHORTCUT_SUBMIT => "Ctrl/Cmd+Enter: calculate",
        HELP_SHORTCUT_HELP => "F1 or Ctrl/Cmd+H: show or hide help",
        LANGUAGE_CURRENT => "English",
        LANGUAGE_SWITCH => "Switch to Chinese",
        CLI_ACTIVE_LANGUAGE => "Active language: {{language}}",
        CLI_UNSUPPORTED_LANGUAGE => "Unsupported language '{{code}}'; keeping {{language}}.",
        CLI_UNKNOWN_OPERATION => "Unknown operation '{{operation}}'.",
        CLI_MENU_OPTIONS => "1) Expression  2) Operation  3) Example  4) Calculate  5) Help  6) Language  0) Exit",
        CLI_PROMPT_SELECT => "Select: ",
        CLI_PROMPT_EXPRESSION => "Expression: ",
        CLI_PROMPT_OPERATION => "Operation number: ",
        CLI_NOT_READY => "Enter an expression and select an operation first.",
        CLI_INVALID_SELECTION => "Invalid input. Please try again.",
        CLI_EXIT => "Goodbye.",
        _ => return None,
    })
}

fn zh(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        TITLE_CALCULATOR => "符号计算器",
        ACTION_SOLVE => "求解",
        ACTION_DSOLVE => "求解微分方程",
        ACTION_INTEGRATE => "积分",
        ACTION_DIFF => "求导",
        ACTION_SIMPLIFY => "化简",
        ACTION_EXPAND => "展开",
        ACTION_FACTOR => "因式分解",
        ACTION_COLLECT => "合并同类项",
        ACTION_LIMIT => "极限",
        ACTION_SERIES => "级数",
        ACTION_PLACEHOLDER => "选择操作",
        INPUT_PLACEHOLDER => "输入表达式，例如 x^2",
        RESULT_LABEL => "结果",
        BUTTON_CALCULATE => "计算",
        BUTTON_CALCULATE_TITLE => "计算（Ctrl/Cmd+Enter）",
        BUTTON_COPY_LATEX => "复制 LaTeX",
        EXAMPLES_TITLE => "示例表达式",
        STATUS_CALCULATING => "计算中...首次加载缓慢请耐心等待",
        STATUS_COPIED => "已复制！",
        STATUS_ERROR => "错误",
        STATUS_ERROR_MESSAGE => "错误: {{message}}",
        HELP_TOGGLE => "帮助",
        HELP_HIDE => "隐藏帮助",
        HELP_QUICK_START => "快速开始",
        HELP_STEP1 => "在上方输入框中输入数学表达式",
        HELP_STEP2 => "从下拉菜单中选择操作（积分、求导等）",
        HELP_STEP3 => "点击\"计算\"查看结果",
        HELP_EXAMPLES => "示例",
        HELP_INTEGRATION => "积分：",
        HELP_INTEGRATION_EXAMPLE => "x^2 → x³/3",
        HELP_DIFFERENTIATION => "求导：",
        HELP_DIFFERENTIATION_EXAMPLE => "x³ → 3x²",
        HELP_SERIES => "级数：",
        HELP_SERIES_EXAMPLE => "sin(x) → x - x³/6 + x⁵/120 + ...",
        HELP_IMPORTANT_NOTES => "重要提示",
        HELP_NOTE_VARIABLE => "只能使用 'x' 作为变量",
        HELP_NOTE_CONSTANTS => "a, b, c 是实数常数",
        HELP_NOTE_EXP => "使用 exp(x) 而不是 e^x",
        HELP_NOTE_LOADING => "首次计算可能需要15秒",
        HELP_SHORTCUTS => "快捷键",
        HELP_SHORTCUT_SUBMIT => "Ctrl/Cmd+Enter：计算",
        HELP_SHORTCUT_HELP => "F1 或 Ctrl/Cmd+H：显示或隐藏帮助",
        LANGUAGE_CURRENT => "中文",
        LANGUAGE_SWITCH => "English",
        CLI_ACTIVE_LANGUAGE => "当前语言：{{language}}",
        CLI_UNSUPPORTED_LANGUAGE => "不支持的语言 '{{code}}'，保持 {{language}}。",
        CLI_UNKNOWN_OPERATION => "未知的运算 '{{operation}}'。",
        CLI_MENU_OPTIONS => "1) 表达式  2) 操作  3) 示例  4) 计算  5) 帮助  6) 语言  0) 退出",
        CLI_PROMPT_SELECT => "选择：",
        CLI_PROMPT_EXPRESSION => "表达式：",
        CLI_PROMPT_OPERATION => "操作编号：",
        CLI_NOT_READY => "请先输入表达式并选择操作。",
        CLI_INVALID_SELECTION => "输入无效，请重试。",
        CLI_EXIT => "再见。",
        _ => return None,
    })
}
