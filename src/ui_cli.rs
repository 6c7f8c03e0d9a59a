use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use tokio::runtime::Runtime;

use crate::app::AppError;
use crate::calc::{self, Operation, SubmissionState, TransportChain};
use crate::i18n::{keys, Translator};
use crate::localizer::{Localizer, TextRegistry, TextSlot, TextSurface};
use crate::page::{CalculatorForm, HelpPanel, EXAMPLES};
use crate::preferences::PreferenceStore;

const MENU_HEADING: &str = "menu-heading";
const MENU_OPTIONS: &str = "menu-options";
const LANGUAGE_TOGGLE: &str = "language-toggle";

/// 메인 메뉴 선택지를 표현한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Expression,
    Operation,
    Example,
    Calculate,
    Help,
    Language,
    Exit,
}

/// CLI 화면의 번역 대상 목록.
pub fn registry() -> TextRegistry {
    TextRegistry::new()
        .content(MENU_HEADING, keys::TITLE_CALCULATOR)
        .content(MENU_OPTIONS, keys::CLI_MENU_OPTIONS)
        .document_title(keys::TITLE_CALCULATOR)
        .language_toggle(LANGUAGE_TOGGLE)
}

/// 번역된 메뉴 문자열을 보관한다. 언어가 바뀌면 다시 채워진다.
#[derive(Debug, Default)]
pub struct ConsoleSurface {
    texts: HashMap<(String, TextSlot), String>,
    title: String,
    lang: &'static str,
}

impl ConsoleSurface {
    pub fn text<'a>(&'a self, element: &'a str) -> &'a str {
        self.texts
            .get(&(element.to_string(), TextSlot::Content))
            .map(String::as_str)
            .unwrap_or(element)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn lang(&self) -> &'static str {
        self.lang
    }
}

impl TextSurface for ConsoleSurface {
    fn set_text(&mut self, element: &str, slot: TextSlot, text: String) {
        self.texts.insert((element.to_string(), slot), text);
    }

    fn set_document_title(&mut self, title: String) {
        self.title = title;
    }

    fn set_document_language(&mut self, lang_tag: &'static str) {
        self.lang = lang_tag;
    }
}

/// `calc` 명령. 출력 위젯 대신 표준 출력에 결과를 쓴다.
pub fn handle_calc<P: PreferenceStore>(
    runtime: &Runtime,
    chain: &TransportChain,
    localizer: &Localizer<P>,
    operation: &str,
    expression: &str,
) -> Result<(), AppError> {
    let tr = localizer.translator();
    let operation: Operation = match operation.parse() {
        Ok(op) => op,
        Err(e) => {
            println!(
                "{}",
                tr.t_with(keys::CLI_UNKNOWN_OPERATION, &[("operation", operation)])
            );
            return Err(AppError::Operation(e));
        }
    };
    let form = CalculatorForm {
        expression: expression.to_string(),
        operation: Some(operation),
    };
    if !form.can_submit() {
        println!("{}", tr.t(keys::CLI_NOT_READY));
        return Ok(());
    }
    let mut output = String::new();
    runtime.block_on(calc::submit(chain, &tr, &form, &mut output));
    println!("{output}");
    Ok(())
}

/// `lang` 명령. 코드가 없으면 현재 언어만 출력한다.
pub fn handle_lang<P: PreferenceStore>(
    localizer: &mut Localizer<P>,
    surface: &mut ConsoleSurface,
    code: Option<&str>,
) {
    if let Some(code) = code {
        if !localizer.set_locale(code, surface) {
            let current = localizer.t(keys::LANGUAGE_CURRENT);
            println!(
                "{}",
                localizer.t_with(
                    keys::CLI_UNSUPPORTED_LANGUAGE,
                    &[("code", code), ("language", &current)]
                )
            );
            return;
        }
    }
    let current = localizer.t(keys::LANGUAGE_CURRENT);
    println!(
        "{}",
        localizer.t_with(keys::CLI_ACTIVE_LANGUAGE, &[("language", &current)])
    );
}

pub fn print_operations(tr: &Translator) {
    for (i, op) in Operation::ALL.iter().enumerate() {
        println!("{:>2}) {:<10} {}", i + 1, op.as_str(), tr.t(op.label_key()));
    }
}

pub fn print_examples() {
    for (i, example) in EXAMPLES.iter().enumerate() {
        println!("{:>2}) {example}", i + 1);
    }
}

fn print_help(tr: &Translator) {
    for key in [
        keys::HELP_QUICK_START,
        keys::HELP_STEP1,
        keys::HELP_STEP2,
        keys::HELP_STEP3,
        keys::HELP_EXAMPLES,
    ] {
        println!("{}", tr.t(key));
    }
    for (label, example) in [
        (keys::HELP_INTEGRATION, keys::HELP_INTEGRATION_EXAMPLE),
        (keys::HELP_DIFFERENTIATION, keys::HELP_DIFFERENTIATION_EXAMPLE),
        (keys::HELP_SERIES, keys::HELP_SERIES_EXAMPLE),
    ] {
        println!("  {} {}", tr.t(label), tr.t(example));
    }
    println!("{}", tr.t(keys::HELP_IMPORTANT_NOTES));
    for key in [
        keys::HELP_NOTE_VARIABLE,
        keys::HELP_NOTE_CONSTANTS,
        keys::HELP_NOTE_EXP,
        keys::HELP_NOTE_LOADING,
    ] {
        println!("  - {}", tr.t(key));
    }
}

/// 메인 메뉴를 표시하고 선택값을 반환한다. 입력이 끝나면 `Exit`.
fn main_menu(
    input: &mut impl BufRead,
    surface: &ConsoleSurface,
    tr: &Translator,
) -> Result<MenuChoice, AppError> {
    println!("\n=== {} ===", surface.text(MENU_HEADING));
    println!("{}", surface.text(MENU_OPTIONS));
    loop {
        let Some(sel) = read_line(input, &tr.t(keys::CLI_PROMPT_SELECT))? else {
            return Ok(MenuChoice::Exit);
        };
        match sel.trim() {
            "1" => return Ok(MenuChoice::Expression),
            "2" => return Ok(MenuChoice::Operation),
            "3" => return Ok(MenuChoice::Example),
            "4" => return Ok(MenuChoice::Calculate),
            "5" => return Ok(MenuChoice::Help),
            "6" => return Ok(MenuChoice::Language),
            "0" => return Ok(MenuChoice::Exit),
            _ => println!("{}", tr.t(keys::CLI_INVALID_SELECTION)),
        }
    }
}

fn print_form(form: &CalculatorForm, tr: &Translator, output: &str) {
    let op = form
        .operation
        .map(|op| tr.t(op.label_key()))
        .unwrap_or_else(|| tr.t(keys::ACTION_PLACEHOLDER));
    println!("[{op}] {}", form.expression);
    if !output.is_empty() {
        println!("{}: {output}", tr.t(keys::RESULT_LABEL));
    }
}

/// 메뉴 방식 실행 루프.
pub fn interactive<P: PreferenceStore>(
    runtime: &Runtime,
    chain: &TransportChain,
    localizer: &mut Localizer<P>,
    surface: &mut ConsoleSurface,
    input: &mut impl BufRead,
) -> Result<(), AppError> {
    let mut form = CalculatorForm::default();
    let mut help = HelpPanel::default();
    let mut output = String::new();
    loop {
        let tr = localizer.translator();
        print_form(&form, &tr, &output);
        match main_menu(input, surface, &tr)? {
            MenuChoice::Expression => {
                let Some(line) = read_line(input, &tr.t(keys::CLI_PROMPT_EXPRESSION))? else {
                    break;
                };
                form.expression = line.trim_end_matches(['\r', '\n']).to_string();
            }
            MenuChoice::Operation => {
                print_operations(&tr);
                let Some(n) =
                    read_index(input, &tr, keys::CLI_PROMPT_OPERATION, Operation::ALL.len())?
                else {
                    break;
                };
                form.operation = Some(Operation::ALL[n]);
            }
            MenuChoice::Example => {
                println!("{}", tr.t(keys::EXAMPLES_TITLE));
                print_examples();
                let Some(n) = read_index(input, &tr, keys::CLI_PROMPT_SELECT, EXAMPLES.len())?
                else {
                    break;
                };
                form.apply_example(EXAMPLES[n]);
            }
            MenuChoice::Calculate => {
                let state = runtime.block_on(calc::submit(chain, &tr, &form, &mut output));
                if state == SubmissionState::Idle {
                    println!("{}", tr.t(keys::CLI_NOT_READY));
                }
            }
            MenuChoice::Help => {
                if help.toggle() {
                    print_help(&tr);
                }
                println!("[{}]", tr.t(help.label_key()));
            }
            MenuChoice::Language => {
                localizer.toggle(&mut *surface);
                let current = localizer.t(keys::LANGUAGE_CURRENT);
                println!(
                    "{}",
                    localizer.t_with(keys::CLI_ACTIVE_LANGUAGE, &[("language", &current)])
                );
            }
            MenuChoice::Exit => {
                println!("{}", tr.t(keys::CLI_EXIT));
                break;
            }
        }
    }
    Ok(())
}

/// 한 줄을 읽는다. 입력이 끝났으면 `None`.
fn read_line(input: &mut impl BufRead, prompt: &str) -> Result<Option<String>, AppError> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut buf = String::new();
    if input.read_line(&mut buf)? == 0 {
        println!();
        return Ok(None);
    }
    Ok(Some(buf))
}

/// 1부터 시작하는 번호를 읽어 0 기반 인덱스로 돌려준다.
fn read_index(
    input: &mut impl BufRead,
    tr: &Translator,
    prompt_key: &str,
    len: usize,
) -> Result<Option<usize>, AppError> {
    loop {
        let Some(s) = read_line(input, &tr.t(prompt_key))? else {
            return Ok(None);
        };
        match s.trim().parse::<usize>() {
            Ok(n) if (1..=len).contains(&n) => return Ok(Some(n - 1)),
            _ => println!("{}", tr.t(keys::CLI_INVALID_SELECTION)),
        }
    }
}
