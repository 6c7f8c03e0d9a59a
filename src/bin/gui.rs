#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! eframe/egui 기반 데스크톱 GUI 진입점.

use clap::Parser;
use eframe::{egui, App, Frame};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};
use std::{env, fs};
use symbolic_calculator::{
    calc::{self, Operation, OutputSink, SubmissionState, TransportChain},
    config,
    i18n::{self, keys, LocaleSignals},
    localizer::{Localizer, TextRegistry, TextSlot, TextSurface},
    logging,
    page::{
        shortcut_action, CalculatorForm, Clipboard, ClipboardError, CopyFeedback, HelpPanel, Key,
        KeyPress, ShortcutAction, EXAMPLES,
    },
    preferences::FilePreferences,
};

const INPUT_FIELD: &str = "input-field";
const ACTION_SELECT: &str = "action-select";
const CALCULATE_BTN: &str = "calculate-btn";
const RESULT_FIELD: &str = "result-field";
const EXAMPLES_SECTION: &str = "examples-section";
const LANGUAGE_TOGGLE: &str = "language-toggle";

/// 도움말 패널에 순서대로 표시되는 키. 요소 id로도 쓴다.
const HELP_LINES: &[&str] = &[
    keys::HELP_QUICK_START,
    keys::HELP_STEP1,
    keys::HELP_STEP2,
    keys::HELP_STEP3,
    keys::HELP_EXAMPLES,
    keys::HELP_INTEGRATION,
    keys::HELP_INTEGRATION_EXAMPLE,
    keys::HELP_DIFFERENTIATION,
    keys::HELP_DIFFERENTIATION_EXAMPLE,
    keys::HELP_SERIES,
    keys::HELP_SERIES_EXAMPLE,
    keys::HELP_IMPORTANT_NOTES,
    keys::HELP_NOTE_VARIABLE,
    keys::HELP_NOTE_CONSTANTS,
    keys::HELP_NOTE_EXP,
    keys::HELP_NOTE_LOADING,
    keys::HELP_SHORTCUTS,
    keys::HELP_SHORTCUT_SUBMIT,
    keys::HELP_SHORTCUT_HELP,
];

/// GUI 실행 인자.
#[derive(Debug, Parser)]
#[command(name = "symbolic_calculator", version)]
struct GuiArgs {
    /// 표시 언어(en/zh)
    #[arg(long, short = 'L')]
    lang: Option<String>,
    #[arg(long = "lang-override", env = "SYMCALC_LANG", hide = true)]
    lang_override: Option<String>,
    #[arg(long, default_value = config::CONFIG_FILE)]
    config: PathBuf,
}

fn main() {
    logging::init();
    if let Err(err) = try_run() {
        tracing::error!("{err}");
        std::process::exit(1);
    }
}

fn try_run() -> Result<(), Box<dyn std::error::Error>> {
    let args = GuiArgs::parse();
    let app_cfg = config::load_or_create(&args.config).unwrap_or_else(|e| {
        tracing::warn!("failed to load config, using defaults: {e}");
        config::Config::default()
    });
    let signals = LocaleSignals {
        env_override: args.lang_override.clone(),
        query: args.lang.clone(),
        persisted: None,
        ambient: i18n::detect_system_language(),
    };
    let localizer = Localizer::resolve(signals, FilePreferences::new(&args.config), registry());
    let chain = TransportChain::from_config(&app_cfg.api)?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;
    tracing::info!(
        language = localizer.language().as_code(),
        fallback = chain.has_fallback(),
        "GUI starting"
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([860.0, 640.0]),
        ..Default::default()
    };
    let copy_feedback = Duration::from_millis(app_cfg.ui.copy_feedback_ms);
    eframe::run_native(
        "Symbolic Calculator",
        options,
        Box::new(move |cc| {
            if let Err(e) = setup_fonts(&cc.egui_ctx) {
                tracing::warn!("Font error: {e}");
            }
            Box::new(GuiApp::new(localizer, chain, runtime, copy_feedback))
        }),
    )?;
    Ok(())
}

/// 번역 대상 요소 목록.
fn registry() -> TextRegistry {
    let mut reg = TextRegistry::new()
        .placeholder(INPUT_FIELD, keys::INPUT_PLACEHOLDER)
        .placeholder(ACTION_SELECT, keys::ACTION_PLACEHOLDER)
        .content(CALCULATE_BTN, keys::BUTTON_CALCULATE)
        .title(CALCULATE_BTN, keys::BUTTON_CALCULATE_TITLE)
        .content(RESULT_FIELD, keys::RESULT_LABEL)
        .content(EXAMPLES_SECTION, keys::EXAMPLES_TITLE)
        .document_title(keys::TITLE_CALCULATOR)
        .language_toggle(LANGUAGE_TOGGLE);
    for &key in HELP_LINES {
        reg = reg.content(key, key);
    }
    for op in Operation::ALL {
        reg = reg.content(op.as_str(), op.label_key());
    }
    reg
}

/// 번역된 문자열 보관소. 창 제목은 다음 프레임에 반영된다.
#[derive(Debug, Default)]
struct LabelStore {
    texts: HashMap<(String, TextSlot), String>,
    pending_title: Option<String>,
    lang: &'static str,
}

impl LabelStore {
    fn get(&self, element: &str, slot: TextSlot) -> String {
        self.texts
            .get(&(element.to_string(), slot))
            .cloned()
            .unwrap_or_else(|| element.to_string())
    }

    fn text(&self, element: &str) -> String {
        self.get(element, TextSlot::Content)
    }
}

impl TextSurface for LabelStore {
    fn set_text(&mut self, element: &str, slot: TextSlot, text: String) {
        self.texts.insert((element.to_string(), slot), text);
    }

    fn set_document_title(&mut self, title: String) {
        self.pending_title = Some(title);
    }

    fn set_document_language(&mut self, lang_tag: &'static str) {
        self.lang = lang_tag;
    }
}

/// 비동기 제출 결과를 UI 스레드로 넘긴다.
enum GuiEvent {
    Output(String),
    State(SubmissionState),
}

struct ChannelSink {
    tx: Sender<GuiEvent>,
    ctx: egui::Context,
}

impl OutputSink for ChannelSink {
    fn set_output(&mut self, markup: String) {
        let _ = self.tx.send(GuiEvent::Output(markup));
        self.ctx.request_repaint();
    }

    fn on_state(&mut self, state: &SubmissionState) {
        let _ = self.tx.send(GuiEvent::State(state.clone()));
        self.ctx.request_repaint();
    }
}

struct EguiClipboard<'a>(&'a egui::Context);

impl Clipboard for EguiClipboard<'_> {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.0.output_mut(|o| o.copied_text = text.to_string());
        Ok(())
    }
}

struct GuiApp {
    localizer: Localizer<FilePreferences>,
    labels: LabelStore,
    form: CalculatorForm,
    output: String,
    state: SubmissionState,
    help: HelpPanel,
    copy: CopyFeedback,
    chain: TransportChain,
    runtime: tokio::runtime::Runtime,
    tx: Sender<GuiEvent>,
    rx: Receiver<GuiEvent>,
    input_id: Option<egui::Id>,
}

impl GuiApp {
    fn new(
        mut localizer: Localizer<FilePreferences>,
        chain: TransportChain,
        runtime: tokio::runtime::Runtime,
        copy_feedback: Duration,
    ) -> Self {
        let mut labels = LabelStore::default();
        localizer.init(&mut labels);
        let (tx, rx) = mpsc::channel();
        Self {
            localizer,
            labels,
            form: CalculatorForm::default(),
            output: String::new(),
            state: SubmissionState::Idle,
            help: HelpPanel::default(),
            copy: CopyFeedback::new(copy_feedback),
            chain,
            runtime,
            tx,
            rx,
            input_id: None,
        }
    }

    /// 새 제출은 항상 기본 전송부터 시작한다. 겹친 제출은 마지막 응답이 이긴다.
    fn submit(&self, ctx: &egui::Context) {
        if !self.form.can_submit() {
            return;
        }
        let chain = self.chain.clone();
        let tr = self.localizer.translator();
        let form = self.form.clone();
        let mut sink = ChannelSink {
            tx: self.tx.clone(),
            ctx: ctx.clone(),
        };
        self.runtime.spawn(async move {
            calc::submit(&chain, &tr, &form, &mut sink).await;
        });
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.rx.try_recv() {
            match event {
                GuiEvent::Output(markup) => self.output = markup,
                GuiEvent::State(state) => self.state = state,
            }
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let presses: Vec<KeyPress> = ctx.input(|i| {
            i.events
                .iter()
                .filter_map(|e| match e {
                    egui::Event::Key {
                        key,
                        pressed: true,
                        modifiers,
                        ..
                    } => map_key(*key).map(|key| KeyPress {
                        key,
                        command: modifiers.command,
                    }),
                    _ => None,
                })
                .collect()
        });
        for press in presses {
            match shortcut_action(press) {
                Some(ShortcutAction::Submit) => self.submit(ctx),
                Some(ShortcutAction::ToggleHelp) => {
                    self.help.toggle();
                }
                None => {}
            }
        }
    }

    fn ui_calculator(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let tr = self.localizer.translator();

        let input = ui.add(
            egui::TextEdit::singleline(&mut self.form.expression)
                .hint_text(self.labels.get(INPUT_FIELD, TextSlot::Placeholder))
                .font(egui::TextStyle::Monospace)
                .desired_width(f32::INFINITY),
        );
        self.input_id = Some(input.id);

        let mut submit_clicked = false;
        ui.horizontal(|ui| {
            let selected = self
                .form
                .operation
                .map(|op| self.labels.text(op.as_str()))
                .unwrap_or_else(|| self.labels.get(ACTION_SELECT, TextSlot::Placeholder));
            egui::ComboBox::from_id_source(ACTION_SELECT)
                .selected_text(selected)
                .show_ui(ui, |ui| {
                    for op in Operation::ALL {
                        ui.selectable_value(
                            &mut self.form.operation,
                            Some(op),
                            self.labels.text(op.as_str()),
                        );
                    }
                });
            let title = self.labels.get(CALCULATE_BTN, TextSlot::Title);
            let button = ui
                .add_enabled(
                    self.form.can_submit(),
                    egui::Button::new(self.labels.text(CALCULATE_BTN)),
                )
                .on_hover_text(title.clone())
                .on_disabled_hover_text(title);
            submit_clicked = button.clicked();
            if matches!(self.state, SubmissionState::Submitting(_)) {
                ui.spinner();
            }
        });
        if submit_clicked {
            self.submit(ctx);
        }

        ui.add_space(6.0);
        ui.label(self.labels.text(EXAMPLES_SECTION));
        let mut picked = None;
        ui.horizontal_wrapped(|ui| {
            for example in EXAMPLES {
                if ui.button(egui::RichText::new(*example).monospace()).clicked() {
                    picked = Some(*example);
                }
            }
        });
        if let Some(example) = picked {
            self.form.apply_example(example);
            if let Some(id) = self.input_id {
                ctx.memory_mut(|m| m.request_focus(id));
            }
        }

        ui.separator();
        ui.label(self.labels.text(RESULT_FIELD));
        let mut shown = self.output.as_str();
        ui.add(
            egui::TextEdit::multiline(&mut shown)
                .font(egui::TextStyle::Monospace)
                .desired_rows(3)
                .desired_width(f32::INFINITY),
        );

        let now = Instant::now();
        if ui.button(tr.t(self.copy.label_key(now))).clicked() {
            let mut clipboard = EguiClipboard(ctx);
            self.copy.copy_result(&self.output, &mut clipboard, now);
        }
        if let Some(remaining) = self.copy.remaining(Instant::now()) {
            ctx.request_repaint_after(remaining);
        }
    }

    fn ui_help(&self, ui: &mut egui::Ui) {
        egui::Frame::group(ui.style()).show(ui, |ui| {
            for &key in HELP_LINES {
                let text = self.labels.text(key);
                match key {
                    keys::HELP_QUICK_START
                    | keys::HELP_EXAMPLES
                    | keys::HELP_IMPORTANT_NOTES
                    | keys::HELP_SHORTCUTS => {
                        ui.strong(text);
                    }
                    _ => {
                        ui.label(text);
                    }
                }
            }
        });
    }
}

impl App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.drain_events();
        self.handle_shortcuts(ctx);

        if let Some(title) = self.labels.pending_title.take() {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title));
        }

        // 상단 바
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(self.localizer.t(keys::TITLE_CALCULATOR));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button(self.labels.text(LANGUAGE_TOGGLE)).clicked() {
                        self.localizer.toggle(&mut self.labels);
                    }
                    let help_label = self.localizer.t(self.help.label_key());
                    if ui.button(help_label).clicked() {
                        self.help.toggle();
                    }
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    self.ui_calculator(ui, ctx);
                    if self.help.visible() {
                        ui.add_space(8.0);
                        self.ui_help(ui);
                    }
                });
        });
    }
}

fn map_key(key: egui::Key) -> Option<Key> {
    match key {
        egui::Key::Enter => Some(Key::Enter),
        egui::Key::F1 => Some(Key::F1),
        egui::Key::H => Some(Key::Char('h')),
        _ => None,
    }
}

fn apply_font_bytes(ctx: &egui::Context, bytes: Vec<u8>, name: &str) {
    let mut fonts = egui::FontDefinitions::default();
    let font_name = name.to_string();
    fonts
        .font_data
        .insert(font_name.clone(), egui::FontData::from_owned(bytes));
    // 라틴 문자는 기본 폰트, 한자는 대체 폰트로 그린다.
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        fonts
            .families
            .entry(family)
            .or_default()
            .push(font_name.clone());
    }
    ctx.set_fonts(fonts);
}

/// 중국어를 표시하기 위해 CJK 폰트를 대체 폰트로 등록한다.
/// 1) SYMCALC_FONT 환경 변수 경로
/// 2) 운영체제별 시스템 폰트
fn setup_fonts(ctx: &egui::Context) -> Result<(), String> {
    if let Some(path) = env::var_os("SYMCALC_FONT") {
        let path = PathBuf::from(path);
        let bytes = fs::read(&path)
            .map_err(|e| format!("Failed to read font file ({}): {e}", path.display()))?;
        apply_font_bytes(ctx, bytes, "user_font");
        return Ok(());
    }

    let mut candidates: Vec<PathBuf> = vec![
        "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc".into(),
        "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc".into(),
        "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc".into(),
        "/System/Library/Fonts/PingFang.ttc".into(),
        "/System/Library/Fonts/STHeiti Light.ttc".into(),
    ];
    if let Some(windir) = env::var_os("WINDIR") {
        let fonts = Path::new(&windir).join("Fonts");
        candidates.extend(["msyh.ttc", "simhei.ttf", "simsun.ttc"].map(|f| fonts.join(f)));
    }
    for p in candidates {
        if p.exists() {
            let bytes = fs::read(&p)
                .map_err(|e| format!("Failed to read system font ({}): {e}", p.display()))?;
            apply_font_bytes(ctx, bytes, "cjk_font");
            return Ok(());
        }
    }
    Err("CJK font not found; set SYMCALC_FONT to a .ttf/.ttc file.".into())
}
