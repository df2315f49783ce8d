//! Tabstrip - a browser tab strip, driven headless
//!
//! Usage: tabstrip [OPTIONS] <SCRIPT>

mod script;

use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use tabstrip_chrome::{build_chrome_document, BrowserUi, ChromeDocument, HostHooks, ToolbarButton, UiConfig};
use tabstrip_dom::{DomTree, NodeId, Queryable};
use tabstrip_tabs::{classes, TabStripManager, TabStripOptions};

use crate::script::{Command, FRAME_MS};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Tab area width when none is given
const DEFAULT_WIDTH: f32 = 800.0;

/// Driver configuration from the command line
#[derive(Debug, Clone)]
struct DriverConfig {
    /// Width of the tab area in pixels
    width: f32,
    /// JSON file with tab strip options
    options_path: Option<PathBuf>,
    /// Script to run; the built-in demo when absent
    script_path: Option<PathBuf>,
}

enum Action {
    Help,
    Version,
    Run(DriverConfig),
}

fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("tabstrip");

    if args.len() < 2 {
        print_usage(program);
        return ExitCode::FAILURE;
    }

    match parse_args(&args[1..]) {
        Ok(Action::Help) => {
            print_usage(program);
            ExitCode::SUCCESS
        }
        Ok(Action::Version) => {
            println!("Tabstrip {}", VERSION);
            ExitCode::SUCCESS
        }
        Ok(Action::Run(config)) => {
            if let Err(e) = run(&config) {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage(program);
            ExitCode::FAILURE
        }
    }
}

fn print_usage(program: &str) {
    println!(
        r#"Tabstrip {} - a browser tab strip, driven headless

USAGE:
    {} [OPTIONS] <SCRIPT>

OPTIONS:
    -h, --help             Print this help message
    -V, --version          Print version information
    --demo                 Run the built-in demo script
    --width <PX>           Width of the tab area (default {})
    --options <PATH>       JSON file with tab strip options

EXAMPLES:
    {} --demo
    {} --width 480 session.tabs
    {} --options compact.json session.tabs

"#,
        VERSION, program, DEFAULT_WIDTH, program, program, program
    );
}

fn parse_args(args: &[String]) -> Result<Action, String> {
    let mut config = DriverConfig {
        width: DEFAULT_WIDTH,
        options_path: None,
        script_path: None,
    };
    let mut demo = false;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => return Ok(Action::Help),
            "--version" | "-V" => return Ok(Action::Version),
            "--demo" => demo = true,
            "--width" => {
                let value = iter.next().ok_or("--width needs a value")?;
                config.width = value
                    .parse()
                    .map_err(|_| format!("invalid width '{}'", value))?;
            }
            "--options" => {
                let value = iter.next().ok_or("--options needs a path")?;
                config.options_path = Some(PathBuf::from(value));
            }
            flag if flag.starts_with('-') => return Err(format!("unknown option '{}'", flag)),
            path => config.script_path = Some(PathBuf::from(path)),
        }
    }

    if !demo && config.script_path.is_none() {
        return Err("no script given".to_string());
    }
    Ok(Action::Run(config))
}

fn run(config: &DriverConfig) -> Result<(), String> {
    let options = match &config.options_path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
            TabStripOptions::from_json(&json).map_err(|e| e.to_string())?
        }
        None => TabStripOptions::default(),
    };

    let source = match &config.script_path {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?,
        None => DEMO_SCRIPT.to_string(),
    };
    let commands = script::parse(&source)?;

    let mut dom = DomTree::new();
    let doc = build_chrome_document(&mut dom, config.width).map_err(|e| e.to_string())?;

    let hooks = HostHooks::new()
        .with_address_bar_focus(|| log::info!("address bar focused"))
        .with_address_bar_blur(|| log::info!("address bar blurred"))
        .with_close_suggestions(|| log::info!("suggestions closed"))
        .with_downloads_badge(|| log::debug!("downloads badge refreshed"));

    let strip = TabStripManager::new().create(&mut dom, doc.strip, options);
    let mut ui = BrowserUi::new(&mut dom, strip, doc.toolbar, hooks, UiConfig::default());

    log::info!("running {} commands at {}px", commands.len(), config.width);
    for command in commands {
        execute(&mut ui, &mut dom, &doc, command)?;
    }
    ui.flush_frames(&mut dom, FRAME_MS);

    print_state(&dom, &ui);
    if ui.quit_requested() {
        println!("\nQuit requested: the last tab was closed");
    }
    Ok(())
}

fn execute(ui: &mut BrowserUi, dom: &mut DomTree, doc: &ChromeDocument, command: Command) -> Result<(), String> {
    log::debug!("{:?}", command);
    match command {
        Command::NewTab => {
            ui.create_new_tab(dom);
        }
        Command::ClickAdd => ui.click(dom, doc.add_button),
        Command::Activate(id) => {
            let element = tab_element(ui, id)?;
            ui.click(dom, element);
        }
        Command::Close(id) => {
            let element = tab_element(ui, id)?;
            let close = dom
                .query_class(element, classes::TAB_CLOSE)
                .ok_or_else(|| format!("tab {} has no close control", id))?;
            ui.click(dom, close);
        }
        Command::Drag { id, dx } => {
            // drags start from settled positions
            ui.flush_frames(dom, FRAME_MS);
            let element = tab_element(ui, id)?;
            let origin_x = ui
                .strip()
                .controllers()
                .iter()
                .find(|c| c.tab == element)
                .map(|c| c.origin_x)
                .ok_or_else(|| format!("tab {} is not draggable", id))?;
            let start = origin_x + 10.0;
            ui.pointer_down(dom, element, start);
            ui.pointer_move(dom, start + dx);
            ui.pointer_up(dom);
            ui.flush_frames(dom, FRAME_MS);
        }
        Command::Resize(width) => {
            dom.set_client_width(doc.content, width).map_err(|e| e.to_string())?;
            ui.resize(dom);
        }
        Command::Title { id, title } => ui.update_tab_title(dom, id, &title),
        Command::Url { id, url } => ui.update_tab_url(dom, id, &url),
        Command::Navigation { id, loading, can_go_back, can_go_forward } => {
            ui.update_tab_navigation(dom, id, loading, can_go_back, can_go_forward)
        }
        Command::Navigate(url) => ui.navigate(dom, &url),
        Command::Press(button) => {
            let toolbar = doc.toolbar;
            let element = match button {
                ToolbarButton::Back => toolbar.back,
                ToolbarButton::Forward => toolbar.forward,
                ToolbarButton::Refresh => toolbar.refresh,
                ToolbarButton::Stop => toolbar.stop,
            };
            let element = element.ok_or_else(|| format!("no {:?} button", button))?;
            ui.click(dom, element);
        }
        Command::ToggleAdblock => ui.toggle_adblock(dom),
        Command::Key(shortcut) => {
            ui.handle_shortcut(dom, shortcut);
        }
        Command::Settings(payload) => {
            ui.apply_settings(dom, &payload);
        }
        Command::Frame(ms) => ui.animation_frame(dom, ms),
        Command::Print => print_state(dom, ui),
    }
    Ok(())
}

fn tab_element(ui: &BrowserUi, id: u64) -> Result<NodeId, String> {
    ui.tab(id)
        .map(|state| state.element)
        .ok_or_else(|| format!("no tab {}", id))
}

fn print_state(dom: &DomTree, ui: &BrowserUi) {
    println!("=== DOM Tree ===\n");
    println!("{}", dom.pretty_print());

    if let Some(style) = ui.strip().style_element() {
        println!("=== Position Rules ===\n");
        println!("{}", dom.text_content(style));
    }

    println!("=== Tabs ===\n");
    for element in ui.strip().tabs(dom) {
        let Some(state) = ui.tabs().find(|s| s.element == element) else {
            continue;
        };
        let marker = if ui.active_tab_id() == Some(state.id) { '*' } else { ' ' };
        let title = if state.title.is_empty() { "(untitled)" } else { state.title.as_str() };
        println!("{} {:>3}  {:<32} {}", marker, state.id, title, state.url);
    }
    println!("\nAdblock: {}", if ui.adblock_enabled() { "on" } else { "off" });
}

/// Script run by `--demo`
const DEMO_SCRIPT: &str = r#"
# three tabs, one of them renamed and navigated
new
new
title 0 Rust Programming Language
url 0 https://www.rust-lang.org/
nav 0 false false false
new
go https://docs.rs/log
go https://docs.rs/env_logger
back
stop

# move the first tab to the end and bring it forward
drag 0 480
activate 1

# close the middle tab and squeeze the strip
close 1
resize 300

settings {"experimental_compact_tabs": true}
adblock
key ctrl+l
frame 500
"#;
