//! Driver scripts
//!
//! One command per line. Lines starting with `#` are comments.
//!
//! ```text
//! new                       open a tab on the home page
//! click-add                 click the add button
//! activate <id>             click a tab
//! close <id>                click a tab's close control
//! drag <id> <dx>            drag a tab by dx pixels and drop it
//! resize <width>            resize the tab area
//! title <id> <text...>      page title changed
//! url <id> <url>            page URL changed
//! nav <id> <loading> <back> <forward>
//! go <url>                  navigate the active tab
//! back|forward|reload|stop  click a toolbar button
//! adblock                   toggle adblocking
//! key ctrl+t|ctrl+w|ctrl+l  keyboard shortcut
//! settings <json>           apply a settings payload
//! frame [ms]                tick one animation frame
//! print                     dump the document
//! ```

use tabstrip_chrome::{Shortcut, ToolbarButton};

/// A parsed script command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    NewTab,
    ClickAdd,
    Activate(u64),
    Close(u64),
    Drag { id: u64, dx: f32 },
    Resize(f32),
    Title { id: u64, title: String },
    Url { id: u64, url: String },
    Navigation { id: u64, loading: bool, can_go_back: bool, can_go_forward: bool },
    Navigate(String),
    Press(ToolbarButton),
    ToggleAdblock,
    Key(Shortcut),
    Settings(String),
    Frame(f32),
    Print,
}

/// Default frame length in milliseconds
pub const FRAME_MS: f32 = 16.0;

/// Parse a whole script
pub fn parse(text: &str) -> Result<Vec<Command>, String> {
    let mut commands = Vec::new();
    for (number, line) in text.lines().enumerate() {
        match parse_line(line) {
            Ok(Some(command)) => commands.push(command),
            Ok(None) => {}
            Err(e) => return Err(format!("line {}: {}", number + 1, e)),
        }
    }
    Ok(commands)
}

fn parse_line(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };
    let mut args = rest.split_whitespace();

    let command = match name {
        "new" => Command::NewTab,
        "click-add" => Command::ClickAdd,
        "activate" => Command::Activate(number(args.next(), "tab id")?),
        "close" => Command::Close(number(args.next(), "tab id")?),
        "drag" => Command::Drag {
            id: number(args.next(), "tab id")?,
            dx: number(args.next(), "distance")?,
        },
        "resize" => Command::Resize(number(args.next(), "width")?),
        "title" => {
            let id = number(args.next(), "tab id")?;
            let title = rest.split_once(char::is_whitespace).map(|(_, t)| t.trim()).unwrap_or("");
            Command::Title { id, title: title.to_string() }
        }
        "url" => Command::Url {
            id: number(args.next(), "tab id")?,
            url: text(args.next(), "url")?,
        },
        "nav" => Command::Navigation {
            id: number(args.next(), "tab id")?,
            loading: flag(args.next(), "loading")?,
            can_go_back: flag(args.next(), "back")?,
            can_go_forward: flag(args.next(), "forward")?,
        },
        "go" => Command::Navigate(text(args.next(), "url")?),
        "back" => Command::Press(ToolbarButton::Back),
        "forward" => Command::Press(ToolbarButton::Forward),
        "reload" => Command::Press(ToolbarButton::Refresh),
        "stop" => Command::Press(ToolbarButton::Stop),
        "adblock" => Command::ToggleAdblock,
        "key" => Command::Key(shortcut(args.next())?),
        "settings" => Command::Settings(rest.to_string()),
        "frame" => match args.next() {
            Some(_) => Command::Frame(number(Some(rest), "milliseconds")?),
            None => Command::Frame(FRAME_MS),
        },
        "print" => Command::Print,
        other => return Err(format!("unknown command '{}'", other)),
    };
    Ok(Some(command))
}

fn number<T: std::str::FromStr>(arg: Option<&str>, what: &str) -> Result<T, String> {
    let arg = arg.ok_or_else(|| format!("missing {}", what))?;
    arg.parse().map_err(|_| format!("invalid {} '{}'", what, arg))
}

fn text(arg: Option<&str>, what: &str) -> Result<String, String> {
    arg.map(str::to_string).ok_or_else(|| format!("missing {}", what))
}

fn flag(arg: Option<&str>, what: &str) -> Result<bool, String> {
    match arg {
        Some("true") | Some("1") => Ok(true),
        Some("false") | Some("0") => Ok(false),
        Some(other) => Err(format!("invalid {} '{}'", what, other)),
        None => Err(format!("missing {}", what)),
    }
}

fn shortcut(arg: Option<&str>) -> Result<Shortcut, String> {
    match arg.map(str::to_ascii_lowercase).as_deref() {
        Some("ctrl+t") => Ok(Shortcut::NewTab),
        Some("ctrl+w") => Ok(Shortcut::CloseTab),
        Some("ctrl+l") => Ok(Shortcut::FocusAddressBar),
        Some(other) => Err(format!("unknown shortcut '{}'", other)),
        None => Err("missing shortcut".to_string()),
    }
}
