//! Line commands that drive the in-memory editor from stdin.

use splitsync_common::HostEvent;
use splitsync_layout::{HostAdapter, MemoryHost, Orientation};

pub const HELP: &str = "\
commands:
  split v|h      split the focused window (v: side by side, h: stacked)
  close          close the focused window
  focus N        focus the Nth window (0-based, layout order)
  open PATH      open PATH in the focused window
  cursor L C     move the cursor in the focused window
  show           print the window list
  quit           exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Split(Orientation),
    Close,
    Focus(usize),
    Open(String),
    Cursor(u32, u32),
    Show,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Err("empty command".into());
        };
        let rest: Vec<&str> = words.collect();

        let command = match (name, rest.as_slice()) {
            ("split", ["v"]) => Command::Split(Orientation::SideBySide),
            ("split", ["h"]) => Command::Split(Orientation::Stacked),
            ("close", []) => Command::Close,
            ("focus", [n]) => Command::Focus(number(n)?),
            ("open", [path]) => Command::Open((*path).to_owned()),
            ("cursor", [line, character]) => Command::Cursor(number(line)?, number(character)?),
            ("show", []) => Command::Show,
            ("help", []) => Command::Help,
            ("quit" | "exit", []) => Command::Quit,
            _ => return Err(format!("unrecognised command: {line}")),
        };
        Ok(command)
    }

    /// Apply to `host`. Returns the event to publish, if any.
    pub fn apply(&self, host: &mut MemoryHost) -> Result<Option<HostEvent>, String> {
        let event = match self {
            Command::Split(orientation) => {
                host.split_focused(*orientation).map_err(|e| e.to_string())?;
                Some(HostEvent::LayoutChanged)
            }
            Command::Close => {
                host.close_focused().map_err(|e| e.to_string())?;
                Some(HostEvent::LayoutChanged)
            }
            Command::Focus(n) => {
                host.focus_nth(*n).map_err(|e| e.to_string())?;
                Some(HostEvent::FocusChanged)
            }
            Command::Open(path) => {
                host.open_in_focused(path).map_err(|e| e.to_string())?;
                Some(HostEvent::BufferOpened { path: path.clone() })
            }
            Command::Cursor(line, character) => {
                host.move_cursor(*line, *character).map_err(|e| e.to_string())?;
                let path = host
                    .shown_path(host.focused_window())
                    .unwrap_or_default()
                    .to_owned();
                Some(HostEvent::ViewChanged { path })
            }
            Command::Show | Command::Help => None,
            Command::Quit => Some(HostEvent::Shutdown),
        };
        Ok(event)
    }
}

fn number<T: std::str::FromStr>(word: &str) -> Result<T, String> {
    word.parse().map_err(|_| format!("not a number: {word}"))
}

/// Text printed after a command, if any.
pub fn output(command: &Command, host: &MemoryHost) -> Option<String> {
    match command {
        Command::Show => {
            let mut text = host.describe();
            for notification in host.notifications().iter() {
                text.push_str(&format!("\n! {}", notification.message));
            }
            Some(text)
        }
        Command::Help => Some(HELP.to_owned()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use splitsync_layout::Extent;

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse("split v"), Ok(Command::Split(Orientation::SideBySide)));
        assert_eq!(Command::parse("split h"), Ok(Command::Split(Orientation::Stacked)));
        assert_eq!(Command::parse("  focus 2 "), Ok(Command::Focus(2)));
        assert_eq!(Command::parse("open src/main.rs"), Ok(Command::Open("src/main.rs".into())));
        assert_eq!(Command::parse("cursor 10 4"), Ok(Command::Cursor(10, 4)));
        assert_eq!(Command::parse("exit"), Ok(Command::Quit));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(Command::parse("").is_err());
        assert!(Command::parse("split x").is_err());
        assert!(Command::parse("focus one").is_err());
        assert!(Command::parse("frobnicate").is_err());
    }

    #[test]
    fn commands_publish_events() {
        let mut host = MemoryHost::new(Extent::new(80, 24));
        assert_eq!(
            Command::Open("a.rs".into()).apply(&mut host),
            Ok(Some(HostEvent::BufferOpened { path: "a.rs".into() }))
        );
        assert_eq!(
            Command::Split(Orientation::SideBySide).apply(&mut host),
            Ok(Some(HostEvent::LayoutChanged))
        );
        assert_eq!(host.list_windows().len(), 2);
        assert_eq!(Command::Focus(0).apply(&mut host), Ok(Some(HostEvent::FocusChanged)));
        assert_eq!(
            Command::Cursor(3, 1).apply(&mut host),
            Ok(Some(HostEvent::ViewChanged { path: "a.rs".into() }))
        );
        assert_eq!(Command::Show.apply(&mut host), Ok(None));
    }

    #[test]
    fn closing_last_window_is_an_error() {
        let mut host = MemoryHost::new(Extent::new(80, 24));
        assert!(Command::Close.apply(&mut host).is_err());
    }

    #[test]
    fn show_lists_windows() {
        let mut host = MemoryHost::new(Extent::new(80, 24));
        host.open_in_focused("a.rs").unwrap();
        let text = output(&Command::Show, &host).unwrap();
        assert!(text.contains("a.rs"));
        assert!(output(&Command::Close, &host).is_none());
    }
}
