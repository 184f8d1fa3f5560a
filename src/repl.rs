//! The interactive loop around a [`Menu`]: print it at the current terminal
//! width, read a choice with tab completion, dispatch it, repeat until a
//! quit action fires or input ends.

use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use crate::error::MenuError;
use crate::layout;
use crate::menu::{LineInput, Menu};
use crate::process::SystemRunner;

/// Rustyline helper that completes over the menu's choice keys.
///
/// The candidate list is refreshed before every choice prompt and cleared
/// for nested variable prompts, where completing choice keys would be
/// misleading.
#[derive(Default)]
pub struct ChoiceCompleter {
    choices: Vec<String>,
}

impl Completer for ChoiceCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        let candidates = self
            .choices
            .iter()
            .filter(|choice| choice.starts_with(prefix))
            .map(|choice| Pair {
                display: choice.clone(),
                replacement: choice.clone(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Hinter for ChoiceCompleter {
    type Hint = String;
}

impl Highlighter for ChoiceCompleter {}

impl Validator for ChoiceCompleter {}

impl Helper for ChoiceCompleter {}

/// Line input backed by the shared rustyline editor, used for the nested
/// variable prompts. Prefill puts the current value on the line for
/// in-place editing.
struct EditorInput<'a> {
    editor: &'a mut Editor<ChoiceCompleter, DefaultHistory>,
}

impl LineInput for EditorInput<'_> {
    fn read_line(&mut self, prompt: &str, prefill: &str) -> Result<String, MenuError> {
        if let Some(helper) = self.editor.helper_mut() {
            helper.choices.clear();
        }
        match self.editor.readline_with_initial(prompt, (prefill, "")) {
            Ok(line) => Ok(line),
            Err(ReadlineError::Interrupted) => Err(MenuError::Interrupted),
            Err(ReadlineError::Eof) => Err(MenuError::Eof),
            Err(err) => Err(MenuError::Input(err.to_string())),
        }
    }
}

/// Drive the menu until a quit action fires or input ends.
///
/// An interrupt at any prompt — the choice prompt or a nested variable
/// prompt — redraws the menu and continues; end of input terminates the
/// loop gracefully.
pub fn run(menu: &mut Menu) -> anyhow::Result<()> {
    let runner = SystemRunner;
    let mut editor: Editor<ChoiceCompleter, DefaultHistory> = Editor::new()?;
    editor.set_helper(Some(ChoiceCompleter::default()));
    loop {
        println!("{}\n", layout::render(menu, terminal_width()));
        let mut choices = menu.choice_keys();
        choices.sort();
        if let Some(helper) = editor.helper_mut() {
            helper.choices = choices;
        }
        let choice = match editor.readline("Choice: ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => return Ok(()),
            Err(err) => return Err(err.into()),
        };
        let _ = editor.add_history_entry(choice.as_str());
        let mut input = EditorInput {
            editor: &mut editor,
        };
        match menu.invoke(&choice, &mut input, &runner) {
            Ok((output, should_exit)) => {
                println!("{output}");
                if should_exit {
                    return Ok(());
                }
            }
            Err(MenuError::Interrupted) => continue,
            Err(MenuError::Eof) => return Ok(()),
            Err(err) => return Err(err.into()),
        }
    }
}

/// Width to render at: `COLUMNS` when set, else the terminal size reported
/// by the tty, else 80.
fn terminal_width() -> usize {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|value| value.parse().ok())
        .or_else(tty_width)
        .unwrap_or(80)
}

#[cfg(unix)]
fn tty_width() -> Option<usize> {
    use std::os::unix::io::AsRawFd;
    let fd = std::io::stdout().as_raw_fd();
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let res = unsafe { libc::ioctl(fd, libc::TIOCGWINSZ, &mut ws) };
    if res == -1 {
        return None;
    }
    (ws.ws_col > 0).then_some(ws.ws_col as usize)
}

#[cfg(not(unix))]
fn tty_width() -> Option<usize> {
    None
}
