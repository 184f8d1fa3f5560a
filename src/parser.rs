use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::MenuError;
use crate::menu::{Action, Menu, VarId, VarKind};

/// `# menu <kind>: <rest>` — the directive comments this tool understands.
fn directive_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^#\s*menu\s+(item|title|comment|envvar|makevar):\s*(.*?)\s*$").unwrap()
    })
}

/// A rule-definition line: anything up to the first colon that is neither a
/// comment nor indented (recipe lines start with a tab).
fn target_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([^#\s].+?)\s?:").unwrap())
}

/// Read an annotated makefile and build the menu its directives describe.
///
/// A file without any directives yields an empty menu. A duplicate choice
/// key aborts the whole build with [`MenuError::DuplicateKey`].
pub fn parse(path: &Path) -> Result<Menu, MenuError> {
    let text = fs::read_to_string(path).map_err(|source| MenuError::File {
        path: path.to_path_buf(),
        source,
    })?;
    parse_lines(path.to_string_lossy().into_owned(), text.lines())
}

/// Scan lines sequentially. An `item` directive arms `pending`; the next
/// rule line with a non-dot target consumes it. Titles, comments and
/// variable directives in between leave `pending` alone.
fn parse_lines<'a>(
    source_path: String,
    lines: impl Iterator<Item = &'a str>,
) -> Result<Menu, MenuError> {
    let mut menu = Menu::new(source_path);
    let mut pending: Option<String> = None;
    for line in lines {
        if let Some(caps) = directive_re().captures(line) {
            let rest = &caps[2];
            match &caps[1] {
                "title" => menu.push_literal(format!("===== {rest} =====")),
                "comment" => menu.push_literal(rest.to_string()),
                "item" => pending = Some(rest.to_string()),
                "envvar" => add_variable(&mut menu, VarKind::Env, rest)?,
                "makevar" => add_variable(&mut menu, VarKind::Make, rest)?,
                _ => unreachable!("directive kinds are fixed by the regex"),
            }
            continue;
        }
        let Some(key) = pending.clone() else { continue };
        if let Some(caps) = target_re().captures(line) {
            if let Some(target) = caps[1].split_whitespace().next() {
                if !target.starts_with('.') {
                    menu.add_command(&key, target, Action::RunTarget(target.to_string()), false)?;
                    pending = None;
                }
            }
        }
    }
    Ok(menu)
}

/// Parse a `[key:]name[=init]` variable spec and register its choice.
///
/// A missing key means the choice key doubles as the variable name. A
/// trailing `=` seeds the variable with the empty string; no `=` leaves it
/// unset until the user assigns it.
fn add_variable(menu: &mut Menu, kind: VarKind, spec: &str) -> Result<(), MenuError> {
    let (head, init) = match spec.split_once('=') {
        Some((head, init)) => (head, Some(init)),
        None => (spec, None),
    };
    let (key, name) = match head.split_once(':') {
        Some((key, name)) => (key, if name.is_empty() { key } else { name }),
        None => (head, head),
    };
    let id = VarId::new(kind, name);
    if let Some(init) = init {
        menu.seed_variable(id.clone(), init.to_string());
    }
    menu.add_command(key, &format!("Set {key}"), Action::SetVariable(id), false)
}
