use std::collections::{BTreeMap, HashMap};
use std::env as stdenv;

use crate::error::MenuError;
use crate::process::{MAKE, ToolRunner};

/// Where a bound variable ends up when the build tool runs: in the child
/// process environment, or on the command line as `name=value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VarKind {
    Env,
    Make,
}

/// Identifier of a bound variable: its kind plus the variable name.
///
/// Two variables with the same name but different kinds are distinct.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarId {
    pub kind: VarKind,
    pub name: String,
}

impl VarId {
    pub fn new(kind: VarKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}

/// What happens when the user picks a choice.
#[derive(Debug, Clone)]
pub enum Action {
    /// Leave the menu loop.
    Quit,
    /// Prompt for a new value of the variable and store it.
    SetVariable(VarId),
    /// Run the build tool against the named target.
    RunTarget(String),
}

/// A single printable element of the menu, in file order.
#[derive(Debug, Clone, PartialEq)]
pub enum MenuEntry {
    /// A line printed verbatim (titles and comments).
    Literal(String),
    /// An ordered block of `(choice key, description)` pairs, rendered as
    /// columns by the layout module.
    Group(Vec<(String, String)>),
}

/// Prompts the user for one line of input.
///
/// `prefill` is a default the user can edit in place; implementations
/// without in-place editing may ignore it. The interactive implementation
/// lives in [`crate::repl`]; tests supply scripted ones.
pub trait LineInput {
    fn read_line(&mut self, prompt: &str, prefill: &str) -> Result<String, MenuError>;
}

/// The menu built from one annotated makefile.
///
/// Constructed once by [`crate::parser::parse`], then mutated only through
/// its variable map while [`invoke`](Menu::invoke) dispatches choices.
#[derive(Debug)]
pub struct Menu {
    source_path: String,
    entries: Vec<MenuEntry>,
    actions: HashMap<String, Action>,
    variables: BTreeMap<VarId, String>,
}

impl Menu {
    pub(crate) fn new(source_path: String) -> Self {
        Self {
            source_path,
            entries: Vec::new(),
            actions: HashMap::new(),
            variables: BTreeMap::new(),
        }
    }

    /// Path of the makefile this menu was built from.
    pub fn source_path(&self) -> &str {
        &self.source_path
    }

    /// The printable entries, in file order.
    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    pub(crate) fn push_literal(&mut self, text: String) {
        self.entries.push(MenuEntry::Literal(text));
    }

    pub(crate) fn seed_variable(&mut self, id: VarId, value: String) {
        self.variables.insert(id, value);
    }

    /// Current value of a bound variable, if any.
    pub fn variable(&self, id: &VarId) -> Option<&str> {
        self.variables.get(id).map(String::as_str)
    }

    /// Register a selectable choice.
    ///
    /// The choice is appended to the last entry when that entry is a group
    /// (`to_first = false`), or to the first group in the menu
    /// (`to_first = true`, used for the quit command). When no suitable
    /// group exists a new one is appended. A key that is already registered
    /// anywhere in the menu is a construction error.
    pub fn add_command(
        &mut self,
        choice: &str,
        desc: &str,
        action: Action,
        to_first: bool,
    ) -> Result<(), MenuError> {
        if self.actions.contains_key(choice) {
            return Err(MenuError::DuplicateKey {
                key: choice.to_string(),
            });
        }
        let slot = if to_first {
            self.entries
                .iter()
                .position(|e| matches!(e, MenuEntry::Group(_)))
        } else {
            match self.entries.last() {
                Some(MenuEntry::Group(_)) => Some(self.entries.len() - 1),
                _ => None,
            }
        };
        let item = (choice.to_string(), desc.to_string());
        match slot {
            Some(idx) => {
                if let MenuEntry::Group(items) = &mut self.entries[idx] {
                    items.push(item);
                }
            }
            None => self.entries.push(MenuEntry::Group(vec![item])),
        }
        self.actions.insert(choice.to_string(), action);
        Ok(())
    }

    /// Register a terminal quit choice under `key`, placed in the first
    /// group so it shows up with the leading commands.
    pub fn add_quit_command(&mut self, key: &str) -> Result<(), MenuError> {
        self.add_command(key, "quit", Action::Quit, true)
    }

    /// Every registered choice key, in file order. Used for completion.
    pub fn choice_keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        for entry in &self.entries {
            if let MenuEntry::Group(items) = entry {
                keys.extend(items.iter().map(|(key, _)| key.clone()));
            }
        }
        keys
    }

    /// Dispatch a choice.
    ///
    /// Returns `(output text, should_exit)`. An unknown choice is not an
    /// error: it yields a "not defined" message and the loop continues.
    /// Likewise a nonzero build-tool exit is reported as text.
    pub fn invoke(
        &mut self,
        choice: &str,
        input: &mut dyn LineInput,
        runner: &dyn ToolRunner,
    ) -> Result<(String, bool), MenuError> {
        let Some(action) = self.actions.get(choice).cloned() else {
            return Ok((format!("Command \"{choice}\" not defined\n"), false));
        };
        match action {
            Action::Quit => Ok((String::new(), true)),
            Action::SetVariable(id) => {
                let current = self.variables.get(&id).cloned().unwrap_or_default();
                let value = input.read_line(&format!("{}=", id.name), &current)?;
                self.variables.insert(id, value);
                Ok((String::new(), false))
            }
            Action::RunTarget(target) => self.run_target(&target, runner),
        }
    }

    fn run_target(
        &self,
        target: &str,
        runner: &dyn ToolRunner,
    ) -> Result<(String, bool), MenuError> {
        let mut env: HashMap<String, String> = stdenv::vars().collect();
        let mut args = vec![
            "-f".to_string(),
            self.source_path.clone(),
            "--no-print-directory".to_string(),
        ];
        for (id, value) in &self.variables {
            match id.kind {
                VarKind::Env => {
                    env.insert(id.name.clone(), value.clone());
                }
                VarKind::Make => args.push(format!("{}={}", id.name, value)),
            }
        }
        args.push(target.to_string());
        let code = runner.run(MAKE, &args, &env)?;
        if code != 0 {
            return Ok((format!("Error code: {code}\n"), false));
        }
        Ok((String::new(), false))
    }
}
