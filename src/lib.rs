//! Interactive menus for annotated makefiles.
//!
//! A makefile can mark targets and variables with `# menu` comment
//! directives. This crate parses those directives into a [`Menu`], renders
//! it as a column layout that fits the terminal, and dispatches the user's
//! choice either to the build tool or to a variable prompt.
//!
//! The directive syntax, line by line:
//!
//! ```makefile
//! # menu title: Project tasks
//! # menu comment: pick a target
//! # menu item: b
//! build:
//! # menu envvar: VERBOSE
//! # menu makevar: j:JOBS=4
//! ```
//!
//! The pieces are usable on their own: [`parser::parse`] builds the menu,
//! [`layout::render`] turns it into text for any width, and
//! [`Menu::invoke`] dispatches a choice through injectable [`LineInput`]
//! and [`process::ToolRunner`] collaborators. [`repl::run`] wires them to a
//! real terminal.

mod error;
pub mod layout;
mod menu;
pub mod parser;
pub mod process;
pub mod repl;

pub use error::MenuError;
pub use menu::{Action, LineInput, Menu, MenuEntry, VarId, VarKind};
