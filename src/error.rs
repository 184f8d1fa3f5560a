use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while building or driving a menu.
///
/// Only construction-time problems and broken collaborators show up here.
/// An unknown choice or a nonzero build-tool exit is ordinary output text,
/// not an error; see [`crate::Menu::invoke`].
#[derive(Debug, Error)]
pub enum MenuError {
    /// The makefile could not be opened or read.
    #[error("cannot read {}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Two directives (or a directive and the quit command) registered the
    /// same choice key. Construction aborts; no partial menu is returned.
    #[error("conflicting command {key:?}")]
    DuplicateKey { key: String },

    /// The build tool could not be spawned or waited on.
    #[error("failed to run build tool: {0}")]
    Tool(#[from] io::Error),

    /// The user pressed the interrupt key while a prompt was open.
    #[error("interrupted")]
    Interrupted,

    /// The input stream reached end of file while a prompt was open.
    #[error("end of input")]
    Eof,

    /// The line editor failed for some other reason.
    #[error("input error: {0}")]
    Input(String),
}
