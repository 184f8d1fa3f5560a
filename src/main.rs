use std::path::PathBuf;

use argh::FromArgs;

use makemenu::{parser, repl};

#[derive(FromArgs)]
/// Show an interactive menu built from a makefile's `# menu` directives.
struct Args {
    /// path to the annotated makefile
    #[argh(positional)]
    makefile: PathBuf,

    /// choice key for the quit command; an empty string disables it
    #[argh(option, default = "String::from(\"q\")")]
    quit_cmd: String,
}

fn main() -> anyhow::Result<()> {
    let args: Args = argh::from_env();
    let mut menu = parser::parse(&args.makefile)?;
    if !args.quit_cmd.is_empty() {
        menu.add_quit_command(&args.quit_cmd)?;
    }
    repl::run(&mut menu)
}
