//! End-to-end flow: parse a real annotated makefile, render it at several
//! widths, then dispatch choices against scripted input and a recording
//! build-tool runner.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use makemenu::process::ToolRunner;
use makemenu::{LineInput, MenuError, layout, parser};

struct ScriptedInput {
    replies: VecDeque<String>,
    prompts: Vec<(String, String)>,
}

impl ScriptedInput {
    fn new<const N: usize>(replies: [&str; N]) -> Self {
        Self {
            replies: replies.iter().map(|s| s.to_string()).collect(),
            prompts: Vec::new(),
        }
    }
}

impl LineInput for ScriptedInput {
    fn read_line(&mut self, prompt: &str, prefill: &str) -> Result<String, MenuError> {
        self.prompts.push((prompt.to_string(), prefill.to_string()));
        Ok(self.replies.pop_front().expect("unexpected prompt"))
    }
}

type ToolCall = (String, Vec<String>, HashMap<String, String>);

/// Records every invocation and answers with a configurable exit code.
#[derive(Default)]
struct RecordingRunner {
    calls: RefCell<Vec<ToolCall>>,
    status: Cell<i32>,
}

impl RecordingRunner {
    fn take_calls(&self) -> Vec<ToolCall> {
        self.calls.take()
    }
}

impl ToolRunner for RecordingRunner {
    fn run(
        &self,
        program: &str,
        args: &[String],
        env: &HashMap<String, String>,
    ) -> Result<i32, MenuError> {
        self.calls
            .borrow_mut()
            .push((program.to_string(), args.to_vec(), env.clone()));
        Ok(self.status.get())
    }
}

fn write_unique_makefile(contents: &str) -> io::Result<PathBuf> {
    let mut path = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    path.push(format!(
        "makemenu_test_{}_{}.mk",
        std::process::id(),
        nanos
    ));
    fs::write(&path, contents)?;
    Ok(path)
}

const ANNOTATED: &str = "\
# menu title: Hello world

# menu item: a
.PHONY: hello
hello:
\techo hello world

# menu item: b
.PHONY: foo
foo:
\techo foo bar

# menu envvar: x
# menu makevar: y=2
";

#[test]
fn test_parse_render_and_dispatch() {
    let path = write_unique_makefile(ANNOTATED).expect("failed to write makefile");
    let source = path.to_string_lossy().into_owned();

    let mut menu = parser::parse(&path).unwrap();
    assert_eq!(
        layout::render(&menu, 15),
        "===== Hello world =====\na: hello\nb: foo\nx: Set x\ny: Set y"
    );
    assert_eq!(
        layout::render(&menu, 20),
        "===== Hello world =====\na: hello  x: Set x\nb: foo    y: Set y"
    );
    menu.add_quit_command("q").unwrap();
    assert_eq!(
        layout::render(&menu, 30),
        "===== Hello world =====\na: hello  x: Set x  q: quit\nb: foo    y: Set y"
    );

    let mut input = ScriptedInput::new([]);
    let runner = RecordingRunner::default();

    // Quit exits without touching the build tool.
    assert_eq!(
        menu.invoke("q", &mut input, &runner).unwrap(),
        (String::new(), true)
    );
    assert!(runner.take_calls().is_empty());

    // Running a target passes the makefile, the seeded makevar and the
    // target name to the build tool.
    assert_eq!(
        menu.invoke("a", &mut input, &runner).unwrap(),
        (String::new(), false)
    );
    let calls = runner.take_calls();
    assert_eq!(calls.len(), 1);
    let (program, args, _env) = &calls[0];
    assert_eq!(program, "make");
    assert_eq!(
        args,
        &[
            "-f".to_string(),
            source.clone(),
            "--no-print-directory".to_string(),
            "y=2".to_string(),
            "hello".to_string(),
        ]
    );

    // Setting the makevar prompts with its current value prefilled, and
    // the next run sees the new value.
    let mut input = ScriptedInput::new(["42"]);
    assert_eq!(
        menu.invoke("y", &mut input, &runner).unwrap(),
        (String::new(), false)
    );
    assert_eq!(input.prompts, vec![("y=".to_string(), "2".to_string())]);

    // The envvar reaches the build tool through the environment instead.
    let mut input = ScriptedInput::new(["foo"]);
    assert_eq!(
        menu.invoke("x", &mut input, &runner).unwrap(),
        (String::new(), false)
    );
    assert_eq!(
        menu.invoke("a", &mut input, &runner).unwrap(),
        (String::new(), false)
    );
    let calls = runner.take_calls();
    assert_eq!(calls.len(), 1);
    let (_, args, env) = &calls[0];
    assert_eq!(
        args,
        &[
            "-f".to_string(),
            source.clone(),
            "--no-print-directory".to_string(),
            "y=42".to_string(),
            "hello".to_string(),
        ]
    );
    assert_eq!(env.get("x").map(String::as_str), Some("foo"));

    // A nonzero exit becomes output text, not an error.
    runner.status.set(1);
    assert_eq!(
        menu.invoke("a", &mut input, &runner).unwrap(),
        ("Error code: 1\n".to_string(), false)
    );

    // Unknown choices are reported and the loop continues.
    assert_eq!(
        menu.invoke("foo", &mut input, &runner).unwrap(),
        ("Command \"foo\" not defined\n".to_string(), false)
    );

    let _ = fs::remove_file(&path);
}

#[test]
fn test_duplicate_item_key_fails_the_whole_parse() {
    let contents = "\
# menu comment: Hello world

# menu item: a
.PHONY: hello
hello:
\techo hello world

# menu item: a
.PHONY: foo
foo:
\techo foo bar
";
    let path = write_unique_makefile(contents).expect("failed to write makefile");
    let err = parser::parse(&path).unwrap_err();
    assert!(matches!(err, MenuError::DuplicateKey { key } if key == "a"));
    let _ = fs::remove_file(&path);
}
