//! The interactive editing shell.
//!
//! Every record typed at the prompt is applied as a live edit. Lines that
//! start with `:` are shell commands:
//!
//! ```text
//! :save <path>      write the session delta
//! :report [path]    write the .inp input report
//! :show <entity>    list an entity's keyword values
//! :help             list commands
//! :quit             leave (asks first if there are unsaved changes)
//! ```

use std::fmt::Write as _;
use std::io::{self, Write};
use std::path::Path;

use simcfg_foundation::{Error, Result};
use simcfg_language::RecordAssembler;

use crate::editor::{LineEditor, ReadResult, RustylineEditor, brace_depth};
use crate::loader::ModelLoader;

const COMMANDS: &[&str] = &[":save", ":report", ":show", ":help", ":quit", "Define", "Include"];

/// What the shell should do after one input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    /// Nothing to print.
    Done,
    /// Print this text.
    Text(String),
    /// Leave the shell.
    Quit,
}

/// The interactive shell.
pub struct Shell<E: LineEditor = RustylineEditor> {
    /// The line editor for input.
    editor: E,

    /// The loaded model.
    loader: ModelLoader,

    /// Whether to show the welcome banner.
    show_banner: bool,

    /// Primary prompt.
    prompt: String,

    /// Continuation prompt (for multi-line records).
    continuation_prompt: String,
}

impl Shell<RustylineEditor> {
    /// Creates a shell with the default rustyline editor.
    ///
    /// # Errors
    ///
    /// Returns an error if the editor fails to initialize.
    pub fn new(loader: ModelLoader) -> Result<Self> {
        let editor = RustylineEditor::new()?;
        Ok(Self::with_editor(editor, loader))
    }
}

impl<E: LineEditor> Shell<E> {
    /// Creates a shell with the given editor.
    pub fn with_editor(editor: E, loader: ModelLoader) -> Self {
        Self {
            editor,
            loader,
            show_banner: true,
            prompt: "cfg> ".to_string(),
            continuation_prompt: ".... ".to_string(),
        }
    }

    /// Disables the welcome banner.
    #[must_use]
    pub const fn without_banner(mut self) -> Self {
        self.show_banner = false;
        self
    }

    /// Returns the loader.
    #[must_use]
    pub const fn loader(&self) -> &ModelLoader {
        &self.loader
    }

    /// Returns the loader mutably.
    pub fn loader_mut(&mut self) -> &mut ModelLoader {
        &mut self.loader
    }

    /// Consumes the shell, returning the loader.
    #[must_use]
    pub fn into_loader(self) -> ModelLoader {
        self.loader
    }

    /// Runs the shell until `:quit` or end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input fails.
    pub fn run(&mut self) -> Result<()> {
        if self.show_banner {
            print_banner();
        }
        self.refresh_completions();

        loop {
            let Some(input) = self.read_input()? else {
                if self.confirm_quit()? {
                    break;
                }
                continue;
            };
            if input.trim().is_empty() {
                continue;
            }
            self.editor.add_history(&input);

            match self.execute(&input) {
                Ok(Reply::Done) => {}
                Ok(Reply::Text(text)) => println!("{text}"),
                Ok(Reply::Quit) => break,
                Err(e) => eprintln!("\x1b[31mError: {e}\x1b[0m"),
            }
        }
        Ok(())
    }

    /// Reads one command or one complete record.
    fn read_input(&mut self) -> Result<Option<String>> {
        let mut input = String::new();
        let mut first_line = true;

        loop {
            let read = if first_line {
                self.editor.read_line(&self.prompt)?
            } else {
                self.editor.read_continuation(&self.continuation_prompt)?
            };

            match read {
                ReadResult::Line(line) => {
                    if !first_line {
                        input.push('\n');
                    }
                    input.push_str(&line);
                    if input.trim_start().starts_with(':') || brace_depth(&input) <= 0 {
                        return Ok(Some(input));
                    }
                    first_line = false;
                }
                ReadResult::Interrupted => {
                    if !first_line {
                        println!("Input cancelled.");
                    }
                    return Ok(Some(String::new()));
                }
                ReadResult::Eof => {
                    if first_line {
                        return Ok(None);
                    }
                    return Err(Error::malformed(
                        "unexpected end of input inside an open record",
                    ));
                }
            }
        }
    }

    /// Executes one input: a shell command or one or more records.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a command or record.
    pub fn execute(&mut self, input: &str) -> Result<Reply> {
        let trimmed = input.trim();
        if let Some(command) = trimmed.strip_prefix(':') {
            return self.command(command);
        }

        let mut assembler = RecordAssembler::new(self.loader.config().max_brace_depth);
        let mut last_line = 1;
        for (index, line) in input.lines().enumerate() {
            last_line = index + 1;
            match assembler.push_line(line, last_line) {
                Ok(Some(record)) => self.loader.apply_record(record)?,
                Ok(None) => {}
                Err(err) => return Err(self.loader.report_edit(err, last_line)),
            }
        }
        if let Err(err) = assembler.finish() {
            return Err(self.loader.report_edit(err, last_line));
        }
        self.refresh_completions();
        Ok(Reply::Done)
    }

    fn command(&mut self, command: &str) -> Result<Reply> {
        let (name, arg) = command
            .split_once(char::is_whitespace)
            .map_or((command, ""), |(n, a)| (n, a.trim()));

        match name {
            "save" => {
                if arg.is_empty() {
                    return Err(Error::io("usage: :save <path>"));
                }
                self.loader.save(Path::new(arg))?;
                Ok(Reply::Text(format!("Saved edits to {arg}")))
            }
            "report" => {
                let target = (!arg.is_empty()).then(|| Path::new(arg));
                let path = self.loader.write_report(target)?;
                Ok(Reply::Text(format!("Wrote input report {}", path.display())))
            }
            "show" => self.show(arg),
            "help" | "h" => Ok(Reply::Text(help_text())),
            "quit" | "q" => {
                if self.confirm_quit()? {
                    Ok(Reply::Quit)
                } else {
                    Ok(Reply::Done)
                }
            }
            other => Err(Error::not_found("command", format!(":{other}"))),
        }
    }

    fn show(&self, name: &str) -> Result<Reply> {
        let id = self.loader.model().resolve(name)?;
        let model = self.loader.model();
        let Some(entity) = model.entity(id) else {
            return Err(Error::not_found("entity", name));
        };

        let mut text = format!("{} ({})", entity.qualified_name(), model.type_name(id));
        for input in entity.inputs() {
            let marker = if input.is_edited() { "*" } else { " " };
            let _ = if input.value().is_empty() {
                write!(text, "\n {marker} {} {{ }}", input.keyword())
            } else {
                write!(text, "\n {marker} {} {{ {} }}", input.keyword(), input.value())
            };
        }
        Ok(Reply::Text(text))
    }

    /// Asks before discarding unsaved edits. End of input counts as yes.
    fn confirm_quit(&mut self) -> Result<bool> {
        if !self.loader.model().is_session_edited() {
            return Ok(true);
        }
        match self
            .editor
            .read_line("There are unsaved changes. Quit anyway? [y/N] ")?
        {
            ReadResult::Line(answer) => Ok(matches!(answer.trim(), "y" | "Y" | "yes")),
            ReadResult::Interrupted => Ok(false),
            ReadResult::Eof => Ok(true),
        }
    }

    fn refresh_completions(&mut self) {
        let mut keywords: Vec<String> = COMMANDS.iter().map(ToString::to_string).collect();
        keywords.extend(self.loader.model().entities().map(|e| e.qualified_name()));
        self.editor.set_keywords(keywords);
    }
}

fn help_text() -> String {
    "Records are applied as edits, e.g. `Server1 ServiceTime { 5 s }`.\n\
     :save <path>      write the session delta\n\
     :report [path]    write the input report\n\
     :show <entity>    list an entity's keyword values\n\
     :quit             leave the shell"
        .to_string()
}

fn print_banner() {
    println!("\x1b[1;36msimcfg\x1b[0m {}", env!("CARGO_PKG_VERSION"));
    println!("Type records to edit the model, :help for commands, Ctrl+D to exit.\n");
    let _ = io::stdout().flush();
}
