//! The interactive REPL.

use dicebag_foundation::{Error, Result};

use crate::command::Command;
use crate::config::Config;
use crate::editor::{LineEditor, ReadResult, RustylineEditor};
use crate::render;
use crate::session::Session;

const BANNER: &str = "dicebag - build dice and collections, then roll them. Type 'help' for commands.";

/// The interactive REPL.
pub struct Repl<E: LineEditor = RustylineEditor> {
    /// The line editor for input.
    editor: E,

    /// Registry, cursor, and file state.
    session: Session,

    /// Whether to show the welcome banner.
    show_banner: bool,

    /// Whether output uses ANSI colors.
    color: bool,
}

impl Repl<RustylineEditor> {
    /// Creates a REPL with the rustyline editor and a session built from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the editor fails to initialize or the initial
    /// file can't be opened.
    pub fn new(config: &Config) -> Result<Self> {
        let editor = RustylineEditor::new()?;
        let session = Session::from_config(config)?;
        let mut repl = Self::with_editor(editor, session).with_color(config.color);
        if !config.show_banner {
            repl = repl.without_banner();
        }
        Ok(repl)
    }
}

impl<E: LineEditor> Repl<E> {
    /// Creates a REPL over the given editor and session.
    pub fn with_editor(editor: E, session: Session) -> Self {
        Self {
            editor,
            session,
            show_banner: true,
            color: true,
        }
    }

    /// Disables the welcome banner.
    #[must_use]
    pub const fn without_banner(mut self) -> Self {
        self.show_banner = false;
        self
    }

    /// Enables or disables ANSI colors in output.
    #[must_use]
    pub const fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Returns a reference to the session.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Returns a mutable reference to the session.
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Runs the REPL loop until `exit` or end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if reading from the terminal fails.
    pub fn run(&mut self) -> Result<()> {
        if self.show_banner {
            println!("{BANNER}");
        }

        while self.read_eval_print()? {}

        println!("\nGoodbye!");
        Ok(())
    }

    /// Runs each line as if typed at the prompt, then shuts down.
    ///
    /// Stops early once a line runs `exit`. Returns true if every step of
    /// every line succeeded.
    ///
    /// # Errors
    ///
    /// Returns the shutdown save error, if any.
    pub fn run_batch<S: AsRef<str>>(&mut self, lines: &[S]) -> Result<bool> {
        let mut all_ok = true;
        for line in lines {
            let (output, ok) = self.eval(line.as_ref());
            for text in output {
                println!("{text}");
            }
            all_ok &= ok;
            if !self.session.is_running() {
                break;
            }
        }
        self.session.shutdown()?;
        Ok(all_ok)
    }

    /// Executes one read-eval-print iteration.
    ///
    /// Returns `Ok(true)` to continue, `Ok(false)` to exit.
    fn read_eval_print(&mut self) -> Result<bool> {
        self.editor.set_keywords(self.session.completion_words());

        let input = match self.editor.read_line(&self.session.prompt())? {
            ReadResult::Line(line) => line,
            ReadResult::Interrupted => return Ok(true),
            ReadResult::Eof => {
                // Ctrl+D behaves like `exit`; there is no prompt left to retry on.
                self.session.execute(Command::Exit { save: true })?;
                if let Err(e) = self.session.shutdown() {
                    self.print_error(&e);
                }
                return Ok(false);
            }
        };

        if input.trim().is_empty() {
            return Ok(true);
        }
        self.editor.add_history(&input);

        let (output, _) = self.eval(&input);
        for text in output {
            println!("{text}");
        }

        if self.session.is_running() {
            return Ok(true);
        }
        match self.session.shutdown() {
            Ok(()) => Ok(false),
            Err(e) => {
                self.print_error(&e);
                self.session.resume();
                Ok(true)
            }
        }
    }

    /// Runs one line and renders everything it printed.
    ///
    /// Returns the output blocks and whether every step succeeded.
    pub fn eval(&mut self, input: &str) -> (Vec<String>, bool) {
        let report = self.session.run_line(input);
        let mut output: Vec<String> = report
            .responses
            .iter()
            .filter_map(|response| render::response(response, self.color))
            .collect();
        let ok = report.is_ok();
        if let Some(failure) = &report.failure {
            output.push(render::failure(failure, self.color));
        }
        (output, ok)
    }

    fn print_error(&self, error: &Error) {
        if self.color {
            eprintln!("\x1b[31mError - {error}\x1b[0m");
        } else {
            eprintln!("Error - {error}");
        }
    }
}
