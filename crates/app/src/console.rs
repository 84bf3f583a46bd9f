//! Line-oriented driver over a `QuizSession`.
//!
//! Each input line is one user event. Answer and question numbers are
//! 1-based on this surface and converted before reaching the session.

use std::fmt;
use std::io::{self, Write};

use quiz_core::model::{Modality, SourceKey};
use quiz_core::tracker::AnswerError;
use services::{QuizSession, SessionError};

use crate::deferred::Deferred;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Show,
    Pick(usize),
    Toggle(usize),
    Next,
    Previous,
    Goto(usize),
    Submit,
    Review,
    Reset,
    Restart,
    Shuffle,
    ShowAll,
    Count(usize),
    Sources(Vec<SourceKey>),
    Status,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Empty,
    Unknown(String),
    MissingNumber { command: &'static str },
    InvalidNumber { raw: String },
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Empty => write!(f, "empty command"),
            CommandError::Unknown(raw) => write!(f, "unknown command: {raw} (try `help`)"),
            CommandError::MissingNumber { command } => write!(f, "{command} requires a number"),
            CommandError::InvalidNumber { raw } => write!(f, "not a positive number: {raw}"),
        }
    }
}

impl std::error::Error for CommandError {}

impl Command {
    /// Parse one input line.
    ///
    /// # Errors
    ///
    /// Returns `CommandError` for unknown commands or bad numeric arguments.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut parts = line.split_whitespace();
        let Some(head) = parts.next() else {
            return Err(CommandError::Empty);
        };
        let arg = parts.next();
        let rest = parts.collect::<Vec<_>>().join(",");

        match head {
            "show" | "s" => Ok(Self::Show),
            "pick" | "p" => Ok(Self::Pick(one_based(arg, "pick")?)),
            "toggle" | "t" => Ok(Self::Toggle(one_based(arg, "toggle")?)),
            "next" | "n" => Ok(Self::Next),
            "prev" | "previous" => Ok(Self::Previous),
            "goto" | "g" => Ok(Self::Goto(one_based(arg, "goto")?)),
            "submit" => Ok(Self::Submit),
            "review" => Ok(Self::Review),
            "reset" => Ok(Self::Reset),
            "restart" => Ok(Self::Restart),
            "shuffle" => Ok(Self::Shuffle),
            "all" => Ok(Self::ShowAll),
            "count" => {
                let raw = arg.ok_or(CommandError::MissingNumber { command: "count" })?;
                let count = raw
                    .parse::<usize>()
                    .map_err(|_| CommandError::InvalidNumber { raw: raw.to_owned() })?;
                Ok(Self::Count(count))
            }
            "sources" => Ok(Self::Sources(
                [arg.unwrap_or_default(), rest.as_str()]
                    .join(",")
                    .split(',')
                    .map(str::trim)
                    .filter(|key| !key.is_empty())
                    .map(SourceKey::from)
                    .collect(),
            )),
            "status" => Ok(Self::Status),
            "help" | "h" | "?" => Ok(Self::Help),
            "quit" | "q" | "exit" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_owned())),
        }
    }
}

/// Turns a 1-based user number into a 0-based index.
fn one_based(arg: Option<&str>, command: &'static str) -> Result<usize, CommandError> {
    let raw = arg.ok_or(CommandError::MissingNumber { command })?;
    match raw.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => Err(CommandError::InvalidNumber { raw: raw.to_owned() }),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Console<W: Write> {
    session: QuizSession,
    out: W,
    deferred: Deferred,
}

impl<W: Write> Console<W> {
    #[must_use]
    pub fn new(session: QuizSession, out: W) -> Self {
        Self {
            session,
            out,
            deferred: Deferred::default(),
        }
    }

    #[cfg(test)]
    #[must_use]
    pub fn with_deferred(mut self, deferred: Deferred) -> Self {
        self.deferred = deferred;
        self
    }

    #[cfg(test)]
    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    #[cfg(test)]
    #[must_use]
    pub fn into_output(self) -> W {
        self.out
    }

    /// Handle one input line.
    ///
    /// # Errors
    ///
    /// Returns `io::Error` if the output cannot be written.
    pub async fn handle_line(&mut self, line: &str) -> io::Result<Flow> {
        match Command::parse(line) {
            Ok(command) => self.handle(command).await,
            Err(CommandError::Empty) => Ok(Flow::Continue),
            Err(err) => {
                writeln!(self.out, "{err}")?;
                Ok(Flow::Continue)
            }
        }
    }

    /// Apply one command to the session and print the result.
    ///
    /// # Errors
    ///
    /// Returns `io::Error` if the output cannot be written.
    pub async fn handle(&mut self, command: Command) -> io::Result<Flow> {
        match command {
            Command::Show => self.print_current()?,
            Command::Pick(answer) => self.answer(Modality::Single, answer).await?,
            Command::Toggle(answer) => self.answer(Modality::Multi, answer).await?,
            Command::Next => {
                let moved = self.session.next().await;
                self.step(moved)?;
            }
            Command::Previous => {
                let moved = self.session.previous().await;
                self.step(moved)?;
            }
            Command::Goto(index) => {
                let moved = self.session.navigate(index).await;
                self.step(moved)?;
            }
            Command::Submit => self.submit().await?,
            Command::Review => self.print_review()?,
            Command::Reset => {
                self.session.reset().await;
                writeln!(self.out, "Answers cleared.")?;
                self.print_current()?;
            }
            Command::Restart => {
                self.loading()?;
                self.deferred.run(self.session.start_over()).await;
                writeln!(self.out, "Saved progress forgotten; starting fresh.")?;
                self.print_current()?;
            }
            Command::Shuffle => {
                self.loading()?;
                self.deferred.run(self.session.shuffle()).await;
                self.print_current()?;
            }
            Command::ShowAll => {
                self.loading()?;
                self.deferred.run(self.session.show_all()).await;
                self.print_current()?;
            }
            Command::Count(count) => {
                self.loading()?;
                self.deferred.run(self.session.set_question_count(count)).await;
                self.print_current()?;
            }
            Command::Sources(keys) => {
                self.loading()?;
                self.deferred.run(self.session.select_sources(keys)).await;
                self.print_current()?;
            }
            Command::Status => self.print_status()?,
            Command::Help => print_help(&mut self.out)?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    async fn answer(&mut self, expected: Modality, answer: usize) -> io::Result<()> {
        let position = self.session.position();
        let outcome = match expected {
            Modality::Single => self.session.record_single(position, answer).await,
            Modality::Multi => self.session.toggle_multi(position, answer).await,
        };
        match outcome {
            Ok(()) => self.print_current(),
            Err(err) => writeln!(self.out, "{}", describe(&err)),
        }
    }

    async fn submit(&mut self) -> io::Result<()> {
        match self.session.submit().await {
            Ok(report) => {
                let (score, total, percentage) =
                    (report.score(), report.total(), report.percentage());
                writeln!(self.out, "Quiz Results: {percentage}% ({score} / {total})")?;
                writeln!(self.out, "Type `review` to see the answers or `reset` to try again.")
            }
            Err(err) => writeln!(self.out, "{}", describe(&err)),
        }
    }

    fn step(&mut self, moved: bool) -> io::Result<()> {
        if moved {
            self.print_current()
        } else {
            writeln!(self.out, "No question there.")
        }
    }

    fn loading(&mut self) -> io::Result<()> {
        writeln!(self.out, "Loading...")?;
        self.out.flush()
    }

    fn print_current(&mut self) -> io::Result<()> {
        if self.session.is_complete() {
            return writeln!(self.out, "Quiz submitted. Type `review` or `reset`.");
        }
        let progress = self.session.progress();
        let Some(question) = self.session.current_question() else {
            return writeln!(self.out, "The quiz is empty. Pick sources with `sources a,b`.");
        };
        let answer = self.session.answers().answer(progress.position);

        writeln!(
            self.out,
            "Question {} of {}",
            progress.position + 1,
            progress.total
        )?;
        writeln!(self.out, "{}", question.prompt())?;
        for (pos, text) in question.answers().iter().enumerate() {
            let selected = answer.is_some_and(|a| a.modality() == question.modality() && a.selects(pos));
            let marker = match (question.modality(), selected) {
                (Modality::Single, true) => "(*)",
                (Modality::Single, false) => "( )",
                (Modality::Multi, true) => "[x]",
                (Modality::Multi, false) => "[ ]",
            };
            writeln!(self.out, "  {marker} {}. {text}", pos + 1)?;
        }
        let hint = match question.modality() {
            Modality::Single => "pick <n>",
            Modality::Multi => "toggle <n>",
        };
        if progress.on_last_question() {
            let ready = if progress.all_answered { "ready" } else { "answer every question first" };
            writeln!(self.out, "{hint} | prev | submit ({ready})")
        } else {
            writeln!(self.out, "{hint} | prev | next")
        }
    }

    fn print_review(&mut self) -> io::Result<()> {
        let Some(items) = self.session.review() else {
            return writeln!(self.out, "Submit the quiz first.");
        };
        for item in items {
            let verdict = if item.is_correct { "Correct" } else { "Incorrect" };
            writeln!(self.out, "{}. {} ({verdict})", item.index + 1, item.prompt)?;
            for mark in &item.marks {
                let flag = match (mark.is_correct, mark.is_selected) {
                    (true, _) => "+",
                    (false, true) => "x",
                    (false, false) => " ",
                };
                writeln!(self.out, "   {flag} {}", mark.text)?;
            }
        }
        Ok(())
    }

    fn print_status(&mut self) -> io::Result<()> {
        let config = self.session.config();
        let keys: Vec<&str> = config.source_keys().iter().map(SourceKey::as_str).collect();
        let progress = self.session.progress();
        writeln!(self.out, "Sources: {}", keys.join(", "))?;
        writeln!(
            self.out,
            "Questions: {} requested, {} available, {} in quiz",
            config.question_count(),
            self.session.total_available(),
            progress.total
        )?;
        writeln!(
            self.out,
            "Answered: {} of {}{}",
            progress.answered,
            progress.total,
            if progress.is_complete { " (submitted)" } else { "" }
        )
    }
}

fn describe(err: &SessionError) -> String {
    match err {
        SessionError::Incomplete { missing } => {
            let numbers: Vec<String> = missing.iter().map(|i| (i + 1).to_string()).collect();
            format!("Still unanswered: {}", numbers.join(", "))
        }
        SessionError::Answer(AnswerError::QuestionOutOfRange { index, len }) => {
            format!("There is no question {} (the quiz has {len}).", index + 1)
        }
        SessionError::Answer(AnswerError::AnswerOutOfRange { index, len }) => {
            format!("There is no answer {} (this question has {len}).", index + 1)
        }
        SessionError::Answer(AnswerError::ModalityMismatch { index, actual }) => {
            let hint = match actual {
                Modality::Single => "use `pick <n>`",
                Modality::Multi => "use `toggle <n>`",
            };
            format!("Question {} is {actual:?}-select; {hint}.", index + 1)
        }
        other => other.to_string(),
    }
}

/// Print the command reference.
///
/// # Errors
///
/// Returns `io::Error` if the output cannot be written.
pub fn print_help(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Commands:")?;
    writeln!(out, "  show                 show the current question")?;
    writeln!(out, "  pick <n>             choose answer n (single-select)")?;
    writeln!(out, "  toggle <n>           check/uncheck answer n (multi-select)")?;
    writeln!(out, "  next | prev | goto <n>")?;
    writeln!(out, "  submit | review | reset")?;
    writeln!(out, "  restart              forget saved progress and settings")?;
    writeln!(out, "  shuffle              draw a new random quiz")?;
    writeln!(out, "  all                  take every available question")?;
    writeln!(out, "  count <n>            number of questions")?;
    writeln!(out, "  sources <a,b,..>     choose question sources")?;
    writeln!(out, "  status | help | quit")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use quiz_core::model::{Question, QuestionCatalog};
    use services::{AppServices, ShuffleSource};
    use storage::repository::Storage;

    #[test]
    fn parses_one_based_numbers() {
        assert_eq!(Command::parse("pick 2"), Ok(Command::Pick(1)));
        assert_eq!(Command::parse("  t 1 "), Ok(Command::Toggle(0)));
        assert_eq!(
            Command::parse("pick 0"),
            Err(CommandError::InvalidNumber { raw: "0".into() })
        );
        assert_eq!(
            Command::parse("goto"),
            Err(CommandError::MissingNumber { command: "goto" })
        );
        assert_eq!(Command::parse("count 0"), Ok(Command::Count(0)));
        assert_eq!(Command::parse("restart"), Ok(Command::Restart));
    }

    #[test]
    fn parses_source_lists() {
        assert_eq!(
            Command::parse("sources mod1, mod2"),
            Ok(Command::Sources(vec![SourceKey::from("mod1"), SourceKey::from("mod2")]))
        );
        assert_eq!(
            Command::parse("sources mod1,mod2"),
            Ok(Command::Sources(vec![SourceKey::from("mod1"), SourceKey::from("mod2")]))
        );
        assert_eq!(Command::parse("sources"), Ok(Command::Sources(Vec::new())));
        assert_eq!(Command::parse("bogus"), Err(CommandError::Unknown("bogus".into())));
    }

    async fn console(questions: Vec<Question>) -> Console<Vec<u8>> {
        let catalog = QuestionCatalog::new([(SourceKey::from("demo"), questions)]);
        let app = AppServices::new(Arc::new(catalog), Storage::in_memory())
            .with_shuffle_source(ShuffleSource::seeded(1));
        let session = app.start_session().await;
        Console::new(session, Vec::new()).with_deferred(Deferred::new(Duration::ZERO))
    }

    #[tokio::test]
    async fn drives_a_quiz_to_its_result() {
        let mut console = console(vec![
            Question::single("Pick two", ["one", "two"], 1).unwrap(),
            Question::single("Pick b", ["a", "b"], 1).unwrap(),
        ])
        .await;
        for line in ["all", "pick 2", "next", "pick 2", "submit", "review"] {
            assert_eq!(console.handle_line(line).await.unwrap(), Flow::Continue);
        }
        assert_eq!(console.handle_line("quit").await.unwrap(), Flow::Quit);

        assert!(console.session().is_complete());
        let output = String::from_utf8(console.into_output()).unwrap();
        assert!(output.contains("Loading..."));
        assert!(output.contains("Quiz Results: 100% (2 / 2)"));
        assert!(output.contains("(Correct)"));
    }

    #[tokio::test]
    async fn reports_wrong_modality_and_missing_answers() {
        let mut console = console(vec![
            Question::single("Only one", ["yes", "no"], 0).unwrap(),
            Question::single("Also one", ["yes", "no"], 0).unwrap(),
        ])
        .await;
        console.handle_line("all").await.unwrap();
        console.handle_line("toggle 1").await.unwrap();
        console.handle_line("submit").await.unwrap();
        console.handle_line("dance").await.unwrap();

        assert!(!console.session().is_complete());
        let output = String::from_utf8(console.into_output()).unwrap();
        assert!(output.contains("Question 1 is Single-select; use `pick <n>`."));
        assert!(output.contains("Still unanswered: 1, 2"));
        assert!(output.contains("unknown command: dance"));
    }

    #[tokio::test]
    async fn answer_errors_use_one_based_numbers() {
        let mut console = console(vec![
            Question::single("Three ways", ["a", "b", "c"], 2).unwrap(),
        ])
        .await;
        console.handle_line("pick 4").await.unwrap();
        console.handle_line("toggle 1").await.unwrap();
        console.handle_line("pick 3").await.unwrap();

        assert!(console.session().answers().is_answered(0));
        let output = String::from_utf8(console.into_output()).unwrap();
        assert!(output.contains("There is no answer 4 (this question has 3)."));
        assert!(output.contains("Question 1 is Single-select; use `pick <n>`."));
        assert!(!output.contains("question 0"));
        assert!(!output.contains("answer 3 does not exist"));
    }

    #[tokio::test]
    async fn restart_begins_a_fresh_quiz() {
        let mut console = console(vec![
            Question::single("Only one", ["yes", "no"], 0).unwrap(),
        ])
        .await;
        console.handle_line("pick 1").await.unwrap();
        console.handle_line("submit").await.unwrap();
        console.handle_line("restart").await.unwrap();

        assert!(!console.session().is_complete());
        assert!(console.session().answers().is_empty());
        let output = String::from_utf8(console.into_output()).unwrap();
        assert!(output.contains("Saved progress forgotten; starting fresh."));
    }
}
