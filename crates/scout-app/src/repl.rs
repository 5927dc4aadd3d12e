//! Terminal host: reads questions, streams answers, prints citations.

use std::future::Future;
use std::io::{self, IsTerminal, Write};

use futures_util::StreamExt;
use scout_ai::{
    AiError, ConversationSession, ProviderError, Role, Source, TokenTracker, Turn, TurnState,
};
use scout_common::ScoutError;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "Ask anything; follow-up questions keep the conversation's context.
  /history  show the conversation so far
  /usage    show token usage
  /quit     exit (Ctrl-D also works)
Ctrl-C while an answer is streaming cancels it.";

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Ask(String),
    History,
    Usage,
    Help,
    Quit,
    Unknown(String),
}

/// Classify one input line. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Option<Command> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    let command = match trimmed {
        "/quit" | "/exit" => Command::Quit,
        "/history" => Command::History,
        "/usage" => Command::Usage,
        "/help" | "/?" => Command::Help,
        cmd if cmd.starts_with('/') => Command::Unknown(cmd.to_string()),
        _ => Command::Ask(line.to_string()),
    };
    Some(command)
}

#[derive(Debug)]
pub enum TurnOutcome {
    Answered,
    Cancelled,
    Failed(AiError),
}

/// Shown on the status writer until the first fragment arrives.
pub const WAITING_MARKER: &str = "Thinking...";

/// Returns the cursor to column 0 and clears the line.
const CLEAR_LINE: &str = "\r\x1b[2K";

/// The waiting marker, erased at most once.
struct Waiting<'s, S: Write> {
    status: &'s mut S,
    shown: bool,
}

impl<'s, S: Write> Waiting<'s, S> {
    fn show(status: &'s mut S) -> io::Result<Self> {
        status.write_all(WAITING_MARKER.as_bytes())?;
        status.flush()?;
        Ok(Self {
            status,
            shown: true,
        })
    }

    fn clear(&mut self) -> io::Result<()> {
        if self.shown {
            self.shown = false;
            self.status.write_all(CLEAR_LINE.as_bytes())?;
            self.status.flush()?;
        }
        Ok(())
    }
}

/// Run one turn, writing fragments to `out` as they arrive.
///
/// A waiting marker is written to `status` while no fragment has arrived
/// yet. If `cancel` resolves first the in-flight stream is dropped, which
/// discards the partial answer.
pub async fn stream_answer<W, S, C>(
    session: &ConversationSession,
    text: &str,
    out: &mut W,
    status: &mut S,
    cancel: C,
) -> io::Result<TurnOutcome>
where
    W: Write,
    S: Write,
    C: Future<Output = ()>,
{
    let mut waiting = Waiting::show(status)?;
    tokio::pin!(cancel);

    let opened = tokio::select! {
        opened = session.run_turn(text) => opened,
        () = &mut cancel => {
            waiting.clear()?;
            return Ok(TurnOutcome::Cancelled);
        }
    };
    let mut stream = match opened {
        Ok(stream) => stream,
        Err(e) => {
            waiting.clear()?;
            return Ok(TurnOutcome::Failed(e));
        }
    };

    loop {
        tokio::select! {
            item = stream.next() => match item {
                Some(Ok(fragment)) => {
                    if stream.state() != TurnState::AwaitingFirstIncrement {
                        waiting.clear()?;
                    }
                    out.write_all(fragment.text.as_bytes())?;
                    out.flush()?;
                }
                Some(Err(e)) => {
                    waiting.clear()?;
                    writeln!(out)?;
                    return Ok(TurnOutcome::Failed(e));
                }
                None => break,
            },
            () = &mut cancel => {
                waiting.clear()?;
                writeln!(out)?;
                return Ok(TurnOutcome::Cancelled);
            }
        }
    }

    waiting.clear()?;
    writeln!(out)?;
    Ok(TurnOutcome::Answered)
}

/// Where the waiting marker goes: stderr when it is a terminal, nowhere
/// otherwise.
fn status_writer() -> Box<dyn Write> {
    let stderr = io::stderr();
    if stderr.is_terminal() {
        Box::new(stderr)
    } else {
        Box::new(io::sink())
    }
}

/// User-facing wording for a failed turn.
pub fn describe(error: &AiError) -> String {
    match error {
        AiError::Validation(_) => "Please enter a message first.".into(),
        AiError::Configuration(msg) => format!("Configuration problem: {msg}"),
        AiError::SessionBusy => "Still answering the previous question.".into(),
        AiError::Provider(provider) => match provider {
            ProviderError::RateLimited => {
                "The model service is rate limiting requests. Try again in a moment.".into()
            }
            ProviderError::Timeout => "The model service took too long to respond.".into(),
            ProviderError::Network(msg) => format!("Could not reach the model service: {msg}"),
            ProviderError::Api { status, message } => {
                format!("The model service rejected the request ({status}): {message}")
            }
            ProviderError::Parse(_) => {
                "The model service sent a response that could not be read.".into()
            }
        },
    }
}

pub fn render_sources<W: Write>(out: &mut W, sources: &[Source]) -> io::Result<()> {
    if sources.is_empty() {
        return Ok(());
    }
    writeln!(out, "\nSources:")?;
    for (i, source) in sources.iter().enumerate() {
        match &source.title {
            Some(title) => writeln!(out, "  [{}] {} - {}", i + 1, title, source.uri)?,
            None => writeln!(out, "  [{}] {}", i + 1, source.uri)?,
        }
    }
    Ok(())
}

pub fn render_history<W: Write>(out: &mut W, history: &[Turn]) -> io::Result<()> {
    if history.is_empty() {
        return writeln!(out, "(no messages yet)");
    }
    for turn in history {
        let speaker = match turn.role {
            Role::User => "you",
            Role::Assistant => "scout",
        };
        writeln!(out, "{speaker}: {}", turn.content.trim_end())?;
    }
    Ok(())
}

pub fn render_usage<W: Write>(out: &mut W, tracker: &TokenTracker) -> io::Result<()> {
    let total = tracker.total();
    writeln!(
        out,
        "{} answers, {} input tokens, {} output tokens",
        tracker.turn_count(),
        total.input_tokens,
        total.output_tokens
    )
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
async fn ctrl_c() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Print what followed a turn: citations, or the reason it did not finish.
fn report<W: Write>(
    out: &mut W,
    session: &ConversationSession,
    outcome: &TurnOutcome,
) -> io::Result<()> {
    match outcome {
        TurnOutcome::Answered => {
            let history = session.history();
            match history.last() {
                Some(turn) if turn.role == Role::Assistant => render_sources(out, &turn.sources),
                _ => Ok(()),
            }
        }
        TurnOutcome::Cancelled => writeln!(out, "[cancelled]"),
        TurnOutcome::Failed(e) => {
            tracing::warn!(session = %session.id(), error = %e, "turn failed");
            writeln!(out, "{}", describe(e))
        }
    }
}

/// Answer a single question and return.
pub async fn one_shot(session: &ConversationSession, prompt: &str) -> Result<(), ScoutError> {
    let mut stdout = io::stdout();
    let mut status = status_writer();
    let outcome = stream_answer(session, prompt, &mut stdout, &mut status, ctrl_c()).await?;
    match outcome {
        TurnOutcome::Failed(e) => Err(ScoutError::Ai(describe(&e))),
        outcome => Ok(report(&mut stdout, session, &outcome)?),
    }
}

/// Interactive chat until `/quit`, end of input, or Ctrl-C at the prompt.
pub async fn run(session: &ConversationSession) -> Result<(), ScoutError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = io::stdout();
    let mut status = status_writer();

    writeln!(
        stdout,
        "Scout ({}) - conversational search with citations. Type /help for commands.",
        session.settings().model
    )?;

    loop {
        write!(stdout, "\n> ")?;
        stdout.flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            () = ctrl_c() => None,
        };
        let Some(line) = line else {
            break;
        };

        match parse_line(&line) {
            None => continue,
            Some(Command::Quit) => break,
            Some(Command::Help) => writeln!(stdout, "{HELP}")?,
            Some(Command::History) => render_history(&mut stdout, &session.history())?,
            Some(Command::Usage) => render_usage(&mut stdout, &session.tracker())?,
            Some(Command::Unknown(cmd)) => {
                writeln!(stdout, "Unknown command {cmd}. Type /help for commands.")?
            }
            Some(Command::Ask(text)) => {
                let outcome =
                    stream_answer(session, &text, &mut stdout, &mut status, ctrl_c()).await?;
                report(&mut stdout, session, &outcome)?;
            }
        }
    }

    writeln!(stdout)?;
    Ok(())
}
