//! Session state machine: `Init -> Ready -> Terminated`.

use std::fmt;

use tracing::{debug, instrument};

use super::error::{ApplicationError, ApplicationResult, ParseError};

/// Outcome of one successfully applied command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Exactly one output line
    Line(String),
    /// The session ends, nothing is printed
    Quit,
}

impl Reply {
    pub fn line(text: impl Into<String>) -> Self {
        Reply::Line(text.into())
    }
}

/// One interpreter: a command vocabulary plus the live model it mutates.
pub trait Environment {
    type Command: fmt::Debug;

    /// Turns one input line into a typed command without touching the model.
    fn parse(line: &str) -> Result<Self::Command, ParseError>;

    /// Applies one command atomically: either the full effect and a reply, or an
    /// error and an unchanged model.
    fn apply(&mut self, command: Self::Command) -> ApplicationResult<Reply>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Init,
    Ready,
    Terminated,
}

/// Owns exactly one environment for the lifetime of a run.
#[derive(Debug)]
pub struct Session<E> {
    environment: E,
    state: SessionState,
}

impl<E: Environment> Session<E> {
    pub fn new(environment: E) -> Self {
        Self {
            environment,
            state: SessionState::Init,
        }
    }

    pub fn start(&mut self) -> ApplicationResult<()> {
        match self.state {
            SessionState::Init => {
                self.state = SessionState::Ready;
                Ok(())
            }
            state => Err(ApplicationError::Fatal(format!(
                "session cannot start while {state:?}"
            ))),
        }
    }

    /// Parses and applies one line.
    ///
    /// Lines before `start` or after the quit command are fatal.
    #[instrument(level = "debug", skip(self))]
    pub fn execute(&mut self, line: &str) -> ApplicationResult<Reply> {
        match self.state {
            SessionState::Ready => {}
            SessionState::Init => {
                return Err(ApplicationError::Fatal("session has not been started".into()))
            }
            SessionState::Terminated => {
                return Err(ApplicationError::Fatal("session is already terminated".into()))
            }
        }

        let command = E::parse(line)?;
        debug!("execute: {:?}", command);
        let reply = self.environment.apply(command)?;
        if reply == Reply::Quit {
            self.state = SessionState::Terminated;
        }
        Ok(reply)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn environment(&self) -> &E {
        &self.environment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts `inc` commands, `quit` ends.
    #[derive(Debug, Default)]
    struct Counter(u32);

    #[derive(Debug)]
    enum CounterCommand {
        Inc,
        Quit,
    }

    impl Environment for Counter {
        type Command = CounterCommand;

        fn parse(line: &str) -> Result<CounterCommand, ParseError> {
            match line.trim() {
                "inc" => Ok(CounterCommand::Inc),
                "quit" => Ok(CounterCommand::Quit),
                "" => Err(ParseError::Empty),
                other => Err(ParseError::UnknownCommand(other.into())),
            }
        }

        fn apply(&mut self, command: CounterCommand) -> ApplicationResult<Reply> {
            match command {
                CounterCommand::Inc => {
                    self.0 += 1;
                    Ok(Reply::line(self.0.to_string()))
                }
                CounterCommand::Quit => Ok(Reply::Quit),
            }
        }
    }

    #[test]
    fn given_new_session_when_executing_before_start_then_fatal() {
        let mut session = Session::new(Counter::default());

        let err = session.execute("inc").unwrap_err();

        assert!(err.is_fatal());
        assert_eq!(session.environment().0, 0);
    }

    #[test]
    fn given_ready_session_when_commands_run_then_one_reply_each() {
        let mut session = Session::new(Counter::default());
        session.start().unwrap();

        assert_eq!(session.execute("inc").unwrap(), Reply::line("1"));
        assert_eq!(session.execute("inc").unwrap(), Reply::line("2"));
        assert_eq!(session.state(), SessionState::Ready);
    }

    #[test]
    fn given_parse_error_when_executing_then_recoverable() {
        let mut session = Session::new(Counter::default());
        session.start().unwrap();

        let err = session.execute("dec").unwrap_err();

        assert!(!err.is_fatal());
        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(session.execute("inc").unwrap(), Reply::line("1"));
    }

    #[test]
    fn given_quit_when_executing_more_then_fatal() {
        let mut session = Session::new(Counter::default());
        session.start().unwrap();

        assert_eq!(session.execute("quit").unwrap(), Reply::Quit);
        assert_eq!(session.state(), SessionState::Terminated);
        assert!(session.execute("inc").unwrap_err().is_fatal());
        assert!(session.start().unwrap_err().is_fatal());
    }
}
