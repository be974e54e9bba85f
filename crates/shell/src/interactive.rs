//! Line-oriented presentation shell.
//!
//! Stands in for a graphical front end: it turns typed commands into piece
//! selections and move attempts, and prints the board and the results.

use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};
use tilechess::{GameSession, MoveResult, SessionEvent};
use tilechess_core::{GameError, Square};
use tracing::debug;

const HELP: &str = "\
commands:
  select C R        pick up the piece on column C, row R and list its moves
  move C R C R      move a piece (picks it up first if needed)
                    squares may also be written C,R: move 4,1 4,3
  show              print the board
  reset             start over
  help              this text
  quit              leave";

/// A parsed shell command. Coordinates stay signed until checked against the board.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    Select(i32, i32),
    Move((i32, i32), (i32, i32)),
    Show,
    Reset,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            bail!("empty command");
        };
        let mut numbers = Vec::new();
        for word in words {
            if word.contains(',') {
                let square: Square = word.parse()?;
                numbers.extend([i32::from(square.col), i32::from(square.row)]);
            } else {
                numbers.push(word.parse::<i32>().with_context(|| format!("not a number: {}", word))?);
            }
        }

        let command = match (verb.to_ascii_lowercase().as_str(), numbers.as_slice()) {
            ("select" | "s", &[c, r]) => Command::Select(c, r),
            ("move" | "m", &[c1, r1, c2, r2]) => Command::Move((c1, r1), (c2, r2)),
            ("show" | "board", []) => Command::Show,
            ("reset", []) => Command::Reset,
            ("help" | "?", []) => Command::Help,
            ("quit" | "exit" | "q", []) => Command::Quit,
            _ => bail!("unrecognised command: {} (try 'help')", line.trim()),
        };
        Ok(command)
    }
}

/// Drives one session from text input
pub struct Shell<W: Write> {
    session: GameSession,
    out: W,
}

impl<W: Write> Shell<W> {
    pub fn new(session: GameSession, out: W) -> Self {
        Shell { session, out }
    }

    /// Read commands until `quit` or end of input
    pub fn run<R: BufRead>(&mut self, input: R) -> Result<()> {
        self.show()?;
        self.prompt()?;
        for line in input.lines() {
            let line = line.context("failed to read command")?;
            if line.trim().is_empty() {
                self.prompt()?;
                continue;
            }
            match Command::parse(&line) {
                Ok(Command::Quit) => break,
                Ok(command) => self.execute(command)?,
                Err(e) => writeln!(self.out, "error: {:#}", e)?,
            }
            self.prompt()?;
        }
        Ok(())
    }

    pub fn execute(&mut self, command: Command) -> Result<()> {
        debug!(?command, "shell command");
        let outcome = match command {
            Command::Select(c, r) => self.select(c, r),
            Command::Move(from, to) => self.move_piece(from, to),
            Command::Show => return self.show(),
            Command::Reset => {
                self.session.reset_game();
                self.report_events()?;
                return self.show();
            }
            Command::Help => return writeln!(self.out, "{}", HELP).map_err(Into::into),
            Command::Quit => return Ok(()),
        };

        // rule violations are reported to the player, not propagated
        match outcome {
            Ok(()) => Ok(()),
            Err(e) => match e.downcast::<GameError>() {
                Ok(game_error) => writeln!(self.out, "error: {}", game_error).map_err(Into::into),
                Err(other) => Err(other),
            },
        }
    }

    fn square(&self, (col, row): (i32, i32)) -> Result<Square> {
        Ok(self.session.board().size().checked(col, row)?)
    }

    fn select(&mut self, col: i32, row: i32) -> Result<()> {
        let square = self.square((col, row))?;
        let destinations = self.session.on_piece_selected(square)?;
        if destinations.is_empty() {
            writeln!(self.out, "nothing to move on {}", square)?;
        } else {
            let list: Vec<String> = destinations.iter().map(Square::to_string).collect();
            writeln!(self.out, "{} can reach: {}", square, list.join("  "))?;
        }
        Ok(())
    }

    fn move_piece(&mut self, from: (i32, i32), to: (i32, i32)) -> Result<()> {
        let from = self.square(from)?;
        let to = self.square(to)?;
        if self.session.selection().map(|(sq, _)| sq) != Some(from) {
            self.session.on_piece_selected(from)?;
        }

        match self.session.on_move_attempt(from, to)? {
            MoveResult::Applied(report) => {
                writeln!(
                    self.out,
                    "{} {} {} -> {}",
                    report.team, report.archetype, report.from, report.to
                )?;
                self.report_events()?;
                self.show()?;
            }
            MoveResult::Illegal(reason) => {
                writeln!(self.out, "illegal move: {}", reason)?;
            }
        }
        Ok(())
    }

    fn report_events(&mut self) -> Result<()> {
        for event in self.session.take_events() {
            match event {
                SessionEvent::Captured(piece) => {
                    let slot = self
                        .session
                        .board()
                        .roster(piece.team())
                        .slot_of(piece.id())
                        .unwrap_or_default();
                    writeln!(self.out, "captured {} (graveyard slot {})", piece, slot)?;
                }
                SessionEvent::OutcomeChanged(outcome) => {
                    writeln!(self.out, "*** {} *** type 'reset' to play again", outcome)?;
                }
                SessionEvent::Reset => writeln!(self.out, "new game")?,
            }
        }
        Ok(())
    }

    fn show(&mut self) -> Result<()> {
        let board = self.session.board();
        write!(self.out, "{}", board)?;
        writeln!(
            self.out,
            "{} to move | {} | lost: White {}, Black {}",
            board.active_team(),
            self.session.outcome(),
            board.roster(tilechess_core::Team::White).len(),
            board.roster(tilechess_core::Team::Black).len(),
        )?;
        Ok(())
    }

    fn prompt(&mut self) -> Result<()> {
        write!(self.out, "> ")?;
        self.out.flush()?;
        Ok(())
    }
}
