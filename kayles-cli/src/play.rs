//! Play command - a terminal game against the solver
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_session() - the turn loop
//! - Level 3: human_turn(), ai_turn()
//! - Level 4: input parsing, board rendering

use std::io::{self, BufRead, Write};

use anyhow::{bail, Result};
use clap::{Args, ValueEnum};

use kayles_core::{clamp_pins, Game, GameConfig, Side, Solver, DEFAULT_PINS, MAX_PINS, MIN_PINS};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Number of pins (clamped to the supported range)
    #[arg(long, default_value_t = DEFAULT_PINS)]
    pub pins: usize,

    /// Who moves first
    #[arg(long, value_enum, default_value = "human")]
    pub first: FirstMover,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum FirstMover {
    Human,
    Ai,
}

impl From<FirstMover> for Side {
    fn from(first: FirstMover) -> Self {
        match first {
            FirstMover::Human => Side::Human,
            FirstMover::Ai => Side::Ai,
        }
    }
}

/// What the human typed
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Pair(usize, usize),
    Hint,
    Quit,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
pub fn run(args: PlayArgs) -> Result<()> {
    let pins = clamp_pins(args.pins);
    if pins != args.pins {
        println!("Pin count must be between {MIN_PINS} and {MAX_PINS}; using {pins}.");
    }

    let config = GameConfig::new(pins, args.first.into());
    let mut game = Game::new(config)?;
    let mut solver = Solver::new();

    println!("Opening: {}", solver.opening_outcome(pins));
    println!("Remove two adjacent pins by typing their numbers, e.g. `3 4`.");
    println!("Type `hint` for advice or `quit` to stop. Whoever cannot move wins.\n");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    play_session(&mut game, &mut solver, &mut stdin.lock(), &mut stdout)
}

// ============================================================================
// LEVEL 2 - TURN LOOP
// ============================================================================

/// Alternate turns until the game ends or the human quits
fn play_session<R: BufRead, W: Write>(
    game: &mut Game,
    solver: &mut Solver,
    input: &mut R,
    output: &mut W,
) -> Result<()> {
    while !game.is_over() {
        writeln!(output, "{}", render(game))?;
        match game.to_move() {
            Side::Ai => ai_turn(game, solver, output)?,
            Side::Human => {
                if !human_turn(game, solver, input, output)? {
                    writeln!(output, "Game abandoned.")?;
                    return Ok(());
                }
            }
        }
    }

    writeln!(output, "{}", render(game))?;
    match game.winner() {
        Some(Side::Human) => writeln!(output, "No moves left for you: you win!")?,
        Some(Side::Ai) => writeln!(output, "No moves left for the AI: the AI wins.")?,
        None => {}
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - TURNS
// ============================================================================

/// Read commands until a legal move is made; `false` means the human quit
fn human_turn<R: BufRead, W: Write>(
    game: &mut Game,
    solver: &mut Solver,
    input: &mut R,
    output: &mut W,
) -> Result<bool> {
    loop {
        write!(output, "your move> ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(false);
        }

        match parse_command(&line) {
            Ok(Command::Quit) => return Ok(false),
            Ok(Command::Hint) => {
                let hint = if solver.is_losing(game.board()) {
                    "You are in a losing position against perfect play.".to_string()
                } else {
                    match solver.best_move(game.board()) {
                        Some(mv) => format!("Try pins {} and {}.", mv.index + 1, mv.index + 2),
                        None => "No moves left.".to_string(),
                    }
                };
                writeln!(output, "{hint}")?;
            }
            Ok(Command::Pair(a, b)) => match game.play_pair(a, b) {
                Ok(_) => return Ok(true),
                Err(e) => {
                    tracing::debug!("rejected move: {e}");
                    writeln!(
                        output,
                        "Pins {} and {} cannot be removed. Pick two adjacent standing pins.",
                        a + 1,
                        b + 1
                    )?;
                }
            },
            Err(e) => writeln!(output, "{e}")?,
        }
    }
}

fn ai_turn<W: Write>(game: &mut Game, solver: &mut Solver, output: &mut W) -> Result<()> {
    let mv = game.play_ai(solver)?;
    writeln!(output, "AI removes pins {} and {}.", mv.index + 1, mv.index + 2)?;
    Ok(())
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Parse `a b` (1-based pin numbers), `hint` or `quit`
fn parse_command(line: &str) -> Result<Command> {
    let line = line.trim();
    match line {
        "q" | "quit" | "exit" => return Ok(Command::Quit),
        "h" | "hint" => return Ok(Command::Hint),
        _ => {}
    }

    let numbers = line
        .split(|c: char| c.is_whitespace() || c == ',' || c == '-')
        .filter(|s| !s.is_empty())
        .map(str::parse::<usize>)
        .collect::<Result<Vec<_>, _>>();

    match numbers.as_deref() {
        Ok([a, b]) if *a >= 1 && *b >= 1 => Ok(Command::Pair(a - 1, b - 1)),
        _ => bail!("Expected two pin numbers (from 1), `hint` or `quit`"),
    }
}

/// Pins as `|` (standing) or `.` (removed) with a numbered ruler
fn render(game: &Game) -> String {
    let pins: String = game
        .board()
        .cells()
        .iter()
        .map(|&alive| if alive { '|' } else { '.' })
        .collect();
    let ruler: String = (1..=game.board().len())
        .map(|i| match i {
            i if i % 10 == 0 => char::from(b'0' + ((i / 10) % 10) as u8),
            i if i % 5 == 0 => '+',
            _ => ' ',
        })
        .collect();
    format!("{pins}\n{ruler}\n{} to move", game.to_move())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("3 4\n").unwrap(), Command::Pair(2, 3));
        assert_eq!(parse_command("5-6").unwrap(), Command::Pair(4, 5));
        assert_eq!(parse_command(" hint ").unwrap(), Command::Hint);
        assert_eq!(parse_command("quit").unwrap(), Command::Quit);
        assert!(parse_command("0 1").is_err());
        assert!(parse_command("1 2 3").is_err());
        assert!(parse_command("abc").is_err());
    }

    #[test]
    fn test_session_human_loses_three_pins() {
        let mut game = Game::new(GameConfig::new(3, Side::Human)).unwrap();
        let mut solver = Solver::new();
        let mut input = Cursor::new("1 3\nhint\n1 2\n");
        let mut output = Vec::new();

        play_session(&mut game, &mut solver, &mut input, &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Pins 1 and 3 cannot be removed"));
        assert!(text.contains("losing position"));
        assert!(text.contains("the AI wins"));
        assert_eq!(game.winner(), Some(Side::Ai));
    }

    #[test]
    fn test_session_ends_on_eof() {
        let mut game = Game::new(GameConfig::new(10, Side::Human)).unwrap();
        let mut solver = Solver::new();
        let mut input = Cursor::new("");
        let mut output = Vec::new();

        play_session(&mut game, &mut solver, &mut input, &mut output).unwrap();

        assert!(!game.is_over());
        assert!(String::from_utf8(output).unwrap().contains("abandoned"));
    }

    #[test]
    fn test_render() {
        let game = Game::from_board("1101".parse().unwrap(), Side::Human);
        assert!(render(&game).starts_with("||.|\n"));
    }
}
