//! Property-based tests for the move engine.
//!
//! Random games are played from the classic and formation layouts, checking
//! the board and turn invariants after every attempt.

use proptest::prelude::*;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;
use tilechess::{GameSession, LayoutKind, MoveResult, Outcome, SessionConfig};
use tilechess_core::{BoardState, GameError, Square, Team};

// =============================================================================
// Helpers
// =============================================================================

fn arb_layout() -> impl Strategy<Value = LayoutKind> {
    prop_oneof![Just(LayoutKind::Classic), Just(LayoutKind::Formation)]
}

/// One piece per square, and every piece knows where it stands.
fn assert_board_consistent(board: &BoardState) -> Result<(), TestCaseError> {
    let mut seen = HashSet::new();
    for piece in board.pieces() {
        prop_assert!(seen.insert(piece.square()), "two pieces on {:?}", piece.square());
        let occupant = board.piece_at(piece.square());
        prop_assert_eq!(occupant.map(|p| p.id()), Some(piece.id()));
    }
    Ok(())
}

fn total_pieces(board: &BoardState) -> usize {
    board.pieces().count() + board.roster(Team::White).len() + board.roster(Team::Black).len()
}

/// A random square on the board, legal or not
fn random_square(board: &BoardState, rng: &mut ChaCha8Rng) -> Square {
    let size = board.size();
    Square::new(rng.gen_range(0..size.width), rng.gen_range(0..size.height))
}

/// Plays `plies` random attempts. Most attempts pick a real destination of a
/// movable piece; some pick a random square to exercise rejection.
fn play_random(
    session: &mut GameSession,
    seed: u64,
    plies: usize,
    mut check: impl FnMut(&BoardState, &BoardState, &MoveResult) -> Result<(), TestCaseError>,
) -> Result<(), TestCaseError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    for _ in 0..plies {
        if session.outcome().is_terminal() {
            break;
        }
        let team = session.active_team();
        let movable: Vec<Square> = session
            .board()
            .pieces_of(team)
            .map(|p| p.square())
            .filter(|&sq| {
                session
                    .legal_destinations(sq)
                    .map(|d| !d.is_empty())
                    .unwrap_or(false)
            })
            .collect();
        let Some(&from) = movable.choose(&mut rng) else {
            break;
        };
        let destinations = session.on_piece_selected(from).unwrap();
        let to = if rng.gen_bool(0.8) {
            *destinations.choose(&mut rng).unwrap()
        } else {
            random_square(session.board(), &mut rng)
        };

        let before = session.board().clone();
        let result = session.attempt_move(from, to).unwrap();
        check(&before, session.board(), &result)?;
    }
    Ok(())
}

// =============================================================================
// Board and turn invariants
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// At most one piece per square in every reachable position
    #[test]
    fn prop_one_piece_per_square(layout in arb_layout(), seed in any::<u64>(), plies in 0usize..120) {
        let mut session = GameSession::new(&SessionConfig::for_layout(layout)).unwrap();
        play_random(&mut session, seed, plies, |_, after, _| assert_board_consistent(after))?;
    }

    /// The turn flips on every applied move and never on a rejected one
    #[test]
    fn prop_turn_alternates(layout in arb_layout(), seed in any::<u64>(), plies in 0usize..120) {
        let mut session = GameSession::new(&SessionConfig::for_layout(layout)).unwrap();
        play_random(&mut session, seed, plies, |before, after, result| {
            match result {
                MoveResult::Applied(report) => {
                    prop_assert_eq!(report.team, before.active_team());
                    prop_assert_eq!(after.active_team(), before.active_team().opposite());
                }
                MoveResult::Illegal(_) => {
                    prop_assert_eq!(after.active_team(), before.active_team());
                }
            }
            Ok(())
        })?;
    }

    /// Rejected attempts leave the board exactly as it was
    #[test]
    fn prop_illegal_leaves_board_unchanged(seed in any::<u64>(), plies in 0usize..120) {
        let mut session = GameSession::new(&SessionConfig::classic()).unwrap();
        play_random(&mut session, seed, plies, |before, after, result| {
            if let MoveResult::Illegal(_) = result {
                prop_assert_eq!(before, after);
            }
            Ok(())
        })?;
    }

    /// A captured piece leaves the board and lands once in its own team's roster
    #[test]
    fn prop_capture_moves_piece_to_roster(layout in arb_layout(), seed in any::<u64>(), plies in 0usize..200) {
        let mut session = GameSession::new(&SessionConfig::for_layout(layout)).unwrap();
        let initial = total_pieces(session.board());
        play_random(&mut session, seed, plies, |before, after, result| {
            prop_assert_eq!(total_pieces(after), initial);
            if let MoveResult::Applied(report) = result {
                if let Some(victim) = &report.captured {
                    prop_assert_ne!(victim.team(), report.team);
                    prop_assert!(after.find(victim.id()).is_none());
                    let roster = after.roster(victim.team());
                    let copies = roster.iter().filter(|p| p.id() == victim.id()).count();
                    prop_assert_eq!(copies, 1);
                    prop_assert_eq!(roster.len(), before.roster(victim.team()).len() + 1);
                    prop_assert!(after.roster(report.team).len() == before.roster(report.team).len());
                }
            }
            Ok(())
        })?;
    }

    /// Once a team has won, every further move is refused and the outcome sticks.
    ///
    /// Random classic games end by king capture well inside the ply limit;
    /// a case that does not finish is rejected, so a run where games never
    /// end fails on too many rejects instead of passing.
    #[test]
    fn prop_outcome_is_final(seed in any::<u64>()) {
        let mut session = GameSession::new(&SessionConfig::classic()).unwrap();
        play_random(&mut session, seed, 4000, |_, _, _| Ok(()))?;

        prop_assume!(session.outcome().is_terminal());
        let winner = session.outcome().winner().unwrap();
        let before = session.board().clone();
        let from = session.board().pieces().next().unwrap().square();
        prop_assert!(session.on_piece_selected(from).unwrap().is_empty());
        for to in session.board().size().squares().take(8) {
            let result = session.attempt_move(from, to);
            prop_assert!(
                matches!(result, Err(GameError::MoveAfterGameOver { winner: w }) if w == winner),
                "move after the end returned {:?}",
                result
            );
        }
        prop_assert_eq!(session.board(), &before);
        prop_assert_eq!(session.outcome(), Outcome::Won(winner));
    }

    /// After every applied move the game is won exactly when the loser's
    /// king has been captured or the loser has no pieces left
    #[test]
    fn prop_win_has_a_cause(layout in arb_layout(), seed in any::<u64>(), plies in 20usize..600) {
        let mut session = GameSession::new(&SessionConfig::for_layout(layout)).unwrap();
        let mut applied = 0usize;
        play_random(&mut session, seed, plies, |_, after, result| {
            let MoveResult::Applied(report) = result else {
                return Ok(());
            };
            applied += 1;
            let lost = |team: Team| {
                after.roster(team).iter().any(|p| p.is_king()) || after.piece_count(team) == 0
            };
            match report.outcome {
                Outcome::InProgress => {
                    prop_assert!(!lost(Team::White) && !lost(Team::Black));
                }
                Outcome::Won(winner) => {
                    prop_assert!(report.outcome_changed);
                    prop_assert!(lost(winner.opposite()));
                    prop_assert!(!lost(winner));
                }
            }
            Ok(())
        })?;
        // four in five attempts use a real destination, so some move was applied
        prop_assert!(applied > 0);
    }
}

// =============================================================================
// Additional Property Tests
// =============================================================================

proptest! {
    /// Squares parse back from their display form
    #[test]
    fn prop_square_display_parses(col in 0u8..30, row in 0u8..30) {
        let sq = Square::new(col, row);
        prop_assert_eq!(sq.to_string().parse::<Square>().unwrap(), sq);
    }

    /// Reset always returns to the configured start
    #[test]
    fn prop_reset_restores_start(layout in arb_layout(), seed in any::<u64>(), plies in 0usize..80) {
        let config = SessionConfig::for_layout(layout);
        let mut session = GameSession::new(&config).unwrap();
        let start = session.board().clone();
        play_random(&mut session, seed, plies, |_, _, _| Ok(()))?;

        session.reset_game();
        prop_assert_eq!(session.board(), &start);
        prop_assert_eq!(session.outcome(), Outcome::InProgress);
        prop_assert_eq!(session.active_team(), Team::White);
    }
}
