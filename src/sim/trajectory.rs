//! Cannon shot simulation
//!
//! A shot is resolved synchronously: each bullet steps cell by cell from the
//! cannon, and whenever it enters an occupied cell the occupant's kind
//! decides what happens next:
//!
//! - titan: an enemy titan is destroyed and the shooter wins; the whole shot
//!   stops. The shooter's own titan just absorbs
//! - tank: passes through when struck on its front face, absorbed otherwise
//! - ricochet: turns 90° off its mirror
//! - semi-ricochet: turns 90° on its two reflective faces, absorbed on the others
//! - cannon: an enemy cannon is captured; the shooter's own cannon just absorbs
//!
//! The result carries every step so the presentation layer can replay the
//! flight at its own pace. Nothing here depends on wall-clock time.

use serde::{Deserialize, Serialize};

use super::board::Board;
use super::cell::{Cell, Direction};
use super::piece::{Piece, PieceId, PieceKind, Player};
use crate::consts::MAX_STEPS_PER_DIRECTION;
use crate::error::EngineError;

/// Which directions a cannon shoots in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FiringModel {
    /// One bullet in each orthogonal direction, fired together
    #[default]
    AllDirections,
    /// A single bullet toward the opponent's home row
    Forward,
}

impl FiringModel {
    pub fn directions(self, shooter: Player) -> Vec<Direction> {
        match self {
            FiringModel::AllDirections => Direction::ALL.to_vec(),
            FiringModel::Forward => vec![shooter.forward()],
        }
    }
}

/// One cell-to-cell move of a bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulletStep {
    pub from: Cell,
    pub to: Cell,
}

/// A non-terminal interaction with a piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Impact {
    PassedThrough {
        piece: PieceId,
        at: Cell,
    },
    Reflected {
        piece: PieceId,
        at: Cell,
        from: Direction,
        to: Direction,
    },
}

/// How a single bullet ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Termination {
    /// Flew off the board after `last`
    ExitedBoard { last: Cell },
    /// Stopped by a piece that survives
    Absorbed { piece: PieceId, at: Cell },
    /// Stopped by an enemy cannon, which is removed
    Captured { piece: PieceId, at: Cell },
    /// Hit an enemy titan, which is removed and ends the game
    TitanDestroyed { piece: PieceId, owner: Player, at: Cell },
    /// Step budget ran out
    BudgetExhausted { at: Cell },
}

/// Full path of one bullet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulletTrace {
    /// Initial direction of travel
    pub direction: Direction,
    pub steps: Vec<BulletStep>,
    pub impacts: Vec<Impact>,
    pub termination: Termination,
}

/// Resolved result of one cannon firing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShotOutcome {
    pub shooter: Player,
    pub cannon: PieceId,
    pub origin: Cell,
    /// One trace per bullet, in firing order
    pub traces: Vec<BulletTrace>,
    /// Pieces removed from the board, in removal order
    pub captured: Vec<Piece>,
    /// The shooter, when an enemy titan was destroyed
    pub winner: Option<Player>,
}

impl ShotOutcome {
    /// All bullet steps, bullet after bullet
    pub fn steps(&self) -> impl Iterator<Item = &BulletStep> {
        self.traces.iter().flat_map(|t| t.steps.iter())
    }

    pub fn step_count(&self) -> usize {
        self.traces.iter().map(|t| t.steps.len()).sum()
    }
}

/// What a bullet does on entering a piece's cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Collision {
    Continue(Direction),
    Absorb,
    Capture,
    DestroyTitan,
}

fn collide(piece: &Piece, travel: Direction, shooter: Player) -> Collision {
    // The face of the piece the bullet strikes
    let face = travel.opposite();
    match piece.kind {
        PieceKind::Titan if piece.owner != shooter => Collision::DestroyTitan,
        PieceKind::Titan => Collision::Absorb,
        PieceKind::Tank => {
            if face == piece.orientation {
                Collision::Continue(travel)
            } else {
                Collision::Absorb
            }
        }
        PieceKind::Ricochet | PieceKind::SemiRicochet => match piece.mirror() {
            Some(mirror) if piece.reflects_from(face) => Collision::Continue(mirror.reflect(travel)),
            _ => Collision::Absorb,
        },
        PieceKind::Cannon => {
            if piece.owner != shooter {
                Collision::Capture
            } else {
                Collision::Absorb
            }
        }
    }
}

/// Fire `shooter`'s cannon and apply every capture to `board`
///
/// Bullets are resolved one after another in firing order, so a later bullet
/// sees the captures made by an earlier one. A destroyed titan stops the
/// shot immediately.
pub fn fire(
    board: &mut Board,
    shooter: Player,
    model: FiringModel,
) -> Result<ShotOutcome, EngineError> {
    let cannon = board
        .find(shooter, PieceKind::Cannon)
        .ok_or(EngineError::NoCannon(shooter))?;
    let (cannon_id, origin) = (cannon.id, cannon.position);

    let mut outcome = ShotOutcome {
        shooter,
        cannon: cannon_id,
        origin,
        traces: Vec::new(),
        captured: Vec::new(),
        winner: None,
    };

    for direction in model.directions(shooter) {
        let trace = fly(board, shooter, origin, direction, &mut outcome.captured);
        if let Termination::TitanDestroyed { .. } = trace.termination {
            outcome.winner = Some(shooter);
            outcome.traces.push(trace);
            break;
        }
        outcome.traces.push(trace);
    }

    board.assert_consistent();
    log::debug!(
        "{} fired from {}: {} bullet(s), {} step(s), {} capture(s)",
        shooter,
        origin,
        outcome.traces.len(),
        outcome.step_count(),
        outcome.captured.len()
    );
    Ok(outcome)
}

/// Step a single bullet until it leaves the board, is stopped, or runs out
/// of budget
fn fly(
    board: &mut Board,
    shooter: Player,
    origin: Cell,
    direction: Direction,
    captured: &mut Vec<Piece>,
) -> BulletTrace {
    let mut trace = BulletTrace {
        direction,
        steps: Vec::new(),
        impacts: Vec::new(),
        termination: Termination::ExitedBoard { last: origin },
    };
    let mut pos = origin;
    let mut travel = direction;

    loop {
        if trace.steps.len() >= MAX_STEPS_PER_DIRECTION {
            log::debug!("bullet from {} ran out of budget at {}", origin, pos);
            trace.termination = Termination::BudgetExhausted { at: pos };
            return trace;
        }
        let Some(next) = pos.step(travel) else {
            trace.termination = Termination::ExitedBoard { last: pos };
            return trace;
        };
        trace.steps.push(BulletStep { from: pos, to: next });
        pos = next;

        let Some(piece) = board.cell_at(pos) else {
            continue;
        };
        let (id, owner) = (piece.id, piece.owner);

        match collide(piece, travel, shooter) {
            Collision::Continue(new_travel) if new_travel == travel => {
                trace.impacts.push(Impact::PassedThrough { piece: id, at: pos });
            }
            Collision::Continue(new_travel) => {
                trace.impacts.push(Impact::Reflected {
                    piece: id,
                    at: pos,
                    from: travel,
                    to: new_travel,
                });
                travel = new_travel;
            }
            Collision::Absorb => {
                trace.termination = Termination::Absorbed { piece: id, at: pos };
                return trace;
            }
            Collision::Capture => {
                if let Some(removed) = board.remove(pos) {
                    log::info!("{} captured {} {} at {}", shooter, owner, removed.kind, pos);
                    captured.push(removed);
                }
                trace.termination = Termination::Captured { piece: id, at: pos };
                return trace;
            }
            Collision::DestroyTitan => {
                if let Some(removed) = board.remove(pos) {
                    log::info!("{} titan destroyed at {}", owner, pos);
                    captured.push(removed);
                }
                trace.termination = Termination::TitanDestroyed {
                    piece: id,
                    owner,
                    at: pos,
                };
                return trace;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::strategies::arb_board_with_black_cannon;
    use proptest::prelude::*;

    fn cell(row: usize, col: usize) -> Cell {
        Cell::new(row, col).unwrap()
    }

    fn board_with_cannon(at: Cell) -> (Board, PieceId) {
        let mut board = Board::empty();
        let id = board
            .spawn(PieceKind::Cannon, Player::Black, at, Direction::South)
            .unwrap();
        (board, id)
    }

    fn trace(outcome: &ShotOutcome, direction: Direction) -> &BulletTrace {
        outcome
            .traces
            .iter()
            .find(|t| t.direction == direction)
            .unwrap()
    }

    #[test]
    fn test_no_cannon() {
        let mut board = Board::empty();
        assert_eq!(
            fire(&mut board, Player::White, FiringModel::AllDirections),
            Err(EngineError::NoCannon(Player::White))
        );
    }

    #[test]
    fn test_empty_board_exits_every_edge() {
        let (mut board, _) = board_with_cannon(cell(3, 3));
        let outcome = fire(&mut board, Player::Black, FiringModel::AllDirections).unwrap();
        assert_eq!(outcome.traces.len(), 4);
        assert_eq!(trace(&outcome, Direction::North).steps.len(), 3);
        assert_eq!(trace(&outcome, Direction::East).steps.len(), 4);
        assert_eq!(trace(&outcome, Direction::South).steps.len(), 4);
        assert_eq!(trace(&outcome, Direction::West).steps.len(), 3);
        assert_eq!(
            trace(&outcome, Direction::South).termination,
            Termination::ExitedBoard { last: cell(7, 3) }
        );
        assert!(outcome.captured.is_empty());
        assert_eq!(outcome.winner, None);
    }

    #[test]
    fn test_forward_model_fires_once() {
        let (mut board, _) = board_with_cannon(cell(0, 7));
        let outcome = fire(&mut board, Player::Black, FiringModel::Forward).unwrap();
        assert_eq!(outcome.traces.len(), 1);
        assert_eq!(outcome.traces[0].direction, Direction::South);
        assert_eq!(outcome.step_count(), 7);
    }

    #[test]
    fn test_tank_front_passes_through() {
        let (mut board, _) = board_with_cannon(cell(0, 7));
        let tank = board
            .spawn(PieceKind::Tank, Player::White, cell(4, 7), Direction::North)
            .unwrap();
        let outcome = fire(&mut board, Player::Black, FiringModel::Forward).unwrap();
        let south = &outcome.traces[0];

        let first: Vec<_> = south.steps.iter().take(3).map(|s| s.to).collect();
        assert_eq!(first, vec![cell(1, 7), cell(2, 7), cell(3, 7)]);
        assert!(first.iter().all(|&c| board.cell_at(c).is_none()));
        assert_eq!(
            south.impacts,
            vec![Impact::PassedThrough {
                piece: tank,
                at: cell(4, 7)
            }]
        );
        assert_eq!(south.steps[4], BulletStep { from: cell(4, 7), to: cell(5, 7) });
        assert_eq!(south.termination, Termination::ExitedBoard { last: cell(7, 7) });
        assert!(board.piece(tank).is_some());
    }

    #[test]
    fn test_tank_rear_and_flank_absorb() {
        let (mut board, _) = board_with_cannon(cell(0, 7));
        let tank = board
            .spawn(PieceKind::Tank, Player::White, cell(4, 7), Direction::South)
            .unwrap();
        let outcome = fire(&mut board, Player::Black, FiringModel::Forward).unwrap();
        assert_eq!(
            outcome.traces[0].termination,
            Termination::Absorbed {
                piece: tank,
                at: cell(4, 7)
            }
        );

        let (mut board, _) = board_with_cannon(cell(0, 7));
        board
            .spawn(PieceKind::Tank, Player::White, cell(4, 7), Direction::East)
            .unwrap();
        let outcome = fire(&mut board, Player::Black, FiringModel::Forward).unwrap();
        assert!(matches!(
            outcome.traces[0].termination,
            Termination::Absorbed { .. }
        ));
        assert_eq!(board.pieces().len(), 2);
    }

    #[test]
    fn test_ricochet_turns_bullet() {
        // Bullet heading south hits a `\` mirror and turns east
        let (mut board, _) = board_with_cannon(cell(0, 2));
        let rico = board
            .spawn(PieceKind::Ricochet, Player::White, cell(3, 2), Direction::North)
            .unwrap();
        let outcome = fire(&mut board, Player::Black, FiringModel::Forward).unwrap();
        let t = &outcome.traces[0];
        assert_eq!(
            t.impacts,
            vec![Impact::Reflected {
                piece: rico,
                at: cell(3, 2),
                from: Direction::South,
                to: Direction::East,
            }]
        );
        assert_eq!(t.steps[3], BulletStep { from: cell(3, 2), to: cell(3, 3) });
        assert_eq!(t.termination, Termination::ExitedBoard { last: cell(3, 7) });
    }

    #[test]
    fn test_semi_ricochet_reflects_on_front_absorbs_on_back() {
        // Reflective faces North and East: a southbound bullet strikes North
        let (mut board, _) = board_with_cannon(cell(0, 2));
        board
            .spawn(PieceKind::SemiRicochet, Player::White, cell(3, 2), Direction::North)
            .unwrap();
        let outcome = fire(&mut board, Player::Black, FiringModel::Forward).unwrap();
        assert!(matches!(
            outcome.traces[0].impacts[0],
            Impact::Reflected { to: Direction::East, .. }
        ));

        // Reflective faces South and West: the North face absorbs
        let (mut board, _) = board_with_cannon(cell(0, 2));
        let semi = board
            .spawn(PieceKind::SemiRicochet, Player::White, cell(3, 2), Direction::South)
            .unwrap();
        let outcome = fire(&mut board, Player::Black, FiringModel::Forward).unwrap();
        assert_eq!(
            outcome.traces[0].termination,
            Termination::Absorbed {
                piece: semi,
                at: cell(3, 2)
            }
        );
        assert!(board.piece(semi).is_some());
    }

    #[test]
    fn test_enemy_cannon_captured_own_cannon_absorbs() {
        let mut board = Board::standard();
        let outcome = fire(&mut board, Player::Black, FiringModel::AllDirections).unwrap();
        assert_eq!(outcome.captured.len(), 1);
        assert_eq!(outcome.captured[0].kind, PieceKind::Cannon);
        assert_eq!(outcome.captured[0].owner, Player::White);
        assert!(board.find(Player::White, PieceKind::Cannon).is_none());
        // West bullet stops on black's own tank (struck on its flank)
        assert!(matches!(
            trace(&outcome, Direction::West).termination,
            Termination::Absorbed { .. }
        ));

        // A mirror sending the bullet back into its own cannon
        let (mut board, cannon) = board_with_cannon(cell(4, 0));
        board
            .spawn(PieceKind::Ricochet, Player::White, cell(4, 3), Direction::North)
            .unwrap();
        board
            .spawn(PieceKind::Ricochet, Player::White, cell(6, 3), Direction::East)
            .unwrap();
        board
            .spawn(PieceKind::Ricochet, Player::White, cell(6, 0), Direction::North)
            .unwrap();
        let outcome = fire(&mut board, Player::Black, FiringModel::AllDirections).unwrap();
        assert_eq!(
            trace(&outcome, Direction::East).termination,
            Termination::Absorbed {
                piece: cannon,
                at: cell(4, 0)
            }
        );
        assert!(board.piece(cannon).is_some());
    }

    #[test]
    fn test_titan_hit_stops_the_shot() {
        // North bullet fires first and kills the titan; no other bullet flies
        let (mut board, _) = board_with_cannon(cell(4, 4));
        let titan = board
            .spawn(PieceKind::Titan, Player::White, cell(1, 4), Direction::North)
            .unwrap();
        let enemy_cannon = board
            .spawn(PieceKind::Cannon, Player::White, cell(7, 4), Direction::North)
            .unwrap();
        let outcome = fire(&mut board, Player::Black, FiringModel::AllDirections).unwrap();

        assert_eq!(outcome.traces.len(), 1);
        assert_eq!(outcome.winner, Some(Player::Black));
        assert_eq!(
            outcome.traces[0].termination,
            Termination::TitanDestroyed {
                piece: titan,
                owner: Player::White,
                at: cell(1, 4)
            }
        );
        assert!(board.piece(titan).is_none());
        assert!(board.piece(enemy_cannon).is_some());
    }

    #[test]
    fn test_own_titan_absorbs() {
        let (mut board, _) = board_with_cannon(cell(0, 0));
        let titan = board
            .spawn(PieceKind::Titan, Player::Black, cell(0, 3), Direction::South)
            .unwrap();
        let outcome = fire(&mut board, Player::Black, FiringModel::AllDirections).unwrap();
        assert_eq!(outcome.winner, None);
        assert_eq!(
            trace(&outcome, Direction::East).termination,
            Termination::Absorbed {
                piece: titan,
                at: cell(0, 3)
            }
        );
        assert!(outcome.captured.is_empty());
        assert_eq!(board.piece(titan).unwrap().position, cell(0, 3));
        // The shot goes on in the remaining directions
        assert_eq!(outcome.traces.len(), 4);
    }

    #[test]
    fn test_long_mirror_path_hits_step_budget() {
        // Ricochets at both ends of every row walk the bullet back and forth
        // down the whole board, then (7,0) sends it back north. North-facing
        // mirrors are `\`, east-facing ones `/`
        let (back, slash) = (Direction::North, Direction::East);
        let mirrors = [
            ((0, 7), back),
            ((1, 7), slash),
            ((1, 0), slash),
            ((2, 0), back),
            ((2, 7), back),
            ((3, 7), slash),
            ((3, 0), slash),
            ((4, 0), back),
            ((4, 7), back),
            ((5, 7), slash),
            ((5, 0), slash),
            ((6, 0), back),
            ((6, 7), back),
            ((7, 7), slash),
            ((7, 0), back),
        ];
        let (mut board, _) = board_with_cannon(cell(0, 0));
        for ((row, col), orientation) in mirrors {
            board
                .spawn(PieceKind::Ricochet, Player::White, cell(row, col), orientation)
                .unwrap();
        }
        let outcome = fire(&mut board, Player::Black, FiringModel::AllDirections).unwrap();
        let east = trace(&outcome, Direction::East);
        assert_eq!(east.steps.len(), MAX_STEPS_PER_DIRECTION);
        assert_eq!(east.termination, Termination::BudgetExhausted { at: cell(6, 0) });
        assert!(outcome.captured.is_empty());
        assert!(board.is_consistent());
    }

    proptest! {
        #[test]
        fn prop_shot_terminates_within_budget(board in arb_board_with_black_cannon()) {
            let mut board = board;
            let outcome = fire(&mut board, Player::Black, FiringModel::AllDirections).unwrap();
            prop_assert!(outcome.traces.len() <= 4);
            for t in &outcome.traces {
                prop_assert!(t.steps.len() <= MAX_STEPS_PER_DIRECTION);
                // Consecutive steps are contiguous and orthogonal
                for pair in t.steps.windows(2) {
                    prop_assert_eq!(pair[0].to, pair[1].from);
                }
                prop_assert!(t.steps.iter().all(|s| s.from.manhattan(s.to) == 1));
            }
            prop_assert!(board.is_consistent());
        }

        #[test]
        fn prop_shot_is_deterministic(board in arb_board_with_black_cannon()) {
            let mut a = board.clone();
            let mut b = board;
            let first = fire(&mut a, Player::Black, FiringModel::AllDirections).unwrap();
            let second = fire(&mut b, Player::Black, FiringModel::AllDirections).unwrap();
            prop_assert_eq!(first, second);
            prop_assert_eq!(a, b);
        }

        #[test]
        fn prop_titan_hit_is_last_trace(board in arb_board_with_black_cannon()) {
            let mut board = board;
            let outcome = fire(&mut board, Player::Black, FiringModel::AllDirections).unwrap();
            let titan_traces = outcome
                .traces
                .iter()
                .filter(|t| matches!(t.termination, Termination::TitanDestroyed { .. }))
                .count();
            prop_assert!(titan_traces <= 1);
            prop_assert_eq!(titan_traces == 1, outcome.winner.is_some());
            if titan_traces == 1 {
                let last = outcome.traces.last().unwrap();
                prop_assert!(
                    matches!(last.termination, Termination::TitanDestroyed { .. }),
                    "titan hit must end the shot"
                );
            }
        }
    }
}
