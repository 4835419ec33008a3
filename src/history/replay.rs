//! Deterministic replay of a move log.
//!
//! Replay starts from the initial snapshot (the state as created, before
//! any deal) and feeds the logged moves back through the same
//! [`ActionPipeline`] entry points a live game uses. Card draws are never
//! repeated: the `DealCards` entries recorded after a move are handed to
//! the pipeline as the script for that move's draws.
//!
//! ## Grouping
//!
//! ```text
//! [DealCards*]  (PlayerMove DealCards*)*
//!  game start    one unit per player move
//! ```
//!
//! A suspended move and its completion are two units, submitted in order.

use tracing::debug;

use crate::core::{GameState, Move};
use crate::error::Result;
use crate::net::SessionContext;
use crate::rules::{score_all, ActionPipeline, ScoreLine};

use super::log::MoveLog;

/// Final result of a replay.
#[derive(Clone, Debug)]
pub struct Replay {
    pub state: GameState,
    /// The log rebuilt by the replay; equal to the input log.
    pub log: MoveLog,
    /// Current standings, best first.
    pub ranking: Vec<ScoreLine>,
}

/// Re-drives the pipeline from a recorded log.
pub struct ReplayEngine {
    context: SessionContext,
}

impl ReplayEngine {
    #[must_use]
    pub fn new(context: SessionContext) -> Self {
        Self { context }
    }

    /// Replay `log` from `initial`.
    ///
    /// Any entry that does not reproduce (a rejection, a deal that does not
    /// match the deck, a deal nothing asked for) is
    /// [`crate::Error::StateCorruption`].
    pub fn replay(&self, initial: GameState, log: &MoveLog) -> Result<Replay> {
        let pipeline = self.replay_until(initial, log, log.len())?;
        let ranking = score_all(pipeline.state(), &self.context.catalog, &self.context.config);
        let (state, rebuilt) = pipeline.into_parts();
        Ok(Replay {
            state,
            log: rebuilt,
            ranking,
        })
    }

    /// Replay the first `count` log entries and return the live pipeline.
    ///
    /// `count` is rounded down to a unit boundary so a move is never split
    /// from the deals it caused.
    pub fn replay_until(&self, initial: GameState, log: &MoveLog, count: usize) -> Result<ActionPipeline> {
        let end = unit_boundary(log, count);
        let mut units = Units::new(log.iter().take(end).cloned());
        let mut pipeline = ActionPipeline::new(self.context.clone(), initial);

        let opening = units.leading_deals();
        // An empty log is a game that was never started.
        if !opening.is_empty() {
            pipeline.replay_start(opening)?;
        }
        let mut replayed = 0usize;
        while let Some((mv, deals)) = units.next_unit() {
            pipeline.replay_submit(mv, deals)?;
            replayed += 1;
        }

        debug!(moves = replayed, entries = pipeline.log().len(), "replay finished");
        Ok(pipeline)
    }
}

/// Largest prefix length `<= count` that does not split a unit.
fn unit_boundary(log: &MoveLog, count: usize) -> usize {
    let is_system = |i: usize| log.get(i).is_some_and(|m| m.action.is_system());
    let leading = (0..log.len()).take_while(|&i| is_system(i)).count();
    let end = count.min(log.len());
    if end <= leading {
        return leading;
    }
    if !is_system(end) {
        return end;
    }
    // Cut before the player move whose deals straddle `end`.
    (leading..end).rev().find(|&i| !is_system(i)).unwrap_or(leading)
}

/// Splits a flat log into replay units.
struct Units<I: Iterator<Item = Move>> {
    moves: std::iter::Peekable<I>,
}

impl<I: Iterator<Item = Move>> Units<I> {
    fn new(moves: I) -> Self {
        Self {
            moves: moves.peekable(),
        }
    }

    fn leading_deals(&mut self) -> Vec<Move> {
        let mut deals = Vec::new();
        while let Some(mv) = self.moves.next_if(|m| m.action.is_system()) {
            deals.push(mv);
        }
        deals
    }

    fn next_unit(&mut self) -> Option<(Move, Vec<Move>)> {
        let mv = self.moves.next()?;
        Some((mv, self.leading_deals()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ActionType;

    #[test]
    fn test_boundary_keeps_deals_with_their_move() {
        let deal = |who: &str| Move::new(who, ActionType::DealCards, "{}");
        let log: MoveLog = vec![
            deal("Ada"),
            Move::pass("Ada"),
            deal("Ada"),
            deal("Ada"),
            Move::pass("Ada"),
        ]
        .into_iter()
        .collect();

        assert_eq!(unit_boundary(&log, 0), 1);
        assert_eq!(unit_boundary(&log, 2), 1);
        assert_eq!(unit_boundary(&log, 3), 1);
        assert_eq!(unit_boundary(&log, 4), 4);
        assert_eq!(unit_boundary(&log, 9), 5);
    }

    #[test]
    fn test_units_split_on_player_moves() {
        let deal = |who: &str| Move::new(who, ActionType::DealCards, "{}");
        let moves = vec![
            deal("Ada"),
            deal("Brook"),
            Move::pass("Ada"),
            Move::pass("Brook"),
            deal("Ada"),
        ];
        let mut units = Units::new(moves.into_iter());

        assert_eq!(units.leading_deals().len(), 2);
        let (first, deals) = units.next_unit().unwrap();
        assert_eq!(first.actor, "Ada");
        assert!(deals.is_empty());
        let (second, deals) = units.next_unit().unwrap();
        assert_eq!(second.actor, "Brook");
        assert_eq!(deals.len(), 1);
        assert!(units.next_unit().is_none());
    }
}
