//! Card dealing, live or scripted.
//!
//! Every deal produces a `DealCards` system move naming the recipient and
//! the exact cards dealt. The pipeline logs these right after the move that
//! caused them. Replay runs the dealer in [`DrawMode::Scripted`] over those
//! recorded moves, so the same cards come out without drawing again.
//!
//! The project deck is refilled from the discard pile, shuffled with the
//! session RNG, whenever a draw finds it empty. Scripted deals refill the
//! same way before taking a recorded card that is not in the deck, so the
//! RNG position stays in step with the original game.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{ActionType, GameRng, GameState, Move, PlayerId};
use crate::effects::Dealer;

/// What a deal was for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DealKind {
    Corporations,
    Research,
    Effect,
}

/// Payload of a `DealCards` move.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dealt {
    pub kind: DealKind,
    pub cards: Vec<String>,
}

impl Dealt {
    /// Decode a `DealCards` move payload.
    pub fn from_move(mv: &Move) -> Option<Self> {
        if mv.action != ActionType::DealCards {
            return None;
        }
        serde_json::from_str(&mv.payload).ok()
    }

    fn to_move(&self, recipient: &str) -> Move {
        // Plain strings and a unit enum always serialize.
        let payload = serde_json::to_string(self).unwrap_or_default();
        Move::new(recipient, ActionType::DealCards, payload)
    }
}

/// Where dealt cards come from.
#[derive(Clone, Debug)]
pub enum DrawMode {
    /// Draw from the shuffled decks.
    Live,
    /// Take cards from recorded `DealCards` moves, in order.
    Scripted(VecDeque<Move>),
}

/// Deals cards and records what it dealt.
#[derive(Clone, Debug)]
pub struct CardDealer {
    mode: DrawMode,
    dealt: Vec<Move>,
    fault: Option<String>,
}

impl CardDealer {
    #[must_use]
    pub fn new(mode: DrawMode) -> Self {
        Self {
            mode,
            dealt: Vec::new(),
            fault: None,
        }
    }

    /// Deal up to `count` cards of `kind` to `recipient`.
    pub fn deal(
        &mut self,
        state: &mut GameState,
        recipient: PlayerId,
        kind: DealKind,
        count: usize,
    ) -> Vec<String> {
        let name = state.player(recipient).name.clone();

        let cards = match &mut self.mode {
            DrawMode::Live => match kind {
                DealKind::Corporations => draw_corporations(state, count),
                DealKind::Research | DealKind::Effect => draw_projects(state, count),
            },
            DrawMode::Scripted(queue) => {
                let Some(recorded) = queue.pop_front() else {
                    self.fault = Some(format!("no recorded deal for {name}"));
                    return Vec::new();
                };
                let dealt = match Dealt::from_move(&recorded) {
                    Some(d) if d.kind == kind && recorded.actor == name => d,
                    _ => {
                        self.fault = Some(format!(
                            "recorded deal '{}' to {} does not match a {kind:?} deal to {name}",
                            recorded.payload, recorded.actor
                        ));
                        return Vec::new();
                    }
                };
                if let Err(missing) = take_recorded(state, kind, &dealt.cards) {
                    self.fault = Some(format!("recorded card '{missing}' is not available"));
                    return Vec::new();
                }
                self.dealt.push(recorded);
                return dealt.cards;
            }
        };

        debug!(player = %name, ?kind, count = cards.len(), "dealt cards");
        let record = Dealt {
            kind,
            cards: cards.clone(),
        };
        self.dealt.push(record.to_move(&name));
        cards
    }

    /// `DealCards` moves produced since the last call.
    pub fn take_dealt(&mut self) -> Vec<Move> {
        std::mem::take(&mut self.dealt)
    }

    /// A scripted deal did not match the recording.
    #[must_use]
    pub fn fault(&self) -> Option<&str> {
        self.fault.as_deref()
    }

    /// Recorded deals not yet consumed.
    #[must_use]
    pub fn unused_script(&self) -> usize {
        match &self.mode {
            DrawMode::Live => 0,
            DrawMode::Scripted(queue) => queue.len(),
        }
    }
}

impl Dealer for CardDealer {
    fn draw_cards(&mut self, state: &mut GameState, recipient: PlayerId, count: usize) -> Vec<String> {
        self.deal(state, recipient, DealKind::Effect, count)
    }
}

fn draw_corporations(state: &mut GameState, count: usize) -> Vec<String> {
    let deck = &mut state.session.corporation_deck;
    let n = count.min(deck.len());
    (0..n).filter_map(|_| deck.pop_front()).collect()
}

fn draw_projects(state: &mut GameState, count: usize) -> Vec<String> {
    let mut cards = Vec::with_capacity(count);
    while cards.len() < count {
        if state.session.deck.is_empty() && !refill_deck(state) {
            break;
        }
        if let Some(card) = state.session.deck.pop_front() {
            cards.push(card);
        }
    }
    cards
}

/// Remove recorded cards from their deck, refilling as a live draw would.
fn take_recorded(state: &mut GameState, kind: DealKind, cards: &[String]) -> Result<(), String> {
    for card in cards {
        let deck = match kind {
            DealKind::Corporations => &mut state.session.corporation_deck,
            DealKind::Research | DealKind::Effect => {
                if state.session.deck.is_empty() {
                    refill_deck(state);
                }
                &mut state.session.deck
            }
        };
        match deck.index_of(card) {
            Some(i) => {
                deck.remove(i);
            }
            None => return Err(card.clone()),
        }
    }
    Ok(())
}

/// Shuffle the discard pile into the empty deck. False if there was nothing
/// to shuffle.
fn refill_deck(state: &mut GameState) -> bool {
    let session = &mut state.session;
    if session.discard.is_empty() {
        return false;
    }
    let mut cards: Vec<String> = std::mem::take(&mut session.discard).into_iter().collect();
    let mut rng = GameRng::from_state(&session.rng);
    rng.shuffle(&mut cards);
    session.rng = rng.state();
    session.deck.extend(cards);
    debug!(size = session.deck.len(), "reshuffled discard pile into deck");
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Catalog;
    use crate::core::GameConfig;

    fn state() -> GameState {
        let catalog = Catalog::builtin().unwrap();
        GameState::new(&GameConfig::default(), &catalog, &["Ada", "Brook"]).unwrap()
    }

    const ADA: PlayerId = PlayerId::new(0);

    #[test]
    fn test_live_deal_records_move() {
        let mut state = state();
        let top: Vec<String> = state.session.deck.iter().take(3).cloned().collect();
        let mut dealer = CardDealer::new(DrawMode::Live);

        let cards = dealer.deal(&mut state, ADA, DealKind::Research, 3);
        assert_eq!(cards, top);

        let moves = dealer.take_dealt();
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].actor, "Ada");
        assert_eq!(
            Dealt::from_move(&moves[0]),
            Some(Dealt {
                kind: DealKind::Research,
                cards: top
            })
        );
        assert!(dealer.take_dealt().is_empty());
    }

    #[test]
    fn test_empty_deck_reshuffles_discard() {
        let mut state = state();
        let all: Vec<String> = state.session.deck.iter().cloned().collect();
        state.session.deck.clear();
        state.session.discard = all.iter().take(5).cloned().collect();
        let before = state.session.rng.clone();

        let mut dealer = CardDealer::new(DrawMode::Live);
        let cards = dealer.deal(&mut state, ADA, DealKind::Research, 7);

        assert_eq!(cards.len(), 5);
        assert!(state.session.discard.is_empty());
        assert_ne!(state.session.rng, before);
    }

    #[test]
    fn test_scripted_replays_recording() {
        let mut live_state = state();
        let mut replay_state = live_state.clone();

        let mut live = CardDealer::new(DrawMode::Live);
        let first = live.deal(&mut live_state, ADA, DealKind::Corporations, 2);
        let second = live.deal(&mut live_state, ADA, DealKind::Effect, 2);
        let recorded = live.take_dealt();

        let mut scripted = CardDealer::new(DrawMode::Scripted(recorded.clone().into()));
        assert_eq!(scripted.deal(&mut replay_state, ADA, DealKind::Corporations, 2), first);
        assert_eq!(scripted.draw_cards(&mut replay_state, ADA, 2), second);

        assert!(scripted.fault().is_none());
        assert_eq!(scripted.unused_script(), 0);
        assert_eq!(scripted.take_dealt(), recorded);
        assert_eq!(replay_state, live_state);
    }

    #[test]
    fn test_scripted_mismatch_faults() {
        let mut state = state();
        let mut live = CardDealer::new(DrawMode::Live);
        live.deal(&mut state.clone(), ADA, DealKind::Research, 2);

        let mut scripted = CardDealer::new(DrawMode::Scripted(live.take_dealt().into()));
        let cards = scripted.deal(&mut state, PlayerId::new(1), DealKind::Research, 2);

        assert!(cards.is_empty());
        assert!(scripted.fault().is_some());
    }
}
