//! Players: seat identifiers, per-seat storage and the player record.
//!
//! ## PlayerId
//!
//! Seat number, 0-based, in table order.
//!
//! ## PlayerMap
//!
//! Per-seat storage backed by `Vec` for O(1) access, indexable by `PlayerId`.
//!
//! ## Player
//!
//! Everything a seat owns: corporation, resources, production, cards,
//! terraform rating, milestones. Only the action pipeline and effect engine
//! mutate it.

use std::collections::BTreeMap;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use super::resource::{Resource, ResourceMap};
use crate::cards::Tag;

/// Seat identifier supporting 1-255 players.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw seat index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The seat after this one, wrapping around the table.
    #[must_use]
    pub fn next(self, player_count: usize) -> PlayerId {
        PlayerId(((self.index() + 1) % player_count) as u8)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Seat {}", self.0)
    }
}

/// Per-seat data storage with O(1) access.
///
/// ```
/// use terraform_engine::core::{PlayerId, PlayerMap};
///
/// let mut rating: PlayerMap<i32> = PlayerMap::new(4, |_| 20);
/// rating[PlayerId::new(1)] += 1;
/// assert_eq!(rating[PlayerId::new(1)], 21);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Create a new PlayerMap with values from a factory function.
    pub fn new(player_count: usize, factory: impl Fn(PlayerId) -> T) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");
        assert!(player_count <= 255, "At most 255 players supported");

        let data = (0..player_count as u8)
            .map(|i| factory(PlayerId(i)))
            .collect();

        Self { data }
    }

    /// Get the number of seats.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.data.len()
    }

    /// Get a reference to a seat's data.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }

    /// Get a mutable reference to a seat's data.
    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Iterate over (PlayerId, &T) pairs in seat order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Iterate over (PlayerId, &mut T) pairs in seat order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
        self.data
            .iter_mut()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Iterate over the values in seat order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    /// Iterate over all seats.
    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> {
        (0..self.data.len() as u8).map(PlayerId)
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
    }
}

/// A seated player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Display name, unique at the table. Moves refer to players by name.
    pub name: String,

    /// Seat in table order.
    pub seat: PlayerId,

    /// Chosen corporation, `None` until CORP_SELECTION completes for this seat.
    pub corporation: Option<String>,

    /// Resource stock. `resources[MegaCredits]` is the currency balance.
    pub resources: ResourceMap,

    /// Per-generation production.
    pub production: ResourceMap,

    /// Unplayed cards.
    pub hand: Vec<String>,

    /// Played cards, in play order.
    pub played: Vec<String>,

    /// Tag totals over `played`.
    pub tags: BTreeMap<Tag, u32>,

    pub terraform_rating: i32,

    /// Milestones this player claimed.
    pub milestones: Vec<String>,

    /// Cached board points (greeneries plus city adjacency).
    pub tile_score: i32,

    // === Pending offers ===
    /// Corporations dealt during CORP_SELECTION.
    pub offered_corporations: Vec<String>,

    /// Cards dealt for the current research step.
    pub offered_cards: Vec<String>,

    /// Research step completed this generation.
    pub research_done: bool,
}

impl Player {
    /// Create an empty player at a seat.
    #[must_use]
    pub fn new(name: impl Into<String>, seat: PlayerId, terraform_rating: i32) -> Self {
        Self {
            name: name.into(),
            seat,
            corporation: None,
            resources: ResourceMap::default(),
            production: ResourceMap::default(),
            hand: Vec::new(),
            played: Vec::new(),
            tags: BTreeMap::new(),
            terraform_rating,
            milestones: Vec::new(),
            tile_score: 0,
            offered_corporations: Vec::new(),
            offered_cards: Vec::new(),
            research_done: false,
        }
    }

    /// Currency balance.
    #[must_use]
    pub fn megacredits(&self) -> i32 {
        self.resources[Resource::MegaCredits]
    }

    /// Number of played cards carrying `tag`.
    #[must_use]
    pub fn tag_count(&self, tag: Tag) -> u32 {
        self.tags.get(&tag).copied().unwrap_or(0)
    }

    /// Check whether a card is in hand.
    #[must_use]
    pub fn holds(&self, card: &str) -> bool {
        self.hand.iter().any(|c| c == card)
    }

    /// Remove a card from hand.
    ///
    /// Returns true if the card was found and removed.
    pub fn remove_from_hand(&mut self, card: &str) -> bool {
        if let Some(pos) = self.hand.iter().position(|c| c == card) {
            self.hand.remove(pos);
            true
        } else {
            false
        }
    }

    /// Move a card into the played pile and count its tags.
    pub fn record_played(&mut self, card: &str, tags: &[Tag]) {
        self.played.push(card.to_string());
        for &tag in tags {
            *self.tags.entry(tag).or_insert(0) += 1;
        }
    }
}
