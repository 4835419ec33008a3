//! Game content as data.
//!
//! - `Card`, `Tag`: project cards
//! - `Corporation`, `Discount`: starting assets and cost reductions
//! - `Milestone`, `StandardProject`: claimable goals and always-available actions
//! - `Catalog`: the loaded, validated content set

mod card;
mod catalog;
mod corporation;
mod milestone;

pub use card::{Card, Tag};
pub use catalog::Catalog;
pub use corporation::{Corporation, Discount, DiscountTarget};
pub use milestone::{Milestone, StandardProject};
