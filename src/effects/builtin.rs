//! Built-in effect, requirement and metric implementations.

use super::descriptor::{EffectDescriptor, RequirementDescriptor};
use super::engine::EffectContext;
use super::registry::{EffectFn, MetricFn, Needs, Registry, RequirementFn};
use crate::board::{Board, TileType};
use crate::cards::Tag;
use crate::core::{Player, Resource};

pub(super) fn effects() -> Registry<EffectFn> {
    let mut r: Registry<EffectFn> = Registry::new();
    r.register("addResource", add_resource, Needs::NONE);
    r.register("increaseProduction", increase_production, Needs::NONE);
    r.register("increaseProductionPerTag", increase_production_per_tag, Needs::TAG);
    r.register("gainMcPerTag", gain_mc_per_tag, Needs::TAG);
    r.register("gainMcPerOpponent", gain_mc_per_opponent, Needs::NONE);
    r.register("drawCards", draw_cards, Needs::NONE);
    r.register("increaseTemperature", increase_temperature, Needs::NONE);
    r.register("increaseOxygen", increase_oxygen, Needs::NONE);
    r.register("increaseTR", increase_tr, Needs::NONE);
    // The tile itself is placed by the pipeline; the marker only documents it.
    r.register("canPlaceOcean", marker, Needs::NONE);
    r
}

pub(super) fn requirements() -> Registry<RequirementFn> {
    let mut r: Registry<RequirementFn> = Registry::new();
    r.register("minProduction", min_production, Needs::RESOURCE_AMOUNT);
    r.register("minTags", min_tags, Needs::TAG_AMOUNT);
    r.register("minOceans", min_oceans, Needs::AMOUNT);
    r.register("minOxygen", min_oxygen, Needs::AMOUNT);
    r.register("maxOxygen", max_oxygen, Needs::AMOUNT);
    r.register("minTemperature", min_temperature, Needs::AMOUNT);
    r.register("maxTemperature", max_temperature, Needs::AMOUNT);
    r
}

pub(super) fn metrics() -> Registry<MetricFn> {
    let mut r: Registry<MetricFn> = Registry::new();
    r.register("terraformRating", terraform_rating, Needs::NONE);
    r.register("cities", cities, Needs::NONE);
    r.register("greeneries", greeneries, Needs::NONE);
    r.register("tags", tags, Needs::TAG);
    r.register("handSize", hand_size, Needs::NONE);
    r
}

// === Effects ===

/// Tags of `tag` on played cards, plus the source card's when asked.
fn tag_total(d: &EffectDescriptor, ctx: &EffectContext<'_>) -> i32 {
    let Some(tag) = d.tag else {
        return 0;
    };
    let mut total = ctx.state.player(ctx.actor).tag_count(tag) as i32;
    if d.include_self {
        total += ctx.source_tags.iter().filter(|&&t| t == tag).count() as i32;
    }
    total
}

fn add_resource(d: &EffectDescriptor, ctx: &mut EffectContext<'_>) {
    let player = ctx.state.player_mut(ctx.actor);
    player.resources[d.resource_or_currency()] += d.amount_or_one();
}

fn increase_production(d: &EffectDescriptor, ctx: &mut EffectContext<'_>) {
    let player = ctx.state.player_mut(ctx.actor);
    player.production[d.resource_or_currency()] += d.amount_or_one();
}

fn increase_production_per_tag(d: &EffectDescriptor, ctx: &mut EffectContext<'_>) {
    let gain = tag_total(d, ctx) * d.multiplier_or_one();
    let player = ctx.state.player_mut(ctx.actor);
    player.production[d.resource_or_currency()] += gain;
}

fn gain_mc_per_tag(d: &EffectDescriptor, ctx: &mut EffectContext<'_>) {
    let gain = tag_total(d, ctx) * d.multiplier_or_one();
    ctx.state.player_mut(ctx.actor).resources[Resource::MegaCredits] += gain;
}

fn gain_mc_per_opponent(d: &EffectDescriptor, ctx: &mut EffectContext<'_>) {
    let opponents = ctx.state.player_count().saturating_sub(1) as i32;
    ctx.state.player_mut(ctx.actor).resources[Resource::MegaCredits] +=
        d.amount_or_one() * opponents;
}

fn draw_cards(d: &EffectDescriptor, ctx: &mut EffectContext<'_>) {
    let count = d.amount_or_one().max(0) as usize;
    let drawn = ctx.dealer.draw_cards(ctx.state, ctx.actor, count);
    ctx.state.player_mut(ctx.actor).hand.extend(drawn);
}

fn increase_temperature(d: &EffectDescriptor, ctx: &mut EffectContext<'_>) {
    for _ in 0..d.amount_or_one() {
        ctx.state.raise_temperature_for(ctx.actor);
    }
}

fn increase_oxygen(d: &EffectDescriptor, ctx: &mut EffectContext<'_>) {
    for _ in 0..d.amount_or_one() {
        ctx.state.raise_oxygen_for(ctx.actor);
    }
}

fn increase_tr(d: &EffectDescriptor, ctx: &mut EffectContext<'_>) {
    ctx.state.player_mut(ctx.actor).terraform_rating += d.amount_or_one();
}

fn marker(_: &EffectDescriptor, _: &mut EffectContext<'_>) {}

// === Requirements ===

fn min_production(r: &RequirementDescriptor, player: &Player, _: &Board) -> bool {
    player.production[r.resource.unwrap_or(Resource::MegaCredits)] >= r.threshold()
}

fn min_tags(r: &RequirementDescriptor, player: &Player, _: &Board) -> bool {
    r.tag
        .is_some_and(|tag| player.tag_count(tag) as i32 >= r.threshold())
}

fn min_oceans(r: &RequirementDescriptor, _: &Player, board: &Board) -> bool {
    board.oceans() >= r.threshold()
}

fn min_oxygen(r: &RequirementDescriptor, _: &Player, board: &Board) -> bool {
    board.oxygen() >= r.threshold()
}

fn max_oxygen(r: &RequirementDescriptor, _: &Player, board: &Board) -> bool {
    board.oxygen() <= r.threshold()
}

fn min_temperature(r: &RequirementDescriptor, _: &Player, board: &Board) -> bool {
    board.temperature() >= r.threshold()
}

fn max_temperature(r: &RequirementDescriptor, _: &Player, board: &Board) -> bool {
    board.temperature() <= r.threshold()
}

// === Metrics ===

fn terraform_rating(player: &Player, _: &Board, _: Option<Tag>) -> i32 {
    player.terraform_rating
}

fn cities(player: &Player, board: &Board, _: Option<Tag>) -> i32 {
    board.count_owned(player.seat, TileType::City) as i32
}

fn greeneries(player: &Player, board: &Board, _: Option<Tag>) -> i32 {
    board.count_owned(player.seat, TileType::Greenery) as i32
}

fn tags(player: &Player, _: &Board, tag: Option<Tag>) -> i32 {
    tag.map_or(0, |t| player.tag_count(t) as i32)
}

fn hand_size(player: &Player, _: &Board, _: Option<Tag>) -> i32 {
    player.hand.len() as i32
}
