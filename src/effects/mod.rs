//! Descriptor-driven card behavior.
//!
//! - `EffectDescriptor`, `RequirementDescriptor`: behavior as data
//! - `Registry`: descriptor `type` name to plain function
//! - `EffectEngine`: validation at catalog load, then evaluation during play
//!
//! ## Adding behavior
//!
//! New effect types are new registry entries. Nothing else in the engine
//! changes: register the function under a name, and catalog JSON can use
//! that name.

mod builtin;
mod descriptor;
mod engine;
mod registry;

pub use descriptor::{EffectDescriptor, RequirementDescriptor};
pub use engine::{Dealer, EffectContext, EffectEngine};
pub use registry::{EffectFn, MetricFn, Needs, Registry, RequirementFn};
