//! Effect and requirement descriptors.
//!
//! Descriptors are the data side of card behavior: a `type` name looked up
//! in a registry plus a few optional parameters. They are what catalog JSON
//! contains and the only form in which behavior is ever stored.

use serde::{Deserialize, Serialize};

use crate::cards::Tag;
use crate::core::Resource;

/// One effect, as written in catalog data.
///
/// ```json
/// { "type": "increaseProductionPerTag", "resource": "mc", "tag": "earth", "includeSelf": true }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectDescriptor {
    /// Registry key.
    #[serde(rename = "type")]
    pub kind: String,

    /// Target resource; MegaCredits when absent.
    #[serde(default)]
    pub resource: Option<Resource>,

    /// Magnitude; 1 when absent.
    #[serde(default)]
    pub amount: Option<i32>,

    /// Tag argument for per-tag effects.
    #[serde(default)]
    pub tag: Option<Tag>,

    /// Scale for per-tag effects; 1 when absent.
    #[serde(default)]
    pub multiplier: Option<i32>,

    /// Per-tag effects also count the triggering card's own tags.
    #[serde(default)]
    pub include_self: bool,
}

impl EffectDescriptor {
    /// Descriptor with only a type.
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            resource: None,
            amount: None,
            tag: None,
            multiplier: None,
            include_self: false,
        }
    }

    #[must_use]
    pub fn add_resource(resource: Resource, amount: i32) -> Self {
        Self::new("addResource").with_resource(resource).with_amount(amount)
    }

    #[must_use]
    pub fn increase_production(resource: Resource, amount: i32) -> Self {
        Self::new("increaseProduction")
            .with_resource(resource)
            .with_amount(amount)
    }

    #[must_use]
    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resource = Some(resource);
        self
    }

    #[must_use]
    pub fn with_amount(mut self, amount: i32) -> Self {
        self.amount = Some(amount);
        self
    }

    #[must_use]
    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tag = Some(tag);
        self
    }

    #[must_use]
    pub fn with_multiplier(mut self, multiplier: i32) -> Self {
        self.multiplier = Some(multiplier);
        self
    }

    #[must_use]
    pub fn including_self(mut self) -> Self {
        self.include_self = true;
        self
    }

    // === Defaults ===

    #[must_use]
    pub fn resource_or_currency(&self) -> Resource {
        self.resource.unwrap_or(Resource::MegaCredits)
    }

    #[must_use]
    pub fn amount_or_one(&self) -> i32 {
        self.amount.unwrap_or(1)
    }

    #[must_use]
    pub fn multiplier_or_one(&self) -> i32 {
        self.multiplier.unwrap_or(1)
    }
}

/// A play condition, as written in catalog data.
///
/// ```json
/// { "type": "minOxygen", "amount": 5 }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementDescriptor {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub resource: Option<Resource>,

    #[serde(default)]
    pub tag: Option<Tag>,

    #[serde(default)]
    pub amount: Option<i32>,
}

impl RequirementDescriptor {
    #[must_use]
    pub fn new(kind: impl Into<String>, amount: i32) -> Self {
        Self {
            kind: kind.into(),
            resource: None,
            tag: None,
            amount: Some(amount),
        }
    }

    #[must_use]
    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resource = Some(resource);
        self
    }

    #[must_use]
    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tag = Some(tag);
        self
    }

    /// Threshold; 0 when absent.
    #[must_use]
    pub fn threshold(&self) -> i32 {
        self.amount.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_fields_missing() {
        let d: EffectDescriptor = serde_json::from_str(r#"{ "type": "addResource" }"#).unwrap();

        assert_eq!(d.resource_or_currency(), Resource::MegaCredits);
        assert_eq!(d.amount_or_one(), 1);
        assert_eq!(d.multiplier_or_one(), 1);
        assert!(!d.include_self);
    }

    #[test]
    fn test_per_tag_descriptor() {
        let json = r#"{ "type": "gainMcPerTag", "tag": "space", "multiplier": 2, "includeSelf": true }"#;
        let d: EffectDescriptor = serde_json::from_str(json).unwrap();

        assert_eq!(
            d,
            EffectDescriptor::new("gainMcPerTag")
                .with_tag(Tag::Space)
                .with_multiplier(2)
                .including_self()
        );
    }

    #[test]
    fn test_requirement_descriptor() {
        let json = r#"{ "type": "minProduction", "resource": "energy", "amount": 1 }"#;
        let r: RequirementDescriptor = serde_json::from_str(json).unwrap();

        assert_eq!(r, RequirementDescriptor::new("minProduction", 1).with_resource(Resource::Energy));
        assert_eq!(r.threshold(), 1);
    }
}
