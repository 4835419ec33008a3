//! Session roles and the explicit session context.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::cards::Catalog;
use crate::core::GameConfig;
use crate::effects::EffectEngine;
use crate::error::Result;

/// Which side of a session this process is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Single local process; authoritative.
    Solo,
    /// Networked host; authoritative.
    Host,
    /// Networked participant mirroring the host.
    Client,
}

impl Role {
    /// Only the authoritative side mutates shared state.
    #[must_use]
    pub const fn is_authoritative(self) -> bool {
        matches!(self, Role::Solo | Role::Host)
    }
}

/// Everything a session component needs to know about its surroundings.
///
/// Passed to constructors; there is no global session. The catalog is
/// always validated against the engine the context carries, so every
/// descriptor a move can reach has an implementation.
#[derive(Clone, Debug)]
pub struct SessionContext {
    pub role: Role,
    /// Name of the player this process acts for, if any.
    pub local_player: Option<String>,
    pub config: Arc<GameConfig>,
    pub catalog: Arc<Catalog>,
    pub engine: Arc<EffectEngine>,
}

impl SessionContext {
    /// Context with the standard effect engine.
    ///
    /// Fails with [`crate::Error::UnknownDescriptor`] if the catalog names
    /// anything the standard registries lack.
    pub fn new(role: Role, config: GameConfig, catalog: Catalog) -> Result<Self> {
        let engine = EffectEngine::standard();
        catalog.validate(&engine)?;
        Ok(Self {
            role,
            local_player: None,
            config: Arc::new(config),
            catalog: Arc::new(catalog),
            engine: Arc::new(engine),
        })
    }

    pub fn solo(config: GameConfig, catalog: Catalog) -> Result<Self> {
        Self::new(Role::Solo, config, catalog)
    }

    /// Set the local player (builder pattern).
    #[must_use]
    pub fn with_local_player(mut self, name: impl Into<String>) -> Self {
        self.local_player = Some(name.into());
        self
    }

    /// Swap in another engine, revalidating the catalog against it.
    pub fn with_engine(mut self, engine: EffectEngine) -> Result<Self> {
        self.catalog.validate(&engine)?;
        self.engine = Arc::new(engine);
        Ok(self)
    }

    /// Same config, catalog and engine under another role.
    #[must_use]
    pub fn as_role(&self, role: Role) -> Self {
        Self {
            role,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_authority() {
        assert!(Role::Solo.is_authoritative());
        assert!(Role::Host.is_authoritative());
        assert!(!Role::Client.is_authoritative());
    }

    #[test]
    fn test_context_shares_catalog() {
        let host = SessionContext::new(Role::Host, GameConfig::default(), Catalog::new())
            .unwrap()
            .with_local_player("Ada");
        let client = host.as_role(Role::Client).with_local_player("Brook");

        assert!(Arc::ptr_eq(&host.catalog, &client.catalog));
        assert_eq!(client.local_player.as_deref(), Some("Brook"));
        assert_eq!(client.role, Role::Client);
    }

    #[test]
    fn test_engine_must_cover_catalog() {
        let context = SessionContext::solo(GameConfig::default(), Catalog::builtin().unwrap()).unwrap();

        let result = context.clone().with_engine(EffectEngine::empty());
        assert!(matches!(result, Err(Error::UnknownDescriptor { .. })));

        let swapped = context.with_engine(EffectEngine::standard()).unwrap();
        assert!(swapped.engine.knows_effect("increaseProduction"));
    }

    #[test]
    fn test_unvalidated_catalog_refused() {
        let mut catalog = Catalog::new();
        let card: crate::cards::Card = serde_json::from_str(
            r#"{"name": "Odd", "cost": 1, "effects": [{"type": "teleport"}]}"#,
        )
        .unwrap();
        catalog.add_card(card).unwrap();

        assert!(matches!(
            SessionContext::solo(GameConfig::default(), catalog),
            Err(Error::UnknownDescriptor { .. })
        ));
    }
}
