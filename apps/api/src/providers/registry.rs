//! Fixed-priority registry of provider clients.

use std::sync::Arc;

use crate::providers::{ProviderClient, ProviderName};

/// Ordered set of provider clients. The vector order is the priority order:
/// first entry = most preferred. Built once at startup, never mutated.
pub struct ProviderRegistry {
    clients: Vec<Arc<dyn ProviderClient>>,
}

impl ProviderRegistry {
    pub fn new(clients: Vec<Arc<dyn ProviderClient>>) -> Self {
        Self { clients }
    }

    /// Lookup by typed name. `None` for a name with no registered client.
    pub fn get(&self, name: ProviderName) -> Option<&dyn ProviderClient> {
        self.clients
            .iter()
            .find(|c| c.name() == name)
            .map(|c| c.as_ref())
    }

    /// All clients in priority order.
    pub fn all(&self) -> impl Iterator<Item = &dyn ProviderClient> {
        self.clients.iter().map(|c| c.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{ClaudeClient, GeminiClient};

    fn registry() -> ProviderRegistry {
        ProviderRegistry::new(vec![
            Arc::new(ClaudeClient::new(Some("key".to_string()))),
            Arc::new(GeminiClient::new(Some("key".to_string()))),
        ])
    }

    #[test]
    fn lookup_by_name() {
        let registry = registry();
        assert_eq!(
            registry.get(ProviderName::Claude).map(|c| c.name()),
            Some(ProviderName::Claude)
        );
        assert_eq!(
            registry.get(ProviderName::Gemini).map(|c| c.name()),
            Some(ProviderName::Gemini)
        );
    }

    #[test]
    fn iteration_preserves_priority_order() {
        let registry = registry();
        let names: Vec<_> = registry.all().map(|c| c.name()).collect();
        assert_eq!(names, vec![ProviderName::Claude, ProviderName::Gemini]);
    }

    #[test]
    fn missing_client_yields_none() {
        let registry = ProviderRegistry::new(vec![Arc::new(ClaudeClient::new(None))]);
        assert!(registry.get(ProviderName::Gemini).is_none());
    }
}
