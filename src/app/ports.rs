use async_trait::async_trait;

/// One blocking round-trip to a chat-completion service. The orchestration
/// layers depend on this port, never on a concrete client, so tests run
/// against deterministic mocks.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String, String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// Geopolitical entity (city, county, state).
    Geopolitical,
    /// Non-political location (road, landmark, area).
    Location,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedEntity {
    pub text: String,
    pub kind: EntityKind,
}

impl NamedEntity {
    pub fn is_place(&self) -> bool {
        matches!(self.kind, EntityKind::Geopolitical | EntityKind::Location)
    }
}

/// Local named-entity recognition over raw text. Matches are reported in
/// document order; extraction takes the first place-kind entity.
pub trait EntityRecognizer: Send + Sync {
    fn entities(&self, text: &str) -> Vec<NamedEntity>;
}

/// Resolves a location query to coordinates. `Ok(None)` means the service
/// answered but found nothing.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, query: &str) -> Result<Option<(f64, f64)>, String>;
}
