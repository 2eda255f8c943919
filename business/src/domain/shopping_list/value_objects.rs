use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a shopping list document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListId(Uuid);

impl ListId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for ListId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ListId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| format!("Invalid list id: {}", s))
    }
}

impl From<Uuid> for ListId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// What a live subscription follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubscriptionTarget {
    /// A single list document by id.
    List(ListId),
    /// Whichever incomplete list was created most recently.
    Current,
}

impl std::fmt::Display for SubscriptionTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubscriptionTarget::List(id) => write!(f, "list:{}", id),
            SubscriptionTarget::Current => write!(f, "current"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_generate_distinct_ids() {
        assert_ne!(ListId::generate(), ListId::generate());
    }

    #[test]
    fn should_parse_list_id_from_uuid_string() {
        let uuid = Uuid::new_v4();

        let id: ListId = uuid.to_string().parse().unwrap();

        assert_eq!(id.as_uuid(), uuid);
        assert_eq!(id.to_string(), uuid.to_string());
    }

    #[test]
    fn should_reject_timestamp_style_ids() {
        let result = "List-18_10_2026__14_05_00".parse::<ListId>();

        assert!(result.is_err());
    }

    #[test]
    fn should_display_subscription_targets() {
        let id = ListId::generate();

        assert_eq!(
            SubscriptionTarget::List(id).to_string(),
            format!("list:{}", id)
        );
        assert_eq!(SubscriptionTarget::Current.to_string(), "current");
    }
}
