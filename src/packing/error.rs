use serde::Serialize;

use crate::domain::{Bin, Item, SolutionStatus};

/// The solver stopped without an optimal assignment.
///
/// Carries the whole instance so the failure can be diagnosed from the
/// message alone. Retrying the same instance gives the same answer.
#[derive(Debug, Clone, thiserror::Error)]
#[error(
    "Unable to solve the problem!\n\nStatus: {status}\n\nBins considered:\n{}\n\nItems considered:\n{}",
    pretty(.bins),
    pretty(.items)
)]
pub struct UnsolvableError {
    pub bins: Vec<Bin>,
    pub items: Vec<Item>,
    pub status: SolutionStatus,
}

impl UnsolvableError {
    pub fn new(bins: &[Bin], items: &[Item], status: SolutionStatus) -> Self {
        Self {
            bins: bins.to_vec(),
            items: items.to_vec(),
            status,
        }
    }
}

fn pretty<T: Serialize + std::fmt::Debug>(records: &[T]) -> String {
    serde_json::to_string_pretty(records).unwrap_or_else(|_| format!("{:#?}", records))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_lists_status_and_instance() {
        let err = UnsolvableError::new(
            &[Bin::new("A", 5, 1)],
            &[Item::new("x", 10)],
            SolutionStatus::Infeasible,
        );

        let message = err.to_string();

        assert!(message.starts_with("Unable to solve the problem!"));
        assert!(message.contains("Status: Infeasible"));
        assert!(message.contains("\"id\": \"A\""));
        assert!(message.contains("\"volume_capacity\": 5"));
        assert!(message.contains("\"id\": \"x\""));
        let bins_at = message.find("Bins considered").unwrap();
        let items_at = message.find("Items considered").unwrap();
        assert!(bins_at < items_at);
    }
}
