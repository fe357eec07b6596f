//! Order status transitions
//!
//! Two caller vocabularies share one status column:
//!
//! - fulfillment updates (`processing`, `shipped`, `delivered`, `cancelled`)
//!   move the order through the buyer-facing flow. Forward transitions are
//!   accepted without sequencing enforcement — `pending → delivered` is
//!   legal. This permissiveness is intentional.
//! - confirmation updates (`accepted`, `rejected`) are the seller's
//!   accept/back-out decision. The wire word "rejected" translates to the
//!   stored terminal state `terminated`, which is distinct from the
//!   buyer-facing `cancelled`.
//!
//! Confirmation states are terminal: once an order is `accepted` or
//! `terminated`, a conflicting confirmation fails, while re-applying the same
//! one is a no-op success.

use crate::db::models::OrderStatus;

/// A parsed status-update request, classified by vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusRequest {
    /// Buyer-facing fulfillment update
    Fulfillment(OrderStatus),
    /// Seller confirmation decision (already translated to storage form)
    Confirmation(OrderStatus),
}

impl StatusRequest {
    /// Parse a requested status word into its vocabulary
    ///
    /// Returns `None` for words outside both vocabularies (including
    /// "pending" — no caller may move an order back to pending).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "processing" => Some(Self::Fulfillment(OrderStatus::Processing)),
            "shipped" => Some(Self::Fulfillment(OrderStatus::Shipped)),
            "delivered" => Some(Self::Fulfillment(OrderStatus::Delivered)),
            "cancelled" => Some(Self::Fulfillment(OrderStatus::Cancelled)),
            "accepted" => Some(Self::Confirmation(OrderStatus::Accepted)),
            // Translation layer, not a synonym: the rejected decision is
            // stored as the dedicated terminal state.
            "rejected" => Some(Self::Confirmation(OrderStatus::Terminated)),
            _ => None,
        }
    }

    /// The status this request resolves to
    pub fn target(&self) -> OrderStatus {
        match self {
            Self::Fulfillment(s) | Self::Confirmation(s) => *s,
        }
    }
}

/// Whether a status is a confirmation terminal state
pub fn is_confirmation_terminal(status: OrderStatus) -> bool {
    matches!(status, OrderStatus::Accepted | OrderStatus::Terminated)
}

/// Validate a confirmation transition against the current status
///
/// `Ok(true)` — apply the transition; `Ok(false)` — no-op (same terminal
/// status re-applied); `Err(current)` — conflicting transition on a terminal
/// order.
pub fn check_confirmation(
    current: OrderStatus,
    target: OrderStatus,
) -> Result<bool, OrderStatus> {
    if is_confirmation_terminal(current) {
        if current == target {
            return Ok(false);
        }
        return Err(current);
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fulfillment_vocabulary() {
        assert_eq!(
            StatusRequest::parse("processing"),
            Some(StatusRequest::Fulfillment(OrderStatus::Processing))
        );
        assert_eq!(
            StatusRequest::parse("shipped"),
            Some(StatusRequest::Fulfillment(OrderStatus::Shipped))
        );
        assert_eq!(
            StatusRequest::parse("delivered"),
            Some(StatusRequest::Fulfillment(OrderStatus::Delivered))
        );
        assert_eq!(
            StatusRequest::parse("cancelled"),
            Some(StatusRequest::Fulfillment(OrderStatus::Cancelled))
        );
    }

    #[test]
    fn test_parse_confirmation_vocabulary() {
        assert_eq!(
            StatusRequest::parse("accepted"),
            Some(StatusRequest::Confirmation(OrderStatus::Accepted))
        );
        // "rejected" is translated, not stored verbatim
        assert_eq!(
            StatusRequest::parse("rejected"),
            Some(StatusRequest::Confirmation(OrderStatus::Terminated))
        );
    }

    #[test]
    fn test_parse_rejects_unknown_words() {
        assert_eq!(StatusRequest::parse("pending"), None);
        assert_eq!(StatusRequest::parse("terminated"), None);
        assert_eq!(StatusRequest::parse("REJECTED"), None);
        assert_eq!(StatusRequest::parse(""), None);
    }

    #[test]
    fn test_confirmation_from_pending_applies() {
        assert_eq!(
            check_confirmation(OrderStatus::Pending, OrderStatus::Accepted),
            Ok(true)
        );
        assert_eq!(
            check_confirmation(OrderStatus::Pending, OrderStatus::Terminated),
            Ok(true)
        );
    }

    #[test]
    fn test_same_terminal_status_is_noop() {
        assert_eq!(
            check_confirmation(OrderStatus::Accepted, OrderStatus::Accepted),
            Ok(false)
        );
        assert_eq!(
            check_confirmation(OrderStatus::Terminated, OrderStatus::Terminated),
            Ok(false)
        );
    }

    #[test]
    fn test_conflicting_terminal_transition_fails() {
        assert_eq!(
            check_confirmation(OrderStatus::Accepted, OrderStatus::Terminated),
            Err(OrderStatus::Accepted)
        );
        assert_eq!(
            check_confirmation(OrderStatus::Terminated, OrderStatus::Accepted),
            Err(OrderStatus::Terminated)
        );
    }

    #[test]
    fn test_fulfillment_states_are_not_confirmation_terminal() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert!(!is_confirmation_terminal(status));
            // A confirmation may still land on them
            assert_eq!(check_confirmation(status, OrderStatus::Accepted), Ok(true));
        }
    }
}
