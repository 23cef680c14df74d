use serde::{Serialize, Serializer};

/// Lifecycle status of an offer.
///
/// `AcceptedAuto` is terminal at submission time but never produces an
/// order; only `Pending` offers accepted through the manual acceptance
/// workflow do. That asymmetry matches the observed product behavior and
/// is deliberate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferStatus {
    Pending,
    RejectedAi,
    AcceptedAuto,
    AcceptedManual,
}

impl OfferStatus {
    /// Canonical text form stored in the offers.status column.
    pub fn as_db_str(self) -> &'static str {
        match self {
            OfferStatus::Pending => "Pending",
            OfferStatus::RejectedAi => "Rejected (AI)",
            OfferStatus::AcceptedAuto => "Accepted (Auto)",
            OfferStatus::AcceptedManual => "Accepted (Manual)",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "Pending" => Some(OfferStatus::Pending),
            "Rejected (AI)" => Some(OfferStatus::RejectedAi),
            "Accepted (Auto)" => Some(OfferStatus::AcceptedAuto),
            "Accepted (Manual)" => Some(OfferStatus::AcceptedManual),
            _ => None,
        }
    }
}

impl Serialize for OfferStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_db_str())
    }
}

#[derive(Debug, Clone)]
pub struct Decision {
    pub status: OfferStatus,
    pub message: String,
}

/// Classifies an offered price against the product's price bounds.
///
/// Pure decision logic, no persistence effects:
/// below the floor the offer is auto-rejected, between the floor and the
/// standard price it awaits the shopkeeper, at or above the standard
/// price it is auto-accepted.
pub fn evaluate(offered_price: i64, min_price: i64, standard_price: i64) -> Decision {
    if offered_price < min_price {
        Decision {
            status: OfferStatus::RejectedAi,
            message: format!(
                "Your offer is below the minimum acceptable price of ₹{}.",
                min_price
            ),
        }
    } else if offered_price < standard_price {
        Decision {
            status: OfferStatus::Pending,
            message: "Your offer is within the acceptable range. Awaiting shopkeeper response."
                .to_string(),
        }
    } else {
        Decision {
            status: OfferStatus::AcceptedAuto,
            message: "Congratulations! Your offer has been accepted automatically at the standard price."
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn below_floor_is_rejected() {
        let decision = evaluate(50, 100, 500);
        assert_eq!(decision.status, OfferStatus::RejectedAi);
        assert!(decision.message.contains("₹100"));
    }

    #[test]
    fn within_range_is_pending() {
        assert_eq!(evaluate(300, 100, 500).status, OfferStatus::Pending);
    }

    #[test]
    fn at_or_above_standard_is_auto_accepted() {
        assert_eq!(evaluate(500, 100, 500).status, OfferStatus::AcceptedAuto);
        assert_eq!(evaluate(9_000, 100, 500).status, OfferStatus::AcceptedAuto);
    }

    #[test]
    fn floor_boundary_is_inclusive() {
        // Exactly the minimum price is within range, not rejected.
        assert_eq!(evaluate(100, 100, 500).status, OfferStatus::Pending);
    }

    #[test]
    fn zero_priced_offer_against_zero_floor() {
        assert_eq!(evaluate(0, 0, 500).status, OfferStatus::Pending);
    }

    #[test]
    fn status_round_trips_through_db_text() {
        for status in [
            OfferStatus::Pending,
            OfferStatus::RejectedAi,
            OfferStatus::AcceptedAuto,
            OfferStatus::AcceptedManual,
        ] {
            assert_eq!(OfferStatus::from_db_str(status.as_db_str()), Some(status));
        }
        assert_eq!(OfferStatus::from_db_str("accepted"), None);
    }
}
