//! Binomial samples (visits and conversions) supplied by callers

use crate::error::InputError;
use serde::{Deserialize, Serialize};

/// Observed Bernoulli trials for one experiment arm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
pub struct BinomialSample {
    pub visits: u64,
    pub conversions: u64,
}

impl BinomialSample {
    pub fn new(visits: u64, conversions: u64) -> Self {
        Self {
            visits,
            conversions,
        }
    }

    /// Check the sample can be used for inference
    ///
    /// A usable sample has at least one visit and no more conversions than
    /// visits.
    pub fn validate(&self) -> Result<(), InputError> {
        if self.visits == 0 {
            return Err(InputError::NoVisits {
                visits: self.visits,
            });
        }
        if self.conversions > self.visits {
            return Err(InputError::ConversionsExceedVisits {
                visits: self.visits,
                conversions: self.conversions,
            });
        }
        Ok(())
    }

    pub fn is_usable(&self) -> bool {
        self.validate().is_ok()
    }

    /// Observed conversion rate, `None` without visits
    pub fn rate(&self) -> Option<f64> {
        if self.visits == 0 {
            None
        } else {
            Some(self.conversions as f64 / self.visits as f64)
        }
    }

    /// Non-conversions; saturates at zero for unusable samples
    pub fn failures(&self) -> u64 {
        self.visits.saturating_sub(self.conversions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_sample() {
        let sample = BinomialSample::new(100, 10);
        assert!(sample.is_usable());
        assert_eq!(sample.rate(), Some(0.1));
        assert_eq!(sample.failures(), 90);
    }

    #[test]
    fn test_zero_visits_rejected() {
        let sample = BinomialSample::new(0, 0);
        assert_eq!(sample.validate(), Err(InputError::NoVisits { visits: 0 }));
        assert_eq!(sample.rate(), None);
    }

    #[test]
    fn test_conversions_exceeding_visits_rejected() {
        let sample = BinomialSample::new(100, 150);
        assert_eq!(
            sample.validate(),
            Err(InputError::ConversionsExceedVisits {
                visits: 100,
                conversions: 150
            })
        );
        assert_eq!(sample.failures(), 0);
    }

    #[test]
    fn test_all_converted_is_usable() {
        assert!(BinomialSample::new(5, 5).is_usable());
    }
}
