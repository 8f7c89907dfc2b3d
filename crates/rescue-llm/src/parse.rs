//! Strict parsing of negotiation replies.
//!
//! The reply must be exactly one JSON object with the four outcome fields
//! and nothing else. Anything looser (prose around the object, markdown
//! fences, extra or missing fields, out-of-range numbers) is rejected.

use serde::Deserialize;

use rescue_types::NegotiationOutcome;

use crate::error::CollaboratorError;

/// The reply shape exactly as the prompt requests it.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawNegotiationOutcome {
    acceptance_likelihood: f64,
    counter_offer: String,
    strategy: String,
    estimated_savings: f64,
}

/// Parse and range-check a negotiation reply.
pub fn parse_negotiation_outcome(raw: &str) -> Result<NegotiationOutcome, CollaboratorError> {
    let parsed: RawNegotiationOutcome = serde_json::from_str(raw).map_err(|e| {
        CollaboratorError::Parse(format!("negotiation reply is not the outcome schema: {e}"))
    })?;
    convert_raw_outcome(parsed)
}

fn convert_raw_outcome(
    raw: RawNegotiationOutcome,
) -> Result<NegotiationOutcome, CollaboratorError> {
    if !raw.acceptance_likelihood.is_finite() || !(0.0..=100.0).contains(&raw.acceptance_likelihood)
    {
        return Err(CollaboratorError::Parse(format!(
            "acceptance_likelihood out of range: {}",
            raw.acceptance_likelihood
        )));
    }
    if !raw.estimated_savings.is_finite() || raw.estimated_savings < 0.0 {
        return Err(CollaboratorError::Parse(format!(
            "estimated_savings out of range: {}",
            raw.estimated_savings
        )));
    }
    if raw.counter_offer.trim().is_empty() || raw.strategy.trim().is_empty() {
        return Err(CollaboratorError::Parse(
            "counter_offer and strategy must be non-empty".to_owned(),
        ));
    }

    Ok(NegotiationOutcome {
        acceptance_likelihood: raw.acceptance_likelihood,
        counter_offer: raw.counter_offer,
        strategy: raw.strategy,
        estimated_savings: raw.estimated_savings,
    })
}
