use super::exemption::ExemptionFilter;
use crate::config::SingleEligiblePolicy;
use crate::forum::types::Post;
use thiserror::Error;

/// The day's most- and least-upvoted eligible posts.
/// Invariant: `top.score >= bottom.score`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedPair {
    pub top: Post,
    pub bottom: Post,
}

impl RankedPair {
    pub fn is_self_pair(&self) -> bool {
        self.top.id == self.bottom.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    /// Every post was exempt (or there were no posts at all).
    NoneEligible,
    /// One eligible post, and policy says not to pair it with itself.
    SingleEligible,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectError {
    #[error("no ranked pair: {reason:?} among {considered} posts")]
    EmptySelection { considered: usize, reason: EmptyReason },
}

/// Pick the top and bottom eligible posts.
///
/// Posts are stable-sorted by score descending, so ties keep the forum's
/// order. The top post is the first eligible post of the sorted list, the
/// bottom post the first eligible post scanning from the end.
pub fn select(
    posts: &[Post],
    filter: &ExemptionFilter,
    single_eligible: SingleEligiblePolicy,
) -> Result<RankedPair, SelectError> {
    let empty = |reason| SelectError::EmptySelection {
        considered: posts.len(),
        reason,
    };

    let mut ranked: Vec<&Post> = posts.iter().collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));

    let top_idx = ranked
        .iter()
        .position(|p| !filter.is_exempt(p))
        .ok_or_else(|| empty(EmptyReason::NoneEligible))?;
    let bottom_idx = ranked
        .iter()
        .rposition(|p| !filter.is_exempt(p))
        .ok_or_else(|| empty(EmptyReason::NoneEligible))?;

    if top_idx == bottom_idx && single_eligible == SingleEligiblePolicy::Skip {
        return Err(empty(EmptyReason::SingleEligible));
    }

    Ok(RankedPair {
        top: ranked[top_idx].clone(),
        bottom: ranked[bottom_idx].clone(),
    })
}
