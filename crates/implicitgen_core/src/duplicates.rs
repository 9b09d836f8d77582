//! Collision filtering across one type's candidate set.
//!
//! 1. A candidate whose signature matches a user-written conversion (implicit or explicit) is
//!    dropped: the author already defined it.
//! 2. Among the rest, the first candidate in declaration order wins every signature; later
//!    candidates with an equal signature are dropped.
//!
//! Survivors keep their original order, so repeated runs reproduce the same output.

use crate::signature::SignatureComparer;
use crate::types::{ConversionCandidate, ExistingConversion};

/// Outcome of duplicate resolution for one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Survives,
    /// Equal to the user-written conversion at `conversion` in the type's conversion list.
    CollidesWithExisting { conversion: usize },
    /// Equal to the earlier surviving candidate at position `candidate` in the input slice.
    DuplicateOf { candidate: usize },
}

/// Decide the fate of every candidate. The result is parallel to `candidates`.
pub fn verdicts(
    candidates: &[ConversionCandidate<'_>],
    existing: &[ExistingConversion],
    comparer: SignatureComparer,
) -> Vec<Verdict> {
    let mut survivors: Vec<usize> = Vec::new();
    candidates
        .iter()
        .enumerate()
        .map(|(position, candidate)| {
            if let Some(conversion) = existing
                .iter()
                .position(|c| comparer.equal(&c.parameters, candidate.signature_types()))
            {
                return Verdict::CollidesWithExisting { conversion };
            }
            if let Some(&earlier) = survivors.iter().find(|&&earlier| {
                comparer.equal(candidates[earlier].signature_types(), candidate.signature_types())
            }) {
                return Verdict::DuplicateOf { candidate: earlier };
            }
            survivors.push(position);
            Verdict::Survives
        })
        .collect()
}

/// Drop colliding and duplicate candidates, keeping declaration order.
pub fn resolve_duplicates<'a>(
    candidates: Vec<ConversionCandidate<'a>>,
    existing: &[ExistingConversion],
    comparer: SignatureComparer,
) -> Vec<ConversionCandidate<'a>> {
    let verdicts = verdicts(&candidates, existing, comparer);
    candidates
        .into_iter()
        .zip(verdicts)
        .filter_map(|(candidate, verdict)| match verdict {
            Verdict::Survives => Some(candidate),
            dropped => {
                tracing::debug!(
                    type_name = %candidate.owner.name,
                    constructor = candidate.index,
                    ?dropped,
                    "candidate dropped"
                );
                None
            }
        })
        .collect()
}
