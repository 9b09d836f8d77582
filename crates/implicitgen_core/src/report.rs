//! Per-constructor decision report.
//!
//! This is the optional diagnostics layer: it replays the pipeline for one type and records why each
//! constructor did or did not produce a conversion. The pipeline itself never consults it.

use std::fmt;

use crate::classify::{Ineligibility, TypeRejection, ineligibility, type_rejection};
use crate::destructure::collect_candidates;
use crate::duplicates::{Verdict, verdicts};
use crate::signature::SignatureComparer;
use crate::types::{SignatureElement, TypeView};

/// What happened to one constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A conversion with this signature is synthesized.
    Synthesized(Vec<SignatureElement>),
    Ineligible(Ineligibility),
    /// The author already wrote a conversion with the same signature.
    CollidesWithExisting { conversion: usize },
    /// An earlier constructor already claims the same signature.
    DuplicateOf { constructor: usize },
}

/// Decision record for one constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorReport {
    pub index: usize,
    pub outcome: Outcome,
}

/// Decision record for one type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeReport {
    pub identity: String,
    /// Set when the type is not a candidate; `constructors` is then empty.
    pub rejection: Option<TypeRejection>,
    pub constructors: Vec<ConstructorReport>,
}

impl TypeReport {
    pub fn synthesized_count(&self) -> usize {
        self.constructors
            .iter()
            .filter(|c| matches!(c.outcome, Outcome::Synthesized(_)))
            .count()
    }
}

/// Explain the pipeline's decisions for `ty`.
pub fn explain(ty: &TypeView, has_tuple_feature: bool) -> TypeReport {
    let identity = ty.identity();
    if let Some(rejection) = type_rejection(ty) {
        return TypeReport {
            identity,
            rejection: Some(rejection),
            constructors: Vec::new(),
        };
    }

    let candidates = collect_candidates(ty, has_tuple_feature);
    let mut outcomes: Vec<Option<Outcome>> = ty
        .constructors
        .iter()
        .map(|ctor| ineligibility(ty, ctor, has_tuple_feature).map(Outcome::Ineligible))
        .collect();

    let comparer = SignatureComparer::new(has_tuple_feature);
    for (candidate, verdict) in candidates.iter().zip(verdicts(&candidates, &ty.conversions, comparer)) {
        outcomes[candidate.index] = Some(match verdict {
            Verdict::Survives => Outcome::Synthesized(candidate.signature.clone()),
            Verdict::CollidesWithExisting { conversion } => Outcome::CollidesWithExisting { conversion },
            Verdict::DuplicateOf { candidate: earlier } => Outcome::DuplicateOf {
                constructor: candidates[earlier].index,
            },
        });
    }

    TypeReport {
        identity,
        rejection: None,
        constructors: outcomes
            .into_iter()
            .enumerate()
            .filter_map(|(index, outcome)| outcome.map(|outcome| ConstructorReport { index, outcome }))
            .collect(),
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Synthesized(signature) => {
                let parts: Vec<String> = signature.iter().map(|e| format!("{} {}", e.ty, e.name)).collect();
                write!(f, "synthesized ({})", parts.join(", "))
            }
            Outcome::Ineligible(reason) => write!(f, "skipped: {reason}"),
            Outcome::CollidesWithExisting { conversion } => {
                write!(f, "skipped: collides with user-written conversion #{conversion}")
            }
            Outcome::DuplicateOf { constructor } => write!(f, "skipped: duplicates constructor #{constructor}"),
        }
    }
}

impl fmt::Display for TypeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identity)?;
        if let Some(rejection) = self.rejection {
            return write!(f, ": not a candidate ({rejection})");
        }
        if self.constructors.is_empty() {
            return write!(f, ": no constructors");
        }
        for c in &self.constructors {
            write!(f, "\n  constructor #{}: {}", c.index, c.outcome)?;
        }
        Ok(())
    }
}
