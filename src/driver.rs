//! Batch driver: runs the engine over every declared type.
//!
//! Types are independent, so they are processed on a rayon pool. Results keep manifest order
//! whatever the scheduling, and cancellation is observed only between types: a type that has
//! started is always finished.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use implicitgen_core::{GeneratedUnit, TypeReport, TypeView, explain, transform_with};
use rayon::prelude::*;
use thiserror::Error;

use crate::config::GeneratorConfig;
use crate::sink::{OutputSink, SinkError};

/// Errors that stop a batch run
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("generation cancelled")]
    Cancelled,

    #[error("types '{first}' and '{second}' both generate '{identifier}'")]
    DuplicateIdentifier {
        identifier: String,
        first: String,
        second: String,
    },

    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),

    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Cooperative cancellation flag shared between the caller and the driver.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Generate units for every type, in input order.
///
/// Types that produce nothing are skipped.
///
/// ## Errors
///
/// - [`DriverError::Cancelled`] when `token` is set before every type was processed
/// - [`DriverError::DuplicateIdentifier`] when two types map to the same unit identifier
#[tracing::instrument(skip_all, fields(types = types.len(), tuples = config.has_tuple_feature))]
pub fn generate_all(
    types: &[TypeView],
    config: &GeneratorConfig,
    token: &CancellationToken,
) -> Result<Vec<GeneratedUnit>, DriverError> {
    let options = config.emit_options();
    let run = || -> Result<Vec<Option<GeneratedUnit>>, DriverError> {
        types
            .par_iter()
            .map(|ty| {
                if token.is_cancelled() {
                    return Err(DriverError::Cancelled);
                }
                Ok(transform_with(ty, config.has_tuple_feature, &options))
            })
            .collect()
    };

    let results = match config.threads {
        Some(threads) => rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| DriverError::ThreadPool(e.to_string()))?
            .install(run)?,
        None => run()?,
    };

    let mut claimed: HashMap<String, usize> = HashMap::new();
    let mut units = Vec::new();
    for (index, unit) in results.into_iter().enumerate() {
        let Some(unit) = unit else { continue };
        if let Some(&first) = claimed.get(&unit.identifier) {
            return Err(DriverError::DuplicateIdentifier {
                identifier: unit.identifier,
                first: types[first].identity(),
                second: types[index].identity(),
            });
        }
        claimed.insert(unit.identifier.clone(), index);
        units.push(unit);
    }

    tracing::info!(types = types.len(), units = units.len(), "generation finished");
    Ok(units)
}

/// Generate every unit and hand it to `sink`, in input order.
pub fn generate_into(
    types: &[TypeView],
    config: &GeneratorConfig,
    token: &CancellationToken,
    sink: &mut dyn OutputSink,
) -> Result<usize, DriverError> {
    let units = generate_all(types, config, token)?;
    for unit in &units {
        sink.add_source(&unit.identifier, &unit.text)?;
    }
    Ok(units.len())
}

/// Explain the engine's decisions for every type whose identity or simple name matches `filter`.
pub fn explain_all(types: &[TypeView], has_tuple_feature: bool, filter: Option<&str>) -> Vec<TypeReport> {
    types
        .iter()
        .filter(|ty| filter.is_none_or(|name| ty.name == name || ty.identity() == name))
        .map(|ty| explain(ty, has_tuple_feature))
        .collect()
}
