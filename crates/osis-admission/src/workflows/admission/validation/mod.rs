//! Business validators and the collect-all aggregation that composes them.
//!
//! A validator is a plain value holding exactly the inputs its rule needs. It either passes
//! silently or reports one [`BusinessException`]. Composite checks are fed to
//! [`execute_and_aggregate`], which runs every check and reports every failure at once.

pub mod access;
pub mod accounting;
pub mod checklist;
pub mod curriculum;
pub mod decision;
mod exceptions;
pub mod secondary_studies;
pub mod specific_questions;

use tracing::warn;

pub use exceptions::{BusinessException, ExceptionReport, MultipleBusinessExceptions};

/// One indivisible business rule.
pub trait BusinessValidator {
    fn validate(&self) -> Result<(), BusinessException>;
}

/// A deferred zero-argument check, run by [`execute_and_aggregate`].
pub struct Check<'a> {
    run: Box<dyn FnOnce() -> Result<(), MultipleBusinessExceptions> + 'a>,
}

impl<'a> Check<'a> {
    pub fn validator<V>(validator: V) -> Self
    where
        V: BusinessValidator + 'a,
    {
        Self {
            run: Box::new(move || validator.validate().map_err(Into::into)),
        }
    }

    /// Wrap any closure whose error converts into an exception list (service calls, validators
    /// reporting several exceptions, nested aggregations).
    pub fn from_fn<F, E>(check: F) -> Self
    where
        F: FnOnce() -> Result<(), E> + 'a,
        E: Into<MultipleBusinessExceptions>,
    {
        Self {
            run: Box::new(move || check().map_err(Into::into)),
        }
    }

    fn run(self) -> Result<(), MultipleBusinessExceptions> {
        (self.run)()
    }
}

/// Run every check in order and collect every exception raised.
///
/// Nested aggregates are flattened so the result is one ordered list. Returns `Ok(())` when no
/// check failed.
pub fn execute_and_aggregate<'a, I>(checks: I) -> Result<(), MultipleBusinessExceptions>
where
    I: IntoIterator<Item = Check<'a>>,
{
    let mut collected = Vec::new();
    for check in checks {
        if let Err(failure) = check.run() {
            collected.extend(failure);
        }
    }

    if collected.is_empty() {
        Ok(())
    } else {
        let failure = MultipleBusinessExceptions::new(collected);
        warn!(
            count = failure.len(),
            codes = ?failure.status_codes(),
            "business validation failed"
        );
        Err(failure)
    }
}

/// A validator list run in two collect-all steps: data contract first, invariants second.
///
/// The invariant step only runs once the data contract step passed, since invariants may
/// assume well-formed data.
pub trait ValidatorList {
    fn data_contract_validators(&self) -> Vec<Check<'_>> {
        Vec::new()
    }

    fn invariant_validators(&self) -> Vec<Check<'_>>;

    fn validate(&self) -> Result<(), MultipleBusinessExceptions> {
        execute_and_aggregate(self.data_contract_validators())?;
        execute_and_aggregate(self.invariant_validators())
    }
}
