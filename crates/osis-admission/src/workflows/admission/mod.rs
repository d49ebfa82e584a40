//! Admission of a candidate to a general education training.
//!
//! A proposition goes through submission verification, pool determination against the
//! registration calendar, then the review checklist driven by SIC, the faculty and the CDD.

pub mod accounting;
pub mod calendar;
pub mod checklist;
pub mod domain;
pub mod in_memory;
pub mod ports;
pub mod proposition;
pub mod service;
pub mod validation;
pub mod verification;

#[cfg(test)]
mod tests;

pub use calendar::{AdmissionPool, DeterminedPool, RegistrationCalendar};
pub use proposition::{Proposition, PropositionStatus};
pub use service::{AdmissionService, AdmissionServiceError};
pub use validation::{BusinessException, MultipleBusinessExceptions};
pub use verification::PropositionVerifier;
