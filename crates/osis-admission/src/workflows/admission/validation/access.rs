use super::{BusinessException, BusinessValidator};
use crate::workflows::admission::domain::AccessTitles;

/// At least one relevant access condition is satisfied.
#[derive(Debug, Clone, Copy)]
pub struct AccessConditionsMet<'a> {
    pub titles: &'a AccessTitles,
}

impl BusinessValidator for AccessConditionsMet<'_> {
    fn validate(&self) -> Result<(), BusinessException> {
        if self.titles.valid_conditions().is_empty() {
            return Err(BusinessException::AccessConditionsNotMet);
        }
        Ok(())
    }
}

/// Submitting is refused once the candidate already has `limit` submitted propositions.
#[derive(Debug, Clone, Copy)]
pub struct SubmittedPropositionsBelowLimit {
    pub submitted: usize,
    pub limit: u8,
}

impl BusinessValidator for SubmittedPropositionsBelowLimit {
    fn validate(&self) -> Result<(), BusinessException> {
        if self.submitted >= usize::from(self.limit) {
            return Err(BusinessException::SubmittedPropositionsLimitExceeded);
        }
        Ok(())
    }
}

/// Creating a proposition is refused once `limit` propositions are in progress.
#[derive(Debug, Clone, Copy)]
pub struct PropositionCreationAllowed {
    pub in_progress: usize,
    pub limit: u8,
}

impl BusinessValidator for PropositionCreationAllowed {
    fn validate(&self) -> Result<(), BusinessException> {
        if self.in_progress >= usize::from(self.limit) {
            return Err(BusinessException::MaximumPropositionsReached);
        }
        Ok(())
    }
}
