//! Gates of the faculty, SIC and CDD decision workflow.
//!
//! Status gates compare the proposition status against a fixed set. Some gates also read
//! the checklist node of the deciding body, including its `extra` metadata.

use super::{BusinessException, BusinessValidator};
use crate::workflows::admission::checklist::{ChecklistExtra, ChecklistNode, ChecklistStatus};
use crate::workflows::admission::domain::{AccessCondition, RequestType};
use crate::workflows::admission::proposition::{
    DispensationNeed, PropositionStatus, RequestedDocument,
};

/// `decision` extra of the faculty decision node once the faculty is deciding.
pub const FACULTY_IN_DECISION: &str = "1";
/// `decision` extra of a closed CDD decision node.
pub const CDD_CLOSED: &str = "CLOTURE";
/// `en_cours` extra of a SIC decision waiting for a dispensation.
pub const SIC_DISPENSATION_IN_PROGRESS: &str = "derogation";

#[derive(Debug, Clone, Copy)]
pub struct SicMaySendToFaculty {
    pub status: PropositionStatus,
}

impl BusinessValidator for SicMaySendToFaculty {
    fn validate(&self) -> Result<(), BusinessException> {
        if !self.status.is_sendable_to_faculty() {
            return Err(BusinessException::NotInSicSituation);
        }
        Ok(())
    }
}

/// The faculty may hand back to SIC while its own decision node is still open.
#[derive(Debug, Clone, Copy)]
pub struct FacultyMaySendToSic<'a> {
    pub status: PropositionStatus,
    pub faculty_decision: &'a ChecklistNode,
}

impl BusinessValidator for FacultyMaySendToSic<'_> {
    fn validate(&self) -> Result<(), BusinessException> {
        let node_open = matches!(
            self.faculty_decision.status,
            Some(
                ChecklistStatus::InitialCandidate
                    | ChecklistStatus::InProgress
                    | ChecklistStatus::Blocked
            )
        );
        let deciding = self.faculty_decision.extra.decision() == Some(FACULTY_IN_DECISION);

        if !self.status.is_submitted_for_faculty() || !node_open || deciding {
            return Err(BusinessException::NotInFacultySituation);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FacultyMayDecide {
    pub status: PropositionStatus,
}

impl BusinessValidator for FacultyMayDecide {
    fn validate(&self) -> Result<(), BusinessException> {
        if !self.status.is_submitted_for_faculty() {
            return Err(BusinessException::NotInFacultySituation);
        }
        Ok(())
    }
}

/// Decision details stay editable while the faculty is completing its file.
#[derive(Debug, Clone, Copy)]
pub struct FacultyDecisionInformationEditable {
    pub status: PropositionStatus,
}

impl BusinessValidator for FacultyDecisionInformationEditable {
    fn validate(&self) -> Result<(), BusinessException> {
        if !self.status.is_submitted_for_faculty_extended() {
            return Err(BusinessException::NotInFacultySituation);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SicMayDecide {
    pub status: PropositionStatus,
}

impl BusinessValidator for SicMayDecide {
    fn validate(&self) -> Result<(), BusinessException> {
        if !self.status.is_submitted_for_sic() {
            return Err(BusinessException::NotInSicSituation);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CddMayDecide {
    pub status: PropositionStatus,
}

impl BusinessValidator for CddMayDecide {
    fn validate(&self) -> Result<(), BusinessException> {
        if !self.status.is_submitted_for_faculty() {
            return Err(BusinessException::NotInCddSituation);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CddClosedStatusIsFinal<'a> {
    pub cdd_decision: &'a ChecklistNode,
}

impl BusinessValidator for CddClosedStatusIsFinal<'_> {
    fn validate(&self) -> Result<(), BusinessException> {
        if self.cdd_decision.has_status(ChecklistStatus::Blocked)
            && self.cdd_decision.extra.decision() == Some(CDD_CLOSED)
        {
            return Err(BusinessException::CddDecisionClosed);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CddRefusalReasonSpecified<'a> {
    pub reasons: &'a [String],
    pub other_reasons: &'a [String],
}

impl BusinessValidator for CddRefusalReasonSpecified<'_> {
    fn validate(&self) -> Result<(), BusinessException> {
        if self.reasons.is_empty() && self.other_reasons.is_empty() {
            return Err(BusinessException::CddRefusalReasonNotSpecified);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FacultyRefusalReasonSpecified<'a> {
    pub reasons: &'a [String],
    pub other_reasons: &'a [String],
}

impl BusinessValidator for FacultyRefusalReasonSpecified<'_> {
    fn validate(&self) -> Result<(), BusinessException> {
        if self.reasons.is_empty() && self.other_reasons.is_empty() {
            return Err(BusinessException::FacultyRefusalReasonNotSpecified);
        }
        Ok(())
    }
}

/// `None` means the question is unanswered; `Some(true)` needs at least one condition.
#[derive(Debug, Clone, Copy)]
pub struct FacultyApprovalConditionsSpecified<'a> {
    pub with_additional_conditions: Option<bool>,
    pub existing_conditions: &'a [String],
    pub free_conditions: &'a [String],
}

impl BusinessValidator for FacultyApprovalConditionsSpecified<'_> {
    fn validate(&self) -> Result<(), BusinessException> {
        let conditions_missing =
            self.existing_conditions.is_empty() && self.free_conditions.is_empty();
        match self.with_additional_conditions {
            None => Err(BusinessException::FacultyApprovalInformationNotSpecified),
            Some(true) if conditions_missing => {
                Err(BusinessException::FacultyApprovalInformationNotSpecified)
            }
            Some(_) => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ProgramDurationSpecified {
    pub program_years: Option<u8>,
}

impl BusinessValidator for ProgramDurationSpecified {
    fn validate(&self) -> Result<(), BusinessException> {
        match self.program_years {
            Some(years) if years > 0 => Ok(()),
            _ => Err(BusinessException::FacultyApprovalInformationNotSpecified),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AccessTitleSelected<'a> {
    pub previous_experience_status: Option<ChecklistStatus>,
    pub selected_titles: &'a [String],
}

impl BusinessValidator for AccessTitleSelected<'_> {
    fn validate(&self) -> Result<(), BusinessException> {
        if self.previous_experience_status == Some(ChecklistStatus::Success)
            && self.selected_titles.is_empty()
        {
            return Err(BusinessException::AccessTitleNotSelected);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AccessTitleSelectedToSendToSic<'a> {
    pub selected_titles: &'a [String],
}

impl BusinessValidator for AccessTitleSelectedToSendToSic<'_> {
    fn validate(&self) -> Result<(), BusinessException> {
        if self.selected_titles.is_empty() {
            return Err(BusinessException::AccessTitleRequiredToSendToSic);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AccessConditionSelected {
    pub previous_experience_status: Option<ChecklistStatus>,
    pub access_condition: Option<AccessCondition>,
    pub access_condition_year: Option<i32>,
}

impl BusinessValidator for AccessConditionSelected {
    fn validate(&self) -> Result<(), BusinessException> {
        if self.previous_experience_status == Some(ChecklistStatus::Success)
            && (self.access_condition.is_none() || self.access_condition_year.is_none())
        {
            return Err(BusinessException::AccessConditionNotSelected);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PreviousExperienceSufficient<'a> {
    pub previous_experience: &'a ChecklistNode,
}

impl BusinessValidator for PreviousExperienceSufficient<'_> {
    fn validate(&self) -> Result<(), BusinessException> {
        if !self.previous_experience.has_status(ChecklistStatus::Success) {
            return Err(BusinessException::PreviousExperienceNotSufficient);
        }
        Ok(())
    }
}

/// Complements or their comment are only allowed when complements were announced.
#[derive(Debug, Clone, Copy)]
pub struct TrainingComplementsEmptyWhenNone<'a> {
    pub with_training_complements: Option<bool>,
    pub training_complements: &'a [String],
    pub comment: &'a str,
}

impl BusinessValidator for TrainingComplementsEmptyWhenNone<'_> {
    fn validate(&self) -> Result<(), BusinessException> {
        if self.with_training_complements != Some(true)
            && (!self.training_complements.is_empty() || !self.comment.trim().is_empty())
        {
            return Err(BusinessException::TrainingComplementsMustBeEmpty);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NoImmediateDocumentRequest<'a> {
    pub documents: &'a [RequestedDocument],
}

impl BusinessValidator for NoImmediateDocumentRequest<'_> {
    fn validate(&self) -> Result<(), BusinessException> {
        if self
            .documents
            .iter()
            .any(RequestedDocument::is_requested_immediately)
        {
            return Err(BusinessException::ImmediateDocumentRequestPending);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FinanceabilityReadyForApproval<'a> {
    pub financeability: &'a ChecklistNode,
}

impl BusinessValidator for FinanceabilityReadyForApproval<'_> {
    fn validate(&self) -> Result<(), BusinessException> {
        match self.financeability.status {
            Some(ChecklistStatus::InitialNotConcerned | ChecklistStatus::Success) => Ok(()),
            _ => Err(BusinessException::FinanceabilityChecklistNotReady),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PersonalDataValidated<'a> {
    pub personal_data: &'a ChecklistNode,
}

impl BusinessValidator for PersonalDataValidated<'_> {
    fn validate(&self) -> Result<(), BusinessException> {
        if !self.personal_data.has_status(ChecklistStatus::Success) {
            return Err(BusinessException::PersonalDataChecklistNotValidated);
        }
        Ok(())
    }
}

/// SIC may approve an enrolment from scratch, or once management approved the dispensation.
#[derive(Debug, Clone, Copy)]
pub struct SicChecklistReadyForEnrolmentApproval<'a> {
    pub sic_decision: &'a ChecklistNode,
    pub dispensation_need: Option<DispensationNeed>,
}

impl BusinessValidator for SicChecklistReadyForEnrolmentApproval<'_> {
    fn validate(&self) -> Result<(), BusinessException> {
        let node = self.sic_decision;
        let fresh = node.has_status(ChecklistStatus::InitialCandidate);
        let dispensation_granted = node.has_status(ChecklistStatus::InProgress)
            && node.extra.get(ChecklistExtra::IN_PROGRESS) == Some(SIC_DISPENSATION_IN_PROGRESS)
            && self.dispensation_need == Some(DispensationNeed::ManagementApproval);

        if !(fresh || dispensation_granted) {
            return Err(BusinessException::SicDecisionChecklistNotReady);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RequestIsAdmission {
    pub request_type: RequestType,
}

impl BusinessValidator for RequestIsAdmission {
    fn validate(&self) -> Result<(), BusinessException> {
        if self.request_type != RequestType::Admission {
            return Err(BusinessException::RequestMustBeAdmission);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RequestIsEnrolment {
    pub request_type: RequestType,
}

impl BusinessValidator for RequestIsEnrolment {
    fn validate(&self) -> Result<(), BusinessException> {
        if self.request_type != RequestType::Enrolment {
            return Err(BusinessException::RequestMustBeEnrolment);
        }
        Ok(())
    }
}

/// Only late enrolments carrying an access condition pass.
#[derive(Debug, Clone, Copy)]
pub struct LateEnrolmentWithAccessCondition {
    pub late_enrolment: bool,
    pub access_condition: Option<AccessCondition>,
}

impl BusinessValidator for LateEnrolmentWithAccessCondition {
    fn validate(&self) -> Result<(), BusinessException> {
        if !self.late_enrolment || self.access_condition.is_none() {
            return Err(BusinessException::LateEnrolmentWithAccessCondition);
        }
        Ok(())
    }
}
