use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

use super::accounting::Accounting;
use super::calendar::{DeterminedPool, PoolDeclarations};
use super::checklist::{
    AdmissionChecklists, ChecklistExtra, ChecklistStatus, ChecklistTab, GeneralChecklist,
    InitialChecklistFacts,
};
use super::domain::{
    AccessCondition, CandidateId, ExperienceId, FormationIdentity, PropositionId, RequestType,
};
use super::validation::checklist::ExperienceChecklistsValidated;
use super::validation::decision::{
    AccessConditionSelected, AccessTitleSelected, AccessTitleSelectedToSendToSic,
    CddClosedStatusIsFinal, CddMayDecide, CddRefusalReasonSpecified,
    FacultyApprovalConditionsSpecified, FacultyDecisionInformationEditable, FacultyMayDecide,
    FacultyMaySendToSic, FacultyRefusalReasonSpecified, FinanceabilityReadyForApproval,
    LateEnrolmentWithAccessCondition, NoImmediateDocumentRequest, PersonalDataValidated,
    PreviousExperienceSufficient, ProgramDurationSpecified, RequestIsAdmission,
    RequestIsEnrolment, SicChecklistReadyForEnrolmentApproval, SicMayDecide,
    SicMaySendToFaculty, TrainingComplementsEmptyWhenNone, CDD_CLOSED, FACULTY_IN_DECISION,
};
use super::validation::{
    execute_and_aggregate, BusinessException, Check, MultipleBusinessExceptions,
};

/// `decision` extra of a CDD refusal.
const CDD_IN_DECISION: &str = "EN_DECISION";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropositionStatus {
    #[serde(rename = "EN_BROUILLON")]
    Draft,
    #[serde(rename = "FRAIS_DOSSIER_EN_ATTENTE")]
    AwaitingFees,
    #[serde(rename = "CONFIRMEE")]
    Confirmed,
    #[serde(rename = "ANNULEE")]
    Cancelled,
    #[serde(rename = "A_COMPLETER_POUR_SIC")]
    ToCompleteForSic,
    #[serde(rename = "COMPLETEE_POUR_SIC")]
    CompletedForSic,
    #[serde(rename = "TRAITEMENT_FAC")]
    FacTreatment,
    #[serde(rename = "A_COMPLETER_POUR_FAC")]
    ToCompleteForFac,
    #[serde(rename = "COMPLETEE_POUR_FAC")]
    CompletedForFac,
    #[serde(rename = "RETOUR_DE_FAC")]
    ReturnedFromFac,
    #[serde(rename = "ATTENTE_VALIDATION_DIRECTION")]
    AwaitingDirectionValidation,
    #[serde(rename = "INSCRIPTION_AUTORISEE")]
    EnrolmentAuthorised,
    #[serde(rename = "INSCRIPTION_REFUSEE")]
    EnrolmentRefused,
    #[serde(rename = "CLOTUREE")]
    Closed,
}

impl PropositionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::AwaitingFees => "Application fees pending",
            Self::Confirmed => "Application confirmed",
            Self::Cancelled => "Cancelled application",
            Self::ToCompleteForSic => "To be completed for SIC",
            Self::CompletedForSic => "Completed for SIC",
            Self::FacTreatment => "Faculty processing",
            Self::ToCompleteForFac => "To be completed for the faculty",
            Self::CompletedForFac => "Completed for the faculty",
            Self::ReturnedFromFac => "Faculty feedback",
            Self::AwaitingDirectionValidation => "Awaiting management approval",
            Self::EnrolmentAuthorised => "Application accepted",
            Self::EnrolmentRefused => "Application denied",
            Self::Closed => "Closed",
        }
    }

    /// Statuses from which SIC may hand the file to the faculty.
    pub const fn is_sendable_to_faculty(self) -> bool {
        matches!(
            self,
            Self::Confirmed | Self::CompletedForSic | Self::ReturnedFromFac
        )
    }

    pub const fn is_submitted_for_faculty(self) -> bool {
        matches!(self, Self::FacTreatment | Self::CompletedForFac)
    }

    /// Faculty statuses, including the wait for the candidate's answer.
    pub const fn is_submitted_for_faculty_extended(self) -> bool {
        self.is_submitted_for_faculty() || matches!(self, Self::ToCompleteForFac)
    }

    pub const fn is_submitted_for_sic(self) -> bool {
        matches!(
            self,
            Self::Confirmed
                | Self::ToCompleteForSic
                | Self::CompletedForSic
                | Self::ReturnedFromFac
                | Self::AwaitingDirectionValidation
        )
    }

    /// Statuses the candidate still edits.
    pub const fn is_in_progress(self) -> bool {
        matches!(self, Self::Draft | Self::AwaitingFees)
    }
}

/// Outcome of a request for a management dispensation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DispensationNeed {
    #[serde(rename = "AVIS_DIRECTION_DEMANDE")]
    ManagementOpinionRequested,
    #[serde(rename = "ACCORD_DIRECTION")]
    ManagementApproval,
    #[serde(rename = "REFUS_DIRECTION")]
    ManagementRefusal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentStatus {
    #[serde(rename = "A_RECLAMER")]
    ToRequest,
    #[serde(rename = "RECLAME")]
    Requested,
    #[serde(rename = "NON_ANALYSE")]
    NotAnalysed,
    #[serde(rename = "VALIDE")]
    Validated,
    #[serde(rename = "COMPLETE_APRES_RECLAMATION")]
    CompletedAfterRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReclamationTiming {
    #[serde(rename = "IMMEDIATEMENT")]
    Immediately,
    #[serde(rename = "ULTERIEUREMENT_BLOQUANT")]
    LaterBlocking,
    #[serde(rename = "ULTERIEUREMENT_NON_BLOQUANT")]
    LaterNonBlocking,
}

/// A document slot the staff asked the candidate to provide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestedDocument {
    pub identifier: String,
    pub status: DocumentStatus,
    #[serde(default)]
    pub reclamation: Option<ReclamationTiming>,
}

impl RequestedDocument {
    pub fn is_requested_immediately(&self) -> bool {
        matches!(self.status, DocumentStatus::ToRequest | DocumentStatus::Requested)
            && self.reclamation == Some(ReclamationTiming::Immediately)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FacultyDecision {
    pub refusal_reasons: Vec<String>,
    pub other_refusal_reasons: Vec<String>,
    pub with_additional_conditions: Option<bool>,
    pub existing_conditions: Vec<String>,
    pub free_conditions: Vec<String>,
    pub with_training_complements: Option<bool>,
    pub training_complements: Vec<String>,
    pub training_complements_comment: String,
    pub program_years: Option<u8>,
    pub selected_access_titles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SicDecision {
    pub access_condition: Option<AccessCondition>,
    pub access_condition_year: Option<i32>,
    pub dispensation_need: Option<DispensationNeed>,
    pub late_enrolment: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CddDecision {
    pub refusal_reasons: Vec<String>,
    pub other_refusal_reasons: Vec<String>,
}

/// An admission request for one training offering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposition {
    pub id: PropositionId,
    pub formation: FormationIdentity,
    pub candidate: CandidateId,
    pub status: PropositionStatus,
    pub request_type: RequestType,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
    /// Pool and year recorded at submission.
    #[serde(default)]
    pub submitted_pool: Option<DeterminedPool>,
    #[serde(default)]
    pub declarations: PoolDeclarations,
    #[serde(default)]
    pub specific_answers: BTreeMap<String, String>,
    #[serde(default)]
    pub curriculum_file: Vec<String>,
    #[serde(default)]
    pub equivalence: Vec<String>,
    #[serde(default)]
    pub accounting: Accounting,
    #[serde(default)]
    pub valorised_experiences: Vec<ExperienceId>,
    #[serde(default)]
    pub checklists: AdmissionChecklists,
    #[serde(default)]
    pub requested_documents: Vec<RequestedDocument>,
    #[serde(default)]
    pub faculty_decision: FacultyDecision,
    #[serde(default)]
    pub sic_decision: SicDecision,
    #[serde(default)]
    pub cdd_decision: CddDecision,
}

impl Proposition {
    pub fn new(
        formation: FormationIdentity,
        candidate: CandidateId,
        request_type: RequestType,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: PropositionId::new(),
            formation,
            candidate,
            status: PropositionStatus::Draft,
            request_type,
            created_at: now,
            modified_at: now,
            submitted_at: None,
            submitted_pool: None,
            declarations: PoolDeclarations::default(),
            specific_answers: BTreeMap::new(),
            curriculum_file: Vec::new(),
            equivalence: Vec::new(),
            accounting: Accounting::default(),
            valorised_experiences: Vec::new(),
            checklists: AdmissionChecklists::default(),
            requested_documents: Vec::new(),
            faculty_decision: FacultyDecision::default(),
            sic_decision: SicDecision::default(),
            cdd_decision: CddDecision::default(),
        }
    }

    fn ensure_active(&self) -> Result<(), BusinessException> {
        if self.status == PropositionStatus::Cancelled {
            return Err(BusinessException::PropositionCancelled);
        }
        Ok(())
    }

    /// Refuse changes once the proposition left the draft stages.
    pub(crate) fn ensure_in_progress(&self) -> Result<(), BusinessException> {
        self.ensure_active()?;
        if !self.status.is_in_progress() {
            return Err(BusinessException::PropositionAlreadySubmitted);
        }
        Ok(())
    }

    fn checklist(&self) -> &GeneralChecklist {
        &self.checklists.current
    }

    fn moved_to(&mut self, status: PropositionStatus, now: DateTime<Utc>, transition: &str) {
        let from = self.status;
        self.status = status;
        self.modified_at = now;
        info!(
            proposition = %self.id,
            from = from.label(),
            to = status.label(),
            transition,
            "proposition status changed"
        );
    }

    /// Record a verified submission and generate the review checklist.
    pub fn submit(
        &mut self,
        pool: DeterminedPool,
        facts: &InitialChecklistFacts,
        now: DateTime<Utc>,
    ) -> Result<(), MultipleBusinessExceptions> {
        self.ensure_in_progress()?;
        self.submitted_pool = Some(pool);
        self.submitted_at = Some(now);
        self.checklists = AdmissionChecklists::new(GeneralChecklist::initial(facts));
        self.moved_to(PropositionStatus::Confirmed, now, "submit");
        Ok(())
    }

    pub fn cancel(&mut self, now: DateTime<Utc>) -> Result<(), MultipleBusinessExceptions> {
        self.ensure_in_progress()?;
        self.moved_to(PropositionStatus::Cancelled, now, "cancel");
        Ok(())
    }

    pub fn send_to_faculty(&mut self, now: DateTime<Utc>) -> Result<(), MultipleBusinessExceptions> {
        self.ensure_active()?;
        execute_and_aggregate([Check::validator(SicMaySendToFaculty {
            status: self.status,
        })])?;
        self.moved_to(PropositionStatus::FacTreatment, now, "send_to_faculty");
        Ok(())
    }

    /// The faculty hands the file back to SIC without deciding.
    pub fn send_back_to_sic(&mut self, now: DateTime<Utc>) -> Result<(), MultipleBusinessExceptions> {
        self.ensure_active()?;
        execute_and_aggregate([Check::validator(FacultyMaySendToSic {
            status: self.status,
            faculty_decision: self.checklist().tab(ChecklistTab::FacultyDecision),
        })])?;
        self.moved_to(PropositionStatus::ReturnedFromFac, now, "send_back_to_sic");
        Ok(())
    }

    /// Replace the faculty approval details while the faculty holds the file.
    pub fn specify_faculty_approval(
        &mut self,
        decision: FacultyDecision,
        now: DateTime<Utc>,
    ) -> Result<(), MultipleBusinessExceptions> {
        self.ensure_active()?;
        execute_and_aggregate([Check::validator(FacultyDecisionInformationEditable {
            status: self.status,
        })])?;
        self.faculty_decision = decision;
        self.modified_at = now;
        Ok(())
    }

    pub fn refuse_by_faculty(
        &mut self,
        reasons: Vec<String>,
        other_reasons: Vec<String>,
        now: DateTime<Utc>,
    ) -> Result<(), MultipleBusinessExceptions> {
        self.ensure_active()?;
        execute_and_aggregate([
            Check::validator(FacultyMayDecide {
                status: self.status,
            }),
            Check::validator(FacultyRefusalReasonSpecified {
                reasons: &reasons,
                other_reasons: &other_reasons,
            }),
        ])?;

        self.faculty_decision.refusal_reasons = reasons;
        self.faculty_decision.other_refusal_reasons = other_reasons;
        self.checklists.current.set_status(
            ChecklistTab::FacultyDecision,
            ChecklistStatus::Blocked,
            ChecklistExtra::new().with(ChecklistExtra::DECISION, FACULTY_IN_DECISION),
        );
        self.moved_to(PropositionStatus::ReturnedFromFac, now, "refuse_by_faculty");
        Ok(())
    }

    pub fn approve_by_faculty(&mut self, now: DateTime<Utc>) -> Result<(), MultipleBusinessExceptions> {
        self.ensure_active()?;
        let decision = &self.faculty_decision;
        execute_and_aggregate([
            Check::validator(FacultyMayDecide {
                status: self.status,
            }),
            Check::validator(FacultyApprovalConditionsSpecified {
                with_additional_conditions: decision.with_additional_conditions,
                existing_conditions: &decision.existing_conditions,
                free_conditions: &decision.free_conditions,
            }),
            Check::validator(TrainingComplementsEmptyWhenNone {
                with_training_complements: decision.with_training_complements,
                training_complements: &decision.training_complements,
                comment: &decision.training_complements_comment,
            }),
            Check::validator(ProgramDurationSpecified {
                program_years: decision.program_years,
            }),
            Check::validator(AccessTitleSelectedToSendToSic {
                selected_titles: &decision.selected_access_titles,
            }),
            Check::validator(NoImmediateDocumentRequest {
                documents: &self.requested_documents,
            }),
        ])?;

        self.checklists.current.set_status(
            ChecklistTab::FacultyDecision,
            ChecklistStatus::Success,
            ChecklistExtra::new(),
        );
        self.moved_to(PropositionStatus::ReturnedFromFac, now, "approve_by_faculty");
        Ok(())
    }

    /// SIC approval of the request, stated as an admission or an enrolment by the caller.
    pub fn approve_by_sic(
        &mut self,
        expected: RequestType,
        now: DateTime<Utc>,
    ) -> Result<(), MultipleBusinessExceptions> {
        self.ensure_active()?;
        let checklist = self.checklist();
        let previous_experience = checklist.tab(ChecklistTab::PreviousExperience);
        let sic = &self.sic_decision;

        let mut checks = vec![
            Check::validator(SicMayDecide {
                status: self.status,
            }),
            Check::validator(PreviousExperienceSufficient {
                previous_experience,
            }),
            Check::validator(AccessConditionSelected {
                previous_experience_status: previous_experience.status,
                access_condition: sic.access_condition,
                access_condition_year: sic.access_condition_year,
            }),
            Check::validator(FinanceabilityReadyForApproval {
                financeability: checklist.tab(ChecklistTab::Financeability),
            }),
            Check::validator(PersonalDataValidated {
                personal_data: checklist.tab(ChecklistTab::PersonalData),
            }),
            Check::validator(NoImmediateDocumentRequest {
                documents: &self.requested_documents,
            }),
        ];
        match expected {
            RequestType::Admission => checks.push(Check::validator(RequestIsAdmission {
                request_type: self.request_type,
            })),
            RequestType::Enrolment => {
                checks.push(Check::validator(RequestIsEnrolment {
                    request_type: self.request_type,
                }));
                checks.push(Check::validator(SicChecklistReadyForEnrolmentApproval {
                    sic_decision: checklist.tab(ChecklistTab::SicDecision),
                    dispensation_need: sic.dispensation_need,
                }));
                if sic.late_enrolment {
                    checks.push(Check::validator(LateEnrolmentWithAccessCondition {
                        late_enrolment: sic.late_enrolment,
                        access_condition: sic.access_condition,
                    }));
                }
            }
        }
        execute_and_aggregate(checks)?;

        self.checklists.current.set_status(
            ChecklistTab::SicDecision,
            ChecklistStatus::Success,
            ChecklistExtra::new(),
        );
        self.moved_to(PropositionStatus::EnrolmentAuthorised, now, "approve_by_sic");
        Ok(())
    }

    pub fn refuse_by_cdd(
        &mut self,
        reasons: Vec<String>,
        other_reasons: Vec<String>,
        now: DateTime<Utc>,
    ) -> Result<(), MultipleBusinessExceptions> {
        self.ensure_active()?;
        execute_and_aggregate([
            Check::validator(CddMayDecide {
                status: self.status,
            }),
            Check::validator(CddClosedStatusIsFinal {
                cdd_decision: self.checklist().tab(ChecklistTab::CddDecision),
            }),
            Check::validator(CddRefusalReasonSpecified {
                reasons: &reasons,
                other_reasons: &other_reasons,
            }),
        ])?;

        self.cdd_decision.refusal_reasons = reasons;
        self.cdd_decision.other_refusal_reasons = other_reasons;
        self.checklists.current.set_status(
            ChecklistTab::CddDecision,
            ChecklistStatus::Blocked,
            ChecklistExtra::new().with(ChecklistExtra::DECISION, CDD_IN_DECISION),
        );
        self.modified_at = now;
        info!(proposition = %self.id, "CDD refusal recorded");
        Ok(())
    }

    pub fn close_by_cdd(&mut self, now: DateTime<Utc>) -> Result<(), MultipleBusinessExceptions> {
        self.ensure_active()?;
        execute_and_aggregate([
            Check::validator(CddMayDecide {
                status: self.status,
            }),
            Check::validator(CddClosedStatusIsFinal {
                cdd_decision: self.checklist().tab(ChecklistTab::CddDecision),
            }),
        ])?;

        self.checklists.current.set_status(
            ChecklistTab::CddDecision,
            ChecklistStatus::Blocked,
            ChecklistExtra::new().with(ChecklistExtra::DECISION, CDD_CLOSED),
        );
        self.moved_to(PropositionStatus::Closed, now, "close_by_cdd");
        Ok(())
    }

    /// Move the previous experience tab, checking every valorised experience first when it
    /// becomes sufficient.
    pub fn change_previous_experience_status(
        &mut self,
        status: ChecklistStatus,
        extra: ChecklistExtra,
        now: DateTime<Utc>,
    ) -> Result<(), MultipleBusinessExceptions> {
        self.ensure_active()?;
        execute_and_aggregate([
            Check::validator(ExperienceChecklistsValidated {
                target_status: status,
                previous_experience: self.checklist().tab(ChecklistTab::PreviousExperience),
                valorised_experiences: &self.valorised_experiences,
            }),
            Check::validator(AccessConditionSelected {
                previous_experience_status: Some(status),
                access_condition: self.sic_decision.access_condition,
                access_condition_year: self.sic_decision.access_condition_year,
            }),
            Check::validator(AccessTitleSelected {
                previous_experience_status: Some(status),
                selected_titles: &self.faculty_decision.selected_access_titles,
            }),
        ])?;

        self.checklists
            .current
            .set_status(ChecklistTab::PreviousExperience, status, extra);
        self.modified_at = now;
        info!(
            proposition = %self.id,
            status = status.wire_name(),
            "previous experience checklist changed"
        );
        Ok(())
    }

    /// Valorise a curriculum experience. Once submitted, its review node is tracked as well.
    pub fn valorise_experience(
        &mut self,
        experience: ExperienceId,
        now: DateTime<Utc>,
    ) -> Result<(), MultipleBusinessExceptions> {
        self.ensure_active()?;
        if !self.valorised_experiences.contains(&experience) {
            self.valorised_experiences.push(experience);
        }
        if self.submitted_at.is_some() {
            self.checklists.current.add_experience(experience);
        }
        self.modified_at = now;
        info!(proposition = %self.id, %experience, "experience valorised");
        Ok(())
    }

    /// Valorise a copy of `source`, carrying over its review state.
    pub fn duplicate_experience(
        &mut self,
        source: ExperienceId,
        duplicate: ExperienceId,
        now: DateTime<Utc>,
    ) -> Result<(), MultipleBusinessExceptions> {
        self.ensure_active()?;
        if !self.valorised_experiences.contains(&source) {
            return Err(BusinessException::ExperienceNotFound(source.to_string()).into());
        }
        if self.submitted_at.is_some() {
            self.checklists
                .current
                .duplicate_experience(source, duplicate)?;
        }
        if !self.valorised_experiences.contains(&duplicate) {
            self.valorised_experiences.push(duplicate);
        }
        self.modified_at = now;
        info!(proposition = %self.id, %source, %duplicate, "experience duplicated");
        Ok(())
    }

    pub fn remove_experience(
        &mut self,
        experience: ExperienceId,
        now: DateTime<Utc>,
    ) -> Result<(), MultipleBusinessExceptions> {
        self.ensure_active()?;
        if !self.valorised_experiences.contains(&experience) {
            return Err(BusinessException::ExperienceNotFound(experience.to_string()).into());
        }
        if self.submitted_at.is_some() {
            self.checklists.current.remove_experience(experience)?;
        }
        self.valorised_experiences.retain(|tracked| *tracked != experience);
        self.modified_at = now;
        info!(proposition = %self.id, %experience, "experience removed");
        Ok(())
    }
}
