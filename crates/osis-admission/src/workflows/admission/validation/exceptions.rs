use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

use crate::workflows::admission::calendar::AdmissionPool;
use crate::workflows::admission::domain::{ExperienceId, QuestionTab};

/// One violated business rule. Each variant carries a stable status code for the UI layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BusinessException {
    #[error("the access conditions for this training are not met")]
    AccessConditionsNotMet,
    #[error("mandatory specific questions of the '{}' tab are not answered", .tab.label())]
    SpecificQuestionsNotCompleted { tab: QuestionTab },
    #[error("training {acronym} does not exist for academic year {year}")]
    FormationNotFound { acronym: String, year: i32 },
    #[error("the external reorientation must be confirmed with its supporting documents")]
    ReorientationNotConfirmed,
    #[error("the external enrollment change must be confirmed with its supporting documents")]
    ExternalEnrollmentChangeNotConfirmed,
    #[error("the non-resident quota window is not open")]
    NonResidentQuotaPoolNotOpen,
    #[error("residence within the meaning of the decree is not declared")]
    ResidenceNotDeclared,
    #[error("no admission pool matches the candidate at this date")]
    NoMatchingPool,
    #[error(
        "computed pool {} for {computed_year} differs from submitted pool {} for {submitted_year}",
        .computed_pool.wire_name(),
        .submitted_pool.wire_name()
    )]
    PoolOrYearMismatch {
        computed_year: i32,
        computed_pool: AdmissionPool,
        submitted_year: i32,
        submitted_pool: AdmissionPool,
    },
    #[error("the number of submitted propositions is exceeded")]
    SubmittedPropositionsLimitExceeded,
    #[error("proposition not found")]
    PropositionNotFound,
    #[error("non-resident enrolment in {title_en} cannot be handled online")]
    ResidenceUnavailableForEnrolment { title_fr: String, title_en: String },
    #[error("experience {0} not found")]
    ExperienceNotFound(String),
    #[error("the application cannot be submitted before {opens_on}")]
    OutsideSpecificEnrolmentPeriod { opens_on: NaiveDate },
    #[error("maximum number of propositions reached")]
    MaximumPropositionsReached,
    #[error("identification is not completed")]
    IdentificationNotCompleted,
    #[error("legal address is not completed")]
    LegalAddressNotCompleted,
    #[error("curriculum file is not provided")]
    CurriculumFileNotProvided,
    #[error(
        "curriculum does not cover {} to {}",
        .start.format("%m/%Y"),
        .end.format("%m/%Y")
    )]
    CurriculumYearsNotSpecified { start: NaiveDate, end: NaiveDate },
    #[error("absence of debt is not completed")]
    AbsenceOfDebtNotCompleted,
    #[error("reduced tuition fee information is not completed")]
    ReducedTuitionFeeNotCompleted,
    #[error("assimilation is not completed")]
    AssimilationNotCompleted,
    #[error("affiliations are not completed")]
    AffiliationsNotCompleted,
    #[error("IBAN refund account is not completed")]
    IbanAccountNotCompleted,
    #[error("refund account in another format is not completed")]
    OtherFormatAccountNotCompleted,
    #[error("academic experience '{name}' is not completed")]
    AcademicExperienceNotCompleted { reference: ExperienceId, name: String },
    #[error("refund account type is not specified")]
    BankAccountTypeNotSpecified,
    #[error("an access title must be selected")]
    AccessTitleNotSelected,
    #[error("an access condition and its year must be selected")]
    AccessConditionNotSelected,
    #[error("an access title must be selected before sending to SIC")]
    AccessTitleRequiredToSendToSic,
    #[error("previous experience is not sufficient")]
    PreviousExperienceNotSufficient,
    #[error("a document is requested immediately")]
    ImmediateDocumentRequestPending,
    #[error("a late enrolment requires an access condition")]
    LateEnrolmentWithAccessCondition,
    #[error("training complements must be empty when none are required")]
    TrainingComplementsMustBeEmpty,
    #[error("the request must be an admission")]
    RequestMustBeAdmission,
    #[error("the request must be an enrolment")]
    RequestMustBeEnrolment,
    #[error("SIC decision checklist does not allow approving the enrolment")]
    SicDecisionChecklistNotReady,
    #[error("financeability checklist does not allow approving the request")]
    FinanceabilityChecklistNotReady,
    #[error("the proposition is not in a SIC situation")]
    NotInSicSituation,
    #[error("the proposition is not in a CDD situation")]
    NotInCddSituation,
    #[error("every valorised experience must be validated in the checklist")]
    ExperienceChecklistsNotValidated,
    #[error("a CDD refusal reason must be specified")]
    CddRefusalReasonNotSpecified,
    #[error("the CDD decision is closed")]
    CddDecisionClosed,
    #[error("personal data checklist is not validated")]
    PersonalDataChecklistNotValidated,
    #[error("secondary studies are not completed")]
    SecondaryStudiesNotCompleted,
    #[error("Belgian secondary diploma is not provided")]
    BelgianSecondaryDiplomaMissing,
    #[error("foreign secondary diploma is not provided")]
    ForeignSecondaryDiplomaMissing,
    #[error("translation of the foreign secondary diploma is not provided")]
    ForeignSecondaryDiplomaTranslationMissing,
    #[error("equivalence decision of the foreign secondary diploma is not provided")]
    ForeignSecondaryDiplomaEquivalenceMissing,
    #[error("transcript of the foreign secondary diploma is not provided")]
    ForeignSecondaryDiplomaTranscriptMissing,
    #[error("first cycle admission exam certificate is not provided")]
    AlternativeSecondaryStudiesNotCompleted,
    #[error("diploma equivalence is not provided")]
    EquivalenceNotProvided,
    #[error("a faculty refusal reason must be specified")]
    FacultyRefusalReasonNotSpecified,
    #[error("faculty approval information is not specified")]
    FacultyApprovalInformationNotSpecified,
    #[error("the proposition is not in a faculty situation")]
    NotInFacultySituation,
    #[error("the proposition is cancelled")]
    PropositionCancelled,
    #[error("the proposition is already submitted")]
    PropositionAlreadySubmitted,
}

impl BusinessException {
    pub fn status_code(&self) -> &'static str {
        match self {
            Self::AccessConditionsNotMet => "ADMISSION-2",
            Self::SpecificQuestionsNotCompleted { tab } => match tab {
                QuestionTab::TrainingChoice => "ADMISSION-3",
                QuestionTab::Curriculum => "ADMISSION-4",
                QuestionTab::SecondaryStudies => "ADMISSION-5",
                QuestionTab::AdditionalInformation => "ADMISSION-6",
            },
            Self::FormationNotFound { .. } => "ADMISSION-7",
            Self::ReorientationNotConfirmed => "ADMISSION-8",
            Self::ExternalEnrollmentChangeNotConfirmed => "ADMISSION-9",
            Self::NonResidentQuotaPoolNotOpen => "ADMISSION-10",
            Self::ResidenceNotDeclared => "ADMISSION-11",
            Self::NoMatchingPool => "ADMISSION-12",
            Self::PoolOrYearMismatch { .. } => "ADMISSION-13",
            Self::SubmittedPropositionsLimitExceeded => "ADMISSION-15",
            Self::PropositionNotFound => "ADMISSION-16",
            Self::ResidenceUnavailableForEnrolment { .. } => "ADMISSION-20",
            Self::ExperienceNotFound(_) => "ADMISSION-22",
            Self::OutsideSpecificEnrolmentPeriod { .. } => "ADMISSION-24",
            Self::MaximumPropositionsReached => "PROPOSITION-1",
            Self::IdentificationNotCompleted => "PROPOSITION-25",
            Self::LegalAddressNotCompleted => "PROPOSITION-31",
            Self::CurriculumFileNotProvided => "PROPOSITION-34",
            Self::CurriculumYearsNotSpecified { .. } => "PROPOSITION-35",
            Self::AbsenceOfDebtNotCompleted => "PROPOSITION-43",
            Self::ReducedTuitionFeeNotCompleted => "PROPOSITION-44",
            Self::AssimilationNotCompleted => "PROPOSITION-45",
            Self::AffiliationsNotCompleted => "PROPOSITION-46",
            Self::IbanAccountNotCompleted => "PROPOSITION-47",
            Self::OtherFormatAccountNotCompleted => "PROPOSITION-48",
            Self::AcademicExperienceNotCompleted { .. } => "PROPOSITION-49",
            Self::BankAccountTypeNotSpecified => "PROPOSITION-50",
            Self::AccessTitleNotSelected => "PROPOSITION-53",
            Self::AccessConditionNotSelected => "PROPOSITION-54",
            Self::AccessTitleRequiredToSendToSic => "PROPOSITION-56",
            Self::PreviousExperienceNotSufficient => "PROPOSITION-57",
            Self::ImmediateDocumentRequestPending => "PROPOSITION-58",
            Self::LateEnrolmentWithAccessCondition => "PROPOSITION-59",
            Self::TrainingComplementsMustBeEmpty => "PROPOSITION-60",
            Self::RequestMustBeAdmission => "PROPOSITION-61",
            Self::RequestMustBeEnrolment => "PROPOSITION-62",
            Self::SicDecisionChecklistNotReady => "PROPOSITION-63",
            Self::FinanceabilityChecklistNotReady => "PROPOSITION-64",
            Self::NotInSicSituation => "PROPOSITION-67",
            Self::NotInCddSituation => "PROPOSITION-68",
            Self::ExperienceChecklistsNotValidated => "PROPOSITION-69",
            Self::CddRefusalReasonNotSpecified => "PROPOSITION-70",
            Self::CddDecisionClosed => "PROPOSITION-71",
            Self::PersonalDataChecklistNotValidated => "PROPOSITION-72",
            Self::SecondaryStudiesNotCompleted => "FORMATION-GENERALE-1",
            Self::BelgianSecondaryDiplomaMissing => "FORMATION-GENERALE-2",
            Self::ForeignSecondaryDiplomaMissing => "FORMATION-GENERALE-3",
            Self::ForeignSecondaryDiplomaTranslationMissing => "FORMATION-GENERALE-4",
            Self::ForeignSecondaryDiplomaEquivalenceMissing => "FORMATION-GENERALE-5",
            Self::ForeignSecondaryDiplomaTranscriptMissing => "FORMATION-GENERALE-6",
            Self::AlternativeSecondaryStudiesNotCompleted => "FORMATION-GENERALE-7",
            Self::EquivalenceNotProvided => "FORMATION-GENERALE-8",
            Self::FacultyRefusalReasonNotSpecified => "FORMATION-GENERALE-9",
            Self::FacultyApprovalInformationNotSpecified => "FORMATION-GENERALE-10",
            Self::NotInFacultySituation => "FORMATION-GENERALE-11",
            Self::PropositionCancelled => "FORMATION-GENERALE-12",
            Self::PropositionAlreadySubmitted => "FORMATION-GENERALE-13",
        }
    }

    pub fn report(&self) -> ExceptionReport {
        ExceptionReport {
            status_code: self.status_code(),
            message: self.to_string(),
        }
    }
}

/// Serializable view of an exception for callers rendering errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExceptionReport {
    pub status_code: &'static str,
    pub message: String,
}

/// Every exception raised during one validation pass, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MultipleBusinessExceptions {
    pub exceptions: Vec<BusinessException>,
}

impl MultipleBusinessExceptions {
    pub fn new(exceptions: Vec<BusinessException>) -> Self {
        Self { exceptions }
    }

    pub fn is_empty(&self) -> bool {
        self.exceptions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.exceptions.len()
    }

    pub fn contains(&self, exception: &BusinessException) -> bool {
        self.exceptions.contains(exception)
    }

    pub fn status_codes(&self) -> Vec<&'static str> {
        self.exceptions
            .iter()
            .map(BusinessException::status_code)
            .collect()
    }

    pub fn reports(&self) -> Vec<ExceptionReport> {
        self.exceptions
            .iter()
            .map(BusinessException::report)
            .collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BusinessException> {
        self.exceptions.iter()
    }
}

impl fmt::Display for MultipleBusinessExceptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} business rule(s) violated", self.exceptions.len())?;
        for exception in &self.exceptions {
            write!(f, "; [{}] {}", exception.status_code(), exception)?;
        }
        Ok(())
    }
}

impl std::error::Error for MultipleBusinessExceptions {}

impl From<BusinessException> for MultipleBusinessExceptions {
    fn from(value: BusinessException) -> Self {
        Self {
            exceptions: vec![value],
        }
    }
}

impl IntoIterator for MultipleBusinessExceptions {
    type Item = BusinessException;
    type IntoIter = std::vec::IntoIter<BusinessException>;

    fn into_iter(self) -> Self::IntoIter {
        self.exceptions.into_iter()
    }
}
