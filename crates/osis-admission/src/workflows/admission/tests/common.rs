use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::config::EngineConfig;
use crate::workflows::admission::accounting::{Accounting, BankAccountType, SportAffiliation};
use crate::workflows::admission::calendar::{PoolDeclarations, PoolRequest, RegistrationCalendar};
use crate::workflows::admission::domain::{
    AccessCondition, AccessTitles, Address, BelgianSecondaryDiploma, CandidateId, Coordinates,
    CountryCode, Formation, FormationIdentity, GotDiploma, Identification, RequestType,
    SecondaryStudies, TrainingType,
};
use crate::workflows::admission::in_memory::{
    CandidateProfile, InMemoryCandidateProfiles, InMemoryFormationTranslator,
    InMemoryPropositionRepository, InMemorySpecificQuestions,
};
use crate::workflows::admission::proposition::Proposition;
use crate::workflows::admission::service::AdmissionService;

pub(super) type TestService = AdmissionService<
    InMemoryPropositionRepository,
    InMemoryFormationTranslator,
    InMemoryCandidateProfiles,
    InMemoryPropositionRepository,
    InMemorySpecificQuestions,
>;

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2022, 10, 15, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

/// Day inside the external enrolment change window of 2022.
pub(super) fn modification_window() -> NaiveDate {
    date(2022, 10, 15)
}

pub(super) fn candidate() -> CandidateId {
    CandidateId("00012345".to_string())
}

pub(super) fn formation(acronym: &str, year: i32, training_type: TrainingType) -> Formation {
    Formation {
        identity: FormationIdentity::new(acronym, year),
        training_type,
        title_fr: format!("Formation {acronym}"),
        title_en: format!("Training {acronym}"),
        campus: Some("Louvain-la-Neuve".to_string()),
        is_medicine_or_dentistry: false,
        awards_scholarships: false,
    }
}

pub(super) fn bachelor() -> Formation {
    formation("ECGE1BA", 2022, TrainingType::Bachelor)
}

pub(super) fn belgian_address() -> Address {
    Address {
        country: CountryCode::new("BE"),
        city: Some("Louvain-la-Neuve".to_string()),
        postal_code: Some("1348".to_string()),
    }
}

/// Belgian candidate who graduated from a Belgian secondary school in 2021.
pub(super) fn belgian_profile() -> CandidateProfile {
    CandidateProfile {
        identification: Identification {
            first_name: Some("Camille".to_string()),
            last_name: Some("Dupont".to_string()),
            nationality: Some(CountryCode::new("BE")),
            last_ucl_registration_year: None,
        },
        coordinates: Coordinates {
            legal_address: Some(belgian_address()),
            contact_address: None,
        },
        secondary_studies: SecondaryStudies {
            got_diploma: Some(GotDiploma::Yes),
            graduation_year: Some(2021),
            belgian_diploma: Some(BelgianSecondaryDiploma {
                diploma: vec!["diploma.pdf".to_string()],
            }),
            foreign_diploma: None,
            alternative: None,
        },
        access_conditions: BTreeSet::from([AccessCondition::BelgianSecondaryDiploma]),
        ..CandidateProfile::default()
    }
}

pub(super) fn profiles(profile: CandidateProfile) -> InMemoryCandidateProfiles {
    InMemoryCandidateProfiles::default().with(candidate(), profile)
}

pub(super) fn completed_accounting() -> Accounting {
    Accounting {
        attended_recently_french_community: Some(false),
        french_community_study_allowance: Some(false),
        staff_child: Some(false),
        sport_affiliation: Some(SportAffiliation::No),
        solidarity_student: Some(false),
        account_type: Some(BankAccountType::NoAccount),
        ..Accounting::default()
    }
}

/// Answered every pool question negatively.
pub(super) fn no_change_declarations() -> PoolDeclarations {
    PoolDeclarations {
        non_resident: Some(false),
        reorientation: Some(false),
        modification: Some(false),
        ..PoolDeclarations::default()
    }
}

/// Draft for the bachelor, ready to be submitted during the modification window.
pub(super) fn ready_proposition() -> Proposition {
    let mut proposition = Proposition::new(
        bachelor().identity,
        candidate(),
        RequestType::Admission,
        now(),
    );
    proposition.declarations = no_change_declarations();
    proposition.accounting = completed_accounting();
    proposition
}

pub(super) fn titles_for(formation: &Formation, profile: &CandidateProfile) -> AccessTitles {
    AccessTitles::compute(formation.training_type, &profile.access_conditions)
}

pub(super) fn calendar_on(today: NaiveDate) -> RegistrationCalendar {
    RegistrationCalendar::standard(today, &EngineConfig::default())
}

pub(super) fn request<'a>(
    formation: &'a Formation,
    candidate: &'a CandidateId,
    titles: &'a AccessTitles,
    declarations: Option<&'a PoolDeclarations>,
) -> PoolRequest<'a> {
    PoolRequest {
        formation,
        candidate,
        titles,
        declarations,
    }
}

pub(super) fn service_with(
    formations: InMemoryFormationTranslator,
    profiles: InMemoryCandidateProfiles,
    questions: InMemorySpecificQuestions,
) -> (Arc<InMemoryPropositionRepository>, TestService) {
    let repository = Arc::new(InMemoryPropositionRepository::default());
    let service = AdmissionService::new(
        repository.clone(),
        Arc::new(formations),
        Arc::new(profiles),
        repository.clone(),
        Arc::new(questions),
        EngineConfig::default(),
    );
    (repository, service)
}

pub(super) fn bachelor_service() -> (Arc<InMemoryPropositionRepository>, TestService) {
    service_with(
        InMemoryFormationTranslator::default().with(bachelor()),
        profiles(belgian_profile()),
        InMemorySpecificQuestions::default(),
    )
}
