use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};
use osis_admission::config::EngineConfig;
use osis_admission::workflows::admission::accounting::{
    Accounting, BankAccountType, SportAffiliation,
};
use osis_admission::workflows::admission::calendar::PoolDeclarations;
use osis_admission::workflows::admission::checklist::{ChecklistStatus, ChecklistTab};
use osis_admission::workflows::admission::domain::{
    AccessCondition, Address, BelgianSecondaryDiploma, CandidateId, Coordinates, CountryCode,
    Formation, FormationIdentity, GotDiploma, Identification, RequestType, SecondaryStudies,
    TrainingType,
};
use osis_admission::workflows::admission::in_memory::{
    CandidateProfile, InMemoryCandidateProfiles, InMemoryFormationTranslator,
    InMemoryPropositionRepository, InMemorySpecificQuestions,
};
use osis_admission::workflows::admission::ports::PropositionRepository;
use osis_admission::workflows::admission::proposition::FacultyDecision;
use osis_admission::workflows::admission::{
    AdmissionPool, AdmissionService, AdmissionServiceError, BusinessException, DeterminedPool,
    PropositionStatus,
};

fn economics_bachelor() -> Formation {
    Formation {
        identity: FormationIdentity::new("ECGE1BA", 2023),
        training_type: TrainingType::Bachelor,
        title_fr: "Bachelier en sciences économiques et de gestion".to_string(),
        title_en: "Bachelor in economics and management".to_string(),
        campus: Some("Louvain-la-Neuve".to_string()),
        is_medicine_or_dentistry: false,
        awards_scholarships: false,
    }
}

fn candidate() -> CandidateId {
    CandidateId("00098765".to_string())
}

fn profile() -> CandidateProfile {
    CandidateProfile {
        identification: Identification {
            first_name: Some("Alex".to_string()),
            last_name: Some("Martin".to_string()),
            nationality: Some(CountryCode::new("BE")),
            last_ucl_registration_year: None,
        },
        coordinates: Coordinates {
            legal_address: Some(Address {
                country: CountryCode::new("BE"),
                city: Some("Wavre".to_string()),
                postal_code: Some("1300".to_string()),
            }),
            contact_address: None,
        },
        secondary_studies: SecondaryStudies {
            got_diploma: Some(GotDiploma::Yes),
            graduation_year: Some(2022),
            belgian_diploma: Some(BelgianSecondaryDiploma {
                diploma: vec!["cess.pdf".to_string()],
            }),
            foreign_diploma: None,
            alternative: None,
        },
        access_conditions: BTreeSet::from([AccessCondition::BelgianSecondaryDiploma]),
        ..CandidateProfile::default()
    }
}

#[test]
fn bachelor_proposition_travels_from_draft_to_faculty_approval() {
    let today = NaiveDate::from_ymd_opt(2023, 1, 10).expect("valid date");
    let now = Utc
        .with_ymd_and_hms(2023, 1, 10, 14, 0, 0)
        .single()
        .expect("valid timestamp");

    let repository = Arc::new(InMemoryPropositionRepository::default());
    let service = AdmissionService::new(
        repository.clone(),
        Arc::new(InMemoryFormationTranslator::default().with(economics_bachelor())),
        Arc::new(InMemoryCandidateProfiles::default().with(candidate(), profile())),
        repository.clone(),
        Arc::new(InMemorySpecificQuestions::default()),
        EngineConfig::default(),
    );

    let draft = service
        .create(
            economics_bachelor().identity,
            candidate(),
            RequestType::Admission,
            now,
        )
        .expect("draft created");

    match service.submit(&draft.id, today, now) {
        Err(AdmissionServiceError::Business(failure)) => {
            assert!(failure.contains(&BusinessException::ReorientationNotConfirmed));
            assert!(failure.contains(&BusinessException::BankAccountTypeNotSpecified));
        }
        other => panic!("expected incomplete draft, got {other:?}"),
    }

    service
        .declare(
            &draft.id,
            PoolDeclarations {
                non_resident: Some(false),
                reorientation: Some(false),
                modification: Some(false),
                ..PoolDeclarations::default()
            },
            now,
        )
        .expect("declarations recorded");
    let mut stored = service.get(&draft.id).expect("stored draft");
    stored.accounting = Accounting {
        french_community_study_allowance: Some(false),
        staff_child: Some(false),
        sport_affiliation: Some(SportAffiliation::No),
        solidarity_student: Some(false),
        account_type: Some(BankAccountType::NoAccount),
        ..Accounting::default()
    };
    repository.update(stored).expect("accounting recorded");

    assert_eq!(
        service.determine_pool(&draft.id, today).expect("pool"),
        DeterminedPool {
            year: 2023,
            pool: AdmissionPool::Ue5Belgian,
        }
    );
    let submitted = service.submit(&draft.id, today, now).expect("submitted");
    assert_eq!(submitted.status, PropositionStatus::Confirmed);

    service
        .send_to_faculty(&draft.id, now)
        .expect("sent to faculty");
    service
        .specify_faculty_approval(
            &draft.id,
            FacultyDecision {
                with_additional_conditions: Some(false),
                with_training_complements: Some(false),
                program_years: Some(3),
                selected_access_titles: vec!["ETUDES_SECONDAIRES".to_string()],
                ..FacultyDecision::default()
            },
            now,
        )
        .expect("faculty decision recorded");
    let approved = service
        .approve_by_faculty(&draft.id, now)
        .expect("faculty approval");

    assert_eq!(approved.status, PropositionStatus::ReturnedFromFac);
    assert_eq!(
        approved
            .checklists
            .current
            .tab(ChecklistTab::FacultyDecision)
            .status,
        Some(ChecklistStatus::Success)
    );
    assert_eq!(service.get(&draft.id).expect("stored"), approved);
}
