use std::collections::BTreeSet;

use chrono::NaiveDate;
use osis_admission::config::EngineConfig;
use osis_admission::workflows::admission::calendar::{PoolDeclarations, PoolRequest};
use osis_admission::workflows::admission::checklist::{
    ChecklistNode, ChecklistStatus, ChecklistTab, GeneralChecklist, InitialChecklistFacts,
    SECONDARY_STUDIES_IDENTIFIER,
};
use osis_admission::workflows::admission::domain::{
    AcademicExperience, AccessCondition, AccessTitles, Address, CandidateId, Coordinates,
    CountryCode, ExperienceId, Formation, FormationIdentity, Identification, TrainingType,
};
use osis_admission::workflows::admission::in_memory::{CandidateProfile, InMemoryCandidateProfiles};
use osis_admission::workflows::admission::validation::checklist::ExperienceChecklistsValidated;
use osis_admission::workflows::admission::validation::curriculum::{
    CurriculumFileProvided, DiplomaEquivalenceProvided,
};
use osis_admission::workflows::admission::validation::decision::FacultyApprovalConditionsSpecified;
use osis_admission::workflows::admission::validation::{
    execute_and_aggregate, BusinessException, BusinessValidator, Check,
};
use osis_admission::workflows::admission::RegistrationCalendar;
use proptest::prelude::*;

fn experience(country: &str, obtained_diploma: bool) -> AcademicExperience {
    AcademicExperience {
        id: ExperienceId::new(),
        name: format!("Studies in {country}"),
        country: CountryCode::new(country),
        obtained_diploma,
        years: vec![2019, 2020, 2021],
        complete: true,
    }
}

#[test]
fn bachelor_needs_no_curriculum_file() {
    let validator = CurriculumFileProvided {
        training_type: TrainingType::Bachelor,
        curriculum_file: &[],
    };
    assert_eq!(validator.validate(), Ok(()));
}

#[test]
fn aggregation_with_foreign_diploma_needs_an_equivalence() {
    let experiences = [experience("FR", true)];
    let validator = DiplomaEquivalenceProvided {
        training_type: TrainingType::Aggregation,
        equivalence: &[],
        academic_experiences: &experiences,
    };
    assert_eq!(
        validator.validate(),
        Err(BusinessException::EquivalenceNotProvided)
    );
}

#[test]
fn previous_experience_success_needs_every_valorised_experience_reviewed() {
    let valorised = ExperienceId::new();
    let mut checklist = GeneralChecklist::initial(&InitialChecklistFacts::default());
    if let Some(secondary) =
        checklist.child_mut(ChecklistTab::PreviousExperience, SECONDARY_STUDIES_IDENTIFIER)
    {
        secondary.status = Some(ChecklistStatus::Success);
    }

    let validator = ExperienceChecklistsValidated {
        target_status: ChecklistStatus::Success,
        previous_experience: checklist.tab(ChecklistTab::PreviousExperience),
        valorised_experiences: &[valorised],
    };
    assert_eq!(
        validator.validate(),
        Err(BusinessException::ExperienceChecklistsNotValidated)
    );
    assert_eq!(validator.pending(), vec![valorised.to_string()]);
}

#[test]
fn quota_training_does_not_skip_the_residence_question() {
    let formation = Formation {
        identity: FormationIdentity::new("VETE1BA", 2022),
        training_type: TrainingType::Bachelor,
        title_fr: "Bachelier en médecine vétérinaire".to_string(),
        title_en: "Bachelor in veterinary medicine".to_string(),
        campus: Some("Namur".to_string()),
        is_medicine_or_dentistry: false,
        awards_scholarships: false,
    };
    let candidate = CandidateId("00054321".to_string());
    let profile = CandidateProfile {
        identification: Identification {
            nationality: Some(CountryCode::new("FR")),
            ..Identification::default()
        },
        coordinates: Coordinates {
            legal_address: Some(Address {
                country: CountryCode::new("BE"),
                city: Some("Namur".to_string()),
                postal_code: Some("5000".to_string()),
            }),
            contact_address: None,
        },
        access_conditions: BTreeSet::from([AccessCondition::ForeignSecondaryDiploma]),
        ..CandidateProfile::default()
    };
    let titles = AccessTitles::compute(formation.training_type, &profile.access_conditions);
    let profiles = InMemoryCandidateProfiles::default().with(candidate.clone(), profile);
    let declarations = PoolDeclarations {
        non_resident: None,
        reorientation: Some(false),
        modification: Some(false),
        ..PoolDeclarations::default()
    };
    let today = NaiveDate::from_ymd_opt(2022, 3, 1).expect("valid date");

    let result = RegistrationCalendar::standard(today, &EngineConfig::default())
        .determine_year_and_pool(
            &PoolRequest {
                formation: &formation,
                candidate: &candidate,
                titles: &titles,
                declarations: Some(&declarations),
            },
            &profiles,
        );
    assert_eq!(result, Err(BusinessException::ResidenceNotDeclared));
}

#[test]
fn aggregation_keeps_failures_in_declaration_order() {
    let node = ChecklistNode::new("Parcours antérieur", ChecklistStatus::InitialCandidate);
    let result = execute_and_aggregate([
        Check::validator(CurriculumFileProvided {
            training_type: TrainingType::MasterMa120,
            curriculum_file: &[],
        }),
        Check::validator(CurriculumFileProvided {
            training_type: TrainingType::Bachelor,
            curriculum_file: &[],
        }),
        Check::validator(ExperienceChecklistsValidated {
            target_status: ChecklistStatus::Success,
            previous_experience: &node,
            valorised_experiences: &[],
        }),
    ]);

    match result {
        Err(failure) => assert_eq!(
            failure.exceptions,
            vec![
                BusinessException::CurriculumFileNotProvided,
                BusinessException::ExperienceChecklistsNotValidated,
            ]
        ),
        other => panic!("expected two failures, got {other:?}"),
    }
}

fn training_type() -> impl Strategy<Value = TrainingType> {
    prop_oneof![
        Just(TrainingType::Bachelor),
        Just(TrainingType::MasterMa120),
        Just(TrainingType::Aggregation),
        Just(TrainingType::Capaes),
        Just(TrainingType::Phd),
    ]
}

proptest! {
    #[test]
    fn equivalence_guard_never_fails_outside_aggregation_and_capaes(
        training_type in training_type(),
        countries in proptest::collection::vec(prop_oneof![Just("BE"), Just("FR"), Just("CA")], 0..4),
    ) {
        prop_assume!(!training_type.is_aggregation_or_capaes());
        let experiences: Vec<_> = countries
            .iter()
            .map(|country| experience(country, true))
            .collect();
        let validator = DiplomaEquivalenceProvided {
            training_type,
            equivalence: &[],
            academic_experiences: &experiences,
        };
        prop_assert_eq!(validator.validate(), Ok(()));
    }

    #[test]
    fn additional_conditions_follow_three_valued_logic(
        answer in proptest::option::of(any::<bool>()),
        conditions in proptest::collection::vec("[a-z]{1,8}", 0..3),
    ) {
        let validator = FacultyApprovalConditionsSpecified {
            with_additional_conditions: answer,
            existing_conditions: &conditions,
            free_conditions: &[],
        };
        let should_fail = answer.is_none() || (answer == Some(true) && conditions.is_empty());
        prop_assert_eq!(validator.validate().is_err(), should_fail);
    }
}
