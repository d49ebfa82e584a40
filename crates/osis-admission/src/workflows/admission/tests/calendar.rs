use proptest::prelude::*;

use super::common::*;
use crate::config::EngineConfig;
use crate::workflows::admission::calendar::{
    AdmissionPool, DeterminedPool, EnrolmentPeriod, PoolDeclarations, PoolWindow,
    RegistrationCalendar,
};
use crate::workflows::admission::domain::{Formation, TrainingType};
use crate::workflows::admission::in_memory::{CandidateProfile, InMemoryFormationTranslator};
use crate::workflows::admission::validation::BusinessException;

fn determine(
    today: chrono::NaiveDate,
    formation: &Formation,
    profile: CandidateProfile,
    declarations: Option<&PoolDeclarations>,
) -> Result<DeterminedPool, BusinessException> {
    let titles = titles_for(formation, &profile);
    let candidate = candidate();
    calendar_on(today).determine_year_and_pool(
        &request(formation, &candidate, &titles, declarations),
        &profiles(profile),
    )
}

fn modification(answer: Option<bool>, with_documents: bool) -> PoolDeclarations {
    let documents = if with_documents {
        vec!["document.pdf".to_string()]
    } else {
        Vec::new()
    };
    PoolDeclarations {
        modification: answer,
        modification_form: documents.clone(),
        regular_registration_proof_for_modification: documents,
        ..no_change_declarations()
    }
}

fn reorientation(answer: Option<bool>) -> PoolDeclarations {
    PoolDeclarations {
        reorientation: answer,
        regular_registration_proof: vec!["proof.pdf".to_string()],
        reorientation_form: vec!["form.pdf".to_string()],
        ..no_change_declarations()
    }
}

fn quota(non_resident: Option<bool>) -> PoolDeclarations {
    PoolDeclarations {
        non_resident,
        ..no_change_declarations()
    }
}

#[test]
fn standard_windows_follow_pool_anchors() {
    let reorientation = PoolWindow::standard(AdmissionPool::ExternalReorientation, 2022)
        .expect("reorientation window");
    assert_eq!(reorientation.start, date(2022, 11, 1));
    assert_eq!(reorientation.end, date(2023, 2, 15));

    let regular = PoolWindow::standard(AdmissionPool::Ue5Belgian, 2022).expect("regular window");
    assert_eq!(regular.start, date(2021, 11, 1));
    assert_eq!(regular.end, date(2022, 10, 31));

    let quota = PoolWindow::standard(AdmissionPool::NonResidentQuota, 2023).expect("quota window");
    assert!(quota.is_open(date(2023, 6, 3)));
    assert!(!quota.is_open(date(2023, 6, 4)));
}

#[test]
fn pending_modification_answer_is_not_confirmed() {
    let result = determine(
        modification_window(),
        &bachelor(),
        belgian_profile(),
        Some(&modification(None, false)),
    );
    assert_eq!(
        result,
        Err(BusinessException::ExternalEnrollmentChangeNotConfirmed)
    );
}

#[test]
fn modification_without_documents_is_not_confirmed() {
    let result = determine(
        modification_window(),
        &bachelor(),
        belgian_profile(),
        Some(&modification(Some(true), false)),
    );
    assert_eq!(
        result,
        Err(BusinessException::ExternalEnrollmentChangeNotConfirmed)
    );
}

#[test]
fn confirmed_modification_selects_the_change_pool() {
    let result = determine(
        modification_window(),
        &bachelor(),
        belgian_profile(),
        Some(&modification(Some(true), true)),
    );
    assert_eq!(
        result,
        Ok(DeterminedPool {
            year: 2022,
            pool: AdmissionPool::ExternalEnrollmentChange,
        })
    );
}

#[test]
fn declined_modification_falls_back_to_regular_pool() {
    let result = determine(
        modification_window(),
        &bachelor(),
        belgian_profile(),
        Some(&modification(Some(false), false)),
    );
    assert_eq!(
        result,
        Ok(DeterminedPool {
            year: 2022,
            pool: AdmissionPool::Ue5Belgian,
        })
    );
}

#[test]
fn reorientation_is_scanned_before_regular_pools() {
    let today = date(2022, 12, 15);
    assert_eq!(
        determine(today, &bachelor(), belgian_profile(), Some(&reorientation(None))),
        Err(BusinessException::ReorientationNotConfirmed)
    );
    assert_eq!(
        determine(
            today,
            &bachelor(),
            belgian_profile(),
            Some(&reorientation(Some(true)))
        ),
        Ok(DeterminedPool {
            year: 2022,
            pool: AdmissionPool::ExternalReorientation,
        })
    );
    assert_eq!(
        determine(
            today,
            &bachelor(),
            belgian_profile(),
            Some(&reorientation(Some(false)))
        ),
        Ok(DeterminedPool {
            year: 2023,
            pool: AdmissionPool::Ue5Belgian,
        })
    );
}

#[test]
fn doctorate_needs_no_declarations() {
    let doctorate = formation("SC3DP", 2023, TrainingType::Phd);
    let result = determine(date(2023, 3, 15), &doctorate, belgian_profile(), None);
    assert_eq!(
        result,
        Ok(DeterminedPool {
            year: 2023,
            pool: AdmissionPool::Doctorate,
        })
    );
}

#[test]
fn quota_training_requires_residence_answer() {
    let veterinary = formation("VETE1BA", 2022, TrainingType::Bachelor);
    let result = determine(
        modification_window(),
        &veterinary,
        belgian_profile(),
        Some(&quota(None)),
    );
    assert_eq!(result, Err(BusinessException::ResidenceNotDeclared));
}

#[test]
fn non_resident_quota_candidates_are_refused_when_forbidden() {
    let veterinary = formation("VETE1BA", 2022, TrainingType::Bachelor);
    match determine(
        modification_window(),
        &veterinary,
        belgian_profile(),
        Some(&quota(Some(true))),
    ) {
        Err(BusinessException::ResidenceUnavailableForEnrolment { title_fr, .. }) => {
            assert_eq!(title_fr, "Formation VETE1BA");
        }
        other => panic!("expected residence refusal, got {other:?}"),
    }
}

#[test]
fn non_resident_quota_pool_only_opens_in_june() {
    let veterinary = formation("VETE1BA", 2023, TrainingType::Bachelor);
    let profile = belgian_profile();
    let titles = titles_for(&veterinary, &profile);
    let candidate = candidate();
    let declarations = quota(Some(true));
    let request = request(&veterinary, &candidate, &titles, Some(&declarations));
    let profiles = profiles(profile);

    let config = EngineConfig {
        forbid_non_resident_quota: false,
        ..EngineConfig::default()
    };
    let closed = RegistrationCalendar::standard(date(2023, 5, 20), &config);
    assert_eq!(
        closed.determine_year_and_pool(&request, &profiles),
        Err(BusinessException::NonResidentQuotaPoolNotOpen)
    );

    let open = RegistrationCalendar::standard(date(2023, 6, 2), &config);
    assert_eq!(
        open.determine_year_and_pool(&request, &profiles),
        Ok(DeterminedPool {
            year: 2023,
            pool: AdmissionPool::NonResidentQuota,
        })
    );
}

#[test]
fn incomplete_profile_is_reported_before_scanning() {
    let mut without_nationality = belgian_profile();
    without_nationality.identification.nationality = None;
    assert_eq!(
        determine(
            modification_window(),
            &bachelor(),
            without_nationality,
            Some(&no_change_declarations())
        ),
        Err(BusinessException::IdentificationNotCompleted)
    );

    let mut without_address = belgian_profile();
    without_address.coordinates.legal_address = None;
    assert_eq!(
        determine(
            modification_window(),
            &bachelor(),
            without_address,
            Some(&no_change_declarations())
        ),
        Err(BusinessException::LegalAddressNotCompleted)
    );
}

#[test]
fn no_open_window_means_no_matching_pool() {
    let formation = bachelor();
    let profile = belgian_profile();
    let titles = titles_for(&formation, &profile);
    let candidate = candidate();
    let declarations = no_change_declarations();
    let calendar = RegistrationCalendar::new(Vec::new(), modification_window());

    assert!(calendar.open_pools().is_empty());
    assert_eq!(
        calendar.determine_year_and_pool(
            &request(&formation, &candidate, &titles, Some(&declarations)),
            &profiles(profile),
        ),
        Err(BusinessException::NoMatchingPool)
    );
}

#[test]
fn verify_reports_pool_drift_since_submission() {
    let formation = bachelor();
    let profile = belgian_profile();
    let titles = titles_for(&formation, &profile);
    let candidate = candidate();
    let declarations = no_change_declarations();
    let formations = InMemoryFormationTranslator::default().with(formation.clone());
    let submitted = DeterminedPool {
        year: 2022,
        pool: AdmissionPool::Vip,
    };

    let result = calendar_on(modification_window()).verify(
        &request(&formation, &candidate, &titles, Some(&declarations)),
        Some(submitted),
        &profiles(profile),
        &formations,
    );
    assert_eq!(
        result,
        Err(BusinessException::PoolOrYearMismatch {
            computed_year: 2022,
            computed_pool: AdmissionPool::Ue5Belgian,
            submitted_year: 2022,
            submitted_pool: AdmissionPool::Vip,
        })
    );
}

#[test]
fn verify_requires_the_training_for_the_computed_year() {
    let formation = bachelor();
    let profile = belgian_profile();
    let titles = titles_for(&formation, &profile);
    let candidate = candidate();
    let declarations = no_change_declarations();
    let formations = InMemoryFormationTranslator::default().with(formation.clone());

    let result = calendar_on(date(2022, 12, 15)).verify(
        &request(&formation, &candidate, &titles, Some(&declarations)),
        None,
        &profiles(profile),
        &formations,
    );
    assert_eq!(
        result,
        Err(BusinessException::FormationNotFound {
            acronym: "ECGE1BA".to_string(),
            year: 2023,
        })
    );
}

#[test]
fn medicine_bachelor_is_bound_to_its_enrolment_period() {
    let mut medicine = formation("MD1BA", 2022, TrainingType::Bachelor);
    medicine.is_medicine_or_dentistry = true;
    let profile = belgian_profile();
    let titles = titles_for(&medicine, &profile);
    let candidate = candidate();
    let declarations = no_change_declarations();
    let formations = InMemoryFormationTranslator::default().with(medicine.clone());
    let period = EnrolmentPeriod {
        start: date(2022, 7, 1),
        end: date(2022, 7, 5),
    };

    let result = calendar_on(modification_window())
        .with_medicine_dentistry_period(period)
        .verify(
            &request(&medicine, &candidate, &titles, Some(&declarations)),
            None,
            &profiles(profile),
            &formations,
        );
    assert_eq!(
        result,
        Err(BusinessException::OutsideSpecificEnrolmentPeriod {
            opens_on: date(2022, 7, 1),
        })
    );
}

proptest! {
    #[test]
    fn modification_answer_drives_the_outcome_inside_its_window(day in 1u32..=31) {
        let today = date(2022, 10, day);

        let pending = determine(
            today,
            &bachelor(),
            belgian_profile(),
            Some(&modification(None, false)),
        );
        prop_assert_eq!(pending, Err(BusinessException::ExternalEnrollmentChangeNotConfirmed));

        let confirmed = determine(
            today,
            &bachelor(),
            belgian_profile(),
            Some(&modification(Some(true), true)),
        );
        prop_assert!(confirmed != Err(BusinessException::NoMatchingPool));
        prop_assert_eq!(
            confirmed,
            Ok(DeterminedPool { year: 2022, pool: AdmissionPool::ExternalEnrollmentChange })
        );
    }
}
