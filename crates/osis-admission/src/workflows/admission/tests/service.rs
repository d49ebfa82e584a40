use super::common::*;
use crate::workflows::admission::accounting::Accounting;
use crate::workflows::admission::calendar::{AdmissionPool, DeterminedPool};
use crate::workflows::admission::checklist::{ChecklistStatus, ChecklistTab};
use crate::workflows::admission::domain::{
    ExperienceId, FormationIdentity, PropositionId, RequestType, TrainingType,
};
use crate::workflows::admission::in_memory::{InMemoryFormationTranslator, InMemorySpecificQuestions};
use crate::workflows::admission::ports::{PropositionRepository, RepositoryError};
use crate::workflows::admission::proposition::PropositionStatus;
use crate::workflows::admission::service::AdmissionServiceError;
use crate::workflows::admission::validation::BusinessException;

#[test]
fn create_starts_a_draft() {
    let (repository, service) = bachelor_service();
    let created = service
        .create(bachelor().identity, candidate(), RequestType::Admission, now())
        .expect("draft created");

    assert_eq!(created.status, PropositionStatus::Draft);
    let stored = repository
        .fetch(&created.id)
        .expect("repository available")
        .expect("draft stored");
    assert_eq!(stored, created);
}

#[test]
fn create_refuses_unknown_training() {
    let (_, service) = bachelor_service();
    match service.create(
        FormationIdentity::new("UNKNOWN1BA", 2022),
        candidate(),
        RequestType::Admission,
        now(),
    ) {
        Err(error) => assert_eq!(error.status_codes(), vec!["ADMISSION-7"]),
        other => panic!("expected missing training, got {other:?}"),
    }
}

#[test]
fn create_is_capped_by_propositions_in_progress() {
    let (_, service) = bachelor_service();
    for _ in 0..5 {
        service
            .create(bachelor().identity, candidate(), RequestType::Admission, now())
            .expect("below the limit");
    }

    match service.create(bachelor().identity, candidate(), RequestType::Admission, now()) {
        Err(AdmissionServiceError::Business(failure)) => assert_eq!(
            failure.exceptions,
            vec![BusinessException::MaximumPropositionsReached]
        ),
        other => panic!("expected limit failure, got {other:?}"),
    }
}

#[test]
fn submit_confirms_and_persists_the_pool() {
    let (repository, service) = bachelor_service();
    let draft = repository
        .insert(ready_proposition())
        .expect("draft stored");

    let submitted = service
        .submit(&draft.id, modification_window(), now())
        .expect("complete draft is submitted");
    assert_eq!(submitted.status, PropositionStatus::Confirmed);
    assert_eq!(
        submitted.submitted_pool,
        Some(DeterminedPool {
            year: 2022,
            pool: AdmissionPool::Ue5Belgian,
        })
    );
    assert_eq!(
        submitted
            .checklists
            .initial
            .tab(ChecklistTab::Assimilation)
            .status,
        Some(ChecklistStatus::InitialNotConcerned)
    );

    let stored = service.get(&draft.id).expect("stored proposition");
    assert_eq!(stored, submitted);
}

#[test]
fn failed_submission_leaves_the_draft_untouched() {
    let (repository, service) = bachelor_service();
    let mut draft = ready_proposition();
    draft.accounting = Accounting::default();
    let draft = repository.insert(draft).expect("draft stored");

    match service.submit(&draft.id, modification_window(), now()) {
        Err(AdmissionServiceError::Business(failure)) => {
            assert!(failure.contains(&BusinessException::BankAccountTypeNotSpecified));
        }
        other => panic!("expected business failure, got {other:?}"),
    }

    let stored = service.get(&draft.id).expect("stored proposition");
    assert_eq!(stored.status, PropositionStatus::Draft);
    assert_eq!(stored.submitted_pool, None);
}

#[test]
fn submitted_propositions_count_against_the_candidate() {
    let (repository, service) = bachelor_service();
    for _ in 0..2 {
        let mut earlier = ready_proposition();
        earlier.status = PropositionStatus::Confirmed;
        repository.insert(earlier).expect("earlier proposition stored");
    }
    let draft = repository
        .insert(ready_proposition())
        .expect("draft stored");

    match service.submit(&draft.id, modification_window(), now()) {
        Err(AdmissionServiceError::Business(failure)) => assert_eq!(
            failure.exceptions,
            vec![BusinessException::SubmittedPropositionsLimitExceeded]
        ),
        other => panic!("expected submission limit, got {other:?}"),
    }
}

#[test]
fn unknown_proposition_is_a_repository_error() {
    let (_, service) = bachelor_service();
    match service.get(&PropositionId::new()) {
        Err(AdmissionServiceError::Repository(RepositoryError::NotFound)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn cancelled_proposition_cannot_be_submitted() {
    let (repository, service) = bachelor_service();
    let draft = repository
        .insert(ready_proposition())
        .expect("draft stored");
    service.cancel(&draft.id, now()).expect("draft cancelled");

    match service.submit(&draft.id, modification_window(), now()) {
        Err(AdmissionServiceError::Business(failure)) => assert_eq!(
            failure.exceptions,
            vec![BusinessException::PropositionCancelled]
        ),
        other => panic!("expected cancelled proposition, got {other:?}"),
    }
}

#[test]
fn doctorate_pool_is_known_before_any_proposition() {
    let doctorate = formation("SC3DP", 2023, TrainingType::Phd);
    let (_, service) = service_with(
        InMemoryFormationTranslator::default().with(doctorate.clone()),
        profiles(belgian_profile()),
        InMemorySpecificQuestions::default(),
    );

    let determined = service
        .determine_pool_for(&doctorate.identity, &candidate(), date(2023, 3, 15))
        .expect("doctorate pool");
    assert_eq!(
        determined,
        DeterminedPool {
            year: 2023,
            pool: AdmissionPool::Doctorate,
        }
    );
}

#[test]
fn experiences_follow_the_checklist_once_submitted() {
    let (repository, service) = bachelor_service();
    let reviewed = ExperienceId::new();
    let mut draft = ready_proposition();
    draft.valorised_experiences.push(reviewed);
    let draft = repository.insert(draft).expect("draft stored");
    service
        .submit(&draft.id, modification_window(), now())
        .expect("complete draft is submitted");

    let mut stored = service.get(&draft.id).expect("stored proposition");
    if let Some(node) = stored
        .checklists
        .current
        .child_mut(ChecklistTab::PreviousExperience, &reviewed.to_string())
    {
        node.status = Some(ChecklistStatus::Success);
    }
    repository.update(stored).expect("review recorded");

    let copy = ExperienceId::new();
    let updated = service
        .duplicate_experience(&draft.id, reviewed, copy, now())
        .expect("valorised experience is duplicated");
    assert_eq!(updated.valorised_experiences, vec![reviewed, copy]);
    assert_eq!(
        updated
            .checklists
            .current
            .child(ChecklistTab::PreviousExperience, &copy.to_string())
            .and_then(|node| node.status),
        Some(ChecklistStatus::Success)
    );

    let added = ExperienceId::new();
    service
        .valorise_experience(&draft.id, added, now())
        .expect("experience valorised");
    let updated = service
        .remove_experience(&draft.id, reviewed, now())
        .expect("experience removed");
    assert_eq!(updated.valorised_experiences, vec![copy, added]);
    assert!(updated
        .checklists
        .current
        .child(ChecklistTab::PreviousExperience, &reviewed.to_string())
        .is_none());

    let statuses = service
        .checklist_statuses(&draft.id)
        .expect("stored proposition");
    let added_identifier = added.to_string();
    assert!(statuses.iter().any(|entry| {
        entry.experience.as_deref() == Some(added_identifier.as_str())
            && entry.status == Some("A_TRAITER")
    }));
}

#[test]
fn unknown_experience_leaves_the_proposition_untouched() {
    let (repository, service) = bachelor_service();
    let draft = repository
        .insert(ready_proposition())
        .expect("draft stored");
    let missing = ExperienceId::new();

    match service.duplicate_experience(&draft.id, missing, ExperienceId::new(), now()) {
        Err(AdmissionServiceError::Business(failure)) => assert_eq!(
            failure.exceptions,
            vec![BusinessException::ExperienceNotFound(missing.to_string())]
        ),
        other => panic!("expected unknown experience, got {other:?}"),
    }
    let stored = service.get(&draft.id).expect("stored proposition");
    assert!(stored.valorised_experiences.is_empty());
}
