use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;
use tracing::info;

use super::calendar::{
    DeterminedPool, EnrolmentPeriod, PoolDeclarations, PoolRequest, RegistrationCalendar,
};
use super::checklist::{
    ChecklistBlueprint, ChecklistExtra, ChecklistStatus, InitialChecklistFacts, ResolvedStatus,
};
use super::domain::{
    AccessTitles, CandidateId, CountryCode, ExperienceId, Formation, FormationIdentity,
    PropositionId, RequestType,
};
use super::ports::{
    CandidateProfileTranslator, FormationTranslator, MaximumPropositionsService,
    PropositionRepository, RepositoryError, SpecificQuestionsTranslator,
};
use super::proposition::{FacultyDecision, Proposition};
use super::validation::access::PropositionCreationAllowed;
use super::validation::{BusinessException, BusinessValidator, MultipleBusinessExceptions};
use super::verification::PropositionVerifier;
use crate::config::EngineConfig;

/// Use-case service composing the ports, the verifier and the proposition transitions.
pub struct AdmissionService<R, F, P, M, Q> {
    repository: Arc<R>,
    formations: Arc<F>,
    profile: Arc<P>,
    maximum_propositions: Arc<M>,
    questions: Arc<Q>,
    config: EngineConfig,
    medicine_dentistry_period: Option<EnrolmentPeriod>,
}

impl<R, F, P, M, Q> AdmissionService<R, F, P, M, Q>
where
    R: PropositionRepository + 'static,
    F: FormationTranslator + 'static,
    P: CandidateProfileTranslator + 'static,
    M: MaximumPropositionsService + 'static,
    Q: SpecificQuestionsTranslator + 'static,
{
    pub fn new(
        repository: Arc<R>,
        formations: Arc<F>,
        profile: Arc<P>,
        maximum_propositions: Arc<M>,
        questions: Arc<Q>,
        config: EngineConfig,
    ) -> Self {
        Self {
            repository,
            formations,
            profile,
            maximum_propositions,
            questions,
            config,
            medicine_dentistry_period: None,
        }
    }

    pub fn with_medicine_dentistry_period(mut self, period: EnrolmentPeriod) -> Self {
        self.medicine_dentistry_period = Some(period);
        self
    }

    /// Standard registration calendar as seen on `today`.
    pub fn calendar(&self, today: NaiveDate) -> RegistrationCalendar {
        let calendar = RegistrationCalendar::standard(today, &self.config);
        match self.medicine_dentistry_period {
            Some(period) => calendar.with_medicine_dentistry_period(period),
            None => calendar,
        }
    }

    /// Start a draft proposition, refused once the candidate holds too many in progress.
    pub fn create(
        &self,
        formation: FormationIdentity,
        candidate: CandidateId,
        request_type: RequestType,
        now: DateTime<Utc>,
    ) -> Result<Proposition, AdmissionServiceError> {
        self.formation(&formation)?;
        PropositionCreationAllowed {
            in_progress: self.maximum_propositions.in_progress_count(&candidate),
            limit: self.config.max_propositions,
        }
        .validate()?;

        let proposition = Proposition::new(formation, candidate, request_type, now);
        let stored = self.repository.insert(proposition)?;
        info!(proposition = %stored.id, formation = %stored.formation, "proposition created");
        Ok(stored)
    }

    pub fn get(&self, id: &PropositionId) -> Result<Proposition, AdmissionServiceError> {
        let proposition = self.repository.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        Ok(proposition)
    }

    /// Record the candidate's answers to the pool questions of a draft.
    pub fn declare(
        &self,
        id: &PropositionId,
        declarations: PoolDeclarations,
        now: DateTime<Utc>,
    ) -> Result<Proposition, AdmissionServiceError> {
        let mut proposition = self.get(id)?;
        proposition.ensure_in_progress()?;
        proposition.declarations = declarations;
        proposition.modified_at = now;
        self.repository.update(proposition.clone())?;
        Ok(proposition)
    }

    /// Pool and academic year for a training before any proposition exists.
    pub fn determine_pool_for(
        &self,
        formation: &FormationIdentity,
        candidate: &CandidateId,
        today: NaiveDate,
    ) -> Result<DeterminedPool, AdmissionServiceError> {
        let formation = self.formation(formation)?;
        let titles = self.access_titles(&formation, candidate);
        let request = PoolRequest {
            formation: &formation,
            candidate,
            titles: &titles,
            declarations: None,
        };
        let determined = self
            .calendar(today)
            .determine_year_and_pool(&request, self.profile.as_ref())?;
        Ok(determined)
    }

    /// Pool and academic year of a proposition given its current declarations.
    pub fn determine_pool(
        &self,
        id: &PropositionId,
        today: NaiveDate,
    ) -> Result<DeterminedPool, AdmissionServiceError> {
        let proposition = self.get(id)?;
        let formation = self.formation(&proposition.formation)?;
        let titles = self.access_titles(&formation, &proposition.candidate);
        self.pool_of(&proposition, &formation, &titles, today)
    }

    /// Every reason preventing submission, or `Ok(())` when the proposition may be submitted.
    pub fn verify(&self, id: &PropositionId, today: NaiveDate) -> Result<(), AdmissionServiceError> {
        let proposition = self.get(id)?;
        let formation = self.formation(&proposition.formation)?;
        let titles = self.access_titles(&formation, &proposition.candidate);
        self.run_verifier(&proposition, &titles, today)?;
        Ok(())
    }

    /// Verify then submit, recording the determined pool and the initial checklist.
    pub fn submit(
        &self,
        id: &PropositionId,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Proposition, AdmissionServiceError> {
        let mut proposition = self.get(id)?;
        proposition.ensure_in_progress()?;
        let formation = self.formation(&proposition.formation)?;
        let titles = self.access_titles(&formation, &proposition.candidate);

        self.run_verifier(&proposition, &titles, today)?;
        let pool = self.pool_of(&proposition, &formation, &titles, today)?;

        let nationality = self
            .profile
            .identification(&proposition.candidate)
            .nationality;
        let facts = InitialChecklistFacts {
            eu_national: nationality.as_ref().is_some_and(CountryCode::is_eu),
            fees_required: !titles.has_belgian_condition(),
            with_cdd_decision: formation.training_type.is_doctorate(),
            valorised_experiences: proposition.valorised_experiences.clone(),
        };
        proposition.submit(pool, &facts, now)?;
        self.repository.update(proposition.clone())?;
        Ok(proposition)
    }

    pub fn cancel(
        &self,
        id: &PropositionId,
        now: DateTime<Utc>,
    ) -> Result<Proposition, AdmissionServiceError> {
        self.transition(id, |proposition| proposition.cancel(now))
    }

    pub fn send_to_faculty(
        &self,
        id: &PropositionId,
        now: DateTime<Utc>,
    ) -> Result<Proposition, AdmissionServiceError> {
        self.transition(id, |proposition| proposition.send_to_faculty(now))
    }

    pub fn send_back_to_sic(
        &self,
        id: &PropositionId,
        now: DateTime<Utc>,
    ) -> Result<Proposition, AdmissionServiceError> {
        self.transition(id, |proposition| proposition.send_back_to_sic(now))
    }

    pub fn specify_faculty_approval(
        &self,
        id: &PropositionId,
        decision: FacultyDecision,
        now: DateTime<Utc>,
    ) -> Result<Proposition, AdmissionServiceError> {
        self.transition(id, |proposition| {
            proposition.specify_faculty_approval(decision, now)
        })
    }

    pub fn refuse_by_faculty(
        &self,
        id: &PropositionId,
        reasons: Vec<String>,
        other_reasons: Vec<String>,
        now: DateTime<Utc>,
    ) -> Result<Proposition, AdmissionServiceError> {
        self.transition(id, |proposition| {
            proposition.refuse_by_faculty(reasons, other_reasons, now)
        })
    }

    pub fn approve_by_faculty(
        &self,
        id: &PropositionId,
        now: DateTime<Utc>,
    ) -> Result<Proposition, AdmissionServiceError> {
        self.transition(id, |proposition| proposition.approve_by_faculty(now))
    }

    pub fn approve_by_sic(
        &self,
        id: &PropositionId,
        expected: RequestType,
        now: DateTime<Utc>,
    ) -> Result<Proposition, AdmissionServiceError> {
        self.transition(id, |proposition| proposition.approve_by_sic(expected, now))
    }

    pub fn refuse_by_cdd(
        &self,
        id: &PropositionId,
        reasons: Vec<String>,
        other_reasons: Vec<String>,
        now: DateTime<Utc>,
    ) -> Result<Proposition, AdmissionServiceError> {
        self.transition(id, |proposition| {
            proposition.refuse_by_cdd(reasons, other_reasons, now)
        })
    }

    pub fn close_by_cdd(
        &self,
        id: &PropositionId,
        now: DateTime<Utc>,
    ) -> Result<Proposition, AdmissionServiceError> {
        self.transition(id, |proposition| proposition.close_by_cdd(now))
    }

    pub fn change_previous_experience_status(
        &self,
        id: &PropositionId,
        status: ChecklistStatus,
        extra: ChecklistExtra,
        now: DateTime<Utc>,
    ) -> Result<Proposition, AdmissionServiceError> {
        self.transition(id, |proposition| {
            proposition.change_previous_experience_status(status, extra, now)
        })
    }

    pub fn valorise_experience(
        &self,
        id: &PropositionId,
        experience: ExperienceId,
        now: DateTime<Utc>,
    ) -> Result<Proposition, AdmissionServiceError> {
        self.transition(id, |proposition| {
            proposition.valorise_experience(experience, now)
        })
    }

    pub fn duplicate_experience(
        &self,
        id: &PropositionId,
        source: ExperienceId,
        duplicate: ExperienceId,
        now: DateTime<Utc>,
    ) -> Result<Proposition, AdmissionServiceError> {
        self.transition(id, |proposition| {
            proposition.duplicate_experience(source, duplicate, now)
        })
    }

    pub fn remove_experience(
        &self,
        id: &PropositionId,
        experience: ExperienceId,
        now: DateTime<Utc>,
    ) -> Result<Proposition, AdmissionServiceError> {
        self.transition(id, |proposition| {
            proposition.remove_experience(experience, now)
        })
    }

    /// Configured status of every tab of the current checklist.
    pub fn checklist_statuses(
        &self,
        id: &PropositionId,
    ) -> Result<Vec<ResolvedStatus>, AdmissionServiceError> {
        let proposition = self.get(id)?;
        Ok(proposition
            .checklists
            .current
            .resolve(&ChecklistBlueprint::standard()))
    }

    /// Load, apply `change`, and persist only when it succeeded.
    fn transition<T>(
        &self,
        id: &PropositionId,
        change: T,
    ) -> Result<Proposition, AdmissionServiceError>
    where
        T: FnOnce(&mut Proposition) -> Result<(), MultipleBusinessExceptions>,
    {
        let mut proposition = self.get(id)?;
        change(&mut proposition)?;
        self.repository.update(proposition.clone())?;
        Ok(proposition)
    }

    fn formation(&self, identity: &FormationIdentity) -> Result<Formation, BusinessException> {
        self.formations
            .get(&identity.acronym, identity.year)
            .ok_or_else(|| BusinessException::FormationNotFound {
                acronym: identity.acronym.clone(),
                year: identity.year,
            })
    }

    fn access_titles(&self, formation: &Formation, candidate: &CandidateId) -> AccessTitles {
        let held = self.profile.held_access_conditions(candidate);
        AccessTitles::compute(formation.training_type, &held)
    }

    fn pool_of(
        &self,
        proposition: &Proposition,
        formation: &Formation,
        titles: &AccessTitles,
        today: NaiveDate,
    ) -> Result<DeterminedPool, AdmissionServiceError> {
        let request = PoolRequest {
            formation,
            candidate: &proposition.candidate,
            titles,
            declarations: Some(&proposition.declarations),
        };
        let determined = self
            .calendar(today)
            .determine_year_and_pool(&request, self.profile.as_ref())?;
        Ok(determined)
    }

    fn run_verifier(
        &self,
        proposition: &Proposition,
        titles: &AccessTitles,
        today: NaiveDate,
    ) -> Result<(), MultipleBusinessExceptions> {
        let calendar = self.calendar(today);
        PropositionVerifier {
            formations: self.formations.as_ref(),
            profile: self.profile.as_ref(),
            calendar: &calendar,
            maximum_propositions: self.maximum_propositions.as_ref(),
            questions: self.questions.as_ref(),
            config: &self.config,
        }
        .verify(proposition, titles)
    }
}

/// Error raised by the admission service.
#[derive(Debug, thiserror::Error)]
pub enum AdmissionServiceError {
    #[error(transparent)]
    Business(#[from] MultipleBusinessExceptions),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<BusinessException> for AdmissionServiceError {
    fn from(value: BusinessException) -> Self {
        Self::Business(value.into())
    }
}

impl AdmissionServiceError {
    /// Status codes of the business failures, empty for repository errors.
    pub fn status_codes(&self) -> Vec<&'static str> {
        match self {
            Self::Business(failure) => failure.status_codes(),
            Self::Repository(_) => Vec::new(),
        }
    }
}
