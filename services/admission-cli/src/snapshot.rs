use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use osis_admission::config::EngineConfig;
use osis_admission::error::AppError;
use osis_admission::workflows::admission::calendar::{EnrolmentPeriod, PoolRequest};
use osis_admission::workflows::admission::domain::{AccessTitles, Formation, SpecificQuestion};
use osis_admission::workflows::admission::in_memory::{
    CandidateProfile, FixedPropositionCounts, InMemoryCandidateProfiles,
    InMemoryFormationTranslator, InMemorySpecificQuestions,
};
use osis_admission::workflows::admission::ports::FormationTranslator;
use osis_admission::workflows::admission::{
    BusinessException, DeterminedPool, MultipleBusinessExceptions, Proposition,
    PropositionVerifier, RegistrationCalendar,
};
use serde::Deserialize;
use tracing::debug;

/// Everything the engine reads for one proposition, as exported by the admission back office.
#[derive(Debug, Deserialize)]
pub(crate) struct AdmissionSnapshot {
    pub(crate) formations: Vec<Formation>,
    #[serde(default)]
    pub(crate) profile: CandidateProfile,
    pub(crate) proposition: Proposition,
    #[serde(default)]
    pub(crate) questions: Vec<SpecificQuestion>,
    #[serde(default)]
    pub(crate) counts: FixedPropositionCounts,
    #[serde(default)]
    pub(crate) medicine_dentistry_period: Option<EnrolmentPeriod>,
}

/// Snapshot collaborators wired as read-only ports.
struct Ports {
    formations: InMemoryFormationTranslator,
    profiles: InMemoryCandidateProfiles,
    questions: InMemorySpecificQuestions,
}

impl AdmissionSnapshot {
    pub(crate) fn load(path: &Path) -> Result<Self, AppError> {
        let raw = fs::read_to_string(path)?;
        let snapshot: Self = serde_json::from_str(&raw)?;
        debug!(
            path = %path.display(),
            proposition = %snapshot.proposition.id,
            formations = snapshot.formations.len(),
            "snapshot loaded"
        );
        Ok(snapshot)
    }

    fn ports(&self) -> Ports {
        let proposition = &self.proposition;
        Ports {
            formations: InMemoryFormationTranslator::new(self.formations.iter().cloned()),
            profiles: InMemoryCandidateProfiles::default()
                .with(proposition.candidate.clone(), self.profile.clone()),
            questions: InMemorySpecificQuestions::default()
                .with(proposition.formation.clone(), self.questions.clone()),
        }
    }

    fn calendar(&self, today: NaiveDate, config: &EngineConfig) -> RegistrationCalendar {
        let calendar = RegistrationCalendar::standard(today, config);
        match self.medicine_dentistry_period {
            Some(period) => calendar.with_medicine_dentistry_period(period),
            None => calendar,
        }
    }

    fn formation(&self, ports: &Ports) -> Result<Formation, BusinessException> {
        let identity = &self.proposition.formation;
        ports
            .formations
            .get(&identity.acronym, identity.year)
            .ok_or_else(|| BusinessException::FormationNotFound {
                acronym: identity.acronym.clone(),
                year: identity.year,
            })
    }

    fn titles(&self, formation: &Formation) -> AccessTitles {
        AccessTitles::compute(formation.training_type, &self.profile.access_conditions)
    }

    /// Pool and academic year of the proposition given its declarations.
    pub(crate) fn determine_pool(
        &self,
        today: NaiveDate,
        config: &EngineConfig,
    ) -> Result<DeterminedPool, BusinessException> {
        let ports = self.ports();
        let formation = self.formation(&ports)?;
        let titles = self.titles(&formation);
        let request = PoolRequest {
            formation: &formation,
            candidate: &self.proposition.candidate,
            titles: &titles,
            declarations: Some(&self.proposition.declarations),
        };
        self.calendar(today, config)
            .determine_year_and_pool(&request, &ports.profiles)
    }

    /// Every reason the proposition may not be submitted on `today`.
    pub(crate) fn verify(
        &self,
        today: NaiveDate,
        config: &EngineConfig,
    ) -> Result<(), MultipleBusinessExceptions> {
        let ports = self.ports();
        let formation = self.formation(&ports)?;
        let titles = self.titles(&formation);
        let calendar = self.calendar(today, config);
        PropositionVerifier {
            formations: &ports.formations,
            profile: &ports.profiles,
            calendar: &calendar,
            maximum_propositions: &self.counts,
            questions: &ports.questions,
            config,
        }
        .verify(&self.proposition, &titles)
    }
}
