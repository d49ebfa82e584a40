//! In-memory adapters of the ports, used by tests and the CLI.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Mutex, PoisonError};

use super::domain::{
    AccessCondition, CandidateId, Coordinates, Curriculum, Formation, FormationIdentity,
    Identification, PropositionId, SecondaryStudies, SpecificQuestion,
};
use super::ports::{
    CandidateProfileTranslator, FormationTranslator, MaximumPropositionsService,
    PropositionRepository, RepositoryError, SpecificQuestionsTranslator,
};
use super::proposition::{Proposition, PropositionStatus};

#[derive(Debug, Clone, Default)]
pub struct InMemoryFormationTranslator {
    formations: BTreeMap<FormationIdentity, Formation>,
}

impl InMemoryFormationTranslator {
    pub fn new(formations: impl IntoIterator<Item = Formation>) -> Self {
        Self {
            formations: formations
                .into_iter()
                .map(|formation| (formation.identity.clone(), formation))
                .collect(),
        }
    }

    pub fn with(mut self, formation: Formation) -> Self {
        self.formations.insert(formation.identity.clone(), formation);
        self
    }
}

impl FormationTranslator for InMemoryFormationTranslator {
    fn get(&self, acronym: &str, year: i32) -> Option<Formation> {
        self.formations
            .get(&FormationIdentity::new(acronym, year))
            .cloned()
    }
}

/// Everything known about one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateProfile {
    pub identification: Identification,
    pub coordinates: Coordinates,
    pub secondary_studies: SecondaryStudies,
    pub curriculum: Curriculum,
    pub access_conditions: BTreeSet<AccessCondition>,
    /// Academic years in which the candidate changed institute.
    pub institute_changes: BTreeSet<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryCandidateProfiles {
    profiles: BTreeMap<CandidateId, CandidateProfile>,
}

impl InMemoryCandidateProfiles {
    pub fn with(mut self, candidate: CandidateId, profile: CandidateProfile) -> Self {
        self.profiles.insert(candidate, profile);
        self
    }

    /// Unknown candidates read as an empty profile.
    fn profile(&self, candidate: &CandidateId) -> CandidateProfile {
        self.profiles.get(candidate).cloned().unwrap_or_default()
    }
}

impl CandidateProfileTranslator for InMemoryCandidateProfiles {
    fn identification(&self, candidate: &CandidateId) -> Identification {
        self.profile(candidate).identification
    }

    fn coordinates(&self, candidate: &CandidateId) -> Coordinates {
        self.profile(candidate).coordinates
    }

    fn secondary_studies(&self, candidate: &CandidateId) -> SecondaryStudies {
        self.profile(candidate).secondary_studies
    }

    fn curriculum(&self, candidate: &CandidateId) -> Curriculum {
        self.profile(candidate).curriculum
    }

    fn held_access_conditions(&self, candidate: &CandidateId) -> BTreeSet<AccessCondition> {
        self.profile(candidate).access_conditions
    }

    fn institute_changes(&self, candidate: &CandidateId, years: &[i32]) -> BTreeMap<i32, bool> {
        let changes = self
            .profiles
            .get(candidate)
            .map(|profile| &profile.institute_changes);
        years
            .iter()
            .map(|year| (*year, changes.is_some_and(|changes| changes.contains(year))))
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemorySpecificQuestions {
    questions: BTreeMap<FormationIdentity, Vec<SpecificQuestion>>,
}

impl InMemorySpecificQuestions {
    pub fn with(mut self, formation: FormationIdentity, questions: Vec<SpecificQuestion>) -> Self {
        self.questions.insert(formation, questions);
        self
    }
}

impl SpecificQuestionsTranslator for InMemorySpecificQuestions {
    fn questions(&self, formation: &FormationIdentity) -> Vec<SpecificQuestion> {
        self.questions.get(formation).cloned().unwrap_or_default()
    }
}

/// Fixed proposition counts, for callers that only hold a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedPropositionCounts {
    pub submitted: usize,
    pub in_progress: usize,
}

impl MaximumPropositionsService for FixedPropositionCounts {
    fn submitted_count(&self, _candidate: &CandidateId) -> usize {
        self.submitted
    }

    fn in_progress_count(&self, _candidate: &CandidateId) -> usize {
        self.in_progress
    }
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryPropositionRepository {
    records: Arc<Mutex<HashMap<PropositionId, Proposition>>>,
}

impl InMemoryPropositionRepository {
    fn count(&self, candidate: &CandidateId, keep: impl Fn(PropositionStatus) -> bool) -> usize {
        let guard = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        guard
            .values()
            .filter(|proposition| &proposition.candidate == candidate && keep(proposition.status))
            .count()
    }
}

impl PropositionRepository for InMemoryPropositionRepository {
    fn insert(&self, proposition: Proposition) -> Result<Proposition, RepositoryError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))?;
        if guard.contains_key(&proposition.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(proposition.id, proposition.clone());
        Ok(proposition)
    }

    fn update(&self, proposition: Proposition) -> Result<(), RepositoryError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))?;
        match guard.get_mut(&proposition.id) {
            Some(stored) => {
                *stored = proposition;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &PropositionId) -> Result<Option<Proposition>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))?;
        Ok(guard.get(id).cloned())
    }

    fn for_candidate(&self, candidate: &CandidateId) -> Result<Vec<Proposition>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))?;
        let mut propositions: Vec<_> = guard
            .values()
            .filter(|proposition| &proposition.candidate == candidate)
            .cloned()
            .collect();
        propositions.sort_by_key(|proposition| proposition.created_at);
        Ok(propositions)
    }
}

impl MaximumPropositionsService for InMemoryPropositionRepository {
    fn submitted_count(&self, candidate: &CandidateId) -> usize {
        self.count(candidate, |status| {
            !status.is_in_progress() && status != PropositionStatus::Cancelled
        })
    }

    fn in_progress_count(&self, candidate: &CandidateId) -> usize {
        self.count(candidate, PropositionStatus::is_in_progress)
    }
}
