use std::collections::{BTreeMap, BTreeSet};

use super::domain::{
    AccessCondition, CandidateId, Coordinates, Curriculum, Formation, FormationIdentity,
    Identification, PropositionId, SecondaryStudies, SpecificQuestion,
};
use super::proposition::Proposition;

/// Read access to the training offering catalogue.
pub trait FormationTranslator: Send + Sync {
    fn get(&self, acronym: &str, year: i32) -> Option<Formation>;

    fn exists(&self, acronym: &str, year: i32) -> bool {
        self.get(acronym, year).is_some()
    }
}

/// Read access to the candidate's personal file.
pub trait CandidateProfileTranslator: Send + Sync {
    fn identification(&self, candidate: &CandidateId) -> Identification;
    fn coordinates(&self, candidate: &CandidateId) -> Coordinates;
    fn secondary_studies(&self, candidate: &CandidateId) -> SecondaryStudies;
    fn curriculum(&self, candidate: &CandidateId) -> Curriculum;
    /// Qualifications the candidate holds, before filtering by training type.
    fn held_access_conditions(&self, candidate: &CandidateId) -> BTreeSet<AccessCondition>;
    /// For each requested academic year, whether the candidate changed institute that year.
    fn institute_changes(&self, candidate: &CandidateId, years: &[i32]) -> BTreeMap<i32, bool>;
}

/// Counts of the propositions a candidate already holds.
pub trait MaximumPropositionsService: Send + Sync {
    fn submitted_count(&self, candidate: &CandidateId) -> usize;
    fn in_progress_count(&self, candidate: &CandidateId) -> usize;
}

pub trait SpecificQuestionsTranslator: Send + Sync {
    fn questions(&self, formation: &FormationIdentity) -> Vec<SpecificQuestion>;
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait PropositionRepository: Send + Sync {
    fn insert(&self, proposition: Proposition) -> Result<Proposition, RepositoryError>;
    fn update(&self, proposition: Proposition) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &PropositionId) -> Result<Option<Proposition>, RepositoryError>;
    fn for_candidate(&self, candidate: &CandidateId) -> Result<Vec<Proposition>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
