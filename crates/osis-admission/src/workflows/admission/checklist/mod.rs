//! Per-admission review checklist: one status tree per tab.
//!
//! The tree is a passive data holder. Whether a transition is allowed is decided by the
//! validators in [`crate::workflows::admission::validation::decision`] before the tree is
//! mutated.

mod blueprint;

pub use blueprint::{experience_configurations, ChecklistBlueprint, StatusConfiguration};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::workflows::admission::domain::ExperienceId;
use crate::workflows::admission::validation::BusinessException;

/// Configured status of a tab root, or of one experience child of the previous experience tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedStatus {
    pub tab: ChecklistTab,
    pub experience: Option<String>,
    pub status: Option<&'static str>,
}

/// Identifier of the secondary studies child of the previous experience tab.
pub const SECONDARY_STUDIES_IDENTIFIER: &str = "ETUDES_SECONDAIRES";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChecklistStatus {
    #[serde(rename = "INITIAL_CANDIDAT")]
    InitialCandidate,
    #[serde(rename = "INITIAL_NON_CONCERNE")]
    InitialNotConcerned,
    #[serde(rename = "GEST_EN_COURS")]
    InProgress,
    #[serde(rename = "GEST_BLOCAGE")]
    Blocked,
    #[serde(rename = "GEST_BLOCAGE_ULTERIEUR")]
    BlockedLater,
    #[serde(rename = "GEST_REUSSITE")]
    Success,
}

impl ChecklistStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::InitialCandidate => "Initial (candidate)",
            Self::InitialNotConcerned => "Initial (not concerned)",
            Self::InProgress => "In progress",
            Self::Blocked => "Blocked",
            Self::BlockedLater => "Blocked after enrolment",
            Self::Success => "Success",
        }
    }

    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::InitialCandidate => "INITIAL_CANDIDAT",
            Self::InitialNotConcerned => "INITIAL_NON_CONCERNE",
            Self::InProgress => "GEST_EN_COURS",
            Self::Blocked => "GEST_BLOCAGE",
            Self::BlockedLater => "GEST_BLOCAGE_ULTERIEUR",
            Self::Success => "GEST_REUSSITE",
        }
    }
}

/// Open-ended metadata attached to a checklist node.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChecklistExtra(pub BTreeMap<String, String>);

impl ChecklistExtra {
    pub const IDENTIFIER: &'static str = "identifiant";
    pub const DECISION: &'static str = "decision";
    pub const IN_PROGRESS: &'static str = "en_cours";
    pub const BLOCKING: &'static str = "blocage";
    pub const SUCCESS: &'static str = "reussite";
    pub const FRAUD: &'static str = "fraud";
    pub const AUTHENTICATION: &'static str = "authentification";
    pub const TO_BE_COMPLETED: &'static str = "to_be_completed";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self(
            pairs
                .iter()
                .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
                .collect(),
        )
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: &str) {
        self.0.insert(key.to_string(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn identifier(&self) -> Option<&str> {
        self.get(Self::IDENTIFIER)
    }

    pub fn decision(&self) -> Option<&str> {
        self.get(Self::DECISION)
    }

    pub fn in_progress(&self) -> Option<&str> {
        self.get(Self::IN_PROGRESS)
    }

    /// Every entry of `self` is present with the same value in `other`.
    pub fn is_subset_of(&self, other: &ChecklistExtra) -> bool {
        self.0
            .iter()
            .all(|(key, value)| other.0.get(key) == Some(value))
    }
}

/// One node of a checklist tab. Missing fields deserialize to an empty node.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChecklistNode {
    #[serde(rename = "libelle")]
    pub label: String,
    #[serde(rename = "statut")]
    pub status: Option<ChecklistStatus>,
    pub extra: ChecklistExtra,
    #[serde(rename = "enfants")]
    pub children: Vec<ChecklistNode>,
}

impl ChecklistNode {
    pub fn new(label: &str, status: ChecklistStatus) -> Self {
        Self {
            label: label.to_string(),
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn with_extra(mut self, key: &str, value: &str) -> Self {
        self.extra.insert(key, value);
        self
    }

    fn experience(identifier: &str) -> Self {
        Self::new(identifier, ChecklistStatus::InitialCandidate)
            .with_extra(ChecklistExtra::IDENTIFIER, identifier)
    }

    pub fn has_status(&self, status: ChecklistStatus) -> bool {
        self.status == Some(status)
    }

    pub fn child(&self, identifier: &str) -> Option<&ChecklistNode> {
        self.children
            .iter()
            .find(|child| child.extra.identifier() == Some(identifier))
    }

    pub fn child_mut(&mut self, identifier: &str) -> Option<&mut ChecklistNode> {
        self.children
            .iter_mut()
            .find(|child| child.extra.identifier() == Some(identifier))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChecklistTab {
    #[serde(rename = "donnees_personnelles")]
    PersonalData,
    #[serde(rename = "frais_dossier")]
    ApplicationFees,
    Assimilation,
    #[serde(rename = "choix_formation")]
    TrainingChoice,
    #[serde(rename = "parcours_anterieur")]
    PreviousExperience,
    #[serde(rename = "financabilite")]
    Financeability,
    #[serde(rename = "specificites_formation")]
    TrainingSpecificities,
    #[serde(rename = "decision_facultaire")]
    FacultyDecision,
    #[serde(rename = "decision_sic")]
    SicDecision,
    #[serde(rename = "decision_cdd")]
    CddDecision,
}

impl ChecklistTab {
    pub const fn ordered() -> [Self; 10] {
        [
            Self::PersonalData,
            Self::ApplicationFees,
            Self::Assimilation,
            Self::TrainingChoice,
            Self::PreviousExperience,
            Self::Financeability,
            Self::TrainingSpecificities,
            Self::FacultyDecision,
            Self::SicDecision,
            Self::CddDecision,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::PersonalData => "donnees_personnelles",
            Self::ApplicationFees => "frais_dossier",
            Self::Assimilation => "assimilation",
            Self::TrainingChoice => "choix_formation",
            Self::PreviousExperience => "parcours_anterieur",
            Self::Financeability => "financabilite",
            Self::TrainingSpecificities => "specificites_formation",
            Self::FacultyDecision => "decision_facultaire",
            Self::SicDecision => "decision_sic",
            Self::CddDecision => "decision_cdd",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::PersonalData => "Personal data",
            Self::ApplicationFees => "Application fees",
            Self::Assimilation => "Assimilation",
            Self::TrainingChoice => "Course choice",
            Self::PreviousExperience => "Previous experience",
            Self::Financeability => "Financeability",
            Self::TrainingSpecificities => "Training specificities",
            Self::FacultyDecision => "Faculty decision",
            Self::SicDecision => "SIC decision",
            Self::CddDecision => "CDD decision",
        }
    }
}

/// Facts about the proposition that decide the initial status of each tab.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InitialChecklistFacts {
    pub eu_national: bool,
    pub fees_required: bool,
    pub with_cdd_decision: bool,
    pub valorised_experiences: Vec<ExperienceId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralChecklist {
    pub donnees_personnelles: ChecklistNode,
    pub frais_dossier: ChecklistNode,
    pub assimilation: ChecklistNode,
    pub choix_formation: ChecklistNode,
    pub parcours_anterieur: ChecklistNode,
    pub financabilite: ChecklistNode,
    pub specificites_formation: ChecklistNode,
    pub decision_facultaire: ChecklistNode,
    pub decision_sic: ChecklistNode,
    pub decision_cdd: ChecklistNode,
}

impl GeneralChecklist {
    pub fn initial(facts: &InitialChecklistFacts) -> Self {
        use ChecklistStatus::{InitialCandidate, InitialNotConcerned};

        let fees_status = if facts.fees_required {
            InitialCandidate
        } else {
            InitialNotConcerned
        };
        let assimilation_status = if facts.eu_national {
            InitialNotConcerned
        } else {
            InitialCandidate
        };

        let mut previous_experience = ChecklistNode::new(
            ChecklistTab::PreviousExperience.label(),
            InitialCandidate,
        );
        previous_experience
            .children
            .push(ChecklistNode::experience(SECONDARY_STUDIES_IDENTIFIER));
        previous_experience.children.extend(
            facts
                .valorised_experiences
                .iter()
                .map(|id| ChecklistNode::experience(&id.to_string())),
        );

        let tab = |tab: ChecklistTab, status| ChecklistNode::new(tab.label(), status);
        Self {
            donnees_personnelles: tab(ChecklistTab::PersonalData, InitialCandidate),
            frais_dossier: tab(ChecklistTab::ApplicationFees, fees_status),
            assimilation: tab(ChecklistTab::Assimilation, assimilation_status),
            choix_formation: tab(ChecklistTab::TrainingChoice, InitialCandidate),
            parcours_anterieur: previous_experience,
            financabilite: tab(ChecklistTab::Financeability, InitialCandidate),
            specificites_formation: tab(ChecklistTab::TrainingSpecificities, InitialCandidate),
            decision_facultaire: tab(ChecklistTab::FacultyDecision, InitialCandidate),
            decision_sic: tab(ChecklistTab::SicDecision, InitialCandidate),
            decision_cdd: if facts.with_cdd_decision {
                tab(ChecklistTab::CddDecision, InitialCandidate)
            } else {
                ChecklistNode::default()
            },
        }
    }

    pub fn tab(&self, tab: ChecklistTab) -> &ChecklistNode {
        match tab {
            ChecklistTab::PersonalData => &self.donnees_personnelles,
            ChecklistTab::ApplicationFees => &self.frais_dossier,
            ChecklistTab::Assimilation => &self.assimilation,
            ChecklistTab::TrainingChoice => &self.choix_formation,
            ChecklistTab::PreviousExperience => &self.parcours_anterieur,
            ChecklistTab::Financeability => &self.financabilite,
            ChecklistTab::TrainingSpecificities => &self.specificites_formation,
            ChecklistTab::FacultyDecision => &self.decision_facultaire,
            ChecklistTab::SicDecision => &self.decision_sic,
            ChecklistTab::CddDecision => &self.decision_cdd,
        }
    }

    pub fn tab_mut(&mut self, tab: ChecklistTab) -> &mut ChecklistNode {
        match tab {
            ChecklistTab::PersonalData => &mut self.donnees_personnelles,
            ChecklistTab::ApplicationFees => &mut self.frais_dossier,
            ChecklistTab::Assimilation => &mut self.assimilation,
            ChecklistTab::TrainingChoice => &mut self.choix_formation,
            ChecklistTab::PreviousExperience => &mut self.parcours_anterieur,
            ChecklistTab::Financeability => &mut self.financabilite,
            ChecklistTab::TrainingSpecificities => &mut self.specificites_formation,
            ChecklistTab::FacultyDecision => &mut self.decision_facultaire,
            ChecklistTab::SicDecision => &mut self.decision_sic,
            ChecklistTab::CddDecision => &mut self.decision_cdd,
        }
    }

    /// Replace the status and extra of a tab root. Children are kept.
    pub fn set_status(&mut self, tab: ChecklistTab, status: ChecklistStatus, extra: ChecklistExtra) {
        let node = self.tab_mut(tab);
        node.status = Some(status);
        node.extra = extra;
    }

    pub fn child(&self, tab: ChecklistTab, identifier: &str) -> Option<&ChecklistNode> {
        self.tab(tab).child(identifier)
    }

    pub fn child_mut(&mut self, tab: ChecklistTab, identifier: &str) -> Option<&mut ChecklistNode> {
        self.tab_mut(tab).child_mut(identifier)
    }

    /// Track a new curriculum experience in the previous experience tab. Adding twice is a no-op.
    pub fn add_experience(&mut self, experience: ExperienceId) {
        let identifier = experience.to_string();
        let tab = self.tab_mut(ChecklistTab::PreviousExperience);
        if tab.child(&identifier).is_none() {
            tab.children.push(ChecklistNode::experience(&identifier));
        }
    }

    /// Copy the node of `source` for a duplicated experience, keeping its review state.
    /// A duplicate already tracked is left untouched.
    pub fn duplicate_experience(
        &mut self,
        source: ExperienceId,
        duplicate: ExperienceId,
    ) -> Result<(), BusinessException> {
        let source_identifier = source.to_string();
        let duplicate_identifier = duplicate.to_string();
        let tab = self.tab_mut(ChecklistTab::PreviousExperience);
        if tab.child(&duplicate_identifier).is_some() {
            return Ok(());
        }

        let mut copy = tab
            .child(&source_identifier)
            .cloned()
            .ok_or(BusinessException::ExperienceNotFound(source_identifier))?;
        copy.extra
            .insert(ChecklistExtra::IDENTIFIER, &duplicate_identifier);
        tab.children.push(copy);
        Ok(())
    }

    pub fn remove_experience(&mut self, experience: ExperienceId) -> Result<(), BusinessException> {
        let identifier = experience.to_string();
        let tab = self.tab_mut(ChecklistTab::PreviousExperience);
        let before = tab.children.len();
        tab.children
            .retain(|child| child.extra.identifier() != Some(identifier.as_str()));
        if tab.children.len() == before {
            return Err(BusinessException::ExperienceNotFound(identifier));
        }
        Ok(())
    }

    /// Name every node after the blueprint status it matches, tabs first then experiences.
    pub fn resolve(&self, blueprint: &ChecklistBlueprint) -> Vec<ResolvedStatus> {
        let mut resolved = Vec::new();
        for tab in ChecklistTab::ordered() {
            let node = self.tab(tab);
            resolved.push(ResolvedStatus {
                tab,
                experience: None,
                status: blueprint
                    .resolve(tab, node)
                    .map(|configuration| configuration.identifier),
            });
            if tab == ChecklistTab::PreviousExperience {
                resolved.extend(node.children.iter().map(|child| ResolvedStatus {
                    tab,
                    experience: child.extra.identifier().map(str::to_string),
                    status: blueprint
                        .resolve_experience(child)
                        .map(|configuration| configuration.identifier),
                }));
            }
        }
        resolved
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Checklist as first generated for the proposition, and as currently reviewed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AdmissionChecklists {
    #[serde(rename = "checklist_initiale")]
    pub initial: GeneralChecklist,
    #[serde(rename = "checklist_actuelle")]
    pub current: GeneralChecklist,
}

impl AdmissionChecklists {
    pub fn new(initial: GeneralChecklist) -> Self {
        Self {
            current: initial.clone(),
            initial,
        }
    }

    /// Tabs whose root status or extra moved away from the initial snapshot.
    pub fn changed_tabs(&self) -> Vec<ChecklistTab> {
        ChecklistTab::ordered()
            .into_iter()
            .filter(|tab| {
                let initial = self.initial.tab(*tab);
                let current = self.current.tab(*tab);
                initial.status != current.status || initial.extra != current.extra
            })
            .collect()
    }
}
