use super::{ChecklistExtra, ChecklistNode, ChecklistStatus, ChecklistTab};

/// A named status a tab may take, identified by its status and a subset of its extra.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusConfiguration {
    pub identifier: &'static str,
    pub label: &'static str,
    pub status: Option<ChecklistStatus>,
    pub extra: &'static [(&'static str, &'static str)],
    pub parent: Option<&'static str>,
}

impl StatusConfiguration {
    /// Configurations without a status only group their children and never match.
    pub fn matches(&self, status: Option<ChecklistStatus>, extra: &ChecklistExtra) -> bool {
        match (self.status, status) {
            (Some(configured), Some(actual)) if configured == actual => {
                self.extra().is_subset_of(extra)
            }
            _ => false,
        }
    }

    pub fn extra(&self) -> ChecklistExtra {
        ChecklistExtra::from_pairs(self.extra)
    }
}

#[derive(Debug)]
pub struct ChecklistBlueprint {
    tabs: Vec<(ChecklistTab, Vec<StatusConfiguration>)>,
    experiences: Vec<StatusConfiguration>,
}

impl ChecklistBlueprint {
    pub fn standard() -> Self {
        Self {
            tabs: standard_tab_configurations(),
            experiences: experience_configurations(),
        }
    }

    pub fn statuses_for(&self, tab: ChecklistTab) -> &[StatusConfiguration] {
        self.tabs
            .iter()
            .find(|(candidate, _)| *candidate == tab)
            .map(|(_, statuses)| statuses.as_slice())
            .unwrap_or(&[])
    }

    pub fn status(&self, tab: ChecklistTab, identifier: &str) -> Option<&StatusConfiguration> {
        self.statuses_for(tab)
            .iter()
            .find(|configuration| configuration.identifier == identifier)
    }

    /// First configured status of `tab` matching the node.
    pub fn resolve(&self, tab: ChecklistTab, node: &ChecklistNode) -> Option<&StatusConfiguration> {
        self.statuses_for(tab)
            .iter()
            .find(|configuration| configuration.matches(node.status, &node.extra))
    }

    /// Configured status of an experience child of the previous experience tab.
    pub fn resolve_experience(&self, node: &ChecklistNode) -> Option<&StatusConfiguration> {
        self.experiences
            .iter()
            .find(|configuration| configuration.matches(node.status, &node.extra))
    }
}

const fn configuration(
    identifier: &'static str,
    label: &'static str,
    status: ChecklistStatus,
    extra: &'static [(&'static str, &'static str)],
) -> StatusConfiguration {
    StatusConfiguration {
        identifier,
        label,
        status: Some(status),
        extra,
        parent: None,
    }
}

fn standard_tab_configurations() -> Vec<(ChecklistTab, Vec<StatusConfiguration>)> {
    use ChecklistStatus::*;

    vec![
        (
            ChecklistTab::PersonalData,
            vec![
                configuration("A_TRAITER", "To be processed", InitialCandidate, &[]),
                configuration("A_COMPLETER", "To be completed", Blocked, &[("fraud", "0")]),
                configuration("FRAUDEUR", "Fraudster", Blocked, &[("fraud", "1")]),
                configuration("VALIDEES", "Validated", Success, &[]),
            ],
        ),
        (
            ChecklistTab::Assimilation,
            vec![
                configuration("NON_CONCERNE", "Not concerned", InitialNotConcerned, &[]),
                configuration(
                    "DECLARE_ASSIMILE_OU_PAS",
                    "Declared assimilated or not",
                    InitialCandidate,
                    &[],
                ),
                configuration("A_COMPLETER", "To be completed", Blocked, &[]),
                configuration("AVIS_EXPERT", "Expert opinion", InProgress, &[]),
                configuration(
                    "A_COMPLETER_APRES_INSCRIPTION",
                    "To be completed after application",
                    BlockedLater,
                    &[],
                ),
                configuration("VALIDEE", "Validated", Success, &[]),
            ],
        ),
        (
            ChecklistTab::PreviousExperience,
            vec![
                configuration("A_TRAITER", "To be processed", InitialCandidate, &[]),
                configuration("TOILETTE", "Cleaned", InProgress, &[]),
                configuration("INSUFFISANT", "Insufficient", Blocked, &[]),
                configuration("SUFFISANT", "Sufficient", Success, &[]),
            ],
        ),
        (
            ChecklistTab::Financeability,
            vec![
                configuration("NON_CONCERNE", "Not concerned", InitialNotConcerned, &[]),
                configuration("A_TRAITER", "To be processed", InitialCandidate, &[]),
                configuration("AVIS_EXPERT", "Expert opinion", InProgress, &[("en_cours", "expert")]),
                configuration(
                    "BESOIN_DEROGATION",
                    "Dispensation needed",
                    InProgress,
                    &[("en_cours", "derogation")],
                ),
                configuration(
                    "A_COMPLETER",
                    "To be completed",
                    Blocked,
                    &[("to_be_completed", "1")],
                ),
                configuration(
                    "NON_FINANCABLE",
                    "Not financeable",
                    Blocked,
                    &[("to_be_completed", "0")],
                ),
                configuration(
                    "DEROGATION_ACCORDEE",
                    "Dispensation granted",
                    Success,
                    &[("reussite", "derogation")],
                ),
                configuration(
                    "FINANCABLE",
                    "Financeable",
                    Success,
                    &[("reussite", "financable")],
                ),
            ],
        ),
        (
            ChecklistTab::TrainingChoice,
            vec![
                configuration("A_TRAITER", "To be processed", InitialCandidate, &[]),
                configuration("VALIDE", "Validated", Success, &[]),
            ],
        ),
        (
            ChecklistTab::CddDecision,
            vec![
                configuration("A_TRAITER", "To be processed", InitialCandidate, &[]),
                configuration("PRIS_EN_CHARGE", "Taken in charge", InProgress, &[]),
                configuration(
                    "A_COMPLETER_PAR_SIC",
                    "To be completed by SIC",
                    Blocked,
                    &[("decision", "HORS_DECISION")],
                ),
                configuration("CLOTURE", "Closed", Blocked, &[("decision", "CLOTURE")]),
                configuration("REFUS", "Refusal", Blocked, &[("decision", "EN_DECISION")]),
                configuration("ACCORD", "Approval", Success, &[]),
            ],
        ),
        (
            ChecklistTab::SicDecision,
            vec![
                configuration("A_TRAITER", "To be processed", InitialCandidate, &[]),
                configuration(
                    "A_COMPLETER",
                    "To be completed",
                    Blocked,
                    &[("blocage", "to_be_completed")],
                ),
                configuration(
                    "BESOIN_DEROGATION",
                    "Dispensation needed",
                    InProgress,
                    &[("en_cours", "derogation")],
                ),
                configuration(
                    "REFUS_A_VALIDER",
                    "Refusal to validate",
                    InProgress,
                    &[("en_cours", "refusal")],
                ),
                configuration(
                    "AUTORISATION_A_VALIDER",
                    "Approval to validate",
                    InProgress,
                    &[("en_cours", "approval")],
                ),
                configuration("CLOTURE", "Closed", Blocked, &[("blocage", "closed")]),
                configuration("REFUSE", "Refused", Blocked, &[("blocage", "refusal")]),
                configuration("AUTORISE", "Approved", Success, &[]),
            ],
        ),
        (ChecklistTab::FacultyDecision, faculty_decision_configurations()),
        (ChecklistTab::ApplicationFees, Vec::new()),
        (ChecklistTab::TrainingSpecificities, Vec::new()),
    ]
}

/// Statuses of the experience children of the previous experience tab.
pub fn experience_configurations() -> Vec<StatusConfiguration> {
    use ChecklistStatus::*;

    vec![
        configuration("A_TRAITER", "To be processed", InitialCandidate, &[]),
        configuration("A_COMPLETER", "To be completed", Blocked, &[]),
        configuration(
            "AUTHENTIFICATION",
            "Authentication",
            InProgress,
            &[("authentification", "1")],
        ),
        configuration(
            "AVIS_EXPERT",
            "Expert opinion",
            InProgress,
            &[("authentification", "0")],
        ),
        configuration(
            "A_COMPLETER_APRES_INSCRIPTION",
            "To be completed after application",
            BlockedLater,
            &[],
        ),
        configuration("VALIDEE", "Validated", Success, &[]),
    ]
}

fn faculty_decision_configurations() -> Vec<StatusConfiguration> {
    use ChecklistStatus::*;

    vec![
        configuration("A_TRAITER", "To be processed", InitialCandidate, &[]),
        configuration("A_COMPLETER_PAR_SIC", "To be completed by SIC", InProgress, &[]),
        StatusConfiguration {
            identifier: "DECISION",
            label: "Decision",
            status: None,
            extra: &[],
            parent: None,
        },
        StatusConfiguration {
            identifier: "REFUS",
            label: "Refusal",
            status: Some(Blocked),
            extra: &[("decision", "1")],
            parent: Some("DECISION"),
        },
        StatusConfiguration {
            identifier: "APPROVAL",
            label: "Approval",
            status: Some(Success),
            extra: &[],
            parent: Some("DECISION"),
        },
    ]
}
