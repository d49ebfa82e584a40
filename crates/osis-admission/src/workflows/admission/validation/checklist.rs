use super::{BusinessException, BusinessValidator};
use crate::workflows::admission::checklist::{
    ChecklistNode, ChecklistStatus, SECONDARY_STUDIES_IDENTIFIER,
};
use crate::workflows::admission::domain::ExperienceId;

/// Before the previous experience tab succeeds, every valorised experience and the secondary
/// studies must be validated (or deferred after enrolment) in the checklist.
///
/// The whole set is scanned before deciding, so the outcome does not depend on the order of
/// the experiences or of the checklist children.
#[derive(Debug, Clone, Copy)]
pub struct ExperienceChecklistsValidated<'a> {
    pub target_status: ChecklistStatus,
    pub previous_experience: &'a ChecklistNode,
    pub valorised_experiences: &'a [ExperienceId],
}

impl ExperienceChecklistsValidated<'_> {
    fn qualifies(node: &ChecklistNode) -> bool {
        matches!(
            node.status,
            Some(ChecklistStatus::Success | ChecklistStatus::BlockedLater)
        )
    }

    /// Identifiers of the experiences missing or not validated in the checklist.
    pub fn pending(&self) -> Vec<String> {
        self.valorised_experiences
            .iter()
            .map(ExperienceId::to_string)
            .chain(std::iter::once(SECONDARY_STUDIES_IDENTIFIER.to_string()))
            .filter(|identifier| {
                !self
                    .previous_experience
                    .child(identifier)
                    .is_some_and(Self::qualifies)
            })
            .collect()
    }
}

impl BusinessValidator for ExperienceChecklistsValidated<'_> {
    fn validate(&self) -> Result<(), BusinessException> {
        if self.target_status != ChecklistStatus::Success {
            return Ok(());
        }
        if !self.pending().is_empty() {
            return Err(BusinessException::ExperienceChecklistsNotValidated);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::admission::checklist::ChecklistExtra;
    use proptest::prelude::*;

    fn child(identifier: &str, status: ChecklistStatus) -> ChecklistNode {
        ChecklistNode::new(identifier, status).with_extra(ChecklistExtra::IDENTIFIER, identifier)
    }

    fn tab(children: Vec<ChecklistNode>) -> ChecklistNode {
        ChecklistNode {
            children,
            ..ChecklistNode::new("Previous experience", ChecklistStatus::InProgress)
        }
    }

    #[test]
    fn other_target_statuses_are_not_checked() {
        let previous = tab(Vec::new());
        let experiences = [ExperienceId::new()];
        let check = ExperienceChecklistsValidated {
            target_status: ChecklistStatus::Blocked,
            previous_experience: &previous,
            valorised_experiences: &experiences,
        };
        assert_eq!(check.validate(), Ok(()));
    }

    #[test]
    fn deferred_experiences_qualify() {
        let experience = ExperienceId::new();
        let previous = tab(vec![
            child(SECONDARY_STUDIES_IDENTIFIER, ChecklistStatus::Success),
            child(&experience.to_string(), ChecklistStatus::BlockedLater),
        ]);
        let check = ExperienceChecklistsValidated {
            target_status: ChecklistStatus::Success,
            previous_experience: &previous,
            valorised_experiences: &[experience],
        };
        assert_eq!(check.validate(), Ok(()));
    }

    #[test]
    fn secondary_studies_are_always_required() {
        let previous = tab(Vec::new());
        let check = ExperienceChecklistsValidated {
            target_status: ChecklistStatus::Success,
            previous_experience: &previous,
            valorised_experiences: &[],
        };
        assert_eq!(
            check.validate(),
            Err(BusinessException::ExperienceChecklistsNotValidated)
        );
        assert_eq!(check.pending(), vec![SECONDARY_STUDIES_IDENTIFIER.to_string()]);
    }

    fn status() -> impl Strategy<Value = ChecklistStatus> {
        prop_oneof![
            Just(ChecklistStatus::InitialCandidate),
            Just(ChecklistStatus::InProgress),
            Just(ChecklistStatus::Blocked),
            Just(ChecklistStatus::BlockedLater),
            Just(ChecklistStatus::Success),
        ]
    }

    proptest! {
        #[test]
        fn outcome_ignores_children_order(statuses in prop::collection::vec(status(), 1..6)) {
            let experiences: Vec<_> = statuses.iter().map(|_| ExperienceId::new()).collect();
            let mut children: Vec<_> = experiences
                .iter()
                .zip(&statuses)
                .map(|(id, status)| child(&id.to_string(), *status))
                .collect();
            children.push(child(SECONDARY_STUDIES_IDENTIFIER, ChecklistStatus::Success));

            let forward = tab(children.clone());
            children.reverse();
            let backward = tab(children);

            let check = |node: &ChecklistNode| ExperienceChecklistsValidated {
                target_status: ChecklistStatus::Success,
                previous_experience: node,
                valorised_experiences: &experiences,
            }
            .validate();

            let expected_ok = statuses
                .iter()
                .all(|status| matches!(status, ChecklistStatus::Success | ChecklistStatus::BlockedLater));
            prop_assert_eq!(check(&forward), check(&backward));
            prop_assert_eq!(check(&forward).is_ok(), expected_ok);
        }
    }
}
