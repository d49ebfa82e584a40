use std::collections::BTreeMap;

use super::{BusinessException, BusinessValidator, Check, ValidatorList};
use crate::workflows::admission::domain::{QuestionKind, QuestionTab, SpecificQuestion};

/// Every required question of one tab has a non-blank answer. Messages are never answered.
#[derive(Debug, Clone, Copy)]
pub struct SpecificQuestionsCompleted<'a> {
    pub tab: QuestionTab,
    pub questions: &'a [SpecificQuestion],
    pub answers: &'a BTreeMap<String, String>,
}

impl BusinessValidator for SpecificQuestionsCompleted<'_> {
    fn validate(&self) -> Result<(), BusinessException> {
        let unanswered = self
            .questions
            .iter()
            .filter(|question| question.tab == self.tab)
            .filter(|question| question.required && question.kind != QuestionKind::Message)
            .any(|question| {
                self.answers
                    .get(&question.id)
                    .map_or(true, |answer| answer.trim().is_empty())
            });

        if unanswered {
            return Err(BusinessException::SpecificQuestionsNotCompleted { tab: self.tab });
        }
        Ok(())
    }
}

/// One check per form tab, in tab order.
#[derive(Debug, Clone, Copy)]
pub struct SpecificQuestionsValidatorList<'a> {
    pub questions: &'a [SpecificQuestion],
    pub answers: &'a BTreeMap<String, String>,
}

impl ValidatorList for SpecificQuestionsValidatorList<'_> {
    fn invariant_validators(&self) -> Vec<Check<'_>> {
        QuestionTab::ordered()
            .into_iter()
            .map(|tab| {
                Check::validator(SpecificQuestionsCompleted {
                    tab,
                    questions: self.questions,
                    answers: self.answers,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: &str, tab: QuestionTab, kind: QuestionKind, required: bool) -> SpecificQuestion {
        SpecificQuestion {
            id: id.to_string(),
            tab,
            kind,
            required,
        }
    }

    #[test]
    fn reports_tabs_with_blank_required_answers() {
        let questions = vec![
            question("motivation", QuestionTab::TrainingChoice, QuestionKind::Text, true),
            question("welcome", QuestionTab::TrainingChoice, QuestionKind::Message, true),
            question("cv", QuestionTab::Curriculum, QuestionKind::Document, true),
            question("hobby", QuestionTab::AdditionalInformation, QuestionKind::Text, false),
        ];
        let answers = BTreeMap::from([
            ("motivation".to_string(), "I like it".to_string()),
            ("cv".to_string(), "   ".to_string()),
        ]);

        let failure = SpecificQuestionsValidatorList {
            questions: &questions,
            answers: &answers,
        }
        .validate()
        .expect_err("curriculum question blank");
        assert_eq!(
            failure.exceptions,
            vec![BusinessException::SpecificQuestionsNotCompleted {
                tab: QuestionTab::Curriculum
            }]
        );
        assert_eq!(failure.status_codes(), vec!["ADMISSION-4"]);
    }
}
