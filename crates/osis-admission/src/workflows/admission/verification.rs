//! Submission eligibility of a proposition.
//!
//! The verifier reads every collaborator, builds one ordered worklist of checks and runs it
//! through [`execute_and_aggregate`]. It never mutates the proposition, so calling it twice
//! with the same inputs gives the same outcome.

use chrono::NaiveDate;

use super::calendar::{PoolRequest, RegistrationCalendar};
use super::domain::{AccessTitles, CountryCode};
use super::ports::{
    CandidateProfileTranslator, FormationTranslator, MaximumPropositionsService,
    SpecificQuestionsTranslator,
};
use super::proposition::Proposition;
use super::validation::access::{AccessConditionsMet, SubmittedPropositionsBelowLimit};
use super::validation::accounting::AccountingValidatorList;
use super::validation::curriculum::{
    CurriculumValidatorList, CurriculumYearsCovered, ACADEMIC_YEAR_FIRST_MONTH,
};
use super::validation::secondary_studies::SecondaryStudiesValidatorList;
use super::validation::specific_questions::SpecificQuestionsValidatorList;
use super::validation::{
    execute_and_aggregate, BusinessException, Check, MultipleBusinessExceptions, ValidatorList,
};
use crate::config::EngineConfig;

/// Read-only collaborators of a verification pass.
pub struct PropositionVerifier<'a, F: ?Sized, P: ?Sized, M: ?Sized, Q: ?Sized> {
    pub formations: &'a F,
    pub profile: &'a P,
    pub calendar: &'a RegistrationCalendar,
    pub maximum_propositions: &'a M,
    pub questions: &'a Q,
    pub config: &'a EngineConfig,
}

impl<F, P, M, Q> PropositionVerifier<'_, F, P, M, Q>
where
    F: FormationTranslator + ?Sized,
    P: CandidateProfileTranslator + ?Sized,
    M: MaximumPropositionsService + ?Sized,
    Q: SpecificQuestionsTranslator + ?Sized,
{
    /// Check that `proposition` may be submitted, reporting every unmet requirement at once.
    pub fn verify(
        &self,
        proposition: &Proposition,
        titles: &AccessTitles,
    ) -> Result<(), MultipleBusinessExceptions> {
        let identity = &proposition.formation;
        let formation = self
            .formations
            .get(&identity.acronym, identity.year)
            .ok_or_else(|| BusinessException::FormationNotFound {
                acronym: identity.acronym.clone(),
                year: identity.year,
            })?;

        let candidate = &proposition.candidate;
        let identification = self.profile.identification(candidate);
        let secondary_studies = self.profile.secondary_studies(candidate);
        let curriculum = self.profile.curriculum(candidate);
        let questions = self.questions.questions(identity);
        let eu_national = identification.nationality.as_ref().map(CountryCode::is_eu);

        let training_start = NaiveDate::from_ymd_opt(identity.year, ACADEMIC_YEAR_FIRST_MONTH, 1);
        let last_month_to_justify =
            CurriculumYearsCovered::last_month_for(self.calendar.today(), training_start);

        let secondary = SecondaryStudiesValidatorList {
            training_type: formation.training_type,
            is_medicine_or_dentistry: formation.is_medicine_or_dentistry,
            studies: &secondary_studies,
        };
        let curriculum_list = CurriculumValidatorList {
            training_type: formation.training_type,
            curriculum_file: &proposition.curriculum_file,
            equivalence: &proposition.equivalence,
            curriculum: &curriculum,
            current_year: identity.year - 1,
            secondary_graduation_year: secondary_studies.graduation_year,
            last_ucl_registration_year: identification.last_ucl_registration_year,
            last_month_to_justify,
        };
        let accounting = AccountingValidatorList {
            accounting: &proposition.accounting,
            eu_national,
        };
        let specific_questions = SpecificQuestionsValidatorList {
            questions: &questions,
            answers: &proposition.specific_answers,
        };
        let request = PoolRequest {
            formation: &formation,
            candidate,
            titles,
            declarations: Some(&proposition.declarations),
        };

        execute_and_aggregate([
            Check::validator(AccessConditionsMet { titles }),
            Check::validator(SubmittedPropositionsBelowLimit {
                submitted: self.maximum_propositions.submitted_count(candidate),
                limit: self.config.max_submitted_propositions,
            }),
            Check::from_fn(|| secondary.validate()),
            Check::from_fn(|| curriculum_list.validate()),
            Check::from_fn(|| accounting.validate()),
            Check::from_fn(|| specific_questions.validate()),
            Check::from_fn(|| {
                self.calendar
                    .verify(
                        &request,
                        proposition.submitted_pool,
                        self.profile,
                        self.formations,
                    )
                    .map(|_| ())
            }),
        ])
    }
}
