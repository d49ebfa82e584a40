use super::{BusinessException, BusinessValidator, Check, ValidatorList};
use crate::workflows::admission::domain::{
    AlternativeSecondaryStudies, BelgianSecondaryDiploma, ForeignSecondaryDiploma, GotDiploma,
    SecondaryStudies, TrainingType,
};

/// Linguistic regimes for which no translation of a foreign diploma is requested.
pub const REGIMES_WITHOUT_TRANSLATION: [&str; 7] = ["FR", "NL", "DE", "EN", "IT", "ES", "PT"];

/// A bachelor candidate must say whether they hold a secondary diploma. `None` is a failure.
#[derive(Debug, Clone, Copy)]
pub struct BachelorSecondaryDiplomaDeclared {
    pub training_type: TrainingType,
    pub got_diploma: Option<GotDiploma>,
}

impl BusinessValidator for BachelorSecondaryDiplomaDeclared {
    fn validate(&self) -> Result<(), BusinessException> {
        if self.training_type.is_bachelor() && self.got_diploma.is_none() {
            return Err(BusinessException::SecondaryStudiesNotCompleted);
        }
        Ok(())
    }
}

/// A declared diploma must be detailed as Belgian, foreign or an alternative.
#[derive(Debug, Clone, Copy)]
pub struct SecondaryDiplomaDetailed<'a> {
    pub studies: &'a SecondaryStudies,
}

impl BusinessValidator for SecondaryDiplomaDetailed<'_> {
    fn validate(&self) -> Result<(), BusinessException> {
        let declared = matches!(
            self.studies.got_diploma,
            Some(GotDiploma::Yes | GotDiploma::ThisYear)
        );
        if declared
            && self.studies.belgian_diploma.is_none()
            && self.studies.foreign_diploma.is_none()
        {
            return Err(BusinessException::SecondaryStudiesNotCompleted);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BelgianSecondaryDiplomaCompleted<'a> {
    pub diploma: Option<&'a BelgianSecondaryDiploma>,
}

impl BusinessValidator for BelgianSecondaryDiplomaCompleted<'_> {
    fn validate(&self) -> Result<(), BusinessException> {
        match self.diploma {
            Some(diploma) if diploma.diploma.is_empty() => {
                Err(BusinessException::BelgianSecondaryDiplomaMissing)
            }
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ForeignSecondaryDiplomaFileProvided<'a> {
    pub diploma: Option<&'a ForeignSecondaryDiploma>,
}

impl BusinessValidator for ForeignSecondaryDiplomaFileProvided<'_> {
    fn validate(&self) -> Result<(), BusinessException> {
        match self.diploma {
            Some(diploma) if diploma.diploma.is_empty() => {
                Err(BusinessException::ForeignSecondaryDiplomaMissing)
            }
            _ => Ok(()),
        }
    }
}

/// Translation is only requested when the regime is known and outside the allow-list.
#[derive(Debug, Clone, Copy)]
pub struct ForeignSecondaryDiplomaTranslationProvided<'a> {
    pub diploma: Option<&'a ForeignSecondaryDiploma>,
}

impl ForeignSecondaryDiplomaTranslationProvided<'_> {
    fn needs_translation(diploma: &ForeignSecondaryDiploma) -> bool {
        diploma
            .linguistic_regime
            .as_deref()
            .map(|regime| {
                let regime = regime.trim().to_ascii_uppercase();
                !REGIMES_WITHOUT_TRANSLATION.contains(&regime.as_str())
            })
            .unwrap_or(false)
    }
}

impl BusinessValidator for ForeignSecondaryDiplomaTranslationProvided<'_> {
    fn validate(&self) -> Result<(), BusinessException> {
        let Some(diploma) = self.diploma else {
            return Ok(());
        };
        if Self::needs_translation(diploma) && diploma.translated_diploma.is_empty() {
            return Err(BusinessException::ForeignSecondaryDiplomaTranslationMissing);
        }
        Ok(())
    }
}

/// EU diplomas and medicine/dentistry trainings require an equivalence decision.
#[derive(Debug, Clone, Copy)]
pub struct ForeignSecondaryDiplomaEquivalenceProvided<'a> {
    pub diploma: Option<&'a ForeignSecondaryDiploma>,
    pub is_medicine_or_dentistry: bool,
}

impl BusinessValidator for ForeignSecondaryDiplomaEquivalenceProvided<'_> {
    fn validate(&self) -> Result<(), BusinessException> {
        let Some(diploma) = self.diploma else {
            return Ok(());
        };
        let required = diploma.country.is_eu() || self.is_medicine_or_dentistry;
        if required && diploma.equivalence_decision.is_empty() {
            return Err(BusinessException::ForeignSecondaryDiplomaEquivalenceMissing);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ForeignSecondaryDiplomaTranscriptProvided<'a> {
    pub diploma: Option<&'a ForeignSecondaryDiploma>,
}

impl BusinessValidator for ForeignSecondaryDiplomaTranscriptProvided<'_> {
    fn validate(&self) -> Result<(), BusinessException> {
        match self.diploma {
            Some(diploma) if diploma.transcript.is_empty() => {
                Err(BusinessException::ForeignSecondaryDiplomaTranscriptMissing)
            }
            _ => Ok(()),
        }
    }
}

/// No alternative declared means nothing to check.
#[derive(Debug, Clone, Copy)]
pub struct AlternativeSecondaryStudiesCompleted<'a> {
    pub alternative: Option<&'a AlternativeSecondaryStudies>,
}

impl BusinessValidator for AlternativeSecondaryStudiesCompleted<'_> {
    fn validate(&self) -> Result<(), BusinessException> {
        let Some(alternative) = self.alternative else {
            return Ok(());
        };
        if alternative.first_cycle_admission_exam.is_empty() {
            return Err(BusinessException::AlternativeSecondaryStudiesNotCompleted);
        }
        Ok(())
    }
}

/// Secondary studies checks, only relevant for bachelor trainings.
#[derive(Debug, Clone, Copy)]
pub struct SecondaryStudiesValidatorList<'a> {
    pub training_type: TrainingType,
    pub is_medicine_or_dentistry: bool,
    pub studies: &'a SecondaryStudies,
}

impl ValidatorList for SecondaryStudiesValidatorList<'_> {
    fn invariant_validators(&self) -> Vec<Check<'_>> {
        if !self.training_type.is_bachelor() {
            return Vec::new();
        }

        let studies = self.studies;
        let foreign = studies.foreign_diploma.as_ref();
        vec![
            Check::validator(BachelorSecondaryDiplomaDeclared {
                training_type: self.training_type,
                got_diploma: studies.got_diploma,
            }),
            Check::validator(SecondaryDiplomaDetailed { studies }),
            Check::validator(BelgianSecondaryDiplomaCompleted {
                diploma: studies.belgian_diploma.as_ref(),
            }),
            Check::validator(ForeignSecondaryDiplomaFileProvided { diploma: foreign }),
            Check::validator(ForeignSecondaryDiplomaTranslationProvided { diploma: foreign }),
            Check::validator(ForeignSecondaryDiplomaEquivalenceProvided {
                diploma: foreign,
                is_medicine_or_dentistry: self.is_medicine_or_dentistry,
            }),
            Check::validator(ForeignSecondaryDiplomaTranscriptProvided { diploma: foreign }),
            Check::validator(AlternativeSecondaryStudiesCompleted {
                alternative: studies.alternative.as_ref(),
            }),
        ]
    }
}
