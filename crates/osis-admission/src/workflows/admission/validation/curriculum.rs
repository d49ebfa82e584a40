use chrono::{Datelike, Duration, Months, NaiveDate};
use std::collections::BTreeSet;

use super::{BusinessException, BusinessValidator, Check, MultipleBusinessExceptions, ValidatorList};
use crate::workflows::admission::domain::{AcademicExperience, Curriculum, TrainingType};

/// First month of an academic year that must be justified.
pub const ACADEMIC_YEAR_FIRST_MONTH: u32 = 9;
/// Last month (in the following calendar year) of an academic year that must be justified.
pub const ACADEMIC_YEAR_LAST_MONTH: u32 = 2;
/// How many past years a curriculum must cover at most.
pub const MAX_CURRICULUM_YEARS: i32 = 5;

/// A curriculum file is required unless the training is a bachelor.
#[derive(Debug, Clone, Copy)]
pub struct CurriculumFileProvided<'a> {
    pub training_type: TrainingType,
    pub curriculum_file: &'a [String],
}

impl BusinessValidator for CurriculumFileProvided<'_> {
    fn validate(&self) -> Result<(), BusinessException> {
        if !self.training_type.is_bachelor() && self.curriculum_file.is_empty() {
            return Err(BusinessException::CurriculumFileNotProvided);
        }
        Ok(())
    }
}

/// Aggregation and CAPAES candidates graduated abroad only must provide a diploma equivalence.
#[derive(Debug, Clone, Copy)]
pub struct DiplomaEquivalenceProvided<'a> {
    pub training_type: TrainingType,
    pub equivalence: &'a [String],
    pub academic_experiences: &'a [AcademicExperience],
}

impl BusinessValidator for DiplomaEquivalenceProvided<'_> {
    fn validate(&self) -> Result<(), BusinessException> {
        if !self.training_type.is_aggregation_or_capaes() || !self.equivalence.is_empty() {
            return Ok(());
        }

        let graduated: Vec<_> = self
            .academic_experiences
            .iter()
            .filter(|experience| experience.obtained_diploma)
            .collect();
        let belgian = graduated.iter().any(|experience| experience.country.is_belgium());
        let foreign = graduated.iter().any(|experience| !experience.country.is_belgium());

        if foreign && !belgian {
            return Err(BusinessException::EquivalenceNotProvided);
        }
        Ok(())
    }
}

/// Every incomplete academic experience is reported on its own.
#[derive(Debug, Clone, Copy)]
pub struct AcademicExperiencesCompleted<'a> {
    pub experiences: &'a [AcademicExperience],
}

impl AcademicExperiencesCompleted<'_> {
    pub fn validate(&self) -> Result<(), MultipleBusinessExceptions> {
        let exceptions: Vec<_> = self
            .experiences
            .iter()
            .filter(|experience| !experience.complete)
            .map(|experience| BusinessException::AcademicExperienceNotCompleted {
                reference: experience.id,
                name: experience.name.clone(),
            })
            .collect();

        if exceptions.is_empty() {
            Ok(())
        } else {
            Err(MultipleBusinessExceptions::new(exceptions))
        }
    }
}

/// The months between the minimal year and the last month to justify must all be covered.
///
/// Complete academic experiences cover whole academic years. Non-academic experiences cover
/// date ranges, with adjacent ranges merged. Each run of consecutive uncovered months is
/// reported as one exception.
#[derive(Debug, Clone, Copy)]
pub struct CurriculumYearsCovered<'a> {
    pub current_year: i32,
    pub secondary_graduation_year: Option<i32>,
    pub last_ucl_registration_year: Option<i32>,
    pub curriculum: &'a Curriculum,
    pub last_month_to_justify: NaiveDate,
}

impl CurriculumYearsCovered<'_> {
    pub fn minimal_year(
        current_year: i32,
        secondary_graduation_year: Option<i32>,
        last_ucl_registration_year: Option<i32>,
    ) -> i32 {
        let floor = current_year - MAX_CURRICULUM_YEARS;
        1 + floor
            .max(secondary_graduation_year.unwrap_or(floor))
            .max(last_ucl_registration_year.unwrap_or(floor))
    }

    /// First day of the month of the earlier of `today` and the training start.
    pub fn last_month_for(today: NaiveDate, training_start: Option<NaiveDate>) -> NaiveDate {
        let reference = training_start.map_or(today, |start| start.min(today));
        reference.with_day(1).unwrap_or(reference)
    }

    fn valorised_years(&self) -> BTreeSet<i32> {
        self.curriculum
            .academic
            .iter()
            .filter(|experience| experience.complete)
            .flat_map(|experience| experience.years.iter().copied())
            .collect()
    }

    fn months_to_justify(&self) -> Vec<NaiveDate> {
        let minimal_year = Self::minimal_year(
            self.current_year,
            self.secondary_graduation_year,
            self.last_ucl_registration_year,
        );
        let valorised = self.valorised_years();

        let mut months = Vec::new();
        for year in minimal_year..=self.current_year {
            if valorised.contains(&year) {
                continue;
            }
            let (Some(first), Some(year_end)) = (
                NaiveDate::from_ymd_opt(year, ACADEMIC_YEAR_FIRST_MONTH, 1),
                NaiveDate::from_ymd_opt(year + 1, ACADEMIC_YEAR_LAST_MONTH, 1),
            ) else {
                continue;
            };
            let last = year_end.min(self.last_month_to_justify);
            let mut month = first;
            while month <= last {
                months.push(month);
                match month.checked_add_months(Months::new(1)) {
                    Some(next) => month = next,
                    None => break,
                }
            }
        }
        months
    }

    fn covered_ranges(&self) -> Vec<(NaiveDate, NaiveDate)> {
        let mut ranges: Vec<_> = self
            .curriculum
            .non_academic
            .iter()
            .map(|experience| (experience.start, experience.end))
            .collect();
        ranges.sort();

        let mut merged: Vec<(NaiveDate, NaiveDate)> = Vec::with_capacity(ranges.len());
        for (start, end) in ranges {
            match merged.last_mut() {
                Some((_, current_end)) if start <= *current_end + Duration::days(1) => {
                    *current_end = (*current_end).max(end);
                }
                _ => merged.push((start, end)),
            }
        }
        merged
    }

    pub fn validate(&self) -> Result<(), MultipleBusinessExceptions> {
        let ranges = self.covered_ranges();
        let missing: Vec<_> = self
            .months_to_justify()
            .into_iter()
            .filter(|month| {
                !ranges
                    .iter()
                    .any(|(start, end)| start <= month && month <= end)
            })
            .collect();

        let mut exceptions = Vec::new();
        let mut run: Option<(NaiveDate, NaiveDate)> = None;
        for month in missing {
            run = match run {
                Some((start, end)) if end.checked_add_months(Months::new(1)) == Some(month) => {
                    Some((start, month))
                }
                Some((start, end)) => {
                    exceptions.push(BusinessException::CurriculumYearsNotSpecified { start, end });
                    Some((month, month))
                }
                None => Some((month, month)),
            };
        }
        if let Some((start, end)) = run {
            exceptions.push(BusinessException::CurriculumYearsNotSpecified { start, end });
        }

        if exceptions.is_empty() {
            Ok(())
        } else {
            Err(MultipleBusinessExceptions::new(exceptions))
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CurriculumValidatorList<'a> {
    pub training_type: TrainingType,
    pub curriculum_file: &'a [String],
    pub equivalence: &'a [String],
    pub curriculum: &'a Curriculum,
    pub current_year: i32,
    pub secondary_graduation_year: Option<i32>,
    pub last_ucl_registration_year: Option<i32>,
    pub last_month_to_justify: NaiveDate,
}

impl ValidatorList for CurriculumValidatorList<'_> {
    fn invariant_validators(&self) -> Vec<Check<'_>> {
        let experiences = AcademicExperiencesCompleted {
            experiences: &self.curriculum.academic,
        };
        let years = CurriculumYearsCovered {
            current_year: self.current_year,
            secondary_graduation_year: self.secondary_graduation_year,
            last_ucl_registration_year: self.last_ucl_registration_year,
            curriculum: self.curriculum,
            last_month_to_justify: self.last_month_to_justify,
        };

        vec![
            Check::validator(CurriculumFileProvided {
                training_type: self.training_type,
                curriculum_file: self.curriculum_file,
            }),
            Check::from_fn(move || experiences.validate()),
            Check::from_fn(move || years.validate()),
            Check::validator(DiplomaEquivalenceProvided {
                training_type: self.training_type,
                equivalence: self.equivalence,
                academic_experiences: &self.curriculum.academic,
            }),
        ]
    }
}
