use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

use super::pool::{is_quota_non_resident, AdmissionPool, PoolContext, PoolDeclarations};
use super::window::{EnrolmentPeriod, PoolWindow};
use crate::config::EngineConfig;
use crate::workflows::admission::domain::{AccessTitles, CandidateId, Formation};
use crate::workflows::admission::ports::{CandidateProfileTranslator, FormationTranslator};
use crate::workflows::admission::validation::BusinessException;

/// Academic years before and after the current civil year covered by the standard calendar.
const YEARS_BEFORE: i32 = 2;
const YEARS_AFTER: i32 = 6;

/// Pool and academic year a proposition falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeterminedPool {
    pub year: i32,
    pub pool: AdmissionPool,
}

/// What pool determination needs to know about the request.
#[derive(Debug, Clone, Copy)]
pub struct PoolRequest<'a> {
    pub formation: &'a Formation,
    pub candidate: &'a CandidateId,
    pub titles: &'a AccessTitles,
    /// `None` when no proposition exists yet, which leaves only the doctorate and continuing
    /// education pools reachable.
    pub declarations: Option<&'a PoolDeclarations>,
}

/// Registration calendar evaluated at a fixed date.
#[derive(Debug, Clone)]
pub struct RegistrationCalendar {
    windows: Vec<PoolWindow>,
    today: NaiveDate,
    forbid_non_resident_quota: bool,
    medicine_dentistry_period: Option<EnrolmentPeriod>,
}

impl RegistrationCalendar {
    pub fn new(windows: Vec<PoolWindow>, today: NaiveDate) -> Self {
        Self {
            windows,
            today,
            forbid_non_resident_quota: true,
            medicine_dentistry_period: None,
        }
    }

    /// Standard windows of every pool around `today`.
    pub fn standard(today: NaiveDate, config: &EngineConfig) -> Self {
        let years = today.year() - YEARS_BEFORE..=today.year() + YEARS_AFTER;
        Self::new(PoolWindow::standard_for_years(years), today)
            .with_forbid_non_resident_quota(config.forbid_non_resident_quota)
    }

    pub fn with_forbid_non_resident_quota(mut self, forbid: bool) -> Self {
        self.forbid_non_resident_quota = forbid;
        self
    }

    pub fn with_medicine_dentistry_period(mut self, period: EnrolmentPeriod) -> Self {
        self.medicine_dentistry_period = Some(period);
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn windows(&self) -> &[PoolWindow] {
        &self.windows
    }

    /// `(pool, academic year)` pairs whose window contains today.
    pub fn open_pools(&self) -> Vec<(AdmissionPool, i32)> {
        self.windows
            .iter()
            .filter(|window| window.is_open(self.today))
            .map(|window| (window.pool, window.year))
            .collect()
    }

    fn is_open_any_year(open: &[(AdmissionPool, i32)], pool: AdmissionPool) -> bool {
        open.iter().any(|(candidate, _)| *candidate == pool)
    }

    /// Distinct academic years with at least one open window, oldest first.
    fn open_years(open: &[(AdmissionPool, i32)]) -> Vec<i32> {
        open.iter()
            .map(|(_, year)| *year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Determine the academic year and admission pool of a request.
    ///
    /// Pending declarations are reported before any pool is scanned, so a missing answer is
    /// never confused with an ineligible candidate.
    pub fn determine_year_and_pool<P>(
        &self,
        request: &PoolRequest<'_>,
        profile: &P,
    ) -> Result<DeterminedPool, BusinessException>
    where
        P: CandidateProfileTranslator + ?Sized,
    {
        let formation = request.formation;
        let open = self.open_pools();

        self.check_residence_declared(request)?;
        let quota_non_resident = is_quota_non_resident(formation, request.declarations);
        let bachelor = formation.training_type.is_bachelor();

        if let Some(declarations) = request.declarations {
            if bachelor && !quota_non_resident {
                if Self::is_open_any_year(&open, AdmissionPool::ExternalReorientation)
                    && !declarations.reorientation_confirmed()
                {
                    return Err(BusinessException::ReorientationNotConfirmed);
                }
                if Self::is_open_any_year(&open, AdmissionPool::ExternalEnrollmentChange)
                    && !declarations.modification_confirmed()
                {
                    return Err(BusinessException::ExternalEnrollmentChangeNotConfirmed);
                }
            }
        }

        if quota_non_resident
            && !open.contains(&(AdmissionPool::NonResidentQuota, formation.identity.year))
        {
            return Err(BusinessException::NonResidentQuotaPoolNotOpen);
        }

        let identification = profile.identification(request.candidate);
        if identification.nationality.is_none() {
            return Err(BusinessException::IdentificationNotCompleted);
        }
        let coordinates = profile.coordinates(request.candidate);
        let years = Self::open_years(&open);
        let institute_changes = profile.institute_changes(request.candidate, &years);

        // Priority pools win over every regular pool, whatever the year.
        for pools in [&AdmissionPool::PRIORITY[..], &AdmissionPool::REGULAR[..]] {
            for &year in &years {
                let context = PoolContext {
                    year,
                    formation,
                    titles: request.titles,
                    declarations: request.declarations,
                    eu_plus_five: identification.is_eu_plus_five(),
                    last_ucl_registration_year: identification.last_ucl_registration_year,
                    legal_address: coordinates.legal_address.as_ref(),
                    institute_changes: &institute_changes,
                };
                for &pool in pools {
                    let is_open = open.contains(&(pool, year));
                    let matches = pool.matches(&context)?;
                    debug!(
                        pool = pool.wire_name(),
                        year,
                        open = is_open,
                        matches,
                        candidate = %request.candidate,
                        formation = %formation.identity,
                        "pool determination"
                    );
                    if is_open && matches {
                        return Ok(DeterminedPool { year, pool });
                    }
                }
            }
        }

        Err(BusinessException::NoMatchingPool)
    }

    fn check_residence_declared(&self, request: &PoolRequest<'_>) -> Result<(), BusinessException> {
        let formation = request.formation;
        let declarations = match request.declarations {
            Some(declarations) if formation.identity.is_quota() => declarations,
            _ => return Ok(()),
        };
        match declarations.non_resident {
            None => Err(BusinessException::ResidenceNotDeclared),
            Some(true) if self.forbid_non_resident_quota => {
                Err(BusinessException::ResidenceUnavailableForEnrolment {
                    title_fr: formation.title_fr.clone(),
                    title_en: formation.title_en.clone(),
                })
            }
            Some(_) => Ok(()),
        }
    }

    /// Determine the pool, then check the result is consistent with the training offering,
    /// the specific registration period and what was submitted.
    pub fn verify<P, F>(
        &self,
        request: &PoolRequest<'_>,
        submitted: Option<DeterminedPool>,
        profile: &P,
        formations: &F,
    ) -> Result<DeterminedPool, BusinessException>
    where
        P: CandidateProfileTranslator + ?Sized,
        F: FormationTranslator + ?Sized,
    {
        let determined = self.determine_year_and_pool(request, profile)?;
        let identity = &request.formation.identity;

        if determined.year != identity.year && !formations.exists(&identity.acronym, determined.year)
        {
            return Err(BusinessException::FormationNotFound {
                acronym: identity.acronym.clone(),
                year: determined.year,
            });
        }

        self.check_specific_period(request.formation)?;

        if let Some(submitted) = submitted {
            if submitted != determined {
                return Err(BusinessException::PoolOrYearMismatch {
                    computed_year: determined.year,
                    computed_pool: determined.pool,
                    submitted_year: submitted.year,
                    submitted_pool: submitted.pool,
                });
            }
        }

        Ok(determined)
    }

    fn check_specific_period(&self, formation: &Formation) -> Result<(), BusinessException> {
        if !(formation.training_type.is_bachelor() && formation.is_medicine_or_dentistry) {
            return Ok(());
        }
        match self.medicine_dentistry_period {
            Some(period) if !period.contains(self.today) => {
                Err(BusinessException::OutsideSpecificEnrolmentPeriod {
                    opens_on: period.start,
                })
            }
            _ => Ok(()),
        }
    }
}
