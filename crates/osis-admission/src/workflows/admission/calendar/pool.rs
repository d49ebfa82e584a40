use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::window::{AnchorDate, WindowEnd};
use crate::workflows::admission::domain::{AccessTitles, Address, Formation};
use crate::workflows::admission::validation::BusinessException;

/// Admission intake category, each with its own yearly registration window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AdmissionPool {
    #[serde(rename = "DOCTORATE_EDUCATION_ENROLLMENT")]
    Doctorate,
    #[serde(rename = "CONTINUING_EDUCATION_ENROLLMENT")]
    ContinuingEducation,
    #[serde(rename = "ADMISSION_POOL_EXTERNAL_ENROLLMENT_CHANGE")]
    ExternalEnrollmentChange,
    #[serde(rename = "ADMISSION_POOL_EXTERNAL_REORIENTATION")]
    ExternalReorientation,
    #[serde(rename = "ADMISSION_POOL_VIP")]
    Vip,
    #[serde(rename = "ADMISSION_POOL_HUE_UCL_PATHWAY_CHANGE")]
    HueUclPathwayChange,
    #[serde(rename = "ADMISSION_POOL_INSTITUT_CHANGE")]
    InstituteChange,
    #[serde(rename = "ADMISSION_POOL_UE5_BELGIAN")]
    Ue5Belgian,
    #[serde(rename = "ADMISSION_POOL_UE5_NON_BELGIAN")]
    Ue5NonBelgian,
    #[serde(rename = "ADMISSION_POOL_HUE5_BELGIUM_RESIDENCY")]
    Hue5BelgiumResidency,
    #[serde(rename = "ADMISSION_POOL_HUE5_FOREIGN_RESIDENCY")]
    Hue5ForeignResidency,
    #[serde(rename = "ADMISSION_POOL_NON_RESIDENT_QUOTA")]
    NonResidentQuota,
}

impl AdmissionPool {
    /// Pools scanned first, over the priority years.
    pub const PRIORITY: [Self; 1] = [Self::ExternalReorientation];

    /// Pools scanned over the regular years, in matching order.
    pub const REGULAR: [Self; 11] = [
        Self::Doctorate,
        Self::ContinuingEducation,
        Self::ExternalEnrollmentChange,
        Self::Vip,
        Self::HueUclPathwayChange,
        Self::InstituteChange,
        Self::Ue5Belgian,
        Self::Ue5NonBelgian,
        Self::Hue5BelgiumResidency,
        Self::Hue5ForeignResidency,
        Self::NonResidentQuota,
    ];

    pub const fn ordered() -> [Self; 12] {
        [
            Self::Doctorate,
            Self::ContinuingEducation,
            Self::ExternalEnrollmentChange,
            Self::ExternalReorientation,
            Self::Vip,
            Self::HueUclPathwayChange,
            Self::InstituteChange,
            Self::Ue5Belgian,
            Self::Ue5NonBelgian,
            Self::Hue5BelgiumResidency,
            Self::Hue5ForeignResidency,
            Self::NonResidentQuota,
        ]
    }

    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Doctorate => "DOCTORATE_EDUCATION_ENROLLMENT",
            Self::ContinuingEducation => "CONTINUING_EDUCATION_ENROLLMENT",
            Self::ExternalEnrollmentChange => "ADMISSION_POOL_EXTERNAL_ENROLLMENT_CHANGE",
            Self::ExternalReorientation => "ADMISSION_POOL_EXTERNAL_REORIENTATION",
            Self::Vip => "ADMISSION_POOL_VIP",
            Self::HueUclPathwayChange => "ADMISSION_POOL_HUE_UCL_PATHWAY_CHANGE",
            Self::InstituteChange => "ADMISSION_POOL_INSTITUT_CHANGE",
            Self::Ue5Belgian => "ADMISSION_POOL_UE5_BELGIAN",
            Self::Ue5NonBelgian => "ADMISSION_POOL_UE5_NON_BELGIAN",
            Self::Hue5BelgiumResidency => "ADMISSION_POOL_HUE5_BELGIUM_RESIDENCY",
            Self::Hue5ForeignResidency => "ADMISSION_POOL_HUE5_FOREIGN_RESIDENCY",
            Self::NonResidentQuota => "ADMISSION_POOL_NON_RESIDENT_QUOTA",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Doctorate => "Doctorate enrolment",
            Self::ContinuingEducation => "Continuing education enrolment",
            Self::ExternalEnrollmentChange => "External enrolment change",
            Self::ExternalReorientation => "External reorientation",
            Self::Vip => "VIP",
            Self::HueUclPathwayChange => "Non-EU+5 UCLouvain pathway change",
            Self::InstituteChange => "Institute change",
            Self::Ue5Belgian => "EU+5 with Belgian diploma",
            Self::Ue5NonBelgian => "EU+5 without Belgian diploma",
            Self::Hue5BelgiumResidency => "Non-EU+5 residing in Belgium",
            Self::Hue5ForeignResidency => "Non-EU+5 residing abroad",
            Self::NonResidentQuota => "Non-resident quota",
        }
    }

    /// Day the window of academic year N opens, relative to N.
    pub const fn cutover(self) -> AnchorDate {
        match self {
            Self::ExternalEnrollmentChange => AnchorDate::new(1, 10, 0),
            Self::ExternalReorientation => AnchorDate::new(1, 11, 0),
            Self::InstituteChange => AnchorDate::new(1, 10, -1),
            Self::Ue5NonBelgian | Self::Hue5BelgiumResidency => AnchorDate::new(1, 9, -1),
            Self::Hue5ForeignResidency => AnchorDate::new(1, 5, -1),
            Self::NonResidentQuota => AnchorDate::new(1, 6, 0),
            Self::Doctorate
            | Self::ContinuingEducation
            | Self::Vip
            | Self::HueUclPathwayChange
            | Self::Ue5Belgian => AnchorDate::new(1, 11, -1),
        }
    }

    pub const fn end(self) -> WindowEnd {
        match self {
            Self::ExternalEnrollmentChange => WindowEnd::On(AnchorDate::new(31, 10, 0)),
            Self::ExternalReorientation => WindowEnd::On(AnchorDate::new(15, 2, 1)),
            Self::Hue5ForeignResidency => WindowEnd::On(AnchorDate::new(31, 3, 0)),
            Self::NonResidentQuota => WindowEnd::On(AnchorDate::new(3, 6, 0)),
            _ => WindowEnd::DayBeforeNextCutover,
        }
    }

    /// Whether the candidate falls in this pool for academic year `context.year`.
    ///
    /// Address-dependent pools refuse to guess when the legal address is missing.
    pub fn matches(self, context: &PoolContext<'_>) -> Result<bool, BusinessException> {
        let training_type = context.formation.training_type;
        let declarations = match (self, context.declarations) {
            (Self::Doctorate, _) => return Ok(training_type.is_doctorate()),
            (Self::ContinuingEducation, _) => return Ok(training_type.is_continuing()),
            (_, None) => return Ok(false),
            (_, Some(declarations)) => declarations,
        };
        let outside_quota = !context.is_quota_non_resident();

        let matches = match self {
            Self::Doctorate | Self::ContinuingEducation => false,
            Self::ExternalEnrollmentChange => {
                training_type.is_bachelor()
                    && declarations.modification == Some(true)
                    && outside_quota
            }
            Self::ExternalReorientation => {
                training_type.is_bachelor()
                    && declarations.reorientation == Some(true)
                    && outside_quota
            }
            Self::Vip => training_type.is_second_cycle() && declarations.has_scholarship(),
            Self::HueUclPathwayChange => {
                !context.eu_plus_five
                    && context.last_ucl_registration_year == Some(context.year - 1)
                    && outside_quota
            }
            Self::InstituteChange => {
                let address = context.require_legal_address()?;
                context.titles.has_belgian_condition()
                    && address.country.is_belgium()
                    && context
                        .institute_changes
                        .get(&context.year)
                        .copied()
                        .unwrap_or(false)
                    && outside_quota
            }
            Self::Ue5Belgian => {
                context.eu_plus_five && context.titles.has_belgian_condition() && outside_quota
            }
            Self::Ue5NonBelgian => {
                context.eu_plus_five
                    && !context.titles.valid_conditions().is_empty()
                    && !context.titles.has_belgian_condition()
                    && outside_quota
            }
            Self::Hue5BelgiumResidency => {
                let address = context.require_legal_address()?;
                !context.eu_plus_five && address.country.is_belgium() && outside_quota
            }
            Self::Hue5ForeignResidency => {
                let address = context.require_legal_address()?;
                !context.eu_plus_five && !address.country.is_belgium() && outside_quota
            }
            Self::NonResidentQuota => !outside_quota,
        };
        Ok(matches)
    }
}

/// Answers given on the proposition that steer pool determination.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolDeclarations {
    pub non_resident: Option<bool>,
    pub reorientation: Option<bool>,
    pub regular_registration_proof: Vec<String>,
    pub reorientation_form: Vec<String>,
    pub modification: Option<bool>,
    pub modification_form: Vec<String>,
    pub regular_registration_proof_for_modification: Vec<String>,
    pub double_degree_scholarship: Option<String>,
    pub erasmus_mundus_scholarship: Option<String>,
    pub international_scholarship: Option<String>,
}

impl PoolDeclarations {
    pub fn has_scholarship(&self) -> bool {
        [
            &self.double_degree_scholarship,
            &self.erasmus_mundus_scholarship,
            &self.international_scholarship,
        ]
        .iter()
        .any(|scholarship| scholarship.is_some())
    }

    /// Answered no, or answered yes with both supporting documents.
    pub fn reorientation_confirmed(&self) -> bool {
        match self.reorientation {
            None => false,
            Some(false) => true,
            Some(true) => {
                !self.regular_registration_proof.is_empty() && !self.reorientation_form.is_empty()
            }
        }
    }

    pub fn modification_confirmed(&self) -> bool {
        match self.modification {
            None => false,
            Some(false) => true,
            Some(true) => {
                !self.modification_form.is_empty()
                    && !self.regular_registration_proof_for_modification.is_empty()
            }
        }
    }
}

/// Everything a pool criterion reads for one academic year.
#[derive(Debug, Clone, Copy)]
pub struct PoolContext<'a> {
    pub year: i32,
    pub formation: &'a Formation,
    pub titles: &'a AccessTitles,
    pub declarations: Option<&'a PoolDeclarations>,
    pub eu_plus_five: bool,
    pub last_ucl_registration_year: Option<i32>,
    pub legal_address: Option<&'a Address>,
    pub institute_changes: &'a BTreeMap<i32, bool>,
}

impl<'a> PoolContext<'a> {
    pub fn is_quota_non_resident(&self) -> bool {
        is_quota_non_resident(self.formation, self.declarations)
    }

    fn require_legal_address(&self) -> Result<&'a Address, BusinessException> {
        self.legal_address
            .ok_or(BusinessException::LegalAddressNotCompleted)
    }
}

/// Quota training with a candidate declared non-resident within the meaning of the decree.
pub fn is_quota_non_resident(formation: &Formation, declarations: Option<&PoolDeclarations>) -> bool {
    formation.identity.is_quota()
        && declarations.is_some_and(|declarations| declarations.non_resident == Some(true))
}
