use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use uuid::Uuid;

pub const BELGIUM: &str = "BE";

/// EU member states by ISO 3166-1 alpha-2 code.
const EU_COUNTRIES: [&str; 27] = [
    "AT", "BE", "BG", "CY", "CZ", "DE", "DK", "EE", "ES", "FI", "FR", "GR", "HR", "HU", "IE",
    "IT", "LT", "LU", "LV", "MT", "NL", "PL", "PT", "RO", "SE", "SI", "SK",
];

/// Countries treated like EU members for pool determination.
const PLUS_FIVE_COUNTRIES: [&str; 5] = ["CH", "IS", "NO", "LI", "MC"];

/// Trainings whose first-year places are capped for non-residents.
pub const QUOTA_ACRONYMS: [&str; 3] = ["KINE1BA", "VETE1BA", "LOGO1BA"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropositionId(pub Uuid);

impl PropositionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PropositionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PropositionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExperienceId(pub Uuid);

impl ExperienceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ExperienceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ExperienceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Registration number of a candidate (`matricule`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub String);

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountryCode(pub String);

impl CountryCode {
    pub fn new(code: &str) -> Self {
        Self(code.trim().to_ascii_uppercase())
    }

    pub fn is_belgium(&self) -> bool {
        self.0 == BELGIUM
    }

    pub fn is_eu(&self) -> bool {
        EU_COUNTRIES.contains(&self.0.as_str())
    }

    pub fn is_plus_five(&self) -> bool {
        PLUS_FIVE_COUNTRIES.contains(&self.0.as_str())
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Training offering identified by acronym and academic year.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FormationIdentity {
    pub acronym: String,
    pub year: i32,
}

impl FormationIdentity {
    pub fn new(acronym: &str, year: i32) -> Self {
        Self {
            acronym: acronym.to_string(),
            year,
        }
    }

    pub fn is_quota(&self) -> bool {
        QUOTA_ACRONYMS.contains(&self.acronym.as_str())
    }
}

impl fmt::Display for FormationIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.acronym, self.year)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrainingType {
    Bachelor,
    #[serde(rename = "MASTER_MA_120")]
    MasterMa120,
    #[serde(rename = "MASTER_MA_60")]
    MasterMa60,
    #[serde(rename = "MASTER_MD_120")]
    MasterMd120,
    #[serde(rename = "MASTER_MS_120")]
    MasterMs120,
    #[serde(rename = "MASTER_MS_180_240")]
    MasterMs180240,
    #[serde(rename = "MASTER_M1")]
    MasterM1,
    MasterMc,
    Aggregation,
    Capaes,
    Phd,
    FormationPhd,
    ResearchCertificate,
    CertificateOfParticipation,
    CertificateOfSuccess,
    CertificateOfHoldingCredits,
    UniversityFirstCycleCertificate,
    UniversitySecondCycleCertificate,
}

impl TrainingType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bachelor => "Bachelor",
            Self::MasterMa120 => "Master 120 credits",
            Self::MasterMa60 => "Master 60 credits",
            Self::MasterMd120 => "Master 120 credits (didactic)",
            Self::MasterMs120 => "Master 120 credits (specialised)",
            Self::MasterMs180240 => "Master 180-240 credits",
            Self::MasterM1 => "Master first year",
            Self::MasterMc => "Specialised master",
            Self::Aggregation => "Teaching aggregation",
            Self::Capaes => "CAPAES",
            Self::Phd => "Doctorate",
            Self::FormationPhd => "Doctoral training",
            Self::ResearchCertificate => "Research certificate",
            Self::CertificateOfParticipation => "Certificate of participation",
            Self::CertificateOfSuccess => "Certificate of success",
            Self::CertificateOfHoldingCredits => "Certificate of holding credits",
            Self::UniversityFirstCycleCertificate => "University first cycle certificate",
            Self::UniversitySecondCycleCertificate => "University second cycle certificate",
        }
    }

    pub const fn is_bachelor(self) -> bool {
        matches!(self, Self::Bachelor)
    }

    pub const fn is_doctorate(self) -> bool {
        matches!(self, Self::Phd)
    }

    pub const fn is_master(self) -> bool {
        matches!(
            self,
            Self::MasterMa120
                | Self::MasterMa60
                | Self::MasterMd120
                | Self::MasterMs120
                | Self::MasterMs180240
                | Self::MasterM1
                | Self::MasterMc
        )
    }

    pub const fn is_aggregation_or_capaes(self) -> bool {
        matches!(self, Self::Aggregation | Self::Capaes)
    }

    /// Second cycle trainings eligible to the VIP pool.
    pub const fn is_second_cycle(self) -> bool {
        self.is_master()
            || matches!(
                self,
                Self::Aggregation | Self::Capaes | Self::UniversitySecondCycleCertificate
            )
    }

    pub const fn is_continuing(self) -> bool {
        matches!(
            self,
            Self::CertificateOfParticipation
                | Self::CertificateOfSuccess
                | Self::CertificateOfHoldingCredits
                | Self::UniversityFirstCycleCertificate
        )
    }
}

/// Static reference data about a training offering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formation {
    pub identity: FormationIdentity,
    pub training_type: TrainingType,
    pub title_fr: String,
    pub title_en: String,
    #[serde(default)]
    pub campus: Option<String>,
    #[serde(default)]
    pub is_medicine_or_dentistry: bool,
    #[serde(default)]
    pub awards_scholarships: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestType {
    Admission,
    #[serde(rename = "INSCRIPTION")]
    Enrolment,
}

/// Prior qualification through which a candidate may access a training.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AccessCondition {
    #[serde(rename = "DIPLOMATION_SECONDAIRE_BELGE")]
    BelgianSecondaryDiploma,
    #[serde(rename = "DIPLOMATION_SECONDAIRE_ETRANGER")]
    ForeignSecondaryDiploma,
    #[serde(rename = "ALTERNATIVE_ETUDES_SECONDAIRES")]
    AlternativeSecondaryStudies,
    #[serde(rename = "POTENTIEL_BACHELIER_BELGE_SANS_DIPLOMATION")]
    BelgianBachelorPotentialWithoutDiploma,
    #[serde(rename = "DIPLOMATION_ACADEMIQUE_BELGE")]
    BelgianAcademicDiploma,
    #[serde(rename = "DIPLOMATION_ACADEMIQUE_ETRANGERE")]
    ForeignAcademicDiploma,
    #[serde(rename = "DIPLOMATION_POTENTIEL_MASTER_BELGE")]
    BelgianMasterPotential,
    #[serde(rename = "POTENTIEL_MASTER_BELGE_SANS_DIPLOMATION")]
    BelgianMasterPotentialWithoutDiploma,
    #[serde(rename = "DIPLOMATION_POTENTIEL_MASTER_ETRANGER")]
    ForeignMasterPotential,
    #[serde(rename = "DIPLOMATION_POTENTIEL_DOCTORAT_BELGE")]
    BelgianDoctoratePotential,
    #[serde(rename = "DIPLOMATION_POTENTIEL_DOCTORAT_ETRANGER")]
    ForeignDoctoratePotential,
    #[serde(rename = "POTENTIEL_ACCES_VAE")]
    PriorExperienceValidation,
}

impl AccessCondition {
    /// Conditions backed by a Belgian qualification.
    pub const fn is_belgian(self) -> bool {
        matches!(
            self,
            Self::BelgianMasterPotential
                | Self::BelgianMasterPotentialWithoutDiploma
                | Self::BelgianSecondaryDiploma
                | Self::BelgianAcademicDiploma
                | Self::BelgianBachelorPotentialWithoutDiploma
                | Self::BelgianDoctoratePotential
                | Self::PriorExperienceValidation
                | Self::AlternativeSecondaryStudies
        )
    }

    /// Conditions a training type recognises.
    pub fn relevant_for(training_type: TrainingType) -> &'static [AccessCondition] {
        use AccessCondition::*;
        if training_type.is_bachelor() {
            &[
                BelgianSecondaryDiploma,
                ForeignSecondaryDiploma,
                AlternativeSecondaryStudies,
                BelgianBachelorPotentialWithoutDiploma,
                PriorExperienceValidation,
            ]
        } else if training_type.is_doctorate() || training_type == TrainingType::FormationPhd {
            &[
                BelgianDoctoratePotential,
                ForeignDoctoratePotential,
                PriorExperienceValidation,
            ]
        } else if training_type.is_second_cycle() {
            &[
                BelgianAcademicDiploma,
                ForeignAcademicDiploma,
                BelgianMasterPotential,
                BelgianMasterPotentialWithoutDiploma,
                ForeignMasterPotential,
                PriorExperienceValidation,
            ]
        } else {
            &[
                BelgianSecondaryDiploma,
                ForeignSecondaryDiploma,
                BelgianAcademicDiploma,
                ForeignAcademicDiploma,
                PriorExperienceValidation,
            ]
        }
    }
}

/// Access conditions evaluated for a candidate against one training type.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccessTitles {
    pub conditions: BTreeMap<AccessCondition, bool>,
}

impl AccessTitles {
    /// Evaluate the matrix row of `training_type` against the qualifications a candidate holds.
    pub fn compute(training_type: TrainingType, held: &BTreeSet<AccessCondition>) -> Self {
        let conditions = AccessCondition::relevant_for(training_type)
            .iter()
            .map(|condition| (*condition, held.contains(condition)))
            .collect();
        Self { conditions }
    }

    pub fn valid_conditions(&self) -> Vec<AccessCondition> {
        self.conditions
            .iter()
            .filter(|(_, valid)| **valid)
            .map(|(condition, _)| *condition)
            .collect()
    }

    pub fn has_belgian_condition(&self) -> bool {
        self.valid_conditions()
            .iter()
            .any(|condition| condition.is_belgian())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Identification {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub nationality: Option<CountryCode>,
    #[serde(default)]
    pub last_ucl_registration_year: Option<i32>,
}

impl Identification {
    /// EU nationality or one of the five assimilated countries.
    pub fn is_eu_plus_five(&self) -> bool {
        self.nationality
            .as_ref()
            .map(|country| country.is_eu() || country.is_plus_five())
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub country: CountryCode,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Coordinates {
    #[serde(default)]
    pub legal_address: Option<Address>,
    #[serde(default)]
    pub contact_address: Option<Address>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GotDiploma {
    #[serde(rename = "OUI")]
    Yes,
    #[serde(rename = "CETTE_ANNEE")]
    ThisYear,
    #[serde(rename = "NON")]
    No,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BelgianSecondaryDiploma {
    #[serde(default)]
    pub diploma: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignSecondaryDiploma {
    pub country: CountryCode,
    /// Language code of the diploma, when known.
    #[serde(default)]
    pub linguistic_regime: Option<String>,
    #[serde(default)]
    pub diploma: Vec<String>,
    #[serde(default)]
    pub translated_diploma: Vec<String>,
    #[serde(default)]
    pub equivalence_decision: Vec<String>,
    #[serde(default)]
    pub transcript: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AlternativeSecondaryStudies {
    #[serde(default)]
    pub first_cycle_admission_exam: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SecondaryStudies {
    #[serde(default)]
    pub got_diploma: Option<GotDiploma>,
    #[serde(default)]
    pub graduation_year: Option<i32>,
    #[serde(default)]
    pub belgian_diploma: Option<BelgianSecondaryDiploma>,
    #[serde(default)]
    pub foreign_diploma: Option<ForeignSecondaryDiploma>,
    #[serde(default)]
    pub alternative: Option<AlternativeSecondaryStudies>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcademicExperience {
    pub id: ExperienceId,
    pub name: String,
    pub country: CountryCode,
    pub obtained_diploma: bool,
    /// Academic years (start year) the experience covers.
    #[serde(default)]
    pub years: Vec<i32>,
    #[serde(default = "complete_by_default")]
    pub complete: bool,
}

fn complete_by_default() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonAcademicExperience {
    pub id: ExperienceId,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Curriculum {
    #[serde(default)]
    pub academic: Vec<AcademicExperience>,
    #[serde(default)]
    pub non_academic: Vec<NonAcademicExperience>,
}

impl Curriculum {
    pub fn incomplete_academic(&self) -> Vec<&AcademicExperience> {
        self.academic
            .iter()
            .filter(|experience| !experience.complete)
            .collect()
    }
}

/// Tab of the candidate form on which a specific question is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QuestionTab {
    #[serde(rename = "CHOIX_FORMATION")]
    TrainingChoice,
    #[serde(rename = "CURRICULUM")]
    Curriculum,
    #[serde(rename = "ETUDES_SECONDAIRES")]
    SecondaryStudies,
    #[serde(rename = "INFORMATIONS_ADDITIONNELLES")]
    AdditionalInformation,
}

impl QuestionTab {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::TrainingChoice,
            Self::Curriculum,
            Self::SecondaryStudies,
            Self::AdditionalInformation,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::TrainingChoice => "Course choice",
            Self::Curriculum => "Curriculum",
            Self::SecondaryStudies => "Secondary studies",
            Self::AdditionalInformation => "Additional information",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionKind {
    Text,
    Document,
    Selection,
    /// Informative block without answer.
    Message,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecificQuestion {
    pub id: String,
    pub tab: QuestionTab,
    pub kind: QuestionKind,
    pub required: bool,
}
