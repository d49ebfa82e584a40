//! Tuition, assimilation and refund account information declared by a candidate.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Situation through which a non-EU candidate claims to be assimilated to a Belgian student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AssimilationSituation {
    #[serde(rename = "AUTORISATION_ETABLISSEMENT_OU_RESIDENT_LONGUE_DUREE")]
    SettlementOrLongTermResident,
    #[serde(rename = "REFUGIE_OU_APATRIDE_OU_PROTECTION_SUBSIDIAIRE_TEMPORAIRE")]
    RefugeeOrProtected,
    #[serde(rename = "AUTORISATION_SEJOUR_ET_REVENUS_PROFESSIONNELS_OU_REMPLACEMENT")]
    ResidencePermitWithIncome,
    #[serde(rename = "PRIS_EN_CHARGE_OU_DESIGNE_CPAS")]
    SupportedBySocialWelfare,
    #[serde(rename = "PROCHE_A_NATIONALITE_UE_OU_RESPECTE_ASSIMILATIONS_1_A_4")]
    RelativeOfAssimilated,
    #[serde(rename = "A_BOURSE_ARTICLE_105_PARAGRAPH_2")]
    Scholarship,
    #[serde(rename = "RESIDENT_LONGUE_DUREE_UE_HORS_BELGIQUE")]
    EuLongTermResidentOutsideBelgium,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResidencePermitChoice {
    #[serde(rename = "TITULAIRE_CARTE_RESIDENT_LONGUE_DUREE")]
    LongTermResidentCard,
    #[serde(rename = "TITULAIRE_CARTE_ETRANGER")]
    ForeignerCard,
    #[serde(rename = "TITULAIRE_CARTE_SEJOUR_MEMBRE_UE")]
    EuMemberResidenceCard,
    #[serde(rename = "TITULAIRE_CARTE_SEJOUR_PERMANENT_MEMBRE_UE")]
    EuMemberPermanentResidenceCard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProtectionChoice {
    #[serde(rename = "REFUGIE")]
    Refugee,
    #[serde(rename = "DEMANDEUR_ASILE")]
    AsylumSeeker,
    #[serde(rename = "PROTECTION_SUBSIDIAIRE")]
    SubsidiaryProtection,
    #[serde(rename = "PROTECTION_TEMPORAIRE")]
    TemporaryProtection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IncomeChoice {
    #[serde(rename = "AUTORISATION_SEJOUR_ET_REVENUS_PROFESSIONNELS")]
    ProfessionalIncome,
    #[serde(rename = "AUTORISATION_SEJOUR_ET_REVENUS_DE_REMPLACEMENT")]
    ReplacementIncome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Relationship {
    #[serde(rename = "PERE")]
    Father,
    #[serde(rename = "MERE")]
    Mother,
    #[serde(rename = "TUTEUR_LEGAL")]
    LegalGuardian,
    #[serde(rename = "CONJOINT")]
    Spouse,
    #[serde(rename = "COHABITANT_LEGAL")]
    LegalCohabitant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RelativeSituationChoice {
    #[serde(rename = "A_NATIONALITE_UE")]
    EuNational,
    #[serde(rename = "TITULAIRE_TITRE_SEJOUR_LONGUE_DUREE")]
    LongTermResidencePermit,
    #[serde(
        rename = "CANDIDATE_REFUGIE_OU_REFUGIE_OU_APATRIDE_OU_PROTECTION_SUBSIDIAIRE_TEMPORAIRE"
    )]
    RefugeeOrProtected,
    #[serde(rename = "AUTORISATION_SEJOUR_ET_REVENUS_PROFESSIONNELS_OU_REMPLACEMENT")]
    ResidencePermitWithIncome,
    #[serde(rename = "PRIS_EN_CHARGE_OU_DESIGNE_CPAS")]
    SupportedBySocialWelfare,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ScholarshipChoice {
    #[serde(rename = "A_BOURSE_ETUDES_COMMUNAUTE_FRANCAISE")]
    FrenchCommunityGrant,
    #[serde(rename = "A_BOURSE_COOPERATION_DEVELOPPEMENT")]
    DevelopmentCooperationGrant,
}

/// Supporting documents an assimilation situation may require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssimilationDocument {
    CarteResidentLongueDuree,
    CarteCireSejourIllimiteEtranger,
    CarteSejourMembreUe,
    CarteSejourPermanentMembreUe,
    CarteABRefugie,
    #[serde(rename = "annexe_25_26_refugies_apatrides")]
    Annexe2526RefugiesApatrides,
    AttestationImmatriculation,
    CarteAB,
    DecisionProtectionSubsidiaire,
    DecisionProtectionTemporaire,
    #[serde(rename = "titre_sejour_3_mois_professionel")]
    TitreSejour3MoisProfessionel,
    FichesRemuneration,
    #[serde(rename = "titre_sejour_3_mois_remplacement")]
    TitreSejour3MoisRemplacement,
    PreuveAllocationsChomagePensionIndemnite,
    AttestationCpas,
    CompositionMenageActeNaissance,
    ActeTutelle,
    CompositionMenageActeMariage,
    AttestationCohabitationLegale,
    CarteIdentiteParent,
    TitreSejourLongueDureeParent,
    #[serde(rename = "annexe_25_26_refugies_apatrides_decision_protection_parent")]
    Annexe2526RefugiesApatridesDecisionProtectionParent,
    #[serde(rename = "titre_sejour_3_mois_parent")]
    TitreSejour3MoisParent,
    FichesRemunerationParent,
    AttestationCpasParent,
    DecisionBourseCfwb,
    AttestationBoursier,
    TitreIdentiteSejourLongueDureeUe,
    TitreSejourBelgique,
}

/// One step of the assimilation form: either a nested choice or a document to upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssimilationRequirement {
    ResidencePermitChoice,
    ProtectionChoice,
    IncomeChoice,
    Relationship,
    RelativeSituationChoice,
    ScholarshipChoice,
    Document(AssimilationDocument),
}

impl AssimilationSituation {
    pub fn requirements(self) -> &'static [AssimilationRequirement] {
        use AssimilationDocument as Doc;
        use AssimilationRequirement as Req;
        match self {
            Self::SettlementOrLongTermResident => &[Req::ResidencePermitChoice],
            Self::RefugeeOrProtected => &[Req::ProtectionChoice],
            Self::ResidencePermitWithIncome => &[Req::IncomeChoice],
            Self::SupportedBySocialWelfare => &[Req::Document(Doc::AttestationCpas)],
            Self::RelativeOfAssimilated => &[Req::Relationship, Req::RelativeSituationChoice],
            Self::Scholarship => &[Req::ScholarshipChoice],
            Self::EuLongTermResidentOutsideBelgium => &[
                Req::Document(Doc::TitreIdentiteSejourLongueDureeUe),
                Req::Document(Doc::TitreSejourBelgique),
            ],
        }
    }
}

impl ResidencePermitChoice {
    pub fn documents(self) -> &'static [AssimilationDocument] {
        use AssimilationDocument as Doc;
        match self {
            Self::LongTermResidentCard => &[Doc::CarteResidentLongueDuree],
            Self::ForeignerCard => &[Doc::CarteCireSejourIllimiteEtranger],
            Self::EuMemberResidenceCard => &[Doc::CarteSejourMembreUe],
            Self::EuMemberPermanentResidenceCard => &[Doc::CarteSejourPermanentMembreUe],
        }
    }
}

impl ProtectionChoice {
    pub fn documents(self) -> &'static [AssimilationDocument] {
        use AssimilationDocument as Doc;
        match self {
            Self::Refugee => &[Doc::CarteABRefugie],
            Self::AsylumSeeker => &[
                Doc::Annexe2526RefugiesApatrides,
                Doc::AttestationImmatriculation,
            ],
            Self::SubsidiaryProtection => &[Doc::CarteAB, Doc::DecisionProtectionSubsidiaire],
            Self::TemporaryProtection => &[Doc::DecisionProtectionTemporaire],
        }
    }
}

impl IncomeChoice {
    pub fn documents(self) -> &'static [AssimilationDocument] {
        use AssimilationDocument as Doc;
        match self {
            Self::ProfessionalIncome => &[Doc::TitreSejour3MoisProfessionel, Doc::FichesRemuneration],
            Self::ReplacementIncome => &[
                Doc::TitreSejour3MoisRemplacement,
                Doc::PreuveAllocationsChomagePensionIndemnite,
            ],
        }
    }
}

impl Relationship {
    pub fn documents(self) -> &'static [AssimilationDocument] {
        use AssimilationDocument as Doc;
        match self {
            Self::Father | Self::Mother => &[Doc::CompositionMenageActeNaissance],
            Self::LegalGuardian => &[Doc::ActeTutelle],
            Self::Spouse => &[Doc::CompositionMenageActeMariage],
            Self::LegalCohabitant => &[Doc::AttestationCohabitationLegale],
        }
    }
}

impl RelativeSituationChoice {
    pub fn documents(self) -> &'static [AssimilationDocument] {
        use AssimilationDocument as Doc;
        match self {
            Self::EuNational => &[Doc::CarteIdentiteParent],
            Self::LongTermResidencePermit => &[Doc::TitreSejourLongueDureeParent],
            Self::RefugeeOrProtected => &[Doc::Annexe2526RefugiesApatridesDecisionProtectionParent],
            Self::ResidencePermitWithIncome => {
                &[Doc::TitreSejour3MoisParent, Doc::FichesRemunerationParent]
            }
            Self::SupportedBySocialWelfare => &[Doc::AttestationCpasParent],
        }
    }
}

impl ScholarshipChoice {
    pub fn documents(self) -> &'static [AssimilationDocument] {
        use AssimilationDocument as Doc;
        match self {
            Self::FrenchCommunityGrant => &[Doc::DecisionBourseCfwb],
            Self::DevelopmentCooperationGrant => &[Doc::AttestationBoursier],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BankAccountType {
    Iban,
    #[serde(rename = "AUTRE_FORMAT")]
    OtherFormat,
    #[serde(rename = "NON")]
    NoAccount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SportAffiliation {
    #[serde(rename = "LOUVAIN_WOLUWE")]
    LouvainWoluwe,
    #[serde(rename = "MONS_UCL")]
    MonsUcl,
    #[serde(rename = "SAINT_LOUIS")]
    SaintLouis,
    #[serde(rename = "NON")]
    No,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Accounting {
    pub attended_recently_french_community: Option<bool>,
    pub absence_of_debt_certificate: Vec<String>,

    pub french_community_study_allowance: Option<bool>,
    pub staff_child: Option<bool>,
    pub staff_child_certificate: Vec<String>,

    pub assimilation_situation: Option<AssimilationSituation>,
    pub residence_permit_choice: Option<ResidencePermitChoice>,
    pub protection_choice: Option<ProtectionChoice>,
    pub income_choice: Option<IncomeChoice>,
    pub relationship: Option<Relationship>,
    pub relative_situation_choice: Option<RelativeSituationChoice>,
    pub scholarship_choice: Option<ScholarshipChoice>,
    pub assimilation_documents: BTreeMap<AssimilationDocument, Vec<String>>,

    pub sport_affiliation: Option<SportAffiliation>,
    pub solidarity_student: Option<bool>,

    pub account_type: Option<BankAccountType>,
    pub iban: Option<String>,
    pub other_format_number: Option<String>,
    pub bic_swift_code: Option<String>,
    pub holder_first_name: Option<String>,
    pub holder_last_name: Option<String>,
}

impl Accounting {
    pub fn has_document(&self, document: AssimilationDocument) -> bool {
        self.assimilation_documents
            .get(&document)
            .is_some_and(|files| !files.is_empty())
    }

    /// Documents the declared situation requires, or `None` when a nested choice is missing.
    pub fn required_assimilation_documents(&self) -> Option<Vec<AssimilationDocument>> {
        let situation = self.assimilation_situation?;
        let mut documents = Vec::new();
        for requirement in situation.requirements() {
            let resolved = match requirement {
                AssimilationRequirement::Document(document) => std::slice::from_ref(document),
                AssimilationRequirement::ResidencePermitChoice => {
                    self.residence_permit_choice?.documents()
                }
                AssimilationRequirement::ProtectionChoice => self.protection_choice?.documents(),
                AssimilationRequirement::IncomeChoice => self.income_choice?.documents(),
                AssimilationRequirement::Relationship => self.relationship?.documents(),
                AssimilationRequirement::RelativeSituationChoice => {
                    self.relative_situation_choice?.documents()
                }
                AssimilationRequirement::ScholarshipChoice => self.scholarship_choice?.documents(),
            };
            documents.extend_from_slice(resolved);
        }
        Some(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_choices_resolve_to_their_documents() {
        let accounting = Accounting {
            assimilation_situation: Some(AssimilationSituation::RelativeOfAssimilated),
            relationship: Some(Relationship::Mother),
            relative_situation_choice: Some(RelativeSituationChoice::ResidencePermitWithIncome),
            ..Accounting::default()
        };
        assert_eq!(
            accounting.required_assimilation_documents(),
            Some(vec![
                AssimilationDocument::CompositionMenageActeNaissance,
                AssimilationDocument::TitreSejour3MoisParent,
                AssimilationDocument::FichesRemunerationParent,
            ])
        );
    }

    #[test]
    fn missing_nested_choice_yields_none() {
        let accounting = Accounting {
            assimilation_situation: Some(AssimilationSituation::RefugeeOrProtected),
            ..Accounting::default()
        };
        assert_eq!(accounting.required_assimilation_documents(), None);
    }

    #[test]
    fn documents_use_persisted_field_names() {
        let json = serde_json::to_string(&AssimilationDocument::Annexe2526RefugiesApatrides)
            .expect("serialize");
        assert_eq!(json, "\"annexe_25_26_refugies_apatrides\"");
        let json = serde_json::to_string(&AssimilationDocument::CarteABRefugie).expect("serialize");
        assert_eq!(json, "\"carte_a_b_refugie\"");
    }
}
