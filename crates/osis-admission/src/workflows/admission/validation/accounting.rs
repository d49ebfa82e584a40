use super::{BusinessException, BusinessValidator, Check, ValidatorList};
use crate::workflows::admission::accounting::{Accounting, BankAccountType, SportAffiliation};

fn blank(value: Option<&String>) -> bool {
    value.map_or(true, |value| value.trim().is_empty())
}

#[derive(Debug, Clone, Copy)]
pub struct AbsenceOfDebtCompleted<'a> {
    pub attended_recently: Option<bool>,
    pub certificate: &'a [String],
}

impl BusinessValidator for AbsenceOfDebtCompleted<'_> {
    fn validate(&self) -> Result<(), BusinessException> {
        if self.attended_recently == Some(true) && self.certificate.is_empty() {
            return Err(BusinessException::AbsenceOfDebtNotCompleted);
        }
        Ok(())
    }
}

/// Both reduced tuition questions must be answered, and a staff child must prove it.
#[derive(Debug, Clone, Copy)]
pub struct ReducedTuitionCompleted<'a> {
    pub study_allowance: Option<bool>,
    pub staff_child: Option<bool>,
    pub staff_child_certificate: &'a [String],
}

impl BusinessValidator for ReducedTuitionCompleted<'_> {
    fn validate(&self) -> Result<(), BusinessException> {
        if self.staff_child == Some(true) && self.staff_child_certificate.is_empty() {
            return Err(BusinessException::ReducedTuitionFeeNotCompleted);
        }
        if self.study_allowance.is_none() || self.staff_child.is_none() {
            return Err(BusinessException::ReducedTuitionFeeNotCompleted);
        }
        Ok(())
    }
}

/// Only candidates known to be outside the EU declare an assimilation situation.
#[derive(Debug, Clone, Copy)]
pub struct AssimilationCompleted<'a> {
    pub eu_national: Option<bool>,
    pub accounting: &'a Accounting,
}

impl BusinessValidator for AssimilationCompleted<'_> {
    fn validate(&self) -> Result<(), BusinessException> {
        if self.eu_national != Some(false) {
            return Ok(());
        }

        let documents = self
            .accounting
            .required_assimilation_documents()
            .ok_or(BusinessException::AssimilationNotCompleted)?;
        if documents
            .into_iter()
            .any(|document| !self.accounting.has_document(document))
        {
            return Err(BusinessException::AssimilationNotCompleted);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AffiliationsCompleted {
    pub sport: Option<SportAffiliation>,
    pub solidarity_student: Option<bool>,
}

impl BusinessValidator for AffiliationsCompleted {
    fn validate(&self) -> Result<(), BusinessException> {
        if self.sport.is_none() || self.solidarity_student.is_none() {
            return Err(BusinessException::AffiliationsNotCompleted);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct IbanAccountCompleted<'a> {
    pub accounting: &'a Accounting,
}

impl BusinessValidator for IbanAccountCompleted<'_> {
    fn validate(&self) -> Result<(), BusinessException> {
        let accounting = self.accounting;
        if accounting.account_type == Some(BankAccountType::Iban)
            && [
                accounting.iban.as_ref(),
                accounting.holder_first_name.as_ref(),
                accounting.holder_last_name.as_ref(),
            ]
            .into_iter()
            .any(blank)
        {
            return Err(BusinessException::IbanAccountNotCompleted);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OtherFormatAccountCompleted<'a> {
    pub accounting: &'a Accounting,
}

impl BusinessValidator for OtherFormatAccountCompleted<'_> {
    fn validate(&self) -> Result<(), BusinessException> {
        let accounting = self.accounting;
        if accounting.account_type == Some(BankAccountType::OtherFormat)
            && [
                accounting.other_format_number.as_ref(),
                accounting.bic_swift_code.as_ref(),
                accounting.holder_first_name.as_ref(),
                accounting.holder_last_name.as_ref(),
            ]
            .into_iter()
            .any(blank)
        {
            return Err(BusinessException::OtherFormatAccountNotCompleted);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BankAccountTypeSpecified {
    pub account_type: Option<BankAccountType>,
}

impl BusinessValidator for BankAccountTypeSpecified {
    fn validate(&self) -> Result<(), BusinessException> {
        match self.account_type {
            Some(_) => Ok(()),
            None => Err(BusinessException::BankAccountTypeNotSpecified),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AccountingValidatorList<'a> {
    pub accounting: &'a Accounting,
    pub eu_national: Option<bool>,
}

impl ValidatorList for AccountingValidatorList<'_> {
    fn invariant_validators(&self) -> Vec<Check<'_>> {
        let accounting = self.accounting;
        vec![
            Check::validator(AbsenceOfDebtCompleted {
                attended_recently: accounting.attended_recently_french_community,
                certificate: &accounting.absence_of_debt_certificate,
            }),
            Check::validator(ReducedTuitionCompleted {
                study_allowance: accounting.french_community_study_allowance,
                staff_child: accounting.staff_child,
                staff_child_certificate: &accounting.staff_child_certificate,
            }),
            Check::validator(AssimilationCompleted {
                eu_national: self.eu_national,
                accounting,
            }),
            Check::validator(AffiliationsCompleted {
                sport: accounting.sport_affiliation,
                solidarity_student: accounting.solidarity_student,
            }),
            Check::validator(BankAccountTypeSpecified {
                account_type: accounting.account_type,
            }),
            Check::validator(IbanAccountCompleted { accounting }),
            Check::validator(OtherFormatAccountCompleted { accounting }),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::admission::accounting::{
        AssimilationDocument, AssimilationSituation, ProtectionChoice,
    };

    fn completed() -> Accounting {
        Accounting {
            attended_recently_french_community: Some(false),
            french_community_study_allowance: Some(false),
            staff_child: Some(false),
            sport_affiliation: Some(SportAffiliation::No),
            solidarity_student: Some(false),
            account_type: Some(BankAccountType::NoAccount),
            ..Accounting::default()
        }
    }

    #[test]
    fn completed_accounting_passes() {
        let accounting = completed();
        let list = AccountingValidatorList {
            accounting: &accounting,
            eu_national: Some(true),
        };
        assert_eq!(list.validate(), Ok(()));
    }

    #[test]
    fn unanswered_reduced_tuition_fails() {
        let check = ReducedTuitionCompleted {
            study_allowance: None,
            staff_child: Some(false),
            staff_child_certificate: &[],
        };
        assert_eq!(
            check.validate(),
            Err(BusinessException::ReducedTuitionFeeNotCompleted)
        );
    }

    #[test]
    fn assimilation_requires_documents_of_nested_choice() {
        let mut accounting = completed();
        accounting.assimilation_situation = Some(AssimilationSituation::RefugeeOrProtected);
        accounting.protection_choice = Some(ProtectionChoice::AsylumSeeker);
        accounting.assimilation_documents.insert(
            AssimilationDocument::Annexe2526RefugiesApatrides,
            vec!["annex.pdf".to_string()],
        );

        let check = AssimilationCompleted {
            eu_national: Some(false),
            accounting: &accounting,
        };
        assert_eq!(
            check.validate(),
            Err(BusinessException::AssimilationNotCompleted)
        );

        accounting.assimilation_documents.insert(
            AssimilationDocument::AttestationImmatriculation,
            vec!["registration.pdf".to_string()],
        );
        let check = AssimilationCompleted {
            eu_national: Some(false),
            accounting: &accounting,
        };
        assert_eq!(check.validate(), Ok(()));
    }

    #[test]
    fn assimilation_skipped_when_nationality_unknown_or_eu() {
        let accounting = completed();
        for eu_national in [None, Some(true)] {
            let check = AssimilationCompleted {
                eu_national,
                accounting: &accounting,
            };
            assert_eq!(check.validate(), Ok(()));
        }
    }

    #[test]
    fn missing_account_details_are_reported_together() {
        let mut accounting = completed();
        accounting.account_type = Some(BankAccountType::Iban);
        accounting.iban = Some("BE71096123456769".to_string());
        accounting.sport_affiliation = None;

        let failure = AccountingValidatorList {
            accounting: &accounting,
            eu_national: Some(true),
        }
        .validate()
        .expect_err("holder and affiliations missing");
        assert_eq!(
            failure.exceptions,
            vec![
                BusinessException::AffiliationsNotCompleted,
                BusinessException::IbanAccountNotCompleted,
            ]
        );
    }
}
