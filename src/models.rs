use crate::error::HearthError;

/// Automatic classification tag set at ingest time for transactions that are
/// transfers or card payments rather than real spending. Preserved for audit
/// even when a manual override supersedes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AutoExcludeReason {
    CreditCardPayment,
    AccountTransfer,
    Payment,
}

impl AutoExcludeReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreditCardPayment => "credit_card_payment",
            Self::AccountTransfer => "account_transfer",
            Self::Payment => "payment",
        }
    }

    /// Unknown text from storage maps to None rather than an error; the
    /// classification must degrade safely on bad legacy data.
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "credit_card_payment" => Some(Self::CreditCardPayment),
            "account_transfer" => Some(Self::AccountTransfer),
            "payment" => Some(Self::Payment),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::CreditCardPayment => "Credit card payments",
            Self::AccountTransfer => "Account transfers",
            Self::Payment => "Other payments",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum OverrideType {
    Include,
    Exclude,
}

impl OverrideType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Include => "include",
            Self::Exclude => "exclude",
        }
    }

    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "include" => Some(Self::Include),
            "exclude" => Some(Self::Exclude),
            _ => None,
        }
    }
}

impl std::str::FromStr for OverrideType {
    type Err = HearthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_db(s).ok_or_else(|| HearthError::InvalidOverrideType(s.to_string()))
    }
}

/// Which total a manual include override applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideCategory {
    Spending,
    Income,
}

impl OverrideCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spending => "spending",
            Self::Income => "income",
        }
    }

    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "spending" => Some(Self::Spending),
            "income" => Some(Self::Income),
            _ => None,
        }
    }
}

impl std::str::FromStr for OverrideCategory {
    type Err = HearthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_db(s).ok_or_else(|| HearthError::InvalidOverrideCategory(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategorySource {
    Auto,
    Manual,
}

impl CategorySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Manual => "manual",
        }
    }
}

/// A ledger row. Ingest-time fields are never rewritten; the override fields
/// are the only mutable state.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct Transaction {
    pub id: String,
    pub date: String,
    pub description: String,
    pub amount: f64,
    pub account: String,
    pub category: String,
    pub category_source: CategorySource,
    pub raw_description: String,
    pub auto_exclude_reason: Option<AutoExcludeReason>,
    pub exclude_from_budget: bool,
    pub manual_override_type: Option<OverrideType>,
    pub override_reason: Option<String>,
    pub override_category: Option<OverrideCategory>,
    pub manual_notes: Option<String>,
}

/// Normalized output of the CSV parsers, before validation and insert.
#[derive(Debug, Clone)]
pub struct CandidateTransaction {
    pub date: String,
    pub description: String,
    pub amount: f64,
    pub account: String,
    pub category: String,
    pub auto_exclude_reason: Option<AutoExcludeReason>,
    pub raw_description: String,
}

#[derive(Debug, Clone)]
pub struct Category {
    pub name: String,
    pub color: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_type_parses() {
        assert_eq!("include".parse::<OverrideType>().unwrap(), OverrideType::Include);
        assert_eq!("exclude".parse::<OverrideType>().unwrap(), OverrideType::Exclude);
        assert!("delete".parse::<OverrideType>().is_err());
        assert!("Include".parse::<OverrideType>().is_err());
    }

    #[test]
    fn test_override_category_parses() {
        assert_eq!("income".parse::<OverrideCategory>().unwrap(), OverrideCategory::Income);
        assert!("savings".parse::<OverrideCategory>().is_err());
    }

    #[test]
    fn test_auto_exclude_reason_roundtrip() {
        for reason in [
            AutoExcludeReason::CreditCardPayment,
            AutoExcludeReason::AccountTransfer,
            AutoExcludeReason::Payment,
        ] {
            assert_eq!(AutoExcludeReason::from_db(reason.as_str()), Some(reason));
        }
        assert_eq!(AutoExcludeReason::from_db("corrupted"), None);
    }
}
