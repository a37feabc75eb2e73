use crate::models::AutoExcludeReason;

// Ordered rule table mapping institution-provided category text to the fixed
// catalog. Evaluated deterministically: exact pass first, then substring pass,
// first hit wins. "Other" is the catch-all.
const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    ("Food & drink", &["food", "drink", "restaurant", "bar", "coffee", "dining"]),
    ("Groceries", &["grocery", "groceries", "supermarket", "market", "food store"]),
    (
        "Automotive",
        &[
            "gas", "fuel", "gasoline", "shell", "exxon", "bp", "chevron", "automotive", "auto",
            "oil change", "repair", "mechanic", "car wash", "parking",
        ],
    ),
    ("Pets", &["pet", "vet", "veterinary", "dog", "animal", "petco", "petsmart"]),
    ("Shopping", &["shopping", "retail", "store", "merchandise", "amazon", "target"]),
    (
        "Bills & utilities",
        &["utility", "utilities", "electric", "water", "internet", "phone", "cable"],
    ),
    ("Travel", &["travel", "hotel", "airline", "flight", "uber", "lyft", "taxi"]),
    (
        "Health & wellness",
        &["health", "medical", "pharmacy", "doctor", "hospital", "fitness", "gym"],
    ),
    (
        "Entertainment",
        &["entertainment", "movie", "streaming", "netflix", "spotify", "games"],
    ),
    ("Fees & adjustments", &["fee", "fees", "adjustment", "overdraft", "late", "annual"]),
    ("Income", &["payroll", "salary", "deposit", "income", "refund", "cashback"]),
];

// Merchant identity is more reliable than the issuer-assigned bucket, so
// these description tokens override the institution category.
pub const PET_MERCHANT_KEYWORDS: &[&str] = &["PETCO", "PETSMART", "VET", "ANIMAL HOSPITAL"];

// Only obvious card payments and interbank transfers; anything fuzzier stays
// in the budget and is surfaced as an override candidate instead.
const TRANSFER_KEYWORDS: &[&str] = &[
    "ONLINE TRANSFER",
    "RECURRING TRANSFER",
    "XFER TRANSFER",
    "CREDIT CRD EPAY",
    "CARD SERV",
    "ONLINE PMT",
    "AUTO PMT",
    "DISCOVER E-PAYMENT",
    "CHASE CARD SERV",
    "CHASE CREDIT CRD",
];

// Ordered description rules for ledger-style debits. First hit wins.
const SPENDING_KEYWORDS: &[(&str, &[&str])] = &[
    ("Groceries", &["GROCERY", "MARKET", "FOOD"]),
    ("Automotive", &["GAS", "SHELL", "EXXON", "BP", "AUTOMOTIVE", "AUTO"]),
    ("Pets", &["VET", "PET", "PETCO", "PETSMART"]),
    ("Food & drink", &["RESTAURANT", "COFFEE", "STARBUCKS"]),
    ("Other", &["ATM", "WITHDRAWAL"]),
    ("Bills & utilities", &["ELECTRIC", "UTILITY", "WATER", "INTERNET"]),
];

/// Map institution category text to a canonical category name.
pub fn normalize_category(raw: &str) -> &'static str {
    let needle = raw.trim().to_lowercase();
    if needle.is_empty() {
        return "Other";
    }

    for (category, keywords) in CATEGORY_KEYWORDS {
        if keywords.contains(&needle.as_str()) {
            return category;
        }
    }
    for (category, keywords) in CATEGORY_KEYWORDS {
        if keywords.iter().any(|k| needle.contains(k)) {
            return category;
        }
    }
    "Other"
}

pub fn is_pet_merchant(description: &str) -> bool {
    let desc = description.to_uppercase();
    PET_MERCHANT_KEYWORDS.iter().any(|k| desc.contains(k))
}

/// Categorize a ledger-style (bank) transaction from its type code,
/// description, and signed amount. Also decides whether the row is a
/// transfer/payment that should default out of the budget.
pub fn categorize_bank(
    txn_type: &str,
    description: &str,
    amount: f64,
) -> (&'static str, Option<AutoExcludeReason>) {
    let desc = description.to_uppercase();

    // Income signals trump everything else.
    if txn_type == "DIRECTDEP" || txn_type == "CREDIT" || desc.contains("PAYROLL") {
        return ("Income", None);
    }
    if (desc.contains("ZELLE") || desc.contains("VENMO")) && amount > 0.0 {
        return ("Income", None);
    }
    if amount > 0.0 {
        return ("Income", None);
    }

    // Negative Zelle/Venmo fall through to the spending rules unless they
    // carry explicit transfer language.
    if TRANSFER_KEYWORDS.iter().any(|k| desc.contains(k)) {
        let reason = if desc.contains("CREDIT") || desc.contains("CARD") {
            AutoExcludeReason::CreditCardPayment
        } else if desc.contains("TRANSFER") {
            AutoExcludeReason::AccountTransfer
        } else {
            AutoExcludeReason::Payment
        };
        return ("Transfers", Some(reason));
    }

    for (category, keywords) in SPENDING_KEYWORDS {
        if keywords.iter().any(|k| desc.contains(k)) {
            return (category, None);
        }
    }
    ("Other", None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_category_mapping() {
        assert_eq!(normalize_category("gas"), "Automotive");
        assert_eq!(normalize_category("grocery"), "Groceries");
        assert_eq!(normalize_category("vet"), "Pets");
    }

    #[test]
    fn test_substring_category_mapping() {
        assert_eq!(normalize_category("Shell Gas Station"), "Automotive");
        assert_eq!(normalize_category("Supermarket Shopping"), "Groceries");
        assert_eq!(normalize_category("Pet Store"), "Pets");
    }

    #[test]
    fn test_category_mapping_is_case_insensitive() {
        assert_eq!(normalize_category("GAS"), "Automotive");
        assert_eq!(normalize_category("Grocery"), "Groceries");
    }

    #[test]
    fn test_unknown_category_is_other() {
        assert_eq!(normalize_category("quantum flux"), "Other");
        assert_eq!(normalize_category(""), "Other");
        assert_eq!(normalize_category("   "), "Other");
    }

    #[test]
    fn test_automotive_vs_travel_distinction() {
        // Parking belongs with automotive, not travel.
        assert_eq!(normalize_category("parking"), "Automotive");
        assert_eq!(normalize_category("hotel"), "Travel");
        assert_eq!(normalize_category("uber"), "Travel");
    }

    #[test]
    fn test_bank_income_signals() {
        assert_eq!(categorize_bank("DIRECTDEP", "ACME CORP PAYROLL", 2500.0), ("Income", None));
        assert_eq!(categorize_bank("CREDIT", "Misc deposit", 20.0), ("Income", None));
        assert_eq!(categorize_bank("DEBIT", "PAYROLL ADJUSTMENT", -50.0), ("Income", None));
        assert_eq!(categorize_bank("DEBIT", "ZELLE FROM ALEX", 75.0), ("Income", None));
        // Positive anything defaults to Income.
        assert_eq!(categorize_bank("DEBIT", "MYSTERY CREDIT XYZ", 10.0), ("Income", None));
    }

    #[test]
    fn test_bank_transfer_detection() {
        assert_eq!(
            categorize_bank("DEBIT", "CHASE CREDIT CRD EPAY", -500.0),
            ("Transfers", Some(AutoExcludeReason::CreditCardPayment))
        );
        assert_eq!(
            categorize_bank("DEBIT", "ONLINE TRANSFER TO SAVINGS", -1000.0),
            ("Transfers", Some(AutoExcludeReason::AccountTransfer))
        );
        assert_eq!(
            categorize_bank("DEBIT", "ONLINE PMT ACME MORTGAGE", -1200.0),
            ("Transfers", Some(AutoExcludeReason::Payment))
        );
    }

    #[test]
    fn test_bank_spending_keywords() {
        assert_eq!(categorize_bank("DEBIT", "SHELL GAS #123", -45.0), ("Automotive", None));
        assert_eq!(categorize_bank("DEBIT", "WHOLE FOODS MARKET", -120.0), ("Groceries", None));
        assert_eq!(categorize_bank("DEBIT", "STARBUCKS 1234", -5.0), ("Food & drink", None));
        assert_eq!(categorize_bank("DEBIT", "PETCO 99", -35.0), ("Pets", None));
        assert_eq!(categorize_bank("DEBIT", "ATM WITHDRAWAL", -100.0), ("Other", None));
        assert_eq!(categorize_bank("DEBIT", "CITY ELECTRIC BILL", -80.0), ("Bills & utilities", None));
    }

    #[test]
    fn test_bank_negative_venmo_is_spending() {
        // No transfer language: stays in the budget as ordinary spending.
        assert_eq!(categorize_bank("DEBIT", "VENMO PAYMENT SENT", -60.0), ("Other", None));
    }

    #[test]
    fn test_bank_unmatched_is_other() {
        assert_eq!(categorize_bank("DEBIT", "RANDOM MERCHANT", -50.0), ("Other", None));
    }

    #[test]
    fn test_pet_merchant_detection() {
        assert!(is_pet_merchant("PETSMART #1234"));
        assert!(is_pet_merchant("Downtown Animal Hospital"));
        assert!(!is_pet_merchant("AMAZON.COM"));
    }
}
