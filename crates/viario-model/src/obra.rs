//! Construction-work classification for road segments.
//!
//! Registry status text is free-form and arrives with inconsistent case and
//! accents. The lists below enumerate both accented and accentless spellings
//! explicitly; matching is case-folded only, never accent-folded, because
//! folding would reclassify real records.

/// Status phrases that indicate construction work exists for the segment.
const STATUS_WITH_WORK: [&str; 12] = [
    "concluído",
    "concluido",
    "concluída",
    "concluida",
    "em obra",
    "execução",
    "implantado",
    "construído",
    "construido",
    "paralisado",
    "andamento",
    "licitado",
];

/// Status phrases that indicate no construction work.
const STATUS_WITHOUT_WORK: [&str; 7] = [
    "a visitar",
    "visitado",
    "não informada",
    "não informado",
    "obra extinta",
    "extinto",
    "cancelado",
];

/// Result of classifying one segment record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub has_construction: bool,
    /// Echoes the input contract number only when construction is present;
    /// may still be `None` when a positive status carries no contract.
    pub contract_number: Option<String>,
}

impl Classification {
    fn without_work() -> Self {
        Self {
            has_construction: false,
            contract_number: None,
        }
    }
}

/// Classifies a (contract-number, status-text) pair.
///
/// Total function: every input, including `None` and empty strings, maps to
/// a defined output. Ordered rules, first match wins:
///
/// 1. status contains a with-work phrase -> construction, contract as-is;
/// 2. status contains a without-work phrase -> no construction;
/// 3. a non-empty contract number alone implies construction;
/// 4. default: no construction.
///
/// Matching is "contains", so any status text carrying a listed phrase
/// anywhere qualifies. The with-work list is checked in full before the
/// without-work list.
#[must_use]
pub fn classify(contract_number: Option<&str>, status: Option<&str>) -> Classification {
    let status_folded = status.unwrap_or("").to_lowercase();
    let status_folded = status_folded.trim();
    let contract = contract_number.map(str::trim).filter(|s| !s.is_empty());

    if STATUS_WITH_WORK
        .iter()
        .any(|phrase| status_folded.contains(phrase))
    {
        return Classification {
            has_construction: true,
            contract_number: contract.map(str::to_string),
        };
    }

    if STATUS_WITHOUT_WORK
        .iter()
        .any(|phrase| status_folded.contains(phrase))
    {
        return Classification::without_work();
    }

    if let Some(contract) = contract {
        return Classification {
            has_construction: true,
            contract_number: Some(contract.to_string()),
        };
    }

    Classification::without_work()
}
