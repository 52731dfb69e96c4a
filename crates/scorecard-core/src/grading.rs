//! Risk grading and the minimum document checklist.
//!
//! Grade cutoffs are fractions of the scorecard's own ceiling, so the same
//! policy holds for scorecards with different `maxScore` values. The document
//! checklist is a fixed lookup on the grade.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Fraction of `maxScore` at or above which an applicant is `LOW` risk.
pub const LOW_RISK_CUTOFF: f64 = 0.6;

/// Fraction of `maxScore` at or above which an applicant is `MEDIUM` risk.
pub const MEDIUM_RISK_CUTOFF: f64 = 0.4;

/// Three-tier credit risk grade.
///
/// Ordered by favourability: `High < Medium < Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskGrade {
    High,
    Medium,
    Low,
}

impl RiskGrade {
    /// Grade a total score against the scorecard ceiling.
    pub fn from_score(total_score: i64, max_score: i64) -> Self {
        let total = total_score as f64;
        let max = max_score as f64;

        if total >= LOW_RISK_CUTOFF * max {
            RiskGrade::Low
        } else if total >= MEDIUM_RISK_CUTOFF * max {
            RiskGrade::Medium
        } else {
            RiskGrade::High
        }
    }

    /// Supporting documents an applicant with this grade must provide.
    pub fn required_documents(self) -> Vec<DocumentCode> {
        match self {
            RiskGrade::Low => vec![DocumentCode::Nrc, DocumentCode::Payslip],
            RiskGrade::Medium => vec![
                DocumentCode::Nrc,
                DocumentCode::Payslip,
                DocumentCode::BankStatement,
            ],
            RiskGrade::High => vec![
                DocumentCode::Nrc,
                DocumentCode::Payslip,
                DocumentCode::BankStatement,
                DocumentCode::Guarantor,
            ],
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            RiskGrade::Low => "LOW",
            RiskGrade::Medium => "MEDIUM",
            RiskGrade::High => "HIGH",
        }
    }
}

impl fmt::Display for RiskGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Supporting document codes used by the application checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentCode {
    /// National registration card
    Nrc,
    Payslip,
    BankStatement,
    Guarantor,
}

impl DocumentCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            DocumentCode::Nrc => "NRC",
            DocumentCode::Payslip => "PAYSLIP",
            DocumentCode::BankStatement => "BANK_STATEMENT",
            DocumentCode::Guarantor => "GUARANTOR",
        }
    }
}

impl fmt::Display for DocumentCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}
