//! Finance service
//!
//! Budget category utilization, expense and donor summaries, and the
//! budget request queue of the finance pages.

use crate::dataset::{BudgetCategory, BudgetRequest, Donor, FinanceLedger, RequestStatus};
use crate::services::metrics::{bar_fill, budget_status, budget_utilization, BudgetStatus};
use serde::Serialize;

/// Organization-wide budget figures
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceTotals {
    pub allocated: f64,
    pub spent: f64,
    /// Negative once spending passes the allocation
    pub remaining: f64,
    pub utilization: f64,
    pub status: BudgetStatus,
}

pub fn finance_totals(ledger: &FinanceLedger, near_limit_threshold: f64) -> FinanceTotals {
    let allocated: f64 = ledger.categories.iter().map(|c| c.allocated).sum();
    let spent: f64 = ledger.categories.iter().map(|c| c.spent).sum();
    let utilization = budget_utilization(spent, allocated);

    FinanceTotals {
        allocated,
        spent,
        remaining: allocated - spent,
        utilization,
        status: budget_status(utilization, near_limit_threshold),
    }
}

/// One row of the budget category table
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryUtilization<'a> {
    pub category: &'a BudgetCategory,
    /// Raw utilization, may exceed 100
    pub utilization: f64,
    /// Progress bar fill, clamped to 0-100
    pub fill: f64,
    pub status: BudgetStatus,
    /// Sum of the itemized expenses recorded against this category
    pub recorded_expenses: f64,
    pub expense_count: usize,
}

pub fn category_breakdown(
    ledger: &FinanceLedger,
    near_limit_threshold: f64,
) -> Vec<CategoryUtilization<'_>> {
    ledger
        .categories
        .iter()
        .map(|category| {
            let utilization = budget_utilization(category.spent, category.allocated);
            let (recorded_expenses, expense_count) = ledger
                .expenses
                .iter()
                .filter(|e| e.category_id == category.id)
                .fold((0.0, 0), |(sum, n), e| (sum + e.amount, n + 1));

            CategoryUtilization {
                category,
                utilization,
                fill: bar_fill(utilization),
                status: budget_status(utilization, near_limit_threshold),
                recorded_expenses,
                expense_count,
            }
        })
        .collect()
}

/// Expenses whose category id does not resolve; logged and left out of
/// the category table
pub fn uncategorized_expense_total(ledger: &FinanceLedger) -> f64 {
    ledger
        .expenses
        .iter()
        .filter(|e| !ledger.categories.iter().any(|c| c.id == e.category_id))
        .inspect(|e| {
            tracing::warn!(
                "Expense {} references unknown category {}",
                e.id,
                e.category_id
            )
        })
        .map(|e| e.amount)
        .sum()
}

/// Donors by total donated, largest first; ties keep dataset order
pub fn ranked_donors(ledger: &FinanceLedger) -> Vec<&Donor> {
    let mut donors: Vec<&Donor> = ledger.donors.iter().collect();
    donors.sort_by(|a, b| b.total_donated.total_cmp(&a.total_donated));
    donors
}

pub fn total_donations(ledger: &FinanceLedger) -> f64 {
    ledger.donors.iter().map(|d| d.total_donated).sum()
}

/// Budget request queue counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestCounts {
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    /// Total amount still awaiting review
    pub pending_amount: f64,
}

pub fn request_counts(requests: &[BudgetRequest]) -> RequestCounts {
    requests
        .iter()
        .fold(RequestCounts::default(), |mut acc, r| {
            match r.status {
                RequestStatus::Pending => {
                    acc.pending += 1;
                    acc.pending_amount += r.amount;
                }
                RequestStatus::Approved => acc.approved += 1,
                RequestStatus::Rejected => acc.rejected += 1,
            }
            acc
        })
}

/// Requests in `status`, newest submission first
pub fn requests_with_status(requests: &[BudgetRequest], status: RequestStatus) -> Vec<&BudgetRequest> {
    let mut matching: Vec<&BudgetRequest> =
        requests.iter().filter(|r| r.status == status).collect();
    matching.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
    matching
}
