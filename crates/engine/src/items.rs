//! Budget line items.
//!
//! The set of items is closed: the hierarchy is fixed at compile time and an
//! [`ItemId`] names every quantity the planner tracks, from the total budget
//! down to single staffing roles.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Identifier of a line item.
///
/// The serialized form is the snake_case key returned by [`ItemId::as_str`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemId {
    Total,
    Reserves,
    NetTuition,
    GrossTuition,
    Scholarships,
    Fundraising,
    VariableCosts,
    StaffSalaries,
    BeforeSemester,
    DuringSemester,
    LeadsOtherRoles,
    ResidentialFaculty,
    Ras,
    RetreatTeacher,
    DaylongVisitingTeacher,
    WeeklongVisitingTeacher,
    HeadCook,
    AssistantCook,
    OtherExpenses,
    Rent,
    CsCohort2Program,
    AlumniProgram,
    DonorRetreat,
    Food,
    LegalAccountingInsurance,
    SuppliesSubscriptions,
    It,
    Travel,
    OtherOverhead,
    FixedCosts,
}

impl ItemId {
    /// Every item, in report order (parents before their children).
    pub const ALL: [ItemId; 30] = [
        ItemId::Total,
        ItemId::Reserves,
        ItemId::NetTuition,
        ItemId::GrossTuition,
        ItemId::Scholarships,
        ItemId::Fundraising,
        ItemId::VariableCosts,
        ItemId::StaffSalaries,
        ItemId::BeforeSemester,
        ItemId::DuringSemester,
        ItemId::LeadsOtherRoles,
        ItemId::ResidentialFaculty,
        ItemId::Ras,
        ItemId::RetreatTeacher,
        ItemId::DaylongVisitingTeacher,
        ItemId::WeeklongVisitingTeacher,
        ItemId::HeadCook,
        ItemId::AssistantCook,
        ItemId::OtherExpenses,
        ItemId::Rent,
        ItemId::CsCohort2Program,
        ItemId::AlumniProgram,
        ItemId::DonorRetreat,
        ItemId::Food,
        ItemId::LegalAccountingInsurance,
        ItemId::SuppliesSubscriptions,
        ItemId::It,
        ItemId::Travel,
        ItemId::OtherOverhead,
        ItemId::FixedCosts,
    ];

    /// During-semester roles, valued as `quantity × rate`.
    pub const ROLES: [ItemId; 8] = [
        ItemId::LeadsOtherRoles,
        ItemId::ResidentialFaculty,
        ItemId::Ras,
        ItemId::RetreatTeacher,
        ItemId::DaylongVisitingTeacher,
        ItemId::WeeklongVisitingTeacher,
        ItemId::HeadCook,
        ItemId::AssistantCook,
    ];

    /// Canonical key, used on the command line, in config files and in
    /// serialized snapshots.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ItemId::Total => "total",
            ItemId::Reserves => "reserves",
            ItemId::NetTuition => "net_tuition",
            ItemId::GrossTuition => "gross_tuition",
            ItemId::Scholarships => "scholarships",
            ItemId::Fundraising => "fundraising",
            ItemId::VariableCosts => "variable_costs",
            ItemId::StaffSalaries => "staff_salaries",
            ItemId::BeforeSemester => "before_semester",
            ItemId::DuringSemester => "during_semester",
            ItemId::LeadsOtherRoles => "leads_other_roles",
            ItemId::ResidentialFaculty => "residential_faculty",
            ItemId::Ras => "ras",
            ItemId::RetreatTeacher => "retreat_teacher",
            ItemId::DaylongVisitingTeacher => "daylong_visiting_teacher",
            ItemId::WeeklongVisitingTeacher => "weeklong_visiting_teacher",
            ItemId::HeadCook => "head_cook",
            ItemId::AssistantCook => "assistant_cook",
            ItemId::OtherExpenses => "other_expenses",
            ItemId::Rent => "rent",
            ItemId::CsCohort2Program => "cs_cohort2_program",
            ItemId::AlumniProgram => "alumni_program",
            ItemId::DonorRetreat => "donor_retreat",
            ItemId::Food => "food",
            ItemId::LegalAccountingInsurance => "legal_accounting_insurance",
            ItemId::SuppliesSubscriptions => "supplies_subscriptions",
            ItemId::It => "it",
            ItemId::Travel => "travel",
            ItemId::OtherOverhead => "other_overhead",
            ItemId::FixedCosts => "fixed_costs",
        }
    }

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            ItemId::Total => "Total Budget",
            ItemId::Reserves => "Reserves",
            ItemId::NetTuition => "Net Tuition",
            ItemId::GrossTuition => "Tuition (Gross)",
            ItemId::Scholarships => "Scholarships",
            ItemId::Fundraising => "Fundraising",
            ItemId::VariableCosts => "Variable Costs",
            ItemId::StaffSalaries => "Staff Salaries",
            ItemId::BeforeSemester => "Before Semester",
            ItemId::DuringSemester => "During Semester",
            ItemId::LeadsOtherRoles => "Leads & Other Roles",
            ItemId::ResidentialFaculty => "Residential Faculty",
            ItemId::Ras => "RAs",
            ItemId::RetreatTeacher => "Retreat Teacher",
            ItemId::DaylongVisitingTeacher => "Daylong Visiting Teacher",
            ItemId::WeeklongVisitingTeacher => "Week-long Visiting Teacher",
            ItemId::HeadCook => "Head Cook",
            ItemId::AssistantCook => "Assistant Cook",
            ItemId::OtherExpenses => "Other Expenses",
            ItemId::Rent => "Rent",
            ItemId::CsCohort2Program => "CS Cohort 2 Program",
            ItemId::AlumniProgram => "Alumni Program",
            ItemId::DonorRetreat => "Donor Retreat",
            ItemId::Food => "Food",
            ItemId::LegalAccountingInsurance => "Legal, Accounting, Insurance",
            ItemId::SuppliesSubscriptions => "Supplies and Subscriptions",
            ItemId::It => "IT",
            ItemId::Travel => "Travel",
            ItemId::OtherOverhead => "Other Overhead",
            ItemId::FixedCosts => "Fixed Costs",
        }
    }

    /// Returns `true` for the `quantity × rate` staffing roles.
    #[must_use]
    pub fn is_role(self) -> bool {
        Self::ROLES.contains(&self)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ItemId {
    type Err = EngineError;

    /// Parses a key, case-insensitively, accepting `-` in place of `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|item| item.as_str() == key)
            .ok_or_else(|| EngineError::UnknownItem(s.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip_through_from_str() {
        for item in ItemId::ALL {
            assert_eq!(item.as_str().parse::<ItemId>().unwrap(), item);
        }
    }

    #[test]
    fn parse_is_lenient_on_case_and_dashes() {
        assert_eq!("Other-Expenses".parse::<ItemId>().unwrap(), ItemId::OtherExpenses);
        assert_eq!(" RAS ".parse::<ItemId>().unwrap(), ItemId::Ras);
        assert_eq!(
            "rent2".parse::<ItemId>(),
            Err(EngineError::UnknownItem("rent2".to_string()))
        );
    }

    #[test]
    fn serde_key_matches_as_str() {
        for item in ItemId::ALL {
            let json = serde_json::to_string(&item).unwrap();
            assert_eq!(json, format!("\"{}\"", item.as_str()));
        }
    }

    #[test]
    fn roles_are_flagged() {
        assert!(ItemId::HeadCook.is_role());
        assert!(!ItemId::BeforeSemester.is_role());
        assert!(!ItemId::DuringSemester.is_role());
    }
}
