//! Static description of the budget tree.
//!
//! Every parent/children relationship is one row of [`GROUPS`]. The
//! propagation engine never special-cases an item by name: it reads the
//! parent, the children and the [`Relation`] from this table.
//!
//! `Total` is the parent of two groups, [`GroupId::Income`] and
//! [`GroupId::Expenses`]; this is how the cross-branch equality
//! `Total = Income = Expenses` is expressed.

use serde::{Deserialize, Serialize};

use crate::{ItemId, ValueStore};

/// Identifier of a parent/children group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupId {
    Income,
    Expenses,
    NetTuition,
    VariableCosts,
    StaffSalaries,
    DuringSemester,
    OtherExpenses,
    Rent,
}

impl GroupId {
    pub const ALL: [GroupId; 8] = [
        GroupId::Income,
        GroupId::Expenses,
        GroupId::NetTuition,
        GroupId::VariableCosts,
        GroupId::StaffSalaries,
        GroupId::DuringSemester,
        GroupId::OtherExpenses,
        GroupId::Rent,
    ];

    /// The configuration row of this group.
    #[must_use]
    pub fn group(self) -> &'static Group {
        &GROUPS[self as usize]
    }
}

/// How a parent value relates to its children.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Relation {
    /// `parent = Σ children`
    Sum,
    /// `parent = children[0] − children[1]`
    Difference,
}

#[derive(Debug)]
pub struct Group {
    pub id: GroupId,
    pub parent: ItemId,
    pub children: &'static [ItemId],
    pub relation: Relation,
}

impl Group {
    /// Value the parent must hold given the children currently stored.
    #[must_use]
    pub fn evaluate(&self, values: &ValueStore) -> f64 {
        match self.relation {
            Relation::Sum => values.sum_of(self.children),
            Relation::Difference => {
                values.get(self.children[0]) - values.get(self.children[1])
            }
        }
    }

    /// Children of this group other than `item`.
    pub fn siblings(&self, item: ItemId) -> impl Iterator<Item = ItemId> + '_ {
        self.children.iter().copied().filter(move |c| *c != item)
    }

    #[must_use]
    pub fn contains(&self, item: ItemId) -> bool {
        self.children.contains(&item)
    }
}

/// Rows are ordered like [`GroupId`] and every group appears after the
/// group that contains its parent.
pub static GROUPS: [Group; 8] = [
    Group {
        id: GroupId::Income,
        parent: ItemId::Total,
        children: &[ItemId::Reserves, ItemId::NetTuition, ItemId::Fundraising],
        relation: Relation::Sum,
    },
    Group {
        id: GroupId::Expenses,
        parent: ItemId::Total,
        children: &[ItemId::VariableCosts, ItemId::FixedCosts],
        relation: Relation::Sum,
    },
    Group {
        id: GroupId::NetTuition,
        parent: ItemId::NetTuition,
        children: &[ItemId::GrossTuition, ItemId::Scholarships],
        relation: Relation::Difference,
    },
    Group {
        id: GroupId::VariableCosts,
        parent: ItemId::VariableCosts,
        children: &[ItemId::StaffSalaries, ItemId::OtherExpenses],
        relation: Relation::Sum,
    },
    Group {
        id: GroupId::StaffSalaries,
        parent: ItemId::StaffSalaries,
        children: &[ItemId::BeforeSemester, ItemId::DuringSemester],
        relation: Relation::Sum,
    },
    Group {
        id: GroupId::DuringSemester,
        parent: ItemId::DuringSemester,
        children: &ItemId::ROLES,
        relation: Relation::Sum,
    },
    Group {
        id: GroupId::OtherExpenses,
        parent: ItemId::OtherExpenses,
        children: &[
            ItemId::Rent,
            ItemId::Food,
            ItemId::LegalAccountingInsurance,
            ItemId::SuppliesSubscriptions,
            ItemId::It,
            ItemId::Travel,
            ItemId::OtherOverhead,
        ],
        relation: Relation::Sum,
    },
    Group {
        id: GroupId::Rent,
        parent: ItemId::Rent,
        children: &[
            ItemId::CsCohort2Program,
            ItemId::AlumniProgram,
            ItemId::DonorRetreat,
        ],
        relation: Relation::Sum,
    },
];

/// The group in which `item` is a child, if any.
#[must_use]
pub fn parent_group(item: ItemId) -> Option<&'static Group> {
    GROUPS.iter().find(|group| group.contains(item))
}

/// Groups whose parent is `item`. `Total` has two.
pub fn child_groups(item: ItemId) -> impl Iterator<Item = &'static Group> {
    GROUPS.iter().filter(move |group| group.parent == item)
}

/// Returns `true` when `item` is derived from other items.
#[must_use]
pub fn is_aggregate(item: ItemId) -> bool {
    child_groups(item).next().is_some()
}
