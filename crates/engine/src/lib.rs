//! Budget planning engine.
//!
//! A fixed hierarchy of line items where every aggregate equals the sum (or
//! difference) of its components. Editing any item, leaf or aggregate,
//! propagates through the hierarchy while locked items keep their value.
//!
//! ```rust
//! use engine::{BudgetConfig, BudgetState, Edit, ItemId};
//!
//! let state = BudgetState::from_config(&BudgetConfig::default()).unwrap();
//! let next = state
//!     .apply(Edit::Value { item: ItemId::Food, value: 15_000.0 })
//!     .unwrap();
//! assert_eq!(next.value(ItemId::OtherExpenses), 85_000.0);
//! assert_eq!(next.value(ItemId::Total), 305_000.0);
//! ```

pub use config::BudgetConfig;
pub use error::EngineError;
pub use guard::{Direction, UpdateGuard};
pub use hierarchy::{Group, GroupId, Relation};
pub use items::ItemId;
pub use locks::LockRegistry;
pub use money::Amount;
pub use policy::{GroupPolicy, Policies, PolicyOverride, SplitPolicy};
pub use session::{Observer, Planner, PlannerBuilder};
pub use snapshot::{Snapshot, Totals};
pub use state::{BudgetState, Edit};
pub use values::{RoleDetail, ValueStore};

pub mod calculators;
pub mod config;
mod error;
mod guard;
pub mod hierarchy;
mod items;
mod locks;
pub mod money;
mod policy;
mod propagation;
pub mod redistribute;
mod session;
mod snapshot;
mod state;
mod values;

type ResultEngine<T> = Result<T, EngineError>;
