//! HR vertical slice.
//!
//! [`RecordStore`] owns the employee roster together with the provident fund
//! and bank account records keyed to it. Form input is checked by
//! [`validate`] before it reaches the store, and [`views`] derives the list
//! and dashboard read models from a store snapshot.

pub mod model;
pub mod seed;
pub mod store;
pub mod validate;
pub mod views;

pub use model::{
    AccountDetail, AccountType, Department, Employee, EmployeeId, EmployeeStatus, NewEmployee,
    PfDetail,
};
pub use seed::SeedData;
pub use store::{RecordStore, SeedError};
pub use validate::ValidationErrors;
