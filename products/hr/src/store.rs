//! In-memory record store for employees and the detail records keyed to them.
//!
//! Detail records point at their employee by value through `employee_id`.
//! Writing a PF or account detail copies its fields onto the owning
//! [`Employee`]; nothing flows the other way. Deleting an employee is the
//! only operation that cascades.
//!
//! Unknown ids and duplicate details are not errors here. The operations
//! quietly skip or partially apply, and callers are expected to check those
//! preconditions before calling in.

use std::collections::HashSet;

use thiserror::Error;
use tracing::{debug, warn};

use crate::model::{AccountDetail, Department, Employee, EmployeeId, NewEmployee, PfDetail};
use crate::seed::{self, SeedData};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SeedError {
    #[error("duplicate employee id {0}")]
    DuplicateEmployee(EmployeeId),
    #[error("duplicate department name {0}")]
    DuplicateDepartment(String),
    #[error("{kind} record references unknown employee {employee_id}")]
    UnknownEmployee {
        kind: &'static str,
        employee_id: EmployeeId,
    },
    #[error("employee {employee_id} has more than one {kind} record")]
    DuplicateDetail {
        kind: &'static str,
        employee_id: EmployeeId,
    },
}

#[derive(Clone, Debug, Default)]
pub struct RecordStore {
    employees: Vec<Employee>,
    departments: Vec<Department>,
    pf_details: Vec<PfDetail>,
    account_details: Vec<AccountDetail>,
    next_id: u64,
}

impl RecordStore {
    /// Store populated with the reference dataset.
    pub fn demo() -> Self {
        Self::load(seed::demo())
    }

    /// Store with reference departments and no employees.
    pub fn empty() -> Self {
        Self::load(seed::reference_only())
    }

    /// Build a store from caller-supplied seed data, rejecting data that
    /// breaks referential integrity.
    pub fn from_seed(seed: SeedData) -> Result<Self, SeedError> {
        check_seed(&seed)?;
        Ok(Self::load(seed))
    }

    fn load(seed: SeedData) -> Self {
        let next_id = seed
            .employees
            .iter()
            .filter_map(|employee| employee.id.as_str().parse::<u64>().ok())
            .filter_map(|id| id.checked_add(1))
            .max()
            .unwrap_or(1);
        Self {
            employees: seed.employees,
            departments: seed.departments,
            pf_details: seed.pf_details,
            account_details: seed.account_details,
            next_id,
        }
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn departments(&self) -> &[Department] {
        &self.departments
    }

    pub fn pf_details(&self) -> &[PfDetail] {
        &self.pf_details
    }

    pub fn account_details(&self) -> &[AccountDetail] {
        &self.account_details
    }

    pub fn employee(&self, id: &EmployeeId) -> Option<&Employee> {
        self.employees.iter().find(|employee| &employee.id == id)
    }

    pub fn department(&self, name: &str) -> Option<&Department> {
        self.departments.iter().find(|dept| dept.name == name)
    }

    pub fn pf_detail(&self, employee_id: &EmployeeId) -> Option<&PfDetail> {
        self.pf_details
            .iter()
            .find(|detail| &detail.employee_id == employee_id)
    }

    pub fn account_detail(&self, employee_id: &EmployeeId) -> Option<&AccountDetail> {
        self.account_details
            .iter()
            .find(|detail| &detail.employee_id == employee_id)
    }

    /// Current contents as owned seed data.
    pub fn snapshot(&self) -> SeedData {
        SeedData {
            employees: self.employees.clone(),
            departments: self.departments.clone(),
            pf_details: self.pf_details.clone(),
            account_details: self.account_details.clone(),
        }
    }

    /// Append a new employee under a freshly assigned id.
    ///
    /// Bank and PF fields in `data` stay on the employee only; no detail
    /// record is created for them.
    pub fn add_employee(&mut self, data: NewEmployee) -> EmployeeId {
        let id = self.allocate_id();
        debug!(employee_id = %id, "employee added");
        self.employees.push(data.with_id(id.clone()));
        id
    }

    /// Replace the employee with the same id. Unknown ids are ignored.
    pub fn update_employee(&mut self, employee: Employee) {
        match self.employees.iter_mut().find(|e| e.id == employee.id) {
            Some(slot) => {
                debug!(employee_id = %employee.id, "employee updated");
                *slot = employee;
            }
            None => debug!(employee_id = %employee.id, "update skipped; no such employee"),
        }
    }

    /// Remove the employee together with any PF and account details.
    pub fn delete_employee(&mut self, id: &EmployeeId) {
        let before = self.employees.len();
        self.employees.retain(|employee| &employee.id != id);
        self.pf_details.retain(|detail| &detail.employee_id != id);
        self.account_details.retain(|detail| &detail.employee_id != id);
        if self.employees.len() == before {
            debug!(employee_id = %id, "delete skipped; no such employee");
        } else {
            debug!(employee_id = %id, "employee deleted");
        }
    }

    /// Append a PF record and mark its employee as enrolled.
    pub fn add_pf_detail(&mut self, detail: PfDetail) {
        if self.pf_detail(&detail.employee_id).is_some() {
            warn!(employee_id = %detail.employee_id, "appending a second PF record");
        }
        match self.employee_mut(&detail.employee_id) {
            Some(employee) => {
                employee.pf_enrolled = true;
                employee.pf_number = Some(detail.pf_number.clone());
            }
            None => warn!(employee_id = %detail.employee_id, "PF record for unknown employee"),
        }
        debug!(employee_id = %detail.employee_id, "PF record added");
        self.pf_details.push(detail);
    }

    /// Replace the PF record for the same employee and copy the new PF
    /// number onto the employee if it is still enrolled. Does nothing when
    /// no record exists.
    pub fn update_pf_detail(&mut self, detail: PfDetail) {
        let Some(slot) = self
            .pf_details
            .iter_mut()
            .find(|existing| existing.employee_id == detail.employee_id)
        else {
            debug!(employee_id = %detail.employee_id, "PF update skipped; no existing record");
            return;
        };
        if let Some(employee) = self
            .employees
            .iter_mut()
            .find(|employee| employee.id == detail.employee_id)
        {
            if employee.pf_enrolled {
                employee.pf_number = Some(detail.pf_number.clone());
            } else {
                debug!(employee_id = %detail.employee_id, "employee not enrolled; PF number kept off");
            }
        }
        debug!(employee_id = %detail.employee_id, "PF record updated");
        *slot = detail;
    }

    /// Append an account record and copy the bank fields onto its employee.
    pub fn add_account_detail(&mut self, detail: AccountDetail) {
        if self.account_detail(&detail.employee_id).is_some() {
            warn!(employee_id = %detail.employee_id, "appending a second account record");
        }
        match self.employee_mut(&detail.employee_id) {
            Some(employee) => copy_bank_fields(employee, &detail),
            None => warn!(employee_id = %detail.employee_id, "account record for unknown employee"),
        }
        debug!(employee_id = %detail.employee_id, "account record added");
        self.account_details.push(detail);
    }

    /// Replace the account record for the same employee and copy the bank
    /// fields onto the employee. Does nothing when no record exists.
    pub fn update_account_detail(&mut self, detail: AccountDetail) {
        let Some(slot) = self
            .account_details
            .iter_mut()
            .find(|existing| existing.employee_id == detail.employee_id)
        else {
            debug!(employee_id = %detail.employee_id, "account update skipped; no existing record");
            return;
        };
        if let Some(employee) = self
            .employees
            .iter_mut()
            .find(|employee| employee.id == detail.employee_id)
        {
            copy_bank_fields(employee, &detail);
        }
        debug!(employee_id = %detail.employee_id, "account record updated");
        *slot = detail;
    }

    fn employee_mut(&mut self, id: &EmployeeId) -> Option<&mut Employee> {
        self.employees.iter_mut().find(|employee| &employee.id == id)
    }

    fn allocate_id(&mut self) -> EmployeeId {
        loop {
            let candidate = EmployeeId::new(self.next_id.to_string());
            self.next_id = match self.next_id.checked_add(1) {
                Some(next) => next,
                None => {
                    warn!("employee id counter exhausted; restarting from the lowest free id");
                    1
                }
            };
            if self.employee(&candidate).is_none() {
                return candidate;
            }
        }
    }
}

fn copy_bank_fields(employee: &mut Employee, detail: &AccountDetail) {
    employee.bank_name = Some(detail.bank_name.clone());
    employee.account_number = Some(detail.account_number.clone());
    employee.ifsc_code = Some(detail.ifsc_code.clone());
}

fn check_seed(seed: &SeedData) -> Result<(), SeedError> {
    let mut ids = HashSet::new();
    for employee in &seed.employees {
        if !ids.insert(&employee.id) {
            return Err(SeedError::DuplicateEmployee(employee.id.clone()));
        }
    }

    let mut names = HashSet::new();
    for dept in &seed.departments {
        if !names.insert(dept.name.as_str()) {
            return Err(SeedError::DuplicateDepartment(dept.name.clone()));
        }
    }

    check_details("PF", &ids, seed.pf_details.iter().map(|d| &d.employee_id))?;
    check_details(
        "account",
        &ids,
        seed.account_details.iter().map(|d| &d.employee_id),
    )
}

fn check_details<'a>(
    kind: &'static str,
    employees: &HashSet<&EmployeeId>,
    owners: impl Iterator<Item = &'a EmployeeId>,
) -> Result<(), SeedError> {
    let mut seen = HashSet::new();
    for employee_id in owners {
        if !employees.contains(employee_id) {
            return Err(SeedError::UnknownEmployee {
                kind,
                employee_id: employee_id.clone(),
            });
        }
        if !seen.insert(employee_id) {
            return Err(SeedError::DuplicateDetail {
                kind,
                employee_id: employee_id.clone(),
            });
        }
    }
    Ok(())
}
