use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Stable employee identifier. Assigned once and never reused.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(transparent)]
pub struct EmployeeId(String);

impl EmployeeId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EmployeeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for EmployeeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EmployeeStatus {
    Active,
    Inactive,
}

impl EmployeeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeStatus::Active => "active",
            EmployeeStatus::Inactive => "inactive",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Some(EmployeeStatus::Active),
            "inactive" => Some(EmployeeStatus::Inactive),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Savings,
    Current,
    #[default]
    Salary,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Savings => "savings",
            AccountType::Current => "current",
            AccountType::Salary => "salary",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "savings" => Some(AccountType::Savings),
            "current" => Some(AccountType::Current),
            "salary" => Some(AccountType::Salary),
            _ => None,
        }
    }
}

/// Employee record. The PF and bank fields mirror the employee's
/// [`PfDetail`] and [`AccountDetail`]; the store rewrites them whenever a
/// detail record is added or replaced.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_joining: NaiveDate,
    pub department: String,
    pub designation: String,
    pub salary: f64,
    pub status: EmployeeStatus,
    pub pf_enrolled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pf_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ifsc_code: Option<String>,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_active(&self) -> bool {
        self.status == EmployeeStatus::Active
    }

    /// Submitted fields without the identity, e.g. to prefill an edit form.
    pub fn to_new(&self) -> NewEmployee {
        NewEmployee {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            date_of_joining: self.date_of_joining,
            department: self.department.clone(),
            designation: self.designation.clone(),
            salary: self.salary,
            status: self.status,
            pf_enrolled: self.pf_enrolled,
            pf_number: self.pf_number.clone(),
            bank_name: self.bank_name.clone(),
            account_number: self.account_number.clone(),
            ifsc_code: self.ifsc_code.clone(),
        }
    }
}

/// An employee as submitted for creation, before an id is assigned.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_joining: NaiveDate,
    pub department: String,
    pub designation: String,
    pub salary: f64,
    pub status: EmployeeStatus,
    pub pf_enrolled: bool,
    #[serde(default)]
    pub pf_number: Option<String>,
    #[serde(default)]
    pub bank_name: Option<String>,
    #[serde(default)]
    pub account_number: Option<String>,
    #[serde(default)]
    pub ifsc_code: Option<String>,
}

impl NewEmployee {
    pub fn with_id(self, id: EmployeeId) -> Employee {
        Employee {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            date_of_joining: self.date_of_joining,
            department: self.department,
            designation: self.designation,
            salary: self.salary,
            status: self.status,
            pf_enrolled: self.pf_enrolled,
            pf_number: self.pf_number,
            bank_name: self.bank_name,
            account_number: self.account_number,
            ifsc_code: self.ifsc_code,
        }
    }
}

/// Reference data. Employees point at a department by name.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Department {
    pub id: String,
    pub name: String,
    pub head: String,
}

/// Provident fund enrollment, at most one per employee.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PfDetail {
    pub employee_id: EmployeeId,
    pub pf_number: String,
    pub enrollment_date: NaiveDate,
    pub employee_contribution: f64,
    pub employer_contribution: f64,
}

impl PfDetail {
    pub fn total_contribution(&self) -> f64 {
        self.employee_contribution + self.employer_contribution
    }
}

/// Salary bank account, at most one per employee.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDetail {
    pub employee_id: EmployeeId,
    pub bank_name: String,
    pub account_number: String,
    pub ifsc_code: String,
    pub account_type: AccountType,
}
