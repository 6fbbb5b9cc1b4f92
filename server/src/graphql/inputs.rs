use async_graphql::{ID, InputObject};
use products_hr::validate::{AccountDraft, EmployeeDraft, PfDraft};
use products_hr::{AccountType, EmployeeStatus};

use super::nodes::{AccountTypeValue, StatusValue};

/// Employee form submission. Text fields arrive as typed by the operator and
/// are checked by the employee form rules before reaching the store.
#[derive(InputObject, Clone, Debug, Default)]
pub struct EmployeeInput {
    #[graphql(default)]
    pub first_name: String,
    #[graphql(default)]
    pub last_name: String,
    #[graphql(default)]
    pub email: String,
    #[graphql(default)]
    pub phone: String,
    /// `YYYY-MM-DD`
    #[graphql(default)]
    pub date_of_joining: String,
    #[graphql(default)]
    pub department: String,
    #[graphql(default)]
    pub designation: String,
    pub salary: Option<f64>,
    pub status: Option<StatusValue>,
    #[graphql(default)]
    pub pf_enrolled: bool,
    pub pf_number: Option<String>,
    pub bank_name: Option<String>,
    pub account_number: Option<String>,
    pub ifsc_code: Option<String>,
}

impl EmployeeInput {
    pub fn into_draft(self) -> EmployeeDraft {
        EmployeeDraft {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            date_of_joining: self.date_of_joining,
            department: self.department,
            designation: self.designation,
            salary: self.salary.map(|v| v.to_string()).unwrap_or_default(),
            status: self
                .status
                .map(|s| EmployeeStatus::from(s).as_str().to_string())
                .unwrap_or_default(),
            pf_enrolled: self.pf_enrolled,
            pf_number: self.pf_number.unwrap_or_default(),
            bank_name: self.bank_name.unwrap_or_default(),
            account_number: self.account_number.unwrap_or_default(),
            ifsc_code: self.ifsc_code.unwrap_or_default(),
        }
    }
}

#[derive(InputObject, Clone, Debug)]
pub struct PfDetailInput {
    pub employee_id: ID,
    #[graphql(default)]
    pub pf_number: String,
    /// `YYYY-MM-DD`
    #[graphql(default)]
    pub enrollment_date: String,
    pub employee_contribution: Option<f64>,
    pub employer_contribution: Option<f64>,
}

impl PfDetailInput {
    pub fn into_draft(self) -> PfDraft {
        PfDraft {
            employee_id: self.employee_id.to_string(),
            pf_number: self.pf_number,
            enrollment_date: self.enrollment_date,
            employee_contribution: amount(self.employee_contribution),
            employer_contribution: amount(self.employer_contribution),
        }
    }
}

#[derive(InputObject, Clone, Debug)]
pub struct AccountDetailInput {
    pub employee_id: ID,
    #[graphql(default)]
    pub bank_name: String,
    #[graphql(default)]
    pub account_number: String,
    #[graphql(default)]
    pub ifsc_code: String,
    pub account_type: Option<AccountTypeValue>,
}

impl AccountDetailInput {
    pub fn into_draft(self) -> AccountDraft {
        AccountDraft {
            employee_id: self.employee_id.to_string(),
            bank_name: self.bank_name,
            account_number: self.account_number,
            ifsc_code: self.ifsc_code,
            account_type: self
                .account_type
                .map(|t| AccountType::from(t).as_str().to_string())
                .unwrap_or_default(),
        }
    }
}

#[derive(InputObject, Clone, Debug, Default)]
pub struct EmployeeFilterInput {
    pub search: Option<String>,
    pub department: Option<String>,
    pub status: Option<StatusValue>,
}

fn amount(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
