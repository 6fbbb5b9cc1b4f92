//! Field checks for the employee, PF and account forms.
//!
//! Drafts hold raw form strings. `parse` either produces the typed record
//! the store expects or a [`ValidationErrors`] keyed by form field name.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

use crate::model::{
    AccountDetail, AccountType, Department, EmployeeId, EmployeeStatus, NewEmployee, PfDetail,
};

static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern"));

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Field name to message, ordered by field name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Error)]
#[error("validation failed: {}", render(.0))]
pub struct ValidationErrors(BTreeMap<&'static str, String>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, ValidationErrors> {
        if self.is_empty() { Ok(value()) } else { Err(self) }
    }
}

fn render(fields: &BTreeMap<&'static str, String>) -> String {
    fields
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmployeeDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_joining: String,
    pub department: String,
    pub designation: String,
    pub salary: String,
    pub status: String,
    pub pf_enrolled: bool,
    pub pf_number: String,
    pub bank_name: String,
    pub account_number: String,
    pub ifsc_code: String,
}

impl EmployeeDraft {
    /// Check the draft against the employee form rules. A non-empty
    /// `departments` list restricts the department to one of its names.
    pub fn parse(self, departments: &[Department]) -> Result<NewEmployee, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        required(&mut errors, "firstName", &self.first_name, "First name is required");
        required(&mut errors, "lastName", &self.last_name, "Last name is required");
        if self.email.trim().is_empty() {
            errors.add("email", "Email is required");
        } else if !EMAIL.is_match(&self.email) {
            errors.add("email", "Email is invalid");
        }
        required(&mut errors, "phone", &self.phone, "Phone number is required");
        let date_of_joining = date(
            &mut errors,
            "dateOfJoining",
            &self.date_of_joining,
            "Date of joining is required",
        );
        if self.department.trim().is_empty() {
            errors.add("department", "Department is required");
        } else if !departments.is_empty()
            && !departments.iter().any(|dept| dept.name == self.department.trim())
        {
            errors.add("department", "Department is not recognized");
        }
        required(&mut errors, "designation", &self.designation, "Designation is required");

        let salary = if self.salary.trim().is_empty() {
            errors.add("salary", "Salary is required");
            None
        } else {
            match self.salary.trim().parse::<f64>() {
                Ok(value) if value.is_finite() && value > 0.0 => Some(value),
                _ => {
                    errors.add("salary", "Salary must be a positive number");
                    None
                }
            }
        };

        let status = if self.status.trim().is_empty() {
            Some(EmployeeStatus::Active)
        } else {
            let parsed = EmployeeStatus::parse(&self.status);
            if parsed.is_none() {
                errors.add("status", "Status must be active or inactive");
            }
            parsed
        };

        if self.pf_enrolled && self.pf_number.trim().is_empty() {
            errors.add("pfNumber", "PF number is required when enrolled");
        }

        let pf_number = if self.pf_enrolled {
            optional(&self.pf_number)
        } else {
            None
        };
        errors.finish(|| NewEmployee {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            date_of_joining: date_of_joining.unwrap_or_default(),
            department: self.department.trim().to_string(),
            designation: self.designation.trim().to_string(),
            salary: salary.unwrap_or_default(),
            status: status.unwrap_or(EmployeeStatus::Active),
            pf_enrolled: self.pf_enrolled,
            pf_number,
            bank_name: optional(&self.bank_name),
            account_number: optional(&self.account_number),
            ifsc_code: optional(&self.ifsc_code),
        })
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PfDraft {
    pub employee_id: String,
    pub pf_number: String,
    pub enrollment_date: String,
    pub employee_contribution: String,
    pub employer_contribution: String,
}

impl PfDraft {
    pub fn parse(self) -> Result<PfDetail, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        required(&mut errors, "employeeId", &self.employee_id, "Employee is required");
        required(&mut errors, "pfNumber", &self.pf_number, "PF number is required");
        let enrollment_date = date(
            &mut errors,
            "enrollmentDate",
            &self.enrollment_date,
            "Enrollment date is required",
        );
        let employee_contribution = contribution(
            &mut errors,
            "employeeContribution",
            &self.employee_contribution,
            "Employee contribution",
        );
        let employer_contribution = contribution(
            &mut errors,
            "employerContribution",
            &self.employer_contribution,
            "Employer contribution",
        );

        errors.finish(|| PfDetail {
            employee_id: EmployeeId::new(self.employee_id.trim()),
            pf_number: self.pf_number.trim().to_string(),
            enrollment_date: enrollment_date.unwrap_or_default(),
            employee_contribution: employee_contribution.unwrap_or_default(),
            employer_contribution: employer_contribution.unwrap_or_default(),
        })
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountDraft {
    pub employee_id: String,
    pub bank_name: String,
    pub account_number: String,
    pub ifsc_code: String,
    pub account_type: String,
}

impl AccountDraft {
    pub fn parse(self) -> Result<AccountDetail, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        required(&mut errors, "employeeId", &self.employee_id, "Employee is required");
        required(&mut errors, "bankName", &self.bank_name, "Bank name is required");
        required(
            &mut errors,
            "accountNumber",
            &self.account_number,
            "Account number is required",
        );
        required(&mut errors, "ifscCode", &self.ifsc_code, "IFSC code is required");
        let account_type = if self.account_type.trim().is_empty() {
            AccountType::default()
        } else {
            AccountType::parse(&self.account_type).unwrap_or_else(|| {
                errors.add(
                    "accountType",
                    "Account type must be savings, current or salary",
                );
                AccountType::default()
            })
        };

        errors.finish(|| AccountDetail {
            employee_id: EmployeeId::new(self.employee_id.trim()),
            bank_name: self.bank_name.trim().to_string(),
            account_number: self.account_number.trim().to_string(),
            ifsc_code: self.ifsc_code.trim().to_string(),
            account_type,
        })
    }
}

fn required(errors: &mut ValidationErrors, field: &'static str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.add(field, message);
    }
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn date(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
    missing: &str,
) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(field, missing);
        return None;
    }
    let parsed = NaiveDate::parse_from_str(trimmed, DATE_FORMAT).ok();
    if parsed.is_none() {
        errors.add(field, "Date must be in YYYY-MM-DD format");
    }
    parsed
}

fn contribution(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
    label: &str,
) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(field, format!("{label} is required"));
        return None;
    }
    match trimmed.parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount >= 0.0 => Some(amount),
        _ => {
            errors.add(field, format!("{label} must be a valid number"));
            None
        }
    }
}
