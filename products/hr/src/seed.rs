//! Reference dataset the store starts from.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{
    AccountDetail, AccountType, Department, Employee, EmployeeId, EmployeeStatus, PfDetail,
};

/// Initial contents of a [`crate::RecordStore`].
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedData {
    pub employees: Vec<Employee>,
    pub departments: Vec<Department>,
    pub pf_details: Vec<PfDetail>,
    pub account_details: Vec<AccountDetail>,
}

/// Five employees across five departments. Employees 1, 2, 4 and 5 hold a
/// PF record and a salary account; employee 3 has neither.
pub fn demo() -> SeedData {
    SeedData {
        employees: demo_employees(),
        departments: demo_departments(),
        pf_details: vec![
            pf("1", "PF123456", date(2022, 4, 1), 3400.0),
            pf("2", "PF789012", date(2021, 9, 1), 3680.0),
            pf("4", "PF345678", date(2022, 7, 1), 3520.0),
            pf("5", "PF901234", date(2021, 12, 1), 3800.0),
        ],
        account_details: vec![
            salary_account("1", "National Bank", "1234567890", "NATL0001234"),
            salary_account("2", "City Bank", "0987654321", "CITY0005678"),
            salary_account("4", "Global Bank", "5678901234", "GLOB0009012"),
            salary_account("5", "Union Bank", "3456789012", "UNIN0003456"),
        ],
    }
}

/// Departments only, for a store that starts without employees.
pub fn reference_only() -> SeedData {
    SeedData {
        departments: demo_departments(),
        ..SeedData::default()
    }
}

fn demo_departments() -> Vec<Department> {
    [
        ("1", "Engineering", "Alex Turner"),
        ("2", "Marketing", "Sarah Parker"),
        ("3", "Human Resources", "David Miller"),
        ("4", "Finance", "Jessica Brown"),
        ("5", "Operations", "Kevin Clark"),
    ]
    .into_iter()
    .map(|(id, name, head)| Department {
        id: id.into(),
        name: name.into(),
        head: head.into(),
    })
    .collect()
}

fn demo_employees() -> Vec<Employee> {
    vec![
        Employee {
            id: EmployeeId::from("1"),
            first_name: "John".into(),
            last_name: "Doe".into(),
            email: "john.doe@example.com".into(),
            phone: "555-123-4567".into(),
            date_of_joining: date(2022, 3, 15),
            department: "Engineering".into(),
            designation: "Software Engineer".into(),
            salary: 85000.0,
            status: EmployeeStatus::Active,
            pf_enrolled: true,
            pf_number: Some("PF123456".into()),
            bank_name: Some("National Bank".into()),
            account_number: Some("1234567890".into()),
            ifsc_code: Some("NATL0001234".into()),
        },
        Employee {
            id: EmployeeId::from("2"),
            first_name: "Jane".into(),
            last_name: "Smith".into(),
            email: "jane.smith@example.com".into(),
            phone: "555-987-6543".into(),
            date_of_joining: date(2021, 8, 10),
            department: "Marketing".into(),
            designation: "Marketing Manager".into(),
            salary: 92000.0,
            status: EmployeeStatus::Active,
            pf_enrolled: true,
            pf_number: Some("PF789012".into()),
            bank_name: Some("City Bank".into()),
            account_number: Some("0987654321".into()),
            ifsc_code: Some("CITY0005678".into()),
        },
        Employee {
            id: EmployeeId::from("3"),
            first_name: "Michael".into(),
            last_name: "Johnson".into(),
            email: "michael.johnson@example.com".into(),
            phone: "555-456-7890".into(),
            date_of_joining: date(2023, 1, 20),
            department: "Human Resources".into(),
            designation: "HR Specialist".into(),
            salary: 78000.0,
            status: EmployeeStatus::Active,
            pf_enrolled: false,
            pf_number: None,
            bank_name: None,
            account_number: None,
            ifsc_code: None,
        },
        Employee {
            id: EmployeeId::from("4"),
            first_name: "Emily".into(),
            last_name: "Davis".into(),
            email: "emily.davis@example.com".into(),
            phone: "555-789-0123".into(),
            date_of_joining: date(2022, 6, 5),
            department: "Finance".into(),
            designation: "Financial Analyst".into(),
            salary: 88000.0,
            status: EmployeeStatus::Active,
            pf_enrolled: true,
            pf_number: Some("PF345678".into()),
            bank_name: Some("Global Bank".into()),
            account_number: Some("5678901234".into()),
            ifsc_code: Some("GLOB0009012".into()),
        },
        Employee {
            id: EmployeeId::from("5"),
            first_name: "Robert".into(),
            last_name: "Wilson".into(),
            email: "robert.wilson@example.com".into(),
            phone: "555-234-5678".into(),
            date_of_joining: date(2021, 11, 15),
            department: "Operations".into(),
            designation: "Operations Manager".into(),
            salary: 95000.0,
            status: EmployeeStatus::Inactive,
            pf_enrolled: true,
            pf_number: Some("PF901234".into()),
            bank_name: Some("Union Bank".into()),
            account_number: Some("3456789012".into()),
            ifsc_code: Some("UNIN0003456".into()),
        },
    ]
}

// Both sides contribute the same amount in the reference data.
fn pf(employee_id: &str, pf_number: &str, enrolled: NaiveDate, contribution: f64) -> PfDetail {
    PfDetail {
        employee_id: EmployeeId::from(employee_id),
        pf_number: pf_number.into(),
        enrollment_date: enrolled,
        employee_contribution: contribution,
        employer_contribution: contribution,
    }
}

fn salary_account(employee_id: &str, bank: &str, number: &str, ifsc: &str) -> AccountDetail {
    AccountDetail {
        employee_id: EmployeeId::from(employee_id),
        bank_name: bank.into(),
        account_number: number.into(),
        ifsc_code: ifsc.into(),
        account_type: AccountType::Salary,
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_denormalized_fields_match_details() {
        let seed = demo();
        for detail in &seed.pf_details {
            let employee = seed
                .employees
                .iter()
                .find(|e| e.id == detail.employee_id)
                .unwrap();
            assert!(employee.pf_enrolled);
            assert_eq!(employee.pf_number.as_deref(), Some(detail.pf_number.as_str()));
        }
        for detail in &seed.account_details {
            let employee = seed
                .employees
                .iter()
                .find(|e| e.id == detail.employee_id)
                .unwrap();
            assert_eq!(employee.bank_name.as_deref(), Some(detail.bank_name.as_str()));
            assert_eq!(
                employee.account_number.as_deref(),
                Some(detail.account_number.as_str())
            );
            assert_eq!(employee.ifsc_code.as_deref(), Some(detail.ifsc_code.as_str()));
        }
    }

    #[test]
    fn reference_only_has_departments_and_nothing_else() {
        let seed = reference_only();
        assert_eq!(seed.departments.len(), 5);
        assert!(seed.employees.is_empty());
        assert!(seed.pf_details.is_empty());
        assert!(seed.account_details.is_empty());
    }
}
