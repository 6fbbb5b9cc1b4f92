use async_graphql::{Enum, ID, SimpleObject};
use chrono::NaiveDate;
use products_hr::views::{AccountRosterEntry, Dashboard, DepartmentHeadcount, PfRosterEntry};
use products_hr::{AccountDetail, AccountType, Department, Employee, EmployeeStatus, PfDetail};

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
#[graphql(name = "EmployeeStatus")]
pub enum StatusValue {
    #[graphql(name = "ACTIVE")]
    Active,
    #[graphql(name = "INACTIVE")]
    Inactive,
}

impl From<EmployeeStatus> for StatusValue {
    fn from(value: EmployeeStatus) -> Self {
        match value {
            EmployeeStatus::Active => StatusValue::Active,
            EmployeeStatus::Inactive => StatusValue::Inactive,
        }
    }
}

impl From<StatusValue> for EmployeeStatus {
    fn from(value: StatusValue) -> Self {
        match value {
            StatusValue::Active => EmployeeStatus::Active,
            StatusValue::Inactive => EmployeeStatus::Inactive,
        }
    }
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
#[graphql(name = "AccountType")]
pub enum AccountTypeValue {
    #[graphql(name = "SAVINGS")]
    Savings,
    #[graphql(name = "CURRENT")]
    Current,
    #[graphql(name = "SALARY")]
    Salary,
}

impl From<AccountType> for AccountTypeValue {
    fn from(value: AccountType) -> Self {
        match value {
            AccountType::Savings => AccountTypeValue::Savings,
            AccountType::Current => AccountTypeValue::Current,
            AccountType::Salary => AccountTypeValue::Salary,
        }
    }
}

impl From<AccountTypeValue> for AccountType {
    fn from(value: AccountTypeValue) -> Self {
        match value {
            AccountTypeValue::Savings => AccountType::Savings,
            AccountTypeValue::Current => AccountType::Current,
            AccountTypeValue::Salary => AccountType::Salary,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "Employee")]
pub struct EmployeeNode {
    pub id: ID,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_joining: NaiveDate,
    pub department: String,
    pub designation: String,
    pub salary: f64,
    pub status: StatusValue,
    pub pf_enrolled: bool,
    pub pf_number: Option<String>,
    pub bank_name: Option<String>,
    pub account_number: Option<String>,
    pub ifsc_code: Option<String>,
}

impl From<&Employee> for EmployeeNode {
    fn from(model: &Employee) -> Self {
        Self {
            id: ID::from(model.id.to_string()),
            first_name: model.first_name.clone(),
            last_name: model.last_name.clone(),
            full_name: model.full_name(),
            email: model.email.clone(),
            phone: model.phone.clone(),
            date_of_joining: model.date_of_joining,
            department: model.department.clone(),
            designation: model.designation.clone(),
            salary: model.salary,
            status: model.status.into(),
            pf_enrolled: model.pf_enrolled,
            pf_number: model.pf_number.clone(),
            bank_name: model.bank_name.clone(),
            account_number: model.account_number.clone(),
            ifsc_code: model.ifsc_code.clone(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "Department")]
pub struct DepartmentNode {
    pub id: ID,
    pub name: String,
    pub head: String,
}

impl From<&Department> for DepartmentNode {
    fn from(model: &Department) -> Self {
        Self {
            id: ID::from(model.id.clone()),
            name: model.name.clone(),
            head: model.head.clone(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "PfDetail")]
pub struct PfDetailNode {
    pub employee_id: ID,
    pub pf_number: String,
    pub enrollment_date: NaiveDate,
    pub employee_contribution: f64,
    pub employer_contribution: f64,
    pub total_contribution: f64,
}

impl From<&PfDetail> for PfDetailNode {
    fn from(model: &PfDetail) -> Self {
        Self {
            employee_id: ID::from(model.employee_id.to_string()),
            pf_number: model.pf_number.clone(),
            enrollment_date: model.enrollment_date,
            employee_contribution: model.employee_contribution,
            employer_contribution: model.employer_contribution,
            total_contribution: model.total_contribution(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "AccountDetail")]
pub struct AccountDetailNode {
    pub employee_id: ID,
    pub bank_name: String,
    pub account_number: String,
    pub ifsc_code: String,
    pub account_type: AccountTypeValue,
}

impl From<&AccountDetail> for AccountDetailNode {
    fn from(model: &AccountDetail) -> Self {
        Self {
            employee_id: ID::from(model.employee_id.to_string()),
            bank_name: model.bank_name.clone(),
            account_number: model.account_number.clone(),
            ifsc_code: model.ifsc_code.clone(),
            account_type: model.account_type.into(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct PfRosterRow {
    pub employee: EmployeeNode,
    pub detail: Option<PfDetailNode>,
    pub total_contribution: f64,
}

impl From<PfRosterEntry<'_>> for PfRosterRow {
    fn from(entry: PfRosterEntry<'_>) -> Self {
        Self {
            total_contribution: entry.total_contribution(),
            employee: entry.employee.into(),
            detail: entry.detail.map(PfDetailNode::from),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct AccountRosterRow {
    pub employee: EmployeeNode,
    pub detail: Option<AccountDetailNode>,
}

impl From<AccountRosterEntry<'_>> for AccountRosterRow {
    fn from(entry: AccountRosterEntry<'_>) -> Self {
        Self {
            employee: entry.employee.into(),
            detail: entry.detail.map(AccountDetailNode::from),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct DepartmentHeadcountNode {
    pub name: String,
    pub head: String,
    pub count: i32,
    pub percentage: i32,
}

impl From<DepartmentHeadcount> for DepartmentHeadcountNode {
    fn from(model: DepartmentHeadcount) -> Self {
        Self {
            name: model.name,
            head: model.head,
            count: saturating_i32(model.count),
            percentage: saturating_i32(model.percentage as usize),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct DashboardPayload {
    pub total_employees: i32,
    pub active_employees: i32,
    pub total_salary: f64,
    pub pf_enrolled: i32,
    pub pf_enrollment_percentage: i32,
    pub employee_contributions: f64,
    pub employer_contributions: f64,
    pub total_contributions: f64,
    pub departments: Vec<DepartmentHeadcountNode>,
    pub recent_employees: Vec<EmployeeNode>,
}

impl From<Dashboard> for DashboardPayload {
    fn from(model: Dashboard) -> Self {
        Self {
            total_employees: saturating_i32(model.total_employees),
            active_employees: saturating_i32(model.active_employees),
            total_salary: model.total_salary,
            pf_enrolled: saturating_i32(model.pf_enrolled),
            pf_enrollment_percentage: saturating_i32(model.pf_enrollment_percentage as usize),
            employee_contributions: model.employee_contributions,
            employer_contributions: model.employer_contributions,
            total_contributions: model.total_contributions,
            departments: model.departments.into_iter().map(Into::into).collect(),
            recent_employees: model.recent_employees.iter().map(Into::into).collect(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct HealthPayload {
    pub ok: bool,
}

fn saturating_i32(value: usize) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
