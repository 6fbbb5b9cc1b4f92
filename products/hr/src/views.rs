//! Read models derived from a [`RecordStore`] snapshot: the filtered
//! employee list, the PF and account rosters, the detail-form pickers and
//! the dashboard figures.

use std::cmp::Reverse;

use serde::Serialize;

use crate::model::{AccountDetail, Employee, EmployeeId, EmployeeStatus, PfDetail};
use crate::store::RecordStore;

pub const DEFAULT_RECENT_LIMIT: usize = 5;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EmployeeFilter {
    /// Case-insensitive match against full name or email.
    pub search: Option<String>,
    pub department: Option<String>,
    pub status: Option<EmployeeStatus>,
}

impl EmployeeFilter {
    pub fn matches(&self, employee: &Employee) -> bool {
        let search_ok = match normalized(self.search.as_deref()) {
            Some(term) => {
                contains(&employee.full_name(), &term) || contains(&employee.email, &term)
            }
            None => true,
        };
        let department_ok = self
            .department
            .as_deref()
            .filter(|dept| !dept.is_empty())
            .is_none_or(|dept| employee.department == dept);
        let status_ok = self.status.is_none_or(|status| employee.status == status);
        search_ok && department_ok && status_ok
    }
}

pub fn filter_employees<'a>(store: &'a RecordStore, filter: &EmployeeFilter) -> Vec<&'a Employee> {
    store
        .employees()
        .iter()
        .filter(|employee| filter.matches(employee))
        .collect()
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PfRosterEntry<'a> {
    pub employee: &'a Employee,
    pub detail: Option<&'a PfDetail>,
}

impl PfRosterEntry<'_> {
    pub fn total_contribution(&self) -> f64 {
        self.detail.map_or(0.0, PfDetail::total_contribution)
    }
}

/// Enrolled employees whose name or PF number matches `search`.
pub fn pf_roster<'a>(store: &'a RecordStore, search: Option<&str>) -> Vec<PfRosterEntry<'a>> {
    let term = normalized(search);
    store
        .employees()
        .iter()
        .filter(|employee| employee.pf_enrolled)
        .filter(|employee| match &term {
            Some(term) => {
                contains(&employee.full_name(), term)
                    || employee
                        .pf_number
                        .as_deref()
                        .is_some_and(|number| contains(number, term))
            }
            None => true,
        })
        .map(|employee| PfRosterEntry {
            employee,
            detail: store.pf_detail(&employee.id),
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRosterEntry<'a> {
    pub employee: &'a Employee,
    pub detail: Option<&'a AccountDetail>,
}

/// Employees with an account number whose name, account number or bank
/// matches `search`.
pub fn account_roster<'a>(
    store: &'a RecordStore,
    search: Option<&str>,
) -> Vec<AccountRosterEntry<'a>> {
    let term = normalized(search);
    store
        .employees()
        .iter()
        .filter(|employee| employee.account_number.is_some())
        .filter(|employee| match &term {
            Some(term) => {
                contains(&employee.full_name(), term)
                    || [&employee.account_number, &employee.bank_name]
                        .into_iter()
                        .flatten()
                        .any(|value| contains(value, term))
            }
            None => true,
        })
        .map(|employee| AccountRosterEntry {
            employee,
            detail: store.account_detail(&employee.id),
        })
        .collect()
}

/// Employees that can be picked in the PF form: those without a PF record,
/// plus the employee currently being edited.
pub fn available_for_pf<'a>(
    store: &'a RecordStore,
    editing: Option<&EmployeeId>,
) -> Vec<&'a Employee> {
    store
        .employees()
        .iter()
        .filter(|employee| {
            Some(&employee.id) == editing || store.pf_detail(&employee.id).is_none()
        })
        .collect()
}

/// Same as [`available_for_pf`] for the account form.
pub fn available_for_account<'a>(
    store: &'a RecordStore,
    editing: Option<&EmployeeId>,
) -> Vec<&'a Employee> {
    store
        .employees()
        .iter()
        .filter(|employee| {
            Some(&employee.id) == editing || store.account_detail(&employee.id).is_none()
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentHeadcount {
    pub name: String,
    pub head: String,
    pub count: usize,
    pub percentage: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub total_employees: usize,
    pub active_employees: usize,
    pub total_salary: f64,
    pub pf_enrolled: usize,
    pub pf_enrollment_percentage: u32,
    pub employee_contributions: f64,
    pub employer_contributions: f64,
    pub total_contributions: f64,
    pub departments: Vec<DepartmentHeadcount>,
    pub recent_employees: Vec<Employee>,
}

impl Dashboard {
    pub fn build(store: &RecordStore, recent_limit: usize) -> Self {
        let employees = store.employees();
        let total = employees.len();
        let pf_enrolled = employees.iter().filter(|e| e.pf_enrolled).count();
        let employee_contributions = store
            .pf_details()
            .iter()
            .map(|d| d.employee_contribution)
            .sum::<f64>();
        let employer_contributions = store
            .pf_details()
            .iter()
            .map(|d| d.employer_contribution)
            .sum::<f64>();

        let mut departments: Vec<DepartmentHeadcount> = store
            .departments()
            .iter()
            .map(|dept| {
                let count = employees.iter().filter(|e| e.department == dept.name).count();
                DepartmentHeadcount {
                    name: dept.name.clone(),
                    head: dept.head.clone(),
                    count,
                    percentage: percentage(count, total),
                }
            })
            .collect();
        departments.sort_by_key(|dept| Reverse(dept.count));

        Self {
            total_employees: total,
            active_employees: employees.iter().filter(|e| e.is_active()).count(),
            total_salary: employees.iter().map(|e| e.salary).sum(),
            pf_enrolled,
            pf_enrollment_percentage: percentage(pf_enrolled, total),
            employee_contributions,
            employer_contributions,
            total_contributions: employee_contributions + employer_contributions,
            departments,
            recent_employees: recent_employees(store, recent_limit),
        }
    }
}

/// Newest joiners first.
pub fn recent_employees(store: &RecordStore, limit: usize) -> Vec<Employee> {
    let mut employees: Vec<&Employee> = store.employees().iter().collect();
    employees.sort_by_key(|employee| Reverse(employee.date_of_joining));
    employees.into_iter().take(limit).cloned().collect()
}

fn percentage(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round() as u32
}

fn normalized(search: Option<&str>) -> Option<String> {
    search
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(str::to_lowercase)
}

fn contains(haystack: &str, lowered_term: &str) -> bool {
    haystack.to_lowercase().contains(lowered_term)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(employees: &[&Employee]) -> Vec<String> {
        employees.iter().map(|e| e.id.to_string()).collect()
    }

    #[test]
    fn filter_combines_search_department_and_status() {
        let store = RecordStore::demo();
        let by_name = EmployeeFilter {
            search: Some("JOHN".into()),
            ..EmployeeFilter::default()
        };
        assert_eq!(ids(&filter_employees(&store, &by_name)), vec!["1", "3"]);

        let by_email = EmployeeFilter {
            search: Some("smith@".into()),
            ..EmployeeFilter::default()
        };
        assert_eq!(ids(&filter_employees(&store, &by_email)), vec!["2"]);

        let inactive_ops = EmployeeFilter {
            search: None,
            department: Some("Operations".into()),
            status: Some(EmployeeStatus::Inactive),
        };
        assert_eq!(ids(&filter_employees(&store, &inactive_ops)), vec!["5"]);

        assert_eq!(filter_employees(&store, &EmployeeFilter::default()).len(), 5);
    }

    #[test]
    fn pf_roster_lists_enrolled_employees_only() {
        let store = RecordStore::demo();
        let roster = pf_roster(&store, None);
        assert_eq!(roster.len(), 4);
        assert!(roster.iter().all(|entry| entry.detail.is_some()));
        assert_eq!(roster[0].total_contribution(), 6800.0);

        let hits = pf_roster(&store, Some("pf7890"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].employee.first_name, "Jane");
    }

    #[test]
    fn account_roster_searches_bank_and_number() {
        let store = RecordStore::demo();
        assert_eq!(account_roster(&store, None).len(), 4);
        let hits = account_roster(&store, Some("global"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].employee.id, EmployeeId::from("4"));
        assert_eq!(account_roster(&store, Some("3456789012")).len(), 1);
        assert!(account_roster(&store, Some("michael")).is_empty());
    }

    #[test]
    fn pickers_exclude_employees_with_records() {
        let store = RecordStore::demo();
        assert_eq!(ids(&available_for_pf(&store, None)), vec!["3"]);
        let editing = EmployeeId::from("2");
        assert_eq!(ids(&available_for_account(&store, Some(&editing))), vec!["2", "3"]);
    }

    #[test]
    fn dashboard_figures_for_demo_data() {
        let dashboard = Dashboard::build(&RecordStore::demo(), DEFAULT_RECENT_LIMIT);
        assert_eq!(dashboard.total_employees, 5);
        assert_eq!(dashboard.active_employees, 4);
        assert_eq!(dashboard.total_salary, 438000.0);
        assert_eq!(dashboard.pf_enrolled, 4);
        assert_eq!(dashboard.pf_enrollment_percentage, 80);
        assert_eq!(dashboard.employee_contributions, 14400.0);
        assert_eq!(dashboard.employer_contributions, 14400.0);
        assert_eq!(dashboard.total_contributions, 28800.0);
        assert!(dashboard.departments.iter().all(|d| d.count == 1 && d.percentage == 20));
        let recent: Vec<&str> = dashboard
            .recent_employees
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(recent, vec!["3", "4", "1", "5", "2"]);
    }

    #[test]
    fn dashboard_on_empty_store_has_zero_percentages() {
        let dashboard = Dashboard::build(&RecordStore::empty(), 3);
        assert_eq!(dashboard.total_employees, 0);
        assert_eq!(dashboard.pf_enrollment_percentage, 0);
        assert_eq!(dashboard.departments.len(), 5);
        assert!(dashboard.departments.iter().all(|d| d.percentage == 0));
        assert!(dashboard.recent_employees.is_empty());
    }
}
