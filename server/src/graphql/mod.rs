mod inputs;
mod nodes;

use std::sync::Arc;

use async_graphql::{Context, EmptySubscription, Error, ErrorExtensions, ID, Object, Schema};
use platform_api::ApiError;
use products_hr::views::{self, Dashboard, EmployeeFilter};
use products_hr::{AccountDetail, EmployeeId, PfDetail, RecordStore, ValidationErrors};
use tokio::sync::RwLock;
use tracing::{info, instrument};

use inputs::{AccountDetailInput, EmployeeFilterInput, EmployeeInput, PfDetailInput};
use nodes::{
    AccountDetailNode, AccountRosterRow, DashboardPayload, DepartmentNode, EmployeeNode,
    HealthPayload, PfDetailNode, PfRosterRow,
};

/// The session's record store, shared with every resolver. Mutations hold
/// the write guard until the store and its derived fields are consistent.
pub type SharedStore = Arc<RwLock<RecordStore>>;

pub type SchemaType = Schema<QueryRoot, MutationRoot, EmptySubscription>;

#[derive(Clone, Copy, Debug)]
pub struct SchemaSettings {
    pub recent_limit: usize,
}

impl Default for SchemaSettings {
    fn default() -> Self {
        Self {
            recent_limit: views::DEFAULT_RECENT_LIMIT,
        }
    }
}

pub fn build_schema(store: SharedStore, settings: SchemaSettings) -> SchemaType {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(store)
        .data(settings)
        .finish()
}

#[derive(Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    #[instrument(name = "graphql.health", skip_all)]
    async fn health(&self) -> HealthPayload {
        HealthPayload { ok: true }
    }

    #[instrument(name = "graphql.version", skip_all)]
    async fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    #[instrument(name = "graphql.employees", skip_all)]
    async fn employees(
        &self,
        ctx: &Context<'_>,
        filter: Option<EmployeeFilterInput>,
    ) -> async_graphql::Result<Vec<EmployeeNode>> {
        let filter = filter.unwrap_or_default();
        let filter = EmployeeFilter {
            search: filter.search,
            department: filter.department,
            status: filter.status.map(Into::into),
        };
        let store = shared_store(ctx)?.read().await;
        Ok(views::filter_employees(&store, &filter)
            .into_iter()
            .map(EmployeeNode::from)
            .collect())
    }

    #[instrument(name = "graphql.employee", skip_all)]
    async fn employee(
        &self,
        ctx: &Context<'_>,
        id: ID,
    ) -> async_graphql::Result<Option<EmployeeNode>> {
        let store = shared_store(ctx)?.read().await;
        Ok(store.employee(&employee_id(&id)).map(EmployeeNode::from))
    }

    #[instrument(name = "graphql.departments", skip_all)]
    async fn departments(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<DepartmentNode>> {
        let store = shared_store(ctx)?.read().await;
        Ok(store.departments().iter().map(DepartmentNode::from).collect())
    }

    #[instrument(name = "graphql.pf_details", skip_all)]
    async fn pf_details(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<PfDetailNode>> {
        let store = shared_store(ctx)?.read().await;
        Ok(store.pf_details().iter().map(PfDetailNode::from).collect())
    }

    #[instrument(name = "graphql.account_details", skip_all)]
    async fn account_details(
        &self,
        ctx: &Context<'_>,
    ) -> async_graphql::Result<Vec<AccountDetailNode>> {
        let store = shared_store(ctx)?.read().await;
        Ok(store
            .account_details()
            .iter()
            .map(AccountDetailNode::from)
            .collect())
    }

    #[instrument(name = "graphql.pf_roster", skip_all)]
    async fn pf_roster(
        &self,
        ctx: &Context<'_>,
        search: Option<String>,
    ) -> async_graphql::Result<Vec<PfRosterRow>> {
        let store = shared_store(ctx)?.read().await;
        Ok(views::pf_roster(&store, search.as_deref())
            .into_iter()
            .map(PfRosterRow::from)
            .collect())
    }

    #[instrument(name = "graphql.account_roster", skip_all)]
    async fn account_roster(
        &self,
        ctx: &Context<'_>,
        search: Option<String>,
    ) -> async_graphql::Result<Vec<AccountRosterRow>> {
        let store = shared_store(ctx)?.read().await;
        Ok(views::account_roster(&store, search.as_deref())
            .into_iter()
            .map(AccountRosterRow::from)
            .collect())
    }

    /// Employees selectable in the PF form.
    #[instrument(name = "graphql.available_for_pf", skip_all)]
    async fn available_for_pf(
        &self,
        ctx: &Context<'_>,
        editing: Option<ID>,
    ) -> async_graphql::Result<Vec<EmployeeNode>> {
        let store = shared_store(ctx)?.read().await;
        let editing = editing.as_ref().map(employee_id);
        Ok(views::available_for_pf(&store, editing.as_ref())
            .into_iter()
            .map(EmployeeNode::from)
            .collect())
    }

    /// Employees selectable in the account form.
    #[instrument(name = "graphql.available_for_account", skip_all)]
    async fn available_for_account(
        &self,
        ctx: &Context<'_>,
        editing: Option<ID>,
    ) -> async_graphql::Result<Vec<EmployeeNode>> {
        let store = shared_store(ctx)?.read().await;
        let editing = editing.as_ref().map(employee_id);
        Ok(views::available_for_account(&store, editing.as_ref())
            .into_iter()
            .map(EmployeeNode::from)
            .collect())
    }

    #[instrument(name = "graphql.dashboard", skip_all)]
    async fn dashboard(
        &self,
        ctx: &Context<'_>,
        recent_limit: Option<i32>,
    ) -> async_graphql::Result<DashboardPayload> {
        let limit = match recent_limit {
            Some(limit) => usize::try_from(limit)
                .map_err(|_| ApiError::invalid("recentLimit must not be negative").extend())?,
            None => settings(ctx)?.recent_limit,
        };
        let store = shared_store(ctx)?.read().await;
        Ok(Dashboard::build(&store, limit).into())
    }
}

#[derive(Default)]
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    #[instrument(name = "graphql.add_employee", skip_all)]
    async fn add_employee(
        &self,
        ctx: &Context<'_>,
        input: EmployeeInput,
    ) -> async_graphql::Result<EmployeeNode> {
        let mut store = shared_store(ctx)?.write().await;
        let data = input
            .into_draft()
            .parse(store.departments())
            .map_err(validation_error)?;
        let id = store.add_employee(data);
        info!(employee_id = %id, "employee created");
        store
            .employee(&id)
            .map(EmployeeNode::from)
            .ok_or_else(|| ApiError::NotFound.extend())
    }

    #[instrument(name = "graphql.update_employee", skip_all)]
    async fn update_employee(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: EmployeeInput,
    ) -> async_graphql::Result<EmployeeNode> {
        let id = employee_id(&id);
        let mut store = shared_store(ctx)?.write().await;
        if store.employee(&id).is_none() {
            return Err(ApiError::NotFound.extend());
        }
        let data = input
            .into_draft()
            .parse(store.departments())
            .map_err(validation_error)?;
        store.update_employee(data.with_id(id.clone()));
        store
            .employee(&id)
            .map(EmployeeNode::from)
            .ok_or_else(|| ApiError::NotFound.extend())
    }

    /// Removes the employee and their PF and account records. Unknown ids
    /// are accepted and change nothing.
    #[instrument(name = "graphql.delete_employee", skip_all)]
    async fn delete_employee(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<ID> {
        let mut store = shared_store(ctx)?.write().await;
        store.delete_employee(&employee_id(&id));
        Ok(id)
    }

    #[instrument(name = "graphql.add_pf_detail", skip_all)]
    async fn add_pf_detail(
        &self,
        ctx: &Context<'_>,
        input: PfDetailInput,
    ) -> async_graphql::Result<PfDetailNode> {
        let detail = input.into_draft().parse().map_err(validation_error)?;
        let mut store = shared_store(ctx)?.write().await;
        ensure_employee(&store, &detail.employee_id)?;
        if store.pf_detail(&detail.employee_id).is_some() {
            return Err(ApiError::invalid(format!(
                "employee {} already has PF details",
                detail.employee_id
            ))
            .extend());
        }
        Ok(add_pf(&mut store, detail))
    }

    #[instrument(name = "graphql.update_pf_detail", skip_all)]
    async fn update_pf_detail(
        &self,
        ctx: &Context<'_>,
        input: PfDetailInput,
    ) -> async_graphql::Result<PfDetailNode> {
        let detail = input.into_draft().parse().map_err(validation_error)?;
        let mut store = shared_store(ctx)?.write().await;
        if store.pf_detail(&detail.employee_id).is_none() {
            return Err(ApiError::NotFound.extend());
        }
        Ok(update_pf(&mut store, detail))
    }

    /// Add or replace, depending on whether the employee already has PF
    /// details.
    #[instrument(name = "graphql.save_pf_detail", skip_all)]
    async fn save_pf_detail(
        &self,
        ctx: &Context<'_>,
        input: PfDetailInput,
    ) -> async_graphql::Result<PfDetailNode> {
        let detail = input.into_draft().parse().map_err(validation_error)?;
        let mut store = shared_store(ctx)?.write().await;
        if store.pf_detail(&detail.employee_id).is_some() {
            return Ok(update_pf(&mut store, detail));
        }
        ensure_employee(&store, &detail.employee_id)?;
        Ok(add_pf(&mut store, detail))
    }

    #[instrument(name = "graphql.add_account_detail", skip_all)]
    async fn add_account_detail(
        &self,
        ctx: &Context<'_>,
        input: AccountDetailInput,
    ) -> async_graphql::Result<AccountDetailNode> {
        let detail = input.into_draft().parse().map_err(validation_error)?;
        let mut store = shared_store(ctx)?.write().await;
        ensure_employee(&store, &detail.employee_id)?;
        if store.account_detail(&detail.employee_id).is_some() {
            return Err(ApiError::invalid(format!(
                "employee {} already has account details",
                detail.employee_id
            ))
            .extend());
        }
        Ok(add_account(&mut store, detail))
    }

    #[instrument(name = "graphql.update_account_detail", skip_all)]
    async fn update_account_detail(
        &self,
        ctx: &Context<'_>,
        input: AccountDetailInput,
    ) -> async_graphql::Result<AccountDetailNode> {
        let detail = input.into_draft().parse().map_err(validation_error)?;
        let mut store = shared_store(ctx)?.write().await;
        if store.account_detail(&detail.employee_id).is_none() {
            return Err(ApiError::NotFound.extend());
        }
        Ok(update_account(&mut store, detail))
    }

    /// Add or replace, depending on whether the employee already has
    /// account details.
    #[instrument(name = "graphql.save_account_detail", skip_all)]
    async fn save_account_detail(
        &self,
        ctx: &Context<'_>,
        input: AccountDetailInput,
    ) -> async_graphql::Result<AccountDetailNode> {
        let detail = input.into_draft().parse().map_err(validation_error)?;
        let mut store = shared_store(ctx)?.write().await;
        if store.account_detail(&detail.employee_id).is_some() {
            return Ok(update_account(&mut store, detail));
        }
        ensure_employee(&store, &detail.employee_id)?;
        Ok(add_account(&mut store, detail))
    }
}

fn add_pf(store: &mut RecordStore, detail: PfDetail) -> PfDetailNode {
    let node = PfDetailNode::from(&detail);
    store.add_pf_detail(detail);
    node
}

fn update_pf(store: &mut RecordStore, detail: PfDetail) -> PfDetailNode {
    let node = PfDetailNode::from(&detail);
    store.update_pf_detail(detail);
    node
}

fn add_account(store: &mut RecordStore, detail: AccountDetail) -> AccountDetailNode {
    let node = AccountDetailNode::from(&detail);
    store.add_account_detail(detail);
    node
}

fn update_account(store: &mut RecordStore, detail: AccountDetail) -> AccountDetailNode {
    let node = AccountDetailNode::from(&detail);
    store.update_account_detail(detail);
    node
}

fn shared_store<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a SharedStore> {
    ctx.data::<SharedStore>()
        .map_err(|_| platform_api::internal_error(anyhow::anyhow!("record store missing")))
}

fn settings(ctx: &Context<'_>) -> async_graphql::Result<SchemaSettings> {
    ctx.data::<SchemaSettings>()
        .copied()
        .map_err(|_| platform_api::internal_error(anyhow::anyhow!("schema settings missing")))
}

fn ensure_employee(store: &RecordStore, id: &EmployeeId) -> Result<(), Error> {
    if store.employee(id).is_none() {
        return Err(ApiError::invalid(format!("unknown employee {id}")).extend());
    }
    Ok(())
}

fn employee_id(id: &ID) -> EmployeeId {
    EmployeeId::from(id.as_str())
}

fn validation_error(errors: ValidationErrors) -> Error {
    ApiError::validation(errors.iter()).extend()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_graphql::{Request, Variables};
    use serde_json::{json, Value};

    fn schema() -> (SharedStore, SchemaType) {
        let store: SharedStore = Arc::new(RwLock::new(RecordStore::demo()));
        (store.clone(), build_schema(store, SchemaSettings::default()))
    }

    async fn run(schema: &SchemaType, query: &str, variables: Value) -> Value {
        let request = Request::new(query).variables(Variables::from_json(variables));
        let response = schema.execute(request).await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        response.data.into_json().unwrap()
    }

    async fn run_err(schema: &SchemaType, query: &str, variables: Value) -> Value {
        let request = Request::new(query).variables(Variables::from_json(variables));
        let response = schema.execute(request).await;
        assert_eq!(response.errors.len(), 1, "{:?}", response.errors);
        let error = &response.errors[0];
        json!({
            "message": error.message,
            "extensions": serde_json::to_value(&error.extensions).unwrap(),
        })
    }

    #[tokio::test]
    async fn health_query_returns_ok() {
        let (_, schema) = schema();
        let body = run(&schema, "{ health { ok } }", json!({})).await;
        assert_eq!(body, json!({"health": {"ok": true}}));
    }

    #[tokio::test]
    async fn employees_can_be_filtered() {
        let (_, schema) = schema();
        let body = run(
            &schema,
            "query($f: EmployeeFilterInput) { employees(filter: $f) { id fullName status } }",
            json!({"f": {"status": "INACTIVE"}}),
        )
        .await;
        assert_eq!(
            body,
            json!({"employees": [{"id": "5", "fullName": "Robert Wilson", "status": "INACTIVE"}]})
        );
    }

    #[tokio::test]
    async fn add_pf_detail_enrolls_employee() {
        let (store, schema) = schema();
        let body = run(
            &schema,
            r#"mutation($input: PfDetailInput!) {
                addPfDetail(input: $input) { employeeId pfNumber totalContribution }
            }"#,
            json!({"input": {
                "employeeId": "3",
                "pfNumber": "PF555",
                "enrollmentDate": "2024-01-01",
                "employeeContribution": 100.0,
                "employerContribution": 100.0
            }}),
        )
        .await;
        assert_eq!(
            body,
            json!({"addPfDetail": {"employeeId": "3", "pfNumber": "PF555", "totalContribution": 200.0}})
        );

        let store = store.read().await;
        let michael = store.employee(&EmployeeId::from("3")).unwrap();
        assert!(michael.pf_enrolled);
        assert_eq!(michael.pf_number.as_deref(), Some("PF555"));
    }

    #[tokio::test]
    async fn duplicate_pf_detail_is_rejected_by_the_command_layer() {
        let (store, schema) = schema();
        let error = run_err(
            &schema,
            r#"mutation { addPfDetail(input: {
                employeeId: "1", pfNumber: "PF1", enrollmentDate: "2024-01-01",
                employeeContribution: 1, employerContribution: 1
            }) { employeeId } }"#,
            json!({}),
        )
        .await;
        assert_eq!(error["extensions"]["code"], json!("INVALID_INPUT"));
        assert_eq!(store.read().await.pf_details().len(), 4);
    }

    #[tokio::test]
    async fn save_account_detail_adds_then_updates() {
        let (store, schema) = schema();
        let mutation = r#"mutation($input: AccountDetailInput!) {
            saveAccountDetail(input: $input) { employeeId bankName accountType }
        }"#;
        run(
            &schema,
            mutation,
            json!({"input": {
                "employeeId": "3", "bankName": "Metro Bank",
                "accountNumber": "42", "ifscCode": "METR0000001"
            }}),
        )
        .await;
        let body = run(
            &schema,
            mutation,
            json!({"input": {
                "employeeId": "3", "bankName": "Harbor Bank",
                "accountNumber": "43", "ifscCode": "HARB0000001", "accountType": "SAVINGS"
            }}),
        )
        .await;
        assert_eq!(
            body,
            json!({"saveAccountDetail": {"employeeId": "3", "bankName": "Harbor Bank", "accountType": "SAVINGS"}})
        );

        let store = store.read().await;
        assert_eq!(store.account_details().len(), 5);
        let michael = store.employee(&EmployeeId::from("3")).unwrap();
        assert_eq!(michael.account_number.as_deref(), Some("43"));
    }

    #[tokio::test]
    async fn invalid_employee_input_reports_fields() {
        let (store, schema) = schema();
        let error = run_err(
            &schema,
            r#"mutation { addEmployee(input: { firstName: "A", email: "nope", salary: 0 }) { id } }"#,
            json!({}),
        )
        .await;
        assert_eq!(error["message"], json!("validation failed"));
        let fields = &error["extensions"]["fields"];
        assert_eq!(fields["email"], json!("Email is invalid"));
        assert_eq!(fields["salary"], json!("Salary must be a positive number"));
        assert_eq!(fields["lastName"], json!("Last name is required"));
        assert!(fields.get("firstName").is_none());
        assert_eq!(store.read().await.employees().len(), 5);
    }

    #[tokio::test]
    async fn add_then_delete_employee_round_trip() {
        let (store, schema) = schema();
        let body = run(
            &schema,
            r#"mutation($input: EmployeeInput!) { addEmployee(input: $input) { id department } }"#,
            json!({"input": {
                "firstName": "A", "lastName": "B", "email": "a.b@example.com",
                "phone": "555-000-0000", "dateOfJoining": "2024-06-01",
                "department": "Finance", "designation": "Clerk", "salary": 40000
            }}),
        )
        .await;
        assert_eq!(body, json!({"addEmployee": {"id": "6", "department": "Finance"}}));

        run(&schema, r#"mutation { deleteEmployee(id: "1") }"#, json!({})).await;
        let store = store.read().await;
        assert!(store.employee(&EmployeeId::from("1")).is_none());
        assert_eq!(store.pf_details().len(), 3);
        assert_eq!(store.account_details().len(), 3);
    }

    #[tokio::test]
    async fn update_unknown_employee_is_not_found() {
        let (_, schema) = schema();
        let error = run_err(
            &schema,
            r#"mutation { updateEmployee(id: "99", input: { firstName: "X" }) { id } }"#,
            json!({}),
        )
        .await;
        assert_eq!(error["extensions"]["code"], json!("NOT_FOUND"));
    }

    #[tokio::test]
    async fn detail_updates_without_a_record_are_not_found() {
        let (store, schema) = schema();
        let pf = run_err(
            &schema,
            r#"mutation { updatePfDetail(input: {
                employeeId: "3", pfNumber: "PF555", enrollmentDate: "2024-01-01",
                employeeContribution: 1, employerContribution: 1
            }) { employeeId } }"#,
            json!({}),
        )
        .await;
        assert_eq!(pf["extensions"]["code"], json!("NOT_FOUND"));

        let account = run_err(
            &schema,
            r#"mutation { updateAccountDetail(input: {
                employeeId: "3", bankName: "Metro Bank",
                accountNumber: "42", ifscCode: "METR0000001"
            }) { employeeId } }"#,
            json!({}),
        )
        .await;
        assert_eq!(account["extensions"]["code"], json!("NOT_FOUND"));

        let store = store.read().await;
        assert_eq!(store.pf_details().len(), 4);
        assert_eq!(store.account_details().len(), 4);
        let michael = store.employee(&EmployeeId::from("3")).unwrap();
        assert_eq!(michael.pf_number, None);
        assert_eq!(michael.bank_name, None);
    }

    #[tokio::test]
    async fn details_for_unknown_employee_are_rejected() {
        let (store, schema) = schema();
        let account = run_err(
            &schema,
            r#"mutation { addAccountDetail(input: {
                employeeId: "99", bankName: "Metro Bank",
                accountNumber: "42", ifscCode: "METR0000001"
            }) { employeeId } }"#,
            json!({}),
        )
        .await;
        assert_eq!(account["extensions"]["code"], json!("INVALID_INPUT"));
        assert_eq!(account["message"], json!("bad request: unknown employee 99"));

        let pf = run_err(
            &schema,
            r#"mutation { savePfDetail(input: {
                employeeId: "99", pfNumber: "PF1", enrollmentDate: "2024-01-01",
                employeeContribution: 1, employerContribution: 1
            }) { employeeId } }"#,
            json!({}),
        )
        .await;
        assert_eq!(pf["extensions"]["code"], json!("INVALID_INPUT"));

        let store = store.read().await;
        assert_eq!(store.pf_details().len(), 4);
        assert_eq!(store.account_details().len(), 4);
    }

    #[tokio::test]
    async fn pf_update_after_unenrolling_keeps_number_off_the_employee() {
        let (store, schema) = schema();
        let body = run(
            &schema,
            r#"mutation($input: EmployeeInput!) {
                updateEmployee(id: "1", input: $input) { pfEnrolled pfNumber }
            }"#,
            json!({"input": {
                "firstName": "John", "lastName": "Doe", "email": "john.doe@example.com",
                "phone": "555-123-4567", "dateOfJoining": "2022-03-15",
                "department": "Engineering", "designation": "Software Engineer",
                "salary": 85000, "pfEnrolled": false, "pfNumber": "PF123456"
            }}),
        )
        .await;
        assert_eq!(
            body,
            json!({"updateEmployee": {"pfEnrolled": false, "pfNumber": null}})
        );

        run(
            &schema,
            r#"mutation { updatePfDetail(input: {
                employeeId: "1", pfNumber: "PF999", enrollmentDate: "2022-04-01",
                employeeContribution: 1700, employerContribution: 1700
            }) { pfNumber } }"#,
            json!({}),
        )
        .await;

        let store = store.read().await;
        let john = store.employee(&EmployeeId::from("1")).unwrap();
        assert!(!john.pf_enrolled);
        assert_eq!(john.pf_number, None);
        assert_eq!(
            store.pf_detail(&EmployeeId::from("1")).unwrap().pf_number,
            "PF999"
        );
    }

    #[tokio::test]
    async fn dashboard_uses_configured_recent_limit() {
        let store: SharedStore = Arc::new(RwLock::new(RecordStore::demo()));
        let schema = build_schema(store, SchemaSettings { recent_limit: 2 });
        let body = run(
            &schema,
            "{ dashboard { totalEmployees pfEnrollmentPercentage recentEmployees { id } } }",
            json!({}),
        )
        .await;
        assert_eq!(
            body,
            json!({"dashboard": {
                "totalEmployees": 5,
                "pfEnrollmentPercentage": 80,
                "recentEmployees": [{"id": "3"}, {"id": "4"}]
            }})
        );
    }
}
