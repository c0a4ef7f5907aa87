//! Role-scoped visibility, derived once per request and applied uniformly
//! across the attendance and leave ledgers.
//!
//! The scope itself is a pure value: given a caller descriptor it is computed
//! deterministically, and `allows` can be checked against any candidate
//! record's owning employee without touching storage.

use uuid::Uuid;

use crate::database::models::{Employee, UserRole};
use crate::database::repositories::{EmployeeRepository, UserRepository};
use crate::error::AppError;
use crate::services::auth::Claims;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessScope {
    /// hr_admin: unscoped across ledgers and directory.
    All,
    /// manager: employees whose manager reference equals this identity.
    DirectReports(Uuid),
    /// employee: only the caller's own linked employee record.
    SelfOnly(Uuid),
}

impl AccessScope {
    /// Derives the scope from (role, employee link, identity id). An employee
    /// with no linked profile is a data-setup problem, reported as the
    /// distinct not-linked condition rather than an authorization denial.
    pub fn for_caller(
        role: UserRole,
        employee_link: Option<Uuid>,
        caller_id: Uuid,
    ) -> Result<Self, AppError> {
        match role {
            UserRole::HrAdmin => Ok(AccessScope::All),
            UserRole::Manager => Ok(AccessScope::DirectReports(caller_id)),
            UserRole::Employee => employee_link
                .map(AccessScope::SelfOnly)
                .ok_or(AppError::ProfileNotLinked),
        }
    }

    /// Whether a record owned by the given employee is visible in this scope.
    pub fn allows(&self, employee: &Employee) -> bool {
        match self {
            AccessScope::All => true,
            AccessScope::DirectReports(manager_id) => {
                employee.manager_id == Some(*manager_id)
            }
            AccessScope::SelfOnly(employee_id) => employee.id == *employee_id,
        }
    }

    pub fn is_unscoped(&self) -> bool {
        matches!(self, AccessScope::All)
    }
}

/// Resolves the caller's scope from verified claims. The employee link lives
/// on the identity record, so this is the one storage read per request.
pub async fn resolve_scope(
    claims: &Claims,
    users: &UserRepository,
) -> Result<AccessScope, AppError> {
    let user = users
        .find_by_id(claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    AccessScope::for_caller(claims.role, user.employee_id, claims.sub)
}

/// The caller's own employee id, for self-service operations like check-in.
pub async fn linked_employee_id(
    claims: &Claims,
    users: &UserRepository,
) -> Result<Uuid, AppError> {
    let user = users
        .find_by_id(claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    user.employee_id.ok_or(AppError::ProfileNotLinked)
}

/// Narrows a ledger query to the employee ids the scope may see.
///
/// Returns `None` for an unscoped query. A request that names an employee
/// outside the scope is an explicit 403, never a silently-empty result.
pub async fn scoped_employee_ids(
    scope: &AccessScope,
    requested: Option<Uuid>,
    employees: &EmployeeRepository,
) -> Result<Option<Vec<Uuid>>, AppError> {
    match scope {
        AccessScope::All => Ok(requested.map(|id| vec![id])),
        AccessScope::DirectReports(manager_id) => {
            let report_ids = employees.find_report_ids(*manager_id).await?;
            match requested {
                Some(id) if report_ids.contains(&id) => Ok(Some(vec![id])),
                Some(_) => Err(AppError::Forbidden(
                    "Not authorized to view this employee's records".to_string(),
                )),
                None => Ok(Some(report_ids)),
            }
        }
        AccessScope::SelfOnly(employee_id) => match requested {
            Some(id) if id == *employee_id => Ok(Some(vec![id])),
            Some(_) => Err(AppError::Forbidden(
                "Not authorized to view this employee's records".to_string(),
            )),
            None => Ok(Some(vec![*employee_id])),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::EmployeeStatus;
    use bigdecimal::BigDecimal;
    use chrono::{NaiveDate, Utc};

    fn employee(id: Uuid, manager_id: Option<Uuid>) -> Employee {
        let now = Utc::now();
        Employee {
            id,
            employee_code: "EMP-001".to_string(),
            first_name: "Asha".to_string(),
            last_name: "Rao".to_string(),
            email: "asha.rao@example.com".to_string(),
            phone: None,
            date_of_joining: NaiveDate::from_ymd_opt(2022, 1, 10).unwrap(),
            department: "Engineering".to_string(),
            designation: "Developer".to_string(),
            salary: BigDecimal::from(50_000),
            status: EmployeeStatus::Active,
            manager_id,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn hr_admin_is_unscoped() {
        let scope =
            AccessScope::for_caller(UserRole::HrAdmin, None, Uuid::new_v4()).unwrap();
        assert!(scope.is_unscoped());
        assert!(scope.allows(&employee(Uuid::new_v4(), None)));
    }

    #[test]
    fn manager_sees_direct_reports_only() {
        let manager_id = Uuid::new_v4();
        let scope = AccessScope::for_caller(UserRole::Manager, None, manager_id).unwrap();

        assert!(scope.allows(&employee(Uuid::new_v4(), Some(manager_id))));
        assert!(!scope.allows(&employee(Uuid::new_v4(), Some(Uuid::new_v4()))));
        assert!(!scope.allows(&employee(Uuid::new_v4(), None)));
    }

    #[test]
    fn employee_sees_own_record_only() {
        let own_id = Uuid::new_v4();
        let scope =
            AccessScope::for_caller(UserRole::Employee, Some(own_id), Uuid::new_v4()).unwrap();

        assert!(scope.allows(&employee(own_id, None)));
        assert!(!scope.allows(&employee(Uuid::new_v4(), None)));
    }

    #[test]
    fn unlinked_employee_is_a_distinct_condition() {
        let result = AccessScope::for_caller(UserRole::Employee, None, Uuid::new_v4());
        // Not a Forbidden: the account is misconfigured, not under-privileged.
        assert!(matches!(result, Err(AppError::ProfileNotLinked)));
    }
}
