use std::sync::Arc;

use roomctl_core::{Employee, EmployeePatch, NewEmployee};

use super::error::RepoResultExt;
use super::{Result, UseCaseError};
use crate::db::EmployeeRepository;

const RESOURCE: &str = "employee";

/// Employee operations
#[derive(Clone)]
pub struct EmployeeService {
    repo: Arc<dyn EmployeeRepository>,
}

impl EmployeeService {
    pub fn new(repo: Arc<dyn EmployeeRepository>) -> Self {
        Self { repo }
    }

    /// Create an employee; the email must not be taken by another employee.
    pub async fn create(&self, employee: NewEmployee) -> Result<Employee> {
        let existing = self
            .repo
            .find_by_email(&employee.email)
            .await
            .during(RESOURCE, "find employee")?;
        if existing.is_some() {
            return Err(UseCaseError::conflict(
                RESOURCE,
                format!("employee with email '{}' already exists", employee.email),
            ));
        }

        let created = self
            .repo
            .create(employee)
            .await
            .during(RESOURCE, "create employee")?;
        tracing::info!(employee_id = created.id, user_id = created.user_id, "employee created");
        Ok(created)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Employee> {
        self.repo
            .find_by_id(id)
            .await
            .during(RESOURCE, "find employee")?
            .ok_or_else(|| UseCaseError::not_found(RESOURCE, id))
    }

    /// Employee profile attached to a user.
    pub async fn find_by_user_id(&self, user_id: i32) -> Result<Employee> {
        self.repo
            .find_by_user_id(user_id)
            .await
            .during(RESOURCE, "find employee")?
            .ok_or_else(|| UseCaseError::not_found(RESOURCE, format!("user {}", user_id)))
    }

    pub async fn find_all(&self) -> Result<Vec<Employee>> {
        self.repo.find_all().await.during(RESOURCE, "list employees")
    }

    pub async fn update(&self, id: i32, patch: EmployeePatch) -> Result<Employee> {
        self.find_by_id(id).await?;
        self.repo
            .update(id, patch)
            .await
            .during(RESOURCE, "update employee")
    }

    pub async fn delete(&self, id: i32) -> Result<()> {
        self.find_by_id(id).await?;
        self.repo
            .delete(id)
            .await
            .during(RESOURCE, "delete employee")
    }
}
