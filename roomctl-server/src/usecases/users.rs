use std::sync::Arc;

use roomctl_core::{NewUser, User, UserPatch};

use super::error::RepoResultExt;
use super::{Result, UseCaseError};
use crate::db::UserRepository;

const RESOURCE: &str = "user";

/// User operations
#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    /// Create a user; the email must not be taken.
    pub async fn create(&self, user: NewUser) -> Result<User> {
        self.ensure_email_free(&user.email, None).await?;
        let created = self.repo.create(user).await.during(RESOURCE, "create user")?;
        tracing::info!(user_id = created.id, "user created");
        Ok(created)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<User> {
        self.repo
            .find_by_id(id)
            .await
            .during(RESOURCE, "find user")?
            .ok_or_else(|| UseCaseError::not_found(RESOURCE, id))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<User> {
        self.repo
            .find_by_email(email)
            .await
            .during(RESOURCE, "find user")?
            .ok_or_else(|| UseCaseError::not_found(RESOURCE, email))
    }

    pub async fn find_all(&self) -> Result<Vec<User>> {
        self.repo.find_all().await.during(RESOURCE, "list users")
    }

    /// Partial update; changing the email to one held by another user is a
    /// conflict.
    pub async fn update(&self, id: i32, patch: UserPatch) -> Result<User> {
        self.find_by_id(id).await?;
        if let Some(email) = &patch.email {
            self.ensure_email_free(email, Some(id)).await?;
        }
        self.repo.update(id, patch).await.during(RESOURCE, "update user")
    }

    pub async fn delete(&self, id: i32) -> Result<()> {
        self.find_by_id(id).await?;
        self.repo.delete(id).await.during(RESOURCE, "delete user")?;
        tracing::info!(user_id = id, "user deleted");
        Ok(())
    }

    async fn ensure_email_free(&self, email: &str, owner: Option<i32>) -> Result<()> {
        let existing = self
            .repo
            .find_by_email(email)
            .await
            .during(RESOURCE, "find user")?;
        match existing {
            Some(user) if Some(user.id) != owner => Err(UseCaseError::conflict(
                RESOURCE,
                format!("user with email '{}' already exists", email),
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::memory::MemoryStore;
    use roomctl_core::UserStatus;

    fn service() -> (UserService, Arc<MemoryStore<User>>) {
        let store = Arc::new(MemoryStore::new());
        (UserService::new(store.clone()), store)
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.into(),
            password: "pw".into(),
            role: "user".into(),
            status: UserStatus::Active,
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_conflict() {
        let (users, _) = service();
        users.create(new_user("a@example.com")).await.unwrap();

        let err = users.create(new_user("a@example.com")).await.unwrap_err();
        assert!(matches!(err, UseCaseError::Conflict { resource: "user", .. }));
        assert_eq!(users.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_user_is_not_found() {
        let (users, _) = service();
        assert!(matches!(
            users.find_by_id(42).await,
            Err(UseCaseError::NotFound { .. })
        ));
        assert!(matches!(
            users.find_by_email("nobody@example.com").await,
            Err(UseCaseError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn update_and_delete_check_existence_first() {
        let (users, _) = service();
        assert!(matches!(
            users.update(9, UserPatch::default()).await,
            Err(UseCaseError::NotFound { .. })
        ));
        assert!(matches!(users.delete(9).await, Err(UseCaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn update_keeps_own_email_but_rejects_taken_one() {
        let (users, _) = service();
        let a = users.create(new_user("a@example.com")).await.unwrap();
        users.create(new_user("b@example.com")).await.unwrap();

        let same = UserPatch {
            email: Some("a@example.com".into()),
            role: Some("admin".into()),
            ..UserPatch::default()
        };
        assert_eq!(users.update(a.id, same).await.unwrap().role, "admin");

        let taken = UserPatch {
            email: Some("b@example.com".into()),
            ..UserPatch::default()
        };
        assert!(matches!(
            users.update(a.id, taken).await,
            Err(UseCaseError::Conflict { .. })
        ));
    }

    #[tokio::test]
    async fn repository_failure_is_wrapped() {
        let (users, store) = service();
        store.fail();
        let err = users.find_all().await.unwrap_err();
        assert!(matches!(err, UseCaseError::Repository { action: "list users", .. }));
    }
}
