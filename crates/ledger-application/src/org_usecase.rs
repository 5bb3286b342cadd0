//! Organization use case implementation.

use ledger_core::error::{LedgerError, Result};
use ledger_core::ids::UserId;
use ledger_core::org::{Org, OrgRepository};
use ledger_core::user::UserRepository;
use std::sync::Arc;

/// Organization management on behalf of a caller.
///
/// Only members may bring new users into an organization, and every user
/// named in a request must be registered.
pub struct OrgUseCase {
    org_repository: Arc<dyn OrgRepository>,
    user_repository: Arc<dyn UserRepository>,
}

impl OrgUseCase {
    pub fn new(
        org_repository: Arc<dyn OrgRepository>,
        user_repository: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            org_repository,
            user_repository,
        }
    }

    /// Creates `name` with `admin` as its first member.
    pub async fn create(&self, admin: UserId, name: &str) -> Result<Org> {
        self.require_user(admin).await?;
        self.org_repository.create(admin, name).await
    }

    /// Adds `user_id` to `org_name`. `requester` must already be a member.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if either user is not registered
    /// - `OrgNotFound` if no organization has that name
    /// - `InsufficientPermissions` if `requester` is not a member
    /// - `AlreadyMember` if `user_id` already belongs to the organization
    pub async fn add_member(
        &self,
        requester: UserId,
        org_name: &str,
        user_id: UserId,
    ) -> Result<Org> {
        self.require_user(requester).await?;
        self.require_user(user_id).await?;

        let org = self
            .org_repository
            .find_by_name(org_name)
            .await
            .map_err(|e| e.context("find organization"))?
            .ok_or_else(|| LedgerError::OrgNotFound(org_name.to_string()))?;

        if !org.is_member(requester) {
            tracing::warn!(user_id = %requester, org = org_name, "member addition denied");
            return Err(LedgerError::InsufficientPermissions {
                user_id: requester,
                org_id: org.id,
            });
        }
        if org.is_member(user_id) {
            return Err(LedgerError::AlreadyMember {
                user_id,
                org_id: org.id,
            });
        }

        self.org_repository.add_member(org.id, user_id).await?;
        tracing::info!(org = org_name, user_id = %user_id, added_by = %requester, "member added");
        Ok(org)
    }

    /// Organizations `user_id` belongs to.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Org>> {
        self.require_user(user_id).await?;
        self.org_repository.list_for_user(user_id).await
    }

    async fn require_user(&self, user_id: UserId) -> Result<()> {
        self.user_repository
            .find_by_id(user_id)
            .await
            .map_err(|e| e.context("find user"))?
            .ok_or(LedgerError::UserNotFound(user_id))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_infrastructure::memory::{InMemoryOrgRepository, InMemoryUserRepository};

    struct Fixture {
        usecase: OrgUseCase,
        orgs: Arc<InMemoryOrgRepository>,
        admin: UserId,
        member: UserId,
        newcomer: UserId,
        outsider: UserId,
    }

    async fn fixture() -> Fixture {
        let orgs = Arc::new(InMemoryOrgRepository::new());
        let users = Arc::new(InMemoryUserRepository::new());
        let admin = users.create("admin", "").await.unwrap().id;
        let member = users.create("member", "").await.unwrap().id;
        let newcomer = users.create("newcomer", "").await.unwrap().id;
        let outsider = users.create("outsider", "").await.unwrap().id;

        let usecase = OrgUseCase::new(orgs.clone(), users);
        usecase.create(admin, "club1").await.unwrap();
        usecase.add_member(admin, "club1", member).await.unwrap();

        Fixture {
            usecase,
            orgs,
            admin,
            member,
            newcomer,
            outsider,
        }
    }

    #[tokio::test]
    async fn test_member_can_add_member() {
        let f = fixture().await;

        let org = f.usecase.add_member(f.member, "club1", f.newcomer).await.unwrap();

        let stored = f.orgs.find_by_id(org.id).await.unwrap().unwrap();
        assert!(stored.is_member(f.newcomer));
    }

    #[tokio::test]
    async fn test_outsider_cannot_add_member() {
        let f = fixture().await;
        let org = f.orgs.find_by_name("club1").await.unwrap().unwrap();

        let err = f
            .usecase
            .add_member(f.outsider, "club1", f.newcomer)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            LedgerError::InsufficientPermissions {
                user_id: f.outsider,
                org_id: org.id,
            }
        );
        let stored = f.orgs.find_by_id(org.id).await.unwrap().unwrap();
        assert!(!stored.is_member(f.newcomer));
    }

    #[tokio::test]
    async fn test_add_existing_member_is_reported() {
        let f = fixture().await;
        let org = f.orgs.find_by_name("club1").await.unwrap().unwrap();

        let err = f
            .usecase
            .add_member(f.admin, "club1", f.member)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            LedgerError::AlreadyMember {
                user_id: f.member,
                org_id: org.id,
            }
        );
    }

    #[tokio::test]
    async fn test_unknown_users_and_orgs() {
        let f = fixture().await;
        let ghost = UserId::new();

        assert_eq!(
            f.usecase.add_member(f.admin, "club1", ghost).await,
            Err(LedgerError::UserNotFound(ghost))
        );
        assert_eq!(
            f.usecase.add_member(f.admin, "club2", f.newcomer).await,
            Err(LedgerError::OrgNotFound("club2".to_string()))
        );
        assert_eq!(
            f.usecase.create(ghost, "club3").await,
            Err(LedgerError::UserNotFound(ghost))
        );
    }

    #[tokio::test]
    async fn test_list_for_user() {
        let f = fixture().await;
        f.usecase.create(f.member, "club0").await.unwrap();

        let names: Vec<String> = f
            .usecase
            .list_for_user(f.member)
            .await
            .unwrap()
            .into_iter()
            .map(|org| org.name)
            .collect();

        assert_eq!(names, vec!["club0", "club1"]);
        assert!(f.usecase.list_for_user(f.outsider).await.unwrap().is_empty());
    }
}
