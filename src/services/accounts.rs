//! Account Service

use crate::db::DbConnection;
use crate::domain::{Account, AccountRisk, CreateAccountCommand, DomainError};
use crate::error::AppResult;
use crate::persistence::{AccountCrud, PersistenceError};

/// Account listing, risk lookup and creation
#[derive(Debug, Clone, Default)]
pub struct AccountService {
    crud: AccountCrud,
}

impl AccountService {
    pub fn new() -> Self {
        Self {
            crud: AccountCrud::new(),
        }
    }

    pub async fn get_all_accounts(&self, session: &mut DbConnection) -> AppResult<Vec<Account>> {
        tracing::debug!("Fetching all accounts");
        let accounts = self.crud.get_all(session).await?;
        Ok(accounts)
    }

    /// `None` when the account does not exist
    pub async fn get_account_risk(
        &self,
        account_id: &str,
        session: &mut DbConnection,
    ) -> AppResult<Option<AccountRisk>> {
        tracing::debug!(account_id = %account_id, "Fetching account risk");
        let risk = self.crud.get_risk(account_id, session).await?;
        Ok(risk)
    }

    /// Store a new account.
    ///
    /// A clash on `account_id` becomes `DomainError::Duplicate`; every other
    /// storage failure is passed through untouched.
    pub async fn create_account(
        &self,
        command: CreateAccountCommand,
        session: &mut DbConnection,
    ) -> AppResult<Account> {
        tracing::info!(account_id = %command.account_id, "Creating account");
        command.validate()?;

        let account = command.into_account();
        match self.crud.add(&account, session).await {
            Ok(()) => {
                tracing::info!(account_id = %account.account_id, "Account created");
                Ok(account)
            }
            Err(PersistenceError::UniqueViolation(message)) => {
                tracing::error!(
                    account_id = %account.account_id,
                    "Account creation failed: {}",
                    message
                );
                Err(DomainError::Duplicate(message).into())
            }
            Err(PersistenceError::Database(e)) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::error::AppError;

    #[tokio::test]
    async fn test_create_then_list_and_risk() {
        let pool = test_pool().await;
        let mut session = pool.acquire().await.unwrap();
        let service = AccountService::new();

        let created = service
            .create_account(
                CreateAccountCommand::new("ACC-1", "Ivan", "Petrov", "medium"),
                &mut session,
            )
            .await
            .unwrap();
        assert_eq!(created.risk, "medium");

        let all = service.get_all_accounts(&mut session).await.unwrap();
        assert_eq!(all, vec![created]);

        let risk = service.get_account_risk("ACC-1", &mut session).await.unwrap();
        assert_eq!(
            risk,
            Some(AccountRisk {
                account_id: "ACC-1".to_string(),
                risk: "medium".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_duplicate_account_leaves_original() {
        let pool = test_pool().await;
        let mut session = pool.acquire().await.unwrap();
        let service = AccountService::new();

        service
            .create_account(
                CreateAccountCommand::new("ACC-1", "Ivan", "Petrov", "low"),
                &mut session,
            )
            .await
            .unwrap();

        let err = service
            .create_account(
                CreateAccountCommand::new("ACC-1", "Other", "Person", "high"),
                &mut session,
            )
            .await
            .unwrap_err();

        match err {
            AppError::Domain(DomainError::Duplicate(msg)) => assert!(msg.contains("UNIQUE")),
            other => panic!("Expected Duplicate, got {:?}", other),
        }

        let all = service.get_all_accounts(&mut session).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].first_name, "Ivan");
        assert_eq!(all[0].risk, "low");
    }

    #[tokio::test]
    async fn test_unknown_account_risk_is_absent() {
        let pool = test_pool().await;
        let mut session = pool.acquire().await.unwrap();

        let risk = AccountService::new()
            .get_account_risk("nobody", &mut session)
            .await
            .unwrap();
        assert!(risk.is_none());
    }

    #[tokio::test]
    async fn test_empty_listing_is_not_error() {
        let pool = test_pool().await;
        let mut session = pool.acquire().await.unwrap();

        let all = AccountService::new().get_all_accounts(&mut session).await.unwrap();
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_command_never_reaches_storage() {
        let pool = test_pool().await;
        let mut session = pool.acquire().await.unwrap();
        let service = AccountService::new();

        let err = service
            .create_account(
                CreateAccountCommand::new("ACC-1", "Ivan", "Petrov", ""),
                &mut session,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Domain(DomainError::InvalidInput(_))));
        assert!(service.get_all_accounts(&mut session).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_other_storage_failures_propagate() {
        let pool = test_pool().await;
        let mut session = pool.acquire().await.unwrap();
        sqlx::query("DROP TABLE accounts").execute(&mut *session).await.unwrap();

        let err = AccountService::new()
            .create_account(
                CreateAccountCommand::new("ACC-1", "Ivan", "Petrov", "low"),
                &mut session,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Database(_)));
    }
}
