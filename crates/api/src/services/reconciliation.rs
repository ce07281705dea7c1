//! Payment status reconciliation.
//!
//! Every path that can learn a charge outcome funnels through this
//! service: webhook delivery, client status polls, admin manual checks
//! and the background sweep. The terminal transition itself is a
//! conditional update in the transaction repository; this service
//! decides what transition to attempt and turns the winner/loser result
//! into a consistent response, so a payment is applied exactly once no
//! matter how many reconcilers race.

use chrono::{DateTime, Utc};
use domain::models::{CheckStatusResponse, Transaction, TransactionStatus};
use persistence::entities::TransactionEntity;
use persistence::repositories::TransactionRepository;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::metrics::record_transaction_settled;
use crate::services::payment_provider::{PaymentProvider, ProviderChargeStatus, ProviderError};

#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error("Transaction not found")]
    NotFound,

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<ReconcileError> for ApiError {
    fn from(err: ReconcileError) -> Self {
        match err {
            ReconcileError::NotFound => ApiError::NotFound("Transaction not found".into()),
            ReconcileError::Provider(e) => ApiError::Provider(e.to_string()),
            ReconcileError::Database(e) => e.into(),
        }
    }
}

/// What a reconciliation attempt should do, given the stored state and
/// the provider's report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReconcilePlan {
    /// The stored transaction is already terminal; report it as-is.
    AlreadyTerminal,
    /// Provider still reports pending and the deadline has not passed.
    StillPending,
    /// Attempt the guarded pending -> terminal transition.
    Transition {
        status: TransactionStatus,
        paid_at: Option<DateTime<Utc>>,
    },
}

/// Decide the transition for a stored transaction given the provider's
/// reported charge status. Pure so the race and expiry rules are
/// testable without a database.
fn plan(
    current: TransactionStatus,
    expires_at: DateTime<Utc>,
    reported: ProviderChargeStatus,
    reported_paid_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> ReconcilePlan {
    if current.is_terminal() {
        return ReconcilePlan::AlreadyTerminal;
    }

    match reported {
        ProviderChargeStatus::Succeeded => ReconcilePlan::Transition {
            status: TransactionStatus::Paid,
            paid_at: Some(reported_paid_at.unwrap_or(now)),
        },
        ProviderChargeStatus::Failed => ReconcilePlan::Transition {
            status: TransactionStatus::Failed,
            paid_at: None,
        },
        ProviderChargeStatus::Expired => ReconcilePlan::Transition {
            status: TransactionStatus::Expired,
            paid_at: None,
        },
        // The provider never expires a charge on its own schedule; the
        // checkout deadline is ours to enforce.
        ProviderChargeStatus::Pending if now > expires_at => ReconcilePlan::Transition {
            status: TransactionStatus::Expired,
            paid_at: None,
        },
        ProviderChargeStatus::Pending => ReconcilePlan::StillPending,
    }
}

/// Build the status-check response for a transaction that is (or just
/// became) terminal. `performed_transition` is true only for the caller
/// that won the guarded update.
fn outcome(transaction: Transaction, performed_transition: bool) -> CheckStatusResponse {
    let is_already_paid = transaction.status == TransactionStatus::Paid && !performed_transition;
    CheckStatusResponse {
        status: transaction.status,
        is_already_paid,
        transaction: Some(transaction.into()),
    }
}

fn pending_outcome() -> CheckStatusResponse {
    CheckStatusResponse {
        status: TransactionStatus::Pending,
        is_already_paid: false,
        transaction: None,
    }
}

/// Reconciles stored transactions against the payment provider.
#[derive(Clone)]
pub struct ReconciliationService {
    transactions: TransactionRepository,
    provider: Arc<dyn PaymentProvider>,
    display_window_secs: i64,
}

impl ReconciliationService {
    pub fn new(pool: PgPool, provider: Arc<dyn PaymentProvider>, display_window_secs: i64) -> Self {
        Self {
            transactions: TransactionRepository::new(pool),
            provider,
            display_window_secs,
        }
    }

    /// Check (and if necessary settle) the status of a transaction on
    /// behalf of a client poll or an admin manual check.
    ///
    /// Terminal transactions short-circuit without a provider call.
    pub async fn check_status(
        &self,
        transaction_id: Uuid,
        store_id: Uuid,
    ) -> Result<CheckStatusResponse, ReconcileError> {
        let entity = self
            .transactions
            .find_by_id_for_store(transaction_id, store_id)
            .await?
            .ok_or(ReconcileError::NotFound)?;

        self.resolve(entity, None, "poll").await
    }

    /// Apply a provider-reported charge status delivered by webhook.
    ///
    /// The webhook body is trusted only for routing; the reported status
    /// goes through the same guarded transition as every other path, so
    /// replayed or duplicate deliveries are no-ops.
    pub async fn apply_webhook(
        &self,
        provider_ref: &str,
        reported: ProviderChargeStatus,
        reported_paid_at: Option<DateTime<Utc>>,
    ) -> Result<CheckStatusResponse, ReconcileError> {
        let entity = self
            .transactions
            .find_by_provider_ref(provider_ref)
            .await?
            .ok_or(ReconcileError::NotFound)?;

        self.resolve(entity, Some((reported, reported_paid_at)), "webhook")
            .await
    }

    /// Reconcile a pending transaction picked up by the background
    /// sweep, querying the provider for its authoritative status.
    pub async fn reconcile_pending(
        &self,
        entity: TransactionEntity,
    ) -> Result<CheckStatusResponse, ReconcileError> {
        self.resolve(entity, None, "sweep").await
    }

    async fn resolve(
        &self,
        entity: TransactionEntity,
        reported: Option<(ProviderChargeStatus, Option<DateTime<Utc>>)>,
        source: &'static str,
    ) -> Result<CheckStatusResponse, ReconcileError> {
        let current: TransactionStatus = entity.status.into();
        if current.is_terminal() {
            return Ok(outcome(entity.into(), false));
        }

        let (reported, reported_paid_at) = match reported {
            Some(known) => known,
            None => {
                let charge = self.provider.charge_status(&entity.provider_ref).await?;
                (charge.status, charge.paid_at)
            }
        };

        match plan(current, entity.expires_at, reported, reported_paid_at, Utc::now()) {
            ReconcilePlan::AlreadyTerminal => Ok(outcome(entity.into(), false)),
            ReconcilePlan::StillPending => Ok(pending_outcome()),
            ReconcilePlan::Transition { status, paid_at } => {
                let won = self
                    .transactions
                    .mark_terminal(entity.id, status.into(), paid_at, self.display_window_secs)
                    .await?;

                match won {
                    Some(updated) => {
                        let settled: TransactionStatus = updated.status.into();
                        record_transaction_settled(settled.as_str(), source);
                        tracing::info!(
                            transaction_id = %updated.id,
                            store_id = %updated.store_id,
                            status = %settled,
                            source = source,
                            "Transaction settled"
                        );
                        Ok(outcome(updated.into(), true))
                    }
                    // Lost the race; another reconciler already settled
                    // this transaction. Report the winner's state.
                    None => {
                        let winner = self
                            .transactions
                            .find_by_id_for_store(entity.id, entity.store_id)
                            .await?
                            .ok_or(ReconcileError::NotFound)?;
                        Ok(outcome(winner.into(), false))
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    fn not_expired() -> DateTime<Utc> {
        now() + Duration::minutes(10)
    }

    #[test]
    fn test_terminal_transaction_short_circuits() {
        let decision = plan(
            TransactionStatus::Paid,
            not_expired(),
            ProviderChargeStatus::Pending,
            None,
            now(),
        );
        assert_eq!(decision, ReconcilePlan::AlreadyTerminal);
    }

    #[test]
    fn test_succeeded_charge_transitions_to_paid() {
        let settled = now() - Duration::seconds(5);
        let decision = plan(
            TransactionStatus::Pending,
            not_expired(),
            ProviderChargeStatus::Succeeded,
            Some(settled),
            now(),
        );
        assert_eq!(
            decision,
            ReconcilePlan::Transition {
                status: TransactionStatus::Paid,
                paid_at: Some(settled),
            }
        );
    }

    #[test]
    fn test_succeeded_charge_without_paid_at_uses_now() {
        let at = now();
        let decision = plan(
            TransactionStatus::Pending,
            not_expired(),
            ProviderChargeStatus::Succeeded,
            None,
            at,
        );
        assert_eq!(
            decision,
            ReconcilePlan::Transition {
                status: TransactionStatus::Paid,
                paid_at: Some(at),
            }
        );
    }

    #[test]
    fn test_failed_charge_transitions_without_paid_at() {
        let decision = plan(
            TransactionStatus::Pending,
            not_expired(),
            ProviderChargeStatus::Failed,
            None,
            now(),
        );
        assert_eq!(
            decision,
            ReconcilePlan::Transition {
                status: TransactionStatus::Failed,
                paid_at: None,
            }
        );
    }

    #[test]
    fn test_pending_within_deadline_stays_pending() {
        let decision = plan(
            TransactionStatus::Pending,
            not_expired(),
            ProviderChargeStatus::Pending,
            None,
            now(),
        );
        assert_eq!(decision, ReconcilePlan::StillPending);
    }

    #[test]
    fn test_pending_past_deadline_expires() {
        let decision = plan(
            TransactionStatus::Pending,
            now() - Duration::minutes(1),
            ProviderChargeStatus::Pending,
            None,
            now(),
        );
        assert_eq!(
            decision,
            ReconcilePlan::Transition {
                status: TransactionStatus::Expired,
                paid_at: None,
            }
        );
    }

    fn transaction(status: TransactionStatus) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            store_id: Uuid::new_v4(),
            code: "DJ001".to_string(),
            customer_name: "Alice".to_string(),
            amount: 1200,
            currency: "THB".to_string(),
            status,
            provider_ref: "chg_abc".to_string(),
            paid_at: (status == TransactionStatus::Paid).then(now),
            expires_at: not_expired(),
            created_at: now(),
            updated_at: now(),
        }
    }

    #[test]
    fn test_winner_of_paid_transition_is_not_already_paid() {
        let response = outcome(transaction(TransactionStatus::Paid), true);
        assert_eq!(response.status, TransactionStatus::Paid);
        assert!(!response.is_already_paid);
        assert!(response.transaction.is_some());
    }

    #[test]
    fn test_loser_of_paid_transition_sees_already_paid() {
        let response = outcome(transaction(TransactionStatus::Paid), false);
        assert_eq!(response.status, TransactionStatus::Paid);
        assert!(response.is_already_paid);
    }

    #[test]
    fn test_already_paid_never_set_for_non_paid_terminals() {
        let response = outcome(transaction(TransactionStatus::Expired), false);
        assert_eq!(response.status, TransactionStatus::Expired);
        assert!(!response.is_already_paid);

        let response = outcome(transaction(TransactionStatus::Failed), false);
        assert!(!response.is_already_paid);
    }

    #[test]
    fn test_pending_outcome_has_no_transaction_body() {
        let response = pending_outcome();
        assert_eq!(response.status, TransactionStatus::Pending);
        assert!(!response.is_already_paid);
        assert!(response.transaction.is_none());
    }
}
