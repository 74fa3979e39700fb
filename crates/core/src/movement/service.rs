//! Movement submission and lookup.

use std::sync::Arc;

use bytes::Bytes;
use chrono::{Local, NaiveDate, NaiveDateTime};
use gestion_shared::types::MovementId;

use super::account::{AccountCatalog, AccountDirectory, CachedDirectory};
use super::engine::{Evaluation, MovementEngine};
use super::error::{MovementError, RepositoryError};
use super::gate::{DenyReason, GateDecision, GateWarning};
use super::resolver::{MovementTotals, PostingLine};
use super::session::EntrySession;
use super::types::{MovementHeader, MovementLineRecord, MovementSummary, NewMovement};
use crate::storage::{StorageService, StoreRequest};

/// Repository trait for movement persistence.
///
/// This trait is implemented by the db crate to provide actual database operations.
pub trait MovementRepository: Send + Sync {
    /// Stores a header and its lines atomically.
    fn save_movement(
        &self,
        movement: NewMovement,
    ) -> impl std::future::Future<Output = Result<MovementId, RepositoryError>> + Send;

    /// Movements whose date falls in `from..=to`, newest first.
    fn query_movements(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> impl std::future::Future<Output = Result<Vec<MovementSummary>, RepositoryError>> + Send;

    /// Find a movement header by ID.
    fn find_movement(
        &self,
        id: MovementId,
    ) -> impl std::future::Future<Output = Result<Option<MovementHeader>, RepositoryError>> + Send;

    /// Lines of a movement in position order.
    fn list_lines(
        &self,
        id: MovementId,
    ) -> impl std::future::Future<Output = Result<Vec<MovementLineRecord>, RepositoryError>> + Send;
}

/// What a successful submission stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReceipt {
    /// New movement id.
    pub id: MovementId,
    /// Number of stored lines.
    pub line_count: usize,
    /// Stored totals.
    pub totals: MovementTotals,
    /// Storage keys of stored attachments.
    pub attachments: Vec<String>,
    /// Gate warnings.
    pub warnings: Vec<GateWarning>,
}

/// Result of [`MovementService::submit`].
///
/// The session is always handed back: reset after a save, untouched otherwise.
#[derive(Debug)]
pub struct SubmitOutcome {
    /// The session.
    pub session: EntrySession,
    /// Receipt or the reason nothing was stored.
    pub result: Result<SubmitReceipt, MovementError>,
}

/// Movement service: evaluates sessions, stores attachments and movements.
pub struct MovementService<R: MovementRepository> {
    repo: Arc<R>,
    storage: Arc<StorageService>,
    engine: MovementEngine,
}

impl<R: MovementRepository> MovementService<R> {
    /// Create a new movement service.
    #[must_use]
    pub fn new(repo: Arc<R>, storage: Arc<StorageService>, engine: MovementEngine) -> Self {
        Self {
            repo,
            storage,
            engine,
        }
    }

    /// The engine used for evaluation.
    #[must_use]
    pub fn engine(&self) -> &MovementEngine {
        &self.engine
    }

    /// Evaluates a session without storing anything.
    #[must_use]
    pub fn preview(&self, session: &EntrySession, catalog: &AccountCatalog) -> Evaluation {
        self.engine.evaluate(session, catalog)
    }

    /// Loads the catalog from `directory`, then submits.
    ///
    /// A directory failure leaves the session untouched.
    pub async fn submit_with_directory<D: AccountDirectory>(
        &self,
        session: EntrySession,
        directory: &CachedDirectory<D>,
    ) -> SubmitOutcome {
        match directory.catalog().await {
            Ok(catalog) => self.submit(session, &catalog).await,
            Err(err) => {
                tracing::error!(error = %err, "Could not load accounts for submission");
                SubmitOutcome {
                    session,
                    result: Err(err.into()),
                }
            }
        }
    }

    /// Evaluates the session and, if admitted, stores attachments and the movement.
    ///
    /// Either everything is stored or nothing is: files written before a failure
    /// are deleted again.
    pub async fn submit(&self, mut session: EntrySession, catalog: &AccountCatalog) -> SubmitOutcome {
        let result = self.try_submit(&session, catalog).await;
        if result.is_ok() {
            session.reset();
        }
        SubmitOutcome { session, result }
    }

    async fn try_submit(
        &self,
        session: &EntrySession,
        catalog: &AccountCatalog,
    ) -> Result<SubmitReceipt, MovementError> {
        let evaluation = self.engine.evaluate(session, catalog);

        let warnings = match evaluation.decision {
            GateDecision::Admit { warnings } => warnings,
            GateDecision::Deny { reasons, .. } => {
                tracing::info!(reasons = reasons.len(), "Movement denied by posting gate");
                return Err(MovementError::Rejected(reasons));
            }
        };

        let Some(occurred_at) = evaluation.occurred_at else {
            return Err(MovementError::Rejected(vec![DenyReason::InvalidTimestamp]));
        };
        let header = session.header();
        let (Some(client), Some(company), Some(bank)) =
            (header.client.clone(), header.company.clone(), header.bank.clone())
        else {
            return Err(MovementError::Rejected(vec![DenyReason::HeaderIncomplete(
                header.missing_fields(),
            )]));
        };

        let mut lines = evaluation.resolution.lines;
        let totals = evaluation.resolution.totals;
        let stamp = Local::now().naive_local();
        let attachments = self.store_attachments(session, &mut lines, stamp).await?;

        let line_count = lines.len();
        let movement = NewMovement {
            occurred_at,
            client,
            company,
            bank,
            total_debit: totals.total_debit,
            total_credit: totals.total_credit,
            lines,
        };

        match self.repo.save_movement(movement).await {
            Ok(id) => {
                tracing::info!(
                    movement_id = %id,
                    lines = line_count,
                    attachments = attachments.len(),
                    total_debit = %totals.total_debit,
                    total_credit = %totals.total_credit,
                    "Movement saved"
                );
                Ok(SubmitReceipt {
                    id,
                    line_count,
                    totals,
                    attachments,
                    warnings,
                })
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to save movement");
                self.discard(&attachments).await;
                Err(err.into())
            }
        }
    }

    async fn store_attachments(
        &self,
        session: &EntrySession,
        lines: &mut [PostingLine],
        stamp: NaiveDateTime,
    ) -> Result<Vec<String>, MovementError> {
        let mut stored = Vec::new();

        for (index, line) in lines.iter_mut().enumerate() {
            let Some(upload) = session.upload(line.line_id) else {
                continue;
            };
            let request = StoreRequest {
                stamp,
                position: index + 1,
                line_id: line.line_id,
                upload,
            };
            match self.storage.store(&request).await {
                Ok(file) => {
                    line.attachment = Some(file.key.clone());
                    stored.push(file.key);
                }
                Err(err) => {
                    tracing::warn!(
                        line = index + 1,
                        filename = %upload.filename,
                        error = %err,
                        "Attachment not stored"
                    );
                    self.discard(&stored).await;
                    return Err(err.into());
                }
            }
        }

        Ok(stored)
    }

    async fn discard(&self, keys: &[String]) {
        for key in keys {
            if let Err(err) = self.storage.delete(key).await {
                tracing::warn!(key = %key, error = %err, "Could not remove orphaned attachment");
            }
        }
    }

    /// Movements dated within `from..=to`, newest first.
    pub async fn query_movements(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<MovementSummary>, MovementError> {
        Ok(self.repo.query_movements(from, to).await?)
    }

    /// A movement header.
    pub async fn get_movement(&self, id: MovementId) -> Result<MovementHeader, MovementError> {
        self.repo
            .find_movement(id)
            .await?
            .ok_or_else(|| MovementError::NotFound(id.to_string()))
    }

    /// A movement's lines in position order.
    pub async fn get_movement_lines(
        &self,
        id: MovementId,
    ) -> Result<Vec<MovementLineRecord>, MovementError> {
        Ok(self.repo.list_lines(id).await?)
    }

    /// Reads a stored attachment.
    pub async fn read_attachment(&self, key: &str) -> Result<Bytes, MovementError> {
        Ok(self.storage.read(key).await?)
    }
}
