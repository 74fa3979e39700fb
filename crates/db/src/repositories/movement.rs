//! Movement repository: headers in `movimientos`, lines in `movimiento_detalle`.

use chrono::{NaiveDate, NaiveTime, Utc};
use gestion_core::movement::{
    CatalogRef, MovementHeader, MovementLineRecord, MovementRepository as MovementRepoTrait,
    MovementStatus, MovementSummary, NewMovement, RepositoryError,
};
use gestion_shared::types::{AccountId, BankId, ClientId, CompanyId, LineId, MovementId, round_currency};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, SqlErr, TransactionTrait,
};

use crate::entities::{movimiento_detalle, movimientos};

/// Maps a database error onto the repository error kinds.
pub(crate) fn db_err(err: DbErr) -> RepositoryError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg) | SqlErr::ForeignKeyConstraintViolation(msg)) => {
            RepositoryError::Conflict(msg)
        }
        _ => match err {
            DbErr::RecordNotFound(msg) => RepositoryError::NotFound(msg),
            other => RepositoryError::database(other.to_string()),
        },
    }
}

fn status_from(estado: &str) -> MovementStatus {
    if estado != MovementStatus::Recorded.as_str() {
        tracing::warn!(estado, "Unknown movement status, reading as recorded");
    }
    MovementStatus::Recorded
}

fn header_from(model: movimientos::Model) -> MovementHeader {
    MovementHeader {
        id: MovementId::from_uuid(model.id),
        occurred_at: model.fecha_hora,
        client: CatalogRef::new(ClientId::from_uuid(model.cliente_id), model.cliente_nombre),
        company: CatalogRef::new(CompanyId::from_uuid(model.empresa_id), model.empresa_nombre),
        bank: CatalogRef::new(BankId::from_uuid(model.banco_id), model.banco_nombre),
        total_debit: model.total_debito,
        total_credit: model.total_credito,
        status: status_from(&model.estado),
        created_at: model.created_at.with_timezone(&Utc),
    }
}

fn summary_from(model: movimientos::Model) -> MovementSummary {
    MovementSummary {
        id: MovementId::from_uuid(model.id),
        date: model.fecha_hora.date(),
        client: model.cliente_nombre,
        company: model.empresa_nombre,
        bank: model.banco_nombre,
        total_debit: model.total_debito,
        total_credit: model.total_credito,
        status: status_from(&model.estado),
    }
}

fn line_from(model: movimiento_detalle::Model) -> MovementLineRecord {
    MovementLineRecord {
        id: LineId::from_uuid(model.id),
        position: model.posicion,
        account_id: model.cuenta_id.map(AccountId::from_uuid),
        account_label: model.cuenta,
        description: model.descripcion,
        debit: model.debito,
        credit: model.credito,
        notes: model.notas,
        attachment: model.archivo,
    }
}

/// Movement repository for database operations.
#[derive(Debug, Clone)]
pub struct MovementRepository {
    db: DatabaseConnection,
}

impl MovementRepository {
    /// Creates a new movement repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl MovementRepoTrait for MovementRepository {
    async fn save_movement(&self, movement: NewMovement) -> Result<MovementId, RepositoryError> {
        let id = MovementId::new();
        let line_count = movement.lines.len();

        let header = movimientos::ActiveModel {
            id: Set(id.into_inner()),
            fecha_hora: Set(movement.occurred_at),
            cliente_id: Set(movement.client.id.into_inner()),
            cliente_nombre: Set(movement.client.name),
            empresa_id: Set(movement.company.id.into_inner()),
            empresa_nombre: Set(movement.company.name),
            banco_id: Set(movement.bank.id.into_inner()),
            banco_nombre: Set(movement.bank.name),
            total_debito: Set(round_currency(movement.total_debit)),
            total_credito: Set(round_currency(movement.total_credit)),
            estado: Set(MovementStatus::Recorded.as_str().to_string()),
            created_at: Set(Utc::now().into()),
        };

        let mut details = Vec::with_capacity(line_count);
        for (index, line) in movement.lines.into_iter().enumerate() {
            let posicion = i32::try_from(index + 1)
                .map_err(|_| RepositoryError::database("too many lines in one movement"))?;
            details.push(movimiento_detalle::ActiveModel {
                id: Set(line.line_id.into_inner()),
                movimiento_id: Set(id.into_inner()),
                posicion: Set(posicion),
                cuenta_id: Set(line.account_id.map(AccountId::into_inner)),
                cuenta: Set(line.account_label),
                descripcion: Set(line.description),
                debito: Set(round_currency(line.debit)),
                credito: Set(round_currency(line.credit)),
                notas: Set(line.notes),
                archivo: Set(line.attachment),
            });
        }

        let txn = self.db.begin().await.map_err(db_err)?;
        header.insert(&txn).await.map_err(db_err)?;
        if !details.is_empty() {
            movimiento_detalle::Entity::insert_many(details)
                .exec(&txn)
                .await
                .map_err(db_err)?;
        }
        txn.commit().await.map_err(db_err)?;

        tracing::info!(movement_id = %id, lines = line_count, "Movement stored");
        Ok(id)
    }

    async fn query_movements(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<MovementSummary>, RepositoryError> {
        let start = from.and_time(NaiveTime::MIN);
        let mut query = movimientos::Entity::find().filter(movimientos::Column::FechaHora.gte(start));
        // `to` is inclusive; the last day ends where the next one starts.
        if let Some(next) = to.succ_opt() {
            query = query.filter(movimientos::Column::FechaHora.lt(next.and_time(NaiveTime::MIN)));
        }

        let rows = query
            .order_by_desc(movimientos::Column::FechaHora)
            .order_by_desc(movimientos::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(rows.into_iter().map(summary_from).collect())
    }

    async fn find_movement(&self, id: MovementId) -> Result<Option<MovementHeader>, RepositoryError> {
        let row = movimientos::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(row.map(header_from))
    }

    async fn list_lines(&self, id: MovementId) -> Result<Vec<MovementLineRecord>, RepositoryError> {
        let rows = movimiento_detalle::Entity::find()
            .filter(movimiento_detalle::Column::MovimientoId.eq(id.into_inner()))
            .order_by_asc(movimiento_detalle::Column::Posicion)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(line_from).collect())
    }
}
