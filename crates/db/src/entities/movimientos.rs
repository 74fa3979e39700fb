//! `SeaORM` Entity for movimientos table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "movimientos")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub fecha_hora: DateTime,
    pub cliente_id: Uuid,
    pub cliente_nombre: String,
    pub empresa_id: Uuid,
    pub empresa_nombre: String,
    pub banco_id: Uuid,
    pub banco_nombre: String,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub total_debito: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub total_credito: Decimal,
    pub estado: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::movimiento_detalle::Entity")]
    MovimientoDetalle,
}

impl Related<super::movimiento_detalle::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovimientoDetalle.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
