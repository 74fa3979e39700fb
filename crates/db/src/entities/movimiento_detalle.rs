//! `SeaORM` Entity for movimiento_detalle table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "movimiento_detalle")]
pub struct Model {
    /// Same value as the entry line id.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub movimiento_id: Uuid,
    pub posicion: i32,
    pub cuenta_id: Option<Uuid>,
    pub cuenta: String,
    pub descripcion: String,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub debito: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub credito: Decimal,
    pub notas: String,
    /// Attachment storage key.
    pub archivo: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::movimientos::Entity",
        from = "Column::MovimientoId",
        to = "super::movimientos::Column::Id",
        on_delete = "Cascade"
    )]
    Movimientos,
    #[sea_orm(
        belongs_to = "super::cuentas::Entity",
        from = "Column::CuentaId",
        to = "super::cuentas::Column::Id"
    )]
    Cuentas,
}

impl Related<super::movimientos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Movimientos.def()
    }
}

impl Related<super::cuentas::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cuentas.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
