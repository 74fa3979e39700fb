//! `SeaORM` Entity for cuentas table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "cuentas")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub nombre: String,
    /// Free-text type tag; drives the posting nature.
    pub tipo: String,
    pub activo: bool,
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
