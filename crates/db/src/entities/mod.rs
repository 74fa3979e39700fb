//! `SeaORM` entity definitions, one module per table.

pub mod bancos;
pub mod clientes;
pub mod cuentas;
pub mod empresas;
pub mod movimiento_detalle;
pub mod movimientos;
pub mod roles;
pub mod usuarios;
