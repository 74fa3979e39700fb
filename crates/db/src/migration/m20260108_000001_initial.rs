//! Initial database migration.
//!
//! Creates the role and user tables, the client/company/bank/account catalogs,
//! and the movement header and detail tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // Access control
        db.execute_unprepared(ROLES_SQL).await?;
        db.execute_unprepared(USUARIOS_SQL).await?;

        // Catalogs
        db.execute_unprepared(CATALOGS_SQL).await?;
        db.execute_unprepared(CUENTAS_SQL).await?;

        // Movements
        db.execute_unprepared(MOVIMIENTOS_SQL).await?;
        db.execute_unprepared(MOVIMIENTO_DETALLE_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

const ROLES_SQL: &str = r"
CREATE TABLE roles (
    id UUID PRIMARY KEY,
    nombre VARCHAR(50) NOT NULL UNIQUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const USUARIOS_SQL: &str = r"
CREATE TABLE usuarios (
    id UUID PRIMARY KEY,
    username VARCHAR(100) NOT NULL UNIQUE,
    nombre VARCHAR(255),
    password_hash VARCHAR(255) NOT NULL,
    rol_id UUID NOT NULL REFERENCES roles(id),
    activo BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_usuarios_rol ON usuarios(rol_id);
";

const CATALOGS_SQL: &str = r"
CREATE TABLE clientes (
    id UUID PRIMARY KEY,
    nombre VARCHAR(255) NOT NULL,
    activo BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE empresas (
    id UUID PRIMARY KEY,
    nombre VARCHAR(255) NOT NULL,
    activo BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE bancos (
    id UUID PRIMARY KEY,
    nombre VARCHAR(255) NOT NULL,
    activo BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const CUENTAS_SQL: &str = r"
CREATE TABLE cuentas (
    id UUID PRIMARY KEY,
    nombre VARCHAR(255) NOT NULL,
    tipo VARCHAR(50) NOT NULL DEFAULT '',
    activo BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_cuentas_nombre ON cuentas(nombre);
";

const MOVIMIENTOS_SQL: &str = r"
CREATE TABLE movimientos (
    id UUID PRIMARY KEY,
    fecha_hora TIMESTAMP NOT NULL,
    cliente_id UUID NOT NULL REFERENCES clientes(id),
    cliente_nombre VARCHAR(255) NOT NULL,
    empresa_id UUID NOT NULL REFERENCES empresas(id),
    empresa_nombre VARCHAR(255) NOT NULL,
    banco_id UUID NOT NULL REFERENCES bancos(id),
    banco_nombre VARCHAR(255) NOT NULL,
    total_debito DECIMAL(18, 2) NOT NULL DEFAULT 0,
    total_credito DECIMAL(18, 2) NOT NULL DEFAULT 0,
    estado VARCHAR(20) NOT NULL DEFAULT 'OK',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_totales_no_negativos CHECK (total_debito >= 0 AND total_credito >= 0)
);

CREATE INDEX idx_movimientos_fecha ON movimientos(fecha_hora DESC);
";

const MOVIMIENTO_DETALLE_SQL: &str = r"
CREATE TABLE movimiento_detalle (
    id UUID PRIMARY KEY,
    movimiento_id UUID NOT NULL REFERENCES movimientos(id) ON DELETE CASCADE,
    posicion INTEGER NOT NULL,
    cuenta_id UUID REFERENCES cuentas(id),
    cuenta VARCHAR(255) NOT NULL,
    descripcion TEXT NOT NULL DEFAULT '',
    debito DECIMAL(18, 2) NOT NULL DEFAULT 0,
    credito DECIMAL(18, 2) NOT NULL DEFAULT 0,
    notas TEXT NOT NULL DEFAULT '',
    archivo VARCHAR(500),

    CONSTRAINT uq_detalle_posicion UNIQUE (movimiento_id, posicion),
    CONSTRAINT chk_detalle_no_negativo CHECK (debito >= 0 AND credito >= 0)
);

CREATE INDEX idx_detalle_movimiento ON movimiento_detalle(movimiento_id);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS movimiento_detalle CASCADE;
DROP TABLE IF EXISTS movimientos CASCADE;
DROP TABLE IF EXISTS cuentas CASCADE;
DROP TABLE IF EXISTS bancos CASCADE;
DROP TABLE IF EXISTS empresas CASCADE;
DROP TABLE IF EXISTS clientes CASCADE;
DROP TABLE IF EXISTS usuarios CASCADE;
DROP TABLE IF EXISTS roles CASCADE;
";
