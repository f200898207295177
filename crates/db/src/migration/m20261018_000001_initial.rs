//! Initial database migration.
//!
//! Creates the community directory, the ledger tables and the budget table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: COMMUNITY DIRECTORY
        // ============================================================
        db.execute_unprepared(COMMUNITIES_SQL).await?;
        db.execute_unprepared(RESIDENTS_SQL).await?;
        db.execute_unprepared(PROPERTIES_SQL).await?;
        db.execute_unprepared(PROPERTY_OWNERS_SQL).await?;

        // ============================================================
        // PART 3: LEDGER
        // ============================================================
        db.execute_unprepared(ACCOUNTS_SQL).await?;
        db.execute_unprepared(TRANSACTIONS_SQL).await?;

        // ============================================================
        // PART 4: BUDGETS
        // ============================================================
        db.execute_unprepared(BUDGETS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

const ENUMS_SQL: &str = r"
CREATE TYPE account_category AS ENUM ('CASH', 'BANK', 'OTHER');
CREATE TYPE transaction_kind AS ENUM ('INCOME', 'EXPENSE');
CREATE TYPE resident_role AS ENUM ('ADMIN', 'PRESIDENT', 'NEIGHBOR');
";

const COMMUNITIES_SQL: &str = r"
CREATE TABLE communities (
    id              UUID PRIMARY KEY,
    name            VARCHAR(255) NOT NULL,
    address         TEXT,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const RESIDENTS_SQL: &str = r"
CREATE TABLE residents (
    id              UUID PRIMARY KEY,
    community_id    UUID NOT NULL REFERENCES communities(id) ON DELETE CASCADE,
    name            VARCHAR(255) NOT NULL,
    email           VARCHAR(255) NOT NULL,
    role            resident_role NOT NULL DEFAULT 'NEIGHBOR',
    iban            VARCHAR(34),
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_residents_community ON residents(community_id, name);
";

const PROPERTIES_SQL: &str = r"
CREATE TABLE properties (
    id              UUID PRIMARY KEY,
    community_id    UUID NOT NULL REFERENCES communities(id) ON DELETE CASCADE,
    unit            VARCHAR(50) NOT NULL,
    floor           INTEGER NOT NULL DEFAULT 0,
    coefficient     NUMERIC(9, 4) NOT NULL DEFAULT 0,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_coefficient_non_negative CHECK (coefficient >= 0)
);

CREATE INDEX idx_properties_community ON properties(community_id, unit);
";

const PROPERTY_OWNERS_SQL: &str = r"
CREATE TABLE property_owners (
    property_id     UUID NOT NULL REFERENCES properties(id) ON DELETE CASCADE,
    resident_id     UUID NOT NULL REFERENCES residents(id) ON DELETE CASCADE,
    linked_at       TIMESTAMPTZ NOT NULL DEFAULT clock_timestamp(),

    PRIMARY KEY (property_id, resident_id)
);

CREATE INDEX idx_property_owners_resident ON property_owners(resident_id, linked_at);
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id              UUID PRIMARY KEY,
    community_id    UUID NOT NULL REFERENCES communities(id) ON DELETE CASCADE,
    name            VARCHAR(255) NOT NULL,
    category        account_category NOT NULL,
    balance         NUMERIC(19, 4) NOT NULL DEFAULT 0,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_accounts_community ON accounts(community_id);
";

const TRANSACTIONS_SQL: &str = r"
CREATE TABLE transactions (
    id              UUID PRIMARY KEY,
    account_id      UUID NOT NULL REFERENCES accounts(id) ON DELETE RESTRICT,
    kind            transaction_kind NOT NULL,
    amount          NUMERIC(19, 4) NOT NULL,
    category        VARCHAR(100) NOT NULL,
    description     TEXT NOT NULL DEFAULT '',
    date            TIMESTAMPTZ NOT NULL,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_amount_non_negative CHECK (amount >= 0)
);

CREATE INDEX idx_transactions_account_date ON transactions(account_id, date DESC);
CREATE INDEX idx_transactions_kind_date ON transactions(kind, date);
";

const BUDGETS_SQL: &str = r"
CREATE TABLE budgets (
    id              UUID PRIMARY KEY,
    community_id    UUID NOT NULL REFERENCES communities(id) ON DELETE CASCADE,
    year            INTEGER NOT NULL,
    total_amount    NUMERIC(19, 4) NOT NULL,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_budget_non_negative CHECK (total_amount >= 0),
    CONSTRAINT chk_budget_year CHECK (year BETWEEN 1900 AND 9999)
);

CREATE INDEX idx_budgets_community_year ON budgets(community_id, year DESC);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS budgets CASCADE;
DROP TABLE IF EXISTS transactions CASCADE;
DROP TABLE IF EXISTS accounts CASCADE;
DROP TABLE IF EXISTS property_owners CASCADE;
DROP TABLE IF EXISTS properties CASCADE;
DROP TABLE IF EXISTS residents CASCADE;
DROP TABLE IF EXISTS communities CASCADE;

DROP TYPE IF EXISTS resident_role CASCADE;
DROP TYPE IF EXISTS transaction_kind CASCADE;
DROP TYPE IF EXISTS account_category CASCADE;
";
