//! Demo community seeder for FincaHub development.
//!
//! Seeds one community with residents, properties, a bank account, a year of
//! movements and a budget, then runs settlement, arrears and a direct-debit
//! batch over it. Run the migrator first.
//!
//! Usage: cargo run --bin seeder

use std::sync::Arc;

use anyhow::Context;
use chrono::{Datelike, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fincahub_core::AccountingService;
use fincahub_core::directory::{NewProperty, NewResident, ResidentRole};
use fincahub_core::ledger::{NewTransaction, TransactionKind};
use fincahub_db::{DirectoryRepository, LedgerRepository, connect_with};
use fincahub_shared::AppConfig;
use fincahub_shared::types::{AccountId, CommunityId};

/// Unit, floor, coefficient, owner name, email, role, IBAN.
const HOUSEHOLDS: [(&str, i32, Decimal, &str, &str, ResidentRole, Option<&str>); 4] = [
    (
        "1A",
        1,
        dec!(30),
        "Elena Navarro",
        "elena.navarro@example.com",
        ResidentRole::President,
        Some("ES9121000418450200051332"),
    ),
    (
        "1B",
        1,
        dec!(25),
        "Jorge Castillo",
        "jorge.castillo@example.com",
        ResidentRole::Neighbor,
        Some("ES7921000813610123456789"),
    ),
    (
        "2A",
        2,
        dec!(25),
        "Rosa Delgado",
        "rosa.delgado@example.com",
        ResidentRole::Neighbor,
        None,
    ),
    (
        "2B",
        2,
        dec!(20),
        "Tomas Herrera",
        "tomas.herrera@example.com",
        ResidentRole::Neighbor,
        Some("ES6000491500051234567892"),
    ),
];

/// Month, kind, amount, category, description.
const MOVEMENTS: [(u32, TransactionKind, Decimal, &str, &str); 6] = [
    (1, TransactionKind::Income, dec!(2400), "Cuotas", "Cuotas primer trimestre"),
    (2, TransactionKind::Expense, dec!(850), "Mantenimiento", "Revision ascensor"),
    (3, TransactionKind::Expense, dec!(420.60), "Limpieza", "Limpieza portal y escaleras"),
    (4, TransactionKind::Income, dec!(2400), "Cuotas", "Cuotas segundo trimestre"),
    (5, TransactionKind::Expense, dec!(1290.35), "Seguro", "Poliza multirriesgo"),
    (6, TransactionKind::Expense, dec!(310), "Suministros", "Alumbrado zonas comunes"),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fincahub=debug,sea_orm=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    info!("Connecting to database...");
    let db = connect_with(&config.database)
        .await
        .context("Failed to connect to database")?;

    let directory = Arc::new(DirectoryRepository::new(db.clone()));
    let store = Arc::new(LedgerRepository::new(db));
    let service = AccountingService::from_config(store, Arc::clone(&directory), &config)?;

    let community_id = directory
        .create_community("Comunidad El Pinar", Some("Calle del Pinar 5, Madrid"))
        .await?;
    info!(%community_id, "Community created");

    seed_directory(&directory, community_id).await?;

    let account = service
        .create_account(community_id, "Cuenta Corriente", "BANK", dec!(12000))
        .await?;
    let year = Utc::now().year();
    seed_movements(&service, community_id, account.id, year).await?;
    service.create_budget(community_id, year, dec!(6000)).await?;

    // ========== Reports ==========

    let balance = service.balance(community_id).await?;
    info!(total = %balance.total_balance, accounts = balance.account_count, "Balance");

    let status = service.budget_status(community_id, year).await?;
    info!(
        budgeted = %status.variance.budgeted,
        actual = %status.variance.actual,
        utilization = %status.variance.utilization_percent,
        "Budget status"
    );

    let report = service.settlement(community_id, year).await?;
    for line in &report.lines {
        info!(
            unit = %line.unit,
            owner = %line.owner_name,
            coefficient = %line.coefficient,
            quota = %line.quota,
            "Settlement line"
        );
    }

    for debt in service.arrears(community_id).await? {
        info!(
            name = %debt.name,
            unit = %debt.unit,
            months = debt.months_overdue,
            amount = %debt.debt_amount,
            "Outstanding debt"
        );
    }

    let document = service
        .direct_debit(community_id, "Derrama reparacion cubierta", dec!(150))
        .await?;
    std::fs::write(&document.filename, &document.bytes)
        .with_context(|| format!("Failed to write {}", document.filename))?;
    info!(filename = %document.filename, "Direct-debit document written");

    info!("Seeding complete");
    Ok(())
}

async fn seed_directory(
    directory: &DirectoryRepository,
    community_id: CommunityId,
) -> anyhow::Result<()> {
    for (unit, floor, coefficient, name, email, role, iban) in HOUSEHOLDS {
        let property = directory
            .create_property(NewProperty {
                community_id,
                unit: unit.to_string(),
                floor,
                coefficient,
            })
            .await?;
        let resident = directory
            .create_resident(NewResident {
                community_id,
                name: name.to_string(),
                email: email.to_string(),
                role,
                iban: iban.map(str::to_string),
            })
            .await?;
        directory.assign_owner(property.id, resident.id).await?;
        info!(unit, owner = name, "Household seeded");
    }

    directory
        .create_resident(NewResident {
            community_id,
            name: "Gestoria Fincas Centro".to_string(),
            email: "admin@fincascentro.example.com".to_string(),
            role: ResidentRole::Admin,
            iban: None,
        })
        .await?;
    Ok(())
}

async fn seed_movements(
    service: &AccountingService<LedgerRepository, DirectoryRepository>,
    community_id: CommunityId,
    account_id: AccountId,
    year: i32,
) -> anyhow::Result<()> {
    for (month, kind, amount, category, description) in MOVEMENTS {
        let date = Utc
            .with_ymd_and_hms(year, month, 10, 9, 0, 0)
            .single()
            .context("Invalid movement date")?;
        service
            .post(
                community_id,
                NewTransaction::new(account_id, kind, amount, category, description).on(date),
            )
            .await?;
    }
    Ok(())
}
