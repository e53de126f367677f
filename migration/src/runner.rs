use colored::*;
use sea_orm_migration::prelude::*;
use std::io::{self, Write};
use std::time::Instant;

const STATUS_COLUMN: usize = 80;

/// Applies every pending migration, printing one status line per migration.
///
/// Migrations already recorded in `seaql_migrations` are reported as skipped.
pub async fn run_all_migrations(url: &str) -> Result<(), DbErr> {
    let db = sea_orm::Database::connect(url).await?;

    println!("Running migrations...");
    let applied: Vec<String> = <migration::Migrator as MigratorTrait>::get_applied_migrations(&db)
        .await?
        .into_iter()
        .map(|m| m.name().to_string())
        .collect();

    for migration in <migration::Migrator as MigratorTrait>::migrations() {
        let name = migration.name().to_string();
        print_label(&name);

        if applied.contains(&name) {
            println!("{}", "skipped".dimmed());
            continue;
        }

        let start = Instant::now();
        match <migration::Migrator as MigratorTrait>::up(&db, Some(1)).await {
            Ok(()) => {
                let time_str = format!("({:.2?})", start.elapsed()).dimmed();
                println!("{} {}", "done".green(), time_str);
            }
            Err(err) => {
                println!("{}", "failed".red());
                return Err(err);
            }
        }
    }

    Ok(())
}

fn print_label(name: &str) {
    let label = format!("Applying {}", name.bold());
    let dots = ".".repeat(STATUS_COLUMN.saturating_sub(label.len()));
    print!("{label}{dots} ");
    let _ = io::stdout().flush();
}
