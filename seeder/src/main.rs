use crate::seed::{Seeder, run_seeder};
use crate::seeds::{
    assignment::AssignmentSeeder, calendar::CalendarSeeder, pupil::PupilSeeder,
    school::SchoolSeeder, user::UserSeeder,
};
use migration::{Migrator, MigratorTrait};
use std::process;
use util::config;

mod seed;
mod seeds;

#[tokio::main]
async fn main() {
    let db = match db::connect().await {
        Ok(db) => db,
        Err(err) => {
            eprintln!("Failed to open database {}: {err}", config::database_path());
            process::exit(1);
        }
    };

    if let Err(err) = Migrator::up(&db, None).await {
        eprintln!("Failed to apply migrations: {err}");
        process::exit(1);
    }

    for (seeder, name) in [
        (Box::new(UserSeeder) as Box<dyn Seeder + Send + Sync>, "User"),
        (Box::new(SchoolSeeder), "School"),
        (Box::new(CalendarSeeder), "Calendar"),
        (Box::new(AssignmentSeeder), "TeacherAssignment"),
        (Box::new(PupilSeeder), "Pupil"),
    ] {
        if let Err(err) = run_seeder(&*seeder, name, &db).await {
            eprintln!("{name} seeder failed: {err}");
            process::exit(1);
        }
    }
}
