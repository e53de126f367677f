use sea_orm_migration::prelude::*;

use crate::migrations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(migrations::m202601100001_create_users::Migration),
            Box::new(migrations::m202601100002_create_school_classes::Migration),
            Box::new(migrations::m202601100003_create_streams::Migration),
            Box::new(migrations::m202601100004_create_class_streams::Migration),
            Box::new(migrations::m202601100005_create_subjects::Migration),
            Box::new(migrations::m202601100006_create_teacher_assignments::Migration),
            Box::new(migrations::m202601100007_create_academic_years::Migration),
            Box::new(migrations::m202601100008_create_terms::Migration),
            Box::new(migrations::m202601100009_create_exam_schedules::Migration),
            Box::new(migrations::m202601100010_create_school_settings::Migration),
            Box::new(migrations::m202601100011_create_pupils::Migration),
            Box::new(migrations::m202601100012_create_assessment_records::Migration),
            Box::new(migrations::m202601100013_create_assessment_results::Migration),
        ]
    }
}
