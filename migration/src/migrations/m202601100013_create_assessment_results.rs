use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202601100013_create_assessment_results"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("assessment_results"))
                    .if_not_exists()
                    .col(ColumnDef::new(Alias::new("id")).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Alias::new("assessment_record_id")).integer().not_null())
                    .col(ColumnDef::new(Alias::new("pupil_id")).integer().not_null())
                    .col(ColumnDef::new(Alias::new("marks_obtained")).double().not_null())
                    .col(ColumnDef::new(Alias::new("grade")).string().not_null())
                    .col(ColumnDef::new(Alias::new("points")).integer().not_null())
                    .col(ColumnDef::new(Alias::new("remarks")).text().null())
                    .col(ColumnDef::new(Alias::new("stream_rank")).integer().null())
                    .col(ColumnDef::new(Alias::new("class_rank")).integer().null())
                    .col(ColumnDef::new(Alias::new("submitted_at")).timestamp().not_null().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("assessment_results"), Alias::new("assessment_record_id"))
                            .to(Alias::new("assessment_records"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("assessment_results"), Alias::new("pupil_id"))
                            .to(Alias::new("pupils"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .index(
                        Index::create()
                            .col(Alias::new("assessment_record_id"))
                            .col(Alias::new("pupil_id"))
                            .unique(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("assessment_results")).to_owned())
            .await
    }
}
