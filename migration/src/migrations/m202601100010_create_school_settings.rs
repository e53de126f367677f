use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202601100010_create_school_settings"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("school_settings"))
                    .if_not_exists()
                    .col(ColumnDef::new(Alias::new("id")).integer().not_null().primary_key())
                    .col(ColumnDef::new(Alias::new("school_name")).string().not_null())
                    .col(ColumnDef::new(Alias::new("current_academic_year_id")).integer().null())
                    .col(ColumnDef::new(Alias::new("current_term_id")).integer().null())
                    .col(ColumnDef::new(Alias::new("maintenance_mode")).boolean().not_null().default(false))
                    .col(ColumnDef::new(Alias::new("min_password_length")).integer().not_null().default(8))
                    .col(ColumnDef::new(Alias::new("updated_by")).integer().null())
                    .col(ColumnDef::new(Alias::new("updated_at")).timestamp().not_null().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("school_settings"), Alias::new("current_academic_year_id"))
                            .to(Alias::new("academic_years"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("school_settings"), Alias::new("current_term_id"))
                            .to(Alias::new("terms"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("school_settings"), Alias::new("updated_by"))
                            .to(Alias::new("users"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("school_settings")).to_owned())
            .await
    }
}
