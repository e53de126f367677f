use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202601100011_create_pupils"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("pupils"))
                    .if_not_exists()
                    .col(ColumnDef::new(Alias::new("id")).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Alias::new("admission_number")).string().not_null().unique_key())
                    .col(ColumnDef::new(Alias::new("first_name")).string().not_null())
                    .col(ColumnDef::new(Alias::new("last_name")).string().not_null())
                    .col(ColumnDef::new(Alias::new("date_of_birth")).date().not_null())
                    .col(ColumnDef::new(Alias::new("gender")).string().not_null())
                    .col(ColumnDef::new(Alias::new("address")).text().null())
                    .col(ColumnDef::new(Alias::new("nationality")).string().null())
                    .col(ColumnDef::new(Alias::new("phone_number")).string().null())
                    .col(ColumnDef::new(Alias::new("email")).string().null())
                    .col(ColumnDef::new(Alias::new("parent_name")).string().null())
                    .col(ColumnDef::new(Alias::new("parent_phone")).string().null())
                    .col(ColumnDef::new(Alias::new("parent_email")).string().null())
                    .col(ColumnDef::new(Alias::new("emergency_contact_name")).string().null())
                    .col(ColumnDef::new(Alias::new("emergency_contact_phone")).string().null())
                    .col(ColumnDef::new(Alias::new("current_class_id")).integer().null())
                    .col(ColumnDef::new(Alias::new("current_stream_id")).integer().null())
                    .col(ColumnDef::new(Alias::new("enrollment_date")).date().not_null())
                    .col(
                        ColumnDef::new(Alias::new("status"))
                            .enumeration(
                                Alias::new("pupil_status"),
                                vec![
                                    Alias::new("active"),
                                    Alias::new("inactive"),
                                    Alias::new("graduated"),
                                    Alias::new("transferred"),
                                ],
                            )
                            .not_null()
                            .default("active"),
                    )
                    .col(ColumnDef::new(Alias::new("created_at")).timestamp().not_null().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .col(ColumnDef::new(Alias::new("updated_at")).timestamp().not_null().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("pupils"), Alias::new("current_class_id"))
                            .to(Alias::new("school_classes"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("pupils"), Alias::new("current_stream_id"))
                            .to(Alias::new("streams"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .index(
                        Index::create()
                            .name("idx_pupils_class_stream")
                            .col(Alias::new("current_class_id"))
                            .col(Alias::new("current_stream_id")),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("pupils")).to_owned())
            .await
    }
}
