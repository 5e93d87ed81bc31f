use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_job_cards_table::Migration),
            Box::new(m20250301_000002_create_job_card_templates_table::Migration),
            Box::new(m20250301_000003_create_documents_table::Migration),
        ]
    }
}

mod m20250301_000001_create_job_cards_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000001_create_job_cards_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(JobCards::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(JobCards::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(JobCards::JobCardNo)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(JobCards::Status).string().not_null())
                        .col(ColumnDef::new(JobCards::VehicleName).string().not_null())
                        .col(
                            ColumnDef::new(JobCards::VehicleIdentifier)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(JobCards::DriverName).string().null())
                        .col(ColumnDef::new(JobCards::MechanicName).string().null())
                        .col(ColumnDef::new(JobCards::Odometer).integer().null())
                        .col(ColumnDef::new(JobCards::ReportedIssues).text().null())
                        .col(ColumnDef::new(JobCards::RequestedWork).text().null())
                        .col(ColumnDef::new(JobCards::Tasks).json().not_null())
                        .col(ColumnDef::new(JobCards::Parts).json().not_null())
                        .col(
                            ColumnDef::new(JobCards::TotalCost)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(JobCards::PrintCount)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(JobCards::PrintedAt).timestamp_with_time_zone().null())
                        .col(ColumnDef::new(JobCards::PrintedBy).string().null())
                        .col(
                            ColumnDef::new(JobCards::QrToken)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(JobCards::CreatedAt).timestamp_with_time_zone().not_null())
                        .col(ColumnDef::new(JobCards::UpdatedAt).timestamp_with_time_zone().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_job_cards_status")
                        .table(JobCards::Table)
                        .col(JobCards::Status)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_job_cards_qr_token")
                        .table(JobCards::Table)
                        .col(JobCards::QrToken)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(JobCards::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum JobCards {
        Table,
        Id,
        JobCardNo,
        Status,
        VehicleName,
        VehicleIdentifier,
        DriverName,
        MechanicName,
        Odometer,
        ReportedIssues,
        RequestedWork,
        Tasks,
        Parts,
        TotalCost,
        PrintCount,
        PrintedAt,
        PrintedBy,
        QrToken,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250301_000002_create_job_card_templates_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000002_create_job_card_templates_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(JobCardTemplates::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(JobCardTemplates::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(JobCardTemplates::Name).string().not_null())
                        .col(ColumnDef::new(JobCardTemplates::Html).text().not_null())
                        .col(
                            ColumnDef::new(JobCardTemplates::IsDefault)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(JobCardTemplates::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(JobCardTemplates::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(JobCardTemplates::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_job_card_templates_default")
                        .table(JobCardTemplates::Table)
                        .col(JobCardTemplates::IsDefault)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(JobCardTemplates::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum JobCardTemplates {
        Table,
        Id,
        Name,
        Html,
        IsDefault,
        IsActive,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250301_000003_create_documents_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000003_create_documents_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Documents::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Documents::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Documents::Title).string().not_null())
                        .col(ColumnDef::new(Documents::DocType).string().not_null())
                        .col(ColumnDef::new(Documents::EditorState).json().null())
                        .col(ColumnDef::new(Documents::FileUrl).string().null())
                        .col(
                            ColumnDef::new(Documents::Version)
                                .integer()
                                .not_null()
                                .default(1),
                        )
                        .col(ColumnDef::new(Documents::CreatedAt).timestamp_with_time_zone().not_null())
                        .col(ColumnDef::new(Documents::UpdatedAt).timestamp_with_time_zone().not_null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Documents::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum Documents {
        Table,
        Id,
        Title,
        DocType,
        EditorState,
        FileUrl,
        Version,
        CreatedAt,
        UpdatedAt,
    }
}
