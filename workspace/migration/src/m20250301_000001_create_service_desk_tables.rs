use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string_len(Users::Username, 100).unique_key())
                    .col(string_len_null(Users::Email, 255).unique_key())
                    .col(string(Users::PasswordHash))
                    .col(string_len(Users::Role, 16))
                    .col(
                        date_time(Users::CreatedAt).default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Create service_requests table. created_by holds a username by value,
        // so there is no foreign key to users.
        manager
            .create_table(
                Table::create()
                    .table(ServiceRequests::Table)
                    .if_not_exists()
                    .col(pk_auto(ServiceRequests::Id))
                    .col(string_len(ServiceRequests::Category, 100))
                    .col(string_len(ServiceRequests::Description, 255))
                    .col(string_len(ServiceRequests::Status, 16).default("PENDING"))
                    .col(string_len(ServiceRequests::CreatedBy, 100))
                    .col(
                        date_time(ServiceRequests::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(date_time_null(ServiceRequests::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_service_requests_created_by")
                    .table(ServiceRequests::Table)
                    .col(ServiceRequests::CreatedBy)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_service_requests_created_by")
                    .table(ServiceRequests::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(ServiceRequests::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    Role,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ServiceRequests {
    Table,
    Id,
    Category,
    Description,
    Status,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}
