use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk(Users::Id))
                    .col(ColumnDef::new(Users::Username).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Role).string_len(16).not_null())
                    .col(created_at(Users::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Cars::Table)
                    .if_not_exists()
                    .col(pk(Cars::Id))
                    .col(ColumnDef::new(Cars::Vin).string().null().unique_key())
                    .col(ColumnDef::new(Cars::Make).string().not_null())
                    .col(ColumnDef::new(Cars::Model).string().null())
                    .col(ColumnDef::new(Cars::Year).integer().null())
                    .col(ColumnDef::new(Cars::OwnerId).integer().null())
                    .col(ColumnDef::new(Cars::OwnerName).string().not_null())
                    .col(ColumnDef::new(Cars::OwnerPhone).string().null())
                    .col(created_at(Cars::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cars_owner")
                            .from(Cars::Table, Cars::OwnerId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Parts::Table)
                    .if_not_exists()
                    .col(pk(Parts::Id))
                    .col(ColumnDef::new(Parts::PartNumber).string().not_null())
                    .col(ColumnDef::new(Parts::Name).string().not_null())
                    .col(ColumnDef::new(Parts::Description).text().null())
                    .col(
                        ColumnDef::new(Parts::Quantity)
                            .integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(Parts::Quantity).gte(0)),
                    )
                    .col(ColumnDef::new(Parts::UnitPrice).big_integer().not_null().default(0))
                    .col(created_at(Parts::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(WorkOrders::Table)
                    .if_not_exists()
                    .col(pk(WorkOrders::Id))
                    .col(ColumnDef::new(WorkOrders::CarId).integer().not_null())
                    .col(ColumnDef::new(WorkOrders::ClientId).integer().not_null())
                    .col(ColumnDef::new(WorkOrders::MechanicId).integer().null())
                    .col(
                        ColumnDef::new(WorkOrders::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(WorkOrders::Description).text().null())
                    .col(created_at(WorkOrders::CreatedAt))
                    .col(created_at(WorkOrders::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_work_orders_car")
                            .from(WorkOrders::Table, WorkOrders::CarId)
                            .to(Cars::Table, Cars::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_work_orders_client")
                            .from(WorkOrders::Table, WorkOrders::ClientId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_work_orders_mechanic")
                            .from(WorkOrders::Table, WorkOrders::MechanicId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(WorkOrderParts::Table)
                    .if_not_exists()
                    .col(pk(WorkOrderParts::Id))
                    .col(ColumnDef::new(WorkOrderParts::WorkOrderId).integer().not_null())
                    .col(ColumnDef::new(WorkOrderParts::PartId).integer().not_null())
                    .col(
                        ColumnDef::new(WorkOrderParts::QuantityUsed)
                            .integer()
                            .not_null()
                            .check(Expr::col(WorkOrderParts::QuantityUsed).gt(0)),
                    )
                    .col(created_at(WorkOrderParts::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_work_order_parts_order")
                            .from(WorkOrderParts::Table, WorkOrderParts::WorkOrderId)
                            .to(WorkOrders::Table, WorkOrders::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_work_order_parts_part")
                            .from(WorkOrderParts::Table, WorkOrderParts::PartId)
                            .to(Parts::Table, Parts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AuditLogs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AuditLogs::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(AuditLogs::UserId).integer().null())
                    .col(ColumnDef::new(AuditLogs::Action).string().not_null())
                    .col(ColumnDef::new(AuditLogs::Resource).string().null())
                    .col(ColumnDef::new(AuditLogs::Metadata).json_binary().null())
                    .col(created_at(AuditLogs::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_work_orders_client")
                    .table(WorkOrders::Table)
                    .col(WorkOrders::ClientId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_work_orders_mechanic")
                    .table(WorkOrders::Table)
                    .col(WorkOrders::MechanicId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AuditLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(WorkOrderParts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(WorkOrders::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Parts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Cars::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

fn pk<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

fn created_at<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    PasswordHash,
    Role,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Cars {
    Table,
    Id,
    Vin,
    Make,
    Model,
    Year,
    OwnerId,
    OwnerName,
    OwnerPhone,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Parts {
    Table,
    Id,
    PartNumber,
    Name,
    Description,
    Quantity,
    UnitPrice,
    CreatedAt,
}

#[derive(DeriveIden)]
enum WorkOrders {
    Table,
    Id,
    CarId,
    ClientId,
    MechanicId,
    Status,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum WorkOrderParts {
    Table,
    Id,
    WorkOrderId,
    PartId,
    QuantityUsed,
    CreatedAt,
}

#[derive(DeriveIden)]
enum AuditLogs {
    Table,
    Id,
    UserId,
    Action,
    Resource,
    Metadata,
    CreatedAt,
}
