use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_clients_table::Migration),
            Box::new(m20240101_000002_create_delivery_addresses_table::Migration),
            Box::new(m20240101_000003_create_orders_table::Migration),
            Box::new(m20240101_000004_create_order_items_table::Migration),
        ]
    }
}

mod m20240101_000001_create_clients_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_clients_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Clients::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Clients::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Clients::ClientNumber)
                                .integer()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Clients::Name).string().not_null())
                        .col(ColumnDef::new(Clients::ShortName).string().null())
                        .col(ColumnDef::new(Clients::ContactPerson).string().null())
                        .col(ColumnDef::new(Clients::Phone).string().null())
                        .col(ColumnDef::new(Clients::Email).string().null())
                        .col(ColumnDef::new(Clients::Street).string().null())
                        .col(ColumnDef::new(Clients::PostalCode).string().null())
                        .col(ColumnDef::new(Clients::City).string().null())
                        .col(ColumnDef::new(Clients::TaxId).string().null())
                        .col(ColumnDef::new(Clients::CreatedAt).timestamp_with_time_zone().not_null())
                        .col(ColumnDef::new(Clients::UpdatedAt).timestamp_with_time_zone().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_clients_tax_id")
                        .table(Clients::Table)
                        .col(Clients::TaxId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Clients::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Clients {
        Table,
        Id,
        ClientNumber,
        Name,
        ShortName,
        ContactPerson,
        Phone,
        Email,
        Street,
        PostalCode,
        City,
        TaxId,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000002_create_delivery_addresses_table {
    use sea_orm_migration::prelude::*;

    use super::m20240101_000001_create_clients_table::Clients;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_delivery_addresses_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(DeliveryAddresses::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(DeliveryAddresses::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(DeliveryAddresses::ClientId).uuid().not_null())
                        .col(ColumnDef::new(DeliveryAddresses::Label).string().not_null())
                        .col(ColumnDef::new(DeliveryAddresses::Company).string().null())
                        .col(ColumnDef::new(DeliveryAddresses::Street).string().null())
                        .col(ColumnDef::new(DeliveryAddresses::PostalCode).string().null())
                        .col(ColumnDef::new(DeliveryAddresses::City).string().null())
                        .col(
                            ColumnDef::new(DeliveryAddresses::ContactPerson)
                                .string()
                                .null(),
                        )
                        .col(ColumnDef::new(DeliveryAddresses::Phone).string().null())
                        .col(
                            ColumnDef::new(DeliveryAddresses::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(DeliveryAddresses::UpdatedAt).timestamp_with_time_zone().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_delivery_addresses_client_id")
                                .from(DeliveryAddresses::Table, DeliveryAddresses::ClientId)
                                .to(Clients::Table, Clients::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_delivery_addresses_client_id")
                        .table(DeliveryAddresses::Table)
                        .col(DeliveryAddresses::ClientId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(DeliveryAddresses::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum DeliveryAddresses {
        Table,
        Id,
        ClientId,
        Label,
        Company,
        Street,
        PostalCode,
        City,
        ContactPerson,
        Phone,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000003_create_orders_table {
    use sea_orm_migration::prelude::*;

    use super::m20240101_000001_create_clients_table::Clients;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_orders_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Orders::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Orders::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Orders::OrderNumber)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Orders::ClientId).uuid().not_null())
                        // Integer stage values: 0 received, 1 in production,
                        // 2 ready, 3 fulfilled
                        .col(
                            ColumnDef::new(Orders::Status)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Orders::OrderDate).date().not_null())
                        .col(ColumnDef::new(Orders::DeliveryDate).date().not_null())
                        .col(ColumnDef::new(Orders::Notes).string().null())
                        .col(ColumnDef::new(Orders::PaymentTerm).string().null())
                        .col(ColumnDef::new(Orders::DeliveryCompany).string().null())
                        .col(ColumnDef::new(Orders::DeliveryStreet).string().null())
                        .col(ColumnDef::new(Orders::DeliveryPostalCode).string().null())
                        .col(ColumnDef::new(Orders::DeliveryCity).string().null())
                        .col(ColumnDef::new(Orders::DeliveryContactPerson).string().null())
                        .col(ColumnDef::new(Orders::DeliveryPhone).string().null())
                        .col(ColumnDef::new(Orders::CreatedBy).string().null())
                        .col(ColumnDef::new(Orders::CreatedAt).timestamp_with_time_zone().not_null())
                        .col(ColumnDef::new(Orders::UpdatedAt).timestamp_with_time_zone().null())
                        .col(
                            ColumnDef::new(Orders::Version)
                                .integer()
                                .not_null()
                                .default(1),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_orders_client_id")
                                .from(Orders::Table, Orders::ClientId)
                                .to(Clients::Table, Clients::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_orders_client_id")
                        .table(Orders::Table)
                        .col(Orders::ClientId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_orders_status")
                        .table(Orders::Table)
                        .col(Orders::Status)
                        .to_owned(),
                )
                .await?;

            // The dashboard reads by delivery date on every refresh
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_orders_delivery_date")
                        .table(Orders::Table)
                        .col(Orders::DeliveryDate)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Orders::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Orders {
        Table,
        Id,
        OrderNumber,
        ClientId,
        Status,
        OrderDate,
        DeliveryDate,
        Notes,
        PaymentTerm,
        DeliveryCompany,
        DeliveryStreet,
        DeliveryPostalCode,
        DeliveryCity,
        DeliveryContactPerson,
        DeliveryPhone,
        CreatedBy,
        CreatedAt,
        UpdatedAt,
        Version,
    }
}

mod m20240101_000004_create_order_items_table {
    use sea_orm_migration::prelude::*;

    use super::m20240101_000003_create_orders_table::Orders;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_order_items_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(OrderItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(OrderItems::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(OrderItems::OrderId).uuid().not_null())
                        .col(ColumnDef::new(OrderItems::Material).string().not_null())
                        .col(ColumnDef::new(OrderItems::Width).decimal().not_null())
                        .col(ColumnDef::new(OrderItems::Height).decimal().not_null())
                        .col(ColumnDef::new(OrderItems::RollLength).decimal().null())
                        .col(ColumnDef::new(OrderItems::CoreSize).string().null())
                        .col(ColumnDef::new(OrderItems::Quantity).decimal().not_null())
                        .col(ColumnDef::new(OrderItems::QuantityUnit).string().not_null())
                        .col(ColumnDef::new(OrderItems::UnitPrice).decimal().not_null())
                        .col(ColumnDef::new(OrderItems::PriceType).string().not_null())
                        .col(ColumnDef::new(OrderItems::CreatedAt).timestamp_with_time_zone().not_null())
                        .col(ColumnDef::new(OrderItems::UpdatedAt).timestamp_with_time_zone().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_order_items_order_id")
                                .from(OrderItems::Table, OrderItems::OrderId)
                                .to(Orders::Table, Orders::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_order_items_order_id")
                        .table(OrderItems::Table)
                        .col(OrderItems::OrderId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(OrderItems::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum OrderItems {
        Table,
        Id,
        OrderId,
        Material,
        Width,
        Height,
        RollLength,
        CoreSize,
        Quantity,
        QuantityUnit,
        UnitPrice,
        PriceType,
        CreatedAt,
        UpdatedAt,
    }
}
