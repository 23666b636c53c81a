use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_category_table::Migration),
            Box::new(m20240301_000002_create_blog_post_table::Migration),
            Box::new(m20240301_000003_create_banner_table::Migration),
            Box::new(m20240415_000004_add_blog_post_folded_columns::Migration),
        ]
    }
}

// Migration implementations

mod m20240301_000001_create_category_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000001_create_category_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Category::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Category::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Category::CategoryName).string().not_null())
                        .col(ColumnDef::new(Category::CategorySlug).string().null())
                        .col(ColumnDef::new(Category::CategoryStatus).string_len(32).null())
                        .col(ColumnDef::new(Category::CreatedBy).string().null())
                        .col(
                            ColumnDef::new(Category::CreatedTime)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(ColumnDef::new(Category::ParentCategoryId).big_integer().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_category_parent_category")
                                .from(Category::Table, Category::ParentCategoryId)
                                .to(Category::Table, Category::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_category_parent_category_id")
                        .table(Category::Table)
                        .col(Category::ParentCategoryId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Category::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Category {
        Table,
        Id,
        CategoryName,
        CategorySlug,
        CategoryStatus,
        CreatedBy,
        CreatedTime,
        ParentCategoryId,
    }
}

mod m20240301_000002_create_blog_post_table {

    use super::m20240301_000001_create_category_table::Category;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000002_create_blog_post_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(BlogPost::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(BlogPost::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(BlogPost::BlogPostTitleVi).string().not_null())
                        .col(ColumnDef::new(BlogPost::BlogPostDescriptionVi).text().null())
                        .col(ColumnDef::new(BlogPost::BlogPostContentVi).text().null())
                        .col(ColumnDef::new(BlogPost::BlogPostTitleEn).string().null())
                        .col(ColumnDef::new(BlogPost::BlogPostDescriptionEn).text().null())
                        .col(ColumnDef::new(BlogPost::BlogPostContentEn).text().null())
                        .col(ColumnDef::new(BlogPost::BlogPostStatus).string_len(32).null())
                        .col(ColumnDef::new(BlogPost::BlogPostAuthor).string().null())
                        .col(ColumnDef::new(BlogPost::BlogPostSlug).string().null())
                        .col(
                            ColumnDef::new(BlogPost::TimeToPublish)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(ColumnDef::new(BlogPost::ThumbnailLink).string().null())
                        .col(
                            ColumnDef::new(BlogPost::CreatedTime)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(BlogPost::ModifiedTime)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(ColumnDef::new(BlogPost::ModifiedBy).string().null())
                        .col(ColumnDef::new(BlogPost::CreatedBy).string().null())
                        .col(ColumnDef::new(BlogPost::NumberOfViews).integer().null())
                        .col(ColumnDef::new(BlogPost::CategoryId).big_integer().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_blog_post_category")
                                .from(BlogPost::Table, BlogPost::CategoryId)
                                .to(Category::Table, Category::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_blog_post_category_id")
                        .table(BlogPost::Table)
                        .col(BlogPost::CategoryId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_blog_post_status_publish")
                        .table(BlogPost::Table)
                        .col(BlogPost::BlogPostStatus)
                        .col(BlogPost::TimeToPublish)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(BlogPost::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum BlogPost {
        Table,
        Id,
        BlogPostTitleVi,
        BlogPostDescriptionVi,
        BlogPostContentVi,
        BlogPostTitleEn,
        BlogPostDescriptionEn,
        BlogPostContentEn,
        BlogPostStatus,
        BlogPostAuthor,
        BlogPostSlug,
        TimeToPublish,
        ThumbnailLink,
        CreatedTime,
        ModifiedTime,
        ModifiedBy,
        CreatedBy,
        NumberOfViews,
        CategoryId,
    }
}

mod m20240301_000003_create_banner_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000003_create_banner_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Banner::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Banner::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Banner::BannerLink).string().not_null())
                        .col(ColumnDef::new(Banner::BannerStatus).string_len(32).null())
                        .col(ColumnDef::new(Banner::CreatedBy).string().null())
                        .col(
                            ColumnDef::new(Banner::CreatedTime)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(Banner::ModifiedTime)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(ColumnDef::new(Banner::ModifiedBy).string().null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Banner::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Banner {
        Table,
        Id,
        BannerLink,
        BannerStatus,
        CreatedBy,
        CreatedTime,
        ModifiedTime,
        ModifiedBy,
    }
}

mod m20240415_000004_add_blog_post_folded_columns {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240415_000004_add_blog_post_folded_columns"
        }
    }

    // SQLite accepts a single column per ALTER TABLE statement.
    fn folded_columns() -> Vec<ColumnDef> {
        vec![
            ColumnDef::new(BlogPost::TitleViFolded).string().null().to_owned(),
            ColumnDef::new(BlogPost::TitleEnFolded).string().null().to_owned(),
            ColumnDef::new(BlogPost::ContentViFolded).text().null().to_owned(),
            ColumnDef::new(BlogPost::ContentEnFolded).text().null().to_owned(),
        ]
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            for mut column in folded_columns() {
                manager
                    .alter_table(
                        Table::alter()
                            .table(BlogPost::Table)
                            .add_column(&mut column)
                            .to_owned(),
                    )
                    .await?;
            }
            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            for column in [
                BlogPost::TitleViFolded,
                BlogPost::TitleEnFolded,
                BlogPost::ContentViFolded,
                BlogPost::ContentEnFolded,
            ] {
                manager
                    .alter_table(
                        Table::alter()
                            .table(BlogPost::Table)
                            .drop_column(column)
                            .to_owned(),
                    )
                    .await?;
            }
            Ok(())
        }
    }

    #[derive(DeriveIden)]
    enum BlogPost {
        Table,
        TitleViFolded,
        TitleEnFolded,
        ContentViFolded,
        ContentEnFolded,
    }
}
