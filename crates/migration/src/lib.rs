//! Migrator registering the schema history in the order it evolved.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20230301_000001_create_user;
mod m20230301_000002_create_profession;
mod m20230301_000003_create_user_detail;
mod m20230301_000004_create_guide;
mod m20230324_000005_add_avatar_to_user_detail;
mod m20230324_000006_add_cover_image_to_user_detail;
mod m20230404_000007_user_detail_user_id_nullable;
mod m20230404_000008_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20230301_000001_create_user::Migration),
            Box::new(m20230301_000002_create_profession::Migration),
            Box::new(m20230301_000003_create_user_detail::Migration),
            Box::new(m20230301_000004_create_guide::Migration),
            Box::new(m20230324_000005_add_avatar_to_user_detail::Migration),
            Box::new(m20230324_000006_add_cover_image_to_user_detail::Migration),
            Box::new(m20230404_000007_user_detail_user_id_nullable::Migration),
            // Indexes should always be applied last
            Box::new(m20230404_000008_add_indexes::Migration),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migration_names_are_unique_and_ordered() {
        let names: Vec<String> = Migrator::migrations().iter().map(|m| m.name().to_string()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        sorted.dedup();
        assert_eq!(sorted.len(), names.len());
    }
}
