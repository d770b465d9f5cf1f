pub use sea_orm_migration::prelude::*;

mod m0000010_create_employee;
mod m0000020_create_asset;
mod m0000030_create_account;
mod m0000040_create_maintenance;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m0000010_create_employee::Migration),
            Box::new(m0000020_create_asset::Migration),
            Box::new(m0000030_create_account::Migration),
            Box::new(m0000040_create_maintenance::Migration),
        ]
    }
}

pub struct Now;

impl Iden for Now {
    fn unquoted(&self, s: &mut dyn Write) {
        let _ = write!(s, "now");
    }
}

pub struct UuidV4;

impl Iden for UuidV4 {
    fn unquoted(&self, s: &mut dyn Write) {
        let _ = write!(s, "gen_random_uuid");
    }
}
