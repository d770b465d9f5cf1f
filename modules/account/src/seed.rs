use crate::{Error, password, service::store_permissions};
use asetrack_auth::Role;
use asetrack_entity::admin;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait};
use strum::VariantArray;
use time::OffsetDateTime;
use tracing::instrument;
use uuid::Uuid;

/// The accounts of a fresh installation.
pub const DEFAULT_ADMINS: &[(&str, &str, Role)] = &[
    ("useradmin", "admin123", Role::SuperAdmin),
    ("useraset", "aset123", Role::AssetManager),
];

/// Seed the permission matrix and the default admins.
///
/// Existing grants and accounts are left as they are, so this can run on every deployment.
#[instrument(skip(db), err)]
pub async fn seed<C: TransactionTrait>(db: &C) -> Result<(), Error> {
    let tx = db.begin().await?;

    for role in Role::VARIANTS {
        store_permissions(*role, &role.default_permissions(), false, &tx).await?;
    }

    for (username, secret, role) in DEFAULT_ADMINS {
        let existing = admin::Entity::find()
            .filter(admin::Column::Username.eq(*username))
            .one(&tx)
            .await?;
        if existing.is_some() {
            log::info!("Admin '{username}' already exists, skipping");
            continue;
        }

        admin::ActiveModel {
            id: Set(Uuid::new_v4()),
            employee_id: Set(None),
            username: Set(username.to_string()),
            password: Set(password::hash(secret)?),
            role: Set(role.to_string()),
            created_at: Set(OffsetDateTime::now_utc()),
        }
        .insert(&tx)
        .await?;

        log::info!("Created admin: {username} (role: {role})");
    }

    tx.commit().await?;

    Ok(())
}
