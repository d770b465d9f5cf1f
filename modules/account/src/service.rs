use crate::{
    Error,
    model::{AdminAccount, AdminSummary, RolePermissions},
    password,
};
use asetrack_auth::{PermissionMap, Resource, Role, authenticator::user::UserDetails};
use asetrack_common::db::Database;
use asetrack_entity::{admin, employee, role_permission, session};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait, sea_query::OnConflict,
};
use std::time::Duration;
use strum::VariantArray;
use time::OffsetDateTime;
use tracing::instrument;
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct AccountService {
    db: Database,
}

impl AccountService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Check the credentials and open a session, returning its token.
    ///
    /// Returns `None` if the username is unknown or the password does not match.
    #[instrument(skip(self, password), err(level=tracing::Level::INFO))]
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        ttl: Duration,
    ) -> Result<Option<String>, Error> {
        let Some(admin) = admin::Entity::find()
            .filter(admin::Column::Username.eq(username))
            .one(&self.db)
            .await?
        else {
            log::info!("Login failed, unknown username: {username}");
            return Ok(None);
        };

        if !password::verify(password, &admin.password) {
            log::info!("Login failed, wrong password for: {username}");
            return Ok(None);
        }

        let token = password::new_token()?;
        let now = OffsetDateTime::now_utc();

        let pruned = session::Entity::delete_many()
            .filter(session::Column::ExpiresAt.lte(now))
            .exec(&self.db)
            .await?;
        if pruned.rows_affected > 0 {
            log::debug!("Pruned {} expired sessions", pruned.rows_affected);
        }

        session::ActiveModel {
            id: Set(password::session_id(&token)),
            admin_id: Set(admin.id),
            created_at: Set(now),
            expires_at: Set(now + ttl),
        }
        .insert(&self.db)
        .await?;

        log::info!("Opened session for: {username}");

        Ok(Some(token))
    }

    /// Close the session of the token, if there is one.
    #[instrument(skip_all, err(level=tracing::Level::INFO))]
    pub async fn logout(&self, token: &str) -> Result<(), Error> {
        session::Entity::delete_by_id(password::session_id(token))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    /// Resolve a session token into the details of the admin owning it.
    #[instrument(skip_all, err(level=tracing::Level::INFO))]
    pub async fn authenticate(&self, token: &str) -> Result<Option<UserDetails>, Error> {
        let result = session::Entity::find_by_id(password::session_id(token))
            .filter(session::Column::ExpiresAt.gt(OffsetDateTime::now_utc()))
            .find_also_related(admin::Entity)
            .one(&self.db)
            .await?;

        match result {
            Some((_, Some(admin))) => self.details(admin).await,
            _ => Ok(None),
        }
    }

    async fn details(&self, admin: admin::Model) -> Result<Option<UserDetails>, Error> {
        let Ok(role) = admin.role.parse::<Role>() else {
            log::warn!("Admin {} has unknown role: {}", admin.username, admin.role);
            return Ok(None);
        };

        let employee = match admin.employee_id {
            Some(id) => employee::Entity::find_by_id(id).one(&self.db).await?,
            None => None,
        };

        let (display_name, position) = match employee {
            Some(employee) => (
                employee.name,
                Some(employee.position).filter(|p| !p.is_empty()),
            ),
            None => (admin.username.clone(), None),
        };

        Ok(Some(UserDetails {
            id: admin.id,
            username: admin.username,
            display_name,
            position,
            role,
            permissions: granted(role, &self.db).await?,
        }))
    }

    /// Replace the password of an admin, after checking the current one.
    #[instrument(skip(self, current, new), err(level=tracing::Level::INFO))]
    pub async fn change_password(&self, id: Uuid, current: &str, new: &str) -> Result<(), Error> {
        let Some(admin) = admin::Entity::find_by_id(id).one(&self.db).await? else {
            return Err(Error::NotFound(format!("admin '{id}'")));
        };

        if !password::verify(current, &admin.password) {
            return Err(Error::BadRequest("the current password is wrong".into()));
        }
        if new.is_empty() {
            return Err(Error::BadRequest("the new password must not be empty".into()));
        }

        let mut model: admin::ActiveModel = admin.into();
        model.password = Set(password::hash(new)?);
        model.update(&self.db).await?;

        Ok(())
    }

    /// The permission matrix, one entry per role.
    #[instrument(skip(self), err(level=tracing::Level::INFO))]
    pub async fn permissions(&self) -> Result<Vec<RolePermissions>, Error> {
        let mut result = Vec::with_capacity(Role::VARIANTS.len());
        for role in Role::VARIANTS {
            result.push(RolePermissions {
                role: *role,
                granted: granted(*role, &self.db).await?.iter().collect(),
            });
        }
        Ok(result)
    }

    /// Set the grants of a role, revoking everything not in `granted`.
    #[instrument(skip(self), err(level=tracing::Level::INFO))]
    pub async fn set_permissions(&self, role: Role, granted: PermissionMap) -> Result<(), Error> {
        let tx = self.db.begin().await?;
        store_permissions(role, &granted, true, &tx).await?;
        tx.commit().await?;

        log::info!("Updated permissions of {role}: {granted:?}");

        Ok(())
    }

    /// All admin accounts, ordered by username.
    #[instrument(skip(self), err(level=tracing::Level::INFO))]
    pub async fn admins(&self) -> Result<Vec<AdminSummary>, Error> {
        Ok(admin::Entity::find()
            .find_also_related(employee::Entity)
            .order_by_asc(admin::Column::Username)
            .all(&self.db)
            .await?
            .into_iter()
            .map(AdminSummary::from)
            .collect())
    }

    #[instrument(skip(self), err(level=tracing::Level::INFO))]
    pub async fn admin(&self, id: Uuid) -> Result<Option<AdminSummary>, Error> {
        Ok(admin::Entity::find_by_id(id)
            .find_also_related(employee::Entity)
            .one(&self.db)
            .await?
            .map(AdminSummary::from))
    }

    /// Create an admin account. The username must not be taken yet.
    #[instrument(skip(self, account), fields(username = %account.username), err(level=tracing::Level::INFO))]
    pub async fn create_admin(&self, account: AdminAccount) -> Result<Uuid, Error> {
        let username = account.username.trim();
        if username.is_empty() {
            return Err(Error::BadRequest("the username must not be empty".into()));
        }
        let Some(secret) = account.password.as_deref().filter(|p| !p.is_empty()) else {
            return Err(Error::BadRequest("the password must not be empty".into()));
        };

        let tx = self.db.begin().await?;

        ensure_unique(username, None, &tx).await?;
        ensure_employee(account.employee_id, &tx).await?;

        let model = admin::ActiveModel {
            id: Set(Uuid::new_v4()),
            employee_id: Set(account.employee_id),
            username: Set(username.to_string()),
            password: Set(password::hash(secret)?),
            role: Set(account.role.to_string()),
            created_at: Set(OffsetDateTime::now_utc()),
        }
        .insert(&tx)
        .await?;

        tx.commit().await?;

        log::info!("Created admin: {} (role: {})", model.username, account.role);

        Ok(model.id)
    }

    /// Update an admin account. The password is only replaced when a new one is given.
    #[instrument(skip(self, account), fields(username = %account.username), err(level=tracing::Level::INFO))]
    pub async fn update_admin(&self, id: Uuid, account: AdminAccount) -> Result<(), Error> {
        let username = account.username.trim();
        if username.is_empty() {
            return Err(Error::BadRequest("the username must not be empty".into()));
        }

        let tx = self.db.begin().await?;

        let Some(existing) = admin::Entity::find_by_id(id).one(&tx).await? else {
            return Err(Error::NotFound(format!("admin '{id}'")));
        };

        ensure_unique(username, Some(id), &tx).await?;
        ensure_employee(account.employee_id, &tx).await?;

        let mut model: admin::ActiveModel = existing.into();
        model.username = Set(username.to_string());
        model.role = Set(account.role.to_string());
        model.employee_id = Set(account.employee_id);
        if let Some(secret) = account.password.as_deref().filter(|p| !p.is_empty()) {
            model.password = Set(password::hash(secret)?);
        }
        model.update(&tx).await?;

        tx.commit().await?;

        Ok(())
    }

    /// Delete an admin account, closing its sessions.
    ///
    /// Admins can't delete their own account.
    #[instrument(skip(self), err(level=tracing::Level::INFO))]
    pub async fn delete_admin(&self, id: Uuid, actor: Option<Uuid>) -> Result<(), Error> {
        if actor == Some(id) {
            return Err(Error::BadRequest("you can't delete your own account".into()));
        }

        let result = admin::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(Error::NotFound(format!("admin '{id}'")));
        }

        log::info!("Deleted admin {id}");

        Ok(())
    }
}

async fn ensure_unique<C: ConnectionTrait>(
    username: &str,
    except: Option<Uuid>,
    connection: &C,
) -> Result<(), Error> {
    let mut query = admin::Entity::find().filter(admin::Column::Username.eq(username));
    if let Some(id) = except {
        query = query.filter(admin::Column::Id.ne(id));
    }

    match query.one(connection).await? {
        Some(_) => Err(Error::Conflict(format!(
            "the username '{username}' is already taken"
        ))),
        None => Ok(()),
    }
}

async fn ensure_employee<C: ConnectionTrait>(
    id: Option<Uuid>,
    connection: &C,
) -> Result<(), Error> {
    let Some(id) = id else { return Ok(()) };

    match employee::Entity::find_by_id(id).one(connection).await? {
        Some(_) => Ok(()),
        None => Err(Error::BadRequest(format!("unknown employee '{id}'"))),
    }
}

/// Load the resources granted to a role.
async fn granted<C: ConnectionTrait>(role: Role, connection: &C) -> Result<PermissionMap, Error> {
    Ok(role_permission::Entity::find()
        .filter(role_permission::Column::Role.eq(role.as_ref()))
        .filter(role_permission::Column::CanAccess.eq(true))
        .all(connection)
        .await?
        .into_iter()
        .filter_map(|row| match row.resource.parse::<Resource>() {
            Ok(resource) => Some(resource),
            Err(_) => {
                log::debug!("Ignoring unknown resource: {}", row.resource);
                None
            }
        })
        .collect())
}

/// Write one row per resource for the role.
///
/// Existing rows are only overwritten when `overwrite` is set.
pub(crate) async fn store_permissions<C: ConnectionTrait>(
    role: Role,
    granted: &PermissionMap,
    overwrite: bool,
    connection: &C,
) -> Result<(), Error> {
    let rows = Resource::VARIANTS
        .iter()
        .map(|resource| role_permission::ActiveModel {
            role: Set(role.to_string()),
            resource: Set(resource.to_string()),
            can_access: Set(granted.contains(*resource)),
        });

    let mut on_conflict = OnConflict::columns([
        role_permission::Column::Role,
        role_permission::Column::Resource,
    ]);
    if overwrite {
        on_conflict.update_column(role_permission::Column::CanAccess);
    } else {
        on_conflict.do_nothing();
    }

    role_permission::Entity::insert_many(rows)
        .on_conflict(on_conflict)
        .exec_without_returning(connection)
        .await?;

    Ok(())
}
