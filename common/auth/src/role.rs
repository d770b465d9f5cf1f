use crate::Resource;
use std::collections::BTreeSet;
use strum::VariantArray;

/// The role of an administrator account.
#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Debug,
    Hash,
    serde::Deserialize,
    serde::Serialize,
    utoipa::ToSchema,
    strum::AsRefStr,
    strum::Display,
    strum::EnumString,
    strum::VariantArray,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    AssetManager,
    StafIt,
    Support,
}

/// The set of resources a role was granted.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct PermissionMap(BTreeSet<Resource>);

impl PermissionMap {
    pub fn new(granted: impl IntoIterator<Item = Resource>) -> Self {
        Self(granted.into_iter().collect())
    }

    pub fn contains(&self, resource: Resource) -> bool {
        self.0.contains(&resource)
    }

    pub fn iter(&self) -> impl Iterator<Item = Resource> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Resource> for PermissionMap {
    fn from_iter<T: IntoIterator<Item = Resource>>(iter: T) -> Self {
        Self::new(iter)
    }
}

impl Role {
    /// Check if the role may access the resource.
    ///
    /// The super admin always has access, other roles need a grant in `permissions`.
    pub fn can_access(&self, resource: Resource, permissions: &PermissionMap) -> bool {
        matches!(self, Self::SuperAdmin) || permissions.contains(resource)
    }

    /// The grants a role gets when the permission matrix is first seeded.
    pub fn default_permissions(&self) -> PermissionMap {
        match self {
            Self::SuperAdmin => Resource::VARIANTS.iter().copied().collect(),
            Self::AssetManager => PermissionMap::new([
                Resource::Dashboard,
                Resource::Inventori,
                Resource::AssetManagement,
                Resource::Maintenance,
            ]),
            Self::StafIt => PermissionMap::new([
                Resource::Dashboard,
                Resource::AssetManagement,
                Resource::Maintenance,
            ]),
            Self::Support => PermissionMap::new([Resource::Dashboard]),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Role::SuperAdmin, Resource::Setting, true)]
    #[case(Role::AssetManager, Resource::Maintenance, true)]
    #[case(Role::AssetManager, Resource::Setting, false)]
    #[case(Role::StafIt, Resource::Inventori, false)]
    #[case(Role::StafIt, Resource::Maintenance, true)]
    #[case(Role::Support, Resource::Maintenance, false)]
    #[case(Role::Support, Resource::Dashboard, true)]
    fn default_matrix(#[case] role: Role, #[case] resource: Resource, #[case] expected: bool) {
        assert_eq!(
            role.can_access(resource, &role.default_permissions()),
            expected
        );
    }

    #[test]
    fn super_admin_ignores_grants() {
        assert!(Role::SuperAdmin.can_access(Resource::Setting, &PermissionMap::default()));
        assert!(!Role::AssetManager.can_access(Resource::Dashboard, &PermissionMap::default()));
    }

    #[test]
    fn role_names() {
        assert_eq!(Role::StafIt.to_string(), "staf_it");
        assert_eq!("super_admin".parse::<Role>(), Ok(Role::SuperAdmin));
    }
}
