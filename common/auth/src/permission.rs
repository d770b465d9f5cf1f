use crate::{
    authenticator::user::UserInformation,
    authorizer::{Authorizer, Requirement, RequirementError},
};
use strum::ParseError;

macro_rules! resource {
    (
        $(#[$enum_meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant,
            )*
        }

        $(
            pub struct $variant;

            impl Requirement for $variant {
                fn enforce(authorizer: &Authorizer, user: &UserInformation) -> Result<(), RequirementError> {
                    Ok(authorizer.require(user, Resource::$variant)?)
                }
            }
        )*
    };
}

resource! {
    /// An area of the application, access to which is granted per role.
    #[derive(
        Copy,
        Clone,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Debug,
        serde::Deserialize,
        serde::Serialize,
        Hash,
        strum::AsRefStr,
        strum::Display,
        strum::EnumString,
        strum::IntoStaticStr,
        strum::VariantArray,
    )]
    #[serde(into = "String")]
    #[serde(try_from = "String")]
    #[strum(serialize_all = "snake_case")]
    pub enum Resource {
        Dashboard,
        Inventori,
        AssetManagement,
        Maintenance,
        Administration,
        Setting,
    }
}

impl TryFrom<String> for Resource {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.as_str().try_into()
    }
}

impl From<Resource> for String {
    fn from(value: Resource) -> Self {
        value.to_string()
    }
}
