use std::{
    collections::{BTreeSet, HashMap},
    sync::LazyLock,
};

/// Capability tokens the UI uses to gate screens and actions
///
/// The declaration order is the order permissions are listed in
#[derive(
    Debug,
    serde::Serialize,
    serde::Deserialize,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Clone,
    Copy,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Permission {
    Admin,
    Users,
    All,
    Limited,
    Basic,
}

/// Permissions granted to any role not found in the table
const FALLBACK_PERMISSIONS: &[Permission] = &[Permission::Basic];

static ROLE_PERMISSIONS: LazyLock<HashMap<&'static str, Vec<Permission>>> = LazyLock::new(|| {
    use Permission as perm;
    let mut result = HashMap::new();
    result.insert("superadmin", vec![perm::Admin, perm::Users, perm::All]);
    result.insert("admin", vec![perm::Admin, perm::Users, perm::Limited]);
    result.insert("manager", vec![perm::Limited]);
    result
});

/// The fixed mapping from role name to permissions. Roles not in the table
/// get [`Permission::Basic`] only
pub fn role_permissions_table() -> &'static HashMap<&'static str, Vec<Permission>> {
    &ROLE_PERMISSIONS
}

/// Derives the permissions for a role, never returns an empty set
#[tracing::instrument(ret)]
pub fn permissions_for_role(role: &str) -> Permissions {
    ROLE_PERMISSIONS
        .get(role)
        .map(|x| &x[..])
        .unwrap_or(FALLBACK_PERMISSIONS)
        .to_vec()
        .into()
}

#[derive(
    serde::Serialize, serde::Deserialize, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord,
)]
pub struct Permissions(pub BTreeSet<Permission>);

impl Permissions {
    pub fn includes(&self, perms: &[Permission]) -> bool {
        perms.iter().all(|x| self.0.contains(x))
    }

    pub fn contains(&self, perm: Permission) -> bool {
        self.0.contains(&perm)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.0.iter()
    }

    /// The permission names in their canonical order
    pub fn names(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }
}

impl From<Vec<Permission>> for Permissions {
    fn from(value: Vec<Permission>) -> Self {
        Self(value.into_iter().collect())
    }
}
