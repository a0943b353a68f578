//! Resource families and typed facades
//!
//! The client core is generic over the [`Resource`] trait, so the set of
//! resource families is configuration rather than a structural fork. Adding
//! a family means implementing `Resource` and, if convenient, adding a thin
//! typed facade like the two below.

use registra_domain::{
    ConfigSetting, ConfigSettingUpdate, NewConfigSetting, NewStudent, Page, Student, StudentUpdate,
};
use serde::de::DeserializeOwned;

use super::client::ApiClient;
use crate::search::SearchParams;

/// A server-owned resource family mirrored by the client.
pub trait Resource: DeserializeOwned + Send + 'static {
    /// Resource type name; used for cache tags and staleness configuration.
    const TYPE: &'static str;
    /// API collection path.
    const PATH: &'static str;
}

impl Resource for Student {
    const TYPE: &'static str = "student";
    const PATH: &'static str = "/api/students";
}

impl Resource for ConfigSetting {
    const TYPE: &'static str = "setting";
    const PATH: &'static str = "/api/settings";
}

/// Item-level cache tag, e.g. `student:42`.
#[must_use]
pub fn item_tag(resource_type: &str, id: i64) -> String {
    format!("{resource_type}:{id}")
}

impl ApiClient {
    /// Typed access to student records.
    #[must_use]
    pub fn students(&self) -> StudentsApi<'_> {
        StudentsApi { client: self }
    }

    /// Typed access to configuration settings.
    #[must_use]
    pub fn settings(&self) -> SettingsApi<'_> {
        SettingsApi { client: self }
    }
}

/// Typed facade over the generic client for students.
pub struct StudentsApi<'a> {
    client: &'a ApiClient,
}

impl StudentsApi<'_> {
    /// Search students with canonicalized parameters.
    ///
    /// # Errors
    /// Any [`registra_domain::ClientError`].
    pub async fn search(&self, params: &SearchParams) -> registra_domain::Result<Page<Student>> {
        self.client.list(params).await
    }

    /// Fetch one student.
    ///
    /// # Errors
    /// Any [`registra_domain::ClientError`], including `NotFound`.
    pub async fn get(&self, id: i64) -> registra_domain::Result<Student> {
        self.client.get(id).await
    }

    /// Create a student.
    ///
    /// # Errors
    /// Any [`registra_domain::ClientError`], including `Validation`.
    pub async fn create(&self, new: &NewStudent) -> registra_domain::Result<Student> {
        self.client.create(new).await
    }

    /// Update a student with the last-known version.
    ///
    /// # Errors
    /// Any [`registra_domain::ClientError`], including `Conflict` on a stale
    /// version.
    pub async fn update(
        &self,
        id: i64,
        update: &StudentUpdate,
        version: i64,
    ) -> registra_domain::Result<Student> {
        self.client.update(id, update, version).await
    }

    /// Delete a student.
    ///
    /// # Errors
    /// Any [`registra_domain::ClientError`].
    pub async fn remove(&self, id: i64) -> registra_domain::Result<()> {
        self.client.remove::<Student>(id).await
    }
}

/// Typed facade over the generic client for configuration settings.
pub struct SettingsApi<'a> {
    client: &'a ApiClient,
}

impl SettingsApi<'_> {
    /// Search settings with canonicalized parameters.
    ///
    /// # Errors
    /// Any [`registra_domain::ClientError`].
    pub async fn search(&self, params: &SearchParams) -> registra_domain::Result<Page<ConfigSetting>> {
        self.client.list(params).await
    }

    /// Fetch one setting.
    ///
    /// # Errors
    /// Any [`registra_domain::ClientError`], including `NotFound`.
    pub async fn get(&self, id: i64) -> registra_domain::Result<ConfigSetting> {
        self.client.get(id).await
    }

    /// Create a setting.
    ///
    /// # Errors
    /// Any [`registra_domain::ClientError`], including `Validation`.
    pub async fn create(&self, new: &NewConfigSetting) -> registra_domain::Result<ConfigSetting> {
        self.client.create(new).await
    }

    /// Update a setting with the last-known version.
    ///
    /// # Errors
    /// Any [`registra_domain::ClientError`], including `Conflict` on a stale
    /// version.
    pub async fn update(
        &self,
        id: i64,
        update: &ConfigSettingUpdate,
        version: i64,
    ) -> registra_domain::Result<ConfigSetting> {
        self.client.update(id, update, version).await
    }

    /// Delete a setting.
    ///
    /// # Errors
    /// Any [`registra_domain::ClientError`].
    pub async fn remove(&self, id: i64) -> registra_domain::Result<()> {
        self.client.remove::<ConfigSetting>(id).await
    }
}
