//! Users.

use crate::clients::{DataType, HttpClient, HttpTransport};
use crate::rest::registry::{ApiKind, ResourceApi};
use crate::rest::{build_path, path_segment, sanitize_params, ApiError, RedmineClient, ResourceId};
use crate::wire::xml::XmlEncoder;
use crate::wire::{WireMap, WireValue};

use super::{cached_names, find_id, join_include, payload, require, xml_body, NameMap};

const ENDPOINT: &str = "/users.json";
const CREATE_FIELDS: &[&str] = &["login", "password", "lastname", "firstname", "mail"];
const UPDATE_FIELDS: &[&str] = &["login", "firstname", "lastname", "mail"];
const DEFAULT_INCLUDE: &str = "memberships,groups";

fn show_query(params: &WireMap) -> WireMap {
    let mut defaults = WireMap::new();
    defaults.insert("include".to_string(), WireValue::from(DEFAULT_INCLUDE));
    let mut query = sanitize_params(&defaults, params);
    join_include(&mut query);
    query
}

/// Handle for `/users`.
#[derive(Debug)]
pub struct UserApi<'a, T: HttpTransport = HttpClient> {
    client: &'a RedmineClient<T>,
    logins: Option<NameMap>,
}

impl<'a, T: HttpTransport> ResourceApi<'a, T> for UserApi<'a, T> {
    const KIND: ApiKind = ApiKind::User;

    fn new(client: &'a RedmineClient<T>) -> Self {
        Self {
            client,
            logins: None,
        }
    }

    fn client(&self) -> &'a RedmineClient<T> {
        self.client
    }
}

impl<T: HttpTransport> UserApi<'_, T> {
    /// Lists users. Requires administrator rights.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if a request fails.
    pub async fn list(&self, params: &WireMap) -> Result<WireValue, ApiError> {
        self.client.fetch_all(ENDPOINT, params).await
    }

    /// Returns user logins by id, loading them on first use.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the logins have to be loaded and a request
    /// fails.
    pub async fn list_logins(&mut self, force_update: bool) -> Result<&NameMap, ApiError> {
        cached_names(
            &mut self.logins,
            force_update,
            self.client,
            ENDPOINT,
            "users",
            "login",
        )
        .await
    }

    /// Returns the id of the user with login `username`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the logins have to be loaded and a request
    /// fails.
    pub async fn get_id_by_username(&mut self, username: &str) -> Result<Option<i64>, ApiError> {
        Ok(find_id(self.list_logins(false).await?, username))
    }

    /// Shows the user the client authenticates as.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn get_current_user(&self, params: &WireMap) -> Result<WireValue, ApiError> {
        self.show("current", params).await
    }

    /// Shows a user. Memberships and groups are included unless `params`
    /// sets its own `include`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the identifier is empty or the request fails.
    pub async fn show(
        &self,
        id: impl Into<ResourceId>,
        params: &WireMap,
    ) -> Result<WireValue, ApiError> {
        let id = id.into();
        let path = build_path(
            &format!("/users/{}.json", path_segment(&id)?),
            &show_query(params),
        );
        self.client.get_value(&path).await
    }

    /// Creates a user.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingParameter`] without `login`, `lastname`,
    /// `firstname` and `mail`, or [`ApiError`] if the request fails.
    pub async fn create(&self, params: &WireMap) -> Result<WireValue, ApiError> {
        let user = payload(CREATE_FIELDS, params);
        require("user", &user, &["login", "lastname", "firstname", "mail"])?;

        let body = xml_body(&XmlEncoder::new("user"), user);
        self.client.post("/users.xml", body, DataType::Xml).await
    }

    /// Updates a user.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn update(&self, id: i64, params: &WireMap) -> Result<(), ApiError> {
        let body = xml_body(&XmlEncoder::new("user"), payload(UPDATE_FIELDS, params));
        self.client
            .put(&format!("/users/{id}.xml"), body, DataType::Xml, None)
            .await?;
        Ok(())
    }

    /// Deletes a user.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn remove(&self, id: i64) -> Result<(), ApiError> {
        self.client.delete(&format!("/users/{id}.xml")).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::rest::resources::testing::{client, params, FakeTransport};
    use crate::rest::ApiError;
    use serde_json::json;

    #[tokio::test]
    async fn test_current_user_includes_memberships_and_groups() {
        let client = client(FakeTransport::new().json(200, r#"{"user":{"id":1,"login":"admin"}}"#));

        let user = client.user().get_current_user(&params(json!({}))).await.unwrap();

        assert_eq!(
            user.get("user").and_then(|u| u.get("login")).and_then(|l| l.as_str()),
            Some("admin")
        );
        assert_eq!(
            client.transport().calls()[0].1,
            "/users/current.json?include=memberships%2Cgroups"
        );
    }

    #[tokio::test]
    async fn test_get_id_by_username_uses_logins() {
        let client = client(FakeTransport::new().json(
            200,
            r#"{"users":[{"id":1,"login":"admin","firstname":"Redmine"},{"id":5,"login":"jsmith"}]}"#,
        ));
        let mut users = client.user();

        assert_eq!(users.get_id_by_username("jsmith").await.unwrap(), Some(5));
        assert_eq!(users.get_id_by_username("Redmine").await.unwrap(), None);
        assert_eq!(client.transport().requests().len(), 1);
    }

    #[tokio::test]
    async fn test_create_requires_identity_fields() {
        let client = client(FakeTransport::new());

        let error = client
            .user()
            .create(&params(json!({"login": "jdoe", "firstname": "John"})))
            .await
            .unwrap_err();

        let ApiError::MissingParameter(missing) = error else {
            panic!("expected MissingParameter");
        };
        assert_eq!(missing.parameters, vec!["lastname", "mail"]);
    }
}
