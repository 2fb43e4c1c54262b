//! Groups and their members.

use crate::clients::{DataType, HttpClient, HttpTransport};
use crate::rest::registry::{ApiKind, ResourceApi};
use crate::rest::{build_path, ApiError, RedmineClient};
use crate::wire::xml::XmlEncoder;
use crate::wire::{WireMap, WireValue};

use super::{cached_names, join_include, payload, require, xml_body, NameMap};

const ENDPOINT: &str = "/groups.json";
const FIELDS: &[&str] = &["name", "user_ids"];

/// Handle for `/groups`.
///
/// Group management requires administrator rights.
#[derive(Debug)]
pub struct GroupApi<'a, T: HttpTransport = HttpClient> {
    client: &'a RedmineClient<T>,
    names: Option<NameMap>,
}

impl<'a, T: HttpTransport> ResourceApi<'a, T> for GroupApi<'a, T> {
    const KIND: ApiKind = ApiKind::Group;

    fn new(client: &'a RedmineClient<T>) -> Self {
        Self {
            client,
            names: None,
        }
    }

    fn client(&self) -> &'a RedmineClient<T> {
        self.client
    }
}

impl<T: HttpTransport> GroupApi<'_, T> {
    /// Lists groups.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if a request fails.
    pub async fn list(&self, params: &WireMap) -> Result<WireValue, ApiError> {
        self.client.fetch_all(ENDPOINT, params).await
    }

    /// Returns group names by id, loading them on first use.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the names have to be loaded and a request fails.
    pub async fn list_names(&mut self, force_update: bool) -> Result<&NameMap, ApiError> {
        cached_names(
            &mut self.names,
            force_update,
            self.client,
            ENDPOINT,
            "groups",
            "name",
        )
        .await
    }

    /// Shows a group. `include` may be a list (`["users", "memberships"]`).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn show(&self, id: i64, params: &WireMap) -> Result<WireValue, ApiError> {
        let mut query = payload(&["include"], params);
        join_include(&mut query);
        let path = build_path(&format!("/groups/{id}.json"), &query);
        self.client.get_value(&path).await
    }

    /// Creates a group.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingParameter`] without `name`, or
    /// [`ApiError`] if the request fails.
    pub async fn create(&self, params: &WireMap) -> Result<WireValue, ApiError> {
        let group = payload(FIELDS, params);
        require("group", &group, &["name"])?;

        let body = xml_body(&XmlEncoder::new("group"), group);
        self.client.post("/groups.xml", body, DataType::Xml).await
    }

    /// Updates a group.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn update(&self, id: i64, params: &WireMap) -> Result<(), ApiError> {
        let body = xml_body(&XmlEncoder::new("group"), payload(FIELDS, params));
        self.client
            .put(&format!("/groups/{id}.xml"), body, DataType::Xml, None)
            .await?;
        Ok(())
    }

    /// Deletes a group.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn remove(&self, id: i64) -> Result<(), ApiError> {
        self.client.delete(&format!("/groups/{id}.xml")).await?;
        Ok(())
    }

    /// Adds a user to a group.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn add_user(&self, id: i64, user_id: i64) -> Result<(), ApiError> {
        let body = XmlEncoder::new("user_id")
            .encode(&WireValue::Int(user_id))
            .into_bytes();
        self.client
            .post(&format!("/groups/{id}/users.xml"), body, DataType::Xml)
            .await?;
        Ok(())
    }

    /// Removes a user from a group.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn remove_user(&self, id: i64, user_id: i64) -> Result<(), ApiError> {
        self.client
            .delete(&format!("/groups/{id}/users/{user_id}.xml"))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::clients::HttpMethod;
    use crate::rest::resources::testing::{client, params, FakeTransport};
    use crate::rest::ApiError;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_encodes_user_ids() {
        let client = client(FakeTransport::new().respond(
            201,
            "application/xml",
            "<group><id>20</id><name>Developers</name></group>",
        ));

        let created = client
            .group()
            .create(&params(json!({"user_ids": [3, 5], "name": "Developers"})))
            .await
            .unwrap();

        assert_eq!(
            created.get("group").and_then(|g| g.get("id")).and_then(|id| id.as_i64()),
            Some(20)
        );
        assert_eq!(
            client.transport().last_body(),
            "<?xml version=\"1.0\"?>\n<group><name>Developers</name><user_ids type=\"array\"><user_id>3</user_id><user_id>5</user_id></user_ids></group>\n"
        );
    }

    #[tokio::test]
    async fn test_create_requires_name() {
        let client = client(FakeTransport::new());

        let error = client
            .group()
            .create(&params(json!({"user_ids": [3]})))
            .await
            .unwrap_err();

        let ApiError::MissingParameter(missing) = error else {
            panic!("expected MissingParameter");
        };
        assert_eq!(missing.parameters, vec!["name"]);
        assert!(client.transport().requests().is_empty());
    }

    #[tokio::test]
    async fn test_show_joins_include() {
        let client = client(FakeTransport::new().json(200, r#"{"group":{"id":2}}"#));

        client
            .group()
            .show(2, &params(json!({"include": ["users", "memberships"]})))
            .await
            .unwrap();

        assert_eq!(
            client.transport().calls()[0].1,
            "/groups/2.json?include=users%2Cmemberships"
        );
    }

    #[tokio::test]
    async fn test_membership_changes() {
        let client = client(FakeTransport::new());
        let groups = client.group();

        groups.add_user(2, 9).await.unwrap();
        groups.remove_user(2, 9).await.unwrap();

        let requests = client.transport().requests();
        assert_eq!(requests[0].path, "/groups/2/users.xml");
        assert_eq!(
            requests[0].body_text().unwrap(),
            "<?xml version=\"1.0\"?>\n<user_id>9</user_id>\n"
        );
        assert_eq!(
            client.transport().calls()[1],
            (HttpMethod::Delete, "/groups/2/users/9.xml".to_string())
        );
    }
}
