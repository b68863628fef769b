use std::collections::BTreeMap;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::{LoadConfig, LoadError};

pub const API_VERSION: &str = "elemental.cattle.io/v1beta1";
pub const KIND: &str = "MachineRegistration";
pub const MANAGED_LABEL: &str = "testing.k6.io/managed";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MachineRegistration {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    pub spec: MachineRegistrationSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ObjectMeta {
    pub name: String,
    pub namespace: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MachineRegistrationSpec {
    pub machine_name: String,
    pub machine_inventory_labels: BTreeMap<String, String>,
}

impl MachineRegistration {
    /// Registration with a unique `k6-mr-<uuid>` name, labelled as managed by
    /// the load test.
    pub fn generate(namespace: &str) -> Self {
        Self::named(format!("k6-mr-{}", uuid::Uuid::new_v4()), namespace)
    }

    pub fn named(name: impl Into<String>, namespace: &str) -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            metadata: ObjectMeta {
                name: name.into(),
                namespace: namespace.to_string(),
            },
            spec: MachineRegistrationSpec {
                machine_name: "k6-node-${System Information/UUID}".to_string(),
                machine_inventory_labels: BTreeMap::from([(
                    MANAGED_LABEL.to_string(),
                    "true".to_string(),
                )]),
            },
        }
    }
}

/// Status and body of an API response.
#[derive(Debug, Clone)]
pub struct ApiReply {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl ApiReply {
    pub fn json(&self) -> Result<serde_json::Value, LoadError> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Client for the `machineregistrations` collection of one namespace.
#[derive(Clone)]
pub struct MachineRegistrationApi {
    client: Client,
    base: String,
    namespace: String,
    token: String,
}

impl std::fmt::Debug for MachineRegistrationApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MachineRegistrationApi")
            .field("base", &self.base)
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

impl MachineRegistrationApi {
    pub fn new(
        api_url: &str,
        token: &str,
        namespace: &str,
    ) -> Result<Self, LoadError> {
        // Test clusters serve self-signed certificates.
        let client = Client::builder()
            .danger_accept_invalid_certs(true)
            .build()?;
        Ok(Self {
            client,
            base: api_url.trim_end_matches('/').to_string(),
            namespace: namespace.to_string(),
            token: token.to_string(),
        })
    }

    /// `None` when the configuration has no API server.
    pub fn from_config(config: &LoadConfig) -> Result<Option<Self>, LoadError> {
        config
            .api_url()
            .map(|url| Self::new(url, &config.sa_token, &config.namespace))
            .transpose()
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn collection_url(&self) -> String {
        format!(
            "{}/apis/{API_VERSION}/namespaces/{}/machineregistrations",
            self.base, self.namespace
        )
    }

    pub fn resource_url(&self, name: &str) -> String {
        format!("{}/{name}", self.collection_url())
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<ApiReply, LoadError> {
        let resp = request.bearer_auth(&self.token).send().await?;
        let status = resp.status();
        let body = resp.bytes().await?.to_vec();
        Ok(ApiReply { status, body })
    }

    pub async fn create(
        &self,
        registration: &MachineRegistration,
    ) -> Result<ApiReply, LoadError> {
        self.send(self.client.post(self.collection_url()).json(registration))
            .await
    }

    pub async fn get(&self, name: &str) -> Result<ApiReply, LoadError> {
        self.send(self.client.get(self.resource_url(name))).await
    }

    /// Replace the resource with `object`, usually a fetched copy carrying
    /// its `resourceVersion`.
    pub async fn update(
        &self,
        name: &str,
        object: &serde_json::Value,
    ) -> Result<ApiReply, LoadError> {
        self.send(self.client.put(self.resource_url(name)).json(object))
            .await
    }

    pub async fn delete(&self, name: &str) -> Result<ApiReply, LoadError> {
        self.send(self.client.delete(self.resource_url(name))).await
    }
}

/// Set `metadata.annotations[key] = value`, creating the map when needed.
pub fn annotate(object: &mut serde_json::Value, key: &str, value: &str) {
    if !object.is_object() {
        return;
    }
    let metadata = object
        .as_object_mut()
        .map(|o| o.entry("metadata").or_insert_with(|| serde_json::json!({})));
    let Some(serde_json::Value::Object(metadata)) = metadata else {
        return;
    };
    let annotations = metadata
        .entry("annotations")
        .or_insert_with(|| serde_json::json!({}));
    if let serde_json::Value::Object(map) = annotations {
        map.insert(key.to_string(), value.into());
    } else {
        *annotations = serde_json::json!({ key: value });
    }
}
