//! Endpoint definitions read from the service's own API documentation.
//!
//! The service publishes one Swagger 1.2 document per resource family. Each
//! operation becomes an [`EndpointDef`]: its nickname is the operation name,
//! `allowableValues` become the allowed-value set, and a `(default is 'x'`
//! phrase in a parameter description becomes its default. Operations noted as
//! "Not paginated" still accept `page` and `count`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::{HypemError, Result},
    hypem::{client::HypemClient, endpoints::EndpointTable, params::SITE_KEY_PARAM, response},
    types::{EndpointDef, HttpVerb, ParamDef},
};

/// Resource families documented by the service.
pub const RESOURCES: &[&str] = &[
    "blogs", "tracks", "set", "artists", "featured", "tags", "users", "me", "misc",
];

static DEFAULT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(default is '(\w*)'").expect("valid regex"));

#[derive(Debug, Deserialize)]
struct ResourceDoc {
    #[serde(default)]
    apis: Vec<ApiDoc>,
}

#[derive(Debug, Deserialize)]
struct ApiDoc {
    path: String,
    #[serde(default)]
    operations: Vec<OperationDoc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OperationDoc {
    http_method: String,
    nickname: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    notes: String,
    #[serde(default)]
    parameters: Vec<ParameterDoc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParameterDoc {
    name: String,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    description: String,
    #[serde(default)]
    allowable_values: Option<AllowableValues>,
}

#[derive(Debug, Deserialize)]
struct AllowableValues {
    #[serde(default)]
    values: Vec<Value>,
}

fn param_def(doc: &ParameterDoc) -> ParamDef {
    let allowed = doc
        .allowable_values
        .as_ref()
        .map(|a| {
            a.values
                .iter()
                .map(|v| match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect()
        })
        .unwrap_or_default();

    let default = DEFAULT_RE
        .captures(&doc.description)
        .map(|c| c[1].to_string());

    ParamDef {
        name: doc.name.clone(),
        required: doc.required,
        allowed,
        default,
    }
}

fn operation_def(path: &str, op: &OperationDoc) -> Result<EndpointDef> {
    let verb = HttpVerb::parse(&op.http_method).ok_or_else(|| {
        HypemError::docs(format!(
            "{}: unsupported method {}",
            op.nickname, op.http_method
        ))
    })?;

    let mut params: Vec<ParamDef> = op.parameters.iter().map(param_def).collect();

    if op.notes.contains("Not paginated") && !params.iter().any(|p| p.name == "page") {
        params.push(ParamDef::optional("page"));
        params.push(ParamDef::optional("count"));
    }

    let summary = if op.summary.is_empty() {
        op.notes.clone()
    } else {
        op.summary.clone()
    };

    Ok(EndpointDef {
        name: op.nickname.clone(),
        verb,
        path: path.to_string(),
        params,
        summary,
    })
}

impl EndpointTable {
    /// Builds a table from Swagger 1.2 resource documents.
    pub fn from_api_docs(docs: &[Value]) -> Result<Self> {
        let mut endpoints = Vec::new();
        for doc in docs {
            let resource: ResourceDoc = serde_json::from_value(doc.clone())
                .map_err(|e| HypemError::docs(e.to_string()))?;
            for api in &resource.apis {
                for op in &api.operations {
                    endpoints.push(operation_def(&api.path, op)?);
                }
            }
        }

        if endpoints.is_empty() {
            return Err(HypemError::docs("no operations found"));
        }
        Ok(Self::new(endpoints))
    }
}

impl HypemClient {
    /// Downloads the documentation of every resource family.
    pub async fn fetch_api_docs(&self) -> Result<Vec<Value>> {
        let mut docs = Vec::with_capacity(RESOURCES.len());
        for resource in RESOURCES {
            let url = format!(
                "{}/{}.json?{}={}",
                self.docs_url(),
                resource,
                SITE_KEY_PARAM,
                urlencoding::encode(self.credentials.site_key())
            );
            let raw = self.execute(self.http.get(&url)).await?;
            docs.push(response::interpret(&raw)?);
        }
        Ok(docs)
    }

    /// Endpoint table generated from the live documentation.
    pub async fn fetch_endpoint_table(&self) -> Result<EndpointTable> {
        let docs = self.fetch_api_docs().await?;
        EndpointTable::from_api_docs(&docs)
    }
}
