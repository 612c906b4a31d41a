//! Invocation envelope exchanged with the function host.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// `{"Data": {"req": {...}}, "Metadata": {...}}`
#[derive(Debug, Clone, Deserialize)]
pub struct InvocationRequest {
    #[serde(rename = "Data")]
    pub data: InvocationData,

    #[serde(rename = "Metadata", default)]
    pub metadata: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InvocationData {
    pub req: HttpTriggerRequest,
}

/// Header values arrive as a list per name, or occasionally a single string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum HeaderValues {
    Many(Vec<String>),
    One(String),
}

impl HeaderValues {
    fn first(&self) -> Option<&str> {
        match self {
            HeaderValues::Many(values) => values.first().map(String::as_str),
            HeaderValues::One(value) => Some(value),
        }
    }
}

/// The HTTP request that triggered the function.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpTriggerRequest {
    #[serde(rename = "Url", default)]
    pub url: Option<String>,

    #[serde(rename = "Method")]
    pub method: String,

    #[serde(rename = "Headers", default)]
    headers: HashMap<String, HeaderValues>,

    /// Raw body text. Some host versions pass JSON bodies already decoded.
    #[serde(rename = "Body", default)]
    pub body: Value,
}

impl HttpTriggerRequest {
    pub fn is_preflight(&self) -> bool {
        self.method.eq_ignore_ascii_case("OPTIONS")
    }

    /// First value of a header, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .and_then(|(_, values)| values.first())
    }

    /// Body bytes as the caller sent them.
    pub fn body_bytes(&self) -> Vec<u8> {
        match &self.body {
            Value::Null => Vec::new(),
            Value::String(text) => text.as_bytes().to_vec(),
            decoded => decoded.to_string().into_bytes(),
        }
    }
}

/// `{"Outputs": {"res": {...}}, "Logs": [...], "ReturnValue": null}`
#[derive(Debug, Clone, Serialize)]
pub struct InvocationResponse {
    #[serde(rename = "Outputs")]
    pub outputs: InvocationOutputs,

    #[serde(rename = "Logs")]
    pub logs: Vec<String>,

    #[serde(rename = "ReturnValue")]
    pub return_value: Option<Value>,
}

impl InvocationResponse {
    pub fn new(res: HttpTriggerResponse, logs: Vec<String>) -> Self {
        Self {
            outputs: InvocationOutputs { res },
            logs,
            return_value: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InvocationOutputs {
    pub res: HttpTriggerResponse,
}

/// HTTP output binding.
#[derive(Debug, Clone, Serialize)]
pub struct HttpTriggerResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    pub headers: BTreeMap<String, String>,
}
