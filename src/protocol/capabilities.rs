//! Server capability advertisement and initialize-time validation.
//!
//! Capability exchange here is an announcement, not an intersection: the
//! server always returns its own advertised set verbatim. The client's
//! declared capabilities are validated for JSON shape only and otherwise
//! ignored, including unknown keys.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::message::RpcError;

/// Per-feature capability flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityFlags {
    /// Whether the server emits list-changed notifications for this
    /// feature.
    #[serde(rename = "listChanged")]
    pub list_changed: bool,
}

/// The server's advertised capability set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerCapabilities {
    /// Prompt catalog capabilities.
    pub prompts: CapabilityFlags,
    /// Tool catalog capabilities.
    pub tools: CapabilityFlags,
    /// Resource catalog capabilities.
    pub resources: CapabilityFlags,
}

impl Default for ServerCapabilities {
    fn default() -> Self {
        Self {
            prompts: CapabilityFlags { list_changed: true },
            tools: CapabilityFlags { list_changed: false },
            resources: CapabilityFlags { list_changed: true },
        }
    }
}

impl ServerCapabilities {
    /// Override the prompts flags.
    pub fn with_prompts(mut self, list_changed: bool) -> Self {
        self.prompts = CapabilityFlags { list_changed };
        self
    }

    /// Override the tools flags.
    pub fn with_tools(mut self, list_changed: bool) -> Self {
        self.tools = CapabilityFlags { list_changed };
        self
    }

    /// Override the resources flags.
    pub fn with_resources(mut self, list_changed: bool) -> Self {
        self.resources = CapabilityFlags { list_changed };
        self
    }

    /// Resolve the capability set returned to a client. The advertised
    /// set is authoritative; the client's declared capabilities do not
    /// narrow it.
    pub fn negotiate(&self, _client: &Value) -> ServerCapabilities {
        *self
    }
}

/// Server identity reported in the initialize result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    /// Server name.
    pub name: String,
    /// Server version.
    pub version: String,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            name: crate::SERVER_NAME.to_string(),
            version: crate::VERSION.to_string(),
        }
    }
}

/// Successful initialize result payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitializeResult {
    /// Protocol revision the server speaks.
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    /// Server identity.
    #[serde(rename = "serverInfo")]
    pub server_info: ServerInfo,
    /// Capability set granted to the client.
    pub capabilities: ServerCapabilities,
}

impl InitializeResult {
    /// Build the result for a fresh initialization.
    pub fn new(capabilities: ServerCapabilities) -> Self {
        Self {
            protocol_version: super::PROTOCOL_VERSION.to_string(),
            server_info: ServerInfo::default(),
            capabilities,
        }
    }
}

/// Validate the client side of an initialize request and extract its
/// capability object.
///
/// The `capabilities` field must be a plain key-value object when
/// present; arrays and primitives are rejected. A missing field (or
/// missing params altogether) is treated as an empty object. Unknown
/// keys inside the object are accepted.
pub fn validate_client_capabilities(params: Option<&Value>) -> Result<Value, RpcError> {
    let Some(params) = params else {
        return Ok(Value::Object(serde_json::Map::new()));
    };

    let Some(obj) = params.as_object() else {
        return Err(RpcError::invalid_params(
            "Invalid params: capabilities must be an object",
        ));
    };

    match obj.get("capabilities") {
        None => Ok(Value::Object(serde_json::Map::new())),
        Some(caps) if caps.is_object() => Ok(caps.clone()),
        Some(_) => Err(RpcError::invalid_params(
            "Invalid params: capabilities must be an object",
        )),
    }
}

/// Per-site tool filter.
///
/// A tool is denied only when the site's capability map sets
/// `capabilities[category][tool_name]` to an explicit `false`. A missing
/// map, missing category, missing tool entry, or non-boolean value all
/// allow the call.
pub fn is_tool_allowed(capabilities: Option<&Value>, category: &str, tool_name: &str) -> bool {
    let Some(caps) = capabilities else {
        return true;
    };
    !matches!(
        caps.get(category).and_then(|c| c.get(tool_name)),
        Some(Value::Bool(false))
    )
}
