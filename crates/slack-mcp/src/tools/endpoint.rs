//! Declarative Slack endpoint tools
//!
//! Each Slack tool is a thin translator: tool arguments are shaped into the
//! parameters of one Web API method, the method is called through
//! [`SlackClient`], and the payload comes back as pretty-printed JSON. The
//! per-tool knowledge lives in [`EndpointSpec`] tables; this module holds the
//! one generic [`Tool`] implementation that interprets them.

use crate::clients::slack::SlackClient;
use crate::server::{McpServerError, McpServerResult, Tool, ToolContext};
use crate::types::{ToolDefinition, ToolResult};
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::{debug, error, instrument};

/// JSON type of a tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// JSON string
    String,
    /// JSON integer
    Integer,
    /// JSON boolean
    Boolean,
}

impl ParamKind {
    fn schema_type(&self) -> &'static str {
        match self {
            ParamKind::String => "string",
            ParamKind::Integer => "integer",
            ParamKind::Boolean => "boolean",
        }
    }
}

/// Default value of an optional parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamDefault {
    /// No default: omitted unless given
    None,
    /// String default
    Str(&'static str),
    /// Integer default
    Int(i64),
    /// Boolean default
    Bool(bool),
}

impl ParamDefault {
    fn to_value(self) -> Option<Value> {
        match self {
            ParamDefault::None => None,
            ParamDefault::Str(s) => Some(Value::String(s.to_string())),
            ParamDefault::Int(n) => Some(Value::from(n)),
            ParamDefault::Bool(b) => Some(Value::Bool(b)),
        }
    }
}

/// One tool parameter and how it maps onto the API method.
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    /// Argument name in the tool schema
    pub name: &'static str,
    /// JSON type
    pub kind: ParamKind,
    /// Schema description
    pub description: &'static str,
    /// Whether the caller must supply it
    pub required: bool,
    /// Value used when the caller omits it
    pub default: ParamDefault,
    /// Parameter name on the wire, when it differs from `name`
    pub wire_name: Option<&'static str>,
    /// Only sent when this other parameter is sent
    pub only_with: Option<&'static str>,
}

impl ParamSpec {
    const fn new(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            description,
            required: false,
            default: ParamDefault::None,
            wire_name: None,
            only_with: None,
        }
    }

    /// A string parameter.
    pub const fn string(name: &'static str, description: &'static str) -> Self {
        Self::new(name, ParamKind::String, description)
    }

    /// An integer parameter.
    pub const fn integer(name: &'static str, description: &'static str) -> Self {
        Self::new(name, ParamKind::Integer, description)
    }

    /// A boolean parameter.
    pub const fn boolean(name: &'static str, description: &'static str) -> Self {
        Self::new(name, ParamKind::Boolean, description)
    }

    /// Mark as required.
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set a string default.
    pub const fn default_str(mut self, value: &'static str) -> Self {
        self.default = ParamDefault::Str(value);
        self
    }

    /// Set an integer default.
    pub const fn default_int(mut self, value: i64) -> Self {
        self.default = ParamDefault::Int(value);
        self
    }

    /// Set a boolean default.
    pub const fn default_bool(mut self, value: bool) -> Self {
        self.default = ParamDefault::Bool(value);
        self
    }

    /// Send under a different name.
    pub const fn wire(mut self, wire_name: &'static str) -> Self {
        self.wire_name = Some(wire_name);
        self
    }

    /// Only send alongside another parameter.
    pub const fn only_with(mut self, other: &'static str) -> Self {
        self.only_with = Some(other);
        self
    }

    fn wire_name(&self) -> &'static str {
        self.wire_name.unwrap_or(self.name)
    }

    fn schema(&self) -> Value {
        let mut schema = json!({
            "type": self.kind.schema_type(),
            "description": self.description,
        });
        if let Some(default) = self.default.to_value() {
            schema["default"] = default;
        }
        schema
    }

    /// Check an argument against this parameter's type. No conversions:
    /// `"25"` is not an integer and `1` is not a string.
    fn typed(&self, value: &Value) -> Result<Value, String> {
        let typed = match self.kind {
            ParamKind::String => serde_json::from_value::<String>(value.clone()).map(Value::from),
            ParamKind::Integer => serde_json::from_value::<i64>(value.clone()).map(Value::from),
            ParamKind::Boolean => serde_json::from_value::<bool>(value.clone()).map(Value::from),
        };
        typed.map_err(|e| format!("Invalid parameter '{}': {}", self.name, e))
    }
}

/// A Slack Web API method exposed as a tool.
#[derive(Debug, Clone, Copy)]
pub struct EndpointSpec {
    /// Tool name
    pub tool: &'static str,
    /// Web API method, e.g. `chat.postMessage`
    pub endpoint: &'static str,
    /// Tool description
    pub description: &'static str,
    /// Tool category
    pub category: &'static str,
    /// The method does not modify workspace state
    pub read_only: bool,
    /// The method only works with user tokens
    pub user_token_only: bool,
    /// Parameters in schema order
    pub params: &'static [ParamSpec],
}

impl EndpointSpec {
    /// Tool definition with a JSON schema built from the parameters.
    pub fn definition(&self) -> ToolDefinition {
        let properties: Map<String, Value> = self
            .params
            .iter()
            .map(|p| (p.name.to_string(), p.schema()))
            .collect();
        let required: Vec<&str> = self
            .params
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name)
            .collect();

        ToolDefinition::new(self.tool, self.description)
            .with_category(self.category)
            .read_only(self.read_only)
            .with_schema(json!({
                "type": "object",
                "properties": properties,
                "required": required,
            }))
    }

    /// Turn tool arguments into API method parameters.
    ///
    /// Missing optional arguments take their default. Optional strings that
    /// end up empty are left out, as are parameters whose `only_with`
    /// partner is not being sent. Unknown arguments are ignored.
    pub fn shape_params(&self, args: &Value) -> Result<Map<String, Value>, String> {
        let args: Map<String, Value> = match args {
            Value::Null => Map::new(),
            other => serde_json::from_value(other.clone())
                .map_err(|e| format!("Invalid arguments: {}", e))?,
        };

        let mut shaped: Vec<(&ParamSpec, Value)> = Vec::new();
        for param in self.params {
            let given = args.get(param.name).filter(|v| !v.is_null());
            let value = match given {
                Some(value) => param.typed(value)?,
                None if param.required => {
                    return Err(format!("Missing required parameter: {}", param.name))
                }
                None => match param.default.to_value() {
                    Some(value) => value,
                    None => continue,
                },
            };

            if !param.required && value.as_str() == Some("") {
                continue;
            }
            shaped.push((param, value));
        }

        let sent: Vec<&str> = shaped.iter().map(|(p, _)| p.name).collect();
        Ok(shaped
            .into_iter()
            .filter(|(p, _)| p.only_with.map_or(true, |other| sent.contains(&other)))
            .map(|(p, value)| (p.wire_name().to_string(), value))
            .collect())
    }
}

/// Tool backed by one Slack Web API method.
pub struct SlackEndpointTool {
    spec: &'static EndpointSpec,
    client: Arc<SlackClient>,
}

impl SlackEndpointTool {
    /// Create a tool for an endpoint.
    pub fn new(spec: &'static EndpointSpec, client: Arc<SlackClient>) -> Self {
        Self { spec, client }
    }

    /// Endpoint description.
    pub fn spec(&self) -> &'static EndpointSpec {
        self.spec
    }
}

#[async_trait]
impl Tool for SlackEndpointTool {
    fn definition(&self) -> ToolDefinition {
        self.spec.definition()
    }

    #[instrument(
        skip(self, args, context),
        fields(tool = self.spec.tool, correlation_id = ?context.correlation_id)
    )]
    async fn execute(
        &self,
        args: Value,
        context: &ToolContext,
    ) -> McpServerResult<ToolResult> {
        let params = self
            .spec
            .shape_params(&args)
            .map_err(McpServerError::InvalidParams)?;

        if self.spec.user_token_only && !self.client.is_user_scoped() {
            return Ok(ToolResult::error(format!(
                "{} requires a user token (xoxp- or xoxe.xoxp-); the configured token is {}",
                self.spec.endpoint,
                self.client.credential_kind()
            )));
        }

        debug!("Calling {}", self.spec.endpoint);

        match self.client.post(self.spec.endpoint, Some(params)).await {
            Ok(data) => Ok(ToolResult::json(data)),
            Err(e) => {
                error!("Failed to call {}: {}", self.spec.endpoint, e);
                Ok(ToolResult::error(format!(
                    "Failed to call {}: {}",
                    self.spec.endpoint, e
                )))
            }
        }
    }
}

/// Build tools for a table of endpoints.
pub fn endpoint_tools(
    specs: &'static [EndpointSpec],
    client: &Arc<SlackClient>,
) -> Vec<Arc<dyn Tool>> {
    specs
        .iter()
        .map(|spec| Arc::new(SlackEndpointTool::new(spec, client.clone())) as Arc<dyn Tool>)
        .collect()
}
