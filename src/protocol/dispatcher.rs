//! Method dispatch for everything the session does not answer itself.
//!
//! `initialize` and `shutdown` are handled inside [`Session`]; every
//! other request surfaces as a [`PendingCall`] and lands here. Methods
//! resolve through a compile-time table, and the `callTool` path runs
//! the full gauntlet in order: envelope validation, catalog lookup,
//! rate limit and consent, typed argument parsing, site resolution,
//! the per-site capability filter, then the WordPress call itself.
//! Every call outcome is written to the audit trail.
//!
//! [`Session`]: super::Session
//! [`PendingCall`]: super::PendingCall

use std::sync::Arc;

use phf::phf_map;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{BridgeError, Result};
use crate::security::SecurityGate;
use crate::tools::{
    self, prompts, resources, ActivateArgs, CreateArgs, CustomCssArgs, CustomizationArgs,
    DeleteArgs, ListArgs, MediaDeleteArgs, SiteArgs, ToolId, UpdateArgs, UploadArgs,
};
use crate::wp::{shop, SiteRegistry, WpClient};

use super::capabilities::is_tool_allowed;
use super::message::{error_codes, Response, RpcError};
use super::session::PendingCall;

/// Dispatchable methods, resolved from the wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Method {
    ListTools,
    CallTool,
    ListResources,
    ReadResource,
    ListResourceTemplates,
    ListPrompts,
    GetPrompt,
}

static METHODS: phf::Map<&'static str, Method> = phf_map! {
    "listTools" => Method::ListTools,
    "callTool" => Method::CallTool,
    "listResources" => Method::ListResources,
    "readResource" => Method::ReadResource,
    "listResourceTemplates" => Method::ListResourceTemplates,
    "listPrompts" => Method::ListPrompts,
    "getPrompt" => Method::GetPrompt,
};

/// Routes pending calls to their handlers.
///
/// One dispatcher serves every connection; per-connection state lives
/// in the `scope` string threaded through consent and audit records.
pub struct Dispatcher {
    sites: SiteRegistry,
    security: SecurityGate,
}

impl Dispatcher {
    /// Create a dispatcher over the given sites and security gate.
    pub fn new(sites: SiteRegistry, security: SecurityGate) -> Self {
        Self { sites, security }
    }

    /// Site registry backing this dispatcher.
    pub fn sites(&self) -> &SiteRegistry {
        &self.sites
    }

    /// Security gate, for consent management and audit access.
    pub fn security(&self) -> &SecurityGate {
        &self.security
    }

    /// Handle one pending call and produce its response.
    ///
    /// `scope` identifies the requesting connection in consent checks
    /// and audit records.
    pub async fn dispatch(&self, scope: &str, call: PendingCall) -> Response {
        let Some(&method) = METHODS.get(call.method.as_str()) else {
            debug!(method = %call.method, "unknown method");
            return Response::error(call.id, RpcError::method_not_found(&call.method));
        };

        match self.run(scope, method, call.params.as_ref()).await {
            Ok(result) => Response::success(call.id, result),
            Err(err) => {
                debug!(method = %call.method, error = %err, "call failed");
                Response::error(call.id, rpc_error(&err))
            }
        }
    }

    async fn run(&self, scope: &str, method: Method, params: Option<&Value>) -> Result<Value> {
        match method {
            Method::ListTools => Ok(json!({ "tools": tools::catalog() })),
            Method::CallTool => self.call_tool(scope, params).await,
            Method::ListResources => Ok(self.list_resources()),
            Method::ReadResource => self.read_resource(scope, params).await,
            Method::ListResourceTemplates => Ok(self.list_resource_templates(params)),
            Method::ListPrompts => Ok(json!({ "prompts": prompts::PROMPTS })),
            Method::GetPrompt => get_prompt(params),
        }
    }

    /// The `callTool` gauntlet up to and including the audit record.
    async fn call_tool(&self, scope: &str, params: Option<&Value>) -> Result<Value> {
        let params = params.ok_or(BridgeError::InvalidRequestParams)?;
        let name = params
            .get("name")
            .and_then(Value::as_str)
            .ok_or(BridgeError::InvalidRequestParams)?;
        let arguments = match params.get("arguments") {
            None | Some(Value::Null) => return Err(BridgeError::InvalidRequestParams),
            Some(arguments) => arguments,
        };

        // Catalog membership is checked before the site alias so an
        // unknown tool reports the same way on every site.
        let tool =
            ToolId::from_name(name).ok_or_else(|| BridgeError::UnknownTool(name.to_string()))?;

        self.security.authorize_tool(scope, name).await?;

        let result = self.execute(tool, arguments).await;
        let error = result.as_ref().err().map(ToString::to_string);
        self.security.record_execution(name, arguments, error.as_deref());
        result
    }

    /// Run one tool against its site and wrap the outcome in the text
    /// content envelope.
    async fn execute(&self, tool: ToolId, arguments: &Value) -> Result<Value> {
        let text = match tool {
            ToolId::DiscoverEndpoints => {
                let args: SiteArgs = tools::parse_args(arguments)?;
                let client = self.site_client(&args.site, tool)?;
                pretty(&client.discover_endpoints().await?)?
            }
            ToolId::GetProducts => {
                let args: ListArgs = tools::parse_args(arguments)?;
                let filters = shop::parse_filters(args.filters.as_ref())?;
                let client = self.site_client(&args.site, tool)?;
                pretty(&client.get_products(filters.as_ref()).await?)?
            }
            ToolId::GetOrders => {
                let args: ListArgs = tools::parse_args(arguments)?;
                let filters = shop::parse_filters(args.filters.as_ref())?;
                let client = self.site_client(&args.site, tool)?;
                pretty(&client.get_orders(filters.as_ref()).await?)?
            }
            ToolId::GetSales => {
                let args: ListArgs = tools::parse_args(arguments)?;
                let filters = shop::parse_filters(args.filters.as_ref())?;
                let client = self.site_client(&args.site, tool)?;
                pretty(&client.get_sales(filters.as_ref()).await?)?
            }
            ToolId::GetPosts => {
                let args: ListArgs = tools::parse_args(arguments)?;
                let client = self.site_client(&args.site, tool)?;
                pretty(&client.get_posts(args.filters.as_ref()).await?)?
            }
            ToolId::CreatePost => {
                let args: CreateArgs = tools::parse_args(arguments)?;
                let client = self.site_client(&args.site, tool)?;
                pretty(&client.create_post(&args.data).await?)?
            }
            ToolId::UpdatePost => {
                let args: UpdateArgs = tools::parse_args(arguments)?;
                let client = self.site_client(&args.site, tool)?;
                pretty(&client.update_post(args.id, &args.data).await?)?
            }
            ToolId::DeletePost => {
                let args: DeleteArgs = tools::parse_args(arguments)?;
                let client = self.site_client(&args.site, tool)?;
                client.delete_post(args.id).await?;
                "Post deleted successfully".to_string()
            }
            ToolId::GetPages => {
                let args: ListArgs = tools::parse_args(arguments)?;
                let client = self.site_client(&args.site, tool)?;
                pretty(&client.get_pages(args.filters.as_ref()).await?)?
            }
            ToolId::CreatePage => {
                let args: CreateArgs = tools::parse_args(arguments)?;
                let client = self.site_client(&args.site, tool)?;
                pretty(&client.create_page(&args.data).await?)?
            }
            ToolId::UpdatePage => {
                let args: UpdateArgs = tools::parse_args(arguments)?;
                let client = self.site_client(&args.site, tool)?;
                pretty(&client.update_page(args.id, &args.data).await?)?
            }
            ToolId::DeletePage => {
                let args: DeleteArgs = tools::parse_args(arguments)?;
                let client = self.site_client(&args.site, tool)?;
                client.delete_page(args.id).await?;
                "Page deleted successfully".to_string()
            }
            ToolId::GetMedia => {
                let args: ListArgs = tools::parse_args(arguments)?;
                let client = self.site_client(&args.site, tool)?;
                pretty(&client.get_media(args.filters.as_ref()).await?)?
            }
            ToolId::UploadMedia => {
                let args: UploadArgs = tools::parse_args(arguments)?;
                let client = self.site_client(&args.site, tool)?;
                pretty(
                    &client
                        .upload_media(args.file, &args.filename, args.data.as_ref())
                        .await?,
                )?
            }
            ToolId::UpdateMedia => {
                let args: UpdateArgs = tools::parse_args(arguments)?;
                let client = self.site_client(&args.site, tool)?;
                pretty(&client.update_media(args.id, &args.data).await?)?
            }
            ToolId::DeleteMedia => {
                let args: MediaDeleteArgs = tools::parse_args(arguments)?;
                let client = self.site_client(&args.site, tool)?;
                client.delete_media(args.id, args.force).await?;
                "Media deleted successfully".to_string()
            }
            ToolId::GetBlocks => {
                let args: ListArgs = tools::parse_args(arguments)?;
                let client = self.site_client(&args.site, tool)?;
                pretty(&client.get_blocks(args.filters.as_ref()).await?)?
            }
            ToolId::CreateBlock => {
                let args: CreateArgs = tools::parse_args(arguments)?;
                let client = self.site_client(&args.site, tool)?;
                pretty(&client.create_block(&args.data).await?)?
            }
            ToolId::UpdateBlock => {
                let args: UpdateArgs = tools::parse_args(arguments)?;
                let client = self.site_client(&args.site, tool)?;
                pretty(&client.update_block(args.id, &args.data).await?)?
            }
            ToolId::DeleteBlock => {
                let args: DeleteArgs = tools::parse_args(arguments)?;
                let client = self.site_client(&args.site, tool)?;
                client.delete_block(args.id).await?;
                "Block deleted successfully".to_string()
            }
            ToolId::GetBlockRevisions => {
                let args: DeleteArgs = tools::parse_args(arguments)?;
                let client = self.site_client(&args.site, tool)?;
                pretty(&client.get_block_revisions(args.id).await?)?
            }
            ToolId::ListThemes => {
                let args: ListArgs = tools::parse_args(arguments)?;
                let client = self.site_client(&args.site, tool)?;
                pretty(&client.get_themes(args.filters.as_ref()).await?)?
            }
            ToolId::GetActiveTheme => {
                let args: SiteArgs = tools::parse_args(arguments)?;
                let client = self.site_client(&args.site, tool)?;
                pretty(&client.get_active_theme().await?)?
            }
            ToolId::ActivateTheme => {
                let args: ActivateArgs = tools::parse_args(arguments)?;
                let client = self.site_client(&args.site, tool)?;
                pretty(&client.activate_theme(&args.stylesheet).await?)?
            }
            ToolId::GetCustomization => {
                let args: SiteArgs = tools::parse_args(arguments)?;
                let client = self.site_client(&args.site, tool)?;
                pretty(&client.get_theme_customization().await?)?
            }
            ToolId::UpdateCustomization => {
                let args: CustomizationArgs = tools::parse_args(arguments)?;
                let client = self.site_client(&args.site, tool)?;
                pretty(&client.update_theme_customization(&args.updates).await?)?
            }
            ToolId::GetCustomCss => {
                let args: SiteArgs = tools::parse_args(arguments)?;
                let client = self.site_client(&args.site, tool)?;
                client.get_custom_css().await?
            }
            ToolId::UpdateCustomCss => {
                let args: CustomCssArgs = tools::parse_args(arguments)?;
                let client = self.site_client(&args.site, tool)?;
                client.update_custom_css(&args.css).await?;
                "Custom CSS updated successfully".to_string()
            }
        };

        Ok(json!({ "content": [{ "type": "text", "text": text }] }))
    }

    /// Resolve a site alias and apply its capability filter to the tool.
    fn site_client(&self, alias: &str, tool: ToolId) -> Result<Arc<WpClient>> {
        let client = self.sites.get(alias)?;
        let capabilities = client.site().capabilities.as_ref();
        if !is_tool_allowed(capabilities, tool.category().as_str(), tool.name()) {
            return Err(BridgeError::NotAllowed {
                tool: tool.name().to_string(),
                site: alias.to_string(),
            });
        }
        Ok(client)
    }

    fn list_resources(&self) -> Value {
        let descriptors: Vec<Value> = self
            .sites
            .aliases()
            .into_iter()
            .filter_map(|alias| {
                self.sites
                    .site(alias)
                    .map(|site| resources::site_descriptor(alias, site))
            })
            .collect();
        json!({ "resources": descriptors })
    }

    async fn read_resource(&self, scope: &str, params: Option<&Value>) -> Result<Value> {
        let id = params
            .and_then(|p| p.get("id"))
            .and_then(Value::as_str)
            .ok_or(BridgeError::ResourceIdRequired)?;

        self.security.authorize_resource(scope, id).await?;

        let site = self
            .sites
            .site(id)
            .ok_or_else(|| BridgeError::UnknownSite(id.to_string()))?;
        Ok(json!({ "resource": resources::site_descriptor(id, site) }))
    }

    /// Templates, empty when the id is absent or names no configured
    /// site. A miss here is not an error.
    fn list_resource_templates(&self, params: Option<&Value>) -> Value {
        let templates = params
            .and_then(|p| p.get("id"))
            .and_then(Value::as_str)
            .filter(|id| self.sites.site(id).is_some())
            .map(resources::templates_for)
            .unwrap_or_else(|| json!([]));
        json!({ "resourceTemplates": templates })
    }
}

fn get_prompt(params: Option<&Value>) -> Result<Value> {
    let name = params
        .and_then(|p| p.get("name"))
        .and_then(Value::as_str)
        .ok_or(BridgeError::PromptNameRequired)?;
    prompts::get(name, params.and_then(|p| p.get("arguments")))
}

fn pretty(value: &Value) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Map a domain error onto the wire error space.
///
/// Unknown tools report as method-not-found, malformed input as
/// invalid-params, local faults as internal errors, and everything the
/// remote site or the security gate refused as a server error. The
/// message is always the error's display text.
fn rpc_error(err: &BridgeError) -> RpcError {
    let message = err.to_string();
    match err {
        BridgeError::UnknownTool(_) => RpcError::new(error_codes::METHOD_NOT_FOUND, message),
        BridgeError::InvalidRequestParams
        | BridgeError::InvalidParams(_)
        | BridgeError::InvalidFilters(_) => RpcError::new(error_codes::INVALID_PARAMS, message),
        BridgeError::Json(_)
        | BridgeError::Io(_)
        | BridgeError::Server(_)
        | BridgeError::Config(_) => RpcError::new(error_codes::INTERNAL_ERROR, message),
        _ => RpcError::new(error_codes::SERVER_ERROR, message),
    }
}
