//! Tool catalog and typed argument extraction.
//!
//! Every tool the bridge advertises over `listTools` is listed here once,
//! keyed by wire name. Dispatch, capability filtering and schema
//! advertisement all start from [`ToolId`]: the dispatcher resolves the
//! wire name through [`TOOL_IDS`], asks the id for its [`ToolCategory`],
//! and deserializes the call arguments into one of the typed argument
//! structs below. An argument payload that does not fit its struct is
//! rejected before any site or network work happens.

pub mod prompts;
pub mod resources;

use std::fmt;

use phf::phf_map;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::DEFAULT_SITE;
use crate::error::{BridgeError, Result};

/// Category a tool belongs to in per-site capability maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolCategory {
    /// Endpoint discovery.
    Discovery,
    /// Post CRUD.
    Posts,
    /// Page CRUD.
    Pages,
    /// Reusable block CRUD and revisions.
    Blocks,
    /// Media library operations.
    Media,
    /// Theme management and customization.
    Themes,
    /// WooCommerce products, orders and reports.
    Shop,
}

impl ToolCategory {
    /// Key used for this category in site capability maps.
    pub fn as_str(self) -> &'static str {
        match self {
            ToolCategory::Discovery => "discovery",
            ToolCategory::Posts => "posts",
            ToolCategory::Pages => "pages",
            ToolCategory::Blocks => "blocks",
            ToolCategory::Media => "media",
            ToolCategory::Themes => "themes",
            ToolCategory::Shop => "shop",
        }
    }
}

impl fmt::Display for ToolCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier for every tool the bridge can dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolId {
    /// `claudeus_wp_discover_endpoints`
    DiscoverEndpoints,
    /// `claudeus_wp_shop__get_products`
    GetProducts,
    /// `claudeus_wp_shop__get_orders`
    GetOrders,
    /// `claudeus_wp_shop__get_sales`
    GetSales,
    /// `claudeus_wp_content__get_posts`
    GetPosts,
    /// `claudeus_wp_content__create_post`
    CreatePost,
    /// `claudeus_wp_content__update_post`
    UpdatePost,
    /// `claudeus_wp_content__delete_post`
    DeletePost,
    /// `claudeus_wp_content__get_pages`
    GetPages,
    /// `claudeus_wp_content__create_page`
    CreatePage,
    /// `claudeus_wp_content__update_page`
    UpdatePage,
    /// `claudeus_wp_content__delete_page`
    DeletePage,
    /// `claudeus_wp_media__get_media`
    GetMedia,
    /// `claudeus_wp_media__upload`
    UploadMedia,
    /// `claudeus_wp_media__update`
    UpdateMedia,
    /// `claudeus_wp_media__delete`
    DeleteMedia,
    /// `claudeus_wp_content__get_blocks`
    GetBlocks,
    /// `claudeus_wp_content__create_block`
    CreateBlock,
    /// `claudeus_wp_content__update_block`
    UpdateBlock,
    /// `claudeus_wp_content__delete_block`
    DeleteBlock,
    /// `claudeus_wp_content__get_block_revisions`
    GetBlockRevisions,
    /// `claudeus_wp_theme__list`
    ListThemes,
    /// `claudeus_wp_theme__get_active`
    GetActiveTheme,
    /// `claudeus_wp_theme__activate`
    ActivateTheme,
    /// `claudeus_wp_theme__get_customization`
    GetCustomization,
    /// `claudeus_wp_theme__update_customization`
    UpdateCustomization,
    /// `claudeus_wp_theme__get_custom_css`
    GetCustomCss,
    /// `claudeus_wp_theme__update_custom_css`
    UpdateCustomCss,
}

/// Wire names → tool identifiers.
pub static TOOL_IDS: phf::Map<&'static str, ToolId> = phf_map! {
    // Discovery
    "claudeus_wp_discover_endpoints" => ToolId::DiscoverEndpoints,
    // Shop
    "claudeus_wp_shop__get_products" => ToolId::GetProducts,
    "claudeus_wp_shop__get_orders" => ToolId::GetOrders,
    "claudeus_wp_shop__get_sales" => ToolId::GetSales,
    // Posts
    "claudeus_wp_content__get_posts" => ToolId::GetPosts,
    "claudeus_wp_content__create_post" => ToolId::CreatePost,
    "claudeus_wp_content__update_post" => ToolId::UpdatePost,
    "claudeus_wp_content__delete_post" => ToolId::DeletePost,
    // Pages
    "claudeus_wp_content__get_pages" => ToolId::GetPages,
    "claudeus_wp_content__create_page" => ToolId::CreatePage,
    "claudeus_wp_content__update_page" => ToolId::UpdatePage,
    "claudeus_wp_content__delete_page" => ToolId::DeletePage,
    // Media
    "claudeus_wp_media__get_media" => ToolId::GetMedia,
    "claudeus_wp_media__upload" => ToolId::UploadMedia,
    "claudeus_wp_media__update" => ToolId::UpdateMedia,
    "claudeus_wp_media__delete" => ToolId::DeleteMedia,
    // Blocks
    "claudeus_wp_content__get_blocks" => ToolId::GetBlocks,
    "claudeus_wp_content__create_block" => ToolId::CreateBlock,
    "claudeus_wp_content__update_block" => ToolId::UpdateBlock,
    "claudeus_wp_content__delete_block" => ToolId::DeleteBlock,
    "claudeus_wp_content__get_block_revisions" => ToolId::GetBlockRevisions,
    // Themes
    "claudeus_wp_theme__list" => ToolId::ListThemes,
    "claudeus_wp_theme__get_active" => ToolId::GetActiveTheme,
    "claudeus_wp_theme__activate" => ToolId::ActivateTheme,
    "claudeus_wp_theme__get_customization" => ToolId::GetCustomization,
    "claudeus_wp_theme__update_customization" => ToolId::UpdateCustomization,
    "claudeus_wp_theme__get_custom_css" => ToolId::GetCustomCss,
    "claudeus_wp_theme__update_custom_css" => ToolId::UpdateCustomCss,
};

impl ToolId {
    /// Resolve a wire name to its identifier.
    pub fn from_name(name: &str) -> Option<ToolId> {
        TOOL_IDS.get(name).copied()
    }

    /// Wire name this tool is advertised and called under.
    pub fn name(self) -> &'static str {
        match self {
            ToolId::DiscoverEndpoints => "claudeus_wp_discover_endpoints",
            ToolId::GetProducts => "claudeus_wp_shop__get_products",
            ToolId::GetOrders => "claudeus_wp_shop__get_orders",
            ToolId::GetSales => "claudeus_wp_shop__get_sales",
            ToolId::GetPosts => "claudeus_wp_content__get_posts",
            ToolId::CreatePost => "claudeus_wp_content__create_post",
            ToolId::UpdatePost => "claudeus_wp_content__update_post",
            ToolId::DeletePost => "claudeus_wp_content__delete_post",
            ToolId::GetPages => "claudeus_wp_content__get_pages",
            ToolId::CreatePage => "claudeus_wp_content__create_page",
            ToolId::UpdatePage => "claudeus_wp_content__update_page",
            ToolId::DeletePage => "claudeus_wp_content__delete_page",
            ToolId::GetMedia => "claudeus_wp_media__get_media",
            ToolId::UploadMedia => "claudeus_wp_media__upload",
            ToolId::UpdateMedia => "claudeus_wp_media__update",
            ToolId::DeleteMedia => "claudeus_wp_media__delete",
            ToolId::GetBlocks => "claudeus_wp_content__get_blocks",
            ToolId::CreateBlock => "claudeus_wp_content__create_block",
            ToolId::UpdateBlock => "claudeus_wp_content__update_block",
            ToolId::DeleteBlock => "claudeus_wp_content__delete_block",
            ToolId::GetBlockRevisions => "claudeus_wp_content__get_block_revisions",
            ToolId::ListThemes => "claudeus_wp_theme__list",
            ToolId::GetActiveTheme => "claudeus_wp_theme__get_active",
            ToolId::ActivateTheme => "claudeus_wp_theme__activate",
            ToolId::GetCustomization => "claudeus_wp_theme__get_customization",
            ToolId::UpdateCustomization => "claudeus_wp_theme__update_customization",
            ToolId::GetCustomCss => "claudeus_wp_theme__get_custom_css",
            ToolId::UpdateCustomCss => "claudeus_wp_theme__update_custom_css",
        }
    }

    /// Capability category this tool is filtered under.
    pub fn category(self) -> ToolCategory {
        match self {
            ToolId::DiscoverEndpoints => ToolCategory::Discovery,
            ToolId::GetProducts | ToolId::GetOrders | ToolId::GetSales => ToolCategory::Shop,
            ToolId::GetPosts | ToolId::CreatePost | ToolId::UpdatePost | ToolId::DeletePost => {
                ToolCategory::Posts
            }
            ToolId::GetPages | ToolId::CreatePage | ToolId::UpdatePage | ToolId::DeletePage => {
                ToolCategory::Pages
            }
            ToolId::GetMedia | ToolId::UploadMedia | ToolId::UpdateMedia | ToolId::DeleteMedia => {
                ToolCategory::Media
            }
            ToolId::GetBlocks
            | ToolId::CreateBlock
            | ToolId::UpdateBlock
            | ToolId::DeleteBlock
            | ToolId::GetBlockRevisions => ToolCategory::Blocks,
            ToolId::ListThemes
            | ToolId::GetActiveTheme
            | ToolId::ActivateTheme
            | ToolId::GetCustomization
            | ToolId::UpdateCustomization
            | ToolId::GetCustomCss
            | ToolId::UpdateCustomCss => ToolCategory::Themes,
        }
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A tool advertisement: wire name, description and input schema.
#[derive(Debug, Clone, Serialize)]
pub struct ToolSpec {
    /// Wire name.
    pub name: &'static str,
    /// Human-readable description.
    pub description: &'static str,
    /// JSON schema for the call arguments.
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

fn spec(id: ToolId, description: &'static str, input_schema: Value) -> ToolSpec {
    ToolSpec {
        name: id.name(),
        description,
        input_schema,
    }
}

/// The advertised tool list, in advertisement order.
///
/// Schemas are advisory for clients; the binding contract is the typed
/// argument structs the dispatcher parses with.
pub fn catalog() -> Vec<ToolSpec> {
    vec![
        spec(
            ToolId::DiscoverEndpoints,
            "Discovers available REST API endpoints on a WordPress site.",
            json!({
                "type": "object",
                "required": [],
                "properties": {
                    "site": {
                        "type": "string",
                        "description": "Site alias (defaults to default_test)",
                        "default": DEFAULT_SITE
                    }
                }
            }),
        ),
        spec(
            ToolId::GetProducts,
            "Get a list of products with optional filters",
            json!({
                "type": "object",
                "required": [],
                "properties": {
                    "site": {
                        "type": "string",
                        "description": "Site alias (defaults to default_test)",
                        "default": DEFAULT_SITE
                    },
                    "filters": {
                        "type": "object",
                        "description": "Optional filters for products query",
                        "required": false,
                        "properties": {
                            "per_page": { "type": "number" },
                            "page": { "type": "number" },
                            "search": { "type": "string" },
                            "category": { "type": "number" },
                            "tag": { "type": "number" },
                            "status": {
                                "type": "string",
                                "enum": ["draft", "pending", "private", "publish"]
                            },
                            "featured": { "type": "boolean" },
                            "type": {
                                "type": "string",
                                "enum": ["simple", "grouped", "external", "variable"]
                            }
                        }
                    }
                }
            }),
        ),
        spec(
            ToolId::GetOrders,
            "Get a list of orders with optional filters",
            json!({
                "type": "object",
                "required": [],
                "properties": {
                    "site": {
                        "type": "string",
                        "description": "Site alias (defaults to default_test)",
                        "default": DEFAULT_SITE
                    },
                    "filters": {
                        "type": "object",
                        "description": "Optional filters for orders query",
                        "required": false,
                        "properties": {
                            "per_page": { "type": "number" },
                            "page": { "type": "number" },
                            "search": { "type": "string" },
                            "status": {
                                "type": "string",
                                "enum": [
                                    "pending", "processing", "on-hold", "completed",
                                    "cancelled", "refunded", "failed"
                                ]
                            },
                            "customer": { "type": "number" },
                            "product": { "type": "number" },
                            "date_created_min": { "type": "string", "format": "date-time" },
                            "date_created_max": { "type": "string", "format": "date-time" }
                        }
                    }
                }
            }),
        ),
        spec(
            ToolId::GetSales,
            "Get sales statistics with optional filters",
            json!({
                "type": "object",
                "required": [],
                "properties": {
                    "site": {
                        "type": "string",
                        "description": "Site alias (defaults to default_test)",
                        "default": DEFAULT_SITE
                    },
                    "filters": {
                        "type": "object",
                        "description": "Optional filters for sales statistics",
                        "required": false,
                        "properties": {
                            "period": { "type": "string", "enum": ["day", "week", "month", "year"] },
                            "date_min": { "type": "string", "format": "date-time" },
                            "date_max": { "type": "string", "format": "date-time" },
                            "product": { "type": "number" },
                            "category": { "type": "number" }
                        }
                    }
                }
            }),
        ),
        spec(
            ToolId::GetPosts,
            "Get a list of posts with optional filters",
            json!({
                "type": "object",
                "required": [],
                "properties": {
                    "site": {
                        "type": "string",
                        "description": "Site alias (defaults to default_test)",
                        "default": DEFAULT_SITE
                    },
                    "filters": {
                        "type": "object",
                        "description": "Optional filters for posts query",
                        "required": false
                    }
                }
            }),
        ),
        spec(
            ToolId::CreatePost,
            "Create a new post",
            json!({
                "type": "object",
                "required": ["data"],
                "properties": {
                    "site": {
                        "type": "string",
                        "description": "Site alias (defaults to default_test)",
                        "default": DEFAULT_SITE
                    },
                    "data": {
                        "type": "object",
                        "description": "Post data (paste as JSON object)",
                        "required": ["title", "content"],
                        "properties": {
                            "title": {
                                "type": "string",
                                "description": "Post title"
                            },
                            "content": {
                                "type": "string",
                                "description": "Post content (can include HTML)"
                            },
                            "status": {
                                "type": "string",
                                "enum": ["publish", "draft", "pending", "private"],
                                "description": "Post status",
                                "default": "draft"
                            },
                            "excerpt": {
                                "type": "string",
                                "description": "Optional post excerpt"
                            },
                            "featured_media": {
                                "type": "number",
                                "description": "Optional featured image ID"
                            },
                            "categories": {
                                "type": "array",
                                "items": { "type": "number" },
                                "description": "Optional array of category IDs"
                            },
                            "tags": {
                                "type": "array",
                                "items": { "type": "number" },
                                "description": "Optional array of tag IDs"
                            }
                        }
                    }
                }
            }),
        ),
        spec(
            ToolId::UpdatePost,
            "Update an existing post",
            json!({
                "type": "object",
                "properties": {
                    "site": { "type": "string", "description": "Site alias" },
                    "id": { "type": "number", "description": "Post ID" },
                    "data": { "type": "object", "description": "Updated post data" }
                },
                "required": ["site", "id", "data"]
            }),
        ),
        spec(
            ToolId::DeletePost,
            "Delete a post",
            json!({
                "type": "object",
                "properties": {
                    "site": { "type": "string", "description": "Site alias" },
                    "id": { "type": "number", "description": "Post ID" }
                },
                "required": ["site", "id"]
            }),
        ),
        spec(
            ToolId::GetPages,
            "Get a list of pages with optional filters",
            json!({
                "type": "object",
                "properties": {
                    "site": { "type": "string", "description": "Site alias" },
                    "filters": {
                        "type": "object",
                        "description": "Optional filters for pages query",
                        "required": false
                    }
                },
                "required": ["site"]
            }),
        ),
        spec(
            ToolId::CreatePage,
            "Create a new page",
            json!({
                "type": "object",
                "properties": {
                    "site": { "type": "string", "description": "Site alias" },
                    "data": {
                        "type": "object",
                        "description": "Page data",
                        "required": true
                    }
                },
                "required": ["site", "data"]
            }),
        ),
        spec(
            ToolId::UpdatePage,
            "Update an existing page",
            json!({
                "type": "object",
                "properties": {
                    "site": { "type": "string", "description": "Site alias" },
                    "id": { "type": "number", "description": "Page ID" },
                    "data": { "type": "object", "description": "Updated page data" }
                },
                "required": ["site", "id", "data"]
            }),
        ),
        spec(
            ToolId::DeletePage,
            "Delete a page",
            json!({
                "type": "object",
                "properties": {
                    "site": { "type": "string", "description": "Site alias" },
                    "id": { "type": "number", "description": "Page ID" }
                },
                "required": ["site", "id"]
            }),
        ),
        spec(
            ToolId::GetMedia,
            "Get a list of media items with optional filters",
            json!({
                "type": "object",
                "properties": {
                    "site": { "type": "string", "description": "Site alias" },
                    "filters": {
                        "type": "object",
                        "description": "Optional filters for media query",
                        "required": false
                    }
                },
                "required": ["site"]
            }),
        ),
        spec(
            ToolId::UploadMedia,
            "Upload a new media file",
            json!({
                "type": "object",
                "properties": {
                    "site": { "type": "string", "description": "Site alias" },
                    "file": { "type": "string", "description": "File buffer" },
                    "filename": { "type": "string", "description": "Name of the file" },
                    "data": {
                        "type": "object",
                        "description": "Optional media metadata",
                        "required": false
                    }
                },
                "required": ["site", "file", "filename"]
            }),
        ),
        spec(
            ToolId::UpdateMedia,
            "Update media item metadata",
            json!({
                "type": "object",
                "properties": {
                    "site": { "type": "string", "description": "Site alias" },
                    "id": { "type": "number", "description": "Media ID" },
                    "data": { "type": "object", "description": "Updated media metadata" }
                },
                "required": ["site", "id", "data"]
            }),
        ),
        spec(
            ToolId::DeleteMedia,
            "Delete a media item",
            json!({
                "type": "object",
                "properties": {
                    "site": { "type": "string", "description": "Site alias" },
                    "id": { "type": "number", "description": "Media ID" },
                    "force": { "type": "boolean", "description": "Whether to bypass trash" }
                },
                "required": ["site", "id"]
            }),
        ),
        spec(
            ToolId::GetBlocks,
            "Get a list of blocks with optional filters",
            json!({
                "type": "object",
                "properties": {
                    "site": { "type": "string", "description": "Site alias" },
                    "filters": {
                        "type": "object",
                        "description": "Optional filters for blocks query",
                        "required": false
                    }
                },
                "required": ["site"]
            }),
        ),
        spec(
            ToolId::CreateBlock,
            "Create a new block",
            json!({
                "type": "object",
                "properties": {
                    "site": { "type": "string", "description": "Site alias" },
                    "data": {
                        "type": "object",
                        "description": "Block data",
                        "required": true
                    }
                },
                "required": ["site", "data"]
            }),
        ),
        spec(
            ToolId::UpdateBlock,
            "Update an existing block",
            json!({
                "type": "object",
                "properties": {
                    "site": { "type": "string", "description": "Site alias" },
                    "id": { "type": "number", "description": "Block ID" },
                    "data": { "type": "object", "description": "Updated block data" }
                },
                "required": ["site", "id", "data"]
            }),
        ),
        spec(
            ToolId::DeleteBlock,
            "Delete a block",
            json!({
                "type": "object",
                "properties": {
                    "site": { "type": "string", "description": "Site alias" },
                    "id": { "type": "number", "description": "Block ID" }
                },
                "required": ["site", "id"]
            }),
        ),
        spec(
            ToolId::GetBlockRevisions,
            "Get revisions of a block",
            json!({
                "type": "object",
                "properties": {
                    "site": { "type": "string", "description": "Site alias" },
                    "id": { "type": "number", "description": "Block ID" }
                },
                "required": ["site", "id"]
            }),
        ),
        spec(
            ToolId::ListThemes,
            "Get a list of installed themes",
            json!({
                "type": "object",
                "properties": {
                    "site": { "type": "string", "description": "Site alias" },
                    "filters": {
                        "type": "object",
                        "description": "Optional filters for themes query",
                        "required": false
                    }
                },
                "required": ["site"]
            }),
        ),
        spec(
            ToolId::GetActiveTheme,
            "Get the currently active theme",
            json!({
                "type": "object",
                "properties": {
                    "site": { "type": "string", "description": "Site alias" }
                },
                "required": ["site"]
            }),
        ),
        spec(
            ToolId::ActivateTheme,
            "Activate a theme",
            json!({
                "type": "object",
                "properties": {
                    "site": { "type": "string", "description": "Site alias" },
                    "stylesheet": { "type": "string", "description": "Theme stylesheet name" }
                },
                "required": ["site", "stylesheet"]
            }),
        ),
        spec(
            ToolId::GetCustomization,
            "Get theme customization settings",
            json!({
                "type": "object",
                "properties": {
                    "site": { "type": "string", "description": "Site alias" }
                },
                "required": ["site"]
            }),
        ),
        spec(
            ToolId::UpdateCustomization,
            "Update theme customization settings",
            json!({
                "type": "object",
                "properties": {
                    "site": { "type": "string", "description": "Site alias" },
                    "updates": {
                        "type": "object",
                        "description": "Customization updates to apply",
                        "properties": {
                            "custom_css": { "type": "string" },
                            "settings": { "type": "object" },
                            "mods": {
                                "type": "object",
                                "properties": {
                                    "add": { "type": "object" },
                                    "remove": { "type": "array", "items": { "type": "string" } }
                                }
                            }
                        }
                    }
                },
                "required": ["site", "updates"]
            }),
        ),
        spec(
            ToolId::GetCustomCss,
            "Get theme custom CSS",
            json!({
                "type": "object",
                "properties": {
                    "site": { "type": "string", "description": "Site alias" }
                },
                "required": ["site"]
            }),
        ),
        spec(
            ToolId::UpdateCustomCss,
            "Update theme custom CSS",
            json!({
                "type": "object",
                "properties": {
                    "site": { "type": "string", "description": "Site alias" },
                    "css": { "type": "string", "description": "Custom CSS code" }
                },
                "required": ["site", "css"]
            }),
        ),
    ]
}

fn default_site() -> String {
    DEFAULT_SITE.to_string()
}

/// Deserialize call arguments into their typed form.
///
/// Serde's message becomes the invalid-params error text, so a caller
/// missing a required field sees which field it was.
pub fn parse_args<T: DeserializeOwned>(args: &Value) -> Result<T> {
    serde_json::from_value(args.clone()).map_err(|e| BridgeError::InvalidParams(e.to_string()))
}

/// Arguments carrying only a site alias (discovery, theme getters).
#[derive(Debug, Clone, Deserialize)]
pub struct SiteArgs {
    /// Site alias, defaulting to the standard test site.
    #[serde(default = "default_site")]
    pub site: String,
}

/// Arguments for list-style tools: site plus an optional filter object
/// passed through to the REST query string.
#[derive(Debug, Clone, Deserialize)]
pub struct ListArgs {
    /// Site alias.
    #[serde(default = "default_site")]
    pub site: String,
    /// Filter object forwarded as query parameters.
    #[serde(default)]
    pub filters: Option<Value>,
}

/// Arguments for create-style tools.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateArgs {
    /// Site alias.
    #[serde(default = "default_site")]
    pub site: String,
    /// Payload forwarded as the request body.
    pub data: Value,
}

/// Arguments for update-style tools addressing an item by id.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateArgs {
    /// Site alias.
    #[serde(default = "default_site")]
    pub site: String,
    /// Item id.
    pub id: i64,
    /// Payload forwarded as the request body.
    pub data: Value,
}

/// Arguments for delete-style tools and revision lookups.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteArgs {
    /// Site alias.
    #[serde(default = "default_site")]
    pub site: String,
    /// Item id.
    pub id: i64,
}

/// Arguments for `claudeus_wp_media__delete_media`, which also carries
/// the permanent-delete flag.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaDeleteArgs {
    /// Site alias.
    #[serde(default = "default_site")]
    pub site: String,
    /// Media item id.
    pub id: i64,
    /// Bypass trash and delete permanently.
    #[serde(default)]
    pub force: bool,
}

/// Arguments for `claudeus_wp_media__upload`.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadArgs {
    /// Site alias.
    #[serde(default = "default_site")]
    pub site: String,
    /// File contents as a string buffer.
    pub file: String,
    /// Name the attachment is stored under.
    pub filename: String,
    /// Optional metadata to set on the new attachment.
    #[serde(default)]
    pub data: Option<Value>,
}

/// Arguments for `claudeus_wp_theme__activate`.
#[derive(Debug, Clone, Deserialize)]
pub struct ActivateArgs {
    /// Site alias.
    #[serde(default = "default_site")]
    pub site: String,
    /// Stylesheet name of the theme to activate.
    pub stylesheet: String,
}

/// Arguments for `claudeus_wp_theme__update_customization`.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomizationArgs {
    /// Site alias.
    #[serde(default = "default_site")]
    pub site: String,
    /// Settings, custom CSS and theme-mod changes to apply.
    pub updates: Value,
}

/// Arguments for `claudeus_wp_theme__update_custom_css`.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomCssArgs {
    /// Site alias.
    #[serde(default = "default_site")]
    pub site: String,
    /// Replacement CSS.
    pub css: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_covers_every_id() {
        let tools = catalog();
        assert_eq!(tools.len(), TOOL_IDS.len());
        for tool in &tools {
            let id = ToolId::from_name(tool.name);
            assert!(id.is_some(), "catalog entry {} has no id", tool.name);
            assert_eq!(id.map(ToolId::name), Some(tool.name));
        }
    }

    #[test]
    fn test_catalog_order_starts_with_discovery_then_shop() {
        let tools = catalog();
        assert_eq!(tools[0].name, "claudeus_wp_discover_endpoints");
        assert_eq!(tools[1].name, "claudeus_wp_shop__get_products");
        assert_eq!(tools[2].name, "claudeus_wp_shop__get_orders");
        assert_eq!(tools[3].name, "claudeus_wp_shop__get_sales");
    }

    #[test]
    fn test_unknown_name_resolves_to_none() {
        assert!(ToolId::from_name("claudeus_wp_content__get_post_revisions").is_none());
        assert!(ToolId::from_name("").is_none());
    }

    #[test]
    fn test_categories() {
        assert_eq!(ToolId::DiscoverEndpoints.category(), ToolCategory::Discovery);
        assert_eq!(ToolId::GetOrders.category(), ToolCategory::Shop);
        assert_eq!(ToolId::CreatePost.category(), ToolCategory::Posts);
        assert_eq!(ToolId::DeletePage.category(), ToolCategory::Pages);
        assert_eq!(ToolId::UploadMedia.category(), ToolCategory::Media);
        assert_eq!(ToolId::GetBlockRevisions.category(), ToolCategory::Blocks);
        assert_eq!(ToolId::UpdateCustomCss.category(), ToolCategory::Themes);
        assert_eq!(ToolCategory::Shop.as_str(), "shop");
    }

    #[test]
    fn test_site_default_in_schema() {
        let tools = catalog();
        let discovery = &tools[0];
        assert_eq!(
            discovery.input_schema["properties"]["site"]["default"],
            serde_json::json!("default_test")
        );
    }

    #[test]
    fn test_parse_list_args_defaults_site() {
        let args: ListArgs = parse_args(&json!({})).unwrap();
        assert_eq!(args.site, "default_test");
        assert!(args.filters.is_none());
    }

    #[test]
    fn test_parse_list_args_keeps_filters() {
        let args: ListArgs = parse_args(&json!({"site": "shop1", "filters": {"per_page": 5}}))
            .unwrap();
        assert_eq!(args.site, "shop1");
        assert_eq!(args.filters, Some(json!({"per_page": 5})));
    }

    #[test]
    fn test_parse_update_args_requires_id() {
        let err = parse_args::<UpdateArgs>(&json!({"site": "a", "data": {}})).unwrap_err();
        let text = err.to_string();
        assert!(text.starts_with("Invalid params:"), "got: {text}");
        assert!(text.contains("id"), "got: {text}");
    }

    #[test]
    fn test_parse_delete_args_ignores_extra_fields() {
        let args: DeleteArgs = parse_args(&json!({"site": "a", "id": 9, "force": true})).unwrap();
        assert_eq!(args.id, 9);
    }

    #[test]
    fn test_parse_upload_args() {
        let args: UploadArgs =
            parse_args(&json!({"file": "bytes", "filename": "cat.png"})).unwrap();
        assert_eq!(args.site, "default_test");
        assert_eq!(args.filename, "cat.png");
        assert!(args.data.is_none());
    }

    #[test]
    fn test_parse_media_delete_force_defaults_off() {
        let args: MediaDeleteArgs = parse_args(&json!({"id": 12})).unwrap();
        assert!(!args.force);

        let args: MediaDeleteArgs = parse_args(&json!({"id": 12, "force": true})).unwrap();
        assert!(args.force);
    }
}
