//! mc-mcp: the catalog as Model Context Protocol tools.
//!
//! Serves `add_media`, `list_media` and `rate_media` over stdio so an MCP
//! client (an assistant or an IDE) can drive the same [`Catalog`] the HTTP
//! API and the CLI use. Results come back as JSON text in the HTTP response
//! shape; catalog errors come back as tool errors, not protocol errors.

use mc_catalog::{Catalog, ListCriteria, MediaRef};
use mc_core::{Error, MediaId, MediaItem, NewMedia};
use std::future::Future;
use mc_server::routes::media::{parse_genre, parse_kind, MediaResponse};
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::tool::Parameters;
use rmcp::model::{CallToolResult, Content, ErrorData, ServerCapabilities, ServerInfo};
use rmcp::{schemars, tool, tool_handler, tool_router, ServerHandler, ServiceExt};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddMediaArgs {
    /// Title, required.
    pub title: String,
    pub release_year: i32,
    /// `movie` or `series`, any case.
    pub kind: String,
    /// Optional genre, for example `Drama` or `science fiction`.
    pub genre: Option<String>,
    /// Initial rating from 0 to 10.
    pub rating: Option<f64>,
    #[serde(default)]
    pub watched: bool,
}

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct ListMediaArgs {
    /// `movie` or `series`, any case.
    pub kind: Option<String>,
    pub watched: Option<bool>,
    pub genre: Option<String>,
    pub rating_min: Option<f64>,
    pub rating_max: Option<f64>,
    /// Case-insensitive title substring.
    pub search: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RateMediaArgs {
    /// New rating from 0 to 10.
    pub rating: f64,
    /// Media id. Takes precedence over `title`.
    pub id: Option<String>,
    /// Exact title, used when no id is given.
    pub title: Option<String>,
}

/// MCP server exposing the catalog operations.
#[derive(Clone)]
pub struct CatalogTools {
    catalog: Catalog,
    shutdown: CancellationToken,
    tool_router: ToolRouter<Self>,
}

impl CatalogTools {
    pub async fn add(&self, args: AddMediaArgs) -> mc_core::Result<MediaItem> {
        let kind = parse_kind(Some(args.kind.as_str()))?
            .ok_or_else(|| Error::invalid("kind is required: movie or series"))?;
        let draft = NewMedia {
            title: args.title,
            release_year: args.release_year,
            kind,
            genre: args.genre,
            rating: args.rating,
            watched: args.watched,
        };
        self.catalog.add_media(draft, &self.call_token()).await
    }

    pub async fn list(&self, args: ListMediaArgs) -> mc_core::Result<Vec<MediaItem>> {
        let defaults = ListCriteria::default();
        let criteria = ListCriteria {
            search: args.search,
            kind: parse_kind(args.kind.as_deref())?,
            genre: parse_genre(args.genre.as_deref())?,
            watched: args.watched,
            rating_min: args.rating_min,
            rating_max: args.rating_max,
            page: args.page.unwrap_or(defaults.page),
            page_size: args.page_size.unwrap_or(defaults.page_size),
            ..defaults
        };
        self.catalog.list_media(&criteria, &self.call_token()).await
    }

    pub async fn rate(&self, args: RateMediaArgs) -> mc_core::Result<MediaItem> {
        let id = args
            .id
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map(|raw| {
                raw.parse::<MediaId>()
                    .map_err(|_| Error::invalid(format!("Invalid media ID '{raw}'")))
            })
            .transpose()?;
        let target = MediaRef {
            id,
            title: args.title,
        };
        if !target.is_specified() {
            return Err(Error::invalid("either an id or a title is required"));
        }
        self.catalog
            .rate_media(&target, args.rating, &self.call_token())
            .await
    }

    fn call_token(&self) -> CancellationToken {
        self.shutdown.child_token()
    }
}

#[tool_router]
impl CatalogTools {
    pub fn new(catalog: Catalog, shutdown: CancellationToken) -> Self {
        Self {
            catalog,
            shutdown,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "Add a movie or series to the catalog")]
    async fn add_media(
        &self,
        Parameters(args): Parameters<AddMediaArgs>,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        tool_result(self.add(args).await.map(|item| MediaResponse::from_model(&item)))
    }

    #[tool(description = "List catalog entries, optionally filtered by kind, genre, watched state and rating range")]
    async fn list_media(
        &self,
        Parameters(args): Parameters<ListMediaArgs>,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        tool_result(self.list(args).await.map(|items| {
            items
                .iter()
                .map(MediaResponse::from_model)
                .collect::<Vec<_>>()
        }))
    }

    #[tool(description = "Rate a catalog entry identified by id or exact title")]
    async fn rate_media(
        &self,
        Parameters(args): Parameters<RateMediaArgs>,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        tool_result(self.rate(args).await.map(|item| MediaResponse::from_model(&item)))
    }
}

#[tool_handler]
impl ServerHandler for CatalogTools {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Media catalog of movies and series: add entries, list them with filters, rate them."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

/// Catalog failures become tool errors the client can show to the model.
fn tool_result<T: Serialize>(outcome: mc_core::Result<T>) -> std::result::Result<CallToolResult, ErrorData> {
    match outcome {
        Ok(value) => {
            let json = serde_json::to_string_pretty(&value)
                .map_err(|e| ErrorData::internal_error(e.to_string(), None))?;
            Ok(CallToolResult::success(vec![Content::text(json)]))
        }
        Err(e) => {
            tracing::debug!(code = e.code(), "Tool call failed: {e}");
            Ok(CallToolResult::error(vec![Content::text(format!(
                "{e} ({})",
                e.code()
            ))]))
        }
    }
}

/// Serve the catalog tools on stdin/stdout until the client disconnects.
pub async fn serve_stdio(catalog: Catalog, shutdown: CancellationToken) -> mc_core::Result<()> {
    tracing::info!("Serving catalog tools over stdio");
    let running = CatalogTools::new(catalog, shutdown)
        .serve(rmcp::transport::stdio())
        .await
        .map_err(|e| Error::Internal(format!("MCP handshake failed: {e}")))?;

    let reason = running
        .waiting()
        .await
        .map_err(|e| Error::Internal(format!("MCP service task failed: {e}")))?;
    tracing::info!(?reason, "MCP session ended");
    Ok(())
}
