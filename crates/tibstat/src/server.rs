//! MCP (Model Context Protocol) server.
//!
//! Exposes segmentation, tallying, word lists, colouring, summaries and term
//! search over stdio. Every tool delegates to `tibstat_core`; dictionaries
//! travel inside the request, so the server keeps no state between calls.

use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::schemars;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use serde::Serialize;

use tibstat_core::{
    Algorithm, AnnotatedResult, Colourizer, RawEntry, SegmentOptions, StepMode, WordPool,
    WordSelection, colour, run_work, search, summary, tally,
};

/// Parameters for the `get_info` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetInfoParams {
    /// Output format: "text" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "text".to_string()
}

/// Parameters for the `segment_text` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct SegmentTextParams {
    /// Tibetan text to segment.
    pub text: String,
    /// Dictionary records to look for; records without an id or word are
    /// skipped.
    pub dictionary: Vec<RawEntry>,
    /// Algorithm; defaults to the server's configured one.
    pub algorithm: Option<Algorithm>,
}

/// Parameters for the `tally_text` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct TallyTextParams {
    /// Text whose words are separated by spaces.
    pub text: String,
    /// Dictionary records to keep; records without an id or word are
    /// skipped.
    pub dictionary: Vec<RawEntry>,
}

/// Parameters for the `list_words` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct ListWordsParams {
    /// Text whose words are separated by spaces.
    pub text: String,
    /// Dictionary records; words found here are left out when selecting new
    /// words.
    #[serde(default)]
    pub dictionary: Vec<RawEntry>,
    /// "new" (default) or "all".
    #[serde(default)]
    pub select: WordSelection,
}

/// Parameters for the `colour_counts` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct ColourCountsParams {
    /// Occurrence counts.
    pub counts: Vec<usize>,
    /// Number of buckets; defaults to the server's configured value.
    pub buckets: Option<u8>,
    /// Step computation; defaults to the server's configured mode.
    pub step_mode: Option<StepMode>,
}

/// Parameters for the `summarize_results` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct SummarizeResultsParams {
    /// Results returned by earlier `segment_text` calls.
    pub results: Vec<AnnotatedResult>,
}

/// Parameters for the `search_term` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct SearchTermParams {
    /// Text to search.
    pub text: String,
    /// Word to look for.
    pub term: String,
}

/// MCP server for Tibetan word statistics.
#[derive(Clone)]
pub struct StatServer {
    options: SegmentOptions,
    max_input: Option<usize>,
    tool_router: rmcp::handler::server::router::tool::ToolRouter<Self>,
}

impl Default for StatServer {
    fn default() -> Self {
        Self::new(SegmentOptions::default(), None)
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, McpError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))
}

#[tool_router]
impl StatServer {
    /// Create a server using `options` as the defaults for every tool.
    pub fn new(options: SegmentOptions, max_input: Option<usize>) -> Self {
        Self {
            options,
            max_input,
            tool_router: Self::tool_router(),
        }
    }

    fn check_input(&self, text: &str) -> Result<(), McpError> {
        match self.max_input {
            Some(max) if text.len() > max => Err(McpError::invalid_params(
                format!("input too large: {} bytes (limit: {max} bytes)", text.len()),
                None,
            )),
            _ => Ok(()),
        }
    }

    fn pool(&self, dictionary: Vec<RawEntry>) -> WordPool {
        WordPool::from_raw(dictionary, &self.options.tables)
    }

    /// Get project information.
    #[tool(description = "Get project name, version, and description")]
    #[tracing::instrument(skip(self), fields(otel.kind = "server"))]
    fn get_info(
        &self,
        Parameters(params): Parameters<GetInfoParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "get_info", format = %params.format, "executing MCP tool");

        let text = if params.format == "json" {
            to_json(&serde_json::json!({
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
                "description": env!("CARGO_PKG_DESCRIPTION"),
                "algorithm": self.options.algorithm.as_str(),
                "colour_buckets": self.options.colourizer.buckets(),
                "step_mode": self.options.colourizer.step_mode().as_str(),
            }))?
        } else {
            format!(
                "{} v{}\n{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                env!("CARGO_PKG_DESCRIPTION"),
            )
        };

        tracing::info!(tool = "get_info", "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Segment text against a dictionary.
    #[tool(
        description = "Find dictionary words in Tibetan text. Returns a status code (1 done, 2 failed), per-word counts with colour buckets, and the text with each match replaced by [id]."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn segment_text(
        &self,
        Parameters(params): Parameters<SegmentTextParams>,
    ) -> Result<CallToolResult, McpError> {
        self.check_input(&params.text)?;
        tracing::debug!(
            tool = "segment_text",
            entries = params.dictionary.len(),
            "executing MCP tool"
        );

        let mut options = self.options.clone();
        if let Some(algorithm) = params.algorithm {
            options.algorithm = algorithm;
        }
        let pool = self.pool(params.dictionary);
        let outcome = run_work(&params.text, &pool, &options);

        tracing::info!(tool = "segment_text", done = outcome.is_done(), "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(to_json(
            &outcome,
        )?)]))
    }

    /// Count dictionary words in already-segmented text.
    #[tool(
        description = "Count dictionary words in text whose words are separated by spaces. Returns rows sorted by count with colour buckets."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn tally_text(
        &self,
        Parameters(params): Parameters<TallyTextParams>,
    ) -> Result<CallToolResult, McpError> {
        self.check_input(&params.text)?;
        tracing::debug!(tool = "tally_text", "executing MCP tool");

        let pool = self.pool(params.dictionary);
        let rows = tally::tally(
            &params.text,
            &pool,
            &self.options.tables,
            &self.options.colourizer,
        )
        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;

        tracing::info!(tool = "tally_text", rows = rows.len(), "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(to_json(&rows)?)]))
    }

    /// List distinct words of segmented text.
    #[tool(
        description = "List the distinct Tibetan words of text whose words are separated by spaces, in first-seen order. With select \"new\" only words missing from the dictionary are listed."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn list_words(
        &self,
        Parameters(params): Parameters<ListWordsParams>,
    ) -> Result<CallToolResult, McpError> {
        self.check_input(&params.text)?;
        tracing::debug!(tool = "list_words", select = %params.select, "executing MCP tool");

        let pool = self.pool(params.dictionary);
        let words = tally::word_list(
            [params.text.as_str()],
            &pool,
            &self.options.tables,
            params.select,
        );

        tracing::info!(tool = "list_words", words = words.len(), "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(to_json(&words)?)]))
    }

    /// Bucket occurrence counts.
    #[tool(
        description = "Assign colour buckets to occurrence counts. Bucket 0 holds the most frequent; returns a count-to-bucket map and a bucket histogram."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn colour_counts(
        &self,
        Parameters(params): Parameters<ColourCountsParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "colour_counts", counts = params.counts.len(), "executing MCP tool");

        let defaults = self.options.colourizer;
        let buckets = params.buckets.unwrap_or(defaults.buckets());
        if buckets == 0 {
            return Err(McpError::invalid_params("buckets must be at least 1", None));
        }
        let colourizer =
            Colourizer::new(buckets, params.step_mode.unwrap_or(defaults.step_mode()));
        let colours = colourizer.divide(params.counts.iter().copied());
        let chart = colour::histogram(&colours);

        tracing::info!(tool = "colour_counts", "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(to_json(
            &serde_json::json!({ "colours": colours, "chart": chart }),
        )?)]))
    }

    /// Merge several segmentation results.
    #[tool(
        description = "Sum the word counts of several segment_text results, recolour them, and return a bucket chart."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn summarize_results(
        &self,
        Parameters(params): Parameters<SummarizeResultsParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(
            tool = "summarize_results",
            results = params.results.len(),
            "executing MCP tool"
        );

        let summary = summary::summarize(
            params.results.iter().map(|r| r.rows.as_slice()),
            &self.options.colourizer,
        )
        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;

        tracing::info!(tool = "summarize_results", rows = summary.rows.len(), "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(to_json(
            &summary,
        )?)]))
    }

    /// Find sentences containing a word.
    #[tool(
        description = "Split Tibetan text into numbered sentences and list those containing the term as a whole word, split around the term."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn search_term(
        &self,
        Parameters(params): Parameters<SearchTermParams>,
    ) -> Result<CallToolResult, McpError> {
        self.check_input(&params.text)?;
        tracing::debug!(tool = "search_term", term = %params.term, "executing MCP tool");

        let result = search::search(&params.text, &params.term, &self.options.tables)
            .map_err(|e| McpError::invalid_params(e.to_string(), None))?;

        tracing::info!(tool = "search_term", hits = result.hits.len(), "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(to_json(
            &result,
        )?)]))
    }
}

#[tool_handler]
impl ServerHandler for StatServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(format!(
                "{} MCP server. Segment Tibetan text against a dictionary, count and colour word frequencies, and search sentences.",
                env!("CARGO_PKG_NAME"),
            )),
        }
    }
}
