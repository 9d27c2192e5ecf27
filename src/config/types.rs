use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure for the harvester
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerSettings,
    #[serde(default)]
    pub browser: BrowserSettings,
    #[serde(default)]
    pub output: OutputSettings,
    #[serde(default)]
    pub extraction: ExtractionSettings,
    /// Ordered output fields and their locators
    #[serde(default)]
    pub selectors: Vec<SelectorEntry>,
}

/// Page traversal and pacing configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerSettings {
    /// Locator for the repeated listing item elements
    #[serde(rename = "item-locator", default = "default_item_locator")]
    pub item_locator: String,

    /// Locator for the "next page" control
    #[serde(rename = "next-page-locator", default = "default_next_page_locator")]
    pub next_page_locator: String,

    /// Fixed wait after navigating to a target (milliseconds)
    #[serde(rename = "initial-load-ms", default = "default_initial_load_ms")]
    pub initial_load_ms: u64,

    /// Random wait after activating the next-page control (milliseconds)
    #[serde(rename = "page-settle-ms", default = "default_page_settle")]
    pub page_settle_ms: DelayRange,

    /// Random wait between targets (milliseconds)
    #[serde(rename = "between-targets-ms", default = "default_between_targets")]
    pub between_targets_ms: DelayRange,

    /// Stop paginating a target after this many pages
    #[serde(rename = "max-pages", default)]
    pub max_pages: Option<usize>,
}

impl Default for CrawlerSettings {
    fn default() -> Self {
        Self {
            item_locator: default_item_locator(),
            next_page_locator: default_next_page_locator(),
            initial_load_ms: default_initial_load_ms(),
            page_settle_ms: default_page_settle(),
            between_targets_ms: default_between_targets(),
            max_pages: None,
        }
    }
}

/// Inclusive range of milliseconds a randomized wait is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DelayRange {
    pub min: u64,
    pub max: u64,
}

impl DelayRange {
    pub const fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    /// A range that always yields zero
    pub const fn zero() -> Self {
        Self { min: 0, max: 0 }
    }
}

/// Which browser engine drives the crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserEngine {
    /// Chrome/Chromium over the DevTools protocol
    #[default]
    Chrome,

    /// Plain HTTP fetches; next-page controls are followed by their href
    Http,
}

/// Browser session configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserSettings {
    #[serde(default)]
    pub engine: BrowserEngine,

    /// Run Chrome without a window
    #[serde(default)]
    pub headless: bool,

    /// Explicit Chrome executable, otherwise auto-detected
    #[serde(rename = "chrome-executable", default)]
    pub chrome_executable: Option<PathBuf>,

    /// Extra Chrome command-line arguments
    #[serde(rename = "chrome-args", default)]
    pub chrome_args: Vec<String>,

    /// User agent sent by the HTTP engine
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout for the HTTP engine (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            engine: BrowserEngine::default(),
            headless: false,
            chrome_executable: None,
            chrome_args: Vec::new(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputSettings {
    /// Directory the per-target files are written to
    #[serde(default = "default_output_directory")]
    pub directory: PathBuf,

    /// File extension of the per-target files
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            extension: default_extension(),
        }
    }
}

/// Field extraction conventions
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionSettings {
    /// Selector name whose value is a link target instead of text
    #[serde(rename = "link-field", default = "default_link_field")]
    pub link_field: String,

    /// Attribute holding the link target
    #[serde(rename = "link-attribute", default = "default_link_attribute")]
    pub link_attribute: String,

    /// Selector name whose spaces are rewritten as thousands separators
    #[serde(rename = "price-field", default = "default_price_field")]
    pub price_field: Option<String>,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            link_field: default_link_field(),
            link_attribute: default_link_attribute(),
            price_field: default_price_field(),
        }
    }
}

/// One output field
#[derive(Debug, Clone, Deserialize)]
pub struct SelectorEntry {
    /// Column name
    pub name: String,

    /// CSS selector resolved within each item
    pub locator: String,
}

/// The URL set document
#[derive(Debug, Clone, Deserialize)]
pub struct TargetsFile {
    #[serde(default, rename = "target")]
    pub targets: Vec<CrawlTarget>,
}

/// One output resource and the listing URL that fills it
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CrawlTarget {
    /// Output resource name (file stem)
    pub name: String,

    /// First listing page
    pub url: String,
}

fn default_item_locator() -> String {
    "[data-marker='item']".to_string()
}

fn default_next_page_locator() -> String {
    "[data-marker='pagination-button/nextPage']".to_string()
}

fn default_initial_load_ms() -> u64 {
    15_000
}

fn default_page_settle() -> DelayRange {
    DelayRange::new(5_000, 9_000)
}

fn default_between_targets() -> DelayRange {
    DelayRange::new(5_000, 17_000)
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_output_directory() -> PathBuf {
    PathBuf::from(".")
}

fn default_extension() -> String {
    "csv".to_string()
}

fn default_link_field() -> String {
    "url".to_string()
}

fn default_link_attribute() -> String {
    "href".to_string()
}

fn default_price_field() -> Option<String> {
    Some("price".to_string())
}
