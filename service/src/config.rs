use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use std::fmt;
use std::str::FromStr;

/// Default LLM API base URL used when `LLM_BASE_URL` is not set.
pub const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";
/// Default HeyGen API base URL used when `HEYGEN_BASE_URL` is not set.
pub const DEFAULT_HEYGEN_BASE_URL: &str = "https://api.heygen.com";
/// Default D-ID API base URL used when `DID_BASE_URL` is not set.
pub const DEFAULT_DID_BASE_URL: &str = "https://api.d-id.com";

#[derive(Clone, Debug, PartialEq)]
pub enum RustEnv {
    Development,
    Production,
    Staging,
}

#[derive(Debug, PartialEq, Eq)]
pub struct RustEnvParseError;

impl FromStr for RustEnv {
    type Err = RustEnvParseError;
    fn from_str(level: &str) -> Result<RustEnv, Self::Err> {
        match level.to_lowercase().as_str() {
            "development" => Ok(RustEnv::Development),
            "production" => Ok(RustEnv::Production),
            "staging" => Ok(RustEnv::Staging),
            _ => Err(RustEnvParseError),
        }
    }
}

impl fmt::Display for RustEnv {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RustEnv::Development => write!(f, "development"),
            RustEnv::Production => write!(f, "production"),
            RustEnv::Staging => write!(f, "staging"),
        }
    }
}

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// The base URL of the LLM text API.
    /// Override in tests to point at a mock server.
    #[arg(long, env, default_value = DEFAULT_LLM_BASE_URL)]
    llm_base_url: String,

    /// The API key to use when calling the LLM text API.
    #[arg(long, env)]
    llm_api_key: Option<String>,

    /// The model identifier requested from the LLM text API.
    #[arg(long, env, default_value = "gpt-4o-mini")]
    llm_model: String,

    /// The base URL of the HeyGen video synthesis API.
    #[arg(long, env, default_value = DEFAULT_HEYGEN_BASE_URL)]
    heygen_base_url: String,

    /// The API key to use when calling the HeyGen API.
    #[arg(long, env)]
    heygen_api_key: Option<String>,

    /// The base URL of the D-ID video synthesis API.
    #[arg(long, env, default_value = DEFAULT_DID_BASE_URL)]
    did_base_url: String,

    /// The API key to use when calling the D-ID API.
    #[arg(long, env)]
    did_api_key: Option<String>,

    /// Ordered list of video synthesis providers to attempt. The first
    /// provider that produces a video wins; later entries are fallbacks.
    #[arg(
        long,
        env,
        value_delimiter = ',',
        use_value_delimiter = true,
        default_value = "heygen,d_id"
    )]
    pub synthesis_providers: Vec<String>,

    /// Seconds between synthesis job status polls
    #[arg(long, env, default_value_t = 3)]
    pub synthesis_poll_interval_secs: u64,

    /// Seconds before an unfinished synthesis job is treated as failed
    #[arg(long, env, default_value_t = 120)]
    pub synthesis_poll_timeout_secs: u64,

    /// Root directory where uploaded reference documents are stored
    #[arg(long, env, default_value = "uploads")]
    document_root: String,

    /// User id to attribute CLI-created uploads to. A random id is used
    /// when not provided.
    #[arg(long, env)]
    user_id: Option<String>,

    /// HCP profile free text for a one-shot generation run
    #[arg(long, env)]
    hcp_text: Option<String>,

    /// Natural-language prompt for a one-shot generation run
    #[arg(long, env)]
    prompt: Option<String>,

    /// Existing upload id to generate against instead of raw HCP text
    #[arg(long, env)]
    upload_id: Option<String>,

    /// Stored path of a reference document to ground the script in
    #[arg(long, env)]
    document_path: Option<String>,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = parse_level_filter,
        )]
    pub log_level_filter: LevelFilter,

    /// Set the Rust runtime environment to use.
    #[arg(
    short,
    long,
    env,
    default_value_t = RustEnv::Development,
    value_parser = parse_rust_env,
    )]
    pub runtime_env: RustEnv,
}

fn parse_level_filter(value: &str) -> Result<LevelFilter, String> {
    LevelFilter::from_str(&value.to_uppercase())
        .map_err(|_| format!("invalid log level: {value}"))
}

fn parse_rust_env(value: &str) -> Result<RustEnv, String> {
    RustEnv::from_str(value).map_err(|_| format!("invalid runtime environment: {value}"))
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    /// Returns the LLM text API base URL.
    pub fn llm_base_url(&self) -> &str {
        &self.llm_base_url
    }

    /// Returns the LLM API key, if configured.
    pub fn llm_api_key(&self) -> Option<String> {
        self.llm_api_key.clone()
    }

    /// Returns the model identifier requested from the LLM text API.
    pub fn llm_model(&self) -> &str {
        &self.llm_model
    }

    /// Returns the HeyGen API base URL.
    pub fn heygen_base_url(&self) -> &str {
        &self.heygen_base_url
    }

    /// Returns the HeyGen API key, if configured.
    pub fn heygen_api_key(&self) -> Option<String> {
        self.heygen_api_key.clone()
    }

    /// Returns the D-ID API base URL.
    pub fn did_base_url(&self) -> &str {
        &self.did_base_url
    }

    /// Returns the D-ID API key, if configured.
    pub fn did_api_key(&self) -> Option<String> {
        self.did_api_key.clone()
    }

    /// Returns the root directory for stored reference documents.
    pub fn document_root(&self) -> &str {
        &self.document_root
    }

    /// Returns the user id for CLI-created uploads, if configured.
    pub fn user_id(&self) -> Option<String> {
        self.user_id.clone()
    }

    /// Returns the HCP text for a one-shot generation run, if provided.
    pub fn hcp_text(&self) -> Option<String> {
        self.hcp_text.clone()
    }

    /// Returns the prompt for a one-shot generation run, if provided.
    pub fn prompt(&self) -> Option<String> {
        self.prompt.clone()
    }

    /// Returns the existing upload id to generate against, if provided.
    pub fn upload_id(&self) -> Option<String> {
        self.upload_id.clone()
    }

    /// Returns the stored reference document path, if provided.
    pub fn document_path(&self) -> Option<String> {
        self.document_path.clone()
    }

    pub fn runtime_env(&self) -> RustEnv {
        self.runtime_env.clone()
    }

    pub fn is_production(&self) -> bool {
        self.runtime_env() == RustEnv::Production
    }
}
