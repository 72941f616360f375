use code_compass::cli::commands::{
    BackendArgs, CatalogArgs, CategoriesArgs, ClassifyArgs, CliArgs, Commands, ContextArgs,
    FeedbackArgs, ScanArgs, SuggestArgs,
};
use code_compass::cli::output::{Classification, OutputFormat, OutputFormatter, SuggestionReport};
use code_compass::util::logging::{cli_config, init_logging, parse_level};
use code_compass::{
    classify, scan_directory, BackendError, CompassClient, CompassConfig, ContextAssembler,
    ContextOutcome, Document, Extraction, ExtractorRegistry, Language, ModuleResolver, ScanConfig,
    SuggestionIndex, NAME, VERSION,
};

use async_trait::async_trait;
use clap::Parser;
use std::fs;
use std::path::Path;
use std::process;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, error, info, warn, Level};

const EXIT_OK: i32 = 0;
const EXIT_FAILURE: i32 = 1;
const EXIT_UNSUPPORTED: i32 = 2;

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("{} v{} starting", NAME, VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Classify(classify_args) => handle_classify(classify_args),
        Commands::Context(context_args) => handle_context(context_args).await,
        Commands::Scan(scan_args) => handle_scan(scan_args),
        Commands::Suggest(suggest_args) => handle_suggest(suggest_args).await,
        Commands::Categories(categories_args) => handle_categories(categories_args).await,
        Commands::Intents(catalog_args) => handle_intents(catalog_args).await,
        Commands::Libs(catalog_args) => handle_libs(catalog_args).await,
        Commands::Feedback(feedback_args) => handle_feedback(feedback_args).await,
    };

    process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs) {
    let level = if let Some(level_str) = &args.log_level {
        Some(parse_level(level_str))
    } else if args.verbose {
        Some(Level::DEBUG)
    } else if args.quiet {
        Some(Level::ERROR)
    } else {
        None
    };

    init_logging(cli_config(level, args.verbose));
}

fn emit(output: anyhow::Result<String>) -> bool {
    match output {
        Ok(text) => {
            println!("{}", text);
            true
        }
        Err(e) => {
            error!("Failed to format output: {:#}", e);
            false
        }
    }
}

fn build_config(args: &BackendArgs) -> Result<CompassConfig, String> {
    let mut config = CompassConfig::default();
    if let Some(server) = &args.server {
        config = config.with_server_url(server).map_err(|e| e.to_string())?;
    }
    if let Some(proxy) = &args.proxy {
        config.proxy = Some(proxy.clone()).filter(|p| !p.is_empty());
    }
    if let Some(timeout) = args.timeout {
        config.request_timeout_secs = timeout;
    }
    config.validate().map_err(|e| e.to_string())?;
    config.with_persisted_user_key().map_err(|e| e.to_string())
}

fn try_build_client(args: &BackendArgs) -> Result<CompassClient, String> {
    let config = build_config(args).map_err(|e| format!("Invalid configuration: {}", e))?;
    debug!("{}", config);
    CompassClient::new(&config).map_err(|e| format!("Failed to create backend client: {}", e))
}

fn build_client(args: &BackendArgs) -> Option<CompassClient> {
    match try_build_client(args) {
        Ok(client) => Some(client),
        Err(e) => {
            error!("{}", e);
            None
        }
    }
}

/// Resolver that builds the backend client on first use.
///
/// Extraction of JavaScript and Python input never resolves packages, so it
/// never reads the backend configuration or touches the persisted user key.
struct LazyClient {
    backend: BackendArgs,
    client: OnceCell<CompassClient>,
}

impl LazyClient {
    fn new(backend: BackendArgs) -> Self {
        Self {
            backend,
            client: OnceCell::new(),
        }
    }
}

#[async_trait]
impl ModuleResolver for LazyClient {
    async fn resolve(
        &self,
        language: Language,
        packages: &[String],
    ) -> Result<Vec<String>, BackendError> {
        let client = self
            .client
            .get_or_try_init(|| async {
                try_build_client(&self.backend)
                    .map_err(|message| BackendError::ConfigurationError { message })
            })
            .await?;
        client.resolve(language, packages).await
    }
}

fn read_document(path: &Path) -> Option<Document> {
    match fs::read_to_string(path) {
        Ok(text) => Some(Document::new(path.to_string_lossy(), text)),
        Err(e) => {
            error!("Failed to read {}: {}", path.display(), e);
            None
        }
    }
}

fn handle_classify(args: &ClassifyArgs) -> i32 {
    let kind = classify(&args.file);
    let formatter = OutputFormatter::new(args.format.into());
    if !emit(formatter.format_classification(&Classification::new(&args.file, kind))) {
        return EXIT_FAILURE;
    }
    if kind.is_supported() {
        EXIT_OK
    } else {
        EXIT_UNSUPPORTED
    }
}

async fn handle_context(args: &ContextArgs) -> i32 {
    let mut documents = Vec::with_capacity(args.files.len());
    for path in &args.files {
        match read_document(path) {
            Some(doc) => documents.push(doc),
            None => return EXIT_FAILURE,
        }
    }

    let assembler = ContextAssembler::new(Arc::new(LazyClient::new(args.backend.clone())));
    let (active, visible) = match documents.split_first() {
        Some((active, rest)) => (Some(active), rest),
        None => (None, &documents[..]),
    };

    let outcome = match assembler.extract_active(active, visible).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(language = %e.language(), "{}", e);
            return EXIT_FAILURE;
        }
    };

    let formatter = OutputFormatter::new(args.format.into());
    if !emit(formatter.format_outcome(&outcome)) {
        return EXIT_FAILURE;
    }

    match outcome {
        ContextOutcome::Extracted(_) => EXIT_OK,
        ContextOutcome::Unsupported { .. } | ContextOutcome::NoDocument => EXIT_UNSUPPORTED,
    }
}

fn handle_scan(args: &ScanArgs) -> i32 {
    let config = ScanConfig {
        max_depth: args.max_depth,
        max_files: args.max_files,
        include_hidden: args.hidden,
        ..ScanConfig::default()
    };

    let result = match scan_directory(&args.directory, &ExtractorRegistry::with_defaults(), &config)
    {
        Ok(result) => result,
        Err(e) => {
            error!("Scan failed: {}", e);
            return EXIT_FAILURE;
        }
    };

    let formatter = OutputFormatter::new(args.format.into());
    if emit(formatter.format_scan(&result)) {
        EXIT_OK
    } else {
        EXIT_FAILURE
    }
}

/// Reads one file and extracts its context, reporting failures on the way.
async fn context_for_file(
    path: &Path,
    client: &CompassClient,
    format: OutputFormat,
) -> Result<Extraction, i32> {
    let document = read_document(path).ok_or(EXIT_FAILURE)?;
    let assembler = ContextAssembler::new(Arc::new(client.clone()));

    match assembler
        .extract_context(&document.file_name, &document.text)
        .await
    {
        Ok(ContextOutcome::Extracted(extraction)) => Ok(extraction),
        Ok(outcome) => {
            emit(OutputFormatter::new(format).format_outcome(&outcome));
            Err(EXIT_UNSUPPORTED)
        }
        Err(e) => {
            error!(language = %e.language(), "{}", e);
            Err(EXIT_FAILURE)
        }
    }
}

async fn handle_suggest(args: &SuggestArgs) -> i32 {
    let Some(client) = build_client(&args.backend) else {
        return EXIT_FAILURE;
    };
    let format = args.format.into();
    let extraction = match context_for_file(&args.file, &client, format).await {
        Ok(extraction) => extraction,
        Err(code) => return code,
    };

    info!(intent = %args.intent, "Searching for suggestions");
    let mut response = match client
        .search_by_intent(
            extraction.language,
            &extraction.context,
            &args.intent,
            args.filter.as_deref(),
        )
        .await
    {
        Ok(response) => response,
        Err(e) => {
            error!("Search failed: {}", e);
            return EXIT_FAILURE;
        }
    };

    match client.snippets(extraction.language).await {
        Ok(snippets) => {
            let attached = response.attach_snippets(&snippets);
            debug!("Attached {} snippets", attached);
        }
        Err(e) => warn!("Could not load snippets from server: {}", e),
    }

    let index = SuggestionIndex::from_response(&response);
    let report = SuggestionReport {
        language: extraction.language,
        intent: &args.intent,
        context: extraction.context.as_slice(),
        suggestions: &response,
        index: &index,
    };

    if emit(OutputFormatter::new(format).format_suggestions(&report)) {
        EXIT_OK
    } else {
        EXIT_FAILURE
    }
}

async fn handle_categories(args: &CategoriesArgs) -> i32 {
    let Some(client) = build_client(&args.backend) else {
        return EXIT_FAILURE;
    };
    let format = args.format.into();
    let extraction = match context_for_file(&args.file, &client, format).await {
        Ok(extraction) => extraction,
        Err(code) => return code,
    };

    let categories = match client
        .nearest_categories(
            extraction.language,
            args.num,
            &extraction.context,
            args.filter.as_deref(),
        )
        .await
    {
        Ok(categories) => categories,
        Err(e) => {
            error!("Category lookup failed: {}", e);
            return EXIT_FAILURE;
        }
    };

    if emit(OutputFormatter::new(format).format_categories(&categories)) {
        EXIT_OK
    } else {
        EXIT_FAILURE
    }
}

async fn handle_intents(args: &CatalogArgs) -> i32 {
    let Some(client) = build_client(&args.backend) else {
        return EXIT_FAILURE;
    };
    let language = args.language.into();

    let intents = match client.intents(language).await {
        Ok(intents) => intents,
        Err(e) => {
            error!("Failed to download intents: {}", e);
            return EXIT_FAILURE;
        }
    };

    if emit(OutputFormatter::new(args.format.into()).format_intents(language, &intents)) {
        EXIT_OK
    } else {
        EXIT_FAILURE
    }
}

async fn handle_libs(args: &CatalogArgs) -> i32 {
    let Some(client) = build_client(&args.backend) else {
        return EXIT_FAILURE;
    };
    let language = args.language.into();

    let libs = match client.libs(language).await {
        Ok(libs) => libs,
        Err(e) => {
            error!("Failed to download libraries: {}", e);
            return EXIT_FAILURE;
        }
    };

    if emit(OutputFormatter::new(args.format.into()).format_libs(language, &libs)) {
        EXIT_OK
    } else {
        EXIT_FAILURE
    }
}

async fn handle_feedback(args: &FeedbackArgs) -> i32 {
    let Some(client) = build_client(&args.backend) else {
        return EXIT_FAILURE;
    };

    let mut body = serde_json::json!({ "message": args.message });
    if let Some(module) = &args.module {
        body["module"] = serde_json::Value::String(module.clone());
    }

    match client.feedback(&body).await {
        Ok(()) => EXIT_OK,
        Err(e) => {
            error!("Failed to send feedback: {}", e);
            EXIT_FAILURE
        }
    }
}
