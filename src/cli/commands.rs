use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Dependency-context extraction and library recommendations
#[derive(Parser, Debug)]
#[command(
    name = "compass",
    about = "Extract dependency contexts from source files and query library recommendations",
    version,
    author,
    long_about = "compass reads Java, JavaScript and Python sources as well as pom.xml, \
                  package.json and requirements.txt manifests, extracts the external \
                  dependencies they declare, and uses that context to ask the recommendation \
                  backend for libraries matching an intent."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Show how a file name is classified",
        long_about = "Prints the supported kind and language for a file name. The file does \
                      not need to exist.\n\n\
                      Examples:\n  \
                      compass classify pom.xml\n  \
                      compass classify src/App.JAVA"
    )]
    Classify(ClassifyArgs),

    #[command(
        about = "Extract the dependency context of a document",
        long_about = "Extracts the dependency context of the first file. If it is not a \
                      supported type, the next file is used instead. Java package imports are \
                      resolved into modules through the backend.\n\n\
                      Examples:\n  \
                      compass context src/Main.java\n  \
                      compass context README.md requirements.txt --format json"
    )]
    Context(ContextArgs),

    #[command(
        about = "Extract dependency contexts for every file in a directory",
        long_about = "Walks a directory (respecting .gitignore) and prints the dependency \
                      context of every supported file. Java packages are not resolved.\n\n\
                      Examples:\n  \
                      compass scan .\n  \
                      compass scan ~/src/project --format json"
    )]
    Scan(ScanArgs),

    #[command(
        about = "Suggest libraries for an intent",
        long_about = "Extracts the context of a file and asks the backend for libraries that \
                      match an intent.\n\n\
                      Examples:\n  \
                      compass suggest app.py --intent \"parse csv\"\n  \
                      compass suggest pom.xml --intent json --filter jackson"
    )]
    Suggest(SuggestArgs),

    #[command(
        about = "Show the nearest library categories for a file",
        long_about = "Extracts the context of a file and asks the backend for the nearest \
                      library categories.\n\n\
                      Examples:\n  \
                      compass categories package.json\n  \
                      compass categories Main.java --num 10 --filter http"
    )]
    Categories(CategoriesArgs),

    #[command(
        about = "List the intents the backend knows for a language",
        long_about = "Lists the intents that can be passed to `compass suggest`.\n\n\
                      Examples:\n  \
                      compass intents java\n  \
                      compass intents python --format json"
    )]
    Intents(CatalogArgs),

    #[command(
        about = "List the libraries the backend knows for a language",
        long_about = "Downloads the library catalogue of a language.\n\n\
                      Examples:\n  \
                      compass libs js\n  \
                      compass libs java --format yaml"
    )]
    Libs(CatalogArgs),

    #[command(about = "Send feedback to the recommendation backend")]
    Feedback(FeedbackArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ClassifyArgs {
    #[arg(value_name = "FILE", help = "File name to classify")]
    pub file: String,

    #[arg(short = 'f', long, value_enum, default_value = "human", help = "Output format")]
    pub format: OutputFormatArg,
}

#[derive(Args, Debug, Clone, Default)]
pub struct BackendArgs {
    #[arg(long, value_name = "URL", help = "Backend URL (overrides COMPASS_SERVER_URL)")]
    pub server: Option<String>,

    #[arg(long, value_name = "URL", help = "Proxy URL (overrides COMPASS_PROXY)")]
    pub proxy: Option<String>,

    #[arg(
        long,
        value_name = "SECONDS",
        help = "Request timeout in seconds (overrides COMPASS_REQUEST_TIMEOUT)"
    )]
    pub timeout: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct ContextArgs {
    #[arg(
        value_name = "FILES",
        help = "Active document followed by other open documents"
    )]
    pub files: Vec<PathBuf>,

    #[arg(short = 'f', long, value_enum, default_value = "human", help = "Output format")]
    pub format: OutputFormatArg,

    #[command(flatten)]
    pub backend: BackendArgs,
}

#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    #[arg(value_name = "DIR", help = "Directory to scan")]
    pub directory: PathBuf,

    #[arg(short = 'f', long, value_enum, default_value = "human", help = "Output format")]
    pub format: OutputFormatArg,

    #[arg(long, value_name = "N", default_value = "20", help = "Maximum directory depth")]
    pub max_depth: usize,

    #[arg(
        long,
        value_name = "N",
        default_value = "10000",
        help = "Maximum number of supported files to read"
    )]
    pub max_files: usize,

    #[arg(long, help = "Include hidden files and directories")]
    pub hidden: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SuggestArgs {
    #[arg(value_name = "FILE", help = "File providing the dependency context")]
    pub file: PathBuf,

    #[arg(short = 'i', long, value_name = "TEXT", help = "What the library should do")]
    pub intent: String,

    #[arg(long, value_name = "TEXT", help = "Restrict results to matching modules")]
    pub filter: Option<String>,

    #[arg(short = 'f', long, value_enum, default_value = "human", help = "Output format")]
    pub format: OutputFormatArg,

    #[command(flatten)]
    pub backend: BackendArgs,
}

#[derive(Args, Debug, Clone)]
pub struct CategoriesArgs {
    #[arg(value_name = "FILE", help = "File providing the dependency context")]
    pub file: PathBuf,

    #[arg(short = 'n', long, value_name = "N", default_value = "5", help = "Number of categories")]
    pub num: usize,

    #[arg(long, value_name = "TEXT", help = "Restrict results to matching categories")]
    pub filter: Option<String>,

    #[arg(short = 'f', long, value_enum, default_value = "human", help = "Output format")]
    pub format: OutputFormatArg,

    #[command(flatten)]
    pub backend: BackendArgs,
}

#[derive(Args, Debug, Clone)]
pub struct CatalogArgs {
    #[arg(value_name = "LANGUAGE", value_enum, help = "Language to list")]
    pub language: LanguageArg,

    #[arg(short = 'f', long, value_enum, default_value = "human", help = "Output format")]
    pub format: OutputFormatArg,

    #[command(flatten)]
    pub backend: BackendArgs,
}

#[derive(Args, Debug, Clone)]
pub struct FeedbackArgs {
    #[arg(value_name = "MESSAGE", help = "Feedback text")]
    pub message: String,

    #[arg(long, value_name = "MODULE", help = "Module the feedback refers to")]
    pub module: Option<String>,

    #[command(flatten)]
    pub backend: BackendArgs,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageArg {
    Java,
    Js,
    Python,
}

impl From<LanguageArg> for crate::extract::Language {
    fn from(arg: LanguageArg) -> Self {
        match arg {
            LanguageArg::Java => crate::extract::Language::Java,
            LanguageArg::Js => crate::extract::Language::Js,
            LanguageArg::Python => crate::extract::Language::Python,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_args_verify() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_context_defaults() {
        let args = CliArgs::parse_from(["compass", "context", "Main.java", "pom.xml"]);
        match args.command {
            Commands::Context(context) => {
                assert_eq!(context.files.len(), 2);
                assert_eq!(context.format, OutputFormatArg::Human);
                assert!(context.backend.server.is_none());
                assert!(context.backend.timeout.is_none());
            }
            _ => panic!("Expected Context command"),
        }
    }

    #[test]
    fn test_context_without_files() {
        let args = CliArgs::parse_from(["compass", "context"]);
        assert!(matches!(args.command, Commands::Context(c) if c.files.is_empty()));
    }

    #[test]
    fn test_suggest_requires_intent() {
        assert!(CliArgs::try_parse_from(["compass", "suggest", "app.py"]).is_err());

        let args = CliArgs::parse_from([
            "compass", "suggest", "app.py", "--intent", "parse csv", "--filter", "pandas",
            "--server", "http://localhost:5000",
        ]);
        match args.command {
            Commands::Suggest(suggest) => {
                assert_eq!(suggest.intent, "parse csv");
                assert_eq!(suggest.filter.as_deref(), Some("pandas"));
                assert_eq!(suggest.backend.server.as_deref(), Some("http://localhost:5000"));
            }
            _ => panic!("Expected Suggest command"),
        }
    }

    #[test]
    fn test_categories_defaults() {
        let args = CliArgs::parse_from(["compass", "categories", "package.json"]);
        match args.command {
            Commands::Categories(categories) => {
                assert_eq!(categories.num, 5);
                assert!(categories.filter.is_none());
            }
            _ => panic!("Expected Categories command"),
        }
    }

    #[test]
    fn test_catalog_commands() {
        let args = CliArgs::parse_from(["compass", "intents", "python", "-f", "json"]);
        match args.command {
            Commands::Intents(catalog) => {
                assert_eq!(catalog.language, LanguageArg::Python);
                assert_eq!(catalog.format, OutputFormatArg::Json);
            }
            _ => panic!("Expected Intents command"),
        }

        let args = CliArgs::parse_from(["compass", "libs", "js"]);
        assert!(matches!(
            args.command,
            Commands::Libs(c) if crate::extract::Language::from(c.language) == crate::extract::Language::Js
        ));
        assert!(CliArgs::try_parse_from(["compass", "libs", "rust"]).is_err());
    }

    #[test]
    fn test_global_flags() {
        let args = CliArgs::parse_from(["compass", "classify", "a.py", "-v"]);
        assert!(args.verbose);
        assert!(CliArgs::try_parse_from(["compass", "-v", "-q", "classify", "a.py"]).is_err());

        let args = CliArgs::parse_from(["compass", "--log-level", "trace", "scan", "."]);
        assert_eq!(args.log_level.as_deref(), Some("trace"));
    }
}
