pub mod commands;
pub mod output;

pub use commands::{
    BackendArgs, CategoriesArgs, ClassifyArgs, CliArgs, Commands, ContextArgs, FeedbackArgs,
    ScanArgs, SuggestArgs,
};
pub use output::{OutputFormat, OutputFormatter};
