pub mod prompt;

pub use prompt::PromptPermission;
