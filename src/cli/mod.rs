pub mod commands;
pub mod output;
pub mod util;

pub use output::Output;
pub use util::{read_optional_file, resolve_gemini_key, resolve_host, resolve_token};
