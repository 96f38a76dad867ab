pub mod composer;
pub mod export;
pub mod form;
pub mod llm;
pub mod local;
pub mod pipeline;
pub mod prompt;
