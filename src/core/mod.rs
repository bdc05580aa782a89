pub mod backend;
pub mod catalog;
pub mod coerce;
pub mod config;
pub mod llm;
pub mod media;
pub mod prompts;
pub mod studio;
pub mod terminal;

#[cfg(test)]
pub(crate) mod test_support;
