use anyhow::{Context, Result, bail};
use serde_json::Value;
use tracing::info;

use super::{GenerateArgs, load_config};
use crate::core::config::Secrets;
use crate::core::prompts::Language;
use crate::core::studio::Studio;
use crate::core::studio::generate::GenerateRequest;

pub(crate) fn build_request(args: GenerateArgs) -> Result<GenerateRequest> {
    let input: Value = serde_json::from_str(&args.input).context("--input is not valid JSON")?;
    let Value::Object(input) = input else {
        bail!("--input must be a JSON object");
    };
    Ok(GenerateRequest {
        tool_type: args.tool,
        input,
        language: Language::from_code(&args.lang),
        model: args.model,
    })
}

/// Runs one `ai-generate` call against the configured gateway. The result
/// JSON goes to stdout; logs go to stderr.
pub(super) async fn run_generate(args: GenerateArgs) -> Result<()> {
    let config = load_config(&args.common).await?;
    let request = build_request(args)?;
    let studio = Studio::connect(&config, &Secrets::from_env()).context("building gateway client")?;

    let response = studio.ai_generate(&request).await?;
    println!("{}", serde_json::to_string_pretty(&response.result)?);
    info!("Generated with {}", response.model);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::CommonFlags;

    fn args(input: &str, lang: &str) -> GenerateArgs {
        GenerateArgs {
            common: CommonFlags::default(),
            tool: "product".to_string(),
            input: input.to_string(),
            lang: lang.to_string(),
            model: None,
        }
    }

    #[test]
    fn input_must_be_an_object() {
        assert!(build_request(args("[1,2]", "en")).is_err());
        assert!(build_request(args("{oops", "en")).is_err());
    }

    #[test]
    fn request_carries_language_and_input() {
        let request = build_request(args(r#"{"productName":"Lamp"}"#, "ar")).unwrap();
        assert_eq!(request.language, Language::Arabic);
        assert_eq!(request.input["productName"], "Lamp");
        assert_eq!(request.tool_type, "product");
    }
}
