//! Intent resolver: matcher first, language model on a miss.

use std::sync::Arc;

use courier_core::{Instruction, OperationRegistry};

use crate::error::ResolveError;
use crate::llm::LanguageModelClient;
use crate::matcher::{Candidate, DeterministicMatcher};
use crate::parse;
use crate::prompt::PromptBuilder;

/// Turns free text into a validated [`Instruction`].
///
/// The matcher runs first and, when it fires, the language model is never
/// called. Otherwise the model is prompted once; malformed output is a
/// [`ResolveError::Parse`] and is not retried.
pub struct IntentResolver {
    registry: Arc<OperationRegistry>,
    matcher: DeterministicMatcher,
    prompts: PromptBuilder,
    client: Arc<dyn LanguageModelClient>,
}

impl IntentResolver {
    pub fn new(registry: Arc<OperationRegistry>, client: Arc<dyn LanguageModelClient>) -> Self {
        let matcher = DeterministicMatcher::new(&registry);
        let prompts = PromptBuilder::new(&registry);
        Self {
            registry,
            matcher,
            prompts,
            client,
        }
    }

    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    /// The exact prompt the model would receive for `text`.
    pub fn prompt_for(&self, text: &str) -> String {
        self.prompts.build(text)
    }

    pub async fn resolve(&self, text: &str) -> Result<Instruction, ResolveError> {
        if let Some(candidate) = self.matcher.match_text(text) {
            let instruction = self.validate(candidate)?;
            tracing::info!(
                operation = %instruction.operation(),
                path = "matcher",
                "Resolved instruction"
            );
            return Ok(instruction);
        }

        let prompt = self.prompt_for(text);
        tracing::debug!(client = self.client.name(), prompt = %prompt, "Prompting language model");
        let raw = self.client.complete(&prompt).await.map_err(|e| {
            tracing::warn!(client = self.client.name(), error = %e, "Language model call failed");
            ResolveError::from(e)
        })?;
        tracing::debug!(output = %raw, "Language model output");

        let candidate = parse::parse_candidate(&raw).map_err(|e| {
            tracing::warn!(error = %e, "Unusable language model output");
            e
        })?;
        let instruction = self.validate(candidate)?;
        tracing::info!(
            operation = %instruction.operation(),
            path = "llm",
            "Resolved instruction"
        );
        Ok(instruction)
    }

    fn validate(&self, candidate: Candidate) -> Result<Instruction, ResolveError> {
        Ok(self
            .registry
            .validate(&candidate.operation, &candidate.parameters)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LlmError;
    use crate::llm::ScriptedClient;
    use courier_core::ValidationError;

    fn resolver(client: Arc<ScriptedClient>) -> IntentResolver {
        let registry = Arc::new(OperationRegistry::standard().unwrap());
        IntentResolver::new(registry, client)
    }

    #[tokio::test]
    async fn test_matcher_path_skips_llm() {
        let client = Arc::new(ScriptedClient::failing(LlmError::Unavailable));
        let r = resolver(client.clone());
        let inst = r.resolve("list photos").await.unwrap();
        assert_eq!(inst.operation(), "list_photos");
        assert!(inst.parameters().is_empty());
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_matcher_candidate_is_validated() {
        let client = Arc::new(ScriptedClient::failing(LlmError::Unavailable));
        let r = resolver(client.clone());
        let inst = r.resolve("create album").await.unwrap();
        assert_eq!(inst.get_str("album_name"), Some("New Album"));

        let err = r.resolve("search my photo library").await.unwrap_err();
        assert_eq!(
            err,
            ResolveError::Validation(ValidationError::MissingParameter("tag".into()))
        );
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_llm_path() {
        let client = Arc::new(ScriptedClient::always(
            r#"{"operation":"star_repository","owner":"octocat","repo":"hello"}"#,
        ));
        let r = resolver(client.clone());
        let inst = r.resolve("Star octocat/hello").await.unwrap();
        assert_eq!(inst.operation(), "star_repository");
        assert_eq!(inst.get_str("owner"), Some("octocat"));
        assert_eq!(inst.get_str("repo"), Some("hello"));
        assert_eq!(client.call_count(), 1);
        assert_eq!(client.prompts(), vec![r.prompt_for("Star octocat/hello")]);
    }

    #[tokio::test]
    async fn test_llm_garbage_is_parse_error() {
        let client = Arc::new(ScriptedClient::always("I cannot help"));
        let err = resolver(client.clone())
            .resolve("do something vague")
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::Parse(_)));
        // no retry
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn test_llm_failure_is_upstream() {
        let client = Arc::new(ScriptedClient::failing(LlmError::Timeout(30)));
        let err = resolver(client).resolve("do something vague").await.unwrap_err();
        assert_eq!(err, ResolveError::Upstream(LlmError::Timeout(30)));
    }

    #[tokio::test]
    async fn test_llm_unknown_operation() {
        let client = Arc::new(ScriptedClient::always(r#"{"operation":"launch_rocket"}"#));
        let err = resolver(client).resolve("launch a rocket").await.unwrap_err();
        assert_eq!(
            err,
            ResolveError::Validation(ValidationError::UnknownOperation("launch_rocket".into()))
        );
    }

    #[tokio::test]
    async fn test_llm_missing_parameter() {
        let client = Arc::new(ScriptedClient::always(
            r#"{"operation":"create_repository","scope":"private"}"#,
        ));
        let err = resolver(client).resolve("make me a repo").await.unwrap_err();
        assert_eq!(
            err,
            ResolveError::Validation(ValidationError::MissingParameter("name".into()))
        );
    }

    #[tokio::test]
    async fn test_llm_operation_name_normalized() {
        let client = Arc::new(ScriptedClient::always(
            "```json\n{\"operation\": \" Create Repository \", \"name\": \"demo\", \"add_readme\": \"True\"}\n```",
        ));
        let inst = resolver(client).resolve("new repo demo with readme").await.unwrap();
        assert_eq!(inst.operation(), "create_repository");
        assert_eq!(inst.get_bool("add_readme"), Some(true));
        assert_eq!(inst.get_str("scope"), Some("public"));
    }

    #[test]
    fn test_prompt_for_lists_registry() {
        let r = resolver(Arc::new(ScriptedClient::new(Vec::new())));
        let prompt = r.prompt_for("hello");
        for name in r.registry().names() {
            assert!(prompt.contains(name), "prompt lacks {}", name);
        }
    }
}
