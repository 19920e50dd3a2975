//! Prompt construction for the language model path.

use courier_core::OperationRegistry;

/// Builds the classification prompt from a registry.
///
/// The catalog section is rendered once from [`OperationRegistry::describe`],
/// so the same registry and text always give the same prompt.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    catalog: String,
}

impl PromptBuilder {
    pub fn new(registry: &OperationRegistry) -> Self {
        let catalog = registry
            .describe()
            .iter()
            .map(|spec| {
                if spec.description.is_empty() {
                    format!("- {}", spec.signature())
                } else {
                    format!("- {}: {}", spec.signature(), spec.description)
                }
            })
            .collect::<Vec<_>>()
            .join("\n");
        Self { catalog }
    }

    /// The rendered operation catalog, one line per operation.
    pub fn catalog(&self) -> &str {
        &self.catalog
    }

    pub fn build(&self, text: &str) -> String {
        // JSON-quote the request so quotes and newlines in it cannot break
        // the surrounding instructions.
        let quoted = serde_json::to_string(text).unwrap_or_else(|_| format!("\"{}\"", text));
        format!(
            "Convert the user's request into exactly one of the operations below.\n\
             \n\
             Operations (required parameters first, optional ones in brackets with their defaults):\n\
             {catalog}\n\
             \n\
             Output format:\n\
             - Return a single JSON object and nothing else.\n\
             - Set the key \"operation\" to one of the operation names above.\n\
             - Add one key per parameter you can fill from the request.\n\
             - No prose, no explanations, no markdown code fences.\n\
             \n\
             Request: {quoted}",
            catalog = self.catalog,
            quoted = quoted,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_core::{OperationRegistry, OperationSpec, ParamType};

    fn registry() -> OperationRegistry {
        OperationRegistry::builder()
            .operation(OperationSpec::new("list_photos").describe("List photos"))
            .operation(
                OperationSpec::new("star_repository")
                    .describe("Star a repository")
                    .required("owner", ParamType::String)
                    .required("repo", ParamType::String),
            )
            .operation(OperationSpec::new("list_albums"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_catalog_lines_in_registry_order() {
        let builder = PromptBuilder::new(&registry());
        assert_eq!(
            builder.catalog(),
            "- list_photos(): List photos\n\
             - star_repository(owner: string, repo: string): Star a repository\n\
             - list_albums()"
        );
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let a = PromptBuilder::new(&registry()).build("Star octocat/hello");
        let b = PromptBuilder::new(&registry()).build("Star octocat/hello");
        assert_eq!(a, b);
    }

    #[test]
    fn test_prompt_contents() {
        let prompt = PromptBuilder::new(&registry()).build("Star octocat/hello");
        assert!(prompt.contains("star_repository(owner: string, repo: string)"));
        assert!(prompt.contains("\"operation\""));
        assert!(prompt.contains("no markdown code fences"));
        assert!(prompt.ends_with("Request: \"Star octocat/hello\""));
    }

    #[test]
    fn test_request_is_quoted() {
        let prompt = PromptBuilder::new(&registry()).build("say \"hi\"\nthen stop");
        assert!(prompt.ends_with(r#"Request: "say \"hi\"\nthen stop""#));
    }
}
