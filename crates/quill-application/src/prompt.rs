//! Prompt construction from bundled templates.

use minijinja::{Environment, context};
use quill_core::config::GenerationConfig;
use quill_core::error::{QuillError, Result};
use quill_core::generation::PromptBuilder;
use quill_core::session::TransformKind;

const EXPAND_TEMPLATE: &str = include_str!("templates/expand.txt");
const OUTLINE_TEMPLATE: &str = include_str!("templates/outline.txt");

/// Renders one template per [`TransformKind`].
pub struct TemplatePromptBuilder {
    env: Environment<'static>,
    language: String,
}

impl TemplatePromptBuilder {
    pub fn new(language: impl Into<String>) -> Result<Self> {
        let mut env = Environment::new();
        for kind in [TransformKind::Expand, TransformKind::Outline] {
            env.add_template(template_name(kind), template_source(kind))
                .map_err(template_error)?;
        }

        Ok(Self {
            env,
            language: language.into(),
        })
    }

    pub fn from_config(config: &GenerationConfig) -> Result<Self> {
        Self::new(config.language.clone())
    }

    pub fn language(&self) -> &str {
        &self.language
    }
}

impl PromptBuilder for TemplatePromptBuilder {
    fn build(&self, text: &str, kind: TransformKind) -> Result<String> {
        let template = self
            .env
            .get_template(template_name(kind))
            .map_err(template_error)?;

        template
            .render(context! { text => text, language => &self.language })
            .map_err(template_error)
    }
}

fn template_name(kind: TransformKind) -> &'static str {
    match kind {
        TransformKind::Expand => "expand.txt",
        TransformKind::Outline => "outline.txt",
    }
}

fn template_source(kind: TransformKind) -> &'static str {
    match kind {
        TransformKind::Expand => EXPAND_TEMPLATE,
        TransformKind::Outline => OUTLINE_TEMPLATE,
    }
}

fn template_error(err: minijinja::Error) -> QuillError {
    QuillError::generation(format!("Failed to render prompt template: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_prompt_embeds_text_and_language() {
        let builder = TemplatePromptBuilder::new("Greek").unwrap();
        let prompt = builder.build("Η γλώσσα <b>", TransformKind::Expand).unwrap();

        assert!(prompt.contains("**Input Text:** Η γλώσσα <b>"));
        assert!(prompt.contains("single, cohesive paragraph"));
        assert!(prompt.contains("formal academic Greek."));
    }

    #[test]
    fn test_outline_prompt_differs_from_expand() {
        let builder = TemplatePromptBuilder::new("English").unwrap();
        let outline = builder.build("abc", TransformKind::Outline).unwrap();
        let expand = builder.build("abc", TransformKind::Expand).unwrap();

        assert_ne!(outline, expand);
        assert!(outline.contains("numbered list, using formal English."));
        assert!(!outline.contains("{{"));
    }

    #[test]
    fn test_build_is_deterministic() {
        let builder = TemplatePromptBuilder::from_config(&GenerationConfig::default()).unwrap();
        assert_eq!(builder.language(), "Greek");
        assert_eq!(
            builder.build("x", TransformKind::Outline).unwrap(),
            builder.build("x", TransformKind::Outline).unwrap()
        );
    }
}
