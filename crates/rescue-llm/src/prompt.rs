//! Prompt template loading and rendering via `minijinja`.
//!
//! Templates ship inside the binary (`templates/*.j2`) so a deployment is a
//! single file. Each call renders a system and a user message.

use minijinja::{Environment, context};

use crate::context::{ChatContext, NegotiationBrief};
use crate::error::CollaboratorError;

const TEMPLATES: [(&str, &str); 4] = [
    ("chat_system", include_str!("../templates/chat_system.j2")),
    ("chat_user", include_str!("../templates/chat_user.j2")),
    (
        "negotiation_system",
        include_str!("../templates/negotiation_system.j2"),
    ),
    (
        "negotiation_user",
        include_str!("../templates/negotiation_user.j2"),
    ),
];

/// The rendered prompt ready to send to a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPrompt {
    /// System message setting the assistant's role and output format.
    pub system: String,
    /// User message carrying the question and dashboard state.
    pub user: String,
}

/// Holds the compiled prompt templates.
pub struct PromptEngine {
    env: Environment<'static>,
}

impl std::fmt::Debug for PromptEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptEngine").finish_non_exhaustive()
    }
}

impl PromptEngine {
    /// Compile the built-in templates.
    pub fn new() -> Result<Self, CollaboratorError> {
        let mut env = Environment::new();
        for (name, source) in TEMPLATES {
            env.add_template(name, source).map_err(|e| {
                CollaboratorError::Template(format!("failed to add {name} template: {e}"))
            })?;
        }
        Ok(Self { env })
    }

    /// Render the chat prompt for `question`.
    pub fn chat(
        &self,
        question: &str,
        context: &ChatContext,
    ) -> Result<RenderedPrompt, CollaboratorError> {
        let ctx = context! { question => question, context => context };
        Ok(RenderedPrompt {
            system: self.render("chat_system", &ctx)?,
            user: self.render("chat_user", &ctx)?,
        })
    }

    /// Render the negotiation prompt for `brief`.
    pub fn negotiation(
        &self,
        brief: &NegotiationBrief,
    ) -> Result<RenderedPrompt, CollaboratorError> {
        let terms_json = serde_json::to_string(&brief.terms)
            .map_err(|e| CollaboratorError::Template(format!("terms not serializable: {e}")))?;
        let ctx = context! { brief => brief, terms_json => terms_json };
        Ok(RenderedPrompt {
            system: self.render("negotiation_system", &ctx)?,
            user: self.render("negotiation_user", &ctx)?,
        })
    }

    fn render(&self, name: &str, ctx: &minijinja::Value) -> Result<String, CollaboratorError> {
        self.env
            .get_template(name)
            .map_err(|e| CollaboratorError::Template(format!("missing {name} template: {e}")))?
            .render(ctx)
            .map_err(|e| CollaboratorError::Template(format!("{name} render failed: {e}")))
    }
}
