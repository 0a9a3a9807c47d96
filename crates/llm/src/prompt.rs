//! Prompt construction for the response generator

use advisor_core::ChatTurn;

/// The keys the model must answer with, in instruction order
const REPLY_KEYS: &[(&str, &str)] = &[
    ("result", "final response to the user's loan-related query"),
    ("loan_type", "type of loan discussed, or empty"),
    ("interest_rate", "applicable interest rate, or empty"),
    ("eligibility", "eligibility criteria, or empty"),
    ("repayment_options", "available repayment options, or empty"),
    ("additional_info", "any extra relevant information, or empty"),
    (
        "tool_call",
        "name of a tool to run (Loan Eligibility Check, Loan Application Guidance, \
         Financial Literacy Tips, Financial Goal Tracking), or empty",
    ),
    (
        "tool_parameters",
        "JSON object of parameters for the tool, or an empty object",
    ),
];

/// Builds the turn list for one generation call.
///
/// Field order mirrors the prompt the generator is specified against:
/// persona/scope, history, context, query, then the output-shape
/// instruction.
pub struct PromptBuilder {
    agent_name: String,
    history: String,
    context: String,
    language: String,
}

impl PromptBuilder {
    pub fn new(agent_name: impl Into<String>) -> Self {
        Self {
            agent_name: agent_name.into(),
            history: String::new(),
            context: String::new(),
            language: String::new(),
        }
    }

    /// Chat history as preformatted `Speaker: text` lines
    pub fn with_history(mut self, history: &str) -> Self {
        self.history = history.to_string();
        self
    }

    /// Retrieved context (may be empty)
    pub fn with_context(mut self, context: &str) -> Self {
        self.context = context.to_string();
        self
    }

    /// Language the user's reply will be delivered in
    pub fn with_language(mut self, language: &str) -> Self {
        self.language = language.to_string();
        self
    }

    fn system_prompt(&self) -> String {
        let shape: String = REPLY_KEYS
            .iter()
            .map(|(key, description)| format!("- \"{key}\": {description}"))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "You are {name}, a loan advisory assistant. You answer questions about loan \
             types, interest rates, eligibility, repayment plans, and personal financial \
             guidance, and nothing else. If a question is outside that scope, say that you \
             specialize in loan advisory and ask how you can help with the user's loan needs. \
             Keep answers concise, factual, and structured; use Markdown in field values \
             where it helps readability.\n\n\
             Only request a tool when the query needs a calculation or guided walkthrough; \
             for greetings and general questions leave \"tool_call\" empty.\n\n\
             Respond with a single JSON object and nothing else, using exactly these keys:\n\
             {shape}",
            name = self.agent_name,
            shape = shape,
        )
    }

    /// Assemble the final turn list for a user query
    pub fn build(self, query: &str) -> Vec<ChatTurn> {
        let mut turns = vec![ChatTurn::system(self.system_prompt())];

        if !self.history.is_empty() {
            turns.push(ChatTurn::system(format!(
                "## Chat History\n{}",
                self.history
            )));
        }

        if !self.context.is_empty() {
            turns.push(ChatTurn::system(format!(
                "## Context\n{}\n\nUse this information when it is relevant to the query.",
                self.context
            )));
        }

        let user = if self.language.is_empty() {
            query.to_string()
        } else {
            format!("User's language: {}. User's question: {}", self.language, query)
        };
        turns.push(ChatTurn::user(user));

        turns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_core::ChatRole;

    #[test]
    fn test_build_orders_sections() {
        let turns = PromptBuilder::new("FinMate")
            .with_history("User: hi\nFinMate: hello")
            .with_context("Home loans start at 8.5%")
            .with_language("hi-IN")
            .build("what are home loan rates?");

        assert_eq!(turns.len(), 4);
        assert_eq!(turns[0].role, ChatRole::System);
        assert!(turns[0].content.contains("\"tool_parameters\""));
        assert!(turns[1].content.starts_with("## Chat History"));
        assert!(turns[2].content.starts_with("## Context"));
        assert_eq!(turns[3].role, ChatRole::User);
        assert!(turns[3].content.contains("hi-IN"));
    }

    #[test]
    fn test_empty_sections_are_omitted() {
        let turns = PromptBuilder::new("FinMate").build("hello there friend");
        assert_eq!(turns.len(), 2);
    }

    #[test]
    fn test_system_prompt_names_every_reply_key() {
        let turns = PromptBuilder::new("FinMate").build("q");
        for (key, _) in REPLY_KEYS {
            assert!(
                turns[0].content.contains(&format!("\"{key}\"")),
                "missing key {key}"
            );
        }
    }
}
