/// Prompt assembly: fixed instruction, retrieved context, user message.
use site_common::completion::Message;

/// Sentence the model must use when the context does not cover the question.
pub const NOT_FOUND_REPLY: &str = "I couldn’t find that in the verified Gensyn sources. You can check the official [Docs] https://docs.gensyn.ai or [Discord] https://discord.gg/gensyn for updates.";

/// The Genswarm persona and answer policy, with the verified handles spelled out.
pub fn system_instruction(known_handles: &[String]) -> String {
    format!(
        r#"
You are **Genswarm**, the helpful and concise assistant for the Gensyn community.

Always answer only using the "SOURCE:" context provided.
Never invent or hallucinate.

When you can answer:
✅ **Answer:**
<concise, factual explanation>

📚 **Sources:**
<list the most relevant URLs>

If the information is not available:
"{NOT_FOUND_REPLY}"

If asked for a social handle:
Use only handles from the provided context or from this verified list: {handles}. Otherwise, use the fallback above.
"#,
        handles = known_handles.join(", ")
    )
}

/// The three messages sent for one chat turn.
pub fn assemble_messages(
    known_handles: &[String],
    context: &str,
    user_message: &str,
) -> Vec<Message> {
    vec![
        Message::system(system_instruction(known_handles)),
        Message::system(format!("CONTEXT:\n\n{context}")),
        Message::user(user_message),
    ]
}
