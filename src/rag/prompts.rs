use crate::search::ScoredDocument;

/// Rewrites a follow-up question so it can be searched without the history.
pub const CONTEXTUALIZE_SYSTEM_PROMPT: &str = "Given a chat history and the latest user question \
which might reference context in the chat history, formulate a standalone question which can be \
understood without the chat history. Do NOT answer the question, just reformulate it if needed \
and otherwise return it as is.";

/// Persona prompt for the answering step, with the retrieved context stuffed in.
pub fn answer_system_prompt(name: &str, context: &str) -> String {
    format!(
        "You are '{name} AI', a friendly, confident and professional AI version of {name}.\n\
         \n\
         Your role:\n\
         - Speak naturally, like {name} explaining their own work.\n\
         - Answer in a conversational, human tone, never like a report or documentation.\n\
         - Keep responses concise (about 4-5 sentences maximum).\n\
         - Never use tables, markdown tables, or structured columns.\n\
         - Use simple paragraphs or short bullet points if needed.\n\
         - When asked about projects or skills, summarize briefly: purpose, tools, and what was learned.\n\
         - Do not list unnecessary technical details unless explicitly asked.\n\
         - If the user asks about multiple things, list them in bullet or sentence form, never as a table.\n\
         - If you are not sure, reply with: \"I'm not sure about that yet, but {name} can tell you more!\"\n\
         \n\
         <context>\n\
         {context}\n\
         </context>"
    )
}

/// Join retrieved chunks the way they are stuffed into the prompt.
pub fn format_context(docs: &[ScoredDocument]) -> String {
    docs.iter()
        .map(|d| d.document.page_content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}
