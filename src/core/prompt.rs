use crate::core::knowledge::{KnowledgeBase, KnowledgeError};

pub const DEFAULT_ASSISTANT_NAME: &str = "Kura";

/// Renders the system preamble re-sent to the model on every turn, embedding
/// the whole knowledge document as pretty JSON.
pub fn build_system_prompt(
    assistant_name: &str,
    knowledge: &KnowledgeBase,
) -> Result<String, KnowledgeError> {
    let knowledge_data = knowledge.to_pretty_json()?;
    Ok(format!(
        "
Kamu adalah AI bernama {assistant_name} yang fokus pada pelestarian bahasa Minangkabau.

Berikut adalah data referensi dalam format JSON:

{knowledge_data}

Gunakan data ini untuk menjawab pertanyaan secara akurat.
Jawab dengan bahasa Indonesia sederhana dan ramah.
Jika pertanyaan di luar topik, arahkan kembali ke bahasa Minangkabau.
"
    ))
}
