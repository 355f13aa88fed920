//! Fixed, user-facing reply texts.

use crate::domain::CreatorProfile;

pub const GREETING: &str = "Hello — I am the UNIZIK Academic Assistant. Ask me anything academic or UNIZIK-related; I respond with detailed, lecturer-style explanations.";

pub const HELP: &str = "Send me a question about a course, concept, syllabus, exam, or anything UNIZIK-specific and I will explain it step by step.\n\nExamples:\n• What is the definition of entropy?\n• Explain the difference between mitosis and meiosis\n• How is CGPA calculated at UNIZIK?\n\nCommands:\n/start - introduction\n/help - this message";

pub const REJECTION: &str = "I can only help with educational questions or UNIZIK-related academic topics. Please ask a question about a course, concept, syllabus, exam, or UNIZIK-specific info.";

pub const BACKEND_FAILURE: &str = "Sorry — I couldn't reach the AI service right now.";

/// Answers longer than this are cut before sending.
pub const MAX_ANSWER_CHARS: usize = 4000;
/// Characters kept from an over-long answer.
pub const TRUNCATED_KEEP_CHARS: usize = 3990;
pub const TRUNCATION_MARKER: &str = "\n\n[answer truncated]";

pub fn creator_identity(creator: &CreatorProfile) -> String {
    format!("I was created by {}.", creator.name)
}

pub fn creator_contact(creator: &CreatorProfile) -> String {
    format!(
        "Contact the creator: {}\nWhatsApp: {}",
        creator.name, creator.contact_link
    )
}

/// Trim an answer and cut it to fit one Telegram message.
///
/// Lengths are counted in characters, not bytes.
pub fn fit_answer(raw: &str) -> String {
    let answer = raw.trim();
    if answer.chars().count() <= MAX_ANSWER_CHARS {
        return answer.to_string();
    }
    let mut out = answer.chars().take(TRUNCATED_KEEP_CHARS).collect::<String>();
    out.push_str(TRUNCATION_MARKER);
    out
}
