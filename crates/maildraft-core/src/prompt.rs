use crate::form::EmailDetails;
use crate::state::ChatMessage;

pub const SYSTEM_PROMPT: &str = concat!(
    "You are an AI assistant specialized in drafting professional and effective emails. ",
    "You will generate an email based on the user's specified name, recipient, purpose, key points and tone. ",
    "Do not include information which is not provided, for example displaying [Your Name]. ",
    "Include a concise subject line, a clear greeting, the main body incorporating all key points, ",
    "and a suitable closing signature. ",
    "Ensure the email flows naturally and is easy to read. ",
    "Use appropriate paragraph breaks and blank lines for standard email formatting. ",
    "NO PREAMBLE.",
);

/// Fill the user instruction template.
///
/// Key points are rendered with their debug representation, e.g.
/// `["discuss budget", "confirm date"]`.
pub fn user_prompt(details: &EmailDetails) -> String {
    format!(
        "My name is {}. The recipient of the email is {}. \
         Draft an email that has the following purpose: {}. \
         It should include these key points: {:?}. \
         Write the email using a {} tone. ",
        details.sender, details.recipient, details.purpose, details.key_points, details.tone,
    )
}

/// The system instruction followed by the user instruction
pub fn build_messages(details: &EmailDetails) -> Vec<ChatMessage> {
    vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(user_prompt(details))]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ChatRole;

    fn details() -> EmailDetails {
        EmailDetails {
            sender: "Jordan".into(),
            recipient: "Alex".into(),
            purpose: "Schedule a meeting".into(),
            key_points: vec!["discuss budget".into(), "confirm date".into()],
            tone: "professional".into(),
        }
    }

    #[test]
    fn test_exactly_two_messages_system_first() {
        let messages = build_messages(&details());
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, ChatRole::System);
        assert_eq!(messages[0].content, SYSTEM_PROMPT);
        assert_eq!(messages[1].role, ChatRole::User);
    }

    #[test]
    fn test_user_prompt_interpolates_every_field() {
        let prompt = user_prompt(&details());
        assert_eq!(
            prompt,
            "My name is Jordan. The recipient of the email is Alex. \
             Draft an email that has the following purpose: Schedule a meeting. \
             It should include these key points: [\"discuss budget\", \"confirm date\"]. \
             Write the email using a professional tone. "
        );
    }

    #[test]
    fn test_system_prompt_forbids_placeholders_and_preamble() {
        assert!(SYSTEM_PROMPT.contains("[Your Name]"));
        assert!(SYSTEM_PROMPT.contains("subject line"));
        assert!(SYSTEM_PROMPT.ends_with("NO PREAMBLE."));
    }
}
