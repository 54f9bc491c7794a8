//! Prompt assembly for record extraction.

use crate::types::ChatMessage;

/// Build the extraction prompt for cleaned, tagged listing text.
///
/// `year` fills in dates the listing gives without one.
pub fn build_messages(tagged_text: &str, year: i32) -> Vec<ChatMessage> {
    let system = format!(
        "You extract assignments and their deadlines from text marked with tags.\n\
         \n\
         Rules:\n\
         - Each item is enclosed in <ASSIGNMENT>...</ASSIGNMENT>. Go through every block.\n\
         - The item name is inside <ASSIGNMENT_NAME>...</ASSIGNMENT_NAME>.\n\
         - The due date is inside <DUE><DATE>...</DATE></DUE>.\n\
         - The due time, if present, is inside the <TIME> tag within <DUE>.\n\
         - A block without a <DUE> tag has no due date.\n\
         - Ignore any text outside <ASSIGNMENT> blocks.\n\
         - Assume the current year is {year} when a date has none.\n\
         \n\
         Output format:\n\
         - Only a JSON array of objects, with no extra text or markdown.\n\
         - Each object has \"name\" (string), \"due_date\" (YYYY-MM-DD or null) \
         and \"due_time\" (24-hour HH:MM or null).\n\
         \n\
         Example output:\n\
         [{{\"name\": \"Project Proposal\", \"due_date\": \"{year}-10-15\", \"due_time\": \"23:59\"}}, \
         {{\"name\": \"Chapter 5 Quiz\", \"due_date\": \"{year}-10-17\", \"due_time\": null}}]"
    );

    vec![
        ChatMessage::system(system),
        ChatMessage::user(format!("Input:\n{tagged_text}")),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_year_and_text() {
        let text = "<ASSIGNMENT><ASSIGNMENT_NAME>Readme</ASSIGNMENT_NAME></ASSIGNMENT>";
        let messages = build_messages(text, 2025);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert!(messages[0].content.contains("current year is 2025"));
        assert!(messages[0].content.contains("\"due_date\": \"2025-10-15\""));
        assert_eq!(messages[1].role, "user");
        assert!(messages[1].content.ends_with(text));
    }
}
