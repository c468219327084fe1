//! Prompt assembly for the answer and summary calls.
//!
//! Both builders are pure: the same inputs always give the same text, one
//! item per line, every line terminated by `\n`.

use crate::models::Message;

/// Closing line of every answer prompt.
pub const ANSWER_INSTRUCTION: &str = "Answer only the latest user question above, using the summary, earlier messages and page content only as context. Do not include a summary of the conversation in your reply.";

/// Closing line of every summary prompt.
pub const SUMMARY_INSTRUCTION: &str = "Write a concise summary of the conversation so far, keeping the facts needed to answer follow-up questions. Reply with the summary only.";

/// Build the prompt that asks the model to answer `question`.
pub fn build_context(
    summary: &str,
    recent_messages: &[Message],
    question: &str,
    page_content: &str,
) -> String {
    let mut context = String::new();

    push_line(&mut context, &format!("Summary so far: {}", summary));
    push_messages(&mut context, recent_messages);
    push_line(&mut context, &format!("User: {}", question));
    if !page_content.is_empty() {
        push_line(&mut context, &format!("PageContent: {}", page_content));
    }
    push_line(&mut context, ANSWER_INSTRUCTION);

    context
}

/// Build the prompt that asks the model to rewrite the running summary after
/// `answer` was given to `question`.
pub fn build_summary_prompt(
    previous_summary: &str,
    recent_messages: &[Message],
    question: &str,
    answer: &str,
) -> String {
    let mut prompt = String::new();

    push_line(&mut prompt, &format!("Previous summary: {}", previous_summary));
    push_messages(&mut prompt, recent_messages);
    push_line(&mut prompt, &format!("user: {}", question));
    push_line(&mut prompt, &format!("assistant: {}", answer));
    push_line(&mut prompt, SUMMARY_INSTRUCTION);

    prompt
}

fn push_messages(out: &mut String, messages: &[Message]) {
    for message in messages {
        push_line(out, &format!("{}: {}", message.role(), message.content));
    }
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<&str> {
        text.lines().collect()
    }

    #[test]
    fn first_turn_has_summary_question_and_instruction_only() {
        let context = build_context("", &[], "What is 2+2?", "");

        assert_eq!(
            lines(&context),
            vec!["Summary so far: ", "User: What is 2+2?", ANSWER_INSTRUCTION]
        );
        assert!(context.ends_with(&format!("User: What is 2+2?\n{}\n", ANSWER_INSTRUCTION)));
        assert!(!context.contains("PageContent:"));
    }

    #[test]
    fn page_content_gets_its_own_line_after_the_question() {
        let context = build_context("", &[], "Summarize it", "Article about cats");

        assert_eq!(
            lines(&context),
            vec![
                "Summary so far: ",
                "User: Summarize it",
                "PageContent: Article about cats",
                ANSWER_INSTRUCTION,
            ]
        );
    }

    #[test]
    fn recent_messages_are_replayed_in_order_before_the_question() {
        let messages = vec![Message::user("Hi"), Message::assistant("Hello")];
        let context = build_context("", &messages, "And then?", "");

        assert_eq!(
            lines(&context),
            vec![
                "Summary so far: ",
                "user: Hi",
                "assistant: Hello",
                "User: And then?",
                ANSWER_INSTRUCTION,
            ]
        );
    }

    #[test]
    fn blank_role_is_printed_as_user() {
        let messages = vec![Message::new("", "no role here")];
        let context = build_context("", &messages, "q", "");

        assert!(lines(&context).contains(&"user: no role here"));
    }

    #[test]
    fn summary_is_carried_verbatim() {
        let context = build_context("User asked about cats.", &[], "More?", "");
        assert_eq!(lines(&context)[0], "Summary so far: User asked about cats.");
    }

    #[test]
    fn building_twice_gives_identical_output() {
        let messages = vec![Message::user("Hi"), Message::assistant("Hello")];
        let a = build_context("s", &messages, "q", "page");
        let b = build_context("s", &messages, "q", "page");
        assert_eq!(a, b);
    }

    #[test]
    fn summary_prompt_appends_latest_exchange() {
        let messages = vec![Message::user("Hi"), Message::assistant("Hello")];
        let prompt = build_summary_prompt("Greetings exchanged.", &messages, "And then?", "Then this.");

        assert_eq!(
            lines(&prompt),
            vec![
                "Previous summary: Greetings exchanged.",
                "user: Hi",
                "assistant: Hello",
                "user: And then?",
                "assistant: Then this.",
                SUMMARY_INSTRUCTION,
            ]
        );
    }

    #[test]
    fn instructions_keep_the_two_calls_apart() {
        assert!(ANSWER_INSTRUCTION.contains("Do not include a summary"));
        assert!(SUMMARY_INSTRUCTION.contains("concise summary"));
    }
}
