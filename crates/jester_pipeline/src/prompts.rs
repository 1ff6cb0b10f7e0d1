//! Prompt templates.

use jester_core::Topic;

/// Placeholder substituted with the topic.
pub const TOPIC_PLACEHOLDER: &str = "{topic}";

/// Fill `template` with `topic`.
///
/// # Examples
///
/// ```
/// use jester_core::Topic;
/// use jester_pipeline::render_prompt;
///
/// let topic = Topic::new("#Weather").unwrap();
/// assert_eq!(render_prompt("A meme about {topic}", &topic), "A meme about #Weather");
/// ```
pub fn render_prompt(template: &str, topic: &Topic) -> String {
    template.replace(TOPIC_PLACEHOLDER, topic.as_str())
}
