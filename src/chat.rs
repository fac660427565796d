use std::time::Duration;

use rand::Rng;

pub const DEFAULT_REPLY_DELAY: Duration = Duration::from_millis(1500);

pub const GREETING: &str = "Hi! I'm here to help you understand your homework better. I'll guide you through problems rather than giving direct answers. What are you working on?";

pub const GUIDED_RESPONSES: [&str; 10] = [
    "That's an interesting problem! Let me ask you: what's the first step you think you should take?",
    "Great question! Before we dive in, what do you already understand about this topic?",
    "I can help you think through this. What specific part are you finding challenging?",
    "Let's break this down together. What concepts from class do you think might apply here?",
    "Good approach! Now, what would be the next logical step in solving this?",
    "Remember what we discussed about similar problems. How can you apply those strategies here?",
    "What if you tried looking at this from a different perspective? What alternatives come to mind?",
    "You're on the right track! What evidence or reasoning supports your current approach?",
    "Let me help you think critically about this. What assumptions are you making in your solution?",
    "Excellent progress! How can you verify that your solution is correct?",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    fn user(content: &str) -> Self {
        Self {
            role: Role::User,
            content: content.to_string(),
        }
    }

    fn assistant(content: &str) -> Self {
        Self {
            role: Role::Assistant,
            content: content.to_string(),
        }
    }
}

/// Scripted homework guide. Replies ignore what the user wrote.
pub struct GuidedChat<R> {
    transcript: Vec<Message>,
    rng: R,
    delay: Duration,
}

impl<R: Rng> GuidedChat<R> {
    pub fn new(rng: R, delay: Duration) -> Self {
        Self {
            transcript: vec![Message::assistant(GREETING)],
            rng,
            delay,
        }
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    /// Appends the user's message, waits the reply delay, then appends a canned reply.
    ///
    /// Blank input is ignored and returns `None`. Dropping the future before the
    /// delay elapses leaves the user's message in place without a reply.
    pub async fn submit(&mut self, input: &str) -> Option<&Message> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        self.transcript.push(Message::user(input));
        tokio::time::sleep(self.delay).await;

        let reply = GUIDED_RESPONSES[self.rng.random_range(0..GUIDED_RESPONSES.len())];
        self.transcript.push(Message::assistant(reply));
        self.transcript.last()
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};
    use tokio::time::{Instant, timeout};

    use super::*;

    fn chat() -> GuidedChat<StdRng> {
        GuidedChat::new(StdRng::seed_from_u64(7), DEFAULT_REPLY_DELAY)
    }

    #[test]
    fn test_transcript_starts_with_greeting() {
        let chat = chat();
        assert_eq!(chat.transcript(), &[Message::assistant(GREETING)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reply_comes_from_canned_list_after_delay() {
        let mut chat = chat();
        let started = Instant::now();

        let reply = chat.submit("  How do I start my essay?  ").await.unwrap().clone();

        assert!(started.elapsed() >= DEFAULT_REPLY_DELAY);
        assert_eq!(reply.role, Role::Assistant);
        assert!(GUIDED_RESPONSES.contains(&reply.content.as_str()));

        let transcript = chat.transcript();
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript[1], Message::user("How do I start my essay?"));
        assert_eq!(transcript[2], reply);
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_seed_gives_same_replies() {
        let mut first = chat();
        let mut second = chat();

        for question in ["one", "two", "three", "four"] {
            first.submit(question).await;
            second.submit(question).await;
        }

        assert_eq!(first.transcript(), second.transcript());
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_input_is_ignored() {
        let mut chat = chat();
        assert!(chat.submit("   ").await.is_none());
        assert_eq!(chat.transcript().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_pending_reply_cancels_it() {
        let mut chat = chat();

        let result = timeout(Duration::from_millis(100), chat.submit("hello")).await;
        assert!(result.is_err());

        tokio::time::sleep(Duration::from_secs(5)).await;
        let transcript = chat.transcript();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[1].role, Role::User);
    }
}
