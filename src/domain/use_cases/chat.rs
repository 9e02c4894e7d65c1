use validator::Validate;

use crate::{
    entities::chat::{
        ChatRequest, ChatResponse, ConversationHistory, HistoryEntry, Message, Role, HISTORY_WINDOW,
    },
    errors::AppError,
    repositories::completion::CompletionRepository,
};

const CONTACT_REPLY: &str = "\
You can reach me through any of these channels:
- Email: use the contact form on this site and I'll reply within a day or two
- LinkedIn and GitHub: linked in the site footer
- Open to freelance work, collaborations and full-time roles";

const PROJECTS_REPLY: &str = "\
Here are a few highlights from my work:
- Full-stack web applications with modern frontends and typed APIs
- Backend services with authentication, caching and background jobs
- Developer tooling and automation side projects
Browse the Projects page for live demos, source code and write-ups.";

const SKILLS_REPLY: &str = "\
My core skills:
- Languages: Rust, TypeScript, JavaScript, Python, SQL
- Frontend: React, Next.js, Tailwind CSS
- Backend: Actix Web, Node.js, PostgreSQL, MongoDB, Redis
- Tooling: Docker, CI/CD pipelines, cloud deployments";

const EXPERIENCE_REPLY: &str = "\
A quick look at my experience:
- Several years building production web applications end to end
- Designing REST APIs and data models for small teams and startups
- Mentoring, code review and shipping features on tight schedules
The About page has the full timeline.";

const EDUCATION_REPLY: &str = "\
My education and learning path:
- Degree in Computer Science
- Ongoing self-study through courses, books and open-source contributions
- Certifications and coursework in cloud and web development";

const GENERIC_REPLY: &str = "\
I'm having trouble reaching my AI assistant right now, but I can still help with:
- Projects: what I've built
- Skills: the technologies I use
- Experience: where I've worked
- Education: my background
- Contact: how to get in touch
Try asking about one of these topics!";

/// Keyword groups in priority order. The first group with a match wins.
const FALLBACKS: &[(&[&str], &str)] = &[
    (&["contact", "email", "reach out", "hire"], CONTACT_REPLY),
    (&["project", "portfolio", "built", "work on"], PROJECTS_REPLY),
    (&["skill", "technolog", "stack", "language"], SKILLS_REPLY),
    (&["experience", "job", "career", "worked"], EXPERIENCE_REPLY),
    (&["education", "degree", "study", "school", "university"], EDUCATION_REPLY),
];

/// Canned reply for when the completion API cannot answer.
pub fn select_fallback(message: &str) -> &'static str {
    let lowered = message.to_lowercase();
    FALLBACKS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(_, reply)| *reply)
        .unwrap_or(GENERIC_REPLY)
}

pub struct ChatHandler<C>
where
    C: CompletionRepository,
{
    pub completion_client: C,
    system_prompt: String,
}

impl<C> ChatHandler<C>
where
    C: CompletionRepository,
{
    pub fn new(completion_client: C, owner_name: &str) -> Self {
        ChatHandler {
            completion_client,
            system_prompt: system_prompt(owner_name),
        }
    }

    /// Builds the prompt sent upstream: system turn, the trailing history
    /// window, then the new user message.
    pub fn build_prompt(&self, request: &ChatRequest) -> Vec<HistoryEntry> {
        let mut history = ConversationHistory::windowed(request.history.clone(), HISTORY_WINDOW);
        history.push(HistoryEntry::new(Role::User, request.message.trim()));

        let mut prompt = Vec::with_capacity(history.len() + 1);
        prompt.push(HistoryEntry::new(Role::System, self.system_prompt.as_str()));
        prompt.extend_from_slice(history.entries());
        prompt
    }

    /// Never fails on upstream problems: those become a fallback reply.
    pub async fn reply(&self, request: ChatRequest) -> Result<ChatResponse, AppError> {
        request.validate()?;

        let prompt = self.build_prompt(&request);
        let (text, fallback) = match self.completion_client.complete(&prompt).await {
            Ok(text) => (text, false),
            Err(e) => {
                tracing::warn!(error = %e, "Chat completion failed, using fallback reply");
                (select_fallback(&request.message).to_string(), true)
            }
        };

        Ok(ChatResponse {
            message: Message::new(Role::Assistant, text.as_str()),
            response: text,
            fallback,
        })
    }
}

fn system_prompt(owner_name: &str) -> String {
    format!(
        "You are the assistant on {owner}'s personal portfolio website. \
         Answer visitors' questions about {owner}'s projects, skills, experience, \
         education and how to get in touch. Keep answers short, friendly and factual. \
         If you do not know something about {owner}, say so and suggest the contact form.",
        owner = owner_name
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::completion::{CompletionError, MockCompletionRepository};

    fn request(message: &str, history: Vec<HistoryEntry>) -> ChatRequest {
        ChatRequest { message: message.to_string(), history }
    }

    #[test]
    fn contact_always_wins() {
        assert_eq!(select_fallback("Show me your projects and how to contact you"), CONTACT_REPLY);
        assert_eq!(select_fallback("CONTACT"), CONTACT_REPLY);
    }

    #[test]
    fn fallback_priority_order() {
        assert_eq!(select_fallback("what projects use these skills?"), PROJECTS_REPLY);
        assert_eq!(select_fallback("Which skills and education?"), SKILLS_REPLY);
        assert_eq!(select_fallback("tell me about your experience"), EXPERIENCE_REPLY);
        assert_eq!(select_fallback("Education?"), EDUCATION_REPLY);
        assert_eq!(select_fallback("hello there"), GENERIC_REPLY);
    }

    #[test]
    fn prompt_has_system_turn_window_and_message() {
        let handler = ChatHandler::new(MockCompletionRepository::new(), "Ada");
        let history = (0..12)
            .map(|i| HistoryEntry::new(Role::User, format!("old {i}")))
            .collect();
        let prompt = handler.build_prompt(&request(" latest ", history));

        assert_eq!(prompt.len(), 1 + HISTORY_WINDOW + 1);
        assert_eq!(prompt[0].role, Role::System);
        assert!(prompt[0].content.contains("Ada"));
        assert_eq!(prompt[1].content, "old 4");
        assert_eq!(prompt.last().unwrap().content, "latest");
    }

    #[actix_rt::test]
    async fn upstream_reply_is_returned() {
        let mut client = MockCompletionRepository::new();
        client.expect_complete().times(1).returning(|_| Ok("Hi!".into()));

        let handler = ChatHandler::new(client, "Ada");
        let response = handler.reply(request("hello", vec![])).await.unwrap();
        assert_eq!(response.response, "Hi!");
        assert!(!response.fallback);
        assert_eq!(response.message.sender, Role::Assistant);
    }

    #[actix_rt::test]
    async fn upstream_failure_falls_back() {
        let mut client = MockCompletionRepository::new();
        client
            .expect_complete()
            .returning(|_| Err(CompletionError::Status(503)));

        let handler = ChatHandler::new(client, "Ada");
        let response = handler.reply(request("how can I contact you?", vec![])).await.unwrap();
        assert_eq!(response.response, CONTACT_REPLY);
        assert!(response.fallback);
    }

    #[actix_rt::test]
    async fn blank_message_is_rejected_before_upstream() {
        let mut client = MockCompletionRepository::new();
        client.expect_complete().never();

        let handler = ChatHandler::new(client, "Ada");
        let err = handler.reply(request("   ", vec![])).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }
}
