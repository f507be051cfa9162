use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{AppError, Result};
use crate::models::{Bilingual, KeyPoint, QuizQuestion, VocabularyItem};

const CLAUDE_API_URL: &str = "https://api.anthropic.com/v1/messages";
const CLAUDE_MODEL: &str = "claude-3-5-haiku-20241022";

const SYSTEM_PROMPT: &str = "You are an expert bilingual educational content writer \
specializing in book chapter summaries in English and Traditional Chinese.";

#[derive(Debug, Serialize)]
struct MessageRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
    system: Option<String>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

/// Chapter the admin asked a draft for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftRequest {
    pub book_title: String,
    pub author: String,
    pub chapter_title: String,
}

impl DraftRequest {
    fn prompt(&self) -> String {
        let author = if self.author.trim().is_empty() {
            "Unknown"
        } else {
            self.author.as_str()
        };
        format!(
            r#"The book title is: "{book}"
The author is: {author}
The chapter title is: "{chapter}"

Write the following sections, each starting with its header line and separated by a blank line:

EN Summary: 4-6 sentences in English using advanced (CEFR C1-C2) vocabulary.
ZH Summary: the summary translated into Traditional Chinese. Keep the author, book and chapter names in English.
Vocabulary JSON: a JSON array of 5-8 words from the English summary, in order of appearance, each {{"word", "zh", "en_sent", "zh_sent"}}.
Key Points: 3-5 numbered lines, English first and then Traditional Chinese. Format: 1. English. 中文。
Exam Q1: (one section per question, 3-5 questions)
Q: the question
A. option
B. option
C. option
D. option
Answer: the correct letter
Explanation: English explanation 中文解析：Chinese explanation"#,
            book = self.book_title,
            chapter = self.chapter_title,
        )
    }
}

/// Bilingual chapter material parsed out of a completion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneratedContent {
    pub summary_en: String,
    pub summary_ch: String,
    pub vocabulary: Vec<VocabularyItem>,
    pub key_points: Vec<KeyPoint>,
    pub questions: Vec<QuizQuestion>,
}

pub struct ClaudeClient {
    client: Client,
    api_key: String,
}

impl ClaudeClient {
    pub fn new(api_key: String) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(90)).build()?;
        Ok(Self { client, api_key })
    }

    async fn complete(&self, prompt: String) -> Result<String> {
        let request = MessageRequest {
            model: CLAUDE_MODEL.to_string(),
            max_tokens: 3000,
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt,
            }],
            system: Some(SYSTEM_PROMPT.to_string()),
        };

        let response = self
            .client
            .post(CLAUDE_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(AppError::ClaudeApi(format!("API error: {}", error_text)));
        }

        let message_response: MessageResponse = response.json().await?;

        Ok(message_response
            .content
            .into_iter()
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

/// Completion backend for chapter drafts. Without an API key the canned
/// completion keeps the editor flow usable offline.
pub enum Drafter {
    Claude(ClaudeClient),
    Mock,
}

impl Drafter {
    pub fn from_api_key(api_key: Option<&str>) -> Result<Self> {
        match api_key.map(str::trim).filter(|k| !k.is_empty()) {
            Some(key) => Ok(Drafter::Claude(ClaudeClient::new(key.to_string())?)),
            None => Ok(Drafter::Mock),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Drafter::Claude(_) => CLAUDE_MODEL,
            Drafter::Mock => "mock",
        }
    }

    pub async fn draft(&self, request: &DraftRequest) -> Result<GeneratedContent> {
        let completion = match self {
            Drafter::Claude(client) => client.complete(request.prompt()).await?,
            Drafter::Mock => mock_completion(request),
        };
        debug!(backend = self.backend_name(), bytes = completion.len(), "completion received");
        Ok(parse_completion(&completion))
    }
}

fn mock_completion(request: &DraftRequest) -> String {
    format!(
        r#"EN Summary:
In "{chapter}", the author of {book} argues that meaningful change rarely comes from a single dramatic decision. Instead, it accumulates through small, deliberate adjustments that compound over time. The chapter scrutinizes how environment shapes behavior and contends that sustainable progress depends on systems rather than goals.

ZH Summary:
在 "{chapter}" 中，{book} 的作者主張，有意義的改變很少來自單一的重大決定。相反地，它是透過微小而刻意的調整，隨著時間累積而成。本章仔細審視環境如何塑造行為，並主張可持續的進步取決於系統而非目標。

Vocabulary JSON:
[{{"word": "deliberate", "zh": "刻意的", "en_sent": "She made a deliberate effort to read every morning.", "zh_sent": "她刻意努力每天早上閱讀。"}}, {{"word": "compound", "zh": "複利累積", "en_sent": "Small gains compound into remarkable results.", "zh_sent": "微小的進步會累積成顯著的成果。"}}, {{"word": "scrutinize", "zh": "仔細審視", "en_sent": "The committee will scrutinize the proposal.", "zh_sent": "委員會將仔細審視這項提案。"}}]

Key Points:
1. Small improvements compound over time. 微小的進步會隨時間累積。
2. Environment shapes behavior more than motivation. 環境比動機更能塑造行為。
3. Systems matter more than goals. 系統比目標更重要。

Exam Q1:
Q: According to the chapter, where does lasting change come from?
A. A single dramatic decision
B. Small adjustments that accumulate
C. Setting more ambitious goals
D. Relying on motivation alone
Answer: B
Explanation: The chapter stresses that change accumulates through small, repeated adjustments. 中文解析：本章強調改變是透過微小且重複的調整累積而來。"#,
        book = request.book_title,
        chapter = request.chapter_title,
    )
}

#[derive(Debug, Deserialize)]
struct DraftVocabulary {
    word: String,
    #[serde(default)]
    zh: String,
    #[serde(default)]
    en_sent: String,
    #[serde(default)]
    zh_sent: String,
}

impl From<DraftVocabulary> for VocabularyItem {
    fn from(item: DraftVocabulary) -> Self {
        VocabularyItem {
            word: item.word,
            translation: item.zh,
            examples: vec![Bilingual::new(item.en_sent, item.zh_sent)],
            ..VocabularyItem::default()
        }
    }
}

const SECTION_HEADERS: [&str; 4] = ["EN Summary:", "ZH Summary:", "Vocabulary JSON:", "Key Points:"];

fn is_exam_header(line: &str) -> bool {
    let line = line.trim_end();
    line.starts_with("Exam Q") && line.ends_with(':')
}

/// Splits a completion into `(header, body)` sections. A section starts at
/// any known header line and runs to the next one.
fn sections(text: &str) -> Vec<(&str, String)> {
    let mut out: Vec<(&str, String)> = Vec::new();
    for line in text.lines() {
        let header = SECTION_HEADERS
            .iter()
            .find(|h| line.starts_with(**h))
            .copied()
            .or_else(|| is_exam_header(line).then_some("Exam"));
        match header {
            Some(h) => {
                let rest = if h == "Exam" { "" } else { &line[h.len()..] };
                out.push((h, rest.trim().to_string()));
            }
            None => {
                if let Some((_, body)) = out.last_mut() {
                    if !body.is_empty() {
                        body.push('\n');
                    }
                    body.push_str(line);
                }
            }
        }
    }
    out
}

fn is_cjk(c: char) -> bool {
    matches!(c, '\u{3400}'..='\u{4DBF}' | '\u{4E00}'..='\u{9FFF}' | '\u{F900}'..='\u{FAFF}')
}

/// Byte offset where the Chinese half starts: right after the first `.` or
/// `。` sentence end whose next non-space character is Chinese.
fn key_point_boundary(line: &str) -> Option<usize> {
    line.char_indices()
        .filter(|(_, c)| matches!(c, '.' | '。'))
        .map(|(i, c)| i + c.len_utf8())
        .find(|&end| line[end..].trim_start().chars().next().is_some_and(is_cjk))
}

fn parse_key_point(line: &str) -> Option<KeyPoint> {
    let line = line.trim();
    let line = line
        .trim_start_matches(|c: char| c.is_ascii_digit())
        .trim_start_matches('.')
        .trim();
    let (en, ch) = line.split_at(key_point_boundary(line)?);
    let (en, ch) = (en.trim(), ch.trim());
    if en.is_empty() || ch.is_empty() {
        return None;
    }
    Some(KeyPoint {
        en: en.to_string(),
        ch: ch.to_string(),
        ..KeyPoint::default()
    })
}

fn parse_question(body: &str) -> Option<QuizQuestion> {
    let mut question = None;
    let mut options = Vec::new();
    let mut answer = None;
    let mut explanation = Bilingual::default();

    for line in body.lines().map(str::trim) {
        if let Some(q) = line.strip_prefix("Q:") {
            question = Some(q.trim().to_string());
        } else if let Some(a) = line.strip_prefix("Answer:") {
            answer = a.trim().chars().next();
        } else if let Some(e) = line.strip_prefix("Explanation:") {
            let (en, ch) = e.split_once("中文解析：").unwrap_or((e, ""));
            explanation = Bilingual::new(en.trim(), ch.trim());
        } else if let Some(option) = ["A.", "B.", "C.", "D."]
            .iter()
            .find_map(|prefix| line.strip_prefix(prefix))
        {
            options.push(option.trim().to_string());
        }
    }

    let question = question.filter(|q| !q.is_empty())?;
    if options.len() != 4 {
        return None;
    }
    let correct_answer = match answer? {
        letter @ 'A'..='D' => (letter as u8 - b'A') as usize,
        _ => return None,
    };
    Some(QuizQuestion {
        question,
        options,
        correct_answer,
        explanation,
    })
}

/// Reads a sectioned completion. Malformed sections are skipped so a partly
/// usable answer still yields a partial draft.
pub fn parse_completion(text: &str) -> GeneratedContent {
    let mut content = GeneratedContent::default();
    for (header, body) in sections(text) {
        match header {
            "EN Summary:" => content.summary_en = body.trim().to_string(),
            "ZH Summary:" => content.summary_ch = body.trim().to_string(),
            "Vocabulary JSON:" => match serde_json::from_str::<Vec<DraftVocabulary>>(body.trim()) {
                Ok(items) => content.vocabulary = items.into_iter().map(Into::into).collect(),
                Err(e) => warn!(error = %e, "skipping unreadable vocabulary section"),
            },
            "Key Points:" => {
                content.key_points = body.lines().filter_map(parse_key_point).collect();
            }
            _ => match parse_question(&body) {
                Some(question) => content.questions.push(question),
                None => warn!("skipping malformed exam question"),
            },
        }
    }
    content
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> DraftRequest {
        DraftRequest {
            book_title: "Atomic Habits".into(),
            author: "James Clear".into(),
            chapter_title: "The Surprising Power of Atomic Habits".into(),
        }
    }

    #[test]
    fn canned_completion_parses_every_section() {
        let content = parse_completion(&mock_completion(&request()));
        assert!(content.summary_en.contains("The Surprising Power of Atomic Habits"));
        assert!(content.summary_ch.starts_with("在"));
        assert_eq!(content.vocabulary.len(), 3);
        assert_eq!(content.vocabulary[0].translation, "刻意的");
        assert_eq!(content.vocabulary[0].examples.len(), 1);
        assert_eq!(content.key_points.len(), 3);
        assert_eq!(content.key_points[2].en, "Systems matter more than goals.");
        assert_eq!(content.key_points[2].ch, "系統比目標更重要。");
        assert_eq!(content.questions.len(), 1);
        assert_eq!(content.questions[0].correct_answer, 1);
        assert!(content.questions[0].explanation.ch.starts_with("本章"));
    }

    #[test]
    fn bad_vocabulary_json_is_skipped() {
        let content = parse_completion("EN Summary:\nHello\n\nVocabulary JSON:\n[{not json\n");
        assert_eq!(content.summary_en, "Hello");
        assert!(content.vocabulary.is_empty());
    }

    #[test]
    fn question_needs_four_options_and_a_valid_answer() {
        let three = "Exam Q1:\nQ: Why?\nA. a\nB. b\nC. c\nAnswer: A";
        assert!(parse_completion(three).questions.is_empty());

        let bad_answer = "Exam Q2:\nQ: Why?\nA. a\nB. b\nC. c\nD. d\nAnswer: E";
        assert!(parse_completion(bad_answer).questions.is_empty());
    }

    #[test]
    fn key_point_without_chinese_is_dropped() {
        let content = parse_completion("Key Points:\n1. Only English here.\n2. Both. 兩者。");
        assert_eq!(content.key_points.len(), 1);
        assert_eq!(content.key_points[0].en, "Both.");
    }

    #[test]
    fn key_point_splits_at_sentence_end_not_first_chinese() {
        let content = parse_completion("Key Points:\n1. Read 原子習慣 slowly. 慢慢閱讀《原子習慣》。");
        assert_eq!(content.key_points.len(), 1);
        assert_eq!(content.key_points[0].en, "Read 原子習慣 slowly.");
        assert_eq!(content.key_points[0].ch, "慢慢閱讀《原子習慣》。");
    }

    #[tokio::test]
    async fn mock_backend_without_key() {
        let drafter = Drafter::from_api_key(Some("  ")).unwrap();
        assert_eq!(drafter.backend_name(), "mock");
        let content = drafter.draft(&request()).await.unwrap();
        assert!(!content.questions.is_empty());
    }

    #[test]
    fn prompt_names_the_chapter() {
        let prompt = request().prompt();
        assert!(prompt.contains("\"Atomic Habits\""));
        assert!(prompt.contains("Vocabulary JSON:"));
    }
}
