use std::fmt::Write;

use crate::editor::option_letter;
use crate::models::{Book, Chapter, ChapterContent, QuizQuestion};

/// Markdown rendering of one chapter: both summaries, vocabulary, key points
/// and the quiz with its answers marked.
pub fn chapter_markdown(
    book: &Book,
    chapter: &Chapter,
    content: &ChapterContent,
    questions: &[QuizQuestion],
) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, "# {} - {}", book.title, chapter.title);
    let _ = writeln!(out, "\n## English Summary\n\n{}", content.summary_en.trim());
    let _ = writeln!(out, "\n## Chinese Summary\n\n{}", content.summary_ch.trim());

    if !content.vocabulary.is_empty() {
        let _ = writeln!(out, "\n## Vocabulary");
        for item in &content.vocabulary {
            let _ = writeln!(out, "\n### {} ({})", item.word, item.translation);
            for example in &item.examples {
                let _ = writeln!(out, "- English: {}", example.en);
                let _ = writeln!(out, "- Chinese: {}", example.ch);
            }
        }
    }

    if !content.key_points.is_empty() {
        let _ = writeln!(out, "\n## Key Points\n");
        for (i, point) in content.key_points.iter().enumerate() {
            let _ = writeln!(out, "{}. {}\n   {}", i + 1, point.en, point.ch);
        }
    }

    if !questions.is_empty() {
        let _ = writeln!(out, "\n## Quiz");
        for (i, question) in questions.iter().enumerate() {
            let _ = writeln!(out, "\n### Question {}\n\n{}\n", i + 1, question.question);
            for (j, option) in question.quiz_options().iter().enumerate() {
                let mark = if option.is_correct { " ✓" } else { "" };
                let _ = writeln!(out, "{}. {}{}", option_letter(j), option.text, mark);
            }
            let _ = writeln!(out, "\n**Explanation**");
            let _ = writeln!(out, "- English: {}", question.explanation.en);
            let _ = writeln!(out, "- Chinese: {}", question.explanation.ch);
        }
    }
    out
}
