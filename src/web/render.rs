//! Server-rendered HTML. Every value that came from the store or a form goes
//! through [`escape`]; every slug placed in a link goes through
//! [`path_segment`].

use std::fmt::Write;

use crate::catalog::{BookView, ChapterView};
use crate::editor::option_letter;
use crate::error::ValidationErrors;
use crate::models::{
    AdPlacement, Book, Category, GeneratedSummary, QuizQuestion, SummaryRequest, LANGUAGE_OPTIONS,
};

/// Page location of the chapter sidebar slot.
pub const CHAPTER_AD_LOCATION: &str = "chapter-sidebar";

const STYLE: &str = "body{font-family:system-ui,sans-serif;max-width:60rem;margin:0 auto;padding:1rem;color:#1f2937}\
a{color:#4f46e5}.ch{color:#4b5563}.card{border:1px solid #e5e7eb;border-radius:.5rem;padding:1rem;margin:1rem 0}\
.layout{display:grid;grid-template-columns:3fr 1fr;gap:1.5rem}@media(max-width:48rem){.layout{grid-template-columns:1fr}}\
.error{background:#fef2f2;color:#b91c1c;padding:.75rem;border-radius:.375rem}nav.pager{display:flex;justify-content:space-between}";

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn path_segment(slug: &str) -> String {
    urlencoding::encode(slug).into_owned()
}

fn book_href(book: &Book) -> String {
    format!("/book/{}", path_segment(&book.slug))
}

fn chapter_href(book: &Book, chapter_slug: &str) -> String {
    format!("/book/{}/chapter/{}", path_segment(&book.slug), path_segment(chapter_slug))
}

pub fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>{STYLE}</style>
</head>
<body>
<header><a href="/">BookBridge</a> · <a href="/summaries">Summary Generator</a></header>
<main>
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
    )
}

pub fn message_page(title: &str, message: &str) -> String {
    page(
        title,
        &format!(
            r#"<h1>{}</h1><p>{}</p><p><a href="/">Return to homepage</a></p>"#,
            escape(title),
            escape(message)
        ),
    )
}

pub fn home(books: &[Book]) -> String {
    let mut body = String::from("<h1>Books</h1>");
    if books.is_empty() {
        body.push_str("<p>No books yet.</p>");
    }
    for book in books {
        let category = Category::find(&book.category_id)
            .map(|c| format!(r#"<p class="ch">{} · {}</p>"#, escape(c.name_en), escape(c.name_ch)))
            .unwrap_or_default();
        let _ = write!(
            body,
            r#"<article class="card"><h2><a href="{href}">{title}</a></h2><p class="ch">{title_ch}</p><p>{author}</p>{category}</article>"#,
            href = book_href(book),
            title = escape(&book.title),
            title_ch = escape(&book.title_ch),
            author = escape(&book.author),
        );
    }
    page("BookBridge", &body)
}

fn buy_link(book: &Book) -> String {
    if book.affiliate_url.is_empty() {
        return String::new();
    }
    format!(
        r#"<p><a href="{}" target="_blank" rel="noopener noreferrer">Buy Book</a></p>"#,
        escape(&book.affiliate_url)
    )
}

pub fn book_page(view: &BookView) -> String {
    let book = &view.book;
    let mut body = String::new();
    if !book.cover_image.is_empty() {
        let _ = write!(
            body,
            r#"<img src="{}" alt="{}" width="160">"#,
            escape(&book.cover_image),
            escape(&book.title)
        );
    }
    let _ = write!(
        body,
        r#"<h1>{}</h1><p class="ch">{}</p><p>{}</p><p>{}</p>{}"#,
        escape(&book.title),
        escape(&book.title_ch),
        escape(&book.author),
        escape(&book.description),
        buy_link(book)
    );

    // One disclosure for every screen size; open unless the reader folds it.
    let _ = write!(
        body,
        r#"<details class="chapters" open><summary>Chapters ({})</summary><ol>"#,
        view.chapters.len()
    );
    for chapter in &view.chapters {
        let _ = write!(
            body,
            r#"<li><a href="{}">{}</a> <span class="ch">{}</span></li>"#,
            chapter_href(book, &chapter.slug),
            escape(&chapter.title),
            escape(&chapter.title_ch)
        );
    }
    body.push_str("</ol></details>");
    if view.chapters.is_empty() {
        body.push_str("<p>No chapters yet.</p>");
    }
    page(&book.title, &body)
}

pub fn ad_slot(placement: &AdPlacement) -> String {
    format!(
        r#"<ins class="adsbygoogle" style="display:block" data-ad-client="{client}" data-ad-slot="{slot}" data-ad-format="{format}" data-full-width-responsive="true"></ins>
<script async src="https://pagead2.googlesyndication.com/pagead/js/adsbygoogle.js?client={client}" crossorigin="anonymous"></script>
<script>(adsbygoogle = window.adsbygoogle || []).push({{}});</script>"#,
        client = escape(&placement.ad_client),
        slot = escape(&placement.ad_slot),
        format = placement.format.as_str(),
    )
}

fn quiz(questions: &[QuizQuestion]) -> String {
    let mut out = String::from(r#"<section class="card"><h3>Quiz</h3>"#);
    for (i, question) in questions.iter().enumerate() {
        let _ = write!(out, "<h4>{}. {}</h4><ol type=\"A\">", i + 1, escape(&question.question));
        for option in &question.options {
            let _ = write!(out, "<li>{}</li>", escape(option));
        }
        out.push_str("</ol>");
        let answer = question
            .correct_option()
            .map(|text| format!("{}. {}", option_letter(question.correct_answer), escape(text)))
            .unwrap_or_default();
        let _ = write!(
            out,
            r#"<details><summary>Show answer</summary><p><strong>{answer}</strong></p><p>{}</p><p class="ch">{}</p></details>"#,
            escape(&question.explanation.en),
            escape(&question.explanation.ch)
        );
    }
    out.push_str("</section>");
    out
}

/// Chapter page; `ads` is empty whenever the adsense switch is off, and then
/// no ad markup is emitted at all.
pub fn chapter_page(view: &ChapterView, ads: &[AdPlacement]) -> String {
    let (book, chapter) = (&view.book, &view.chapter);
    let mut main = String::new();
    let _ = write!(
        main,
        r#"<p><a href="{}">Back to Book</a> | Chapter {}</p>{}<h1>{}</h1><p class="ch">{}</p><h2>{}</h2><p class="ch">{}</p>"#,
        book_href(book),
        chapter.order,
        buy_link(book),
        escape(&book.title),
        escape(&book.title_ch),
        escape(&chapter.title),
        escape(&chapter.title_ch)
    );

    match &view.content {
        None => main.push_str(r#"<p class="card">No content available for this chapter yet.</p>"#),
        Some(content) => {
            let _ = write!(
                main,
                r#"<section class="card"><h3>Summary</h3><p>{}</p><p class="ch">{}</p></section>"#,
                escape(&content.summary_en),
                escape(&content.summary_ch)
            );
            if !content.key_points.is_empty() {
                main.push_str(r#"<section class="card"><h3>Key Points</h3>"#);
                for point in &content.key_points {
                    let _ = write!(
                        main,
                        r#"<blockquote><p>{}</p><p class="ch">{}</p></blockquote>"#,
                        escape(&point.en),
                        escape(&point.ch)
                    );
                }
                main.push_str("</section>");
            }
            if !content.vocabulary.is_empty() {
                main.push_str(r#"<section class="card"><h3>Vocabulary</h3>"#);
                for item in &content.vocabulary {
                    let _ = write!(
                        main,
                        r#"<h4>{} <span class="ch">({})</span></h4>"#,
                        escape(&item.word),
                        escape(&item.translation)
                    );
                    if !item.context.is_empty() {
                        let _ = write!(
                            main,
                            r#"<p>{}</p><p class="ch">{}</p>"#,
                            escape(&item.context.en),
                            escape(&item.context.ch)
                        );
                    }
                    for example in item.examples.iter().filter(|e| !e.is_empty()) {
                        let _ = write!(
                            main,
                            r#"<p>• {}<br><span class="ch">{}</span></p>"#,
                            escape(&example.en),
                            escape(&example.ch)
                        );
                    }
                }
                main.push_str("</section>");
            }
        }
    }
    if !view.questions.is_empty() {
        main.push_str(&quiz(&view.questions));
    }

    main.push_str(r#"<nav class="pager">"#);
    match &view.previous {
        Some(prev) => {
            let _ = write!(main, r#"<a href="{}">← Previous Chapter</a>"#, chapter_href(book, &prev.slug));
        }
        None => main.push_str("<span></span>"),
    }
    if let Some(next) = &view.next {
        let _ = write!(main, r#"<a href="{}">Next Chapter →</a>"#, chapter_href(book, &next.slug));
    }
    main.push_str("</nav>");

    let sidebar: String = ads.iter().map(ad_slot).collect();
    let body = format!(r#"<div class="layout"><div>{main}</div><aside>{sidebar}</aside></div>"#);
    page(&format!("{} - {}", book.title, chapter.title), &body)
}

fn language_select(name: &str, selected: &str) -> String {
    let mut out = format!(r#"<select name="{name}">"#);
    for language in LANGUAGE_OPTIONS {
        let attr = if *language == selected { " selected" } else { "" };
        let _ = write!(out, r#"<option value="{language}"{attr}>{language}</option>"#);
    }
    out.push_str("</select>");
    out
}

fn summary_display(summary: &GeneratedSummary) -> String {
    let mut out = format!(
        r#"<section class="card"><h2>{} · {}</h2><p class="ch">{}</p><div class="layout"><div><h3>{}</h3><p>{}</p></div><div><h3>{}</h3><p>{}</p></div></div><h3>Key Points</h3><ul>"#,
        escape(&summary.book_title),
        escape(&summary.chapter_name),
        summary.date_generated.format("%Y-%m-%d %H:%M UTC"),
        escape(&summary.language1),
        escape(&summary.summary_text1),
        escape(&summary.language2),
        escape(&summary.summary_text2),
    );
    for point in &summary.key_points {
        let _ = write!(out, "<li>{}</li>", escape(point));
    }
    out.push_str("</ul><h3>Advanced Vocabulary</h3><dl>");
    for entry in &summary.advanced_vocabulary {
        let _ = write!(
            out,
            "<dt>{} <small>({})</small></dt><dd>{}</dd>",
            escape(&entry.term),
            escape(&entry.language),
            escape(&entry.definition)
        );
    }
    out.push_str("</dl><h3>Discussion Questions</h3><ol>");
    for question in &summary.questions {
        let _ = write!(out, "<li>{}</li>", escape(question));
    }
    out.push_str("</ol></section>");
    out
}

pub fn summaries_page(
    form: &SummaryRequest,
    errors: Option<&ValidationErrors>,
    current: Option<&GeneratedSummary>,
    history: &[GeneratedSummary],
) -> String {
    let mut body = String::from("<h1>Bilingual Summary Generator</h1>");
    if let Some(errors) = errors {
        body.push_str(r#"<div class="error"><ul>"#);
        for error in errors.iter() {
            let _ = write!(body, "<li>{}</li>", escape(&error.message));
        }
        body.push_str("</ul></div>");
    }
    let _ = write!(
        body,
        r#"<form method="post" action="/summaries" class="card">
<label>Book Title <input name="book_title" value="{}"></label>
<label>Chapter Name <input name="chapter_name" value="{}"></label>
<label>First Language {}</label>
<label>Second Language {}</label>
<button type="submit">Generate Summary</button>
</form>"#,
        escape(&form.book_title),
        escape(&form.chapter_name),
        language_select("language1", &form.language1),
        language_select("language2", &form.language2),
    );

    if let Some(summary) = current {
        body.push_str(&summary_display(summary));
    }

    if !history.is_empty() {
        body.push_str(r#"<section class="card"><h2>History</h2><ul>"#);
        for (i, entry) in history.iter().enumerate() {
            let _ = write!(
                body,
                r#"<li><a href="/summaries?view={i}">{} · {}</a> <small>{} / {}</small></li>"#,
                escape(&entry.book_title),
                escape(&entry.chapter_name),
                escape(&entry.language1),
                escape(&entry.language2),
            );
        }
        body.push_str("</ul></section>");
    }
    page("Summary Generator", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AdFormat, AdStatus};

    #[test]
    fn escapes_markup() {
        assert_eq!(escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn slugs_are_percent_encoded_in_links() {
        assert_eq!(path_segment("a b/c"), "a%20b%2Fc");
    }

    #[test]
    fn ad_slot_carries_client_and_slot() {
        let html = ad_slot(&AdPlacement {
            id: "1".into(),
            name: "Sidebar".into(),
            location: CHAPTER_AD_LOCATION.into(),
            ad_client: "ca-pub-42".into(),
            ad_slot: "999".into(),
            format: AdFormat::Rectangle,
            status: AdStatus::Active,
        });
        assert!(html.contains(r#"data-ad-client="ca-pub-42""#));
        assert!(html.contains(r#"data-ad-format="rectangle""#));
    }

    #[test]
    fn summary_form_keeps_selected_languages() {
        let form = SummaryRequest {
            language1: "French".into(),
            language2: "Korean".into(),
            ..SummaryRequest::default()
        };
        let html = summaries_page(&form, None, None, &[]);
        assert!(html.contains(r#"<option value="French" selected>"#));
        assert!(html.contains(r#"<option value="Korean" selected>"#));
        assert!(!html.contains("History"));
    }
}
