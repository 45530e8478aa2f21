//! HTML pages
//!
//! Pages are rendered with `format!` over a shared layout. Any text that
//! came from a user or from Spotify goes through [`escape_html`].

use axum::response::{Html, IntoResponse, Redirect};

use crate::error::ApiError;

pub const WELCOME_MESSAGE: &str = "Welcome!";
pub const INVALID_INPUT_MESSAGE: &str = "Please enter a valid value.";
pub const NO_GENRES_MESSAGE: &str =
    "We couldn't find any genres we recognise in that playlist. Try another one!";

const HOW_IT_WORKS: &[&str] = &[
    "Your playlist is ingested using its unique url.",
    "From there, the metadata of the playlist is identified using the Spotify API.",
    "The genres present in the playlist are analyzed by frequency.",
    "The analysis associates particular genres with phrases and words and then generates a set of words describing your playlist.",
];

const ABOUT: &[&str] = &[
    "Moodring turns a Spotify playlist into a few words about how it feels.",
    "It groups the genres of every artist on the playlist into broad families and picks a mood word for the families that show up most.",
];

const STYLE: &str = r#"
        body {
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            background-color: #1a1a1a;
            color: #e0e0e0;
            line-height: 1.6;
            margin: 0;
        }
        header {
            background-color: #2a2a2a;
            border-bottom: 1px solid #3a3a3a;
            padding: 20px;
        }
        header a {
            color: #4a9eff;
            margin-right: 16px;
            text-decoration: none;
        }
        .container {
            max-width: 720px;
            margin: 30px auto;
            padding: 0 20px;
        }
        .message {
            background-color: #2a2a2a;
            border-radius: 8px;
            padding: 16px;
            font-size: 20px;
            margin: 20px 0;
        }
        input[type=text] {
            width: 70%;
            padding: 8px;
        }
        iframe {
            border: 0;
            border-radius: 12px;
            width: 100%;
            height: 380px;
        }
"#;

/// Escape text for inclusion in HTML content or attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - Moodring</title>
    <style>{STYLE}</style>
</head>
<body>
    <header>
        <a href="/input">Moodring</a>
        <a href="/how-it-works">How it works</a>
        <a href="/about">About</a>
    </header>
    <div class="container">
{body}
    </div>
</body>
</html>
"#,
        title = escape_html(title),
    ))
}

/// Input form page with a message and, after a lookup, the embedded player
pub fn render_index(description: &str, embed_src: Option<&str>) -> Html<String> {
    let player = embed_src
        .map(|src| {
            format!(
                r#"        <iframe src="{}" allow="autoplay; clipboard-write; encrypted-media; fullscreen; picture-in-picture" loading="lazy"></iframe>
"#,
                escape_html(src)
            )
        })
        .unwrap_or_default();

    let body = format!(
        r#"        <h1>What's your playlist's mood?</h1>
        <form method="post" action="/input/">
            <input type="text" name="anything" placeholder="Spotify playlist link or id">
            <button type="submit">Describe</button>
        </form>
        <div class="message" id="description">{}</div>
{}"#,
        escape_html(description),
        player
    );

    layout("Playlist mood", &body)
}

fn render_paragraphs(title: &str, lines: &[&str]) -> Html<String> {
    let paragraphs: String = lines
        .iter()
        .map(|line| format!("        <p>{}</p>\n", escape_html(line)))
        .collect();
    layout(title, &format!("        <h1>{}</h1>\n{}", escape_html(title), paragraphs))
}

/// GET /
pub async fn redirect_to_input() -> Redirect {
    Redirect::to("/input")
}

/// GET /input
pub async fn welcome_page() -> Html<String> {
    render_index(WELCOME_MESSAGE, None)
}

/// GET /about
pub async fn about_page() -> Html<String> {
    render_paragraphs("About", ABOUT)
}

/// GET /how-it-works
pub async fn how_it_works_page() -> Html<String> {
    render_paragraphs("How it works", HOW_IT_WORKS)
}

/// Fallback for unknown routes
pub async fn not_found(uri: axum::http::Uri) -> impl IntoResponse {
    ApiError::NotFound(uri.path().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<script>alert("x") & 'y'</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;) &amp; &#39;y&#39;&lt;/script&gt;"
        );
        assert_eq!(escape_html("gritty, bold"), "gritty, bold");
    }

    #[test]
    fn test_index_without_player() {
        let Html(page) = render_index(WELCOME_MESSAGE, None);
        assert!(page.contains("Welcome!"));
        assert!(page.contains(r#"name="anything""#));
        assert!(!page.contains("<iframe"));
    }

    #[test]
    fn test_index_with_player_escapes_src() {
        let Html(page) = render_index(
            "gritty, bold",
            Some("https://open.spotify.com/embed/playlist/abc?utm_source=generator&theme=0"),
        );
        assert!(page.contains("gritty, bold"));
        assert!(page.contains("abc?utm_source=generator&amp;theme=0"));
    }
}
