//! HTML pages served by the relay.

/// Render the page that presents the refresh token for manual copying.
///
/// The token is HTML-escaped before substitution. An absent token renders
/// as an empty string.
pub fn extension_token_page(refresh_token: Option<&str>) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Spotify Extension Token</title>
</head>
<body>
    <h1>Spotify Extension Token</h1>
    <p>
        Your Spotify extension token is: <strong>{}</strong>
        <br>
        When you close this window, add this token to the extension settings.
    </p>
</body>
</html>
"#,
        escape_html(refresh_token.unwrap_or(""))
    )
}

/// Escape a string for embedding in HTML text content.
fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}
