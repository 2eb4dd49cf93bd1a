//! Text cleanup applied before chat content reaches the PDF.
//!
//! Chat messages arrive HTML-escaped and emoji-laden; PDF literal strings
//! with WinAnsi encoding can represent neither. The cleanup unescapes the
//! four entities the chat pipeline produces, drops stray code-fence
//! delimiters, and substitutes the emoji the assistant is known to emit
//! with bracketed ASCII equivalents. Anything unrecognized passes through
//! untouched.

/// Known emoji and their bracketed ASCII stand-ins.
const EMOJI_SUBSTITUTIONS: [(&str, &str); 16] = [
    ("\u{2705}", "[OK]"),          // ✅
    ("\u{274C}", "[X]"),           // ❌
    ("\u{26A0}\u{FE0F}", "[!]"),   // ⚠️
    ("\u{26A0}", "[!]"),           // ⚠ without variation selector
    ("\u{2757}", "[!]"),           // ❗
    ("\u{2B50}", "[star]"),        // ⭐
    ("\u{27A1}\u{FE0F}", "->"),    // ➡️
    ("\u{1F4F7}", "[photo]"),      // 📷
    ("\u{1F4C4}", "[doc]"),        // 📄
    ("\u{1F4A1}", "[tip]"),        // 💡
    ("\u{1F50D}", "[search]"),     // 🔍
    ("\u{1F4CA}", "[chart]"),      // 📊
    ("\u{1F3E0}", "[home]"),       // 🏠
    ("\u{1F4DE}", "[call]"),       // 📞
    ("\u{2709}\u{FE0F}", "[email]"), // ✉️
    ("\u{1F4CC}", "[pin]"),        // 📌
];

/// Unescape entities, strip code-fence delimiters, substitute emoji.
pub fn clean_text(input: &str) -> String {
    let mut text = input
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"");
    text = strip_fence_delimiters(&text);
    substitute_emoji(&text)
}

/// Remove ``` delimiters while keeping the fenced content itself.
fn strip_fence_delimiters(text: &str) -> String {
    let lines: Vec<&str> = text
        .lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect();
    lines.join("\n")
}

/// Best-effort emoji replacement. Unknown emoji pass through and are
/// later downgraded by the PDF writer's encoding fallback.
fn substitute_emoji(text: &str) -> String {
    let mut out = text.to_string();
    for (emoji, replacement) in EMOJI_SUBSTITUTIONS {
        if out.contains(emoji) {
            out = out.replace(emoji, replacement);
        }
    }
    out
}
