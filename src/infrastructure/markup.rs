// Markup helpers shared by the HTML page and SVG charts

/// Escape text for use in element content or a quoted attribute
pub fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
