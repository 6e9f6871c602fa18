use scraper::Html;

/// Extract plain text from an HTML fragment, keeping word boundaries at
/// block elements and collapsing whitespace. Plain text passes through
/// unchanged apart from whitespace.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_fragment(html);
    let mut text = String::new();

    for node in document.root_element().descendants() {
        if let Some(text_node) = node.value().as_text() {
            text.push_str(text_node);
        }
        if let Some(element) = node.value().as_element() {
            match element.name() {
                "p" | "br" | "div" | "li" | "h1" | "h2" | "h3" | "h4" | "td" => text.push(' '),
                _ => {}
            }
        }
    }

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
