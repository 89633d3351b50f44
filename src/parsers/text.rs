/// Normalizes text produced by the HTML walker.
///
/// Lines are trimmed and have their inner whitespace collapsed, runs of
/// empty lines become a single paragraph break, and leading and trailing
/// blank lines are dropped.
pub fn normalize(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }

    split_into_paragraphs(text)
        .iter()
        .map(|para| process_paragraph(para))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Splits text into paragraphs of trimmed, non-empty lines
pub fn split_into_paragraphs(text: &str) -> Vec<Vec<&str>> {
    let mut paragraphs: Vec<Vec<&str>> = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if !current.is_empty() {
                paragraphs.push(std::mem::take(&mut current));
            }
        } else {
            current.push(trimmed);
        }
    }

    if !current.is_empty() {
        paragraphs.push(current);
    }

    paragraphs
}

/// Joins the lines of a paragraph, collapsing whitespace inside each line
pub fn process_paragraph(paragraph: &[&str]) -> String {
    paragraph
        .iter()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}
