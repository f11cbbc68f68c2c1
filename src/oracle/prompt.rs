//! Selection prompt construction and response parsing

use crate::oracle::traits::{OracleError, RelevanceRequest};

/// System prompt describing the crawler's job to the model
pub const SYSTEM_PROMPT: &str = "You are an intelligent web crawler that analyzes page content \
and decides which links to follow. Your goal is to build a comprehensive knowledge base about \
the topic while staying focused on relevant content. Consider whether the linked content is \
likely to contain valuable information and whether it relates to the topic. Avoid \
administrative, login, or policy pages. Prioritize documentation, guides, and substantive content.";

/// Truncates `text` to at most `max_chars` characters
///
/// Counts characters, not bytes, so multi-byte text is never split inside a
/// code point.
pub fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Builds the user prompt asking the model for link indices
pub fn build_selection_prompt(request: &RelevanceRequest<'_>) -> String {
    let link_list = request
        .candidates
        .iter()
        .map(|c| format!("{}: [{}] {}", c.index, c.text, c.url))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are analyzing a webpage about {topic} to decide which links to follow next.

Current page ({page_url}) content summary:
{preview}

Available links (format: index: [link text] URL):
{link_list}

Instructions:
1. Choose links that seem most relevant to learning about {topic}
2. Prefer links to documentation, guides, and detailed content
3. Avoid links to login pages, policies, or administrative sections
4. Select 3-5 most promising links

Return ONLY the indices of chosen links, comma-separated without spaces.
Example return format: 0,2,5

Your selection:",
        topic = request.topic,
        page_url = request.page_url,
        preview = request.preview,
        link_list = link_list,
    )
}

/// Parses a comma-separated index list such as `0,2,5`
///
/// Whitespace around tokens is tolerated. Any token that is not an integer
/// makes the whole answer malformed. Negative integers parse but are dropped,
/// the same as any other out-of-range index. Range checking against the
/// candidate list is left to the caller.
pub fn parse_selection(text: &str) -> Result<Vec<usize>, OracleError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(OracleError::Malformed("empty selection".to_string()));
    }

    let mut indices = Vec::new();
    for token in text.split(',') {
        let token = token.trim();
        let value: i64 = token
            .parse()
            .map_err(|_| OracleError::Malformed(format!("'{}' is not an index", token)))?;
        if let Ok(index) = usize::try_from(value) {
            indices.push(index);
        }
    }

    Ok(indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::traits::Candidate;

    #[test]
    fn test_parse_simple() {
        assert_eq!(parse_selection("0,2,5").unwrap(), vec![0, 2, 5]);
    }

    #[test]
    fn test_parse_keeps_order_and_repeats() {
        assert_eq!(parse_selection("4,1,4").unwrap(), vec![4, 1, 4]);
    }

    #[test]
    fn test_parse_tolerates_whitespace() {
        assert_eq!(parse_selection(" 1, 3 ,7\n").unwrap(), vec![1, 3, 7]);
    }

    #[test]
    fn test_parse_drops_negative() {
        assert_eq!(parse_selection("-1,2").unwrap(), vec![2]);
    }

    #[test]
    fn test_parse_rejects_prose() {
        assert!(matches!(
            parse_selection("I would pick links 0 and 2"),
            Err(OracleError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_rejects_partial_garbage() {
        assert!(parse_selection("0,two,3").is_err());
        assert!(parse_selection("0,,3").is_err());
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(parse_selection("").is_err());
        assert!(parse_selection("   ").is_err());
    }

    #[test]
    fn test_preview_truncates_by_chars() {
        assert_eq!(preview("hello world", 5), "hello");
        assert_eq!(preview("short", 50), "short");
        assert_eq!(preview("héllo", 2), "hé");
        assert_eq!(preview("", 3), "");
    }

    #[test]
    fn test_prompt_lists_candidates() {
        let candidates = vec![
            Candidate {
                index: 0,
                url: "https://example.test/guide".to_string(),
                text: "Guide".to_string(),
            },
            Candidate {
                index: 1,
                url: "https://example.test/login".to_string(),
                text: "No description".to_string(),
            },
        ];
        let request = RelevanceRequest {
            topic: "installation",
            page_url: "https://example.test/",
            preview: "Welcome to the docs",
            candidates: &candidates,
        };

        let prompt = build_selection_prompt(&request);
        assert!(prompt.contains("learning about installation"));
        assert!(prompt.contains("Welcome to the docs"));
        assert!(prompt.contains("0: [Guide] https://example.test/guide"));
        assert!(prompt.contains("1: [No description] https://example.test/login"));
    }
}
