use std::fmt::Write;

use super::SummaryConfig;
use crate::llm::ChatMessage;
use crate::types::{RelatedQuestion, SearchResult};

#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: ChatMessage,
    pub user: ChatMessage,
}

/// Anchor id of the result at `index` in the rendered list
pub fn result_anchor(index: usize) -> String {
    format!("result-{}", index)
}

fn organic_digest(result: &SearchResult) -> String {
    let mut digest = String::new();
    for (index, item) in result.organic_results.iter().enumerate() {
        let _ = write!(
            digest,
            "\n\n[{}]. {}\n{}\nid: #{}\n{}",
            item.position,
            item.title,
            item.snippet,
            result_anchor(index),
            item.link
        );
    }
    digest
}

fn questions_digest(questions: &[RelatedQuestion]) -> String {
    let mut digest = String::new();
    for question in questions {
        let _ = write!(digest, "\n\n- {}", question.question);
        for extra in [&question.snippet, &question.link].into_iter().flatten() {
            let _ = write!(digest, "\n{}", extra);
        }
    }
    digest
}

fn system_instruction(lang: Option<&str>) -> String {
    let language = lang.unwrap_or("same language as the query");
    format!(
        "As a search assistant, your task is to help the user understand the search results by providing a detailed summary. \
Highlight the key points, relevant facts, and important information found in the search results. \
When citing links, please use the format <sup>[[1](#result-0)]</sup>, where the number is the result number and the anchor is its id. \
Additionally, offer insights and context where necessary to enhance the user's comprehension. \
Please use {} and markdown in your response.",
        language
    )
}

/// Assemble the system and user messages for one search result
pub fn build(result: &SearchResult, config: &SummaryConfig) -> Prompt {
    let mut user = format!(
        "Query: {}\nSearch Result: {}",
        result.search_parameters.q,
        organic_digest(result)
    );
    if config.include_related_questions {
        if let Some(questions) = result.related_questions.as_deref().filter(|q| !q.is_empty()) {
            let _ = write!(user, "\nRelated Questions: {}", questions_digest(questions));
        }
    }
    Prompt {
        system: ChatMessage::system(system_instruction(config.lang.as_deref())),
        user: ChatMessage::user(user),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Role;
    use crate::types::{OrganicResult, SearchParameters};

    fn sample() -> SearchResult {
        SearchResult {
            search_parameters: SearchParameters { q: "cats".to_string() },
            organic_results: vec![
                OrganicResult {
                    position: 1,
                    title: "Cat".to_string(),
                    snippet: "Small carnivore.".to_string(),
                    link: "https://en.wikipedia.org/wiki/Cat".to_string(),
                    ..Default::default()
                },
                OrganicResult {
                    position: 2,
                    title: "Cats (musical)".to_string(),
                    snippet: "Andrew Lloyd Webber.".to_string(),
                    link: "https://example.com/cats".to_string(),
                    ..Default::default()
                },
            ],
            related_questions: Some(vec![RelatedQuestion {
                question: "Do cats sleep a lot?".to_string(),
                snippet: Some("Up to 16 hours.".to_string()),
                ..Default::default()
            }]),
            ..Default::default()
        }
    }

    #[test]
    fn user_message_numbers_each_result_with_its_anchor() {
        let prompt = build(&sample(), &SummaryConfig::default());
        assert_eq!(prompt.user.role, Role::User);
        assert_eq!(
            prompt.user.content,
            "Query: cats\nSearch Result: \n\n[1]. Cat\nSmall carnivore.\nid: #result-0\nhttps://en.wikipedia.org/wiki/Cat\
\n\n[2]. Cats (musical)\nAndrew Lloyd Webber.\nid: #result-1\nhttps://example.com/cats"
        );
        assert!(!prompt.user.content.contains("Related Questions"));
    }

    #[test]
    fn extended_variant_appends_related_questions() {
        let config = SummaryConfig { include_related_questions: true, ..SummaryConfig::default() };
        let prompt = build(&sample(), &config);
        assert!(prompt.user.content.ends_with("\nRelated Questions: \n\n- Do cats sleep a lot?\nUp to 16 hours."));
    }

    #[test]
    fn system_message_pins_language_and_citations() {
        let default = build(&sample(), &SummaryConfig::default());
        assert!(default.system.content.contains("same language as the query"));
        assert!(default.system.content.contains("<sup>[[1](#result-0)]</sup>"));

        let config = SummaryConfig { lang: Some("Deutsch".to_string()), ..SummaryConfig::default() };
        assert!(build(&sample(), &config).system.content.contains("Please use Deutsch and markdown"));
    }
}
