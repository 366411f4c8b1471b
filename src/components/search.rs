use std::collections::HashMap;

use super::element::{fragment, h, raw, Node};
use crate::pages::search::SearchState;
use crate::services::MarkdownService;
use crate::summary::{result_anchor, SummaryConfig, SummaryStatus};
use crate::types::{OrganicResult, RelatedQuestion, RelatedSearch, SearchResult, TopStory};
use crate::utils::replace_query_param;

/// Ids of the regions the live search page fills in
pub const REGION_IDS: [&str; 6] = [
    "error",
    "overview",
    "results",
    "top-stories",
    "related-questions",
    "related-searches",
];

/// Search form; `lang` and `model` ride along as hidden fields
pub fn search_form(query: &str, lang: Option<&str>, model: Option<&str>) -> Node {
    let hidden = [("lang", lang), ("model", model)]
        .into_iter()
        .filter_map(|(name, value)| value.filter(|v| !v.is_empty()).map(|v| (name, v)))
        .map(|(name, value)| h("input").attr("type", "hidden").attr("name", name).attr("value", value));

    fragment([
        Node::from(h("h2").child("Search")),
        h("form")
            .class("flex")
            .id("search-form")
            .attr("action", "/search")
            .attr("method", "get")
            .child(
                h("input")
                    .attr("value", query)
                    .attr("name", "q")
                    .attr("type", "search")
                    .flag("autofocus", true)
                    .class("input")
                    .attr("placeholder", "Type keyword to search"),
            )
            .children(hidden)
            .child(h("button").attr("type", "submit").class("button button-primary").child("Search"))
            .into(),
    ])
}

/// Static skeleton of the search page; regions are filled by the event stream
pub fn search_page(query: &str, lang: Option<&str>, model: Option<&str>) -> Node {
    fragment(
        std::iter::once(search_form(query, lang, model))
            .chain(REGION_IDS.iter().map(|id| Node::from(h("section").id(*id)))),
    )
}

pub fn overview(state: &SearchState, config: &SummaryConfig, markdown: &MarkdownService) -> Node {
    let summary = &state.summary;
    let body = match summary.status() {
        SummaryStatus::Idle | SummaryStatus::Streaming if summary.text().is_empty() => {
            h("p").class("overview-pending").child("Summarizing…").into()
        }
        _ => raw(markdown.render(summary.text())),
    };
    let failure = match summary.status() {
        SummaryStatus::Failed(reason) => Some(h("p").class("overview-error").child(reason.as_str())),
        _ => None,
    };
    let follow_up = match (summary.status(), config.continuation_url.as_deref()) {
        (SummaryStatus::Done, Some(url)) => Some(follow_up_form(url, summary.text())),
        _ => None,
    };
    fragment([
        Node::from(h("h2").child("Overview")),
        h("div").class("overview").child(body).into(),
        failure.into(),
        follow_up.into(),
    ])
}

/// Continue the conversation on an external page, seeded with the summary
pub fn follow_up_form(url: &str, summary: &str) -> Node {
    h("form")
        .class("flex follow-up")
        .attr("action", url)
        .attr("method", "get")
        .attr("target", "_blank")
        .child(h("input").attr("type", "hidden").attr("name", "context").attr("value", summary))
        .child(
            h("input")
                .attr("name", "q")
                .attr("type", "text")
                .class("input")
                .attr("placeholder", "Ask a follow-up question"),
        )
        .child(h("button").attr("type", "submit").class("button").child("Ask"))
        .into()
}

fn organic_item(index: usize, item: &OrganicResult) -> Node {
    let favicon = item
        .favicon
        .as_deref()
        .map(|src| h("img").attr("src", src).attr("width", "16").attr("height", "16"));
    h("li")
        .id(result_anchor(index))
        .child(favicon)
        .child(h("span").child(item.displayed_link.as_str()))
        .child(h("a").attr("href", item.link.as_str()).child(item.title.as_str()))
        .child(h("p").child(item.snippet.as_str()))
        .into()
}

pub fn result_list(result: &SearchResult) -> Node {
    fragment([
        Node::from(h("h2").child("Results")),
        h("ul")
            .class("search-results list")
            .children(result.organic_results.iter().enumerate().map(|(i, item)| organic_item(i, item)))
            .into(),
    ])
}

fn story_item(item: &TopStory) -> Node {
    let thumbnail = item.thumbnail.as_deref().map(|src| h("img").attr("src", src).attr("alt", ""));
    h("li")
        .class("flex flex-row")
        .child(thumbnail)
        .child(
            h("div")
                .child(h("a").attr("href", item.link.as_str()).class("block").child(item.title.as_str()))
                .child(h("span").class("block").child(item.source.as_str()))
                .child(h("time").child(item.date.as_str())),
        )
        .into()
}

pub fn top_stories(stories: &[TopStory]) -> Node {
    fragment([
        Node::from(h("h2").child("Top Stories")),
        h("ul").class("top-stories list").children(stories.iter().map(story_item)).into(),
    ])
}

fn question_item(item: &RelatedQuestion) -> Node {
    let logo = item
        .source_logo
        .as_deref()
        .map(|src| h("img").attr("src", src).attr("width", "16").attr("height", "16"));
    let source = item.link.as_deref().map(|link| {
        h("a")
            .attr("href", link)
            .class("block")
            .child(item.title.clone().unwrap_or_else(|| link.to_string()))
    });
    h("li")
        .child(h("a").class("question").child(item.question.as_str()))
        .child(item.snippet.as_deref().map(|s| h("p").class("answer").child(s)))
        .child(
            h("div")
                .child(logo)
                .child(item.displayed_link.as_deref().map(|d| h("span").child(d)))
                .child(source),
        )
        .into()
}

pub fn related_questions(questions: &[RelatedQuestion]) -> Node {
    fragment([
        Node::from(h("h2").child("Related Questions")),
        h("ul").class("related-questions list").children(questions.iter().map(question_item)).into(),
    ])
}

pub fn related_searches(searches: &[RelatedSearch], location: &str) -> Node {
    fragment([
        Node::from(h("h2").child("Related Searches")),
        h("ul")
            .class("related-searches list")
            .children(searches.iter().map(|item| {
                let href = format!("/search{}", replace_query_param(location, "q", &item.query));
                h("li").child(h("a").attr("href", href).child(item.query.as_str()))
            }))
            .into(),
    ])
}

/// One named, independently replaceable part of the search page
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub name: &'static str,
    pub html: String,
}

/// Render every region from scratch
pub fn render_regions(state: &SearchState, config: &SummaryConfig, markdown: &MarkdownService) -> Vec<Region> {
    let result = state.result.as_ref();
    let with_organic = result.filter(|r| r.has_organic_results());
    let nodes: [(&'static str, Node); 6] = [
        (
            "error",
            state.error.as_deref().map(|e| h("p").class("error-message").child(e)).into(),
        ),
        (
            "overview",
            with_organic.map(|_| overview(state, config, markdown)).into(),
        ),
        ("results", with_organic.map(result_list).into()),
        (
            "top-stories",
            result.and_then(|r| r.top_stories.as_deref()).map(top_stories).into(),
        ),
        (
            "related-questions",
            result.and_then(|r| r.related_questions.as_deref()).map(related_questions).into(),
        ),
        (
            "related-searches",
            result
                .and_then(|r| r.related_searches.as_deref())
                .map(|s| related_searches(s, &state.location))
                .into(),
        ),
    ];
    nodes
        .into_iter()
        .map(|(name, node)| Region { name, html: node.to_html() })
        .collect()
}

/// Remembers what the client already shows; only changed regions go out
#[derive(Debug, Default)]
pub struct RegionCache {
    shown: HashMap<&'static str, String>,
}

impl RegionCache {
    pub fn reconcile(&mut self, regions: Vec<Region>) -> Vec<Region> {
        regions
            .into_iter()
            .filter(|region| {
                let changed = self.shown.get(region.name) != Some(&region.html);
                if changed {
                    self.shown.insert(region.name, region.html.clone());
                }
                changed
            })
            .collect()
    }
}
