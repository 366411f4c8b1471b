use std::time::Duration;

use super::element::{h, Node};

/// Rounded up, so the refresh never fires before the timer
fn whole_seconds(after: Duration) -> u128 {
    after.as_millis().div_ceil(1000)
}

/// Shown briefly while the browser follows a `Location` header
pub fn redirect_notice(url: &str) -> Node {
    h("p")
        .class("redirect")
        .child("Redirecting to ")
        .child(h("a").attr("href", url).child(url))
        .into()
}

/// "Not Found" notice with links home; navigation itself is driven by the head
pub fn not_found(path: &str, fallback: &str, after: Duration) -> Node {
    h("div")
        .class("not-found")
        .child(h("h2").child("Not Found"))
        .child(
            h("p")
                .child("No shortcut named ")
                .child(h("code").child(path))
                .child(format!(". Returning to the start page in {} seconds.", whole_seconds(after))),
        )
        .child(
            h("p")
                .child(h("a").attr("href", fallback).child("Start page"))
                .child(" · ")
                .child(h("a").attr("href", "/").child("Home")),
        )
        .into()
}

/// The shortcut table itself could not be read
pub fn load_error(message: &str) -> Node {
    h("div")
        .class("not-found error")
        .child(h("h2").child("Shortcuts unavailable"))
        .child(h("p").class("error-message").child("The shortcut list could not be loaded."))
        .child(h("pre").child(message))
        .child(h("p").child(h("a").attr("href", "/").child("Home")))
        .into()
}

/// `<meta>` refresh plus a timer, so the fallback fires with or without scripts
pub fn delayed_navigation(url: &str, after: Duration) -> String {
    let meta: Node = h("meta")
        .attr("http-equiv", "refresh")
        .attr("content", format!("{};url={}", whole_seconds(after), url))
        .into();
    let target = serde_json::to_string(url).unwrap_or_else(|_| "\"/\"".to_string());
    format!(
        "{}<script>setTimeout(function () {{ window.location.href = {}; }}, {});</script>",
        meta.to_html(),
        target.replace("</", "<\\/"),
        after.as_millis()
    )
}
