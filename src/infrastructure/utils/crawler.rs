use once_cell::sync::Lazy;
use regex::Regex;

/// Link-unfurling bots that need a direct media URL instead of the viewer page.
static CRAWLER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(discordbot|twitterbot|facebookexternalhit|facebot|slackbot|slack-imgproxy|telegrambot|whatsapp|linkedinbot|skypeuripreview|redditbot|mastodon|embedly|iframely|vkshare|pinterest)"
    )
    .expect("crawler pattern is valid")
});

pub fn is_crawler(user_agent: Option<&str>) -> bool {
    user_agent.is_some_and(|ua| CRAWLER_PATTERN.is_match(ua))
}
