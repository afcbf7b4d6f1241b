//! Robots.txt rule evaluation
//!
//! Matching is delegated to the robotstxt crate; this module only keeps the raw file
//! around and reads the `Crawl-delay` directive, which the matcher does not expose.

use robotstxt::DefaultMatcher;
use std::time::Duration;

/// Rules from one robots.txt file
#[derive(Debug, Clone, Default)]
pub struct RobotsRules {
    /// Raw robots.txt content (empty string means allow all)
    content: String,
}

impl RobotsRules {
    /// Wraps raw robots.txt content
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
        }
    }

    /// Rules that allow everything
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Checks if a URL is allowed for the given user agent
    ///
    /// # Arguments
    ///
    /// * `url` - Absolute URL or path to check
    /// * `user_agent` - The user agent string; only its product token is matched
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        if self.content.trim().is_empty() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, &product_token(user_agent), url)
    }

    /// Gets the crawl delay that applies to `user_agent`
    ///
    /// A group naming the agent wins over the `*` group. Agent names are compared
    /// case-insensitively against the product token of `user_agent`.
    pub fn crawl_delay(&self, user_agent: &str) -> Option<Duration> {
        let token = product_token(user_agent);

        let mut group: Vec<String> = Vec::new();
        let mut group_open = false;
        let mut for_agent = None;
        let mut for_wildcard = None;

        for line in self.content.lines() {
            let line = line.split('#').next().unwrap_or("").trim();
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim().to_lowercase();
            let value = value.trim();

            match key.as_str() {
                "user-agent" => {
                    // consecutive user-agent lines share one group
                    if !group_open {
                        group.clear();
                        group_open = true;
                    }
                    group.push(value.to_lowercase());
                }
                "crawl-delay" => {
                    group_open = false;
                    let Ok(seconds) = value.parse::<f64>() else {
                        continue;
                    };
                    if !seconds.is_finite() || seconds < 0.0 {
                        continue;
                    }
                    let delay = Duration::from_secs_f64(seconds);

                    if group.iter().any(|agent| *agent == token) {
                        for_agent = Some(delay);
                    } else if group.iter().any(|agent| agent == "*") {
                        for_wildcard = Some(delay);
                    }
                }
                _ => group_open = false,
            }
        }

        for_agent.or(for_wildcard)
    }
}

/// Lowercased product token of a user agent string (`Name/1.0 (+info)` -> `name`)
fn product_token(user_agent: &str) -> String {
    user_agent
        .split(|c: char| c == '/' || c.is_whitespace())
        .next()
        .unwrap_or("")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_all() {
        let robots = RobotsRules::allow_all();
        assert!(robots.is_allowed("http://www.example.com/any/path", "TestBot"));
        assert!(robots.is_allowed("http://www.example.com/admin", "TestBot"));
    }

    #[test]
    fn test_disallow_all() {
        let robots = RobotsRules::from_content("User-agent: *\nDisallow: /");
        assert!(!robots.is_allowed("http://www.example.com/", "TestBot"));
        assert!(!robots.is_allowed("http://www.example.com/page", "TestBot"));
    }

    #[test]
    fn test_disallow_specific() {
        let robots = RobotsRules::from_content("User-agent: *\nDisallow: /secret");
        assert!(robots.is_allowed("http://www.example.com/", "TestBot"));
        assert!(!robots.is_allowed("http://www.example.com/secret", "TestBot"));
        assert!(!robots.is_allowed("http://www.example.com/secret/inner", "TestBot"));
    }

    #[test]
    fn test_allow_overrides_disallow() {
        let content = "User-agent: *\nDisallow: /private\nAllow: /private/public";
        let robots = RobotsRules::from_content(content);
        assert!(!robots.is_allowed("http://www.example.com/private", "TestBot"));
        assert!(robots.is_allowed("http://www.example.com/private/public", "TestBot"));
    }

    #[test]
    fn test_specific_user_agent() {
        let content = "User-agent: BadBot\nDisallow: /\n\nUser-agent: *\nAllow: /";
        let robots = RobotsRules::from_content(content);
        assert!(robots.is_allowed("http://www.example.com/page", "GoodBot"));
        assert!(!robots.is_allowed("http://www.example.com/page", "BadBot/2.0"));
    }

    #[test]
    fn test_garbage_allows_all() {
        let robots = RobotsRules::from_content("This is not valid robots.txt {{{");
        assert!(robots.is_allowed("http://www.example.com/any/path", "TestBot"));
    }

    #[test]
    fn test_crawl_delay_wildcard() {
        let robots = RobotsRules::from_content("User-agent: *\nCrawl-delay: 10\nDisallow: /admin");
        assert_eq!(robots.crawl_delay("TestBot"), Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_crawl_delay_specific_agent_wins() {
        let content = "User-agent: *\nCrawl-delay: 10\n\nUser-agent: TestBot\nCrawl-delay: 5";
        let robots = RobotsRules::from_content(content);
        assert_eq!(robots.crawl_delay("TestBot/1.0"), Some(Duration::from_secs(5)));
        assert_eq!(robots.crawl_delay("OtherBot"), Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_crawl_delay_grouped_agents() {
        let content = "User-agent: BotA\nUser-agent: BotB\nCrawl-delay: 3";
        let robots = RobotsRules::from_content(content);
        assert_eq!(robots.crawl_delay("BotA"), Some(Duration::from_secs(3)));
        assert_eq!(robots.crawl_delay("botb"), Some(Duration::from_secs(3)));
        assert_eq!(robots.crawl_delay("BotC"), None);
    }

    #[test]
    fn test_crawl_delay_decimal_and_missing() {
        let robots = RobotsRules::from_content("User-agent: *\nCrawl-delay: 2.5");
        assert_eq!(robots.crawl_delay("TestBot"), Some(Duration::from_millis(2500)));

        let robots = RobotsRules::from_content("User-agent: *\nDisallow: /admin");
        assert_eq!(robots.crawl_delay("TestBot"), None);
        assert_eq!(RobotsRules::allow_all().crawl_delay("TestBot"), None);
    }

    #[test]
    fn test_product_token() {
        assert_eq!(product_token("lame-sitemapper/0.1 (+https://example.com)"), "lame-sitemapper");
        assert_eq!(product_token("TestBot"), "testbot");
    }
}
