use crate::forum::types::Post;
use std::collections::HashSet;

/// Exact, case-sensitive name lookup, the rule the filter applies to authors.
pub fn is_moderator(moderators: &[String], name: &str) -> bool {
    moderators.iter().any(|m| m == name)
}

/// Decides which authors are left out of the daily ranking.
#[derive(Debug, Clone)]
pub struct ExemptionFilter {
    moderators: HashSet<String>,
    bot_name: String,
    exempt_flair: String,
}

impl ExemptionFilter {
    pub fn new(
        moderators: impl IntoIterator<Item = String>,
        bot_name: impl Into<String>,
        exempt_flair: impl Into<String>,
    ) -> Self {
        Self {
            moderators: moderators.into_iter().collect(),
            bot_name: bot_name.into(),
            exempt_flair: exempt_flair.into(),
        }
    }

    /// True when the post's author must be skipped.
    ///
    /// An author is exempt if they moderate the forum, are the bot itself, or
    /// carry the exempt flair (exact, case-sensitive). Posts by deleted
    /// accounts are skipped too: there is nobody to name or suspend.
    pub fn is_exempt(&self, post: &Post) -> bool {
        let Some(author) = post.author_name.as_deref() else {
            return true;
        };
        self.moderators.contains(author)
            || author == self.bot_name
            || post.author_flair_text.as_deref() == Some(self.exempt_flair.as_str())
    }

    pub fn moderator_count(&self) -> usize {
        self.moderators.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(author: Option<&str>, flair: Option<&str>) -> Post {
        Post {
            id: "p".to_string(),
            author_name: author.map(str::to_string),
            author_flair_text: flair.map(str::to_string),
            score: 1,
            permalink: "/p".to_string(),
            body: String::new(),
        }
    }

    fn filter() -> ExemptionFilter {
        ExemptionFilter::new(vec!["mod1".to_string()], "goldibot", "Exempt")
    }

    #[test]
    fn test_regular_author_is_eligible() {
        assert!(!filter().is_exempt(&post(Some("alice"), None)));
    }

    #[test]
    fn test_moderator_is_exempt() {
        assert!(filter().is_exempt(&post(Some("mod1"), None)));
    }

    #[test]
    fn test_bot_account_is_exempt() {
        assert!(filter().is_exempt(&post(Some("goldibot"), None)));
    }

    #[test]
    fn test_exempt_flair_requires_exact_match() {
        let f = filter();
        assert!(f.is_exempt(&post(Some("alice"), Some("Exempt"))));
        assert!(!f.is_exempt(&post(Some("alice"), Some("exempt"))));
        assert!(!f.is_exempt(&post(Some("alice"), Some("Exempt "))));
        assert!(!f.is_exempt(&post(Some("alice"), Some("Not Exempt"))));
    }

    #[test]
    fn test_moderator_names_are_case_sensitive() {
        assert!(!filter().is_exempt(&post(Some("Mod1"), None)));
    }

    #[test]
    fn test_deleted_author_is_skipped() {
        assert!(filter().is_exempt(&post(None, None)));
    }

    #[test]
    fn test_moderator_lookup_is_case_sensitive() {
        let mods = vec!["mod1".to_string(), "GoldiBot".to_string()];
        assert!(is_moderator(&mods, "GoldiBot"));
        assert!(!is_moderator(&mods, "goldibot"));
        assert!(!is_moderator(&[], "mod1"));
    }
}
