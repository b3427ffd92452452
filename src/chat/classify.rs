//! Message classification into a context profile.

/// Which context sources a reply should draw on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextProfile {
    /// Facebook updates from the configured pages.
    Events,
    /// Local church documents only.
    Policy,
    /// Documents plus Facebook insights.
    General,
}

/// One classification rule: a profile and the keywords that select it.
#[derive(Debug, Clone)]
pub struct ProfileRule {
    pub profile: ContextProfile,
    pub keywords: Vec<String>,
}

/// Ordered keyword matcher. Rules are checked in order and the first rule
/// with any keyword appearing in the lowercased message wins; messages
/// matching no rule fall through to [`ContextProfile::General`].
pub struct QueryClassifier {
    rules: Vec<ProfileRule>,
}

impl QueryClassifier {
    pub fn new(rules: Vec<ProfileRule>) -> Self {
        Self { rules }
    }

    pub fn classify(&self, message: &str) -> ContextProfile {
        let lowered = message.to_lowercase();
        for rule in &self.rules {
            if rule.keywords.iter().any(|k| lowered.contains(k.as_str())) {
                return rule.profile;
            }
        }
        ContextProfile::General
    }
}

impl Default for QueryClassifier {
    fn default() -> Self {
        Self::new(vec![
            ProfileRule {
                profile: ContextProfile::Events,
                keywords: vec![
                    "event".to_string(),
                    "theme".to_string(),
                    "announcement".to_string(),
                    "news".to_string(),
                    "activity".to_string(),
                    "update".to_string(),
                ],
            },
            ProfileRule {
                profile: ContextProfile::Policy,
                keywords: vec![
                    "policy".to_string(),
                    "doctrine".to_string(),
                    "manual".to_string(),
                    "handbook".to_string(),
                ],
            },
        ])
    }
}
