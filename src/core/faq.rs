#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaqIntent {
    Locations,
    Services,
    Unknown,
}

#[derive(Debug, Clone)]
pub struct FaqRule {
    pub intent: FaqIntent,
    pub keywords: Vec<String>,
}

impl FaqRule {
    pub fn new(intent: FaqIntent, keywords: &[&str]) -> Self {
        Self {
            intent,
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    fn matches(&self, question: &str) -> bool {
        self.keywords.iter().any(|k| question.contains(k.as_str()))
    }
}

/// Ordered keyword rules; the first rule with a keyword in the question wins.
#[derive(Debug, Clone)]
pub struct FaqClassifier {
    rules: Vec<FaqRule>,
}

impl Default for FaqClassifier {
    fn default() -> Self {
        Self::new(vec![
            FaqRule::new(
                FaqIntent::Locations,
                &["location", "locations", "serve", "service area", "zip", "hours", "open"],
            ),
            FaqRule::new(
                FaqIntent::Services,
                &["service", "services", "offer", "do you handle", "what do you do"],
            ),
        ])
    }
}

impl FaqClassifier {
    pub fn new(rules: Vec<FaqRule>) -> Self {
        Self { rules }
    }

    pub fn classify(&self, question: &str) -> FaqIntent {
        let text = question.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&text))
            .map(|rule| rule.intent)
            .unwrap_or(FaqIntent::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locations_questions() {
        let faq = FaqClassifier::default();
        assert_eq!(faq.classify("What locations do you serve?"), FaqIntent::Locations);
        assert_eq!(faq.classify("Which ZIP codes?"), FaqIntent::Locations);
        assert_eq!(faq.classify("When are you open"), FaqIntent::Locations);
    }

    #[test]
    fn test_services_questions() {
        let faq = FaqClassifier::default();
        assert_eq!(faq.classify("What SERVICES do you offer?"), FaqIntent::Services);
        assert_eq!(faq.classify("what do you do"), FaqIntent::Services);
    }

    #[test]
    fn test_rule_order_wins() {
        let faq = FaqClassifier::default();
        // "service area" is a coverage question even though it says "service"
        assert_eq!(faq.classify("what is your service area"), FaqIntent::Locations);
    }

    #[test]
    fn test_unknown_fallback() {
        let faq = FaqClassifier::default();
        assert_eq!(faq.classify("how much does it cost?"), FaqIntent::Unknown);
        assert_eq!(faq.classify(""), FaqIntent::Unknown);
    }

    #[test]
    fn test_custom_rules() {
        let faq = FaqClassifier::new(vec![FaqRule::new(FaqIntent::Services, &["Repair"])]);
        assert_eq!(faq.classify("do you repair boilers"), FaqIntent::Services);
        assert_eq!(faq.classify("where are you"), FaqIntent::Unknown);
    }
}
