use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightTone {
    Positive,
    Neutral,
    Warning,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub message: String,
    #[serde(rename = "type")]
    pub tone: InsightTone,
}

impl Insight {
    pub fn new(tone: InsightTone, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            tone,
        }
    }

    pub fn positive(message: impl Into<String>) -> Self {
        Self::new(InsightTone::Positive, message)
    }

    pub fn neutral(message: impl Into<String>) -> Self {
        Self::new(InsightTone::Neutral, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(InsightTone::Warning, message)
    }

    pub fn critical(message: impl Into<String>) -> Self {
        Self::new(InsightTone::Critical, message)
    }
}

#[derive(Debug, Default)]
pub struct InsightSet {
    items: Vec<Insight>,
}

impl InsightSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, insight: Insight) {
        self.items.push(insight);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn finish(self, fallback: Insight) -> Vec<Insight> {
        if self.items.is_empty() {
            vec![fallback]
        } else {
            self.items
        }
    }

    pub fn finish_capped(self, fallback: Insight, cap: usize) -> Vec<Insight> {
        let mut items = self.finish(fallback);
        items.truncate(cap.max(1));
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_when_nothing_matched() {
        let insights = InsightSet::new().finish(Insight::neutral("start tracking"));
        assert_eq!(insights, vec![Insight::neutral("start tracking")]);
    }

    #[test]
    fn rules_keep_declared_order() {
        let mut set = InsightSet::new();
        set.push(Insight::warning("first"));
        set.push(Insight::positive("second"));
        let insights = set.finish(Insight::neutral("unused"));
        assert_eq!(insights.len(), 2);
        assert_eq!(insights[0].message, "first");
        assert_eq!(insights[1].tone, InsightTone::Positive);
    }

    #[test]
    fn cap_truncates_but_never_empties() {
        let mut set = InsightSet::new();
        for i in 0..8 {
            set.push(Insight::neutral(format!("rule {i}")));
        }
        assert_eq!(set.len(), 8);
        let insights = set.finish_capped(Insight::neutral("unused"), 5);
        assert_eq!(insights.len(), 5);
        assert_eq!(insights[4].message, "rule 4");

        let insights = InsightSet::new().finish_capped(Insight::neutral("fallback"), 0);
        assert_eq!(insights.len(), 1);
    }

    #[test]
    fn tone_serializes_as_type() {
        let json = serde_json::to_value(Insight::critical("overdue")).unwrap();
        assert_eq!(json["type"], "critical");
        assert_eq!(json["message"], "overdue");
    }
}
