//! Offline keyword classifier.
//!
//! Maps candidate labels to synonym lists and matches by substring, so the
//! engine keeps routing when no network classifier is configured. The
//! built-in table covers the museum demo script; deployments can extend or
//! replace it.

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::debug;

use crate::ports::{ClassifierError, IntentClassifier};

/// Substring-matching classifier backed by a synonym table.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    synonyms: HashMap<String, Vec<String>>,
}

impl KeywordClassifier {
    /// Creates a classifier with the built-in synonym table.
    pub fn new() -> Self {
        let table: &[(&str, &[&str])] = &[
            ("门票", &["门票", "票务", "买票", "票价", "票"]),
            ("开放时间", &["时间", "开放", "几点", "开门", "关门"]),
            ("游玩攻略", &["攻略", "游玩", "怎么玩", "推荐", "路线"]),
            ("必看景点", &["景点", "必看", "太和殿", "乾清宫", "御花园"]),
            ("预约方式", &["预约", "预订", "怎么预约"]),
            ("成人票", &["成人票", "成人", "大人"]),
            ("学生票", &["学生票", "学生"]),
            ("老人票", &["老人票", "老人", "老年"]),
            ("没有", &["没有", "不用", "不需要", "没了"]),
            ("退出", &["退出", "结束", "再见", "拜拜"]),
        ];
        let synonyms = table
            .iter()
            .map(|(label, words)| {
                (
                    label.to_string(),
                    words.iter().map(|w| w.to_string()).collect(),
                )
            })
            .collect();
        Self { synonyms }
    }

    /// Creates a classifier with an empty table.
    pub fn empty() -> Self {
        Self {
            synonyms: HashMap::new(),
        }
    }

    /// Adds or replaces the synonym list for a label.
    pub fn with_synonyms(
        mut self,
        label: impl Into<String>,
        words: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.synonyms
            .insert(label.into(), words.into_iter().map(Into::into).collect());
        self
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IntentClassifier for KeywordClassifier {
    async fn classify(
        &self,
        utterance: &str,
        candidates: &[String],
    ) -> Result<Option<String>, ClassifierError> {
        let utterance = utterance.to_lowercase();

        // Candidate order decides ties, mirroring branch declaration order.
        for candidate in candidates {
            let Some(words) = self.synonyms.get(candidate) else {
                continue;
            };
            if let Some(word) = words.iter().find(|w| utterance.contains(w.as_str())) {
                debug!(%utterance, %word, label = %candidate, "keyword classifier matched");
                return Ok(Some(candidate.clone()));
            }
        }

        debug!(%utterance, ?candidates, "keyword classifier found no match");
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn synonym_resolves_to_its_label() {
        let classifier = KeywordClassifier::new();
        let got = classifier
            .classify("请问票价是多少", &labels(&["门票", "开放时间"]))
            .await
            .unwrap();
        assert_eq!(got.as_deref(), Some("门票"));
    }

    #[tokio::test]
    async fn candidate_order_breaks_ties() {
        let classifier = KeywordClassifier::new();
        // "老人票" contains synonyms of both ticket labels; the first
        // candidate wins.
        let got = classifier
            .classify("买一张老人票", &labels(&["门票", "老人票"]))
            .await
            .unwrap();
        assert_eq!(got.as_deref(), Some("门票"));
    }

    #[tokio::test]
    async fn unknown_utterance_is_no_match() {
        let classifier = KeywordClassifier::new();
        let got = classifier
            .classify("今天天气怎么样", &labels(&["门票", "开放时间"]))
            .await
            .unwrap();
        assert_eq!(got, None);
    }

    #[tokio::test]
    async fn matching_is_case_insensitive_on_the_utterance() {
        let classifier = KeywordClassifier::empty().with_synonyms("exit", ["quit"]);
        let got = classifier
            .classify("QUIT please", &labels(&["exit"]))
            .await
            .unwrap();
        assert_eq!(got.as_deref(), Some("exit"));
    }

    #[tokio::test]
    async fn labels_outside_the_table_are_skipped() {
        let classifier = KeywordClassifier::empty();
        let got = classifier
            .classify("买票", &labels(&["门票"]))
            .await
            .unwrap();
        assert_eq!(got, None);
    }
}
