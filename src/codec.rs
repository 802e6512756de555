//! Conversion between action indices and human-readable labels.

use std::collections::BTreeMap;

use crate::{
    Error, Result,
    types::{ACTION_LABELS, ActionId, StateId},
};

/// Maps action indices to labels and back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyCodec {
    labels: Vec<String>,
}

impl PolicyCodec {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    /// Codec for the nine navigation actions.
    pub fn navigation() -> Self {
        Self::new(ACTION_LABELS)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Label of a single action index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownActionIndex`] if there is no label for `index`.
    pub fn label(&self, index: ActionId) -> Result<&str> {
        self.labels
            .get(index)
            .map(String::as_str)
            .ok_or(Error::UnknownActionIndex {
                index,
                label_count: self.labels.len(),
            })
    }

    /// Encode a policy given as a sequence of action indices, keeping its order.
    pub fn encode<I>(&self, actions: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = ActionId>,
    {
        actions
            .into_iter()
            .map(|a| self.label(a).map(str::to_owned))
            .collect()
    }

    /// Encode a policy given as a state -> action mapping, in ascending state
    /// order.
    pub fn encode_mapping(&self, policy: &BTreeMap<StateId, ActionId>) -> Result<Vec<String>> {
        self.encode(policy.values().copied())
    }

    /// Map labels back to action indices.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownActionLabel`] for a label outside the codec.
    pub fn decode<S: AsRef<str>>(&self, labels: &[S]) -> Result<Vec<ActionId>> {
        labels
            .iter()
            .map(|label| {
                let label = label.as_ref();
                self.labels
                    .iter()
                    .position(|l| l == label)
                    .ok_or_else(|| Error::UnknownActionLabel {
                        label: label.to_string(),
                    })
            })
            .collect()
    }
}

impl Default for PolicyCodec {
    fn default() -> Self {
        Self::navigation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_zero_policy_is_all_wait() {
        let codec = PolicyCodec::navigation();
        let encoded = codec.encode(vec![0; 12]).unwrap();
        assert_eq!(encoded.len(), 12);
        assert!(encoded.iter().all(|l| l == "wait"));
    }

    #[test]
    fn test_mapping_is_encoded_in_state_order() {
        let codec = PolicyCodec::navigation();
        let mapping: BTreeMap<StateId, ActionId> = [(2, 8), (0, 1), (1, 6)].into_iter().collect();
        assert_eq!(codec.encode_mapping(&mapping).unwrap(), vec!["N", "SO", "NO"]);
    }

    #[test]
    fn test_unknown_index() {
        let codec = PolicyCodec::navigation();
        assert_eq!(
            codec.encode(vec![3, 9]),
            Err(Error::UnknownActionIndex {
                index: 9,
                label_count: 9
            })
        );
    }

    #[test]
    fn test_decode_labels() {
        let codec = PolicyCodec::navigation();
        assert_eq!(codec.decode(&["E", "wait", "SO"]).unwrap(), vec![3, 0, 6]);
        assert_eq!(
            codec.decode(&["up"]),
            Err(Error::UnknownActionLabel {
                label: "up".to_string()
            })
        );
    }
}
