use std::collections::HashMap;

/// Integer codes for categorical labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelEncoding {
    /// Distinct labels in first-seen order; a label's position is its code.
    pub classes: Vec<String>,
    /// One code per input label.
    pub codes: Vec<usize>,
}

impl LabelEncoding {
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Code scaled to `[0, 1]` for sampling a color scale.
    pub fn normalized(&self, code: usize) -> f32 {
        match self.classes.len() {
            0 | 1 => 0.0,
            n => code as f32 / (n - 1) as f32,
        }
    }
}

/// Assign each distinct label the next unused integer, starting at 0.
pub fn encode_labels<S: AsRef<str>>(labels: &[S]) -> LabelEncoding {
    let mut lookup: HashMap<&str, usize> = HashMap::new();
    let mut classes = Vec::new();
    let codes = labels
        .iter()
        .map(|label| {
            let label = label.as_ref();
            *lookup.entry(label).or_insert_with(|| {
                classes.push(label.to_string());
                classes.len() - 1
            })
        })
        .collect();

    LabelEncoding { classes, codes }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_first_seen_order() {
        let enc = encode_labels(&["b", "a", "b", "c"]);
        assert_eq!(enc.codes, vec![0, 1, 0, 2]);
        assert_eq!(enc.classes, vec!["b", "a", "c"]);
    }

    #[test]
    fn encoding_is_deterministic() {
        let labels: Vec<String> = ["x", "y", "x", "z", "y"].iter().map(|s| s.to_string()).collect();
        assert_eq!(encode_labels(&labels), encode_labels(&labels));
    }

    #[test]
    fn normalizes_codes() {
        let enc = encode_labels(&["p", "q", "r"]);
        assert_eq!(enc.normalized(0), 0.0);
        assert_eq!(enc.normalized(1), 0.5);
        assert_eq!(enc.normalized(2), 1.0);

        let single = encode_labels(&["0", "0"]);
        assert_eq!(single.codes, vec![0, 0]);
        assert_eq!(single.normalized(0), 0.0);
    }

    #[test]
    fn empty_input() {
        let enc = encode_labels::<&str>(&[]);
        assert_eq!(enc.class_count(), 0);
        assert!(enc.codes.is_empty());
    }
}
