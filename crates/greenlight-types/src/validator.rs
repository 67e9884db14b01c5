use std::collections::{BTreeMap, HashSet};

use crate::error::ValidationError;

/// Collects validation failures keyed by field name.
///
/// Checks never short-circuit, so one pass over an input reports every
/// failing field. When several rules fail for the same field only the first
/// recorded message is kept.
#[derive(Debug, Default, Clone)]
pub struct Validator {
    errors: BTreeMap<String, String>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Records `message` for `field` unless the field already has one.
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_insert_with(|| message.into());
    }

    pub fn check(&mut self, ok: bool, field: &str, message: &str) {
        if !ok {
            self.add_error(field, message);
        }
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.valid() {
            Ok(())
        } else {
            Err(ValidationError::new(self.errors))
        }
    }
}

pub fn unique_strings<S: AsRef<str>>(values: &[S]) -> bool {
    let mut seen = HashSet::with_capacity(values.len());
    values.iter().all(|v| seen.insert(v.as_ref()))
}

pub fn no_empty_strings<S: AsRef<str>>(values: &[S]) -> bool {
    values.iter().all(|v| !v.as_ref().is_empty())
}

#[cfg(test)]
mod tests {
    use quickcheck_macros::quickcheck;

    use super::*;

    const FIELDS: [&str; 3] = ["title", "year", "genres"];

    #[quickcheck]
    fn test_first_failure_wins(checks: Vec<(bool, u8)>) -> bool {
        let mut v = Validator::new();
        let mut expected: BTreeMap<String, String> = BTreeMap::new();
        for (i, (ok, field)) in checks.iter().enumerate() {
            let field = FIELDS[*field as usize % FIELDS.len()];
            let message = format!("rule {i}");
            v.check(*ok, field, &message);
            if !ok {
                expected.entry(field.to_string()).or_insert(message);
            }
        }
        v.valid() == expected.is_empty() && v.errors() == &expected
    }

    #[quickcheck]
    fn test_duplicate_is_not_unique(values: Vec<String>, pick: usize) -> bool {
        if values.is_empty() {
            return true;
        }
        let mut values = values;
        let dup = values[pick % values.len()].clone();
        values.push(dup);
        !unique_strings(&values)
    }

    #[quickcheck]
    fn test_unique_matches_set(values: Vec<String>) -> bool {
        let set: HashSet<&String> = values.iter().collect();
        unique_strings(&values) == (set.len() == values.len())
    }

    #[test]
    fn test_unique_is_case_sensitive() {
        assert!(unique_strings(&["Drama", "drama"]));
        assert!(!unique_strings(&["drama", "comedy", "drama"]));
        assert!(unique_strings::<&str>(&[]));
    }

    #[test]
    fn test_no_empty_strings() {
        assert!(no_empty_strings(&["drama", "romance"]));
        assert!(!no_empty_strings(&["drama", ""]));
        assert!(no_empty_strings::<String>(&[]));
    }

    #[test]
    fn test_into_result() {
        let mut v = Validator::new();
        v.check(true, "title", "cannot be empty");
        assert!(v.clone().into_result().is_ok());

        v.check(false, "title", "cannot be empty");
        v.check(false, "title", "must be under 500 characters");
        v.add_error("year", "must be between 1888 and today");
        let err = v.into_result().unwrap_err();
        assert_eq!(err.errors().len(), 2);
        assert_eq!(err.get("title"), Some("cannot be empty"));
        assert_eq!(err.get("year"), Some("must be between 1888 and today"));
    }
}
