use std::fmt::Display;

use itertools::Itertools;

pub fn display_expected_of_any<T: Display>(collection: &[T]) -> String {
    display_expected_of(collection, "Expected one of")
}

/// Displays a string which say that the elements of `collection`
/// were expected.
pub fn display_expected_of<T: Display>(collection: &[T], expected_of: &str) -> String {
    match collection {
        [] => "Did not expect anything".to_string(),
        [single] => format!("Expected {single}"),
        many => format!(
            "{} ({})",
            expected_of,
            many.iter().map(|val| format!("{val}")).join(", ")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::display_expected_of_any;

    #[test]
    fn expected_lists() {
        assert_eq!(display_expected_of_any::<&str>(&[]), "Did not expect anything");
        assert_eq!(display_expected_of_any(&["'{'"]), "Expected '{'");
        assert_eq!(
            display_expected_of_any(&["'{'", "word"]),
            "Expected one of ('{', word)"
        );
    }
}
