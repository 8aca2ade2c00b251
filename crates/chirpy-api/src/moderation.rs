const PROFANE_WORDS: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];
const REPLACEMENT: &str = "****";

/// Replace space-separated profane words, compared case-insensitively.
/// Words with attached punctuation are left alone.
pub fn clean_body(body: &str) -> String {
    body.split(' ')
        .map(|word| {
            if PROFANE_WORDS.contains(&word.to_lowercase().as_str()) {
                REPLACEMENT
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_profane_words() {
        assert_eq!(
            clean_body("This is a kerfuffle opinion I need to share with the world"),
            "This is a **** opinion I need to share with the world"
        );
        assert_eq!(clean_body("Sharbert and FORNAX"), "**** and ****");
    }

    #[test]
    fn leaves_punctuated_words_alone() {
        assert_eq!(clean_body("Sharbert! is fine"), "Sharbert! is fine");
    }

    #[test]
    fn keeps_spacing() {
        assert_eq!(clean_body("a  fornax "), "a  **** ");
    }
}
