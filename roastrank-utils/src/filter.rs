use std::str::FromStr;

/// How aggressively profanity is masked. Each level includes everything the
/// level below it filters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FilterLevel {
    #[default]
    None,
    Mild,
    Moderate,
    Strict,
}

impl FilterLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            FilterLevel::None => "none",
            FilterLevel::Mild => "mild",
            FilterLevel::Moderate => "moderate",
            FilterLevel::Strict => "strict",
        }
    }

    fn word_list(self) -> &'static [&'static str] {
        const MILD: &[&str] = &["damn", "hell"];
        const MODERATE: &[&str] = &["damn", "hell", "ass", "shit"];
        const STRICT: &[&str] = &["damn", "hell", "ass", "shit", "fuck", "bitch"];

        match self {
            FilterLevel::None => &[],
            FilterLevel::Mild => MILD,
            FilterLevel::Moderate => MODERATE,
            FilterLevel::Strict => STRICT,
        }
    }
}

impl FromStr for FilterLevel {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "none" => Ok(FilterLevel::None),
            "mild" => Ok(FilterLevel::Mild),
            "moderate" => Ok(FilterLevel::Moderate),
            "strict" => Ok(FilterLevel::Strict),
            other => Err(format!("unknown filter level `{other}`")),
        }
    }
}

/// Mask whole words from the level's list with asterisks, case-insensitively.
/// Matches whole words only, so "hello" survives the "hell" entry.
pub fn filter_profanity(text: &str, level: FilterLevel) -> String {
    let words = level.word_list();
    if words.is_empty() {
        return text.to_owned();
    }

    let mut output = String::with_capacity(text.len());
    let mut word = String::new();

    let mut flush = |output: &mut String, word: &mut String| {
        if !word.is_empty() {
            let lowered = word.to_lowercase();
            if words.contains(&lowered.as_str()) {
                output.extend(std::iter::repeat_n('*', word.chars().count()));
            } else {
                output.push_str(word);
            }
            word.clear();
        }
    };

    for ch in text.chars() {
        if ch.is_alphanumeric() || ch == '\'' {
            word.push(ch);
        } else {
            flush(&mut output, &mut word);
            output.push(ch);
        }
    }
    flush(&mut output, &mut word);

    output
}

#[cfg(test)]
mod tests {
    use super::{FilterLevel, filter_profanity};

    #[test]
    fn none_level_passes_everything() {
        assert_eq!(
            filter_profanity("what the hell", FilterLevel::None),
            "what the hell"
        );
    }

    #[test]
    fn mild_level_masks_mild_words_only() {
        assert_eq!(
            filter_profanity("what the hell", FilterLevel::Mild),
            "what the ****"
        );
        assert_eq!(
            filter_profanity("cut the shit", FilterLevel::Mild),
            "cut the shit"
        );
    }

    #[test]
    fn strict_level_masks_the_full_list() {
        assert_eq!(
            filter_profanity("shit, that's a damn good one", FilterLevel::Strict),
            "****, that's a **** good one"
        );
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(filter_profanity("DAMN", FilterLevel::Mild), "****");
    }

    #[test]
    fn only_whole_words_match() {
        assert_eq!(
            filter_profanity("hello shellfish", FilterLevel::Strict),
            "hello shellfish"
        );
        assert_eq!(
            filter_profanity("classy", FilterLevel::Strict),
            "classy"
        );
    }

    #[test]
    fn levels_parse_their_names() {
        assert_eq!("strict".parse::<FilterLevel>().unwrap(), FilterLevel::Strict);
        assert!("maximum".parse::<FilterLevel>().is_err());
    }
}
