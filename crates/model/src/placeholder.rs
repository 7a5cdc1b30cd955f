//! Substitution of location phrases into template strings.
//!
//! Four tokens are understood:
//!
//! | token         | replaced by                                      |
//! |---------------|--------------------------------------------------|
//! | `{nga_city}`  | `from.nga_format`, else `nga <city or state>`    |
//! | `{per_city}`  | `to.per_format`, else `për <city or state>`      |
//! | `{nga_state}` | `from.nga_format`, else `nga <state>`            |
//! | `{per_state}` | `to.per_format`, else `për <state>`              |
//!
//! The template is scanned once from left to right. Replacement text is
//! never scanned again, so a phrase that happens to contain a token is
//! emitted as is. Anything else in braces is copied unchanged.

use crate::location::Location;

const FROM_PREPOSITION: &str = "nga";
const TO_PREPOSITION: &str = "për";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    NgaCity,
    PerCity,
    NgaState,
    PerState,
}

impl Token {
    const ALL: [(&'static str, Token); 4] = [
        ("{nga_city}", Token::NgaCity),
        ("{per_city}", Token::PerCity),
        ("{nga_state}", Token::NgaState),
        ("{per_state}", Token::PerState),
    ];

    fn at_start_of(s: &str) -> Option<(&'static str, Token)> {
        Self::ALL
            .iter()
            .find(|(literal, _)| s.starts_with(literal))
            .copied()
    }

    fn phrase(self, from: &Location, to: &Location) -> String {
        match self {
            Token::NgaCity => from
                .nga_format
                .clone()
                .unwrap_or_else(|| phrase(FROM_PREPOSITION, from.display_name())),
            Token::PerCity => to
                .per_format
                .clone()
                .unwrap_or_else(|| phrase(TO_PREPOSITION, to.display_name())),
            Token::NgaState => from
                .nga_format
                .clone()
                .unwrap_or_else(|| phrase(FROM_PREPOSITION, &from.state)),
            Token::PerState => to
                .per_format
                .clone()
                .unwrap_or_else(|| phrase(TO_PREPOSITION, &to.state)),
        }
    }
}

fn phrase(preposition: &str, name: &str) -> String {
    format!("{preposition} {name}")
}

/// Replaces every placeholder token in `template` with the phrase for the
/// route from `from` to `to`.
pub fn expand(template: &str, from: &Location, to: &Location) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        result.push_str(&rest[..open]);
        rest = &rest[open..];
        match Token::at_start_of(rest) {
            Some((literal, token)) => {
                result.push_str(&token.phrase(from, to));
                rest = &rest[literal.len()..];
            }
            None => {
                result.push('{');
                rest = &rest[1..];
            }
        }
    }
    result.push_str(rest);

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tirana() -> Location {
        Location::city("Tirana", "Shqipëri")
    }

    fn london() -> Location {
        Location::city("London", "Angli")
    }

    #[test]
    fn preformatted_phrases_win() {
        let from = tirana().with_formats(Some("nga Tirana"), None);
        let to = london().with_formats(None, Some("për në Londër"));
        assert_eq!(expand("{nga_city}", &from, &to), "nga Tirana");
        assert_eq!(expand("{per_city}", &from, &to), "për në Londër");
        assert_eq!(expand("{nga_state}", &from, &to), "nga Tirana");
        assert_eq!(expand("{per_state}", &from, &to), "për në Londër");
    }

    #[test]
    fn raw_names_are_used_without_formats() {
        let (from, to) = (tirana(), london());
        assert_eq!(expand("{nga_city}", &from, &to), "nga Tirana");
        assert_eq!(expand("{per_city}", &from, &to), "për London");
        assert_eq!(expand("{nga_state}", &from, &to), "nga Shqipëri");
        assert_eq!(expand("{per_state}", &from, &to), "për Angli");
    }

    #[test]
    fn state_locations_fall_back_to_the_state_name() {
        let from = Location::state("Kosovë");
        let to = Location::state("Gjermani");
        assert_eq!(
            expand("Bileta avioni {nga_city} {per_city}", &from, &to),
            "Bileta avioni nga Kosovë për Gjermani"
        );
    }

    #[test]
    fn templates_without_tokens_are_unchanged() {
        let (from, to) = (tirana(), london());
        for template in ["", "Bileta avioni", "{unknown} and {", "}{", "{nga_city"] {
            assert_eq!(expand(template, &from, &to), template);
        }
    }

    #[test]
    fn tokens_may_repeat_and_appear_in_any_order() {
        let (from, to) = (tirana(), london());
        assert_eq!(
            expand("{per_state} | {nga_city} | {per_state}", &from, &to),
            "për Angli | nga Tirana | për Angli"
        );
    }

    #[test]
    fn replacement_text_is_not_expanded_again() {
        let from = tirana().with_formats(Some("{per_city}"), None);
        let to = london();
        assert_eq!(expand("{nga_city}", &from, &to), "{per_city}");
    }

    #[test]
    fn multibyte_text_around_tokens_is_preserved() {
        let (from, to) = (tirana(), london());
        assert_eq!(
            expand("Çmime {nga_city} → {per_city} ✈", &from, &to),
            "Çmime nga Tirana → për London ✈"
        );
    }
}
