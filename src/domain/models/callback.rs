//! Callback token protocol.
//!
//! Transport layers embed compact `{kind}_{id}` tokens in their interactive
//! affordances (inline buttons, deep links). The core only defines the two
//! kinds it can act on; an unknown kind parses to `None` and the caller is
//! expected to no-op.

use serde::{Deserialize, Serialize};

/// An action requested through a callback token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallbackAction {
    /// Show cached details for a movie.
    Movie(String),
    /// Look up watch links for a movie.
    Links(String),
}

impl CallbackAction {
    /// Parse a `{kind}_{id}` token. Ids may themselves contain underscores;
    /// only the first one separates the kind.
    pub fn parse(token: &str) -> Option<Self> {
        let (kind, id) = token.split_once('_')?;
        if id.is_empty() {
            return None;
        }
        match kind {
            "movie" => Some(Self::Movie(id.to_string())),
            "links" => Some(Self::Links(id.to_string())),
            _ => None,
        }
    }

    /// Render the token form of this action.
    pub fn token(&self) -> String {
        match self {
            Self::Movie(id) => format!("movie_{id}"),
            Self::Links(id) => format!("links_{id}"),
        }
    }

    /// The movie id this action refers to.
    pub fn movie_id(&self) -> &str {
        match self {
            Self::Movie(id) | Self::Links(id) => id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_kinds() {
        assert_eq!(
            CallbackAction::parse("movie_301"),
            Some(CallbackAction::Movie("301".to_string()))
        );
        assert_eq!(
            CallbackAction::parse("links_tt0133093"),
            Some(CallbackAction::Links("tt0133093".to_string()))
        );
    }

    #[test]
    fn unknown_kind_is_none() {
        assert_eq!(CallbackAction::parse("poster_301"), None);
        assert_eq!(CallbackAction::parse("301"), None);
        assert_eq!(CallbackAction::parse(""), None);
    }

    #[test]
    fn empty_id_is_none() {
        assert_eq!(CallbackAction::parse("movie_"), None);
    }

    #[test]
    fn id_may_contain_underscores() {
        assert_eq!(
            CallbackAction::parse("links_a_b_c"),
            Some(CallbackAction::Links("a_b_c".to_string()))
        );
    }

    #[test]
    fn token_round_trips() {
        let action = CallbackAction::Movie("301".to_string());
        assert_eq!(CallbackAction::parse(&action.token()), Some(action));
    }
}
