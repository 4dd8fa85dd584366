use crate::error::{ImdbError, Result};
use crate::model::IdKind;
use serde::Serialize;

/// Named extra data group the REST API serves under
/// `/<collection>/<id>/<subselection>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Subselection {
    Akas,
    Credits,
    ReleaseDates,
    KnownFor,
}

impl Subselection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Subselection::Akas => "akas",
            Subselection::Credits => "credits",
            Subselection::ReleaseDates => "release_dates",
            Subselection::KnownFor => "known_for",
        }
    }

    /// Sub-selections a kind accepts
    pub fn allowed_for(kind: IdKind) -> &'static [Subselection] {
        match kind {
            IdKind::Title => &[
                Subselection::Akas,
                Subselection::Credits,
                Subselection::ReleaseDates,
            ],
            IdKind::Name => &[Subselection::KnownFor],
        }
    }

    /// Parse a caller-supplied name (case-insensitive) and check it belongs
    /// to `kind`. Runs before any request is built.
    pub fn parse_for(value: &str, kind: IdKind) -> Result<Self> {
        let allowed = Self::allowed_for(kind);
        let wanted = value.to_lowercase();
        allowed
            .iter()
            .find(|candidate| candidate.as_str() == wanted)
            .copied()
            .ok_or_else(|| ImdbError::InvalidSubselection {
                value: value.to_string(),
                allowed: allowed.iter().map(Subselection::as_str).collect(),
            })
    }
}

impl std::fmt::Display for Subselection {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(
            Subselection::parse_for("Release_Dates", IdKind::Title).unwrap(),
            Subselection::ReleaseDates
        );
        assert_eq!(
            Subselection::parse_for("known_for", IdKind::Name).unwrap(),
            Subselection::KnownFor
        );
    }

    #[test]
    fn test_subselections_are_per_kind() {
        assert!(Subselection::parse_for("known_for", IdKind::Title).is_err());
        match Subselection::parse_for("credits", IdKind::Name) {
            Err(ImdbError::InvalidSubselection { value, allowed }) => {
                assert_eq!(value, "credits");
                assert_eq!(allowed, vec!["known_for"]);
            }
            other => panic!("expected InvalidSubselection, got {:?}", other),
        }
        assert!(Subselection::parse_for("", IdKind::Title).is_err());
        assert!(Subselection::parse_for("invalid choice", IdKind::Title).is_err());
    }
}
