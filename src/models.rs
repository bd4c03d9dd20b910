use serde::{Deserialize, Serialize};

/// Query string accepted by the explain endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExplainParams {
    pub q: Option<String>,
    pub source: Option<String>,
}

impl ExplainParams {
    /// Builds params from raw query pairs. Repeated keys keep their first value.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "q" if params.q.is_none() => params.q = Some(value),
                "source" if params.source.is_none() => params.source = Some(value),
                _ => {}
            }
        }
        params
    }

    /// The query term exactly as sent, or `None` when it is absent or blank.
    pub fn term(&self) -> Option<&str> {
        non_blank(self.q.as_deref())
    }

    pub fn source(&self) -> Option<&str> {
        non_blank(self.source.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    ProperName,
    Definition,
}

impl QueryKind {
    /// Capitalised words ("Finn", "Jakku") are looked up in the books; everything else
    /// ("photosynthesis", "BB-8", "X") is explained on its own.
    pub fn classify(term: &str) -> Self {
        let mut chars = term.chars();
        match (chars.next(), chars.next()) {
            (Some(first), Some(second)) if first.is_uppercase() && second.is_lowercase() => {
                QueryKind::ProperName
            }
            _ => QueryKind::Definition,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QueryKind::ProperName => "proper_name",
            QueryKind::Definition => "definition",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explanation {
    pub book_source: Option<String>,
    pub character_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_lengths: Option<Vec<usize>>,
    pub analysis: String,
}
