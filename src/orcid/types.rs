use serde::Deserialize;

/// ORCID public API v3.0 response shapes (`/works` and `/person`).
/// Every field the registry may omit is optional or defaulted; the
/// filter decides what an incomplete entry means.

#[derive(Debug, Deserialize, Default)]
pub struct WorksResponse {
    #[serde(default)]
    pub group: Vec<WorkGroup>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct WorkGroup {
    #[serde(rename = "work-summary", default)]
    pub work_summary: Vec<WorkSummary>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct WorkSummary {
    #[serde(rename = "last-modified-date")]
    pub last_modified_date: Option<TimestampValue>,
    #[serde(default)]
    pub title: TitleShape,
    #[serde(rename = "external-ids")]
    pub external_ids: Option<ExternalIds>,
}

/// Millisecond-epoch timestamp wrapper used throughout the ORCID API.
#[derive(Debug, Clone, Deserialize)]
pub struct TimestampValue {
    pub value: Option<i64>,
}

/// The work title arrives either as the documented nested object
/// (`{"title": {"value": "..."}}`), with the inner title occasionally a
/// bare string, or as a bare string at the top level. Anything else is
/// an unrecognized shape and must degrade to the placeholder title, not
/// fail the works parse, so the final variant swallows arbitrary JSON.
/// Resolving the shape here keeps the filter free of JSON poking.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(untagged)]
pub enum TitleShape {
    Nested(NestedTitle),
    Plain(String),
    #[default]
    Missing,
    Unrecognized(serde_json::Value),
}

impl TitleShape {
    /// The trimmed title text, if any shape carried a non-empty one.
    pub fn text(&self) -> Option<&str> {
        let raw = match self {
            TitleShape::Nested(nested) => match nested.title.as_ref()? {
                InnerTitle::Wrapped(v) => v.value.as_deref()?,
                InnerTitle::Bare(s) => s.as_str(),
                InnerTitle::Unrecognized(_) => return None,
            },
            TitleShape::Plain(s) => s.as_str(),
            TitleShape::Missing | TitleShape::Unrecognized(_) => return None,
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct NestedTitle {
    pub title: Option<InnerTitle>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum InnerTitle {
    Wrapped(StringValue),
    Bare(String),
    Unrecognized(serde_json::Value),
}

#[derive(Debug, Clone, Deserialize)]
pub struct StringValue {
    pub value: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ExternalIds {
    #[serde(rename = "external-id", default)]
    pub external_id: Vec<ExternalId>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ExternalId {
    #[serde(rename = "external-id-type")]
    pub id_type: Option<String>,
    #[serde(rename = "external-id-value")]
    pub id_value: Option<String>,
}

/// `/person` endpoint, reduced to the name fields we display.
#[derive(Debug, Deserialize, Default)]
pub struct PersonResponse {
    pub name: Option<PersonName>,
}

#[derive(Debug, Deserialize, Default)]
pub struct PersonName {
    #[serde(rename = "credit-name")]
    pub credit_name: Option<StringValue>,
    #[serde(rename = "given-names")]
    pub given_names: Option<StringValue>,
    #[serde(rename = "family-name")]
    pub family_name: Option<StringValue>,
}

impl PersonName {
    /// Preferred display name: credit name if set, otherwise
    /// "given family" from whichever parts are present.
    pub fn display_name(&self) -> Option<String> {
        if let Some(credit) = value_text(&self.credit_name) {
            return Some(credit.to_string());
        }
        let given = value_text(&self.given_names);
        let family = value_text(&self.family_name);
        match (given, family) {
            (Some(g), Some(f)) => Some(format!("{} {}", g, f)),
            (Some(g), None) => Some(g.to_string()),
            (None, Some(f)) => Some(f.to_string()),
            (None, None) => None,
        }
    }
}

fn value_text(v: &Option<StringValue>) -> Option<&str> {
    let raw = v.as_ref()?.value.as_deref()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}
