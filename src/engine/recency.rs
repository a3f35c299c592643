use crate::orcid::types::{WorkGroup, WorkSummary};
use chrono::{DateTime, TimeZone, Utc};

/// One announceable publication, normalized from a raw work summary.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedItem {
    pub orcid_id: String,
    pub title: String,
    pub link: Option<String>,
    pub modified_at: DateTime<Utc>,
}

const TITLE_FALLBACK: &str = "(no title)";

/// Extract the publications modified at or after `cutoff`, newest first.
///
/// Entries without a last-modified timestamp are skipped entirely. The
/// boundary is inclusive: an entry modified exactly at `cutoff` is kept.
/// Ties on the timestamp keep registry order (stable sort). No count
/// limit is applied here; the post budget is enforced by the runner.
pub fn recent_items(
    orcid_id: &str,
    groups: &[WorkGroup],
    cutoff: DateTime<Utc>,
) -> Vec<NormalizedItem> {
    let mut items: Vec<NormalizedItem> = Vec::new();

    for group in groups {
        for summary in &group.work_summary {
            let Some(ts) = summary
                .last_modified_date
                .as_ref()
                .and_then(|lmd| lmd.value)
            else {
                continue;
            };
            // ORCID timestamps are milliseconds since epoch
            let Some(modified_at) = Utc.timestamp_millis_opt(ts).single() else {
                continue;
            };
            if modified_at < cutoff {
                continue;
            }

            items.push(NormalizedItem {
                orcid_id: orcid_id.to_string(),
                title: extract_title(summary),
                link: extract_doi_url(summary),
                modified_at,
            });
        }
    }

    // sort_by is stable, so equal timestamps keep registry order
    items.sort_by(|a, b| b.modified_at.cmp(&a.modified_at));
    items
}

fn extract_title(summary: &WorkSummary) -> String {
    summary
        .title
        .text()
        .unwrap_or(TITLE_FALLBACK)
        .to_string()
}

/// First external id typed "doi" (case-insensitive) with a non-empty
/// value, rendered as a resolvable doi.org URL. Scan order is as given
/// by the registry, so extraction is deterministic.
fn extract_doi_url(summary: &WorkSummary) -> Option<String> {
    let ids = summary.external_ids.as_ref()?;
    for ext in &ids.external_id {
        let is_doi = ext
            .id_type
            .as_deref()
            .is_some_and(|t| t.eq_ignore_ascii_case("doi"));
        if !is_doi {
            continue;
        }
        if let Some(value) = ext.id_value.as_deref().filter(|v| !v.is_empty()) {
            return Some(format!("https://doi.org/{}", value));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orcid::types::{ExternalId, ExternalIds, TimestampValue, TitleShape};

    fn summary_at(ts_millis: i64) -> WorkSummary {
        WorkSummary {
            last_modified_date: Some(TimestampValue {
                value: Some(ts_millis),
            }),
            title: TitleShape::Plain("A Paper".to_string()),
            external_ids: None,
        }
    }

    fn group_of(summaries: Vec<WorkSummary>) -> WorkGroup {
        WorkGroup {
            work_summary: summaries,
        }
    }

    #[test]
    fn test_cutoff_boundary_is_inclusive() {
        let cutoff = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let at_cutoff = summary_at(1_700_000_000_000);
        let one_ms_before = summary_at(1_699_999_999_999);

        let groups = vec![group_of(vec![at_cutoff, one_ms_before])];
        let items = recent_items("X", &groups, cutoff);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].modified_at, cutoff);
    }

    #[test]
    fn test_missing_timestamp_skips_entry() {
        let mut no_ts = summary_at(0);
        no_ts.last_modified_date = None;
        let groups = vec![group_of(vec![no_ts])];
        let items = recent_items("X", &groups, Utc.timestamp_millis_opt(0).unwrap());
        assert!(items.is_empty());
    }

    #[test]
    fn test_title_fallback_never_empty() {
        let mut s = summary_at(1_700_000_000_000);
        s.title = TitleShape::Missing;
        let groups = vec![group_of(vec![s])];
        let items = recent_items("X", &groups, Utc.timestamp_millis_opt(0).unwrap());
        assert_eq!(items[0].title, "(no title)");

        let mut s = summary_at(1_700_000_000_000);
        s.title = TitleShape::Plain("   ".to_string());
        let groups = vec![group_of(vec![s])];
        let items = recent_items("X", &groups, Utc.timestamp_millis_opt(0).unwrap());
        assert_eq!(items[0].title, "(no title)");

        let mut s = summary_at(1_700_000_000_000);
        s.title = TitleShape::Unrecognized(serde_json::json!({"odd": true}));
        let groups = vec![group_of(vec![s])];
        let items = recent_items("X", &groups, Utc.timestamp_millis_opt(0).unwrap());
        assert_eq!(items[0].title, "(no title)");
    }

    #[test]
    fn test_first_doi_wins_case_insensitive() {
        let mut s = summary_at(1_700_000_000_000);
        s.external_ids = Some(ExternalIds {
            external_id: vec![
                ExternalId {
                    id_type: Some("issn".to_string()),
                    id_value: Some("1234-5678".to_string()),
                },
                ExternalId {
                    id_type: Some("DOI".to_string()),
                    id_value: Some("10.1/first".to_string()),
                },
                ExternalId {
                    id_type: Some("doi".to_string()),
                    id_value: Some("10.1/second".to_string()),
                },
            ],
        });
        let groups = vec![group_of(vec![s])];
        let items = recent_items("X", &groups, Utc.timestamp_millis_opt(0).unwrap());
        assert_eq!(items[0].link.as_deref(), Some("https://doi.org/10.1/first"));
    }

    #[test]
    fn test_empty_doi_value_ignored() {
        let mut s = summary_at(1_700_000_000_000);
        s.external_ids = Some(ExternalIds {
            external_id: vec![ExternalId {
                id_type: Some("doi".to_string()),
                id_value: Some(String::new()),
            }],
        });
        let groups = vec![group_of(vec![s])];
        let items = recent_items("X", &groups, Utc.timestamp_millis_opt(0).unwrap());
        assert_eq!(items[0].link, None);
    }

    #[test]
    fn test_newest_first_with_stable_ties() {
        let older = summary_at(1_700_000_000_000);
        let mut tie_a = summary_at(1_700_000_100_000);
        tie_a.title = TitleShape::Plain("tie A".to_string());
        let mut tie_b = summary_at(1_700_000_100_000);
        tie_b.title = TitleShape::Plain("tie B".to_string());

        let groups = vec![group_of(vec![older, tie_a, tie_b])];
        let items = recent_items("X", &groups, Utc.timestamp_millis_opt(0).unwrap());

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].title, "tie A");
        assert_eq!(items[1].title, "tie B");
        assert_eq!(items[2].title, "A Paper");
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let mut s = summary_at(1_700_000_000_000);
        s.external_ids = Some(ExternalIds {
            external_id: vec![ExternalId {
                id_type: Some("doi".to_string()),
                id_value: Some("10.1/abc".to_string()),
            }],
        });
        let groups = vec![group_of(vec![s])];
        let cutoff = Utc.timestamp_millis_opt(0).unwrap();
        let first = recent_items("X", &groups, cutoff);
        let second = recent_items("X", &groups, cutoff);
        assert_eq!(first, second);
    }
}
