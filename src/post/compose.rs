use super::richtext::RichText;
use crate::engine::recency::NormalizedItem;
use crate::orcid::profile_url;

/// Build the announcement post for one publication.
///
/// Layout: author line (name linked to the ORCID profile), title line,
/// DOI line when present (URL shown verbatim, clickable), then the
/// hashtag line when hashtags are configured.
pub fn compose_post(item: &NormalizedItem, author_name: &str, hashtags: &[String]) -> RichText {
    let mut rt = RichText::new();

    rt.text("New paper from ")
        .link(author_name, profile_url(&item.orcid_id));

    rt.text("\n").text(item.title.as_str());

    if let Some(url) = &item.link {
        rt.text("\n").link(url.clone(), url.clone());
    }

    if !hashtags.is_empty() {
        rt.text("\n");
        for (i, raw) in hashtags.iter().enumerate() {
            if i > 0 {
                rt.text(" ");
            }
            let bare = raw.trim_start_matches('#');
            rt.tag(format!("#{}", bare), bare);
        }
    }

    rt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::richtext::{FacetFeature, SegmentKind};
    use chrono::{TimeZone, Utc};

    fn item(link: Option<&str>) -> NormalizedItem {
        NormalizedItem {
            orcid_id: "0000-0002-1825-0097".to_string(),
            title: "On Computable Numbers".to_string(),
            link: link.map(str::to_string),
            modified_at: Utc.timestamp_millis_opt(1_700_000_000_000).unwrap(),
        }
    }

    #[test]
    fn test_layout_with_doi_and_tags() {
        let tags = vec!["#ai".to_string(), "science".to_string()];
        let rt = compose_post(&item(Some("https://doi.org/10.1/abc")), "Alan Turing", &tags);
        assert_eq!(
            rt.build_text(),
            "New paper from Alan Turing\nOn Computable Numbers\nhttps://doi.org/10.1/abc\n#ai #science"
        );
    }

    #[test]
    fn test_layout_without_doi_or_tags() {
        let rt = compose_post(&item(None), "Alan Turing", &[]);
        assert_eq!(
            rt.build_text(),
            "New paper from Alan Turing\nOn Computable Numbers"
        );
    }

    #[test]
    fn test_author_link_targets_profile() {
        let rt = compose_post(&item(None), "Alan Turing", &[]);
        let author = rt
            .segments()
            .iter()
            .find(|s| s.text == "Alan Turing")
            .unwrap();
        assert_eq!(
            author.kind,
            SegmentKind::Link {
                uri: "https://orcid.org/0000-0002-1825-0097".to_string()
            }
        );
    }

    #[test]
    fn test_doi_link_display_equals_target() {
        let rt = compose_post(&item(Some("https://doi.org/10.1/abc")), "Alan Turing", &[]);
        let doi = rt
            .segments()
            .iter()
            .find(|s| matches!(&s.kind, SegmentKind::Link { uri } if uri.contains("doi.org")))
            .unwrap();
        assert_eq!(doi.text, "https://doi.org/10.1/abc");
    }

    #[test]
    fn test_hashtag_spans_strip_leading_hash() {
        let tags = vec!["#ai".to_string(), "science".to_string()];
        let rt = compose_post(&item(None), "Alan Turing", &tags);
        let tag_values: Vec<String> = rt
            .facets()
            .iter()
            .flat_map(|f| f.features.clone())
            .filter_map(|f| match f {
                FacetFeature::Tag { tag } => Some(tag),
                _ => None,
            })
            .collect();
        assert_eq!(tag_values, vec!["ai".to_string(), "science".to_string()]);
        assert!(rt.build_text().ends_with("#ai #science"));
    }
}
