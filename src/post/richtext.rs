use serde::Serialize;

/// Incrementally built rich-text post: an ordered list of segments,
/// rendered separately into the flat text and the facet annotations so
/// "what is displayed" and "what is sent" cannot drift apart.
#[derive(Debug, Clone, Default)]
pub struct RichText {
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub text: String,
    pub kind: SegmentKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SegmentKind {
    Plain,
    Link { uri: String },
    Tag { tag: String },
}

/// AT-protocol rich-text facet. Offsets are byte positions into the
/// UTF-8 encoding of the post text, not char indices.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Facet {
    pub index: ByteSlice,
    pub features: Vec<FacetFeature>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ByteSlice {
    #[serde(rename = "byteStart")]
    pub byte_start: usize,
    #[serde(rename = "byteEnd")]
    pub byte_end: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "$type")]
pub enum FacetFeature {
    #[serde(rename = "app.bsky.richtext.facet#link")]
    Link { uri: String },
    #[serde(rename = "app.bsky.richtext.facet#tag")]
    Tag { tag: String },
}

impl RichText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(text.into(), SegmentKind::Plain);
        self
    }

    pub fn link(&mut self, display: impl Into<String>, uri: impl Into<String>) -> &mut Self {
        self.push(display.into(), SegmentKind::Link { uri: uri.into() });
        self
    }

    pub fn tag(&mut self, display: impl Into<String>, tag: impl Into<String>) -> &mut Self {
        self.push(display.into(), SegmentKind::Tag { tag: tag.into() });
        self
    }

    fn push(&mut self, text: String, kind: SegmentKind) {
        if text.is_empty() {
            return;
        }
        self.segments.push(Segment { text, kind });
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The flat post text: segment texts concatenated in order,
    /// nothing inserted or dropped.
    pub fn build_text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    /// Facets for the link/tag segments, with byte offsets into the
    /// text produced by `build_text`.
    pub fn facets(&self) -> Vec<Facet> {
        let mut facets = Vec::new();
        let mut offset = 0usize;
        for segment in &self.segments {
            let len = segment.text.len();
            match &segment.kind {
                SegmentKind::Plain => {}
                SegmentKind::Link { uri } => facets.push(Facet {
                    index: ByteSlice {
                        byte_start: offset,
                        byte_end: offset + len,
                    },
                    features: vec![FacetFeature::Link { uri: uri.clone() }],
                }),
                SegmentKind::Tag { tag } => facets.push(Facet {
                    index: ByteSlice {
                        byte_start: offset,
                        byte_end: offset + len,
                    },
                    features: vec![FacetFeature::Tag { tag: tag.clone() }],
                }),
            }
            offset += len;
        }
        facets
    }
}
