//! Owned variants of the `annotate_snippets` library structs
use std::borrow::Cow;

use annotate_snippets::{
    display_list::FormatOptions,
    snippet::{Annotation, AnnotationType, Slice, Snippet, SourceAnnotation},
};

/// An owned counterpart to the `annotate_snippets::Snippet` struct
#[derive(Debug)]
pub struct SnippetOwned<'a> {
    pub title: Cow<'a, str>,
    pub id: Option<Cow<'a, str>>,
    pub annotation_type: AnnotationType,
    pub slices: Vec<SliceOwned<'a>>,
    pub footer: Vec<AnnotationOwned<'a>>,
}

/// An owned counterpart to the `annotate_snippets::Slice` struct
#[derive(Debug)]
pub struct SliceOwned<'a> {
    pub source: &'a str,
    pub line_start: usize,
    pub origin: Option<&'a str>,
    pub annotations: Vec<SourceAnnotationOwned>,
}

/// An owned counterpart to the `annotate_snippets::Annotation` struct
#[derive(Debug)]
pub struct AnnotationOwned<'a> {
    pub id: Option<Cow<'a, str>>,
    pub label: Option<Cow<'a, str>>,
    pub annotation_type: AnnotationType,
}

/// An owned counterpart to the `annotate_snippets::SourceAnnotation` struct
#[derive(Debug)]
pub struct SourceAnnotationOwned {
    pub annotation_type: AnnotationType,
    /// Character range inside of the slice source
    pub range: (usize, usize),
    pub label: String,
}

impl SnippetOwned<'_> {
    pub fn as_snippet(&self) -> Snippet {
        Snippet {
            title: Some(Annotation {
                annotation_type: self.annotation_type,
                id: self.id.as_deref(),
                label: Some(&self.title),
            }),
            slices: self.slices.iter().map(SliceOwned::as_slice).collect(),
            footer: self
                .footer
                .iter()
                .map(AnnotationOwned::as_annotation)
                .collect(),
            opt: FormatOptions {
                color: super::COLORED,
                ..Default::default()
            },
        }
    }
}

impl<'a> SliceOwned<'a> {
    /// Creates a slice that shows a single source line and underlines its content.
    /// Returns `None` for blank lines, since there is nothing to point at.
    pub fn for_line(line: &'a str, line_number: u32, origin: &'a str) -> Option<Self> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }

        let start = line.chars().take_while(|c| c.is_whitespace()).count();
        let end = start + trimmed.chars().count();
        Some(SliceOwned {
            source: line,
            line_start: usize::try_from(line_number).unwrap_or(1),
            origin: Some(origin),
            annotations: vec![SourceAnnotationOwned {
                annotation_type: AnnotationType::Error,
                range: (start, end),
                label: "Error Here".into(),
            }],
        })
    }

    pub fn as_slice(&self) -> Slice {
        Slice {
            source: self.source,
            line_start: self.line_start,
            annotations: self
                .annotations
                .iter()
                .map(SourceAnnotationOwned::as_source_annotation)
                .collect(),
            origin: self.origin,
            fold: false,
        }
    }
}

impl AnnotationOwned<'_> {
    pub fn as_annotation(&self) -> Annotation {
        Annotation {
            annotation_type: self.annotation_type,
            id: self.id.as_deref(),
            label: self.label.as_deref(),
        }
    }
}

impl SourceAnnotationOwned {
    pub fn as_source_annotation(&self) -> SourceAnnotation {
        SourceAnnotation {
            range: self.range,
            label: &self.label,
            annotation_type: self.annotation_type,
        }
    }
}
