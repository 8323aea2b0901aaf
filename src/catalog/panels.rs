use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use tracing::debug;

use crate::error::StructureError;
use crate::model::{AnnotatedLine, PanelSection};
use crate::text::TextNormalizer;

const PANEL_ID: &str = "ui_lib_panel";
const HEADING_CLASS: &str = "sh-font-semibold";
const CONTENT_CLASS_PREFIX: &str = "ui-lib-coll-pan-id";

pub fn extract_sections(
    html: &str,
    normalizer: &TextNormalizer,
) -> Result<Vec<PanelSection>, StructureError> {
    let dom = parse_document(RcDom::default(), Default::default()).one(html);

    let panels = descendants(&dom.document)
        .into_iter()
        .filter(|node| is_element(node, "div") && attribute(node, "id").as_deref() == Some(PANEL_ID))
        .collect::<Vec<Handle>>();
    if panels.is_empty() {
        return Err(StructureError::NoPanels);
    }

    let mut sections = Vec::with_capacity(panels.len());
    for (index, panel) in panels.iter().enumerate() {
        let panel_nodes = descendants(panel);

        let heading = panel_nodes
            .iter()
            .find(|node| is_element(node, "span") && has_class(node, |class| class == HEADING_CLASS))
            .map(stripped_text)
            .ok_or(StructureError::MissingHeading { index })?;

        let content = panel_nodes
            .iter()
            .find(|node| is_element(node, "div") && has_class(node, is_content_class))
            .ok_or_else(|| StructureError::MissingContent {
                heading: heading.clone(),
            })?;

        let lines = extract_lines(content, normalizer);
        if lines.is_empty() {
            return Err(StructureError::EmptyPanel { heading });
        }

        debug!(
            heading = %heading,
            lines = lines.len(),
            annotations = lines.iter().filter(|line| line.is_annotation).count(),
            "extracted panel"
        );
        sections.push(PanelSection { heading, lines });
    }

    Ok(sections)
}

fn is_content_class(class: &str) -> bool {
    class.starts_with(CONTENT_CLASS_PREFIX) && !class.contains('_')
}

enum MarkupNode {
    Text(String),
    LineBreak,
    Paragraph,
    Container,
    Ignored,
}

fn classify(node: &Handle) -> MarkupNode {
    match &node.data {
        NodeData::Text { contents } => MarkupNode::Text(contents.borrow().to_string()),
        NodeData::Element { name, .. } => match &*name.local {
            "br" => MarkupNode::LineBreak,
            "p" => MarkupNode::Paragraph,
            _ => MarkupNode::Container,
        },
        NodeData::Document => MarkupNode::Container,
        _ => MarkupNode::Ignored,
    }
}

#[derive(Debug, Default)]
struct LineContext {
    flushed: usize,
}

struct LineCollector<'a> {
    normalizer: &'a TextNormalizer,
    pending: Vec<String>,
    lines: Vec<AnnotatedLine>,
}

fn extract_lines(content: &Handle, normalizer: &TextNormalizer) -> Vec<AnnotatedLine> {
    let mut collector = LineCollector {
        normalizer,
        pending: Vec::new(),
        lines: Vec::new(),
    };
    for child in content.children.borrow().iter() {
        collector.walk(child, None);
    }
    collector.flush(None);
    collector.lines
}

impl LineCollector<'_> {
    fn walk(&mut self, node: &Handle, mut context: Option<&mut LineContext>) {
        match classify(node) {
            MarkupNode::Text(raw) => {
                let fragment = self.normalizer.normalize(&raw);
                if !fragment.is_empty() {
                    self.pending.push(fragment);
                }
            }
            MarkupNode::LineBreak => self.flush(context),
            MarkupNode::Paragraph => {
                self.flush(context);
                let mut paragraph = LineContext::default();
                for child in node.children.borrow().iter() {
                    self.walk(child, Some(&mut paragraph));
                }
                self.flush(Some(&mut paragraph));
            }
            MarkupNode::Container => {
                for child in node.children.borrow().iter() {
                    self.walk(child, context.as_deref_mut());
                }
            }
            MarkupNode::Ignored => {}
        }
    }

    fn flush(&mut self, context: Option<&mut LineContext>) {
        if self.pending.is_empty() {
            return;
        }
        let text = self.normalizer.normalize(&self.pending.join(" "));
        self.pending.clear();
        if text.is_empty() {
            return;
        }

        let is_annotation = match context {
            Some(context) => {
                let first = context.flushed == 0;
                context.flushed += 1;
                first
            }
            None => false,
        };
        self.lines.push(if is_annotation {
            AnnotatedLine::annotation(text)
        } else {
            AnnotatedLine::entry(text)
        });
    }
}

fn descendants(node: &Handle) -> Vec<Handle> {
    let mut collected = Vec::new();
    for child in node.children.borrow().iter() {
        collected.push(child.clone());
        collected.extend(descendants(child));
    }
    collected
}

fn is_element(node: &Handle, tag: &str) -> bool {
    matches!(&node.data, NodeData::Element { name, .. } if &*name.local == tag)
}

fn attribute(node: &Handle, attribute_name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| &*attr.name.local == attribute_name)
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

fn has_class(node: &Handle, predicate: impl Fn(&str) -> bool) -> bool {
    attribute(node, "class")
        .map(|classes| classes.split_whitespace().any(|class| predicate(class)))
        .unwrap_or(false)
}

fn stripped_text(node: &Handle) -> String {
    descendants(node)
        .iter()
        .filter_map(|descendant| match &descendant.data {
            NodeData::Text { contents } => {
                let contents = contents.borrow();
                let trimmed = contents.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            _ => None,
        })
        .collect::<Vec<String>>()
        .join("")
}
