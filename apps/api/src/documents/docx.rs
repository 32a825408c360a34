use docx_rs::{DocumentChild, Paragraph, ParagraphChild, Run, RunChild};

use super::{DocumentError, DocumentFormat};

/// Top-level body paragraphs in document order, one `\n` between paragraphs.
/// Tables, headers and footers are not part of the body paragraph list.
pub(super) fn extract(bytes: &[u8]) -> Result<String, DocumentError> {
    let docx =
        docx_rs::read_docx(bytes).map_err(|e| DocumentError::unreadable(DocumentFormat::Docx, e))?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(paragraph) => Some(paragraph_text(paragraph)),
            _ => None,
        })
        .collect();

    Ok(paragraphs.join("\n"))
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut text = String::new();
    push_children(&paragraph.children, &mut text);
    text
}

fn push_children(children: &[ParagraphChild], out: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => push_run(run, out),
            ParagraphChild::Hyperlink(link) => push_children(&link.children, out),
            _ => {}
        }
    }
}

fn push_run(run: &Run, out: &mut String) {
    for child in &run.children {
        match child {
            RunChild::Text(text) => out.push_str(&text.text),
            RunChild::Tab(_) => out.push('\t'),
            RunChild::Break(_) => out.push('\n'),
            _ => {}
        }
    }
}
