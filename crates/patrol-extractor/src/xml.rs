//! Streaming text collection from document XML parts

use crate::error::ExtractError;
use quick_xml::events::Event;
use quick_xml::Reader;

/// Describes which elements of a document vocabulary carry text
#[derive(Debug, Clone, Copy)]
pub(crate) struct XmlLayout {
    /// Elements delimiting one output block (paragraph, shape, heading)
    pub blocks: &'static [&'static [u8]],

    /// Elements whose character data is kept; `None` keeps all text inside a block
    pub texts: Option<&'static [&'static [u8]]>,

    /// Elements that end a line, either empty (`<a:br/>`) or on close (`</a:p>`)
    pub line_breaks: &'static [&'static [u8]],

    /// Empty elements standing for whitespace (tabs, repeated spaces)
    pub spaces: &'static [&'static [u8]],
}

impl XmlLayout {
    fn is_block(&self, name: &[u8]) -> bool {
        self.blocks.contains(&name)
    }

    fn is_text(&self, name: &[u8]) -> bool {
        self.texts.is_some_and(|texts| texts.contains(&name))
    }

    fn is_line_break(&self, name: &[u8]) -> bool {
        self.line_breaks.contains(&name)
    }

    fn is_space(&self, name: &[u8]) -> bool {
        self.spaces.contains(&name)
    }
}

/// Collect the text of every top-level block in `xml`, in document order
///
/// Nested blocks are folded into their enclosing block. Trailing line breaks
/// are trimmed from each block.
pub(crate) fn blocks(xml: &[u8], layout: &XmlLayout) -> Result<Vec<String>, ExtractError> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut found = Vec::new();
    let mut current = String::new();
    let mut block_depth = 0usize;
    let mut text_depth = 0usize;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let name = e.name();
                if layout.is_block(name.as_ref()) {
                    block_depth += 1;
                } else if block_depth > 0 && layout.is_text(name.as_ref()) {
                    text_depth += 1;
                }
            }
            Event::Empty(e) => {
                let name = e.name();
                if block_depth > 0 {
                    if layout.is_line_break(name.as_ref()) {
                        current.push('\n');
                    } else if layout.is_space(name.as_ref()) {
                        current.push(' ');
                    }
                }
            }
            Event::Text(t) => {
                if block_depth > 0 && (layout.texts.is_none() || text_depth > 0) {
                    current.push_str(&t.unescape()?);
                }
            }
            Event::CData(c) => {
                if block_depth > 0 && (layout.texts.is_none() || text_depth > 0) {
                    current.push_str(&String::from_utf8_lossy(&c));
                }
            }
            Event::End(e) => {
                let name = e.name();
                if block_depth > 0 && layout.is_block(name.as_ref()) {
                    block_depth -= 1;
                    if block_depth == 0 {
                        let text = std::mem::take(&mut current);
                        found.push(text.trim_end_matches('\n').to_string());
                    }
                } else if block_depth > 0 && layout.is_text(name.as_ref()) {
                    text_depth = text_depth.saturating_sub(1);
                } else if block_depth > 0 && layout.is_line_break(name.as_ref()) {
                    current.push('\n');
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(found)
}
