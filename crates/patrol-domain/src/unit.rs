//! Text units - independently searchable pieces of a document

/// One piece of extracted text (a page, a cell, a shape, or a whole file)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextUnit {
    /// Where the text came from inside the document (e.g. "page 3", "Sheet1!B4")
    pub label: String,

    /// The extracted text
    pub text: String,
}

impl TextUnit {
    /// Create a new text unit
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }

    /// A unit covering the whole document
    pub fn whole(text: impl Into<String>) -> Self {
        Self::new("document", text)
    }
}
