//! PowerPoint presentations (pptx, pptm)

use crate::error::ExtractError;
use crate::extractor::{TextExtractor, TextUnits};
use crate::package::Package;
use crate::xml::{blocks, XmlLayout};
use patrol_domain::TextUnit;
use std::path::Path;

const SHAPES: XmlLayout = XmlLayout {
    blocks: &[b"p:sp"],
    texts: Some(&[b"a:t"]),
    line_breaks: &[b"a:p", b"a:br"],
    spaces: &[],
};

/// Extracts the text body of every shape, slide by slide
///
/// Slides are visited in numeric order (`slide2` before `slide10`). Each shape
/// with text becomes a unit labelled `slide N shape M`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PresentationExtractor;

impl TextExtractor for PresentationExtractor {
    fn name(&self) -> &'static str {
        "pptx"
    }

    fn units(&self, path: &Path) -> Result<TextUnits, ExtractError> {
        let mut package = Package::open(path)?;
        let mut slides: Vec<(u32, String)> = package
            .part_names()
            .into_iter()
            .filter_map(|name| slide_number(&name).map(|n| (n, name)))
            .collect();
        slides.sort();

        let units = slides.into_iter().flat_map(move |(number, part)| {
            let shapes = package
                .read(&part)
                .and_then(|xml| blocks(&xml, &SHAPES));
            let units: Vec<Result<TextUnit, ExtractError>> = match shapes {
                Ok(shapes) => shapes
                    .into_iter()
                    .enumerate()
                    .filter(|(_, text)| !text.is_empty())
                    .map(|(i, text)| {
                        let label = format!("slide {} shape {}", number, i + 1);
                        Ok(TextUnit::new(label, text))
                    })
                    .collect(),
                Err(e) => vec![Err(e)],
            };
            units
        });
        Ok(Box::new(units))
    }
}

fn slide_number(part: &str) -> Option<u32> {
    part.strip_prefix("ppt/slides/slide")?
        .strip_suffix(".xml")?
        .parse()
        .ok()
}
