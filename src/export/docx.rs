//! Minimal WordprocessingML (`.docx`) writer.
//!
//! The package holds only the parts Word needs to open it: content types,
//! relationships, a style sheet with a level-1 heading, and the document body.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::{Seek, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::ExportError;
use crate::models::Reference;

/// Heading placed above the reference list
pub const DOCUMENT_HEADING: &str = "APA References";

const WORDML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/></Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const DOCUMENT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style><w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:spacing w:before="480"/><w:outlineLvl w:val="0"/></w:pPr><w:rPr><w:b/><w:sz w:val="28"/></w:rPr></w:style></w:styles>"#;

/// Write the references to a `.docx` file
pub fn write_docx(references: &[Reference], path: &Path) -> Result<(), ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    write_docx_to(references, file)?;
    Ok(())
}

pub(crate) fn write_docx_to<W: Write + Seek>(
    references: &[Reference],
    writer: W,
) -> Result<W, ExportError> {
    let document = render_document_xml(references)?;

    let mut zip = ZipWriter::new(writer);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let parts: [(&str, &[u8]); 5] = [
        ("[Content_Types].xml", CONTENT_TYPES_XML.as_bytes()),
        ("_rels/.rels", ROOT_RELS_XML.as_bytes()),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS_XML.as_bytes()),
        ("word/styles.xml", STYLES_XML.as_bytes()),
        ("word/document.xml", document.as_slice()),
    ];

    for (name, content) in parts {
        zip.start_file(name, options)?;
        zip.write_all(content)?;
    }

    Ok(zip.finish()?)
}

/// Render `word/document.xml` for the given references
///
/// Citations become three runs with the journal run in italics; failures
/// become one plain run carrying the message.
pub fn render_document_xml(references: &[Reference]) -> Result<Vec<u8>, ExportError> {
    let mut writer = Writer::new(Vec::new());

    xml(writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes")))))?;
    xml(writer.write_event(Event::Start(
        BytesStart::new("w:document").with_attributes([("xmlns:w", WORDML_NS)]),
    )))?;
    xml(writer.write_event(Event::Start(BytesStart::new("w:body"))))?;

    write_heading(&mut writer, DOCUMENT_HEADING)?;

    for reference in references {
        xml(writer.write_event(Event::Start(BytesStart::new("w:p"))))?;
        match reference {
            Reference::Citation(citation) => {
                write_run(&mut writer, &citation.lead, false)?;
                write_run(&mut writer, &citation.journal, true)?;
                write_run(&mut writer, &citation.tail, false)?;
            }
            Reference::Failure(failure) => write_run(&mut writer, &failure.message, false)?,
        }
        xml(writer.write_event(Event::End(BytesEnd::new("w:p"))))?;
    }

    xml(writer.write_event(Event::End(BytesEnd::new("w:body"))))?;
    xml(writer.write_event(Event::End(BytesEnd::new("w:document"))))?;

    Ok(writer.into_inner())
}

fn write_heading(writer: &mut Writer<Vec<u8>>, text: &str) -> Result<(), ExportError> {
    xml(writer.write_event(Event::Start(BytesStart::new("w:p"))))?;
    xml(writer.write_event(Event::Start(BytesStart::new("w:pPr"))))?;
    xml(writer.write_event(Event::Empty(
        BytesStart::new("w:pStyle").with_attributes([("w:val", "Heading1")]),
    )))?;
    xml(writer.write_event(Event::End(BytesEnd::new("w:pPr"))))?;
    write_run(writer, text, false)?;
    xml(writer.write_event(Event::End(BytesEnd::new("w:p"))))
}

fn write_run(writer: &mut Writer<Vec<u8>>, text: &str, italic: bool) -> Result<(), ExportError> {
    xml(writer.write_event(Event::Start(BytesStart::new("w:r"))))?;
    if italic {
        xml(writer.write_event(Event::Start(BytesStart::new("w:rPr"))))?;
        xml(writer.write_event(Event::Empty(BytesStart::new("w:i"))))?;
        xml(writer.write_event(Event::End(BytesEnd::new("w:rPr"))))?;
    }
    xml(writer.write_event(Event::Start(
        BytesStart::new("w:t").with_attributes([("xml:space", "preserve")]),
    )))?;
    xml(writer.write_event(Event::Text(BytesText::new(text))))?;
    xml(writer.write_event(Event::End(BytesEnd::new("w:t"))))?;
    xml(writer.write_event(Event::End(BytesEnd::new("w:r"))))
}

fn xml<E: std::fmt::Display>(result: Result<(), E>) -> Result<(), ExportError> {
    result.map_err(|e| ExportError::Xml(e.to_string()))
}
