//! Indenting XML writer with minimal allocations
//!
//! Elements are written one per line. Leaf elements holding text are kept
//! inline (`<loc>...</loc>`), and an element closed without children is
//! written as `<name></name>`.

use crate::error::Result;
use std::io::Write;

/// Streaming XML writer that buffers small writes before handing them to
/// the underlying sink
pub struct XmlWriter<W: Write> {
    writer: W,
    buffer: Vec<u8>,
    flush_threshold: usize,
    indent: String,
    /// Open elements, innermost last. The flag records whether the element
    /// has received a child yet.
    open: Vec<(String, bool)>,
}

impl<W: Write> XmlWriter<W> {
    pub fn new(writer: W) -> Self {
        Self::with_capacity(writer, 8192)
    }

    pub fn with_capacity(writer: W, capacity: usize) -> Self {
        XmlWriter {
            writer,
            buffer: Vec::with_capacity(capacity),
            flush_threshold: capacity / 2,
            indent: "\t".to_string(),
            open: Vec::new(),
        }
    }

    /// Set the string repeated once per nesting level
    pub fn set_indent(&mut self, indent: &str) {
        self.indent = indent.to_string();
    }

    /// Number of currently open elements
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    #[inline]
    fn auto_flush(&mut self) -> Result<()> {
        if self.buffer.len() >= self.flush_threshold {
            self.flush()?;
        }
        Ok(())
    }

    /// Write raw bytes directly
    #[inline]
    pub fn write_raw(&mut self, data: &[u8]) -> Result<()> {
        self.buffer.extend_from_slice(data);
        self.auto_flush()
    }

    /// Write string data
    #[inline]
    pub fn write_str(&mut self, s: &str) -> Result<()> {
        self.write_raw(s.as_bytes())
    }

    /// Write the XML declaration
    pub fn start_document(&mut self, version: &str, encoding: &str) -> Result<()> {
        self.write_raw(b"<?xml version=\"")?;
        self.write_str(version)?;
        self.write_raw(b"\" encoding=\"")?;
        self.write_str(encoding)?;
        self.write_raw(b"\"?>\n")
    }

    fn write_indent(&mut self, depth: usize) {
        for _ in 0..depth {
            self.buffer.extend_from_slice(self.indent.as_bytes());
        }
    }

    /// Mark the parent as having children, breaking the line after its start
    /// tag on the first child.
    fn enter_child(&mut self) {
        if let Some((_, has_children)) = self.open.last_mut() {
            if !*has_children {
                *has_children = true;
                self.buffer.push(b'\n');
            }
        }
    }

    /// Open an element on its own line
    pub fn start_element(&mut self, name: &str) -> Result<()> {
        self.enter_child();
        self.write_indent(self.open.len());
        self.buffer.push(b'<');
        self.buffer.extend_from_slice(name.as_bytes());
        self.buffer.push(b'>');
        self.open.push((name.to_string(), false));
        self.auto_flush()
    }

    /// Close the innermost open element. Does nothing if none is open.
    pub fn end_element(&mut self) -> Result<()> {
        let Some((name, has_children)) = self.open.pop() else {
            return Ok(());
        };
        if has_children {
            self.write_indent(self.open.len());
        }
        self.buffer.extend_from_slice(b"</");
        self.buffer.extend_from_slice(name.as_bytes());
        self.buffer.extend_from_slice(b">\n");
        self.auto_flush()
    }

    /// Write `<name>text</name>` on its own line, escaping the text
    pub fn write_element(&mut self, name: &str, text: &str) -> Result<()> {
        self.enter_child();
        self.write_indent(self.open.len());
        self.buffer.push(b'<');
        self.buffer.extend_from_slice(name.as_bytes());
        self.buffer.push(b'>');
        self.write_escaped(text)?;
        self.buffer.extend_from_slice(b"</");
        self.buffer.extend_from_slice(name.as_bytes());
        self.buffer.extend_from_slice(b">\n");
        self.auto_flush()
    }

    /// Close every open element
    pub fn end_document(&mut self) -> Result<()> {
        while !self.open.is_empty() {
            self.end_element()?;
        }
        Ok(())
    }

    /// Write text content with XML escaping
    ///
    /// Characters outside the XML 1.0 `Char` production (C0 controls other
    /// than tab, newline and carriage return, U+FFFE, U+FFFF) are dropped.
    /// Carriage returns are written as `&#13;` so parsers do not normalize
    /// them away.
    #[inline]
    pub fn write_escaped(&mut self, text: &str) -> Result<()> {
        let mut utf8 = [0u8; 4];
        for ch in text.chars() {
            match ch {
                '&' => self.buffer.extend_from_slice(b"&amp;"),
                '<' => self.buffer.extend_from_slice(b"&lt;"),
                '>' => self.buffer.extend_from_slice(b"&gt;"),
                '"' => self.buffer.extend_from_slice(b"&quot;"),
                '\'' => self.buffer.extend_from_slice(b"&apos;"),
                '\r' => self.buffer.extend_from_slice(b"&#13;"),
                '\t' | '\n' => self.buffer.push(ch as u8),
                c if is_xml_char(c) => self
                    .buffer
                    .extend_from_slice(c.encode_utf8(&mut utf8).as_bytes()),
                _ => {}
            }
        }
        self.auto_flush()
    }

    /// Flush buffer to underlying writer
    pub fn flush(&mut self) -> Result<()> {
        if !self.buffer.is_empty() {
            self.writer.write_all(&self.buffer)?;
            self.buffer.clear();
        }
        self.writer.flush()?;
        Ok(())
    }

    /// Flush and return the underlying writer
    pub fn into_inner(mut self) -> Result<W> {
        self.flush()?;
        Ok(self.writer)
    }
}

/// `Char ::= #x9 | #xA | #xD | [#x20-#xD7FF] | [#xE000-#xFFFD] | [#x10000-#x10FFFF]`
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(build: impl FnOnce(&mut XmlWriter<&mut Vec<u8>>)) -> String {
        let mut output = Vec::new();
        let mut writer = XmlWriter::new(&mut output);
        build(&mut writer);
        writer.flush().unwrap();
        drop(writer);
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_nested_elements_are_tab_indented() {
        let xml = render(|w| {
            w.start_document("1.0", "UTF-8").unwrap();
            w.start_element("urlset").unwrap();
            w.start_element("url").unwrap();
            w.write_element("loc", "http://example.com/a").unwrap();
            w.end_element().unwrap();
            w.end_element().unwrap();
        });

        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <urlset>\n\
             \t<url>\n\
             \t\t<loc>http://example.com/a</loc>\n\
             \t</url>\n\
             </urlset>\n"
        );
    }

    #[test]
    fn test_empty_element_closes_inline() {
        let xml = render(|w| {
            w.start_element("urlset").unwrap();
            w.end_document().unwrap();
        });
        assert_eq!(xml, "<urlset></urlset>\n");
    }

    #[test]
    fn test_custom_indent() {
        let xml = render(|w| {
            w.set_indent("  ");
            w.start_element("a").unwrap();
            w.write_element("b", "x").unwrap();
            w.end_document().unwrap();
        });
        assert_eq!(xml, "<a>\n  <b>x</b>\n</a>\n");
    }

    #[test]
    fn test_xml_escaping() {
        let xml = render(|w| {
            w.write_element("loc", "<test>&value</test>").unwrap();
        });
        assert_eq!(xml, "<loc>&lt;test&gt;&amp;value&lt;/test&gt;</loc>\n");
    }

    #[test]
    fn test_invalid_xml_chars_dropped() {
        let xml = render(|w| {
            w.write_element("loc", "a\u{1}b\u{0}c\u{1f}d\u{fffe}e").unwrap();
        });
        assert_eq!(xml, "<loc>abcde</loc>\n");
    }

    #[test]
    fn test_whitespace_controls_kept() {
        let xml = render(|w| {
            w.write_element("loc", "a\tb\nc\rd é").unwrap();
        });
        assert_eq!(xml, "<loc>a\tb\nc&#13;d é</loc>\n");
    }

    #[test]
    fn test_end_element_without_open_is_noop() {
        let xml = render(|w| {
            w.end_element().unwrap();
            assert_eq!(w.depth(), 0);
        });
        assert_eq!(xml, "");
    }
}
