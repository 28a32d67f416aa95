//! Minimal paginated PDF writer.
//!
//! [`DocumentBuilder`] collects pages of pre-wrapped text lines and lays out
//! the object graph: catalog (1), page tree (2), shared font (3), then one
//! page and content-stream pair per page starting at 4. [`Document::serialize`]
//! is the only place byte offsets are computed. It records where each object
//! begins and emits the cross-reference table, trailer and `startxref` from
//! those positions.

use std::path::Path;

/// A4 in points.
pub const PAGE_WIDTH: u32 = 595;
pub const PAGE_HEIGHT: u32 = 842;

const CATALOG: u32 = 1;
const PAGE_TREE: u32 = 2;
const FONT: u32 = 3;
const FIRST_PAGE: u32 = 4;

const HEADER: &[u8] = b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n";

/// Placement of text on every page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    pub font_size: u32,
    pub leading: u32,
    pub left: u32,
    pub top: u32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 10,
            leading: 12,
            left: 50,
            top: 800,
        }
    }
}

/// Accumulates pages, each a list of text lines drawn top to bottom.
#[derive(Debug, Clone, Default)]
pub struct DocumentBuilder {
    style: TextStyle,
    pages: Vec<Vec<String>>,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }

    pub fn add_page(&mut self, lines: Vec<String>) -> &mut Self {
        self.pages.push(lines);
        self
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Build the object graph. A document always has at least one page.
    pub fn finish(self) -> Document {
        let mut pages = self.pages;
        if pages.is_empty() {
            pages.push(Vec::new());
        }
        let page_count = pages.len();

        let mut objects = Vec::with_capacity(3 + 2 * page_count);
        objects.push(format!("<< /Type /Catalog /Pages {PAGE_TREE} 0 R >>").into_bytes());

        let kids = (0..page_count)
            .map(|i| format!("{} 0 R", page_object(i)))
            .collect::<Vec<_>>()
            .join(" ");
        objects.push(
            format!("<< /Type /Pages /Kids [{kids}] /Count {page_count} >>").into_bytes(),
        );
        objects.push(
            b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_vec(),
        );

        for (i, lines) in pages.iter().enumerate() {
            let contents = page_object(i) + 1;
            objects.push(
                format!(
                    "<< /Type /Page /Parent {PAGE_TREE} 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
                     /Resources << /Font << /F1 {FONT} 0 R >> >> /Contents {contents} 0 R >>"
                )
                .into_bytes(),
            );

            let stream = content_stream(lines, &self.style);
            let mut body = format!("<< /Length {} >>\nstream\n", stream.len()).into_bytes();
            body.extend_from_slice(&stream);
            body.extend_from_slice(b"\nendstream");
            objects.push(body);
        }

        Document {
            objects,
            page_count,
        }
    }
}

fn page_object(page: usize) -> u32 {
    FIRST_PAGE + 2 * page as u32
}

fn content_stream(lines: &[String], style: &TextStyle) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(
        format!(
            "BT\n/F1 {} Tf\n{} {} Td\n",
            style.font_size, style.left, style.top
        )
        .as_bytes(),
    );
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            out.extend_from_slice(format!("0 -{} Td\n", style.leading).as_bytes());
        }
        out.push(b'(');
        out.extend_from_slice(&encode_text(line));
        out.extend_from_slice(b") Tj\n");
    }
    out.extend_from_slice(b"ET");
    out
}

/// Encode `s` for a PDF string literal.
///
/// Backslash and both parentheses are escaped. Latin-1 characters become
/// single bytes for the WinAnsi-encoded font; anything else, and control
/// characters, become `?`.
pub fn encode_text(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\\' | '(' | ')' => {
                out.push(b'\\');
                out.push(ch as u8);
            }
            '\t' => out.push(b' '),
            c => match u8::try_from(u32::from(c)) {
                Ok(b) if b >= 0x20 && !(0x7F..0xA0).contains(&b) => out.push(b),
                _ => out.push(b'?'),
            },
        }
    }
    out
}

/// The object graph of a document, bodies in object-number order.
#[derive(Debug, Clone)]
pub struct Document {
    objects: Vec<Vec<u8>>,
    page_count: usize,
}

impl Document {
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Body of object `number` (1-based), without the `obj`/`endobj` frame.
    pub fn object(&self, number: usize) -> Option<&[u8]> {
        number
            .checked_sub(1)
            .and_then(|i| self.objects.get(i))
            .map(Vec::as_slice)
    }

    pub fn serialize(&self) -> SerializedDocument {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(HEADER);

        let mut offsets = Vec::with_capacity(self.objects.len());
        for (i, body) in self.objects.iter().enumerate() {
            offsets.push(bytes.len());
            bytes.extend_from_slice(format!("{} 0 obj\n", i + 1).as_bytes());
            bytes.extend_from_slice(body);
            bytes.extend_from_slice(b"\nendobj\n");
        }

        let xref_offset = bytes.len();
        let size = self.objects.len() + 1;
        let mut xref = String::new();
        xref.push_str(&format!("xref\n0 {size}\n"));
        xref.push_str("0000000000 65535 f \n");
        for offset in &offsets {
            xref.push_str(&format!("{offset:010} 00000 n \n"));
        }
        xref.push_str(&format!(
            "trailer\n<< /Size {size} /Root {CATALOG} 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n"
        ));
        bytes.extend_from_slice(xref.as_bytes());

        SerializedDocument {
            bytes,
            offsets,
            xref_offset,
        }
    }

    /// Serialize and write to `path`.
    pub fn write_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.serialize().bytes)
    }
}

/// Serialized bytes plus the offsets the xref table was built from.
#[derive(Debug, Clone)]
pub struct SerializedDocument {
    pub bytes: Vec<u8>,
    /// Byte offset of object `i + 1`.
    pub offsets: Vec<usize>,
    pub xref_offset: usize,
}
