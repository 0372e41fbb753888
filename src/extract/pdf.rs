//! lopdf-backed span source.
//!
//! Walks page content streams with a text-matrix interpreter and decodes
//! strings through each page's font encodings. Only the operators that
//! move or show text matter here; graphics state is ignored.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use lopdf::{Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};
use crate::model::{BoundingBox, TextSpan};

use super::{Bookmark, SpanSource};

/// Approximate glyph width as a fraction of the font size, used to
/// estimate span extents without consulting font metrics.
const AVG_GLYPH_WIDTH: f32 = 0.5;

/// Kerning adjustment (1/1000 text-space units) treated as a word break
/// inside a TJ array.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// A [`SpanSource`] reading from a PDF via lopdf.
pub struct PdfSpanSource {
    doc: LopdfDocument,
    pages: BTreeMap<u32, ObjectId>,
}

impl PdfSpanSource {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let doc = LopdfDocument::load(path.as_ref()).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::from(e),
        })?;
        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }
        let pages = doc.get_pages();
        Ok(Self { doc, pages })
    }

    /// Open a PDF from memory.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::from(e),
        })?;
        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }
        let pages = doc.get_pages();
        Ok(Self { doc, pages })
    }

    fn page_id(&self, page: u32) -> Result<ObjectId> {
        self.pages
            .get(&page)
            .copied()
            .ok_or(Error::PageOutOfRange(page, self.pages.len() as u32))
    }

    /// Concatenated content streams of a page.
    fn page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let contents = page_dict
            .get(b"Contents")
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        match contents {
            Object::Reference(r) => match self.doc.get_object(*r) {
                Ok(Object::Stream(s)) => s
                    .decompressed_content()
                    .map_err(|e| Error::PdfParse(e.to_string())),
                _ => Err(Error::PdfParse("invalid content stream".to_string())),
            },
            Object::Array(arr) => {
                let mut content = Vec::new();
                for obj in arr {
                    if let Object::Reference(r) = obj {
                        if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                            if let Ok(data) = s.decompressed_content() {
                                content.extend_from_slice(&data);
                                content.push(b' ');
                            }
                        }
                    }
                }
                Ok(content)
            }
            _ => Err(Error::PdfParse("invalid content stream".to_string())),
        }
    }

    fn parse_content(
        &self,
        page: u32,
        content: &[u8],
        fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>,
    ) -> Result<Vec<TextSpan>> {
        let content = lopdf::content::Content::decode(content)
            .map_err(|e| Error::SpanExtract(e.to_string()))?;

        // Base font names resolved once per page.
        let mut base_fonts: HashMap<Vec<u8>, String> = HashMap::new();
        for (name, font) in fonts {
            let base = font
                .get(b"BaseFont")
                .ok()
                .and_then(|o| o.as_name().ok())
                .map(|n| String::from_utf8_lossy(n).to_string())
                .unwrap_or_else(|| "Unknown".to_string());
            base_fonts.insert(name.clone(), base);
        }

        let mut spans = Vec::new();
        let mut state = TextState::default();
        let mut font_key: Vec<u8> = Vec::new();
        let mut font_name = String::new();
        let mut font_size: f32 = 12.0;
        let mut in_text = false;

        for op in content.operations {
            match op.operator.as_str() {
                "BT" => {
                    in_text = true;
                    state = TextState::default();
                }
                "ET" => in_text = false,
                "Tf" => {
                    if op.operands.len() >= 2 {
                        if let Object::Name(name) = &op.operands[0] {
                            font_key = name.clone();
                            font_name = base_fonts
                                .get(name.as_slice())
                                .cloned()
                                .unwrap_or_else(|| String::from_utf8_lossy(name).to_string());
                        }
                        font_size = number(&op.operands[1]).unwrap_or(12.0);
                    }
                }
                "TL" => {
                    if let Some(leading) = op.operands.first().and_then(number) {
                        state.leading = leading;
                    }
                }
                "Td" => {
                    if op.operands.len() >= 2 {
                        let tx = number(&op.operands[0]).unwrap_or(0.0);
                        let ty = number(&op.operands[1]).unwrap_or(0.0);
                        state.translate(tx, ty);
                    }
                }
                "TD" => {
                    if op.operands.len() >= 2 {
                        let tx = number(&op.operands[0]).unwrap_or(0.0);
                        let ty = number(&op.operands[1]).unwrap_or(0.0);
                        state.leading = -ty;
                        state.translate(tx, ty);
                    }
                }
                "Tm" => {
                    if op.operands.len() >= 6 {
                        let v: Vec<f32> = op.operands.iter().filter_map(number).collect();
                        if v.len() >= 6 {
                            state.set_matrix(v[0], v[1], v[2], v[3], v[4], v[5]);
                        }
                    }
                }
                "T*" => state.next_line(),
                "Tj" | "TJ" => {
                    if !in_text {
                        continue;
                    }
                    let text = match op.operator.as_str() {
                        "TJ" => self.decode_tj(&op.operands, &font_key, fonts),
                        _ => match op.operands.first() {
                            Some(Object::String(bytes, _)) => {
                                self.decode_string(bytes, &font_key, fonts)
                            }
                            _ => String::new(),
                        },
                    };
                    self.push_span(&mut spans, page, &state, &font_name, font_size, text);
                }
                "'" | "\"" => {
                    state.next_line();
                    if !in_text {
                        continue;
                    }
                    let text_idx = if op.operator == "\"" { 2 } else { 0 };
                    if let Some(Object::String(bytes, _)) = op.operands.get(text_idx) {
                        let text = self.decode_string(bytes, &font_key, fonts);
                        self.push_span(&mut spans, page, &state, &font_name, font_size, text);
                    }
                }
                _ => {}
            }
        }

        Ok(spans)
    }

    fn push_span(
        &self,
        spans: &mut Vec<TextSpan>,
        page: u32,
        state: &TextState,
        font_name: &str,
        font_size: f32,
        text: String,
    ) {
        if text.trim().is_empty() {
            return;
        }
        let (x, y) = state.position();
        let size = font_size * state.scale();
        let width = text.chars().count() as f32 * size * AVG_GLYPH_WIDTH;
        let bbox = BoundingBox::new(x, y - size * 0.2, x + width, y + size * 0.8);
        spans.push(TextSpan::new(text, font_name, size, page, bbox));
    }

    fn decode_tj(
        &self,
        operands: &[Object],
        font_key: &[u8],
        fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>,
    ) -> String {
        let Some(Object::Array(items)) = operands.first() else {
            return String::new();
        };

        let mut combined = String::new();
        for item in items {
            match item {
                Object::String(bytes, _) => {
                    combined.push_str(&self.decode_string(bytes, font_key, fonts));
                }
                // Large negative adjustments advance the pen far enough to
                // be word spaces.
                Object::Integer(n) => {
                    if -(*n as f32) > TJ_SPACE_THRESHOLD && !combined.ends_with(' ') {
                        combined.push(' ');
                    }
                }
                Object::Real(n) => {
                    if -n > TJ_SPACE_THRESHOLD && !combined.ends_with(' ') {
                        combined.push(' ');
                    }
                }
                _ => {}
            }
        }
        combined
    }

    fn decode_string(
        &self,
        bytes: &[u8],
        font_key: &[u8],
        fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>,
    ) -> String {
        if let Some(encoding) = fonts
            .get(font_key)
            .and_then(|f| f.get_font_encoding(&self.doc).ok())
        {
            if let Ok(decoded) = LopdfDocument::decode_text(&encoding, bytes) {
                return decoded;
            }
        }
        decode_text_fallback(bytes)
    }

    fn resolve_destination(&self, dest: &Object) -> Option<u32> {
        let dest_array = dest.as_array().ok()?;
        let page_ref = dest_array.first()?.as_reference().ok()?;
        self.pages
            .iter()
            .find(|(_, id)| **id == page_ref)
            .map(|(num, _)| *num)
    }

    fn bookmark_page(&self, item: &lopdf::Dictionary) -> Option<u32> {
        if let Ok(dest) = item.get(b"Dest") {
            return self.resolve_destination(dest);
        }
        if let Ok(action) = item.get(b"A") {
            if let Ok(action_ref) = action.as_reference() {
                if let Ok(action_dict) = self.doc.get_dictionary(action_ref) {
                    if let Ok(dest) = action_dict.get(b"D") {
                        return self.resolve_destination(dest);
                    }
                }
            }
        }
        None
    }

    fn collect_bookmarks(&self, item_ref: ObjectId, depth: u8, out: &mut Vec<Bookmark>) {
        // Bounded to sane nesting; malformed files can cycle.
        if depth > 8 || out.len() > 4096 {
            return;
        }
        if let Ok(item) = self.doc.get_dictionary(item_ref) {
            let text = dict_string(item, b"Title").unwrap_or_default();
            if !text.trim().is_empty() {
                out.push(Bookmark {
                    text: text.trim().to_string(),
                    page: self.bookmark_page(item),
                    depth,
                });
            }

            if let Ok(first) = item.get(b"First") {
                if let Ok(first_ref) = first.as_reference() {
                    self.collect_bookmarks(first_ref, depth + 1, out);
                }
            }
            if let Ok(next) = item.get(b"Next") {
                if let Ok(next_ref) = next.as_reference() {
                    self.collect_bookmarks(next_ref, depth, out);
                }
            }
        }
    }
}

impl SpanSource for PdfSpanSource {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_spans(&self, page: u32) -> Result<Vec<TextSpan>> {
        let page_id = self.page_id(page)?;
        let fonts = self
            .doc
            .get_page_fonts(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;
        let content = match self.page_content(page_id) {
            Ok(content) => content,
            Err(e) => {
                // A page without readable content is empty, not fatal.
                log::warn!("page {page}: unreadable content stream: {e}");
                return Ok(Vec::new());
            }
        };
        self.parse_content(page, &content, &fonts)
    }

    fn page_height(&self, page: u32) -> f32 {
        let Ok(page_id) = self.page_id(page) else {
            return 792.0;
        };
        if let Ok(page_dict) = self.doc.get_dictionary(page_id) {
            if let Ok(media_box) = page_dict.get(b"MediaBox") {
                if let Ok(array) = media_box.as_array() {
                    if array.len() >= 4 {
                        return array[3].as_float().unwrap_or(792.0);
                    }
                }
            }
        }
        // Letter height
        792.0
    }

    fn metadata_title(&self) -> Option<String> {
        let info = self.doc.trailer.get(b"Info").ok()?;
        let info_ref = info.as_reference().ok()?;
        let info_dict = self.doc.get_dictionary(info_ref).ok()?;
        dict_string(info_dict, b"Title").filter(|t| !t.trim().is_empty())
    }

    fn bookmarks(&self) -> Vec<Bookmark> {
        let mut out = Vec::new();
        if let Ok(catalog) = self.doc.catalog() {
            if let Ok(outlines) = catalog.get(b"Outlines") {
                if let Ok(outlines_ref) = outlines.as_reference() {
                    if let Ok(outlines_dict) = self.doc.get_dictionary(outlines_ref) {
                        if let Ok(first) = outlines_dict.get(b"First") {
                            if let Ok(first_ref) = first.as_reference() {
                                self.collect_bookmarks(first_ref, 0, &mut out);
                            }
                        }
                    }
                }
            }
        }
        out
    }
}

/// Text placement state: the text matrix plus line origin and leading.
#[derive(Debug, Clone)]
struct TextState {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
    leading: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
            leading: 12.0,
        }
    }
}

impl TextState {
    fn set_matrix(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn next_line(&mut self) {
        let leading = self.leading;
        self.translate(0.0, -leading);
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn scale(&self) -> f32 {
        (self.a * self.a + self.c * self.c).sqrt()
    }
}

/// Extract a number from a PDF object.
fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Read a string value from a PDF dictionary, handling UTF-16BE.
fn dict_string(dict: &lopdf::Dictionary, key: &[u8]) -> Option<String> {
    dict.get(key).ok().and_then(|obj| match obj {
        Object::String(bytes, _) => Some(decode_text_fallback(bytes)),
        Object::Name(bytes) => String::from_utf8(bytes.clone()).ok(),
        _ => None,
    })
}

/// Decode a PDF string without font encoding information: UTF-16BE when
/// BOM-marked, then UTF-8, then Latin-1.
fn decode_text_fallback(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter_map(|c| {
                if c.len() == 2 {
                    Some(u16::from_be_bytes([c[0], c[1]]))
                } else {
                    None
                }
            })
            .collect();
        return String::from_utf16(&utf16).unwrap_or_default();
    }

    if let Ok(s) = String::from_utf8(bytes.to_vec()) {
        return s;
    }

    bytes.iter().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_text_fallback_utf8() {
        assert_eq!(decode_text_fallback(b"Hello"), "Hello");
    }

    #[test]
    fn test_decode_text_fallback_utf16be() {
        let bytes = [0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69];
        assert_eq!(decode_text_fallback(&bytes), "Hi");
    }

    #[test]
    fn test_decode_text_fallback_latin1() {
        let bytes = [0xE9, 0x74, 0xE9]; // "été" in Latin-1
        assert_eq!(decode_text_fallback(&bytes), "été");
    }

    #[test]
    fn test_text_state_leading() {
        let mut state = TextState::default();
        state.leading = 14.0;
        state.next_line();
        assert_eq!(state.position(), (0.0, -14.0));
    }

    #[test]
    fn test_text_state_matrix_scale() {
        let mut state = TextState::default();
        state.set_matrix(2.0, 0.0, 0.0, 2.0, 10.0, 20.0);
        assert_eq!(state.scale(), 2.0);
        assert_eq!(state.position(), (10.0, 20.0));
    }
}
