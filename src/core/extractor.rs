//! Reads AcroForm field values out of a PDF with `lopdf`.
//!
//! Every failure mode (missing file, corrupt bytes, a catalog without
//! `/AcroForm`, an empty `/Fields` array) is folded into an
//! [`ExtractionOutcome`] so that one bad upload never stops a batch.

use crate::domain::model::{ExtractionOutcome, FieldMap, FieldRecord, FieldValue};
use crate::domain::ports::FormReader;
use crate::utils::error::EtlError;
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

const MAX_REFERENCE_HOPS: usize = 16;
const MAX_FIELD_DEPTH: usize = 32;

#[derive(Debug, Clone, Copy, Default)]
pub struct PdfFormExtractor;

impl PdfFormExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract_bytes(&self, bytes: &[u8]) -> FieldMap {
        self.inspect_bytes(bytes).into_fields()
    }

    pub fn inspect_bytes(&self, bytes: &[u8]) -> ExtractionOutcome {
        guarded("<memory>", || match Document::load_mem(bytes) {
            Ok(document) => inspect_document(&document),
            Err(e) => ExtractionOutcome::Unreadable(EtlError::from(e).to_string()),
        })
    }
}

impl FormReader for PdfFormExtractor {
    fn inspect(&self, path: &Path) -> ExtractionOutcome {
        let label = path.display().to_string();
        // document 在 closure 結束時釋放，下一個檔案開啟前已關閉
        guarded(&label, || match Document::load(path) {
            Ok(document) => inspect_document(&document),
            Err(e) => ExtractionOutcome::Unreadable(EtlError::from(e).to_string()),
        })
    }
}

/// Runs one document read, turning a parser panic into `Unreadable` and
/// logging every unreadable outcome.
fn guarded<F>(label: &str, read: F) -> ExtractionOutcome
where
    F: FnOnce() -> ExtractionOutcome,
{
    let outcome = panic::catch_unwind(AssertUnwindSafe(read)).unwrap_or_else(|_| {
        ExtractionOutcome::Unreadable("PDF parser panicked on malformed input".to_string())
    });

    match &outcome {
        ExtractionOutcome::Unreadable(reason) => {
            tracing::warn!("⚠️ Error processing {}: {}", label, reason);
        }
        ExtractionOutcome::NoFormData => {
            tracing::debug!("No AcroForm fields in {}", label);
        }
        ExtractionOutcome::Fields(fields) => {
            tracing::debug!("Read {} form fields from {}", fields.len(), label);
        }
    }
    outcome
}

pub fn inspect_document(document: &Document) -> ExtractionOutcome {
    let Some(fields) = form_fields(document) else {
        return ExtractionOutcome::NoFormData;
    };

    let records = FieldWalker::new(document).collect(fields);
    if records.is_empty() {
        return ExtractionOutcome::NoFormData;
    }

    let mut map = FieldMap::with_capacity(records.len());
    for record in records {
        let name = record.name;
        if map.insert(name.clone(), record.value.to_string()).is_some() {
            tracing::debug!("Duplicate form field '{}', keeping the later value", name);
        }
    }
    ExtractionOutcome::Fields(map)
}

/// Catalog → `/AcroForm` → `/Fields`, following indirect references.
fn form_fields(document: &Document) -> Option<&Vec<Object>> {
    let root = resolve(document, document.trailer.get(b"Root").ok()?)?;
    let catalog = root.as_dict().ok()?;
    let acroform = resolve(document, catalog.get(b"AcroForm").ok()?)?.as_dict().ok()?;
    resolve(document, acroform.get(b"Fields").ok()?)?
        .as_array()
        .ok()
}

fn resolve<'a>(document: &'a Document, mut object: &'a Object) -> Option<&'a Object> {
    for _ in 0..MAX_REFERENCE_HOPS {
        match object {
            Object::Reference(id) => object = document.get_object(*id).ok()?,
            other => return Some(other),
        }
    }
    None
}

struct FieldWalker<'a> {
    document: &'a Document,
    visited: HashSet<ObjectId>,
    records: Vec<FieldRecord>,
}

impl<'a> FieldWalker<'a> {
    fn new(document: &'a Document) -> Self {
        Self {
            document,
            visited: HashSet::new(),
            records: Vec::new(),
        }
    }

    fn collect(mut self, fields: &'a [Object]) -> Vec<FieldRecord> {
        for field in fields {
            self.walk(field, None, None, 0);
        }
        self.records
    }

    fn walk(
        &mut self,
        node: &'a Object,
        parent_name: Option<&str>,
        inherited_value: Option<&'a Object>,
        depth: usize,
    ) {
        if depth > MAX_FIELD_DEPTH {
            return;
        }
        if let Object::Reference(id) = node {
            if !self.visited.insert(*id) {
                return;
            }
        }
        let Some(dict) = resolve(self.document, node).and_then(|object| object.as_dict().ok())
        else {
            return;
        };

        let partial_name = dict
            .get(b"T")
            .ok()
            .and_then(|title| text_of(self.document, title));
        let name = match (parent_name, partial_name) {
            (Some(parent), Some(partial)) => format!("{}.{}", parent, partial),
            (None, Some(partial)) => partial,
            (Some(parent), None) => parent.to_string(),
            (None, None) => {
                tracing::debug!("Skipping form field without a /T title");
                return;
            }
        };

        // /V 可由父欄位繼承
        let value = dict.get(b"V").ok().or(inherited_value);

        let named_kids = self.named_kids(dict);
        if named_kids.is_empty() {
            let value = value
                .map(|object| field_value(self.document, object, 0))
                .unwrap_or(FieldValue::Absent);
            self.records.push(FieldRecord { name, value });
            return;
        }

        for kid in named_kids {
            self.walk(kid, Some(name.as_str()), value, depth + 1);
        }
    }

    /// Kids that carry their own `/T` are child fields; the rest are
    /// widget annotations of this field.
    fn named_kids(&self, dict: &'a Dictionary) -> Vec<&'a Object> {
        let Some(kids) = dict
            .get(b"Kids")
            .ok()
            .and_then(|kids| resolve(self.document, kids))
            .and_then(|kids| kids.as_array().ok())
        else {
            return Vec::new();
        };

        kids.iter()
            .filter(|kid| {
                resolve(self.document, kid)
                    .and_then(|object| object.as_dict().ok())
                    .map(|kid_dict| kid_dict.has(b"T"))
                    .unwrap_or(false)
            })
            .collect()
    }
}

fn field_value(document: &Document, object: &Object, depth: usize) -> FieldValue {
    if depth > MAX_FIELD_DEPTH {
        return FieldValue::Absent;
    }
    match resolve(document, object) {
        Some(Object::Name(name)) => FieldValue::named(&String::from_utf8_lossy(name)),
        Some(Object::String(bytes, _)) => FieldValue::Text(decode_text_string(bytes)),
        Some(Object::Integer(value)) => FieldValue::Integer(*value),
        Some(Object::Real(value)) => FieldValue::Real(*value as f32),
        Some(Object::Boolean(value)) => FieldValue::Boolean(*value),
        Some(Object::Array(items)) => FieldValue::List(
            items
                .iter()
                .map(|item| field_value(document, item, depth + 1))
                .collect(),
        ),
        // rich text 欄位的值是文字串流
        Some(Object::Stream(stream)) => {
            let content = if stream.dict.has(b"Filter") {
                stream.decompressed_content().ok()
            } else {
                Some(stream.content.clone())
            };
            content
                .map(|bytes| FieldValue::Text(decode_text_string(&bytes)))
                .unwrap_or(FieldValue::Absent)
        }
        _ => FieldValue::Absent,
    }
}

fn text_of(document: &Document, object: &Object) -> Option<String> {
    match resolve(document, object)? {
        Object::String(bytes, _) => Some(decode_text_string(bytes)),
        Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
        _ => None,
    }
}

/// PDF text strings: UTF-16 with a byte order mark, UTF-8 with a BOM, or
/// single-byte text (UTF-8 when valid, Latin-1 otherwise).
pub fn decode_text_string(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        return decode_utf16(rest, u16::from_be_bytes);
    }
    if let Some(rest) = bytes.strip_prefix(&[0xFF, 0xFE]) {
        return decode_utf16(rest, u16::from_le_bytes);
    }
    if let Some(rest) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return String::from_utf8_lossy(rest).into_owned();
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| unit([pair[0], pair[1]]))
        .collect();
    String::from_utf16_lossy(&units)
}
