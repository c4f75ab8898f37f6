#![allow(dead_code)]

use lopdf::{dictionary, Dictionary, Document, Object, ObjectId};
use std::path::{Path, PathBuf};

/// A text field `/T name /V (value)`.
pub fn text_field(name: &str, value: &str) -> Dictionary {
    dictionary! {
        "FT" => "Tx",
        "T" => Object::string_literal(name),
        "V" => Object::string_literal(value),
    }
}

/// A checkbox / radio field whose value is the name `/state`.
pub fn button_field(name: &str, state: &str) -> Dictionary {
    dictionary! {
        "FT" => "Btn",
        "T" => Object::string_literal(name),
        "V" => state,
    }
}

/// One-page PDF. `fields: None` leaves the catalog without an AcroForm,
/// which is what a flattened answer sheet looks like.
pub fn form_pdf(fields: Option<Vec<Dictionary>>) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id: ObjectId = doc.new_object_id();
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::from(page_id)],
            "Count" => Object::Integer(1),
        }),
    );

    let mut catalog = dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    };
    if let Some(fields) = fields {
        let refs: Vec<Object> = fields
            .into_iter()
            .map(|field| Object::from(doc.add_object(field)))
            .collect();
        let form_id = doc.add_object(dictionary! { "Fields" => refs });
        catalog.set("AcroForm", form_id);
    }
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("failed to save test PDF");
    buf
}

pub fn write_pdf(dir: &Path, name: &str, fields: Option<Vec<Dictionary>>) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, form_pdf(fields)).expect("failed to write test PDF");
    path
}
