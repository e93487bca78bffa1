use std::collections::HashMap;

use restbind::Describe;
use restbind::descriptor::{FieldMetadata, TypeDescriptor};

#[derive(Describe)]
#[allow(dead_code)]
struct Listing {
    /// The identifier of the listing.
    #[rest = "required,id"]
    listing_id: u64,
    #[rest = "Title"]
    title: String,
    price: Option<f64>,
    tags: Vec<String>,
    extras: HashMap<String, bool>,
    r#type: String,
    owner: Owner,
}

#[derive(Describe)]
#[allow(dead_code)]
struct Owner {
    #[rest = "required"]
    name: String,
}

#[derive(Describe)]
#[allow(dead_code)]
struct Page<T> {
    items: Vec<T>,
    #[rest = ""]
    total: u32,
}

#[test]
fn fields_are_described_in_declaration_order() {
    let TypeDescriptor::Record(record) = Listing::descriptor() else {
        panic!("Expected a record");
    };
    assert_eq!(record.name, "Listing");
    let names: Vec<_> = record.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(
        names,
        ["listing_id", "title", "price", "tags", "extras", "type", "owner"]
    );
}

#[test]
fn tags_set_lookup_names_and_requiredness() {
    let TypeDescriptor::Record(record) = Listing::descriptor() else {
        panic!("Expected a record");
    };
    let id = &record.fields[0];
    assert_eq!(id.metadata, FieldMetadata::required().rename("id"));
    assert_eq!(id.lookup_name(), "id");

    let title = &record.fields[1];
    assert!(!title.metadata.required);
    assert_eq!(title.lookup_name(), "Title");

    let price = &record.fields[2];
    assert_eq!(price.metadata, FieldMetadata::default());
    assert_eq!(price.lookup_name(), "price");
    assert_eq!(price.ty, TypeDescriptor::optional(TypeDescriptor::Float));
}

#[test]
fn field_types_are_described_recursively() {
    let TypeDescriptor::Record(record) = Listing::descriptor() else {
        panic!("Expected a record");
    };
    assert_eq!(record.fields[3].ty, TypeDescriptor::sequence(TypeDescriptor::Text));
    assert_eq!(
        record.fields[4].ty,
        TypeDescriptor::mapping(TypeDescriptor::Text, TypeDescriptor::Boolean)
    );
    assert_eq!(record.fields[6].ty, Owner::descriptor());
}

#[test]
fn generic_records() {
    let TypeDescriptor::Record(record) = Page::<Owner>::descriptor() else {
        panic!("Expected a record");
    };
    assert_eq!(
        record.fields[0].ty,
        TypeDescriptor::sequence(Owner::descriptor())
    );
    // An empty tag is the same as no tag at all.
    assert_eq!(record.fields[1].metadata, FieldMetadata::default());
}
