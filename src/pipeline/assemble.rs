//! PDF assembly: one page per prepared image, built with lopdf.
//!
//! Each page gets its own image XObject named `/Im0` and a four-operator
//! content stream (`q`, `cm`, `Do`, `Q`) that scales the unit image square
//! onto the placement rectangle from [`super::layout`]. The info dictionary
//! holds no timestamps, so the same input always serialises the same way.

use super::decode::PreparedImage;
use super::layout::PageGeometry;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};

/// Written to `/Producer`.
pub const PRODUCER: &str = concat!("folder2pdf ", env!("CARGO_PKG_VERSION"));

const IMAGE_NAME: &[u8] = b"Im0";

/// One page to be written.
#[derive(Debug, Clone)]
pub struct PageSpec {
    pub image: PreparedImage,
    pub geometry: PageGeometry,
}

/// Build the whole document in memory. Pages keep the order of `pages`.
pub fn build_document(pages: Vec<PageSpec>, title: &str) -> lopdf::Result<Document> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for PageSpec { image, geometry } in pages {
        let page_id = add_page(&mut doc, pages_id, image, &geometry)?;
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => text_string(title),
        "Producer" => text_string(PRODUCER),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    Ok(doc)
}

/// Serialise a document to bytes.
pub fn to_bytes(doc: &mut Document) -> lopdf::Result<Vec<u8>> {
    let mut buf = Vec::new();
    doc.save_to(&mut buf)?;
    Ok(buf)
}

fn add_page(
    doc: &mut Document,
    pages_id: ObjectId,
    image: PreparedImage,
    g: &PageGeometry,
) -> lopdf::Result<ObjectId> {
    let image_id = add_image(doc, image);

    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    g.draw_width.into(),
                    0.0f32.into(),
                    0.0f32.into(),
                    g.draw_height.into(),
                    g.x.into(),
                    g.y.into(),
                ],
            ),
            Operation::new("Do", vec![Object::Name(IMAGE_NAME.to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![
            0.0f32.into(),
            0.0f32.into(),
            g.page_width.into(),
            g.page_height.into(),
        ],
        "Resources" => dictionary! {
            "XObject" => dictionary! {
                "Im0" => image_id,
            },
        },
        "Contents" => content_id,
    }))
}

fn add_image(doc: &mut Document, image: PreparedImage) -> ObjectId {
    let width = i64::from(image.width);
    let height = i64::from(image.height);

    let mut dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => width,
        "Height" => height,
        "ColorSpace" => image.color_space.pdf_name(),
        "BitsPerComponent" => 8i64,
        "Filter" => "FlateDecode",
    };

    if let Some(alpha) = image.alpha {
        let smask_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width,
                "Height" => height,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8i64,
                "Filter" => "FlateDecode",
            },
            alpha,
        ));
        dict.set("SMask", smask_id);
    }

    // Samples are already deflated; lopdf must not compress them again.
    doc.add_object(Stream::new(dict, image.samples).with_compression(false))
}

/// PDF text string: literal for ASCII, UTF-16BE with BOM otherwise.
fn text_string(s: &str) -> Object {
    if s.is_ascii() {
        return Object::string_literal(s);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in s.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}
