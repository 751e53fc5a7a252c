use lopdf::{Dictionary, Document, Object};

use crate::error::{AppError, AppResult};

/// Raw document information as declared by the file, before any formatting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub keywords: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    /// Declared creation date, still in `D:YYYYMMDDHHmmSS...` form.
    pub creation_date: Option<String>,
    pub mod_date: Option<String>,
    pub version: Option<String>,
    pub linearized: bool,
    pub encrypted: bool,
    pub permissions: DeclaredPermissions,
}

/// `None` means the document says nothing about the permission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeclaredPermissions {
    pub printing: Option<bool>,
    pub modify_contents: Option<bool>,
    pub copy_contents: Option<bool>,
    pub modify_annotations: Option<bool>,
    pub fill_in: Option<bool>,
    pub extract_for_accessibility: Option<bool>,
    pub assemble: Option<bool>,
    pub print_high_quality: Option<bool>,
}

impl DeclaredPermissions {
    /// Decodes the `/P` access flags of a standard security handler.
    pub fn from_access_flags(flags: i64) -> Self {
        let bit = |position: u32| Some((flags >> (position - 1)) & 1 == 1);
        Self {
            printing: bit(3),
            modify_contents: bit(4),
            copy_contents: bit(5),
            modify_annotations: bit(6),
            fill_in: bit(9),
            extract_for_accessibility: bit(10),
            assemble: bit(11),
            print_high_quality: bit(12),
        }
    }
}

pub fn read_document_info(bytes: &[u8]) -> AppResult<DocumentInfo> {
    let doc = Document::load_mem(bytes)
        .map_err(|err| AppError::metadata(format!("document structure unreadable: {err}")))?;

    let mut info = DocumentInfo {
        version: Some(doc.version.clone()).filter(|version| !version.is_empty()),
        linearized: doc.objects.values().any(|object| {
            object
                .as_dict()
                .map(|dict| dict.has(b"Linearized"))
                .unwrap_or(false)
        }),
        encrypted: doc.trailer.has(b"Encrypt"),
        ..DocumentInfo::default()
    };

    if let Some(encrypt) = resolve_dict(&doc, doc.trailer.get(b"Encrypt").ok())
        && let Ok(Object::Integer(flags)) = encrypt.get(b"P")
    {
        info.permissions = DeclaredPermissions::from_access_flags(*flags);
    }

    let Some(dict) = resolve_dict(&doc, doc.trailer.get(b"Info").ok()) else {
        return Ok(info);
    };

    info.title = text_entry(&doc, dict, b"Title");
    info.author = text_entry(&doc, dict, b"Author");
    info.subject = text_entry(&doc, dict, b"Subject");
    info.keywords = text_entry(&doc, dict, b"Keywords");
    info.creator = text_entry(&doc, dict, b"Creator");
    info.producer = text_entry(&doc, dict, b"Producer");
    info.creation_date = text_entry(&doc, dict, b"CreationDate");
    info.mod_date = text_entry(&doc, dict, b"ModDate");

    // Some producers write explicit booleans into the info dictionary.
    let flag = |key: &[u8]| match dict.get(key) {
        Ok(Object::Boolean(value)) => Some(*value),
        _ => None,
    };
    let declared = &mut info.permissions;
    declared.printing = flag(b"Printing").or(declared.printing);
    declared.modify_contents = flag(b"ModifyContents").or(declared.modify_contents);
    declared.copy_contents = flag(b"CopyContents").or(declared.copy_contents);
    declared.modify_annotations = flag(b"ModifyAnnotations").or(declared.modify_annotations);
    declared.fill_in = flag(b"FillIn").or(declared.fill_in);
    declared.extract_for_accessibility =
        flag(b"ExtractForAccessibility").or(declared.extract_for_accessibility);
    declared.assemble = flag(b"Assemble").or(declared.assemble);
    declared.print_high_quality = flag(b"PrintHighQuality").or(declared.print_high_quality);

    Ok(info)
}

fn resolve_dict<'a>(doc: &'a Document, object: Option<&'a Object>) -> Option<&'a Dictionary> {
    match object? {
        Object::Reference(id) => doc.get_object(*id).ok()?.as_dict().ok(),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

fn text_entry(doc: &Document, dict: &Dictionary, key: &[u8]) -> Option<String> {
    let object = match dict.get(key).ok()? {
        Object::Reference(id) => doc.get_object(*id).ok()?,
        other => other,
    };
    let text = match object {
        Object::String(bytes, _) => decode_text_string(bytes),
        Object::Name(name) => String::from_utf8_lossy(name).into_owned(),
        _ => return None,
    };
    let trimmed = text.trim_end_matches('\0').to_string();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Decodes a PDF text string: UTF-16BE with a byte order mark, otherwise
/// UTF-8 when valid, falling back to Latin-1.
pub fn decode_text_string(bytes: &[u8]) -> String {
    if let Some(body) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = body
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&byte| byte as char).collect(),
    }
}

#[cfg(test)]
mod tests {
    use crate::error::AppError;
    use crate::test_support::{build_pdf, build_pdf_with_sizes};

    use super::{DeclaredPermissions, decode_text_string, read_document_info};

    #[test]
    fn reads_info_dictionary_fields() {
        let bytes = build_pdf_with_sizes(
            &[(300.0, 300.0)],
            Some(
                "/Title (Quarterly Report) /Author (Mina) /Producer (pdfgen) \
                 /CreationDate (D:20210101120000+09'00')",
            ),
        );

        let info = read_document_info(&bytes).expect("info should be readable");
        assert_eq!(info.title.as_deref(), Some("Quarterly Report"));
        assert_eq!(info.author.as_deref(), Some("Mina"));
        assert_eq!(info.producer.as_deref(), Some("pdfgen"));
        assert_eq!(info.subject, None);
        assert_eq!(
            info.creation_date.as_deref(),
            Some("D:20210101120000+09'00'")
        );
        assert_eq!(info.version.as_deref(), Some("1.4"));
        assert!(!info.encrypted);
        assert!(!info.linearized);
        assert_eq!(info.permissions, DeclaredPermissions::default());
    }

    #[test]
    fn missing_info_dictionary_yields_empty_fields() {
        let info = read_document_info(&build_pdf(&["body"])).expect("info should be readable");
        assert_eq!(info.title, None);
        assert_eq!(info.creation_date, None);
    }

    #[test]
    fn explicit_boolean_permission_is_kept() {
        let bytes = build_pdf_with_sizes(&[(300.0, 300.0)], Some("/Printing false"));
        let info = read_document_info(&bytes).expect("info should be readable");
        assert_eq!(info.permissions.printing, Some(false));
        assert_eq!(info.permissions.copy_contents, None);
    }

    #[test]
    fn garbage_bytes_are_a_metadata_error() {
        let err = read_document_info(b"not a pdf at all").expect_err("must fail");
        assert!(matches!(err, AppError::Metadata(_)));
    }

    #[test]
    fn access_flags_map_to_permission_bits() {
        // print (3) + copy (5) + accessibility (10)
        let flags = (1 << 2) | (1 << 4) | (1 << 9);
        let permissions = DeclaredPermissions::from_access_flags(flags);
        assert_eq!(permissions.printing, Some(true));
        assert_eq!(permissions.modify_contents, Some(false));
        assert_eq!(permissions.copy_contents, Some(true));
        assert_eq!(permissions.extract_for_accessibility, Some(true));
        assert_eq!(permissions.print_high_quality, Some(false));
    }

    #[test]
    fn decodes_utf16_and_latin1_strings() {
        assert_eq!(decode_text_string(&[0xFE, 0xFF, 0x00, 0x41, 0x00, 0xE9]), "Aé");
        assert_eq!(decode_text_string(&[0x43, 0x61, 0x66, 0xE9]), "Café");
        assert_eq!(decode_text_string(b"plain"), "plain");
    }
}
