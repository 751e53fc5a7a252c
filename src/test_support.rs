use std::path::PathBuf;
use std::process;
use std::time::{SystemTime, UNIX_EPOCH};

pub(crate) fn unique_temp_path(suffix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();

    let mut path = std::env::temp_dir();
    path.push(format!("pdfv_{suffix}_{}_{}", process::id(), nanos));
    path
}

/// Square 300pt pages, one line of text each.
pub(crate) fn build_pdf(page_texts: &[&str]) -> Vec<u8> {
    let pages = if page_texts.is_empty() {
        vec![(300.0, 300.0, String::new())]
    } else {
        page_texts
            .iter()
            .map(|text| (300.0, 300.0, text_stream(text)))
            .collect()
    };
    build_pdf_from_pages(&pages, None)
}

/// Blank pages with the given media box sizes and an optional `/Info` body.
pub(crate) fn build_pdf_with_sizes(sizes: &[(f32, f32)], info: Option<&str>) -> Vec<u8> {
    let pages: Vec<(f32, f32, String)> = sizes
        .iter()
        .map(|(width, height)| (*width, *height, String::new()))
        .collect();
    build_pdf_from_pages(&pages, info)
}

fn text_stream(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' | '(' | ')' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            _ => escaped.push(ch),
        }
    }
    format!("BT /F1 14 Tf 36 260 Td ({escaped}) Tj ET")
}

fn build_pdf_from_pages(pages: &[(f32, f32, String)], info: Option<&str>) -> Vec<u8> {
    let page_count = pages.len();
    let page_ids: Vec<usize> = (0..page_count).map(|i| 4 + i * 2).collect();

    let mut objects = Vec::new();
    objects.push("<< /Type /Catalog /Pages 2 0 R >>".to_string());

    let kids = page_ids
        .iter()
        .map(|id| format!("{id} 0 R"))
        .collect::<Vec<_>>()
        .join(" ");
    objects.push(format!(
        "<< /Type /Pages /Kids [{kids}] /Count {page_count} >>"
    ));
    objects.push("<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string());

    for (index, (width, height, stream)) in pages.iter().enumerate() {
        let content_id = 5 + index * 2;
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {width} {height}] /Resources << /Font << /F1 3 0 R >> >> /Contents {content_id} 0 R >>"
        ));
        objects.push(format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            stream.len(),
            stream
        ));
    }

    let info_ref = info.map(|body| {
        objects.push(format!("<< {body} >>"));
        objects.len()
    });

    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

    let mut offsets = Vec::new();
    for (index, object) in objects.iter().enumerate() {
        offsets.push(bytes.len());
        bytes.extend_from_slice(format!("{} 0 obj\n{object}\nendobj\n", index + 1).as_bytes());
    }

    let xref_start = bytes.len();
    bytes.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    bytes.extend_from_slice(b"0000000000 65535 f \n");
    for offset in &offsets {
        bytes.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
    }

    let info_entry = info_ref
        .map(|id| format!(" /Info {id} 0 R"))
        .unwrap_or_default();
    bytes.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R{info_entry} >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_start
        )
        .as_bytes(),
    );

    bytes
}
