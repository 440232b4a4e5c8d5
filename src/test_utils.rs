use crate::models::domain::{ExtractionMetadata, Material, MaterialFormat};

#[cfg(test)]
pub mod fixtures {
    use std::io::{Cursor, Write};
    use std::path::PathBuf;

    use zip::{write::SimpleFileOptions, ZipWriter};

    use super::*;

    pub const MULTIPART_BOUNDARY: &str = "----study-buddy-test-boundary";

    /// Registered-looking material; the format follows the file extension.
    pub fn sample_material(file_name: &str, text: &str) -> Material {
        Material::new(
            file_name,
            MaterialFormat::from_file_name(file_name).unwrap_or(MaterialFormat::Pdf),
            text.to_string(),
            None,
            PathBuf::from("test-uploads").join(file_name),
            ExtractionMetadata {
                file_size: text.len() as u64,
                ..Default::default()
            },
        )
    }

    /// Minimal DOCX with one paragraph per entry.
    pub fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
        let body: String = paragraphs
            .iter()
            .map(|p| format!("<w:p><w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>", escape(p)))
            .collect();
        let document = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
             <w:body>{}</w:body></w:document>",
            body
        );

        zip_archive(&[("word/document.xml".to_string(), document)])
    }

    /// Minimal PPTX; each slide is a list of text lines, the first being
    /// the title. Entries are written last slide first.
    pub fn pptx_bytes(slides: &[&[&str]]) -> Vec<u8> {
        let entries: Vec<(String, String)> = slides
            .iter()
            .enumerate()
            .rev()
            .map(|(index, lines)| {
                let paragraphs: String = lines
                    .iter()
                    .map(|line| format!("<a:p><a:r><a:t>{}</a:t></a:r></a:p>", escape(line)))
                    .collect();
                let xml = format!(
                    "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
                     <p:sld xmlns:p=\"http://schemas.openxmlformats.org/presentationml/2006/main\" \
                     xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\">\
                     <p:cSld><p:spTree><p:sp><p:txBody>{}</p:txBody></p:sp></p:spTree></p:cSld></p:sld>",
                    paragraphs
                );
                (format!("ppt/slides/slide{}.xml", index + 1), xml)
            })
            .collect();

        zip_archive(&entries)
    }

    /// `multipart/form-data` body with a `file` part and an optional
    /// `subject` part. Returns the content type and the body.
    pub fn multipart_body(file_name: &str, bytes: &[u8], subject: Option<&str>) -> (String, Vec<u8>) {
        let mut body = Vec::new();

        if let Some(subject) = subject {
            body.extend_from_slice(
                format!(
                    "--{}\r\nContent-Disposition: form-data; name=\"subject\"\r\n\r\n{}\r\n",
                    MULTIPART_BOUNDARY, subject
                )
                .as_bytes(),
            );
        }

        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n",
                MULTIPART_BOUNDARY, file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{}--\r\n", MULTIPART_BOUNDARY).as_bytes());

        (
            format!("multipart/form-data; boundary={}", MULTIPART_BOUNDARY),
            body,
        )
    }

    fn zip_archive(entries: &[(String, String)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, contents) in entries {
            writer
                .start_file(name.as_str(), SimpleFileOptions::default())
                .expect("zip entry should start");
            writer
                .write_all(contents.as_bytes())
                .expect("zip entry should be written");
        }
        writer.finish().expect("zip should finish").into_inner()
    }

    fn escape(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
    }
}

#[cfg(test)]
pub mod test_helpers {
    use std::sync::Arc;

    use actix_web::{http::StatusCode, web};

    use crate::{
        app_state::AppState, config::Config, repositories::JsonMaterialRepository,
        services::model_service::MockCompletionGateway, storage::FileStore,
    };

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }

    /// App state over `<dir>/uploads`, an in-memory registry and the given
    /// mock gateway.
    pub fn test_state(dir: &tempfile::TempDir, gateway: MockCompletionGateway) -> web::Data<AppState> {
        let mut config = Config::test_config();
        config.upload_dir = dir.path().join("uploads");
        config.materials_index = config.upload_dir.join("materials.json");
        std::fs::create_dir_all(&config.upload_dir).expect("upload dir should be created");

        let store = FileStore::new(&config.upload_dir);
        web::Data::new(AppState::with_components(
            config,
            store,
            Arc::new(JsonMaterialRepository::in_memory()),
            Arc::new(gateway),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use crate::models::domain::MaterialFormat;

    #[test]
    fn test_sample_material_infers_format() {
        let material = sample_material("slides.pptx", "Slide text");

        assert_eq!(material.format, MaterialFormat::Pptx);
        assert_eq!(material.content_length, 10);
        assert!(!material.id.is_empty());
    }

    #[test]
    fn test_sample_materials_get_distinct_ids() {
        let a = sample_material("a.pdf", "alpha");
        let b = sample_material("a.pdf", "alpha");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_docx_bytes_is_a_zip() {
        let bytes = docx_bytes(&["hello"]);
        assert_eq!(&bytes[..2], b"PK");
    }
}
