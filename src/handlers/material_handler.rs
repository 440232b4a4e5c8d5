use actix_multipart::{Field, Multipart, MultipartError};
use actix_web::{delete, get, post, web, HttpRequest, HttpResponse};
use futures::TryStreamExt;

use crate::{
    app_state::AppState,
    errors::AppError,
    middleware::get_request_id,
    models::dto::response::{
        DeleteMaterialResponse, MaterialListResponse, SupportedFormatsResponse, UploadResponse,
    },
};

const MAX_SUBJECT_BYTES: usize = 200;

/// Multipart upload with a `file` part and an optional `subject` part.
#[post("/api/upload")]
async fn upload_material(
    req: HttpRequest,
    state: web::Data<AppState>,
    mut payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut subject: Option<String> = None;

    while let Some(mut field) = payload.try_next().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .unwrap_or_default()
                    .to_string();

                // size is checked per chunk so oversized uploads stop early
                let mut bytes = Vec::new();
                while let Some(chunk) = field.try_next().await.map_err(multipart_error)? {
                    bytes.extend_from_slice(&chunk);
                    state.material_service.check_size(bytes.len() as u64)?;
                }

                file = Some((file_name, bytes));
            }
            "subject" => {
                let bytes = read_field(&mut field, MAX_SUBJECT_BYTES).await?;
                subject = Some(String::from_utf8_lossy(&bytes).trim().to_string());
            }
            _ => {
                // unknown parts are drained and ignored
                while field.try_next().await.map_err(multipart_error)?.is_some() {}
            }
        }
    }

    let (file_name, bytes) =
        file.ok_or_else(|| AppError::ValidationError("No file provided".to_string()))?;

    log::info!(
        "[{}] Upload of {} ({} bytes)",
        get_request_id(&req).unwrap_or_else(|| "-".to_string()),
        file_name,
        bytes.len()
    );
    let material = state
        .material_service
        .upload(&file_name, &bytes, subject)
        .await?;
    Ok(HttpResponse::Ok().json(UploadResponse::from(material)))
}

#[get("/api/materials")]
async fn list_materials(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let materials = state.material_service.list().await?;
    Ok(HttpResponse::Ok().json(MaterialListResponse::new(&materials)))
}

#[get("/api/material/{id}")]
async fn get_material(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let summary = state.material_service.get_summary(&id).await?;
    Ok(HttpResponse::Ok().json(summary))
}

#[delete("/api/material/{id}")]
async fn delete_material(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let material = state.material_service.delete(&id).await?;
    Ok(HttpResponse::Ok().json(DeleteMaterialResponse {
        success: true,
        message: format!("Material '{}' deleted", material.file_name),
    }))
}

#[get("/api/supported-formats")]
async fn supported_formats(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(SupportedFormatsResponse {
        formats: state.material_service.supported_formats(),
        max_file_size_mb: state.config.max_file_size_mb,
    })
}

async fn read_field(field: &mut Field, max_bytes: usize) -> Result<Vec<u8>, AppError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(multipart_error)? {
        bytes.extend_from_slice(&chunk);
        if bytes.len() > max_bytes {
            return Err(AppError::ValidationError(format!(
                "Form field is longer than {} bytes",
                max_bytes
            )));
        }
    }
    Ok(bytes)
}

fn multipart_error(err: MultipartError) -> AppError {
    AppError::ValidationError(format!("Invalid multipart upload: {}", err))
}
