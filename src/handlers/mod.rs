pub mod health_handler;
pub mod material_handler;
pub mod tutor_handler;

use actix_web::{error::JsonPayloadError, web, HttpRequest};

use crate::errors::AppError;

pub use health_handler::health_check;
pub use material_handler::{
    delete_material, get_material, list_materials, supported_formats, upload_material,
};
pub use tutor_handler::{
    ask_question, explain_simpler, generate_notes, generate_quiz, multiple_approaches,
};

/// Registers every route plus the JSON body settings.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(health_check)
        .service(upload_material)
        .service(list_materials)
        .service(get_material)
        .service(delete_material)
        .service(supported_formats)
        .service(generate_notes)
        .service(ask_question)
        .service(explain_simpler)
        .service(multiple_approaches)
        .service(generate_quiz);
}

/// Bad JSON bodies get the same failure shape as every other error.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
        AppError::ValidationError(format!("Invalid request body: {}", err)).into()
    })
}
